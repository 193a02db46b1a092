#![forbid(unsafe_code)]
use chrono::NaiveDate;
use crewplan::calendar::color::legend_swatches;
use crewplan::calendar::{find_label_row, tag::cell_status};
use crewplan::{
    detect_header_row, normalize_label, AvailabilityStatus, BlockReason, CalendarStrategy,
    CellValue, Color, ColorCalendar, ColorCell, ColorGrid, Grid, TagCalendar,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn date(y: i32, m: u32, day: u32) -> CellValue {
    CellValue::Date(d(y, m, day))
}

fn txt(s: &str) -> CellValue {
    CellValue::text(s)
}

fn people(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn tag_cells_map_to_free_vacation_other() {
    let grid = Grid::new(vec![
        vec![txt("MP Januar"), date(2026, 1, 5), date(2026, 1, 6), date(2026, 1, 7)],
        vec![txt("Anna:"), CellValue::Empty, txt("Urlaub"), txt("ProjectX")],
    ]);
    let ingestion = TagCalendar::new(&grid).ingest(&people(&["Anna"]));

    assert_eq!(ingestion.header_row, Some(0));
    assert!(ingestion.unmatched.is_empty());
    let map = &ingestion.availability;
    assert_eq!(map.status("Anna", d(2026, 1, 5)), AvailabilityStatus::Free);
    assert_eq!(
        map.status("Anna", d(2026, 1, 6)),
        AvailabilityStatus::Blocked(BlockReason::Vacation)
    );
    assert_eq!(
        map.status("Anna", d(2026, 1, 7)),
        AvailabilityStatus::Blocked(BlockReason::Other)
    );
}

#[test]
fn cell_status_variants() {
    assert_eq!(cell_status(&CellValue::Empty), AvailabilityStatus::Free);
    assert_eq!(cell_status(&txt("   ")), AvailabilityStatus::Free);
    assert_eq!(
        cell_status(&txt(" U ")),
        AvailabilityStatus::Blocked(BlockReason::Vacation)
    );
    assert_eq!(
        cell_status(&txt("URLAUB")),
        AvailabilityStatus::Blocked(BlockReason::Vacation)
    );
    assert_eq!(
        cell_status(&txt("Urlaubsantrag")),
        AvailabilityStatus::Blocked(BlockReason::Other)
    );
    assert_eq!(
        cell_status(&date(2026, 1, 1)),
        AvailabilityStatus::Blocked(BlockReason::Other)
    );
}

#[test]
fn header_row_tie_keeps_first_row() {
    let grid = Grid::new(vec![
        vec![txt("title")],
        vec![txt("week"), date(2026, 1, 5), date(2026, 1, 6)],
        vec![txt("copy"), date(2026, 2, 2), date(2026, 2, 3)],
    ]);
    let header = detect_header_row(&grid).unwrap();
    assert_eq!(header.index, 1);
    assert_eq!(header.columns.get(&1), Some(&d(2026, 1, 5)));
    assert_eq!(header.columns.get(&2), Some(&d(2026, 1, 6)));
}

#[test]
fn header_row_prefers_strictly_more_dates() {
    let grid = Grid::new(vec![
        vec![txt("a"), date(2026, 1, 5)],
        vec![txt("b"), date(2026, 1, 5), CellValue::Empty, date(2026, 1, 7)],
    ]);
    let header = detect_header_row(&grid).unwrap();
    assert_eq!(header.index, 1);
    assert_eq!(header.columns.len(), 2);
    assert!(!header.columns.contains_key(&2));
}

#[test]
fn dates_in_label_column_are_not_counted() {
    let grid = Grid::new(vec![
        vec![date(2026, 1, 5), txt("x")],
        vec![date(2026, 1, 6)],
    ]);
    assert!(detect_header_row(&grid).is_none());
}

#[test]
fn grid_without_dates_yields_empty_map() {
    let grid = Grid::new(vec![
        vec![txt("Anna"), txt("u"), txt("ProjectX")],
        vec![txt("Sonja"), CellValue::Empty, txt("u")],
    ]);
    let ingestion = TagCalendar::new(&grid).ingest(&people(&["Anna", "Sonja"]));
    assert!(!ingestion.is_recognized());
    assert!(ingestion.availability.is_empty());
}

#[test]
fn unknown_person_stays_free() {
    let grid = Grid::new(vec![
        vec![CellValue::Empty, date(2026, 1, 5)],
        vec![txt("Anna"), txt("u")],
    ]);
    let ingestion = TagCalendar::new(&grid).ingest(&people(&["Anna", "Sophia"]));
    assert_eq!(ingestion.unmatched, vec!["Sophia".to_string()]);
    assert!(ingestion.availability.is_free("Sophia", d(2026, 1, 5)));
    assert!(!ingestion.availability.is_free("anna", d(2026, 1, 5)));
}

#[test]
fn label_normalization() {
    assert_eq!(normalize_label("Anna:"), "anna");
    assert_eq!(normalize_label("  MAREIKE : Urlaub"), "mareike");
    assert_eq!(normalize_label("Sonja"), "sonja");

    let grid = Grid::new(vec![
        vec![txt("Legende")],
        vec![txt("anna: ")],
        vec![txt("Anna")],
    ]);
    assert_eq!(find_label_row(&grid, "ANNA", None), Some(1));
    assert_eq!(find_label_row(&grid, "Anna", Some(1)), None);
}

#[test]
fn color_parse_and_sentinel() {
    assert_eq!(Color::parse("#ffaa00"), Color::parse("FFAA00"));
    assert_eq!(Color::parse("FFFFAA00"), Color::parse("FFAA00"));
    assert_eq!(Color::parse("FFAA00").unwrap().as_str(), "FFAA00");
    assert!(Color::parse("00000000").is_none());
    assert!(Color::parse("").is_none());
    assert!(Color::parse("none").is_none());
}

fn cell(value: CellValue, fill: Option<&str>) -> ColorCell {
    ColorCell::new(value, fill)
}

fn blank() -> ColorCell {
    ColorCell::default()
}

fn color_grid() -> ColorGrid {
    ColorGrid::new(vec![
        vec![
            cell(txt("Legende"), None),
            blank(),
            cell(date(2026, 1, 5), None),
            cell(date(2026, 1, 6), None),
            cell(date(2026, 1, 7), None),
        ],
        vec![cell(txt("Anna:"), None), cell(CellValue::Empty, Some("FFAA00"))],
        vec![cell(txt("Mareike"), None), cell(CellValue::Empty, Some("3366FF"))],
        vec![
            cell(txt("Film 1"), None),
            blank(),
            cell(txt("BS"), Some("FFAA00")),
            cell(CellValue::Empty, Some("3366FF")),
            cell(CellValue::Empty, Some("00000000")),
        ],
        vec![
            cell(txt("Film 2"), None),
            blank(),
            blank(),
            blank(),
            cell(CellValue::Empty, Some("FFAA00")),
        ],
    ])
}

#[test]
fn color_legend_blocks_matching_cells_only() {
    let grid = color_grid();
    let ingestion = ColorCalendar::new(&grid).ingest(&people(&["Anna"]));

    assert_eq!(ingestion.header_row, Some(0));
    assert_eq!(
        ingestion.availability.blocked_days("Anna"),
        vec![
            (d(2026, 1, 5), BlockReason::Other),
            (d(2026, 1, 7), BlockReason::Other),
        ]
    );
    assert!(ingestion.availability.is_free("Anna", d(2026, 1, 6)));
}

#[test]
fn color_people_without_swatch_are_unmatched() {
    let grid = color_grid();
    let ingestion = ColorCalendar::new(&grid).ingest(&people(&["Anna", "Mareike", "Sonja"]));

    assert_eq!(ingestion.unmatched, vec!["Sonja".to_string()]);
    assert_eq!(
        ingestion.availability.blocked_days("Mareike"),
        vec![(d(2026, 1, 6), BlockReason::Other)]
    );
    assert!(ingestion.availability.blocked_days("Sonja").is_empty());
}

#[test]
fn legend_scan_window_is_bounded() {
    let grid = color_grid();
    let swatches = legend_swatches(&grid, &people(&["Anna", "Mareike"]), 2);
    assert_eq!(swatches.len(), 1);
    assert_eq!(swatches[0].person, "Anna");
    assert_eq!(swatches[0].row, 1);

    let ingestion = ColorCalendar::new(&grid)
        .with_legend_rows(2)
        .ingest(&people(&["Mareike"]));
    assert!(ingestion.availability.is_empty());
}

#[test]
fn legend_cells_never_block_even_for_unrequested_people() {
    // la colonne 1 est ici une colonne de dates
    let grid = ColorGrid::new(vec![
        vec![
            cell(txt("Legende"), None),
            cell(date(2026, 1, 5), None),
            cell(date(2026, 1, 6), None),
        ],
        vec![cell(txt("Anna"), None), cell(CellValue::Empty, Some("FFAA00"))],
        vec![cell(txt("Sophia"), None), cell(CellValue::Empty, Some("#ffaa00"))],
        vec![cell(txt("Film 1"), None), blank(), cell(txt("BS"), Some("FFAA00"))],
    ]);

    let alone = ColorCalendar::new(&grid).ingest(&people(&["Anna"]));
    assert_eq!(
        alone.availability.blocked_days("Anna"),
        vec![(d(2026, 1, 6), BlockReason::Other)]
    );
    assert!(alone.availability.is_free("Anna", d(2026, 1, 5)));

    let both = ColorCalendar::new(&grid).ingest(&people(&["Anna", "Sophia"]));
    assert_eq!(
        both.availability.blocked_days("Anna"),
        alone.availability.blocked_days("Anna")
    );
}

#[test]
fn merge_keeps_blocks() {
    let grid = color_grid();
    let mut map = ColorCalendar::new(&grid).ingest(&people(&["Anna"])).availability;

    let tag_grid = Grid::new(vec![
        vec![CellValue::Empty, date(2026, 1, 5), date(2026, 1, 6)],
        vec![txt("Anna"), CellValue::Empty, txt("u")],
    ]);
    let tags = TagCalendar::new(&tag_grid).ingest(&people(&["Anna"])).availability;
    map.merge(&tags);

    assert_eq!(
        map.status("Anna", d(2026, 1, 5)),
        AvailabilityStatus::Blocked(BlockReason::Other)
    );
    assert_eq!(
        map.status("Anna", d(2026, 1, 6)),
        AvailabilityStatus::Blocked(BlockReason::Vacation)
    );
}
