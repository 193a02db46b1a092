#![forbid(unsafe_code)]
use chrono::NaiveDate;
use crewplan::{
    io, load_config_from_file, AvailabilityMap, AvailabilityStatus, BlockReason,
    CalendarStrategy, CellValue, DayFilter, Film, FilterMode, HolidayCalendar, Person, Planner,
    Role, TagCalendar, Workload,
};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn sample_plan() -> crewplan::Plan {
    let people = vec![
        Person::new("A", [Role::new("Storyboard")]),
        Person::new("B", [Role::new("Storyboard"), Role::new("Keyframes")]),
    ];
    let film = Film::new("Pilot", d(2026, 1, 5), d(2026, 1, 6))
        .with_quota(Role::new("Storyboard"), 3)
        .with_quota(Role::new("Keyframes"), 3);
    let workload = Workload::new(people, vec![film], 1);
    let availability = AvailabilityMap::new();
    let filter = DayFilter::working_days(d(2026, 1, 5), HolidayCalendar::berlin());
    Planner::new(&workload, &availability, &filter).run()
}

#[test]
fn assignments_csv_export() {
    let plan = sample_plan();
    let mut buf = Vec::new();
    io::write_assignments_csv(&mut buf, &plan).unwrap();
    let out = String::from_utf8(buf).unwrap();

    insta::assert_snapshot!(out.trim_end(), @r###"
    film,role,person,date,units,film_role
    Pilot,Storyboard,A,2026-01-05,1,Pilot – Storyboard
    Pilot,Storyboard,B,2026-01-05,1,Pilot – Storyboard
    Pilot,Storyboard,A,2026-01-06,1,Pilot – Storyboard
    Pilot,Keyframes,B,2026-01-06,1,Pilot – Keyframes
    "###);
}

#[test]
fn shortfalls_csv_export() {
    let plan = sample_plan();
    let mut buf = Vec::new();
    io::write_shortfalls_csv(&mut buf, &plan).unwrap();
    let out = String::from_utf8(buf).unwrap();

    insta::assert_snapshot!(out.trim_end(), @r###"
    film,role,remaining
    Pilot,Keyframes,2
    "###);
}

#[test]
fn plan_json_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plan.json");
    let plan = sample_plan();

    io::export_plan_json(&path, &plan).unwrap();
    let loaded = io::load_plan_json(&path).unwrap();
    assert_eq!(loaded, plan);
}

#[test]
fn import_people_and_films_csv() {
    let dir = tempdir().unwrap();
    let people_path = dir.path().join("people.csv");
    let films_path = dir.path().join("films.csv");
    fs::write(
        &people_path,
        "name,roles\nAnna,Storyboard;Keyframes\nSonja, Animation \n",
    )
    .unwrap();
    fs::write(
        &films_path,
        "film,window_start,window_end,quotas\nFilm 1,2026-01-12,2026-02-11,Storyboard=3;Animation=0\nFilm 2,12.02.2026,01.02.2026,\n",
    )
    .unwrap();

    let people = io::import_people_csv(&people_path).unwrap();
    assert_eq!(people.len(), 2);
    assert!(people[0].can(&Role::new("Keyframes")));
    assert_eq!(people[1].capabilities, vec![Role::new("Animation")]);

    let films = io::import_films_csv(&films_path).unwrap();
    assert_eq!(films.len(), 2);
    assert_eq!(films[0].quotas.len(), 2);
    assert_eq!(films[0].quotas[0].role, Role::new("Storyboard"));
    assert_eq!(films[0].quotas[0].units, 3);
    assert!(!films[1].window_is_valid());
    assert!(films[1].quotas.is_empty());
}

#[test]
fn bad_quota_is_rejected() {
    let dir = tempdir().unwrap();
    let films_path = dir.path().join("films.csv");
    fs::write(
        &films_path,
        "film,window_start,window_end,quotas\nFilm 1,2026-01-12,2026-02-11,Storyboard:3\n",
    )
    .unwrap();
    assert!(io::import_films_csv(&films_path).is_err());
}

#[test]
fn csv_calendar_cells() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mp.csv");
    fs::write(
        &path,
        "MP,05.01.2026,2026-01-06\nAnna:,,u\nSonja,ProjectX,\n",
    )
    .unwrap();

    let grid = io::read_calendar(&path).unwrap();
    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.cell(0, 1), &CellValue::Date(d(2026, 1, 5)));
    assert_eq!(grid.cell(0, 2), &CellValue::Date(d(2026, 1, 6)));
    assert_eq!(grid.cell(1, 1), &CellValue::Empty);
    assert_eq!(grid.cell(2, 1), &CellValue::text("ProjectX"));
    assert_eq!(grid.cell(9, 9), &CellValue::Empty);
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn xlsx_calendar_cells() {
    let grid = io::read_calendar(fixture("mp.xlsx")).unwrap();

    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.cell(0, 1), &CellValue::Date(d(2026, 1, 5)));
    assert_eq!(grid.cell(0, 4), &CellValue::Date(d(2026, 1, 8)));
    assert_eq!(grid.cell(1, 0), &CellValue::text("Anna: Storyboard"));
    assert_eq!(grid.cell(1, 2), &CellValue::Empty);
    // nombre, booléen : texte ; erreur : vide
    assert!(matches!(grid.cell(1, 4), CellValue::Text(_)));
    assert!(matches!(grid.cell(2, 3), CellValue::Text(_)));
    assert_eq!(grid.cell(2, 1), &CellValue::Empty);
    assert_eq!(grid.cell(2, 4), &CellValue::Date(d(2026, 1, 9)));

    let people = vec!["Anna".to_string(), "Mareike".to_string()];
    let ingestion = TagCalendar::new(&grid).ingest(&people);
    assert_eq!(ingestion.header_row, Some(0));
    assert!(ingestion.unmatched.is_empty());

    let map = &ingestion.availability;
    let vacation = AvailabilityStatus::Blocked(BlockReason::Vacation);
    let other = AvailabilityStatus::Blocked(BlockReason::Other);
    assert_eq!(map.status("Anna", d(2026, 1, 5)), vacation);
    assert_eq!(map.status("Anna", d(2026, 1, 6)), AvailabilityStatus::Free);
    assert_eq!(map.status("Anna", d(2026, 1, 7)), other);
    assert_eq!(map.status("Anna", d(2026, 1, 8)), other);
    assert_eq!(map.status("Mareike", d(2026, 1, 5)), AvailabilityStatus::Free);
    assert_eq!(map.status("Mareike", d(2026, 1, 6)), vacation);
    assert_eq!(map.status("Mareike", d(2026, 1, 7)), other);
    assert_eq!(map.status("Mareike", d(2026, 1, 8)), other);
}

#[test]
fn xlsx_range_not_starting_in_column_a_is_padded() {
    let grid = io::read_calendar_xlsx(fixture("offset.xlsx")).unwrap();

    assert_eq!(grid.row_count(), 2);
    assert_eq!(grid.cell(0, 0), &CellValue::Empty);
    assert_eq!(grid.cell(0, 1), &CellValue::Empty);
    assert_eq!(grid.cell(0, 2), &CellValue::text("MP"));
    assert_eq!(grid.cell(0, 3), &CellValue::Date(d(2026, 1, 5)));
    assert_eq!(grid.cell(1, 3), &CellValue::text("u"));
}

#[test]
fn unsupported_calendar_extension() {
    assert!(io::read_calendar("calendar.ods").is_err());
    assert!(io::read_calendar("missing.xlsx").is_err());
}

#[test]
fn color_calendar_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mp.json");
    fs::write(
        &path,
        r##"{"rows": [
            [{"value": {"type": "text", "value": "Legende"}}, {}, {"value": {"type": "date", "value": "2026-01-05"}}],
            [{"value": {"type": "text", "value": "Anna"}}, {"fill": "FFAA00"}],
            [{"value": {"type": "empty"}}, {}, {"fill": "#ffaa00"}]
        ]}"##,
    )
    .unwrap();

    let grid = io::read_color_calendar_json(&path).unwrap();
    assert_eq!(grid.rows.len(), 3);
    assert_eq!(grid.color(1, 1), grid.color(2, 2));
    assert!(grid.color(0, 1).is_none());
}

#[test]
fn config_file_loading() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"daily_capacity": 2, "filter": "working_days", "builtin_holidays": false, "holidays": ["2026-01-07"]}"#,
    )
    .unwrap();

    let config = load_config_from_file(&path).unwrap();
    assert_eq!(config.daily_capacity, 2);
    assert_eq!(config.filter, FilterMode::WorkingDays);
    assert_eq!(config.legend_rows, 25);

    let filter = config.day_filter(d(2026, 1, 5));
    assert!(filter.is_eligible(d(2026, 1, 6)));
    assert!(!filter.is_eligible(d(2026, 1, 7)));
    assert!(!filter.is_eligible(d(2026, 1, 10)));
    assert!(filter.is_eligible(d(2026, 12, 25)));

    fs::write(&path, r#"{"daily_capacity": 0}"#).unwrap();
    assert!(load_config_from_file(&path).is_err());
}
