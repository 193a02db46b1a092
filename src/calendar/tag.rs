use super::{detect_header_row, find_label_row, CalendarStrategy, CellValue, Grid, Ingestion};
use crate::availability::{AvailabilityMap, AvailabilityStatus, BlockReason};

/// Calendrier encodé par texte : une ligne par personne, une colonne par jour.
#[derive(Debug, Clone, Copy)]
pub struct TagCalendar<'a> {
    grid: &'a Grid,
}

impl<'a> TagCalendar<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }
}

impl CalendarStrategy for TagCalendar<'_> {
    fn ingest(&self, people: &[String]) -> Ingestion {
        parse_tag_calendar(self.grid, people)
    }
}

/// Statut déduit d'une cellule.
pub fn cell_status(cell: &CellValue) -> AvailabilityStatus {
    match cell {
        CellValue::Empty => AvailabilityStatus::Free,
        CellValue::Text(raw) => {
            let txt = raw.trim().to_lowercase();
            match txt.as_str() {
                "" => AvailabilityStatus::Free,
                "u" | "urlaub" => AvailabilityStatus::Blocked(BlockReason::Vacation),
                _ => AvailabilityStatus::Blocked(BlockReason::Other),
            }
        }
        CellValue::Date(_) => AvailabilityStatus::Blocked(BlockReason::Other),
    }
}

pub fn parse_tag_calendar(grid: &Grid, people: &[String]) -> Ingestion {
    let Some(header) = detect_header_row(grid) else {
        tracing::warn!("calendar: no date header row found, ignoring availability");
        return Ingestion::unrecognized(people);
    };
    tracing::debug!(
        row = header.index,
        dates = header.columns.len(),
        "calendar: date header detected"
    );

    let mut availability = AvailabilityMap::new();
    let mut unmatched = Vec::new();

    for person in people {
        let Some(row) = find_label_row(grid, person, None) else {
            unmatched.push(person.clone());
            continue;
        };
        for (&col, &date) in &header.columns {
            availability.set(person, date, cell_status(grid.cell(row, col)));
        }
    }

    Ingestion {
        availability,
        header_row: Some(header.index),
        unmatched,
    }
}
