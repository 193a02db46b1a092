use super::{
    detect_header_row, find_label_row, normalize_label, CalendarStrategy, CellValue, Color,
    ColorGrid, Grid, Ingestion,
};
use crate::availability::{AvailabilityMap, BlockReason};
use std::collections::BTreeSet;

/// Nombre de lignes parcourues par défaut pour trouver la légende.
pub const DEFAULT_LEGEND_ROWS: usize = 25;

/// Calendrier encodé par couleur : la légende associe à chaque personne une
/// couleur (cellule à droite de son nom), chaque cellule du calendrier de
/// cette couleur bloque la personne ce jour-là.
#[derive(Debug, Clone, Copy)]
pub struct ColorCalendar<'a> {
    grid: &'a ColorGrid,
    legend_rows: usize,
}

impl<'a> ColorCalendar<'a> {
    pub fn new(grid: &'a ColorGrid) -> Self {
        Self {
            grid,
            legend_rows: DEFAULT_LEGEND_ROWS,
        }
    }

    pub fn with_legend_rows(mut self, rows: usize) -> Self {
        self.legend_rows = rows;
        self
    }
}

impl CalendarStrategy for ColorCalendar<'_> {
    fn ingest(&self, people: &[String]) -> Ingestion {
        parse_color_calendar(self.grid, people, self.legend_rows)
    }
}

/// Entrée de légende : ligne du libellé et couleur de la cellule voisine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swatch {
    pub person: String,
    pub row: usize,
    pub color: Color,
}

/// Couleurs de légende des personnes trouvées dans les `legend_rows` premières lignes.
pub fn legend_swatches(grid: &ColorGrid, people: &[String], legend_rows: usize) -> Vec<Swatch> {
    let values = grid.values();
    people
        .iter()
        .filter_map(|person| {
            let row = find_label_row(&values, person, Some(legend_rows))?;
            let color = grid.color(row, 1)?;
            Some(Swatch {
                person: person.clone(),
                row,
                color,
            })
        })
        .collect()
}

/// Lignes de la fenêtre de légende portant un libellé en colonne 0, demandé ou non.
fn labelled_legend_rows(values: &Grid, legend_rows: usize) -> BTreeSet<usize> {
    values
        .rows()
        .iter()
        .take(legend_rows)
        .enumerate()
        .filter(|(_, row)| {
            matches!(row.first(), Some(CellValue::Text(label)) if !normalize_label(label).is_empty())
        })
        .map(|(index, _)| index)
        .collect()
}

pub fn parse_color_calendar(grid: &ColorGrid, people: &[String], legend_rows: usize) -> Ingestion {
    let values = grid.values();
    let Some(header) = detect_header_row(&values) else {
        tracing::warn!("color calendar: no date header row found, ignoring availability");
        return Ingestion::unrecognized(people);
    };

    let swatches = legend_swatches(grid, people, legend_rows);
    let unmatched: Vec<String> = people
        .iter()
        .filter(|p| !swatches.iter().any(|s| &s.person == *p))
        .cloned()
        .collect();
    if !unmatched.is_empty() {
        tracing::debug!(?unmatched, "color calendar: people without legend swatch");
    }

    let legend = labelled_legend_rows(&values, legend_rows);
    let mut availability = AvailabilityMap::new();
    for (&col, &date) in &header.columns {
        for row in 0..grid.rows.len() {
            // une case de légende n'est pas une entrée de calendrier
            if col == 1 && legend.contains(&row) {
                continue;
            }
            let Some(color) = grid.color(row, col) else {
                continue;
            };
            for swatch in swatches.iter().filter(|s| s.color == color) {
                availability.block(&swatch.person, date, BlockReason::Other);
            }
        }
    }

    Ingestion {
        availability,
        header_row: Some(header.index),
        unmatched,
    }
}
