//! Lecture d'un calendrier semi-structuré (type « MP ») vers une
//! [`AvailabilityMap`].
//!
//! Deux encodages coexistent :
//! - [`tag`] : texte dans les cellules (`u` / `urlaub` = congés, autre texte = projet) ;
//! - [`color`] : couleur de fond, associée à une personne via une légende.
//!
//! La ligne d'en-tête (dates) et les lignes de personnes sont détectées
//! heuristiquement, jamais par position fixe.

pub mod color;
pub mod tag;

pub use color::ColorCalendar;
pub use tag::TagCalendar;

use crate::availability::AvailabilityMap;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("calendar file not found: {0}")]
    NotFound(String),
    #[error("unsupported calendar format: {0}")]
    UnsupportedFormat(String),
    #[error("workbook has no worksheet")]
    NoWorksheet,
    #[error("workbook error: {0}")]
    Workbook(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<calamine::Error> for CalendarError {
    fn from(err: calamine::Error) -> Self {
        CalendarError::Workbook(err.to_string())
    }
}

impl From<calamine::XlsxError> for CalendarError {
    fn from(err: calamine::XlsxError) -> Self {
        CalendarError::Workbook(err.to_string())
    }
}

/// Valeur d'une cellule de calendrier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Date(NaiveDate),
}

impl CellValue {
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

static EMPTY: CellValue = CellValue::Empty;

/// Grille rectangulaire (lignes éventuellement irrégulières) ;
/// colonne 0 = libellés, colonnes suivantes = jours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cellule hors grille = vide.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}

/// Couleur de remplissage normalisée (`RRGGBB`, majuscules).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color(String);

impl Color {
    /// `None` pour la sentinelle « pas de remplissage ».
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().trim_start_matches('#');
        let lower = raw.to_ascii_lowercase();
        if raw.is_empty() || lower == "none" || lower == "transparent" || raw == "00000000" {
            return None;
        }
        let upper = raw.to_ascii_uppercase();
        let rgb = if upper.len() == 8 && upper.is_ascii() {
            &upper[2..]
        } else {
            upper.as_str()
        };
        Some(Self(rgb.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorCell {
    #[serde(default)]
    pub value: CellValue,
    #[serde(default)]
    pub fill: Option<String>,
}

impl ColorCell {
    pub fn new(value: CellValue, fill: Option<&str>) -> Self {
        Self {
            value,
            fill: fill.map(str::to_owned),
        }
    }

    pub fn color(&self) -> Option<Color> {
        self.fill.as_deref().and_then(Color::parse)
    }
}

/// Grille avec couleur de fond par cellule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorGrid {
    pub rows: Vec<Vec<ColorCell>>,
}

impl ColorGrid {
    pub fn new(rows: Vec<Vec<ColorCell>>) -> Self {
        Self { rows }
    }

    /// Vue « valeurs seules » pour la détection d'en-tête.
    pub fn values(&self) -> Grid {
        Grid::new(
            self.rows
                .iter()
                .map(|r| r.iter().map(|c| c.value.clone()).collect())
                .collect(),
        )
    }

    pub fn color(&self, row: usize, col: usize) -> Option<Color> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(ColorCell::color)
    }
}

/// Ligne d'en-tête détectée et correspondance colonne → date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRow {
    pub index: usize,
    pub columns: BTreeMap<usize, NaiveDate>,
}

/// Détecte la ligne de dates en deux passes.
///
/// Passe 1 : compte les cellules datées (colonnes ≥ 1) de chaque ligne et
/// retient la première ligne atteignant le maximum strict (`>`), donc en cas
/// d'égalité la plus haute. Passe 2 : construit la table colonne → date.
/// `None` si aucune ligne ne contient de date.
pub fn detect_header_row(grid: &Grid) -> Option<HeaderRow> {
    let mut best: Option<(usize, usize)> = None;
    for (idx, row) in grid.rows().iter().enumerate() {
        let count = row
            .iter()
            .skip(1)
            .filter(|c| matches!(c, CellValue::Date(_)))
            .count();
        let best_count = best.map_or(0, |(_, c)| c);
        if count > best_count {
            best = Some((idx, count));
        }
    }

    let (index, _) = best?;
    let columns = grid.rows()[index]
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(col, cell)| cell.as_date().map(|d| (col, d)))
        .collect();
    Some(HeaderRow { index, columns })
}

/// Normalise un libellé : partie avant `:`, sans espaces, en minuscules.
/// `"Anna:"`, `" anna "` et `"ANNA: Urlaub"` donnent tous `"anna"`.
pub fn normalize_label(raw: &str) -> String {
    raw.split(':').next().unwrap_or("").trim().to_lowercase()
}

/// Première ligne (parmi les `limit` premières) dont le libellé colonne 0
/// correspond à `person`.
pub fn find_label_row(grid: &Grid, person: &str, limit: Option<usize>) -> Option<usize> {
    let wanted = normalize_label(person);
    if wanted.is_empty() {
        return None;
    }
    let max = limit.unwrap_or(usize::MAX);
    grid.rows()
        .iter()
        .take(max)
        .position(|row| match row.first() {
            Some(CellValue::Text(label)) => normalize_label(label) == wanted,
            _ => false,
        })
}

/// Résultat d'une ingestion de calendrier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ingestion {
    pub availability: AvailabilityMap,
    /// Index de la ligne de dates ; `None` = grille non reconnue.
    pub header_row: Option<usize>,
    /// Personnes demandées sans ligne / sans couleur dans le calendrier.
    pub unmatched: Vec<String>,
}

impl Ingestion {
    pub fn unrecognized(people: &[String]) -> Self {
        Self {
            availability: AvailabilityMap::new(),
            header_row: None,
            unmatched: people.to_vec(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.header_row.is_some()
    }
}

/// Stratégie d'ingestion ; chaque encodage respecte le même contrat de sortie.
pub trait CalendarStrategy {
    fn ingest(&self, people: &[String]) -> Ingestion;
}
