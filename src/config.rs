use crate::calendar::color::DEFAULT_LEGEND_ROWS;
use crate::holidays::{DayFilter, FilterMode, HolidayCalendar};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_capacity() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_legend_rows() -> usize {
    DEFAULT_LEGEND_ROWS
}

/// Paramètres de planification (fichier JSON).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Unités max par personne et par jour, tous films et rôles confondus.
    #[serde(default = "default_capacity")]
    pub daily_capacity: u32,
    #[serde(default)]
    pub filter: FilterMode,
    /// Utilise la liste de jours fériés intégrée (Berlin).
    #[serde(default = "default_true")]
    pub builtin_holidays: bool,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    /// Lignes parcourues pour la légende d'un calendrier couleur.
    #[serde(default = "default_legend_rows")]
    pub legend_rows: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            daily_capacity: default_capacity(),
            filter: FilterMode::default(),
            builtin_holidays: true,
            holidays: Vec::new(),
            legend_rows: DEFAULT_LEGEND_ROWS,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.daily_capacity == 0 {
            bail!("daily_capacity must be >= 1");
        }
        if self.legend_rows == 0 {
            bail!("legend_rows must be > 0");
        }
        Ok(())
    }

    pub fn holiday_calendar(&self) -> HolidayCalendar {
        let mut cal = if self.builtin_holidays {
            HolidayCalendar::berlin()
        } else {
            HolidayCalendar::new()
        };
        cal.extend(self.holidays.iter().copied());
        cal
    }

    pub fn day_filter(&self, today: NaiveDate) -> DayFilter {
        DayFilter::new(today, self.filter, self.holiday_calendar())
    }
}

pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<PlannerConfig> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let config: PlannerConfig = serde_json::from_slice(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
