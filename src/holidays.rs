use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Jours fériés par année, saisis à la main (dates littérales, jamais calculées).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    by_year: BTreeMap<i32, BTreeSet<NaiveDate>>,
}

impl HolidayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut cal = Self::new();
        cal.extend(dates);
        cal
    }

    /// Jours fériés de Berlin 2025 et 2026.
    pub fn berlin() -> Self {
        const DAYS: &[(i32, u32, u32)] = &[
            (2025, 1, 1),
            (2025, 3, 8),
            (2025, 4, 18),
            (2025, 4, 21),
            (2025, 5, 1),
            (2025, 5, 29),
            (2025, 6, 9),
            (2025, 10, 3),
            (2025, 12, 25),
            (2025, 12, 26),
            (2026, 1, 1),
            (2026, 3, 8),
            (2026, 4, 3),
            (2026, 4, 6),
            (2026, 5, 1),
            (2026, 5, 14),
            (2026, 5, 25),
            (2026, 10, 3),
            (2026, 12, 25),
            (2026, 12, 26),
        ];
        Self::from_dates(
            DAYS.iter()
                .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        )
    }

    pub fn extend(&mut self, dates: impl IntoIterator<Item = NaiveDate>) {
        for date in dates {
            self.by_year.entry(date.year()).or_default().insert(date);
        }
    }

    /// Une année sans liste configurée n'a aucun jour férié.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.by_year
            .get(&date.year())
            .is_some_and(|days| days.contains(&date))
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_year.keys().copied()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.by_year.values().flat_map(|days| days.iter().copied())
    }
}

/// Mode de filtrage des jours d'une fenêtre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Tous les jours à partir d'aujourd'hui.
    #[default]
    AllDays,
    /// Lundi–vendredi, hors jours fériés, à partir d'aujourd'hui.
    WorkingDays,
}

/// Prédicat d'éligibilité d'une date.
#[derive(Debug, Clone)]
pub struct DayFilter {
    pub today: NaiveDate,
    pub mode: FilterMode,
    pub holidays: HolidayCalendar,
}

impl DayFilter {
    pub fn new(today: NaiveDate, mode: FilterMode, holidays: HolidayCalendar) -> Self {
        Self {
            today,
            mode,
            holidays,
        }
    }

    pub fn all_days(today: NaiveDate) -> Self {
        Self::new(today, FilterMode::AllDays, HolidayCalendar::new())
    }

    pub fn working_days(today: NaiveDate, holidays: HolidayCalendar) -> Self {
        Self::new(today, FilterMode::WorkingDays, holidays)
    }

    pub fn is_eligible(&self, date: NaiveDate) -> bool {
        if date < self.today {
            return false;
        }
        match self.mode {
            FilterMode::AllDays => true,
            FilterMode::WorkingDays => !is_weekend(date) && !self.holidays.contains(date),
        }
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
