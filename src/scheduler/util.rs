use crate::holidays::DayFilter;
use crate::model::Film;
use chrono::NaiveDate;

/// Jours planifiables de la fenêtre `[start, end]`, triés ; vide si la
/// fenêtre est inversée.
pub(crate) fn eligible_days(film: &Film, filter: &DayFilter) -> Vec<NaiveDate> {
    if !film.window_is_valid() {
        return Vec::new();
    }
    film.window_start
        .iter_days()
        .take_while(|d| *d <= film.window_end)
        .filter(|d| filter.is_eligible(*d))
        .collect()
}

pub(super) fn in_window(film: &Film, filter: &DayFilter, date: NaiveDate) -> bool {
    date >= film.window_start
        && date <= film.window_end
        && filter.is_eligible(date)
}
