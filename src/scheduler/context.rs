use super::types::SchedError;
use crate::model::person_key;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Charge journalière (DayLoad) partagée par tous les films et rôles d'un run.
///
/// Créée vide pour un run normal ; un test peut la pré-remplir avec
/// [`AllocationContext::seed`] pour simuler une capacité déjà entamée.
#[derive(Debug, Clone, Default)]
pub struct AllocationContext {
    capacity: u32,
    day_load: BTreeMap<(String, NaiveDate), u32>,
}

impl AllocationContext {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            day_load: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn load(&self, person: &str, date: NaiveDate) -> u32 {
        self.day_load
            .get(&(person_key(person), date))
            .copied()
            .unwrap_or(0)
    }

    pub fn has_room(&self, person: &str, date: NaiveDate) -> bool {
        self.load(person, date) < self.capacity
    }

    /// Réserve `units` à l'avance ; refuse de dépasser la capacité.
    pub fn seed(&mut self, person: &str, date: NaiveDate, units: u32) -> Result<(), SchedError> {
        let load = self.load(person, date).checked_add(units);
        let load = match load {
            Some(load) if load <= self.capacity => load,
            _ => {
                return Err(SchedError::OverCapacity {
                    person: person.to_owned(),
                    date,
                    load: load.unwrap_or(u32::MAX),
                    capacity: self.capacity,
                })
            }
        };
        self.day_load.insert((person_key(person), date), load);
        Ok(())
    }

    pub(super) fn book(&mut self, person: &str, date: NaiveDate) {
        *self.day_load.entry((person_key(person), date)).or_insert(0) += 1;
    }

    pub fn total_units(&self) -> u32 {
        self.day_load.values().sum()
    }
}
