use crate::model::person_key;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Motif d'indisponibilité ; purement informatif pour l'allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    Vacation,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Free,
    Blocked(BlockReason),
}

impl AvailabilityStatus {
    pub fn is_free(self) -> bool {
        matches!(self, AvailabilityStatus::Free)
    }
}

/// Statut par (personne, date).
///
/// Contrat « monde ouvert » : toute paire absente de la table vaut
/// [`AvailabilityStatus::Free`]. Une carte vide signifie donc « aucune
/// contrainte ». Les noms sont comparés sans tenir compte de la casse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityMap {
    entries: BTreeMap<(String, NaiveDate), AvailabilityStatus>,
}

impl AvailabilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, person: &str, date: NaiveDate, status: AvailabilityStatus) {
        self.entries.insert((person_key(person), date), status);
    }

    pub fn block(&mut self, person: &str, date: NaiveDate, reason: BlockReason) {
        self.set(person, date, AvailabilityStatus::Blocked(reason));
    }

    pub fn status(&self, person: &str, date: NaiveDate) -> AvailabilityStatus {
        self.entries
            .get(&(person_key(person), date))
            .copied()
            .unwrap_or(AvailabilityStatus::Free)
    }

    pub fn is_free(&self, person: &str, date: NaiveDate) -> bool {
        self.status(person, date).is_free()
    }

    /// Nombre d'entrées explicites (libres comprises).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Jours bloqués d'une personne, triés.
    pub fn blocked_days(&self, person: &str) -> Vec<(NaiveDate, BlockReason)> {
        let key = person_key(person);
        self.entries
            .iter()
            .filter(|((p, _), _)| *p == key)
            .filter_map(|((_, d), status)| match status {
                AvailabilityStatus::Blocked(reason) => Some((*d, *reason)),
                AvailabilityStatus::Free => None,
            })
            .collect()
    }

    /// Fusionne `other` ; un blocage l'emporte toujours sur un statut libre.
    pub fn merge(&mut self, other: &AvailabilityMap) {
        for (key, status) in &other.entries {
            let keep_existing =
                status.is_free() && self.entries.get(key).is_some_and(|s| !s.is_free());
            if !keep_existing {
                self.entries.insert(key.clone(), *status);
            }
        }
    }
}
