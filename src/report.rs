use crate::model::{Assignment, Role, Shortfall, Workload};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Avertissement non bloquant émis pendant un run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanWarning {
    /// Fenêtre valide mais aucun jour planifiable (tout dans le passé, week-ends...).
    NoEligibleDays { film: String },
    /// Aucune personne ne sait tenir le rôle.
    NoQualifiedPerson { film: String, role: Role },
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::NoEligibleDays { film } => {
                write!(f, "film \"{film}\": no plannable days in window")
            }
            PlanWarning::NoQualifiedPerson { film, role } => {
                write!(f, "film \"{film}\": nobody has role \"{role}\"")
            }
        }
    }
}

/// Sortie terminale d'un run : affectations, manques et avertissements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub assignments: Vec<Assignment>,
    pub shortfalls: Vec<Shortfall>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<PlanWarning>,
}

/// Ligne du tableau de résultats par (film, rôle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmRoleSummary {
    pub film: String,
    pub role: Role,
    pub quota: u32,
    pub assigned: u32,
    pub remaining: u32,
}

impl Plan {
    pub fn is_complete(&self) -> bool {
        self.shortfalls.is_empty()
    }

    /// Concatène un autre résultat à la suite de celui-ci.
    pub fn append(&mut self, mut other: Plan) {
        self.assignments.append(&mut other.assignments);
        self.shortfalls.append(&mut other.shortfalls);
        self.warnings.append(&mut other.warnings);
    }

    pub fn assignments_for<'a>(
        &'a self,
        film: &'a str,
        role: &'a Role,
    ) -> impl Iterator<Item = &'a Assignment> + 'a {
        self.assignments
            .iter()
            .filter(move |a| a.film == film && &a.role == role)
    }

    pub fn assigned_units(&self, film: &str, role: &Role) -> u32 {
        self.assignments_for(film, role).map(|a| a.units).sum()
    }

    pub fn remaining_units(&self, film: &str, role: &Role) -> u32 {
        self.shortfalls
            .iter()
            .filter(|s| s.film == film && &s.role == role)
            .map(|s| s.remaining)
            .sum()
    }

    pub fn total_shortfall(&self) -> u32 {
        self.shortfalls.iter().map(|s| s.remaining).sum()
    }

    /// Une ligne par quota non nul, dans l'ordre de saisie des films et rôles.
    pub fn film_role_summaries(&self, workload: &Workload) -> Vec<FilmRoleSummary> {
        let mut out: Vec<FilmRoleSummary> = Vec::new();
        for film in &workload.films {
            for quota in film.quotas.iter().filter(|q| q.units > 0) {
                if out
                    .iter()
                    .any(|s| s.film == film.name && s.role == quota.role)
                {
                    continue;
                }
                out.push(FilmRoleSummary {
                    film: film.name.clone(),
                    role: quota.role.clone(),
                    quota: film.quota_for(&quota.role),
                    assigned: self.assigned_units(&film.name, &quota.role),
                    remaining: self.remaining_units(&film.name, &quota.role),
                });
            }
        }
        out
    }

    /// Unités affectées par personne.
    pub fn person_load(&self) -> BTreeMap<String, u32> {
        let mut load = BTreeMap::new();
        for a in &self.assignments {
            *load.entry(a.person.clone()).or_insert(0) += a.units;
        }
        load
    }
}
