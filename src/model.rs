use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Rôle (compétence) ; vocabulaire ouvert défini par le planificateur.
///
/// La désérialisation passe par [`Role::new`] : `"Storyboard "` et
/// `"Storyboard"` désignent le même rôle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Role(String);

impl Role {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().trim().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::new(s)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Clé de comparaison d'un nom de personne (insensible à la casse).
pub fn person_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Personne et ensemble des rôles qu'elle sait tenir.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PersonRecord")]
pub struct Person {
    pub name: String,
    #[serde(default)]
    pub capabilities: Vec<Role>,
}

/// Forme brute lue en JSON, repassée par [`Person::new`] (doublons retirés).
#[derive(Deserialize)]
struct PersonRecord {
    name: String,
    #[serde(default)]
    capabilities: Vec<Role>,
}

impl From<PersonRecord> for Person {
    fn from(raw: PersonRecord) -> Self {
        Person::new(raw.name, raw.capabilities)
    }
}

impl Person {
    pub fn new<N: Into<String>>(name: N, capabilities: impl IntoIterator<Item = Role>) -> Self {
        let mut caps: Vec<Role> = Vec::new();
        for role in capabilities {
            if !caps.contains(&role) {
                caps.push(role);
            }
        }
        Self {
            name: name.into(),
            capabilities: caps,
        }
    }

    pub fn key(&self) -> String {
        person_key(&self.name)
    }

    pub fn can(&self, role: &Role) -> bool {
        self.capabilities.contains(role)
    }
}

/// Besoin en jours-personne d'un film pour un rôle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleQuota {
    pub role: Role,
    pub units: u32,
}

impl RoleQuota {
    pub fn new(role: Role, units: u32) -> Self {
        Self { role, units }
    }
}

/// Film avec sa fenêtre de production (bornes incluses) et ses quotas ordonnés.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    pub name: String,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    #[serde(default)]
    pub quotas: Vec<RoleQuota>,
}

impl Film {
    /// Crée un film ; une fenêtre inversée est acceptée (zéro jour planifiable).
    pub fn new<N: Into<String>>(name: N, window_start: NaiveDate, window_end: NaiveDate) -> Self {
        Self {
            name: name.into(),
            window_start,
            window_end,
            quotas: Vec::new(),
        }
    }

    pub fn with_quota(mut self, role: Role, units: u32) -> Self {
        self.quotas.push(RoleQuota::new(role, units));
        self
    }

    pub fn window_is_valid(&self) -> bool {
        self.window_start <= self.window_end
    }

    pub fn quota_for(&self, role: &Role) -> u32 {
        self.quotas
            .iter()
            .filter(|q| &q.role == role)
            .map(|q| q.units)
            .sum()
    }
}

fn default_capacity() -> u32 {
    1
}

/// Modèle de charge complet d'un run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workload {
    pub people: Vec<Person>,
    pub films: Vec<Film>,
    #[serde(default = "default_capacity")]
    pub daily_capacity: u32,
}

impl Default for Workload {
    fn default() -> Self {
        Self {
            people: Vec::new(),
            films: Vec::new(),
            daily_capacity: default_capacity(),
        }
    }
}

impl Workload {
    pub fn new(people: Vec<Person>, films: Vec<Film>, daily_capacity: u32) -> Self {
        Self {
            people,
            films,
            daily_capacity,
        }
    }

    pub fn find_person<'a>(&'a self, name: &str) -> Option<&'a Person> {
        let key = person_key(name);
        self.people.iter().find(|p| p.key() == key)
    }

    /// Personnes sachant tenir `role`, dans l'ordre de saisie.
    pub fn candidates<'a>(&'a self, role: &'a Role) -> impl Iterator<Item = &'a Person> + 'a {
        self.people.iter().filter(move |p| p.can(role))
    }

    pub fn person_names(&self) -> Vec<String> {
        self.people.iter().map(|p| p.name.clone()).collect()
    }

    /// Validation amont : refuse un run sans personne ou sans rôle.
    pub fn validate(&self) -> Result<()> {
        if self.people.is_empty() {
            bail!("workload must contain at least one person");
        }
        if self.daily_capacity == 0 {
            bail!("daily_capacity must be >= 1");
        }
        let mut seen = HashSet::new();
        for person in &self.people {
            if person.name.trim().is_empty() {
                bail!("person name cannot be empty");
            }
            if !seen.insert(person.key()) {
                bail!("duplicate person name: {}", person.name);
            }
            if person.capabilities.iter().any(|r| r.as_str().is_empty()) {
                bail!("person {} has an empty role", person.name);
            }
        }
        let has_role = self.people.iter().any(|p| !p.capabilities.is_empty())
            || self.films.iter().any(|f| !f.quotas.is_empty());
        if !has_role {
            bail!("workload must define at least one role");
        }
        for film in &self.films {
            if film.name.trim().is_empty() {
                bail!("film name cannot be empty");
            }
            if film.quotas.iter().any(|q| q.role.as_str().is_empty()) {
                bail!("film {} has a quota with an empty role", film.name);
            }
        }
        Ok(())
    }
}

/// Unité atomique de sortie : une personne, un jour, un film, un rôle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub film: String,
    pub role: Role,
    pub person: String,
    pub date: NaiveDate,
    pub units: u32,
}

impl Assignment {
    pub fn new(film: &str, role: &Role, person: &str, date: NaiveDate) -> Self {
        Self {
            film: film.to_owned(),
            role: role.clone(),
            person: person.to_owned(),
            date,
            units: 1,
        }
    }

    /// Libellé de ligne de timeline : "Film – Rôle".
    pub fn film_role(&self) -> String {
        format!("{} – {}", self.film, self.role)
    }
}

/// Quota non placé pour (film, rôle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub film: String,
    pub role: Role,
    pub remaining: u32,
}
