#![forbid(unsafe_code)]
//! Crewplan — répartition de jours-personne par rôle sur plusieurs films.
//!
//! - Lecture d'un calendrier de disponibilités (texte ou couleurs).
//! - Filtre jours ouvrés / jours fériés.
//! - Allocation gloutonne sous contraintes (rôle, fenêtre, capacité, disponibilité).
//! - Rien n'est persisté entre deux runs ; exports CSV/JSON en dehors du moteur.

pub mod availability;
pub mod calendar;
pub mod config;
pub mod holidays;
pub mod io;
pub mod model;
pub mod report;
pub mod scheduler;

pub use availability::{AvailabilityMap, AvailabilityStatus, BlockReason};
pub use calendar::{
    detect_header_row, normalize_label, CalendarError, CalendarStrategy, CellValue, Color,
    ColorCalendar, ColorCell, ColorGrid, Grid, HeaderRow, Ingestion, TagCalendar,
};
pub use config::{load_config_from_file, PlannerConfig};
pub use holidays::{DayFilter, FilterMode, HolidayCalendar};
pub use model::{Assignment, Film, Person, Role, RoleQuota, Shortfall, Workload};
pub use report::{FilmRoleSummary, Plan, PlanWarning};
pub use scheduler::{verify_plan, AllocationContext, Planner, SchedError, Violation, ViolationKind};
