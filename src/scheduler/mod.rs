mod assignment;
mod conflicts;
mod context;
mod types;
mod util;

pub use conflicts::verify_plan;
pub use context::AllocationContext;
pub use types::{SchedError, Violation, ViolationKind};

use crate::availability::AvailabilityMap;
use crate::holidays::DayFilter;
use crate::model::{Film, Workload};
use crate::report::Plan;
use chrono::NaiveDate;

/// Planner : entrées en lecture seule d'un run d'allocation.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    workload: &'a Workload,
    availability: &'a AvailabilityMap,
    filter: &'a DayFilter,
}

impl<'a> Planner<'a> {
    pub fn new(
        workload: &'a Workload,
        availability: &'a AvailabilityMap,
        filter: &'a DayFilter,
    ) -> Self {
        Self {
            workload,
            availability,
            filter,
        }
    }

    /// Run complet avec une charge journalière vierge.
    pub fn run(&self) -> Plan {
        let mut ctx = AllocationContext::new(self.workload.daily_capacity);
        self.plan(&mut ctx)
    }

    /// Run sur un contexte fourni (éventuellement pré-rempli).
    pub fn plan(&self, ctx: &mut AllocationContext) -> Plan {
        assignment::allocate(self, ctx)
    }

    pub fn eligible_days(&self, film: &Film) -> Vec<NaiveDate> {
        util::eligible_days(film, self.filter)
    }

    pub fn verify(&self, plan: &Plan) -> Vec<Violation> {
        self.verify_seeded(plan, &AllocationContext::new(self.workload.daily_capacity))
    }

    /// Vérifie un plan produit par [`Planner::plan`] sur un contexte
    /// pré-rempli ; `seed` doit être une copie du contexte avant le run.
    pub fn verify_seeded(&self, plan: &Plan, seed: &AllocationContext) -> Vec<Violation> {
        conflicts::verify_plan(plan, self.workload, self.availability, self.filter, seed)
    }
}
