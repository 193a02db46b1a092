use super::{util, AllocationContext, Violation, ViolationKind};
use crate::availability::AvailabilityMap;
use crate::holidays::DayFilter;
use crate::model::{person_key, Assignment, Workload};
use crate::report::Plan;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Vérifie les invariants d'un plan : compétence, capacité, disponibilité,
/// fenêtre et conservation des quotas.
///
/// `seed` est le contexte tel qu'il était avant le run : sa capacité fait
/// foi et sa charge pré-remplie compte dans le contrôle de capacité.
pub fn verify_plan(
    plan: &Plan,
    workload: &Workload,
    availability: &AvailabilityMap,
    filter: &DayFilter,
    seed: &AllocationContext,
) -> Vec<Violation> {
    let mut out = Vec::new();
    let mut per_day: BTreeMap<(String, NaiveDate), u32> = BTreeMap::new();

    for a in &plan.assignments {
        let qualified = workload
            .find_person(&a.person)
            .is_some_and(|p| p.can(&a.role));
        if !qualified {
            out.push(violation(ViolationKind::MissingCapability, a));
        }
        if a.units != 1 {
            out.push(violation(ViolationKind::UnitSize, a));
        }
        if !availability.is_free(&a.person, a.date) {
            out.push(violation(ViolationKind::Blocked, a));
        }
        let in_window = workload
            .films
            .iter()
            .filter(|f| f.name == a.film)
            .any(|f| util::in_window(f, filter, a.date));
        if !in_window {
            out.push(violation(ViolationKind::OutsideWindow, a));
        }

        let load = per_day
            .entry((person_key(&a.person), a.date))
            .or_insert_with(|| seed.load(&a.person, a.date));
        *load = load.saturating_add(a.units);
        if *load > seed.capacity() {
            out.push(violation(ViolationKind::OverCapacity, a));
        }
    }

    for film in &workload.films {
        let mut checked = Vec::new();
        for quota in &film.quotas {
            if checked.contains(&&quota.role) {
                continue;
            }
            checked.push(&quota.role);
            let expected = film.quota_for(&quota.role);
            let placed = plan.assigned_units(&film.name, &quota.role);
            let remaining = plan.remaining_units(&film.name, &quota.role);
            let reported_zero = plan
                .shortfalls
                .iter()
                .any(|s| s.film == film.name && s.role == quota.role && s.remaining == 0);
            if placed + remaining != expected || reported_zero {
                out.push(Violation {
                    kind: ViolationKind::QuotaMismatch,
                    film: film.name.clone(),
                    role: quota.role.clone(),
                    person: None,
                    date: None,
                });
            }
        }
    }

    out
}

fn violation(kind: ViolationKind, a: &Assignment) -> Violation {
    Violation {
        kind,
        film: a.film.clone(),
        role: a.role.clone(),
        person: Some(a.person.clone()),
        date: Some(a.date),
    }
}
