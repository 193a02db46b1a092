use super::{util, AllocationContext, Planner};
use crate::model::{Assignment, Film, Person, RoleQuota, Shortfall};
use crate::report::{Plan, PlanWarning};
use chrono::NaiveDate;

/// Glouton « premier qui convient » : films puis rôles dans l'ordre de
/// saisie, jours croissants, candidats dans l'ordre de la liste de personnes.
/// Aucun retour arrière ni équilibrage ; les premiers films servis gardent la
/// priorité sur les jours disputés.
pub(super) fn allocate(planner: &Planner<'_>, ctx: &mut AllocationContext) -> Plan {
    let mut plan = Plan::default();

    for film in &planner.workload.films {
        let days = util::eligible_days(film, planner.filter);
        if days.is_empty() {
            if film.window_is_valid() {
                tracing::warn!(film = %film.name, "no plannable days in window");
                plan.warnings.push(PlanWarning::NoEligibleDays {
                    film: film.name.clone(),
                });
            }
            for quota in film.quotas.iter().filter(|q| q.units > 0) {
                plan.shortfalls.push(Shortfall {
                    film: film.name.clone(),
                    role: quota.role.clone(),
                    remaining: quota.units,
                });
            }
            continue;
        }

        for quota in film.quotas.iter().filter(|q| q.units > 0) {
            allocate_role(planner, ctx, film, quota, &days, &mut plan);
        }
    }

    plan
}

fn allocate_role(
    planner: &Planner<'_>,
    ctx: &mut AllocationContext,
    film: &Film,
    quota: &RoleQuota,
    days: &[NaiveDate],
    plan: &mut Plan,
) {
    let candidates: Vec<&Person> = planner.workload.candidates(&quota.role).collect();
    if candidates.is_empty() {
        tracing::warn!(film = %film.name, role = %quota.role, "no qualified person for role");
        plan.warnings.push(PlanWarning::NoQualifiedPerson {
            film: film.name.clone(),
            role: quota.role.clone(),
        });
        plan.shortfalls.push(Shortfall {
            film: film.name.clone(),
            role: quota.role.clone(),
            remaining: quota.units,
        });
        return;
    }

    let mut remaining = quota.units;

    'days: for &day in days {
        for person in &candidates {
            if !planner.availability.is_free(&person.name, day) {
                continue;
            }
            if !ctx.has_room(&person.name, day) {
                continue;
            }
            ctx.book(&person.name, day);
            plan.assignments
                .push(Assignment::new(&film.name, &quota.role, &person.name, day));
            remaining -= 1;
            if remaining == 0 {
                break 'days;
            }
        }
    }

    tracing::debug!(
        film = %film.name,
        role = %quota.role,
        placed = quota.units - remaining,
        remaining,
        "role allocated"
    );

    if remaining > 0 {
        tracing::warn!(film = %film.name, role = %quota.role, remaining, "quota not fully placed");
        plan.shortfalls.push(Shortfall {
            film: film.name.clone(),
            role: quota.role.clone(),
            remaining,
        });
    }
}
