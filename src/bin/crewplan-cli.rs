#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use crewplan::{
    calendar::{CalendarStrategy, ColorCalendar, TagCalendar},
    config::{load_config_from_file, PlannerConfig},
    io,
    model::Workload,
    scheduler::Planner,
    AvailabilityMap, BlockReason, FilterMode,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de répartition de jours-personne par film et par rôle
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

/// Entrées communes d'un run
#[derive(Args, Debug)]
struct Inputs {
    /// Modèle de charge JSON (personnes, films, capacité)
    #[arg(long)]
    workload: Option<String>,
    /// Personnes CSV `name,roles` (alternative à --workload)
    #[arg(long, requires = "films_csv", conflicts_with = "workload")]
    people_csv: Option<String>,
    /// Films CSV `film,window_start,window_end,quotas`
    #[arg(long, requires = "people_csv", conflicts_with = "workload")]
    films_csv: Option<String>,
    /// Calendrier texte (.xlsx ou .csv)
    #[arg(long, conflicts_with = "color_calendar")]
    calendar: Option<String>,
    /// Calendrier couleur (.json)
    #[arg(long)]
    color_calendar: Option<String>,
    /// Fichier de configuration JSON
    #[arg(long)]
    config: Option<String>,
    /// Capacité journalière (surcharge config et workload)
    #[arg(long)]
    capacity: Option<u32>,
    /// Exclut week-ends et jours fériés
    #[arg(long)]
    working_days: bool,
    /// Date de référence YYYY-MM-DD (défaut : aujourd'hui)
    #[arg(long)]
    today: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculer la répartition
    Plan {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        shortfalls_csv: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Afficher les jours bloqués lus dans un calendrier
    Availability {
        /// Calendrier texte (.xlsx ou .csv)
        #[arg(long, conflicts_with = "color_calendar")]
        calendar: Option<String>,
        /// Calendrier couleur (.json)
        #[arg(long)]
        color_calendar: Option<String>,
        /// liste "Anna,Mareike,..."
        #[arg(long)]
        people: String,
        #[arg(long)]
        legend_rows: Option<usize>,
    },

    /// Vérifier un plan JSON existant
    Check {
        #[arg(long)]
        plan: String,
        #[command(flatten)]
        inputs: Inputs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Plan {
            inputs,
            out_csv,
            shortfalls_csv,
            out_json,
        } => {
            let run = prepare(&inputs)?;
            let planner = Planner::new(&run.workload, &run.availability, &run.filter);
            let plan = planner.run();

            for a in &plan.assignments {
                println!("{} | {} | {} | {}", a.date, a.film, a.role, a.person);
            }
            for w in &plan.warnings {
                eprintln!("warning: {w}");
            }
            for s in &plan.shortfalls {
                eprintln!(
                    "shortfall: film \"{}\" / role \"{}\": {} day(s) could not be placed",
                    s.film, s.role, s.remaining
                );
            }

            if let Some(path) = out_csv {
                io::export_assignments_csv(path, &plan)?;
            }
            if let Some(path) = shortfalls_csv {
                io::export_shortfalls_csv(path, &plan)?;
            }
            if let Some(path) = out_json {
                io::export_plan_json(path, &plan)?;
            }

            if plan.assignments.is_empty() {
                eprintln!("no assignment could be produced");
            }
            // Code 2 = WARNING/INCOMPLETE
            if plan.is_complete() {
                0
            } else {
                2
            }
        }
        Commands::Availability {
            calendar,
            color_calendar,
            people,
            legend_rows,
        } => {
            let people: Vec<String> = people
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if people.is_empty() {
                bail!("no person given");
            }
            let legend_rows = legend_rows.unwrap_or(PlannerConfig::default().legend_rows);
            let availability = read_availability(
                calendar.as_deref(),
                color_calendar.as_deref(),
                &people,
                legend_rows,
            );
            for person in &people {
                for (date, reason) in availability.blocked_days(person) {
                    let reason = match reason {
                        BlockReason::Vacation => "vacation",
                        BlockReason::Other => "other",
                    };
                    println!("{person} | {date} | {reason}");
                }
            }
            0
        }
        Commands::Check { plan, inputs } => {
            let run = prepare(&inputs)?;
            let plan = io::load_plan_json(plan)?;
            let planner = Planner::new(&run.workload, &run.availability, &run.filter);
            let violations = planner.verify(&plan);
            if violations.is_empty() {
                println!("OK: plan satisfies all constraints");
                0
            } else {
                eprintln!("Found {} violation(s)", violations.len());
                for v in &violations {
                    eprintln!(
                        "{:?}: {} / {} {} {}",
                        v.kind,
                        v.film,
                        v.role,
                        v.person.as_deref().unwrap_or("-"),
                        v.date.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
                    );
                }
                2
            }
        }
    };

    std::process::exit(code);
}

struct Run {
    workload: Workload,
    availability: AvailabilityMap,
    filter: crewplan::DayFilter,
}

fn prepare(inputs: &Inputs) -> Result<Run> {
    let mut config = match &inputs.config {
        Some(path) => load_config_from_file(path)?,
        None => PlannerConfig::default(),
    };
    if inputs.working_days {
        config.filter = FilterMode::WorkingDays;
    }

    let mut workload = match (&inputs.workload, &inputs.people_csv, &inputs.films_csv) {
        (Some(path), _, _) => io::load_workload_json(path)?,
        (None, Some(people), Some(films)) => Workload::new(
            io::import_people_csv(people)?,
            io::import_films_csv(films)?,
            config.daily_capacity,
        ),
        _ => bail!("either --workload or --people-csv/--films-csv is required"),
    };
    if inputs.config.is_some() {
        workload.daily_capacity = config.daily_capacity;
    }
    if let Some(capacity) = inputs.capacity {
        workload.daily_capacity = capacity;
    }
    workload.validate()?;

    let today = match &inputs.today {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("invalid --today: {raw}"))?,
        None => Local::now().date_naive(),
    };

    let availability = read_availability(
        inputs.calendar.as_deref(),
        inputs.color_calendar.as_deref(),
        &workload.person_names(),
        config.legend_rows,
    );

    Ok(Run {
        workload,
        availability,
        filter: config.day_filter(today),
    })
}

/// Un calendrier illisible ou non reconnu n'arrête pas le run : il ne pose
/// simplement aucune contrainte.
fn read_availability(
    calendar: Option<&str>,
    color_calendar: Option<&str>,
    people: &[String],
    legend_rows: usize,
) -> AvailabilityMap {
    let ingestion = if let Some(path) = calendar {
        match io::read_calendar(path) {
            Ok(grid) => TagCalendar::new(&grid).ingest(people),
            Err(err) => {
                eprintln!("warning: could not read calendar {path}: {err}");
                return AvailabilityMap::new();
            }
        }
    } else if let Some(path) = color_calendar {
        match io::read_color_calendar_json(path) {
            Ok(grid) => ColorCalendar::new(&grid)
                .with_legend_rows(legend_rows)
                .ingest(people),
            Err(err) => {
                eprintln!("warning: could not read color calendar {path}: {err}");
                return AvailabilityMap::new();
            }
        }
    } else {
        return AvailabilityMap::new();
    };

    if !ingestion.is_recognized() {
        eprintln!("warning: calendar has no date header row, availability ignored");
    } else {
        for person in &ingestion.unmatched {
            eprintln!("warning: {person} not found in calendar, treated as always free");
        }
    }
    ingestion.availability
}
