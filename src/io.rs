use crate::calendar::{CalendarError, CellValue, ColorGrid, Grid};
use crate::model::{Film, Person, Role, RoleQuota, Workload};
use crate::report::Plan;
use anyhow::{bail, Context};
use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Charge un modèle de charge complet (JSON).
pub fn load_workload_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Workload> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let workload: Workload = serde_json::from_slice(&data)
        .with_context(|| format!("parsing workload {}", path.display()))?;
    Ok(workload)
}

/// Import de personnes depuis CSV: header `name,roles` (rôles séparés par `;`)
pub fn import_people_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Person>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid people row (empty name)");
        }
        let roles = rec
            .get(1)
            .unwrap_or("")
            .split(';')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(Role::new);
        out.push(Person::new(name, roles));
    }
    Ok(out)
}

/// Import de films: header `film,window_start,window_end,quotas`
/// avec `quotas` de la forme `Storyboard=3;Keyframes=2`.
pub fn import_films_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Film>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing film")?.trim();
        if name.is_empty() {
            bail!("invalid film row (empty name)");
        }
        let start = parse_date(rec.get(1).context("missing window_start")?.trim())
            .with_context(|| format!("invalid window_start for film {name}"))?;
        let end = parse_date(rec.get(2).context("missing window_end")?.trim())
            .with_context(|| format!("invalid window_end for film {name}"))?;
        let mut film = Film::new(name, start, end);
        if let Some(raw) = rec.get(3) {
            film.quotas = parse_quotas(raw)
                .with_context(|| format!("invalid quotas for film {name}"))?;
        }
        out.push(film);
    }
    Ok(out)
}

fn parse_quotas(raw: &str) -> anyhow::Result<Vec<RoleQuota>> {
    raw.split(';')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            let (role, units) = chunk
                .split_once('=')
                .with_context(|| format!("expected Role=units, got {chunk}"))?;
            let units: u32 = units
                .trim()
                .parse()
                .with_context(|| format!("invalid units in {chunk}"))?;
            Ok(RoleQuota::new(Role::new(role), units))
        })
        .collect()
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d.%m.%Y"))
        .with_context(|| format!("invalid date: {raw}"))
}

/// Lit un calendrier (encodage texte) selon l'extension : `.xlsx` ou `.csv`.
pub fn read_calendar<P: AsRef<Path>>(path: P) -> Result<Grid, CalendarError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "xlsx" => read_calendar_xlsx(path),
        "csv" => read_calendar_csv(path),
        _ => Err(CalendarError::UnsupportedFormat(ext)),
    }
}

/// Première feuille d'un classeur ; cellules au format date → `CellValue::Date`.
pub fn read_calendar_xlsx<P: AsRef<Path>>(path: P) -> Result<Grid, CalendarError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CalendarError::NotFound(path.display().to_string()));
    }
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(CalendarError::NoWorksheet)?;
    let range = workbook.worksheet_range(&sheet)?;

    // la plage peut ne pas commencer en colonne A : on garde la colonne 0 = libellés
    let col_offset = range.start().map_or(0, |(_, col)| col as usize);
    let rows = range
        .rows()
        .map(|row| {
            std::iter::repeat(CellValue::Empty)
                .take(col_offset)
                .chain(row.iter().map(xlsx_cell))
                .collect()
        })
        .collect();
    Ok(Grid::new(rows))
}

fn xlsx_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map_or_else(|| CellValue::Text(cell.to_string()), CellValue::Date),
        other => CellValue::Text(other.to_string()),
    }
}

/// Calendrier CSV sans en-tête ; dates `YYYY-MM-DD` ou `DD.MM.YYYY`.
pub fn read_calendar_csv<P: AsRef<Path>>(path: P) -> Result<Grid, CalendarError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CalendarError::NotFound(path.display().to_string()));
    }
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        rows.push(rec.iter().map(csv_cell).collect());
    }
    Ok(Grid::new(rows))
}

fn csv_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    match parse_date(trimmed) {
        Ok(date) => CellValue::Date(date),
        Err(_) => CellValue::Text(raw.to_string()),
    }
}

/// Calendrier couleur (JSON `{ "rows": [[{"value": .., "fill": ..}]] }`).
pub fn read_color_calendar_json<P: AsRef<Path>>(path: P) -> Result<ColorGrid, CalendarError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CalendarError::NotFound(path.display().to_string()));
    }
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

/// CSV des affectations: header `film,role,person,date,units,film_role`
pub fn write_assignments_csv<W: Write>(writer: W, plan: &Plan) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_writer(writer);
    w.write_record(["film", "role", "person", "date", "units", "film_role"])?;
    for a in &plan.assignments {
        let date = a.date.to_string();
        let units = a.units.to_string();
        let film_role = a.film_role();
        w.write_record([
            a.film.as_str(),
            a.role.as_str(),
            a.person.as_str(),
            date.as_str(),
            units.as_str(),
            film_role.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// CSV des manques: header `film,role,remaining`
pub fn write_shortfalls_csv<W: Write>(writer: W, plan: &Plan) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_writer(writer);
    w.write_record(["film", "role", "remaining"])?;
    for s in &plan.shortfalls {
        let remaining = s.remaining.to_string();
        w.write_record([s.film.as_str(), s.role.as_str(), remaining.as_str()])?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_assignments_csv<P: AsRef<Path>>(path: P, plan: &Plan) -> anyhow::Result<()> {
    let file = fs::File::create(path.as_ref())
        .with_context(|| format!("creating {}", path.as_ref().display()))?;
    write_assignments_csv(file, plan)
}

pub fn export_shortfalls_csv<P: AsRef<Path>>(path: P, plan: &Plan) -> anyhow::Result<()> {
    let file = fs::File::create(path.as_ref())
        .with_context(|| format!("creating {}", path.as_ref().display()))?;
    write_shortfalls_csv(file, plan)
}

/// Export JSON du plan, écrit de manière atomique.
pub fn export_plan_json<P: AsRef<Path>>(path: P, plan: &Plan) -> anyhow::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_vec_pretty(plan)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).with_context(|| "atomic rename")?;
    Ok(())
}

pub fn load_plan_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Plan> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let plan: Plan = serde_json::from_slice(&data).with_context(|| "parsing plan json")?;
    Ok(plan)
}
