//! Code for reading load zones, energy sources and projects from CSV files.
use super::*;
use crate::id::IDCollection;
use crate::project::{EnergySourceMap, LoadZoneMap, Project, ProjectMap};
use serde::Deserialize;
use std::path::Path;

const LOAD_ZONES_FILE_NAME: &str = "load_zones.csv";
const ENERGY_SOURCES_FILE_NAME: &str = "energy_sources.csv";
const PROJECTS_FILE_NAME: &str = "projects.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct ProjectRaw {
    id: String,
    technology: String,
    load_zone: String,
    energy_sources: String,
    connect_cost_per_mw: Option<f64>,
}

/// Read load zones from a CSV file
pub fn read_load_zones(model_dir: &Path) -> Result<LoadZoneMap> {
    read_csv_id_file(&model_dir.join(LOAD_ZONES_FILE_NAME))
}

/// Read energy sources (fuels and non-fuel sources) from a CSV file
pub fn read_energy_sources(model_dir: &Path) -> Result<EnergySourceMap> {
    read_csv_id_file(&model_dir.join(ENERGY_SOURCES_FILE_NAME))
}

/// Read projects from a CSV file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing the solved model files
/// * `load_zones` - All load zones
/// * `energy_sources` - All energy sources
///
/// # Returns
///
/// A map of projects, keyed by ID, in input order
pub fn read_projects(
    model_dir: &Path,
    load_zones: &LoadZoneMap,
    energy_sources: &EnergySourceMap,
) -> Result<ProjectMap> {
    let file_path = model_dir.join(PROJECTS_FILE_NAME);
    let projects_csv = read_csv(&file_path)?;
    read_projects_from_iter(projects_csv, load_zones, energy_sources)
        .with_context(|| input_err_msg(&file_path))
}

fn read_projects_from_iter<I>(
    iter: I,
    load_zones: &LoadZoneMap,
    energy_sources: &EnergySourceMap,
) -> Result<ProjectMap>
where
    I: Iterator<Item = ProjectRaw>,
{
    let mut projects = ProjectMap::new();
    for raw in iter {
        let project = project_from_raw(raw, load_zones, energy_sources)?;
        ensure!(
            !projects.contains_key(&project.id),
            "Duplicate ID found: {}",
            project.id
        );
        projects.insert(project.id.clone(), project);
    }

    Ok(projects)
}

fn project_from_raw(
    raw: ProjectRaw,
    load_zones: &LoadZoneMap,
    energy_sources: &EnergySourceMap,
) -> Result<Project> {
    ensure!(!raw.id.is_empty(), "IDs cannot be empty");
    let connect_cost_per_mw = raw.connect_cost_per_mw.unwrap_or(0.0);
    ensure!(
        connect_cost_per_mw.is_finite() && connect_cost_per_mw >= 0.0,
        "connect_cost_per_mw for project {} must be a non-negative number",
        raw.id
    );

    let sources = raw
        .energy_sources
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| energy_sources.get_id_by_str(s))
        .collect::<Result<Vec<_>>>()?;
    ensure!(
        !sources.is_empty(),
        "Project {} has no energy sources",
        raw.id
    );
    ensure!(
        sources.iter().all_unique(),
        "Project {} lists an energy source more than once",
        raw.id
    );

    let uses_fuel = energy_sources[&sources[0]].is_fuel;
    ensure!(
        sources.iter().all(|s| energy_sources[s].is_fuel == uses_fuel),
        "Project {} mixes fuels with non-fuel energy sources",
        raw.id
    );
    ensure!(
        uses_fuel || sources.len() == 1,
        "Project {} must have exactly one non-fuel energy source",
        raw.id
    );

    Ok(Project {
        id: raw.id.into(),
        technology: raw.technology.into(),
        load_zone_id: load_zones.get_id_by_str(&raw.load_zone)?,
        energy_sources: sources,
        uses_fuel,
        connect_cost_per_mw,
    })
}
