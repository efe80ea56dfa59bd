//! Code for reading solved decision variables and duals from CSV files.
use super::*;
use crate::id::IDCollection;
use crate::model::variables::{ComponentDirection, ComponentID, DecisionVariables, ZoneComponent};
use crate::project::{
    EnergySourceID, EnergySourceMap, LoadZoneID, LoadZoneMap, ProjectID, ProjectMap,
};
use crate::sparse::SparseMap;
use crate::timescale::{PeriodID, TimeScales, TimepointID};
use serde::Deserialize;
use std::path::Path;

const CAPACITY_FILE_NAME: &str = "capacity.csv";
const BUILDS_FILE_NAME: &str = "builds.csv";
const DISPATCH_FILE_NAME: &str = "dispatch.csv";
const FUEL_USE_FILE_NAME: &str = "fuel_use.csv";
const ZONE_COMPONENTS_FILE_NAME: &str = "zone_components.csv";
const DUALS_FILE_NAME: &str = "duals.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct CapacityRaw {
    project: String,
    period: String,
    capacity_mw: f64,
}

#[derive(PartialEq, Debug, Deserialize)]
struct BuildRaw {
    project: String,
    period: String,
    build_mw: f64,
    overnight_cost: f64,
}

#[derive(PartialEq, Debug, Deserialize)]
struct DispatchRaw {
    project: String,
    timepoint: String,
    dispatch_mw: f64,
    dispatch_upper_limit_mw: f64,
}

#[derive(PartialEq, Debug, Deserialize)]
struct FuelUseRaw {
    project: String,
    timepoint: String,
    fuel: String,
    rate: f64,
}

#[derive(PartialEq, Debug, Deserialize)]
struct ZoneComponentRaw {
    component: String,
    direction: ComponentDirection,
    load_zone: String,
    timepoint: String,
    value: f64,
}

#[derive(PartialEq, Debug, Deserialize)]
struct DualRaw {
    load_zone: String,
    timepoint: String,
    dual: f64,
}

/// Read the solved decision variables and duals of the core model.
///
/// `capacity.csv` and `dispatch.csv` are required. The remaining files may be omitted, in which
/// case all their values read as zero.
///
/// # Arguments
///
/// * `model_dir` - Folder containing the solved model files
/// * `time` - Periods, timeseries and timepoints
/// * `load_zones` - All load zones
/// * `energy_sources` - All energy sources
/// * `projects` - All projects
pub fn read_decision_variables(
    model_dir: &Path,
    time: &TimeScales,
    load_zones: &LoadZoneMap,
    energy_sources: &EnergySourceMap,
    projects: &ProjectMap,
) -> Result<DecisionVariables> {
    let mut vars = DecisionVariables::default();

    let file_path = model_dir.join(CAPACITY_FILE_NAME);
    vars.capacity = read_capacity_from_iter(read_csv(&file_path)?, time, projects)
        .with_context(|| input_err_msg(&file_path))?;

    let file_path = model_dir.join(BUILDS_FILE_NAME);
    (vars.build, vars.overnight_cost) =
        read_builds_from_iter(read_csv_optional(&file_path)?, time, projects)
            .with_context(|| input_err_msg(&file_path))?;

    let file_path = model_dir.join(DISPATCH_FILE_NAME);
    (vars.dispatch, vars.dispatch_upper_limit) =
        read_dispatch_from_iter(read_csv(&file_path)?, time, projects)
            .with_context(|| input_err_msg(&file_path))?;

    let file_path = model_dir.join(FUEL_USE_FILE_NAME);
    vars.fuel_use_rate = read_fuel_use_from_iter(
        read_csv_optional(&file_path)?,
        time,
        energy_sources,
        projects,
    )
    .with_context(|| input_err_msg(&file_path))?;

    let file_path = model_dir.join(ZONE_COMPONENTS_FILE_NAME);
    vars.zone_components =
        read_zone_components_from_iter(read_csv_optional(&file_path)?, time, load_zones)
            .with_context(|| input_err_msg(&file_path))?;

    let file_path = model_dir.join(DUALS_FILE_NAME);
    vars.energy_balance_duals =
        read_duals_from_iter(read_csv_optional(&file_path)?, time, load_zones)
            .with_context(|| input_err_msg(&file_path))?;

    Ok(vars)
}

fn read_capacity_from_iter<I>(
    iter: I,
    time: &TimeScales,
    projects: &ProjectMap,
) -> Result<SparseMap<(ProjectID, PeriodID)>>
where
    I: Iterator<Item = CapacityRaw>,
{
    let mut capacity = SparseMap::new();
    for raw in iter {
        let key = (
            projects.get_id_by_str(&raw.project)?,
            time.periods.get_id_by_str(&raw.period)?,
        );
        capacity.try_insert(key, raw.capacity_mw)?;
    }

    Ok(capacity)
}

type BuildMaps = (
    SparseMap<(ProjectID, PeriodID)>,
    SparseMap<(ProjectID, PeriodID)>,
);

fn read_builds_from_iter<I>(iter: I, time: &TimeScales, projects: &ProjectMap) -> Result<BuildMaps>
where
    I: Iterator<Item = BuildRaw>,
{
    let mut build = SparseMap::new();
    let mut overnight_cost = SparseMap::new();
    for raw in iter {
        let key = (
            projects.get_id_by_str(&raw.project)?,
            time.periods.get_id_by_str(&raw.period)?,
        );
        build.try_insert(key.clone(), raw.build_mw)?;
        overnight_cost.insert(key, raw.overnight_cost);
    }

    Ok((build, overnight_cost))
}

type DispatchMaps = (
    SparseMap<(ProjectID, TimepointID)>,
    SparseMap<(ProjectID, TimepointID)>,
);

fn read_dispatch_from_iter<I>(
    iter: I,
    time: &TimeScales,
    projects: &ProjectMap,
) -> Result<DispatchMaps>
where
    I: Iterator<Item = DispatchRaw>,
{
    let mut dispatch = SparseMap::new();
    let mut upper_limit = SparseMap::new();
    for raw in iter {
        let key = (
            projects.get_id_by_str(&raw.project)?,
            time.timepoints.get_id_by_str(&raw.timepoint)?,
        );
        dispatch.try_insert(key.clone(), raw.dispatch_mw)?;
        upper_limit.insert(key, raw.dispatch_upper_limit_mw);
    }

    Ok((dispatch, upper_limit))
}

fn read_fuel_use_from_iter<I>(
    iter: I,
    time: &TimeScales,
    energy_sources: &EnergySourceMap,
    projects: &ProjectMap,
) -> Result<SparseMap<(ProjectID, TimepointID, EnergySourceID)>>
where
    I: Iterator<Item = FuelUseRaw>,
{
    let mut rates = SparseMap::new();
    for raw in iter {
        let project_id = projects.get_id_by_str(&raw.project)?;
        let fuel = energy_sources.get_id_by_str(&raw.fuel)?;
        ensure!(
            projects[&project_id].fuels().contains(&fuel),
            "{fuel} is not an eligible fuel for project {project_id}"
        );

        let key = (
            project_id,
            time.timepoints.get_id_by_str(&raw.timepoint)?,
            fuel,
        );
        rates.try_insert(key, raw.rate)?;
    }

    Ok(rates)
}

fn read_zone_components_from_iter<I>(
    iter: I,
    time: &TimeScales,
    load_zones: &LoadZoneMap,
) -> Result<IndexMap<ComponentID, ZoneComponent>>
where
    I: Iterator<Item = ZoneComponentRaw>,
{
    let mut components: IndexMap<ComponentID, ZoneComponent> = IndexMap::new();
    for raw in iter {
        let key = (
            load_zones.get_id_by_str(&raw.load_zone)?,
            time.timepoints.get_id_by_str(&raw.timepoint)?,
        );
        let component = components
            .entry(raw.component.as_str().into())
            .or_insert_with(|| ZoneComponent {
                direction: raw.direction,
                values: SparseMap::new(),
            });
        ensure!(
            component.direction == raw.direction,
            "Component {} is listed as both producing and consuming",
            raw.component
        );
        component.values.try_insert(key, raw.value)?;
    }

    Ok(components)
}

fn read_duals_from_iter<I>(
    iter: I,
    time: &TimeScales,
    load_zones: &LoadZoneMap,
) -> Result<SparseMap<(LoadZoneID, TimepointID)>>
where
    I: Iterator<Item = DualRaw>,
{
    let mut duals = SparseMap::new();
    for raw in iter {
        let key = (
            load_zones.get_id_by_str(&raw.load_zone)?,
            time.timepoints.get_id_by_str(&raw.timepoint)?,
        );
        duals.try_insert(key, raw.dual)?;
    }

    Ok(duals)
}
