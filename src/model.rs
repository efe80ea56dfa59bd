//! The solved model: index sets, solved values and the optional subsystems present.
//!
//! A [`SolvedModel`] is produced by the optimisation stage and is only ever read by the
//! reporting code.
use crate::allocate::fuel_share;
use crate::finance::annualize;
use crate::project::{EnergySourceID, LoadZoneID, LoadZoneMap, Project, ProjectMap};
use crate::project::{EnergySource, EnergySourceMap};
use crate::timescale::{Period, TimeScales, Timepoint, TimepointID};
use crate::units::{Dimensionless, Money, MoneyPerYear};
use anyhow::{Result, ensure};
use indexmap::IndexMap;
use itertools::Itertools;

pub mod capability;
pub use capability::{Capabilities, Subsystem};
pub mod parameters;
pub use parameters::ModelParameters;
pub mod subsystem;
pub use subsystem::Subsystems;
pub mod variables;
pub use variables::DecisionVariables;

/// Names of energy balance components which represent demand
pub const DEMAND_COMPONENTS: [&str; 3] = ["lz_demand_mw", "DemandResponse", "ChargeEVs"];

/// A solved model instance
#[derive(PartialEq, Debug)]
pub struct SolvedModel {
    /// Scalar parameters from the model TOML file
    pub parameters: ModelParameters,
    /// Periods, timeseries and timepoints
    pub time: TimeScales,
    /// Load zones
    pub load_zones: LoadZoneMap,
    /// Fuels and other energy sources
    pub energy_sources: EnergySourceMap,
    /// Generation projects
    pub projects: ProjectMap,
    /// Solved decision variables and duals
    pub variables: DecisionVariables,
    /// Solved values for optional subsystems
    pub subsystems: Subsystems,
    capabilities: Capabilities,
}

impl SolvedModel {
    /// Assemble a solved model, checking that the required index sets are present.
    ///
    /// The optional subsystems present are determined here, once.
    pub fn new(
        parameters: ModelParameters,
        time: TimeScales,
        load_zones: LoadZoneMap,
        energy_sources: EnergySourceMap,
        projects: ProjectMap,
        variables: DecisionVariables,
        subsystems: Subsystems,
    ) -> Result<Self> {
        check_required_set("periods", time.periods.len())?;
        check_required_set("timepoints", time.timepoints.len())?;
        check_required_set("load_zones", load_zones.len())?;
        check_required_set("projects", projects.len())?;
        check_time_references(&time)?;

        let capabilities = Capabilities::detect(&subsystems);
        Ok(Self {
            parameters,
            time,
            load_zones,
            energy_sources,
            projects,
            variables,
            subsystems,
            capabilities,
        })
    }

    /// The optional subsystems present in this model
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Whether the given optional subsystem is present
    pub fn has(&self, subsystem: Subsystem) -> bool {
        self.capabilities.has(subsystem)
    }

    /// All index sets of the model, by name, with their keys in order
    pub fn sets(&self) -> IndexMap<&'static str, Vec<String>> {
        fn keys<K: ToString, V>(map: &IndexMap<K, V>) -> Vec<String> {
            map.keys().map(ToString::to_string).collect()
        }

        let mut sets = IndexMap::new();
        sets.insert("periods", keys(&self.time.periods));
        sets.insert("timeseries", keys(&self.time.timeseries));
        sets.insert("timepoints", keys(&self.time.timepoints));
        sets.insert("load_zones", keys(&self.load_zones));
        sets.insert("projects", keys(&self.projects));
        sets.insert(
            "fuels",
            self.iter_fuels().map(|s| s.id.to_string()).collect(),
        );
        sets.insert(
            "non_fuel_energy_sources",
            self.iter_non_fuel_sources()
                .map(|s| s.id.to_string())
                .collect(),
        );
        if let Some(markets) = &self.subsystems.fuel_markets {
            sets.insert(
                "fuel_markets",
                markets.markets.iter().map(ToString::to_string).collect(),
            );
        }

        sets
    }

    /// Iterate over the energy sources which are fuels
    pub fn iter_fuels(&self) -> impl Iterator<Item = &EnergySource> {
        self.energy_sources.values().filter(|s| s.is_fuel)
    }

    /// Iterate over the energy sources which are not fuels
    pub fn iter_non_fuel_sources(&self) -> impl Iterator<Item = &EnergySource> {
        self.energy_sources.values().filter(|s| !s.is_fuel)
    }

    /// Dispatch of a project at a timepoint attributed to one of its fuels.
    ///
    /// Dispatch is split between the project's eligible fuels in proportion to how much of each
    /// fuel it uses at that timepoint.
    pub fn dispatch_by_fuel(
        &self,
        project: &Project,
        timepoint_id: &TimepointID,
        fuel: &EnergySourceID,
    ) -> f64 {
        let vars = &self.variables;
        let dispatch = vars
            .dispatch
            .get(&(project.id.clone(), timepoint_id.clone()));
        if dispatch == 0.0 {
            return 0.0;
        }

        let rate = |fuel: &EnergySourceID| {
            vars.fuel_use_rate
                .get(&(project.id.clone(), timepoint_id.clone(), fuel.clone()))
        };
        let total_rate = project.fuels().iter().map(rate).sum();

        fuel_share(dispatch, rate(fuel), total_rate)
    }

    /// Total demand in a load zone at a timepoint (MW)
    pub fn demand(&self, zone_id: &LoadZoneID, timepoint_id: &TimepointID) -> f64 {
        let key = (zone_id.clone(), timepoint_id.clone());
        DEMAND_COMPONENTS
            .iter()
            .filter_map(|name| self.variables.zone_components.get(*name))
            .map(|component| component.values.get(&key))
            .sum()
    }

    /// Demand over all load zones in the given timepoints, discounted to the base year (kWh)
    pub fn discounted_demand_kwh<'a, I>(&self, timepoints: I) -> f64
    where
        I: IntoIterator<Item = &'a Timepoint>,
    {
        timepoints
            .into_iter()
            .map(|tp| {
                let demand_mw: f64 = self
                    .load_zones
                    .keys()
                    .map(|zone_id| self.demand(zone_id, &tp.id))
                    .sum();
                tp.cost_to_base_year * 1000.0 * demand_mw
            })
            .sum()
    }

    /// Total system cost over all periods, discounted to the base year
    pub fn total_system_cost(&self) -> f64 {
        self.time.periods.values().map(|p| p.system_cost).sum()
    }

    /// Convert a present-value cost for the given period into an equivalent annual cost
    pub fn annualize_period_cost(&self, period: &Period, present_value_cost: f64) -> MoneyPerYear {
        let offset = i64::from(period.start_year) - i64::from(self.parameters.base_financial_year);
        annualize(
            Dimensionless(self.parameters.discount_rate),
            period.length_years,
            i32::try_from(offset).unwrap_or(i32::MAX),
            Money(present_value_cost),
        )
    }
}

/// Check that a required index set has at least one member
fn check_required_set(name: &str, len: usize) -> Result<()> {
    ensure!(len > 0, "Required set `{name}` is missing or empty");

    Ok(())
}

/// Check that every timepoint belongs to a known timeseries, and every timeseries to a known
/// period
fn check_time_references(time: &TimeScales) -> Result<()> {
    for ts in time.timeseries.values() {
        ensure!(
            time.periods.contains_key(&ts.period_id),
            "Timeseries {} refers to unknown period {}",
            ts.id,
            ts.period_id
        );
    }

    let unknown = time
        .timepoints
        .values()
        .filter(|tp| !time.timeseries.contains_key(&tp.timeseries_id))
        .map(|tp| &tp.id)
        .collect_vec();
    ensure!(
        unknown.is_empty(),
        "Timepoints refer to unknown timeseries: {}",
        unknown.iter().join(", ")
    );

    Ok(())
}
