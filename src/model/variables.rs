//! Solved decision variables and dual values of the core model.
use crate::id::define_id_type;
use crate::project::{EnergySourceID, LoadZoneID, ProjectID};
use crate::sparse::SparseMap;
use crate::timescale::{PeriodID, TimepointID};
use indexmap::IndexMap;
use serde_string_enum::DeserializeLabeledStringEnum;

define_id_type! {ComponentID}

/// Key for values defined per project and period
pub type ProjectPeriod = (ProjectID, PeriodID);

/// Key for values defined per project and timepoint
pub type ProjectTimepoint = (ProjectID, TimepointID);

/// Key for values defined per load zone and timepoint
pub type ZoneTimepoint = (LoadZoneID, TimepointID);

/// The solved values of the core decision variables
#[derive(PartialEq, Debug, Default)]
pub struct DecisionVariables {
    /// Installed capacity of each project in each period (MW)
    pub capacity: SparseMap<ProjectPeriod>,
    /// Capacity built in each period (MW)
    pub build: SparseMap<ProjectPeriod>,
    /// Overnight capital cost per MW of capacity built in each period
    pub overnight_cost: SparseMap<ProjectPeriod>,
    /// Power output of each project at each timepoint (MW)
    pub dispatch: SparseMap<ProjectTimepoint>,
    /// Maximum possible power output at each timepoint (MW)
    pub dispatch_upper_limit: SparseMap<ProjectTimepoint>,
    /// Rate at which each fuel is used by a project at a timepoint
    pub fuel_use_rate: SparseMap<(ProjectID, TimepointID, EnergySourceID)>,
    /// Named terms of the energy balance for each load zone
    pub zone_components: IndexMap<ComponentID, ZoneComponent>,
    /// Shadow prices of the energy balance constraint for each load zone and timepoint
    pub energy_balance_duals: SparseMap<ZoneTimepoint>,
}

/// Which side of the energy balance a component contributes to
#[derive(PartialEq, Eq, Debug, Clone, Copy, DeserializeLabeledStringEnum)]
pub enum ComponentDirection {
    /// Adds energy to the load zone (e.g. imports, discharging storage)
    #[string = "produce"]
    Produce,
    /// Removes energy from the load zone (e.g. demand, charging vehicles)
    #[string = "consume"]
    Consume,
}

/// A named term of the energy balance (e.g. `lz_demand_mw`)
#[derive(PartialEq, Debug)]
pub struct ZoneComponent {
    /// Whether the component produces or consumes energy
    pub direction: ComponentDirection,
    /// Values per load zone and timepoint (MW)
    pub values: SparseMap<ZoneTimepoint>,
}

impl DecisionVariables {
    /// Iterate over the energy balance components in the given direction, in input order
    pub fn iter_components(
        &self,
        direction: ComponentDirection,
    ) -> impl Iterator<Item = (&ComponentID, &ZoneComponent)> {
        self.zone_components
            .iter()
            .filter(move |(_, component)| component.direction == direction)
    }
}
