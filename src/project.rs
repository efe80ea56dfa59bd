//! Load zones, energy sources and the generation projects which connect them.
use crate::id::{define_id_getter, define_id_type};
use indexmap::IndexMap;
use itertools::Itertools;

define_id_type! {LoadZoneID}
define_id_type! {EnergySourceID}
define_id_type! {ProjectID}
define_id_type! {TechnologyID}

/// A map of [`LoadZone`]s, keyed by load zone ID
pub type LoadZoneMap = IndexMap<LoadZoneID, LoadZone>;

/// A map of [`EnergySource`]s, keyed by energy source ID
pub type EnergySourceMap = IndexMap<EnergySourceID, EnergySource>;

/// A map of [`Project`]s, keyed by project ID
pub type ProjectMap = IndexMap<ProjectID, Project>;

/// A node at which demand and supply must balance
#[derive(PartialEq, Debug, Clone, serde::Deserialize)]
pub struct LoadZone {
    /// Unique identifier for the load zone (e.g. "Oahu")
    pub id: LoadZoneID,
    /// A text description of the load zone
    #[serde(default)]
    pub description: String,
}
define_id_getter! {LoadZone, LoadZoneID}

/// A primary energy input.
///
/// Fuels are consumed and priced; other sources (wind, sun, water) are free.
#[derive(PartialEq, Debug, Clone, serde::Deserialize)]
pub struct EnergySource {
    /// Unique identifier for the energy source (e.g. "LSFO", "wind")
    pub id: EnergySourceID,
    /// Whether this energy source is a fuel
    pub is_fuel: bool,
}
define_id_getter! {EnergySource, EnergySourceID}

/// A generation, storage or conversion asset
#[derive(PartialEq, Debug, Clone)]
pub struct Project {
    /// Unique identifier for the project
    pub id: ProjectID,
    /// Generation technology (e.g. "CentralTrackingPV")
    pub technology: TechnologyID,
    /// The load zone in which the project is located
    pub load_zone_id: LoadZoneID,
    /// The energy sources the project can use.
    ///
    /// For fuel-using projects these are the eligible fuels; otherwise there is exactly one
    /// (non-fuel) energy source.
    pub energy_sources: Vec<EnergySourceID>,
    /// Whether the project burns fuel
    pub uses_fuel: bool,
    /// Cost of connecting one MW of new capacity to the grid
    pub connect_cost_per_mw: f64,
}
define_id_getter! {Project, ProjectID}

impl Project {
    /// The fuels this project may burn (empty for non-fuel projects)
    pub fn fuels(&self) -> &[EnergySourceID] {
        if self.uses_fuel {
            &self.energy_sources
        } else {
            &[]
        }
    }

    /// The non-fuel energy source of this project, if any
    pub fn non_fuel_source(&self) -> Option<&EnergySourceID> {
        if self.uses_fuel {
            None
        } else {
            self.energy_sources.first()
        }
    }

    /// Label used to group capacity by energy source.
    ///
    /// For fuel-using projects this is the sorted list of eligible fuels joined with `/` (e.g.
    /// "LSFO/diesel"); otherwise it is the name of the energy source.
    pub fn energy_source_label(&self) -> String {
        if self.uses_fuel {
            self.energy_sources.iter().map(|s| &*s.0).sorted().join("/")
        } else {
            self.energy_sources.iter().join("/")
        }
    }
}
