//! The registry of optional subsystems present in a solved model.
//!
//! Which subsystems a model includes varies between runs, and the columns of several reports
//! depend on it. Presence is resolved once per model and queried through [`Capabilities`].
use super::subsystem::Subsystems;
use itertools::Itertools;
use std::collections::HashSet;
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

/// An optional subsystem of the model
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, EnumIter, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Subsystem {
    /// Battery storage, modelled per load zone
    Batteries,
    /// Pumped-storage hydro
    PumpedHydro,
    /// Electrolysis, liquefaction, storage and fuel cells
    Hydrogen,
    /// Renewable portfolio standard accounting
    RenewablePortfolioStandard,
    /// Tiered regional fuel markets
    RegionalFuelMarkets,
    /// Fixed costs of expanding fuel markets
    FuelMarketExpansion,
    /// Binary activation of fuel market supply tiers
    SupplyTierActivation,
    /// Electric vehicle fleets
    ElectricVehicles,
}

/// The set of optional subsystems present in a particular solved model
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Capabilities(HashSet<Subsystem>);

impl Capabilities {
    /// Determine which subsystems are present from the model's subsystem data
    pub fn detect(subsystems: &Subsystems) -> Self {
        Subsystem::iter()
            .filter(|subsystem| subsystems.is_present(*subsystem))
            .collect()
    }

    /// Whether the given subsystem is present
    pub fn has(&self, subsystem: Subsystem) -> bool {
        self.0.contains(&subsystem)
    }

    /// Iterate over the subsystems which are present, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = Subsystem> + '_ {
        Subsystem::iter().filter(|subsystem| self.has(*subsystem))
    }
}

impl FromIterator<Subsystem> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Subsystem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", self.iter().join(", "))
        }
    }
}
