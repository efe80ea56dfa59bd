//! Solved values for the optional subsystems of a model.
use super::capability::Subsystem;
use crate::project::LoadZoneID;
use crate::sparse::SparseMap;
use crate::timescale::PeriodID;
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;

/// Key for values defined per load zone and period
pub type ZonePeriod = (LoadZoneID, PeriodID);

/// Key for a fuel market supply tier
pub type SupplyTierKey = (MarketID, PeriodID, TierID);

crate::id::define_id_type! {MarketID}
crate::id::define_id_type! {TierID}

/// Solved values for all optional subsystems. `None` means the subsystem is absent.
#[derive(PartialEq, Debug, Default)]
pub struct Subsystems {
    /// Battery storage
    pub batteries: Option<Batteries>,
    /// Pumped-storage hydro
    pub pumped_hydro: Option<PumpedHydro>,
    /// Hydrogen production, storage and fuel cells
    pub hydrogen: Option<Hydrogen>,
    /// Renewable portfolio standard accounting
    pub rps: Option<RenewablePortfolioStandard>,
    /// Regional fuel markets
    pub fuel_markets: Option<FuelMarkets>,
    /// Annual fixed costs of expanding fuel markets, per period
    pub fuel_market_expansion: Option<SparseMap<PeriodID>>,
    /// Activation of fuel market supply tiers
    pub tier_activation: Option<IndexMap<SupplyTierKey, f64>>,
    /// Electric vehicle fleets
    pub electric_vehicles: Option<ElectricVehicles>,
}

impl Subsystems {
    /// Whether the data for the given subsystem is present
    pub fn is_present(&self, subsystem: Subsystem) -> bool {
        match subsystem {
            Subsystem::Batteries => self.batteries.is_some(),
            Subsystem::PumpedHydro => self.pumped_hydro.is_some(),
            Subsystem::Hydrogen => self.hydrogen.is_some(),
            Subsystem::RenewablePortfolioStandard => self.rps.is_some(),
            Subsystem::RegionalFuelMarkets => self.fuel_markets.is_some(),
            Subsystem::FuelMarketExpansion => self.fuel_market_expansion.is_some(),
            Subsystem::SupplyTierActivation => self.tier_activation.is_some(),
            Subsystem::ElectricVehicles => self.electric_vehicles.is_some(),
        }
    }
}

/// Operating parameters for batteries
#[derive(PartialEq, Debug, Clone, Copy, Deserialize)]
pub struct BatteryParameters {
    /// Maximum fraction of stored energy which can be discharged
    pub max_discharge: f64,
    /// Minimum number of hours over which a full battery discharges
    pub min_discharge_time: f64,
}

/// Battery storage
#[derive(PartialEq, Debug)]
pub struct Batteries {
    /// Operating parameters
    pub parameters: BatteryParameters,
    /// Installed energy capacity (MWh)
    pub capacity_mwh: SparseMap<ZonePeriod>,
    /// Energy capacity built in the period (MWh)
    pub build_mwh: SparseMap<ZonePeriod>,
    /// Capital cost per MWh of energy capacity
    pub capital_cost_per_mwh: SparseMap<ZonePeriod>,
}

impl Batteries {
    /// Installed power capacity (MW)
    pub fn capacity_mw(&self, key: &ZonePeriod) -> f64 {
        self.capacity_mwh.get(key) * self.parameters.max_discharge
            / self.parameters.min_discharge_time
    }

    /// Power capacity built in the period (MW)
    pub fn build_mw(&self, key: &ZonePeriod) -> f64 {
        self.build_mwh.get(key) / self.parameters.min_discharge_time
    }

    /// Overnight cost of the energy capacity built in the period
    pub fn overnight_cost(&self, key: &ZonePeriod) -> f64 {
        self.build_mwh.get(key) * self.capital_cost_per_mwh.get(key)
    }
}

/// Pumped-storage hydro, aggregated per load zone
#[derive(PartialEq, Debug, Default)]
pub struct PumpedHydro {
    /// Installed capacity (MW)
    pub capacity_mw: SparseMap<ZonePeriod>,
    /// Capacity built in the period (MW)
    pub build_mw: SparseMap<ZonePeriod>,
    /// Capital cost per MW of new capacity
    pub capital_cost_per_mw: SparseMap<ZonePeriod>,
}

impl PumpedHydro {
    /// Overnight cost of the capacity built in the period
    pub fn overnight_cost(&self, key: &ZonePeriod) -> f64 {
        self.build_mw.get(key) * self.capital_cost_per_mw.get(key)
    }
}

/// Capital costs for hydrogen equipment
#[derive(PartialEq, Debug, Clone, Copy, Deserialize)]
pub struct HydrogenParameters {
    /// Capital cost per MW of electrolyzer
    pub electrolyzer_capital_cost_per_mw: f64,
    /// Capital cost per kg/hour of liquefaction capacity
    pub liquifier_capital_cost_per_kg_per_hour: f64,
    /// Capital cost per kg of liquid hydrogen storage
    pub liquid_tank_capital_cost_per_kg: f64,
    /// Capital cost per MW of fuel cell
    pub fuel_cell_capital_cost_per_mw: f64,
}

/// Hydrogen production, storage and fuel cells
#[derive(PartialEq, Debug)]
pub struct Hydrogen {
    /// Capital cost parameters
    pub parameters: HydrogenParameters,
    /// Electrolyzer capacity built in the period (MW)
    pub build_electrolyzer_mw: SparseMap<ZonePeriod>,
    /// Liquefaction capacity built in the period (kg/hour)
    pub build_liquifier_kg_per_hour: SparseMap<ZonePeriod>,
    /// Liquid hydrogen storage built in the period (kg)
    pub build_liquid_tank_kg: SparseMap<ZonePeriod>,
    /// Fuel cell capacity built in the period (MW)
    pub build_fuel_cell_mw: SparseMap<ZonePeriod>,
    /// Installed fuel cell capacity (MW)
    pub fuel_cell_capacity_mw: SparseMap<ZonePeriod>,
}

impl Hydrogen {
    /// Quantities of each kind of equipment built in the period
    pub fn builds(&self, key: &ZonePeriod) -> [f64; 4] {
        [
            self.build_electrolyzer_mw.get(key),
            self.build_liquifier_kg_per_hour.get(key),
            self.build_liquid_tank_kg.get(key),
            self.build_fuel_cell_mw.get(key),
        ]
    }

    /// Overnight costs of each kind of equipment built in the period
    pub fn overnight_costs(&self, key: &ZonePeriod) -> [f64; 4] {
        let params = &self.parameters;
        let [electrolyzer, liquifier, tank, fuel_cell] = self.builds(key);
        [
            electrolyzer * params.electrolyzer_capital_cost_per_mw,
            liquifier * params.liquifier_capital_cost_per_kg_per_hour,
            tank * params.liquid_tank_capital_cost_per_kg,
            fuel_cell * params.fuel_cell_capital_cost_per_mw,
        ]
    }
}

/// Renewable portfolio standard accounting, per period (MWh)
#[derive(PartialEq, Debug, Default)]
pub struct RenewablePortfolioStandard {
    /// Generation which counts towards the standard
    pub eligible_mwh: SparseMap<PeriodID>,
    /// Eligible generation from biofuels
    pub fuel_mwh: SparseMap<PeriodID>,
    /// Total generation
    pub total_mwh: SparseMap<PeriodID>,
}

/// Solved quantities for one supply tier of a fuel market
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct SupplyTier {
    /// Fuel bought from this tier
    pub consumption: f64,
    /// Cost per unit of fuel in this tier
    pub cost: f64,
}

/// Tiered regional fuel markets
#[derive(PartialEq, Debug, Default)]
pub struct FuelMarkets {
    /// All markets, in input order
    pub markets: IndexSet<MarketID>,
    /// Supply tiers for each market and period
    pub tiers: IndexMap<SupplyTierKey, SupplyTier>,
}

impl FuelMarkets {
    /// Annual expenditure on fuel from the given market in the given period
    pub fn annual_cost(&self, market: &MarketID, period: &PeriodID) -> f64 {
        self.tiers
            .iter()
            .filter(|((m, p, _), _)| m == market && p == period)
            .map(|(_, tier)| tier.consumption * tier.cost)
            .sum()
    }
}

/// Electric and conventional vehicle fleets
#[derive(PartialEq, Debug, Default)]
pub struct ElectricVehicles {
    /// Total number of vehicles
    pub vehicle_count: SparseMap<ZonePeriod>,
    /// Fraction of vehicles which are electric
    pub ev_share: SparseMap<ZonePeriod>,
    /// Annual capital recovery for the extra cost of electric vehicles, per period
    pub extra_capital_recovery: SparseMap<PeriodID>,
    /// Annual fuel cost of internal combustion vehicles, per period
    pub ice_fuel_cost: SparseMap<PeriodID>,
}

impl ElectricVehicles {
    /// Number of electric vehicles
    pub fn ev_count(&self, key: &ZonePeriod) -> f64 {
        self.vehicle_count.get(key) * self.ev_share.get(key)
    }

    /// Number of internal combustion vehicles
    pub fn ice_count(&self, key: &ZonePeriod) -> f64 {
        self.vehicle_count.get(key) * (1.0 - self.ev_share.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{batteries, subsystems};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn key(zone: &str) -> ZonePeriod {
        (zone.into(), "2020".into())
    }

    #[rstest]
    fn test_battery_capacity(batteries: Batteries) {
        // 120 MWh * 0.9 / 6 h
        assert_approx_eq!(f64, batteries.capacity_mw(&key("Z1")), 18.0);
        assert_approx_eq!(f64, batteries.build_mw(&key("Z1")), 10.0);
        assert_approx_eq!(f64, batteries.overnight_cost(&key("Z1")), 60.0 * 300.0);
        assert_eq!(batteries.capacity_mw(&key("Z2")), 0.0);
    }

    #[rstest]
    fn test_hydrogen_costs(subsystems: Subsystems) {
        let hydrogen = subsystems.hydrogen.unwrap();
        assert_eq!(hydrogen.builds(&key("Z1")), [5.0, 10.0, 1000.0, 2.0]);
        assert_eq!(
            hydrogen.overnight_costs(&key("Z1")),
            [5.0 * 1000.0, 10.0 * 50.0, 1000.0 * 2.0, 2.0 * 1500.0]
        );
        assert_eq!(hydrogen.overnight_costs(&key("Z2")), [0.0; 4]);
    }

    #[rstest]
    fn test_fuel_market_annual_cost(subsystems: Subsystems) {
        let markets = subsystems.fuel_markets.unwrap();
        let period = "2020".into();
        // 10 * 5 + 4 * 8
        assert_eq!(markets.annual_cost(&"Oahu_LNG".into(), &period), 82.0);
        assert_eq!(markets.annual_cost(&"Oahu_LNG".into(), &"2030".into()), 0.0);
    }

    #[rstest]
    fn test_vehicle_counts(subsystems: Subsystems) {
        let evs = subsystems.electric_vehicles.unwrap();
        assert_approx_eq!(f64, evs.ev_count(&key("Z1")), 250.0);
        assert_approx_eq!(f64, evs.ice_count(&key("Z1")), 750.0);
        assert_eq!(evs.ev_count(&key("Z2")), 0.0);
        assert_eq!(evs.ice_count(&key("Z2")), 0.0);
    }
}
