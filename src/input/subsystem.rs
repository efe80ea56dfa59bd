//! Code for reading the solved values of optional subsystems from CSV files.
//!
//! Each subsystem is present if and only if its file exists in the model directory.
use super::*;
use crate::id::IDCollection;
use crate::model::ModelParameters;
use crate::model::subsystem::{
    Batteries, ElectricVehicles, FuelMarkets, Hydrogen, HydrogenParameters, MarketID,
    PumpedHydro, RenewablePortfolioStandard, SupplyTier, SupplyTierKey, Subsystems, ZonePeriod,
};
use crate::project::LoadZoneMap;
use crate::sparse::SparseMap;
use crate::timescale::{PeriodID, TimeScales};
use serde::Deserialize;
use std::path::Path;

const BATTERIES_FILE_NAME: &str = "batteries.csv";
const PUMPED_HYDRO_FILE_NAME: &str = "pumped_hydro.csv";
const HYDROGEN_FILE_NAME: &str = "hydrogen.csv";
const RPS_FILE_NAME: &str = "rps.csv";
const FUEL_MARKET_TIERS_FILE_NAME: &str = "fuel_market_tiers.csv";
const FUEL_MARKET_EXPANSION_FILE_NAME: &str = "fuel_market_expansion.csv";
const FUEL_MARKET_ACTIVATION_FILE_NAME: &str = "fuel_market_activation.csv";
const EV_FLEET_FILE_NAME: &str = "ev_fleet.csv";
const EV_COSTS_FILE_NAME: &str = "ev_costs.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct BatteryRaw {
    load_zone: String,
    period: String,
    capacity_mwh: f64,
    build_mwh: f64,
    capital_cost_per_mwh: f64,
}

#[derive(PartialEq, Debug, Deserialize)]
struct PumpedHydroRaw {
    load_zone: String,
    period: String,
    capacity_mw: f64,
    build_mw: f64,
    capital_cost_per_mw: f64,
}

#[derive(PartialEq, Debug, Deserialize)]
struct HydrogenRaw {
    load_zone: String,
    period: String,
    build_electrolyzer_mw: f64,
    build_liquifier_kg_per_hour: f64,
    build_liquid_tank_kg: f64,
    build_fuel_cell_mw: f64,
    fuel_cell_capacity_mw: f64,
}

#[derive(PartialEq, Debug, Deserialize)]
struct RpsRaw {
    period: String,
    eligible_mwh: f64,
    fuel_mwh: f64,
    total_mwh: f64,
}

#[derive(PartialEq, Debug, Deserialize)]
struct SupplyTierRaw {
    market: String,
    period: String,
    tier: String,
    consumption: f64,
    cost: f64,
}

#[derive(PartialEq, Debug, Deserialize)]
struct MarketExpansionRaw {
    period: String,
    annual_cost: f64,
}

#[derive(PartialEq, Debug, Deserialize)]
struct TierActivationRaw {
    market: String,
    period: String,
    tier: String,
    #[serde(deserialize_with = "deserialise_proportion")]
    activate: f64,
}

#[derive(PartialEq, Debug, Deserialize)]
struct EvFleetRaw {
    load_zone: String,
    period: String,
    vehicle_count: f64,
    #[serde(deserialize_with = "deserialise_proportion")]
    ev_share: f64,
}

#[derive(PartialEq, Debug, Deserialize)]
struct EvCostsRaw {
    period: String,
    extra_capital_recovery: f64,
    ice_fuel_cost: f64,
}

/// Index sets needed to validate subsystem records
struct Indexes<'a> {
    time: &'a TimeScales,
    load_zones: &'a LoadZoneMap,
}

impl Indexes<'_> {
    fn zone_period(&self, load_zone: &str, period: &str) -> Result<ZonePeriod> {
        Ok((
            self.load_zones.get_id_by_str(load_zone)?,
            self.period(period)?,
        ))
    }

    fn period(&self, period: &str) -> Result<PeriodID> {
        self.time.periods.get_id_by_str(period)
    }
}

/// Read a subsystem's file, if it exists, and convert its records with `f`
fn read_optional<T, U, F>(model_dir: &Path, file_name: &str, f: F) -> Result<Option<U>>
where
    T: DeserializeOwned,
    F: FnOnce(Vec<T>) -> Result<U>,
{
    let file_path = model_dir.join(file_name);
    let Some(records) = read_csv_if_exists(&file_path)? else {
        return Ok(None);
    };

    f(records)
        .map(Some)
        .with_context(|| input_err_msg(&file_path))
}

/// Read the solved values of all optional subsystems.
///
/// # Arguments
///
/// * `model_dir` - Folder containing the solved model files
/// * `parameters` - Model parameters, which hold the subsystems' scalar parameters
/// * `time` - Periods, timeseries and timepoints
/// * `load_zones` - All load zones
///
/// # Returns
///
/// The subsystems, with `None` for each subsystem whose file is absent
pub fn read_subsystems(
    model_dir: &Path,
    parameters: &ModelParameters,
    time: &TimeScales,
    load_zones: &LoadZoneMap,
) -> Result<Subsystems> {
    let idx = Indexes { time, load_zones };

    let batteries = read_optional(model_dir, BATTERIES_FILE_NAME, |records| {
        let parameters = parameters
            .batteries
            .context("Battery data provided but model.toml has no [batteries] section")?;
        read_batteries(records, &idx).map(|(capacity_mwh, build_mwh, capital_cost_per_mwh)| {
            Batteries {
                parameters,
                capacity_mwh,
                build_mwh,
                capital_cost_per_mwh,
            }
        })
    })?;

    let pumped_hydro = read_optional(model_dir, PUMPED_HYDRO_FILE_NAME, |records| {
        read_pumped_hydro(records, &idx)
    })?;

    let hydrogen = read_optional(model_dir, HYDROGEN_FILE_NAME, |records| {
        let parameters = parameters
            .hydrogen
            .context("Hydrogen data provided but model.toml has no [hydrogen] section")?;
        read_hydrogen(records, parameters, &idx)
    })?;

    let rps = read_optional(model_dir, RPS_FILE_NAME, |records| read_rps(records, &idx))?;

    let fuel_markets = read_optional(model_dir, FUEL_MARKET_TIERS_FILE_NAME, |records| {
        read_fuel_markets(records, &idx)
    })?;

    let fuel_market_expansion =
        read_optional(model_dir, FUEL_MARKET_EXPANSION_FILE_NAME, |records| {
            read_market_expansion(records, &idx)
        })?;

    let tier_activation = read_optional(model_dir, FUEL_MARKET_ACTIVATION_FILE_NAME, |records| {
        read_tier_activation(records, fuel_markets.as_ref(), &idx)
    })?;

    let electric_vehicles = read_optional(model_dir, EV_FLEET_FILE_NAME, |records| {
        read_ev_fleet(records, &idx)
    })?;
    let electric_vehicles = match electric_vehicles {
        Some(mut evs) => {
            let file_path = model_dir.join(EV_COSTS_FILE_NAME);
            read_ev_costs(read_csv_optional(&file_path)?, &mut evs, &idx)
                .with_context(|| input_err_msg(&file_path))?;
            Some(evs)
        }
        None => None,
    };

    Ok(Subsystems {
        batteries,
        pumped_hydro,
        hydrogen,
        rps,
        fuel_markets,
        fuel_market_expansion,
        tier_activation,
        electric_vehicles,
    })
}

type BatteryMaps = (
    SparseMap<ZonePeriod>,
    SparseMap<ZonePeriod>,
    SparseMap<ZonePeriod>,
);

fn read_batteries(records: Vec<BatteryRaw>, idx: &Indexes) -> Result<BatteryMaps> {
    let mut capacity_mwh = SparseMap::new();
    let mut build_mwh = SparseMap::new();
    let mut capital_cost_per_mwh = SparseMap::new();
    for raw in records {
        let key = idx.zone_period(&raw.load_zone, &raw.period)?;
        capacity_mwh.try_insert(key.clone(), raw.capacity_mwh)?;
        build_mwh.insert(key.clone(), raw.build_mwh);
        capital_cost_per_mwh.insert(key, raw.capital_cost_per_mwh);
    }

    Ok((capacity_mwh, build_mwh, capital_cost_per_mwh))
}

fn read_pumped_hydro(records: Vec<PumpedHydroRaw>, idx: &Indexes) -> Result<PumpedHydro> {
    let mut hydro = PumpedHydro::default();
    for raw in records {
        let key = idx.zone_period(&raw.load_zone, &raw.period)?;
        hydro.capacity_mw.try_insert(key.clone(), raw.capacity_mw)?;
        hydro.build_mw.insert(key.clone(), raw.build_mw);
        hydro.capital_cost_per_mw.insert(key, raw.capital_cost_per_mw);
    }

    Ok(hydro)
}

fn read_hydrogen(
    records: Vec<HydrogenRaw>,
    parameters: HydrogenParameters,
    idx: &Indexes,
) -> Result<Hydrogen> {
    let mut hydrogen = Hydrogen {
        parameters,
        build_electrolyzer_mw: SparseMap::new(),
        build_liquifier_kg_per_hour: SparseMap::new(),
        build_liquid_tank_kg: SparseMap::new(),
        build_fuel_cell_mw: SparseMap::new(),
        fuel_cell_capacity_mw: SparseMap::new(),
    };
    for raw in records {
        let key = idx.zone_period(&raw.load_zone, &raw.period)?;
        hydrogen
            .build_electrolyzer_mw
            .try_insert(key.clone(), raw.build_electrolyzer_mw)?;
        hydrogen
            .build_liquifier_kg_per_hour
            .insert(key.clone(), raw.build_liquifier_kg_per_hour);
        hydrogen
            .build_liquid_tank_kg
            .insert(key.clone(), raw.build_liquid_tank_kg);
        hydrogen
            .build_fuel_cell_mw
            .insert(key.clone(), raw.build_fuel_cell_mw);
        hydrogen
            .fuel_cell_capacity_mw
            .insert(key, raw.fuel_cell_capacity_mw);
    }

    Ok(hydrogen)
}

fn read_rps(records: Vec<RpsRaw>, idx: &Indexes) -> Result<RenewablePortfolioStandard> {
    let mut rps = RenewablePortfolioStandard::default();
    for raw in records {
        let period = idx.period(&raw.period)?;
        rps.eligible_mwh.try_insert(period.clone(), raw.eligible_mwh)?;
        rps.fuel_mwh.insert(period.clone(), raw.fuel_mwh);
        rps.total_mwh.insert(period, raw.total_mwh);
    }

    Ok(rps)
}

fn read_fuel_markets(records: Vec<SupplyTierRaw>, idx: &Indexes) -> Result<FuelMarkets> {
    let mut markets = FuelMarkets::default();
    for raw in records {
        let market: MarketID = raw.market.as_str().into();
        markets.markets.insert(market.clone());
        let key: SupplyTierKey = (
            market,
            idx.period(&raw.period)?,
            raw.tier.as_str().into(),
        );
        let tier = SupplyTier {
            consumption: raw.consumption,
            cost: raw.cost,
        };
        try_insert(&mut markets.tiers, key, tier)?;
    }

    Ok(markets)
}

fn read_market_expansion(
    records: Vec<MarketExpansionRaw>,
    idx: &Indexes,
) -> Result<SparseMap<PeriodID>> {
    let mut costs = SparseMap::new();
    for raw in records {
        costs.try_insert(idx.period(&raw.period)?, raw.annual_cost)?;
    }

    Ok(costs)
}

fn read_tier_activation(
    records: Vec<TierActivationRaw>,
    fuel_markets: Option<&FuelMarkets>,
    idx: &Indexes,
) -> Result<IndexMap<SupplyTierKey, f64>> {
    let mut activation = IndexMap::new();
    for raw in records {
        let market = match fuel_markets {
            Some(markets) => markets.markets.get_id_by_str(&raw.market)?,
            None => raw.market.as_str().into(),
        };
        let key = (market, idx.period(&raw.period)?, raw.tier.as_str().into());
        try_insert(&mut activation, key, raw.activate)?;
    }

    Ok(activation)
}

fn read_ev_fleet(records: Vec<EvFleetRaw>, idx: &Indexes) -> Result<ElectricVehicles> {
    let mut evs = ElectricVehicles::default();
    for raw in records {
        ensure!(
            raw.vehicle_count.is_finite() && raw.vehicle_count >= 0.0,
            "vehicle_count must be a non-negative number"
        );
        let key = idx.zone_period(&raw.load_zone, &raw.period)?;
        evs.vehicle_count.try_insert(key.clone(), raw.vehicle_count)?;
        evs.ev_share.insert(key, raw.ev_share);
    }

    Ok(evs)
}

fn read_ev_costs<I>(iter: I, evs: &mut ElectricVehicles, idx: &Indexes) -> Result<()>
where
    I: Iterator<Item = EvCostsRaw>,
{
    for raw in iter {
        let period = idx.period(&raw.period)?;
        evs.extra_capital_recovery
            .try_insert(period.clone(), raw.extra_capital_recovery)?;
        evs.ice_fuel_cost.insert(period, raw.ice_fuel_cost);
    }

    Ok(())
}
