//! Fixtures for tests

use crate::model::subsystem::{
    Batteries, BatteryParameters, ElectricVehicles, FuelMarkets, Hydrogen, HydrogenParameters,
    PumpedHydro, RenewablePortfolioStandard, SupplyTier, SupplyTierKey, Subsystems, ZonePeriod,
};
use crate::model::variables::{ComponentDirection, DecisionVariables, ZoneComponent};
use crate::model::{ModelParameters, SolvedModel};
use crate::project::{
    EnergySource, EnergySourceMap, LoadZone, LoadZoneMap, Project, ProjectID, ProjectMap,
};
use crate::sparse::SparseMap;
use crate::timescale::{Period, PeriodID, TimeScales, Timepoint, Timeseries};
use indexmap::{IndexSet, indexmap};
use rstest::fixture;
use std::iter;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Key for zone `Z1` in period `2020`
fn z1_2020() -> ZonePeriod {
    ("Z1".into(), "2020".into())
}

/// A sparse map with a single value for zone `Z1` in period `2020`
fn z1_2020_value(value: f64) -> SparseMap<ZonePeriod> {
    iter::once((z1_2020(), value)).collect()
}

#[fixture]
pub fn model_parameters() -> ModelParameters {
    ModelParameters {
        discount_rate: 0.05,
        base_financial_year: 2015,
        demand_response_max_share: 0.1,
        batteries: None,
        hydrogen: None,
    }
}

#[fixture]
pub fn time_scales() -> TimeScales {
    let period = Period {
        id: "2020".into(),
        start_year: 2020,
        length_years: 10,
        system_cost: 1_000_000.0,
    };
    let peak = Timeseries {
        id: "peak".into(),
        period_id: period.id.clone(),
        scale_to_year: 1.0,
    };
    let typical = Timeseries {
        id: "typical".into(),
        period_id: period.id.clone(),
        scale_to_year: 365.0,
    };
    let tp1 = Timepoint {
        id: "tp1".into(),
        timestamp: "2020-01-15 18:00".into(),
        timeseries_id: peak.id.clone(),
        cost_to_base_year: 1.0,
    };
    let tp2 = Timepoint {
        id: "tp2".into(),
        timestamp: "2020-06-15 12:00".into(),
        timeseries_id: typical.id.clone(),
        cost_to_base_year: 365.0,
    };

    TimeScales {
        periods: indexmap! { period.id.clone() => period },
        timeseries: indexmap! { peak.id.clone() => peak, typical.id.clone() => typical },
        timepoints: indexmap! { tp1.id.clone() => tp1, tp2.id.clone() => tp2 },
    }
}

#[fixture]
pub fn load_zones() -> LoadZoneMap {
    ["Z1", "Z2"]
        .into_iter()
        .map(|id| {
            (
                id.into(),
                LoadZone {
                    id: id.into(),
                    description: String::new(),
                },
            )
        })
        .collect()
}

#[fixture]
pub fn energy_sources() -> EnergySourceMap {
    [("LSFO", true), ("diesel", true), ("wind", false)]
        .into_iter()
        .map(|(id, is_fuel)| {
            (
                id.into(),
                EnergySource {
                    id: id.into(),
                    is_fuel,
                },
            )
        })
        .collect()
}

#[fixture]
pub fn oil_project() -> Project {
    Project {
        id: "oil_plant".into(),
        technology: "CC".into(),
        load_zone_id: "Z1".into(),
        energy_sources: vec!["LSFO".into(), "diesel".into()],
        uses_fuel: true,
        connect_cost_per_mw: 100.0,
    }
}

#[fixture]
pub fn wind_project() -> Project {
    Project {
        id: "wind_farm".into(),
        technology: "Wind".into(),
        load_zone_id: "Z2".into(),
        energy_sources: vec!["wind".into()],
        uses_fuel: false,
        connect_cost_per_mw: 0.0,
    }
}

#[fixture]
pub fn projects(oil_project: Project, wind_project: Project) -> ProjectMap {
    indexmap! {
        oil_project.id.clone() => oil_project,
        wind_project.id.clone() => wind_project,
    }
}

#[fixture]
pub fn decision_variables() -> DecisionVariables {
    let oil = || ProjectID::new("oil_plant");
    let wind = || ProjectID::new("wind_farm");
    let demand = ZoneComponent {
        direction: ComponentDirection::Consume,
        values: [
            (("Z1".into(), "tp1".into()), 90.0),
            (("Z2".into(), "tp2".into()), 40.0),
        ]
        .into_iter()
        .collect(),
    };

    DecisionVariables {
        capacity: [((oil(), "2020".into()), 200.0), ((wind(), "2020".into()), 50.0)]
            .into_iter()
            .collect(),
        build: iter::once(((oil(), "2020".into()), 100.0)).collect(),
        overnight_cost: iter::once(((oil(), "2020".into()), 1000.0)).collect(),
        dispatch: [((oil(), "tp1".into()), 100.0), ((wind(), "tp2".into()), 30.0)]
            .into_iter()
            .collect(),
        dispatch_upper_limit: [((oil(), "tp1".into()), 200.0), ((wind(), "tp2".into()), 45.0)]
            .into_iter()
            .collect(),
        fuel_use_rate: [
            ((oil(), "tp1".into(), "LSFO".into()), 3.0),
            ((oil(), "tp1".into(), "diesel".into()), 1.0),
        ]
        .into_iter()
        .collect(),
        zone_components: indexmap! { "lz_demand_mw".into() => demand },
        energy_balance_duals: iter::once((("Z1".into(), "tp1".into()), 50.0)).collect(),
    }
}

#[fixture]
pub fn batteries() -> Batteries {
    Batteries {
        parameters: BatteryParameters {
            max_discharge: 0.9,
            min_discharge_time: 6.0,
        },
        capacity_mwh: z1_2020_value(120.0),
        build_mwh: z1_2020_value(60.0),
        capital_cost_per_mwh: z1_2020_value(300.0),
    }
}

#[fixture]
pub fn subsystems(batteries: Batteries) -> Subsystems {
    let hydrogen = Hydrogen {
        parameters: HydrogenParameters {
            electrolyzer_capital_cost_per_mw: 1000.0,
            liquifier_capital_cost_per_kg_per_hour: 50.0,
            liquid_tank_capital_cost_per_kg: 2.0,
            fuel_cell_capital_cost_per_mw: 1500.0,
        },
        build_electrolyzer_mw: z1_2020_value(5.0),
        build_liquifier_kg_per_hour: z1_2020_value(10.0),
        build_liquid_tank_kg: z1_2020_value(1000.0),
        build_fuel_cell_mw: z1_2020_value(2.0),
        fuel_cell_capacity_mw: z1_2020_value(2.0),
    };

    let tier = |name: &str| -> SupplyTierKey {
        ("Oahu_LNG".into(), "2020".into(), name.into())
    };
    let fuel_markets = FuelMarkets {
        markets: IndexSet::from_iter(["Oahu_LNG".into()]),
        tiers: indexmap! {
            tier("tier1") => SupplyTier { consumption: 10.0, cost: 5.0 },
            tier("tier2") => SupplyTier { consumption: 4.0, cost: 8.0 },
        },
    };

    let electric_vehicles = ElectricVehicles {
        vehicle_count: z1_2020_value(1000.0),
        ev_share: z1_2020_value(0.25),
        extra_capital_recovery: iter::once(("2020".into(), 500.0)).collect(),
        ice_fuel_cost: iter::once(("2020".into(), 800.0)).collect(),
    };

    let per_period = |value: f64| -> SparseMap<PeriodID> {
        iter::once(("2020".into(), value)).collect()
    };
    Subsystems {
        batteries: Some(batteries),
        pumped_hydro: Some(PumpedHydro {
            capacity_mw: z1_2020_value(30.0),
            build_mw: z1_2020_value(30.0),
            capital_cost_per_mw: z1_2020_value(2000.0),
        }),
        hydrogen: Some(hydrogen),
        rps: Some(RenewablePortfolioStandard {
            eligible_mwh: per_period(300.0),
            fuel_mwh: per_period(60.0),
            total_mwh: per_period(1000.0),
        }),
        fuel_markets: Some(fuel_markets),
        fuel_market_expansion: Some(per_period(1234.0)),
        tier_activation: Some(indexmap! { tier("tier1") => 1.0, tier("tier2") => 0.0 }),
        electric_vehicles: Some(electric_vehicles),
    }
}

#[fixture]
pub fn solved_model(
    model_parameters: ModelParameters,
    time_scales: TimeScales,
    load_zones: LoadZoneMap,
    energy_sources: EnergySourceMap,
    projects: ProjectMap,
    decision_variables: DecisionVariables,
) -> SolvedModel {
    SolvedModel::new(
        model_parameters,
        time_scales,
        load_zones,
        energy_sources,
        projects,
        decision_variables,
        Subsystems::default(),
    )
    .unwrap()
}

#[fixture]
pub fn solved_model_with_subsystems(
    model_parameters: ModelParameters,
    time_scales: TimeScales,
    load_zones: LoadZoneMap,
    energy_sources: EnergySourceMap,
    projects: ProjectMap,
    decision_variables: DecisionVariables,
    subsystems: Subsystems,
) -> SolvedModel {
    SolvedModel::new(
        model_parameters,
        time_scales,
        load_zones,
        energy_sources,
        projects,
        decision_variables,
        subsystems,
    )
    .unwrap()
}
