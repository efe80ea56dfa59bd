//! Capacity additions, capital costs and annual costs for each load zone and period.
use super::{Header, ReportContext, Table, Value};
use crate::model::Subsystem;
use crate::project::Project;
use crate::timescale::PeriodID;
use anyhow::Result;
use itertools::Itertools;

const BATTERY_BUILD_COLUMNS: [&str; 2] = ["batteries_mw_added", "batteries_mwh_added"];
const HYDROGEN_BUILD_COLUMNS: [&str; 4] = [
    "h2_electrolyzer_mw_added",
    "h2_liquifier_kg_per_hour_added",
    "liquid_h2_tank_kg_added",
    "fuel_cell_mw_added",
];
const HYDROGEN_COST_COLUMNS: [&str; 4] = [
    "h2_electrolyzer_overnight_cost",
    "h2_liquifier_overnight_cost",
    "liquid_h2_tank_overnight_cost",
    "fuel_cell_overnight_cost",
];
const EV_COUNT_COLUMNS: [&str; 2] = ["ev_count", "ice_count"];
const EV_COST_COLUMNS: [&str; 2] = ["ev_extra_capital_recovery", "ice_annual_fuel_cost"];

/// Build the cost breakdown report
pub fn build(name: &str, ctx: &ReportContext) -> Result<Table> {
    let model = ctx.model;
    let subsystems = &model.subsystems;
    let technologies = &ctx.built.technologies;
    let markets = subsystems
        .fuel_markets
        .iter()
        .flat_map(|fuel_markets| fuel_markets.markets.iter())
        .collect_vec();

    let header = Header::new(["load_zone", "period"])
        .extend(technologies.iter().map(|t| format!("{t}_mw_added")))
        .extend_if(model.has(Subsystem::Batteries), BATTERY_BUILD_COLUMNS)
        .extend_if(model.has(Subsystem::PumpedHydro), ["hydro_mw_added"])
        .extend_if(model.has(Subsystem::Hydrogen), HYDROGEN_BUILD_COLUMNS)
        .extend_if(model.has(Subsystem::ElectricVehicles), EV_COUNT_COLUMNS)
        .extend(technologies.iter().map(|t| format!("{t}_overnight_cost")))
        .extend_if(model.has(Subsystem::Batteries), ["batteries_overnight_cost"])
        .extend_if(model.has(Subsystem::PumpedHydro), ["hydro_overnight_cost"])
        .extend_if(model.has(Subsystem::Hydrogen), HYDROGEN_COST_COLUMNS)
        .extend(markets.iter().map(|market| format!("{market}_annual_cost")))
        .extend_if(
            model.has(Subsystem::FuelMarketExpansion),
            ["fuel_market_expansion_annual_cost"],
        )
        .extend(["total_electricity_cost"])
        .extend_if(model.has(Subsystem::ElectricVehicles), EV_COST_COLUMNS);

    let zones = model.load_zones.keys().collect_vec();
    let periods = model.time.periods.values().collect_vec();

    Table::build(name, header, (&zones[..], &periods[..]), |(zone_id, period)| {
        let key = ((*zone_id).clone(), period.id.clone());
        let in_zone = ctx.built.projects_in_zone(zone_id).collect_vec();
        let by_technology = technologies
            .iter()
            .map(|technology| {
                in_zone
                    .iter()
                    .copied()
                    .filter(|project| project.technology == *technology)
                    .collect_vec()
            })
            .collect_vec();

        let mut row = vec![Value::text(*zone_id), Value::text(&period.id)];

        // Capacity added
        row.extend(by_technology.iter().map(|projects| {
            let added: f64 = projects
                .iter()
                .map(|project| build_mw(ctx, project, &period.id))
                .sum();
            Value::from(added)
        }));
        if let Some(batteries) = &subsystems.batteries {
            row.push(batteries.build_mw(&key).into());
            row.push(batteries.build_mwh.get(&key).into());
        }
        if let Some(hydro) = &subsystems.pumped_hydro {
            row.push(hydro.build_mw.get(&key).into());
        }
        if let Some(hydrogen) = &subsystems.hydrogen {
            row.extend(hydrogen.builds(&key).map(Value::from));
        }
        if let Some(evs) = &subsystems.electric_vehicles {
            row.push(evs.ev_count(&key).into());
            row.push(evs.ice_count(&key).into());
        }

        // Capital investments
        row.extend(by_technology.iter().map(|projects| {
            let cost: f64 = projects
                .iter()
                .map(|project| {
                    let overnight_cost = model
                        .variables
                        .overnight_cost
                        .get(&(project.id.clone(), period.id.clone()));
                    build_mw(ctx, project, &period.id)
                        * (overnight_cost + project.connect_cost_per_mw)
                })
                .sum();
            Value::from(cost)
        }));
        if let Some(batteries) = &subsystems.batteries {
            row.push(batteries.overnight_cost(&key).into());
        }
        if let Some(hydro) = &subsystems.pumped_hydro {
            row.push(hydro.overnight_cost(&key).into());
        }
        if let Some(hydrogen) = &subsystems.hydrogen {
            row.extend(hydrogen.overnight_costs(&key).map(Value::from));
        }

        // Annual costs
        if let Some(fuel_markets) = &subsystems.fuel_markets {
            row.extend(
                markets
                    .iter()
                    .map(|market| Value::from(fuel_markets.annual_cost(market, &period.id))),
            );
        }
        if let Some(expansion) = &subsystems.fuel_market_expansion {
            row.push(expansion.get(&period.id).into());
        }
        row.push(
            model
                .annualize_period_cost(period, period.system_cost)
                .value()
                .into(),
        );
        if let Some(evs) = &subsystems.electric_vehicles {
            row.push(evs.extra_capital_recovery.get(&period.id).into());
            row.push(evs.ice_fuel_cost.get(&period.id).into());
        }

        row
    })
}

/// Capacity of the project built in the period (MW)
fn build_mw(ctx: &ReportContext, project: &Project, period_id: &PeriodID) -> f64 {
    ctx.model
        .variables
        .build
        .get(&(project.id.clone(), period_id.clone()))
}
