//! The single-row summary report: headline costs and renewable shares.
use super::{Header, ReportContext, Table, Value};
use crate::allocate::proportion;
use crate::model::subsystem::RenewablePortfolioStandard;
use crate::model::{SolvedModel, Subsystem};
use crate::sparse::SparseMap;
use crate::timescale::PeriodID;
use anyhow::Result;

/// Build the summary report
pub fn build(name: &str, ctx: &ReportContext) -> Result<Table> {
    let model = ctx.model;
    let periods = model.time.periods.keys();
    let rps = model.subsystems.rps.as_ref();

    let header = Header::new([
        "scenario",
        "max_demand_response_share",
        "total_cost",
        "cost_per_kwh",
    ])
    .extend(periods.clone().map(|p| format!("cost_per_kwh_{p}")))
    .extend_if(
        model.has(Subsystem::RenewablePortfolioStandard),
        share_columns("renewable_share", model).chain(share_columns("biofuel_share", model)),
    );

    Table::build(name, header, (), |()| {
        let mut row: Vec<Value> = vec![
            ctx.scenario.into(),
            model.parameters.demand_response_max_share.into(),
        ];

        let total_cost = model.total_system_cost();
        row.push(total_cost.into());
        let all_demand = model.discounted_demand_kwh(model.time.timepoints.values());
        row.push(proportion(total_cost, all_demand).into());
        row.extend(model.time.periods.values().map(|period| {
            let timepoints = model.time.iter_timepoints_in_period(&period.id);
            let demand = model.discounted_demand_kwh(timepoints);
            Value::from(proportion(period.system_cost, demand))
        }));

        if let Some(rps) = rps {
            row.extend(shares(model, rps, &rps.eligible_mwh));
            row.extend(shares(model, rps, &rps.fuel_mwh));
        }

        row
    })
}

/// Column names for a share over all years followed by a share for each period
fn share_columns<'a>(
    prefix: &'a str,
    model: &'a SolvedModel,
) -> impl Iterator<Item = String> + 'a {
    std::iter::once(format!("{prefix}_all_years")).chain(
        model
            .time
            .periods
            .keys()
            .map(move |period_id| format!("{prefix}_{period_id}")),
    )
}

/// The share of total RPS-counted generation made up by `part`, over all years and per period
fn shares(
    model: &SolvedModel,
    rps: &RenewablePortfolioStandard,
    part: &SparseMap<PeriodID>,
) -> Vec<Value> {
    let periods = model.time.periods.keys();
    let part_total: f64 = periods.clone().map(|p| part.get(p)).sum();
    let total: f64 = periods.clone().map(|p| rps.total_mwh.get(p)).sum();

    std::iter::once(proportion(part_total, total))
        .chain(periods.map(|p| proportion(part.get(p), rps.total_mwh.get(p))))
        .map(Value::from)
        .collect()
}
