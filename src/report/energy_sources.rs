//! Dispatch by energy source for each load zone and timepoint.
use super::{Header, ReportContext, Table, Value};
use crate::allocate::proportion;
use crate::model::variables::ComponentDirection;
use crate::project::ProjectID;
use anyhow::Result;
use itertools::Itertools;

/// Build the energy sources report
pub fn build(name: &str, ctx: &ReportContext) -> Result<Table> {
    let model = ctx.model;
    let vars = &model.variables;
    let fuels = model.iter_fuels().map(|s| &s.id).collect_vec();
    let non_fuel_sources = model.iter_non_fuel_sources().map(|s| &s.id).collect_vec();
    let produce = vars
        .iter_components(ComponentDirection::Produce)
        .collect_vec();
    let consume = vars
        .iter_components(ComponentDirection::Consume)
        .collect_vec();

    let header = Header::new(["load_zone", "period", "timepoint_label"])
        .extend(fuels.iter().map(ToString::to_string))
        .extend(non_fuel_sources.iter().map(ToString::to_string))
        .extend(non_fuel_sources.iter().map(|s| format!("curtail_{s}")))
        .extend(produce.iter().map(|(id, _)| id.to_string()))
        .extend(consume.iter().map(|(id, _)| id.to_string()))
        .extend(["marginal_cost", "peak_day"]);

    let zones = model.load_zones.keys().collect_vec();
    let timepoints = model.time.timepoints.values().collect_vec();
    let mean_scale = model.time.mean_scale_to_year();

    // Dispatch by source covers the whole system and is repeated on each zone's rows
    let projects = model.projects.values().collect_vec();
    let by_source = non_fuel_sources
        .iter()
        .map(|&source| {
            projects
                .iter()
                .filter(|p| p.non_fuel_source() == Some(source))
                .collect_vec()
        })
        .collect_vec();

    Table::build(name, header, (&zones[..], &timepoints[..]), |(zone_id, tp)| {
        let key = |project_id: &ProjectID| (project_id.clone(), tp.id.clone());

        let mut row = vec![
            Value::text(*zone_id),
            Value::text(&model.time.period_of(tp).id),
            Value::text(&tp.timestamp),
        ];

        row.extend(fuels.iter().map(|fuel| {
            let dispatch: f64 = projects
                .iter()
                .filter(|p| p.fuels().contains(fuel))
                .map(|p| model.dispatch_by_fuel(p, &tp.id, fuel))
                .sum();
            Value::from(dispatch)
        }));
        row.extend(by_source.iter().map(|projects| {
            let dispatch: f64 = projects
                .iter()
                .map(|p| vars.dispatch.get(&key(&p.id)))
                .sum();
            Value::from(dispatch)
        }));
        row.extend(by_source.iter().map(|projects| {
            let curtailment: f64 = projects
                .iter()
                .map(|p| {
                    let key = key(&p.id);
                    vars.dispatch_upper_limit.get(&key) - vars.dispatch.get(&key)
                })
                .sum();
            Value::from(curtailment)
        }));

        let zone_key = ((*zone_id).clone(), tp.id.clone());
        row.extend(
            produce
                .iter()
                .chain(consume.iter())
                .map(|(_, component)| Value::from(component.values.get(&zone_key))),
        );

        let dual = vars.energy_balance_duals.get(&zone_key);
        row.push(proportion(dual, tp.cost_to_base_year).into());
        row.push(Value::text(&model.time.day_type(tp, mean_scale)));

        row
    })
}
