//! Installed capacity for each load zone and period, grouped by technology or energy source.
use super::{Header, ReportContext, Table, Value};
use crate::model::Subsystem;
use crate::project::Project;
use anyhow::Result;
use itertools::Itertools;

/// Build the capacity report grouped by technology
pub fn build_by_technology(name: &str, ctx: &ReportContext) -> Result<Table> {
    let groups = ctx.built.technologies.iter().map(ToString::to_string);
    build_grouped(name, ctx, groups.collect(), |project| {
        project.technology.to_string()
    })
}

/// Build the capacity report grouped by energy source label
pub fn build_by_energy_source(name: &str, ctx: &ReportContext) -> Result<Table> {
    let groups = ctx.built.energy_sources.iter().cloned().collect();
    build_grouped(name, ctx, groups, Project::energy_source_label)
}

/// Build a capacity report with one column per group of built projects.
///
/// A project's capacity only counts towards a period in which it is dispatched.
fn build_grouped<F>(
    name: &str,
    ctx: &ReportContext,
    groups: Vec<String>,
    group_of: F,
) -> Result<Table>
where
    F: Fn(&Project) -> String,
{
    let model = ctx.model;
    let subsystems = &model.subsystems;
    let header = Header::new(["load_zone", "period"])
        .extend(groups.iter().cloned())
        .extend_if(model.has(Subsystem::PumpedHydro), ["hydro"])
        .extend_if(model.has(Subsystem::Batteries), ["batteries"])
        .extend_if(model.has(Subsystem::Hydrogen), ["fuel cells"]);

    let zones = model.load_zones.keys().collect_vec();
    let periods = model.time.periods.keys().collect_vec();

    Table::build(name, header, (&zones[..], &periods[..]), |(zone_id, period_id)| {
        let mut row = vec![Value::text(*zone_id), Value::text(*period_id)];

        let in_zone = ctx
            .built
            .projects_in_zone(zone_id)
            .filter(|project| ctx.built.is_operating(&project.id, period_id))
            .map(|project| (group_of(project), project))
            .collect_vec();
        row.extend(groups.iter().map(|group| {
            let capacity: f64 = in_zone
                .iter()
                .filter(|(project_group, _)| project_group == group)
                .map(|(_, project)| {
                    model
                        .variables
                        .capacity
                        .get(&(project.id.clone(), (*period_id).clone()))
                })
                .sum();
            Value::from(capacity)
        }));

        let key = ((*zone_id).clone(), (*period_id).clone());
        if let Some(hydro) = &subsystems.pumped_hydro {
            row.push(hydro.capacity_mw.get(&key).into());
        }
        if let Some(batteries) = &subsystems.batteries {
            row.push(batteries.capacity_mw(&key).into());
        }
        if let Some(hydrogen) = &subsystems.hydrogen {
            row.push(hydrogen.fuel_cell_capacity_mw.get(&key).into());
        }

        row
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{
        batteries, decision_variables, energy_sources, load_zones, model_parameters, oil_project,
        projects, solved_model, solved_model_with_subsystems, subsystems, time_scales,
        wind_project,
    };
    use crate::model::SolvedModel;
    use crate::model::subsystem::Batteries;
    use crate::sparse::SparseMap;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn float(table: &Table, row: usize, column: &str) -> f64 {
        match table.get(row, column) {
            Some(Value::Float(value)) => *value,
            value => panic!("Unexpected value for {column}: {value:?}"),
        }
    }

    #[rstest]
    fn test_capacity_by_technology(solved_model: SolvedModel) {
        let ctx = ReportContext::new(&solved_model, "");
        let table = build_by_technology("capacity_by_technology", &ctx).unwrap();
        assert_eq!(
            table.header().iter().collect_vec(),
            ["load_zone", "period", "CC", "Wind"]
        );
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.get(0, "load_zone"), Some(&Value::text("Z1")));
        assert_eq!(float(&table, 0, "CC"), 200.0);
        assert_eq!(float(&table, 0, "Wind"), 0.0);
        assert_eq!(float(&table, 1, "CC"), 0.0);
        assert_eq!(float(&table, 1, "Wind"), 50.0);
    }

    #[rstest]
    fn test_capacity_by_energy_source(solved_model: SolvedModel) {
        let ctx = ReportContext::new(&solved_model, "");
        let table = build_by_energy_source("capacity_by_energy_source", &ctx).unwrap();
        assert_eq!(
            table.header().iter().collect_vec(),
            ["load_zone", "period", "LSFO/diesel", "wind"]
        );
        assert_eq!(float(&table, 0, "LSFO/diesel"), 200.0);
        assert_eq!(float(&table, 1, "wind"), 50.0);
    }

    #[rstest]
    fn test_capacity_not_operating(mut solved_model: SolvedModel) {
        solved_model.variables.dispatch = SparseMap::new();
        let ctx = ReportContext::new(&solved_model, "");
        let table = build_by_technology("capacity_by_technology", &ctx).unwrap();

        // Still built, so the columns remain
        assert_eq!(table.header().len(), 4);
        assert_eq!(float(&table, 0, "CC"), 0.0);
        assert_eq!(float(&table, 1, "Wind"), 0.0);
    }

    #[rstest]
    fn test_capacity_with_subsystems(solved_model_with_subsystems: SolvedModel) {
        let ctx = ReportContext::new(&solved_model_with_subsystems, "");
        let table = build_by_technology("capacity_by_technology", &ctx).unwrap();
        assert_eq!(
            table.header().iter().skip(4).collect_vec(),
            ["hydro", "batteries", "fuel cells"]
        );
        assert_eq!(float(&table, 0, "hydro"), 30.0);
        assert_approx_eq!(f64, float(&table, 0, "batteries"), 18.0);
        assert_eq!(float(&table, 0, "fuel cells"), 2.0);
        assert_eq!(float(&table, 1, "batteries"), 0.0);
    }

    #[rstest]
    fn test_absent_batteries_match_zero_batteries() {
        let build = |battery_data: Option<Batteries>| {
            let mut subsystems = subsystems(batteries());
            subsystems.batteries = battery_data;
            SolvedModel::new(
                model_parameters(),
                time_scales(),
                load_zones(),
                energy_sources(),
                projects(oil_project(), wind_project()),
                decision_variables(),
                subsystems,
            )
            .unwrap()
        };
        let zero_batteries = Batteries {
            capacity_mwh: SparseMap::new(),
            build_mwh: SparseMap::new(),
            capital_cost_per_mwh: SparseMap::new(),
            ..batteries()
        };
        let absent = build(None);
        let zero = build(Some(zero_batteries));
        let absent_ctx = ReportContext::new(&absent, "");
        let zero_ctx = ReportContext::new(&zero, "");
        let absent_table = build_by_technology("capacity_by_technology", &absent_ctx).unwrap();
        let zero_table = build_by_technology("capacity_by_technology", &zero_ctx).unwrap();

        assert!(absent_table.header().position("batteries").is_none());
        assert!(
            zero_table
                .column("batteries")
                .unwrap()
                .all(|value| *value == Value::Float(0.0))
        );
        for column in absent_table.header().iter() {
            assert!(
                absent_table
                    .column(column)
                    .unwrap()
                    .eq(zero_table.column(column).unwrap())
            );
        }
    }
}
