//! Sets of built projects, technologies and energy sources shared by the capacity and cost
//! reports.
use crate::model::SolvedModel;
use crate::project::{LoadZoneID, Project, ProjectID, TechnologyID};
use crate::timescale::PeriodID;
use indexmap::IndexSet;
use std::collections::HashSet;

/// Capacity (MW) above which a project counts as built
pub const BUILT_CAPACITY_THRESHOLD: f64 = 0.001;

/// Dispatch (MW) above which a project counts as operating
pub const OPERATING_DISPATCH_THRESHOLD: f64 = 0.001;

/// Projects with built capacity, and the technologies and energy sources they use
#[derive(Debug)]
pub struct BuiltSets<'a> {
    /// Projects with capacity in any period, in input order
    pub projects: Vec<&'a Project>,
    /// Technologies of built projects, in order of first appearance
    pub technologies: IndexSet<TechnologyID>,
    /// Energy source labels of built projects, in order of first appearance
    pub energy_sources: IndexSet<String>,
    operating: HashSet<(ProjectID, PeriodID)>,
}

impl<'a> BuiltSets<'a> {
    /// Derive the built sets from the solved capacity and dispatch
    pub fn new(model: &'a SolvedModel) -> Self {
        let vars = &model.variables;
        let projects: Vec<_> = model
            .projects
            .values()
            .filter(|project| {
                model.time.periods.keys().any(|period_id| {
                    vars.capacity.get(&(project.id.clone(), period_id.clone()))
                        > BUILT_CAPACITY_THRESHOLD
                })
            })
            .collect();

        let operating = vars
            .dispatch
            .iter()
            .filter(|(_, dispatch)| *dispatch > OPERATING_DISPATCH_THRESHOLD)
            .map(|((project_id, timepoint_id), _)| {
                let timepoint = &model.time.timepoints[timepoint_id];
                (project_id.clone(), model.time.period_of(timepoint).id.clone())
            })
            .collect();

        let technologies = projects.iter().map(|p| p.technology.clone()).collect();
        let energy_sources = projects.iter().map(|p| p.energy_source_label()).collect();

        Self {
            projects,
            technologies,
            energy_sources,
            operating,
        }
    }

    /// Whether the project is dispatched at any timepoint in the period
    pub fn is_operating(&self, project_id: &ProjectID, period_id: &PeriodID) -> bool {
        self.operating
            .contains(&(project_id.clone(), period_id.clone()))
    }

    /// Iterate over the built projects in the given load zone
    pub fn projects_in_zone<'b>(
        &'b self,
        zone_id: &'b LoadZoneID,
    ) -> impl Iterator<Item = &'a Project> + 'b {
        self.projects
            .iter()
            .copied()
            .filter(move |project| project.load_zone_id == *zone_id)
    }
}
