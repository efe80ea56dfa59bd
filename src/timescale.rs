//! Investment periods and the sampled timepoints used for dispatch within them.
//!
//! Each period contains one or more timeseries, each of which is a contiguous block of
//! timepoints representing a sampled operating condition (e.g. a typical or a peak day).
use crate::id::{define_id_getter, define_id_type};
use indexmap::IndexMap;
use std::fmt;

define_id_type! {PeriodID}
define_id_type! {TimeseriesID}
define_id_type! {TimepointID}

/// A map of [`Period`]s, keyed by period ID
pub type PeriodMap = IndexMap<PeriodID, Period>;

/// A map of [`Timeseries`], keyed by timeseries ID
pub type TimeseriesMap = IndexMap<TimeseriesID, Timeseries>;

/// A map of [`Timepoint`]s, keyed by timepoint ID
pub type TimepointMap = IndexMap<TimepointID, Timepoint>;

/// A multi-year investment stage
#[derive(PartialEq, Debug, Clone)]
pub struct Period {
    /// Unique identifier for the period (e.g. "2030")
    pub id: PeriodID,
    /// The first year of the period
    pub start_year: u32,
    /// Number of years covered by the period
    pub length_years: u32,
    /// Total system cost incurred in this period, discounted to the base financial year
    pub system_cost: f64,
}
define_id_getter! {Period, PeriodID}

/// A block of timepoints within one period representing a sampled operating condition
#[derive(PartialEq, Debug, Clone)]
pub struct Timeseries {
    /// Unique identifier for the timeseries
    pub id: TimeseriesID,
    /// The period this timeseries belongs to
    pub period_id: PeriodID,
    /// How many real hours one sampled timepoint represents in a year
    pub scale_to_year: f64,
}
define_id_getter! {Timeseries, TimeseriesID}

/// The smallest unit of time; dispatch decisions are made per timepoint
#[derive(PartialEq, Debug, Clone)]
pub struct Timepoint {
    /// Unique identifier for the timepoint
    pub id: TimepointID,
    /// Human-readable label (e.g. "2030-01-15 18:00")
    pub timestamp: String,
    /// The timeseries this timepoint belongs to
    pub timeseries_id: TimeseriesID,
    /// Factor converting a cost incurred at this timepoint to the base financial year
    pub cost_to_base_year: f64,
}
define_id_getter! {Timepoint, TimepointID}

/// Whether a timeseries represents an extreme or an ordinary operating condition
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum DayType {
    /// Represents fewer real hours per sample than average, i.e. a rarer condition
    Peak,
    /// Represents at least the average number of hours per sample
    Typical,
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Peak => write!(f, "peak"),
            Self::Typical => write!(f, "typical"),
        }
    }
}

/// All the time-related index sets of a model
#[derive(PartialEq, Debug, Default)]
pub struct TimeScales {
    /// Investment periods, in chronological order
    pub periods: PeriodMap,
    /// Timeseries
    pub timeseries: TimeseriesMap,
    /// Timepoints
    pub timepoints: TimepointMap,
}

impl TimeScales {
    /// Get the period containing the given timepoint.
    ///
    /// Panics if the timepoint is unknown: references are checked when the model is loaded.
    pub fn period_of(&self, timepoint: &Timepoint) -> &Period {
        let timeseries = &self.timeseries[&timepoint.timeseries_id];
        &self.periods[&timeseries.period_id]
    }

    /// Iterate over the timepoints which fall within the given period
    pub fn iter_timepoints_in_period<'a>(
        &'a self,
        period_id: &'a PeriodID,
    ) -> impl Iterator<Item = &'a Timepoint> {
        self.timepoints
            .values()
            .filter(move |tp| self.timeseries[&tp.timeseries_id].period_id == *period_id)
    }

    /// The arithmetic mean of `scale_to_year` over all timeseries
    pub fn mean_scale_to_year(&self) -> f64 {
        if self.timeseries.is_empty() {
            return 0.0;
        }

        let total: f64 = self.timeseries.values().map(|ts| ts.scale_to_year).sum();
        #[allow(clippy::cast_precision_loss)]
        let count = self.timeseries.len() as f64;
        total / count
    }

    /// Classify the timeseries of a timepoint as peak or typical.
    ///
    /// A timeseries whose scale-to-year factor is strictly below `mean_scale` is a peak; a tie
    /// with the mean counts as typical.
    pub fn day_type(&self, timepoint: &Timepoint, mean_scale: f64) -> DayType {
        if self.timeseries[&timepoint.timeseries_id].scale_to_year < mean_scale {
            DayType::Peak
        } else {
            DayType::Typical
        }
    }
}
