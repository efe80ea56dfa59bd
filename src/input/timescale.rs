//! Code for reading periods, timeseries and timepoints from CSV files.
use super::*;
use crate::id::IDCollection;
use crate::timescale::{
    Period, PeriodMap, TimeScales, Timepoint, TimepointMap, Timeseries, TimeseriesMap,
};
use serde::Deserialize;
use std::path::Path;

const PERIODS_FILE_NAME: &str = "periods.csv";
const TIMESERIES_FILE_NAME: &str = "timeseries.csv";
const TIMEPOINTS_FILE_NAME: &str = "timepoints.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct PeriodRaw {
    id: String,
    start_year: u32,
    length_years: u32,
    system_cost: f64,
}

#[derive(PartialEq, Debug, Deserialize)]
struct TimeseriesRaw {
    id: String,
    period: String,
    scale_to_year: f64,
}

#[derive(PartialEq, Debug, Deserialize)]
struct TimepointRaw {
    id: String,
    timestamp: String,
    timeseries: String,
    cost_to_base_year: f64,
}

/// Read periods, timeseries and timepoints from the model directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing the solved model files
///
/// # Returns
///
/// The time-related index sets of the model, in input order
pub fn read_time_scales(model_dir: &Path) -> Result<TimeScales> {
    let file_path = model_dir.join(PERIODS_FILE_NAME);
    let periods =
        read_periods_from_iter(read_csv(&file_path)?).with_context(|| input_err_msg(&file_path))?;

    let file_path = model_dir.join(TIMESERIES_FILE_NAME);
    let timeseries = read_timeseries_from_iter(read_csv(&file_path)?, &periods)
        .with_context(|| input_err_msg(&file_path))?;

    let file_path = model_dir.join(TIMEPOINTS_FILE_NAME);
    let timepoints = read_timepoints_from_iter(read_csv(&file_path)?, &timeseries)
        .with_context(|| input_err_msg(&file_path))?;

    Ok(TimeScales {
        periods,
        timeseries,
        timepoints,
    })
}

fn read_periods_from_iter<I>(iter: I) -> Result<PeriodMap>
where
    I: Iterator<Item = PeriodRaw>,
{
    let mut periods = PeriodMap::new();
    for raw in iter {
        ensure!(
            raw.length_years > 0,
            "Period {} must be at least one year long",
            raw.id
        );
        ensure!(
            raw.system_cost.is_finite(),
            "Invalid system cost for period {}",
            raw.id
        );

        let period = Period {
            id: raw.id.into(),
            start_year: raw.start_year,
            length_years: raw.length_years,
            system_cost: raw.system_cost,
        };
        try_insert(&mut periods, period.id.clone(), period)?;
    }

    ensure!(
        is_sorted_and_unique(periods.values().map(|p| p.start_year)),
        "Periods must be in order of start year with no duplicates"
    );

    Ok(periods)
}

fn read_timeseries_from_iter<I>(iter: I, periods: &PeriodMap) -> Result<TimeseriesMap>
where
    I: Iterator<Item = TimeseriesRaw>,
{
    let mut timeseries = TimeseriesMap::new();
    for raw in iter {
        ensure!(
            raw.scale_to_year.is_finite() && raw.scale_to_year > 0.0,
            "scale_to_year for timeseries {} must be a positive number",
            raw.id
        );

        let ts = Timeseries {
            id: raw.id.into(),
            period_id: periods.get_id_by_str(&raw.period)?,
            scale_to_year: raw.scale_to_year,
        };
        try_insert(&mut timeseries, ts.id.clone(), ts)?;
    }

    Ok(timeseries)
}

fn read_timepoints_from_iter<I>(iter: I, timeseries: &TimeseriesMap) -> Result<TimepointMap>
where
    I: Iterator<Item = TimepointRaw>,
{
    let mut timepoints = TimepointMap::new();
    for raw in iter {
        ensure!(
            raw.cost_to_base_year.is_finite() && raw.cost_to_base_year >= 0.0,
            "cost_to_base_year for timepoint {} must be a non-negative number",
            raw.id
        );

        let tp = Timepoint {
            id: raw.id.into(),
            timestamp: raw.timestamp,
            timeseries_id: timeseries.get_id_by_str(&raw.timeseries)?,
            cost_to_base_year: raw.cost_to_base_year,
        };
        try_insert(&mut timepoints, tp.id.clone(), tp)?;
    }

    Ok(timepoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, time_scales};
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        writeln!(file, "{contents}").unwrap();
    }

    /// Create the time files for the `time_scales` fixture in dir_path
    fn create_time_files(dir_path: &Path) {
        write_file(
            dir_path,
            PERIODS_FILE_NAME,
            "id,start_year,length_years,system_cost\n2020,2020,10,1000000.0",
        );
        write_file(
            dir_path,
            TIMESERIES_FILE_NAME,
            "id,period,scale_to_year\npeak,2020,1.0\ntypical,2020,365.0",
        );
        write_file(
            dir_path,
            TIMEPOINTS_FILE_NAME,
            "id,timestamp,timeseries,cost_to_base_year\n\
            tp1,2020-01-15 18:00,peak,1.0\n\
            tp2,2020-06-15 12:00,typical,365.0",
        );
    }

    #[rstest]
    fn test_read_time_scales(time_scales: TimeScales) {
        let dir = tempdir().unwrap();
        create_time_files(dir.path());
        assert_eq!(read_time_scales(dir.path()).unwrap(), time_scales);
    }

    #[test]
    fn test_read_periods_unsorted() {
        let periods = [
            PeriodRaw {
                id: "2030".into(),
                start_year: 2030,
                length_years: 10,
                system_cost: 0.0,
            },
            PeriodRaw {
                id: "2020".into(),
                start_year: 2020,
                length_years: 10,
                system_cost: 0.0,
            },
        ];
        assert_error!(
            read_periods_from_iter(periods.into_iter()),
            "Periods must be in order of start year with no duplicates"
        );
    }

    #[test]
    fn test_read_periods_zero_length() {
        let periods = [PeriodRaw {
            id: "2020".into(),
            start_year: 2020,
            length_years: 0,
            system_cost: 0.0,
        }];
        assert_error!(
            read_periods_from_iter(periods.into_iter()),
            "Period 2020 must be at least one year long"
        );
    }

    #[rstest]
    fn test_read_timeseries_unknown_period(time_scales: TimeScales) {
        let timeseries = [TimeseriesRaw {
            id: "peak".into(),
            period: "2050".into(),
            scale_to_year: 1.0,
        }];
        assert_error!(
            read_timeseries_from_iter(timeseries.into_iter(), &time_scales.periods),
            "Unknown ID 2050 found"
        );
    }

    #[rstest]
    fn test_read_timepoints_duplicate(time_scales: TimeScales) {
        let raw = || TimepointRaw {
            id: "tp1".into(),
            timestamp: "noon".into(),
            timeseries: "peak".into(),
            cost_to_base_year: 1.0,
        };
        assert!(
            read_timepoints_from_iter([raw(), raw()].into_iter(), &time_scales.timeseries)
                .is_err()
        );
    }
}
