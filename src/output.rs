//! The module responsible for writing reports and run metadata to disk.
use crate::model::SolvedModel;
use crate::report::{ReportContext, ReportKind};
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

pub mod metadata;

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "gridreport_results";

/// The file extension for report files
const REPORT_FILE_EXTENSION: &str = "tsv";

/// Where and under which scenario name reports are written
#[derive(PartialEq, Debug, Clone)]
pub struct ReportOptions {
    /// Directory in which report files are created
    pub output_dir: PathBuf,
    /// Optional tag appended to report file names and written in the summary report
    pub scenario_name: Option<String>,
}

impl ReportOptions {
    /// The scenario tag, or an empty string if there is none
    pub fn scenario(&self) -> &str {
        self.scenario_name.as_deref().unwrap_or_default()
    }

    /// Path to the file for the named report
    pub fn report_path(&self, report_name: &str) -> PathBuf {
        self.output_dir
            .join(report_file_name(report_name, self.scenario_name.as_deref()))
    }
}

/// The file name for a report, e.g. `summary.tsv` or `summary_high_fuel.tsv`
pub fn report_file_name(report_name: &str, scenario_name: Option<&str>) -> String {
    match scenario_name {
        Some(scenario) if !scenario.is_empty() => {
            format!("{report_name}_{scenario}.{REPORT_FILE_EXTENSION}")
        }
        _ => format!("{report_name}.{REPORT_FILE_EXTENSION}"),
    }
}

/// Get the default output directory for the model in the specified directory
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Canonicalise in case the user has specified "."
    let model_dir = model_dir
        .canonicalize()
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create the output directory, with parents.
///
/// # Arguments
///
/// * `output_dir` - The directory to create
/// * `allow_overwrite` - Whether an existing, non-empty directory may be emptied and reused
///
/// # Returns
///
/// Whether an existing directory is being overwritten, or an error if the directory is not empty
/// and `allow_overwrite` is false
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if output_dir.is_dir() {
        if output_dir.read_dir()?.next().is_none() {
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Build and write every applicable report for the solved model.
///
/// Each report is built and written independently: a failure is logged and the remaining
/// reports are still written.
///
/// # Returns
///
/// An error naming the reports which could not be written, if any
pub fn write_reports(model: &SolvedModel, opts: &ReportOptions) -> Result<()> {
    let ctx = ReportContext::new(model, opts.scenario());

    let mut failed = Vec::new();
    for kind in ReportKind::iter().filter(|kind| kind.is_applicable(model)) {
        let file_path = opts.report_path(&kind.to_string());
        let result = kind.build(&ctx).and_then(|table| {
            table.write_tsv(&file_path)?;
            Ok(table)
        });

        match result {
            Ok(table) => info!(
                "Wrote {} ({} rows) to {}",
                table.name(),
                table.rows().len(),
                file_path.display()
            ),
            Err(err) => {
                error!("Failed to write {kind} report: {err:?}");
                failed.push(kind);
            }
        }
    }

    ensure!(
        failed.is_empty(),
        "Failed to write reports: {}",
        failed.iter().join(", ")
    );

    Ok(())
}
