//! Common functionality for gridreport.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod allocate;
pub mod cli;
pub mod finance;
pub mod id;
pub mod input;
pub mod log;
pub mod model;
pub mod output;
pub mod project;
pub mod report;
pub mod settings;
pub mod sparse;
pub mod timescale;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get config dir for program.
///
/// This is a platform-dependent location, e.g. `~/.config/gridreport` on Linux.
pub fn get_gridreport_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No config dir on this platform; fall back to the current directory
        return PathBuf::from(".");
    };
    config_dir.push("gridreport");

    config_dir
}
