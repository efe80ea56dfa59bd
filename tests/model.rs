//! Integration tests for loading the demo model.
use gridreport::input::load_model;
use gridreport::model::Subsystem;
use std::path::{Path, PathBuf};

/// Get the path to the demo model.
fn get_model_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join("simple")
}

/// An integration test which loads the demo model
#[test]
fn test_load_model() {
    let model = load_model(get_model_dir()).unwrap();

    let sets = model.sets();
    assert_eq!(sets["periods"], ["2025", "2030"]);
    assert_eq!(sets["load_zones"], ["Oahu", "Maui"]);
    assert_eq!(sets["timepoints"].len(), 8);
    assert_eq!(sets["projects"].len(), 5);
    assert_eq!(sets["fuels"], ["LSFO", "ULSD", "LNG"]);

    assert!(model.has(Subsystem::Batteries));
    assert!(model.has(Subsystem::RegionalFuelMarkets));
    assert!(model.has(Subsystem::SupplyTierActivation));
    assert!(!model.has(Subsystem::Hydrogen));
    assert!(!model.has(Subsystem::ElectricVehicles));
}
