//! Defines the `ModelParameters` struct, which represents the contents of `model.toml`.
use super::subsystem::{BatteryParameters, HydrogenParameters};
use crate::input::{deserialise_proportion, input_err_msg, read_toml};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

/// Represents the contents of the entire model file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ModelParameters {
    /// The discount rate used to convert between present and future values
    pub discount_rate: f64,
    /// The year to which all costs in the solved model are discounted
    pub base_financial_year: u32,
    /// Maximum share of demand which may be shifted by demand response
    #[serde(default)]
    #[serde(deserialize_with = "deserialise_proportion")]
    pub demand_response_max_share: f64,
    /// Battery parameters (required if the model includes batteries)
    pub batteries: Option<BatteryParameters>,
    /// Hydrogen cost parameters (required if the model includes hydrogen)
    pub hydrogen: Option<HydrogenParameters>,
}

/// Check that the `discount_rate` parameter is valid
fn check_discount_rate(value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value > -1.0,
        "discount_rate must be a finite number greater than -1"
    );

    Ok(())
}

/// Check the battery parameters, if provided
fn check_battery_parameters(params: Option<&BatteryParameters>) -> Result<()> {
    let Some(params) = params else {
        return Ok(());
    };

    ensure!(
        params.min_discharge_time.is_finite() && params.min_discharge_time > 0.0,
        "batteries.min_discharge_time must be a finite number greater than zero"
    );
    ensure!(
        (0.0..=1.0).contains(&params.max_discharge),
        "batteries.max_discharge must be between 0 and 1"
    );

    Ok(())
}

impl ModelParameters {
    /// Read a model file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing the solved model files
    ///
    /// # Returns
    ///
    /// The model file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        let model_params: ModelParameters = read_toml(&file_path)?;

        model_params
            .validate()
            .with_context(|| input_err_msg(&file_path))?;

        Ok(model_params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_discount_rate(self.discount_rate)?;
        check_battery_parameters(self.batteries.as_ref())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_model_file(dir: &Path, contents: &str) {
        let mut file = File::create(dir.join(MODEL_PARAMETERS_FILE_NAME)).unwrap();
        writeln!(file, "{contents}").unwrap();
    }

    #[test]
    fn test_model_params_from_path() {
        let dir = tempdir().unwrap();
        write_model_file(
            dir.path(),
            "discount_rate = 0.03\nbase_financial_year = 2015\n\n\
            [batteries]\nmax_discharge = 0.9\nmin_discharge_time = 6.0",
        );

        let params = ModelParameters::from_path(dir.path()).unwrap();
        assert_eq!(
            params,
            ModelParameters {
                discount_rate: 0.03,
                base_financial_year: 2015,
                demand_response_max_share: 0.0,
                batteries: Some(BatteryParameters {
                    max_discharge: 0.9,
                    min_discharge_time: 6.0
                }),
                hydrogen: None,
            }
        );
    }

    #[rstest]
    #[case("base_financial_year = 2015", "discount_rate")]
    #[case("discount_rate = 0.03", "base_financial_year")]
    fn test_model_params_missing_required(#[case] contents: &str, #[case] missing: &str) {
        let dir = tempdir().unwrap();
        write_model_file(dir.path(), contents);

        let err = ModelParameters::from_path(dir.path()).unwrap_err();
        let msg = format!("{err:?}");
        assert!(msg.contains(missing), "Error does not name {missing}: {msg}");
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(0.07, true)]
    #[case(-0.5, true)]
    #[case(-1.0, false)]
    #[case(f64::NAN, false)]
    #[case(f64::INFINITY, false)]
    fn test_check_discount_rate(#[case] value: f64, #[case] valid: bool) {
        assert_eq!(check_discount_rate(value).is_ok(), valid);
    }

    #[rstest]
    #[case(0.9, 6.0, true)]
    #[case(1.0, 0.5, true)]
    #[case(0.9, 0.0, false)]
    #[case(1.5, 6.0, false)]
    fn test_check_battery_parameters(
        #[case] max_discharge: f64,
        #[case] min_discharge_time: f64,
        #[case] valid: bool,
    ) {
        let params = BatteryParameters {
            max_discharge,
            min_discharge_time,
        };
        assert_eq!(check_battery_parameters(Some(&params)).is_ok(), valid);
        assert!(check_battery_parameters(None).is_ok());
    }
}
