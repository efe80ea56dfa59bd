//! Common routines for handling input data.
//!
//! A solved model is stored as a directory of CSV files plus a `model.toml` file containing
//! scalar parameters.
use crate::id::{HasID, IDLike};
use crate::model::{ModelParameters, SolvedModel};
use anyhow::{Context, Result, bail, ensure};
use indexmap::IndexMap;
use indexmap::map::Entry;
use itertools::Itertools;
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use std::fmt::Debug;
use std::fs;
use std::hash::Hash;
use std::path::Path;

pub mod project;
use project::{read_energy_sources, read_load_zones, read_projects};
pub mod subsystem;
use subsystem::read_subsystems;
pub mod timescale;
use timescale::read_time_scales;
pub mod variables;
use variables::read_decision_variables;

/// Read a series of type `T`s from a CSV file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<'a, T: DeserializeOwned + 'a>(
    file_path: &'a Path,
) -> Result<impl Iterator<Item = T> + 'a> {
    let vec = read_csv_internal(file_path)?;
    ensure!(
        !vec.is_empty(),
        "CSV file {} cannot be empty",
        file_path.display()
    );

    Ok(vec.into_iter())
}

/// Read a series of type `T`s from a CSV file, if it exists.
///
/// A missing file yields an empty iterator.
pub fn read_csv_optional<'a, T: DeserializeOwned + 'a>(
    file_path: &'a Path,
) -> Result<impl Iterator<Item = T> + 'a> {
    Ok(read_csv_if_exists(file_path)?.unwrap_or_default().into_iter())
}

/// Read a series of type `T`s from a CSV file, or `None` if the file doesn't exist
pub fn read_csv_if_exists<T: DeserializeOwned>(file_path: &Path) -> Result<Option<Vec<T>>> {
    if !file_path.exists() {
        return Ok(None);
    }

    read_csv_internal(file_path).map(Some)
}

fn read_csv_internal<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .process_results(|iter| iter.collect_vec())
        .with_context(|| input_err_msg(file_path))
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Read an f64, checking that it is between 0 and 1
pub fn deserialise_proportion<'de, D>(deserialiser: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = Deserialize::deserialize(deserialiser)?;
    if !(0.0..=1.0).contains(&value) {
        Err(serde::de::Error::custom("Value must be between 0 and 1"))?;
    }

    Ok(value)
}

/// Format an error message to include the file path
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read a CSV file of items with IDs.
///
/// As this function is only ever used for top-level CSV files (i.e. the ones which actually
/// define the IDs for a given type), we use an ordered map to maintain the order in the input
/// files.
pub fn read_csv_id_file<T, ID: IDLike>(file_path: &Path) -> Result<IndexMap<ID, T>>
where
    T: HasID<ID> + DeserializeOwned,
{
    fn fill_and_validate_map<T, ID: IDLike>(file_path: &Path) -> Result<IndexMap<ID, T>>
    where
        T: HasID<ID> + DeserializeOwned,
    {
        let mut map = IndexMap::new();
        for record in read_csv::<T>(file_path)? {
            let id = record.get_id().clone();
            let id_str: &str = id.borrow();
            ensure!(!id_str.is_empty(), "IDs cannot be empty");
            let existing = map.insert(id.clone(), record).is_some();
            ensure!(!existing, "Duplicate ID found: {id}");
        }

        Ok(map)
    }

    fill_and_validate_map(file_path).with_context(|| input_err_msg(file_path))
}

/// Insert a key-value pair into a map, returning an error if the key is already present
pub fn try_insert<K, V>(map: &mut IndexMap<K, V>, key: K, value: V) -> Result<()>
where
    K: Eq + Hash + Debug,
{
    match map.entry(key) {
        Entry::Vacant(entry) => {
            entry.insert(value);
            Ok(())
        }
        Entry::Occupied(entry) => bail!("Duplicate entry for {:?}", entry.key()),
    }
}

/// Check whether an iterator contains values that are sorted and unique
pub fn is_sorted_and_unique<T, I>(iter: I) -> bool
where
    T: PartialOrd + Clone,
    I: IntoIterator<Item = T>,
{
    iter.into_iter().tuple_windows().all(|(a, b)| a < b)
}

/// Load a solved model from the specified directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing the solved model files
///
/// # Returns
///
/// The solved model, ready for reporting, or an error if the files are invalid
pub fn load_model<P: AsRef<Path>>(model_dir: P) -> Result<SolvedModel> {
    let model_dir = model_dir.as_ref();
    let parameters = ModelParameters::from_path(model_dir)?;
    let time = read_time_scales(model_dir)?;
    let load_zones = read_load_zones(model_dir)?;
    let energy_sources = read_energy_sources(model_dir)?;
    let projects = read_projects(model_dir, &load_zones, &energy_sources)?;
    let variables =
        read_decision_variables(model_dir, &time, &load_zones, &energy_sources, &projects)?;
    let subsystems = read_subsystems(model_dir, &parameters, &time, &load_zones)?;

    SolvedModel::new(
        parameters,
        time,
        load_zones,
        energy_sources,
        projects,
        variables,
        subsystems,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::GenericID;
    use crate::project::{LoadZone, LoadZoneMap};
    use rstest::rstest;
    use serde::Deserialize;
    use serde::de::IntoDeserializer;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Record {
        id: String,
        value: u32,
    }

    /// Create an example CSV file in dir_path
    fn create_csv_file(dir_path: &Path, contents: &str) -> PathBuf {
        let file_path = dir_path.join("test.csv");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "{contents}").unwrap();
        file_path
    }

    #[test]
    fn test_read_csv() {
        let dir = tempdir().unwrap();
        let file_path = create_csv_file(dir.path(), "id,value\nhello,1\nworld,2");
        let records: Vec<Record> = read_csv(&file_path).unwrap().collect();
        assert_eq!(
            records,
            &[
                Record {
                    id: "hello".to_string(),
                    value: 1,
                },
                Record {
                    id: "world".to_string(),
                    value: 2,
                }
            ]
        );

        // File with surrounding whitespace
        let file_path = create_csv_file(dir.path(), "id  , value\t\n  hello\t ,1");
        let records: Vec<Record> = read_csv(&file_path).unwrap().collect();
        assert_eq!(
            records,
            &[Record {
                id: "hello".to_string(),
                value: 1,
            }]
        );

        // Empty file: error for read_csv, but not read_csv_optional
        let file_path = create_csv_file(dir.path(), "id,value");
        assert!(read_csv::<Record>(&file_path).is_err());
        assert!(
            read_csv_optional::<Record>(&file_path)
                .unwrap()
                .next()
                .is_none()
        );
    }

    #[test]
    fn test_read_csv_missing_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("missing.csv");
        let err = read_csv::<Record>(&file_path).err().unwrap();
        assert!(err.to_string().starts_with("Error reading"));
        assert!(
            read_csv_optional::<Record>(&file_path)
                .unwrap()
                .next()
                .is_none()
        );
        assert!(read_csv_if_exists::<Record>(&file_path).unwrap().is_none());
    }

    #[test]
    fn test_read_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.toml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "id = \"hello\"\nvalue = 1").unwrap();
        }

        assert_eq!(
            read_toml::<Record>(&file_path).unwrap(),
            Record {
                id: "hello".to_string(),
                value: 1,
            }
        );

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "bad toml syntax").unwrap();
        }

        assert!(read_toml::<Record>(&file_path).is_err());
    }

    /// Deserialise value with deserialise_proportion()
    fn deserialise_f64(value: f64) -> Result<f64, serde::de::value::Error> {
        let deserialiser: serde::de::value::F64Deserializer<serde::de::value::Error> =
            value.into_deserializer();
        deserialise_proportion(deserialiser)
    }


    #[rstest]
    #[case(0.0, true)]
    #[case(0.5, true)]
    #[case(1.0, true)]
    #[case(-1.0, false)]
    #[case(1.5, false)]
    #[case(f64::NAN, false)]
    fn test_deserialise_proportion(#[case] value: f64, #[case] valid: bool) {
        assert_eq!(deserialise_f64(value).is_ok(), valid);
    }

    #[test]
    fn test_read_csv_id_file() {
        let dir = tempdir().unwrap();
        let file_path = create_csv_file(dir.path(), "id,description\nZ1,North\nZ2,South");
        let zones: LoadZoneMap = read_csv_id_file(&file_path).unwrap();
        assert_eq!(zones.keys().map(ToString::to_string).collect_vec(), ["Z1", "Z2"]);
        assert_eq!(
            zones[0],
            LoadZone {
                id: "Z1".into(),
                description: "North".into()
            }
        );

        let file_path = create_csv_file(dir.path(), "id,description\nZ1,North\nZ1,South");
        let err = read_csv_id_file::<LoadZone, _>(&file_path).unwrap_err();
        assert_eq!(err.chain().nth(1).unwrap().to_string(), "Duplicate ID found: Z1");
    }

    #[test]
    fn test_try_insert() {
        let mut map: IndexMap<GenericID, u32> = IndexMap::new();
        assert!(try_insert(&mut map, "a".into(), 1).is_ok());
        assert!(try_insert(&mut map, "a".into(), 2).is_err());
        assert_eq!(map[&GenericID::new("a")], 1);
    }

    #[rstest]
    #[case(&[] as &[u32], true)]
    #[case(&[2015], true)]
    #[case(&[2015, 2020, 2030], true)]
    #[case(&[2015, 2015], false)]
    #[case(&[2020, 2015], false)]
    fn test_is_sorted_and_unique(#[case] values: &[u32], #[case] expected: bool) {
        assert_eq!(is_sorted_and_unique(values), expected);
    }
}
