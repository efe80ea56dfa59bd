//! Building report tables from a solved model.
//!
//! Every report is a [`Table`] produced by iterating over the Cartesian product of one or more
//! index sets (e.g. load zones × periods) and computing one row per key. The header and the row
//! function of a report are built from the same [`Capabilities`](crate::model::Capabilities),
//! so optional column groups appear in both or neither.
use crate::model::{SolvedModel, Subsystem};
use anyhow::{Context, Result, ensure};
use itertools::iproduct;
use std::fmt;
use std::iter;
use std::path::Path;
use strum::EnumIter;

pub mod built;
pub use built::BuiltSets;
pub mod capacity;
pub mod cost_breakdown;
pub mod energy_sources;
pub mod fuel_market;
pub mod summary;

/// A single cell of a report
#[derive(PartialEq, Debug, Clone)]
pub enum Value {
    /// A label, written verbatim
    Text(String),
    /// A floating-point number, written in its shortest round-trip form (e.g. `0.0`, `75.0`).
    /// Negative zero is written as `0.0`.
    Float(f64),
}

impl Value {
    /// Create a text value from anything which can be displayed
    pub fn text<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => write!(f, "{value}"),
            // An empty f64 sum is -0.0
            Self::Float(value) => write!(f, "{:?}", value + 0.0),
        }
    }
}

/// The column names of a report
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Header(Vec<String>);

impl Header {
    /// Create a header from a fixed set of leading columns
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(columns.into_iter().map(Into::into).collect())
    }

    /// Append columns
    #[must_use]
    pub fn extend<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Append columns only if `condition` holds
    #[must_use]
    pub fn extend_if<I, S>(self, condition: bool, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if condition {
            self.extend(columns)
        } else {
            self
        }
    }

    /// The number of columns
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no columns
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the column names
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The index of the named column
    pub fn position(&self, column: &str) -> Option<usize> {
        self.0.iter().position(|name| name == column)
    }
}

/// The index sets a report iterates over.
///
/// Keys are produced in Cartesian-product order, with the first (outer) dimension varying
/// slowest.
pub trait Dimensions {
    /// One combination of index values
    type Key;

    /// The number of keys, i.e. the product of the sizes of the dimensions
    fn len(&self) -> usize;

    /// Iterate over all keys in order
    fn keys(self) -> impl Iterator<Item = Self::Key>;
}

/// No dimensions: a report with a single row
impl Dimensions for () {
    type Key = ();

    fn len(&self) -> usize {
        1
    }

    fn keys(self) -> impl Iterator<Item = ()> {
        iter::once(())
    }
}

impl<'a, A> Dimensions for (&'a [A],) {
    type Key = &'a A;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn keys(self) -> impl Iterator<Item = &'a A> {
        self.0.iter()
    }
}

impl<'a, A, B> Dimensions for (&'a [A], &'a [B]) {
    type Key = (&'a A, &'a B);

    fn len(&self) -> usize {
        self.0.len() * self.1.len()
    }

    fn keys(self) -> impl Iterator<Item = (&'a A, &'a B)> {
        iproduct!(self.0.iter(), self.1.iter())
    }
}

impl<'a, A, B, C> Dimensions for (&'a [A], &'a [B], &'a [C]) {
    type Key = (&'a A, &'a B, &'a C);

    fn len(&self) -> usize {
        self.0.len() * self.1.len() * self.2.len()
    }

    fn keys(self) -> impl Iterator<Item = (&'a A, &'a B, &'a C)> {
        iproduct!(self.0.iter(), self.1.iter(), self.2.iter())
    }
}

/// A materialised report: a header plus rows of values
#[derive(PartialEq, Debug, Clone)]
pub struct Table {
    name: String,
    header: Header,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table by calling `row_fn` once for every key of `dimensions`.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the report
    /// * `header` - Column names
    /// * `dimensions` - Index sets to iterate over
    /// * `row_fn` - Computes the values of one row
    ///
    /// # Returns
    ///
    /// The table, or an error if any row has a different number of values to the header
    pub fn build<D, F>(name: &str, header: Header, dimensions: D, mut row_fn: F) -> Result<Self>
    where
        D: Dimensions,
        F: FnMut(D::Key) -> Vec<Value>,
    {
        let mut rows = Vec::with_capacity(dimensions.len());
        for key in dimensions.keys() {
            let row = row_fn(key);
            ensure!(
                row.len() == header.len(),
                "Row {} of report {name} has {} values but the header has {} columns",
                rows.len() + 1,
                row.len(),
                header.len()
            );
            rows.push(row);
        }

        Ok(Self {
            name: name.to_string(),
            header,
            rows,
        })
    }

    /// The name of the report
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column names
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The rows, in dimension order
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Get the value in the given row of the named column
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.header.position(column)?;
        self.rows.get(row)?.get(col)
    }

    /// Iterate over the values of the named column
    pub fn column<'a>(&'a self, column: &str) -> Option<impl Iterator<Item = &'a Value>> {
        let col = self.header.position(column)?;
        Some(self.rows.iter().map(move |row| &row[col]))
    }

    /// Write the table as tab-separated values
    pub fn write_tsv(&self, file_path: &Path) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_path(file_path)
            .with_context(|| format!("Could not create {}", file_path.display()))?;

        writer.write_record(self.header.iter())?;
        for row in &self.rows {
            writer.write_record(row.iter().map(ToString::to_string))?;
        }
        writer.flush()?;

        Ok(())
    }
}

/// The reports which can be written for a solved model, in the order they are written
#[derive(PartialEq, Eq, Debug, Clone, Copy, EnumIter, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ReportKind {
    /// Headline costs and renewable shares
    Summary,
    /// Dispatch by energy source for each load zone and timepoint
    EnergySources,
    /// Installed capacity by technology
    CapacityByTechnology,
    /// Installed capacity by energy source
    CapacityByEnergySource,
    /// Capacity additions, capital costs and annual costs
    CostBreakdown,
    /// Activation of fuel market supply tiers
    RfmActivate,
}

/// Everything needed to build reports for one solved model
pub struct ReportContext<'a> {
    /// The solved model
    pub model: &'a SolvedModel,
    /// Projects, technologies and energy sources with built capacity
    pub built: BuiltSets<'a>,
    /// The scenario tag, or an empty string
    pub scenario: &'a str,
}

impl<'a> ReportContext<'a> {
    /// Create a new context, deriving the sets of built projects
    pub fn new(model: &'a SolvedModel, scenario: &'a str) -> Self {
        Self {
            model,
            built: BuiltSets::new(model),
            scenario,
        }
    }
}

impl ReportKind {
    /// Whether this report applies to the given model
    pub fn is_applicable(self, model: &SolvedModel) -> bool {
        match self {
            Self::RfmActivate => model.has(Subsystem::SupplyTierActivation),
            _ => true,
        }
    }

    /// Build the report table
    pub fn build(self, ctx: &ReportContext) -> Result<Table> {
        let name = self.to_string();
        match self {
            Self::Summary => summary::build(&name, ctx),
            Self::EnergySources => energy_sources::build(&name, ctx),
            Self::CapacityByTechnology => capacity::build_by_technology(&name, ctx),
            Self::CapacityByEnergySource => capacity::build_by_energy_source(&name, ctx),
            Self::CostBreakdown => cost_breakdown::build(&name, ctx),
            Self::RfmActivate => fuel_market::build(&name, ctx),
        }
    }
}
