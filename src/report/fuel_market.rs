//! Activation of fuel market supply tiers.
use super::{Header, ReportContext, Table, Value};
use anyhow::{Context, Result};
use itertools::Itertools;

/// Build the supply tier activation report, with one row per supply tier
pub fn build(name: &str, ctx: &ReportContext) -> Result<Table> {
    let activation = ctx
        .model
        .subsystems
        .tier_activation
        .as_ref()
        .context("The model has no supply tier activation data")?;

    let header = Header::new(["market", "period", "tier", "activate"]);
    let tiers = activation.iter().collect_vec();
    Table::build(name, header, (&tiers[..],), |((market, period, tier), activate)| {
        vec![
            Value::text(market),
            Value::text(period),
            Value::text(tier),
            Value::from(**activate),
        ]
    })
}
