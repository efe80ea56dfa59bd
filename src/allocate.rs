//! Splitting aggregate quantities in proportion to their parts.
//!
//! A project that can burn more than one fuel only reports a single dispatch level, so dispatch
//! is attributed to fuels in proportion to each fuel's use rate. All "divide, but treat division
//! by zero as zero" logic lives here.
use indexmap::IndexMap;
use log::warn;
use std::hash::Hash;

/// The ratio `part / whole`, or zero if `whole` is zero
pub fn proportion(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { part / whole }
}

/// The share of `total_dispatch` attributed to a single fuel.
///
/// # Arguments
///
/// * `total_dispatch` - Dispatch of the project at this timepoint
/// * `fuel_rate` - Use rate of the fuel of interest
/// * `total_rate` - Sum of the use rates of all the project's eligible fuels
///
/// # Returns
///
/// `total_dispatch * fuel_rate / total_rate`. If `total_dispatch` is zero, the result is zero.
/// If dispatch is non-zero but no fuel is used (which indicates a numerically inconsistent
/// solution) a warning is logged and the result is zero.
pub fn fuel_share(total_dispatch: f64, fuel_rate: f64, total_rate: f64) -> f64 {
    if total_dispatch == 0.0 {
        return 0.0;
    }

    if total_rate == 0.0 {
        warn_no_fuel_use(total_dispatch);
        return 0.0;
    }

    total_dispatch * fuel_rate / total_rate
}

/// Report a solution in which a project is dispatched without using any fuel
fn warn_no_fuel_use(total_dispatch: f64) {
    warn!(
        "Dispatch of {total_dispatch} has a total fuel use rate of zero; \
        attributing no dispatch to fuel"
    );
}

/// Split `total_dispatch` across fuels in proportion to their use rates.
///
/// `rates` should contain every eligible fuel for the project (and only those).
pub fn allocate<K, I>(total_dispatch: f64, rates: I) -> IndexMap<K, f64>
where
    K: Hash + Eq,
    I: IntoIterator<Item = (K, f64)>,
{
    let rates: Vec<_> = rates.into_iter().collect();
    if total_dispatch == 0.0 {
        return rates.into_iter().map(|(fuel, _)| (fuel, 0.0)).collect();
    }

    let total_rate: f64 = rates.iter().map(|(_, rate)| rate).sum();
    if total_rate == 0.0 {
        // Only warn once for the whole project/timepoint
        warn_no_fuel_use(total_dispatch);
        return rates.into_iter().map(|(fuel, _)| (fuel, 0.0)).collect();
    }

    rates
        .into_iter()
        .map(|(fuel, rate)| (fuel, fuel_share(total_dispatch, rate, total_rate)))
        .collect()
}
