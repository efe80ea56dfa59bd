//! General functions related to finance.
//!
//! Period costs in a solved model are present values at the base financial year. Reports show
//! them as the equivalent uniform annual payment over the years of the period.
use crate::units::{Dimensionless, Money, MoneyPerYear, PerYear, Year};

/// Present value at the start of a series of `years` equal annual payments of one unit.
///
/// With a discount rate of zero this is simply the number of years.
pub fn uniform_series_to_present_value(discount_rate: Dimensionless, years: u32) -> Year {
    let years = f64::from(years);
    if discount_rate == Dimensionless(0.0) {
        return Year(years);
    }

    let factor = (Dimensionless(1.0) + discount_rate).powf(-years);
    Year(((Dimensionless(1.0) - factor) / discount_rate).0)
}

/// Discount factor for a value `years` years after the base year.
///
/// `years` may be negative, for values which occur before the base year.
pub fn future_to_present_value(discount_rate: Dimensionless, years: i32) -> Dimensionless {
    (Dimensionless(1.0) + discount_rate).powf(-f64::from(years))
}

/// Calculates the capital recovery factor (CRF) for a given number of years and discount rate.
///
/// This is the reciprocal of [`uniform_series_to_present_value`]: the annual payment which is
/// equivalent to a present value of one unit. It is zero if `years` is zero.
pub fn capital_recovery_factor(years: u32, discount_rate: Dimensionless) -> PerYear {
    if years == 0 {
        return PerYear(0.0);
    }

    PerYear(1.0 / uniform_series_to_present_value(discount_rate, years).value())
}

/// Convert a present-value cost for a whole period into an equivalent uniform annual cost.
///
/// The cost is first brought forward from the base year to the start of the period, then spread
/// over the years of the period.
///
/// # Arguments
///
/// * `discount_rate` - The discount rate
/// * `period_length_years` - Length of the period. If zero, the annual cost is zero.
/// * `period_start_offset_years` - Years between the base financial year and the period start
/// * `present_value_cost` - The cost, discounted to the base financial year
pub fn annualize(
    discount_rate: Dimensionless,
    period_length_years: u32,
    period_start_offset_years: i32,
    present_value_cost: Money,
) -> MoneyPerYear {
    let crf = capital_recovery_factor(period_length_years, discount_rate);
    let discount_factor = future_to_present_value(discount_rate, period_start_offset_years);

    present_value_cost / discount_factor * crf
}

/// The inverse of [`annualize`]: the present value at the base financial year of a uniform
/// annual cost paid in every year of a period.
pub fn present_value_of_annual_cost(
    discount_rate: Dimensionless,
    period_length_years: u32,
    period_start_offset_years: i32,
    annual_cost: MoneyPerYear,
) -> Money {
    annual_cost
        * uniform_series_to_present_value(discount_rate, period_length_years)
        * future_to_present_value(discount_rate, period_start_offset_years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 10, 10.0)] // Edge case: discount_rate==0
    #[case(0.05, 0, 0.0)] // Edge case: years==0
    #[case(0.05, 10, 7.721734929184818)]
    #[case(0.03, 5, 4.579707187194537)]
    fn test_uniform_series_to_present_value(
        #[case] discount_rate: f64,
        #[case] years: u32,
        #[case] expected: f64,
    ) {
        let result = uniform_series_to_present_value(Dimensionless(discount_rate), years);
        assert_approx_eq!(f64, result.value(), expected, epsilon = 1e-10);
    }

    #[rstest]
    #[case(0.05, 0, 1.0)]
    #[case(0.0, 10, 1.0)]
    #[case(0.05, 1, 0.9523809523809523)]
    #[case(0.05, -1, 1.05)]
    #[case(0.1, 2, 0.8264462809917354)]
    fn test_future_to_present_value(
        #[case] discount_rate: f64,
        #[case] years: i32,
        #[case] expected: f64,
    ) {
        let result = future_to_present_value(Dimensionless(discount_rate), years);
        assert_approx_eq!(f64, result.0, expected, epsilon = 1e-10);
    }

    #[rstest]
    #[case(0, 0.05, 0.0)] // Edge case: years==0
    #[case(10, 0.0, 0.1)] // Other edge case: discount_rate==0
    #[case(10, 0.05, 0.1295045749654567)]
    #[case(5, 0.03, 0.2183545714005762)]
    fn test_capital_recovery_factor(
        #[case] years: u32,
        #[case] discount_rate: f64,
        #[case] expected: f64,
    ) {
        let result = capital_recovery_factor(years, Dimensionless(discount_rate));
        assert_approx_eq!(f64, result.value(), expected, epsilon = 1e-10);
    }

    #[rstest]
    #[case(0.05, 10, 0, 1000.0, 129.5045749654567)]
    #[case(0.05, 10, 1, 1000.0, 135.97980371372944)]
    #[case(0.0, 10, 5, 1000.0, 100.0)] // No time value: spread evenly
    #[case(0.05, 0, 5, 1000.0, 0.0)] // Zero-length period
    #[case(0.05, 10, 0, 0.0, 0.0)]
    fn test_annualize(
        #[case] discount_rate: f64,
        #[case] length: u32,
        #[case] offset: i32,
        #[case] present_value: f64,
        #[case] expected: f64,
    ) {
        let result = annualize(
            Dimensionless(discount_rate),
            length,
            offset,
            Money(present_value),
        );
        assert_approx_eq!(f64, result.value(), expected, epsilon = 1e-8);
    }

    #[rstest]
    #[case(0.07, 10, 0, 5.0e6)]
    #[case(0.03, 5, 0, -250.0)]
    #[case(0.05, 20, 15, 1.0)]
    #[case(0.0, 8, -3, 42.0)]
    fn test_annualize_inverse_round_trip(
        #[case] discount_rate: f64,
        #[case] length: u32,
        #[case] offset: i32,
        #[case] cost: f64,
    ) {
        let discount_rate = Dimensionless(discount_rate);
        let present_value =
            present_value_of_annual_cost(discount_rate, length, offset, MoneyPerYear(cost));
        let annual = annualize(discount_rate, length, offset, present_value);
        assert_approx_eq!(f64, annual.value(), cost, epsilon = 1e-9 * cost.abs().max(1.0));
    }

    #[test]
    fn test_annualize_small_rate_tends_to_uniform_spreading() {
        let cost = Money(1200.0);
        let result = annualize(Dimensionless(1e-9), 12, 7, cost);
        assert_approx_eq!(f64, result.value(), 100.0, epsilon = 1e-4);
    }
}
