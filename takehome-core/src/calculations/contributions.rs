//! Social insurance and housing fund contributions.
//!
//! Both are a ratio applied to a base clamped into the city's bounds. Social
//! insurance has three personal lines (pension, medical and unemployment);
//! the medical line may carry a flat monthly amount on top of its ratio.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{clamp_base, round_half_up};
use crate::models::{CityParameters, ContributionResult};

/// Computes personal contributions against one [`CityParameters`] snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ContributionCalculator<'a> {
    params: &'a CityParameters,
}

impl<'a> ContributionCalculator<'a> {
    pub fn new(params: &'a CityParameters) -> Self {
        Self { params }
    }

    /// Personal social-insurance contribution for `raw_base`.
    ///
    /// The base is clamped to the city's social bounds first. Each line item
    /// is rounded to cents and the total is the sum of the rounded items.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use takehome_core::CityParameters;
    /// use takehome_core::calculations::ContributionCalculator;
    ///
    /// let params = CityParameters::default();
    /// let social = ContributionCalculator::new(&params).social_insurance(dec!(20000));
    ///
    /// assert_eq!(social.pension, dec!(1600.00));
    /// assert_eq!(social.total, dec!(2100.00));
    /// ```
    pub fn social_insurance(
        &self,
        raw_base: Decimal,
    ) -> ContributionResult {
        let p = self.params;
        let base = clamp_base(raw_base, p.social_base_min, p.social_base_max);

        let pension = round_half_up(base * p.pension_ratio);
        let medical = round_half_up(base * p.medical_ratio + p.medical_fixed_amount);
        let unemployment = round_half_up(base * p.unemployment_ratio);
        let total = pension + medical + unemployment;

        debug!(
            raw_base = %raw_base,
            base = %base,
            total = %total,
            "computed social insurance"
        );

        ContributionResult {
            base,
            pension,
            medical,
            unemployment,
            total,
        }
    }

    /// Housing-fund deposit at `ratio` on `raw_base` clamped to the fund bounds.
    ///
    /// Used for both the employee share and the employer share.
    pub fn housing_fund(
        &self,
        raw_base: Decimal,
        ratio: Decimal,
    ) -> Decimal {
        let base = clamp_base(raw_base, self.params.fund_base_min, self.params.fund_base_max);
        round_half_up(base * ratio)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    use super::*;

    fn beijing() -> CityParameters {
        CityParameters {
            social_base_min: dec!(7162),
            social_base_max: dec!(35811),
            fund_base_min: dec!(2540),
            fund_base_max: dec!(35811),
            pension_ratio: dec!(0.08),
            medical_ratio: dec!(0.02),
            medical_fixed_amount: dec!(3),
            unemployment_ratio: dec!(0.005),
        }
    }

    // =========================================================================
    // social_insurance tests
    // =========================================================================

    #[test]
    fn social_insurance_inside_bounds() {
        let params = CityParameters::default();
        let social = ContributionCalculator::new(&params).social_insurance(dec!(20000));

        assert_eq!(
            social,
            ContributionResult {
                base: dec!(20000),
                pension: dec!(1600.00),
                medical: dec!(400.00),
                unemployment: dec!(100.00),
                total: dec!(2100.00),
            }
        );
    }

    #[test]
    fn social_insurance_raises_base_to_floor() {
        let params = CityParameters::default();
        let social = ContributionCalculator::new(&params).social_insurance(dec!(5000));

        assert_eq!(social.base, dec!(7460));
        assert_eq!(social.pension, dec!(596.80));
        assert_eq!(social.medical, dec!(149.20));
        assert_eq!(social.unemployment, dec!(37.30));
        assert_eq!(social.total, dec!(783.30));
    }

    #[test]
    fn social_insurance_lowers_base_to_ceiling() {
        let params = CityParameters::default();
        let social = ContributionCalculator::new(&params).social_insurance(dec!(80000));

        assert_eq!(social.base, dec!(37302));
        // 37302 × 8% = 2984.16
        assert_eq!(social.pension, dec!(2984.16));
    }

    #[test]
    fn social_insurance_adds_medical_fixed_amount() {
        let params = beijing();
        let social = ContributionCalculator::new(&params).social_insurance(dec!(10000));

        assert_eq!(social.medical, dec!(203.00));
        assert_eq!(social.total, dec!(1053.00));
    }

    #[test]
    fn social_insurance_total_sums_rounded_items() {
        let params = CityParameters::unconstrained(dec!(0.005), dec!(0.005), dec!(0.005));
        let social = ContributionCalculator::new(&params).social_insurance(dec!(1001));

        // 1001 × 0.5% = 5.005 → 5.01 per item; the raw sum 15.015 would round to 15.02
        assert_eq!(social.pension, dec!(5.01));
        assert_eq!(social.medical, dec!(5.01));
        assert_eq!(social.unemployment, dec!(5.01));
        assert_eq!(social.total, dec!(15.03));
    }

    #[test]
    fn social_insurance_zero_ratios_contribute_nothing() {
        let params = CityParameters::unconstrained(dec!(0), dec!(0), dec!(0));
        let social = ContributionCalculator::new(&params).social_insurance(dec!(20000));

        assert_eq!(social.total, dec!(0));
    }

    // =========================================================================
    // housing_fund tests
    // =========================================================================

    #[test]
    fn housing_fund_applies_ratio() {
        let params = CityParameters::default();
        let calc = ContributionCalculator::new(&params);

        assert_eq!(calc.housing_fund(dec!(20000), dec!(0.07)), dec!(1400.00));
        assert_eq!(calc.housing_fund(dec!(20000), dec!(0.12)), dec!(2400.00));
    }

    #[test]
    fn housing_fund_uses_fund_bounds() {
        let params = beijing();
        let calc = ContributionCalculator::new(&params);

        // Below the social floor but above the fund floor.
        assert_eq!(calc.housing_fund(dec!(5000), dec!(0.07)), dec!(350.00));
        assert_eq!(calc.housing_fund(dec!(1000), dec!(0.07)), dec!(177.80));
    }

    #[test]
    fn housing_fund_low_salary_uses_default_floor() {
        let params = CityParameters::default();

        // 7460 × 7% = 522.20
        assert_eq!(
            ContributionCalculator::new(&params).housing_fund(dec!(5000), dec!(0.07)),
            dec!(522.20)
        );
    }

    #[test]
    fn housing_fund_zero_ratio() {
        let params = CityParameters::default();

        assert_eq!(
            ContributionCalculator::new(&params).housing_fund(dec!(20000), dec!(0)),
            dec!(0)
        );
    }

    proptest! {
        #[test]
        fn prop_custom_city_base_is_unclamped(cents in 0i64..100_000_000_00) {
            let base = Decimal::new(cents, 2);
            let params = CityParameters::unconstrained(dec!(0.08), dec!(0.02), dec!(0.005));

            prop_assert_eq!(ContributionCalculator::new(&params).social_insurance(base).base, base);
        }
    }
}
