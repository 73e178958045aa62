//! Statutory rates and limits for a supported tax year.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::engine::Profession;
use super::TaxError;

/// Statutory constants for one tax year.
///
/// Constructed once via [`TaxYearConfig::for_year`] and never mutated.
/// Only 2024 is populated; any other year is rejected with
/// [`TaxError::UnsupportedYear`] rather than silently reusing stale rates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxYearConfig {
    pub year: i32,

    /// 19% rate up to the bracket threshold
    pub basic_rate: Decimal,
    /// 25% rate on the portion above the threshold
    pub higher_rate: Decimal,
    /// Taxable income threshold between the two rates
    pub bracket_threshold: Decimal,

    /// Non-taxable minimum per year (nezdaniteľná časť základu dane)
    pub non_taxable_minimum: Decimal,
    /// Tax bonus per dependent child, per month
    pub child_credit_monthly: Decimal,

    /// Flat-rate expenses (paušálne výdavky) for most professions
    pub flat_rate_standard: Decimal,
    /// Flat-rate expenses for craft trades
    pub flat_rate_craft: Decimal,

    /// Social insurance rate for the self-employed
    pub social_insurance_rate: Decimal,
    /// Health insurance rate for the self-employed
    pub health_insurance_rate: Decimal,
    /// Minimum monthly assessment base (vymeriavací základ)
    pub min_monthly_assessment_base: Decimal,

    pub vat_standard_rate: Decimal,
    pub vat_reduced_rate: Decimal,
    /// Turnover above which VAT registration is mandatory
    pub vat_registration_threshold: Decimal,
}

impl TaxYearConfig {
    /// Look up the statutory constants for the given year.
    pub fn for_year(year: i32) -> Result<TaxYearConfig, TaxError> {
        match year {
            2024 => Ok(Self::year_2024()),
            _ => Err(TaxError::UnsupportedYear(year)),
        }
    }

    fn year_2024() -> TaxYearConfig {
        TaxYearConfig {
            year: 2024,
            basic_rate: dec!(0.19),
            higher_rate: dec!(0.25),
            bracket_threshold: dec!(41445.37),
            non_taxable_minimum: dec!(5174.70),
            child_credit_monthly: dec!(140.00),
            flat_rate_standard: dec!(0.60),
            flat_rate_craft: dec!(0.40),
            social_insurance_rate: dec!(0.312),
            health_insurance_rate: dec!(0.14),
            min_monthly_assessment_base: dec!(701.37),
            vat_standard_rate: dec!(0.20),
            vat_reduced_rate: dec!(0.10),
            vat_registration_threshold: dec!(49790.00),
        }
    }

    /// Flat-rate expense percentage for a profession category.
    pub fn flat_rate(&self, profession: Profession) -> Decimal {
        match profession {
            Profession::Standard => self.flat_rate_standard,
            Profession::Craft => self.flat_rate_craft,
        }
    }
}
