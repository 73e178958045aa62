//! VAT (DPH) helpers: registration threshold check and gross-up breakdown.

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::config::TaxYearConfig;
use super::engine::TaxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VatRate {
    /// 20% standard rate
    #[default]
    Standard,
    /// 10% reduced rate
    Reduced,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VatBreakdown {
    pub base_amount: Decimal,
    pub vat_rate: Decimal,
    pub vat_amount: Decimal,
    pub total_with_vat: Decimal,
}

/// Whether turnover makes VAT registration mandatory.
pub fn vat_registration_required(config: &TaxYearConfig, turnover: Decimal) -> bool {
    turnover > config.vat_registration_threshold
}

/// VAT amount and gross total for a net amount at the given rate.
pub fn calculate_vat(
    config: &TaxYearConfig,
    amount: Decimal,
    rate: VatRate,
) -> Result<VatBreakdown, TaxError> {
    if amount < Decimal::ZERO {
        return Err(TaxError::NegativeAmount {
            field: "amount",
            value: amount,
        });
    }

    let rate = match rate {
        VatRate::Standard => config.vat_standard_rate,
        VatRate::Reduced => config.vat_reduced_rate,
    };
    let vat_amount = amount * rate;

    Ok(VatBreakdown {
        base_amount: amount.round_dp(2),
        vat_rate: rate,
        vat_amount: vat_amount.round_dp(2),
        total_with_vat: (amount + vat_amount).round_dp(2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn config() -> TaxYearConfig {
        TaxYearConfig::for_year(2024).unwrap()
    }

    #[test]
    fn registration_threshold_is_strict() {
        let config = config();
        assert!(!vat_registration_required(&config, dec!(49790.00)));
        assert!(vat_registration_required(&config, dec!(49790.01)));
    }

    #[test]
    fn standard_rate_breakdown() {
        let vat = calculate_vat(&config(), dec!(1000), VatRate::Standard).unwrap();
        assert_eq!(vat.vat_rate, dec!(0.20));
        assert_eq!(vat.vat_amount, dec!(200.00));
        assert_eq!(vat.total_with_vat, dec!(1200.00));
    }

    #[test]
    fn reduced_rate_breakdown() {
        let vat = calculate_vat(&config(), dec!(99.99), VatRate::Reduced).unwrap();
        assert_eq!(vat.vat_amount, dec!(10.00));
        assert_eq!(vat.total_with_vat, dec!(109.99));
    }

    #[test]
    fn negative_amount_is_rejected() {
        assert!(calculate_vat(&config(), dec!(-1), VatRate::Standard).is_err());
    }
}
