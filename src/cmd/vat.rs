//! VAT command - DPH breakdown and registration threshold check

use crate::cmd::calculate::format_eur;
use crate::tax::{calculate_vat, vat_registration_required, TaxYearConfig, VatRate};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct VatCommand {
    /// Net amount in EUR
    #[arg(short, long)]
    amount: Decimal,

    /// VAT rate to apply
    #[arg(short, long, value_enum, default_value_t = VatRateArg::Standard)]
    rate: VatRateArg,

    /// Yearly turnover in EUR, checks whether VAT registration is mandatory
    #[arg(short, long)]
    turnover: Option<Decimal>,

    /// Tax year
    #[arg(short, long, default_value_t = 2024)]
    year: i32,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum VatRateArg {
    #[default]
    Standard,
    Reduced,
}

impl From<VatRateArg> for VatRate {
    fn from(arg: VatRateArg) -> Self {
        match arg {
            VatRateArg::Standard => VatRate::Standard,
            VatRateArg::Reduced => VatRate::Reduced,
        }
    }
}

#[derive(Debug, Serialize)]
struct VatOutput {
    #[serde(flatten)]
    breakdown: crate::tax::VatBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    registration_required: Option<bool>,
}

impl VatCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = TaxYearConfig::for_year(self.year)?;
        let breakdown = calculate_vat(&config, self.amount, self.rate.into())?;
        let registration_required = self
            .turnover
            .map(|turnover| vat_registration_required(&config, turnover));

        if self.json {
            let output = VatOutput {
                breakdown,
                registration_required,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!();
        println!("VAT ({:.0}%)", breakdown.vat_rate * dec!(100));
        println!("  Base: {}", format_eur(breakdown.base_amount));
        println!("  VAT: {}", format_eur(breakdown.vat_amount));
        println!("  Total with VAT: {}", format_eur(breakdown.total_with_vat));
        if let Some(required) = registration_required {
            println!();
            if required {
                println!(
                    "VAT registration REQUIRED (turnover above {})",
                    format_eur(config.vat_registration_threshold)
                );
            } else {
                println!(
                    "VAT registration not required (threshold {})",
                    format_eur(config.vat_registration_threshold)
                );
            }
        }
        println!();
        Ok(())
    }
}
