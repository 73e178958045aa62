//! Calculate command - complete itemized DPFO type B tax return

use crate::cmd::read_input;
use crate::tax::{
    calculate_complete_tax_return, ExpenseMethod, Profession, TaxReturnInput, TaxReturnResult,
    TaxYearConfig,
};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CalculateCommand {
    /// Gross annual income in EUR
    #[arg(short, long, required_unless_present = "input", conflicts_with = "input")]
    income: Option<Decimal>,

    /// Actual expenses in EUR (declines flat-rate expenses)
    #[arg(short, long)]
    expenses: Option<Decimal>,

    /// Profession category for flat-rate expenses
    #[arg(short, long, value_enum, default_value_t = ProfessionArg::Standard)]
    profession: ProfessionArg,

    /// Number of dependent children
    #[arg(short, long, default_value_t = 0)]
    children: u32,

    /// Additional non-taxable parts in EUR (donations, mortgage interest, pension)
    #[arg(long)]
    non_taxable: Option<Decimal>,

    /// Tax advances already paid in EUR
    #[arg(long)]
    advances: Option<Decimal>,

    /// Tax year
    #[arg(short, long, default_value_t = 2024)]
    year: i32,

    /// JSON file with the calculation input (or stdin with "-")
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ProfessionArg {
    #[default]
    Standard,
    Craft,
}

impl From<ProfessionArg> for Profession {
    fn from(arg: ProfessionArg) -> Self {
        match arg {
            ProfessionArg::Standard => Profession::Standard,
            ProfessionArg::Craft => Profession::Craft,
        }
    }
}

impl CalculateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = match &self.input {
            Some(path) => read_input(path)?,
            None => TaxReturnInput {
                // Clap enforces presence when --input is absent
                income: self
                    .income
                    .ok_or_else(|| anyhow::anyhow!("--income is required without --input"))?,
                expenses: self.expenses,
                use_flat_rate: self.expenses.is_none(),
                profession: self.profession.into(),
                children: self.children,
                additional_non_taxable: self.non_taxable,
                paid_advances: self.advances,
            },
        };

        let config = TaxYearConfig::for_year(self.year)?;
        let result = calculate_complete_tax_return(&config, &input)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_return(&result);
        }
        Ok(())
    }
}

fn print_return(result: &TaxReturnResult) {
    println!();
    println!("DPFO TYPE B TAX RETURN ({})", result.year);
    println!();

    println!("INCOME");
    println!("  Gross income: {}", format_eur(result.income.gross_income));
    match result.income.expense_method {
        ExpenseMethod::FlatRate => {
            let rate = result.income.expense_rate.unwrap_or(Decimal::ZERO);
            println!(
                "  Expenses (flat-rate {:.0}%): {}",
                rate * dec!(100),
                format_eur(result.income.expenses)
            );
        }
        ExpenseMethod::Actual => {
            println!("  Expenses (actual): {}", format_eur(result.income.expenses));
        }
    }
    println!("  Tax base: {}", format_eur(result.income.tax_base));
    println!();

    println!("INSURANCE CONTRIBUTIONS");
    println!(
        "  Social: {}/month | {}/year",
        format_eur(result.insurance.social_monthly),
        format_eur(result.insurance.social_yearly)
    );
    println!(
        "  Health: {}/month | {}/year",
        format_eur(result.insurance.health_monthly),
        format_eur(result.insurance.health_yearly)
    );
    println!("  Total yearly: {}", format_eur(result.insurance.total_yearly));
    println!();

    println!("TAX");
    println!(
        "  Tax base after insurance: {}",
        format_eur(result.tax_base_after_insurance)
    );
    println!("  Taxable income: {}", format_eur(result.tax.taxable_income));
    println!("  Tax before bonus: {}", format_eur(result.tax.tax_before_bonus));
    println!("  Child tax bonus: {}", format_eur(result.tax.tax_bonus));
    println!("  Final tax: {}", format_eur(result.tax.final_tax));
    println!();

    println!("SETTLEMENT");
    println!("  Advances paid: {}", format_eur(result.payment.paid_advances));
    if result.payment.to_refund > Decimal::ZERO {
        println!("  TO REFUND: {}", format_eur(result.payment.to_refund));
    } else {
        println!("  TO PAY: {}", format_eur(result.payment.to_pay));
    }
    println!();

    println!(
        "TOTAL TAX BURDEN: {} (effective rate {}%)",
        format_eur(result.summary.total_tax_burden),
        result.summary.effective_tax_rate
    );
    println!();
}

pub(crate) fn format_eur(amount: Decimal) -> String {
    format!("€{:.2}", amount)
}
