//! DPFO type B calculation pipeline: expense deduction, insurance
//! contributions, taxable income, progressive tax with child credit,
//! and final settlement.
//!
//! Every step is a pure function of its inputs and the year's
//! [`TaxYearConfig`]. All money is `Decimal`; exposed figures are quantized
//! to 2 decimal places with banker's rounding at exactly the points the
//! DPFO form exposes a line.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::config::TaxYearConfig;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaxError {
    #[error("unsupported tax year: {0}")]
    UnsupportedYear(i32),
    #[error("{field} must not be negative: {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
}

/// Profession category selecting the flat-rate expense percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Profession {
    /// Most professions: 60% flat-rate expenses
    #[default]
    Standard,
    /// Craft trades (remeselné živnosti): 40% flat-rate expenses
    Craft,
}

/// Inputs for one complete tax return calculation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TaxReturnInput {
    /// Gross annual income in EUR
    #[schemars(with = "f64")]
    pub income: Decimal,
    /// Actual expenses, used only when `use_flat_rate` is false
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub expenses: Option<Decimal>,
    /// Deduct flat-rate expenses (paušálne výdavky) instead of actual ones
    #[serde(default = "default_use_flat_rate")]
    pub use_flat_rate: bool,
    /// Profession category for the flat-rate percentage
    #[serde(default)]
    pub profession: Profession,
    /// Number of dependent children for the tax bonus
    #[serde(default)]
    pub children: u32,
    /// Additional non-taxable parts (donations, mortgage interest, pension contributions)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub additional_non_taxable: Option<Decimal>,
    /// Tax advances already paid during the year
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub paid_advances: Option<Decimal>,
}

fn default_use_flat_rate() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseMethod {
    FlatRate,
    Actual,
}

/// Income section of the return: expenses and the resulting tax base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeBreakdown {
    pub gross_income: Decimal,
    pub expenses: Decimal,
    pub expense_method: ExpenseMethod,
    /// Flat-rate percentage applied, absent for actual expenses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_rate: Option<Decimal>,
    pub tax_base: Decimal,
}

/// Mandatory social and health insurance contributions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsuranceBreakdown {
    pub social_monthly: Decimal,
    pub health_monthly: Decimal,
    pub social_yearly: Decimal,
    pub health_yearly: Decimal,
    /// Combined yearly total, quantized from the unrounded monthly sum.
    /// Can differ by a cent from `social_yearly + health_yearly`.
    pub total_yearly: Decimal,
}

/// Progressive tax and child credit section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxBreakdown {
    /// Tax base after insurance, the non-taxable minimum and additional deductions
    pub taxable_income: Decimal,
    pub tax_before_bonus: Decimal,
    /// Annual tax bonus for dependent children
    pub tax_bonus: Decimal,
    pub final_tax: Decimal,
}

/// Settlement against advances already paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentBreakdown {
    pub paid_advances: Decimal,
    /// Signed: positive means underpaid, negative means overpaid
    pub balance: Decimal,
    pub to_pay: Decimal,
    pub to_refund: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Final tax plus yearly insurance contributions
    pub total_tax_burden: Decimal,
    /// Final tax as a percentage of gross income
    pub effective_tax_rate: Decimal,
}

/// Complete itemized result of a DPFO type B calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxReturnResult {
    pub year: i32,
    pub income: IncomeBreakdown,
    pub insurance: InsuranceBreakdown,
    pub tax_base_after_insurance: Decimal,
    pub tax: TaxBreakdown,
    pub payment: PaymentBreakdown,
    pub summary: Summary,
}

const MONTHS: Decimal = dec!(12);

/// Flat-rate expenses (paušálne výdavky) for the profession category.
pub fn flat_rate_expenses(config: &TaxYearConfig, income: Decimal, profession: Profession) -> Decimal {
    income * config.flat_rate(profession)
}

/// Tax base (základ dane) after the selected expense deduction, clamped at zero.
///
/// Flat-rate and actual expenses are mutually exclusive: the flat-rate flag
/// decides which one applies, they are never combined.
pub fn tax_base(
    config: &TaxYearConfig,
    income: Decimal,
    expenses: Option<Decimal>,
    use_flat_rate: bool,
    profession: Profession,
) -> Decimal {
    let expenses = if use_flat_rate {
        flat_rate_expenses(config, income, profession)
    } else {
        expenses.unwrap_or(Decimal::ZERO)
    };
    (income - expenses).max(Decimal::ZERO)
}

/// Social and health insurance contributions from a monthly assessment base.
///
/// The base is floored at the statutory minimum. The per-line yearly figures
/// are the rounded monthly contributions times twelve, while the combined
/// total is quantized from the unrounded monthly sum, so the total can differ
/// from the sum of the two yearly lines by a cent.
pub fn insurance_contributions(config: &TaxYearConfig, assessment_base: Decimal) -> InsuranceBreakdown {
    let monthly_base = assessment_base.max(config.min_monthly_assessment_base);

    let social_monthly = monthly_base * config.social_insurance_rate;
    let health_monthly = monthly_base * config.health_insurance_rate;

    let social_monthly_rounded = social_monthly.round_dp(2);
    let health_monthly_rounded = health_monthly.round_dp(2);

    InsuranceBreakdown {
        social_monthly: social_monthly_rounded,
        health_monthly: health_monthly_rounded,
        social_yearly: social_monthly_rounded * MONTHS,
        health_yearly: health_monthly_rounded * MONTHS,
        total_yearly: ((social_monthly + health_monthly) * MONTHS).round_dp(2),
    }
}

/// Progressive income tax (daň z príjmov) with the child tax bonus.
pub fn income_tax(
    config: &TaxYearConfig,
    tax_base: Decimal,
    additional_non_taxable: Option<Decimal>,
    children: u32,
) -> TaxBreakdown {
    let mut taxable_income = tax_base - config.non_taxable_minimum;
    if let Some(additional) = additional_non_taxable {
        taxable_income -= additional;
    }
    let taxable_income = taxable_income.max(Decimal::ZERO);

    // Marginal brackets: only the portion above the threshold is taxed at
    // the higher rate.
    let tax = if taxable_income <= config.bracket_threshold {
        taxable_income * config.basic_rate
    } else {
        config.bracket_threshold * config.basic_rate
            + (taxable_income - config.bracket_threshold) * config.higher_rate
    };

    let tax_bonus = Decimal::from(children) * config.child_credit_monthly * MONTHS;
    let final_tax = (tax - tax_bonus).max(Decimal::ZERO);

    TaxBreakdown {
        taxable_income: taxable_income.round_dp(2),
        tax_before_bonus: tax.round_dp(2),
        tax_bonus: tax_bonus.round_dp(2),
        final_tax: final_tax.round_dp(2),
    }
}

fn require_non_negative(field: &'static str, value: Decimal) -> Result<(), TaxError> {
    if value < Decimal::ZERO {
        return Err(TaxError::NegativeAmount { field, value });
    }
    Ok(())
}

fn validate(input: &TaxReturnInput) -> Result<(), TaxError> {
    require_non_negative("income", input.income)?;
    if let Some(expenses) = input.expenses {
        require_non_negative("expenses", expenses)?;
    }
    if let Some(additional) = input.additional_non_taxable {
        require_non_negative("additional_non_taxable", additional)?;
    }
    if let Some(advances) = input.paid_advances {
        require_non_negative("paid_advances", advances)?;
    }
    Ok(())
}

/// Complete DPFO type B tax return calculation.
///
/// Deterministic and side-effect free: identical inputs always produce an
/// identical result. Inputs are validated up front; nothing is computed for
/// malformed arguments.
pub fn calculate_complete_tax_return(
    config: &TaxYearConfig,
    input: &TaxReturnInput,
) -> Result<TaxReturnResult, TaxError> {
    validate(input)?;

    // 1. Expense deduction and tax base
    let base = tax_base(
        config,
        input.income,
        input.expenses,
        input.use_flat_rate,
        input.profession,
    );

    // 2. Insurance contributions, deductible from the tax base
    let insurance = insurance_contributions(config, base / MONTHS);
    let adjusted_tax_base = (base - insurance.total_yearly).max(Decimal::ZERO);

    // 3. Progressive tax and child bonus
    let tax = income_tax(
        config,
        adjusted_tax_base,
        input.additional_non_taxable,
        input.children,
    );

    // 4. Settlement against advances
    let paid_advances = input.paid_advances.unwrap_or(Decimal::ZERO);
    let balance = tax.final_tax - paid_advances;
    let payment = PaymentBreakdown {
        paid_advances: paid_advances.round_dp(2),
        balance: balance.round_dp(2),
        to_pay: if balance > Decimal::ZERO {
            balance.round_dp(2)
        } else {
            Decimal::ZERO
        },
        to_refund: if balance < Decimal::ZERO {
            balance.round_dp(2).abs()
        } else {
            Decimal::ZERO
        },
    };

    let effective_tax_rate = if input.income > Decimal::ZERO {
        (tax.final_tax / input.income * dec!(100)).round_dp(2)
    } else {
        Decimal::ZERO
    };
    let summary = Summary {
        total_tax_burden: (tax.final_tax + insurance.total_yearly).round_dp(2),
        effective_tax_rate,
    };

    let (expenses, expense_rate) = if input.use_flat_rate {
        let rate = config.flat_rate(input.profession);
        (flat_rate_expenses(config, input.income, input.profession), Some(rate))
    } else {
        (input.expenses.unwrap_or(Decimal::ZERO), None)
    };

    Ok(TaxReturnResult {
        year: config.year,
        income: IncomeBreakdown {
            gross_income: input.income.round_dp(2),
            expenses: expenses.round_dp(2),
            expense_method: if input.use_flat_rate {
                ExpenseMethod::FlatRate
            } else {
                ExpenseMethod::Actual
            },
            expense_rate,
            tax_base: base.round_dp(2),
        },
        insurance,
        tax_base_after_insurance: adjusted_tax_base.round_dp(2),
        tax,
        payment,
        summary,
    })
}
