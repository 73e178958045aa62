pub mod config;
pub mod engine;
pub mod vat;

// Flat public surface for domain types and functions.
pub use config::TaxYearConfig;
pub use engine::{
    calculate_complete_tax_return, ExpenseMethod, Profession, TaxError, TaxReturnInput,
    TaxReturnResult,
};
pub use vat::{calculate_vat, vat_registration_required, VatBreakdown, VatRate};
