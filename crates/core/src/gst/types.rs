//! GST domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::AccountCategory;

/// Standard GST rate in percent (9% from 1 January 2024).
pub const STANDARD_RATE: Decimal = Decimal::from_parts(9, 0, 0, false, 0);

/// Account code of the GST output tax account.
pub const GST_OUTPUT_ACCOUNT: &str = "SYS-GST-OUTPUT";
/// Account code of the GST input tax account.
pub const GST_INPUT_ACCOUNT: &str = "SYS-GST-INPUT";
/// Account code of the GST payable control account.
pub const GST_CONTROL_ACCOUNT: &str = "SYS-GST-CONTROL";

/// IRAS tax codes used for F5 classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstTaxCode {
    /// Standard-rated supply.
    Sr,
    /// Zero-rated supply.
    Zr,
    /// Exempt supply.
    Es,
    /// Out-of-scope supply.
    Os,
    /// Taxable purchase.
    Tx,
    /// Zero-rated purchase.
    Zp,
    /// Import under a relief scheme.
    Im,
    /// Disallowed input tax.
    Bl,
    /// Purchase from a non-registered supplier.
    Nr,
}

impl GstTaxCode {
    /// Parses a stored tax code. Unknown codes return `None`.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "SR" => Some(Self::Sr),
            "ZR" => Some(Self::Zr),
            "ES" | "ES33" | "ESN33" => Some(Self::Es),
            "OS" => Some(Self::Os),
            "TX" => Some(Self::Tx),
            "ZP" => Some(Self::Zp),
            "IM" => Some(Self::Im),
            "BL" => Some(Self::Bl),
            "NR" => Some(Self::Nr),
            _ => None,
        }
    }
}

/// One posted journal line carrying a tax code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxableLine {
    /// Category of the account the line posts to.
    pub account_category: AccountCategory,
    /// Tax code on the line.
    pub tax_code: String,
    /// Debit amount.
    pub debit_amount: Decimal,
    /// Credit amount.
    pub credit_amount: Decimal,
    /// GST amount attributable to the line.
    pub tax_amount: Decimal,
}

/// Filing status of a GST return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GstReturnStatus {
    /// Prepared but not filed.
    Draft,
    /// Filed with IRAS.
    Submitted,
    /// Corrected after submission.
    Amended,
}

impl GstReturnStatus {
    /// Returns the canonical name stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::Amended => "Amended",
        }
    }
}

/// Computed F5 figures for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstReturnData {
    /// Period label, e.g. "2026-Q1".
    pub return_period: String,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period.
    pub end_date: NaiveDate,
    /// Filing deadline.
    pub filing_due_date: NaiveDate,
    /// Box 1: standard-rated supplies.
    pub standard_rated_supplies: Decimal,
    /// Box 2: zero-rated supplies.
    pub zero_rated_supplies: Decimal,
    /// Box 3: exempt supplies.
    pub exempt_supplies: Decimal,
    /// Box 4: total supplies.
    pub total_supplies: Decimal,
    /// Box 5: taxable purchases.
    pub taxable_purchases: Decimal,
    /// Box 6: output tax due.
    pub output_tax: Decimal,
    /// Box 7: input tax claimed.
    pub input_tax: Decimal,
    /// Manual adjustments added to box 8.
    pub tax_adjustments: Decimal,
    /// Box 8: net GST payable (negative means refundable).
    pub tax_payable: Decimal,
}

impl GstReturnData {
    /// Recomputes boxes 4 and 8 from the others.
    pub fn recompute_totals(&mut self) {
        self.total_supplies =
            self.standard_rated_supplies + self.zero_rated_supplies + self.exempt_supplies;
        self.tax_payable = self.output_tax - self.input_tax + self.tax_adjustments;
    }

    /// Applies a manual adjustment and recomputes box 8.
    pub fn set_adjustments(&mut self, adjustments: Decimal) {
        self.tax_adjustments = adjustments;
        self.recompute_totals();
    }
}
