//! Ledger domain types for journal entry creation and validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sgbooks_shared::types::AccountId;

/// Journal classification.
///
/// Categorizes entries for reporting and source tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JournalType {
    /// General journal entry.
    General,
    /// Posted from a sales invoice.
    Sales,
    /// Posted from a purchase invoice.
    Purchase,
    /// Customer payment received.
    CashReceipt,
    /// Vendor payment made.
    CashDisbursement,
    /// Payroll entry.
    Payroll,
    /// Opening balance entry.
    OpeningBalance,
    /// Adjustment entry.
    Adjustment,
    /// GST settlement entry.
    Gst,
}

impl JournalType {
    /// Returns the canonical name stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Sales => "Sales",
            Self::Purchase => "Purchase",
            Self::CashReceipt => "CashReceipt",
            Self::CashDisbursement => "CashDisbursement",
            Self::Payroll => "Payroll",
            Self::OpeningBalance => "OpeningBalance",
            Self::Adjustment => "Adjustment",
            Self::Gst => "Gst",
        }
    }
}

impl std::fmt::Display for JournalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for a single journal line.
///
/// Exactly one of `debit_amount` / `credit_amount` must be non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Optional line description.
    pub description: Option<String>,
    /// Debit amount (zero on credit lines).
    pub debit_amount: Decimal,
    /// Credit amount (zero on debit lines).
    pub credit_amount: Decimal,
    /// Transaction currency code.
    pub currency_code: String,
    /// Rate from the transaction currency to the base currency.
    pub exchange_rate: Decimal,
    /// GST code applied to this line, if any.
    pub tax_code: Option<String>,
    /// GST amount attributable to this line.
    pub tax_amount: Decimal,
}

impl JournalLineInput {
    /// Creates a base-currency debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal, currency_code: &str) -> Self {
        Self {
            account_id,
            description: None,
            debit_amount: amount,
            credit_amount: Decimal::ZERO,
            currency_code: currency_code.to_string(),
            exchange_rate: Decimal::ONE,
            tax_code: None,
            tax_amount: Decimal::ZERO,
        }
    }

    /// Creates a base-currency credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal, currency_code: &str) -> Self {
        Self {
            account_id,
            description: None,
            debit_amount: Decimal::ZERO,
            credit_amount: amount,
            currency_code: currency_code.to_string(),
            exchange_rate: Decimal::ONE,
            tax_code: None,
            tax_amount: Decimal::ZERO,
        }
    }

    /// Sets the line description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Tags the line with a tax code and amount.
    #[must_use]
    pub fn with_tax(mut self, tax_code: impl Into<String>, tax_amount: Decimal) -> Self {
        self.tax_code = Some(tax_code.into());
        self.tax_amount = tax_amount;
        self
    }

    /// Returns the raw debit-positive effect of this line.
    #[must_use]
    pub fn net_debit(&self) -> Decimal {
        self.debit_amount - self.credit_amount
    }
}

/// Journal totals for validation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalTotals {
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Whether the entry is balanced (debits == credits).
    pub is_balanced: bool,
}

impl JournalTotals {
    /// Creates new totals from debit and credit sums.
    #[must_use]
    pub fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Sums a set of lines.
    #[must_use]
    pub fn from_lines(lines: &[JournalLineInput]) -> Self {
        let debit = lines.iter().map(|l| l.debit_amount).sum();
        let credit = lines.iter().map(|l| l.credit_amount).sum();
        Self::new(debit, credit)
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

/// Information about an account needed to accept a posting.
#[derive(Debug, Clone)]
pub struct AccountPostingInfo {
    /// The account ID.
    pub id: AccountId,
    /// Account code, for messages.
    pub code: String,
    /// Whether the account is active.
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_totals_balanced() {
        let totals = JournalTotals::new(dec!(100.00), dec!(100.00));
        assert!(totals.is_balanced);
        assert_eq!(totals.difference(), Decimal::ZERO);
    }

    #[test]
    fn test_totals_unbalanced() {
        let totals = JournalTotals::new(dec!(100.00), dec!(50.00));
        assert!(!totals.is_balanced);
        assert_eq!(totals.difference(), dec!(50.00));
    }

    #[test]
    fn test_line_constructors() {
        let id = AccountId::new();
        let debit = JournalLineInput::debit(id, dec!(25), "SGD").with_tax("SR", dec!(2.25));
        assert_eq!(debit.net_debit(), dec!(25));
        assert_eq!(debit.tax_code.as_deref(), Some("SR"));

        let credit = JournalLineInput::credit(id, dec!(25), "SGD").with_description("Sale");
        assert_eq!(credit.net_debit(), dec!(-25));
        assert_eq!(credit.description.as_deref(), Some("Sale"));
    }

    #[test]
    fn test_totals_from_lines() {
        let id = AccountId::new();
        let lines = vec![
            JournalLineInput::debit(id, dec!(70), "SGD"),
            JournalLineInput::debit(id, dec!(30), "SGD"),
            JournalLineInput::credit(id, dec!(100), "SGD"),
        ];
        let totals = JournalTotals::from_lines(&lines);
        assert_eq!(totals.total_debit, dec!(100));
        assert!(totals.is_balanced);
    }
}
