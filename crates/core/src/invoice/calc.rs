//! Invoice line and total calculations.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sgbooks_shared::types::round_money;

use super::error::InvoiceError;

/// Invoice lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    /// Editable, not yet posted.
    Draft,
    /// Posted to the ledger, nothing paid.
    Approved,
    /// Some payment received.
    PartiallyPaid,
    /// Fully settled.
    Paid,
    /// Past due with a balance outstanding.
    Overdue,
    /// Cancelled.
    Voided,
}

impl InvoiceStatus {
    /// Returns the canonical name stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Approved => "Approved",
            Self::PartiallyPaid => "PartiallyPaid",
            Self::Paid => "Paid",
            Self::Overdue => "Overdue",
            Self::Voided => "Voided",
        }
    }

    /// Whether payments can be allocated against the invoice.
    #[must_use]
    pub const fn accepts_payment(self) -> bool {
        matches!(self, Self::Approved | Self::PartiallyPaid | Self::Overdue)
    }
}

/// One invoice line as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLineInput {
    /// Quantity sold or bought.
    pub quantity: Decimal,
    /// Price per unit before discount.
    pub unit_price: Decimal,
    /// Discount percentage (0-100).
    pub discount_percent: Decimal,
    /// Tax rate as a percentage (e.g. 9 for 9%).
    pub tax_rate: Decimal,
}

/// Computed amounts for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLineAmounts {
    /// Discount amount.
    pub discount_amount: Decimal,
    /// Amount after discount, before tax.
    pub line_subtotal: Decimal,
    /// Tax on the subtotal.
    pub tax_amount: Decimal,
    /// Subtotal plus tax.
    pub line_total: Decimal,
}

/// Header totals for an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of line subtotals.
    pub subtotal: Decimal,
    /// Sum of line taxes.
    pub tax_amount: Decimal,
    /// Subtotal plus tax.
    pub total_amount: Decimal,
}

/// Calculates one line. Every amount is rounded to cents.
///
/// # Errors
///
/// Returns an error for a non-positive quantity, a negative price, or a
/// discount outside 0-100%. `line_no` is used in messages.
pub fn calculate_line(
    line_no: usize,
    line: &InvoiceLineInput,
) -> Result<InvoiceLineAmounts, InvoiceError> {
    if line.quantity <= Decimal::ZERO {
        return Err(InvoiceError::InvalidQuantity(line_no));
    }
    if line.unit_price < Decimal::ZERO {
        return Err(InvoiceError::NegativePrice(line_no));
    }
    if line.discount_percent < Decimal::ZERO || line.discount_percent > Decimal::ONE_HUNDRED {
        return Err(InvoiceError::InvalidDiscount(line_no));
    }

    let gross = line.quantity * line.unit_price;
    let discount_amount = round_money(gross * line.discount_percent / Decimal::ONE_HUNDRED);
    let line_subtotal = round_money(gross) - discount_amount;
    let tax_amount = round_money(line_subtotal * line.tax_rate / Decimal::ONE_HUNDRED);

    Ok(InvoiceLineAmounts {
        discount_amount,
        line_subtotal,
        tax_amount,
        line_total: line_subtotal + tax_amount,
    })
}

/// Calculates all lines and the header totals.
///
/// # Errors
///
/// Returns `NoLines` for an empty invoice, or the first line error.
pub fn calculate_totals(
    lines: &[InvoiceLineInput],
) -> Result<(Vec<InvoiceLineAmounts>, InvoiceTotals), InvoiceError> {
    if lines.is_empty() {
        return Err(InvoiceError::NoLines);
    }

    let amounts = lines
        .iter()
        .enumerate()
        .map(|(i, line)| calculate_line(i + 1, line))
        .collect::<Result<Vec<_>, _>>()?;

    let subtotal: Decimal = amounts.iter().map(|a| a.line_subtotal).sum();
    let tax_amount: Decimal = amounts.iter().map(|a| a.tax_amount).sum();

    Ok((
        amounts,
        InvoiceTotals {
            subtotal,
            tax_amount,
            total_amount: subtotal + tax_amount,
        },
    ))
}

/// Due date from invoice date plus credit terms in days.
#[must_use]
pub fn due_date(invoice_date: NaiveDate, credit_terms_days: u32) -> NaiveDate {
    invoice_date
        .checked_add_days(Days::new(u64::from(credit_terms_days)))
        .unwrap_or(invoice_date)
}

/// Whether an unpaid invoice is past due on `today`.
#[must_use]
pub fn is_overdue(status: InvoiceStatus, due_date: NaiveDate, today: NaiveDate) -> bool {
    matches!(status, InvoiceStatus::Approved | InvoiceStatus::PartiallyPaid) && today > due_date
}

/// Applies a payment and returns the new `(amount_paid, status)`.
///
/// # Errors
///
/// Returns an error if the invoice does not accept payments or the payment
/// exceeds the outstanding balance.
pub fn apply_payment(
    status: InvoiceStatus,
    total_amount: Decimal,
    amount_paid: Decimal,
    payment: Decimal,
) -> Result<(Decimal, InvoiceStatus), InvoiceError> {
    if !status.accepts_payment() {
        return Err(InvoiceError::InvalidStatus {
            status,
            expected: "Approved, PartiallyPaid or Overdue",
        });
    }

    let outstanding = total_amount - amount_paid;
    if payment > outstanding {
        return Err(InvoiceError::Overpayment {
            amount: payment,
            outstanding,
        });
    }

    let paid = amount_paid + payment;
    let new_status = if paid == total_amount {
        InvoiceStatus::Paid
    } else if paid.is_zero() {
        status
    } else if status == InvoiceStatus::Overdue {
        InvoiceStatus::Overdue
    } else {
        InvoiceStatus::PartiallyPaid
    };

    Ok((paid, new_status))
}
