//! Pieces shared by the sales and purchase invoice managers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait};
use sgbooks_core::{
    gst::GstError,
    invoice::{InvoiceError, InvoiceLineInput, InvoiceStatus, InvoiceTotals, calculate_totals, due_date},
    ledger::JournalLineInput,
};
use sgbooks_db::{
    DbConn,
    InvoiceLineRecord, ProductRepository, SettingsRepository, TaxCodeRepository, db_error,
    entities::{purchase_invoice_lines, sales_invoice_lines},
};
use sgbooks_shared::{
    AppError, AppResult,
    types::{AccountId, round_money},
};
use uuid::Uuid;

use super::posting::JournalPoster;
use crate::dto::InvoiceLineDto;

/// Which side of the business an invoice sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InvoiceKind {
    /// Revenue lines are credited, receivables debited.
    Sales,
    /// Expense lines are debited, payables credited.
    Purchase,
}

impl InvoiceKind {
    const fn label(self) -> &'static str {
        match self {
            Self::Sales => "revenue",
            Self::Purchase => "expense",
        }
    }
}

/// One stored invoice line as the ledger sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PostingLine {
    pub account_id: Uuid,
    pub description: String,
    pub subtotal: Decimal,
    pub tax_code: Option<String>,
    pub tax_amount: Decimal,
}

impl From<&sales_invoice_lines::Model> for PostingLine {
    fn from(line: &sales_invoice_lines::Model) -> Self {
        Self {
            account_id: line.account_id,
            description: line.description.clone(),
            subtotal: line.line_subtotal,
            tax_code: line.tax_code.clone(),
            tax_amount: line.tax_amount,
        }
    }
}

impl From<&purchase_invoice_lines::Model> for PostingLine {
    fn from(line: &purchase_invoice_lines::Model) -> Self {
        Self {
            account_id: line.account_id,
            description: line.description.clone(),
            subtotal: line.line_subtotal,
            tax_code: line.tax_code.clone(),
            tax_amount: line.tax_amount,
        }
    }
}

/// Accounts and currency of the invoice being posted.
#[derive(Debug, Clone)]
pub(crate) struct InvoicePosting<'a> {
    pub kind: InvoiceKind,
    pub control_account: Uuid,
    pub gst_account: Option<Uuid>,
    pub currency_code: &'a str,
    pub exchange_rate: Decimal,
    pub invoice_no: &'a str,
}

/// Builds the balanced journal lines for an invoice.
///
/// Each line amount is converted to the base currency and rounded to cents;
/// the control line is the sum of the converted lines, so the entry balances
/// exactly. Lines that convert to zero are skipped.
///
/// # Errors
///
/// Fails with `MissingAccount` when the invoice carries tax but no GST
/// account was supplied.
pub(crate) fn invoice_journal_lines(
    posting: &InvoicePosting<'_>,
    lines: &[PostingLine],
) -> Result<Vec<JournalLineInput>, GstError> {
    let convert = |amount: Decimal| round_money(amount * posting.exchange_rate);
    let side = |account: Uuid, amount: Decimal, detail: bool| {
        let id = AccountId::from_uuid(account);
        let debit = (posting.kind == InvoiceKind::Sales) != detail;
        let line = if debit {
            JournalLineInput::debit(id, amount, posting.currency_code)
        } else {
            JournalLineInput::credit(id, amount, posting.currency_code)
        };
        JournalLineInput {
            exchange_rate: posting.exchange_rate,
            ..line
        }
    };

    let mut journal = Vec::with_capacity(lines.len() + 2);
    let mut total = Decimal::ZERO;
    let mut tax_total = Decimal::ZERO;

    for line in lines {
        let amount = convert(line.subtotal);
        let tax = convert(line.tax_amount);
        tax_total += tax;
        if amount.is_zero() {
            continue;
        }
        total += amount;

        let mut entry = side(line.account_id, amount, true).with_description(line.description.clone());
        if let Some(code) = &line.tax_code {
            entry = entry.with_tax(code.clone(), tax);
        }
        journal.push(entry);
    }

    if !tax_total.is_zero() {
        let gst_account = posting.gst_account.ok_or_else(|| {
            GstError::MissingAccount(match posting.kind {
                InvoiceKind::Sales => sgbooks_core::gst::GST_OUTPUT_ACCOUNT.to_string(),
                InvoiceKind::Purchase => sgbooks_core::gst::GST_INPUT_ACCOUNT.to_string(),
            })
        })?;
        journal.push(side(gst_account, tax_total, true).with_description("GST"));
        total += tax_total;
    }

    if !total.is_zero() {
        journal.push(side(posting.control_account, total, false).with_description(posting.invoice_no));
    }
    Ok(journal)
}

/// Turns entered lines into priced, taxed records.
#[derive(Debug, Clone)]
pub(crate) struct LineResolver {
    products: ProductRepository,
    tax_codes: TaxCodeRepository,
    settings: SettingsRepository,
}

impl LineResolver {
    pub(crate) fn new(db: &DbConn) -> Self {
        Self {
            products: ProductRepository::new(db.clone()),
            tax_codes: TaxCodeRepository::new(db.clone()),
            settings: SettingsRepository::new(db.clone()),
        }
    }

    /// Fills defaults from the product, looks up tax rates and computes amounts.
    pub(crate) async fn resolve<C: ConnectionTrait>(
        &self,
        conn: &C,
        kind: InvoiceKind,
        lines: &[InvoiceLineDto],
    ) -> AppResult<(Vec<InvoiceLineRecord>, InvoiceTotals)> {
        let mut pending = Vec::with_capacity(lines.len());
        let mut inputs = Vec::with_capacity(lines.len());

        for (index, line) in lines.iter().enumerate() {
            let product = match line.product_id {
                Some(id) => Some(self.products.require(conn, id).await?),
                None => None,
            };
            let product_account = product.as_ref().and_then(|p| match kind {
                InvoiceKind::Sales => p.sales_account_id,
                InvoiceKind::Purchase => p.purchase_account_id,
            });
            let account_id = line.account_id.or(product_account).ok_or_else(|| {
                AppError::validation(format!(
                    "Line {}: choose a {} account or a product that has one",
                    index + 1,
                    kind.label()
                ))
            })?;

            let tax_code = line
                .tax_code
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_uppercase)
                .or_else(|| product.as_ref().and_then(|p| p.tax_code.clone()));
            let tax_rate = match &tax_code {
                Some(code) => self.tax_codes.get(conn, code).await?.rate,
                None => Decimal::ZERO,
            };

            inputs.push(InvoiceLineInput {
                quantity: line.quantity,
                unit_price: line.unit_price,
                discount_percent: line.discount_percent,
                tax_rate,
            });
            pending.push((line, account_id, tax_code));
        }

        let (amounts, totals) = calculate_totals(&inputs)?;
        let records = pending
            .into_iter()
            .zip(amounts)
            .map(|((line, account_id, tax_code), amounts)| InvoiceLineRecord {
                product_id: line.product_id,
                account_id,
                description: line.description.trim().to_string(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                discount_percent: line.discount_percent,
                tax_code,
                amounts,
            })
            .collect();
        Ok((records, totals))
    }

    /// Returns the party's control account, or the configured default.
    pub(crate) async fn control_account<C: ConnectionTrait>(
        &self,
        conn: &C,
        poster: &JournalPoster,
        party_override: Option<Uuid>,
        config_key: &str,
    ) -> AppResult<Uuid> {
        if let Some(id) = party_override {
            return Ok(id);
        }
        let code = self
            .settings
            .get_value(config_key)
            .await
            .map_err(db_error)?
            .ok_or_else(|| {
                AppError::BusinessRule(format!("No default control account configured ({config_key})"))
            })?;
        let account = poster
            .account_by_code(conn, &code, || {
                AppError::NotFound(format!("Control account '{code}' not found"))
            })
            .await?;
        Ok(account.id)
    }
}

/// Due date from the request, or from the party's credit terms.
pub(crate) fn resolve_due_date(
    invoice_date: NaiveDate,
    requested: Option<NaiveDate>,
    credit_terms: i32,
) -> AppResult<NaiveDate> {
    let due = requested.unwrap_or_else(|| {
        due_date(invoice_date, u32::try_from(credit_terms).unwrap_or_default())
    });
    if due < invoice_date {
        return Err(AppError::validation("Due date cannot be before the invoice date"));
    }
    Ok(due)
}

/// Fails unless the invoice is still a draft.
pub(crate) fn require_draft(status: InvoiceStatus) -> Result<(), InvoiceError> {
    if status == InvoiceStatus::Draft {
        Ok(())
    } else {
        Err(InvoiceError::InvalidStatus {
            status,
            expected: "Draft",
        })
    }
}

#[cfg(test)]
#[path = "invoicing_tests.rs"]
mod tests;
