//! Purchase invoice repository.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use sgbooks_core::invoice::apply_payment;
use uuid::Uuid;

use super::invoice::{
    InvoiceFilter, InvoiceHeader, InvoiceLineRecord, InvoiceRepoError, ensure_draft,
};
use crate::{DbConn, entities::{purchase_invoice_lines, purchase_invoices, sea_orm_active_enums}};

/// Purchase invoice header with its lines.
#[derive(Debug, Clone)]
pub struct PurchaseInvoiceWithLines {
    /// The header.
    pub invoice: purchase_invoices::Model,
    /// Lines ordered by line number.
    pub lines: Vec<purchase_invoice_lines::Model>,
}

/// Purchase invoice repository.
#[derive(Debug, Clone)]
pub struct PurchaseInvoiceRepository {
    db: DbConn,
}

impl PurchaseInvoiceRepository {
    /// Creates a new purchase invoice repository.
    #[must_use]
    pub const fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Stores a draft invoice with its calculated lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn insert_draft<C: ConnectionTrait>(
        &self,
        conn: &C,
        invoice_no: String,
        vendor_invoice_no: Option<String>,
        header: InvoiceHeader,
        lines: &[InvoiceLineRecord],
    ) -> Result<PurchaseInvoiceWithLines, InvoiceRepoError> {
        let now = chrono::Utc::now().into();
        let invoice = purchase_invoices::ActiveModel {
            id: Set(Uuid::now_v7()),
            invoice_no: Set(invoice_no),
            vendor_id: Set(header.party_id),
            vendor_invoice_no: Set(vendor_invoice_no),
            invoice_date: Set(header.invoice_date),
            due_date: Set(header.due_date),
            currency_code: Set(header.currency_code),
            exchange_rate: Set(header.exchange_rate),
            subtotal: Set(header.totals.subtotal),
            tax_amount: Set(header.totals.tax_amount),
            total_amount: Set(header.totals.total_amount),
            amount_paid: Set(Decimal::ZERO),
            status: Set(sea_orm_active_enums::InvoiceStatus::Draft),
            notes: Set(header.notes),
            journal_entry_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await?;

        let lines = insert_lines(conn, invoice.id, lines).await?;
        tracing::info!(
            invoice_no = %invoice.invoice_no,
            total = %invoice.total_amount,
            "Purchase invoice draft stored"
        );
        Ok(PurchaseInvoiceWithLines { invoice, lines })
    }

    /// Replaces the header and lines of a draft invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is missing or no longer a draft.
    pub async fn replace_draft<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        vendor_invoice_no: Option<String>,
        header: InvoiceHeader,
        lines: &[InvoiceLineRecord],
    ) -> Result<PurchaseInvoiceWithLines, InvoiceRepoError> {
        let invoice = self.require(conn, id).await?;
        ensure_draft(invoice.status.into())?;

        purchase_invoice_lines::Entity::delete_many()
            .filter(purchase_invoice_lines::Column::InvoiceId.eq(id))
            .exec(conn)
            .await?;

        let mut active: purchase_invoices::ActiveModel = invoice.into();
        active.vendor_id = Set(header.party_id);
        active.vendor_invoice_no = Set(vendor_invoice_no);
        active.invoice_date = Set(header.invoice_date);
        active.due_date = Set(header.due_date);
        active.currency_code = Set(header.currency_code);
        active.exchange_rate = Set(header.exchange_rate);
        active.subtotal = Set(header.totals.subtotal);
        active.tax_amount = Set(header.totals.tax_amount);
        active.total_amount = Set(header.totals.total_amount);
        active.notes = Set(header.notes);
        active.updated_at = Set(chrono::Utc::now().into());
        let invoice = active.update(conn).await?;

        let lines = insert_lines(conn, invoice.id, lines).await?;
        Ok(PurchaseInvoiceWithLines { invoice, lines })
    }

    /// Marks a draft approved and links its journal entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is missing or no longer a draft.
    pub async fn mark_posted<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        journal_entry_id: Uuid,
    ) -> Result<purchase_invoices::Model, InvoiceRepoError> {
        let invoice = self.require(conn, id).await?;
        ensure_draft(invoice.status.into())?;

        let mut active: purchase_invoices::ActiveModel = invoice.into();
        active.status = Set(sea_orm_active_enums::InvoiceStatus::Approved);
        active.journal_entry_id = Set(Some(journal_entry_id));
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(conn).await?)
    }

    /// Voids a draft invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is missing or no longer a draft.
    pub async fn void_draft<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<purchase_invoices::Model, InvoiceRepoError> {
        let invoice = self.require(conn, id).await?;
        ensure_draft(invoice.status.into())?;

        let mut active: purchase_invoices::ActiveModel = invoice.into();
        active.status = Set(sea_orm_active_enums::InvoiceStatus::Voided);
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(conn).await?)
    }

    /// Applies a payment to an invoice, locking the row first.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is missing, does not accept payments,
    /// or the payment exceeds the outstanding balance.
    pub async fn apply_payment<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        amount: Decimal,
    ) -> Result<purchase_invoices::Model, InvoiceRepoError> {
        let invoice = purchase_invoices::Entity::find_by_id(id)
            .lock_exclusive()
            .one(conn)
            .await?
            .ok_or(InvoiceRepoError::NotFound(id))?;

        let (amount_paid, status) = apply_payment(
            invoice.status.into(),
            invoice.total_amount,
            invoice.amount_paid,
            amount,
        )?;

        let mut active: purchase_invoices::ActiveModel = invoice.into();
        active.amount_paid = Set(amount_paid);
        active.status = Set(status.into());
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(conn).await?;

        tracing::info!(invoice_no = %updated.invoice_no, %amount, "Payment applied");
        Ok(updated)
    }

    /// Loads an invoice or fails with `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is missing or the query fails.
    pub async fn require<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<purchase_invoices::Model, InvoiceRepoError> {
        purchase_invoices::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(InvoiceRepoError::NotFound(id))
    }

    /// Loads an invoice with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_lines<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<PurchaseInvoiceWithLines>, InvoiceRepoError> {
        let Some(invoice) = purchase_invoices::Entity::find_by_id(id).one(conn).await? else {
            return Ok(None);
        };
        let lines = invoice
            .find_related(purchase_invoice_lines::Entity)
            .order_by_asc(purchase_invoice_lines::Column::LineNumber)
            .all(conn)
            .await?;
        Ok(Some(PurchaseInvoiceWithLines { invoice, lines }))
    }

    /// Lists invoice headers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: InvoiceFilter,
    ) -> Result<Vec<purchase_invoices::Model>, InvoiceRepoError> {
        let mut query = purchase_invoices::Entity::find()
            .order_by_desc(purchase_invoices::Column::InvoiceDate)
            .order_by_desc(purchase_invoices::Column::InvoiceNo);

        if let Some(party_id) = filter.party_id {
            query = query.filter(purchase_invoices::Column::VendorId.eq(party_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(
                purchase_invoices::Column::Status.eq(sea_orm_active_enums::InvoiceStatus::from(status)),
            );
        }
        if let Some(start) = filter.start_date {
            query = query.filter(purchase_invoices::Column::InvoiceDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(purchase_invoices::Column::InvoiceDate.lte(end));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        Ok(query.all(self.db.as_ref()).await?)
    }
}

async fn insert_lines<C: ConnectionTrait>(
    conn: &C,
    invoice_id: Uuid,
    lines: &[InvoiceLineRecord],
) -> Result<Vec<purchase_invoice_lines::Model>, DbErr> {
    let mut inserted = Vec::with_capacity(lines.len());
    for (line_number, line) in (1..).zip(lines) {
        let model = purchase_invoice_lines::ActiveModel {
            id: Set(Uuid::now_v7()),
            invoice_id: Set(invoice_id),
            line_number: Set(line_number),
            product_id: Set(line.product_id),
            account_id: Set(line.account_id),
            description: Set(line.description.clone()),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            discount_percent: Set(line.discount_percent),
            discount_amount: Set(line.amounts.discount_amount),
            line_subtotal: Set(line.amounts.line_subtotal),
            tax_code: Set(line.tax_code.clone()),
            tax_amount: Set(line.amounts.tax_amount),
            line_total: Set(line.amounts.line_total),
        }
        .insert(conn)
        .await?;
        inserted.push(model);
    }
    Ok(inserted)
}
