//! Sales invoices.

use sea_orm::{ConnectionTrait};
use sgbooks_core::{gst::GST_OUTPUT_ACCOUNT, invoice::InvoiceTotals, ledger::JournalType};
use sgbooks_db::{
    DbConn,
    CurrencyRepository, CustomerRepository, InvoiceFilter, InvoiceHeader, InvoiceRepoError,
    SalesInvoiceRepository, SalesInvoiceWithLines,
    entities::{sales_invoices, sea_orm_active_enums::AuditAction},
    sequence_names,
};
use sgbooks_shared::{AppError, AppResult};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use super::invoicing::{
    InvoiceKind, InvoicePosting, LineResolver, PostingLine, invoice_journal_lines,
    require_draft, resolve_due_date,
};
use super::posting::{EntryHeader, JournalPoster};
use super::settings::config_keys;
use super::{audit, begin, commit};
use crate::dto::SalesInvoiceDto;

const ENTITY: &str = "sales_invoice";

/// Manages sales invoices from draft to posting.
#[derive(Debug, Clone)]
pub struct SalesInvoiceManager {
    db: DbConn,
    invoices: SalesInvoiceRepository,
    customers: CustomerRepository,
    currencies: CurrencyRepository,
    resolver: LineResolver,
    poster: JournalPoster,
}

impl SalesInvoiceManager {
    /// Creates a new manager.
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self {
            invoices: SalesInvoiceRepository::new(db.clone()),
            customers: CustomerRepository::new(db.clone()),
            currencies: CurrencyRepository::new(db.clone()),
            resolver: LineResolver::new(&db),
            poster: JournalPoster::new(&db),
            db,
        }
    }

    /// Saves a draft invoice with computed totals.
    #[instrument(skip(self, dto), fields(customer_id = %dto.customer_id))]
    pub async fn create_invoice(&self, dto: SalesInvoiceDto) -> AppResult<SalesInvoiceWithLines> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        let header = self.header(&txn, &dto).await?;
        let (lines, totals) = self.resolver.resolve(&txn, InvoiceKind::Sales, &dto.lines).await?;
        let invoice_no = self
            .poster
            .next_number(&txn, sequence_names::SALES_INVOICE)
            .await?;
        let created = self
            .invoices
            .insert_draft(&txn, invoice_no, InvoiceHeader { totals, ..header }, &lines)
            .await?;
        audit(&txn, ENTITY, created.invoice.id, AuditAction::Insert, Some(&created.invoice)).await?;
        commit(txn).await?;
        Ok(created)
    }

    /// Replaces a draft's header and lines.
    #[instrument(skip(self, dto))]
    pub async fn update_invoice(
        &self,
        id: Uuid,
        dto: SalesInvoiceDto,
    ) -> AppResult<SalesInvoiceWithLines> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        let header = self.header(&txn, &dto).await?;
        let (lines, totals) = self.resolver.resolve(&txn, InvoiceKind::Sales, &dto.lines).await?;
        let updated = self
            .invoices
            .replace_draft(&txn, id, InvoiceHeader { totals, ..header }, &lines)
            .await?;
        audit(&txn, ENTITY, id, AuditAction::Update, Some(&updated.invoice)).await?;
        commit(txn).await?;
        Ok(updated)
    }

    /// Posts a draft: Dr receivables, Cr revenue per line, Cr GST output.
    #[instrument(skip(self))]
    pub async fn post_invoice(&self, id: Uuid) -> AppResult<sales_invoices::Model> {
        let txn = begin(self.db.as_ref()).await?;
        let SalesInvoiceWithLines { invoice, lines } = self
            .invoices
            .find_with_lines(&txn, id)
            .await?
            .ok_or(InvoiceRepoError::NotFound(id))?;
        require_draft(invoice.status.into())?;

        let customer = self.customers.require(&txn, invoice.customer_id).await?;
        let control_account = self
            .resolver
            .control_account(
                &txn,
                &self.poster,
                customer.receivables_account_id,
                config_keys::DEFAULT_RECEIVABLES_ACCOUNT,
            )
            .await?;
        let gst_account = self.poster.find_account(&txn, GST_OUTPUT_ACCOUNT).await?;

        let posting_lines: Vec<PostingLine> = lines.iter().map(PostingLine::from).collect();
        let journal = invoice_journal_lines(
            &InvoicePosting {
                kind: InvoiceKind::Sales,
                control_account,
                gst_account,
                currency_code: &invoice.currency_code,
                exchange_rate: invoice.exchange_rate,
                invoice_no: &invoice.invoice_no,
            },
            &posting_lines,
        )?;

        let entry = self
            .poster
            .post_new(
                &txn,
                EntryHeader {
                    journal_type: JournalType::Sales,
                    entry_date: invoice.invoice_date,
                    description: format!("Sales invoice {} - {}", invoice.invoice_no, customer.name),
                    reference: Some(invoice.invoice_no.clone()),
                    source: Some((ENTITY, id)),
                },
                &journal,
            )
            .await?;
        let posted = self.invoices.mark_posted(&txn, id, entry.id).await?;
        audit(&txn, ENTITY, id, AuditAction::Post, Some(&posted)).await?;
        commit(txn).await?;

        tracing::info!(
            invoice_no = %posted.invoice_no,
            entry_no = %entry.entry_no,
            total = %posted.total_amount,
            "Sales invoice posted"
        );
        Ok(posted)
    }

    /// Voids a draft.
    #[instrument(skip(self))]
    pub async fn void_invoice(&self, id: Uuid) -> AppResult<sales_invoices::Model> {
        let txn = begin(self.db.as_ref()).await?;
        let voided = self.invoices.void_draft(&txn, id).await?;
        audit(&txn, ENTITY, id, AuditAction::Void, Some(&voided)).await?;
        commit(txn).await?;

        tracing::info!(invoice_no = %voided.invoice_no, "Sales invoice voided");
        Ok(voided)
    }

    /// Loads an invoice with its lines.
    pub async fn get_invoice(&self, id: Uuid) -> AppResult<SalesInvoiceWithLines> {
        Ok(self
            .invoices
            .find_with_lines(self.db.as_ref(), id)
            .await?
            .ok_or(InvoiceRepoError::NotFound(id))?)
    }

    /// Lists invoice headers, newest first.
    pub async fn list_invoices(&self, filter: InvoiceFilter) -> AppResult<Vec<sales_invoices::Model>> {
        Ok(self.invoices.list(filter).await?)
    }

    async fn header<C: ConnectionTrait>(
        &self,
        conn: &C,
        dto: &SalesInvoiceDto,
    ) -> AppResult<InvoiceHeader> {
        let customer = self.customers.require(conn, dto.customer_id).await?;
        if !customer.is_active {
            return Err(AppError::BusinessRule(format!(
                "Customer {} is inactive",
                customer.customer_code
            )));
        }
        self.currencies.require_active(conn, &dto.currency_code).await?;

        Ok(InvoiceHeader {
            party_id: customer.id,
            invoice_date: dto.invoice_date,
            due_date: resolve_due_date(dto.invoice_date, dto.due_date, customer.credit_terms)?,
            currency_code: dto.currency_code.clone(),
            exchange_rate: dto.exchange_rate,
            totals: InvoiceTotals::default(),
            notes: dto.notes.clone(),
        })
    }
}
