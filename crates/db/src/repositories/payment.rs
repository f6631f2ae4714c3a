//! Payment and allocation repository.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set,
};
use sgbooks_shared::AppError;
use uuid::Uuid;

use crate::{DbConn, entities::{
    payment_allocations, payments,
    sea_orm_active_enums::{AllocationDocumentType, PaymentMethod, PaymentStatus, PaymentType},
}};

/// Error types for payment persistence.
#[derive(Debug, thiserror::Error)]
pub enum PaymentRepoError {
    /// Payment not found.
    #[error("Payment not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PaymentRepoError> for AppError {
    fn from(err: PaymentRepoError) -> Self {
        match err {
            PaymentRepoError::NotFound(_) => Self::NotFound(err.to_string()),
            PaymentRepoError::Database(db) => super::db_error(db),
        }
    }
}

/// A payment header ready to be stored.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Number from the `payment` sequence.
    pub payment_no: String,
    /// Direction.
    pub payment_type: PaymentType,
    /// Method.
    pub payment_method: PaymentMethod,
    /// Payment date.
    pub payment_date: NaiveDate,
    /// Customer or vendor.
    pub entity_id: Uuid,
    /// Bank account the money moved through.
    pub bank_account_id: Uuid,
    /// Currency.
    pub currency_code: String,
    /// Rate to base currency.
    pub exchange_rate: Decimal,
    /// Total amount.
    pub amount: Decimal,
    /// External reference.
    pub reference: Option<String>,
    /// Description.
    pub description: Option<String>,
}

/// One allocation of a payment to an invoice.
#[derive(Debug, Clone, Copy)]
pub struct NewAllocation {
    /// Invoice kind.
    pub document_type: AllocationDocumentType,
    /// Invoice ID.
    pub document_id: Uuid,
    /// Amount applied.
    pub amount: Decimal,
}

/// Payment with its allocations.
#[derive(Debug, Clone)]
pub struct PaymentWithAllocations {
    /// The header.
    pub payment: payments::Model,
    /// Allocations.
    pub allocations: Vec<payment_allocations::Model>,
}

/// Filter options for listing payments.
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    /// Direction.
    pub payment_type: Option<PaymentType>,
    /// Customer or vendor.
    pub entity_id: Option<Uuid>,
    /// Earliest payment date (inclusive).
    pub start_date: Option<NaiveDate>,
    /// Latest payment date (inclusive).
    pub end_date: Option<NaiveDate>,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DbConn,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Stores an approved payment with its allocations.
    ///
    /// # Errors
    ///
    /// Returns an error if a write fails.
    pub async fn insert_approved<C: ConnectionTrait>(
        &self,
        conn: &C,
        input: NewPayment,
        allocations: &[NewAllocation],
    ) -> Result<PaymentWithAllocations, PaymentRepoError> {
        let payment = payments::ActiveModel {
            id: Set(Uuid::now_v7()),
            payment_no: Set(input.payment_no),
            payment_type: Set(input.payment_type),
            payment_method: Set(input.payment_method),
            payment_date: Set(input.payment_date),
            entity_id: Set(input.entity_id),
            bank_account_id: Set(input.bank_account_id),
            currency_code: Set(input.currency_code),
            exchange_rate: Set(input.exchange_rate),
            amount: Set(input.amount),
            reference: Set(input.reference),
            description: Set(input.description),
            status: Set(PaymentStatus::Approved),
            journal_entry_id: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(conn)
        .await?;

        let mut stored = Vec::with_capacity(allocations.len());
        for allocation in allocations {
            let row = payment_allocations::ActiveModel {
                id: Set(Uuid::now_v7()),
                payment_id: Set(payment.id),
                document_type: Set(allocation.document_type),
                document_id: Set(allocation.document_id),
                amount: Set(allocation.amount),
            }
            .insert(conn)
            .await?;
            stored.push(row);
        }

        tracing::info!(
            payment_no = %payment.payment_no,
            amount = %payment.amount,
            allocations = stored.len(),
            "Payment stored"
        );
        Ok(PaymentWithAllocations {
            payment,
            allocations: stored,
        })
    }

    /// Links the journal entry posted for a payment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the payment is missing.
    pub async fn link_journal_entry<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        journal_entry_id: Uuid,
    ) -> Result<payments::Model, PaymentRepoError> {
        let payment = payments::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(PaymentRepoError::NotFound(id))?;
        let mut active: payments::ActiveModel = payment.into();
        active.journal_entry_id = Set(Some(journal_entry_id));
        Ok(active.update(conn).await?)
    }

    /// Loads a payment with its allocations.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the payment is missing.
    pub async fn find_with_allocations<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<PaymentWithAllocations, PaymentRepoError> {
        let payment = payments::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(PaymentRepoError::NotFound(id))?;
        let allocations = payment
            .find_related(payment_allocations::Entity)
            .all(conn)
            .await?;
        Ok(PaymentWithAllocations {
            payment,
            allocations,
        })
    }

    /// Lists payments, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self, filter: PaymentFilter) -> Result<Vec<payments::Model>, PaymentRepoError> {
        let mut query = payments::Entity::find()
            .order_by_desc(payments::Column::PaymentDate)
            .order_by_desc(payments::Column::PaymentNo);
        if let Some(payment_type) = filter.payment_type {
            query = query.filter(payments::Column::PaymentType.eq(payment_type));
        }
        if let Some(entity_id) = filter.entity_id {
            query = query.filter(payments::Column::EntityId.eq(entity_id));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(payments::Column::PaymentDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(payments::Column::PaymentDate.lte(end));
        }
        Ok(query.all(self.db.as_ref()).await?)
    }
}
