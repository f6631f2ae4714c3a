//! Tax code repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use rust_decimal::Decimal;
use sgbooks_shared::AppError;
use uuid::Uuid;

use crate::{DbConn, entities::{sea_orm_active_enums::TaxType, tax_codes}};

/// Error types for tax code operations.
#[derive(Debug, thiserror::Error)]
pub enum TaxCodeError {
    /// Code already exists.
    #[error("Tax code '{0}' already exists")]
    DuplicateCode(String),

    /// Code not found.
    #[error("Tax code '{0}' not found")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TaxCodeError> for AppError {
    fn from(err: TaxCodeError) -> Self {
        match err {
            TaxCodeError::DuplicateCode(_) => Self::Conflict(err.to_string()),
            TaxCodeError::NotFound(_) => Self::NotFound(err.to_string()),
            TaxCodeError::Database(db) => super::db_error(db),
        }
    }
}

/// Input for creating a tax code.
#[derive(Debug, Clone)]
pub struct CreateTaxCodeInput {
    /// Code (e.g. "SR").
    pub code: String,
    /// Description.
    pub description: String,
    /// Kind of tax.
    pub tax_type: TaxType,
    /// Rate in percent.
    pub rate: Decimal,
    /// Whether this is the default code for new lines.
    pub is_default: bool,
    /// Account the tax posts to.
    pub affects_account_id: Option<Uuid>,
}

/// Tax code repository.
#[derive(Debug, Clone)]
pub struct TaxCodeRepository {
    db: DbConn,
}

impl TaxCodeRepository {
    /// Creates a new tax code repository.
    #[must_use]
    pub const fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Lists tax codes ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, active_only: bool) -> Result<Vec<tax_codes::Model>, TaxCodeError> {
        let mut query = tax_codes::Entity::find().order_by_asc(tax_codes::Column::Code);
        if active_only {
            query = query.filter(tax_codes::Column::IsActive.eq(true));
        }
        Ok(query.all(self.db.as_ref()).await?)
    }

    /// Finds a tax code by its code.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no row matches.
    pub async fn get<C: ConnectionTrait>(
        &self,
        conn: &C,
        code: &str,
    ) -> Result<tax_codes::Model, TaxCodeError> {
        tax_codes::Entity::find()
            .filter(tax_codes::Column::Code.eq(code))
            .one(conn)
            .await?
            .ok_or_else(|| TaxCodeError::NotFound(code.to_string()))
    }

    /// Creates a tax code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code exists or the insert fails.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        input: CreateTaxCodeInput,
    ) -> Result<tax_codes::Model, TaxCodeError> {
        let existing = tax_codes::Entity::find()
            .filter(tax_codes::Column::Code.eq(&input.code))
            .one(conn)
            .await?;
        if existing.is_some() {
            return Err(TaxCodeError::DuplicateCode(input.code));
        }

        let created = tax_codes::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(input.code),
            description: Set(input.description),
            tax_type: Set(input.tax_type),
            rate: Set(input.rate),
            is_default: Set(input.is_default),
            is_active: Set(true),
            affects_account_id: Set(input.affects_account_id),
        }
        .insert(conn)
        .await?;

        tracing::info!(code = %created.code, rate = %created.rate, "Tax code created");
        Ok(created)
    }
}
