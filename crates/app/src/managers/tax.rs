//! GST tax codes.

use rust_decimal::Decimal;
use sgbooks_core::gst::calculate_tax;
use sgbooks_db::{
    DbConn,
    TaxCodeRepository,
    entities::{sea_orm_active_enums::AuditAction, tax_codes},
};
use sgbooks_shared::AppResult;
use tracing::instrument;
use validator::Validate;

use super::{audit, begin, commit};
use crate::dto::CreateTaxCodeDto;

/// Manages tax codes.
#[derive(Debug, Clone)]
pub struct TaxCodeManager {
    db: DbConn,
    tax_codes: TaxCodeRepository,
}

impl TaxCodeManager {
    /// Creates a new manager.
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self {
            tax_codes: TaxCodeRepository::new(db.clone()),
            db,
        }
    }

    /// Lists tax codes, optionally only active ones.
    pub async fn list_tax_codes(&self, active_only: bool) -> AppResult<Vec<tax_codes::Model>> {
        Ok(self.tax_codes.list(active_only).await?)
    }

    /// Loads a tax code by its code.
    pub async fn get_tax_code(&self, code: &str) -> AppResult<tax_codes::Model> {
        Ok(self
            .tax_codes
            .get(self.db.as_ref(), &code.trim().to_uppercase())
            .await?)
    }

    /// Adds a tax code.
    #[instrument(skip(self, dto), fields(code = %dto.code))]
    pub async fn create_tax_code(&self, dto: CreateTaxCodeDto) -> AppResult<tax_codes::Model> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        let created = self.tax_codes.create(&txn, dto.into()).await?;
        audit(&txn, "tax_code", created.id, AuditAction::Insert, Some(&created)).await?;
        commit(txn).await?;

        tracing::info!(code = %created.code, rate = %created.rate, "Tax code created");
        Ok(created)
    }

    /// Tax on `amount` under the given code, rounded to cents.
    pub async fn calculate_tax(&self, amount: Decimal, code: &str) -> AppResult<Decimal> {
        let tax_code = self.get_tax_code(code).await?;
        Ok(calculate_tax(amount, tax_code.rate))
    }
}
