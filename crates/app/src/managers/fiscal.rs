//! Fiscal years and their periods.

use chrono::NaiveDate;
use sgbooks_core::fiscal::{FiscalError, FiscalPeriodStatus};
use sgbooks_db::{
    DbConn,
    FiscalRepoError, FiscalRepository, FiscalYearWithPeriods,
    entities::{fiscal_periods, fiscal_years, sea_orm_active_enums::AuditAction},
};
use sgbooks_shared::AppResult;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use super::{audit, begin, commit};
use crate::dto::CreateFiscalYearDto;

/// Manages fiscal years and the open/closed state of their periods.
#[derive(Debug, Clone)]
pub struct FiscalPeriodManager {
    db: DbConn,
    fiscal: FiscalRepository,
}

impl FiscalPeriodManager {
    /// Creates a new manager.
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self {
            fiscal: FiscalRepository::new(db.clone()),
            db,
        }
    }

    /// Creates a fiscal year and generates its Month or Quarter periods.
    #[instrument(skip(self, dto), fields(year = %dto.year_name))]
    pub async fn create_fiscal_year(
        &self,
        dto: CreateFiscalYearDto,
    ) -> AppResult<FiscalYearWithPeriods> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        let created = self.fiscal.create_fiscal_year(&txn, dto.into()).await?;
        audit(
            &txn,
            "fiscal_year",
            created.fiscal_year.id,
            AuditAction::Insert,
            Some(&created.fiscal_year),
        )
        .await?;
        commit(txn).await?;

        tracing::info!(
            year = %created.fiscal_year.year_name,
            periods = created.periods.len(),
            "Fiscal year created"
        );
        Ok(created)
    }

    /// Lists fiscal years with their periods, latest first.
    pub async fn list_fiscal_years(&self) -> AppResult<Vec<FiscalYearWithPeriods>> {
        Ok(self.fiscal.list_fiscal_years().await?)
    }

    /// Returns the period covering `date`.
    pub async fn period_for_date(&self, date: NaiveDate) -> AppResult<fiscal_periods::Model> {
        Ok(self
            .fiscal
            .find_period_for_date(self.db.as_ref(), date)
            .await?
            .ok_or(FiscalError::NoPeriodForDate(date))?)
    }

    /// Loads a period by id.
    pub async fn get_period(&self, id: Uuid) -> AppResult<fiscal_periods::Model> {
        Ok(self
            .fiscal
            .find_period_by_id(id)
            .await?
            .ok_or(FiscalRepoError::PeriodNotFound(id))?)
    }

    /// Closes a period so nothing more can be posted into it.
    pub async fn close_period(&self, id: Uuid) -> AppResult<fiscal_periods::Model> {
        self.set_period_status(id, FiscalPeriodStatus::Closed).await
    }

    /// Reopens a closed period.
    pub async fn reopen_period(&self, id: Uuid) -> AppResult<fiscal_periods::Model> {
        self.set_period_status(id, FiscalPeriodStatus::Open).await
    }

    /// Closes a fiscal year once all its periods are closed.
    #[instrument(skip(self))]
    pub async fn close_fiscal_year(&self, id: Uuid) -> AppResult<fiscal_years::Model> {
        let txn = begin(self.db.as_ref()).await?;
        let year = self.fiscal.close_fiscal_year(&txn, id).await?;
        audit(&txn, "fiscal_year", id, AuditAction::Update, Some(&year)).await?;
        commit(txn).await?;
        Ok(year)
    }

    #[instrument(skip(self))]
    async fn set_period_status(
        &self,
        id: Uuid,
        status: FiscalPeriodStatus,
    ) -> AppResult<fiscal_periods::Model> {
        let txn = begin(self.db.as_ref()).await?;
        let period = self.fiscal.update_period_status(&txn, id, status).await?;
        audit(&txn, "fiscal_period", id, AuditAction::Update, Some(&period)).await?;
        commit(txn).await?;
        Ok(period)
    }
}
