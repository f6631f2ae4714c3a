//! Fiscal repository for fiscal year and period management.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use sgbooks_core::fiscal::{self, FiscalError};
use sgbooks_shared::AppError;
use uuid::Uuid;

use crate::{DbConn, entities::{
    fiscal_periods, fiscal_years,
    sea_orm_active_enums::{FiscalPeriodStatus, PeriodType},
}};

/// Error types for fiscal operations.
#[derive(Debug, thiserror::Error)]
pub enum FiscalRepoError {
    /// A fiscal rule was violated.
    #[error(transparent)]
    Rule(#[from] FiscalError),

    /// Fiscal year not found.
    #[error("Fiscal year not found: {0}")]
    YearNotFound(Uuid),

    /// Fiscal period not found.
    #[error("Fiscal period not found: {0}")]
    PeriodNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<FiscalRepoError> for AppError {
    fn from(err: FiscalRepoError) -> Self {
        match err {
            FiscalRepoError::Rule(rule) => rule.into(),
            FiscalRepoError::YearNotFound(_) | FiscalRepoError::PeriodNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            FiscalRepoError::Database(db) => super::db_error(db),
        }
    }
}

/// Input for creating a fiscal year.
#[derive(Debug, Clone)]
pub struct CreateFiscalYearInput {
    /// Fiscal year name (e.g. "FY2026").
    pub year_name: String,
    /// Start date.
    pub start_date: NaiveDate,
    /// End date.
    pub end_date: NaiveDate,
    /// Granularity of the generated periods.
    pub period_type: fiscal::PeriodType,
}

/// Fiscal year with its periods.
#[derive(Debug, Clone)]
pub struct FiscalYearWithPeriods {
    /// The fiscal year.
    pub fiscal_year: fiscal_years::Model,
    /// Periods ordered by start date.
    pub periods: Vec<fiscal_periods::Model>,
}

/// Fiscal repository.
#[derive(Debug, Clone)]
pub struct FiscalRepository {
    db: DbConn,
}

impl FiscalRepository {
    /// Creates a new fiscal repository.
    #[must_use]
    pub const fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Creates a fiscal year and generates its periods.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - start_date >= end_date
    /// - The range overlaps an existing fiscal year
    /// - The database operation fails
    pub async fn create_fiscal_year<C: ConnectionTrait>(
        &self,
        conn: &C,
        input: CreateFiscalYearInput,
    ) -> Result<FiscalYearWithPeriods, FiscalRepoError> {
        fiscal::validate_date_range(input.start_date, input.end_date)?;

        let overlapping = fiscal_years::Entity::find()
            .filter(fiscal_years::Column::StartDate.lte(input.end_date))
            .filter(fiscal_years::Column::EndDate.gte(input.start_date))
            .one(conn)
            .await?;
        if let Some(existing) = overlapping {
            return Err(FiscalError::OverlappingYear(existing.year_name).into());
        }

        let now = chrono::Utc::now().into();
        let fiscal_year_id = Uuid::now_v7();
        let fiscal_year = fiscal_years::ActiveModel {
            id: Set(fiscal_year_id),
            year_name: Set(input.year_name.clone()),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            is_closed: Set(false),
            closed_at: Set(None),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;

        let generated = fiscal::generate_periods(
            &input.year_name,
            input.start_date,
            input.end_date,
            input.period_type,
        );

        let mut periods = Vec::with_capacity(generated.len());
        for period in generated {
            let inserted = fiscal_periods::ActiveModel {
                id: Set(Uuid::now_v7()),
                fiscal_year_id: Set(fiscal_year_id),
                name: Set(period.name),
                period_type: Set(PeriodType::from(input.period_type)),
                period_number: Set(period.period_number),
                start_date: Set(period.start_date),
                end_date: Set(period.end_date),
                status: Set(FiscalPeriodStatus::Open),
                is_adjustment: Set(false),
                closed_at: Set(None),
            }
            .insert(conn)
            .await?;
            periods.push(inserted);
        }

        tracing::info!(
            fiscal_year = %fiscal_year.year_name,
            periods = periods.len(),
            "Fiscal year created"
        );

        Ok(FiscalYearWithPeriods {
            fiscal_year,
            periods,
        })
    }

    /// Lists fiscal years, newest first, with their periods.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_fiscal_years(&self) -> Result<Vec<FiscalYearWithPeriods>, FiscalRepoError> {
        let years = fiscal_years::Entity::find()
            .order_by_desc(fiscal_years::Column::StartDate)
            .find_with_related(fiscal_periods::Entity)
            .all(self.db.as_ref())
            .await?;

        Ok(years
            .into_iter()
            .map(|(fiscal_year, mut periods)| {
                periods.sort_by_key(|p| (p.start_date, p.period_number));
                FiscalYearWithPeriods {
                    fiscal_year,
                    periods,
                }
            })
            .collect())
    }

    /// Finds the non-adjustment period covering a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_period_for_date<C: ConnectionTrait>(
        &self,
        conn: &C,
        date: NaiveDate,
    ) -> Result<Option<fiscal_periods::Model>, FiscalRepoError> {
        Ok(fiscal_periods::Entity::find()
            .filter(fiscal_periods::Column::StartDate.lte(date))
            .filter(fiscal_periods::Column::EndDate.gte(date))
            .filter(fiscal_periods::Column::IsAdjustment.eq(false))
            .order_by_desc(fiscal_periods::Column::StartDate)
            .one(conn)
            .await?)
    }

    /// Finds a period by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_period_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<fiscal_periods::Model>, FiscalRepoError> {
        Ok(fiscal_periods::Entity::find_by_id(id).one(self.db.as_ref()).await?)
    }

    /// Moves a period to a new status.
    ///
    /// # Errors
    ///
    /// Returns an error if the period is missing or the transition is invalid.
    pub async fn update_period_status<C: ConnectionTrait>(
        &self,
        conn: &C,
        period_id: Uuid,
        new_status: fiscal::FiscalPeriodStatus,
    ) -> Result<fiscal_periods::Model, FiscalRepoError> {
        let period = fiscal_periods::Entity::find_by_id(period_id)
            .one(conn)
            .await?
            .ok_or(FiscalRepoError::PeriodNotFound(period_id))?;

        let current = fiscal::FiscalPeriodStatus::from(period.status);
        fiscal::validate_status_transition(current, new_status)?;

        let mut active: fiscal_periods::ActiveModel = period.into();
        active.status = Set(new_status.into());
        active.closed_at = Set(match new_status {
            fiscal::FiscalPeriodStatus::Open => None,
            _ => Some(chrono::Utc::now().into()),
        });
        let updated = active.update(conn).await?;

        tracing::info!(period = %updated.name, from = %current, to = %new_status, "Period status changed");
        Ok(updated)
    }

    /// Closes a fiscal year once none of its periods is open.
    ///
    /// # Errors
    ///
    /// Returns an error if the year is missing, already closed, or still has
    /// open periods.
    pub async fn close_fiscal_year<C: ConnectionTrait>(
        &self,
        conn: &C,
        fiscal_year_id: Uuid,
    ) -> Result<fiscal_years::Model, FiscalRepoError> {
        let year = fiscal_years::Entity::find_by_id(fiscal_year_id)
            .one(conn)
            .await?
            .ok_or(FiscalRepoError::YearNotFound(fiscal_year_id))?;
        if year.is_closed {
            return Err(FiscalError::YearClosed(year.year_name).into());
        }

        let open_period = fiscal_periods::Entity::find()
            .filter(fiscal_periods::Column::FiscalYearId.eq(fiscal_year_id))
            .filter(fiscal_periods::Column::Status.eq(FiscalPeriodStatus::Open))
            .one(conn)
            .await?;
        if open_period.is_some() {
            return Err(FiscalError::OpenPeriodsRemain(year.year_name).into());
        }

        let mut active: fiscal_years::ActiveModel = year.into();
        active.is_closed = Set(true);
        active.closed_at = Set(Some(chrono::Utc::now().into()));
        let updated = active.update(conn).await?;

        tracing::info!(fiscal_year = %updated.year_name, "Fiscal year closed");
        Ok(updated)
    }
}

/// Converts a stored period into the domain view.
impl From<fiscal_periods::Model> for fiscal::FiscalPeriod {
    fn from(row: fiscal_periods::Model) -> Self {
        Self {
            id: sgbooks_shared::types::FiscalPeriodId::from_uuid(row.id),
            fiscal_year_id: sgbooks_shared::types::FiscalYearId::from_uuid(row.fiscal_year_id),
            period_type: row.period_type.into(),
            period_number: row.period_number,
            name: row.name,
            start_date: row.start_date,
            end_date: row.end_date,
            status: row.status.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn year(name: &str, closed: bool) -> fiscal_years::Model {
        fiscal_years::Model {
            id: Uuid::now_v7(),
            year_name: name.to_string(),
            start_date: date(2026, 1, 1),
            end_date: date(2026, 12, 31),
            is_closed: closed,
            closed_at: None,
            created_at: chrono::Utc::now().into(),
        }
    }

    fn period(status: FiscalPeriodStatus) -> fiscal_periods::Model {
        fiscal_periods::Model {
            id: Uuid::now_v7(),
            fiscal_year_id: Uuid::now_v7(),
            name: "January 2026".to_string(),
            period_type: PeriodType::Month,
            period_number: 1,
            start_date: date(2026, 1, 1),
            end_date: date(2026, 1, 31),
            status,
            is_adjustment: false,
            closed_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_range() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let repo = FiscalRepository::new(db.clone());

        let input = CreateFiscalYearInput {
            year_name: "FY2026".into(),
            start_date: date(2026, 12, 31),
            end_date: date(2026, 1, 1),
            period_type: fiscal::PeriodType::Month,
        };
        let result = repo.create_fiscal_year(db.as_ref(), input).await;
        assert!(matches!(
            result,
            Err(FiscalRepoError::Rule(FiscalError::InvalidDateRange))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_overlap() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![year("FY2026", false)]])
            .into_connection());
        let repo = FiscalRepository::new(db.clone());

        let input = CreateFiscalYearInput {
            year_name: "FY2026B".into(),
            start_date: date(2026, 7, 1),
            end_date: date(2027, 6, 30),
            period_type: fiscal::PeriodType::Quarter,
        };
        let result = repo.create_fiscal_year(db.as_ref(), input).await;
        assert!(matches!(
            result,
            Err(FiscalRepoError::Rule(FiscalError::OverlappingYear(name))) if name == "FY2026"
        ));
    }

    #[tokio::test]
    async fn test_archived_period_cannot_reopen() {
        let archived = period(FiscalPeriodStatus::Archived);
        let id = archived.id;
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![archived]])
            .into_connection());
        let repo = FiscalRepository::new(db.clone());

        let result = repo
            .update_period_status(db.as_ref(), id, fiscal::FiscalPeriodStatus::Open)
            .await;
        assert!(matches!(
            result,
            Err(FiscalRepoError::Rule(FiscalError::InvalidStatusTransition { .. }))
        ));
    }

    #[tokio::test]
    async fn test_close_year_with_open_periods() {
        let fy = year("FY2026", false);
        let id = fy.id;
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![fy]])
            .append_query_results([vec![period(FiscalPeriodStatus::Open)]])
            .into_connection());
        let repo = FiscalRepository::new(db.clone());

        let result = repo.close_fiscal_year(db.as_ref(), id).await;
        assert!(matches!(
            result,
            Err(FiscalRepoError::Rule(FiscalError::OpenPeriodsRemain(_)))
        ));
    }

    #[tokio::test]
    async fn test_close_year_already_closed() {
        let fy = year("FY2025", true);
        let id = fy.id;
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![fy]])
            .into_connection());
        let repo = FiscalRepository::new(db.clone());

        let result = repo.close_fiscal_year(db.as_ref(), id).await;
        assert!(matches!(
            result,
            Err(FiscalRepoError::Rule(FiscalError::YearClosed(name))) if name == "FY2025"
        ));
    }

    #[test]
    fn test_period_model_into_domain() {
        let row = period(FiscalPeriodStatus::Closed);
        let domain = fiscal::FiscalPeriod::from(row);
        assert_eq!(domain.status, fiscal::FiscalPeriodStatus::Closed);
        assert!(!domain.is_open());
        assert!(domain.contains_date(date(2026, 1, 15)));
    }
}
