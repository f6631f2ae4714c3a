//! Financial statement generation over the posted ledger.
//!
//! The repository supplies per-account snapshots; [`ReportService`] turns
//! them into statements and [`ReportEngine`] renders them. Comparative
//! figures are loaded concurrently with the current ones.

use chrono::NaiveDate;
use sgbooks_core::{
    export::{ExportFormat, FinancialReport},
    reports::{
        BalanceSheet, GeneralLedger, ProfitAndLoss, ReportService, TrialBalance,
        error::check_date_range,
    },
};
use sgbooks_db::{
    AccountTypeRepository, DbConn, ReportRepository, SettingsRepository, db_error,
};
use sgbooks_shared::AppResult;
use tracing::instrument;
use uuid::Uuid;

pub use sgbooks_core::export::ReportEngine;

/// Builds statements from the database.
#[derive(Debug, Clone)]
pub struct FinancialStatementGenerator {
    reports: ReportRepository,
    settings: SettingsRepository,
    engine: ReportEngine,
}

impl FinancialStatementGenerator {
    /// Creates a generator sharing the account-type cache.
    #[must_use]
    pub fn new(db: DbConn, account_types: AccountTypeRepository) -> Self {
        Self {
            reports: ReportRepository::new(db.clone(), account_types),
            settings: SettingsRepository::new(db),
            engine: ReportEngine::new(),
        }
    }

    /// Balance Sheet as of a date, optionally with a comparative date.
    #[instrument(skip(self))]
    pub async fn generate_balance_sheet(
        &self,
        as_of: NaiveDate,
        comparative_date: Option<NaiveDate>,
        include_zero_balances: bool,
    ) -> AppResult<BalanceSheet> {
        let company_name = self.company_name().await?;
        let (current, prior) = match comparative_date {
            Some(date) => {
                let (current, prior) = futures::try_join!(
                    self.reports.balances_as_of(as_of),
                    self.reports.balances_as_of(date)
                )?;
                (current, Some((date, prior)))
            }
            None => (self.reports.balances_as_of(as_of).await?, None),
        };

        let report = ReportService::generate_balance_sheet(
            &company_name,
            as_of,
            &current,
            prior.as_ref().map(|(date, snapshots)| (*date, snapshots.as_slice())),
            include_zero_balances,
        );
        tracing::info!(
            %as_of,
            total_assets = %report.totals.total_assets,
            balanced = report.totals.is_balanced,
            "Balance sheet generated"
        );
        Ok(report)
    }

    /// Profit & Loss for a period, optionally against a comparative period.
    #[instrument(skip(self))]
    pub async fn generate_profit_and_loss(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        comparative_period: Option<(NaiveDate, NaiveDate)>,
        include_zero_balances: bool,
    ) -> AppResult<ProfitAndLoss> {
        check_date_range(start, end)?;
        if let Some((prior_start, prior_end)) = comparative_period {
            check_date_range(prior_start, prior_end)?;
        }

        let company_name = self.company_name().await?;
        let (current, prior) = match comparative_period {
            Some((prior_start, prior_end)) => {
                let (current, prior) = futures::try_join!(
                    self.reports.activity_between(start, end),
                    self.reports.activity_between(prior_start, prior_end)
                )?;
                (current, Some((prior_start, prior_end, prior)))
            }
            None => (self.reports.activity_between(start, end).await?, None),
        };

        let report = ReportService::generate_profit_and_loss(
            &company_name,
            start,
            end,
            &current,
            prior
                .as_ref()
                .map(|(s, e, snapshots)| (*s, *e, snapshots.as_slice())),
            include_zero_balances,
        )?;
        tracing::info!(%start, %end, net_profit = %report.totals.net_profit, "Profit and loss generated");
        Ok(report)
    }

    /// Trial Balance as of a date.
    #[instrument(skip(self))]
    pub async fn generate_trial_balance(
        &self,
        as_of: NaiveDate,
        include_zero_balances: bool,
    ) -> AppResult<TrialBalance> {
        let company_name = self.company_name().await?;
        let snapshots = self.reports.balances_as_of(as_of).await?;
        let report = ReportService::generate_trial_balance(
            &company_name,
            as_of,
            &snapshots,
            include_zero_balances,
        );
        if !report.is_balanced {
            tracing::warn!(
                total_debit = %report.total_debit,
                total_credit = %report.total_credit,
                "Trial balance out of balance"
            );
        }
        Ok(report)
    }

    /// General Ledger for one account over a range.
    #[instrument(skip(self))]
    pub async fn generate_general_ledger(
        &self,
        account_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<GeneralLedger> {
        check_date_range(start, end)?;
        let company_name = self.company_name().await?;
        let data = self.reports.ledger(account_id, start, end).await?;
        Ok(ReportService::generate_general_ledger(
            &company_name,
            data.account,
            start,
            end,
            data.opening_balance,
            data.postings,
        )?)
    }

    /// Renders a generated report.
    pub fn export_report(
        &self,
        report: &FinancialReport,
        format: ExportFormat,
    ) -> AppResult<Vec<u8>> {
        Ok(self.engine.export_report(report, format)?)
    }

    async fn company_name(&self) -> AppResult<String> {
        self.settings.company_name().await.map_err(db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn generator() -> FinancialStatementGenerator {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        FinancialStatementGenerator::new(db.clone(), AccountTypeRepository::new(db))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_inverted_profit_and_loss_range_rejected() {
        let err = generator()
            .generate_profit_and_loss(date(2026, 12, 31), date(2026, 1, 1), None, false)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_inverted_comparative_period_rejected() {
        let err = generator()
            .generate_profit_and_loss(
                date(2026, 1, 1),
                date(2026, 12, 31),
                Some((date(2025, 12, 31), date(2025, 1, 1))),
                false,
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_inverted_ledger_range_rejected() {
        let err = generator()
            .generate_general_ledger(Uuid::now_v7(), date(2026, 6, 30), date(2026, 6, 1))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
