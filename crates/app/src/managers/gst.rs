//! GST F5 preparation and filing.

use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;
use sgbooks_core::{
    gst::{
        GST_CONTROL_ACCOUNT, GST_INPUT_ACCOUNT, GST_OUTPUT_ACCOUNT, GstError, GstReturnData,
        compute_f5,
    },
    ledger::{JournalLineInput, JournalType},
};
use sgbooks_db::{
    AccountTypeRepository, DbConn, GstReturnRepository, ReportRepository, SettingsRepository,
    db_error,
    entities::{
        gst_returns,
        sea_orm_active_enums::{AuditAction, GstReturnStatus},
    },
};
use sgbooks_shared::{AppResult, types::AccountId};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use super::posting::{EntryHeader, JournalPoster};
use super::{audit, begin, commit};
use crate::dto::{FinalizeGstReturnDto, GstPeriodDto};

const ENTITY: &str = "gst_return";

/// The three system accounts a settlement touches.
#[derive(Debug, Clone, Copy)]
struct SettlementAccounts {
    output: Uuid,
    input: Uuid,
    control: Uuid,
}

/// Clears the period's output and input tax into the GST control account.
///
/// Dr output tax, Cr input tax, and the difference goes to the control
/// account (credit when payable, debit when refundable). Manual adjustments
/// are booked separately and do not appear here.
fn settlement_lines(
    accounts: SettlementAccounts,
    output_tax: Decimal,
    input_tax: Decimal,
    currency_code: &str,
) -> Vec<JournalLineInput> {
    let mut lines = Vec::with_capacity(3);
    if !output_tax.is_zero() {
        lines.push(
            JournalLineInput::debit(AccountId::from_uuid(accounts.output), output_tax, currency_code)
                .with_description("Clear GST output tax"),
        );
    }
    if !input_tax.is_zero() {
        lines.push(
            JournalLineInput::credit(AccountId::from_uuid(accounts.input), input_tax, currency_code)
                .with_description("Clear GST input tax"),
        );
    }

    let net = output_tax - input_tax;
    let control = AccountId::from_uuid(accounts.control);
    if net.is_sign_positive() && !net.is_zero() {
        lines.push(JournalLineInput::credit(control, net, currency_code).with_description("GST payable"));
    } else if !net.is_zero() {
        lines.push(
            JournalLineInput::debit(control, -net, currency_code).with_description("GST refundable"),
        );
    }
    lines
}

/// Prepares, saves and files GST returns.
#[derive(Debug, Clone)]
pub struct GstManager {
    db: DbConn,
    returns: GstReturnRepository,
    reports: ReportRepository,
    settings: SettingsRepository,
    poster: JournalPoster,
}

impl GstManager {
    /// Creates a new manager sharing the account-type cache.
    #[must_use]
    pub fn new(db: DbConn, account_types: AccountTypeRepository) -> Self {
        Self {
            returns: GstReturnRepository::new(db.clone()),
            reports: ReportRepository::new(db.clone(), account_types),
            settings: SettingsRepository::new(db.clone()),
            poster: JournalPoster::new(&db),
            db,
        }
    }

    /// Computes the F5 boxes from posted lines in the period.
    #[instrument(skip(self))]
    pub async fn prepare_gst_return_data(&self, period: GstPeriodDto) -> AppResult<GstReturnData> {
        period.validate()?;

        let lines = self
            .reports
            .taxable_lines(period.start_date, period.end_date)
            .await?;
        let data = compute_f5(period.start_date, period.end_date, &lines)?;

        tracing::info!(
            period = %data.return_period,
            lines = lines.len(),
            output_tax = %data.output_tax,
            input_tax = %data.input_tax,
            payable = %data.tax_payable,
            "GST return prepared"
        );
        Ok(data)
    }

    /// Saves figures as a draft, replacing an earlier draft for the period.
    #[instrument(skip(self, data), fields(period = %data.return_period))]
    pub async fn save_gst_return(
        &self,
        mut data: GstReturnData,
        notes: Option<String>,
    ) -> AppResult<gst_returns::Model> {
        if data.end_date < data.start_date {
            return Err(GstError::InvalidPeriod.into());
        }
        data.recompute_totals();

        let txn = begin(self.db.as_ref()).await?;
        let saved = self.returns.save_draft(&txn, &data, notes).await?;
        audit(&txn, ENTITY, saved.id, AuditAction::Update, Some(&saved)).await?;
        commit(txn).await?;
        Ok(saved)
    }

    /// Files a draft return and posts the settlement entry.
    ///
    /// A nil return (no output or input tax) is filed without a journal entry.
    #[instrument(skip(self, dto), fields(return_id = %dto.return_id))]
    pub async fn finalize_gst_return(
        &self,
        dto: FinalizeGstReturnDto,
    ) -> AppResult<gst_returns::Model> {
        dto.validate()?;
        let reference = dto.submission_reference.trim().to_string();
        if reference.is_empty() {
            return Err(GstError::MissingReference.into());
        }

        let txn = begin(self.db.as_ref()).await?;
        let draft = self.returns.require(&txn, dto.return_id).await?;
        if draft.status != GstReturnStatus::Draft {
            tracing::warn!(period = %draft.return_period, "GST return already filed");
            return Err(GstError::NotDraft(draft.status.into()).into());
        }

        let lines = if draft.output_tax.is_zero() && draft.input_tax.is_zero() {
            Vec::new()
        } else {
            let accounts = SettlementAccounts {
                output: self.system_account(&txn, GST_OUTPUT_ACCOUNT).await?,
                input: self.system_account(&txn, GST_INPUT_ACCOUNT).await?,
                control: self.system_account(&txn, GST_CONTROL_ACCOUNT).await?,
            };
            let base_currency = self.settings.base_currency().await.map_err(db_error)?;
            settlement_lines(accounts, draft.output_tax, draft.input_tax, &base_currency)
        };

        let journal_entry_id = if lines.is_empty() {
            None
        } else {
            let entry = self
                .poster
                .post_new(
                    &txn,
                    EntryHeader {
                        journal_type: JournalType::Gst,
                        entry_date: draft.end_date,
                        description: format!("GST settlement {}", draft.return_period),
                        reference: Some(reference.clone()),
                        source: Some((ENTITY, draft.id)),
                    },
                    &lines,
                )
                .await?;
            Some(entry.id)
        };

        let filed = self
            .returns
            .mark_submitted(&txn, draft.id, dto.submission_date, reference, journal_entry_id)
            .await?;
        audit(&txn, ENTITY, filed.id, AuditAction::Post, Some(&filed)).await?;
        commit(txn).await?;

        tracing::info!(
            period = %filed.return_period,
            payable = %filed.tax_payable,
            "GST return finalized"
        );
        Ok(filed)
    }

    /// Lists returns, latest period first.
    pub async fn list_returns(&self) -> AppResult<Vec<gst_returns::Model>> {
        Ok(self.returns.list().await?)
    }

    /// Loads one return.
    pub async fn get_return(&self, id: Uuid) -> AppResult<gst_returns::Model> {
        Ok(self.returns.require(self.db.as_ref(), id).await?)
    }

    async fn system_account<C: ConnectionTrait>(&self, conn: &C, code: &str) -> AppResult<Uuid> {
        Ok(self
            .poster
            .find_account(conn, code)
            .await?
            .ok_or_else(|| GstError::MissingAccount(code.to_string()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sgbooks_core::ledger::validate_journal_lines;

    fn accounts() -> SettlementAccounts {
        SettlementAccounts {
            output: Uuid::from_u128(1),
            input: Uuid::from_u128(2),
            control: Uuid::from_u128(3),
        }
    }

    #[test]
    fn test_payable_settlement_credits_control() {
        let lines = settlement_lines(accounts(), dec!(900.00), dec!(270.00), "SGD");

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].debit_amount, dec!(900.00));
        assert_eq!(lines[1].credit_amount, dec!(270.00));
        assert_eq!(lines[2].account_id.into_inner(), Uuid::from_u128(3));
        assert_eq!(lines[2].credit_amount, dec!(630.00));
        assert!(validate_journal_lines(&lines).is_ok());
    }

    #[test]
    fn test_refund_settlement_debits_control() {
        let lines = settlement_lines(accounts(), dec!(100.00), dec!(450.00), "SGD");

        assert_eq!(lines[2].debit_amount, dec!(350.00));
        assert!(validate_journal_lines(&lines).is_ok());
    }

    #[test]
    fn test_equal_taxes_need_no_control_line() {
        let lines = settlement_lines(accounts(), dec!(90.00), dec!(90.00), "SGD");
        assert_eq!(lines.len(), 2);
        assert!(validate_journal_lines(&lines).is_ok());
    }

    #[test]
    fn test_input_only_settlement() {
        let lines = settlement_lines(accounts(), Decimal::ZERO, dec!(45.00), "SGD");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].debit_amount, dec!(45.00));
    }

    #[test]
    fn test_settlement_books_in_base_currency() {
        let lines = settlement_lines(accounts(), dec!(70.00), dec!(20.00), "USD");
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line.currency_code == "USD"));
    }
}
