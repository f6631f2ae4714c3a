//! Company settings.

use sgbooks_db::{
    DbConn,
    SettingsRepository, db_error,
    entities::{company_settings, sea_orm_active_enums::AuditAction},
};
use sgbooks_shared::{AppError, AppResult};
use tracing::instrument;
use validator::Validate;

use super::{audit, begin, commit};
use crate::dto::CompanySettingsDto;

/// Keys of the `core.configuration` table read by the managers.
pub mod config_keys {
    /// Account code used for receivables when a customer has no override.
    pub const DEFAULT_RECEIVABLES_ACCOUNT: &str = "default_receivables_account";
    /// Account code used for payables when a vendor has no override.
    pub const DEFAULT_PAYABLES_ACCOUNT: &str = "default_payables_account";
}

/// Loads and updates the singleton company settings row.
#[derive(Debug, Clone)]
pub struct CompanySettingsManager {
    db: DbConn,
    settings: SettingsRepository,
}

impl CompanySettingsManager {
    /// Creates a new manager.
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self {
            settings: SettingsRepository::new(db.clone()),
            db,
        }
    }

    /// Loads the company settings.
    pub async fn get_settings(&self) -> AppResult<company_settings::Model> {
        self.settings
            .company()
            .await
            .map_err(db_error)?
            .ok_or_else(|| AppError::NotFound("Company settings have not been set up".to_string()))
    }

    /// Updates the company settings, creating the row on first use.
    #[instrument(skip(self, dto))]
    pub async fn update_settings(
        &self,
        dto: CompanySettingsDto,
    ) -> AppResult<company_settings::Model> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        let updated = self
            .settings
            .update_company(&txn, dto.into())
            .await
            .map_err(db_error)?;
        audit(
            &txn,
            "company_settings",
            uuid::Uuid::nil(),
            AuditAction::Update,
            Some(&updated),
        )
        .await?;
        commit(txn).await?;

        tracing::info!(company = %updated.company_name, "Company settings updated");
        Ok(updated)
    }

    /// Reads a configuration value.
    pub async fn get_value(&self, key: &str) -> AppResult<Option<String>> {
        self.settings.get_value(key).await.map_err(db_error)
    }

    /// Stores a configuration value.
    pub async fn set_value(&self, key: &str, value: &str) -> AppResult<()> {
        self.settings
            .set_value(self.db.as_ref(), key, value)
            .await
            .map_err(db_error)
    }
}
