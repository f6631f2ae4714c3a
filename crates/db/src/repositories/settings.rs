//! Company settings and key/value configuration.

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, Set,
    sea_query::OnConflict,
};

use crate::{DbConn, entities::{
    company_settings::{self, SETTINGS_ROW_ID},
    configuration,
}};

/// Base currency assumed before the company settings row exists.
pub const DEFAULT_BASE_CURRENCY: &str = "SGD";

/// Input for updating company settings.
#[derive(Debug, Clone, Default)]
pub struct UpdateCompanySettingsInput {
    /// Trading name.
    pub company_name: Option<String>,
    /// Registered legal name.
    pub legal_name: Option<Option<String>>,
    /// Unique Entity Number.
    pub uen_no: Option<Option<String>>,
    /// GST registration number.
    pub gst_registration_no: Option<Option<String>>,
    /// GST registration flag.
    pub gst_registered: Option<bool>,
    /// Base currency code.
    pub base_currency: Option<String>,
    /// First month of the fiscal year.
    pub fiscal_year_start_month: Option<i16>,
    /// First day of the fiscal year.
    pub fiscal_year_start_day: Option<i16>,
    /// Display date format.
    pub date_format: Option<String>,
}

/// Settings repository.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    db: DbConn,
}

impl SettingsRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Loads the company settings row, if it has been created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn company(&self) -> Result<Option<company_settings::Model>, DbErr> {
        company_settings::Entity::find_by_id(SETTINGS_ROW_ID)
            .one(self.db.as_ref())
            .await
    }

    /// Returns the company name, or an empty string before setup.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn company_name(&self) -> Result<String, DbErr> {
        Ok(self
            .company()
            .await?
            .map(|settings| settings.company_name)
            .unwrap_or_default())
    }

    /// Returns the company's base currency, or [`DEFAULT_BASE_CURRENCY`]
    /// before setup.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn base_currency(&self) -> Result<String, DbErr> {
        Ok(self.company().await?.map_or_else(
            || DEFAULT_BASE_CURRENCY.to_string(),
            |settings| settings.base_currency,
        ))
    }

    /// Applies changes to the settings row, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn update_company<C: ConnectionTrait>(
        &self,
        conn: &C,
        input: UpdateCompanySettingsInput,
    ) -> Result<company_settings::Model, DbErr> {
        let existing = company_settings::Entity::find_by_id(SETTINGS_ROW_ID)
            .one(conn)
            .await?;
        let now = chrono::Utc::now().into();
        let is_new = existing.is_none();

        let mut active = match existing {
            Some(row) => company_settings::ActiveModel::from(row),
            None => company_settings::ActiveModel {
                id: Set(SETTINGS_ROW_ID),
                company_name: Set(String::new()),
                legal_name: Set(None),
                uen_no: Set(None),
                gst_registration_no: Set(None),
                gst_registered: Set(false),
                base_currency: Set(DEFAULT_BASE_CURRENCY.to_string()),
                fiscal_year_start_month: Set(1),
                fiscal_year_start_day: Set(1),
                date_format: Set("dd/MM/yyyy".to_string()),
                updated_at: Set(now),
            },
        };

        if let Some(v) = input.company_name {
            active.company_name = Set(v);
        }
        if let Some(v) = input.legal_name {
            active.legal_name = Set(v);
        }
        if let Some(v) = input.uen_no {
            active.uen_no = Set(v);
        }
        if let Some(v) = input.gst_registration_no {
            active.gst_registration_no = Set(v);
        }
        if let Some(v) = input.gst_registered {
            active.gst_registered = Set(v);
        }
        if let Some(v) = input.base_currency {
            active.base_currency = Set(v);
        }
        if let Some(v) = input.fiscal_year_start_month {
            active.fiscal_year_start_month = Set(v);
        }
        if let Some(v) = input.fiscal_year_start_day {
            active.fiscal_year_start_day = Set(v);
        }
        if let Some(v) = input.date_format {
            active.date_format = Set(v);
        }
        active.updated_at = Set(now);

        let saved = if is_new {
            active.insert(conn).await?
        } else {
            active.update(conn).await?
        };
        tracing::info!(company = %saved.company_name, "Company settings saved");
        Ok(saved)
    }

    /// Reads a configuration value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_value(&self, key: &str) -> Result<Option<String>, DbErr> {
        Ok(configuration::Entity::find_by_id(key.to_string())
            .one(self.db.as_ref())
            .await?
            .map(|row| row.config_value))
    }

    /// Writes a configuration value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn set_value<C: ConnectionTrait>(
        &self,
        conn: &C,
        key: &str,
        value: &str,
    ) -> Result<(), DbErr> {
        let row = configuration::ActiveModel {
            config_key: Set(key.to_string()),
            config_value: Set(value.to_string()),
            updated_at: Set(chrono::Utc::now().into()),
        };
        configuration::Entity::insert(row)
            .on_conflict(
                OnConflict::column(configuration::Column::ConfigKey)
                    .update_columns([
                        configuration::Column::ConfigValue,
                        configuration::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn settings(base_currency: &str) -> company_settings::Model {
        company_settings::Model {
            id: SETTINGS_ROW_ID,
            company_name: "Acme Pte Ltd".to_string(),
            legal_name: None,
            uen_no: None,
            gst_registration_no: Some("M90000000X".to_string()),
            gst_registered: true,
            base_currency: base_currency.to_string(),
            fiscal_year_start_month: 1,
            fiscal_year_start_day: 1,
            date_format: "%d/%m/%Y".to_string(),
            updated_at: chrono::Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_base_currency_read_from_company_row() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![settings("USD")]])
                .into_connection(),
        );
        let repo = SettingsRepository::new(db);
        assert_eq!(repo.base_currency().await.unwrap(), "USD");
    }

    #[tokio::test]
    async fn test_base_currency_defaults_before_setup() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<company_settings::Model>::new()])
                .into_connection(),
        );
        let repo = SettingsRepository::new(db);
        assert_eq!(repo.base_currency().await.unwrap(), DEFAULT_BASE_CURRENCY);
    }
}
