//! Currencies and exchange rates.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sgbooks_db::{CurrencyRepository, DbConn, entities::currencies};
use sgbooks_shared::AppResult;
use tracing::instrument;
use validator::Validate;

use super::{begin, commit};
use crate::dto::ExchangeRateDto;

/// Manages currencies and daily exchange rates.
#[derive(Debug, Clone)]
pub struct CurrencyManager {
    db: DbConn,
    currencies: CurrencyRepository,
}

impl CurrencyManager {
    /// Creates a new manager.
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self {
            currencies: CurrencyRepository::new(db.clone()),
            db,
        }
    }

    /// Lists active currencies, base currency first.
    pub async fn list_currencies(&self) -> AppResult<Vec<currencies::Model>> {
        Ok(self.currencies.list_active().await?)
    }

    /// Records the rate for a currency pair, replacing any quote on the same day.
    #[instrument(skip(self, dto), fields(pair = %format!("{}/{}", dto.from_currency, dto.to_currency)))]
    pub async fn add_exchange_rate(&self, dto: ExchangeRateDto) -> AppResult<()> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        self.currencies
            .upsert_rate(&txn, &dto.from_currency, &dto.to_currency, dto.rate_date, dto.rate)
            .await?;
        commit(txn).await
    }

    /// Returns the latest rate on or before `date`; 1 for the same currency.
    pub async fn get_rate(&self, from: &str, to: &str, date: NaiveDate) -> AppResult<Decimal> {
        Ok(self
            .currencies
            .rate_on_or_before(&from.to_uppercase(), &to.to_uppercase(), date)
            .await?)
    }
}
