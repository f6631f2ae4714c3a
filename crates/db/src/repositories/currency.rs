//! Currency and exchange-rate repository.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, sea_query::OnConflict,
};
use sgbooks_shared::AppError;
use uuid::Uuid;

use crate::{DbConn, entities::{currencies, exchange_rates}};

/// Error types for currency operations.
#[derive(Debug, thiserror::Error)]
pub enum CurrencyError {
    /// Currency code not found or inactive.
    #[error("Currency '{0}' not found")]
    CurrencyNotFound(String),

    /// Rate must be positive.
    #[error("Exchange rate must be greater than zero")]
    InvalidRate,

    /// Same currency on both sides.
    #[error("Exchange rate needs two different currencies")]
    SameCurrency,

    /// No rate on or before the date.
    #[error("No exchange rate from {from} to {to} on or before {date}")]
    RateNotFound {
        /// Source currency.
        from: String,
        /// Target currency.
        to: String,
        /// Lookup date.
        date: NaiveDate,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CurrencyError> for AppError {
    fn from(err: CurrencyError) -> Self {
        match err {
            CurrencyError::CurrencyNotFound(_) | CurrencyError::RateNotFound { .. } => {
                Self::NotFound(err.to_string())
            }
            CurrencyError::InvalidRate | CurrencyError::SameCurrency => {
                Self::validation(err.to_string())
            }
            CurrencyError::Database(db) => super::db_error(db),
        }
    }
}

/// Currency repository.
#[derive(Debug, Clone)]
pub struct CurrencyRepository {
    db: DbConn,
}

impl CurrencyRepository {
    /// Creates a new currency repository.
    #[must_use]
    pub const fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Lists active currencies, base currency first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(&self) -> Result<Vec<currencies::Model>, CurrencyError> {
        Ok(currencies::Entity::find()
            .filter(currencies::Column::IsActive.eq(true))
            .order_by_desc(currencies::Column::IsBase)
            .order_by_asc(currencies::Column::Code)
            .all(self.db.as_ref())
            .await?)
    }

    /// Finds an active currency by code.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyNotFound` if missing or inactive.
    pub async fn require_active<C: ConnectionTrait>(
        &self,
        conn: &C,
        code: &str,
    ) -> Result<currencies::Model, CurrencyError> {
        currencies::Entity::find_by_id(code.to_string())
            .filter(currencies::Column::IsActive.eq(true))
            .one(conn)
            .await?
            .ok_or_else(|| CurrencyError::CurrencyNotFound(code.to_string()))
    }

    /// Inserts or replaces the rate for a currency pair on a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the rate is not positive, the currencies are the
    /// same or unknown, or the database operation fails.
    pub async fn upsert_rate<C: ConnectionTrait>(
        &self,
        conn: &C,
        from: &str,
        to: &str,
        rate_date: NaiveDate,
        rate: Decimal,
    ) -> Result<(), CurrencyError> {
        if rate <= Decimal::ZERO {
            return Err(CurrencyError::InvalidRate);
        }
        if from == to {
            return Err(CurrencyError::SameCurrency);
        }
        self.require_active(conn, from).await?;
        self.require_active(conn, to).await?;

        let row = exchange_rates::ActiveModel {
            id: Set(Uuid::now_v7()),
            from_currency: Set(from.to_string()),
            to_currency: Set(to.to_string()),
            rate_date: Set(rate_date),
            exchange_rate: Set(rate),
            created_at: Set(chrono::Utc::now().into()),
        };
        exchange_rates::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    exchange_rates::Column::FromCurrency,
                    exchange_rates::Column::ToCurrency,
                    exchange_rates::Column::RateDate,
                ])
                .update_column(exchange_rates::Column::ExchangeRate)
                .to_owned(),
            )
            .exec(conn)
            .await?;

        tracing::info!(from, to, %rate_date, %rate, "Exchange rate saved");
        Ok(())
    }

    /// Returns the most recent rate on or before `date`.
    ///
    /// The same currency on both sides always yields 1. When only the inverse
    /// pair is stored, its reciprocal is returned.
    ///
    /// # Errors
    ///
    /// Returns `RateNotFound` if neither direction has a rate.
    pub async fn rate_on_or_before(
        &self,
        from: &str,
        to: &str,
        date: NaiveDate,
    ) -> Result<Decimal, CurrencyError> {
        if from == to {
            return Ok(Decimal::ONE);
        }

        if let Some(direct) = self.latest(from, to, date).await? {
            return Ok(direct.exchange_rate);
        }
        if let Some(inverse) = self.latest(to, from, date).await?
            && !inverse.exchange_rate.is_zero()
        {
            return Ok(Decimal::ONE / inverse.exchange_rate);
        }

        Err(CurrencyError::RateNotFound {
            from: from.to_string(),
            to: to.to_string(),
            date,
        })
    }

    async fn latest(
        &self,
        from: &str,
        to: &str,
        date: NaiveDate,
    ) -> Result<Option<exchange_rates::Model>, DbErr> {
        exchange_rates::Entity::find()
            .filter(exchange_rates::Column::FromCurrency.eq(from))
            .filter(exchange_rates::Column::ToCurrency.eq(to))
            .filter(exchange_rates::Column::RateDate.lte(date))
            .order_by_desc(exchange_rates::Column::RateDate)
            .one(self.db.as_ref())
            .await
    }
}
