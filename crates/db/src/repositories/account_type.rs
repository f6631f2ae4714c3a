//! Account-type reference data with a process-lifetime cache.
//!
//! The natural balance side of every account type is read from
//! `accounting.account_types` on first use and kept in memory. Rows in that
//! table are seeded once and never edited, so entries are never invalidated.

use moka::future::Cache;
use sea_orm::{DbErr, EntityTrait, QueryOrder};
use sgbooks_core::accounts::{AccountCategory, NormalBalance};

use crate::{DbConn, entities::account_types};

const CACHE_CAPACITY: u64 = 256;

/// Account-type repository.
#[derive(Clone)]
pub struct AccountTypeRepository {
    db: DbConn,
    sides: Cache<String, NormalBalance>,
}

impl std::fmt::Debug for AccountTypeRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountTypeRepository")
            .field("cached", &self.sides.entry_count())
            .finish_non_exhaustive()
    }
}

impl AccountTypeRepository {
    /// Creates a new repository with an empty cache.
    #[must_use]
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            sides: Cache::new(CACHE_CAPACITY),
        }
    }

    /// Lists all account types in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<account_types::Model>, DbErr> {
        account_types::Entity::find()
            .order_by_asc(account_types::Column::DisplayOrder)
            .all(self.db.as_ref())
            .await
    }

    /// Returns the natural balance side for an account.
    ///
    /// The sub-type row decides when present; otherwise the category's
    /// conventional side applies.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference table cannot be loaded.
    pub async fn normal_balance(
        &self,
        category: AccountCategory,
        sub_type: Option<&str>,
    ) -> Result<NormalBalance, DbErr> {
        let Some(name) = sub_type else {
            return Ok(category.normal_balance());
        };

        if let Some(side) = self.sides.get(name).await {
            return Ok(side);
        }

        self.load().await?;
        Ok(self
            .sides
            .get(name)
            .await
            .unwrap_or_else(|| category.normal_balance()))
    }

    async fn load(&self) -> Result<(), DbErr> {
        let rows = self.list().await?;
        tracing::debug!(count = rows.len(), "Loaded account types");
        for row in rows {
            self.sides
                .insert(row.name, NormalBalance::from_is_debit(row.is_debit_balance))
                .await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::{self, ReportType};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use uuid::Uuid;

    fn contra_asset() -> account_types::Model {
        account_types::Model {
            id: Uuid::now_v7(),
            name: "Accumulated Depreciation".to_string(),
            category: sea_orm_active_enums::AccountCategory::Asset,
            is_debit_balance: false,
            report_type: ReportType::BalanceSheet,
            display_order: 15,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_category_fallback_without_sub_type() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let repo = AccountTypeRepository::new(db);

        let side = repo
            .normal_balance(AccountCategory::Revenue, None)
            .await
            .unwrap();
        assert_eq!(side, NormalBalance::Credit);
    }

    #[tokio::test]
    async fn test_sub_type_overrides_category_and_is_cached() {
        // Only one result set: a second load would fail the mock.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![contra_asset()]])
            .into_connection());
        let repo = AccountTypeRepository::new(db);

        for _ in 0..3 {
            let side = repo
                .normal_balance(AccountCategory::Asset, Some("Accumulated Depreciation"))
                .await
                .unwrap();
            assert_eq!(side, NormalBalance::Credit);
        }
    }

    #[tokio::test]
    async fn test_unknown_sub_type_falls_back() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![contra_asset()]])
            .into_connection());
        let repo = AccountTypeRepository::new(db);

        let side = repo
            .normal_balance(AccountCategory::Expense, Some("Unheard Of"))
            .await
            .unwrap();
        assert_eq!(side, NormalBalance::Debit);
    }
}
