//! Chart of accounts.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sgbooks_db::{
    DbConn,
    AccountError, AccountFilter, AccountRepository, AccountTypeRepository, db_error,
    entities::{account_types, accounts, sea_orm_active_enums::AuditAction},
};
use sgbooks_shared::AppResult;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use super::{audit, begin, commit};
use crate::dto::{CreateAccountDto, UpdateAccountDto};

const ENTITY: &str = "account";

/// An account with its children, for tree display.
#[derive(Debug, Clone, Serialize)]
pub struct AccountNode {
    /// The account row.
    #[serde(flatten)]
    pub account: accounts::Model,
    /// Child accounts ordered by code.
    pub children: Vec<AccountNode>,
}

/// Arranges accounts into a forest by `parent_id`.
///
/// Accounts whose parent is missing from `accounts` become roots, so a
/// filtered list still renders. Ordering follows the input order.
#[must_use]
pub fn build_tree(accounts: Vec<accounts::Model>) -> Vec<AccountNode> {
    let ids: HashSet<Uuid> = accounts.iter().map(|a| a.id).collect();
    let mut children: HashMap<Uuid, Vec<accounts::Model>> = HashMap::new();
    let mut roots = Vec::new();

    for account in accounts {
        match account.parent_id.filter(|p| ids.contains(p) && *p != account.id) {
            Some(parent) => children.entry(parent).or_default().push(account),
            None => roots.push(account),
        }
    }

    roots
        .into_iter()
        .map(|root| attach(root, &mut children))
        .collect()
}

fn attach(
    account: accounts::Model,
    children: &mut HashMap<Uuid, Vec<accounts::Model>>,
) -> AccountNode {
    let kids = children.remove(&account.id).unwrap_or_default();
    AccountNode {
        children: kids.into_iter().map(|k| attach(k, children)).collect(),
        account,
    }
}

/// Manages the chart of accounts.
#[derive(Debug, Clone)]
pub struct ChartOfAccountsManager {
    db: DbConn,
    accounts: AccountRepository,
    account_types: AccountTypeRepository,
}

impl ChartOfAccountsManager {
    /// Creates a new manager.
    #[must_use]
    pub fn new(db: DbConn, account_types: AccountTypeRepository) -> Self {
        Self {
            accounts: AccountRepository::new(db.clone()),
            account_types,
            db,
        }
    }

    /// Adds an account.
    #[instrument(skip(self, dto), fields(code = %dto.code))]
    pub async fn create_account(&self, dto: CreateAccountDto) -> AppResult<accounts::Model> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        let account = self.accounts.create_account(&txn, dto.into()).await?;
        audit(&txn, ENTITY, account.id, AuditAction::Insert, Some(&account)).await?;
        commit(txn).await?;

        tracing::info!(account_id = %account.id, code = %account.code, "Account created");
        Ok(account)
    }

    /// Applies a partial update.
    #[instrument(skip(self, dto))]
    pub async fn update_account(
        &self,
        id: Uuid,
        dto: UpdateAccountDto,
    ) -> AppResult<accounts::Model> {
        dto.validate()?;

        let txn = begin(self.db.as_ref()).await?;
        let account = self.accounts.update_account(&txn, id, dto.into()).await?;
        audit(&txn, ENTITY, id, AuditAction::Update, Some(&account)).await?;
        commit(txn).await?;

        tracing::info!(account_id = %id, "Account updated");
        Ok(account)
    }

    /// Soft-deactivates an account with a zero balance.
    #[instrument(skip(self))]
    pub async fn deactivate_account(&self, id: Uuid) -> AppResult<accounts::Model> {
        let txn = begin(self.db.as_ref()).await?;
        let account = self.accounts.deactivate_account(&txn, id).await?;
        audit(&txn, ENTITY, id, AuditAction::Update, Some(&account)).await?;
        commit(txn).await?;
        Ok(account)
    }

    /// Loads one account.
    pub async fn get_account(&self, id: Uuid) -> AppResult<accounts::Model> {
        Ok(self
            .accounts
            .find_by_id(id)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?)
    }

    /// Loads an account by its code.
    pub async fn get_by_code(&self, code: &str) -> AppResult<Option<accounts::Model>> {
        Ok(self.accounts.find_by_code(self.db.as_ref(), code.trim()).await?)
    }

    /// Lists accounts ordered by code.
    pub async fn list_accounts(&self, filter: AccountFilter) -> AppResult<Vec<accounts::Model>> {
        Ok(self.accounts.list_accounts(filter).await?)
    }

    /// Lists accounts as a tree.
    pub async fn list_tree(&self, filter: AccountFilter) -> AppResult<Vec<AccountNode>> {
        let accounts = self.accounts.list_accounts(filter).await?;
        Ok(build_tree(accounts))
    }

    /// Lists the account-type reference rows.
    pub async fn list_account_types(&self) -> AppResult<Vec<account_types::Model>> {
        self.account_types.list().await.map_err(db_error)
    }

    /// Returns the balance on the account's natural side.
    ///
    /// A debit-normal account with more debits than credits is positive, as
    /// is a credit-normal account with more credits.
    pub async fn balance(&self, id: Uuid, as_of: Option<NaiveDate>) -> AppResult<Decimal> {
        let account = self.get_account(id).await?;
        let raw = self.accounts.balance(id, as_of).await?;
        let side = self
            .account_types
            .normal_balance(account.account_type.into(), account.sub_type.as_deref())
            .await
            .map_err(db_error)?;
        Ok(side.normalize(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgbooks_db::entities::sea_orm_active_enums::AccountCategory;

    fn account(code: &str, parent: Option<Uuid>) -> accounts::Model {
        let now = chrono::Utc::now().into();
        accounts::Model {
            id: Uuid::now_v7(),
            code: code.to_string(),
            name: format!("Account {code}"),
            account_type: AccountCategory::Asset,
            sub_type: None,
            parent_id: parent,
            description: None,
            is_active: true,
            is_control_account: false,
            is_bank_account: false,
            gst_applicable: false,
            tax_treatment: None,
            report_group: None,
            opening_balance: Decimal::ZERO,
            opening_balance_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_tree_nests_children_under_parents() {
        let assets = account("1000", None);
        let bank = account("1010", Some(assets.id));
        let dbs = account("1011", Some(bank.id));
        let liabilities = account("2000", None);

        let tree = build_tree(vec![assets.clone(), bank.clone(), dbs.clone(), liabilities]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].account.code, "1000");
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].account.code, "1010");
        assert_eq!(tree[0].children[0].children[0].account.code, "1011");
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_orphans_become_roots() {
        let orphan = account("1200", Some(Uuid::now_v7()));
        let tree = build_tree(vec![orphan]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].account.code, "1200");
    }

    #[test]
    fn test_tree_serializes_flat_account_fields() {
        let tree = build_tree(vec![account("3000", None)]);
        let json = serde_json::to_value(&tree[0]).unwrap();
        assert_eq!(json["code"], "3000");
        assert!(json["children"].as_array().unwrap().is_empty());
    }
}
