//! Report data types.
//!
//! Every report serializes to the nested shape consumers expect: a title,
//! per-section `{id, code, name, balance}` lists, section totals, grand
//! totals and an `is_balanced` flag where one applies.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sgbooks_shared::types::{AccountId, JournalEntryId};

use crate::accounts::{AccountCategory, NormalBalance};

/// One account with its raw (debit-positive) balance for a date or period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Account ID.
    pub id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account category.
    pub category: AccountCategory,
    /// Subsection name (e.g. "Current Asset").
    pub sub_type: Option<String>,
    /// Natural balance side from the account-type table.
    pub normal_balance: NormalBalance,
    /// Sum of debits minus credits, including opening balance where relevant.
    pub raw_balance: Decimal,
}

impl AccountSnapshot {
    /// Balance in the account's natural sign.
    #[must_use]
    pub fn natural_balance(&self) -> Decimal {
        self.normal_balance.normalize(self.raw_balance)
    }

    /// Balance signed by the category's natural side.
    ///
    /// Equal to [`natural_balance`](Self::natural_balance) for ordinary
    /// accounts. A contra account (accumulated depreciation under Assets,
    /// sales returns under Revenue) comes out negative, so it reduces its
    /// section total.
    #[must_use]
    pub fn section_balance(&self) -> Decimal {
        self.category.normal_balance().normalize(self.raw_balance)
    }
}

/// One line of a Balance Sheet or P&L section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Account ID; `None` for computed lines such as current year earnings.
    pub id: Option<AccountId>,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Subsection name.
    pub sub_type: Option<String>,
    /// Natural-sign balance.
    pub balance: Decimal,
    /// Natural-sign balance for the comparative date or period.
    pub comparative_balance: Option<Decimal>,
}

/// Subtotal of one subsection within a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementGroup {
    /// Subsection name.
    pub name: String,
    /// Subsection total.
    pub total: Decimal,
    /// Comparative subsection total.
    pub comparative_total: Option<Decimal>,
}

/// A statement section (assets, liabilities, equity, revenue, expenses).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSection {
    /// Section heading.
    pub name: String,
    /// Lines ordered by account code.
    pub accounts: Vec<StatementLine>,
    /// Subsection totals in first-seen order.
    pub groups: Vec<StatementGroup>,
    /// Section total.
    pub total: Decimal,
    /// Comparative section total.
    pub comparative_total: Option<Decimal>,
}

/// Balance Sheet grand totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetTotals {
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity, including current year earnings.
    pub total_equity: Decimal,
    /// Liabilities plus equity.
    pub total_liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity within one cent.
    pub is_balanced: bool,
}

/// Balance Sheet report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Report title.
    pub title: String,
    /// Company name from settings.
    pub company_name: String,
    /// Statement date.
    pub as_of_date: NaiveDate,
    /// Comparative statement date.
    pub comparative_date: Option<NaiveDate>,
    /// Assets section.
    pub assets: StatementSection,
    /// Liabilities section.
    pub liabilities: StatementSection,
    /// Equity section.
    pub equity: StatementSection,
    /// Grand totals.
    pub totals: BalanceSheetTotals,
    /// Comparative grand totals.
    pub comparative_totals: Option<BalanceSheetTotals>,
}

/// P&L grand totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitAndLossTotals {
    /// Total revenue.
    pub total_revenue: Decimal,
    /// Total expenses.
    pub total_expenses: Decimal,
    /// Revenue minus expenses.
    pub net_profit: Decimal,
}

/// Profit & Loss report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitAndLoss {
    /// Report title.
    pub title: String,
    /// Company name from settings.
    pub company_name: String,
    /// Period start.
    pub start_date: NaiveDate,
    /// Period end.
    pub end_date: NaiveDate,
    /// Comparative period `(start, end)`.
    pub comparative_period: Option<(NaiveDate, NaiveDate)>,
    /// Revenue section.
    pub revenue: StatementSection,
    /// Expenses section.
    pub expenses: StatementSection,
    /// Grand totals.
    pub totals: ProfitAndLossTotals,
    /// Comparative grand totals.
    pub comparative_totals: Option<ProfitAndLossTotals>,
}

/// One Trial Balance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceLine {
    /// Account ID.
    pub id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account category.
    pub category: AccountCategory,
    /// Debit column.
    pub debit: Decimal,
    /// Credit column.
    pub credit: Decimal,
}

/// Trial Balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Report title.
    pub title: String,
    /// Company name from settings.
    pub company_name: String,
    /// Balance date.
    pub as_of_date: NaiveDate,
    /// Rows ordered by account code.
    pub accounts: Vec<TrialBalanceLine>,
    /// Sum of the debit column.
    pub total_debit: Decimal,
    /// Sum of the credit column.
    pub total_credit: Decimal,
    /// Whether the columns agree within one cent.
    pub is_balanced: bool,
}

/// A posted journal line on the account being listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerPosting {
    /// Owning journal entry.
    pub entry_id: JournalEntryId,
    /// Journal entry number.
    pub entry_no: String,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Line or entry description.
    pub description: Option<String>,
    /// Entry reference.
    pub reference: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// One General Ledger row with its running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralLedgerLine {
    /// Owning journal entry.
    pub entry_id: JournalEntryId,
    /// Journal entry number.
    pub entry_no: String,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Reference.
    pub reference: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Raw running balance after this line.
    pub balance: Decimal,
}

/// Account header of a General Ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAccount {
    /// Account ID.
    pub id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account category.
    pub category: AccountCategory,
}

/// General Ledger report for one account.
///
/// Balances are raw debit-positive amounts, so
/// `closing_balance = opening_balance + total_debit - total_credit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralLedger {
    /// Report title.
    pub title: String,
    /// Company name from settings.
    pub company_name: String,
    /// The account listed.
    pub account: LedgerAccount,
    /// Range start.
    pub start_date: NaiveDate,
    /// Range end.
    pub end_date: NaiveDate,
    /// Balance before `start_date`.
    pub opening_balance: Decimal,
    /// Balance at `end_date`.
    pub closing_balance: Decimal,
    /// Sum of debits in range.
    pub total_debit: Decimal,
    /// Sum of credits in range.
    pub total_credit: Decimal,
    /// Lines in date order.
    pub lines: Vec<GeneralLedgerLine>,
}
