//! Report generation service.
//!
//! Pure aggregation over account snapshots already fetched from the
//! database. Natural-side normalization, bucketing by category, zero-line
//! filtering and comparative alignment all happen here.
//!
//! Statement lines are signed by their section's side rather than the
//! account's own, so contra accounts net against their section.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sgbooks_shared::types::is_balanced;

use super::error::{ReportError, check_date_range};
use super::types::{
    AccountSnapshot, BalanceSheet, BalanceSheetTotals, GeneralLedger, GeneralLedgerLine,
    LedgerAccount, LedgerPosting, ProfitAndLoss, ProfitAndLossTotals, StatementGroup,
    StatementLine, StatementSection, TrialBalance, TrialBalanceLine,
};
use crate::accounts::{AccountCategory, NormalBalance};
use crate::ledger::RunningBalance;

/// Name of the computed equity line carrying unclosed profit.
pub const CURRENT_YEAR_EARNINGS: &str = "Current Year Earnings";

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a Balance Sheet as of a date.
    ///
    /// `accounts` must carry cumulative balances as of `as_of` for every
    /// category; revenue and expense balances feed the current year
    /// earnings line so that assets equal liabilities plus equity.
    #[must_use]
    pub fn generate_balance_sheet(
        company_name: &str,
        as_of: NaiveDate,
        accounts: &[AccountSnapshot],
        comparative: Option<(NaiveDate, &[AccountSnapshot])>,
        include_zero_balances: bool,
    ) -> BalanceSheet {
        let prior = comparative.map(|(_, snapshots)| snapshots);
        let has_comparative = prior.is_some();

        let assets = finish_section(
            "Assets",
            collect_lines(AccountCategory::Asset, accounts, prior),
            include_zero_balances,
            has_comparative,
        );
        let liabilities = finish_section(
            "Liabilities",
            collect_lines(AccountCategory::Liability, accounts, prior),
            include_zero_balances,
            has_comparative,
        );

        let mut equity_lines = collect_lines(AccountCategory::Equity, accounts, prior);
        equity_lines.push(StatementLine {
            id: None,
            code: String::new(),
            name: CURRENT_YEAR_EARNINGS.to_string(),
            sub_type: Some(CURRENT_YEAR_EARNINGS.to_string()),
            balance: current_earnings(accounts),
            comparative_balance: prior.map(current_earnings),
        });
        let equity = finish_section("Equity", equity_lines, include_zero_balances, has_comparative);

        let totals = balance_sheet_totals(assets.total, liabilities.total, equity.total);
        let comparative_totals = if has_comparative {
            Some(balance_sheet_totals(
                assets.comparative_total.unwrap_or_default(),
                liabilities.comparative_total.unwrap_or_default(),
                equity.comparative_total.unwrap_or_default(),
            ))
        } else {
            None
        };

        if !totals.is_balanced {
            tracing::warn!(
                total_assets = %totals.total_assets,
                total_liabilities_and_equity = %totals.total_liabilities_and_equity,
                "Balance sheet does not balance"
            );
        }

        BalanceSheet {
            title: "Balance Sheet".to_string(),
            company_name: company_name.to_string(),
            as_of_date: as_of,
            comparative_date: comparative.map(|(date, _)| date),
            assets,
            liabilities,
            equity,
            totals,
            comparative_totals,
        }
    }

    /// Generates a Profit & Loss statement for a period.
    ///
    /// `activity` carries net movement within the period (no opening
    /// balances).
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if either period is inverted.
    pub fn generate_profit_and_loss(
        company_name: &str,
        start: NaiveDate,
        end: NaiveDate,
        activity: &[AccountSnapshot],
        comparative: Option<(NaiveDate, NaiveDate, &[AccountSnapshot])>,
        include_zero_balances: bool,
    ) -> Result<ProfitAndLoss, ReportError> {
        check_date_range(start, end)?;
        if let Some((prior_start, prior_end, _)) = comparative {
            check_date_range(prior_start, prior_end)?;
        }

        let prior = comparative.map(|(_, _, snapshots)| snapshots);
        let has_comparative = prior.is_some();

        let revenue = finish_section(
            "Revenue",
            collect_lines(AccountCategory::Revenue, activity, prior),
            include_zero_balances,
            has_comparative,
        );
        let expenses = finish_section(
            "Expenses",
            collect_lines(AccountCategory::Expense, activity, prior),
            include_zero_balances,
            has_comparative,
        );

        let totals = profit_totals(revenue.total, expenses.total);
        let comparative_totals = if has_comparative {
            Some(profit_totals(
                revenue.comparative_total.unwrap_or_default(),
                expenses.comparative_total.unwrap_or_default(),
            ))
        } else {
            None
        };

        Ok(ProfitAndLoss {
            title: "Profit and Loss Statement".to_string(),
            company_name: company_name.to_string(),
            start_date: start,
            end_date: end,
            comparative_period: comparative.map(|(s, e, _)| (s, e)),
            revenue,
            expenses,
            totals,
            comparative_totals,
        })
    }

    /// Generates a Trial Balance as of a date.
    ///
    /// A debit-normal account with a positive natural balance lands in the
    /// debit column and a negative one in the credit column (as an absolute
    /// value); credit-normal accounts mirror that.
    #[must_use]
    pub fn generate_trial_balance(
        company_name: &str,
        as_of: NaiveDate,
        accounts: &[AccountSnapshot],
        include_zero_balances: bool,
    ) -> TrialBalance {
        let mut sorted: Vec<&AccountSnapshot> = accounts.iter().collect();
        sorted.sort_by(|a, b| a.code.cmp(&b.code));

        let mut lines = Vec::with_capacity(sorted.len());
        for account in sorted {
            let natural = account.natural_balance();
            if natural.is_zero() && !include_zero_balances {
                continue;
            }

            let (debit, credit) = match (account.normal_balance, natural >= Decimal::ZERO) {
                (NormalBalance::Debit, true) => (natural, Decimal::ZERO),
                (NormalBalance::Debit, false) => (Decimal::ZERO, -natural),
                (NormalBalance::Credit, true) => (Decimal::ZERO, natural),
                (NormalBalance::Credit, false) => (-natural, Decimal::ZERO),
            };

            lines.push(TrialBalanceLine {
                id: account.id,
                code: account.code.clone(),
                name: account.name.clone(),
                category: account.category,
                debit,
                credit,
            });
        }

        let total_debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let total_credit: Decimal = lines.iter().map(|l| l.credit).sum();

        TrialBalance {
            title: "Trial Balance".to_string(),
            company_name: company_name.to_string(),
            as_of_date: as_of,
            accounts: lines,
            total_debit,
            total_credit,
            is_balanced: is_balanced(total_debit, total_credit),
        }
    }

    /// Generates the General Ledger listing for one account.
    ///
    /// `opening_balance` is the raw balance before `start` (opening balance
    /// plus earlier activity). Postings are listed by date, then entry
    /// number.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `start > end`.
    pub fn generate_general_ledger(
        company_name: &str,
        account: LedgerAccount,
        start: NaiveDate,
        end: NaiveDate,
        opening_balance: Decimal,
        mut postings: Vec<LedgerPosting>,
    ) -> Result<GeneralLedger, ReportError> {
        check_date_range(start, end)?;

        postings.sort_by(|a, b| {
            a.entry_date
                .cmp(&b.entry_date)
                .then_with(|| a.entry_no.cmp(&b.entry_no))
        });

        let mut running = RunningBalance::opening(opening_balance);
        let mut lines = Vec::with_capacity(postings.len());
        for posting in postings {
            running = running.next_entry(posting.debit, posting.credit);
            lines.push(GeneralLedgerLine {
                entry_id: posting.entry_id,
                entry_no: posting.entry_no,
                entry_date: posting.entry_date,
                description: posting.description.unwrap_or_default(),
                reference: posting.reference.unwrap_or_default(),
                debit: posting.debit,
                credit: posting.credit,
                balance: running.current_balance,
            });
        }

        let total_debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let total_credit: Decimal = lines.iter().map(|l| l.credit).sum();

        Ok(GeneralLedger {
            title: format!("General Ledger - {} {}", account.code, account.name),
            company_name: company_name.to_string(),
            account,
            start_date: start,
            end_date: end,
            opening_balance,
            closing_balance: running.current_balance,
            total_debit,
            total_credit,
            lines,
        })
    }
}

/// Revenue minus expenses, in natural terms, from cumulative snapshots.
fn current_earnings(accounts: &[AccountSnapshot]) -> Decimal {
    accounts
        .iter()
        .filter(|a| matches!(a.category, AccountCategory::Revenue | AccountCategory::Expense))
        .map(|a| -a.raw_balance)
        .sum()
}

/// Builds lines for one category, aligned across current and comparative.
fn collect_lines(
    category: AccountCategory,
    current: &[AccountSnapshot],
    comparative: Option<&[AccountSnapshot]>,
) -> Vec<StatementLine> {
    let mut by_code: BTreeMap<String, StatementLine> = BTreeMap::new();

    for account in current.iter().filter(|a| a.category == category) {
        by_code.insert(
            account.code.clone(),
            StatementLine {
                id: Some(account.id),
                code: account.code.clone(),
                name: account.name.clone(),
                sub_type: account.sub_type.clone(),
                balance: account.section_balance(),
                comparative_balance: comparative.map(|_| Decimal::ZERO),
            },
        );
    }

    if let Some(prior) = comparative {
        for account in prior.iter().filter(|a| a.category == category) {
            let line = by_code
                .entry(account.code.clone())
                .or_insert_with(|| StatementLine {
                    id: Some(account.id),
                    code: account.code.clone(),
                    name: account.name.clone(),
                    sub_type: account.sub_type.clone(),
                    balance: Decimal::ZERO,
                    comparative_balance: Some(Decimal::ZERO),
                });
            line.comparative_balance = Some(account.section_balance());
        }
    }

    by_code.into_values().collect()
}

/// Filters zero lines, totals the section and derives subsection groups.
fn finish_section(
    name: &str,
    lines: Vec<StatementLine>,
    include_zero_balances: bool,
    has_comparative: bool,
) -> StatementSection {
    let accounts: Vec<StatementLine> = lines
        .into_iter()
        .filter(|line| {
            include_zero_balances
                || !line.balance.is_zero()
                || line.comparative_balance.is_some_and(|b| !b.is_zero())
        })
        .collect();

    let mut groups: Vec<StatementGroup> = Vec::new();
    for line in &accounts {
        let group_name = line
            .sub_type
            .clone()
            .unwrap_or_else(|| format!("Other {name}"));
        let index = match groups.iter().position(|g| g.name == group_name) {
            Some(index) => index,
            None => {
                groups.push(StatementGroup {
                    name: group_name,
                    total: Decimal::ZERO,
                    comparative_total: has_comparative.then_some(Decimal::ZERO),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];
        group.total += line.balance;
        if let (Some(total), Some(balance)) = (group.comparative_total.as_mut(), line.comparative_balance)
        {
            *total += balance;
        }
    }

    let total = accounts.iter().map(|l| l.balance).sum();
    let comparative_total = has_comparative.then(|| {
        accounts
            .iter()
            .filter_map(|l| l.comparative_balance)
            .sum()
    });

    StatementSection {
        name: name.to_string(),
        accounts,
        groups,
        total,
        comparative_total,
    }
}

fn balance_sheet_totals(assets: Decimal, liabilities: Decimal, equity: Decimal) -> BalanceSheetTotals {
    let total_liabilities_and_equity = liabilities + equity;
    BalanceSheetTotals {
        total_assets: assets,
        total_liabilities: liabilities,
        total_equity: equity,
        total_liabilities_and_equity,
        is_balanced: is_balanced(assets, total_liabilities_and_equity),
    }
}

fn profit_totals(revenue: Decimal, expenses: Decimal) -> ProfitAndLossTotals {
    ProfitAndLossTotals {
        total_revenue: revenue,
        total_expenses: expenses,
        net_profit: revenue - expenses,
    }
}
