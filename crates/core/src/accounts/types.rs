//! Account categories and balance sides.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-level account category.
///
/// Stored as the `account_type` string on every account row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountCategory {
    /// Resources owned (cash, receivables, equipment).
    Asset,
    /// Obligations owed (payables, loans, GST payable).
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountCategory {
    /// All categories in statement order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];

    /// Returns the natural balance side of this category.
    ///
    /// - Asset/Expense: debit-normal
    /// - Liability/Equity/Revenue: credit-normal
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns the statement this category reports on.
    #[must_use]
    pub const fn report_type(self) -> ReportType {
        match self {
            Self::Asset | Self::Liability | Self::Equity => ReportType::BalanceSheet,
            Self::Revenue | Self::Expense => ReportType::ProfitLoss,
        }
    }

    /// Returns the canonical name stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
            Self::Equity => "Equity",
            Self::Revenue => "Revenue",
            Self::Expense => "Expense",
        }
    }
}

impl std::fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" | "income" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown account type: {s}")),
        }
    }
}

/// Natural balance side of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NormalBalance {
    /// Positive balances are recorded as debits.
    Debit,
    /// Positive balances are recorded as credits.
    Credit,
}

impl NormalBalance {
    /// Builds the side from the `is_debit_balance` flag of the account-type table.
    #[must_use]
    pub const fn from_is_debit(is_debit_balance: bool) -> Self {
        if is_debit_balance {
            Self::Debit
        } else {
            Self::Credit
        }
    }

    /// Converts a raw debit-positive balance into the account's natural sign.
    ///
    /// Credit-normal balances are negated so that a positive number always
    /// means "increase in the natural direction".
    #[must_use]
    pub fn normalize(self, raw_balance: Decimal) -> Decimal {
        match self {
            Self::Debit => raw_balance,
            Self::Credit => -raw_balance,
        }
    }

    /// Calculates the natural-sign balance change for one line.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Financial statement a category reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportType {
    /// Balance Sheet (point in time).
    BalanceSheet,
    /// Profit & Loss (period activity).
    ProfitLoss,
}

impl ReportType {
    /// Returns the canonical name stored in the account-type table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BalanceSheet => "BalanceSheet",
            Self::ProfitLoss => "ProfitLoss",
        }
    }
}

/// Checks an account code: 1-20 characters of ASCII letters, digits, `-` or `.`.
///
/// # Errors
///
/// Returns a message describing the first problem found.
pub fn validate_account_code(code: &str) -> Result<(), String> {
    let code = code.trim();
    if code.is_empty() {
        return Err("Account code is required".to_string());
    }
    if code.len() > 20 {
        return Err("Account code cannot exceed 20 characters".to_string());
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        return Err(format!("Account code '{code}' contains invalid characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[rstest]
    #[case(AccountCategory::Asset, NormalBalance::Debit)]
    #[case(AccountCategory::Expense, NormalBalance::Debit)]
    #[case(AccountCategory::Liability, NormalBalance::Credit)]
    #[case(AccountCategory::Equity, NormalBalance::Credit)]
    #[case(AccountCategory::Revenue, NormalBalance::Credit)]
    fn test_normal_balance(#[case] category: AccountCategory, #[case] side: NormalBalance) {
        assert_eq!(category.normal_balance(), side);
    }

    #[test]
    fn test_report_type() {
        assert_eq!(AccountCategory::Asset.report_type(), ReportType::BalanceSheet);
        assert_eq!(AccountCategory::Equity.report_type(), ReportType::BalanceSheet);
        assert_eq!(AccountCategory::Revenue.report_type(), ReportType::ProfitLoss);
        assert_eq!(AccountCategory::Expense.report_type(), ReportType::ProfitLoss);
    }

    #[test]
    fn test_category_round_trip_names() {
        for category in AccountCategory::ALL {
            assert_eq!(AccountCategory::from_str(category.as_str()).unwrap(), category);
        }
        assert_eq!(
            AccountCategory::from_str("income").unwrap(),
            AccountCategory::Revenue
        );
        assert!(AccountCategory::from_str("Contra").is_err());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(NormalBalance::Debit.normalize(dec!(150)), dec!(150));
        assert_eq!(NormalBalance::Credit.normalize(dec!(-150)), dec!(150));
        assert_eq!(NormalBalance::Credit.normalize(dec!(40)), dec!(-40));
    }

    #[test]
    fn test_account_code_validation() {
        assert!(validate_account_code("1010").is_ok());
        assert!(validate_account_code("SYS-GST-OUTPUT").is_ok());
        assert!(validate_account_code("").is_err());
        assert!(validate_account_code("10 10").is_err());
        assert!(validate_account_code(&"9".repeat(21)).is_err());
    }

    proptest! {
        /// Normalising a line's raw change equals the natural-side change.
        #[test]
        fn prop_balance_change_matches_normalize(
            debit in 0i64..1_000_000,
            credit in 0i64..1_000_000,
        ) {
            let debit = Decimal::new(debit, 2);
            let credit = Decimal::new(credit, 2);
            for side in [NormalBalance::Debit, NormalBalance::Credit] {
                prop_assert_eq!(side.balance_change(debit, credit), side.normalize(debit - credit));
            }
        }
    }
}
