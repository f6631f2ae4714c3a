//! Business rule validation for journal entries.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sgbooks_shared::types::AccountId;

use super::error::LedgerError;
use super::types::{AccountPostingInfo, JournalLineInput, JournalTotals};

/// Validates the lines of a journal entry.
///
/// Rules, checked in order:
/// - at least two lines
/// - no negative amounts
/// - exactly one of debit/credit is non-zero on every line
/// - total debits equal total credits
///
/// Line numbers in errors are 1-based.
///
/// # Errors
///
/// Returns the first rule violated.
pub fn validate_journal_lines(lines: &[JournalLineInput]) -> Result<JournalTotals, LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }

    for (index, line) in lines.iter().enumerate() {
        let line_no = index + 1;
        if line.debit_amount < Decimal::ZERO || line.credit_amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount(line_no));
        }
        match (line.debit_amount.is_zero(), line.credit_amount.is_zero()) {
            (true, true) => return Err(LedgerError::ZeroAmount(line_no)),
            (false, false) => return Err(LedgerError::BothSides(line_no)),
            _ => {}
        }
    }

    let totals = JournalTotals::from_lines(lines);
    if !totals.is_balanced {
        return Err(LedgerError::Unbalanced {
            debit: totals.total_debit,
            credit: totals.total_credit,
        });
    }

    Ok(totals)
}

/// Checks that every line posts to a known, active account.
///
/// # Errors
///
/// Returns `AccountNotFound` or `AccountInactive` for the first offending line.
pub fn validate_line_accounts(
    lines: &[JournalLineInput],
    accounts: &HashMap<AccountId, AccountPostingInfo>,
) -> Result<(), LedgerError> {
    for line in lines {
        let account = accounts
            .get(&line.account_id)
            .ok_or(LedgerError::AccountNotFound(line.account_id.into_inner()))?;
        if !account.is_active {
            return Err(LedgerError::AccountInactive(account.code.clone()));
        }
    }
    Ok(())
}

/// Builds the lines of a reversing entry by swapping debit and credit.
#[must_use]
pub fn reverse_lines(lines: &[JournalLineInput]) -> Vec<JournalLineInput> {
    lines
        .iter()
        .map(|line| JournalLineInput {
            debit_amount: line.credit_amount,
            credit_amount: line.debit_amount,
            ..line.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn info(id: AccountId, active: bool) -> AccountPostingInfo {
        AccountPostingInfo {
            id,
            code: "1010".to_string(),
            is_active: active,
        }
    }

    #[test]
    fn test_balanced_entry_accepted() {
        let cash = AccountId::new();
        let sales = AccountId::new();
        let lines = vec![
            JournalLineInput::debit(cash, dec!(109.00), "SGD"),
            JournalLineInput::credit(sales, dec!(100.00), "SGD"),
            JournalLineInput::credit(sales, dec!(9.00), "SGD"),
        ];
        let totals = validate_journal_lines(&lines).unwrap();
        assert_eq!(totals.total_debit, dec!(109.00));
        assert_eq!(totals.total_credit, dec!(109.00));
    }

    #[test]
    fn test_both_sides_rejected() {
        let id = AccountId::new();
        let mut line = JournalLineInput::debit(id, dec!(10), "SGD");
        line.credit_amount = dec!(10);
        let lines = vec![JournalLineInput::credit(id, dec!(0.01), "SGD"), line];
        assert_eq!(
            validate_journal_lines(&lines),
            Err(LedgerError::BothSides(2))
        );
    }

    #[test]
    fn test_unbalanced_reports_totals() {
        let id = AccountId::new();
        let lines = vec![
            JournalLineInput::debit(id, dec!(100), "SGD"),
            JournalLineInput::credit(id, dec!(99.99), "SGD"),
        ];
        assert_eq!(
            validate_journal_lines(&lines),
            Err(LedgerError::Unbalanced {
                debit: dec!(100),
                credit: dec!(99.99),
            })
        );
    }

    #[test]
    fn test_line_accounts() {
        let active = AccountId::new();
        let inactive = AccountId::new();
        let missing = AccountId::new();
        let accounts = HashMap::from([
            (active, info(active, true)),
            (inactive, info(inactive, false)),
        ]);

        let ok = vec![JournalLineInput::debit(active, dec!(1), "SGD")];
        assert!(validate_line_accounts(&ok, &accounts).is_ok());

        let bad = vec![JournalLineInput::debit(inactive, dec!(1), "SGD")];
        assert_eq!(
            validate_line_accounts(&bad, &accounts),
            Err(LedgerError::AccountInactive("1010".into()))
        );

        let unknown = vec![JournalLineInput::debit(missing, dec!(1), "SGD")];
        assert!(matches!(
            validate_line_accounts(&unknown, &accounts),
            Err(LedgerError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_reverse_lines_swaps_sides() {
        let id = AccountId::new();
        let lines = vec![
            JournalLineInput::debit(id, dec!(50), "SGD").with_tax("TX", dec!(4.50)),
            JournalLineInput::credit(id, dec!(50), "SGD"),
        ];
        let reversed = reverse_lines(&lines);
        assert_eq!(reversed[0].credit_amount, dec!(50));
        assert_eq!(reversed[0].debit_amount, Decimal::ZERO);
        assert_eq!(reversed[0].tax_code.as_deref(), Some("TX"));
        assert_eq!(reversed[1].debit_amount, dec!(50));
    }
}
