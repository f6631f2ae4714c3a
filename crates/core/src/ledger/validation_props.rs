//! Property-based tests for journal line validation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;
use sgbooks_shared::types::AccountId;

use super::error::LedgerError;
use super::types::JournalLineInput;
use super::validation::{reverse_lines, validate_journal_lines};

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a negative amount.
fn negative_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

fn debit(amount: Decimal) -> JournalLineInput {
    JournalLineInput::debit(AccountId::new(), amount, "SGD")
}

fn credit(amount: Decimal) -> JournalLineInput {
    JournalLineInput::credit(AccountId::new(), amount, "SGD")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Lines with neither side set are rejected.
    #[test]
    fn prop_zero_line_rejected(other in positive_amount()) {
        let lines = vec![debit(Decimal::ZERO), credit(other)];
        prop_assert_eq!(validate_journal_lines(&lines), Err(LedgerError::ZeroAmount(1)));
    }

    /// Negative amounts are rejected before balance is checked.
    #[test]
    fn prop_negative_amount_rejected(neg in negative_amount(), other in positive_amount()) {
        let lines = vec![credit(other), debit(neg)];
        prop_assert_eq!(validate_journal_lines(&lines), Err(LedgerError::NegativeAmount(2)));
    }

    /// A single line can never form an entry.
    #[test]
    fn prop_single_line_rejected(amount in positive_amount()) {
        let lines = vec![debit(amount)];
        prop_assert_eq!(validate_journal_lines(&lines), Err(LedgerError::InsufficientLines));
    }

    /// Split debits against one credit for the total are accepted.
    #[test]
    fn prop_multi_line_balanced_accepted(
        amounts in prop::collection::vec(positive_amount(), 1..10),
    ) {
        let total: Decimal = amounts.iter().copied().sum();
        let mut lines: Vec<_> = amounts.into_iter().map(debit).collect();
        lines.push(credit(total));

        let totals = validate_journal_lines(&lines);
        prop_assert!(totals.is_ok(), "got {:?}", totals);
    }

    /// Any difference between the sides is rejected.
    #[test]
    fn prop_unbalanced_rejected(a in positive_amount(), b in positive_amount()) {
        prop_assume!(a != b);
        let lines = vec![debit(a), credit(b)];
        let is_unbalanced = matches!(
            validate_journal_lines(&lines),
            Err(LedgerError::Unbalanced { .. })
        );
        prop_assert!(is_unbalanced);
    }

    /// Reversing a valid entry yields a valid entry with the same totals.
    #[test]
    fn prop_reversal_stays_balanced(a in positive_amount(), b in positive_amount()) {
        let lines = vec![debit(a), debit(b), credit(a + b)];
        let reversed = reverse_lines(&lines);

        let original = validate_journal_lines(&lines).unwrap();
        let mirrored = validate_journal_lines(&reversed).unwrap();
        prop_assert_eq!(original.total_debit, mirrored.total_credit);

        let net: Decimal = lines
            .iter()
            .chain(reversed.iter())
            .map(JournalLineInput::net_debit)
            .sum();
        prop_assert_eq!(net, Decimal::ZERO);
    }
}
