//! Running balance calculations for ledger listings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Running balance information for one line of an account ledger.
///
/// Balances are raw debit-positive amounts:
/// - `current_balance[N] = previous_balance[N] + debit - credit`
/// - `previous_balance[N] = current_balance[N-1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// 1-based position of this line in the listing.
    pub sequence: u32,
    /// Balance before this line.
    pub previous_balance: Decimal,
    /// Balance after this line.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Starts a chain at the given opening balance with no lines applied.
    #[must_use]
    pub const fn opening(balance: Decimal) -> Self {
        Self {
            sequence: 0,
            previous_balance: balance,
            current_balance: balance,
        }
    }

    /// Creates the running balance for the first line after an opening balance.
    #[must_use]
    pub fn first_entry(opening: Decimal, debit: Decimal, credit: Decimal) -> Self {
        Self::opening(opening).next_entry(debit, credit)
    }

    /// Creates the running balance for the line after `self`.
    #[must_use]
    pub fn next_entry(&self, debit: Decimal, credit: Decimal) -> Self {
        Self {
            sequence: self.sequence + 1,
            previous_balance: self.current_balance,
            current_balance: self.current_balance + debit - credit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    /// Strategy for a single (debit, credit) line with exactly one side set.
    fn line_strategy() -> impl Strategy<Value = (Decimal, Decimal)> {
        (1i64..10_000_000i64, any::<bool>()).prop_map(|(cents, is_debit)| {
            let amount = Decimal::new(cents, 2);
            if is_debit {
                (amount, Decimal::ZERO)
            } else {
                (Decimal::ZERO, amount)
            }
        })
    }

    fn opening_strategy() -> impl Strategy<Value = Decimal> {
        (-100_000_000i64..100_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The closing balance equals the opening plus net movement.
        #[test]
        fn prop_closing_equals_opening_plus_movement(
            opening in opening_strategy(),
            lines in prop::collection::vec(line_strategy(), 1..30),
        ) {
            let mut current = RunningBalance::opening(opening);
            for (debit, credit) in &lines {
                current = current.next_entry(*debit, *credit);
            }

            let movement: Decimal = lines.iter().map(|(d, c)| d - c).sum();
            prop_assert_eq!(current.current_balance, opening + movement);
            prop_assert_eq!(current.sequence as usize, lines.len());
        }

        /// Each line starts where the previous one ended.
        #[test]
        fn prop_previous_equals_prior_current(
            opening in opening_strategy(),
            first in line_strategy(),
            second in line_strategy(),
        ) {
            let rb1 = RunningBalance::first_entry(opening, first.0, first.1);
            let rb2 = rb1.next_entry(second.0, second.1);

            prop_assert_eq!(rb1.previous_balance, opening);
            prop_assert_eq!(rb2.previous_balance, rb1.current_balance);
            prop_assert_eq!(rb2.sequence, 2);
        }
    }

    #[test]
    fn test_specific_chain() {
        let rb = RunningBalance::first_entry(dec!(1000), dec!(250), Decimal::ZERO);
        assert_eq!(rb.current_balance, dec!(1250));
        assert_eq!(rb.sequence, 1);

        let rb = rb.next_entry(Decimal::ZERO, dec!(1500));
        assert_eq!(rb.previous_balance, dec!(1250));
        assert_eq!(rb.current_balance, dec!(-250));
    }

    #[test]
    fn test_opening_has_no_lines() {
        let rb = RunningBalance::opening(dec!(42));
        assert_eq!(rb.sequence, 0);
        assert_eq!(rb.previous_balance, rb.current_balance);
    }
}
