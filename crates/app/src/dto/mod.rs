//! Validated input structs passed to the managers.
//!
//! Every DTO derives [`validator::Validate`]; managers call `validate()`
//! before opening a transaction and the failures surface as
//! `AppError::Validation` with one message per broken rule.

mod accounts;
mod banking;
mod fiscal;
mod gst;
mod invoices;
mod journal;
mod parties;
mod payments;
mod settings;
mod tax;

pub use accounts::{CreateAccountDto, UpdateAccountDto};
pub use banking::{CreateBankAccountDto, ReconcileDto, RecordBankTransactionDto};
pub use fiscal::CreateFiscalYearDto;
pub use gst::{FinalizeGstReturnDto, GstPeriodDto};
pub use invoices::{InvoiceLineDto, PurchaseInvoiceDto, SalesInvoiceDto};
pub use journal::{JournalEntryDto, JournalLineDto};
pub use parties::{CustomerDto, PartyDetailsDto, ProductDto, VendorDto};
pub use payments::{PaymentAllocationDto, PaymentDto};
pub use settings::CompanySettingsDto;
pub use tax::{CreateTaxCodeDto, ExchangeRateDto};

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

fn rule(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message))
}

/// Rejects negative amounts.
pub(crate) fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(rule("non_negative", format!("Amount {value} cannot be negative")));
    }
    Ok(())
}

/// Rejects zero and negative amounts.
pub(crate) fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(rule("positive", format!("Amount {value} must be greater than zero")));
    }
    Ok(())
}

/// Percentages between 0 and 100 inclusive.
pub(crate) fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        return Err(rule(
            "percentage",
            format!("Percentage {value} must be between 0 and 100"),
        ));
    }
    Ok(())
}

/// Account codes follow the chart-of-accounts format.
pub(crate) fn account_code(value: &str) -> Result<(), ValidationError> {
    sgbooks_core::accounts::validate_account_code(value).map_err(|msg| rule("account_code", msg))
}

/// Three-letter upper-case ISO currency codes.
pub(crate) fn currency_code(value: &str) -> Result<(), ValidationError> {
    if value.len() == 3 && value.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(rule(
            "currency_code",
            format!("Currency code '{value}' must be three upper-case letters"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), true)]
    #[case(dec!(12.50), true)]
    #[case(dec!(-0.01), false)]
    fn test_non_negative(#[case] value: Decimal, #[case] ok: bool) {
        assert_eq!(non_negative(&value).is_ok(), ok);
    }

    #[rstest]
    #[case(dec!(0.01), true)]
    #[case(dec!(0), false)]
    #[case(dec!(-5), false)]
    fn test_positive(#[case] value: Decimal, #[case] ok: bool) {
        assert_eq!(positive(&value).is_ok(), ok);
    }

    #[rstest]
    #[case(dec!(0), true)]
    #[case(dec!(100), true)]
    #[case(dec!(100.01), false)]
    #[case(dec!(-1), false)]
    fn test_percentage(#[case] value: Decimal, #[case] ok: bool) {
        assert_eq!(percentage(&value).is_ok(), ok);
    }

    #[rstest]
    #[case("SGD", true)]
    #[case("usd", false)]
    #[case("SGDX", false)]
    fn test_currency_code(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(currency_code(value).is_ok(), ok);
    }

    #[test]
    fn test_rule_messages_are_readable() {
        let err = positive(&dec!(0)).unwrap_err();
        assert_eq!(
            err.message.as_deref(),
            Some("Amount 0 must be greater than zero")
        );
        let err = account_code("10 10").unwrap_err();
        assert!(err.message.unwrap().contains("invalid characters"));
    }
}
