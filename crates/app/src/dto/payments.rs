use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sgbooks_db::entities::sea_orm_active_enums::{PaymentMethod, PaymentType};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{currency_code, positive};

/// Part of a payment settling one invoice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct PaymentAllocationDto {
    /// Sales invoice for customer payments, purchase invoice for vendor payments.
    pub invoice_id: Uuid,
    /// Amount applied.
    #[validate(custom(function = "positive"))]
    pub amount: Decimal,
}

/// A customer receipt or vendor payment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "allocations_within_amount"))]
pub struct PaymentDto {
    /// Receipt or disbursement.
    pub payment_type: PaymentType,
    /// Cash, cheque, GIRO, ...
    pub payment_method: PaymentMethod,
    /// Payment date.
    pub payment_date: NaiveDate,
    /// Customer or vendor.
    pub entity_id: Uuid,
    /// Bank account the money moves through.
    pub bank_account_id: Uuid,
    /// Payment currency.
    #[validate(custom(function = "currency_code"))]
    pub currency_code: String,
    /// Rate to the base currency.
    #[validate(custom(function = "positive"))]
    pub exchange_rate: Decimal,
    /// Amount received or paid.
    #[validate(custom(function = "positive"))]
    pub amount: Decimal,
    /// Cheque number or bank reference.
    pub reference: Option<String>,
    /// Narration.
    pub description: Option<String>,
    /// Invoices settled by this payment.
    #[validate(nested)]
    pub allocations: Vec<PaymentAllocationDto>,
}

fn allocations_within_amount(dto: &PaymentDto) -> Result<(), ValidationError> {
    let allocated: Decimal = dto.allocations.iter().map(|a| a.amount).sum();
    if allocated > dto.amount {
        let mut err = ValidationError::new("over_allocated");
        err.message = Some(
            format!(
                "Allocations total {allocated} exceeds payment amount {}",
                dto.amount
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn payment(amount: Decimal, allocations: &[Decimal]) -> PaymentDto {
        PaymentDto {
            payment_type: PaymentType::CustomerPayment,
            payment_method: PaymentMethod::BankTransfer,
            payment_date: NaiveDate::from_ymd_opt(2026, 4, 10).unwrap(),
            entity_id: Uuid::now_v7(),
            bank_account_id: Uuid::now_v7(),
            currency_code: "SGD".into(),
            exchange_rate: Decimal::ONE,
            amount,
            reference: None,
            description: None,
            allocations: allocations
                .iter()
                .map(|&amount| PaymentAllocationDto {
                    invoice_id: Uuid::now_v7(),
                    amount,
                })
                .collect(),
        }
    }

    #[test]
    fn test_allocations_may_leave_unapplied_cash() {
        assert!(payment(dec!(500), &[dec!(200), dec!(100)]).validate().is_ok());
    }

    #[test]
    fn test_over_allocation_rejected() {
        let err: sgbooks_shared::AppError = payment(dec!(500), &[dec!(400), dec!(100.01)])
            .validate()
            .unwrap_err()
            .into();
        assert_eq!(
            err.messages(),
            vec!["Allocations total 500.01 exceeds payment amount 500".to_string()]
        );
    }
}
