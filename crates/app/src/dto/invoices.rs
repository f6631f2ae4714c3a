use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{currency_code, non_negative, percentage, positive};

/// One line of a sales or purchase invoice.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InvoiceLineDto {
    /// Product or service sold/bought, if catalogued.
    pub product_id: Option<Uuid>,
    /// Revenue or expense account; defaults to the product's account.
    pub account_id: Option<Uuid>,
    /// Line text.
    #[validate(length(min = 1, max = 500, message = "Line description must be 1-500 characters"))]
    pub description: String,
    /// Quantity.
    #[validate(custom(function = "positive"))]
    pub quantity: Decimal,
    /// Price per unit before discount.
    #[validate(custom(function = "non_negative"))]
    pub unit_price: Decimal,
    /// Discount in percent.
    #[serde(default)]
    #[validate(custom(function = "percentage"))]
    pub discount_percent: Decimal,
    /// GST code; defaults to the product's code.
    pub tax_code: Option<String>,
}

/// Sales invoice create/update request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SalesInvoiceDto {
    /// Customer billed.
    pub customer_id: Uuid,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Due date; defaults to the customer's credit terms.
    pub due_date: Option<NaiveDate>,
    /// Invoice currency.
    #[validate(custom(function = "currency_code"))]
    pub currency_code: String,
    /// Rate to the base currency.
    #[validate(custom(function = "positive"))]
    pub exchange_rate: Decimal,
    /// Notes printed on the invoice.
    pub notes: Option<String>,
    /// Lines.
    #[validate(length(min = 1, message = "Invoice must have at least one line"))]
    #[validate(nested)]
    pub lines: Vec<InvoiceLineDto>,
}

/// Purchase invoice create/update request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PurchaseInvoiceDto {
    /// Vendor who billed us.
    pub vendor_id: Uuid,
    /// The vendor's own invoice number.
    #[validate(length(max = 50, message = "Vendor invoice number cannot exceed 50 characters"))]
    pub vendor_invoice_no: Option<String>,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Due date; defaults to the vendor's credit terms.
    pub due_date: Option<NaiveDate>,
    /// Invoice currency.
    #[validate(custom(function = "currency_code"))]
    pub currency_code: String,
    /// Rate to the base currency.
    #[validate(custom(function = "positive"))]
    pub exchange_rate: Decimal,
    /// Internal notes.
    pub notes: Option<String>,
    /// Lines.
    #[validate(length(min = 1, message = "Invoice must have at least one line"))]
    #[validate(nested)]
    pub lines: Vec<InvoiceLineDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line() -> InvoiceLineDto {
        InvoiceLineDto {
            product_id: None,
            account_id: Some(Uuid::now_v7()),
            description: "Consulting".into(),
            quantity: dec!(2),
            unit_price: dec!(150),
            discount_percent: dec!(0),
            tax_code: Some("SR".into()),
        }
    }

    #[test]
    fn test_invoice_without_lines_rejected() {
        let dto = SalesInvoiceDto {
            customer_id: Uuid::now_v7(),
            invoice_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            due_date: None,
            currency_code: "SGD".into(),
            exchange_rate: Decimal::ONE,
            notes: None,
            lines: vec![],
        };
        let err: sgbooks_shared::AppError = dto.validate().unwrap_err().into();
        assert_eq!(
            err.messages(),
            vec!["Invoice must have at least one line".to_string()]
        );
    }

    #[test]
    fn test_line_rules_reported_per_line() {
        let dto = PurchaseInvoiceDto {
            vendor_id: Uuid::now_v7(),
            vendor_invoice_no: Some("INV-889".into()),
            invoice_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            due_date: None,
            currency_code: "SGD".into(),
            exchange_rate: Decimal::ONE,
            notes: None,
            lines: vec![
                line(),
                InvoiceLineDto {
                    quantity: dec!(0),
                    discount_percent: dec!(120),
                    ..line()
                },
            ],
        };
        let err: sgbooks_shared::AppError = dto.validate().unwrap_err().into();
        assert_eq!(err.messages().len(), 2);
    }
}
