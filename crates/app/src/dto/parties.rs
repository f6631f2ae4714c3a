use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sgbooks_db::{
    CustomerInput, PartyDetails, ProductInput, VendorBankDetails, VendorInput,
    entities::sea_orm_active_enums::ProductType,
};
use uuid::Uuid;
use validator::Validate;

use super::{currency_code, non_negative};

/// Contact, address and terms shared by customers and vendors.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PartyDetailsDto {
    /// Registered legal name.
    pub legal_name: Option<String>,
    /// Unique Entity Number.
    #[validate(length(max = 20, message = "UEN cannot exceed 20 characters"))]
    pub uen_no: Option<String>,
    /// Whether the party is GST-registered.
    #[serde(default)]
    pub gst_registered: bool,
    /// GST registration number.
    #[validate(length(max = 20, message = "GST number cannot exceed 20 characters"))]
    pub gst_no: Option<String>,
    /// Contact person.
    pub contact_person: Option<String>,
    /// Email address.
    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Address line 1.
    pub address_line1: Option<String>,
    /// Address line 2.
    pub address_line2: Option<String>,
    /// Postal code.
    #[validate(length(max = 10, message = "Postal code cannot exceed 10 characters"))]
    pub postal_code: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Country; blank means Singapore.
    #[serde(default)]
    pub country: String,
    /// Payment terms in days.
    #[validate(range(min = 0, max = 365, message = "Credit terms must be 0-365 days"))]
    pub credit_terms: i32,
    /// Invoicing currency.
    #[validate(custom(function = "currency_code"))]
    pub currency_code: String,
}

impl Default for PartyDetailsDto {
    fn default() -> Self {
        Self {
            legal_name: None,
            uen_no: None,
            gst_registered: false,
            gst_no: None,
            contact_person: None,
            email: None,
            phone: None,
            address_line1: None,
            address_line2: None,
            postal_code: None,
            city: None,
            country: String::new(),
            credit_terms: 30,
            currency_code: "SGD".to_string(),
        }
    }
}

impl From<PartyDetailsDto> for PartyDetails {
    fn from(dto: PartyDetailsDto) -> Self {
        Self {
            legal_name: dto.legal_name,
            uen_no: dto.uen_no,
            gst_registered: dto.gst_registered,
            gst_no: dto.gst_no,
            contact_person: dto.contact_person,
            email: dto.email,
            phone: dto.phone,
            address_line1: dto.address_line1,
            address_line2: dto.address_line2,
            postal_code: dto.postal_code,
            city: dto.city,
            country: dto.country,
            credit_terms: dto.credit_terms,
            currency_code: dto.currency_code,
        }
    }
}

/// Customer create/update request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerDto {
    /// Unique customer code.
    #[validate(length(min = 1, max = 20, message = "Customer code must be 1-20 characters"))]
    pub customer_code: String,
    /// Display name.
    #[validate(length(min = 1, max = 200, message = "Customer name must be 1-200 characters"))]
    pub name: String,
    /// Contact and terms.
    #[validate(nested)]
    pub details: PartyDetailsDto,
    /// Credit limit, if any.
    pub credit_limit: Option<Decimal>,
    /// Receivables control account override.
    pub receivables_account_id: Option<Uuid>,
}

impl From<CustomerDto> for CustomerInput {
    fn from(dto: CustomerDto) -> Self {
        Self {
            customer_code: dto.customer_code.trim().to_uppercase(),
            name: dto.name.trim().to_string(),
            details: dto.details.into(),
            credit_limit: dto.credit_limit,
            receivables_account_id: dto.receivables_account_id,
        }
    }
}

/// Vendor create/update request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VendorDto {
    /// Unique vendor code.
    #[validate(length(min = 1, max = 20, message = "Vendor code must be 1-20 characters"))]
    pub vendor_code: String,
    /// Display name.
    #[validate(length(min = 1, max = 200, message = "Vendor name must be 1-200 characters"))]
    pub name: String,
    /// Contact and terms.
    #[validate(nested)]
    pub details: PartyDetailsDto,
    /// Whether withholding tax applies to payments.
    #[serde(default)]
    pub withholding_tax_applicable: bool,
    /// Vendor's bank name.
    pub bank_name: Option<String>,
    /// Vendor's bank account number.
    pub bank_account_no: Option<String>,
    /// Vendor's SWIFT code.
    #[validate(length(max = 11, message = "SWIFT code cannot exceed 11 characters"))]
    pub bank_swift_code: Option<String>,
    /// Payables control account override.
    pub payables_account_id: Option<Uuid>,
}

impl From<VendorDto> for VendorInput {
    fn from(dto: VendorDto) -> Self {
        Self {
            vendor_code: dto.vendor_code.trim().to_uppercase(),
            name: dto.name.trim().to_string(),
            details: dto.details.into(),
            withholding_tax_applicable: dto.withholding_tax_applicable,
            bank: VendorBankDetails {
                bank_name: dto.bank_name,
                bank_account_no: dto.bank_account_no,
                bank_swift_code: dto.bank_swift_code,
            },
            payables_account_id: dto.payables_account_id,
        }
    }
}

/// Product or service create/update request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductDto {
    /// Unique product code.
    #[validate(length(min = 1, max = 30, message = "Product code must be 1-30 characters"))]
    pub product_code: String,
    /// Display name.
    #[validate(length(min = 1, max = 200, message = "Product name must be 1-200 characters"))]
    pub name: String,
    /// Long description.
    pub description: Option<String>,
    /// Inventory, service or non-inventory item.
    pub product_type: ProductType,
    /// Unit, e.g. `hour` or `pcs`.
    pub unit_of_measure: Option<String>,
    /// Default selling price.
    #[validate(custom(function = "non_negative"))]
    pub sales_price: Option<Decimal>,
    /// Default buying price.
    #[validate(custom(function = "non_negative"))]
    pub purchase_price: Option<Decimal>,
    /// Revenue account used on sales lines.
    pub sales_account_id: Option<Uuid>,
    /// Expense account used on purchase lines.
    pub purchase_account_id: Option<Uuid>,
    /// Default tax code.
    pub tax_code: Option<String>,
}

impl From<ProductDto> for ProductInput {
    fn from(dto: ProductDto) -> Self {
        Self {
            product_code: dto.product_code.trim().to_uppercase(),
            name: dto.name.trim().to_string(),
            description: dto.description,
            product_type: dto.product_type,
            unit_of_measure: dto.unit_of_measure,
            sales_price: dto.sales_price,
            purchase_price: dto.purchase_price,
            sales_account_id: dto.sales_account_id,
            purchase_account_id: dto.purchase_account_id,
            tax_code: dto.tax_code.filter(|c| !c.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_nested_details_are_validated() {
        let dto = CustomerDto {
            customer_code: "C001".into(),
            name: "Tan Trading Pte Ltd".into(),
            details: PartyDetailsDto {
                email: Some("not-an-email".into()),
                credit_terms: -1,
                ..PartyDetailsDto::default()
            },
            credit_limit: None,
            receivables_account_id: None,
        };
        let err: sgbooks_shared::AppError = dto.validate().unwrap_err().into();
        let messages = err.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages.contains(&"Email address is not valid".to_string()));
        assert!(messages.contains(&"Credit terms must be 0-365 days".to_string()));
    }

    #[test]
    fn test_codes_are_normalised() {
        let input: CustomerInput = CustomerDto {
            customer_code: " c001 ".into(),
            name: " Tan Trading ".into(),
            details: PartyDetailsDto::default(),
            credit_limit: Some(dec!(5000)),
            receivables_account_id: None,
        }
        .into();
        assert_eq!(input.customer_code, "C001");
        assert_eq!(input.name, "Tan Trading");
        assert_eq!(input.details.credit_terms, 30);
    }

    #[test]
    fn test_negative_product_price_rejected() {
        let dto = ProductDto {
            product_code: "SVC-01".into(),
            name: "Consulting".into(),
            description: None,
            product_type: ProductType::Service,
            unit_of_measure: Some("hour".into()),
            sales_price: Some(dec!(-10)),
            purchase_price: None,
            sales_account_id: None,
            purchase_account_id: None,
            tax_code: Some("SR".into()),
        };
        assert!(dto.validate().is_err());
    }
}
