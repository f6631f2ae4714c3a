//! `SeaORM` active enums.
//!
//! Every enum is stored as a short string column guarded by a CHECK
//! constraint in the migration. Conversions to the domain enums in
//! `sgbooks-core` live next to each type.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use sgbooks_core::accounts;
use sgbooks_core::fiscal;
use sgbooks_core::gst;
use sgbooks_core::invoice;
use sgbooks_core::ledger;

/// Top-level account category (`accounts.account_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AccountCategory {
    #[sea_orm(string_value = "Asset")]
    Asset,
    #[sea_orm(string_value = "Liability")]
    Liability,
    #[sea_orm(string_value = "Equity")]
    Equity,
    #[sea_orm(string_value = "Revenue")]
    Revenue,
    #[sea_orm(string_value = "Expense")]
    Expense,
}

impl From<AccountCategory> for accounts::AccountCategory {
    fn from(value: AccountCategory) -> Self {
        match value {
            AccountCategory::Asset => Self::Asset,
            AccountCategory::Liability => Self::Liability,
            AccountCategory::Equity => Self::Equity,
            AccountCategory::Revenue => Self::Revenue,
            AccountCategory::Expense => Self::Expense,
        }
    }
}

impl From<accounts::AccountCategory> for AccountCategory {
    fn from(value: accounts::AccountCategory) -> Self {
        match value {
            accounts::AccountCategory::Asset => Self::Asset,
            accounts::AccountCategory::Liability => Self::Liability,
            accounts::AccountCategory::Equity => Self::Equity,
            accounts::AccountCategory::Revenue => Self::Revenue,
            accounts::AccountCategory::Expense => Self::Expense,
        }
    }
}

/// Statement an account type reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ReportType {
    #[sea_orm(string_value = "BalanceSheet")]
    BalanceSheet,
    #[sea_orm(string_value = "ProfitLoss")]
    ProfitLoss,
}

impl From<accounts::ReportType> for ReportType {
    fn from(value: accounts::ReportType) -> Self {
        match value {
            accounts::ReportType::BalanceSheet => Self::BalanceSheet,
            accounts::ReportType::ProfitLoss => Self::ProfitLoss,
        }
    }
}

/// Journal classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum JournalType {
    #[sea_orm(string_value = "General")]
    General,
    #[sea_orm(string_value = "Sales")]
    Sales,
    #[sea_orm(string_value = "Purchase")]
    Purchase,
    #[sea_orm(string_value = "CashReceipt")]
    CashReceipt,
    #[sea_orm(string_value = "CashDisbursement")]
    CashDisbursement,
    #[sea_orm(string_value = "Payroll")]
    Payroll,
    #[sea_orm(string_value = "OpeningBalance")]
    OpeningBalance,
    #[sea_orm(string_value = "Adjustment")]
    Adjustment,
    #[sea_orm(string_value = "Gst")]
    Gst,
}

impl From<ledger::JournalType> for JournalType {
    fn from(value: ledger::JournalType) -> Self {
        match value {
            ledger::JournalType::General => Self::General,
            ledger::JournalType::Sales => Self::Sales,
            ledger::JournalType::Purchase => Self::Purchase,
            ledger::JournalType::CashReceipt => Self::CashReceipt,
            ledger::JournalType::CashDisbursement => Self::CashDisbursement,
            ledger::JournalType::Payroll => Self::Payroll,
            ledger::JournalType::OpeningBalance => Self::OpeningBalance,
            ledger::JournalType::Adjustment => Self::Adjustment,
            ledger::JournalType::Gst => Self::Gst,
        }
    }
}

impl From<JournalType> for ledger::JournalType {
    fn from(value: JournalType) -> Self {
        match value {
            JournalType::General => Self::General,
            JournalType::Sales => Self::Sales,
            JournalType::Purchase => Self::Purchase,
            JournalType::CashReceipt => Self::CashReceipt,
            JournalType::CashDisbursement => Self::CashDisbursement,
            JournalType::Payroll => Self::Payroll,
            JournalType::OpeningBalance => Self::OpeningBalance,
            JournalType::Adjustment => Self::Adjustment,
            JournalType::Gst => Self::Gst,
        }
    }
}

/// Fiscal period granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum PeriodType {
    #[sea_orm(string_value = "Month")]
    Month,
    #[sea_orm(string_value = "Quarter")]
    Quarter,
    #[sea_orm(string_value = "Year")]
    Year,
}

impl From<fiscal::PeriodType> for PeriodType {
    fn from(value: fiscal::PeriodType) -> Self {
        match value {
            fiscal::PeriodType::Month => Self::Month,
            fiscal::PeriodType::Quarter => Self::Quarter,
            fiscal::PeriodType::Year => Self::Year,
        }
    }
}

impl From<PeriodType> for fiscal::PeriodType {
    fn from(value: PeriodType) -> Self {
        match value {
            PeriodType::Month => Self::Month,
            PeriodType::Quarter => Self::Quarter,
            PeriodType::Year => Self::Year,
        }
    }
}

/// Fiscal period lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum FiscalPeriodStatus {
    #[sea_orm(string_value = "Open")]
    Open,
    #[sea_orm(string_value = "Closed")]
    Closed,
    #[sea_orm(string_value = "Archived")]
    Archived,
}

impl From<fiscal::FiscalPeriodStatus> for FiscalPeriodStatus {
    fn from(value: fiscal::FiscalPeriodStatus) -> Self {
        match value {
            fiscal::FiscalPeriodStatus::Open => Self::Open,
            fiscal::FiscalPeriodStatus::Closed => Self::Closed,
            fiscal::FiscalPeriodStatus::Archived => Self::Archived,
        }
    }
}

impl From<FiscalPeriodStatus> for fiscal::FiscalPeriodStatus {
    fn from(value: FiscalPeriodStatus) -> Self {
        match value {
            FiscalPeriodStatus::Open => Self::Open,
            FiscalPeriodStatus::Closed => Self::Closed,
            FiscalPeriodStatus::Archived => Self::Archived,
        }
    }
}

/// Kind of tax a tax code represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TaxType {
    #[sea_orm(string_value = "Gst")]
    Gst,
    #[sea_orm(string_value = "Withholding")]
    Withholding,
    #[sea_orm(string_value = "Income")]
    Income,
}

/// GST return filing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum GstReturnStatus {
    #[sea_orm(string_value = "Draft")]
    Draft,
    #[sea_orm(string_value = "Submitted")]
    Submitted,
    #[sea_orm(string_value = "Amended")]
    Amended,
}

impl From<GstReturnStatus> for gst::GstReturnStatus {
    fn from(value: GstReturnStatus) -> Self {
        match value {
            GstReturnStatus::Draft => Self::Draft,
            GstReturnStatus::Submitted => Self::Submitted,
            GstReturnStatus::Amended => Self::Amended,
        }
    }
}

/// Product classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ProductType {
    #[sea_orm(string_value = "Inventory")]
    Inventory,
    #[sea_orm(string_value = "Service")]
    Service,
    #[sea_orm(string_value = "NonInventory")]
    NonInventory,
}

/// Sales/purchase invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "Draft")]
    Draft,
    #[sea_orm(string_value = "Approved")]
    Approved,
    #[sea_orm(string_value = "PartiallyPaid")]
    PartiallyPaid,
    #[sea_orm(string_value = "Paid")]
    Paid,
    #[sea_orm(string_value = "Overdue")]
    Overdue,
    #[sea_orm(string_value = "Voided")]
    Voided,
}

impl From<InvoiceStatus> for invoice::InvoiceStatus {
    fn from(value: InvoiceStatus) -> Self {
        match value {
            InvoiceStatus::Draft => Self::Draft,
            InvoiceStatus::Approved => Self::Approved,
            InvoiceStatus::PartiallyPaid => Self::PartiallyPaid,
            InvoiceStatus::Paid => Self::Paid,
            InvoiceStatus::Overdue => Self::Overdue,
            InvoiceStatus::Voided => Self::Voided,
        }
    }
}

impl From<invoice::InvoiceStatus> for InvoiceStatus {
    fn from(value: invoice::InvoiceStatus) -> Self {
        match value {
            invoice::InvoiceStatus::Draft => Self::Draft,
            invoice::InvoiceStatus::Approved => Self::Approved,
            invoice::InvoiceStatus::PartiallyPaid => Self::PartiallyPaid,
            invoice::InvoiceStatus::Paid => Self::Paid,
            invoice::InvoiceStatus::Overdue => Self::Overdue,
            invoice::InvoiceStatus::Voided => Self::Voided,
        }
    }
}

/// Bank transaction classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum BankTransactionType {
    #[sea_orm(string_value = "Deposit")]
    Deposit,
    #[sea_orm(string_value = "Withdrawal")]
    Withdrawal,
    #[sea_orm(string_value = "Transfer")]
    Transfer,
    #[sea_orm(string_value = "Interest")]
    Interest,
    #[sea_orm(string_value = "Fee")]
    Fee,
    #[sea_orm(string_value = "Adjustment")]
    Adjustment,
}

/// Direction of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PaymentType {
    #[sea_orm(string_value = "CustomerPayment")]
    CustomerPayment,
    #[sea_orm(string_value = "VendorPayment")]
    VendorPayment,
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "Cash")]
    Cash,
    #[sea_orm(string_value = "Check")]
    Check,
    #[sea_orm(string_value = "BankTransfer")]
    BankTransfer,
    #[sea_orm(string_value = "CreditCard")]
    CreditCard,
    #[sea_orm(string_value = "GiroPayNow")]
    GiroPayNow,
    #[sea_orm(string_value = "Other")]
    Other,
}

/// Payment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "Draft")]
    Draft,
    #[sea_orm(string_value = "Approved")]
    Approved,
    #[sea_orm(string_value = "Voided")]
    Voided,
}

/// Document a payment allocation settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AllocationDocumentType {
    #[sea_orm(string_value = "SalesInvoice")]
    SalesInvoice,
    #[sea_orm(string_value = "PurchaseInvoice")]
    PurchaseInvoice,
}

/// Audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum AuditAction {
    #[sea_orm(string_value = "Insert")]
    Insert,
    #[sea_orm(string_value = "Update")]
    Update,
    #[sea_orm(string_value = "Delete")]
    Delete,
    #[sea_orm(string_value = "Post")]
    Post,
    #[sea_orm(string_value = "Reverse")]
    Reverse,
    #[sea_orm(string_value = "Void")]
    Void,
}
