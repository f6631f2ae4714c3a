//! `SeaORM` Entity for vendors.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(schema_name = "business", table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub vendor_code: String,
    pub name: String,
    pub legal_name: Option<String>,
    pub uen_no: Option<String>,
    pub gst_registered: bool,
    pub gst_no: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: String,
    pub credit_terms: i32,
    pub currency_code: String,
    pub is_active: bool,
    pub withholding_tax_applicable: bool,
    pub bank_name: Option<String>,
    pub bank_account_no: Option<String>,
    pub bank_swift_code: Option<String>,
    pub payables_account_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::purchase_invoices::Entity")]
    PurchaseInvoices,
}

impl Related<super::purchase_invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseInvoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
