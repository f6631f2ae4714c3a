//! `SeaORM` Entity for customers.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(schema_name = "business", table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub customer_code: String,
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
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub credit_limit: Option<Decimal>,
    pub currency_code: String,
    pub is_active: bool,
    pub receivables_account_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sales_invoices::Entity")]
    SalesInvoices,
}

impl Related<super::sales_invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalesInvoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
