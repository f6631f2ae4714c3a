//! `SeaORM` Entity for purchase invoice lines.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(schema_name = "business", table_name = "purchase_invoice_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub line_number: i32,
    pub product_id: Option<Uuid>,
    pub account_id: Uuid,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((7, 4)))")]
    pub discount_percent: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub discount_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub line_subtotal: Decimal,
    pub tax_code: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub tax_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub line_total: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::purchase_invoices::Column::Id",
        on_delete = "Cascade"
    )]
    PurchaseInvoices,
}

impl Related<super::purchase_invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseInvoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
