//! `SeaORM` Entity for customer and vendor payments.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PaymentMethod, PaymentStatus, PaymentType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(schema_name = "business", table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub payment_no: String,
    pub payment_type: PaymentType,
    pub payment_method: PaymentMethod,
    pub payment_date: Date,
    /// Customer or vendor, depending on `payment_type`.
    pub entity_id: Uuid,
    pub bank_account_id: Uuid,
    pub currency_code: String,
    #[sea_orm(column_type = "Decimal(Some((19, 8)))")]
    pub exchange_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub status: PaymentStatus,
    pub journal_entry_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payment_allocations::Entity")]
    PaymentAllocations,
}

impl Related<super::payment_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
