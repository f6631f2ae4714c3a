//! `SeaORM` Entity for GST F5 returns.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::GstReturnStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(schema_name = "accounting", table_name = "gst_returns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub return_period: String,
    pub start_date: Date,
    pub end_date: Date,
    pub filing_due_date: Date,
    /// Box 1.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub standard_rated_supplies: Decimal,
    /// Box 2.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub zero_rated_supplies: Decimal,
    /// Box 3.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub exempt_supplies: Decimal,
    /// Box 4.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_supplies: Decimal,
    /// Box 5.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub taxable_purchases: Decimal,
    /// Box 6.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub output_tax: Decimal,
    /// Box 7.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub input_tax: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub tax_adjustments: Decimal,
    /// Box 8.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub tax_payable: Decimal,
    pub status: GstReturnStatus,
    pub submission_date: Option<Date>,
    pub submission_reference: Option<String>,
    pub journal_entry_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
