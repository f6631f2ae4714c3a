//! `SeaORM` Entity for the singleton `core.company_settings` row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Primary key of the only settings row.
pub const SETTINGS_ROW_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(schema_name = "core", table_name = "company_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub company_name: String,
    pub legal_name: Option<String>,
    pub uen_no: Option<String>,
    pub gst_registration_no: Option<String>,
    pub gst_registered: bool,
    pub base_currency: String,
    pub fiscal_year_start_month: i16,
    pub fiscal_year_start_day: i16,
    pub date_format: String,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
