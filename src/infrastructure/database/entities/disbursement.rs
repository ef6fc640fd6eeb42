//! Disbursement entity for database

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense classification
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum Classification {
    #[sea_orm(string_value = "PS")]
    PS,
    #[sea_orm(string_value = "MOOE")]
    MOOE,
    #[sea_orm(string_value = "CO")]
    CO,
    #[sea_orm(string_value = "TR")]
    TR,
}

/// Disbursement model. Amounts are centavos.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "disbursements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub payee: String,
    pub amount_centavos: i64,
    pub disbursement_date: NaiveDate,
    pub fund_source: String,
    pub classification: Classification,
    pub description: String,
    #[sea_orm(unique)]
    pub reference_number: String,
    pub department: String,
    pub encoded_by: String,
    pub encoded_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_archived: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
