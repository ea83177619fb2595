//! `SeaORM` Entity for glm_periods table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "glm_periods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub ledger_number: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub year: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub account_code: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub cost_centre_code: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub period_number: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub closing_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub closing_foreign: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ledgers::Entity",
        from = "Column::LedgerNumber",
        to = "super::ledgers::Column::Number"
    )]
    Ledgers,
}

impl Related<super::ledgers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ledgers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
