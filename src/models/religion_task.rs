use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::Religion;

/// Religion-scoped task. `(religion, title, start_date)` is unique, which is
/// what keeps the recurring generator from materializing a day twice.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "religion_tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub religion: Religion,
    pub point: i64,
    #[sea_orm(default_value = "Active")]
    pub status: String, // 'Active', 'Inactive'
    pub start_date: String,
    pub end_date: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
