use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::{Religion, Role};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub religion: Option<Religion>,
    pub address: Option<String>,
    pub school: Option<String>,
    pub class: Option<String>,
    pub image: Option<String>,
    /// Redeemable balance, cleared by the monthly reset.
    pub point: i64,
    /// Cumulative score, cleared by the annual reset. Reward redemptions
    /// are paid from this balance.
    pub total_point: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::point_history::Entity")]
    PointHistory,
    #[sea_orm(has_many = "super::task_claim::Entity")]
    TaskClaim,
    #[sea_orm(has_many = "super::penalty::Entity")]
    Penalty,
}

impl Related<super::point_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PointHistory.def()
    }
}

impl Related<super::task_claim::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskClaim.def()
    }
}

impl Related<super::penalty::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Penalty.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
