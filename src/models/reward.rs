use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rewards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub stock: i64,
    /// Unit price in points.
    pub price: i64,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reward_request::Entity")]
    RewardRequest,
}

impl Related<super::reward_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RewardRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
