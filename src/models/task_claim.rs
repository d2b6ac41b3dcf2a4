use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::{ClaimKind, ReviewStatus};

/// A user's claim awaiting (or past) admin review.
///
/// Catalog claims (`task_upload`, `religion_upload`) reference a row in
/// `tasks` or `religion_tasks` through `task_id`; free-form claims
/// (`task_submission`, `religion_request`) carry `title` and `point` instead.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "task_claims")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: ClaimKind,
    pub user_id: String,
    pub task_id: Option<String>,
    pub title: Option<String>,
    pub point: Option<i64>,
    pub description: String,
    pub image: Option<String>,
    pub status: ReviewStatus,
    /// Reviewer note set with the status change.
    pub message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
