use axum::{
    extract::{Path, State},
    Json,
};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};

use crate::auth::{AdminClaims, Claims};
use crate::domain::DomainError;
use crate::services::penalty_service::{self, PenaltyInput, PenaltyUpdate};

pub async fn create_penalty(
    State(db): State<DatabaseConnection>,
    AdminClaims(admin): AdminClaims,
    Json(payload): Json<PenaltyInput>,
) -> Result<Json<Value>, DomainError> {
    tracing::info!("Admin {} penalizing {}", admin.user_id(), payload.user_id);
    let penalty = penalty_service::create_penalty(&db, payload).await?;
    Ok(Json(json!({ "penalty": penalty })))
}

pub async fn update_penalty(
    State(db): State<DatabaseConnection>,
    _admin: AdminClaims,
    Path(id): Path<String>,
    Json(payload): Json<PenaltyUpdate>,
) -> Result<Json<Value>, DomainError> {
    let penalty = penalty_service::update_penalty(&db, &id, payload).await?;
    Ok(Json(json!({ "penalty": penalty })))
}

pub async fn delete_penalty(
    State(db): State<DatabaseConnection>,
    _admin: AdminClaims,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    penalty_service::delete_penalty(&db, &id).await?;
    Ok(Json(json!({ "message": "penalty deleted" })))
}

pub async fn list_penalties(
    State(db): State<DatabaseConnection>,
    _admin: AdminClaims,
) -> Result<Json<Value>, DomainError> {
    let penalties = penalty_service::list_penalties(&db).await?;
    Ok(Json(json!({ "penalties": penalties })))
}

pub async fn get_penalty(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    let penalty = penalty_service::get_penalty(&db, &id).await?;
    if !claims.is_admin() && penalty.user_id != claims.user_id() {
        return Err(DomainError::Forbidden("penalty belongs to another user".into()));
    }
    Ok(Json(json!({ "penalty": penalty })))
}

pub async fn my_penalties(
    State(db): State<DatabaseConnection>,
    claims: Claims,
) -> Result<Json<Value>, DomainError> {
    let penalties = penalty_service::penalties_for_user(&db, claims.user_id()).await?;
    let total = penalty_service::total_penalty(&db, claims.user_id()).await?;
    Ok(Json(json!({ "penalties": penalties, "total": total })))
}

pub async fn user_penalties(
    State(db): State<DatabaseConnection>,
    _admin: AdminClaims,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    let penalties = penalty_service::penalties_for_user(&db, &user_id).await?;
    let total = penalty_service::total_penalty(&db, &user_id).await?;
    Ok(Json(json!({ "penalties": penalties, "total": total })))
}
