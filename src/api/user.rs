use axum::{
    extract::{Path, State},
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{AdminClaims, Claims};
use crate::domain::DomainError;
use crate::services::ledger;
use crate::services::user_service::{self, ProfileUpdate};

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

pub async fn list_users(
    State(db): State<DatabaseConnection>,
    _admin: AdminClaims,
) -> Result<Json<Value>, DomainError> {
    let users = user_service::list_users(&db).await?;
    Ok(Json(json!({ "users": users })))
}

pub async fn get_user(
    State(db): State<DatabaseConnection>,
    _admin: AdminClaims,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    let user = user_service::get_user(&db, &id).await?;
    Ok(Json(json!({ "user": user })))
}

pub async fn delete_user(
    State(db): State<DatabaseConnection>,
    _admin: AdminClaims,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    user_service::delete_user(&db, &id).await?;
    Ok(Json(json!({ "message": "user deleted" })))
}

pub async fn update_me(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<Value>, DomainError> {
    let user = user_service::update_profile(&db, claims.user_id(), payload).await?;
    Ok(Json(json!({ "user": user })))
}

pub async fn change_password(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, DomainError> {
    user_service::change_password(
        &db,
        claims.user_id(),
        &payload.current_password,
        &payload.new_password,
    )
    .await?;
    Ok(Json(json!({ "message": "password updated" })))
}

pub async fn rank(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
) -> Result<Json<Value>, DomainError> {
    let ranking = user_service::rank_users(&db).await?;
    Ok(Json(json!({ "ranking": ranking })))
}

pub async fn my_point_history(
    State(db): State<DatabaseConnection>,
    claims: Claims,
) -> Result<Json<Value>, DomainError> {
    let history = ledger::history_for_user(&db, claims.user_id()).await?;
    Ok(Json(json!({ "history": history })))
}

pub async fn list_point_history(
    State(db): State<DatabaseConnection>,
    _admin: AdminClaims,
) -> Result<Json<Value>, DomainError> {
    let history = ledger::all_history(&db).await?;
    Ok(Json(json!({ "history": history })))
}

pub async fn user_point_history(
    State(db): State<DatabaseConnection>,
    _admin: AdminClaims,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    let history = ledger::history_for_user(&db, &id).await?;
    Ok(Json(json!({ "history": history })))
}

pub async fn get_point_history(
    State(db): State<DatabaseConnection>,
    _admin: AdminClaims,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    let entry = ledger::find_history(&db, &id).await?;
    Ok(Json(json!({ "history": entry })))
}

pub async fn monthly_reset(
    State(db): State<DatabaseConnection>,
    AdminClaims(admin): AdminClaims,
) -> Result<Json<Value>, DomainError> {
    tracing::info!("Monthly reset requested by {}", admin.user_id());
    let users = ledger::monthly_reset(&db).await?;
    Ok(Json(json!({ "message": "monthly points reset", "users": users })))
}

pub async fn annual_reset(
    State(db): State<DatabaseConnection>,
    AdminClaims(admin): AdminClaims,
) -> Result<Json<Value>, DomainError> {
    tracing::info!("Annual reset requested by {}", admin.user_id());
    let users = ledger::annual_reset(&db).await?;
    Ok(Json(json!({ "message": "total points reset", "users": users })))
}
