use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Local;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};

use crate::auth::{AdminClaims, Claims};
use crate::domain::DomainError;
use crate::services::religion_task_service::{self, CreateReligionTask, ReligionTaskInput};
use crate::services::user_service;

pub async fn list_religion_tasks(
    State(db): State<DatabaseConnection>,
    _admin: AdminClaims,
) -> Result<Json<Value>, DomainError> {
    let tasks = religion_task_service::list_religion_tasks(&db).await?;
    Ok(Json(json!({ "tasks": tasks })))
}

/// Open religion tasks for the caller's religion
pub async fn available_religion_tasks(
    State(db): State<DatabaseConnection>,
    claims: Claims,
) -> Result<Json<Value>, DomainError> {
    // The stored profile wins over the token, which may predate an update
    let user = user_service::get_user(&db, claims.user_id()).await?;
    let Some(religion) = user.religion else {
        return Ok(Json(json!({ "tasks": [] })));
    };

    let today = Local::now().date_naive();
    let tasks =
        religion_task_service::available_religion_tasks(&db, &user.id, religion, today).await?;
    Ok(Json(json!({ "tasks": tasks })))
}

pub async fn get_religion_task(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    let task = religion_task_service::get_religion_task(&db, &id).await?;
    Ok(Json(json!({ "task": task })))
}

pub async fn create_religion_task(
    State(db): State<DatabaseConnection>,
    _admin: AdminClaims,
    Json(payload): Json<CreateReligionTask>,
) -> Result<Json<Value>, DomainError> {
    let today = Local::now().date_naive();
    let tasks = religion_task_service::create_religion_task(&db, payload, today).await?;
    Ok(Json(json!({ "tasks": tasks })))
}

pub async fn update_religion_task(
    State(db): State<DatabaseConnection>,
    _admin: AdminClaims,
    Path(id): Path<String>,
    Json(payload): Json<ReligionTaskInput>,
) -> Result<Json<Value>, DomainError> {
    let today = Local::now().date_naive();
    let task = religion_task_service::update_religion_task(&db, &id, payload, today).await?;
    Ok(Json(json!({ "task": task })))
}

pub async fn delete_religion_task(
    State(db): State<DatabaseConnection>,
    _admin: AdminClaims,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    religion_task_service::delete_religion_task(&db, &id).await?;
    Ok(Json(json!({ "message": "religion task deleted" })))
}
