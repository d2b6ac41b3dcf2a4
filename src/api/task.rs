use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Local;
use serde_json::{json, Value};

use crate::auth::{AdminClaims, Claims};
use crate::domain::{DomainError, TaskInput};
use crate::infrastructure::AppState;
use crate::services::task_service;

pub async fn list_tasks(
    State(state): State<AppState>,
    _claims: Claims,
) -> Result<Json<Value>, DomainError> {
    let tasks = task_service::list_tasks(state.task_repo.as_ref()).await?;
    Ok(Json(json!({ "tasks": tasks })))
}

pub async fn available_tasks(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Value>, DomainError> {
    let today = Local::now().date_naive();
    let tasks =
        task_service::available_tasks(state.task_repo.as_ref(), claims.user_id(), today).await?;
    Ok(Json(json!({ "tasks": tasks })))
}

pub async fn get_task(
    State(state): State<AppState>,
    _claims: Claims,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    let task = task_service::get_task(state.task_repo.as_ref(), &id).await?;
    Ok(Json(json!({ "task": task })))
}

pub async fn create_task(
    State(state): State<AppState>,
    AdminClaims(admin): AdminClaims,
    Json(payload): Json<TaskInput>,
) -> Result<Json<Value>, DomainError> {
    let today = Local::now().date_naive();
    let task =
        task_service::create_task(state.task_repo.as_ref(), admin.user_id(), payload, today)
            .await?;
    Ok(Json(json!({ "task": task })))
}

pub async fn update_task(
    State(state): State<AppState>,
    _admin: AdminClaims,
    Path(id): Path<String>,
    Json(payload): Json<TaskInput>,
) -> Result<Json<Value>, DomainError> {
    let today = Local::now().date_naive();
    let task = task_service::update_task(state.task_repo.as_ref(), &id, payload, today).await?;
    Ok(Json(json!({ "task": task })))
}

pub async fn delete_task(
    State(state): State<AppState>,
    _admin: AdminClaims,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    task_service::delete_task(state.task_repo.as_ref(), &id).await?;
    Ok(Json(json!({ "message": "task deleted" })))
}
