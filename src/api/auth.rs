use axum::{extract::State, Json};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::Claims;
use crate::domain::DomainError;
use crate::services::user_service::{self, RegisterInput};

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

pub async fn register(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<RegisterInput>,
) -> Result<Json<Value>, DomainError> {
    let user = user_service::register(&db, payload).await?;
    Ok(Json(json!({ "message": "registered", "user": user })))
}

pub async fn login(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, DomainError> {
    tracing::info!("Login attempt for {}", payload.email);
    let result = user_service::login(&db, &payload.email, &payload.password).await?;
    Ok(Json(json!({ "token": result.token, "user": result.user })))
}

pub async fn get_me(
    State(db): State<DatabaseConnection>,
    claims: Claims,
) -> Result<Json<Value>, DomainError> {
    let user = user_service::get_user(&db, claims.user_id()).await?;
    Ok(Json(json!({ "user": user })))
}
