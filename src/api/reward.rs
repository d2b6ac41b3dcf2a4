use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{AdminClaims, Claims};
use crate::domain::{DomainError, RewardInput};
use crate::infrastructure::AppState;
use crate::models::ReviewStatus;
use crate::services::reward_service::{self, RedeemInput};

#[derive(Deserialize)]
pub struct ResolveRequest {
    status: ReviewStatus,
}

pub async fn list_rewards(
    State(state): State<AppState>,
    _claims: Claims,
) -> Result<Json<Value>, DomainError> {
    let rewards = reward_service::list_rewards(state.reward_repo.as_ref()).await?;
    Ok(Json(json!({ "rewards": rewards })))
}

pub async fn get_reward(
    State(state): State<AppState>,
    _claims: Claims,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    let reward = reward_service::get_reward(state.reward_repo.as_ref(), &id).await?;
    Ok(Json(json!({ "reward": reward })))
}

pub async fn create_reward(
    State(state): State<AppState>,
    _admin: AdminClaims,
    Json(payload): Json<RewardInput>,
) -> Result<Json<Value>, DomainError> {
    let reward = reward_service::create_reward(state.reward_repo.as_ref(), payload).await?;
    Ok(Json(json!({ "reward": reward })))
}

pub async fn update_reward(
    State(state): State<AppState>,
    _admin: AdminClaims,
    Path(id): Path<String>,
    Json(payload): Json<RewardInput>,
) -> Result<Json<Value>, DomainError> {
    let reward = reward_service::update_reward(state.reward_repo.as_ref(), &id, payload).await?;
    Ok(Json(json!({ "reward": reward })))
}

pub async fn delete_reward(
    State(state): State<AppState>,
    _admin: AdminClaims,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    reward_service::delete_reward(state.reward_repo.as_ref(), &id).await?;
    Ok(Json(json!({ "message": "reward deleted" })))
}

pub async fn redeem(
    State(state): State<AppState>,
    claims: Claims,
    Path(reward_id): Path<String>,
    Json(payload): Json<RedeemInput>,
) -> Result<Json<Value>, DomainError> {
    let request = reward_service::request_redemption(
        state.db(),
        claims.user_id(),
        &reward_id,
        payload.amount,
    )
    .await?;
    Ok(Json(json!({ "request": request })))
}

pub async fn list_requests(
    State(state): State<AppState>,
    _admin: AdminClaims,
) -> Result<Json<Value>, DomainError> {
    let requests = reward_service::list_requests(state.db(), None).await?;
    Ok(Json(json!({ "requests": requests })))
}

pub async fn my_requests(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Value>, DomainError> {
    let requests = reward_service::list_requests(state.db(), Some(claims.user_id())).await?;
    Ok(Json(json!({ "requests": requests })))
}

pub async fn get_request(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    let request = reward_service::get_request(state.db(), &id).await?;
    if !claims.is_admin() && request.user_id != claims.user_id() {
        return Err(DomainError::Forbidden("request belongs to another user".into()));
    }
    Ok(Json(json!({ "request": request })))
}

pub async fn resolve_request(
    State(state): State<AppState>,
    AdminClaims(admin): AdminClaims,
    Path(id): Path<String>,
    Json(payload): Json<ResolveRequest>,
) -> Result<Json<Value>, DomainError> {
    tracing::info!("Admin {} resolving reward request {}", admin.user_id(), id);
    let request = reward_service::resolve_redemption(state.db(), &id, payload.status).await?;
    Ok(Json(json!({ "request": request })))
}
