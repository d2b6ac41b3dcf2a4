pub mod auth;
pub mod claim;
pub mod error;
pub mod health;
pub mod penalty;
pub mod religion;
pub mod reward;
pub mod task;
pub mod user;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::domain::MAX_IMAGE_BYTES;
use crate::infrastructure::AppState;

/// Multipart overhead allowed on top of the largest accepted image
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::get_me))
        // Users
        .route("/users", get(user::list_users))
        .route("/users/rank", get(user::rank))
        .route("/users/me", put(user::update_me))
        .route("/users/me/password", put(user::change_password))
        .route("/users/me/point-history", get(user::my_point_history))
        .route("/users/:id", get(user::get_user).delete(user::delete_user))
        .route("/users/:id/point-history", get(user::user_point_history))
        .route("/users/:id/penalties", get(penalty::user_penalties))
        .route("/point-history", get(user::list_point_history))
        .route("/point-history/:id", get(user::get_point_history))
        .route("/admin/reset/monthly", post(user::monthly_reset))
        .route("/admin/reset/annual", post(user::annual_reset))
        // Task catalog
        .route("/tasks", get(task::list_tasks).post(task::create_task))
        .route("/tasks/available", get(task::available_tasks))
        .route(
            "/tasks/:id",
            get(task::get_task)
                .put(task::update_task)
                .delete(task::delete_task),
        )
        .route("/tasks/:id/claims", post(claim::upload_task))
        .route("/submissions", post(claim::submit_task))
        // Religion tasks
        .route(
            "/religion-tasks",
            get(religion::list_religion_tasks).post(religion::create_religion_task),
        )
        .route(
            "/religion-tasks/available",
            get(religion::available_religion_tasks),
        )
        .route(
            "/religion-tasks/:id",
            get(religion::get_religion_task)
                .put(religion::update_religion_task)
                .delete(religion::delete_religion_task),
        )
        .route(
            "/religion-tasks/:id/claims",
            post(claim::upload_religion_task),
        )
        .route("/religion-requests", post(claim::request_religion_task))
        // Claims review
        .route("/claims", get(claim::list_claims))
        .route("/claims/mine", get(claim::my_claims))
        .route("/claims/cleared-count", get(claim::cleared_count))
        .route("/claims/:id", get(claim::get_claim))
        .route("/claims/:id/status", put(claim::review_claim))
        // Rewards
        .route("/rewards", get(reward::list_rewards).post(reward::create_reward))
        .route(
            "/rewards/:id",
            get(reward::get_reward)
                .put(reward::update_reward)
                .delete(reward::delete_reward),
        )
        .route("/rewards/:id/redeem", post(reward::redeem))
        .route("/reward-requests", get(reward::list_requests))
        .route("/reward-requests/mine", get(reward::my_requests))
        .route("/reward-requests/:id", get(reward::get_request))
        .route("/reward-requests/:id/status", put(reward::resolve_request))
        // Penalties
        .route(
            "/penalties",
            get(penalty::list_penalties).post(penalty::create_penalty),
        )
        .route("/penalties/mine", get(penalty::my_penalties))
        .route(
            "/penalties/:id",
            get(penalty::get_penalty)
                .put(penalty::update_penalty)
                .delete(penalty::delete_penalty),
        )
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + FORM_OVERHEAD_BYTES))
        .with_state(state)
}
