//! Repository trait definitions
//!
//! These traits define the contract for catalog data access.
//! Implementations live in the infrastructure layer. Balance and review
//! flows do not go through these traits: they run inside a single database
//! transaction in the services layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Task catalog entry for API responses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: String,
    pub admin_id: String,
    pub title: String,
    pub description: String,
    pub point: i64,
    pub message: Option<String>,
    pub status: String,
    pub start_date: String,
    pub end_date: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating or replacing a task
#[derive(Debug, Clone, Deserialize)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub point: i64,
    pub message: Option<String>,
    pub start_date: String,
    pub end_date: String,
}

/// Repository trait for the task catalog
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Find all tasks
    async fn find_all(&self) -> Result<Vec<Task>, DomainError>;

    /// Find a task by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Task>, DomainError>;

    /// Active tasks still open on `today` that the user has no live claim on.
    /// Rejected claims do not count as live.
    async fn find_available(&self, user_id: &str, today: &str)
    -> Result<Vec<Task>, DomainError>;

    /// Create a new task owned by `admin_id`
    async fn create(&self, admin_id: &str, input: TaskInput) -> Result<Task, DomainError>;

    /// Replace the editable fields of a task
    async fn update(&self, id: &str, input: TaskInput) -> Result<Task, DomainError>;

    /// Delete a task
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}

/// Reward catalog entry for API responses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reward {
    pub id: String,
    pub name: String,
    pub stock: i64,
    pub price: i64,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating or replacing a reward
#[derive(Debug, Clone, Deserialize)]
pub struct RewardInput {
    pub name: String,
    pub stock: i64,
    pub price: i64,
    pub image: Option<String>,
}

/// Repository trait for the reward catalog
#[async_trait]
pub trait RewardRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Reward>, DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Reward>, DomainError>;

    async fn create(&self, input: RewardInput) -> Result<Reward, DomainError>;

    /// Replace the editable fields; a `None` image keeps the stored one
    async fn update(&self, id: &str, input: RewardInput) -> Result<Reward, DomainError>;

    /// Delete a reward. Fails with `Conflict` while it has pending requests.
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}
