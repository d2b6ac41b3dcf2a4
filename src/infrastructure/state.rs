//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{FileStorage, RewardRepository, TaskRepository};
use crate::infrastructure::storage::LocalFileStorage;
use crate::infrastructure::{SeaOrmRewardRepository, SeaOrmTaskRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection for the transactional services
    db: DatabaseConnection,
    /// Task catalog repository
    pub task_repo: Arc<dyn TaskRepository>,
    /// Reward catalog repository
    pub reward_repo: Arc<dyn RewardRepository>,
    /// Where claim images end up
    pub storage: Arc<dyn FileStorage>,
}

impl AppState {
    /// Create a new AppState storing uploads under `upload_dir`
    pub fn new(db: DatabaseConnection, upload_dir: &str) -> Self {
        Self::with_storage(db, Arc::new(LocalFileStorage::new(upload_dir)))
    }

    /// Create a new AppState with a caller-provided file storage
    pub fn with_storage(db: DatabaseConnection, storage: Arc<dyn FileStorage>) -> Self {
        let task_repo = Arc::new(SeaOrmTaskRepository::new(db.clone()));
        let reward_repo = Arc::new(SeaOrmRewardRepository::new(db.clone()));

        Self {
            db,
            task_repo,
            reward_repo,
            storage,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl AsRef<DatabaseConnection> for AppState {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.db
    }
}

// Lets handlers that only touch the database take State<DatabaseConnection>
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
