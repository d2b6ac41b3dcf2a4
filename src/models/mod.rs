pub mod enums;
pub mod penalty;
pub mod point_history;
pub mod religion_task;
pub mod reward;
pub mod reward_request;
pub mod task;
pub mod task_claim;
pub mod user;

pub use enums::{ClaimKind, PointKind, Religion, ReviewStatus, Role};
