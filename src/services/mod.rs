//! Services Layer
//!
//! Business logic kept out of the HTTP handlers. Flows that move points run
//! inside one database transaction and go through `ledger`.

pub mod claim_service;
pub mod ledger;
pub mod penalty_service;
pub mod religion_task_service;
pub mod review_service;
pub mod reward_service;
pub mod task_service;
pub mod user_service;

pub use review_service::{ReviewDecision, check_transition, set_claim_status};
