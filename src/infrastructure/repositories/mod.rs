//! Repository implementations using SeaORM

pub mod reward_repository;
pub mod task_repository;

pub use reward_repository::SeaOrmRewardRepository;
pub use task_repository::SeaOrmTaskRepository;
