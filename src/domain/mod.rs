//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM entities, no Axum).
//! Only trait definitions and domain error types.

pub mod errors;
pub mod repositories;
pub mod storage;

pub use errors::DomainError;
pub use repositories::*;
pub use storage::{FileStorage, ImageUpload, MAX_IMAGE_BYTES, ensure_image_size};
