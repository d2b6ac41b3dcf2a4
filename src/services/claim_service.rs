//! Claim intake - users filing proof of work for admin review.
//!
//! Four shapes share one table: uploads against a catalog task or religion
//! task, and free-form submissions that carry their own title and points.
//! Every new claim starts in `Perlu Review`; resolution lives in
//! `review_service`.

use sea_orm::*;
use serde::Deserialize;

use crate::domain::{ensure_image_size, DomainError, FileStorage, ImageUpload};
use crate::models::task_claim::{self, Entity as TaskClaim};
use crate::models::{religion_task, task, user, ClaimKind, ReviewStatus};

/// Free-form claim body (task submission or religion request)
#[derive(Debug, Clone, Deserialize)]
pub struct FreeFormClaim {
    pub title: String,
    pub description: String,
    pub point: i64,
}

/// Filter parameters for listing claims
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ClaimFilter {
    pub kind: Option<ClaimKind>,
    pub user_id: Option<String>,
    pub status: Option<ReviewStatus>,
}

struct NewClaim {
    kind: ClaimKind,
    user_id: String,
    task_id: Option<String>,
    title: Option<String>,
    point: Option<i64>,
    description: String,
}

fn require_description(description: &str) -> Result<String, DomainError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(DomainError::validation("description is required"));
    }
    Ok(description.to_owned())
}

fn validate_free_form(claim: &FreeFormClaim) -> Result<(), DomainError> {
    if claim.title.trim().is_empty() {
        return Err(DomainError::validation("title is required"));
    }
    if claim.point <= 0 {
        return Err(DomainError::validation("point must be greater than zero"));
    }
    Ok(())
}

/// Fail when the user still holds a pending or accepted claim on `task_id`.
async fn ensure_not_claimed(
    db: &DatabaseConnection,
    user_id: &str,
    kind: ClaimKind,
    task_id: &str,
) -> Result<(), DomainError> {
    let live = TaskClaim::find()
        .filter(task_claim::Column::UserId.eq(user_id))
        .filter(task_claim::Column::Kind.eq(kind))
        .filter(task_claim::Column::TaskId.eq(task_id))
        .filter(task_claim::Column::Status.ne(ReviewStatus::Rejected))
        .one(db)
        .await?;

    if let Some(existing) = live {
        return Err(DomainError::AlreadyClaimed(format!(
            "claim {} is {}",
            existing.id, existing.status
        )));
    }
    Ok(())
}

/// Store the image, then insert the claim. The stored file is removed again
/// when the insert fails.
async fn file_claim(
    db: &DatabaseConnection,
    storage: &dyn FileStorage,
    claim: NewClaim,
    image: Option<ImageUpload>,
) -> Result<task_claim::Model, DomainError> {
    let image = match image {
        Some(image) => Some(storage.store(&image.file_name, &image.bytes).await?),
        None => None,
    };

    match insert_claim(db, claim, image.clone()).await {
        Ok(created) => Ok(created),
        Err(e) => {
            if let Some(reference) = image {
                if let Err(cleanup) = storage.remove(&reference).await {
                    tracing::warn!("Could not remove orphaned upload {}: {}", reference, cleanup);
                }
            }
            Err(e)
        }
    }
}

async fn insert_claim(
    db: &DatabaseConnection,
    claim: NewClaim,
    image: Option<String>,
) -> Result<task_claim::Model, DomainError> {
    let task_id = claim.task_id.clone();
    let now = chrono::Utc::now().to_rfc3339();
    let model = task_claim::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        kind: Set(claim.kind),
        user_id: Set(claim.user_id),
        task_id: Set(claim.task_id),
        title: Set(claim.title),
        point: Set(claim.point),
        description: Set(claim.description),
        image: Set(image),
        status: Set(ReviewStatus::Pending),
        message: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    };

    // The live-claim index catches uploads that raced past `ensure_not_claimed`
    let created = model.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::AlreadyClaimed(format!(
            "task {} already has a live claim",
            task_id.unwrap_or_default()
        )),
        _ => e.into(),
    })?;
    tracing::info!(
        "Claim {} ({:?}) filed by {}",
        created.id,
        created.kind,
        created.user_id
    );
    Ok(created)
}

/// File proof for a catalog task
pub async fn upload_task(
    db: &DatabaseConnection,
    storage: &dyn FileStorage,
    user_id: &str,
    task_id: &str,
    description: &str,
    image: Option<ImageUpload>,
) -> Result<task_claim::Model, DomainError> {
    let description = require_description(description)?;
    if let Some(image) = &image {
        ensure_image_size(&image.bytes)?;
    }

    task::Entity::find_by_id(task_id.to_owned())
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("task"))?;
    ensure_not_claimed(db, user_id, ClaimKind::TaskUpload, task_id).await?;

    file_claim(
        db,
        storage,
        NewClaim {
            kind: ClaimKind::TaskUpload,
            user_id: user_id.to_owned(),
            task_id: Some(task_id.to_owned()),
            title: None,
            point: None,
            description,
        },
        image,
    )
    .await
}

/// File a self-reported task with its own point value
pub async fn submit_task(
    db: &DatabaseConnection,
    storage: &dyn FileStorage,
    user_id: &str,
    claim: FreeFormClaim,
    image: Option<ImageUpload>,
) -> Result<task_claim::Model, DomainError> {
    submit_free_form(db, storage, ClaimKind::TaskSubmission, user_id, claim, image).await
}

/// File proof for a religion task. The task must belong to the user's religion.
pub async fn upload_religion_task(
    db: &DatabaseConnection,
    storage: &dyn FileStorage,
    user_id: &str,
    religion_task_id: &str,
    description: &str,
    image: Option<ImageUpload>,
) -> Result<task_claim::Model, DomainError> {
    let description = require_description(description)?;
    if let Some(image) = &image {
        ensure_image_size(&image.bytes)?;
    }

    let religion_task = religion_task::Entity::find_by_id(religion_task_id.to_owned())
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("religion task"))?;
    let user = user::Entity::find_by_id(user_id.to_owned())
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("user"))?;

    if user.religion != Some(religion_task.religion) {
        return Err(DomainError::Forbidden(format!(
            "this task is only for {}",
            religion_task.religion
        )));
    }
    ensure_not_claimed(db, user_id, ClaimKind::ReligionUpload, religion_task_id).await?;

    file_claim(
        db,
        storage,
        NewClaim {
            kind: ClaimKind::ReligionUpload,
            user_id: user_id.to_owned(),
            task_id: Some(religion_task_id.to_owned()),
            title: None,
            point: None,
            description,
        },
        image,
    )
    .await
}

/// File a self-reported religious activity with its own point value
pub async fn request_religion_task(
    db: &DatabaseConnection,
    storage: &dyn FileStorage,
    user_id: &str,
    claim: FreeFormClaim,
    image: Option<ImageUpload>,
) -> Result<task_claim::Model, DomainError> {
    submit_free_form(db, storage, ClaimKind::ReligionRequest, user_id, claim, image).await
}

async fn submit_free_form(
    db: &DatabaseConnection,
    storage: &dyn FileStorage,
    kind: ClaimKind,
    user_id: &str,
    claim: FreeFormClaim,
    image: Option<ImageUpload>,
) -> Result<task_claim::Model, DomainError> {
    validate_free_form(&claim)?;
    let description = require_description(&claim.description)?;
    if let Some(image) = &image {
        ensure_image_size(&image.bytes)?;
    }

    user::Entity::find_by_id(user_id.to_owned())
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("user"))?;

    file_claim(
        db,
        storage,
        NewClaim {
            kind,
            user_id: user_id.to_owned(),
            task_id: None,
            title: Some(claim.title.trim().to_owned()),
            point: Some(claim.point),
            description,
        },
        image,
    )
    .await
}

/// List claims matching the filter, newest first
pub async fn list_claims(
    db: &DatabaseConnection,
    filter: ClaimFilter,
) -> Result<Vec<task_claim::Model>, DomainError> {
    let mut condition = Condition::all();

    if let Some(kind) = filter.kind {
        condition = condition.add(task_claim::Column::Kind.eq(kind));
    }

    if let Some(user_id) = filter.user_id {
        condition = condition.add(task_claim::Column::UserId.eq(user_id));
    }

    if let Some(status) = filter.status {
        condition = condition.add(task_claim::Column::Status.eq(status));
    }

    Ok(TaskClaim::find()
        .filter(condition)
        .order_by_desc(task_claim::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn get_claim(
    db: &DatabaseConnection,
    id: &str,
) -> Result<task_claim::Model, DomainError> {
    TaskClaim::find_by_id(id.to_owned())
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("claim"))
}

/// Number of accepted claims of any kind for the user
pub async fn count_cleared(db: &DatabaseConnection, user_id: &str) -> Result<u64, DomainError> {
    Ok(TaskClaim::find()
        .filter(task_claim::Column::UserId.eq(user_id))
        .filter(task_claim::Column::Status.eq(ReviewStatus::Accepted))
        .count(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_form_needs_title_and_positive_point() {
        let mut claim = FreeFormClaim {
            title: "Bantu ibu".into(),
            description: "Mencuci piring".into(),
            point: 50,
        };
        assert!(validate_free_form(&claim).is_ok());

        claim.point = 0;
        assert!(validate_free_form(&claim).is_err());

        claim.point = 50;
        claim.title = "  ".into();
        assert!(validate_free_form(&claim).is_err());
    }

    #[test]
    fn test_description_is_trimmed_and_required() {
        assert_eq!(require_description("  selesai ").unwrap(), "selesai");
        assert!(require_description("\n").is_err());
    }
}
