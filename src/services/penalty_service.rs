//! Penalty Service - admin deductions recorded through the ledger

use sea_orm::*;
use serde::Deserialize;

use crate::domain::DomainError;
use crate::models::penalty::{self, Entity as Penalty};
use crate::models::user::Entity as User;
use crate::models::PointKind;
use crate::services::ledger;
use crate::services::task_service::parse_date;

#[derive(Debug, Clone, Deserialize)]
pub struct PenaltyInput {
    pub user_id: String,
    pub point: i64,
    pub description: String,
    pub date: String,
}

/// Editable fields of an existing penalty; the penalized user is fixed.
#[derive(Debug, Clone, Deserialize)]
pub struct PenaltyUpdate {
    pub point: i64,
    pub description: String,
    pub date: String,
}

fn validate(point: i64, description: &str, date: &str) -> Result<(), DomainError> {
    if point < 0 {
        return Err(DomainError::validation("point cannot be negative"));
    }
    if description.trim().is_empty() {
        return Err(DomainError::validation("description is required"));
    }
    parse_date("date", date)?;
    Ok(())
}

/// Record a penalty and deduct `point` from both balances.
///
/// Fails with `InsufficientBalance` (and records nothing) when either
/// balance is lower than the penalty.
pub async fn create_penalty(
    db: &DatabaseConnection,
    input: PenaltyInput,
) -> Result<penalty::Model, DomainError> {
    validate(input.point, &input.description, &input.date)?;
    let description = input.description.trim().to_owned();

    let txn = db.begin().await?;

    User::find_by_id(input.user_id.clone())
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound("user"))?;

    ledger::apply_delta(
        &txn,
        &input.user_id,
        -input.point,
        PointKind::Penalty,
        &description,
    )
    .await?;

    let now = chrono::Utc::now().to_rfc3339();
    let created = penalty::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        user_id: Set(input.user_id),
        point: Set(input.point),
        description: Set(description),
        date: Set(input.date.trim().to_owned()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        "Penalty {} of {} points given to {}",
        created.id,
        created.point,
        created.user_id
    );
    Ok(created)
}

/// Change a penalty. The difference from the old amount is applied to the
/// user's balances, with its own history row.
pub async fn update_penalty(
    db: &DatabaseConnection,
    id: &str,
    input: PenaltyUpdate,
) -> Result<penalty::Model, DomainError> {
    validate(input.point, &input.description, &input.date)?;
    let description = input.description.trim().to_owned();

    let txn = db.begin().await?;

    let existing = Penalty::find_by_id(id.to_owned())
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound("penalty"))?;

    let delta = existing.point - input.point;
    if delta != 0 {
        let label = format!("Revised: {}", description);
        ledger::apply_delta(&txn, &existing.user_id, delta, PointKind::Penalty, &label).await?;
    }

    let mut active: penalty::ActiveModel = existing.into();
    active.point = Set(input.point);
    active.description = Set(description);
    active.date = Set(input.date.trim().to_owned());
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!("Penalty {} updated ({:+} points)", id, delta);
    Ok(updated)
}

/// Remove the record only. Deducted points are not given back.
pub async fn delete_penalty(db: &DatabaseConnection, id: &str) -> Result<(), DomainError> {
    let result = Penalty::delete_by_id(id.to_owned()).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound("penalty"));
    }
    tracing::info!("Penalty {} deleted", id);
    Ok(())
}

pub async fn list_penalties(db: &DatabaseConnection) -> Result<Vec<penalty::Model>, DomainError> {
    Ok(Penalty::find()
        .order_by_desc(penalty::Column::Date)
        .order_by_desc(penalty::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn get_penalty(db: &DatabaseConnection, id: &str) -> Result<penalty::Model, DomainError> {
    Penalty::find_by_id(id.to_owned())
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("penalty"))
}

pub async fn penalties_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<penalty::Model>, DomainError> {
    Ok(Penalty::find()
        .filter(penalty::Column::UserId.eq(user_id))
        .order_by_desc(penalty::Column::Date)
        .all(db)
        .await?)
}

/// Sum of all penalty points recorded for the user
pub async fn total_penalty(db: &DatabaseConnection, user_id: &str) -> Result<i64, DomainError> {
    let penalties = penalties_for_user(db, user_id).await?;
    Ok(penalties.iter().map(|p| p.point).sum())
}
