//! Reward Service - catalog validation and the redemption flow
//!
//! Redemption is a two-step escrow: requesting a reward debits
//! `total_point` right away and leaves a pending request; the admin then
//! accepts (history row, no balance change) or rejects (refund). `point`
//! is never touched by rewards.

use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::Deserialize;

use crate::domain::{DomainError, Reward, RewardInput, RewardRepository};
use crate::models::reward::Entity as RewardEntity;
use crate::models::reward_request::{self, Entity as RewardRequest};
use crate::models::user::Entity as User;
use crate::models::{PointKind, ReviewStatus};
use crate::services::ledger::{self, BalanceScope};

/// Body of a redemption request
#[derive(Debug, Clone, Deserialize)]
pub struct RedeemInput {
    pub amount: i64,
}

pub fn validate_reward(input: &RewardInput) -> Result<(), DomainError> {
    if input.name.trim().is_empty() {
        return Err(DomainError::validation("name is required"));
    }
    if input.price < 0 {
        return Err(DomainError::validation("price cannot be negative"));
    }
    if input.stock < 0 {
        return Err(DomainError::validation("stock cannot be negative"));
    }
    Ok(())
}

pub async fn list_rewards(repo: &dyn RewardRepository) -> Result<Vec<Reward>, DomainError> {
    repo.find_all().await
}

pub async fn get_reward(repo: &dyn RewardRepository, id: &str) -> Result<Reward, DomainError> {
    repo.find_by_id(id).await?.ok_or(DomainError::NotFound("reward"))
}

pub async fn create_reward(
    repo: &dyn RewardRepository,
    input: RewardInput,
) -> Result<Reward, DomainError> {
    validate_reward(&input)?;
    let reward = repo
        .create(RewardInput {
            name: input.name.trim().to_owned(),
            ..input
        })
        .await?;
    tracing::info!("Reward {} '{}' created", reward.id, reward.name);
    Ok(reward)
}

pub async fn update_reward(
    repo: &dyn RewardRepository,
    id: &str,
    input: RewardInput,
) -> Result<Reward, DomainError> {
    validate_reward(&input)?;
    let reward = repo
        .update(
            id,
            RewardInput {
                name: input.name.trim().to_owned(),
                ..input
            },
        )
        .await?;
    tracing::info!("Reward {} updated", reward.id);
    Ok(reward)
}

/// Remove a reward from the catalog. Resolved requests keep their rows.
pub async fn delete_reward(repo: &dyn RewardRepository, id: &str) -> Result<(), DomainError> {
    repo.delete(id).await?;
    tracing::info!("Reward {} deleted", id);
    Ok(())
}

/// Ask to exchange `amount` units of a reward. The full price is taken
/// from `total_point` immediately and held until an admin decides.
pub async fn request_redemption(
    db: &DatabaseConnection,
    user_id: &str,
    reward_id: &str,
    amount: i64,
) -> Result<reward_request::Model, DomainError> {
    if amount < 1 {
        return Err(DomainError::validation("amount must be at least 1"));
    }

    let txn = db.begin().await?;

    let reward = RewardEntity::find_by_id(reward_id.to_owned())
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound("reward"))?;

    if reward.stock < 1 {
        return Err(DomainError::OutOfStock);
    }

    let total_price = reward
        .price
        .checked_mul(amount)
        .ok_or_else(|| DomainError::validation("amount is too large"))?;

    let user = User::find_by_id(user_id.to_owned())
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound("user"))?;

    if user.total_point < total_price {
        return Err(DomainError::InsufficientBalance {
            required: total_price,
            available: user.total_point,
        });
    }

    // Guarded again in the UPDATE in case another debit landed in between
    ledger::adjust_balance(&txn, user_id, -total_price, BalanceScope::TotalOnly).await?;

    let now = chrono::Utc::now().to_rfc3339();
    let request = reward_request::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        reward_id: Set(reward.id.clone()),
        user_id: Set(user_id.to_owned()),
        price: Set(reward.price),
        amount: Set(amount),
        total_price: Set(total_price),
        status: Set(ReviewStatus::Pending),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        "User {} requested {} x '{}' for {} points",
        user_id,
        amount,
        reward.name,
        total_price
    );
    Ok(request)
}

/// Accept or reject a pending redemption.
///
/// Rejection refunds `total_price` to `total_point`. Acceptance keeps the
/// debit and appends a `Reward` history row of `-total_price`.
pub async fn resolve_redemption(
    db: &DatabaseConnection,
    request_id: &str,
    decision: ReviewStatus,
) -> Result<reward_request::Model, DomainError> {
    let txn = db.begin().await?;

    let request = RewardRequest::find_by_id(request_id.to_owned())
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound("reward request"))?;

    if request.status.is_terminal() {
        return Err(DomainError::AlreadyResolved(request.status.to_string()));
    }
    if decision == ReviewStatus::Pending {
        return Err(DomainError::validation(
            "status must be either Diterima or Ditolak",
        ));
    }

    let reward = RewardEntity::find_by_id(request.reward_id.clone())
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound("reward"))?;

    if reward.stock < 1 {
        return Err(DomainError::OutOfStock);
    }

    let result = RewardRequest::update_many()
        .col_expr(reward_request::Column::Status, Expr::value(decision.to_value()))
        .col_expr(
            reward_request::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().to_rfc3339()),
        )
        .filter(reward_request::Column::Id.eq(request_id))
        .filter(reward_request::Column::Status.eq(ReviewStatus::Pending))
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        tracing::warn!("Reward request {} was resolved concurrently", request_id);
        return Err(DomainError::AlreadyResolved(request.status.to_string()));
    }

    match decision {
        ReviewStatus::Rejected => {
            ledger::adjust_balance(
                &txn,
                &request.user_id,
                request.total_price,
                BalanceScope::TotalOnly,
            )
            .await?;
        }
        _ => {
            let label = format!("Change {} {}", request.amount, reward.name);
            ledger::record_history(
                &txn,
                &request.user_id,
                PointKind::Reward,
                &label,
                -request.total_price,
            )
            .await?;
        }
    }

    let updated = RewardRequest::find_by_id(request_id.to_owned())
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound("reward request"))?;

    txn.commit().await?;

    tracing::info!(
        "Reward request {} set to {} ({} points, user {})",
        request_id,
        decision,
        request.total_price,
        request.user_id
    );
    Ok(updated)
}

/// Redemption requests, optionally for one user, newest first
pub async fn list_requests(
    db: &DatabaseConnection,
    user_id: Option<&str>,
) -> Result<Vec<reward_request::Model>, DomainError> {
    let mut query = RewardRequest::find();
    if let Some(user_id) = user_id {
        query = query.filter(reward_request::Column::UserId.eq(user_id));
    }
    Ok(query
        .order_by_desc(reward_request::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn get_request(
    db: &DatabaseConnection,
    id: &str,
) -> Result<reward_request::Model, DomainError> {
    RewardRequest::find_by_id(id.to_owned())
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("reward request"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, stock: i64, price: i64) -> RewardInput {
        RewardInput {
            name: name.to_owned(),
            stock,
            price,
            image: None,
        }
    }

    #[test]
    fn test_validate_reward() {
        assert!(validate_reward(&input("Pulpen", 10, 200)).is_ok());
        assert!(validate_reward(&input("Gratis", 0, 0)).is_ok());
        assert!(validate_reward(&input(" ", 10, 200)).is_err());
        assert!(validate_reward(&input("Pulpen", -1, 200)).is_err());
        assert!(validate_reward(&input("Pulpen", 10, -5)).is_err());
    }
}
