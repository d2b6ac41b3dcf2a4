//! Review state machine for task claims.
//!
//! `Perlu Review` is the only state that accepts a transition. Accepting a
//! claim credits the ledger in the same transaction as the status change;
//! the status update is conditional on the row still being pending, so two
//! admins racing on one claim credit the user once.

use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::Deserialize;

use crate::domain::DomainError;
use crate::models::task_claim::{self, Entity as TaskClaim};
use crate::models::{religion_task, task, ClaimKind, ReviewStatus};
use crate::services::ledger;

/// Admin decision on a pending claim
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewDecision {
    pub status: ReviewStatus,
    pub message: Option<String>,
}

/// Check that a record in `current` may move to `requested`.
pub fn check_transition(current: ReviewStatus, requested: ReviewStatus) -> Result<(), DomainError> {
    if requested == ReviewStatus::Pending {
        return Err(DomainError::validation(
            "status must be either Diterima or Ditolak",
        ));
    }
    if requested == current {
        return Err(DomainError::AlreadyInStatus(current.to_string()));
    }
    if current.is_terminal() {
        return Err(DomainError::AlreadyResolved(current.to_string()));
    }
    Ok(())
}

/// Points and history label credited when `claim` is accepted.
async fn claim_credit<C: ConnectionTrait>(
    conn: &C,
    claim: &task_claim::Model,
) -> Result<(i64, String), DomainError> {
    if claim.kind.is_free_form() {
        let point = claim
            .point
            .ok_or_else(|| DomainError::validation("claim has no point value"))?;
        return Ok((point, claim.title.clone().unwrap_or_default()));
    }

    let task_id = claim
        .task_id
        .clone()
        .ok_or_else(|| DomainError::validation("claim does not reference a task"))?;

    match claim.kind {
        ClaimKind::ReligionUpload => {
            let task = religion_task::Entity::find_by_id(task_id)
                .one(conn)
                .await?
                .ok_or(DomainError::NotFound("religion task"))?;
            Ok((task.point, task.title))
        }
        _ => {
            let task = task::Entity::find_by_id(task_id)
                .one(conn)
                .await?
                .ok_or(DomainError::NotFound("task"))?;
            Ok((task.point, task.title))
        }
    }
}

/// Accept or reject a pending claim.
///
/// On acceptance the referenced task's points (or the claim's own points for
/// free-form claims) are credited to both balances with a history row of the
/// claim's kind. Rejection changes only the status and message.
pub async fn set_claim_status(
    db: &DatabaseConnection,
    claim_id: &str,
    decision: ReviewDecision,
) -> Result<task_claim::Model, DomainError> {
    let txn = db.begin().await?;

    let claim = TaskClaim::find_by_id(claim_id.to_owned())
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound("claim"))?;

    check_transition(claim.status, decision.status)?;

    // Resolve the credit before touching anything so a dangling task
    // reference leaves the claim pending.
    let credit = if decision.status == ReviewStatus::Accepted {
        Some(claim_credit(&txn, &claim).await?)
    } else {
        None
    };

    let result = TaskClaim::update_many()
        .col_expr(
            task_claim::Column::Status,
            Expr::value(decision.status.to_value()),
        )
        .col_expr(task_claim::Column::Message, Expr::value(decision.message.clone()))
        .col_expr(
            task_claim::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().to_rfc3339()),
        )
        .filter(task_claim::Column::Id.eq(claim_id))
        .filter(task_claim::Column::Status.eq(ReviewStatus::Pending))
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        tracing::warn!("Claim {} was resolved concurrently", claim_id);
        return Err(DomainError::AlreadyResolved(claim.status.to_string()));
    }

    if let Some((point, label)) = credit {
        ledger::apply_delta(&txn, &claim.user_id, point, claim.kind.point_kind(), &label).await?;
    }

    let updated = TaskClaim::find_by_id(claim_id.to_owned())
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound("claim"))?;

    txn.commit().await?;

    tracing::info!(
        "Claim {} ({:?}) set to {} for user {}",
        claim_id,
        claim.kind,
        decision.status,
        claim.user_id
    );
    Ok(updated)
}
