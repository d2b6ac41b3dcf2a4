//! Point ledger - the only code that moves user balances.
//!
//! Every balance change is a single guarded `UPDATE`, so concurrent debits
//! can never drive `point` or `total_point` below zero. Callers that need a
//! history row next to the balance change run both inside one transaction
//! and pass the transaction in as the connection.

use sea_orm::sea_query::Expr;
use sea_orm::*;

use crate::domain::DomainError;
use crate::models::point_history::{self, Entity as PointHistory};
use crate::models::user::{self, Entity as User};
use crate::models::PointKind;

/// Which balances a delta touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceScope {
    /// Both `point` and `total_point`
    Both,
    /// Only `total_point` (reward redemption and refunds)
    TotalOnly,
}

impl BalanceScope {
    pub fn for_kind(kind: PointKind) -> Self {
        match kind {
            PointKind::Reward => BalanceScope::TotalOnly,
            _ => BalanceScope::Both,
        }
    }
}

/// Add `amount` (signed) to the user's balances without writing history.
///
/// A negative amount only applies when every touched balance covers it;
/// otherwise nothing changes and `InsufficientBalance` is returned.
pub async fn adjust_balance<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    amount: i64,
    scope: BalanceScope,
) -> Result<user::Model, DomainError> {
    let mut update = User::update_many()
        .col_expr(
            user::Column::TotalPoint,
            Expr::col(user::Column::TotalPoint).add(amount),
        )
        .col_expr(
            user::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().to_rfc3339()),
        )
        .filter(user::Column::Id.eq(user_id));

    if scope == BalanceScope::Both {
        update = update.col_expr(user::Column::Point, Expr::col(user::Column::Point).add(amount));
    }

    if amount < 0 {
        let required = -amount;
        update = update.filter(user::Column::TotalPoint.gte(required));
        if scope == BalanceScope::Both {
            update = update.filter(user::Column::Point.gte(required));
        }
    }

    let result = update.exec(conn).await?;

    let user = User::find_by_id(user_id.to_owned())
        .one(conn)
        .await?
        .ok_or(DomainError::NotFound("user"))?;

    if result.rows_affected == 0 {
        let available = match scope {
            BalanceScope::Both => user.point.min(user.total_point),
            BalanceScope::TotalOnly => user.total_point,
        };
        return Err(DomainError::InsufficientBalance {
            required: -amount,
            available,
        });
    }

    Ok(user)
}

/// Append one audit row. `point` is the signed delta.
pub async fn record_history<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    kind: PointKind,
    label: &str,
    point: i64,
) -> Result<point_history::Model, DomainError> {
    let entry = point_history::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        user_id: Set(user_id.to_owned()),
        kind: Set(kind),
        label: Set(label.to_owned()),
        point: Set(point),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
    };
    Ok(entry.insert(conn).await?)
}

/// Move the balances selected by `kind` and record the matching history row.
pub async fn apply_delta<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    amount: i64,
    kind: PointKind,
    label: &str,
) -> Result<user::Model, DomainError> {
    let user = adjust_balance(conn, user_id, amount, BalanceScope::for_kind(kind)).await?;
    record_history(conn, user_id, kind, label, amount).await?;

    tracing::info!(
        "Ledger: {} {:+} ({:?}, {}) -> point={} total_point={}",
        user_id,
        amount,
        kind,
        label,
        user.point,
        user.total_point
    );
    Ok(user)
}

/// Zero every user's monthly `point`. No history rows are written.
pub async fn monthly_reset(db: &DatabaseConnection) -> Result<u64, DomainError> {
    let result = User::update_many()
        .col_expr(user::Column::Point, Expr::value(0i64))
        .col_expr(
            user::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().to_rfc3339()),
        )
        .exec(db)
        .await?;

    tracing::info!("Monthly reset cleared point for {} users", result.rows_affected);
    Ok(result.rows_affected)
}

/// Zero every user's cumulative `total_point`. No history rows are written.
pub async fn annual_reset(db: &DatabaseConnection) -> Result<u64, DomainError> {
    let result = User::update_many()
        .col_expr(user::Column::TotalPoint, Expr::value(0i64))
        .col_expr(
            user::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().to_rfc3339()),
        )
        .exec(db)
        .await?;

    tracing::info!(
        "Annual reset cleared total_point for {} users",
        result.rows_affected
    );
    Ok(result.rows_affected)
}

/// History of one user, newest first
pub async fn history_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<point_history::Model>, DomainError> {
    Ok(PointHistory::find()
        .filter(point_history::Column::UserId.eq(user_id))
        .order_by_desc(point_history::Column::CreatedAt)
        .all(db)
        .await?)
}

/// Every history row, newest first
pub async fn all_history(db: &DatabaseConnection) -> Result<Vec<point_history::Model>, DomainError> {
    Ok(PointHistory::find()
        .order_by_desc(point_history::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn find_history(
    db: &DatabaseConnection,
    id: &str,
) -> Result<point_history::Model, DomainError> {
    PointHistory::find_by_id(id.to_owned())
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("point history"))
}
