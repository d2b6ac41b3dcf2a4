//! Religion tasks: manual catalog entries plus the recurring generator.
//!
//! The generator materializes the daily prayers for Islam and the Sunday
//! service for Kristen/Katolik. `(religion, title, start_date)` is unique in
//! the database, so a second run for the same period fails with
//! `AlreadyGenerated` even when two admins trigger it at once.

use chrono::{Datelike, NaiveDate, Weekday};
use sea_orm::sea_query::Query;
use sea_orm::*;
use serde::Deserialize;

use crate::domain::DomainError;
use crate::models::religion_task::{self, Entity as ReligionTask};
use crate::models::{task_claim, ClaimKind, Religion, ReviewStatus};
use crate::services::task_service::{validate_schedule, DATE_FORMAT};

pub const PRAYER_POINT: i64 = 250;
pub const SUNDAY_SERVICE_POINT: i64 = 300;
pub const SUNDAY_SERVICE_TITLE: &str = "Ibadah Minggu";

/// Manually entered religion task
#[derive(Debug, Clone, Deserialize)]
pub struct ReligionTaskInput {
    pub title: String,
    pub description: String,
    pub religion: Religion,
    pub point: i64,
    pub start_date: String,
    pub end_date: String,
}

/// Body of the create endpoint: either one explicit task or a request to
/// generate the recurring set for a religion.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CreateReligionTask {
    Manual(ReligionTaskInput),
    AutoGenerate { religion: Religion },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    pub title: &'static str,
    pub description: String,
    pub point: i64,
}

/// One generator run: every entry starts and ends on `date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringSchedule {
    pub religion: Religion,
    pub date: NaiveDate,
    /// Title probed to detect an earlier run for the same date
    pub sentinel: &'static str,
    pub entries: Vec<ScheduledTask>,
}

/// `today` when it is a Sunday, otherwise the coming Sunday.
pub fn next_sunday(today: NaiveDate) -> NaiveDate {
    let offset = today.weekday().num_days_from_sunday();
    if offset == 0 {
        today
    } else {
        today + chrono::Duration::days(i64::from(7 - offset))
    }
}

/// The recurring set for `religion` as of `today`, or `None` when the
/// religion has no recurring tasks.
pub fn recurring_schedule(religion: Religion, today: NaiveDate) -> Option<RecurringSchedule> {
    match religion {
        Religion::Islam => {
            let midday = if today.weekday() == Weekday::Fri {
                "Jum'at"
            } else {
                "Dzuhur"
            };
            let entries = ["Subuh", midday, "Ashar", "Maghrib", "Isya"]
                .into_iter()
                .map(|title| ScheduledTask {
                    title,
                    description: format!("Tugas Shalat {title}"),
                    point: PRAYER_POINT,
                })
                .collect();
            Some(RecurringSchedule {
                religion,
                date: today,
                sentinel: "Subuh",
                entries,
            })
        }
        Religion::Kristen | Religion::Katolik => Some(RecurringSchedule {
            religion,
            date: next_sunday(today),
            sentinel: SUNDAY_SERVICE_TITLE,
            entries: vec![ScheduledTask {
                title: SUNDAY_SERVICE_TITLE,
                description: "Mengikuti ibadah Minggu di gereja".to_owned(),
                point: SUNDAY_SERVICE_POINT,
            }],
        }),
        Religion::Hindu | Religion::Buddha | Religion::Konghucu => None,
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn map_generated(err: DbErr, what: String) -> DomainError {
    if is_unique_violation(&err) {
        DomainError::AlreadyGenerated(what)
    } else {
        err.into()
    }
}

fn map_duplicate(err: DbErr, what: String) -> DomainError {
    if is_unique_violation(&err) {
        DomainError::Conflict(format!("{what} already exists"))
    } else {
        err.into()
    }
}

/// Materialize today's recurring religion tasks.
pub async fn generate_recurring(
    db: &DatabaseConnection,
    religion: Religion,
    today: NaiveDate,
) -> Result<Vec<religion_task::Model>, DomainError> {
    let schedule = recurring_schedule(religion, today).ok_or_else(|| {
        DomainError::validation(format!("no recurring tasks are defined for {religion}"))
    })?;
    let date = schedule.date.format(DATE_FORMAT).to_string();
    let already = format!("{} tasks for {} already exist", religion, date);

    let txn = db.begin().await?;

    let existing = ReligionTask::find()
        .filter(religion_task::Column::Religion.eq(religion))
        .filter(religion_task::Column::Title.eq(schedule.sentinel))
        .filter(religion_task::Column::StartDate.eq(date.as_str()))
        .count(&txn)
        .await?;
    if existing > 0 {
        tracing::warn!("Recurring {} tasks for {} were already generated", religion, date);
        return Err(DomainError::AlreadyGenerated(already));
    }

    let now = chrono::Utc::now().to_rfc3339();
    let mut created = Vec::with_capacity(schedule.entries.len());
    for entry in schedule.entries {
        let model = religion_task::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            title: Set(entry.title.to_owned()),
            description: Set(entry.description),
            religion: Set(religion),
            point: Set(entry.point),
            status: Set("Active".to_owned()),
            start_date: Set(date.clone()),
            end_date: Set(date.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
        };
        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| map_generated(e, already.clone()))?;
        created.push(inserted);
    }

    txn.commit().await?;

    tracing::info!(
        "Generated {} recurring {} tasks for {}",
        created.len(),
        religion,
        date
    );
    Ok(created)
}

/// Dispatch a create request to the manual or recurring path.
pub async fn create_religion_task(
    db: &DatabaseConnection,
    request: CreateReligionTask,
    today: NaiveDate,
) -> Result<Vec<religion_task::Model>, DomainError> {
    match request {
        CreateReligionTask::Manual(input) => {
            let task = create_manual(db, input, today).await?;
            Ok(vec![task])
        }
        CreateReligionTask::AutoGenerate { religion } => {
            generate_recurring(db, religion, today).await
        }
    }
}

pub async fn create_manual(
    db: &DatabaseConnection,
    input: ReligionTaskInput,
    today: NaiveDate,
) -> Result<religion_task::Model, DomainError> {
    validate_input(&input, today)?;

    let now = chrono::Utc::now().to_rfc3339();
    let title = input.title.trim().to_owned();
    let start_date = input.start_date.trim().to_owned();
    let conflict = format!("{} '{}' on {}", input.religion, title, start_date);

    let model = religion_task::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        title: Set(title),
        description: Set(input.description.trim().to_owned()),
        religion: Set(input.religion),
        point: Set(input.point),
        status: Set("Active".to_owned()),
        start_date: Set(start_date),
        end_date: Set(input.end_date.trim().to_owned()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    };

    let task = model
        .insert(db)
        .await
        .map_err(|e| map_duplicate(e, conflict))?;
    tracing::info!("Religion task {} '{}' created", task.id, task.title);
    Ok(task)
}

pub async fn update_religion_task(
    db: &DatabaseConnection,
    id: &str,
    input: ReligionTaskInput,
    today: NaiveDate,
) -> Result<religion_task::Model, DomainError> {
    validate_input(&input, today)?;

    let existing = ReligionTask::find_by_id(id.to_owned())
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("religion task"))?;

    let title = input.title.trim().to_owned();
    let start_date = input.start_date.trim().to_owned();
    let conflict = format!("{} '{}' on {}", input.religion, title, start_date);

    let mut active: religion_task::ActiveModel = existing.into();
    active.title = Set(title);
    active.description = Set(input.description.trim().to_owned());
    active.religion = Set(input.religion);
    active.point = Set(input.point);
    active.start_date = Set(start_date);
    active.end_date = Set(input.end_date.trim().to_owned());
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    let task = active
        .update(db)
        .await
        .map_err(|e| map_duplicate(e, conflict))?;
    tracing::info!("Religion task {} updated", task.id);
    Ok(task)
}

pub async fn delete_religion_task(db: &DatabaseConnection, id: &str) -> Result<(), DomainError> {
    let result = ReligionTask::delete_by_id(id.to_owned()).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound("religion task"));
    }
    tracing::info!("Religion task {} deleted", id);
    Ok(())
}

pub async fn list_religion_tasks(
    db: &DatabaseConnection,
) -> Result<Vec<religion_task::Model>, DomainError> {
    Ok(ReligionTask::find()
        .order_by_desc(religion_task::Column::StartDate)
        .order_by_asc(religion_task::Column::Title)
        .all(db)
        .await?)
}

pub async fn get_religion_task(
    db: &DatabaseConnection,
    id: &str,
) -> Result<religion_task::Model, DomainError> {
    ReligionTask::find_by_id(id.to_owned())
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("religion task"))
}

/// Active religion tasks for the user's religion that are still open and have no
/// live (pending or accepted) claim from this user.
pub async fn available_religion_tasks(
    db: &DatabaseConnection,
    user_id: &str,
    religion: Religion,
    today: NaiveDate,
) -> Result<Vec<religion_task::Model>, DomainError> {
    let claimed = Query::select()
        .column(task_claim::Column::TaskId)
        .from(task_claim::Entity)
        .and_where(task_claim::Column::UserId.eq(user_id))
        .and_where(task_claim::Column::Kind.eq(ClaimKind::ReligionUpload))
        .and_where(task_claim::Column::TaskId.is_not_null())
        .and_where(task_claim::Column::Status.ne(ReviewStatus::Rejected))
        .to_owned();

    Ok(ReligionTask::find()
        .filter(religion_task::Column::Religion.eq(religion))
        .filter(religion_task::Column::Status.eq("Active"))
        .filter(religion_task::Column::EndDate.gte(today.format(DATE_FORMAT).to_string()))
        .filter(religion_task::Column::Id.not_in_subquery(claimed))
        .order_by_asc(religion_task::Column::StartDate)
        .all(db)
        .await?)
}

fn validate_input(input: &ReligionTaskInput, today: NaiveDate) -> Result<(), DomainError> {
    validate_schedule(
        &input.title,
        &input.description,
        input.point,
        &input.start_date,
        &input.end_date,
        today,
    )
}
