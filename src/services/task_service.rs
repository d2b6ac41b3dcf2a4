//! Task catalog service - validation in front of the TaskRepository

use chrono::NaiveDate;

use crate::domain::{DomainError, Task, TaskInput, TaskRepository};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::validation(format!("{field} must be a YYYY-MM-DD date")))
}

/// Rules shared by task and religion-task catalog entries.
pub fn validate_schedule(
    title: &str,
    description: &str,
    point: i64,
    start_date: &str,
    end_date: &str,
    today: NaiveDate,
) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::validation("title is required"));
    }
    if description.trim().is_empty() {
        return Err(DomainError::validation("description is required"));
    }
    if point <= 0 {
        return Err(DomainError::validation("point must be greater than zero"));
    }

    let start = parse_date("start_date", start_date)?;
    let end = parse_date("end_date", end_date)?;

    if start < today {
        return Err(DomainError::validation(
            "start_date cannot be in the past, please choose at least today",
        ));
    }
    if end == start {
        return Err(DomainError::validation(
            "end_date must be different from start_date",
        ));
    }
    if end < start {
        return Err(DomainError::validation("end_date must be after start_date"));
    }
    Ok(())
}

pub async fn list_tasks(repo: &dyn TaskRepository) -> Result<Vec<Task>, DomainError> {
    repo.find_all().await
}

pub async fn get_task(repo: &dyn TaskRepository, id: &str) -> Result<Task, DomainError> {
    repo.find_by_id(id).await?.ok_or(DomainError::NotFound("task"))
}

/// Open catalog tasks the user has not claimed yet
pub async fn available_tasks(
    repo: &dyn TaskRepository,
    user_id: &str,
    today: NaiveDate,
) -> Result<Vec<Task>, DomainError> {
    repo.find_available(user_id, &today.format(DATE_FORMAT).to_string())
        .await
}

pub async fn create_task(
    repo: &dyn TaskRepository,
    admin_id: &str,
    input: TaskInput,
    today: NaiveDate,
) -> Result<Task, DomainError> {
    validate_schedule(
        &input.title,
        &input.description,
        input.point,
        &input.start_date,
        &input.end_date,
        today,
    )?;

    let task = repo.create(admin_id, normalize(input)).await?;
    tracing::info!("Task {} '{}' created by {}", task.id, task.title, admin_id);
    Ok(task)
}

pub async fn update_task(
    repo: &dyn TaskRepository,
    id: &str,
    input: TaskInput,
    today: NaiveDate,
) -> Result<Task, DomainError> {
    validate_schedule(
        &input.title,
        &input.description,
        input.point,
        &input.start_date,
        &input.end_date,
        today,
    )?;

    let task = repo.update(id, normalize(input)).await?;
    tracing::info!("Task {} updated", task.id);
    Ok(task)
}

pub async fn delete_task(repo: &dyn TaskRepository, id: &str) -> Result<(), DomainError> {
    repo.delete(id).await?;
    tracing::info!("Task {} deleted", id);
    Ok(())
}

fn normalize(input: TaskInput) -> TaskInput {
    TaskInput {
        title: input.title.trim().to_owned(),
        description: input.description.trim().to_owned(),
        start_date: input.start_date.trim().to_owned(),
        end_date: input.end_date.trim().to_owned(),
        ..input
    }
}
