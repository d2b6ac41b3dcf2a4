//! SeaORM implementation of TaskRepository

use async_trait::async_trait;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{DomainError, Task, TaskInput, TaskRepository};
use crate::models::task::{ActiveModel, Column, Entity as TaskEntity, Model};
use crate::models::task_claim;
use crate::models::{ClaimKind, ReviewStatus};

/// SeaORM-based implementation of TaskRepository
pub struct SeaOrmTaskRepository {
    db: DatabaseConnection,
}

impl SeaOrmTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<Model> for Task {
    fn from(task: Model) -> Self {
        Task {
            id: task.id,
            admin_id: task.admin_id,
            title: task.title,
            description: task.description,
            point: task.point,
            message: task.message,
            status: task.status,
            start_date: task.start_date,
            end_date: task.end_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[async_trait]
impl TaskRepository for SeaOrmTaskRepository {
    async fn find_all(&self) -> Result<Vec<Task>, DomainError> {
        let tasks = TaskEntity::find()
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(tasks.into_iter().map(Task::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Task>, DomainError> {
        let task = TaskEntity::find_by_id(id.to_owned()).one(&self.db).await?;
        Ok(task.map(Task::from))
    }

    async fn find_available(
        &self,
        user_id: &str,
        today: &str,
    ) -> Result<Vec<Task>, DomainError> {
        let claimed = Query::select()
            .column(task_claim::Column::TaskId)
            .from(task_claim::Entity)
            .and_where(task_claim::Column::UserId.eq(user_id))
            .and_where(task_claim::Column::Kind.eq(ClaimKind::TaskUpload))
            .and_where(task_claim::Column::TaskId.is_not_null())
            .and_where(task_claim::Column::Status.ne(ReviewStatus::Rejected))
            .to_owned();

        let tasks = TaskEntity::find()
            .filter(Column::Id.not_in_subquery(claimed))
            .filter(Column::Status.eq("Active"))
            .filter(Column::EndDate.gte(today))
            .order_by_asc(Column::EndDate)
            .all(&self.db)
            .await?;

        Ok(tasks.into_iter().map(Task::from).collect())
    }

    async fn create(&self, admin_id: &str, input: TaskInput) -> Result<Task, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let new_task = ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            admin_id: Set(admin_id.to_owned()),
            title: Set(input.title),
            description: Set(input.description),
            point: Set(input.point),
            message: Set(input.message),
            status: Set("Active".to_owned()),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let result = new_task.insert(&self.db).await?;
        Ok(Task::from(result))
    }

    async fn update(&self, id: &str, input: TaskInput) -> Result<Task, DomainError> {
        let existing = TaskEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound("task"))?;

        let mut active: ActiveModel = existing.into();
        active.title = Set(input.title);
        active.description = Set(input.description);
        active.point = Set(input.point);
        active.message = Set(input.message);
        active.start_date = Set(input.start_date);
        active.end_date = Set(input.end_date);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;
        Ok(Task::from(result))
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let result = TaskEntity::delete_by_id(id.to_owned())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound("task"));
        }

        Ok(())
    }
}
