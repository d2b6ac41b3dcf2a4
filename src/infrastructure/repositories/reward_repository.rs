//! SeaORM implementation of RewardRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::domain::{DomainError, Reward, RewardInput, RewardRepository};
use crate::models::reward::{ActiveModel, Column, Entity as RewardEntity, Model};
use crate::models::{reward_request, ReviewStatus};

/// SeaORM-based implementation of RewardRepository
pub struct SeaOrmRewardRepository {
    db: DatabaseConnection,
}

impl SeaOrmRewardRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<Model> for Reward {
    fn from(reward: Model) -> Self {
        Reward {
            id: reward.id,
            name: reward.name,
            stock: reward.stock,
            price: reward.price,
            image: reward.image,
            created_at: reward.created_at,
            updated_at: reward.updated_at,
        }
    }
}

#[async_trait]
impl RewardRepository for SeaOrmRewardRepository {
    async fn find_all(&self) -> Result<Vec<Reward>, DomainError> {
        let rewards = RewardEntity::find()
            .order_by_asc(Column::Price)
            .all(&self.db)
            .await?;
        Ok(rewards.into_iter().map(Reward::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Reward>, DomainError> {
        let reward = RewardEntity::find_by_id(id.to_owned()).one(&self.db).await?;
        Ok(reward.map(Reward::from))
    }

    async fn create(&self, input: RewardInput) -> Result<Reward, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let new_reward = ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(input.name),
            stock: Set(input.stock),
            price: Set(input.price),
            image: Set(input.image),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let result = new_reward.insert(&self.db).await?;
        Ok(Reward::from(result))
    }

    async fn update(&self, id: &str, input: RewardInput) -> Result<Reward, DomainError> {
        let existing = RewardEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound("reward"))?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(input.name);
        active.stock = Set(input.stock);
        active.price = Set(input.price);
        if let Some(image) = input.image {
            active.image = Set(Some(image));
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;
        Ok(Reward::from(result))
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        // Pending requests still hold escrowed points
        let pending = reward_request::Entity::find()
            .filter(reward_request::Column::RewardId.eq(id))
            .filter(reward_request::Column::Status.eq(ReviewStatus::Pending))
            .count(&txn)
            .await?;
        if pending > 0 {
            return Err(DomainError::Conflict(format!(
                "reward has {} pending request(s); resolve them first",
                pending
            )));
        }

        let result = RewardEntity::delete_by_id(id.to_owned()).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound("reward"));
        }

        txn.commit().await?;
        Ok(())
    }
}
