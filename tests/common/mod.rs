#![allow(dead_code)]

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tugaskita::db;
use tugaskita::models::{religion_task, reward, task, user, Religion, Role};

pub async fn setup_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

pub async fn create_user(
    db: &DatabaseConnection,
    name: &str,
    religion: Option<Religion>,
    point: i64,
    total_point: i64,
) -> user::Model {
    let now = chrono::Utc::now().to_rfc3339();
    user::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(name.to_string()),
        email: Set(format!("{}@sekolah.id", name.to_lowercase())),
        password_hash: Set("hash".to_string()),
        role: Set(Role::User),
        religion: Set(religion),
        address: Set(None),
        school: Set(None),
        class: Set(None),
        image: Set(None),
        point: Set(point),
        total_point: Set(total_point),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to create user")
}

pub async fn reload_user(db: &DatabaseConnection, id: &str) -> user::Model {
    user::Entity::find_by_id(id.to_string())
        .one(db)
        .await
        .expect("query failed")
        .expect("user missing")
}

pub async fn create_task(db: &DatabaseConnection, title: &str, point: i64) -> task::Model {
    let now = chrono::Utc::now().to_rfc3339();
    task::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        admin_id: Set("admin".to_string()),
        title: Set(title.to_string()),
        description: Set(format!("{title} description")),
        point: Set(point),
        message: Set(None),
        status: Set("Active".to_string()),
        start_date: Set("2024-01-01".to_string()),
        end_date: Set("2999-12-31".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to create task")
}

pub async fn create_religion_task(
    db: &DatabaseConnection,
    title: &str,
    religion: Religion,
    point: i64,
) -> religion_task::Model {
    let now = chrono::Utc::now().to_rfc3339();
    religion_task::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        title: Set(title.to_string()),
        description: Set(format!("{title} description")),
        religion: Set(religion),
        point: Set(point),
        status: Set("Active".to_string()),
        start_date: Set("2024-01-01".to_string()),
        end_date: Set("2999-12-31".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to create religion task")
}

pub async fn create_reward(
    db: &DatabaseConnection,
    name: &str,
    price: i64,
    stock: i64,
) -> reward::Model {
    let now = chrono::Utc::now().to_rfc3339();
    reward::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(name.to_string()),
        stock: Set(stock),
        price: Set(price),
        image: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to create reward")
}
