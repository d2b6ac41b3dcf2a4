//! Bootstrap data created at startup

use sea_orm::*;

use crate::auth::hash_password;
use crate::config::Config;
use crate::models::user;
use crate::models::Role;

/// Create the configured admin account if it does not exist yet.
///
/// Does nothing unless both `ADMIN_EMAIL` and `ADMIN_PASSWORD` are set.
pub async fn ensure_admin(db: &DatabaseConnection, config: &Config) -> Result<(), DbErr> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        tracing::debug!("No bootstrap admin configured");
        return Ok(());
    };
    let email = email.trim().to_lowercase();

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        tracing::debug!("Bootstrap admin {} already exists", email);
        return Ok(());
    }

    let password_hash = hash_password(password).map_err(DbErr::Custom)?;
    let now = chrono::Utc::now().to_rfc3339();

    let admin = user::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set("Admin".to_owned()),
        email: Set(email.clone()),
        password_hash: Set(password_hash),
        role: Set(Role::Admin),
        religion: Set(None),
        address: Set(None),
        school: Set(None),
        class: Set(None),
        image: Set(None),
        point: Set(0),
        total_point: Set(0),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    };

    user::Entity::insert(admin)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(user::Column::Email)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    tracing::info!("Bootstrap admin {} created", email);
    Ok(())
}
