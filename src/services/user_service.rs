//! User accounts: registration, login, profile and ranking

use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::*;
use serde::{Deserialize, Serialize};

use crate::auth::{create_jwt, hash_password, verify_password};
use crate::domain::DomainError;
use crate::models::user::{self, Entity as User};
use crate::models::{Religion, Role};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub religion: Option<Religion>,
    pub address: Option<String>,
    pub school: Option<String>,
    pub class: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub religion: Option<Religion>,
    pub address: Option<String>,
    pub school: Option<String>,
    pub class: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub user: user::Model,
}

/// One leaderboard line
#[derive(Debug, Clone, Serialize)]
pub struct RankEntry {
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub school: Option<String>,
    pub class: Option<String>,
    pub point: i64,
    pub total_point: i64,
}

fn validate_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(DomainError::validation("email is not valid"));
    }
    Ok(email)
}

fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

async fn ensure_email_free(
    db: &DatabaseConnection,
    email: &str,
    except_id: Option<&str>,
) -> Result<(), DomainError> {
    let mut query = User::find().filter(user::Column::Email.eq(email));
    if let Some(id) = except_id {
        query = query.filter(user::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(DomainError::validation("email is already registered"));
    }
    Ok(())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Create a regular user with zero balances
pub async fn register(db: &DatabaseConnection, input: RegisterInput) -> Result<user::Model, DomainError> {
    let name = input.name.trim().to_owned();
    if name.is_empty() {
        return Err(DomainError::validation("name is required"));
    }
    let email = validate_email(&input.email)?;
    validate_password(&input.password)?;
    ensure_email_free(db, &email, None).await?;

    let password_hash = hash_password(&input.password).map_err(DomainError::Database)?;
    let now = chrono::Utc::now().to_rfc3339();

    let created = user::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(name),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(Role::User),
        religion: Set(input.religion),
        address: Set(optional(input.address)),
        school: Set(optional(input.school)),
        class: Set(optional(input.class)),
        image: Set(None),
        point: Set(0),
        total_point: Set(0),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    tracing::info!("User {} registered", created.id);
    Ok(created)
}

/// Check credentials and issue a 24h token
pub async fn login(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<LoginResult, DomainError> {
    let email = email.trim().to_lowercase();
    let user = User::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(db)
        .await?;

    let user = match user {
        Some(user) if verify_password(password, &user.password_hash).unwrap_or(false) => user,
        _ => {
            tracing::warn!("Failed login for {}", email);
            return Err(DomainError::Unauthorized("invalid email or password".into()));
        }
    };

    let token = create_jwt(&user.id, user.role, user.religion).map_err(DomainError::Database)?;
    tracing::debug!("User {} logged in", user.id);
    Ok(LoginResult { token, user })
}

pub async fn get_user(db: &DatabaseConnection, id: &str) -> Result<user::Model, DomainError> {
    User::find_by_id(id.to_owned())
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("user"))
}

pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>, DomainError> {
    Ok(User::find()
        .filter(user::Column::Role.eq(Role::User))
        .order_by_asc(user::Column::Name)
        .all(db)
        .await?)
}

pub async fn update_profile(
    db: &DatabaseConnection,
    id: &str,
    input: ProfileUpdate,
) -> Result<user::Model, DomainError> {
    let name = input.name.trim().to_owned();
    if name.is_empty() {
        return Err(DomainError::validation("name is required"));
    }
    let email = validate_email(&input.email)?;
    ensure_email_free(db, &email, Some(id)).await?;

    let existing = get_user(db, id).await?;
    let mut active: user::ActiveModel = existing.into();
    active.name = Set(name);
    active.email = Set(email);
    active.religion = Set(input.religion);
    active.address = Set(optional(input.address));
    active.school = Set(optional(input.school));
    active.class = Set(optional(input.class));
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    Ok(active.update(db).await?)
}

pub async fn change_password(
    db: &DatabaseConnection,
    id: &str,
    current_password: &str,
    new_password: &str,
) -> Result<(), DomainError> {
    let existing = get_user(db, id).await?;
    if !verify_password(current_password, &existing.password_hash).unwrap_or(false) {
        return Err(DomainError::validation("current password is incorrect"));
    }
    validate_password(new_password)?;

    let password_hash = hash_password(new_password).map_err(DomainError::Database)?;
    let mut active: user::ActiveModel = existing.into();
    active.password_hash = Set(password_hash);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    active.update(db).await?;

    tracing::info!("User {} changed password", id);
    Ok(())
}

/// Delete a user; claims, history, penalties and requests go with it.
pub async fn delete_user(db: &DatabaseConnection, id: &str) -> Result<(), DomainError> {
    let result = User::delete_by_id(id.to_owned()).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound("user"));
    }
    tracing::info!("User {} deleted", id);
    Ok(())
}

/// Regular users ordered by monthly `point`, ties broken by `total_point`
pub async fn rank_users(db: &DatabaseConnection) -> Result<Vec<RankEntry>, DomainError> {
    let users = User::find()
        .filter(user::Column::Role.eq(Role::User))
        .order_by_desc(user::Column::Point)
        .order_by_desc(user::Column::TotalPoint)
        .order_by_asc(user::Column::Name)
        .all(db)
        .await?;

    Ok(users
        .into_iter()
        .enumerate()
        .map(|(i, u)| RankEntry {
            rank: i + 1,
            id: u.id,
            name: u.name,
            school: u.school,
            class: u.class,
            point: u.point,
            total_point: u.total_point,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert_eq!(validate_email(" Siti@Sekolah.ID ").unwrap(), "siti@sekolah.id");
        assert!(validate_email("siti@sekolah").is_err());
        assert!(validate_email("siti sekolah@x.id").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("rahasia1").is_ok());
        assert!(validate_password("pendek").is_err());
    }
}
