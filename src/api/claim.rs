//! Claim endpoints. Filing a claim takes `multipart/form-data` with an
//! optional `image` file part; review takes JSON.

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::{AdminClaims, Claims};
use crate::domain::{DomainError, ImageUpload};
use crate::infrastructure::AppState;
use crate::models::{ClaimKind, ReviewStatus};
use crate::services::claim_service::{self, ClaimFilter, FreeFormClaim};
use crate::services::review_service::{self, ReviewDecision};

#[derive(Deserialize)]
pub struct MyClaimsQuery {
    pub kind: Option<ClaimKind>,
    pub status: Option<ReviewStatus>,
}

/// Text fields plus the optional image of a multipart claim form
struct ClaimForm {
    fields: HashMap<String, String>,
    image: Option<ImageUpload>,
}

impl ClaimForm {
    async fn read(mut multipart: Multipart) -> Result<Self, DomainError> {
        let mut fields = HashMap::new();
        let mut image = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| DomainError::validation(format!("invalid form data: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "image" {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| DomainError::validation(format!("invalid image: {e}")))?;
                if !bytes.is_empty() {
                    image = Some(ImageUpload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| DomainError::validation(format!("invalid field {name}: {e}")))?;
                fields.insert(name, value);
            }
        }

        Ok(Self { fields, image })
    }

    fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    fn free_form(&self) -> Result<FreeFormClaim, DomainError> {
        let point = self
            .text("point")
            .trim()
            .parse::<i64>()
            .map_err(|_| DomainError::validation("point must be a whole number"))?;
        Ok(FreeFormClaim {
            title: self.text("title"),
            description: self.text("description"),
            point,
        })
    }
}

pub async fn upload_task(
    State(state): State<AppState>,
    claims: Claims,
    Path(task_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Value>, DomainError> {
    let form = ClaimForm::read(multipart).await?;
    let description = form.text("description");
    let claim = claim_service::upload_task(
        state.db(),
        state.storage.as_ref(),
        claims.user_id(),
        &task_id,
        &description,
        form.image,
    )
    .await?;
    Ok(Json(json!({ "claim": claim })))
}

pub async fn submit_task(
    State(state): State<AppState>,
    claims: Claims,
    multipart: Multipart,
) -> Result<Json<Value>, DomainError> {
    let form = ClaimForm::read(multipart).await?;
    let submission = form.free_form()?;
    let claim = claim_service::submit_task(
        state.db(),
        state.storage.as_ref(),
        claims.user_id(),
        submission,
        form.image,
    )
    .await?;
    Ok(Json(json!({ "claim": claim })))
}

pub async fn upload_religion_task(
    State(state): State<AppState>,
    claims: Claims,
    Path(religion_task_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Value>, DomainError> {
    let form = ClaimForm::read(multipart).await?;
    let description = form.text("description");
    let claim = claim_service::upload_religion_task(
        state.db(),
        state.storage.as_ref(),
        claims.user_id(),
        &religion_task_id,
        &description,
        form.image,
    )
    .await?;
    Ok(Json(json!({ "claim": claim })))
}

pub async fn request_religion_task(
    State(state): State<AppState>,
    claims: Claims,
    multipart: Multipart,
) -> Result<Json<Value>, DomainError> {
    let form = ClaimForm::read(multipart).await?;
    let request = form.free_form()?;
    let claim = claim_service::request_religion_task(
        state.db(),
        state.storage.as_ref(),
        claims.user_id(),
        request,
        form.image,
    )
    .await?;
    Ok(Json(json!({ "claim": claim })))
}

pub async fn list_claims(
    State(db): State<DatabaseConnection>,
    _admin: AdminClaims,
    Query(filter): Query<ClaimFilter>,
) -> Result<Json<Value>, DomainError> {
    let claims = claim_service::list_claims(&db, filter).await?;
    Ok(Json(json!({ "claims": claims })))
}

pub async fn my_claims(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Query(query): Query<MyClaimsQuery>,
) -> Result<Json<Value>, DomainError> {
    let filter = ClaimFilter {
        kind: query.kind,
        user_id: Some(claims.user_id().to_owned()),
        status: query.status,
    };
    let claims = claim_service::list_claims(&db, filter).await?;
    Ok(Json(json!({ "claims": claims })))
}

pub async fn get_claim(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Path(id): Path<String>,
) -> Result<Json<Value>, DomainError> {
    let claim = claim_service::get_claim(&db, &id).await?;
    if !claims.is_admin() && claim.user_id != claims.user_id() {
        return Err(DomainError::Forbidden("claim belongs to another user".into()));
    }
    Ok(Json(json!({ "claim": claim })))
}

pub async fn cleared_count(
    State(db): State<DatabaseConnection>,
    claims: Claims,
) -> Result<Json<Value>, DomainError> {
    let count = claim_service::count_cleared(&db, claims.user_id()).await?;
    Ok(Json(json!({ "cleared": count })))
}

pub async fn review_claim(
    State(db): State<DatabaseConnection>,
    AdminClaims(admin): AdminClaims,
    Path(id): Path<String>,
    Json(decision): Json<ReviewDecision>,
) -> Result<Json<Value>, DomainError> {
    tracing::info!("Admin {} reviewing claim {}", admin.user_id(), id);
    let claim = review_service::set_claim_status(&db, &id, decision).await?;
    Ok(Json(json!({ "claim": claim })))
}
