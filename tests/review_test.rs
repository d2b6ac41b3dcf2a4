mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use common::{create_religion_task, create_task, create_user, reload_user, setup_db};
use tugaskita::db;
use tugaskita::domain::{DomainError, ImageUpload};
use tugaskita::infrastructure::{LocalFileStorage, SeaOrmTaskRepository};
use tugaskita::models::{ClaimKind, PointKind, Religion, ReviewStatus};
use tugaskita::services::claim_service::{self, ClaimFilter, FreeFormClaim};
use tugaskita::services::ledger;
use tugaskita::services::review_service::{set_claim_status, ReviewDecision};
use tugaskita::services::task_service;

fn accept() -> ReviewDecision {
    ReviewDecision {
        status: ReviewStatus::Accepted,
        message: Some("Bagus".to_string()),
    }
}

fn reject() -> ReviewDecision {
    ReviewDecision {
        status: ReviewStatus::Rejected,
        message: Some("Foto tidak jelas".to_string()),
    }
}

#[tokio::test]
async fn test_accepting_upload_credits_task_points() {
    let db = setup_db().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalFileStorage::new(dir.path());
    let user = create_user(&db, "Siti", None, 50, 200).await;
    let task = create_task(&db, "Piket", 250).await;

    let claim = claim_service::upload_task(
        &db,
        &storage,
        &user.id,
        &task.id,
        "Sudah menyapu kelas",
        Some(ImageUpload {
            file_name: "bukti.jpg".to_string(),
            bytes: b"jpeg".to_vec(),
        }),
    )
    .await
    .expect("upload failed");
    assert_eq!(claim.status, ReviewStatus::Pending);
    assert!(claim.image.as_deref().unwrap().starts_with("/uploads/"));

    let resolved = set_claim_status(&db, &claim.id, accept()).await.unwrap();
    assert_eq!(resolved.status, ReviewStatus::Accepted);
    assert_eq!(resolved.message.as_deref(), Some("Bagus"));

    let after = reload_user(&db, &user.id).await;
    assert_eq!((after.point, after.total_point), (300, 450));

    let history = ledger::history_for_user(&db, &user.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, PointKind::Task);
    assert_eq!(history[0].point, 250);
    assert_eq!(history[0].label, "Piket");
}

#[tokio::test]
async fn test_second_accept_is_rejected_and_credits_once() {
    let db = setup_db().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalFileStorage::new(dir.path());
    let user = create_user(&db, "Budi", None, 0, 0).await;
    let task = create_task(&db, "Literasi", 100).await;

    let claim = claim_service::upload_task(&db, &storage, &user.id, &task.id, "Baca buku", None)
        .await
        .unwrap();

    set_claim_status(&db, &claim.id, accept()).await.unwrap();
    let err = set_claim_status(&db, &claim.id, accept()).await.unwrap_err();
    assert!(matches!(err, DomainError::AlreadyInStatus(_)));

    let err = set_claim_status(&db, &claim.id, reject()).await.unwrap_err();
    assert!(matches!(err, DomainError::AlreadyResolved(_)));

    let after = reload_user(&db, &user.id).await;
    assert_eq!((after.point, after.total_point), (100, 100));
    assert_eq!(ledger::history_for_user(&db, &user.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejection_changes_only_status() {
    let db = setup_db().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalFileStorage::new(dir.path());
    let user = create_user(&db, "Rina", None, 10, 10).await;
    let task = create_task(&db, "Kebersihan", 100).await;

    let claim = claim_service::upload_task(&db, &storage, &user.id, &task.id, "Selesai", None)
        .await
        .unwrap();
    let resolved = set_claim_status(&db, &claim.id, reject()).await.unwrap();
    assert_eq!(resolved.status, ReviewStatus::Rejected);

    let after = reload_user(&db, &user.id).await;
    assert_eq!((after.point, after.total_point), (10, 10));
    assert!(ledger::history_for_user(&db, &user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_free_form_submission_uses_its_own_points() {
    let db = setup_db().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalFileStorage::new(dir.path());
    let user = create_user(&db, "Dewi", None, 0, 0).await;

    let claim = claim_service::submit_task(
        &db,
        &storage,
        &user.id,
        FreeFormClaim {
            title: "Bantu tetangga".to_string(),
            description: "Mengangkat barang".to_string(),
            point: 75,
        },
        None,
    )
    .await
    .unwrap();
    assert_eq!(claim.kind, ClaimKind::TaskSubmission);

    set_claim_status(&db, &claim.id, accept()).await.unwrap();

    let after = reload_user(&db, &user.id).await;
    assert_eq!((after.point, after.total_point), (75, 75));
    let history = ledger::history_for_user(&db, &user.id).await.unwrap();
    assert_eq!(history[0].kind, PointKind::Submission);
    assert_eq!(history[0].label, "Bantu tetangga");
}

#[tokio::test]
async fn test_religion_upload_credits_religion_kind() {
    let db = setup_db().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalFileStorage::new(dir.path());
    let user = create_user(&db, "Ahmad", Some(Religion::Islam), 0, 0).await;
    let prayer = create_religion_task(&db, "Subuh", Religion::Islam, 250).await;

    let claim =
        claim_service::upload_religion_task(&db, &storage, &user.id, &prayer.id, "Shalat", None)
            .await
            .unwrap();
    set_claim_status(&db, &claim.id, accept()).await.unwrap();

    let after = reload_user(&db, &user.id).await;
    assert_eq!(after.point, 250);
    let history = ledger::history_for_user(&db, &user.id).await.unwrap();
    assert_eq!(history[0].kind, PointKind::Religion);
}

#[tokio::test]
async fn test_religion_upload_requires_matching_religion() {
    let db = setup_db().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalFileStorage::new(dir.path());
    let user = create_user(&db, "Maria", Some(Religion::Katolik), 0, 0).await;
    let prayer = create_religion_task(&db, "Subuh", Religion::Islam, 250).await;

    let err =
        claim_service::upload_religion_task(&db, &storage, &user.id, &prayer.id, "Shalat", None)
            .await
            .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test]
async fn test_live_claim_blocks_a_second_upload_until_rejected() {
    let db = setup_db().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalFileStorage::new(dir.path());
    let user = create_user(&db, "Joko", None, 0, 0).await;
    let task = create_task(&db, "Piket", 100).await;

    let first = claim_service::upload_task(&db, &storage, &user.id, &task.id, "Satu", None)
        .await
        .unwrap();
    let err = claim_service::upload_task(&db, &storage, &user.id, &task.id, "Dua", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AlreadyClaimed(_)));

    set_claim_status(&db, &first.id, reject()).await.unwrap();
    claim_service::upload_task(&db, &storage, &user.id, &task.id, "Tiga", None)
        .await
        .expect("retry after rejection should be allowed");
}

#[tokio::test]
async fn test_available_tasks_hide_claimed_ones() {
    let db = setup_db().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalFileStorage::new(dir.path());
    let user = create_user(&db, "Lia", None, 0, 0).await;
    let claimed = create_task(&db, "Piket", 100).await;
    let open = create_task(&db, "Literasi", 50).await;

    claim_service::upload_task(&db, &storage, &user.id, &claimed.id, "Selesai", None)
        .await
        .unwrap();

    let repo = SeaOrmTaskRepository::new(db.clone());
    let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
    let available = task_service::available_tasks(&repo, &user.id, today)
        .await
        .unwrap();

    let ids: Vec<_> = available.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, [open.id.as_str()]);
}

#[tokio::test]
async fn test_listing_and_cleared_count() {
    let db = setup_db().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalFileStorage::new(dir.path());
    let user = create_user(&db, "Nina", None, 0, 0).await;
    let a = create_task(&db, "A", 10).await;
    let b = create_task(&db, "B", 10).await;

    let first = claim_service::upload_task(&db, &storage, &user.id, &a.id, "a", None)
        .await
        .unwrap();
    claim_service::upload_task(&db, &storage, &user.id, &b.id, "b", None)
        .await
        .unwrap();
    set_claim_status(&db, &first.id, accept()).await.unwrap();

    let pending = claim_service::list_claims(
        &db,
        ClaimFilter {
            status: Some(ReviewStatus::Pending),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(claim_service::count_cleared(&db, &user.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_oversized_image_is_rejected_before_storing() {
    let db = setup_db().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalFileStorage::new(dir.path());
    let user = create_user(&db, "Tono", None, 0, 0).await;
    let task = create_task(&db, "Piket", 100).await;

    let err = claim_service::upload_task(
        &db,
        &storage,
        &user.id,
        &task.id,
        "Selesai",
        Some(ImageUpload {
            file_name: "besar.jpg".to_string(),
            bytes: vec![0u8; tugaskita::domain::MAX_IMAGE_BYTES + 1],
        }),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_missing_claim_is_not_found() {
    let db = setup_db().await;
    let err = set_claim_status(&db, "nope", accept()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound("claim")));
}

fn stored_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_uploads_leave_one_live_claim() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("race.db").display());
    let db = db::init_db(&url).await.expect("Failed to init DB");
    let uploads = dir.path().join("uploads");
    let storage = Arc::new(LocalFileStorage::new(&uploads));
    let user = create_user(&db, "Siti", None, 0, 0).await;
    let task = create_task(&db, "Piket", 250).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let db = db.clone();
        let storage = storage.clone();
        let user_id = user.id.clone();
        let task_id = task.id.clone();
        handles.push(tokio::spawn(async move {
            claim_service::upload_task(
                &db,
                &*storage,
                &user_id,
                &task_id,
                "Sudah piket",
                Some(ImageUpload {
                    file_name: format!("bukti-{i}.jpg"),
                    bytes: b"jpeg".to_vec(),
                }),
            )
            .await
        }));
    }

    let mut filed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => filed += 1,
            Err(DomainError::AlreadyClaimed(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(filed, 1);

    let claims = claim_service::list_claims(
        &db,
        ClaimFilter {
            user_id: Some(user.id.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(claims.len(), 1);
    // Losing uploads do not leave their images behind
    assert_eq!(stored_files(&uploads), 1);

    for claim in &claims {
        set_claim_status(&db, &claim.id, accept()).await.unwrap();
    }
    let after = reload_user(&db, &user.id).await;
    assert_eq!((after.point, after.total_point), (250, 250));
}

#[tokio::test]
async fn test_failed_insert_removes_stored_image() {
    let db = setup_db().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalFileStorage::new(dir.path());
    let task = create_task(&db, "Piket", 250).await;

    // No such user, so the insert trips the foreign key after the image is written
    let err = claim_service::upload_task(
        &db,
        &storage,
        "ghost",
        &task.id,
        "Sudah piket",
        Some(ImageUpload {
            file_name: "bukti.jpg".to_string(),
            bytes: b"jpeg".to_vec(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Database(_)));
    assert_eq!(stored_files(dir.path()), 0);
}
