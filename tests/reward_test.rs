mod common;

use common::{create_reward, create_user, reload_user, setup_db};
use tugaskita::domain::{DomainError, RewardInput};
use tugaskita::infrastructure::SeaOrmRewardRepository;
use sea_orm::{ActiveModelTrait, Set};
use tugaskita::models::{reward, PointKind, ReviewStatus};
use tugaskita::services::{ledger, reward_service};

#[tokio::test]
async fn test_request_debits_total_point_and_reject_refunds() {
    let db = setup_db().await;
    let user = create_user(&db, "Siti", None, 40, 1000).await;
    let reward = create_reward(&db, "Pulpen", 300, 5).await;

    let request = reward_service::request_redemption(&db, &user.id, &reward.id, 2)
        .await
        .expect("request failed");
    assert_eq!(request.status, ReviewStatus::Pending);
    assert_eq!(request.total_price, 600);

    let after_request = reload_user(&db, &user.id).await;
    assert_eq!(after_request.total_point, 400);
    assert_eq!(after_request.point, 40);

    let rejected = reward_service::resolve_redemption(&db, &request.id, ReviewStatus::Rejected)
        .await
        .unwrap();
    assert_eq!(rejected.status, ReviewStatus::Rejected);

    let after_reject = reload_user(&db, &user.id).await;
    assert_eq!(after_reject.total_point, 1000);
    assert!(ledger::history_for_user(&db, &user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_accept_keeps_debit_and_appends_one_history_row() {
    let db = setup_db().await;
    let user = create_user(&db, "Budi", None, 0, 1000).await;
    let reward = create_reward(&db, "Pulpen", 300, 5).await;

    let request = reward_service::request_redemption(&db, &user.id, &reward.id, 2)
        .await
        .unwrap();
    reward_service::resolve_redemption(&db, &request.id, ReviewStatus::Accepted)
        .await
        .unwrap();

    let after = reload_user(&db, &user.id).await;
    assert_eq!(after.total_point, 400);

    let history = ledger::history_for_user(&db, &user.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, PointKind::Reward);
    assert_eq!(history[0].label, "Change 2 Pulpen");
    assert_eq!(history[0].point, -600);
}

#[tokio::test]
async fn test_resolution_happens_once() {
    let db = setup_db().await;
    let user = create_user(&db, "Rina", None, 0, 500).await;
    let reward = create_reward(&db, "Buku", 100, 3).await;

    let request = reward_service::request_redemption(&db, &user.id, &reward.id, 1)
        .await
        .unwrap();
    reward_service::resolve_redemption(&db, &request.id, ReviewStatus::Rejected)
        .await
        .unwrap();

    let err = reward_service::resolve_redemption(&db, &request.id, ReviewStatus::Rejected)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AlreadyResolved(_)));

    // Refunded exactly once
    assert_eq!(reload_user(&db, &user.id).await.total_point, 500);
}

#[tokio::test]
async fn test_insufficient_balance_leaves_everything_untouched() {
    let db = setup_db().await;
    let user = create_user(&db, "Dewi", None, 0, 500).await;
    let reward = create_reward(&db, "Tas", 300, 5).await;

    let err = reward_service::request_redemption(&db, &user.id, &reward.id, 2)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::InsufficientBalance {
            required: 600,
            available: 500
        }
    ));

    assert_eq!(reload_user(&db, &user.id).await.total_point, 500);
    assert!(reward_service::list_requests(&db, Some(user.id.as_str()))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_out_of_stock_and_bad_amount() {
    let db = setup_db().await;
    let user = create_user(&db, "Andi", None, 0, 1000).await;
    let empty = create_reward(&db, "Habis", 10, 0).await;
    let stocked = create_reward(&db, "Ada", 10, 1).await;

    let err = reward_service::request_redemption(&db, &user.id, &empty.id, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::OutOfStock));

    let err = reward_service::request_redemption(&db, &user.id, &stocked.id, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = reward_service::request_redemption(&db, &user.id, "missing", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound("reward")));
}

#[tokio::test]
async fn test_catalog_crud_through_repository() {
    let db = setup_db().await;
    let repo = SeaOrmRewardRepository::new(db.clone());

    let created = reward_service::create_reward(
        &repo,
        RewardInput {
            name: "  Stiker ".to_string(),
            stock: 10,
            price: 50,
            image: Some("/uploads/stiker.png".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(created.name, "Stiker");

    let updated = reward_service::update_reward(
        &repo,
        &created.id,
        RewardInput {
            name: "Stiker".to_string(),
            stock: 8,
            price: 60,
            image: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.stock, 8);
    assert_eq!(updated.image.as_deref(), Some("/uploads/stiker.png"));

    let err = reward_service::create_reward(
        &repo,
        RewardInput {
            name: "".to_string(),
            stock: 1,
            price: 1,
            image: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    reward_service::delete_reward(&repo, &created.id).await.unwrap();
    let err = reward_service::get_reward(&repo, &created.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound("reward")));
}

#[tokio::test]
async fn test_resolution_rechecks_stock_and_changes_nothing_when_empty() {
    let db = setup_db().await;
    let user = create_user(&db, "Wati", None, 0, 1000).await;
    let pulpen = create_reward(&db, "Pulpen", 300, 1).await;

    let request = reward_service::request_redemption(&db, &user.id, &pulpen.id, 2)
        .await
        .unwrap();
    assert_eq!(reload_user(&db, &user.id).await.total_point, 400);

    let mut emptied: reward::ActiveModel = pulpen.clone().into();
    emptied.stock = Set(0);
    emptied.update(&db).await.unwrap();

    for decision in [ReviewStatus::Accepted, ReviewStatus::Rejected] {
        let err = reward_service::resolve_redemption(&db, &request.id, decision)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::OutOfStock));
    }

    let still = reward_service::get_request(&db, &request.id).await.unwrap();
    assert_eq!(still.status, ReviewStatus::Pending);
    assert_eq!(reload_user(&db, &user.id).await.total_point, 400);
    assert!(ledger::history_for_user(&db, &user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reward_with_pending_requests_cannot_be_deleted() {
    let db = setup_db().await;
    let repo = SeaOrmRewardRepository::new(db.clone());
    let user = create_user(&db, "Yusuf", None, 0, 1000).await;
    let pulpen = create_reward(&db, "Pulpen", 300, 5).await;

    let request = reward_service::request_redemption(&db, &user.id, &pulpen.id, 2)
        .await
        .unwrap();

    let err = reward_service::delete_reward(&repo, &pulpen.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    // Escrow is intact and the request can still be refunded
    assert_eq!(reload_user(&db, &user.id).await.total_point, 400);
    reward_service::resolve_redemption(&db, &request.id, ReviewStatus::Rejected)
        .await
        .unwrap();
    assert_eq!(reload_user(&db, &user.id).await.total_point, 1000);

    reward_service::delete_reward(&repo, &pulpen.id).await.unwrap();
    let kept = reward_service::get_request(&db, &request.id).await.unwrap();
    assert_eq!(kept.status, ReviewStatus::Rejected);
    assert_eq!(kept.total_price, 600);
}
