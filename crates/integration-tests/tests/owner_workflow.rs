//! Owner management workflow tests
//!
//! Covers queue CRUD, ownership checks, participant actions and
//! expired-queue maintenance against a real SQLite database.

use std::sync::Arc;

use waitline_core::application::{
    CreateQueueRequest, JoinService, ParticipantAction, QueueAdminService, UpdateQueueRequest,
};
use waitline_core::domain::{JoinRequest, ParticipantStatus, WaitTimeEstimator};
use waitline_core::error::AppError;
use waitline_core::port::id_provider::UuidProvider;
use waitline_core::port::time_provider::SystemTimeProvider;
use waitline_core::port::{IdProvider, Maintenance, QueueRepository, TimeProvider};
use waitline_infra_sqlite::{
    create_pool, run_migrations, SqliteMaintenance, SqliteQueueRepository,
};

const HOUR_MILLIS: i64 = 60 * 60 * 1000;

struct Fixture {
    repo: Arc<SqliteQueueRepository>,
    admin: QueueAdminService,
    join: JoinService,
    maintenance: SqliteMaintenance,
    time: Arc<dyn TimeProvider>,
}

async fn setup() -> Fixture {
    let pool = create_pool(":memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let time: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let ids: Arc<dyn IdProvider> = Arc::new(UuidProvider);
    let repo = Arc::new(SqliteQueueRepository::new(pool.clone()));

    let admin = QueueAdminService::new(
        repo.clone(),
        ids.clone(),
        time.clone(),
        "http://127.0.0.1:3000",
    );
    let join = JoinService::new(
        repo.clone(),
        ids,
        time.clone(),
        WaitTimeEstimator::default(),
    );
    let maintenance = SqliteMaintenance::new(pool, time.clone());

    Fixture {
        repo,
        admin,
        join,
        maintenance,
        time,
    }
}

fn create_request(name: &str) -> CreateQueueRequest {
    CreateQueueRequest {
        name: name.to_string(),
        organization: "Community Health".to_string(),
        capacity: 10,
        expires_at: chrono::Utc::now().timestamp_millis() + HOUR_MILLIS,
        description: "Walk-in".to_string(),
    }
}

#[tokio::test]
async fn create_assigns_token_and_join_url() {
    let fixture = setup().await;

    let queue = fixture
        .admin
        .create_queue(&"owner-1".to_string(), create_request("Clinic"))
        .await
        .unwrap();

    assert!(!queue.token.is_empty());
    assert_ne!(queue.id, queue.token);
    assert_eq!(
        queue.join_url.as_deref(),
        Some(format!("http://127.0.0.1:3000/join/{}", queue.token).as_str())
    );

    let loaded = fixture
        .admin
        .get_queue(&"owner-1".to_string(), &queue.token)
        .await
        .unwrap();
    assert_eq!(loaded.name, "Clinic");
    assert_eq!(loaded.capacity, 10);
}

#[tokio::test]
async fn create_rejects_invalid_fields() {
    let fixture = setup().await;
    let owner = "owner-1".to_string();

    let mut req = create_request("Clinic");
    req.name = "  ".to_string();
    let err = fixture.admin.create_queue(&owner, req).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut req = create_request("Clinic");
    req.capacity = 0;
    let err = fixture.admin.create_queue(&owner, req).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut req = create_request("Clinic");
    req.expires_at = 0;
    let err = fixture.admin.create_queue(&owner, req).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn other_owners_cannot_touch_a_queue() {
    let fixture = setup().await;

    let queue = fixture
        .admin
        .create_queue(&"owner-1".to_string(), create_request("Clinic"))
        .await
        .unwrap();

    let err = fixture
        .admin
        .get_queue(&"owner-2".to_string(), &queue.token)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let err = fixture
        .admin
        .delete_queue(&"owner-2".to_string(), &queue.token)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    // Queue survives the failed delete
    assert!(fixture
        .repo
        .find_by_token(&queue.token)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn list_returns_only_this_owners_queues() {
    let fixture = setup().await;

    fixture
        .admin
        .create_queue(&"owner-1".to_string(), create_request("Clinic A"))
        .await
        .unwrap();
    fixture
        .admin
        .create_queue(&"owner-1".to_string(), create_request("Clinic B"))
        .await
        .unwrap();
    fixture
        .admin
        .create_queue(&"owner-2".to_string(), create_request("Other"))
        .await
        .unwrap();

    let queues = fixture
        .admin
        .list_queues(&"owner-1".to_string())
        .await
        .unwrap();
    assert_eq!(queues.len(), 2);
    assert!(queues.iter().all(|q| q.owner_id == "owner-1"));
}

#[tokio::test]
async fn update_changes_owner_editable_fields() {
    let fixture = setup().await;
    let owner = "owner-1".to_string();

    let queue = fixture
        .admin
        .create_queue(&owner, create_request("Clinic"))
        .await
        .unwrap();

    let new_expiry = chrono::Utc::now().timestamp_millis() + 2 * HOUR_MILLIS;
    let updated = fixture
        .admin
        .update_queue(
            &owner,
            &queue.token,
            UpdateQueueRequest {
                name: "Clinic (moved)".to_string(),
                organization: "County Health".to_string(),
                capacity: 25,
                expires_at: new_expiry,
                description: Some("New entrance".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Clinic (moved)");
    assert_eq!(updated.capacity, 25);
    assert_eq!(updated.expires_at, new_expiry);

    let reloaded = fixture.admin.get_queue(&owner, &queue.token).await.unwrap();
    assert_eq!(reloaded.organization, "County Health");
    assert_eq!(reloaded.description, "New entrance");
}

#[tokio::test]
async fn delete_cascades_to_participants() {
    let fixture = setup().await;
    let owner = "owner-1".to_string();

    let queue = fixture
        .admin
        .create_queue(&owner, create_request("Clinic"))
        .await
        .unwrap();

    for (name, phone) in [("Alice", "555-0101"), ("Bob", "555-0102")] {
        fixture
            .join
            .join(
                &queue.token,
                JoinRequest {
                    name: name.to_string(),
                    phone: phone.to_string(),
                },
            )
            .await
            .unwrap();
    }

    fixture.admin.delete_queue(&owner, &queue.token).await.unwrap();

    assert!(fixture
        .repo
        .find_by_token(&queue.token)
        .await
        .unwrap()
        .is_none());
    let waiting = fixture
        .repo
        .count_participants_by_status(ParticipantStatus::Waiting)
        .await
        .unwrap();
    assert_eq!(waiting, 0);
}

#[tokio::test]
async fn participant_lifecycle_current_then_served() {
    let fixture = setup().await;
    let owner = "owner-1".to_string();

    let queue = fixture
        .admin
        .create_queue(&owner, create_request("Clinic"))
        .await
        .unwrap();
    fixture
        .join
        .join(
            &queue.token,
            JoinRequest {
                name: "Alice".to_string(),
                phone: "555-0101".to_string(),
            },
        )
        .await
        .unwrap();

    let loaded = fixture.admin.get_queue(&owner, &queue.token).await.unwrap();
    let alice_id = loaded.participants[0].id.clone();

    let after_current = fixture
        .admin
        .participant_action(&owner, &queue.token, &alice_id, ParticipantAction::Current)
        .await
        .unwrap();
    let alice = &after_current.participants[0];
    assert_eq!(alice.status, ParticipantStatus::Current);
    assert!(alice.processed_at.is_some());

    let after_served = fixture
        .admin
        .participant_action(&owner, &queue.token, &alice_id, ParticipantAction::Served)
        .await
        .unwrap();
    let alice = &after_served.participants[0];
    assert_eq!(alice.status, ParticipantStatus::Served);
    assert!(alice.served_at.is_some());

    // A served participant can no longer be called up
    let err = fixture
        .admin
        .participant_action(&owner, &queue.token, &alice_id, ParticipantAction::Current)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Domain(_)));
}

#[tokio::test]
async fn removing_a_participant_keeps_other_positions() {
    let fixture = setup().await;
    let owner = "owner-1".to_string();

    let queue = fixture
        .admin
        .create_queue(&owner, create_request("Clinic"))
        .await
        .unwrap();
    for (name, phone) in [
        ("Alice", "555-0101"),
        ("Bob", "555-0102"),
        ("Carol", "555-0103"),
    ] {
        fixture
            .join
            .join(
                &queue.token,
                JoinRequest {
                    name: name.to_string(),
                    phone: phone.to_string(),
                },
            )
            .await
            .unwrap();
    }

    let loaded = fixture.admin.get_queue(&owner, &queue.token).await.unwrap();
    let bob_id = loaded.participants[1].id.clone();

    let after_remove = fixture
        .admin
        .participant_action(&owner, &queue.token, &bob_id, ParticipantAction::Remove)
        .await
        .unwrap();

    // Positions are never renumbered: Alice keeps 1, Carol keeps 3
    let positions: Vec<i64> = after_remove
        .participants
        .iter()
        .map(|p| p.position)
        .collect();
    assert_eq!(positions, vec![1, 3]);

    // Freed capacity is usable again
    assert_eq!(after_remove.current_size(), 2);
}

#[tokio::test]
async fn unknown_participant_action_is_not_found() {
    let fixture = setup().await;
    let owner = "owner-1".to_string();

    let queue = fixture
        .admin
        .create_queue(&owner, create_request("Clinic"))
        .await
        .unwrap();

    let err = fixture
        .admin
        .participant_action(
            &owner,
            &queue.token,
            &"no-such-participant".to_string(),
            ParticipantAction::Skip,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Domain(_)));
}

#[tokio::test]
async fn gc_purges_only_long_expired_queues() {
    let fixture = setup().await;
    let owner = "owner-1".to_string();
    let now = fixture.time.now_millis();

    // Expired 10 days ago: past the 7-day retention window
    let mut stale = create_request("Stale");
    stale.expires_at = now - 10 * 24 * HOUR_MILLIS;
    fixture.admin.create_queue(&owner, stale).await.unwrap();

    // Expired yesterday: still within retention
    let mut recent = create_request("Recent");
    recent.expires_at = now - 24 * HOUR_MILLIS;
    fixture.admin.create_queue(&owner, recent).await.unwrap();

    // Still active
    fixture
        .admin
        .create_queue(&owner, create_request("Active"))
        .await
        .unwrap();

    let deleted = fixture.maintenance.gc_expired_queues(7, now).await.unwrap();
    assert_eq!(deleted, 1);

    let stats = fixture.maintenance.get_stats().await.unwrap();
    assert_eq!(stats.queue_count, 2);
    assert_eq!(stats.expired_queue_count, 1);
}
