//! End-to-end join workflow tests
//!
//! Exercises the full path: admin service creates a queue in SQLite,
//! participants join through the transactional join service.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use waitline_core::application::{CreateQueueRequest, JoinService, QueueAdminService};
use waitline_core::domain::{JoinRejection, JoinRequest, WaitTimeEstimator};
use waitline_core::error::AppError;
use waitline_core::port::id_provider::UuidProvider;
use waitline_core::port::{IdProvider, TimeProvider};
use waitline_infra_sqlite::{create_pool, run_migrations, SqliteQueueRepository};

/// Controllable clock for expiry-boundary tests
struct FixedTimeProvider {
    now: AtomicI64,
}

impl FixedTimeProvider {
    fn at(now_millis: i64) -> Arc<Self> {
        Arc::new(Self {
            now: AtomicI64::new(now_millis),
        })
    }

    fn set(&self, now_millis: i64) {
        self.now.store(now_millis, Ordering::SeqCst);
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

struct Fixture {
    admin: QueueAdminService,
    join: JoinService,
    time: Arc<FixedTimeProvider>,
}

async fn setup(now_millis: i64) -> Fixture {
    let pool = create_pool(":memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let time = FixedTimeProvider::at(now_millis);
    let ids: Arc<dyn IdProvider> = Arc::new(UuidProvider);
    let repo = Arc::new(SqliteQueueRepository::new(pool));

    let admin = QueueAdminService::new(
        repo.clone(),
        ids.clone(),
        time.clone(),
        "http://127.0.0.1:3000",
    );
    let join = JoinService::new(repo, ids, time.clone(), WaitTimeEstimator::default());

    Fixture { admin, join, time }
}

async fn create_queue(fixture: &Fixture, capacity: i64, expires_at: i64) -> String {
    let queue = fixture
        .admin
        .create_queue(
            &"owner-1".to_string(),
            CreateQueueRequest {
                name: "Clinic".to_string(),
                organization: "Community Health".to_string(),
                capacity,
                expires_at,
                description: "Walk-in".to_string(),
            },
        )
        .await
        .unwrap();
    queue.token
}

fn join_request(name: &str, phone: &str) -> JoinRequest {
    JoinRequest {
        name: name.to_string(),
        phone: phone.to_string(),
    }
}

#[tokio::test]
async fn sequential_joins_get_increasing_positions_and_waits() {
    let fixture = setup(1_000).await;
    let token = create_queue(&fixture, 10, 100_000).await;

    let alice = fixture
        .join
        .join(&token, join_request("Alice", "555-0101"))
        .await
        .unwrap();
    let bob = fixture
        .join
        .join(&token, join_request("Bob", "555-0102"))
        .await
        .unwrap();
    let carol = fixture
        .join
        .join(&token, join_request("Carol", "555-0103"))
        .await
        .unwrap();

    assert_eq!(alice.participant.position, 1);
    assert_eq!(bob.participant.position, 2);
    assert_eq!(carol.participant.position, 3);

    assert_eq!(alice.participant.estimated_wait_minutes, 5);
    assert_eq!(bob.participant.estimated_wait_minutes, 10);
    assert_eq!(carol.participant.estimated_wait_minutes, 15);

    assert_eq!(carol.current_size, 3);
    assert_eq!(carol.capacity, 10);
}

#[tokio::test]
async fn duplicate_phone_is_rejected_and_state_unchanged() {
    let fixture = setup(1_000).await;
    let token = create_queue(&fixture, 10, 100_000).await;

    fixture
        .join
        .join(&token, join_request("Alice", "555-0101"))
        .await
        .unwrap();

    // Same phone, different name: still a duplicate
    let err = fixture
        .join
        .join(&token, join_request("Alicia", "555-0101"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::JoinRejected(JoinRejection::AlreadyJoined)
    ));

    // Retrying is idempotent: same rejection, no extra rows
    let err = fixture
        .join
        .join(&token, join_request("Alice", "555-0101"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::JoinRejected(JoinRejection::AlreadyJoined)
    ));

    let bob = fixture
        .join
        .join(&token, join_request("Bob", "555-0102"))
        .await
        .unwrap();
    assert_eq!(bob.participant.position, 2);
    assert_eq!(bob.current_size, 2);
}

#[tokio::test]
async fn full_queue_rejects_new_joins() {
    let fixture = setup(1_000).await;
    let token = create_queue(&fixture, 2, 100_000).await;

    fixture
        .join
        .join(&token, join_request("Alice", "555-0101"))
        .await
        .unwrap();
    let bob = fixture
        .join
        .join(&token, join_request("Bob", "555-0102"))
        .await
        .unwrap();
    assert_eq!(bob.current_size, 2);

    let err = fixture
        .join
        .join(&token, join_request("Carol", "555-0103"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::JoinRejected(JoinRejection::QueueFull)
    ));
}

#[tokio::test]
async fn expiry_is_checked_against_the_clock() {
    let fixture = setup(1_000).await;
    let token = create_queue(&fixture, 10, 50_000).await;

    // One millisecond before expiry: allowed
    fixture.time.set(49_999);
    fixture
        .join
        .join(&token, join_request("Alice", "555-0101"))
        .await
        .unwrap();

    // Exactly at expiry: rejected
    fixture.time.set(50_000);
    let err = fixture
        .join
        .join(&token, join_request("Dan", "555-0104"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::JoinRejected(JoinRejection::QueueExpired)
    ));
}

#[tokio::test]
async fn expiry_takes_precedence_over_capacity_and_duplicates() {
    let fixture = setup(1_000).await;
    let token = create_queue(&fixture, 1, 50_000).await;

    fixture
        .join
        .join(&token, join_request("Alice", "555-0101"))
        .await
        .unwrap();

    // Queue is now both full and (after the clock moves) expired.
    // Expiry must win, even for the already-enrolled phone.
    fixture.time.set(60_000);
    let err = fixture
        .join
        .join(&token, join_request("Alice", "555-0101"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::JoinRejected(JoinRejection::QueueExpired)
    ));
}

#[tokio::test]
async fn blank_input_is_rejected_before_anything_else() {
    let fixture = setup(1_000).await;

    // Token does not even need to exist: validation comes first
    let err = fixture
        .join
        .join("no-such-token", join_request("   ", "555-0101"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::JoinRejected(JoinRejection::InvalidInput)
    ));

    let err = fixture
        .join
        .join("no-such-token", join_request("Alice", ""))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::JoinRejected(JoinRejection::InvalidInput)
    ));
}

#[tokio::test]
async fn unknown_token_is_not_found() {
    let fixture = setup(1_000).await;

    let err = fixture
        .join
        .join("no-such-token", join_request("Alice", "555-0101"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn rejection_messages_are_stable() {
    // These strings are shown verbatim to participants
    assert_eq!(
        JoinRejection::InvalidInput.to_string(),
        "Name and phone are required"
    );
    assert_eq!(JoinRejection::QueueExpired.to_string(), "Queue has expired");
    assert_eq!(JoinRejection::QueueFull.to_string(), "Queue is full");
    assert_eq!(
        JoinRejection::AlreadyJoined.to_string(),
        "You are already in this queue"
    );
}
