// Join Use Case

use crate::domain::{JoinOutcome, JoinRejection, JoinRequest, WaitTimeEstimator};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, TimeProvider, TransactionalQueueRepository};
use std::sync::Arc;

/// Validate caller-supplied identity fields.
///
/// Runs before any storage round-trip: input errors win over expiry,
/// capacity and duplicate checks (first-failing-check contract).
fn validate_request(req: &JoinRequest) -> std::result::Result<(), JoinRejection> {
    if req.name.trim().is_empty() || req.phone.trim().is_empty() {
        return Err(JoinRejection::InvalidInput);
    }
    Ok(())
}

/// Execute the join use case (with transaction for atomicity).
///
/// The queue is loaded and re-validated inside the transaction, so the
/// check-then-act window between "read occupancy" and "append participant"
/// is closed: concurrent joins serialize on the storage write lock and the
/// second one re-reads a snapshot that already contains the first.
///
/// # Arguments
///
/// * `queue_repo` - Transactional queue repository
/// * `id_provider` - Participant ID generator (injected for determinism)
/// * `time_provider` - Time provider (injected for determinism)
/// * `estimator` - Wait-time estimator
/// * `token` - Public join token addressing the queue
/// * `req` - Join request (name + phone)
pub async fn execute(
    queue_repo: &dyn TransactionalQueueRepository,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    estimator: &WaitTimeEstimator,
    token: &str,
    req: JoinRequest,
) -> Result<JoinOutcome> {
    validate_request(&req)?;

    let mut tx = queue_repo.begin_transaction().await?;

    let queue = tx
        .find_by_token(token)
        .await?
        .ok_or_else(|| AppError::NotFound("Queue not found".to_string()))?;

    let participant_id = id_provider.generate_id();
    let now = time_provider.now_millis();

    // Dropping the transaction on the rejection path rolls it back
    let outcome = queue.attempt_join(participant_id, now, estimator, &req)?;

    tx.insert_participant(&queue.id, &outcome.participant).await?;
    tx.commit().await?;

    tracing::info!(
        queue_id = %queue.id,
        position = outcome.participant.position,
        current_size = outcome.current_size,
        "Participant joined queue"
    );

    Ok(outcome)
}

/// Join Service
pub struct JoinService {
    queue_repo: Arc<dyn TransactionalQueueRepository>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    estimator: WaitTimeEstimator,
}

impl JoinService {
    pub fn new(
        queue_repo: Arc<dyn TransactionalQueueRepository>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        estimator: WaitTimeEstimator,
    ) -> Self {
        Self {
            queue_repo,
            id_provider,
            time_provider,
            estimator,
        }
    }

    /// Join the queue addressed by `token`
    pub async fn join(&self, token: &str, req: JoinRequest) -> Result<JoinOutcome> {
        execute(
            self.queue_repo.as_ref(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            &self.estimator,
            token,
            req,
        )
        .await
    }
}
