// Queue Domain Model

use crate::domain::error::{DomainError, JoinRejection};
use crate::domain::participant::{Participant, ParticipantId};
use crate::domain::wait_time::WaitTimeEstimator;
use serde::{Deserialize, Serialize};

/// Queue ID (UUID v4)
pub type QueueId = String;

/// Public join token (UUID v4), distinct from the internal id
pub type QueueToken = String;

/// Externally-authenticated principal that owns a queue
pub type OwnerId = String;

/// A join request as supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    pub name: String,
    pub phone: String,
}

/// Successful join decision: the participant to append plus the queue
/// occupancy the caller reports back
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub participant: Participant,
    pub current_size: i64,
    pub capacity: i64,
}

/// A named, owner-managed waiting line with a capacity and expiry.
///
/// Participants are exclusively owned by their queue (no cross-queue
/// identity) and ordered by join time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Queue {
    pub id: QueueId,
    pub token: QueueToken,
    pub owner_id: OwnerId,

    pub name: String,
    pub organization: String,
    pub description: String,

    /// Maximum concurrent participants, >= 1
    pub capacity: i64,
    /// Epoch ms; joins at or after this instant are rejected
    pub expires_at: i64,

    /// Public join link ({base}/join/{token}), set at creation
    pub join_url: Option<String>,

    pub created_at: i64,
    pub updated_at: i64,

    pub participants: Vec<Participant>,
}

#[allow(clippy::too_many_arguments)]
impl Queue {
    /// Create a new queue
    ///
    /// # Arguments
    ///
    /// * `id` - Unique queue ID (injected, not generated)
    /// * `token` - Public join token (injected, not generated)
    /// * `created_at` - Creation timestamp in epoch ms (injected, not system time)
    pub fn new(
        id: impl Into<String>,
        token: impl Into<String>,
        owner_id: impl Into<String>,
        name: impl Into<String>,
        organization: impl Into<String>,
        description: impl Into<String>,
        capacity: i64,
        expires_at: i64,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            token: token.into(),
            owner_id: owner_id.into(),
            name: name.into(),
            organization: organization.into(),
            description: description.into(),
            capacity,
            expires_at,
            join_url: None,
            created_at,
            updated_at: created_at,
            participants: Vec::new(),
        }
    }

    /// Create a test queue with deterministic ID, token and timestamps.
    ///
    /// Uses a simple counter for deterministic test IDs (queue-1, queue-2, ...).
    ///
    /// **Note**: This method should only be used in tests. For production
    /// code, always inject IDs and time via providers.
    pub fn new_test(capacity: i64, expires_at: i64) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        Self::new(
            format!("queue-{}", counter),
            format!("token-{}", counter),
            "owner-1",
            "Test Queue",
            "Test Org",
            "A queue for tests",
            capacity,
            expires_at,
            1000,
        )
    }

    /// Number of enrolled participants
    pub fn current_size(&self) -> i64 {
        self.participants.len() as i64
    }

    /// Whether the queue has reached capacity
    pub fn is_full(&self) -> bool {
        self.current_size() >= self.capacity
    }

    /// Whether the queue no longer accepts joins at `now_millis`.
    ///
    /// The boundary instant counts as expired.
    pub fn is_expired(&self, now_millis: i64) -> bool {
        now_millis >= self.expires_at
    }

    /// Look up a participant enrolled with the given phone number
    pub fn participant_by_phone(&self, phone: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.phone == phone)
    }

    /// Decide whether a join request succeeds against this snapshot.
    ///
    /// Pure decision function: no side effects, no writes. The caller is
    /// responsible for persisting the returned participant atomically against
    /// a freshly-loaded snapshot (see `application::join`).
    ///
    /// Validation order is part of the contract (first failing check wins):
    /// input fields, expiry, capacity, duplicate phone.
    pub fn attempt_join(
        &self,
        participant_id: impl Into<String>,
        now_millis: i64,
        estimator: &WaitTimeEstimator,
        request: &JoinRequest,
    ) -> std::result::Result<JoinOutcome, JoinRejection> {
        if request.name.trim().is_empty() || request.phone.trim().is_empty() {
            return Err(JoinRejection::InvalidInput);
        }

        if self.is_expired(now_millis) {
            return Err(JoinRejection::QueueExpired);
        }

        if self.is_full() {
            return Err(JoinRejection::QueueFull);
        }

        if self.participant_by_phone(&request.phone).is_some() {
            return Err(JoinRejection::AlreadyJoined);
        }

        let position = self.current_size() + 1;
        let participant = Participant::new(
            participant_id,
            request.name.clone(),
            request.phone.clone(),
            position,
            now_millis,
            estimator.estimate(position),
        );

        Ok(JoinOutcome {
            participant,
            current_size: position,
            capacity: self.capacity,
        })
    }

    fn participant_mut(
        &mut self,
        participant_id: &str,
    ) -> crate::domain::error::Result<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| p.id == participant_id)
            .ok_or_else(|| DomainError::ParticipantNotFound(participant_id.to_string()))
    }

    /// Mark a participant as currently being served (WAITING -> CURRENT)
    pub fn mark_current(
        &mut self,
        participant_id: &ParticipantId,
        now_millis: i64,
    ) -> crate::domain::error::Result<Participant> {
        let participant = self.participant_mut(participant_id)?;
        participant.mark_current(now_millis)?;
        Ok(participant.clone())
    }

    /// Skip a participant (WAITING|CURRENT -> SKIPPED)
    pub fn skip(
        &mut self,
        participant_id: &ParticipantId,
        now_millis: i64,
    ) -> crate::domain::error::Result<Participant> {
        let participant = self.participant_mut(participant_id)?;
        participant.skip(now_millis)?;
        Ok(participant.clone())
    }

    /// Mark a participant as served (any status -> SERVED)
    pub fn serve(
        &mut self,
        participant_id: &ParticipantId,
        now_millis: i64,
    ) -> crate::domain::error::Result<Participant> {
        let participant = self.participant_mut(participant_id)?;
        participant.serve(now_millis);
        Ok(participant.clone())
    }

    /// Delete a participant from the queue, regardless of status.
    ///
    /// Remaining participants keep their original `position` values.
    pub fn remove(
        &mut self,
        participant_id: &ParticipantId,
    ) -> crate::domain::error::Result<Participant> {
        let idx = self
            .participants
            .iter()
            .position(|p| &p.id == participant_id)
            .ok_or_else(|| DomainError::ParticipantNotFound(participant_id.to_string()))?;
        Ok(self.participants.remove(idx))
    }
}
