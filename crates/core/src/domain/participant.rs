// Participant Domain Model

use serde::{Deserialize, Serialize};

/// Participant ID (UUID v4)
pub type ParticipantId = String;

/// Participant status within a queue
///
/// `WAITING -> CURRENT -> SERVED`, with a side branch `WAITING -> SKIPPED`.
/// Removal is not a status: a removed participant is deleted outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantStatus {
    Waiting,
    Current,
    Skipped,
    Served,
}

impl std::fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParticipantStatus::Waiting => write!(f, "WAITING"),
            ParticipantStatus::Current => write!(f, "CURRENT"),
            ParticipantStatus::Skipped => write!(f, "SKIPPED"),
            ParticipantStatus::Served => write!(f, "SERVED"),
        }
    }
}

/// One person's enrollment record within a queue.
///
/// `position` is assigned once at join time and never renumbered when other
/// participants are skipped or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub phone: String,

    /// 1-based rank at join time
    pub position: i64,
    pub status: ParticipantStatus,

    pub joined_at: i64, // epoch ms
    /// Minutes, computed from `position` at join time; immutable once set
    pub estimated_wait_minutes: i64,

    // Set by owner actions
    pub processed_at: Option<i64>,
    pub skipped_at: Option<i64>,
    pub served_at: Option<i64>,
}

impl Participant {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        phone: impl Into<String>,
        position: i64,
        joined_at: i64,
        estimated_wait_minutes: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: phone.into(),
            position,
            status: ParticipantStatus::Waiting,
            joined_at,
            estimated_wait_minutes,
            processed_at: None,
            skipped_at: None,
            served_at: None,
        }
    }

    /// Transition WAITING -> CURRENT with explicit timestamp
    ///
    /// Note: this does not demote any other CURRENT participant; calling it
    /// for several participants yields several CURRENT entries (preserved
    /// product behavior, see DESIGN.md).
    pub fn mark_current(&mut self, now_millis: i64) -> crate::domain::error::Result<()> {
        if self.status != ParticipantStatus::Waiting {
            return Err(crate::domain::error::DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: "CURRENT".to_string(),
            });
        }
        self.status = ParticipantStatus::Current;
        self.processed_at = Some(now_millis);
        Ok(())
    }

    /// Transition WAITING|CURRENT -> SKIPPED with explicit timestamp
    pub fn skip(&mut self, now_millis: i64) -> crate::domain::error::Result<()> {
        match self.status {
            ParticipantStatus::Waiting | ParticipantStatus::Current => {
                self.status = ParticipantStatus::Skipped;
                self.skipped_at = Some(now_millis);
                Ok(())
            }
            _ => Err(crate::domain::error::DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: "SKIPPED".to_string(),
            }),
        }
    }

    /// Transition any status -> SERVED with explicit timestamp
    pub fn serve(&mut self, now_millis: i64) {
        self.status = ParticipantStatus::Served;
        self.served_at = Some(now_millis);
    }
}
