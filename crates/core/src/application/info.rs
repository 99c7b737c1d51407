// Public Queue Info Projection

use crate::domain::{Queue, WaitTimeEstimator};
use serde::Serialize;

/// What the public join page sees: display fields plus, when a phone was
/// supplied, that phone's enrollment state.
///
/// Expired or full queues still answer; the flags say so. Rejection happens
/// at join time.
#[derive(Debug, Clone, Serialize)]
pub struct QueueInfo {
    pub name: String,
    pub organization: String,
    pub description: String,
    pub queue_size: i64,
    pub current_size: i64,
    pub is_full: bool,
    pub expires_at: i64,

    pub is_in_queue: bool,
    pub position: Option<i64>,
    pub estimated_wait_minutes: Option<i64>,
}

/// Project a queue snapshot into its public view
pub fn queue_info(queue: &Queue, phone: Option<&str>, estimator: &WaitTimeEstimator) -> QueueInfo {
    let enrolled = phone.and_then(|p| queue.participant_by_phone(p));

    QueueInfo {
        name: queue.name.clone(),
        organization: queue.organization.clone(),
        description: queue.description.clone(),
        queue_size: queue.capacity,
        current_size: queue.current_size(),
        is_full: queue.is_full(),
        expires_at: queue.expires_at,
        is_in_queue: enrolled.is_some(),
        position: enrolled.map(|p| p.position),
        estimated_wait_minutes: enrolled.map(|p| estimator.estimate(p.position)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Participant;

    #[test]
    fn test_info_without_phone() {
        let mut queue = Queue::new_test(3, 1_000_000);
        queue
            .participants
            .push(Participant::new("p1", "A", "111", 1, 1000, 5));

        let info = queue_info(&queue, None, &WaitTimeEstimator::default());
        assert_eq!(info.queue_size, 3);
        assert_eq!(info.current_size, 1);
        assert!(!info.is_full);
        assert!(!info.is_in_queue);
        assert_eq!(info.position, None);
    }

    #[test]
    fn test_info_with_enrolled_phone() {
        let mut queue = Queue::new_test(3, 1_000_000);
        queue
            .participants
            .push(Participant::new("p1", "A", "111", 1, 1000, 5));
        queue
            .participants
            .push(Participant::new("p2", "B", "222", 2, 2000, 10));

        let info = queue_info(&queue, Some("222"), &WaitTimeEstimator::default());
        assert!(info.is_in_queue);
        assert_eq!(info.position, Some(2));
        assert_eq!(info.estimated_wait_minutes, Some(10));
    }

    #[test]
    fn test_info_with_unknown_phone() {
        let queue = Queue::new_test(3, 1_000_000);
        let info = queue_info(&queue, Some("999"), &WaitTimeEstimator::default());
        assert!(!info.is_in_queue);
        assert_eq!(info.estimated_wait_minutes, None);
    }

    #[test]
    fn test_full_flag() {
        let mut queue = Queue::new_test(1, 1_000_000);
        queue
            .participants
            .push(Participant::new("p1", "A", "111", 1, 1000, 5));

        let info = queue_info(&queue, None, &WaitTimeEstimator::default());
        assert!(info.is_full);
    }
}
