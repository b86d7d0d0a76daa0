use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ids::{AllocationId, GoalId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DomainEvent {
    AllocationScheduled(AllocationScheduled),
    AllocationCompleted(AllocationCompleted),
}

impl DomainEvent {
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::AllocationScheduled(e) => e.occurred_at,
            Self::AllocationCompleted(e) => e.occurred_at,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Self::AllocationScheduled(_) => "allocation.scheduled",
            Self::AllocationCompleted(_) => "allocation.completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationScheduled {
    pub allocation_id: AllocationId,
    pub user_id: UserId,
    pub goal_id: GoalId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationCompleted {
    pub allocation_id: AllocationId,
    pub user_id: UserId,
    pub occurred_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        chrono::DateTime::parse_from_rfc3339("2024-06-16T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn event_types_are_unique_per_variant() {
        let allocation_id = AllocationId::new(1).unwrap();
        let user_id = UserId::new();
        let events = [
            DomainEvent::AllocationScheduled(AllocationScheduled {
                allocation_id,
                user_id: user_id.clone(),
                goal_id: GoalId::new(1).unwrap(),
                start: now(),
                end: now() + chrono::Duration::hours(1),
                occurred_at: now(),
            }),
            DomainEvent::AllocationCompleted(AllocationCompleted {
                allocation_id,
                user_id,
                occurred_at: now(),
            }),
        ];

        let mut unique = std::collections::HashSet::new();
        for event in &events {
            let t = event.event_type();
            assert!(t.starts_with("allocation."), "unexpected prefix: {t}");
            assert!(unique.insert(t), "duplicate event type: {t}");
        }
        assert_eq!(unique.len(), events.len());
    }

    #[test]
    fn completed_event_references_owner() {
        let user_id = UserId::new();
        let event = DomainEvent::AllocationCompleted(AllocationCompleted {
            allocation_id: AllocationId::new(5).unwrap(),
            user_id: user_id.clone(),
            occurred_at: now(),
        });
        assert_eq!(event.event_type(), "allocation.completed");
        assert_eq!(event.occurred_at(), now());
        if let DomainEvent::AllocationCompleted(e) = &event {
            assert_eq!(e.user_id, user_id);
        }
    }
}
