pub mod slot;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::error::DomainError;
use crate::events::{AllocationCompleted, AllocationScheduled, DomainEvent};
use crate::ids::{AllocationId, GoalId, UserId};

pub use slot::{find_overlap, TimeSlot, MIN_ALLOCATION_MINUTES};

/// A validated candidate that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAllocation {
    user_id: UserId,
    goal_id: GoalId,
    slot: TimeSlot,
}

impl NewAllocation {
    pub fn new(user_id: UserId, goal_id: GoalId, slot: TimeSlot) -> Self {
        Self {
            user_id,
            goal_id,
            slot,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn goal_id(&self) -> GoalId {
        self.goal_id
    }

    pub fn slot(&self) -> &TimeSlot {
        &self.slot
    }

    /// The stored allocation once the store has assigned an id.
    pub fn into_allocation(self, id: AllocationId) -> Allocation {
        Allocation {
            id,
            user_id: self.user_id,
            goal_id: self.goal_id,
            slot: self.slot,
            completion: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    description: String,
    completed_at: DateTime<Utc>,
}

impl Completion {
    pub fn new(description: String, completed_at: DateTime<Utc>) -> Self {
        Self {
            description,
            completed_at,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    id: AllocationId,
    user_id: UserId,
    goal_id: GoalId,
    slot: TimeSlot,
    completion: Option<Completion>,
}

impl Allocation {
    /// Rebuilds a stored allocation.
    pub fn restore(
        id: AllocationId,
        user_id: UserId,
        goal_id: GoalId,
        slot: TimeSlot,
        completion: Option<Completion>,
    ) -> Self {
        Self {
            id,
            user_id,
            goal_id,
            slot,
            completion,
        }
    }

    pub fn scheduled_event(&self, now: DateTime<Utc>) -> DomainEvent {
        DomainEvent::AllocationScheduled(AllocationScheduled {
            allocation_id: self.id,
            user_id: self.user_id.clone(),
            goal_id: self.goal_id,
            start: self.slot.start(),
            end: self.slot.end(),
            occurred_at: now,
        })
    }

    /// Marks the allocation done. Slot and goal are left untouched.
    pub fn complete(
        &mut self,
        description: String,
        now: DateTime<Utc>,
    ) -> Result<Vec<DomainEvent>, DomainError> {
        if self.completion.is_some() {
            return Err(DomainError::AlreadyCompleted);
        }
        self.completion = Some(Completion::new(description, now));
        Ok(vec![DomainEvent::AllocationCompleted(AllocationCompleted {
            allocation_id: self.id,
            user_id: self.user_id.clone(),
            occurred_at: now,
        })])
    }

    pub fn id(&self) -> AllocationId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    pub fn goal_id(&self) -> GoalId {
        self.goal_id
    }

    pub fn slot(&self) -> &TimeSlot {
        &self.slot
    }

    pub fn is_completed(&self) -> bool {
        self.completion.is_some()
    }

    pub fn completion(&self) -> Option<&Completion> {
        self.completion.as_ref()
    }
}

impl Serialize for Allocation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct Record<'a> {
            id: AllocationId,
            user_id: &'a UserId,
            goal_id: GoalId,
            #[serde(flatten)]
            slot: &'a TimeSlot,
            completed: bool,
            completion_description: Option<&'a str>,
            completed_at: Option<DateTime<Utc>>,
        }

        Record {
            id: self.id,
            user_id: &self.user_id,
            goal_id: self.goal_id,
            slot: &self.slot,
            completed: self.is_completed(),
            completion_description: self.completion.as_ref().map(Completion::description),
            completed_at: self.completion.as_ref().map(Completion::completed_at),
        }
        .serialize(serializer)
    }
}
