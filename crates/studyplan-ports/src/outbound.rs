use async_trait::async_trait;
use chrono::{DateTime, Utc};

use studyplan_core::allocation::{Allocation, NewAllocation};
use studyplan_core::events::DomainEvent;
use studyplan_core::goal::{Goal, NewGoal};
use studyplan_core::ids::{AllocationId, UserId};

use crate::error::{AuthError, PortError};
use crate::types::Insertion;

#[async_trait]
pub trait AllocationRepository: Send + Sync {
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Allocation>, PortError>;
    /// Allocations whose start lies in `[from, to)`, ordered by start.
    async fn list_for_user_between(
        &self,
        user_id: &UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Allocation>, PortError>;
    /// Stores the allocation unless it overlaps one of the user's slots or
    /// references a goal the user does not own.
    async fn insert(&self, allocation: &NewAllocation) -> Result<Insertion, PortError>;
    async fn find_by_id(&self, id: AllocationId) -> Result<Option<Allocation>, PortError>;
    async fn save_completion(&self, allocation: &Allocation) -> Result<(), PortError>;
}

#[async_trait]
pub trait GoalRepository: Send + Sync {
    async fn create(&self, goal: &NewGoal) -> Result<Goal, PortError>;
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Goal>, PortError>;
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), PortError>;
}

/// Resolves a bearer credential issued by the external identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, bearer: &str) -> Result<UserId, AuthError>;
}
