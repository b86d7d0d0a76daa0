use std::collections::HashMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use studyplan_core::allocation::{find_overlap, Allocation, NewAllocation, TimeSlot};
use studyplan_core::error::DomainError;
use studyplan_core::events::DomainEvent;
use studyplan_core::ids::{AllocationId, GoalId, UserId};
use studyplan_core::time;
use studyplan_ports::error::PortError;
use studyplan_ports::outbound::{AllocationRepository, EventPublisher, GoalRepository};
use studyplan_ports::types::{AllocationView, GoalSummary, Insertion};

use crate::error::AppError;
use crate::user_locks::UserLocks;

/// Longest listing window, in days.
pub const MAX_LISTING_DAYS: u32 = 31;

/// Wall-clock description of a new allocation, as submitted by the user.
#[derive(Debug, Clone)]
pub struct AllocationRequest {
    pub goal_id: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Default)]
pub struct AllocationQuery {
    pub date: Option<String>,
    pub days: Option<u32>,
}

pub struct AllocationService<A, G, EP>
where
    A: AllocationRepository,
    G: GoalRepository,
    EP: EventPublisher,
{
    allocations: A,
    goals: G,
    events: EP,
    locks: UserLocks,
}

impl<A, G, EP> AllocationService<A, G, EP>
where
    A: AllocationRepository,
    G: GoalRepository,
    EP: EventPublisher,
{
    pub fn new(allocations: A, goals: G, events: EP) -> Self {
        Self {
            allocations,
            goals,
            events,
            locks: UserLocks::new(),
        }
    }

    /// Validates the request, then commits it unless it overlaps one of the
    /// user's existing allocations.
    pub async fn create_allocation(
        &self,
        user_id: &UserId,
        request: &AllocationRequest,
        tz: Tz,
        now: DateTime<Utc>,
    ) -> Result<Allocation, AppError> {
        let goal_id = GoalId::new(request.goal_id)?;
        let (start, end) =
            time::normalize_slot(&request.date, &request.start_time, &request.end_time, tz)?;
        let slot = TimeSlot::new(start, end)?;
        let candidate = NewAllocation::new(user_id.clone(), goal_id, slot);

        // Check and insert must not interleave with another write for this user.
        let guard = self.locks.lock(user_id).await;

        let existing = self.allocations.list_for_user(user_id).await?;
        if let Some(conflict) = find_overlap(&slot, existing.iter().map(Allocation::slot)) {
            tracing::info!(
                user_id = %user_id,
                start = %slot.start(),
                end = %slot.end(),
                conflict_start = %conflict.start(),
                conflict_end = %conflict.end(),
                "allocation rejected: overlap"
            );
            return Err(AppError::OverlapConflict(*conflict));
        }

        let allocation = match self.allocations.insert(&candidate).await? {
            Insertion::Inserted(allocation) => allocation,
            Insertion::Overlap(conflict) => {
                tracing::info!(user_id = %user_id, "allocation rejected by store: overlap");
                return Err(AppError::OverlapConflict(conflict));
            }
            Insertion::UnknownGoal => return Err(AppError::UnknownGoal),
        };
        drop(guard);

        tracing::debug!(allocation_id = %allocation.id(), user_id = %user_id, "allocation scheduled");
        self.publish(vec![allocation.scheduled_event(now)]).await;
        Ok(allocation)
    }

    /// The user's allocations ordered by start, each paired with its goal.
    /// With a date, only allocations starting within `days` local days of it.
    pub async fn list_allocations(
        &self,
        user_id: &UserId,
        query: &AllocationQuery,
        tz: Tz,
    ) -> Result<Vec<AllocationView>, AppError> {
        let mut allocations = match &query.date {
            None => self.allocations.list_for_user(user_id).await?,
            Some(date) => {
                let day = time::parse_date(date)?;
                let days = query.days.unwrap_or(1);
                if days == 0 || days > MAX_LISTING_DAYS {
                    return Err(DomainError::InvalidRange(format!(
                        "days must be between 1 and {MAX_LISTING_DAYS}"
                    ))
                    .into());
                }
                let (from, to) = time::day_bounds(day, days, tz);
                self.allocations
                    .list_for_user_between(user_id, from, to)
                    .await?
            }
        };
        allocations.sort_by_key(|a| (a.slot().start(), a.id()));

        let goals: HashMap<GoalId, GoalSummary> = self
            .goals
            .list_for_user(user_id)
            .await?
            .iter()
            .map(|goal| (goal.id(), GoalSummary::from(goal)))
            .collect();

        Ok(allocations
            .into_iter()
            .map(|allocation| AllocationView {
                goal: goals.get(&allocation.goal_id()).cloned(),
                allocation,
            })
            .collect())
    }

    pub async fn complete_allocation(
        &self,
        user_id: &UserId,
        allocation_id: i64,
        description: String,
        now: DateTime<Utc>,
    ) -> Result<Allocation, AppError> {
        let allocation_id = AllocationId::new(allocation_id)?;
        let guard = self.locks.lock(user_id).await;

        let mut allocation = self
            .allocations
            .find_by_id(allocation_id)
            .await?
            .ok_or(AppError::NotFound)?;
        if !allocation.is_owned_by(user_id) {
            return Err(AppError::Forbidden);
        }

        let events = allocation.complete(description, now)?;
        // The store only updates rows still open; a miss means another
        // writer completed it first.
        self.allocations
            .save_completion(&allocation)
            .await
            .map_err(|e| match e {
                PortError::NotFound => AppError::Domain(DomainError::AlreadyCompleted),
                other => other.into(),
            })?;
        drop(guard);

        self.publish(events).await;
        Ok(allocation)
    }

    async fn publish(&self, events: Vec<DomainEvent>) {
        if let Err(e) = self.events.publish(events).await {
            tracing::warn!(error = %e, "failed to publish allocation events");
        }
    }
}
