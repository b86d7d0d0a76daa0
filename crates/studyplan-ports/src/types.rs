use serde::Serialize;

use studyplan_core::allocation::{Allocation, TimeSlot};
use studyplan_core::goal::Goal;
use studyplan_core::ids::GoalId;

/// Outcome of a guarded insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    Inserted(Allocation),
    /// The store found an existing slot of the same user that overlaps.
    Overlap(TimeSlot),
    /// The goal does not exist or belongs to someone else.
    UnknownGoal,
}

/// Goal fields shown next to an allocation in the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalSummary {
    pub id: GoalId,
    pub title: String,
    pub colour: String,
}

impl From<&Goal> for GoalSummary {
    fn from(goal: &Goal) -> Self {
        Self {
            id: goal.id(),
            title: goal.title().to_string(),
            colour: goal.colour().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationView {
    #[serde(flatten)]
    pub allocation: Allocation,
    pub goal: Option<GoalSummary>,
}
