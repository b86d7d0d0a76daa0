use serde::Serialize;

use crate::error::DomainError;
use crate::ids::{GoalId, UserId};

pub const DEFAULT_GOAL_COLOUR: &str = "#4f46e5";

/// A goal that has passed validation but has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    user_id: UserId,
    title: String,
    colour: String,
}

impl NewGoal {
    pub fn new(user_id: UserId, title: &str, colour: Option<&str>) -> Result<Self, DomainError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::EmptyGoalTitle);
        }
        let colour = colour
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_GOAL_COLOUR);
        Ok(Self {
            user_id,
            title: title.to_string(),
            colour: colour.to_string(),
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn colour(&self) -> &str {
        &self.colour
    }

    pub fn into_goal(self, id: GoalId) -> Goal {
        Goal {
            id,
            user_id: self.user_id,
            title: self.title,
            colour: self.colour,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Goal {
    id: GoalId,
    #[serde(skip)]
    user_id: UserId,
    title: String,
    colour: String,
}

impl Goal {
    pub fn restore(id: GoalId, user_id: UserId, title: String, colour: String) -> Self {
        Self {
            id,
            user_id,
            title,
            colour,
        }
    }

    pub fn id(&self) -> GoalId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn colour(&self) -> &str {
        &self.colour
    }
}
