use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::DomainError;

/// Shortest allocation accepted. Fixed policy, not configurable.
pub const MIN_ALLOCATION_MINUTES: i64 = 10;

fn min_allocation_duration() -> Duration {
    Duration::minutes(MIN_ALLOCATION_MINUTES)
}

/// Half-open interval `[start, end)`, only constructible through [`TimeSlot::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    #[serde(rename = "start_instant")]
    start: DateTime<Utc>,
    #[serde(rename = "end_instant")]
    end: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::NonPositiveDuration);
        }
        if end - start < min_allocation_duration() {
            return Err(DomainError::BelowMinimumDuration);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// First slot in `existing` that intersects `candidate`.
pub fn find_overlap<'a, I>(candidate: &TimeSlot, existing: I) -> Option<&'a TimeSlot>
where
    I: IntoIterator<Item = &'a TimeSlot>,
{
    existing.into_iter().find(|slot| candidate.overlaps(slot))
}
