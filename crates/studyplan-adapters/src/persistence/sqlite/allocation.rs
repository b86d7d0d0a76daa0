use async_trait::async_trait;
use chrono::{DateTime, Utc};

use studyplan_core::allocation::{Allocation, Completion, NewAllocation, TimeSlot};
use studyplan_core::ids::{AllocationId, GoalId, UserId};
use studyplan_ports::error::PortError;
use studyplan_ports::outbound::AllocationRepository;
use studyplan_ports::types::Insertion;

use super::SqliteDb;

const ALLOCATION_COLUMNS: &str =
    "id, user_id, goal_id, start_at, end_at, completion_description, completed_at";

type AllocationRow = (i64, String, i64, i64, i64, Option<String>, Option<String>);

fn from_millis(ms: i64) -> Result<DateTime<Utc>, PortError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| PortError::Persistence(format!("timestamp out of range: {ms}")))
}

fn slot_from_row(start_at: i64, end_at: i64) -> Result<TimeSlot, PortError> {
    TimeSlot::new(from_millis(start_at)?, from_millis(end_at)?)
        .map_err(|e| PortError::Persistence(e.to_string()))
}

fn row_to_allocation(row: AllocationRow) -> Result<Allocation, PortError> {
    let (id, user_id, goal_id, start_at, end_at, description, completed_at) = row;
    let id = AllocationId::new(id).map_err(|e| PortError::Persistence(e.to_string()))?;
    let user_id = UserId::parse(&user_id).map_err(|e| PortError::Persistence(e.to_string()))?;
    let goal_id = GoalId::new(goal_id).map_err(|e| PortError::Persistence(e.to_string()))?;
    let slot = slot_from_row(start_at, end_at)?;

    let completion = match completed_at {
        Some(at) => {
            let at = DateTime::parse_from_rfc3339(&at)
                .map_err(|e| PortError::Persistence(e.to_string()))?
                .with_timezone(&Utc);
            Some(Completion::new(description.unwrap_or_default(), at))
        }
        None => None,
    };

    Ok(Allocation::restore(id, user_id, goal_id, slot, completion))
}

impl SqliteDb {
    async fn fetch_allocations(
        &self,
        sql: &str,
        user_id: &UserId,
        range: Option<(i64, i64)>,
    ) -> Result<Vec<Allocation>, PortError> {
        let mut query = sqlx::query_as::<_, AllocationRow>(sql).bind(user_id.to_string());
        if let Some((from, to)) = range {
            query = query.bind(from).bind(to);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        rows.into_iter().map(row_to_allocation).collect()
    }

    async fn first_overlap(&self, allocation: &NewAllocation) -> Result<Option<TimeSlot>, PortError> {
        let row: Option<(i64, i64)> = sqlx::query_as(
            "SELECT start_at, end_at FROM allocations
             WHERE user_id = ? AND start_at < ? AND end_at > ?
             ORDER BY start_at LIMIT 1",
        )
        .bind(allocation.user_id().to_string())
        .bind(allocation.slot().end().timestamp_millis())
        .bind(allocation.slot().start().timestamp_millis())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        row.map(|(start_at, end_at)| slot_from_row(start_at, end_at))
            .transpose()
    }
}

#[async_trait]
impl AllocationRepository for SqliteDb {
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Allocation>, PortError> {
        let sql = format!(
            "SELECT {ALLOCATION_COLUMNS} FROM allocations WHERE user_id = ? ORDER BY start_at, id"
        );
        self.fetch_allocations(&sql, user_id, None).await
    }

    async fn list_for_user_between(
        &self,
        user_id: &UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Allocation>, PortError> {
        let sql = format!(
            "SELECT {ALLOCATION_COLUMNS} FROM allocations
             WHERE user_id = ? AND start_at >= ? AND start_at < ?
             ORDER BY start_at, id"
        );
        let range = (from.timestamp_millis(), to.timestamp_millis());
        self.fetch_allocations(&sql, user_id, Some(range)).await
    }

    async fn insert(&self, allocation: &NewAllocation) -> Result<Insertion, PortError> {
        let user_id = allocation.user_id().to_string();
        let start_at = allocation.slot().start().timestamp_millis();
        let end_at = allocation.slot().end().timestamp_millis();

        // One statement: goal ownership, overlap check and insert happen
        // under the same write lock, so concurrent writers cannot interleave.
        let row: Option<(i64,)> = sqlx::query_as(
            "INSERT INTO allocations (user_id, goal_id, start_at, end_at, completed)
             SELECT ?1, g.id, ?3, ?4, 0 FROM goals g
             WHERE g.id = ?2 AND g.user_id = ?1
               AND NOT EXISTS (
                   SELECT 1 FROM allocations a
                   WHERE a.user_id = ?1 AND a.start_at < ?4 AND a.end_at > ?3
               )
             RETURNING id",
        )
        .bind(&user_id)
        .bind(allocation.goal_id().get())
        .bind(start_at)
        .bind(end_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        match row {
            Some((id,)) => {
                let id = AllocationId::new(id).map_err(|e| PortError::Persistence(e.to_string()))?;
                Ok(Insertion::Inserted(allocation.clone().into_allocation(id)))
            }
            None => match self.first_overlap(allocation).await? {
                Some(conflict) => Ok(Insertion::Overlap(conflict)),
                None => Ok(Insertion::UnknownGoal),
            },
        }
    }

    async fn find_by_id(&self, id: AllocationId) -> Result<Option<Allocation>, PortError> {
        let sql = format!("SELECT {ALLOCATION_COLUMNS} FROM allocations WHERE id = ?");
        let row: Option<AllocationRow> = sqlx::query_as(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        row.map(row_to_allocation).transpose()
    }

    async fn save_completion(&self, allocation: &Allocation) -> Result<(), PortError> {
        let completion = allocation
            .completion()
            .ok_or_else(|| PortError::Persistence("allocation is not completed".into()))?;

        let result = sqlx::query(
            "UPDATE allocations
             SET completed = 1, completion_description = ?, completed_at = ?
             WHERE id = ? AND user_id = ? AND completed = 0",
        )
        .bind(completion.description())
        .bind(completion.completed_at().to_rfc3339())
        .bind(allocation.id().get())
        .bind(allocation.user_id().to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound);
        }
        Ok(())
    }
}
