use async_trait::async_trait;

use studyplan_core::events::DomainEvent;
use studyplan_ports::error::PortError;
use studyplan_ports::outbound::EventPublisher;

use super::SqliteDb;

#[async_trait]
impl EventPublisher for SqliteDb {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), PortError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        for event in &events {
            let data =
                serde_json::to_string(event).map_err(|e| PortError::Persistence(e.to_string()))?;

            sqlx::query("INSERT INTO events (event_type, data, occurred_at) VALUES (?, ?, ?)")
                .bind(event.event_type())
                .bind(&data)
                .bind(event.occurred_at().to_rfc3339())
                .execute(&mut *tx)
                .await
                .map_err(|e| PortError::Persistence(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;
        tracing::trace!(count = events.len(), "events stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studyplan_core::events::{AllocationCompleted, AllocationScheduled};
    use studyplan_core::ids::{AllocationId, GoalId, UserId};

    async fn db() -> SqliteDb {
        SqliteDb::new("sqlite::memory:").await.unwrap()
    }

    fn ts(s: &str) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::parse_from_rfc3339(s)
            .unwrap()
            .with_timezone(&chrono::Utc)
    }

    #[tokio::test]
    async fn publish_stores_events_with_type() {
        let db = db().await;
        let user_id = UserId::new();
        let allocation_id = AllocationId::new(1).unwrap();

        let events = vec![
            DomainEvent::AllocationScheduled(AllocationScheduled {
                allocation_id,
                user_id: user_id.clone(),
                goal_id: GoalId::new(3).unwrap(),
                start: ts("2024-06-16T09:00:00Z"),
                end: ts("2024-06-16T10:00:00Z"),
                occurred_at: ts("2024-06-15T18:00:00Z"),
            }),
            DomainEvent::AllocationCompleted(AllocationCompleted {
                allocation_id,
                user_id,
                occurred_at: ts("2024-06-16T10:05:00Z"),
            }),
        ];

        db.publish(events).await.unwrap();

        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT event_type, data FROM events ORDER BY id")
                .fetch_all(db.pool())
                .await
                .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, "allocation.scheduled");
        assert_eq!(rows[1].0, "allocation.completed");

        let data: serde_json::Value = serde_json::from_str(&rows[0].1).unwrap();
        assert_eq!(data["AllocationScheduled"]["goal_id"], 3);
    }

    #[tokio::test]
    async fn publish_nothing_is_a_no_op() {
        let db = db().await;
        db.publish(Vec::new()).await.unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }
}
