use async_trait::async_trait;

use studyplan_core::goal::{Goal, NewGoal};
use studyplan_core::ids::{GoalId, UserId};
use studyplan_ports::error::PortError;
use studyplan_ports::outbound::GoalRepository;

use super::SqliteDb;

#[async_trait]
impl GoalRepository for SqliteDb {
    async fn create(&self, goal: &NewGoal) -> Result<Goal, PortError> {
        let user_id = goal.user_id().to_string();

        let (id,): (i64,) =
            sqlx::query_as("INSERT INTO goals (user_id, title, colour) VALUES (?, ?, ?) RETURNING id")
                .bind(&user_id)
                .bind(goal.title())
                .bind(goal.colour())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| PortError::Persistence(e.to_string()))?;

        let id = GoalId::new(id).map_err(|e| PortError::Persistence(e.to_string()))?;
        Ok(goal.clone().into_goal(id))
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Goal>, PortError> {
        let rows: Vec<(i64, String, String)> =
            sqlx::query_as("SELECT id, title, colour FROM goals WHERE user_id = ? ORDER BY id")
                .bind(user_id.to_string())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| PortError::Persistence(e.to_string()))?;

        let mut goals = Vec::with_capacity(rows.len());
        for (id, title, colour) in rows {
            let id = GoalId::new(id).map_err(|e| PortError::Persistence(e.to_string()))?;
            goals.push(Goal::restore(id, user_id.clone(), title, colour));
        }
        Ok(goals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn db() -> SqliteDb {
        SqliteDb::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let db = db().await;
        let user = UserId::new();

        let first = db
            .create(&NewGoal::new(user.clone(), "Physics", None).unwrap())
            .await
            .unwrap();
        let second = db
            .create(&NewGoal::new(user.clone(), "Chemistry", Some("#ef4444")).unwrap())
            .await
            .unwrap();

        assert!(second.id() > first.id());
        assert_eq!(second.colour(), "#ef4444");
    }

    #[tokio::test]
    async fn list_only_returns_own_goals() {
        let db = db().await;
        let alice = UserId::new();
        let bob = UserId::new();
        db.create(&NewGoal::new(alice.clone(), "Physics", None).unwrap())
            .await
            .unwrap();
        db.create(&NewGoal::new(bob.clone(), "History", None).unwrap())
            .await
            .unwrap();

        let goals = db.list_for_user(&alice).await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].title(), "Physics");
        assert_eq!(goals[0].user_id(), &alice);
    }
}
