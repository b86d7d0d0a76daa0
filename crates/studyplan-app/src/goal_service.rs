use studyplan_core::goal::{Goal, NewGoal};
use studyplan_core::ids::UserId;
use studyplan_ports::outbound::GoalRepository;

use crate::error::AppError;

pub struct GoalService<G>
where
    G: GoalRepository,
{
    goals: G,
}

impl<G> GoalService<G>
where
    G: GoalRepository,
{
    pub fn new(goals: G) -> Self {
        Self { goals }
    }

    pub async fn list_goals(&self, user_id: &UserId) -> Result<Vec<Goal>, AppError> {
        let mut goals = self.goals.list_for_user(user_id).await?;
        goals.sort_by_key(Goal::id);
        Ok(goals)
    }

    pub async fn create_goal(
        &self,
        user_id: &UserId,
        title: &str,
        colour: Option<&str>,
    ) -> Result<Goal, AppError> {
        let goal = NewGoal::new(user_id.clone(), title, colour)?;
        let goal = self.goals.create(&goal).await?;
        tracing::debug!(goal_id = %goal.id(), user_id = %user_id, "goal created");
        Ok(goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use studyplan_core::error::DomainError;
    use studyplan_core::ids::GoalId;
    use studyplan_ports::error::PortError;

    #[derive(Default)]
    struct MockGoalRepo {
        goals: Mutex<Vec<Goal>>,
    }

    #[async_trait]
    impl GoalRepository for MockGoalRepo {
        async fn create(&self, goal: &NewGoal) -> Result<Goal, PortError> {
            let mut goals = self.goals.lock().unwrap();
            let id = GoalId::new(goals.len() as i64 + 1).unwrap();
            let stored = goal.clone().into_goal(id);
            // newest first, so listing has to sort
            goals.insert(0, stored.clone());
            Ok(stored)
        }

        async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Goal>, PortError> {
            let goals = self.goals.lock().unwrap();
            Ok(goals
                .iter()
                .filter(|g| g.user_id() == user_id)
                .cloned()
                .collect())
        }
    }

    fn make_service() -> GoalService<MockGoalRepo> {
        GoalService::new(MockGoalRepo::default())
    }

    #[tokio::test]
    async fn create_then_list_in_id_order() {
        let svc = make_service();
        let user = UserId::new();

        svc.create_goal(&user, "Algorithms", None).await.unwrap();
        svc.create_goal(&user, "Statistics", Some("#22c55e"))
            .await
            .unwrap();

        let goals = svc.list_goals(&user).await.unwrap();
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].title(), "Algorithms");
        assert_eq!(goals[1].title(), "Statistics");
        assert_eq!(goals[1].colour(), "#22c55e");
    }

    #[tokio::test]
    async fn goals_are_scoped_to_their_owner() {
        let svc = make_service();
        let alice = UserId::new();
        svc.create_goal(&alice, "Algorithms", None).await.unwrap();

        let goals = svc.list_goals(&UserId::new()).await.unwrap();
        assert!(goals.is_empty());
    }

    #[tokio::test]
    async fn blank_title_is_rejected_before_storage() {
        let svc = make_service();
        let result = svc.create_goal(&UserId::new(), " ", None).await;
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::EmptyGoalTitle))
        ));
        assert!(svc.goals.goals.lock().unwrap().is_empty());
    }
}
