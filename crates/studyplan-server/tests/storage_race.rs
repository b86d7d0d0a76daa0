use chrono::Utc;
use chrono_tz::Tz;
use tempfile::tempdir;

use studyplan_adapters::persistence::sqlite::SqliteDb;
use studyplan_app::allocation_service::{AllocationRequest, AllocationService};
use studyplan_app::error::AppError;
use studyplan_core::goal::NewGoal;
use studyplan_core::ids::UserId;
use studyplan_ports::outbound::{AllocationRepository, GoalRepository};

type Service = AllocationService<SqliteDb, SqliteDb, SqliteDb>;

fn service(db: &SqliteDb) -> Service {
    AllocationService::new(db.clone(), db.clone(), db.clone())
}

fn request(goal_id: i64, date: &str, start: &str, end: &str) -> AllocationRequest {
    AllocationRequest {
        goal_id,
        date: date.into(),
        start_time: start.into(),
        end_time: end.into(),
    }
}

// Each service has its own lock registry and pool, like two server processes
// sharing one database file. Only the guarded insert keeps them apart.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn separate_writers_never_commit_overlapping_slots() {
    let dir = tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("race.db").display());
    let first_db = SqliteDb::new(&url).await.unwrap();
    let second_db = SqliteDb::new(&url).await.unwrap();

    let user = UserId::new();
    let goal = GoalRepository::create(
        &first_db,
        &NewGoal::new(user.clone(), "Thermodynamics", None).unwrap(),
    )
    .await
    .unwrap();
    let goal_id = goal.id().get();

    let first = service(&first_db);
    let second = service(&second_db);

    for day in 1..=28 {
        let date = format!("2024-07-{day:02}");
        let a = request(goal_id, &date, "10:00", "11:00");
        let b = request(goal_id, &date, "10:30", "11:30");

        let (left, right) = tokio::join!(
            first.create_allocation(&user, &a, Tz::UTC, Utc::now()),
            second.create_allocation(&user, &b, Tz::UTC, Utc::now()),
        );

        let results = [left, right];
        let committed = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(AppError::OverlapConflict(_))))
            .count();
        assert_eq!((committed, conflicts), (1, 1), "on {date}: {results:?}");
    }

    let stored = AllocationRepository::list_for_user(&first_db, &user)
        .await
        .unwrap();
    assert_eq!(stored.len(), 28);
    for pair in stored.windows(2) {
        assert!(!pair[0].slot().overlaps(pair[1].slot()));
    }
}
