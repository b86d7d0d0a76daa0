use std::sync::Arc;

use anyhow::Context;
use chrono_tz::Tz;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use studyplan_adapters::auth::JwtIdentityProvider;
use studyplan_adapters::persistence::sqlite::SqliteDb;
use studyplan_app::allocation_service::AllocationService;
use studyplan_app::goal_service::GoalService;
use studyplan_core::time;
use studyplan_ports::outbound::IdentityProvider;

use crate::config::ServerConfig;

pub struct AppState {
    pub allocations: AllocationService<SqliteDb, SqliteDb, SqliteDb>,
    pub goals: GoalService<SqliteDb>,
    pub identity: Arc<dyn IdentityProvider>,
    pub default_timezone: Tz,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("studyplan_server=info,tower_http=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn build_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    anyhow::ensure!(!config.jwt_secret.trim().is_empty(), "jwt_secret must be set");

    let default_timezone = time::parse_timezone(&config.default_timezone)
        .with_context(|| format!("invalid default_timezone {:?}", config.default_timezone))?;

    let db = SqliteDb::new(&config.database_url)
        .await
        .context("failed to open database")?;
    tracing::info!(database_url = %config.database_url, "database ready");

    let identity = JwtIdentityProvider::new(&config.jwt_secret, config.audience());

    Ok(Arc::new(AppState {
        allocations: AllocationService::new(db.clone(), db.clone(), db.clone()),
        goals: GoalService::new(db),
        identity: Arc::new(identity),
        default_timezone,
    }))
}
