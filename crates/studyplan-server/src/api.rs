use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use chrono_tz::Tz;
use serde::Deserialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use studyplan_app::allocation_service::{AllocationQuery, AllocationRequest};
use studyplan_core::allocation::Allocation;
use studyplan_core::goal::Goal;
use studyplan_core::time;
use studyplan_ports::types::AllocationView;

use crate::auth::AuthUser;
use crate::config::ServerConfig;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Deserialize)]
struct CreateGoalBody {
    title: String,
    colour: Option<String>,
}

#[derive(Deserialize)]
struct CreateAllocationBody {
    goal_id: i64,
    date: String,
    start_time: String,
    end_time: String,
    timezone: Option<String>,
}

#[derive(Deserialize)]
struct ListAllocationsParams {
    date: Option<String>,
    days: Option<u32>,
    timezone: Option<String>,
}

#[derive(Deserialize)]
struct CompleteBody {
    #[serde(default)]
    description: Option<String>,
}

fn resolve_timezone(requested: Option<&str>, state: &AppState) -> ApiResult<Tz> {
    match requested {
        Some(name) => Ok(time::parse_timezone(name)?),
        None => Ok(state.default_timezone),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_goals(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<Goal>>> {
    let goals = state.goals.list_goals(&user_id).await?;
    Ok(Json(goals))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateGoalBody>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    let goal = state
        .goals
        .create_goal(&user_id, &body.title, body.colour.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

async fn list_allocations(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<ListAllocationsParams>,
) -> ApiResult<Json<Vec<AllocationView>>> {
    let tz = resolve_timezone(params.timezone.as_deref(), &state)?;
    let query = AllocationQuery {
        date: params.date,
        days: params.days,
    };
    let views = state
        .allocations
        .list_allocations(&user_id, &query, tz)
        .await?;
    Ok(Json(views))
}

async fn create_allocation(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateAllocationBody>,
) -> ApiResult<(StatusCode, Json<Allocation>)> {
    let tz = resolve_timezone(body.timezone.as_deref(), &state)?;
    let request = AllocationRequest {
        goal_id: body.goal_id,
        date: body.date,
        start_time: body.start_time,
        end_time: body.end_time,
    };
    let allocation = state
        .allocations
        .create_allocation(&user_id, &request, tz, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(allocation)))
}

async fn complete_allocation(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    body: Option<Json<CompleteBody>>,
) -> ApiResult<Json<Allocation>> {
    let description = body
        .and_then(|Json(body)| body.description)
        .unwrap_or_default();
    let allocation = state
        .allocations
        .complete_allocation(&user_id, id, description, Utc::now())
        .await?;
    Ok(Json(allocation))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins = config.cors_origins();
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn app_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route("/allocations", get(list_allocations).post(create_allocation))
        .route("/allocations/{id}/complete", post(complete_allocation));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}
