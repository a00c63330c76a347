//! Dashboard API endpoints
//!
//! Stateless data endpoints (`/api/v1/repositories`, `/api/v1/consolidated`, ...)
//! fetch on every call. The `/api/v1/dashboard` endpoints drive the shared
//! [`DashboardSession`] and answer with its snapshot.

use actix_web::{
    http::StatusCode,
    web::{self, Json, Path, Query},
    HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::{
    context::{recent_activity, DashboardSession, DashboardState, WeeklyActivityPoint},
    errors::PulseError,
    insights::InsightsManager,
    window::TimeRange,
};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<InsightsManager>,
    pub session: Arc<DashboardSession>,
}

impl AppState {
    pub fn new(manager: Arc<InsightsManager>) -> Self {
        let session = Arc::new(DashboardSession::new(manager.clone()));
        Self { manager, session }
    }
}

/// `?range=` query; missing or unknown tokens resolve to 7 days.
/// `?weeks=` trims weekly activity to its trailing points for charting.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub range: Option<TimeRange>,
    pub weeks: Option<usize>,
}

impl RangeQuery {
    fn resolved(&self) -> TimeRange {
        self.range.unwrap_or_default()
    }

    fn trim(&self, series: &mut Vec<WeeklyActivityPoint>) {
        if let Some(weeks) = self.weeks {
            *series = recent_activity(series, weeks).to_vec();
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RangeRequest {
    pub range: TimeRange,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TimeRangeOption {
    pub value: TimeRange,
    pub label: &'static str,
}

impl ResponseError for PulseError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_upstream() {
            warn!("Upstream failure: {}", self);
        } else {
            error!("Request failed: {}", self);
        }
        HttpResponse::build(ResponseError::status_code(self)).json(self.to_error_response())
    }
}

fn repo_key(path: &(String, String)) -> String {
    format!("{}/{}", path.0, path.1)
}

/// Health check endpoint
async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "pulse-service",
        "source": state.manager.source_id(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn time_ranges() -> HttpResponse {
    let options: Vec<TimeRangeOption> = TimeRange::all()
        .into_iter()
        .map(|value| TimeRangeOption { value, label: value.label() })
        .collect();
    HttpResponse::Ok().json(options)
}

async fn list_repositories(state: web::Data<AppState>) -> HttpResponse {
    let start = Instant::now();
    let repositories = state.manager.discover_repositories().await;

    info!(
        "Repository listing: results={}, time={}ms",
        repositories.len(),
        start.elapsed().as_millis()
    );
    HttpResponse::Ok().json(repositories)
}

async fn repo_stats(
    state: web::Data<AppState>,
    path: Path<(String, String)>,
    query: Query<RangeQuery>,
) -> Result<HttpResponse, PulseError> {
    let start = Instant::now();
    let full_name = repo_key(&path);
    let range = query.resolved();

    let mut bundle = state.manager.repo_stats(&full_name, range).await?;
    query.trim(&mut bundle.commit_activity);

    info!(
        "Repository stats: repo={}, range={}, time={}ms",
        full_name,
        range,
        start.elapsed().as_millis()
    );
    Ok(HttpResponse::Ok().json(bundle))
}

async fn repo_commits(
    state: web::Data<AppState>,
    path: Path<(String, String)>,
    query: Query<RangeQuery>,
) -> Result<HttpResponse, PulseError> {
    let full_name = repo_key(&path);
    let commits = state.manager.repo_commits(&full_name, query.resolved()).await?;
    Ok(HttpResponse::Ok().json(commits))
}

async fn consolidated(
    state: web::Data<AppState>,
    query: Query<RangeQuery>,
) -> Result<HttpResponse, PulseError> {
    let start = Instant::now();
    let range = query.resolved();

    let repositories = state.manager.discover_repositories().await;
    let mut bundle = state.manager.consolidated(&repositories, range).await?;
    query.trim(&mut bundle.commit_activity);

    info!(
        "Consolidated stats: range={}, repositories={}, time={}ms",
        range,
        bundle.total_repos,
        start.elapsed().as_millis()
    );
    Ok(HttpResponse::Ok().json(bundle))
}

async fn dashboard(state: web::Data<AppState>) -> Json<DashboardState> {
    Json(state.session.snapshot())
}

async fn refresh_dashboard(state: web::Data<AppState>) -> Json<DashboardState> {
    state.session.refresh().await;
    Json(state.session.snapshot())
}

async fn set_dashboard_range(
    state: web::Data<AppState>,
    body: Json<RangeRequest>,
) -> Json<DashboardState> {
    state.session.set_time_range(body.range).await;
    Json(state.session.snapshot())
}

async fn select_dashboard_repository(
    state: web::Data<AppState>,
    body: Json<SelectRequest>,
) -> Result<Json<DashboardState>, PulseError> {
    state
        .session
        .select_repository(body.full_name.as_deref())
        .await?;
    Ok(Json(state.session.snapshot()))
}

/// Register dashboard routes
pub fn dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health)).service(
        web::scope("/api/v1")
            .route("/time-ranges", web::get().to(time_ranges))
            .route("/repositories", web::get().to(list_repositories))
            .route("/repositories/{owner}/{name}/stats", web::get().to(repo_stats))
            .route("/repositories/{owner}/{name}/commits", web::get().to(repo_commits))
            .route("/consolidated", web::get().to(consolidated))
            .route("/dashboard", web::get().to(dashboard))
            .route("/dashboard/refresh", web::post().to(refresh_dashboard))
            .route("/dashboard/range", web::post().to(set_dashboard_range))
            .route("/dashboard/select", web::post().to(select_dashboard_repository)),
    );
}
