// HTTP request handlers
use crate::application::error::DashboardError;
use crate::application::session_service::SessionId;
use crate::domain::dashboard::Dashboard;
use crate::domain::detail::RecordDetail;
use crate::domain::record::{MonthKey, OrgRecord};
use crate::domain::selection::SelectionState;
use crate::domain::summary::Summary;
use crate::domain::table::{SortDirection, SortKey};
use crate::domain::widgets::ChartData;
use crate::infrastructure::http_response::json_with_status;
use crate::infrastructure::ndjson_stream::stream_from_watch;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Sort tokens stay strings here so a bad value becomes a JSON
/// `InvalidParameter` error rather than an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    #[serde(default)]
    pub q: String,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

impl TableQuery {
    fn sort_key(&self) -> Result<SortKey, DashboardError> {
        match &self.sort {
            Some(token) => parse_sort_key("sort", token),
            None => Ok(SortKey::AudienceSize),
        }
    }

    fn direction(&self) -> Result<SortDirection, DashboardError> {
        match &self.dir {
            Some(token) => SortDirection::parse(token).ok_or_else(|| DashboardError::InvalidParameter {
                name: "dir",
                value: token.clone(),
            }),
            None => Ok(SortDirection::Desc),
        }
    }
}

fn parse_sort_key(name: &'static str, token: &str) -> Result<SortKey, DashboardError> {
    SortKey::parse(token).ok_or_else(|| DashboardError::InvalidParameter {
        name,
        value: token.to_string(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthsResponse {
    pub months: Vec<MonthKey>,
    pub latest: Option<MonthKey>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub month: Option<MonthKey>,
    pub previous_month: Option<MonthKey>,
    #[serde(flatten)]
    pub summary: Summary,
    pub engagement_rate_display: f64,
    pub avg_likes_display: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: SessionId,
    pub state: SelectionState,
    pub dashboard: Dashboard,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEvent {
    pub session_id: SessionId,
    pub state: SelectionState,
}

#[derive(Debug, Deserialize)]
pub struct MonthBody {
    pub month: String,
}

#[derive(Debug, Deserialize)]
pub struct QueryBody {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SortBody {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct FocusBody {
    pub handle: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Months with a dataset, oldest first
pub async fn list_months(State(state): State<Arc<AppState>>) -> Json<MonthsResponse> {
    let months = state.dashboard_service.months();
    let latest = months.last().copied();
    Json(MonthsResponse { months, latest })
}

/// Summary for a month; unknown month tokens read as a month without data
pub async fn month_summary(
    Path(month): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<SummaryResponse> {
    let month = MonthKey::parse(&month);
    let service = &state.dashboard_service;
    let summary = service.summary(month);

    Json(SummaryResponse {
        month,
        previous_month: service.previous_month(month),
        engagement_rate_display: summary.engagement_rate_display(),
        avg_likes_display: summary.avg_likes_display(),
        summary,
    })
}

/// Ranked series for every configured chart
pub async fn month_charts(
    Path(month): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ChartData>> {
    Json(state.dashboard_service.charts(MonthKey::parse(&month)))
}

/// Searched and sorted table rows
pub async fn month_table(
    Path(month): Path<String>,
    Query(query): Query<TableQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OrgRecord>>, DashboardError> {
    Ok(Json(state.dashboard_service.table(
        MonthKey::parse(&month),
        &query.q,
        query.sort_key()?,
        query.direction()?,
    )))
}

/// Detail metrics for one record
pub async fn record_detail(
    Path((month, handle)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<RecordDetail>, DashboardError> {
    let detail = state
        .dashboard_service
        .detail(MonthKey::parse(&month), &handle)?;
    Ok(Json(detail))
}

/// Tiles, charts and table for a month in one payload
pub async fn month_dashboard(
    Path(month): Path<String>,
    Query(query): Query<TableQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Dashboard>, DashboardError> {
    Ok(Json(state.dashboard_service.month_dashboard(
        MonthKey::parse(&month),
        &query.q,
        query.sort_key()?,
        query.direction()?,
    )))
}

fn session_view(state: &AppState, session_id: SessionId, selection: SelectionState) -> SessionView {
    SessionView {
        session_id,
        dashboard: state.dashboard_service.dashboard(&selection),
        state: selection,
    }
}

/// Start a session in the initial state
pub async fn create_session(State(state): State<Arc<AppState>>) -> Response {
    let (id, selection) = state.session_service.create();
    json_with_status(StatusCode::CREATED, session_view(&state, id, selection))
}

pub async fn get_session(
    Path(id): Path<SessionId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionView>, DashboardError> {
    let selection = state.session_service.get(id)?;
    Ok(Json(session_view(&state, id, selection)))
}

pub async fn end_session(
    Path(id): Path<SessionId>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, DashboardError> {
    state.session_service.end(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn select_month(
    Path(id): Path<SessionId>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<MonthBody>,
) -> Result<Json<SessionView>, DashboardError> {
    let month = MonthKey::parse(&body.month).ok_or(DashboardError::InvalidParameter {
        name: "month",
        value: body.month.clone(),
    })?;
    let selection = state.session_service.select_month(id, month)?;
    Ok(Json(session_view(&state, id, selection)))
}

pub async fn set_query(
    Path(id): Path<SessionId>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<QueryBody>,
) -> Result<Json<SessionView>, DashboardError> {
    let selection = state.session_service.set_query(id, &body.query)?;
    Ok(Json(session_view(&state, id, selection)))
}

pub async fn sort_by(
    Path(id): Path<SessionId>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<SortBody>,
) -> Result<Json<SessionView>, DashboardError> {
    let key = parse_sort_key("key", &body.key)?;
    let selection = state.session_service.sort_by(id, key)?;
    Ok(Json(session_view(&state, id, selection)))
}

pub async fn focus(
    Path(id): Path<SessionId>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<FocusBody>,
) -> Result<Json<SessionView>, DashboardError> {
    let selection = state.session_service.focus(id, &body.handle)?;
    Ok(Json(session_view(&state, id, selection)))
}

pub async fn unfocus(
    Path(id): Path<SessionId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionView>, DashboardError> {
    let selection = state.session_service.unfocus(id)?;
    Ok(Json(session_view(&state, id, selection)))
}

/// Stream every state snapshot of a session as newline-delimited JSON
pub async fn session_events(
    Path(id): Path<SessionId>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, DashboardError> {
    let rx = state.session_service.subscribe(id)?;
    tracing::debug!("Observer attached to session {}", id);

    Ok(stream_from_watch(rx, move |selection: &SelectionState| SessionEvent {
        session_id: id,
        state: selection.clone(),
    }))
}
