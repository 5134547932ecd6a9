// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::session_service::SessionService;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub session_service: SessionService,
}
