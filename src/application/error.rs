// Request-level errors surfaced by the dashboard services
use crate::domain::record::MonthKey;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DashboardError {
    #[error("session {0} not found")]
    SessionNotFound(u64),

    #[error("no record with handle '{handle}' in {month}")]
    RecordNotFound { month: String, handle: String },

    #[error("invalid {name}: '{value}'")]
    InvalidParameter { name: &'static str, value: String },
}

impl DashboardError {
    pub fn record_not_found(month: Option<MonthKey>, handle: &str) -> Self {
        DashboardError::RecordNotFound {
            month: month.map_or_else(|| "unknown month".to_string(), |m| m.to_string()),
            handle: handle.to_string(),
        }
    }
}
