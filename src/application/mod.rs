// Application layer - Use cases over the record store
pub mod dashboard_service;
pub mod error;
pub mod record_store;
pub mod session_service;
