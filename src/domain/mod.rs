// Domain layer - Pure types and derivations, no I/O
pub mod dashboard;
pub mod detail;
pub mod ranking;
pub mod record;
pub mod selection;
pub mod summary;
pub mod table;
pub mod widgets;
