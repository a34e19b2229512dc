//! CSV ingestion and session state for the ROI dashboard pipeline.

pub mod loader;
pub mod session;

pub use session::{DashboardSession, FilterOptions, SourceTables};
