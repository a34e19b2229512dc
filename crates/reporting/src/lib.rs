//! Filtering and aggregation pipeline for influencer-marketing ROI
//! reports — campaign summaries, influencer rankings, personas, post
//! engagement, and payout breakdowns.

pub mod campaign;
pub mod dashboard;
pub mod engagement;
pub mod filter;
pub mod influencer;
pub mod payout;

pub use dashboard::DashboardReport;
pub use filter::{DateRange, FilterSelection, FilteredViews, Selection};
