pub mod brand;
pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

pub use brand::Brand;
pub use config::DashboardConfig;
pub use error::{RoiError, RoiResult};
