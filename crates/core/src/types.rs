use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::brand::Brand;

/// Tracking-record source value that marks revenue attributed to the
/// influencer program; every other source counts toward the organic
/// baseline.
pub const INFLUENCER_CAMPAIGN: &str = "Influencer Campaign";

/// Static influencer reference row, one per registered influencer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Influencer {
    pub influencer_id: String,
    pub name: String,
    pub category: String,
    pub gender: String,
    pub follower_count: u64,
    /// Platform the influencer is registered on. Posts carry their own
    /// platform field which may differ from this one.
    pub platform: String,
}

/// One social post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub influencer_id: String,
    /// Platform this post went out on, not the influencer's registered
    /// platform.
    pub platform: String,
    pub date: Option<NaiveDate>,
    pub reach: u64,
    pub likes: u64,
    pub comments: u64,
    pub url: String,
    pub caption: String,
}

/// One attributed order/event from the tracking export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingRecord {
    pub influencer_id: String,
    pub source: String,
    pub campaign: String,
    pub product: String,
    /// Derived from `product` once at load time.
    pub brand: Brand,
    pub date: Option<NaiveDate>,
    pub revenue: f64,
    pub orders: u64,
}

/// One payout event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payout {
    pub influencer_id: String,
    pub campaign: String,
    pub basis: PayoutBasis,
    pub payout_date: Option<NaiveDate>,
    pub total_payout: f64,
}

/// How a payout was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutBasis {
    Post,
    Order,
}

impl PayoutBasis {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "post" => Some(PayoutBasis::Post),
            "order" => Some(PayoutBasis::Order),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutBasis::Post => "post",
            PayoutBasis::Order => "order",
        }
    }
}

impl std::fmt::Display for PayoutBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payout_basis_parse() {
        assert_eq!(PayoutBasis::parse("Post"), Some(PayoutBasis::Post));
        assert_eq!(PayoutBasis::parse(" order "), Some(PayoutBasis::Order));
        assert_eq!(PayoutBasis::parse("per-click"), None);
    }
}
