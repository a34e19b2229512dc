//! The filter engine: turns the four source tables plus a filter
//! selection into three filtered, influencer-joined views ready for
//! aggregation. Every step builds new vectors; no row is mutated.

use std::collections::HashMap;

use chrono::NaiveDate;
use roi_core::types::{Influencer, Payout, Post, TrackingRecord};
use roi_ingest::SourceTables;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One dimension of the filter selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn only(value: impl Into<String>) -> Self {
        Selection::Only(value.into())
    }

    fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }

    /// Joined attributes can be absent (orphan foreign keys). A missing
    /// attribute matches only `All`.
    fn matches_opt(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (Selection::All, _) => true,
            (Selection::Only(wanted), Some(actual)) => wanted == actual,
            (Selection::Only(_), None) => false,
        }
    }
}

/// Inclusive date window. Anything short of a valid complete range makes
/// date filtering a no-op with a caller-visible warning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    /// No window requested; dates pass through.
    #[default]
    Unbounded,
    /// Only one bound supplied.
    Partial,
    /// Start after end.
    Inverted,
    Between {
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl DateRange {
    /// Build a range from whatever bounds the caller collected.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (None, None) => DateRange::Unbounded,
            (Some(start), Some(end)) if start > end => DateRange::Inverted,
            (Some(start), Some(end)) => DateRange::Between { start, end },
            _ => DateRange::Partial,
        }
    }

    /// Whether date filtering applies at all.
    fn is_active(&self) -> bool {
        matches!(self, DateRange::Between { .. })
    }

    /// Inclusive containment. Rows with no parseable date are excluded
    /// whenever a window is active.
    fn contains(&self, date: Option<NaiveDate>) -> bool {
        match self {
            DateRange::Between { start, end } => {
                date.map_or(false, |d| *start <= d && d <= *end)
            }
            _ => true,
        }
    }

    fn warning(&self) -> Option<&'static str> {
        match self {
            DateRange::Partial => {
                Some("Date range needs both a start and an end; date filtering was skipped.")
            }
            DateRange::Inverted => {
                Some("Date range start is after its end; date filtering was skipped.")
            }
            _ => None,
        }
    }
}

/// The analyst's current filter selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSelection {
    pub date_range: DateRange,
    pub brand: Selection,
    /// Exact product match; the host UI scopes the choices to the
    /// selected brand.
    pub product: Selection,
    pub category: Selection,
    pub platform: Selection,
}

/// Influencer attributes attached to a joined row. `None` on the row
/// means the referenced influencer_id has no reference entry.
#[derive(Debug, Clone, Serialize)]
pub struct InfluencerAttrs {
    pub name: String,
    pub category: String,
    pub gender: String,
    pub follower_count: u64,
    /// The influencer's registered platform — distinct from the
    /// platform a post went out on.
    pub platform: String,
}

impl From<&Influencer> for InfluencerAttrs {
    fn from(row: &Influencer) -> Self {
        Self {
            name: row.name.clone(),
            category: row.category.clone(),
            gender: row.gender.clone(),
            follower_count: row.follower_count,
            platform: row.platform.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackingView {
    pub record: TrackingRecord,
    pub influencer: Option<InfluencerAttrs>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub post: Post,
    pub influencer: Option<InfluencerAttrs>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayoutView {
    pub payout: Payout,
    pub influencer: Option<InfluencerAttrs>,
}

/// Output of the filter engine: three filtered, influencer-joined views
/// plus any warnings accumulated on the way.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilteredViews {
    pub tracking: Vec<TrackingView>,
    pub posts: Vec<PostView>,
    pub payouts: Vec<PayoutView>,
    pub warnings: Vec<String>,
}

/// Run the full filter pipeline over the source tables.
pub fn apply(tables: &SourceTables<'_>, selection: &FilterSelection) -> FilteredViews {
    let mut warnings = Vec::new();
    if let Some(warning) = selection.date_range.warning() {
        warnings.push(warning.to_string());
    }

    let by_id: HashMap<&str, &Influencer> = tables
        .influencers
        .iter()
        .map(|i| (i.influencer_id.as_str(), i))
        .collect();
    let attrs = |id: &str| by_id.get(id).map(|i| InfluencerAttrs::from(*i));

    let range = &selection.date_range;

    // Tracking: date window, then brand/product (native to tracking),
    // then join, then category and registered-platform filters.
    let tracking: Vec<TrackingView> = tables
        .tracking
        .iter()
        .filter(|r| range.contains(r.date))
        .filter(|r| selection.brand.matches(r.brand.as_str()))
        .filter(|r| selection.product.matches(&r.product))
        .map(|r| TrackingView {
            record: r.clone(),
            influencer: attrs(&r.influencer_id),
        })
        .filter(|v| {
            selection
                .category
                .matches_opt(v.influencer.as_ref().map(|i| i.category.as_str()))
        })
        .filter(|v| {
            selection
                .platform
                .matches_opt(v.influencer.as_ref().map(|i| i.platform.as_str()))
        })
        .collect();

    // Posts: filtered by the POST's own platform, not the influencer's
    // registered one.
    let posts: Vec<PostView> = tables
        .posts
        .iter()
        .filter(|p| range.contains(p.date))
        .map(|p| PostView {
            post: p.clone(),
            influencer: attrs(&p.influencer_id),
        })
        .filter(|v| {
            selection
                .category
                .matches_opt(v.influencer.as_ref().map(|i| i.category.as_str()))
        })
        .filter(|v| selection.platform.matches(&v.post.platform))
        .collect();

    let payouts: Vec<PayoutView> = tables
        .payouts
        .iter()
        .filter(|p| range.contains(p.payout_date))
        .map(|p| PayoutView {
            payout: p.clone(),
            influencer: attrs(&p.influencer_id),
        })
        .filter(|v| {
            selection
                .category
                .matches_opt(v.influencer.as_ref().map(|i| i.category.as_str()))
        })
        .filter(|v| {
            selection
                .platform
                .matches_opt(v.influencer.as_ref().map(|i| i.platform.as_str()))
        })
        .collect();

    debug!(
        date_filter_active = range.is_active(),
        tracking = tracking.len(),
        posts = posts.len(),
        payouts = payouts.len(),
        "filter selection applied"
    );

    FilteredViews {
        tracking,
        posts,
        payouts,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roi_core::types::PayoutBasis;
    use roi_core::Brand;

    fn influencers() -> Vec<Influencer> {
        vec![
            Influencer {
                influencer_id: "I1".into(),
                name: "Asha".into(),
                category: "Fitness".into(),
                gender: "Female".into(),
                follower_count: 120_000,
                platform: "Instagram".into(),
            },
            Influencer {
                influencer_id: "I2".into(),
                name: "Ravi".into(),
                category: "Nutrition".into(),
                gender: "Male".into(),
                follower_count: 80_000,
                platform: "YouTube".into(),
            },
        ]
    }

    fn posts() -> Vec<Post> {
        vec![
            // I1 is registered on Instagram but this post went to YouTube.
            Post {
                influencer_id: "I1".into(),
                platform: "YouTube".into(),
                date: date(2024, 1, 5),
                reach: 50_000,
                likes: 4_000,
                comments: 300,
                url: "https://example.com/p1".into(),
                caption: "launch".into(),
            },
            Post {
                influencer_id: "I2".into(),
                platform: "YouTube".into(),
                date: date(2024, 2, 5),
                reach: 20_000,
                likes: 900,
                comments: 80,
                url: "https://example.com/p2".into(),
                caption: "review".into(),
            },
        ]
    }

    fn tracking() -> Vec<TrackingRecord> {
        vec![
            TrackingRecord {
                influencer_id: "I1".into(),
                source: "Influencer Campaign".into(),
                campaign: "C1".into(),
                product: "MuscleBlaze Whey".into(),
                brand: Brand::MuscleBlaze,
                date: date(2024, 1, 10),
                revenue: 10_000.0,
                orders: 25,
            },
            TrackingRecord {
                influencer_id: "I2".into(),
                source: "Influencer Campaign".into(),
                campaign: "C2".into(),
                product: "Gritzo SuperMilk".into(),
                brand: Brand::Gritzo,
                date: date(2024, 2, 10),
                revenue: 3_000.0,
                orders: 9,
            },
            // Orphan: no reference row for I9.
            TrackingRecord {
                influencer_id: "I9".into(),
                source: "Organic".into(),
                campaign: "C1".into(),
                product: "Unknown Shaker".into(),
                brand: Brand::Other,
                date: None,
                revenue: 500.0,
                orders: 2,
            },
        ]
    }

    fn payouts() -> Vec<Payout> {
        vec![
            Payout {
                influencer_id: "I1".into(),
                campaign: "C1".into(),
                basis: PayoutBasis::Post,
                payout_date: date(2024, 1, 20),
                total_payout: 2_000.0,
            },
            Payout {
                influencer_id: "I2".into(),
                campaign: "C2".into(),
                basis: PayoutBasis::Order,
                payout_date: date(2024, 2, 20),
                total_payout: 1_500.0,
            },
        ]
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn fixture() -> (Vec<Influencer>, Vec<Post>, Vec<TrackingRecord>, Vec<Payout>) {
        (influencers(), posts(), tracking(), payouts())
    }

    fn tables<'a>(
        f: &'a (Vec<Influencer>, Vec<Post>, Vec<TrackingRecord>, Vec<Payout>),
    ) -> SourceTables<'a> {
        SourceTables {
            influencers: &f.0,
            posts: &f.1,
            tracking: &f.2,
            payouts: &f.3,
        }
    }

    #[test]
    fn test_all_selection_is_a_noop() {
        let f = fixture();
        let views = apply(&tables(&f), &FilterSelection::default());
        assert_eq!(views.tracking.len(), 3);
        assert_eq!(views.posts.len(), 2);
        assert_eq!(views.payouts.len(), 2);
        assert!(views.warnings.is_empty());
    }

    #[test]
    fn test_filtering_is_a_subset_operation() {
        let f = fixture();
        let unfiltered = apply(&tables(&f), &FilterSelection::default());
        let narrowed = apply(
            &tables(&f),
            &FilterSelection {
                brand: Selection::only("MuscleBlaze"),
                category: Selection::only("Fitness"),
                ..Default::default()
            },
        );
        assert!(narrowed.tracking.len() <= unfiltered.tracking.len());
        assert!(narrowed.posts.len() <= unfiltered.posts.len());
        assert!(narrowed.payouts.len() <= unfiltered.payouts.len());
    }

    #[test]
    fn test_date_window_applies_per_table_and_drops_null_dates() {
        let f = fixture();
        let selection = FilterSelection {
            date_range: DateRange::from_bounds(date(2024, 1, 1), date(2024, 1, 31)),
            ..Default::default()
        };
        let views = apply(&tables(&f), &selection);
        // January window: one tracking row (the orphan has no date and is
        // excluded), one post, one payout.
        assert_eq!(views.tracking.len(), 1);
        assert_eq!(views.tracking[0].record.campaign, "C1");
        assert_eq!(views.posts.len(), 1);
        assert_eq!(views.payouts.len(), 1);
    }

    #[test]
    fn test_partial_range_skips_date_filter_with_warning() {
        let f = fixture();
        let selection = FilterSelection {
            date_range: DateRange::from_bounds(date(2024, 1, 1), None),
            ..Default::default()
        };
        let views = apply(&tables(&f), &selection);
        assert_eq!(views.tracking.len(), 3);
        assert_eq!(views.warnings.len(), 1);
        assert!(views.warnings[0].contains("skipped"));
    }

    #[test]
    fn test_inverted_range_treated_like_partial() {
        let f = fixture();
        let selection = FilterSelection {
            date_range: DateRange::from_bounds(date(2024, 3, 1), date(2024, 1, 1)),
            ..Default::default()
        };
        let views = apply(&tables(&f), &selection);
        assert_eq!(views.tracking.len(), 3);
        assert_eq!(views.warnings.len(), 1);
    }

    #[test]
    fn test_brand_and_product_filter_tracking_only() {
        let f = fixture();
        let selection = FilterSelection {
            brand: Selection::only("MuscleBlaze"),
            ..Default::default()
        };
        let views = apply(&tables(&f), &selection);
        assert_eq!(views.tracking.len(), 1);
        assert_eq!(views.tracking[0].record.brand, Brand::MuscleBlaze);
        // Posts and payouts are untouched by brand.
        assert_eq!(views.posts.len(), 2);
        assert_eq!(views.payouts.len(), 2);
    }

    #[test]
    fn test_left_join_keeps_orphans_with_none_attrs() {
        let f = fixture();
        let views = apply(&tables(&f), &FilterSelection::default());
        let orphan = views
            .tracking
            .iter()
            .find(|v| v.record.influencer_id == "I9")
            .expect("orphan row kept");
        assert!(orphan.influencer.is_none());
    }

    #[test]
    fn test_category_filter_drops_orphans() {
        let f = fixture();
        let selection = FilterSelection {
            category: Selection::only("Fitness"),
            ..Default::default()
        };
        let views = apply(&tables(&f), &selection);
        assert_eq!(views.tracking.len(), 1);
        assert_eq!(views.tracking[0].record.influencer_id, "I1");
        assert_eq!(views.payouts.len(), 1);
    }

    #[test]
    fn test_platform_attribution_is_not_conflated() {
        let f = fixture();

        // I1 registered on Instagram, but their post went out on YouTube.
        // Filtering on YouTube keeps the post (its own platform) while the
        // tracking/payout rows follow the registered platform instead.
        let youtube = apply(
            &tables(&f),
            &FilterSelection {
                platform: Selection::only("YouTube"),
                ..Default::default()
            },
        );
        assert!(youtube
            .posts
            .iter()
            .any(|v| v.post.influencer_id == "I1"));
        assert!(!youtube
            .tracking
            .iter()
            .any(|v| v.record.influencer_id == "I1"));

        // The reverse: Instagram keeps I1's tracking row but not the post.
        let instagram = apply(
            &tables(&f),
            &FilterSelection {
                platform: Selection::only("Instagram"),
                ..Default::default()
            },
        );
        assert!(!instagram
            .posts
            .iter()
            .any(|v| v.post.influencer_id == "I1"));
        assert!(instagram
            .tracking
            .iter()
            .any(|v| v.record.influencer_id == "I1"));
    }
}
