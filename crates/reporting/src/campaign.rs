//! Campaign-level revenue, payout, and ROAS summaries.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use roi_core::metrics::roas;
use roi_core::types::INFLUENCER_CAMPAIGN;
use serde::Serialize;

use crate::filter::FilteredViews;

/// Fixed caveat attached to every incremental-ROAS result.
pub const INCREMENTAL_ROAS_CAVEAT: &str = "Incremental ROAS is a simplified heuristic \
     (influencer revenue minus the non-influencer baseline), not a causal estimate.";

#[derive(Debug, Clone, Serialize)]
pub struct CampaignSummaryRow {
    pub campaign: String,
    pub revenue: f64,
    pub orders: u64,
    pub total_payout: f64,
    pub roas: f64,
}

/// Group influencer-campaign revenue and payouts by campaign, outer-join
/// the two groupings (a campaign present on either side appears, with the
/// missing side at 0), compute ROAS, and sort descending by ROAS.
pub fn campaign_summary(views: &FilteredViews) -> Vec<CampaignSummaryRow> {
    let mut revenue: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
    for view in &views.tracking {
        if view.record.source == INFLUENCER_CAMPAIGN {
            let entry = revenue.entry(view.record.campaign.as_str()).or_insert((0.0, 0));
            entry.0 += view.record.revenue;
            entry.1 += view.record.orders;
        }
    }

    let mut payouts: BTreeMap<&str, f64> = BTreeMap::new();
    for view in &views.payouts {
        *payouts.entry(view.payout.campaign.as_str()).or_insert(0.0) +=
            view.payout.total_payout;
    }

    let campaigns: BTreeSet<&str> = revenue.keys().chain(payouts.keys()).copied().collect();
    let mut rows: Vec<CampaignSummaryRow> = campaigns
        .into_iter()
        .map(|campaign| {
            let (rev, orders) = revenue.get(campaign).copied().unwrap_or((0.0, 0));
            let payout = payouts.get(campaign).copied().unwrap_or(0.0);
            CampaignSummaryRow {
                campaign: campaign.to_string(),
                revenue: rev,
                orders,
                total_payout: payout,
                roas: roas(rev, payout),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.roas.partial_cmp(&a.roas).unwrap_or(Ordering::Equal));
    rows
}

/// The campaign tab's incremental-ROAS heuristic.
#[derive(Debug, Clone, Serialize)]
pub struct IncrementalRoas {
    pub influencer_revenue: f64,
    pub baseline_revenue: f64,
    pub incremental_revenue: f64,
    pub total_payout: f64,
    pub incremental_roas: f64,
    pub caveat: &'static str,
}

/// Baseline is all revenue NOT attributed to the influencer program
/// within the filtered window. The heuristic zeroes out whenever the
/// baseline meets or exceeds influencer revenue.
pub fn incremental_roas(views: &FilteredViews) -> IncrementalRoas {
    let influencer_revenue: f64 = views
        .tracking
        .iter()
        .filter(|v| v.record.source == INFLUENCER_CAMPAIGN)
        .map(|v| v.record.revenue)
        .sum();
    let baseline_revenue: f64 = views
        .tracking
        .iter()
        .filter(|v| v.record.source != INFLUENCER_CAMPAIGN)
        .map(|v| v.record.revenue)
        .sum();
    let total_payout: f64 = views.payouts.iter().map(|v| v.payout.total_payout).sum();

    let incremental_revenue = influencer_revenue - baseline_revenue;
    let incremental = if influencer_revenue > baseline_revenue {
        roas(incremental_revenue, total_payout)
    } else {
        0.0
    };

    IncrementalRoas {
        influencer_revenue,
        baseline_revenue,
        incremental_revenue,
        total_payout,
        incremental_roas: incremental,
        caveat: INCREMENTAL_ROAS_CAVEAT,
    }
}
