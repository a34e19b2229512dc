//! Per-influencer ROI summaries, rankings, and persona groupings.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use roi_core::metrics::roas;
use roi_core::types::INFLUENCER_CAMPAIGN;
use serde::Serialize;

use crate::filter::{FilteredViews, InfluencerAttrs};

#[derive(Debug, Clone, Serialize)]
pub struct InfluencerSummaryRow {
    pub influencer_id: String,
    pub name: Option<String>,
    pub category: Option<String>,
    pub gender: Option<String>,
    pub follower_count: Option<u64>,
    pub platform: Option<String>,
    pub revenue: f64,
    pub orders: u64,
    pub total_payout: f64,
    pub roas: f64,
}

/// Same pattern as the campaign summary, grouped by influencer_id and
/// decorated with reference attributes where the join found them.
/// Sorted descending by ROAS.
pub fn influencer_summary(views: &FilteredViews) -> Vec<InfluencerSummaryRow> {
    let mut revenue: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
    for view in &views.tracking {
        if view.record.source == INFLUENCER_CAMPAIGN {
            let entry = revenue
                .entry(view.record.influencer_id.as_str())
                .or_insert((0.0, 0));
            entry.0 += view.record.revenue;
            entry.1 += view.record.orders;
        }
    }

    let mut payouts: BTreeMap<&str, f64> = BTreeMap::new();
    for view in &views.payouts {
        *payouts
            .entry(view.payout.influencer_id.as_str())
            .or_insert(0.0) += view.payout.total_payout;
    }

    let mut attrs: BTreeMap<&str, &InfluencerAttrs> = BTreeMap::new();
    for view in &views.tracking {
        if let Some(a) = &view.influencer {
            attrs.entry(view.record.influencer_id.as_str()).or_insert(a);
        }
    }
    for view in &views.payouts {
        if let Some(a) = &view.influencer {
            attrs.entry(view.payout.influencer_id.as_str()).or_insert(a);
        }
    }

    let ids: std::collections::BTreeSet<&str> =
        revenue.keys().chain(payouts.keys()).copied().collect();
    let mut rows: Vec<InfluencerSummaryRow> = ids
        .into_iter()
        .map(|id| {
            let (rev, orders) = revenue.get(id).copied().unwrap_or((0.0, 0));
            let payout = payouts.get(id).copied().unwrap_or(0.0);
            let joined = attrs.get(id);
            InfluencerSummaryRow {
                influencer_id: id.to_string(),
                name: joined.map(|a| a.name.clone()),
                category: joined.map(|a| a.category.clone()),
                gender: joined.map(|a| a.gender.clone()),
                follower_count: joined.map(|a| a.follower_count),
                platform: joined.map(|a| a.platform.clone()),
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

/// Top `n` influencers by revenue.
pub fn top_by_revenue(rows: &[InfluencerSummaryRow], n: usize) -> Vec<InfluencerSummaryRow> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| b.revenue.partial_cmp(&a.revenue).unwrap_or(Ordering::Equal));
    ranked.truncate(n);
    ranked
}

/// Top `n` influencers by ROAS. Input is already ROAS-sorted.
pub fn top_by_roas(rows: &[InfluencerSummaryRow], n: usize) -> Vec<InfluencerSummaryRow> {
    rows.iter().take(n).cloned().collect()
}

/// Influencers whose ROAS sits below the threshold percentage.
pub fn poor_roi(rows: &[InfluencerSummaryRow], threshold: f64) -> Vec<InfluencerSummaryRow> {
    rows.iter()
        .filter(|r| r.roas < threshold)
        .cloned()
        .collect()
}

/// A (category, gender) persona cell.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaRow {
    pub category: String,
    pub gender: String,
    pub influencers: u64,
    /// Mean of the member influencers' ROAS values, not the ROAS of the
    /// summed totals.
    pub avg_roas: f64,
    pub total_revenue: f64,
}

/// Group influencer summaries by (category, gender). Rows whose join
/// found no reference attributes carry no persona and are left out.
pub fn persona_summary(rows: &[InfluencerSummaryRow]) -> Vec<PersonaRow> {
    let mut groups: BTreeMap<(&str, &str), (u64, f64, f64)> = BTreeMap::new();
    for row in rows {
        if let (Some(category), Some(gender)) = (&row.category, &row.gender) {
            let entry = groups
                .entry((category.as_str(), gender.as_str()))
                .or_insert((0, 0.0, 0.0));
            entry.0 += 1;
            entry.1 += row.roas;
            entry.2 += row.revenue;
        }
    }

    groups
        .into_iter()
        .map(|((category, gender), (count, roas_sum, revenue_sum))| PersonaRow {
            category: category.to_string(),
            gender: gender.to_string(),
            influencers: count,
            avg_roas: roas_sum / count as f64,
            total_revenue: revenue_sum,
        })
        .collect()
}
