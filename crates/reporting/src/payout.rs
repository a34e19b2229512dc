//! Payout breakdowns by influencer and by basis.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use roi_core::types::PayoutBasis;
use serde::Serialize;

use crate::filter::FilteredViews;

#[derive(Debug, Clone, Serialize)]
pub struct InfluencerPayoutRow {
    pub influencer_id: String,
    pub name: Option<String>,
    pub total_payout: f64,
}

/// Total payout per influencer, joined with the display name, sorted
/// descending.
pub fn payout_by_influencer(views: &FilteredViews) -> Vec<InfluencerPayoutRow> {
    let mut totals: BTreeMap<&str, (Option<&str>, f64)> = BTreeMap::new();
    for view in &views.payouts {
        let entry = totals
            .entry(view.payout.influencer_id.as_str())
            .or_insert((None, 0.0));
        entry.1 += view.payout.total_payout;
        if entry.0.is_none() {
            entry.0 = view.influencer.as_ref().map(|a| a.name.as_str());
        }
    }

    let mut rows: Vec<InfluencerPayoutRow> = totals
        .into_iter()
        .map(|(id, (name, total))| InfluencerPayoutRow {
            influencer_id: id.to_string(),
            name: name.map(str::to_string),
            total_payout: total,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_payout
            .partial_cmp(&a.total_payout)
            .unwrap_or(Ordering::Equal)
    });
    rows
}

#[derive(Debug, Clone, Serialize)]
pub struct BasisPayoutRow {
    pub basis: PayoutBasis,
    pub total_payout: f64,
    /// Share of the overall payout total, for proportional (pie) display.
    pub share_pct: f64,
}

/// Total payout per basis with each basis's share of the total.
pub fn payout_by_basis(views: &FilteredViews) -> Vec<BasisPayoutRow> {
    let mut totals: BTreeMap<PayoutBasis, f64> = BTreeMap::new();
    for view in &views.payouts {
        *totals.entry(view.payout.basis).or_insert(0.0) += view.payout.total_payout;
    }

    let overall: f64 = totals.values().sum();
    totals
        .into_iter()
        .map(|(basis, total)| BasisPayoutRow {
            basis,
            total_payout: total,
            share_pct: if overall > 0.0 {
                total / overall * 100.0
            } else {
                0.0
            },
        })
        .collect()
}
