//! Dashboard assembly — the one entry point the host UI calls per
//! interaction. Every call recomputes the full pipeline from the source
//! tables; nothing is cached between filter changes.

use chrono::{DateTime, Utc};
use roi_core::DashboardConfig;
use roi_ingest::DashboardSession;
use serde::Serialize;
use tracing::info;

use crate::campaign::{self, CampaignSummaryRow, IncrementalRoas};
use crate::engagement::{self, PostEngagementRow, ScatterPoint};
use crate::filter::{self, FilterSelection};
use crate::influencer::{self, InfluencerSummaryRow, PersonaRow};
use crate::payout::{self, BasisPayoutRow, InfluencerPayoutRow};

/// Top-line KPI row over the filtered window.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    /// Revenue across all tracking sources.
    pub total_revenue: f64,
    /// Revenue attributed to the influencer program.
    pub influencer_revenue: f64,
    pub total_orders: u64,
    pub total_payout: f64,
    /// ROAS of influencer revenue against total payout.
    pub overall_roas: f64,
}

/// Everything the presentation layer renders for one filter selection.
#[derive(Debug, Clone, Serialize)]
pub struct ReportBundle {
    pub overview: Overview,
    pub campaigns: Vec<CampaignSummaryRow>,
    pub incremental: IncrementalRoas,
    pub influencers: Vec<InfluencerSummaryRow>,
    pub top_by_revenue: Vec<InfluencerSummaryRow>,
    pub top_by_roas: Vec<InfluencerSummaryRow>,
    pub poor_roi: Vec<InfluencerSummaryRow>,
    pub personas: Vec<PersonaRow>,
    pub top_posts: Vec<PostEngagementRow>,
    pub engagement_scatter: Vec<ScatterPoint>,
    pub payout_by_influencer: Vec<InfluencerPayoutRow>,
    pub payout_by_basis: Vec<BasisPayoutRow>,
    /// Recoverable degradations (e.g. a skipped date filter).
    pub warnings: Vec<String>,
    /// Explicit empty-result notes, rendered instead of blank tables.
    pub notes: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Either the upload gate or a full report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum DashboardReport {
    /// Not all four tables are loaded; render the gating message.
    AwaitingUploads { missing: Vec<&'static str> },
    Ready(Box<ReportBundle>),
}

impl DashboardReport {
    /// Run the full pipeline for one filter selection.
    pub fn build(
        session: &DashboardSession,
        selection: &FilterSelection,
        config: &DashboardConfig,
    ) -> DashboardReport {
        let Some(tables) = session.tables() else {
            let missing = session.missing_uploads();
            info!(?missing, "dashboard gated on uploads");
            return DashboardReport::AwaitingUploads { missing };
        };

        let views = filter::apply(&tables, selection);
        let mut notes = Vec::new();

        let campaigns = campaign::campaign_summary(&views);
        if campaigns.is_empty() {
            notes.push("No campaign revenue or payouts match the current filters.".to_string());
        }
        let incremental = campaign::incremental_roas(&views);

        let influencers = influencer::influencer_summary(&views);
        let top_by_revenue = influencer::top_by_revenue(&influencers, config.ranking_size);
        let top_by_roas = influencer::top_by_roas(&influencers, config.ranking_size);
        let poor_roi = influencer::poor_roi(&influencers, config.poor_roi_threshold);
        if poor_roi.is_empty() {
            notes.push(format!(
                "No influencers below the {:.0}% ROAS threshold.",
                config.poor_roi_threshold
            ));
        }
        let personas = influencer::persona_summary(&influencers);

        let posts = engagement::post_engagement(&views);
        let top_posts = engagement::top_by_engagement(&posts, config.ranking_size);
        let engagement_scatter = engagement::engagement_scatter(&posts);

        let payout_by_influencer = payout::payout_by_influencer(&views);
        let payout_by_basis = payout::payout_by_basis(&views);

        let overview = overview(&views, &incremental);
        info!(
            session = %session.session_id(),
            campaigns = campaigns.len(),
            influencers = influencers.len(),
            warnings = views.warnings.len(),
            "report generated"
        );

        DashboardReport::Ready(Box::new(ReportBundle {
            overview,
            campaigns,
            incremental,
            influencers,
            top_by_revenue,
            top_by_roas,
            poor_roi,
            personas,
            top_posts,
            engagement_scatter,
            payout_by_influencer,
            payout_by_basis,
            warnings: views.warnings.clone(),
            notes,
            generated_at: Utc::now(),
        }))
    }
}

fn overview(views: &filter::FilteredViews, incremental: &IncrementalRoas) -> Overview {
    let total_revenue: f64 = views.tracking.iter().map(|v| v.record.revenue).sum();
    let total_orders: u64 = views.tracking.iter().map(|v| v.record.orders).sum();
    Overview {
        total_revenue,
        influencer_revenue: incremental.influencer_revenue,
        total_orders,
        total_payout: incremental.total_payout,
        overall_roas: roi_core::metrics::roas(
            incremental.influencer_revenue,
            incremental.total_payout,
        ),
    }
}
