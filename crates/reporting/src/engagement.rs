//! Post engagement ranking and scatter data.

use std::cmp::Ordering;

use chrono::NaiveDate;
use roi_core::metrics::engagement_rate;
use serde::Serialize;

use crate::filter::FilteredViews;

#[derive(Debug, Clone, Serialize)]
pub struct PostEngagementRow {
    pub influencer_id: String,
    pub influencer_name: Option<String>,
    /// Platform the post went out on.
    pub platform: String,
    pub date: Option<NaiveDate>,
    pub url: String,
    pub reach: u64,
    pub likes: u64,
    pub comments: u64,
    /// `None` for zero-reach posts, which have no defined rate.
    pub engagement_rate: Option<f64>,
}

/// Per-post engagement with the guarded rate attached.
pub fn post_engagement(views: &FilteredViews) -> Vec<PostEngagementRow> {
    views
        .posts
        .iter()
        .map(|view| PostEngagementRow {
            influencer_id: view.post.influencer_id.clone(),
            influencer_name: view.influencer.as_ref().map(|a| a.name.clone()),
            platform: view.post.platform.clone(),
            date: view.post.date,
            url: view.post.url.clone(),
            reach: view.post.reach,
            likes: view.post.likes,
            comments: view.post.comments,
            engagement_rate: engagement_rate(view.post.likes, view.post.comments, view.post.reach),
        })
        .collect()
}

/// Top `n` posts by engagement rate. Posts without a defined rate cannot
/// rank.
pub fn top_by_engagement(rows: &[PostEngagementRow], n: usize) -> Vec<PostEngagementRow> {
    let mut ranked: Vec<PostEngagementRow> = rows
        .iter()
        .filter(|r| r.engagement_rate.is_some())
        .cloned()
        .collect();
    ranked.sort_by(|a, b| {
        b.engagement_rate
            .partial_cmp(&a.engagement_rate)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(n);
    ranked
}

/// A (reach, engagement_rate) pair for scatter plots.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScatterPoint {
    pub reach: u64,
    pub engagement_rate: f64,
}

/// Scatter-ready pairs; unrated (zero-reach) posts are omitted.
pub fn engagement_scatter(rows: &[PostEngagementRow]) -> Vec<ScatterPoint> {
    rows.iter()
        .filter_map(|r| {
            r.engagement_rate.map(|rate| ScatterPoint {
                reach: r.reach,
                engagement_rate: rate,
            })
        })
        .collect()
}
