//! Session-scoped table state and the upload gate.

use std::io::Read;

use chrono::{DateTime, Utc};
use roi_core::types::{Influencer, Payout, Post, TrackingRecord};
use roi_core::{Brand, RoiResult};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::loader;

/// Borrowed bundle of all four loaded tables, handed to the filter
/// pipeline. Only obtainable once every table is uploaded and non-empty.
#[derive(Debug, Clone, Copy)]
pub struct SourceTables<'a> {
    pub influencers: &'a [Influencer],
    pub posts: &'a [Post],
    pub tracking: &'a [TrackingRecord],
    pub payouts: &'a [Payout],
}

/// Distinct values for the host UI's filter dropdowns.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub brands: Vec<String>,
    pub products: Vec<String>,
    pub categories: Vec<String>,
    pub platforms: Vec<String>,
}

/// All four source tables for one analyst session.
///
/// An upload replaces its table wholesale; nothing merges. The session is
/// plain owned state passed by reference into the pipeline, not a
/// process-wide registry.
#[derive(Debug)]
pub struct DashboardSession {
    session_id: Uuid,
    updated_at: Option<DateTime<Utc>>,
    influencers: Option<Vec<Influencer>>,
    posts: Option<Vec<Post>>,
    tracking: Option<Vec<TrackingRecord>>,
    payouts: Option<Vec<Payout>>,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            updated_at: None,
            influencers: None,
            posts: None,
            tracking: None,
            payouts: None,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Load (or reload) the influencer reference table. On failure the
    /// previous table is left untouched.
    pub fn load_influencers<R: Read>(&mut self, input: R) -> RoiResult<usize> {
        let rows = loader::load_influencers(input)?;
        self.note_replace("influencers", self.influencers.is_some());
        let count = rows.len();
        self.influencers = Some(rows);
        self.touch("influencers", count);
        Ok(count)
    }

    pub fn load_posts<R: Read>(&mut self, input: R) -> RoiResult<usize> {
        let rows = loader::load_posts(input)?;
        self.note_replace("posts", self.posts.is_some());
        let count = rows.len();
        self.posts = Some(rows);
        self.touch("posts", count);
        Ok(count)
    }

    pub fn load_tracking<R: Read>(&mut self, input: R) -> RoiResult<usize> {
        let rows = loader::load_tracking(input)?;
        self.note_replace("tracking_data", self.tracking.is_some());
        let count = rows.len();
        self.tracking = Some(rows);
        self.touch("tracking_data", count);
        Ok(count)
    }

    pub fn load_payouts<R: Read>(&mut self, input: R) -> RoiResult<usize> {
        let rows = loader::load_payouts(input)?;
        self.note_replace("payouts", self.payouts.is_some());
        let count = rows.len();
        self.payouts = Some(rows);
        self.touch("payouts", count);
        Ok(count)
    }

    /// All four tables, once the upload gate is satisfied.
    pub fn tables(&self) -> Option<SourceTables<'_>> {
        match (&self.influencers, &self.posts, &self.tracking, &self.payouts) {
            (Some(influencers), Some(posts), Some(tracking), Some(payouts))
                if !influencers.is_empty()
                    && !posts.is_empty()
                    && !tracking.is_empty()
                    && !payouts.is_empty() =>
            {
                Some(SourceTables {
                    influencers,
                    posts,
                    tracking,
                    payouts,
                })
            }
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.tables().is_some()
    }

    /// Tables still required before any report can render. An uploaded
    /// file that parsed to zero rows counts as not yet loaded.
    pub fn missing_uploads(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if Self::absent(&self.influencers) {
            missing.push("influencers");
        }
        if Self::absent(&self.posts) {
            missing.push("posts");
        }
        if Self::absent(&self.tracking) {
            missing.push("tracking_data");
        }
        if Self::absent(&self.payouts) {
            missing.push("payouts");
        }
        missing
    }

    /// Distinct filter values harvested from whatever is loaded so far.
    /// The product list is scoped to `brand` when one is selected.
    pub fn filter_options(&self, brand: Option<Brand>) -> FilterOptions {
        let tracking = self.tracking.as_deref().unwrap_or(&[]);
        let influencers = self.influencers.as_deref().unwrap_or(&[]);
        let posts = self.posts.as_deref().unwrap_or(&[]);

        let mut brands: Vec<String> = tracking.iter().map(|r| r.brand.to_string()).collect();
        let mut products: Vec<String> = tracking
            .iter()
            .filter(|r| brand.map_or(true, |b| r.brand == b))
            .map(|r| r.product.clone())
            .collect();
        let mut categories: Vec<String> =
            influencers.iter().map(|i| i.category.clone()).collect();
        let mut platforms: Vec<String> = influencers
            .iter()
            .map(|i| i.platform.clone())
            .chain(posts.iter().map(|p| p.platform.clone()))
            .collect();

        for list in [&mut brands, &mut products, &mut categories, &mut platforms] {
            list.sort();
            list.dedup();
        }

        FilterOptions {
            brands,
            products,
            categories,
            platforms,
        }
    }

    fn absent<T>(table: &Option<Vec<T>>) -> bool {
        table.as_ref().map_or(true, |rows| rows.is_empty())
    }

    fn note_replace(&self, table: &'static str, had_prior: bool) {
        if had_prior {
            warn!(table, session = %self.session_id, "replacing previously loaded table");
        }
    }

    fn touch(&mut self, table: &'static str, rows: usize) {
        self.updated_at = Some(Utc::now());
        info!(table, rows, session = %self.session_id, "table loaded");
        if rows == 0 {
            warn!(table, "file parsed to zero rows; table still counts as missing");
        }
    }
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new()
    }
}
