//! Brand classification for tracking records.

use serde::{Deserialize, Serialize};

/// Brand labels derived from product names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Brand {
    MuscleBlaze,
    HKVitals,
    Gritzo,
    Other,
}

/// Ordered substring rules, matched case-insensitively. First match wins.
const BRAND_RULES: &[(&str, Brand)] = &[
    ("muscleblaze", Brand::MuscleBlaze),
    ("hkvitals", Brand::HKVitals),
    ("hk vitals", Brand::HKVitals),
    ("gritzo", Brand::Gritzo),
];

impl Brand {
    /// Classify a product name. Total: anything unrecognized is `Other`.
    pub fn classify(product_name: &str) -> Brand {
        let name = product_name.to_lowercase();
        BRAND_RULES
            .iter()
            .find(|(needle, _)| name.contains(needle))
            .map(|(_, brand)| *brand)
            .unwrap_or(Brand::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Brand::MuscleBlaze => "MuscleBlaze",
            Brand::HKVitals => "HKVitals",
            Brand::Gritzo => "Gritzo",
            Brand::Other => "Other",
        }
    }

    /// Every label a product can classify into, in rule order.
    pub fn all() -> &'static [Brand] {
        &[Brand::MuscleBlaze, Brand::HKVitals, Brand::Gritzo, Brand::Other]
    }
}

impl std::fmt::Display for Brand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
