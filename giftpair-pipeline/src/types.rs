use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::candidate_pipeline::HasRequestId;

/// Score used whenever the judgment service cannot produce a usable number.
pub const NEUTRAL_SCORE: f64 = 50.0;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// One batch run over a catalog category.
#[derive(Clone, Debug, Default)]
pub struct BundleQuery {
    pub request_id: String,
    /// Storefront category name, e.g. "Tequila".
    pub category: String,
    /// Bundle names emitted by earlier runs. Filled by the processed-log
    /// query hydrator.
    pub processed: Arc<BTreeSet<String>>,
}

impl BundleQuery {
    pub fn new(request_id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            category: category.into(),
            processed: Arc::new(BTreeSet::new()),
        }
    }
}

impl HasRequestId for BundleQuery {
    fn request_id(&self) -> &str {
        &self.request_id
    }
}

// ---------------------------------------------------------------------------
// Catalog types
// ---------------------------------------------------------------------------

/// A single catalog product.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bottle {
    pub name: String,
    pub brand: String,
    pub price: Decimal,
    /// Resolved container size in milliliters.
    pub volume_ml: u32,
    /// Local path to the product photo, when one was downloaded.
    pub image: Option<String>,
}

impl Bottle {
    /// Lowercased brand used for same-brand grouping.
    pub fn brand_key(&self) -> String {
        self.brand.to_lowercase()
    }
}

// ---------------------------------------------------------------------------
// Candidate types
// ---------------------------------------------------------------------------

/// The two bottles that make up a bundle, in enumeration order.
///
/// Bottles are shared with the catalog rather than copied.
#[derive(Clone, Debug, Default)]
pub struct BottlePair {
    pub first: Arc<Bottle>,
    pub second: Arc<Bottle>,
}

impl BottlePair {
    pub fn new(first: Arc<Bottle>, second: Arc<Bottle>) -> Self {
        Self { first, second }
    }

    /// Bundle name, `"<first> & <second>"`. Also the dedup key.
    pub fn bundle_name(&self) -> String {
        format!("{} & {}", self.first.name, self.second.name)
    }

    /// Score cache key, `"<first>||<second>"`.
    ///
    /// Order sensitive: (A, B) and (B, A) are different keys.
    pub fn cache_key(&self) -> String {
        format!("{}||{}", self.first.name, self.second.name)
    }
}

/// Outcome of asking the judgment service about a pairing.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Synergy {
    /// Fresh score parsed from the service response.
    Judged { score: f64 },
    /// Score read back from the persisted cache.
    Cached { score: f64 },
    /// The call failed or the reply held no number.
    Degraded { reason: String },
}

impl Synergy {
    /// Numeric score used for ranking. Degraded outcomes read as neutral.
    pub fn score(&self) -> f64 {
        match self {
            Synergy::Judged { score } | Synergy::Cached { score } => *score,
            Synergy::Degraded { .. } => NEUTRAL_SCORE,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Synergy::Degraded { .. })
    }
}

impl fmt::Display for Synergy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Synergy::Judged { score } => write!(f, "{:.0}", score),
            Synergy::Cached { score } => write!(f, "{:.0} (cached)", score),
            Synergy::Degraded { .. } => write!(f, "{:.0} (fallback)", NEUTRAL_SCORE),
        }
    }
}

/// A proposed two-bottle gift bundle.
#[derive(Clone, Debug, Default)]
pub struct BundleCandidate {
    pub name: String,
    pub price: Decimal,
    pub bottles: BottlePair,

    // Populated by the synergy scorer
    pub synergy: Option<Synergy>,

    // Populated by post-selection hydrators
    pub product_category: Option<String>,
    /// Path of the composed bundle photo, empty when composition was skipped.
    pub image_src: Option<String>,
    /// HTML body copy.
    pub description: Option<String>,
}

impl BundleCandidate {
    /// Ranking score; unscored candidates sort last.
    pub fn score(&self) -> f64 {
        self.synergy
            .as_ref()
            .map(Synergy::score)
            .unwrap_or(f64::NEG_INFINITY)
    }
}
