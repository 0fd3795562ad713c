use async_trait::async_trait;
use std::sync::Arc;

use crate::pairing::{eligible_bottles, generate_bundles};
use crate::source::Source;
use crate::types::{Bottle, BundleCandidate, BundleQuery};

/// Source that turns a loaded catalog into bundle candidates.
///
/// The source:
/// 1. Drops bottles outside the 750 mL / 1.5 L / 1.75 L sizes
/// 2. Pairs bottles of the same brand
/// 3. Pairs bottles of different brands within $10 of each other
/// 4. Skips bundle names already in the query's processed set
pub struct CatalogPairSource {
    bottles: Vec<Arc<Bottle>>,
}

impl CatalogPairSource {
    pub fn new(bottles: Vec<Arc<Bottle>>) -> Self {
        Self { bottles }
    }
}

#[async_trait]
impl Source<BundleQuery, BundleCandidate> for CatalogPairSource {
    fn enable(&self, _query: &BundleQuery) -> bool {
        !self.bottles.is_empty()
    }

    async fn get_candidates(&self, query: &BundleQuery) -> Result<Vec<BundleCandidate>, String> {
        let valid = eligible_bottles(&self.bottles);
        if valid.is_empty() {
            log::info!(
                "request_id={} no bottles in a bundle size (750 ml | 1.5 L | 1.75 L)",
                query.request_id
            );
            return Ok(Vec::new());
        }

        let candidates = generate_bundles(&valid, &query.processed);
        log::info!(
            "request_id={} {} of {} bottles size-valid, {} new combos",
            query.request_id,
            valid.len(),
            self.bottles.len(),
            candidates.len()
        );
        Ok(candidates)
    }
}
