use async_trait::async_trait;
use std::sync::Arc;

use crate::collaborators::CopyGenerator;
use crate::hydrator::Hydrator;
use crate::types::{BundleCandidate, BundleQuery};

/// Fills in listing copy for each selected bundle.
///
/// A failed generation leaves the body empty instead of dropping the bundle.
pub struct DescriptionHydrator {
    generator: Arc<dyn CopyGenerator>,
}

impl DescriptionHydrator {
    pub fn new(generator: Arc<dyn CopyGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Hydrator<BundleQuery, BundleCandidate> for DescriptionHydrator {
    async fn hydrate(
        &self,
        query: &BundleQuery,
        candidates: &[BundleCandidate],
    ) -> Result<Vec<BundleCandidate>, String> {
        let mut hydrated = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let description = match self.generator.describe(&candidate.name).await {
                Ok(text) => text,
                Err(err) => {
                    log::warn!(
                        "request_id={} generator={} no description for '{}': {}",
                        query.request_id,
                        self.generator.name(),
                        candidate.name,
                        err
                    );
                    String::new()
                }
            };
            hydrated.push(BundleCandidate {
                description: Some(description),
                ..BundleCandidate::default()
            });
        }
        Ok(hydrated)
    }

    fn update(&self, candidate: &mut BundleCandidate, hydrated: BundleCandidate) {
        candidate.description = hydrated.description;
    }
}
