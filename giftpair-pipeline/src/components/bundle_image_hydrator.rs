use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::collaborators::ImageComposer;
use crate::hydrator::Hydrator;
use crate::types::{Bottle, BundleCandidate, BundleQuery};

/// File name for a bundle photo: spaces become underscores.
pub fn bundle_image_file_name(bundle_name: &str) -> String {
    format!("{}.jpg", bundle_name.replace(' ', "_"))
}

/// Composes a side-by-side photo for each selected bundle.
///
/// Bundles whose bottles lack a local photo on disk, or whose composition
/// fails, keep an empty image reference and are still exported.
pub struct BundleImageHydrator {
    composer: Arc<dyn ImageComposer>,
    output_dir: PathBuf,
}

impl BundleImageHydrator {
    pub fn new(composer: Arc<dyn ImageComposer>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            composer,
            output_dir: output_dir.into(),
        }
    }

    async fn compose(&self, request_id: &str, candidate: &BundleCandidate) -> String {
        let (Some(left), Some(right)) = (
            local_image(&candidate.bottles.first),
            local_image(&candidate.bottles.second),
        ) else {
            log::info!(
                "request_id={} missing image file for bundle '{}'",
                request_id,
                candidate.name
            );
            return String::new();
        };

        if let Err(err) = tokio::fs::create_dir_all(&self.output_dir).await {
            log::error!(
                "request_id={} cannot create {}: {}",
                request_id,
                self.output_dir.display(),
                err
            );
            return String::new();
        }

        let output = self.output_dir.join(bundle_image_file_name(&candidate.name));
        match self.composer.compose(&left, &right, &output).await {
            Ok(written) => written.display().to_string(),
            Err(err) => {
                log::warn!(
                    "request_id={} composer={} failed for '{}': {}",
                    request_id,
                    self.composer.name(),
                    candidate.name,
                    err
                );
                String::new()
            }
        }
    }
}

/// The bottle's photo path, when it names an existing file.
fn local_image(bottle: &Bottle) -> Option<PathBuf> {
    let path = Path::new(bottle.image.as_deref()?);
    path.is_file().then(|| path.to_path_buf())
}

#[async_trait]
impl Hydrator<BundleQuery, BundleCandidate> for BundleImageHydrator {
    async fn hydrate(
        &self,
        query: &BundleQuery,
        candidates: &[BundleCandidate],
    ) -> Result<Vec<BundleCandidate>, String> {
        let mut hydrated = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            hydrated.push(BundleCandidate {
                image_src: Some(self.compose(&query.request_id, candidate).await),
                ..BundleCandidate::default()
            });
        }
        Ok(hydrated)
    }

    fn update(&self, candidate: &mut BundleCandidate, hydrated: BundleCandidate) {
        candidate.image_src = hydrated.image_src;
    }
}
