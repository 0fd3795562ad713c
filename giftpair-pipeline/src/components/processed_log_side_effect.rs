use async_trait::async_trait;
use std::sync::Arc;

use crate::side_effect::{SideEffect, SideEffectInput};
use crate::store::{load_processed_or_reset, ProcessedNames, Store};
use crate::types::{BundleCandidate, BundleQuery};

/// Records each finalized bundle in the processed log.
///
/// The log is re-saved after every bundle, so an interrupted run keeps
/// what it already finished.
pub struct ProcessedLogSideEffect {
    store: Arc<dyn Store<ProcessedNames>>,
}

impl ProcessedLogSideEffect {
    pub fn new(store: Arc<dyn Store<ProcessedNames>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SideEffect<BundleQuery, BundleCandidate> for ProcessedLogSideEffect {
    async fn run(
        &self,
        input: Arc<SideEffectInput<BundleQuery, BundleCandidate>>,
    ) -> Result<(), String> {
        let mut processed = load_processed_or_reset(self.store.as_ref());
        for candidate in &input.selected_candidates {
            if processed.insert(candidate.name.clone()) {
                self.store.save(&processed).map_err(|e| e.to_string())?;
            }
        }
        log::info!(
            "request_id={} processed log now holds {} bundles",
            input.query.request_id,
            processed.len()
        );
        Ok(())
    }
}
