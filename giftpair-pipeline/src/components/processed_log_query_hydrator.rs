use async_trait::async_trait;
use std::sync::Arc;

use crate::query_hydrator::QueryHydrator;
use crate::store::{load_processed_or_reset, ProcessedNames, Store};
use crate::types::BundleQuery;

/// Hydrates the query with bundle names emitted by earlier runs.
///
/// A missing log reads as empty. A corrupt log is reset to an empty list
/// with a warning rather than failing the run.
pub struct ProcessedLogQueryHydrator {
    store: Arc<dyn Store<ProcessedNames>>,
}

impl ProcessedLogQueryHydrator {
    pub fn new(store: Arc<dyn Store<ProcessedNames>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl QueryHydrator<BundleQuery> for ProcessedLogQueryHydrator {
    async fn hydrate(&self, query: &BundleQuery) -> Result<BundleQuery, String> {
        let processed = load_processed_or_reset(self.store.as_ref());
        log::info!(
            "request_id={} {} bundles already processed",
            query.request_id,
            processed.len()
        );
        Ok(BundleQuery {
            processed: Arc::new(processed),
            ..query.clone()
        })
    }

    fn update(&self, query: &mut BundleQuery, hydrated: BundleQuery) {
        query.processed = hydrated.processed;
    }
}
