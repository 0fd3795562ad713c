use async_trait::async_trait;
use std::collections::HashSet;

use crate::filter::{Filter, FilterResult};
use crate::types::{BundleCandidate, BundleQuery};

/// Removes repeated bundle names from the candidate pool, keeping the first.
///
/// Enumeration never yields the same bottle pair twice, but a catalog that
/// lists two products under one name produces identical bundle names, and
/// those would collide in the processed log and the export.
pub struct DuplicateBundleFilter;

#[async_trait]
impl Filter<BundleQuery, BundleCandidate> for DuplicateBundleFilter {
    async fn filter(
        &self,
        _query: &BundleQuery,
        candidates: Vec<BundleCandidate>,
    ) -> Result<FilterResult<BundleCandidate>, String> {
        let mut seen = HashSet::new();
        let (kept, removed): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|c| seen.insert(c.name.clone()));

        Ok(FilterResult { kept, removed })
    }
}
