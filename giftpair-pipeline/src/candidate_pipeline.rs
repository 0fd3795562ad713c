//! Generic staged candidate pipeline.
//!
//! Stages run in a fixed order:
//! query hydrators → sources → hydrators → filters → scorers → selector →
//! post-selection hydrators → post-selection filters → side effects.
//!
//! A failing stage is logged and skipped; the candidates it would have
//! touched flow on unchanged. A run always produces a result.

use async_trait::async_trait;
use std::sync::Arc;

use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::{SideEffect, SideEffectInput};
use crate::source::Source;

/// Queries carry an id so every log line of a run can be correlated.
pub trait HasRequestId {
    fn request_id(&self) -> &str;
}

/// Everything a run produced, for reporting.
pub struct PipelineResult<Q, C> {
    /// Candidates exactly as the sources emitted them.
    pub retrieved_candidates: Vec<C>,
    /// Candidates dropped by any filter stage.
    pub filtered_candidates: Vec<C>,
    /// Final, enriched candidates in ranked order.
    pub selected_candidates: Vec<C>,
    pub query: Arc<Q>,
}

#[async_trait]
pub trait CandidatePipeline<Q, C>: Send + Sync
where
    Q: HasRequestId + Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<Q>>];
    fn sources(&self) -> &[Box<dyn Source<Q, C>>];
    fn hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];
    fn filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn scorers(&self) -> &[Box<dyn Scorer<Q, C>>];
    fn selector(&self) -> &dyn Selector<Q, C>;
    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];
    fn post_selection_filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<Q, C>>>>;
    fn result_size(&self) -> usize;

    async fn execute(&self, query: Q) -> PipelineResult<Q, C> {
        let query = self.hydrate_query(query).await;

        let retrieved = self.fetch_candidates(&query).await;
        let hydrated = self
            .run_hydrators(&query, retrieved.clone(), self.hydrators())
            .await;
        let (kept, mut filtered) = self.run_filters(&query, hydrated, self.filters()).await;
        let scored = self.run_scorers(&query, kept).await;
        let selected = self.select(&query, scored);

        let enriched = self
            .run_hydrators(&query, selected, self.post_selection_hydrators())
            .await;
        let (mut final_candidates, post_filtered) = self
            .run_filters(&query, enriched, self.post_selection_filters())
            .await;
        filtered.extend(post_filtered);
        final_candidates.truncate(self.result_size());

        let query = Arc::new(query);
        let input = Arc::new(SideEffectInput {
            query: Arc::clone(&query),
            selected_candidates: final_candidates.clone(),
        });
        self.run_side_effects(input).await;

        PipelineResult {
            retrieved_candidates: retrieved,
            filtered_candidates: filtered,
            selected_candidates: final_candidates,
            query,
        }
    }

    async fn hydrate_query(&self, query: Q) -> Q {
        let mut hydrated_query = query;
        for hydrator in self.query_hydrators() {
            if !hydrator.enable(&hydrated_query) {
                continue;
            }
            match hydrator.hydrate(&hydrated_query).await {
                Ok(hydrated) => hydrator.update(&mut hydrated_query, hydrated),
                Err(err) => log::error!(
                    "request_id={} stage=QueryHydrator component={} failed: {}",
                    hydrated_query.request_id(),
                    hydrator.name(),
                    err
                ),
            }
        }
        hydrated_query
    }

    async fn fetch_candidates(&self, query: &Q) -> Vec<C> {
        let mut collected = Vec::new();
        for source in self.sources().iter().filter(|s| s.enable(query)) {
            match source.get_candidates(query).await {
                Ok(mut candidates) => {
                    log::info!(
                        "request_id={} stage=Source component={} fetched {} candidates",
                        query.request_id(),
                        source.name(),
                        candidates.len()
                    );
                    collected.append(&mut candidates);
                }
                Err(err) => log::error!(
                    "request_id={} stage=Source component={} failed: {}",
                    query.request_id(),
                    source.name(),
                    err
                ),
            }
        }
        collected
    }

    async fn run_hydrators(
        &self,
        query: &Q,
        mut candidates: Vec<C>,
        hydrators: &[Box<dyn Hydrator<Q, C>>],
    ) -> Vec<C> {
        for hydrator in hydrators.iter().filter(|h| h.enable(query)) {
            match hydrator.hydrate(query, &candidates).await {
                Ok(hydrated) if hydrated.len() == candidates.len() => {
                    for (candidate, update) in candidates.iter_mut().zip(hydrated) {
                        hydrator.update(candidate, update);
                    }
                }
                Ok(hydrated) => log::warn!(
                    "request_id={} stage=Hydrator component={} skipped: length mismatch {} vs {}",
                    query.request_id(),
                    hydrator.name(),
                    hydrated.len(),
                    candidates.len()
                ),
                Err(err) => log::error!(
                    "request_id={} stage=Hydrator component={} failed: {}",
                    query.request_id(),
                    hydrator.name(),
                    err
                ),
            }
        }
        candidates
    }

    async fn run_filters(
        &self,
        query: &Q,
        candidates: Vec<C>,
        filters: &[Box<dyn Filter<Q, C>>],
    ) -> (Vec<C>, Vec<C>) {
        let mut kept = candidates;
        let mut removed = Vec::new();
        for filter in filters.iter().filter(|f| f.enable(query)) {
            let backup = kept.clone();
            match filter.filter(query, kept).await {
                Ok(result) => {
                    log::debug!(
                        "request_id={} stage=Filter component={} kept={} removed={}",
                        query.request_id(),
                        filter.name(),
                        result.kept.len(),
                        result.removed.len()
                    );
                    kept = result.kept;
                    removed.extend(result.removed);
                }
                Err(err) => {
                    log::error!(
                        "request_id={} stage=Filter component={} failed: {}",
                        query.request_id(),
                        filter.name(),
                        err
                    );
                    kept = backup;
                }
            }
        }
        (kept, removed)
    }

    async fn run_scorers(&self, query: &Q, mut candidates: Vec<C>) -> Vec<C> {
        for scorer in self.scorers().iter().filter(|s| s.enable(query)) {
            match scorer.score(query, &candidates).await {
                Ok(scored) if scored.len() == candidates.len() => {
                    for (candidate, update) in candidates.iter_mut().zip(scored) {
                        scorer.update(candidate, update);
                    }
                }
                Ok(scored) => log::warn!(
                    "request_id={} stage=Scorer component={} skipped: length mismatch {} vs {}",
                    query.request_id(),
                    scorer.name(),
                    scored.len(),
                    candidates.len()
                ),
                Err(err) => log::error!(
                    "request_id={} stage=Scorer component={} failed: {}",
                    query.request_id(),
                    scorer.name(),
                    err
                ),
            }
        }
        candidates
    }

    fn select(&self, query: &Q, candidates: Vec<C>) -> Vec<C> {
        let selector = self.selector();
        if selector.enable(query) {
            selector.select(query, candidates)
        } else {
            candidates
        }
    }

    async fn run_side_effects(&self, input: Arc<SideEffectInput<Q, C>>) {
        let side_effects = self.side_effects();
        for side_effect in side_effects.iter() {
            if !side_effect.enable(Arc::clone(&input.query)) {
                continue;
            }
            if let Err(err) = side_effect.run(Arc::clone(&input)).await {
                log::error!(
                    "request_id={} stage=SideEffect component={} failed: {}",
                    input.query.request_id(),
                    side_effect.name(),
                    err
                );
            }
        }
    }
}
