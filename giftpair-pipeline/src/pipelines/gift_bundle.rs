use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use crate::candidate_pipeline::CandidatePipeline;
use crate::collaborators::{CopyGenerator, ImageComposer, SynergyJudge};
use crate::components::bundle_image_hydrator::BundleImageHydrator;
use crate::components::catalog_pair_source::CatalogPairSource;
use crate::components::category_hydrator::CategoryHydrator;
use crate::components::description_hydrator::DescriptionHydrator;
use crate::components::duplicate_bundle_filter::DuplicateBundleFilter;
use crate::components::processed_log_query_hydrator::ProcessedLogQueryHydrator;
use crate::components::processed_log_side_effect::ProcessedLogSideEffect;
use crate::components::synergy_scorer::SynergyScorer;
use crate::components::top_bundle_selector::TopBundleSelector;
use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::query_hydrator::QueryHydrator;
use crate::rate_limit::RateLimiter;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::SideEffect;
use crate::source::Source;
use crate::store::{ProcessedNames, ScoreCache, Store};
use crate::types::{Bottle, BundleCandidate, BundleQuery};

/// Everything a gift bundle run needs from the outside world.
pub struct GiftBundleConfig {
    pub bottles: Vec<Arc<Bottle>>,
    pub processed_log: Arc<dyn Store<ProcessedNames>>,
    pub score_cache: Arc<dyn Store<ScoreCache>>,
    pub judge: Arc<dyn SynergyJudge>,
    pub limiter: RateLimiter,
    pub copywriter: Arc<dyn CopyGenerator>,
    /// Bundle photos are skipped when unset.
    pub composer: Option<Arc<dyn ImageComposer>>,
    pub images_dir: PathBuf,
    pub top_n: usize,
}

/// The gift bundle pipeline.
///
/// Pipeline flow:
/// 1. ProcessedLogQueryHydrator loads bundle names from earlier runs
/// 2. CatalogPairSource enumerates new same-brand and cross-brand pairs
/// 3. DuplicateBundleFilter drops repeated names within the pool
/// 4. SynergyScorer rates each pair, cache first
/// 5. TopBundleSelector keeps the best N
/// 6. CategoryHydrator, BundleImageHydrator and DescriptionHydrator enrich
///    the winners
/// 7. ProcessedLogSideEffect records the winners
pub struct GiftBundlePipeline {
    query_hydrators: Vec<Box<dyn QueryHydrator<BundleQuery>>>,
    sources: Vec<Box<dyn Source<BundleQuery, BundleCandidate>>>,
    hydrators: Vec<Box<dyn Hydrator<BundleQuery, BundleCandidate>>>,
    filters: Vec<Box<dyn Filter<BundleQuery, BundleCandidate>>>,
    scorers: Vec<Box<dyn Scorer<BundleQuery, BundleCandidate>>>,
    selector: TopBundleSelector,
    post_selection_hydrators: Vec<Box<dyn Hydrator<BundleQuery, BundleCandidate>>>,
    post_selection_filters: Vec<Box<dyn Filter<BundleQuery, BundleCandidate>>>,
    side_effects: Arc<Vec<Box<dyn SideEffect<BundleQuery, BundleCandidate>>>>,
    result_size: usize,
}

impl GiftBundlePipeline {
    pub fn new(config: GiftBundleConfig) -> Self {
        let GiftBundleConfig {
            bottles,
            processed_log,
            score_cache,
            judge,
            limiter,
            copywriter,
            composer,
            images_dir,
            top_n,
        } = config;

        let query_hydrators: Vec<Box<dyn QueryHydrator<BundleQuery>>> = vec![Box::new(
            ProcessedLogQueryHydrator::new(Arc::clone(&processed_log)),
        )];

        let sources: Vec<Box<dyn Source<BundleQuery, BundleCandidate>>> =
            vec![Box::new(CatalogPairSource::new(bottles))];

        let filters: Vec<Box<dyn Filter<BundleQuery, BundleCandidate>>> =
            vec![Box::new(DuplicateBundleFilter)];

        let scorers: Vec<Box<dyn Scorer<BundleQuery, BundleCandidate>>> = vec![Box::new(
            SynergyScorer::new(judge, score_cache, limiter),
        )];

        let mut post_selection_hydrators: Vec<Box<dyn Hydrator<BundleQuery, BundleCandidate>>> =
            vec![Box::new(CategoryHydrator)];
        match composer {
            Some(composer) => post_selection_hydrators
                .push(Box::new(BundleImageHydrator::new(composer, images_dir))),
            None => log::info!("no image composer configured, bundle photos will be skipped"),
        }
        post_selection_hydrators.push(Box::new(DescriptionHydrator::new(copywriter)));

        let side_effects: Arc<Vec<Box<dyn SideEffect<BundleQuery, BundleCandidate>>>> =
            Arc::new(vec![Box::new(ProcessedLogSideEffect::new(processed_log))]);

        Self {
            query_hydrators,
            sources,
            hydrators: Vec::new(),
            filters,
            scorers,
            selector: TopBundleSelector { n: top_n },
            post_selection_hydrators,
            post_selection_filters: Vec::new(),
            side_effects,
            result_size: top_n,
        }
    }
}

#[async_trait]
impl CandidatePipeline<BundleQuery, BundleCandidate> for GiftBundlePipeline {
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<BundleQuery>>] {
        &self.query_hydrators
    }

    fn sources(&self) -> &[Box<dyn Source<BundleQuery, BundleCandidate>>] {
        &self.sources
    }

    fn hydrators(&self) -> &[Box<dyn Hydrator<BundleQuery, BundleCandidate>>] {
        &self.hydrators
    }

    fn filters(&self) -> &[Box<dyn Filter<BundleQuery, BundleCandidate>>] {
        &self.filters
    }

    fn scorers(&self) -> &[Box<dyn Scorer<BundleQuery, BundleCandidate>>] {
        &self.scorers
    }

    fn selector(&self) -> &dyn Selector<BundleQuery, BundleCandidate> {
        &self.selector
    }

    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<BundleQuery, BundleCandidate>>] {
        &self.post_selection_hydrators
    }

    fn post_selection_filters(&self) -> &[Box<dyn Filter<BundleQuery, BundleCandidate>>] {
        &self.post_selection_filters
    }

    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<BundleQuery, BundleCandidate>>>> {
        Arc::clone(&self.side_effects)
    }

    fn result_size(&self) -> usize {
        self.result_size
    }
}
