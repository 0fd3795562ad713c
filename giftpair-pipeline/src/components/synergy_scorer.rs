use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::collaborators::SynergyJudge;
use crate::rate_limit::RateLimiter;
use crate::scorer::Scorer;
use crate::store::{load_scores_for_batch, ScoreCache, Store};
use crate::types::{BundleCandidate, BundleQuery, Synergy};

static SCORE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,3})(?:\s*/\s*100)?").expect("score pattern is valid"));

/// Pull a 0–100 score out of free-form judge output.
///
/// The first run of one to three digits wins, with an optional `/100`
/// suffix. Values above 100 clamp to 100.
pub fn parse_score(text: &str) -> Option<f64> {
    let caps = SCORE_PATTERN.captures(text)?;
    let value: u32 = caps[1].parse().ok()?;
    Some(f64::from(value.min(100)))
}

/// Scores each bundle by asking the judge how well its bottles pair.
///
/// Cache first: a pair already in the score cache is never sent to the
/// judge, and does not wait on the rate limiter. Failed or unparseable
/// calls degrade to the neutral score and are not cached, so the next run
/// asks again. The cache is written once, after the whole batch, and not at
/// all when it could not be read.
pub struct SynergyScorer {
    judge: Arc<dyn SynergyJudge>,
    cache: Arc<dyn Store<ScoreCache>>,
    limiter: RateLimiter,
}

impl SynergyScorer {
    pub fn new(
        judge: Arc<dyn SynergyJudge>,
        cache: Arc<dyn Store<ScoreCache>>,
        limiter: RateLimiter,
    ) -> Self {
        Self {
            judge,
            cache,
            limiter,
        }
    }

    async fn ask_judge(&self, request_id: &str, candidate: &BundleCandidate) -> Synergy {
        self.limiter.acquire().await;
        let pair = &candidate.bottles;
        match self.judge.judge(&pair.first, &pair.second).await {
            Ok(reply) => match parse_score(&reply) {
                Some(score) => Synergy::Judged { score },
                None => {
                    log::warn!(
                        "request_id={} judge={} unparseable reply for '{}': {:?}",
                        request_id,
                        self.judge.name(),
                        candidate.name,
                        reply
                    );
                    Synergy::Degraded {
                        reason: format!("no score in reply: {}", reply.trim()),
                    }
                }
            },
            Err(err) => {
                log::error!(
                    "request_id={} judge={} score error for '{}': {}",
                    request_id,
                    self.judge.name(),
                    candidate.name,
                    err
                );
                Synergy::Degraded { reason: err }
            }
        }
    }
}

#[async_trait]
impl Scorer<BundleQuery, BundleCandidate> for SynergyScorer {
    async fn score(
        &self,
        query: &BundleQuery,
        candidates: &[BundleCandidate],
    ) -> Result<Vec<BundleCandidate>, String> {
        let loaded = load_scores_for_batch(self.cache.as_ref());
        let mut cache = loaded.scores;
        let mut added = 0usize;
        let mut scored = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let key = candidate.bottles.cache_key();
            let synergy = match cache.get(&key) {
                Some(&score) => Synergy::Cached { score },
                None => {
                    let synergy = self.ask_judge(&query.request_id, candidate).await;
                    if let Synergy::Judged { score } = synergy {
                        cache.insert(key, score);
                        added += 1;
                    }
                    synergy
                }
            };
            scored.push(BundleCandidate {
                synergy: Some(synergy),
                ..BundleCandidate::default()
            });
        }

        if added > 0 && !loaded.writable {
            log::warn!(
                "request_id={} keeping unreadable score cache, {} new scores not saved",
                query.request_id,
                added
            );
        } else if added > 0 {
            if let Err(err) = self.cache.save(&cache) {
                log::error!(
                    "request_id={} failed to persist {} new scores: {}",
                    query.request_id,
                    added,
                    err
                );
            }
        }

        let degraded = scored
            .iter()
            .filter(|c| c.synergy.as_ref().is_some_and(Synergy::is_degraded))
            .count();
        log::info!(
            "request_id={} scored {} bundles ({} new, {} degraded)",
            query.request_id,
            scored.len(),
            added,
            degraded
        );

        Ok(scored)
    }

    fn update(&self, candidate: &mut BundleCandidate, scored: BundleCandidate) {
        candidate.synergy = scored.synergy;
    }
}
