use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use giftpair_pipeline::candidate_pipeline::CandidatePipeline;
use giftpair_pipeline::collaborators::{CopyGenerator, ImageComposer, SynergyJudge};
use giftpair_pipeline::pipelines::gift_bundle::{GiftBundleConfig, GiftBundlePipeline};
use giftpair_pipeline::rate_limit::RateLimiter;
use giftpair_pipeline::store::{JsonFileStore, MemoryStore, ProcessedNames, ScoreCache, Store};
use giftpair_pipeline::types::*;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Replies by cache key; unknown pairs fail.
struct ScriptedJudge {
    replies: HashMap<String, Result<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedJudge {
    fn new(replies: &[(&str, Result<&str, &str>)]) -> Self {
        Self {
            replies: replies
                .iter()
                .map(|(key, reply)| {
                    (
                        key.to_string(),
                        reply.map(str::to_string).map_err(str::to_string),
                    )
                })
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SynergyJudge for ScriptedJudge {
    async fn judge(&self, first: &Bottle, second: &Bottle) -> Result<String, String> {
        let key = format!("{}||{}", first.name, second.name);
        self.calls.lock().unwrap().push(key.clone());
        self.replies
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(format!("no scripted reply for {}", key)))
    }
}

struct PlainCopy;

#[async_trait]
impl CopyGenerator for PlainCopy {
    async fn describe(&self, bundle_name: &str) -> Result<String, String> {
        Ok(format!("<p>{}</p>", bundle_name))
    }
}

struct TouchComposer;

#[async_trait]
impl ImageComposer for TouchComposer {
    async fn compose(&self, _left: &Path, _right: &Path, output: &Path) -> Result<PathBuf, String> {
        std::fs::write(output, b"jpg").map_err(|e| e.to_string())?;
        Ok(output.to_path_buf())
    }
}

// ---------------------------------------------------------------------------
// Test data fixtures
// ---------------------------------------------------------------------------

fn bottle(name: &str, brand: &str, price: &str, volume_ml: u32) -> Arc<Bottle> {
    Arc::new(Bottle {
        name: name.into(),
        brand: brand.into(),
        price: Decimal::from_str(price).unwrap(),
        volume_ml,
        image: None,
    })
}

fn brand_x_catalog() -> Vec<Arc<Bottle>> {
    vec![
        bottle("Brand X Blanco 750ml", "Brand X", "39.99", 750),
        bottle("Brand X Reposado 750ml", "Brand X", "49.99", 750),
    ]
}

/// Two same-brand bottles, one other brand in range, one undersized bottle.
fn mixed_catalog() -> Vec<Arc<Bottle>> {
    vec![
        bottle("Brand X Blanco 750ml", "Brand X", "39.99", 750),
        bottle("Brand X Reposado 750ml", "Brand X", "49.99", 750),
        bottle("Casa Anejo 750ml", "Casa", "45.00", 750),
        bottle("Casa Mini 375ml", "Casa", "20.00", 375),
    ]
}

struct Harness {
    processed: Arc<MemoryStore<ProcessedNames>>,
    scores: Arc<MemoryStore<ScoreCache>>,
    judge: Arc<ScriptedJudge>,
}

impl Harness {
    fn new(judge: ScriptedJudge) -> Self {
        Self {
            processed: Arc::new(MemoryStore::default()),
            scores: Arc::new(MemoryStore::default()),
            judge: Arc::new(judge),
        }
    }

    fn pipeline(&self, bottles: Vec<Arc<Bottle>>, top_n: usize) -> GiftBundlePipeline {
        GiftBundlePipeline::new(GiftBundleConfig {
            bottles,
            processed_log: self.processed.clone(),
            score_cache: self.scores.clone(),
            judge: self.judge.clone(),
            limiter: RateLimiter::unlimited(),
            copywriter: Arc::new(PlainCopy),
            composer: None,
            images_dir: PathBuf::from("bundles"),
            top_n,
        })
    }
}

fn names(candidates: &[BundleCandidate]) -> Vec<&str> {
    candidates.iter().map(|c| c.name.as_str()).collect()
}

// ---------------------------------------------------------------------------
// End-to-end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn same_brand_pair_end_to_end() {
    let harness = Harness::new(ScriptedJudge::new(&[(
        "Brand X Blanco 750ml||Brand X Reposado 750ml",
        Ok("85"),
    )]));
    let pipeline = harness.pipeline(brand_x_catalog(), 10);

    let result = pipeline
        .execute(BundleQuery::new("test-001", "Tequila"))
        .await;

    assert_eq!(result.retrieved_candidates.len(), 1);
    assert_eq!(result.selected_candidates.len(), 1);
    let bundle = &result.selected_candidates[0];
    assert_eq!(bundle.name, "Brand X Blanco 750ml & Brand X Reposado 750ml");
    assert_eq!(bundle.price, Decimal::from_str("84.99").unwrap());
    assert_eq!(bundle.synergy, Some(Synergy::Judged { score: 85.0 }));
    assert!(bundle
        .product_category
        .as_deref()
        .unwrap()
        .ends_with("Liquor & Spirits > Tequila"));
    assert_eq!(
        bundle.description.as_deref(),
        Some("<p>Brand X Blanco 750ml & Brand X Reposado 750ml</p>")
    );
    // No composer configured
    assert_eq!(bundle.image_src, None);

    let processed = harness.processed.load().unwrap();
    assert!(processed.contains("Brand X Blanco 750ml & Brand X Reposado 750ml"));
    let scores = harness.scores.load().unwrap();
    assert_eq!(
        scores.get("Brand X Blanco 750ml||Brand X Reposado 750ml"),
        Some(&85.0)
    );
}

#[tokio::test]
async fn second_run_emits_nothing_new() {
    let harness = Harness::new(ScriptedJudge::new(&[(
        "Brand X Blanco 750ml||Brand X Reposado 750ml",
        Ok("85"),
    )]));

    let first = harness
        .pipeline(brand_x_catalog(), 10)
        .execute(BundleQuery::new("run-1", "Tequila"))
        .await;
    assert_eq!(first.selected_candidates.len(), 1);

    let second = harness
        .pipeline(brand_x_catalog(), 10)
        .execute(BundleQuery::new("run-2", "Tequila"))
        .await;
    assert!(second.retrieved_candidates.is_empty());
    assert!(second.selected_candidates.is_empty());
    assert_eq!(harness.judge.calls().len(), 1);
}

#[tokio::test]
async fn ranks_by_score_then_price() {
    let harness = Harness::new(ScriptedJudge::new(&[
        ("Brand X Blanco 750ml||Brand X Reposado 750ml", Ok("85")),
        ("Brand X Blanco 750ml||Casa Anejo 750ml", Ok("60")),
        ("Brand X Reposado 750ml||Casa Anejo 750ml", Ok("85/100")),
    ]));
    let pipeline = harness.pipeline(mixed_catalog(), 10);

    let result = pipeline
        .execute(BundleQuery::new("test-002", "Tequila"))
        .await;

    // Same-brand first, then cross-brand; the 375 ml bottle never pairs
    assert_eq!(
        names(&result.retrieved_candidates),
        vec![
            "Brand X Blanco 750ml & Brand X Reposado 750ml",
            "Brand X Blanco 750ml & Casa Anejo 750ml",
            "Brand X Reposado 750ml & Casa Anejo 750ml",
        ]
    );
    // 85 vs 85 breaks on price: 90.99 beats 84.99
    assert_eq!(
        names(&result.selected_candidates),
        vec![
            "Brand X Reposado 750ml & Casa Anejo 750ml",
            "Brand X Blanco 750ml & Brand X Reposado 750ml",
            "Brand X Blanco 750ml & Casa Anejo 750ml",
        ]
    );
    assert_eq!(
        result.selected_candidates[0].price,
        Decimal::from_str("90.99").unwrap()
    );
    assert_eq!(
        result.selected_candidates[2].price,
        Decimal::from_str("80.99").unwrap()
    );
}

#[tokio::test]
async fn top_n_limits_output_and_processed_log() {
    let harness = Harness::new(ScriptedJudge::new(&[
        ("Brand X Blanco 750ml||Brand X Reposado 750ml", Ok("70")),
        ("Brand X Blanco 750ml||Casa Anejo 750ml", Ok("90")),
        ("Brand X Reposado 750ml||Casa Anejo 750ml", Ok("10")),
    ]));
    let pipeline = harness.pipeline(mixed_catalog(), 1);

    let result = pipeline
        .execute(BundleQuery::new("test-003", "Tequila"))
        .await;

    assert_eq!(
        names(&result.selected_candidates),
        vec!["Brand X Blanco 750ml & Casa Anejo 750ml"]
    );
    let processed = harness.processed.load().unwrap();
    assert_eq!(processed.len(), 1);
    assert!(processed.contains("Brand X Blanco 750ml & Casa Anejo 750ml"));
    // Every new score is cached even when the bundle is not selected
    assert_eq!(harness.scores.load().unwrap().len(), 3);
}

// ---------------------------------------------------------------------------
// Scoring failures and the cache
// ---------------------------------------------------------------------------

#[tokio::test]
async fn judge_failure_degrades_to_neutral_and_is_not_cached() {
    let harness = Harness::new(ScriptedJudge::new(&[(
        "Brand X Blanco 750ml||Brand X Reposado 750ml",
        Err("503 Service Unavailable"),
    )]));
    let pipeline = harness.pipeline(brand_x_catalog(), 10);

    let result = pipeline
        .execute(BundleQuery::new("test-004", "Tequila"))
        .await;

    let bundle = &result.selected_candidates[0];
    assert!(bundle.synergy.as_ref().unwrap().is_degraded());
    assert_eq!(bundle.score(), NEUTRAL_SCORE);
    assert!(harness.scores.load().unwrap().is_empty());
}

#[tokio::test]
async fn unparseable_reply_degrades_to_neutral() {
    let harness = Harness::new(ScriptedJudge::new(&[(
        "Brand X Blanco 750ml||Brand X Reposado 750ml",
        Ok("an excellent pairing"),
    )]));
    let pipeline = harness.pipeline(brand_x_catalog(), 10);

    let result = pipeline
        .execute(BundleQuery::new("test-005", "Tequila"))
        .await;

    assert_eq!(result.selected_candidates[0].score(), NEUTRAL_SCORE);
    assert!(harness.scores.load().unwrap().is_empty());
}

#[tokio::test]
async fn cached_pairs_skip_the_judge() {
    let harness = Harness::new(ScriptedJudge::new(&[]));
    let mut seeded = ScoreCache::new();
    seeded.insert("Brand X Blanco 750ml||Brand X Reposado 750ml".into(), 72.0);
    harness.scores.save(&seeded).unwrap();
    let pipeline = harness.pipeline(brand_x_catalog(), 10);

    let result = pipeline
        .execute(BundleQuery::new("test-006", "Tequila"))
        .await;

    assert!(harness.judge.calls().is_empty());
    assert_eq!(
        result.selected_candidates[0].synergy,
        Some(Synergy::Cached { score: 72.0 })
    );
}

// ---------------------------------------------------------------------------
// Edge cases
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_catalog_yields_empty_run() {
    let harness = Harness::new(ScriptedJudge::new(&[]));
    let pipeline = harness.pipeline(Vec::new(), 10);

    let result = pipeline
        .execute(BundleQuery::new("test-007", "Tequila"))
        .await;

    assert!(result.selected_candidates.is_empty());
    assert!(harness.judge.calls().is_empty());
    assert!(harness.processed.load().unwrap().is_empty());
}

#[tokio::test]
async fn no_bundle_sized_bottles_yields_empty_run() {
    let harness = Harness::new(ScriptedJudge::new(&[]));
    let pipeline = harness.pipeline(
        vec![
            bottle("Brand X Blanco 375ml", "Brand X", "19.99", 375),
            bottle("Brand X Reposado 1L", "Brand X", "59.99", 1000),
        ],
        10,
    );

    let result = pipeline
        .execute(BundleQuery::new("test-008", "Tequila"))
        .await;

    assert!(result.retrieved_candidates.is_empty());
    assert!(harness.judge.calls().is_empty());
}

#[tokio::test]
async fn file_backed_stores_survive_corrupt_processed_log() {
    let dir = tempfile::TempDir::new().unwrap();
    let log_path = dir.path().join("bundles_log.json");
    let cache_path = dir.path().join("ai_bundle_scores.json");
    std::fs::write(&log_path, "not json").unwrap();

    let images = dir.path().join("bundles");
    let left = dir.path().join("blanco.jpg");
    let right = dir.path().join("reposado.jpg");
    std::fs::write(&left, b"jpg").unwrap();
    std::fs::write(&right, b"jpg").unwrap();
    let bottles = vec![
        Arc::new(Bottle {
            image: Some(left.display().to_string()),
            ..(*bottle("Brand X Blanco 750ml", "Brand X", "39.99", 750)).clone()
        }),
        Arc::new(Bottle {
            image: Some(right.display().to_string()),
            ..(*bottle("Brand X Reposado 750ml", "Brand X", "49.99", 750)).clone()
        }),
    ];

    let processed: Arc<JsonFileStore<ProcessedNames>> = Arc::new(JsonFileStore::new(&log_path));
    let pipeline = GiftBundlePipeline::new(GiftBundleConfig {
        bottles,
        processed_log: processed.clone(),
        score_cache: Arc::new(JsonFileStore::<ScoreCache>::new(&cache_path)),
        judge: Arc::new(ScriptedJudge::new(&[(
            "Brand X Blanco 750ml||Brand X Reposado 750ml",
            Ok("88"),
        )])),
        limiter: RateLimiter::unlimited(),
        copywriter: Arc::new(PlainCopy),
        composer: Some(Arc::new(TouchComposer)),
        images_dir: images.clone(),
        top_n: 10,
    });

    let result = pipeline
        .execute(BundleQuery::new("test-009", "Tequila"))
        .await;

    assert_eq!(result.selected_candidates.len(), 1);
    let image = result.selected_candidates[0].image_src.clone().unwrap();
    assert!(image.ends_with("Brand_X_Blanco_750ml_&_Brand_X_Reposado_750ml.jpg"));
    assert!(Path::new(&image).is_file());

    let names = processed.load().unwrap();
    assert_eq!(names.len(), 1);
    let cache_text = std::fs::read_to_string(&cache_path).unwrap();
    assert!(cache_text.contains("Brand X Blanco 750ml||Brand X Reposado 750ml"));
}
