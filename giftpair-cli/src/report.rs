//! Run summaries: a human-readable table or a JSON document.

use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use giftpair_pipeline::candidate_pipeline::PipelineResult;
use giftpair_pipeline::types::{BundleCandidate, BundleQuery, Synergy};

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct RunJson {
    generated_at: String,
    request_id: String,
    category: String,
    output: String,
    pipeline_ms: u128,
    bundles: Vec<BundleJson>,
    summary: SummaryJson,
}

#[derive(Serialize)]
struct BundleJson {
    name: String,
    price: String,
    score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    synergy: Option<Synergy>,
    product_category: String,
    image_src: String,
}

#[derive(Serialize)]
struct SummaryJson {
    bottles_loaded: usize,
    previously_processed: usize,
    combos_generated: usize,
    combos_filtered_out: usize,
    bundles_selected: usize,
    degraded_scores: usize,
}

fn degraded_count(bundles: &[BundleCandidate]) -> usize {
    bundles
        .iter()
        .filter(|b| b.synergy.as_ref().is_some_and(Synergy::is_degraded))
        .count()
}

pub fn build_json(
    result: &PipelineResult<BundleQuery, BundleCandidate>,
    bottles_loaded: usize,
    output: &Path,
    pipeline_ms: u128,
) -> RunJson {
    RunJson {
        generated_at: Utc::now().to_rfc3339(),
        request_id: result.query.request_id.clone(),
        category: result.query.category.clone(),
        output: output.display().to_string(),
        pipeline_ms,
        bundles: result
            .selected_candidates
            .iter()
            .map(|b| BundleJson {
                name: b.name.clone(),
                price: format!("{:.2}", b.price),
                score: b.score(),
                synergy: b.synergy.clone(),
                product_category: b.product_category.clone().unwrap_or_default(),
                image_src: b.image_src.clone().unwrap_or_default(),
            })
            .collect(),
        summary: SummaryJson {
            bottles_loaded,
            previously_processed: result.query.processed.len(),
            combos_generated: result.retrieved_candidates.len(),
            combos_filtered_out: result.filtered_candidates.len(),
            bundles_selected: result.selected_candidates.len(),
            degraded_scores: degraded_count(&result.selected_candidates),
        },
    }
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

pub fn print_human(
    result: &PipelineResult<BundleQuery, BundleCandidate>,
    bottles_loaded: usize,
    output: &Path,
    load_ms: u128,
    pipeline_ms: u128,
) {
    println!();
    println!("  GIFTPAIR  \u{00b7}  {} gift bundles", result.query.category);
    println!("  {:\u{2550}<64}", "");
    println!();
    println!(
        "  {} bottles loaded  \u{00b7}  {} already processed  \u{00b7}  {} new combos",
        bottles_loaded,
        result.query.processed.len(),
        result.retrieved_candidates.len()
    );
    println!(
        "  {} duplicates removed  \u{00b7}  Top {} selected  \u{00b7}  {} fallback scores",
        result.filtered_candidates.len(),
        result.selected_candidates.len(),
        degraded_count(&result.selected_candidates)
    );
    println!();

    if result.selected_candidates.is_empty() {
        println!("  No new bundles. Every qualifying pair has already been exported.");
    } else {
        println!("  {:\u{2500}<64}", "");
        for (i, b) in result.selected_candidates.iter().enumerate() {
            let synergy = b
                .synergy
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string());
            println!("  {:>2}. {}", i + 1, b.name);
            println!(
                "      ${:.2}  \u{00b7}  synergy {}{}",
                b.price,
                synergy,
                match b.image_src.as_deref() {
                    Some(src) if !src.is_empty() => format!("  \u{00b7}  {}", src),
                    _ => String::new(),
                }
            );
        }
        println!("  {:\u{2500}<64}", "");
    }

    println!();
    println!("  Exported to {}", output.display());
    println!(
        "  \u{23f1}  Catalog loaded in {}ms \u{00b7} Pipeline ran in {}ms \u{00b7} Total {}ms",
        load_ms,
        pipeline_ms,
        load_ms + pipeline_ms
    );
    println!();
}
