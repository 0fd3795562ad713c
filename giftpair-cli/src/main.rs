mod composer;
mod config;
mod export;
mod report;

use std::process;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use giftpair_oracle::{ChatClient, ChatCopywriter, ChatSynergyJudge};
use giftpair_pipeline::candidate_pipeline::CandidatePipeline;
use giftpair_pipeline::catalog_loader::load_catalog_file;
use giftpair_pipeline::collaborators::ImageComposer;
use giftpair_pipeline::pipelines::gift_bundle::{GiftBundleConfig, GiftBundlePipeline};
use giftpair_pipeline::rate_limit::RateLimiter;
use giftpair_pipeline::store::{JsonFileStore, ProcessedNames, ScoreCache};
use giftpair_pipeline::types::BundleQuery;

use crate::composer::CommandImageComposer;
use crate::config::Cli;

async fn run(cli: Cli) -> Result<()> {
    let load_start = Instant::now();
    let bottles = load_catalog_file(&cli.catalog)
        .with_context(|| format!("loading catalog {}", cli.catalog.display()))?;
    let load_ms = load_start.elapsed().as_millis();
    let bottles_loaded = bottles.len();
    log::info!("loaded {} bottles from {}", bottles_loaded, cli.catalog.display());

    let client = Arc::new(
        ChatClient::new(cli.oracle_config()).context("configuring the chat service client")?,
    );
    let composer = cli
        .composer
        .as_ref()
        .map(|program| Arc::new(CommandImageComposer::new(program)) as Arc<dyn ImageComposer>);

    let pipeline = GiftBundlePipeline::new(GiftBundleConfig {
        bottles,
        processed_log: Arc::new(JsonFileStore::<ProcessedNames>::new(&cli.processed_log)),
        score_cache: Arc::new(JsonFileStore::<ScoreCache>::new(&cli.score_cache)),
        judge: Arc::new(ChatSynergyJudge::new(Arc::clone(&client))),
        limiter: RateLimiter::per_interval(cli.rate_interval()),
        copywriter: Arc::new(ChatCopywriter::new(client)),
        composer,
        images_dir: cli.images_dir.clone(),
        top_n: cli.top,
    });

    let request_id = format!("bundles-{}", Utc::now().format("%Y%m%dT%H%M%S"));
    let pipeline_start = Instant::now();
    let result = pipeline
        .execute(BundleQuery::new(request_id, cli.category.clone()))
        .await;
    let pipeline_ms = pipeline_start.elapsed().as_millis();

    let output = cli.output_path();
    export::export_bundles(&output, &result.selected_candidates)?;

    if cli.json {
        let json = report::build_json(&result, bottles_loaded, &output, pipeline_ms);
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        report::print_human(&result, bottles_loaded, &output, load_ms, pipeline_ms);
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}
