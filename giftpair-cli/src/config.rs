//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use giftpair_oracle::client::{
    OracleConfig, DEFAULT_BASE_URL, DEFAULT_COPY_MODEL, DEFAULT_JUDGE_MODEL,
};

/// Giftpair - turn a spirits catalog into Shopify gift bundle listings
///
/// Pairs bottles, scores each pairing with a chat model, keeps the best,
/// and writes a Shopify import CSV. Bundles emitted once are never emitted
/// again.
#[derive(Parser, Debug)]
#[command(
    name = "giftpair",
    version,
    after_help = "EXAMPLES:\n  \
                  giftpair catalog/tequila.csv\n  \
                  giftpair catalog/whiskey.json --category Whiskey --top 5 --json\n  \
                  giftpair catalog/tequila.csv --composer ./compose-bottles.sh"
)]
pub struct Cli {
    /// Catalog file (.csv or .json)
    pub catalog: PathBuf,

    /// Storefront category of the catalog
    #[arg(long, env = "GIFTPAIR_CATEGORY", default_value = "Tequila")]
    pub category: String,

    /// Number of bundles to emit
    #[arg(long, env = "GIFTPAIR_TOP", default_value_t = 10)]
    pub top: usize,

    /// Synergy score cache
    #[arg(long, env = "GIFTPAIR_SCORE_CACHE", default_value = "ai_bundle_scores.json")]
    pub score_cache: PathBuf,

    /// Log of bundle names already emitted
    #[arg(long, env = "GIFTPAIR_PROCESSED_LOG", default_value = "bundles_log.json")]
    pub processed_log: PathBuf,

    /// Export path [default: exported_bundles_<category>.csv]
    #[arg(long, short = 'o', env = "GIFTPAIR_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Directory for composed bundle photos
    #[arg(long, env = "GIFTPAIR_IMAGES_DIR", default_value = "bundle_images")]
    pub images_dir: PathBuf,

    /// Program run as `<program> <left> <right> <output>` to compose photos
    #[arg(long, env = "GIFTPAIR_COMPOSER")]
    pub composer: Option<PathBuf>,

    /// Minimum spacing between synergy calls, in milliseconds
    #[arg(long, env = "GIFTPAIR_RATE_INTERVAL_MS", default_value_t = 300)]
    pub rate_interval_ms: u64,

    /// Chat service request timeout, in seconds
    #[arg(long, env = "GIFTPAIR_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Model that rates pairings
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_JUDGE_MODEL)]
    pub model: String,

    /// Model that writes listing copy
    #[arg(long, env = "OPENAI_COPY_MODEL", default_value = DEFAULT_COPY_MODEL)]
    pub copy_model: String,

    /// Output the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!(
                "exported_bundles_{}.csv",
                self.category.to_lowercase()
            ))
        })
    }

    pub fn rate_interval(&self) -> Duration {
        Duration::from_millis(self.rate_interval_ms)
    }

    /// Oracle settings; the key may be blank, which the client rejects.
    pub fn oracle_config(&self) -> OracleConfig {
        OracleConfig::new(self.api_key.clone().unwrap_or_default())
            .with_base_url(&self.base_url)
            .with_judge_model(&self.model)
            .with_copy_model(&self.copy_model)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}
