//! Gift bundle generation for a spirits catalog.
//!
//! Bottles are paired into two-bottle bundles, priced, scored for synergy by
//! an external judge, ranked, enriched and recorded so later runs never
//! repeat a bundle. The run is a staged candidate pipeline; see
//! [`candidate_pipeline`] for the stage order and
//! [`pipelines::gift_bundle`] for the concrete wiring.

pub mod candidate_pipeline;
pub mod catalog_loader;
pub mod collaborators;
pub mod components;
pub mod filter;
pub mod hydrator;
pub mod pairing;
pub mod pipelines;
pub mod pricing;
pub mod query_hydrator;
pub mod rate_limit;
pub mod scorer;
pub mod selector;
pub mod side_effect;
pub mod source;
pub mod store;
pub mod types;
pub mod util;
pub mod volume;

pub use candidate_pipeline::{CandidatePipeline, PipelineResult};
pub use pipelines::gift_bundle::{GiftBundleConfig, GiftBundlePipeline};
pub use types::{Bottle, BottlePair, BundleCandidate, BundleQuery, Synergy, NEUTRAL_SCORE};
