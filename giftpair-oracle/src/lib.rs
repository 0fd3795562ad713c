//! Chat-completions backed collaborators for the gift bundle pipeline.
//!
//! The pipeline only knows the [`SynergyJudge`] and [`CopyGenerator`]
//! seams. This crate fills them with one shared HTTP client:
//! - [`ChatSynergyJudge`] asks for a single 0-100 pairing rating
//! - [`ChatCopywriter`] asks for a short HTML listing body
//!
//! [`SynergyJudge`]: giftpair_pipeline::collaborators::SynergyJudge
//! [`CopyGenerator`]: giftpair_pipeline::collaborators::CopyGenerator

pub mod client;
pub mod copywriter;
pub mod error;
pub mod judge;
pub mod prompts;
pub mod protocol;

pub use client::{ChatClient, OracleConfig};
pub use copywriter::ChatCopywriter;
pub use error::OracleError;
pub use judge::ChatSynergyJudge;
