//! Seams to the external services the pipeline calls out to.
//!
//! Implementations live outside this crate (the chat-completion client, the
//! image composer command); tests plug in in-memory fakes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::types::Bottle;
use crate::util;

/// Rates how well two bottles sell together.
///
/// Returns the raw service reply; extracting the number is the scorer's job.
#[async_trait]
pub trait SynergyJudge: Send + Sync {
    async fn judge(&self, first: &Bottle, second: &Bottle) -> Result<String, String>;

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}

/// Renders one promotional photo from two product photos.
#[async_trait]
pub trait ImageComposer: Send + Sync {
    /// Compose `left` and `right` into `output`, returning the written path.
    async fn compose(&self, left: &Path, right: &Path, output: &Path) -> Result<PathBuf, String>;

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}

/// Writes the listing body for a bundle.
#[async_trait]
pub trait CopyGenerator: Send + Sync {
    async fn describe(&self, bundle_name: &str) -> Result<String, String>;

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
