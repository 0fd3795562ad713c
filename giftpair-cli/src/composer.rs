use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use giftpair_pipeline::collaborators::ImageComposer;

/// Composes bundle photos by running an external program.
///
/// The program is called as `<program> <left> <right> <output>` and must
/// exit zero after writing `output`.
pub struct CommandImageComposer {
    program: PathBuf,
}

impl CommandImageComposer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl ImageComposer for CommandImageComposer {
    async fn compose(&self, left: &Path, right: &Path, output: &Path) -> Result<PathBuf, String> {
        log::debug!(
            "running {} {} {} {}",
            self.program.display(),
            left.display(),
            right.display(),
            output.display()
        );
        let result = Command::new(&self.program)
            .arg(left)
            .arg(right)
            .arg(output)
            .output()
            .await
            .map_err(|e| format!("cannot run {}: {}", self.program.display(), e))?;

        if !result.status.success() {
            return Err(format!(
                "{} exited with {}: {}",
                self.program.display(),
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            ));
        }
        Ok(output.to_path_buf())
    }
}
