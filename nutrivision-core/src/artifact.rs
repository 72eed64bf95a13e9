//! Downloadable meal plan

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name offered for the plan download
pub const PLAN_FILE_NAME: &str = "my_nutrition_plan.txt";

/// MIME type of the plan download
pub const PLAN_MIME: &str = "text/plain";

/// The meal plan as a plain-text file
///
/// The bytes are exactly the displayed plan text: no re-encoding, no added
/// newline, no truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanArtifact {
    bytes: Vec<u8>,
}

impl PlanArtifact {
    pub fn new(plan: &str) -> Self {
        Self {
            bytes: plan.as_bytes().to_vec(),
        }
    }

    pub fn file_name(&self) -> &'static str {
        PLAN_FILE_NAME
    }

    pub fn mime(&self) -> &'static str {
        PLAN_MIME
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Write the file into `dir`, replacing any previous download
    pub fn write_to(&self, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = dir.as_ref().join(PLAN_FILE_NAME);
        fs::write(&path, &self.bytes)?;
        info!("Saved meal plan to {}", path.display());
        Ok(path)
    }
}
