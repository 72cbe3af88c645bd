// src/report/store.rs
// Location and naming of rendered report artifacts

use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::artifact_file_name;

/// Output directory plus the public URL prefix it is served under
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    output_dir: PathBuf,
    base_url: String,
}

impl ArtifactStore {
    pub fn new(output_dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            output_dir: output_dir.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if missing
    pub fn ensure_dir(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.output_dir)
    }

    /// `report_` followed by 8 lowercase hex characters
    pub fn new_artifact_id() -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("report_{}", &hex[..8])
    }

    pub fn path_for(&self, artifact_id: &str) -> PathBuf {
        self.output_dir.join(artifact_file_name(artifact_id))
    }

    pub fn url_for(&self, artifact_id: &str) -> String {
        format!("{}/{}", self.base_url, artifact_file_name(artifact_id))
    }
}
