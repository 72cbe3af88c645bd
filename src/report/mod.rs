// src/report/mod.rs
// PDF property reports: content types, artifact storage, rendering

mod layout;
pub mod render;
pub mod store;
pub mod types;

pub use render::render_report;
pub use store::ArtifactStore;
pub use types::{Cell, ReportData, ReportSection, Table};

/// File name of an artifact inside the output directory
pub fn artifact_file_name(artifact_id: &str) -> String {
    format!("{}.pdf", artifact_id)
}
