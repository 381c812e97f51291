// src/filename.rs
use crate::extractor::extract_identity;
use crate::tree::ContentNode;
use crate::types::Identity;
use crate::utils::slug_segment;
use tracing::debug;

const PREFIX: &str = "cv";
const DEFAULT_BASE: &str = "curriculum-vitae";

/// Derive `cv-<name>-<title>.<extension>` from the identity fields.
///
/// Absent fields, or fields that normalize to nothing, drop their segment.
/// With neither present the base is `curriculum-vitae`. This never fails.
pub fn build_file_name(identity: &Identity, extension: &str) -> String {
    let segments: Vec<String> = [identity.name.as_deref(), identity.title.as_deref()]
        .into_iter()
        .flatten()
        .map(slug_segment)
        .filter(|segment| !segment.is_empty())
        .collect();

    let base = if segments.is_empty() {
        DEFAULT_BASE.to_string()
    } else {
        format!("{}-{}", PREFIX, segments.join("-"))
    };

    let file_name = format!("{}.{}", base, extension);
    debug!("Generated file name: {}", file_name);
    file_name
}

/// File name for an export of the page at `root`.
pub fn file_name_for<N: ContentNode>(root: &N, extension: &str) -> String {
    build_file_name(&extract_identity(root), extension)
}

/// File name used when nothing can be read from the page.
pub fn default_file_name(extension: &str) -> String {
    format!("{}.{}", DEFAULT_BASE, extension)
}
