//! Case corpus loading.
//!
//! A corpus is a flat directory of `<id>.json` files, one case each:
//!
//! ```json
//! {"Id": "...", "CaseDate": "...", "CityName": "...", "CityId": 1,
//!  "Summary": "...", "CaseTitle": "...", "embedding": [0.01, ...]}
//! ```
//!
//! Files are read in file-name order so clustering sees a stable input
//! order. Unusable files are skipped with a warning rather than failing
//! the whole load.

use anyhow::{bail, Context, Result};
use caselens_core::models::{Document, Metadata};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One case file as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "CaseDate", default)]
    pub case_date: String,
    #[serde(rename = "CityName", default)]
    pub city_name: String,
    #[serde(rename = "CityId", default)]
    pub city_id: i64,
    #[serde(rename = "Summary", default)]
    pub summary: String,
    #[serde(rename = "CaseTitle", default)]
    pub case_title: String,
    #[serde(default)]
    pub embedding: Vec<f32>,
}

impl CaseRecord {
    /// Convert into a core [`Document`]: the summary becomes the text and
    /// the remaining fields move into metadata.
    pub fn into_document(self) -> Document {
        let mut metadata = Metadata::new();
        metadata.insert("CaseDate".to_string(), self.case_date.into());
        metadata.insert("CityName".to_string(), self.city_name.into());
        metadata.insert("CityId".to_string(), self.city_id.into());
        metadata.insert("CaseTitle".to_string(), self.case_title.into());

        Document {
            id: self.id,
            vector: self.embedding,
            text: self.summary,
            metadata,
        }
    }
}

/// Why a case file was left out of the corpus.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of [`load_corpus`].
#[derive(Debug)]
pub struct LoadReport {
    pub documents: Vec<Document>,
    pub skipped: Vec<SkippedFile>,
}

/// Load every usable case under `dir`.
///
/// # Errors
///
/// Fails if the directory cannot be walked or if no case survives the
/// checks.
pub fn load_corpus(dir: &Path, dims: usize, min_summary_bytes: usize) -> Result<LoadReport> {
    if !dir.is_dir() {
        bail!("Corpus directory does not exist: {}", dir.display());
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path.to_path_buf());
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();

    for path in paths {
        match read_case(&path).and_then(|case| check_case(case, dims, min_summary_bytes)) {
            Ok(doc) => {
                debug!(file = %path.display(), id = %doc.id, "loaded case");
                documents.push(doc);
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping case file");
                skipped.push(SkippedFile {
                    path,
                    reason: format!("{:#}", e),
                });
            }
        }
    }

    if documents.is_empty() {
        bail!(
            "No usable cases in {} ({} skipped)",
            dir.display(),
            skipped.len()
        );
    }

    Ok(LoadReport { documents, skipped })
}

fn read_case(path: &Path) -> Result<CaseRecord> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn check_case(case: CaseRecord, dims: usize, min_summary_bytes: usize) -> Result<Document> {
    if case.id.trim().is_empty() {
        bail!("missing Id");
    }
    if case.embedding.is_empty() {
        bail!("case {} has no embedding", case.id);
    }
    if case.embedding.len() != dims {
        bail!(
            "case {} has a {}-dimensional embedding, expected {}",
            case.id,
            case.embedding.len(),
            dims
        );
    }
    // UTF-8 bytes, not chars: a 40-char Chinese summary is 120 bytes
    if case.summary.len() <= min_summary_bytes {
        bail!(
            "case {} summary has {} bytes, needs more than {}",
            case.id,
            case.summary.len(),
            min_summary_bytes
        );
    }
    Ok(case.into_document())
}
