//! Evaluation results persistence module

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::cluster::Collection;
use crate::error::EvalError;

/// Size summary of an evaluated collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSummary {
    pub file: String,
    pub clusters: usize,
    pub nodes: usize,
}

impl From<&Collection> for CollectionSummary {
    fn from(collection: &Collection) -> Self {
        Self {
            file: collection.name().to_string(),
            clusters: collection.cluster_count(),
            nodes: collection.node_count(),
        }
    }
}

/// Similarity of two collections by the requested measures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityReport {
    pub collections: [CollectionSummary; 2],

    /// F1 Max Average Harmonic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f1mah: Option<f64>,

    /// NMI, reported as 0 until implemented
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nmi: Option<f64>,
}

impl SimilarityReport {
    /// Report without any measure evaluated yet
    pub fn new(cn1: &Collection, cn2: &Collection) -> Self {
        Self {
            collections: [cn1.into(), cn2.into()],
            f1mah: None,
            nmi: None,
        }
    }
}

/// Pretty printed JSON of the report
pub fn to_json(report: &SimilarityReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Save the report as JSON to `path`
pub fn write_report(report: &SimilarityReport, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    log::info!("Saving the similarity report to {}", path.display());

    let json = to_json(report)?;
    let mut file = File::create(path).map_err(|source| EvalError::Report {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(json.as_bytes())
        .and_then(|()| file.write_all(b"\n"))
        .map_err(|source| EvalError::Report {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(())
}
