//! Data types that flow through clustering and search.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Free-form document fields carried alongside the vector (title, date, ...).
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Mean vector of a cluster's members.
pub type Centroid = Vec<f32>;

/// A corpus document: an externally assigned id, its embedding, and its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub vector: Vec<f32>,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(id: impl Into<String>, vector: Vec<f32>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vector,
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    /// Copy of this document with the vector stripped, for result sinks.
    pub fn view(&self) -> DocumentView {
        DocumentView {
            id: self.id.clone(),
            text: self.text.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// A [`Document`] without its vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentView {
    pub id: String,
    pub text: String,
    pub metadata: Metadata,
}

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityResult {
    pub document_id: String,
    pub score: f32,
}

/// A named group of documents produced by one clustering run.
///
/// `id` is the id of the member closest to `centroid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub id: String,
    pub name: String,
    pub doc_ids: Vec<String>,
    pub keywords: Vec<String>,
    pub summary: String,
    pub centroid: Centroid,
}

/// Document id → cluster id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterIndex(BTreeMap<String, String>);

impl ClusterIndex {
    /// Build the index from finished clusters.
    pub fn from_clusters(clusters: &[Cluster]) -> Self {
        let mut map = BTreeMap::new();
        for cluster in clusters {
            for doc_id in &cluster.doc_ids {
                map.insert(doc_id.clone(), cluster.id.clone());
            }
        }
        Self(map)
    }

    pub fn cluster_of(&self, doc_id: &str) -> Option<&str> {
        self.0.get(doc_id).map(String::as_str)
    }

    pub fn document_count(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(id: &str, members: &[&str]) -> Cluster {
        Cluster {
            id: id.to_string(),
            name: String::new(),
            doc_ids: members.iter().map(|m| m.to_string()).collect(),
            keywords: Vec::new(),
            summary: String::new(),
            centroid: vec![0.0],
        }
    }

    #[test]
    fn test_index_lookup_returns_cluster_id() {
        let clusters = vec![cluster("a", &["a", "b"]), cluster("d", &["c", "d"])];
        let index = ClusterIndex::from_clusters(&clusters);
        assert_eq!(index.document_count(), 4);
        assert_eq!(index.cluster_of("b"), Some("a"));
        assert_eq!(index.cluster_of("c"), Some("d"));
        assert_eq!(index.cluster_of("zzz"), None);
    }

    #[test]
    fn test_index_serializes_as_flat_map() {
        let index = ClusterIndex::from_clusters(&[cluster("x", &["x", "y"])]);
        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json, serde_json::json!({"x": "x", "y": "x"}));
    }

    #[test]
    fn test_view_strips_vector() {
        let mut doc = Document::new("1", vec![1.0, 2.0], "text");
        doc.metadata
            .insert("CaseTitle".to_string(), serde_json::json!("title"));
        let json = serde_json::to_value(doc.view()).unwrap();
        assert!(json.get("vector").is_none());
        assert_eq!(json["metadata"]["CaseTitle"], "title");
    }

    #[test]
    fn test_cluster_uses_camel_case() {
        let json = serde_json::to_value(cluster("a", &["a"])).unwrap();
        assert!(json.get("docIds").is_some());
        let hit = SimilarityResult {
            document_id: "a".to_string(),
            score: 0.5,
        };
        let json = serde_json::to_value(hit).unwrap();
        assert_eq!(json["documentId"], "a");
    }
}
