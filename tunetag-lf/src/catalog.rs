//! Label Catalog: checks that a label selection exists in a library

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use tunetag_common::db::Label;

use crate::error::{FilterError, Result};
use crate::store::LabelStore;

#[derive(Clone)]
pub struct LabelCatalog {
    store: Arc<dyn LabelStore>,
}

impl LabelCatalog {
    pub fn new(store: Arc<dyn LabelStore>) -> Self {
        Self { store }
    }

    /// Resolve `label_ids` to labels of `library_id`
    ///
    /// Duplicate ids are treated as one. Fails with
    /// [`FilterError::LabelNotFound`] listing every id (in input order) that
    /// the library doesn't contain.
    pub async fn validate_labels(
        &self,
        library_id: &str,
        label_ids: &[String],
    ) -> Result<Vec<Label>> {
        let requested = distinct_in_order(label_ids);
        let found = self.store.find_labels_by_ids(library_id, &requested).await?;

        let mut seen = HashSet::new();
        let labels: Vec<Label> = found
            .into_iter()
            .filter(|label| seen.insert(label.label_id.clone()))
            .collect();

        if labels.len() < requested.len() {
            let missing: Vec<String> = requested
                .into_iter()
                .filter(|id| !seen.contains(id))
                .collect();
            warn!("Unknown label ids in library {}: {:?}", library_id, missing);
            return Err(FilterError::LabelNotFound {
                library_id: library_id.to_string(),
                missing,
            });
        }

        debug!("Validated {} labels in library {}", labels.len(), library_id);
        Ok(labels)
    }
}

fn distinct_in_order(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use tunetag_common::db::LabelKind;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn catalog() -> LabelCatalog {
        let store = MemoryStore::default()
            .label("lib1", "R1", LabelKind::Regular)
            .label("lib1", "SA", LabelKind::Super)
            .label("lib2", "R9", LabelKind::Regular);
        LabelCatalog::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_all_labels_found() {
        let labels = catalog().validate_labels("lib1", &ids(&["R1", "SA"])).await.unwrap();
        assert_eq!(labels.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicates_treated_as_set() {
        let labels = catalog()
            .validate_labels("lib1", &ids(&["R1", "R1", "R1"]))
            .await
            .unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].kind, LabelKind::Regular);
    }

    #[tokio::test]
    async fn test_missing_ids_enumerated() {
        let err = catalog()
            .validate_labels("lib1", &ids(&["X1", "R1", "X2", "X1"]))
            .await
            .unwrap_err();

        match err {
            FilterError::LabelNotFound { library_id, missing } => {
                assert_eq!(library_id, "lib1");
                assert_eq!(missing, ids(&["X1", "X2"]));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_label_from_other_library_is_missing() {
        let err = catalog().validate_labels("lib1", &ids(&["R9"])).await.unwrap_err();
        assert!(matches!(err, FilterError::LabelNotFound { .. }));
    }
}
