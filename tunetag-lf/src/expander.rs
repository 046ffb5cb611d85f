//! Super-Label Expander: resolves a label selection to REGULAR label ids

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;
use tunetag_common::db::{Label, LabelKind};

use crate::error::{FilterError, Result};
use crate::store::LabelStore;

#[derive(Clone)]
pub struct SuperLabelExpander {
    store: Arc<dyn LabelStore>,
}

impl SuperLabelExpander {
    pub fn new(store: Arc<dyn LabelStore>) -> Self {
        Self { store }
    }

    /// Union of the REGULAR label ids `labels` stand for
    ///
    /// REGULAR labels contribute themselves, SUPER labels their components.
    /// Overlapping contributions collapse, so the result size is the size of
    /// the union. A SUPER label without components fails with
    /// [`FilterError::SuperLabelEmptyComponents`].
    pub async fn expand(&self, library_id: &str, labels: &[Label]) -> Result<BTreeSet<String>> {
        let mut required = BTreeSet::new();

        for label in labels {
            match label.kind {
                LabelKind::Regular => {
                    required.insert(label.label_id.clone());
                }
                LabelKind::Super => {
                    let components = self
                        .store
                        .find_super_label_components(library_id, &label.label_id)
                        .await?;

                    if components.is_empty() {
                        return Err(FilterError::SuperLabelEmptyComponents {
                            label_id: label.label_id.clone(),
                            name: label.name.clone(),
                        });
                    }

                    debug!(
                        "Super label {} expands to {} components",
                        label.label_id,
                        components.len()
                    );
                    required.extend(components.into_iter().map(|c| c.regular_label_id));
                }
            }
        }

        Ok(required)
    }
}
