//! Label inheritance through the `<<` key.

use serde_yaml::{Mapping, Value};
use tracing::trace;

use super::{Label, LabelConfig, MERGE_MARKER, mapping_entries};
use crate::error::DocumentError;

/// A label whose parent reference may still be unresolved.
#[derive(Debug)]
pub(super) struct PendingLabel {
    name: String,
    config: LabelConfig,
    parent: Option<String>,
}

impl PendingLabel {
    /// Build a label from its raw mapping.
    ///
    /// A `<<` holding a label name becomes the parent reference. A `<<`
    /// holding a mapping (a YAML alias) or a list of mappings is merged in
    /// place, never overriding keys the label sets itself.
    pub(super) fn from_mapping(name: &str, mapping: &Mapping) -> Result<Self, DocumentError> {
        let mut config = LabelConfig::new();
        let mut parent = None;
        let mut inline = Vec::new();

        for (key, value) in mapping_entries(name, mapping)? {
            if key != MERGE_MARKER {
                config.insert(key, value);
                continue;
            }
            match value {
                Value::String(reference) => parent = Some(reference),
                Value::Mapping(merged) => inline.push(merged),
                Value::Sequence(items) => {
                    for item in items {
                        let Value::Mapping(merged) = item else {
                            return Err(invalid_marker(name));
                        };
                        inline.push(merged);
                    }
                }
                _ => return Err(invalid_marker(name)),
            }
        }

        for merged in &inline {
            for (key, value) in mapping_entries(name, merged)? {
                if key != MERGE_MARKER {
                    config.entry(key).or_insert(value);
                }
            }
        }

        Ok(Self {
            name: name.to_owned(),
            config,
            parent,
        })
    }
}

fn invalid_marker(label: &str) -> DocumentError {
    DocumentError::StructuralParseFailure {
        message: format!("label '{label}' has an invalid '{MERGE_MARKER}' value"),
    }
}

/// Copy inherited keys until no label has a pending parent.
///
/// A label only inherits from a parent that is itself fully resolved, so
/// chains pick up keys from every ancestor. References to missing labels are
/// dropped. A round without progress means the remaining labels form a cycle.
pub(super) fn resolve(mut pending: Vec<PendingLabel>) -> Result<Vec<Label>, DocumentError> {
    loop {
        let waiting: Vec<usize> = pending
            .iter()
            .enumerate()
            .filter(|(_, label)| label.parent.is_some())
            .map(|(index, _)| index)
            .collect();
        if waiting.is_empty() {
            break;
        }

        let mut progressed = false;
        for index in waiting {
            let Some(parent_name) = pending.get(index).and_then(|l| l.parent.clone()) else {
                continue;
            };
            let parent = pending.iter().find(|label| label.name == parent_name);
            let inherited = match parent {
                Some(found) if found.parent.is_some() => continue,
                Some(found) => Some(found.config.clone()),
                None => None,
            };
            if let Some(child) = pending.get_mut(index) {
                trace!(label = %child.name, parent = %parent_name, "resolving inheritance");
                for (key, value) in inherited.unwrap_or_default() {
                    child.config.entry(key).or_insert(value);
                }
                child.parent = None;
                progressed = true;
            }
        }

        if !progressed {
            let labels = pending
                .iter()
                .filter(|label| label.parent.is_some())
                .map(|label| label.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(DocumentError::CyclicInheritance { labels });
        }
    }

    Ok(pending
        .into_iter()
        .map(|label| Label {
            name: label.name,
            config: label.config,
        })
        .collect())
}
