//! Labelled configuration documents.
//!
//! A fugu document is YAML. When its top level carries an `image` key the whole
//! mapping is one label named `default`; otherwise every top-level key names a
//! label whose value is that label's mapping. A label may inherit unset keys
//! from another label through the `<<` key:
//!
//! ```yaml
//! base:
//!   image: redis
//!   publish: "6379:6379"
//! cache:
//!   <<: base
//!   name: cache
//! ```
//!
//! `$NAME` references anywhere in the text are replaced from the environment
//! before the YAML is parsed.

mod env;
mod inherit;


use std::collections::BTreeMap;

use serde_yaml::{Mapping, Value};
use tracing::debug;

pub use env::substitute;

use crate::error::{DocumentError, TypeError};
use crate::value::ValueSet;

/// Name of the label synthesised for shorthand documents.
pub const DEFAULT_LABEL: &str = "default";

/// Key through which a label inherits from another.
pub const MERGE_MARKER: &str = "<<";

/// A label's flat option mapping.
pub type LabelConfig = BTreeMap<String, Value>;

/// A named section of a document, after inheritance.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    name: String,
    config: LabelConfig,
}

impl Label {
    /// The label name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The label's options.
    #[must_use]
    pub const fn config(&self) -> &LabelConfig {
        &self.config
    }
}

/// Label names plus the options of the selected label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Every label in the document, in source order.
    pub labels: Vec<String>,
    /// Options of the selected label; empty when the requested label is absent.
    pub config: LabelConfig,
}

/// A parsed document with inheritance resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    labels: Vec<Label>,
}

impl Document {
    /// Substitute environment variables into `raw`, then parse it.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] when the document is empty, is not a
    /// mapping of labels, nests values too deeply, has inheritance cycles, or
    /// leaves a label without an image.
    pub fn parse<E: mockable::Env>(raw: &str, env: &E) -> Result<Self, DocumentError> {
        Self::from_text(&substitute(raw, env))
    }

    /// Parse document text that needs no substitution.
    ///
    /// # Errors
    ///
    /// See [`Document::parse`].
    pub fn from_text(text: &str) -> Result<Self, DocumentError> {
        if text.trim().is_empty() {
            return Err(DocumentError::EmptyDocument);
        }
        let root: Value =
            serde_yaml::from_str(text).map_err(|e| DocumentError::StructuralParseFailure {
                message: e.to_string(),
            })?;
        let top = match root {
            Value::Null => return Err(DocumentError::EmptyDocument),
            Value::Mapping(top) if top.is_empty() => return Err(DocumentError::EmptyDocument),
            Value::Mapping(top) => top,
            _ => {
                return Err(DocumentError::StructuralParseFailure {
                    message: String::from("top level must be a mapping"),
                });
            }
        };

        let pending = if top.contains_key("image") {
            debug!("document uses the single-label shorthand");
            vec![inherit::PendingLabel::from_mapping(DEFAULT_LABEL, &top)?]
        } else {
            top.iter()
                .map(|(key, value)| pending_label(key, value))
                .collect::<Result<Vec<_>, _>>()?
        };

        let labels = inherit::resolve(pending)?;
        if let Some(label) = labels.iter().find(|l| !l.config.contains_key("image")) {
            return Err(DocumentError::MissingImageKey {
                label: label.name.clone(),
            });
        }
        Ok(Self { labels })
    }

    /// The labels in source order.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The label names in source order.
    #[must_use]
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|label| label.name.clone()).collect()
    }

    /// Whether a label called `name` exists.
    #[must_use]
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label.name == name)
    }

    /// Pick the label to use.
    ///
    /// A requested label is used only if it exists. Without a request the
    /// `default` label wins, then the first label in source order.
    #[must_use]
    pub fn select(&self, requested: Option<&str>) -> Option<&Label> {
        match requested {
            Some(name) => self.labels.iter().find(|label| label.name == name),
            None => self
                .labels
                .iter()
                .find(|label| label.name == DEFAULT_LABEL)
                .or_else(|| self.labels.first()),
        }
    }

    /// Label names together with the selected label's options.
    #[must_use]
    pub fn resolve(&self, requested: Option<&str>) -> Resolution {
        let config = self
            .select(requested)
            .map(|label| label.config.clone())
            .unwrap_or_default();
        Resolution {
            labels: self.label_names(),
            config,
        }
    }
}

/// Push a label's options into the cells that share their names.
///
/// Keys without a matching cell are skipped.
///
/// # Errors
///
/// Returns the first [`TypeError`] raised by a cell.
pub fn apply(config: &LabelConfig, cells: &mut ValueSet) -> Result<(), TypeError> {
    for (key, value) in config {
        cells.set(key, value)?;
    }
    Ok(())
}

fn pending_label(key: &Value, value: &Value) -> Result<inherit::PendingLabel, DocumentError> {
    let name = key_text(key)?;
    match value {
        Value::Mapping(mapping) => inherit::PendingLabel::from_mapping(&name, mapping),
        Value::Null => Err(DocumentError::MissingImageKey { label: name }),
        _ => Err(DocumentError::StructuralParseFailure {
            message: format!("label '{name}' must be a mapping"),
        }),
    }
}

fn key_text(key: &Value) -> Result<String, DocumentError> {
    match key {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        _ => Err(DocumentError::StructuralParseFailure {
            message: String::from("keys must be scalars"),
        }),
    }
}

/// Reject mapping values under a label key, including inside lists.
fn check_depth(label: &str, key: &str, value: &Value) -> Result<(), DocumentError> {
    match value {
        Value::Mapping(_) => Err(DocumentError::TooDeeplyNested {
            label: label.to_owned(),
            key: key.to_owned(),
        }),
        Value::Sequence(items) => items
            .iter()
            .try_for_each(|item| check_depth(label, key, item)),
        _ => Ok(()),
    }
}

fn mapping_entries(
    label: &str,
    mapping: &Mapping,
) -> Result<Vec<(String, Value)>, DocumentError> {
    mapping
        .iter()
        .map(|(key, value)| key_text(key).map(|name| (name, value.clone())))
        .map(|entry| {
            let (key, value) = entry?;
            if key != MERGE_MARKER {
                check_depth(label, &key, &value)?;
            }
            Ok((key, value))
        })
        .collect()
}
