//! Informational commands that print resolved configuration.

use crate::error::{CommandError, Result};
use crate::merge::Collected;

/// The selected label's merged data as YAML, or nothing when empty.
pub(super) fn show_data(collected: &Collected) -> Result<String> {
    if !collected.remaining.is_empty() {
        return Err(CommandError::TooManyArgs.into());
    }
    if collected.data.is_empty() {
        return Ok(String::new());
    }
    serde_yaml::to_string(&collected.data).map_err(|e| {
        CommandError::RenderFailed {
            message: e.to_string(),
        }
        .into()
    })
}

/// Every known label, sorted, one per line.
pub(super) fn show_labels(collected: &Collected) -> Result<String> {
    if collected.label.is_some() || !collected.remaining.is_empty() {
        return Err(CommandError::TooManyArgs.into());
    }
    let mut labels = collected.labels.clone();
    labels.sort();
    Ok(labels.iter().map(|label| format!("{label}\n")).collect())
}
