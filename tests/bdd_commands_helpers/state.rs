//! Scenario state for command rendering behavioural tests.

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Keys of one label, in the order the steps declared them.
pub(crate) type LabelEntries = Vec<(String, Vec<(String, String)>)>;

#[derive(Debug, Clone)]
pub(crate) enum InvocationOutcome {
    Completed { stdout: String, status: i32 },
    Failed { message: String, status: u8 },
}

#[derive(Default, ScenarioState)]
pub(crate) struct CommandsState {
    pub(crate) labels: Slot<LabelEntries>,
    pub(crate) program: Slot<String>,
    pub(crate) branch: Slot<String>,
    pub(crate) outcome: Slot<InvocationOutcome>,
}

impl CommandsState {
    /// Append `key: value` to `label`, creating the label on first use.
    pub(crate) fn push(&self, label: &str, key: &str, value: &str) {
        let mut labels = self.labels.get().unwrap_or_default();
        let entry = (key.to_owned(), value.to_owned());
        match labels.iter_mut().find(|(name, _)| name == label) {
            Some((_, keys)) => keys.push(entry),
            None => labels.push((label.to_owned(), vec![entry])),
        }
        self.labels.set(labels);
    }

    /// The declared labels as a YAML document.
    pub(crate) fn document(&self) -> String {
        self.labels
            .get()
            .unwrap_or_default()
            .iter()
            .map(|(label, keys)| {
                let body: String = keys
                    .iter()
                    .map(|(key, value)| format!("  {key}: \"{value}\"\n"))
                    .collect();
                format!("{label}:\n{body}")
            })
            .collect()
    }
}

#[fixture]
pub(crate) fn commands_state() -> CommandsState {
    let state = CommandsState::default();
    state.program.set(String::from("docker"));
    state
}
