//! Precedence merge of sources and flags into typed cells.
//!
//! The rule is the same for every field: source values are applied first,
//! then the flags the user supplied on the command line. A flag that merely
//! holds its declared default never overwrites a source value.


use tracing::debug;

use crate::document::{self, LabelConfig};
use crate::error::{CommandError, Result, SourceError, TypeError};
use crate::flags::{FlagResolver, FlagSchema, ParsedFlags};
use crate::source::{LoadedSource, Source};
use crate::value::ValueSet;

/// Apply one label's options, then the supplied flags, onto `cells`.
///
/// # Errors
///
/// Returns the first [`TypeError`] from either stage.
pub fn merge(
    cells: &mut ValueSet,
    file: &LabelConfig,
    flags: &ParsedFlags,
) -> std::result::Result<(), TypeError> {
    document::apply(file, cells)?;
    apply_flags(cells, flags)
}

/// Apply only the flags the user supplied.
///
/// # Errors
///
/// Returns the first [`TypeError`] raised by a cell.
pub fn apply_flags(
    cells: &mut ValueSet,
    flags: &ParsedFlags,
) -> std::result::Result<(), TypeError> {
    for flag in flags.supplied_flags() {
        if let Some(value) = &flag.value {
            cells.set(flag.name, value)?;
        }
    }
    Ok(())
}

/// Parsed flags, loaded sources, and the label read from the command line.
type Resolved = (ParsedFlags, Vec<(Source, LoadedSource)>, Option<String>);

/// Everything one invocation resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected {
    /// The merged cells.
    pub cells: ValueSet,
    /// Label names across all sources, in order of first appearance.
    pub labels: Vec<String>,
    /// The label chosen on the command line, if any.
    pub label: Option<String>,
    /// Positional arguments left after flags and the label.
    pub remaining: Vec<String>,
    /// Whether help was requested.
    pub help: bool,
    /// Options of the selected label across sources, later sources winning,
    /// with the supplied flags written over them.
    pub data: LabelConfig,
}

/// Resolves one invocation against a subcommand schema.
#[derive(Debug, Clone)]
pub struct Collector<'a, E> {
    schema: &'a FlagSchema,
    env: &'a E,
    default_source: Option<Source>,
    label: Option<String>,
}

impl<'a, E: mockable::Env> Collector<'a, E> {
    /// Create a collector for `schema`, substituting from `env`.
    #[must_use]
    pub const fn new(schema: &'a FlagSchema, env: &'a E) -> Self {
        Self {
            schema,
            env,
            default_source: None,
            label: None,
        }
    }

    /// Source used when the command line names none.
    #[must_use]
    pub fn with_default_source(self, source: Option<Source>) -> Self {
        Self {
            default_source: source,
            ..self
        }
    }

    /// Force a label instead of reading it from the command line.
    #[must_use]
    pub fn with_label(self, label: &str) -> Self {
        Self {
            label: Some(label.to_owned()),
            ..self
        }
    }

    /// Parse `tokens`, load sources, pick the label, and merge.
    ///
    /// Only the first token can name a label, and only when it is not a
    /// flag and some source defines it. Otherwise it is the first
    /// positional and everything from it onwards is passed on untouched.
    /// When help is requested nothing is loaded and the cells stay empty.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FuguError`] when flags do not parse, a source cannot be
    /// loaded, a forced label is unknown, or a value does not fit its cell.
    pub fn collect<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Collected> {
        let resolver = FlagResolver::new(self.schema);
        let candidate = match (&self.label, tokens.first().map(AsRef::as_ref)) {
            (None, Some(first)) if !first.is_empty() && !first.starts_with('-') => Some(first),
            _ => None,
        };

        let (flags, sources, label) = match candidate {
            Some(first) => match resolver.parse(tokens.get(1..).unwrap_or_default()) {
                Ok(flags) if flags.help => return Ok(self.help(flags)),
                Ok(flags) => {
                    let sources = self.load_sources(&flags)?;
                    if defines(&sources, first) {
                        (flags, sources, Some(first.to_owned()))
                    } else {
                        self.positional_only(tokens)?
                    }
                }
                Err(error) => {
                    let fallback = self.positional_only(tokens)?;
                    if defines(&fallback.1, first) {
                        return Err(error.into());
                    }
                    fallback
                }
            },
            None => {
                let flags = resolver.parse(tokens)?;
                if flags.help {
                    return Ok(self.help(flags));
                }
                let sources = self.load_sources(&flags)?;
                let label = self.forced_label(&union_labels(&sources))?;
                (flags, sources, label)
            }
        };
        let labels = union_labels(&sources);
        debug!(command = self.schema.command(), ?label, ?labels, "selected label");

        let mut cells = self.schema.cells();
        let mut data = LabelConfig::new();
        for (source, loaded) in &sources {
            let config = loaded.config_for(label.as_deref());
            document::apply(&config, &mut cells).map_err(|e| SourceError::InvalidValue {
                path: source.to_string(),
                source: e,
            })?;
            data.extend(config);
        }
        apply_flags(&mut cells, &flags)?;
        overlay_flags(&mut data, &cells, &flags);

        Ok(Collected {
            cells,
            labels,
            label,
            remaining: flags.remaining,
            help: false,
            data,
        })
    }

    /// Parse `tokens` whose first token is a positional, so no flags apply.
    fn positional_only<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Resolved> {
        let flags = FlagResolver::new(self.schema).parse(tokens)?;
        let sources = self.load_sources(&flags)?;
        Ok((flags, sources, None))
    }

    fn help(&self, flags: ParsedFlags) -> Collected {
        Collected {
            cells: self.schema.cells(),
            remaining: flags.remaining,
            help: true,
            ..Collected::default()
        }
    }

    fn load_sources(&self, flags: &ParsedFlags) -> Result<Vec<(Source, LoadedSource)>> {
        if !self.schema.declares("source") {
            return Ok(Vec::new());
        }
        let explicit = flags
            .supplied_list("source")
            .iter()
            .map(|uri| Source::parse(uri))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let chosen = if explicit.is_empty() {
            self.default_source.iter().cloned().collect()
        } else {
            explicit
        };
        chosen
            .into_iter()
            .map(|source| -> Result<(Source, LoadedSource)> {
                let loaded = source.load(self.env)?;
                Ok((source, loaded))
            })
            .collect()
    }

    fn forced_label(&self, labels: &[String]) -> std::result::Result<Option<String>, CommandError> {
        match &self.label {
            None => Ok(None),
            Some(forced) if labels.contains(forced) => Ok(Some(forced.clone())),
            Some(forced) => Err(CommandError::UnknownLabel {
                label: forced.clone(),
            }),
        }
    }
}

/// Write each supplied flag's typed value over the raw label options.
/// `source` selects documents and is not label data.
fn overlay_flags(data: &mut LabelConfig, cells: &ValueSet, flags: &ParsedFlags) {
    for flag in flags.supplied_flags().filter(|flag| flag.name != "source") {
        if let Some(cell) = cells.get(flag.name) {
            data.insert(flag.name.to_owned(), cell.get().to_yaml());
        }
    }
}

fn defines(sources: &[(Source, LoadedSource)], label: &str) -> bool {
    union_labels(sources).iter().any(|name| name == label)
}

fn union_labels(sources: &[(Source, LoadedSource)]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for name in sources.iter().flat_map(|(_, loaded)| loaded.label_names()) {
        if !labels.contains(&name) {
            labels.push(name);
        }
    }
    labels
}
