//! Typed configuration cells.
//!
//! A [`TypedValue`] is a single named slot holding a string, boolean, integer,
//! or string list. It remembers whether anything ever assigned to it, coerces
//! loosely typed document values into its declared kind, and renders itself
//! back into command-line syntax. A [`ValueSet`] groups the cells for one
//! invocation and resolves them by any alias.

mod bag;


use std::fmt;

use serde_yaml::Value;

pub use bag::DataBag;

use crate::error::TypeError;

/// The closed set of kinds a cell can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A single string.
    String,
    /// A boolean switch.
    Bool,
    /// A signed 64-bit integer.
    Int,
    /// An ordered list of strings.
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::List => "list",
        };
        f.write_str(name)
    }
}

/// The payload held by a cell, always matching the cell's kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// String payload.
    String(String),
    /// Boolean payload.
    Bool(bool),
    /// Integer payload.
    Int(i64),
    /// String list payload.
    List(Vec<String>),
}

impl Payload {
    /// The zero value for a kind.
    #[must_use]
    pub const fn zero(kind: ValueKind) -> Self {
        match kind {
            ValueKind::String => Self::String(String::new()),
            ValueKind::Bool => Self::Bool(false),
            ValueKind::Int => Self::Int(0),
            ValueKind::List => Self::List(Vec::new()),
        }
    }

    /// The kind of this payload.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::List(_) => ValueKind::List,
        }
    }

    /// The payload as a document value, for dumping resolved data.
    #[must_use]
    pub fn to_yaml(&self) -> Value {
        match self {
            Self::String(text) => Value::String(text.clone()),
            Self::Bool(flag) => Value::Bool(*flag),
            Self::Int(number) => Value::Number((*number).into()),
            Self::List(items) => {
                Value::Sequence(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// A named, typed configuration cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedValue {
    names: Vec<String>,
    payload: Payload,
    defined: bool,
}

impl TypedValue {
    /// Create an undefined cell of `kind` answering to `names`.
    ///
    /// The first name is canonical. Later names are aliases, usually a
    /// single-character short form.
    #[must_use]
    pub fn new(kind: ValueKind, names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|name| (*name).to_owned()).collect(),
            payload: Payload::zero(kind),
            defined: false,
        }
    }

    /// The canonical (first) name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.names.first().map_or("", String::as_str)
    }

    /// All names this cell answers to, canonical first.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether `name` is one of this cell's names.
    #[must_use]
    pub fn answers_to(&self, name: &str) -> bool {
        self.names.iter().any(|candidate| candidate == name)
    }

    /// The declared kind.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.payload.kind()
    }

    /// Whether the cell has ever been assigned.
    #[must_use]
    pub const fn is_defined(&self) -> bool {
        self.defined
    }

    /// The current payload in its native form.
    #[must_use]
    pub const fn get(&self) -> &Payload {
        &self.payload
    }

    /// Coerce `raw` into the cell's kind and store it.
    ///
    /// Lists are replaced, never appended to. The cell stays untouched when
    /// coercion fails.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::InvalidType`] when `raw` cannot be coerced, for
    /// example a mapping given to a string cell or `"yes"` given to a boolean.
    pub fn set(&mut self, raw: &Value) -> Result<(), TypeError> {
        let payload = match self.kind() {
            ValueKind::String => Payload::String(self.coerce_scalar(raw)?),
            ValueKind::Bool => Payload::Bool(self.coerce_bool(raw)?),
            ValueKind::Int => Payload::Int(self.coerce_int(raw)?),
            ValueKind::List => Payload::List(self.coerce_list(raw)?),
        };
        self.assign(payload);
        Ok(())
    }

    /// Store an already typed payload.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::InvalidType`] when the payload kind differs from
    /// the cell kind.
    pub fn set_payload(&mut self, payload: Payload) -> Result<(), TypeError> {
        if payload.kind() != self.kind() {
            return Err(self.invalid(&format!("{} value", payload.kind())));
        }
        self.assign(payload);
        Ok(())
    }

    fn assign(&mut self, payload: Payload) {
        self.payload = payload;
        self.defined = true;
    }

    /// Render the cell as command-line tokens under its canonical name.
    ///
    /// Undefined cells render nothing. Strings and list elements are double
    /// quoted; booleans and integers never are.
    #[must_use]
    pub fn arg(&self) -> Vec<String> {
        if !self.defined {
            return Vec::new();
        }
        let name = self.name();
        match &self.payload {
            Payload::String(text) => vec![format!("--{name}=\"{}\"", quote(text))],
            Payload::Bool(true) => vec![format!("--{name}")],
            Payload::Bool(false) => vec![format!("--{name}=false")],
            Payload::Int(number) => vec![format!("--{name}={number}")],
            Payload::List(items) => items
                .iter()
                .map(|item| format!("--{name}=\"{}\"", quote(item)))
                .collect(),
        }
    }

    /// A copy of this cell with `f` applied to every string it holds.
    #[must_use]
    pub fn map_text(&self, f: impl Fn(&str) -> String) -> Self {
        let payload = match &self.payload {
            Payload::String(text) => Payload::String(f(text)),
            Payload::List(items) => Payload::List(items.iter().map(|item| f(item)).collect()),
            other => other.clone(),
        };
        Self {
            names: self.names.clone(),
            payload,
            defined: self.defined,
        }
    }

    fn coerce_scalar(&self, raw: &Value) -> Result<String, TypeError> {
        scalar_text(raw).ok_or_else(|| self.invalid(&describe(raw)))
    }

    fn coerce_bool(&self, raw: &Value) -> Result<bool, TypeError> {
        match raw {
            Value::Bool(flag) => Ok(*flag),
            Value::String(text) if text == "true" => Ok(true),
            Value::String(text) if text == "false" => Ok(false),
            other => Err(self.invalid(&describe(other))),
        }
    }

    fn coerce_int(&self, raw: &Value) -> Result<i64, TypeError> {
        match raw {
            Value::Number(number) => number.as_i64().ok_or_else(|| self.invalid(&describe(raw))),
            Value::String(text) => text.parse().map_err(|_| self.invalid(&describe(raw))),
            other => Err(self.invalid(&describe(other))),
        }
    }

    fn coerce_list(&self, raw: &Value) -> Result<Vec<String>, TypeError> {
        match raw {
            Value::Sequence(items) => items
                .iter()
                .map(|item| scalar_text(item).ok_or_else(|| self.invalid(&describe(item))))
                .collect(),
            other => Ok(vec![self.coerce_scalar(other)?]),
        }
    }

    fn invalid(&self, found: &str) -> TypeError {
        TypeError::InvalidType {
            name: self.name().to_owned(),
            expected: self.kind(),
            found: found.to_owned(),
        }
    }
}

/// Text form of a scalar document value, `None` for containers and null.
fn scalar_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn describe(raw: &Value) -> String {
    match raw {
        Value::Null => String::from("null"),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => format!("\"{text}\""),
        Value::Sequence(_) => String::from("a list"),
        Value::Mapping(_) => String::from("a mapping"),
        Value::Tagged(tagged) => describe(&tagged.value),
    }
}

/// `text` as a single shell word.
///
/// Words made only of characters the shell treats literally stay bare;
/// anything else, including the empty string, is double quoted.
#[must_use]
pub fn shell_word(text: &str) -> String {
    let plain = !text.is_empty()
        && text
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || "-_./:=@%+,~^".contains(ch));
    if plain {
        text.to_owned()
    } else {
        format!("\"{}\"", quote(text))
    }
}

/// Escape the characters a POSIX shell still interprets inside double quotes.
fn quote(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '"' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// The cells for one invocation, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueSet {
    cells: Vec<TypedValue>,
}

impl ValueSet {
    /// Create a set from cells.
    #[must_use]
    pub const fn new(cells: Vec<TypedValue>) -> Self {
        Self { cells }
    }

    /// Look up a cell by any of its names.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.cells.iter().find(|cell| cell.answers_to(name))
    }

    /// Mutable lookup by any of its names.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut TypedValue> {
        self.cells.iter_mut().find(|cell| cell.answers_to(name))
    }

    /// Set the cell called `name` from a raw value.
    ///
    /// Returns `false` when no cell answers to `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::InvalidType`] when the value does not fit.
    pub fn set(&mut self, name: &str, raw: &Value) -> Result<bool, TypeError> {
        match self.get_mut(name) {
            Some(cell) => cell.set(raw).map(|()| true),
            None => Ok(false),
        }
    }

    /// Force a boolean cell to `flag`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::InvalidType`] when the cell is not boolean.
    pub fn set_bool(&mut self, name: &str, flag: bool) -> Result<bool, TypeError> {
        self.set(name, &Value::Bool(flag))
    }

    /// Force a string cell to `text`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::InvalidType`] when the cell is a boolean or
    /// integer that cannot take `text`.
    pub fn set_text(&mut self, name: &str, text: &str) -> Result<bool, TypeError> {
        self.set(name, &Value::String(text.to_owned()))
    }

    /// String payload of `name`, empty when absent or not a string.
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        match self.get(name).map(TypedValue::get) {
            Some(Payload::String(text)) => text,
            _ => "",
        }
    }

    /// List payload of `name`, empty when absent or not a list.
    #[must_use]
    pub fn list(&self, name: &str) -> &[String] {
        match self.get(name).map(TypedValue::get) {
            Some(Payload::List(items)) => items,
            _ => &[],
        }
    }

    /// Whether `name` is a boolean cell holding `true`.
    #[must_use]
    pub fn is_true(&self, name: &str) -> bool {
        matches!(self.get(name).map(TypedValue::get), Some(Payload::Bool(true)))
    }

    /// Whether `name` exists and has been assigned.
    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.get(name).is_some_and(TypedValue::is_defined)
    }

    /// Iterate over the cells in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &TypedValue> {
        self.cells.iter()
    }

    /// Snapshot of the assigned cells as a multi-valued bag.
    #[must_use]
    pub fn to_bag(&self) -> DataBag {
        let mut bag = DataBag::new();
        for cell in self.cells.iter().filter(|cell| cell.is_defined()) {
            let values = match cell.get() {
                Payload::String(text) => vec![text.clone()],
                Payload::Bool(flag) => vec![flag.to_string()],
                Payload::Int(number) => vec![number.to_string()],
                Payload::List(items) => items.clone(),
            };
            bag.set(cell.name(), values);
        }
        bag
    }
}
