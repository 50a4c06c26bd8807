//! Registry credentials and the docker credential file.
//!
//! The credential file is JSON keyed by registry, each entry carrying an
//! `auth` field holding base64 `user:password`. Both the legacy layout
//! (entries at the top level) and the newer `{"auths": {...}}` wrapper are
//! accepted. Keys may be bare hosts or URLs such as
//! `https://registry.example.com/v1/`.

use std::collections::BTreeMap;
use std::io::{self, BufRead};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use camino::Utf8Path;
use serde::Deserialize;
use tracing::debug;

use crate::command::CredentialSource;
use crate::error::{CommandError, FuguError, RegistryError};
use crate::source::read_to_string;

/// A user name and password for basic authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Registry user.
    pub user: String,
    /// Registry password.
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct AuthEntry {
    #[serde(default)]
    auth: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CredentialFile {
    Wrapped { auths: BTreeMap<String, AuthEntry> },
    Legacy(BTreeMap<String, AuthEntry>),
}

impl CredentialFile {
    fn into_entries(self) -> BTreeMap<String, AuthEntry> {
        match self {
            Self::Wrapped { auths } => auths,
            Self::Legacy(entries) => entries,
        }
    }
}

/// Find the credentials for `registry` in credential file content.
///
/// # Errors
///
/// Returns a description of the problem when the content is not a
/// credential file or the matching entry cannot be decoded.
pub fn parse_credential_file(content: &str, registry: &str) -> Result<Option<Credentials>, String> {
    let file: CredentialFile = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let Some(entry) = file
        .into_entries()
        .into_iter()
        .find(|(key, _)| host_of(key) == registry)
        .map(|(_, entry)| entry)
    else {
        return Ok(None);
    };
    let decoded = STANDARD
        .decode(entry.auth.trim())
        .map_err(|e| format!("invalid auth entry: {e}"))?;
    let text = String::from_utf8(decoded).map_err(|e| format!("invalid auth entry: {e}"))?;
    let (user, password) = text
        .split_once(':')
        .ok_or_else(|| String::from("invalid auth entry: missing ':'"))?;
    Ok(Some(Credentials {
        user: user.to_owned(),
        password: password.to_owned(),
    }))
}

/// Host part of a credential file key.
fn host_of(key: &str) -> &str {
    let without_scheme = key
        .strip_prefix("https://")
        .or_else(|| key.strip_prefix("http://"))
        .unwrap_or(key);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme)
}

/// Read the credentials for `registry` from the file at `path`.
///
/// A missing file yields `None`.
///
/// # Errors
///
/// Returns [`RegistryError::CredentialsUnreadable`] when the file cannot be
/// read or parsed.
pub fn read_credential_file(
    path: &Utf8Path,
    registry: &str,
) -> Result<Option<Credentials>, RegistryError> {
    let unreadable = |message: String| RegistryError::CredentialsUnreadable {
        path: path.to_owned(),
        message,
    };
    let content = match read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(%path, "credential file not found");
            return Ok(None);
        }
        Err(e) => return Err(unreadable(e.to_string())),
    };
    parse_credential_file(&content, registry).map_err(unreadable)
}

/// Turn a [`CredentialSource`] into usable credentials.
///
/// `stdin` supplies the password for [`CredentialSource::Stdin`]; only its
/// first line is used.
///
/// # Errors
///
/// Returns [`CommandError::NoCredentials`] when the user or password ends up
/// empty, and [`RegistryError`] when a password or file cannot be read.
pub fn resolve<R: BufRead + ?Sized>(
    source: &CredentialSource,
    registry: &str,
    stdin: &mut R,
) -> Result<Credentials, FuguError> {
    let credentials = match source {
        CredentialSource::Explicit { user, password } => Some(Credentials {
            user: user.clone(),
            password: password.clone(),
        }),
        CredentialSource::Stdin { user } => Some(Credentials {
            user: user.clone(),
            password: read_password(stdin)?,
        }),
        CredentialSource::File(path) => read_credential_file(Utf8Path::new(path), registry)?,
    };
    credentials
        .filter(|found| !found.user.is_empty() && !found.password.is_empty())
        .ok_or_else(|| CommandError::NoCredentials.into())
}

fn read_password<R: BufRead + ?Sized>(stdin: &mut R) -> Result<String, RegistryError> {
    let mut line = String::new();
    stdin
        .read_line(&mut line)
        .map_err(|e| RegistryError::PasswordPrompt {
            message: e.to_string(),
        })?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}
