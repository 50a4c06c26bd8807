//! Remote registry image listing.
//!
//! The listing searches the registry for repositories and then fetches the
//! tags of every repository concurrently. A repository whose tag request
//! fails is skipped with a warning. Requests carry no timeout, so a registry
//! that never answers blocks the listing.

pub mod credentials;


use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use futures_util::future::join_all;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub use credentials::Credentials;

use crate::error::RegistryError;

/// A boxed future for async trait methods.
///
/// This type alias enables `mockall::automock` compatibility and trait object
/// usage for async methods in [`RegistryClient`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A repository and its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryImage {
    /// Repository name, e.g. `library/redis`.
    pub name: String,
    /// Tags, sorted.
    pub tags: Vec<String>,
}

/// Read access to a registry's catalogue.
///
/// Production code uses [`HttpRegistryClient`]; tests inject mocks.
#[cfg_attr(test, mockall::automock)]
pub trait RegistryClient: Send + Sync {
    /// Names of all repositories.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::RequestFailed`] when the search fails.
    fn search(&self) -> BoxFuture<'_, Result<Vec<String>, RegistryError>>;

    /// Tags of one repository.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::RequestFailed`] when the request fails.
    fn tags(&self, repository: &str) -> BoxFuture<'_, Result<Vec<String>, RegistryError>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    name: String,
}

/// [`RegistryClient`] speaking the v1 registry API over HTTPS with basic
/// authentication.
#[derive(Debug, Clone)]
pub struct HttpRegistryClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpRegistryClient {
    /// Create a client for `registry`, a host name with optional port.
    #[must_use]
    pub fn new(registry: &str, credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("https://{registry}"),
            credentials,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RegistryError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "registry request");
        self.http
            .get(&url)
            .basic_auth(&self.credentials.user, Some(&self.credentials.password))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| request_failed(&url, &e))?
            .json::<T>()
            .await
            .map_err(|e| request_failed(&url, &e))
    }
}

impl RegistryClient for HttpRegistryClient {
    fn search(&self) -> BoxFuture<'_, Result<Vec<String>, RegistryError>> {
        Box::pin(async move {
            let response: SearchResponse = self.get_json("/v1/search").await?;
            Ok(response
                .results
                .into_iter()
                .map(|result| result.name)
                .collect())
        })
    }

    fn tags(&self, repository: &str) -> BoxFuture<'_, Result<Vec<String>, RegistryError>> {
        let path = format!("/v1/repositories/{repository}/tags");
        Box::pin(async move {
            let tags: BTreeMap<String, String> = self.get_json(&path).await?;
            Ok(tags.into_keys().collect())
        })
    }
}

fn request_failed(url: &str, error: &reqwest::Error) -> RegistryError {
    RegistryError::RequestFailed {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

/// Search the registry and fetch every repository's tags concurrently.
///
/// # Errors
///
/// Returns [`RegistryError`] when the search itself fails. Failed tag
/// lookups only drop their repository from the result.
pub async fn list_images<C: RegistryClient + ?Sized>(
    client: &C,
) -> Result<Vec<RegistryImage>, RegistryError> {
    let names = client.search().await?;
    debug!(repositories = names.len(), "registry search finished");
    let lookups = names.iter().map(|name| async move {
        match client.tags(name).await {
            Ok(mut tags) => {
                tags.sort();
                Some(RegistryImage {
                    name: name.clone(),
                    tags,
                })
            }
            Err(error) => {
                warn!(repository = %name, %error, "skipping repository");
                None
            }
        }
    });
    let mut images: Vec<RegistryImage> = join_all(lookups).await.into_iter().flatten().collect();
    images.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(images)
}

const NAME_HEADER: &str = "REPOSITORY";

/// Render images as an aligned two-column table.
#[must_use]
pub fn render_table(images: &[RegistryImage]) -> String {
    let width = images
        .iter()
        .map(|image| image.name.len())
        .chain(std::iter::once(NAME_HEADER.len()))
        .max()
        .unwrap_or_default();
    std::iter::once(format!("{NAME_HEADER:<width$}  TAGS\n"))
        .chain(
            images
                .iter()
                .map(|image| format!("{:<width$}  {}\n", image.name, image.tags.join(", "))),
        )
        .collect()
}
