//! HTTP access to the Braintrust REST API.
//!
//! [`ApiClient`] issues the three read-only calls an export needs: project lookup,
//! experiment/dataset listing, and per-item event fetch. Every request carries the
//! bearer credential and the configured timeout; there is no retry.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{ExportKind, Item, ObjectList, Payload, Project};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Client for the Braintrust REST API
#[derive(Clone)]
pub struct ApiClient {
    /// HTTP client with timeout and default headers
    http_client: reqwest::Client,

    /// Base URL without trailing slash (e.g. "https://api.braintrust.dev/v1")
    base_url: String,

    /// Bearer credential
    api_key: String,
}

impl ApiClient {
    /// Create a new API client from a validated configuration
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("braintrust-export/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {e}"),
                key: None,
            })?;

        Ok(Self {
            http_client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Look up a project by name and return the first match
    ///
    /// # Errors
    /// - [`Error::ProjectNotFound`] if the lookup returned no objects
    /// - [`Error::RemoteRequest`] on non-2xx status, network failure, or unreadable body
    pub async fn find_project(&self, name: &str) -> Result<Project> {
        let url = self.list_url("project", name);
        let mut projects: Vec<Project> = self.get_json::<ObjectList<Project>>(&url).await?.objects;

        if projects.len() > 1 {
            warn!(
                project = name,
                matches = projects.len(),
                "Project lookup returned several matches, using the first"
            );
        }
        if projects.is_empty() {
            return Err(Error::ProjectNotFound {
                name: name.to_string(),
            });
        }
        Ok(projects.swap_remove(0))
    }

    /// List every experiment or dataset belonging to a project
    ///
    /// An empty list is a valid answer.
    ///
    /// # Errors
    /// Returns [`Error::RemoteRequest`] on non-2xx status, network failure, or unreadable body
    pub async fn list_items(&self, kind: ExportKind, project_name: &str) -> Result<Vec<Item>> {
        let url = self.list_url(kind.as_str(), project_name);
        let list: ObjectList<Item> = self.get_json(&url).await?;
        debug!(kind = %kind, count = list.objects.len(), "Listed items");
        Ok(list.objects)
    }

    /// Fetch the full payload of one experiment or dataset
    ///
    /// # Errors
    /// Returns [`Error::ExportItem`] on non-2xx status, network failure, or a body
    /// without a readable `events` array.
    pub async fn fetch_payload(&self, kind: ExportKind, item: &Item) -> Result<Payload> {
        let url = format!(
            "{}/{}/{}/fetch",
            self.base_url,
            kind.as_str(),
            urlencoding::encode(&item.id)
        );
        self.get_json(&url).await.map_err(|e| Error::ExportItem {
            kind,
            name: item.name.clone(),
            reason: match e {
                Error::RemoteRequest { reason, .. } => reason,
                other => other.to_string(),
            },
        })
    }

    fn list_url(&self, resource: &str, project_name: &str) -> String {
        format!(
            "{}/{}?project_name={}",
            self.base_url,
            resource,
            urlencoding::encode(project_name)
        )
    }

    /// GET a URL and decode its JSON body
    ///
    /// All failures are reported as [`Error::RemoteRequest`] carrying the URL.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url, "GET");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| remote_error(url, describe_send_error(&e)))?;

        // Check HTTP status before trying to parse the response body
        let status = response.status();
        if !status.is_success() {
            return Err(remote_error(url, format!("HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| remote_error(url, format!("failed to read response body: {e}")))?;
        debug!(url, bytes = body.len(), "Response received");

        serde_json::from_slice(&body)
            .map_err(|e| remote_error(url, format!("malformed response body: {e}")))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn remote_error(url: &str, reason: String) -> Error {
    Error::RemoteRequest {
        url: url.to_string(),
        reason,
    }
}

fn describe_send_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        format!("request failed: {e}")
    }
}
