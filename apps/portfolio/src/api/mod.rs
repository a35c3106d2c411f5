/// Content service client — the single point of entry for all HTTP calls.
///
/// Everything else in the crate talks to the remote service through the
/// `ContentSource` trait, so loaders, the seed call and the contact flow can
/// be exercised against a fake source in tests.
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::ClientError;

#[cfg(test)]
pub(crate) mod fake;

pub const CONTACT_PATH: &str = "/contact";
pub const SEED_PATH: &str = "/seed";

/// The five read-only collections the portfolio page is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Profile,
    Skills,
    Projects,
    Experience,
    Education,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Profile,
        Resource::Skills,
        Resource::Projects,
        Resource::Experience,
        Resource::Education,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Resource::Profile => "/profile",
            Resource::Skills => "/skills",
            Resource::Projects => "/projects",
            Resource::Experience => "/experience",
            Resource::Education => "/education",
        }
    }
}

/// Remote content service as seen by the client.
///
/// Carried as `Arc<dyn ContentSource>` by every loader and flow.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// GETs `path` and parses the body as JSON. Non-2xx answers are errors.
    async fn get_json(&self, path: &str) -> Result<Value, ClientError>;

    /// POSTs `body` (or nothing) to `path` and returns the response status.
    /// Interpreting the status is up to the caller.
    async fn post(&self, path: &str, body: Option<&Value>) -> Result<u16, ClientError>;
}

/// reqwest-backed `ContentSource`.
///
/// No request timeout is configured: a hung request keeps its resource in
/// the loading state.
#[derive(Clone)]
pub struct ContentClient {
    client: Client,
    base_url: String,
}

impl ContentClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        reqwest::Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ContentSource for ContentClient {
    async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!(path, status = status.as_u16(), "Content service rejected read");
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let value = serde_json::from_str(&body)?;
        debug!(path, bytes = body.len(), "Content loaded");
        Ok(value)
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> Result<u16, ClientError> {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        let status = request.send().await?.status().as_u16();
        debug!(path, status, "POST completed");
        Ok(status)
    }
}

/// True for 2xx statuses.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
