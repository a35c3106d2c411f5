//! Resource Loader — one asynchronous read exposed as observable state.
//!
//! Each loader owns a `watch` channel holding its `ResourceState`. A call to
//! [`ResourceLoader::load`] resets the state and spawns a request task tied to
//! a fresh `CancellationToken`. Results are applied in exactly one place,
//! under the channel lock, and only while that token is still live, so a
//! response for a torn-down loader or a superseded path is dropped silently.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::ContentSource;
use crate::errors::ClientError;

/// Lifecycle of one loaded resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> ResourceState<T> {
    pub fn initial(default: T) -> Self {
        Self {
            data: default,
            loading: true,
            error: None,
        }
    }

    pub fn resolve(&mut self, data: T) {
        self.data = data;
        self.loading = false;
        self.error = None;
    }

    /// Records a failure. `data` keeps whatever it held before.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
        self.loading = false;
    }

    pub fn is_ready(&self) -> bool {
        !self.loading && self.error.is_none()
    }
}

pub struct ResourceLoader<T> {
    source: Arc<dyn ContentSource>,
    default: T,
    state: Arc<watch::Sender<ResourceState<T>>>,
    token: CancellationToken,
    path: Option<String>,
}

impl<T> ResourceLoader<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new(source: Arc<dyn ContentSource>, default: T) -> Self {
        let (state, _) = watch::channel(ResourceState::initial(default.clone()));
        Self {
            source,
            default,
            state: Arc::new(state),
            token: CancellationToken::new(),
            path: None,
        }
    }

    /// Starts a new load cycle for `path`, invalidating any request still in
    /// flight for the previous one.
    pub fn load(&mut self, path: impl Into<String>) {
        self.token.cancel();
        let token = CancellationToken::new();
        self.token = token.clone();

        let path = path.into();
        self.path = Some(path.clone());
        self.state
            .send_replace(ResourceState::initial(self.default.clone()));

        let source = self.source.clone();
        let state = self.state.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => {
                    debug!(path = %path, "Load abandoned before response");
                    return;
                }
                result = fetch::<T>(source.as_ref(), &path) => result,
            };
            apply(&state, &token, &path, outcome);
        });
    }

    /// Tears the loader down. Pending results are discarded.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn state(&self) -> ResourceState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.state.subscribe()
    }

    /// Waits until the current cycle leaves the loading state. Never returns
    /// for a hung request or a cancelled cycle.
    pub async fn settled(&self) -> ResourceState<T> {
        let mut rx = self.state.subscribe();
        let settled = match rx.wait_for(|s| !s.loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }
}

impl<T> Drop for ResourceLoader<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn fetch<T: DeserializeOwned>(
    source: &dyn ContentSource,
    path: &str,
) -> Result<T, ClientError> {
    let value = source.get_json(path).await?;
    Ok(serde_json::from_value(value)?)
}

/// Applies a settled request to the shared state. Returns `false` when the
/// token was cancelled and the outcome was dropped.
fn apply<T>(
    state: &watch::Sender<ResourceState<T>>,
    token: &CancellationToken,
    path: &str,
    outcome: Result<T, ClientError>,
) -> bool {
    state.send_if_modified(|current| {
        if token.is_cancelled() {
            debug!(path = %path, "Discarding response for cancelled load");
            return false;
        }
        match outcome {
            Ok(data) => {
                debug!(path = %path, "Resource loaded");
                current.resolve(data);
            }
            Err(e) => {
                warn!(path = %path, error = %e, "Resource failed to load");
                current.fail(e.to_string());
            }
        }
        true
    })
}
