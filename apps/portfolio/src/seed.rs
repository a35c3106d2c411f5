use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::{is_success, ContentSource, SEED_PATH};

/// Fires the idempotent `/seed` call at most once per session.
///
/// Seeding is best-effort. It never blocks content loads and its outcome is
/// never surfaced; failures are only visible in debug logs.
#[derive(Debug, Default)]
pub struct SeedCoordinator {
    fired: AtomicBool,
}

impl SeedCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns the seed request on first call and returns its handle.
    /// Every later call returns `None` without touching the network.
    pub fn fire(&self, source: Arc<dyn ContentSource>) -> Option<JoinHandle<()>> {
        if self.fired.swap(true, Ordering::SeqCst) {
            debug!("Seed already requested for this session");
            return None;
        }

        Some(tokio::spawn(async move {
            match source.post(SEED_PATH, None).await {
                Ok(status) if is_success(status) => debug!(status, "Seed accepted"),
                Ok(status) => debug!(status, "Seed rejected; ignoring"),
                Err(e) => debug!(error = %e, "Seed request failed; ignoring"),
            }
        }))
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}
