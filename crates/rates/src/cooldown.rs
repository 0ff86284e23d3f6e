//! Per-provider cooldown tracking.
//!
//! A provider that fails with an upstream error (network, rate limit,
//! malformed response) is suppressed for a bounded window so the resolver
//! does not hammer a source that is transiently unhealthy. Pair-missing
//! responses never cool a provider. State is in-memory and resets on
//! application restart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

/// Default suppression window after an upstream failure.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(20);

/// Tracks a cooldown deadline per provider id.
pub struct CooldownTracker {
    deadlines: Mutex<HashMap<&'static str, Instant>>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self {
            deadlines: Mutex::new(HashMap::new()),
        }
    }

    /// Lock the deadline map, recovering from poison if necessary.
    ///
    /// Worst case after recovery is a slightly wrong cooldown deadline,
    /// which only shifts when a provider is retried.
    fn lock_deadlines(&self) -> MutexGuard<'_, HashMap<&'static str, Instant>> {
        self.deadlines.lock().unwrap_or_else(|poisoned| {
            warn!("cooldown tracker mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Whether the provider is currently suppressed.
    ///
    /// Expired deadlines are simply ignored; they are overwritten by the
    /// next failure.
    pub fn is_cooling_down(&self, provider_id: &str) -> bool {
        let deadlines = self.lock_deadlines();
        deadlines
            .get(provider_id)
            .map(|deadline| Instant::now() < *deadline)
            .unwrap_or(false)
    }

    /// Suppress the provider for `duration` from now.
    ///
    /// An existing later deadline is kept: cooling never shortens a window
    /// already in force.
    pub fn cool(&self, provider_id: &'static str, duration: Duration) {
        let mut deadlines = self.lock_deadlines();
        let candidate = Instant::now() + duration;
        let deadline = deadlines.entry(provider_id).or_insert(candidate);
        if candidate > *deadline {
            *deadline = candidate;
        }
        debug!("provider '{}' cooling down for {:?}", provider_id, duration);
    }
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::new()
    }
}
