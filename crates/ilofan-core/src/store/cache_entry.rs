// Cache slot value with last-known-good semantics

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use strum::{Display, EnumString};

/// How long an empty slot counts as "still initializing".
pub const INITIALIZING_GRACE: TimeDelta = TimeDelta::seconds(30);

/// Upstream-facing classification of a cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Availability {
    /// Data present (possibly stale, check `error`).
    Ready,
    /// No data yet and the slot is younger than the grace period.
    Initializing,
    /// No data and the grace period has passed.
    Unavailable,
    /// Credentials are absent. Never produced by `CacheEntry` itself.
    NotConfigured,
}

/// `{data, error, last_updated}` for one domain.
///
/// `data` only changes on a successful parse. A failure sets `error` and
/// keeps whatever was there before. `last_updated` never moves backwards.
#[derive(Debug, Serialize)]
pub struct CacheEntry<T> {
    pub data: Option<Arc<T>>,
    pub error: Option<String>,
    pub last_updated: DateTime<Utc>,
}

// Manual impl: cloning shares the `Arc`, so `T: Clone` is not needed.
impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            error: self.error.clone(),
            last_updated: self.last_updated,
        }
    }
}

impl<T> CacheEntry<T> {
    pub fn new(created: DateTime<Utc>) -> Self {
        Self {
            data: None,
            error: None,
            last_updated: created,
        }
    }

    pub(crate) fn succeed(&mut self, data: T) {
        self.data = Some(Arc::new(data));
        self.error = None;
    }

    /// Success with nothing new to store.
    pub(crate) fn keep(&mut self) {
        self.error = None;
    }

    pub(crate) fn fail(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub(crate) fn stamp(&mut self, now: DateTime<Utc>) {
        if now > self.last_updated {
            self.last_updated = now;
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now.signed_duration_since(self.last_updated)
    }

    pub fn availability(&self, now: DateTime<Utc>) -> Availability {
        if self.data.is_some() {
            Availability::Ready
        } else if self.age(now) < INITIALIZING_GRACE {
            Availability::Initializing
        } else {
            Availability::Unavailable
        }
    }
}
