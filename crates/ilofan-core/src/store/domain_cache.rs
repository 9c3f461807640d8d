// Per-domain watch slots

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, EnumIter, EnumString};
use tokio::sync::watch;

use crate::model::{ControllerEntry, PowerSnapshot, SystemIdentity, SystemLogRecord};

use super::cache_entry::{Availability, CacheEntry};

/// Independently fetched and cached telemetry category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Domain {
    Identity,
    Power,
    Logs,
    #[strum(to_string = "controllers", serialize = "pid")]
    Controllers,
}

/// Status of one domain without its payload.
#[derive(Debug, Clone, Serialize)]
pub struct DomainSummary {
    pub domain: Domain,
    pub availability: Availability,
    pub error: Option<String>,
    pub last_updated: DateTime<Utc>,
}

pub(crate) struct Slot<T> {
    tx: watch::Sender<CacheEntry<T>>,
}

impl<T> Slot<T> {
    fn new(created: DateTime<Utc>) -> Self {
        let (tx, _) = watch::channel(CacheEntry::new(created));
        Self { tx }
    }

    fn get(&self) -> CacheEntry<T> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<CacheEntry<T>> {
        self.tx.subscribe()
    }

    /// Mutate in place and notify subscribers.
    pub(crate) fn modify(&self, f: impl FnOnce(&mut CacheEntry<T>)) {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.tx.send_modify(f);
    }

    fn summary(&self, domain: Domain, now: DateTime<Utc>) -> DomainSummary {
        let entry = self.tx.borrow();
        DomainSummary {
            domain,
            availability: entry.availability(now),
            error: entry.error.clone(),
            last_updated: entry.last_updated,
        }
    }
}

/// The four domain slots and the completion time of the last cycle.
pub struct DomainCache {
    pub(crate) identity: Slot<SystemIdentity>,
    pub(crate) power: Slot<PowerSnapshot>,
    pub(crate) logs: Slot<Vec<SystemLogRecord>>,
    pub(crate) controllers: Slot<Vec<ControllerEntry>>,
    last_cycle: watch::Sender<Option<DateTime<Utc>>>,
}

impl DomainCache {
    /// Slots start empty, stamped with `created`.
    pub fn new(created: DateTime<Utc>) -> Self {
        let (last_cycle, _) = watch::channel(None);
        Self {
            identity: Slot::new(created),
            power: Slot::new(created),
            logs: Slot::new(created),
            controllers: Slot::new(created),
            last_cycle,
        }
    }

    // ── Snapshots ────────────────────────────────────────────────────

    pub fn identity(&self) -> CacheEntry<SystemIdentity> {
        self.identity.get()
    }

    pub fn power(&self) -> CacheEntry<PowerSnapshot> {
        self.power.get()
    }

    /// Most recent records, newest first.
    pub fn logs(&self) -> CacheEntry<Vec<SystemLogRecord>> {
        self.logs.get()
    }

    pub fn controllers(&self) -> CacheEntry<Vec<ControllerEntry>> {
        self.controllers.get()
    }

    /// When the last full cycle finished, if any has.
    pub fn last_cycle(&self) -> Option<DateTime<Utc>> {
        *self.last_cycle.borrow()
    }

    pub fn summary(&self, domain: Domain, now: DateTime<Utc>) -> DomainSummary {
        match domain {
            Domain::Identity => self.identity.summary(domain, now),
            Domain::Power => self.power.summary(domain, now),
            Domain::Logs => self.logs.summary(domain, now),
            Domain::Controllers => self.controllers.summary(domain, now),
        }
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_identity(&self) -> watch::Receiver<CacheEntry<SystemIdentity>> {
        self.identity.subscribe()
    }

    pub fn subscribe_power(&self) -> watch::Receiver<CacheEntry<PowerSnapshot>> {
        self.power.subscribe()
    }

    pub fn subscribe_logs(&self) -> watch::Receiver<CacheEntry<Vec<SystemLogRecord>>> {
        self.logs.subscribe()
    }

    pub fn subscribe_controllers(&self) -> watch::Receiver<CacheEntry<Vec<ControllerEntry>>> {
        self.controllers.subscribe()
    }

    pub fn subscribe_last_cycle(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_cycle.subscribe()
    }

    // ── Cycle bookkeeping ────────────────────────────────────────────

    /// Stamp every slot once all domains have been attempted.
    pub(crate) fn stamp_all(&self, now: DateTime<Utc>) {
        self.identity.modify(|e| e.stamp(now));
        self.power.modify(|e| e.stamp(now));
        self.logs.modify(|e| e.stamp(now));
        self.controllers.modify(|e| e.stamp(now));
        self.last_cycle.send_replace(Some(now));
    }
}
