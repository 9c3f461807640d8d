// ── Centralized fetch scheduler ──
//
// Owns the domain cache and refreshes it on a fixed cadence: identity,
// power, logs, controllers, with a short pause between domains. Cycles
// are serialised by one async mutex, which also owns the log window, so
// the window can only be touched by the cycle in flight. A manual refresh
// that finds a cycle running waits for it instead of starting another.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SchedulerConfig;
use crate::device::Device;
use crate::error::CoreError;
use crate::model::{ControllerEntry, PowerSnapshot, SystemIdentity, SystemLogRecord};
use crate::store::{CacheEntry, Domain, DomainCache, LogRecordWindow, Slot};
use crate::task::BackgroundTask;

/// Periodic multi-domain refresher. Cheaply cloneable.
#[derive(Clone)]
pub struct FetchScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    config: SchedulerConfig,
    device: Device,
    cache: DomainCache,
    /// Held for the whole of a cycle.
    cycle: Mutex<LogRecordWindow>,
    running: AtomicBool,
    task: Mutex<Option<BackgroundTask>>,
}

/// Clears the running flag however the cycle ends.
struct RunningGuard<'a>(&'a AtomicBool);

impl<'a> RunningGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

enum LogRefresh {
    Unchanged(Vec<SystemLogRecord>),
    Updated(Vec<SystemLogRecord>),
}

impl FetchScheduler {
    pub fn new(device: Device, config: SchedulerConfig) -> Self {
        let window = LogRecordWindow::new(config.log_window);
        Self {
            inner: Arc::new(SchedulerInner {
                cache: DomainCache::new(Utc::now()),
                cycle: Mutex::new(window),
                running: AtomicBool::new(false),
                task: Mutex::new(None),
                config,
                device,
            }),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.inner.config
    }

    pub fn cache(&self) -> &DomainCache {
        &self.inner.cache
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn identity(&self) -> CacheEntry<SystemIdentity> {
        self.inner.cache.identity()
    }

    pub fn power(&self) -> CacheEntry<PowerSnapshot> {
        self.inner.cache.power()
    }

    pub fn logs(&self) -> CacheEntry<Vec<SystemLogRecord>> {
        self.inner.cache.logs()
    }

    pub fn controllers(&self) -> CacheEntry<Vec<ControllerEntry>> {
        self.inner.cache.controllers()
    }

    pub fn last_cycle(&self) -> Option<DateTime<Utc>> {
        self.inner.cache.last_cycle()
    }

    /// `true` while a fetch cycle is in flight.
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the periodic task. The first cycle runs immediately. Calling
    /// this while the task is alive does nothing.
    pub async fn start(&self) {
        let mut task = self.inner.task.lock().await;
        if task.as_ref().is_some_and(BackgroundTask::is_alive) {
            debug!("fetch scheduler already started");
            return;
        }

        let period = self.inner.config.interval.max(Duration::from_secs(1));
        let scheduler = self.clone();
        *task = Some(BackgroundTask::spawn(move |cancel| {
            fetch_task(scheduler, period, cancel)
        }));
        info!(interval_secs = period.as_secs(), "fetch scheduler started");
    }

    /// Cancel the periodic task, letting an in-flight cycle finish.
    pub async fn stop(&self) {
        let task = self.inner.task.lock().await.take();
        if let Some(task) = task {
            task.shutdown().await;
            info!("fetch scheduler stopped");
        }
    }

    /// Run a cycle now, or wait for the one already in flight.
    ///
    /// Returns once the cache holds the results of a cycle that finished
    /// after this call was made.
    pub async fn refresh(&self) {
        if let Ok(mut window) = self.inner.cycle.try_lock() {
            self.run_cycle(&mut window).await;
        } else {
            debug!("fetch cycle in flight, waiting for it");
            let _done = self.inner.cycle.lock().await;
        }
    }

    // ── Cycle ────────────────────────────────────────────────────────

    async fn run_cycle(&self, window: &mut LogRecordWindow) {
        let inner = &self.inner;
        if !inner.device.is_configured() {
            debug!("device not configured, skipping fetch cycle");
            return;
        }

        let _running = RunningGuard::enter(&inner.running);
        let started = Instant::now();
        let delay = inner.config.domain_delay;

        let identity = inner.device.fetch_identity().await;
        commit(&inner.cache.identity, Domain::Identity, identity);
        tokio::time::sleep(delay).await;

        let power = self.fetch_power().await;
        commit(&inner.cache.power, Domain::Power, power);
        tokio::time::sleep(delay).await;

        match self.fetch_logs(window).await {
            Ok(LogRefresh::Updated(records)) => {
                debug!(count = records.len(), "log window updated");
                inner.cache.logs.modify(|e| e.succeed(records));
            }
            Ok(LogRefresh::Unchanged(records)) => {
                debug!("log window unchanged");
                inner.cache.logs.modify(|e| {
                    if e.data.is_some() {
                        e.keep();
                    } else {
                        e.succeed(records);
                    }
                });
            }
            Err(e) if e.is_not_configured() => debug!("credentials cleared mid-cycle"),
            Err(e) => {
                warn!(domain = %Domain::Logs, error = %e, "fetch failed");
                inner.cache.logs.modify(|entry| entry.fail(e.to_string()));
            }
        }
        tokio::time::sleep(delay).await;

        let controllers = inner.device.fetch_controllers().await;
        commit(&inner.cache.controllers, Domain::Controllers, controllers);

        inner.cache.stamp_all(Utc::now());
        info!(
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "fetch cycle complete"
        );
    }

    /// Power, retried on connection resets only.
    async fn fetch_power(&self) -> Result<Option<PowerSnapshot>, CoreError> {
        let retries = self.inner.config.power_retries;
        let backoff = self.inner.config.power_backoff;
        let mut attempt = 0;
        loop {
            match self.inner.device.fetch_power().await {
                Err(e) if e.is_connection_reset() && attempt < retries => {
                    attempt += 1;
                    warn!(attempt, retries, error = %e, "power fetch reset, retrying");
                    tokio::time::sleep(backoff).await;
                }
                other => return other,
            }
        }
    }

    /// Enumerate, fetch only the missing records, then shift the window.
    /// Any fetch error leaves the window where it was.
    async fn fetch_logs(&self, window: &mut LogRecordWindow) -> Result<LogRefresh, CoreError> {
        let device = &self.inner.device;
        let enumerated = device.list_log_records().await?;
        let plan = window.plan(&enumerated);
        if plan.unchanged {
            return Ok(LogRefresh::Unchanged(window.records()));
        }

        let mut fetched = Vec::with_capacity(plan.to_fetch.len());
        for &number in &plan.to_fetch {
            match device.fetch_log_record(number).await? {
                Some(record) => fetched.push((number, record)),
                None => warn!(record = number, "unparseable log record, will retry next cycle"),
            }
        }

        window.apply(plan, fetched);
        Ok(LogRefresh::Updated(window.records()))
    }
}

/// Record one single-record domain's result. `Ok(None)` means the device
/// answered but the minimum fields were missing.
fn commit<T>(slot: &Slot<T>, domain: Domain, result: Result<Option<T>, CoreError>) {
    match result {
        Ok(Some(data)) => slot.modify(|e| e.succeed(data)),
        Ok(None) => {
            warn!(%domain, "device output missing required fields");
            slot.modify(|e| e.fail(format!("no {domain} data in device output")));
        }
        Err(e) if e.is_not_configured() => debug!(%domain, "credentials cleared mid-cycle"),
        Err(e) => {
            warn!(%domain, error = %e, "fetch failed");
            slot.modify(|entry| entry.fail(e.to_string()));
        }
    }
}

async fn fetch_task(scheduler: FetchScheduler, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => scheduler.refresh().await,
        }
    }
}
