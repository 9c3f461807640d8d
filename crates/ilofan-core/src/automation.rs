// ── Automation control loop ──
//
// Reads temperatures live (never from the cache), averages them, picks a
// speed tier from two thresholds and writes it to every fan. Runs on its
// own interval, independent of the fetch scheduler. A failed tick is
// logged and the loop waits for the next one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::Display;
use tokio::sync::{Mutex, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::{FanCommand, Percent};
use crate::config::{AutomationConfig, Thresholds};
use crate::device::Device;
use crate::error::CoreError;
use crate::model::{SensorCategory, SensorReading};
use crate::task::BackgroundTask;

/// Fan speed bands chosen by the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SpeedTier {
    Baseline,
    Mid,
    High,
}

impl SpeedTier {
    pub fn percent(self) -> Percent {
        match self {
            Self::Baseline => 32,
            Self::Mid => 60,
            Self::High => 90,
        }
    }
}

/// `mean <= low` is baseline, `low < mean <= med` is mid, above is high.
pub fn classify(mean: f64, thresholds: Thresholds) -> SpeedTier {
    if mean <= thresholds.low {
        SpeedTier::Baseline
    } else if mean <= thresholds.med {
        SpeedTier::Mid
    } else {
        SpeedTier::High
    }
}

/// Arithmetic mean of the numeric temperature readings, if there are any.
pub fn mean_reading(sensors: &[SensorReading]) -> Option<f64> {
    let (sum, count) = sensors
        .iter()
        .filter(|s| s.category == SensorCategory::Temperature)
        .filter_map(SensorReading::numeric)
        .fold((0.0, 0u32), |(sum, count), r| (sum + r, count + 1));
    (count > 0).then(|| sum / f64::from(count))
}

/// What one tick decided and wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutomationDecision {
    pub mean: f64,
    pub sensors: usize,
    pub tier: SpeedTier,
    pub percent: Percent,
    pub at: DateTime<Utc>,
}

/// Periodic fan controller. Cheaply cloneable.
#[derive(Clone)]
pub struct AutomationLoop {
    inner: Arc<AutomationInner>,
}

struct AutomationInner {
    device: Device,
    interval: Duration,
    thresholds: watch::Sender<Thresholds>,
    last_decision: watch::Sender<Option<AutomationDecision>>,
    active: AtomicBool,
    task: Mutex<Option<BackgroundTask>>,
}

impl AutomationLoop {
    pub fn new(device: Device, config: &AutomationConfig) -> Self {
        let (thresholds, _) = watch::channel(config.thresholds);
        let (last_decision, _) = watch::channel(None);
        Self {
            inner: Arc::new(AutomationInner {
                device,
                interval: config.interval,
                thresholds,
                last_decision,
                active: AtomicBool::new(false),
                task: Mutex::new(None),
            }),
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        *self.inner.thresholds.borrow()
    }

    /// Takes effect on the next tick.
    pub fn set_thresholds(&self, thresholds: Thresholds) {
        self.inner.thresholds.send_replace(thresholds);
    }

    pub fn last_decision(&self) -> Option<AutomationDecision> {
        self.inner.last_decision.borrow().clone()
    }

    pub fn subscribe_decisions(&self) -> watch::Receiver<Option<AutomationDecision>> {
        self.inner.last_decision.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// One evaluation: read, average, classify, write.
    pub async fn tick(&self) -> Result<AutomationDecision, CoreError> {
        let sensors = self.inner.device.read_sensors().await?;
        let mean = mean_reading(&sensors).ok_or(CoreError::NoSensorReadings)?;
        let tier = classify(mean, self.thresholds());
        let percent = tier.percent();

        self.inner.device.apply(FanCommand::SetAll { percent }).await?;

        let decision = AutomationDecision {
            mean,
            sensors: sensors.len(),
            tier,
            percent,
            at: Utc::now(),
        };
        info!(mean, %tier, percent, "automation set fan speed");
        self.inner.last_decision.send_replace(Some(decision.clone()));
        Ok(decision)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Start the loop, replacing any loop already running. The first
    /// evaluation happens one interval after start.
    pub async fn start(&self) {
        let mut task = self.inner.task.lock().await;
        if let Some(previous) = task.take() {
            debug!("replacing running automation loop");
            previous.shutdown().await;
        }

        let period = self.inner.interval.max(Duration::from_secs(1));
        let automation = self.clone();
        *task = Some(BackgroundTask::spawn(move |cancel| {
            automation_task(automation, period, cancel)
        }));
        self.inner.active.store(true, Ordering::SeqCst);
        info!(interval_secs = period.as_secs(), "automation started");
    }

    /// Stop the loop. Does nothing when it is not running.
    pub async fn stop(&self) {
        let task = self.inner.task.lock().await.take();
        if let Some(task) = task {
            task.shutdown().await;
            self.inner.active.store(false, Ordering::SeqCst);
            info!("automation stopped");
        }
    }
}

async fn automation_task(automation: AutomationLoop, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = automation.tick().await {
                    warn!(error = %e, "automation tick failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> Thresholds {
        Thresholds { low: 30.0, med: 40.0 }
    }

    fn temp(reading: Option<f64>) -> SensorReading {
        SensorReading {
            name: "t".into(),
            category: SensorCategory::Temperature,
            status: "OK".into(),
            reading,
            context: None,
            critical: None,
            fatal: None,
        }
    }

    #[test]
    fn tiers_follow_thresholds() {
        assert_eq!(classify(25.0, thresholds()).percent(), 32);
        assert_eq!(classify(35.0, thresholds()).percent(), 60);
        assert_eq!(classify(45.0, thresholds()).percent(), 90);
    }

    #[test]
    fn boundaries_belong_to_lower_tier() {
        assert_eq!(classify(30.0, thresholds()), SpeedTier::Baseline);
        assert_eq!(classify(40.0, thresholds()), SpeedTier::Mid);
    }

    #[test]
    fn mean_ignores_missing_and_non_temperature_readings() {
        let mut fan = temp(Some(100.0));
        fan.category = SensorCategory::Fan;
        let sensors = vec![temp(Some(20.0)), temp(None), temp(Some(f64::NAN)), temp(Some(40.0)), fan];
        assert_eq!(mean_reading(&sensors), Some(30.0));
    }

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(mean_reading(&[]), None);
        assert_eq!(mean_reading(&[temp(None)]), None);
    }
}
