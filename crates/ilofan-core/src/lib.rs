// ilofan-core: Telemetry gateway for HPE iLO management controllers
//
// Sits on top of `ilofan-api`'s transports and provides:
//
// - `parse`      -- pure text parsers for CLP property, list and table output
// - `store`      -- per-domain cache slots and the incremental log window
// - `scheduler`  -- the periodic multi-domain fetcher that owns the cache
// - `automation` -- the closed-loop fan speed controller
// - `gateway`    -- one context object tying it together

pub mod automation;
pub mod command;
pub mod config;
mod convert;
pub mod device;
pub mod error;
pub mod gateway;
pub mod model;
pub mod parse;
pub mod scheduler;
pub mod store;
mod task;

pub use automation::{AutomationDecision, AutomationLoop, SpeedTier, classify, mean_reading};
pub use command::{FanCommand, FanInfoKind, percent_to_pwm};
pub use config::{AutomationConfig, DeviceSettings, GatewayConfig, SchedulerConfig, Thresholds};
pub use device::Device;
pub use error::CoreError;
pub use gateway::Gateway;
pub use scheduler::FetchScheduler;
pub use store::{Availability, CacheEntry, Domain, DomainCache, DomainSummary, LogRecordWindow};

// Re-export the transport types embedders need to configure a gateway.
pub use ilofan_api::{CredentialStore, ManagementCredentials, ShellConfig, TlsMode, TransportConfig};
