// ── Domain cache ──
//
// One `watch`-backed slot per telemetry domain plus the incremental log
// window. The scheduler is the only writer; everyone else snapshots or
// subscribes.

mod cache_entry;
mod domain_cache;
mod log_window;

pub use cache_entry::{Availability, CacheEntry, INITIALIZING_GRACE};
pub(crate) use domain_cache::Slot;
pub use domain_cache::{Domain, DomainCache, DomainSummary};
pub use log_window::{LogRecordWindow, WindowPlan};
