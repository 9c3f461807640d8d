// Transport seams
//
// The core depends on these two traits rather than on the concrete
// clients, so the scheduler and automation loop can be driven by scripted
// devices in tests.

use async_trait::async_trait;

use crate::error::Error;

/// Executes exactly one command per call against the device shell.
///
/// Implementations must not share a session between calls: a broken or
/// hung session may fail its own command but never a later one.
#[async_trait]
pub trait CommandChannel: Send + Sync {
    /// Run `command` and return its stdout. Any stderr text is an error.
    async fn execute(&self, command: &str) -> Result<String, Error>;
}

/// Authenticated GETs against the device's JSON status API.
#[async_trait]
pub trait StatusApi: Send + Sync {
    /// GET `path` (absolute, e.g. `/redfish/v1/chassis/1/Thermal/`).
    async fn fetch_status(&self, path: &str) -> Result<serde_json::Value, Error>;
}
