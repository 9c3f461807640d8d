// ilofan-api: Async transports for HPE iLO management controllers
//
// Two surfaces, both short-lived per call:
//
// - `shell`  -- one SSH session per command against the controller's
//               line-oriented CLP shell (`show ...`, `fan ...`).
// - `status` -- authenticated HTTPS GETs against the Redfish JSON API.
//
// Neither layer retries. Retry policy belongs to callers in `ilofan-core`.

pub mod channel;
pub mod credentials;
pub mod error;
pub mod shell;
pub mod status;
pub mod thermal;
pub mod transport;

pub use channel::{CommandChannel, StatusApi};
pub use credentials::{CredentialStore, ManagementCredentials};
pub use error::Error;
pub use shell::{ShellClient, ShellConfig};
pub use status::StatusClient;
pub use thermal::{RawFan, RawStatus, RawTemperature, ThermalResponse};
pub use transport::{TlsMode, TransportConfig};
