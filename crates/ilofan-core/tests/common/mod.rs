#![allow(dead_code, clippy::unwrap_used)]
// Scripted device transports shared by the integration tests.

use std::collections::{HashMap, VecDeque};
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{Value, json};

use ilofan_api::{CommandChannel, CredentialStore, Error, ManagementCredentials, StatusApi};
use ilofan_core::{Device, DeviceSettings};

pub const SHOW_SYSTEM: &str = "show system1";
pub const SHOW_MAP_FW: &str = "show /map1/firmware1";
pub const SHOW_SYS_FW: &str = "show system1/firmware1";
pub const SHOW_POWER: &str = "show /system1/oemhp_power1";
pub const SHOW_LOG: &str = "show system1/log1";
pub const FAN_INFO_A: &str = "fan info a";

// ── Scripted shell ──────────────────────────────────────────────────

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    /// Connection reset while the session was open.
    Reset,
    /// Device printed an error on stderr.
    Reject(String),
}

#[derive(Default)]
struct ShellState {
    fixed: HashMap<String, String>,
    queued: HashMap<String, VecDeque<Reply>>,
    calls: Vec<String>,
}

/// Answers commands from a script. Queued replies are consumed first,
/// then the fixed reply repeats. Unknown commands are rejected.
#[derive(Default)]
pub struct ScriptedShell {
    state: Mutex<ShellState>,
    latency: Duration,
}

impl ScriptedShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command takes `latency` of (virtual) time.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn respond(&self, command: &str, text: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .fixed
            .insert(command.to_owned(), text.into());
    }

    pub fn queue(&self, command: &str, reply: Reply) {
        self.state
            .lock()
            .unwrap()
            .queued
            .entry(command.to_owned())
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, command: &str) -> usize {
        self.calls().iter().filter(|c| *c == command).count()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

#[async_trait]
impl CommandChannel for ScriptedShell {
    async fn execute(&self, command: &str) -> Result<String, Error> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(command.to_owned());
            state
                .queued
                .get_mut(command)
                .and_then(VecDeque::pop_front)
                .or_else(|| state.fixed.get(command).cloned().map(Reply::Text))
        };
        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Reset) => Err(Error::Command {
                command: command.to_owned(),
                stderr: "Connection reset by peer".into(),
            }),
            Some(Reply::Reject(stderr)) => Err(Error::Command {
                command: command.to_owned(),
                stderr,
            }),
            None => Err(Error::Command {
                command: command.to_owned(),
                stderr: "status=2\nstatus_tag=COMMAND PROCESSING FAILED".into(),
            }),
        }
    }
}

// ── Scripted status API ─────────────────────────────────────────────

pub struct ScriptedStatus {
    body: Mutex<Option<Value>>,
    requests: Mutex<usize>,
}

impl ScriptedStatus {
    pub fn new(body: Value) -> Self {
        Self {
            body: Mutex::new(Some(body)),
            requests: Mutex::new(0),
        }
    }

    /// Respond with HTTP 503 until a body is set again.
    pub fn failing() -> Self {
        Self {
            body: Mutex::new(None),
            requests: Mutex::new(0),
        }
    }

    pub fn set_body(&self, body: Value) {
        *self.body.lock().unwrap() = Some(body);
    }

    pub fn requests(&self) -> usize {
        *self.requests.lock().unwrap()
    }
}

#[async_trait]
impl StatusApi for ScriptedStatus {
    async fn fetch_status(&self, path: &str) -> Result<Value, Error> {
        *self.requests.lock().unwrap() += 1;
        self.body.lock().unwrap().clone().ok_or_else(|| Error::Status {
            status: 503,
            path: path.to_owned(),
        })
    }
}

/// Thermal body with one enabled temperature sensor per reading, plus an
/// absent sensor and a fan that must both be ignored by the average.
pub fn thermal(readings: &[f64]) -> Value {
    let mut temperatures: Vec<Value> = readings
        .iter()
        .enumerate()
        .map(|(i, r)| {
            json!({
                "Name": format!("{:02}-Sensor", i + 1),
                "CurrentReading": r,
                "Status": { "State": "Enabled", "Health": "OK" }
            })
        })
        .collect();
    temperatures.push(json!({ "Name": "99-Absent", "CurrentReading": 0, "Status": { "State": "Absent" } }));
    json!({
        "Temperatures": temperatures,
        "Fans": [
            { "FanName": "Fan 1", "CurrentReading": 100, "Units": "Percent",
              "Status": { "State": "Enabled", "Health": "OK" } }
        ]
    })
}

// ── Device fixtures ─────────────────────────────────────────────────

pub const FAN_COUNT: u8 = 3;

pub fn credentials() -> ManagementCredentials {
    ManagementCredentials::new("ilo.example", "admin", SecretString::from("pw".to_string()))
}

pub fn device(shell: Arc<ScriptedShell>, status: Arc<ScriptedStatus>, configured: bool) -> Device {
    let store = if configured {
        CredentialStore::with(credentials())
    } else {
        CredentialStore::new()
    };
    let settings = DeviceSettings {
        fan_count: FAN_COUNT,
        ..DeviceSettings::default()
    };
    Device::with_transports(shell, status, store, &settings)
}

pub const SYSTEM1: &str = "\
status=0
status_tag=COMMAND COMPLETED
/system1
  Properties
    name=ProLiant DL380p Gen8
    number=CZ12345678
";

pub const MAP_FW: &str = "\
/map1/firmware1
  Properties
    version=2.82
    date=Feb 06 2023
    name=iLO 4
";

pub const SYS_FW: &str = "\
/system1/firmware1
  Properties
    version=P70
    date=05/21/2019
";

pub const POWER: &str = "\
/system1/oemhp_power1
  Properties
    oemhp_powerreg=dynamic
    oemhp_PresentPower=142 Watts
    oemhp_AvgPower=138 Watts
";

pub const CONTROLLERS: &str = "\
PID  ACTIVE  SP     READING  OUT
0    Y       40.00  35.50    24
1    N       45.00  30.00    0
";

pub fn log_listing(numbers: &[u32]) -> String {
    let mut text = String::from("/system1/log1\n  Targets\n");
    for n in numbers {
        let _ = writeln!(text, "    record{n}");
    }
    text.push_str("  Properties\n  Verbs\n    cd version exit show\n");
    text
}

pub fn record_command(number: u32) -> String {
    format!("{SHOW_LOG}/record{number}")
}

/// Record `n` is dated so that higher numbers are newer.
pub fn log_record(number: u32) -> String {
    format!(
        "/system1/log1/record{number}\n  Properties\n    number={number}\n    severity=Informational\n    date=10/18/2026\n    time={:02}:{:02}\n    description=Event {number}\n",
        number / 60,
        number % 60
    )
}

/// Shell that answers every domain, with records `first..=last` on the log.
pub fn healthy_shell(shell: ScriptedShell, first: u32, last: u32) -> Arc<ScriptedShell> {
    shell.respond(SHOW_SYSTEM, SYSTEM1);
    shell.respond(SHOW_MAP_FW, MAP_FW);
    shell.respond(SHOW_SYS_FW, SYS_FW);
    shell.respond(SHOW_POWER, POWER);
    shell.respond(FAN_INFO_A, CONTROLLERS);
    set_log(&shell, first, last);
    Arc::new(shell)
}

/// Replace the log listing and make every listed record fetchable.
pub fn set_log(shell: &ScriptedShell, first: u32, last: u32) {
    let numbers: Vec<u32> = (first..=last).collect();
    shell.respond(SHOW_LOG, log_listing(&numbers));
    for n in numbers {
        shell.respond(&record_command(n), log_record(n));
    }
}
