// Per-command SSH channel
//
// Every call launches a fresh `ssh` session through `sshpass`, runs one
// CLP command, captures stdout/stderr, and lets the child die. There is
// no pooling: the child is spawned with `kill_on_drop`, so a timeout or
// an early return reaps the session just like a normal exit does.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::channel::CommandChannel;
use crate::credentials::{CredentialStore, ManagementCredentials};
use crate::error::Error;

/// Key exchange / host key algorithms older controller firmware still
/// requires. Modern OpenSSH disables these by default.
const LEGACY_KEX: &str = "+diffie-hellman-group14-sha1,diffie-hellman-group1-sha1";
const LEGACY_HOST_KEYS: &str = "+ssh-rsa,ssh-dss";

/// Session tuning for the SSH channel.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Password helper that wraps `ssh` (reads `SSHPASS` from the env).
    pub program: PathBuf,
    pub port: u16,
    pub connect_timeout: Duration,
    /// Hard deadline for a single command, connection included.
    pub command_timeout: Duration,
    /// Re-enable legacy KEX / host key algorithms.
    pub legacy_algorithms: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("sshpass"),
            port: 22,
            connect_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(60),
            legacy_algorithms: true,
        }
    }
}

/// Command channel backed by one `ssh` process per command.
#[derive(Debug, Clone)]
pub struct ShellClient {
    config: ShellConfig,
    credentials: CredentialStore,
}

impl ShellClient {
    pub fn new(config: ShellConfig, credentials: CredentialStore) -> Self {
        Self {
            config,
            credentials,
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Arguments passed to the password helper, in order.
    ///
    /// The secret is never part of argv; it travels in `SSHPASS`.
    pub fn build_args(&self, creds: &ManagementCredentials, command: &str) -> Vec<String> {
        let cfg = &self.config;
        let mut args: Vec<String> = vec!["-e".into(), "ssh".into(), "-T".into()];

        let mut opt = |kv: String| {
            args.push("-o".into());
            args.push(kv);
        };
        opt("StrictHostKeyChecking=no".into());
        opt("UserKnownHostsFile=/dev/null".into());
        opt("LogLevel=ERROR".into());
        opt("PubkeyAuthentication=no".into());
        opt(format!("ConnectTimeout={}", cfg.connect_timeout.as_secs().max(1)));
        opt("ServerAliveInterval=5".into());
        opt("ServerAliveCountMax=2".into());
        if cfg.legacy_algorithms {
            opt(format!("KexAlgorithms={LEGACY_KEX}"));
            opt(format!("HostKeyAlgorithms={LEGACY_HOST_KEYS}"));
        }

        args.push("-p".into());
        args.push(cfg.port.to_string());
        args.push(format!("{}@{}", creds.username, creds.host));
        args.push(command.to_owned());
        args
    }

    fn build_command(&self, creds: &ManagementCredentials, command: &str) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(self.build_args(creds, command))
            .env("SSHPASS", creds.secret.expose_secret())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CommandChannel for ShellClient {
    async fn execute(&self, command: &str) -> Result<String, Error> {
        let creds = self.credentials.current()?;

        debug!(host = %creds.host, command, "executing device command");

        let child = self
            .build_command(&creds, command)
            .spawn()
            .map_err(|source| Error::Spawn {
                program: self.config.program.display().to_string(),
                source,
            })?;

        let timeout = self.config.command_timeout;
        // Dropping the future on timeout drops the child, which kills it.
        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| Error::CommandTimeout {
                command: command.to_owned(),
                timeout_secs: timeout.as_secs(),
            })?
            .map_err(|source| Error::Spawn {
                program: self.config.program.display().to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        trace!(command, bytes = stdout.len(), "device command returned");

        interpret(command, output.status.code(), &stdout, &stderr)
    }
}

/// Map a finished session to the channel's result contract: any stderr
/// text fails the call, then a non-zero exit, otherwise stdout wins.
fn interpret(command: &str, code: Option<i32>, stdout: &str, stderr: &str) -> Result<String, Error> {
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return Err(Error::Command {
            command: command.to_owned(),
            stderr: stderr.to_owned(),
        });
    }

    match code {
        Some(0) => Ok(stdout.to_owned()),
        Some(code) => Err(Error::Session {
            command: command.to_owned(),
            code,
        }),
        // Killed by a signal.
        None => Err(Error::Session {
            command: command.to_owned(),
            code: -1,
        }),
    }
}
