//! `ilofan config ...`: inspect configuration and store the password.

use std::io::BufRead;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load(global)?.redacted();
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => cfg.to_toml_string()?,
                format => output::render_single(format, &cfg, |_| String::new(), |_| String::new())?,
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::effective_path(global).display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load(global)?;
            let host = cfg
                .device
                .host
                .filter(|h| !h.trim().is_empty())
                .ok_or_else(|| CliError::Validation {
                    message: "device.host is not set; nothing to store a password for".into(),
                })?;

            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            let password = line.trim_end_matches(['\r', '\n']);
            if password.is_empty() {
                return Err(CliError::Validation {
                    message: "empty password on stdin".into(),
                });
            }

            ilofan_config::store_password(host.trim(), password)?;
            output::print_output(&format!("Password stored in keyring for {host}"), global.quiet);
            Ok(())
        }
    }
}
