//! Init and Config commands.

use serde_json::json;

use super::{emit, report_error};
use crate::config::Settings;
use crate::io::{Envelope, ExitCode, OutputFormat, ResultCode};

/// Run init command - create configuration file.
pub fn run_init(force: bool, format: OutputFormat) -> ExitCode {
    match Settings::init_config_file(force) {
        Ok(path) => {
            if format.is_json() {
                return emit(
                    Envelope::success(json!({ "path": path }))
                        .with_message(format!("Created configuration file at {}", path.display())),
                );
            }
            println!("Created configuration file at: {}", path.display());
            println!("Edit this file to customize your settings.");
            ExitCode::Success
        }
        Err(e) => report_error(format, ResultCode::ConfigError, e.to_string(), None, None),
    }
}

/// Run config command - display current configuration.
pub fn run_config(config: &Settings, format: OutputFormat) -> ExitCode {
    if format.is_json() {
        return emit(Envelope::success(config).with_message("Current configuration"));
    }

    match toml::to_string_pretty(config) {
        Ok(toml_str) => {
            println!("Current Configuration:");
            println!("{}", "=".repeat(50));
            println!("{toml_str}");
            ExitCode::Success
        }
        Err(e) => report_error(
            format,
            ResultCode::InternalError,
            format!("Error displaying config: {e}"),
            None,
            None,
        ),
    }
}
