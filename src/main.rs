use clap::Parser;

use docdex::cli::{self, Cli};
use docdex::config::Settings;
use docdex::io::{ExitCode, OutputFormat};
use docdex::logging;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let format = OutputFormat::from_json_flag(cli.json);

    let loaded = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            // `init --force` must be able to repair a broken settings file.
            if !matches!(cli.command, cli::Commands::Init { .. }) {
                return ExitCode::ConfigError.into();
            }
            Settings::default()
        }
    };

    logging::init_with_config(&settings.logging);
    tracing::debug!(target: "cli", "workspace root: {:?}", settings.workspace_root);

    cli::run(cli.command, &settings, format).into()
}
