//! stemmix CLI entry point

use clap::Parser;
use stemmix::config::{Cli, Settings};
use stemmix::pipeline;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli);

    let settings = match Settings::from_cli(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if !settings.album_dir.is_dir() {
        eprintln!(
            "Error: Album directory does not exist: {}\n\n  Tip: Set ALBUM_DIR or pass --album.\n  Example:\n    stemmix -a ~/Music/Album -m htdemucs",
            settings.album_dir.display()
        );
        return ExitCode::FAILURE;
    }

    let code = match pipeline::run(&settings) {
        Ok(result) => {
            println!();
            println!(
                "Summary: {} successful, {} failed (of {} total)",
                result.successful, result.failed, result.total_songs
            );

            if result.failed > 0 {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    };

    if settings.show_config {
        match serde_json::to_string_pretty(&settings) {
            Ok(json) => {
                println!();
                println!("Configuration:");
                println!("{}", json);
            }
            Err(e) => eprintln!("Could not display configuration: {}", e),
        }
    }

    code
}

fn init_logging(cli: &Cli) {
    let filter = match cli.log_level() {
        tracing::Level::INFO => "info",
        tracing::Level::DEBUG => "debug",
        _ => "trace",
    };

    let filter = if cli.quiet { "error" } else { filter };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}
