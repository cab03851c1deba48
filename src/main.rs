// src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use stagehand::Error;

fn main() {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Promote {
            channel,
            target_repo,
            artifacts,
            source_repo,
            bundle,
        }) => commands::promote(
            &channel,
            &target_repo,
            &artifacts,
            source_repo.as_deref(),
            bundle.as_deref(),
        ),
        Some(Commands::Streams {
            channel,
            target_repo,
        }) => commands::streams(&channel, &target_repo),
        Some(Commands::Bundle {
            output,
            repository,
            artifacts,
        }) => commands::bundle(&output, &repository, &artifacts),
        Some(Commands::Completions { shell }) => {
            commands::completions(shell);
            Ok(())
        }
        None => {
            println!("Stagehand v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'stagehand --help' for usage information");
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {:#}", err);
        std::process::exit(exit_code(&err));
    }
}

/// Map an error chain to a process exit code
///
/// The promotion error may be buried under ambient context wrappers, so
/// walk the cause chain for the tagged variant instead of matching on
/// message text.
fn exit_code(err: &anyhow::Error) -> i32 {
    let cause: &(dyn std::error::Error + 'static) = err.as_ref();
    match Error::find_in(cause) {
        Some(Error::Config(_)) => 2,
        Some(Error::Resolution { .. }) => 3,
        Some(Error::Deployment { .. }) => 4,
        Some(Error::Format(_)) | Some(Error::ChecksumMismatch { .. }) => 5,
        Some(Error::Capacity { .. }) => 6,
        Some(Error::Io(_)) | None => 1,
    }
}
