use std::io;
use std::process;

use clap::Parser;
use fix_commit_encoding::utils::{enable_error_backtraces, write_error_report};
use fix_commit_encoding::Cli;

fn main() {
    // Logs go to stderr: stdout carries the corrected message in filter mode
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if cli.wants_backtrace() {
        enable_error_backtraces();
    }

    if let Err(e) = cli.execute() {
        // Message, cause chain and captured backtrace
        let _ = write_error_report(&e, &mut io::stderr());
        process::exit(1);
    }
}
