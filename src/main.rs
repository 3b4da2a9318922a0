// Entrypoint for the upload tool.
// - Keeps `main` small: build the config and API client, hand them to the
//   migration together with the terminal operator.
// - Nothing escapes as a crash: errors and Ctrl-C both end in a printed
//   message and a normal exit.

use anyhow::Context;
use crossterm::style::Stylize;
use quiz_uploader::api::ApiClient;
use quiz_uploader::config::Config;
use quiz_uploader::migrate::Migration;
use quiz_uploader::ui::{is_interrupt, TerminalOperator, ThreadPause};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr so they never interleave with the report.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    if let Err(err) = watch_for_interrupt() {
        tracing::warn!(error = %err, "Ctrl-C handler not installed");
    }

    match run() {
        Ok(()) => {}
        // Ctrl-C inside a prompt surfaces here before the watcher fires.
        Err(err) if is_interrupt(&err) => print_stopped(),
        Err(err) => println!("\n{} Unexpected error: {:#}", "✘".red(), err),
    }
}

// Set once the stop message is out; a prompt interrupt and the watcher can
// both see the same Ctrl-C.
static STOPPED: AtomicBool = AtomicBool::new(false);

fn print_stopped() {
    if STOPPED.swap(true, Ordering::SeqCst) {
        return;
    }
    println!("\n\n{} Stopped by user.", "⚠".yellow());
}

fn run() -> anyhow::Result<()> {
    // Endpoint and template are fixed; see `config::DEFAULT_BASE_URL`.
    let config = Config::default();
    let api = ApiClient::new(&config)?;

    Migration::new(config, api, TerminalOperator, ThreadPause).run()?;
    Ok(())
}

/// Catch Ctrl-C on a background thread, report it and exit cleanly. The
/// pipeline is blocking, so it is stopped wherever it happens to be.
fn watch_for_interrupt() -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start signal runtime")?;

    thread::Builder::new()
        .name("ctrl-c".into())
        .spawn(move || {
            runtime.block_on(async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    print_stopped();
                    std::process::exit(0);
                }
            });
        })
        .context("Failed to spawn Ctrl-C watcher")?;
    Ok(())
}
