mod calc;
mod config;
mod dni;
mod group;
mod ipc;
mod ledger;
mod roster;

use std::io::{self, BufRead, Write};
use tracing_subscriber::{fmt, prelude::*};

fn init_logging(cfg: &config::Config) -> anyhow::Result<()> {
    // stdout carries the protocol; logs go to stderr.
    let fmt = fmt::layer()
        .with_writer(io::stderr)
        .without_time()
        .with_target(false);
    tracing_subscriber::registry()
        .with(fmt)
        .with(cfg.level_filter()?)
        .try_init()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cfg = config::Config::load()?;
    init_logging(&cfg)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        group = %cfg.default_group,
        "calcud ready"
    );

    let mut state = ipc::AppState::from_config(&cfg);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => ipc::handle_request(&mut state, req),
            Err(e) => {
                tracing::warn!(error = %e, "unparseable request line");
                ipc::bad_json(e.to_string())
            }
        };

        writeln!(stdout, "{resp}")?;
        stdout.flush()?;
    }

    tracing::info!(students = state.ledger.len(), "stdin closed, exiting");
    Ok(())
}
