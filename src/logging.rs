/// File logging via `tracing`.
///
/// The terminal is owned by the renderer, so log lines go to a file.
/// `HEXQUIZ_LOG` (an `EnvFilter` directive) overrides the configured level.

use crate::config::LogConfig;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "HEXQUIZ_LOG";

/// Install the global subscriber. Failures are reported on stderr and the
/// game runs without logs.
pub fn init(cfg: &LogConfig) {
    let Some(path) = &cfg.file else { return };

    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: cannot open log file {}: {e}", path.display());
            return;
        }
    };

    let filter = build_filter(std::env::var(LOG_ENV).ok().as_deref(), &cfg.level);

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
    if let Err(e) = result {
        eprintln!("Warning: logging disabled: {e}");
    }
}

/// Env directive wins when valid; otherwise the configured level; otherwise `info`.
fn build_filter(env: Option<&str>, level: &str) -> EnvFilter {
    env.and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
