use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Log to a file when `CHIRP_LOG_FILE` is set; otherwise logging stays
/// off so log lines never interleave with the prompt. `RUST_LOG` filters
/// as usual, defaulting to `info`.
pub(crate) fn init_tracing() {
    let Some(path) = std::env::var_os("CHIRP_LOG_FILE") else {
        return;
    };
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Failed to open log file {}: {err}", path.to_string_lossy());
            return;
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}
