// ABOUTME: Diagnostic logging setup — tracing events go to a log file, never the terminal UI.
// ABOUTME: Filter comes from CHATBOX_LOG, defaulting to info for this crate.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "CHATBOX_LOG";
const DEFAULT_FILTER: &str = "chatbox=info";

/// Build the event filter from the environment, falling back to the default.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Install the global subscriber, appending to `log_path`.
pub fn init(log_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        let filter: EnvFilter = DEFAULT_FILTER.into();
        assert!(filter.to_string().contains("chatbox=info"));
    }

    #[test]
    fn init_creates_log_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("logs").join("chatbox.log");
        // A second init in the same test binary may fail to install the global
        // subscriber, but the file is created before that point either way.
        let _ = init(&path);
        assert!(path.exists());
    }
}
