use crate::utils::debug;
use crate::utils::error::SiteResult;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Where tracing output should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Plain stderr, used by the non-interactive commands
    Stderr,
    /// Append to a log file; the interactive preview owns the terminal
    File(PathBuf),
}

impl LogTarget {
    /// `.benjis/logs/latest.log` under the given base directory
    pub fn latest_log_in(base: &Path) -> Self {
        LogTarget::File(base.join(".benjis").join("logs").join("latest.log"))
    }
}

/// Installs the global tracing subscriber.
///
/// Calling this twice is harmless; the second install is ignored.
pub fn init_tracing(target: &LogTarget, debug: bool) -> SiteResult<()> {
    let filter = debug::env_filter(debug);

    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
    }

    Ok(())
}

fn open_log_file(path: &Path) -> SiteResult<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(file)
}
