//! Logging: `tracing` events go to a file because the terminal belongs to the UI.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Log file used when neither the CLI nor the config names one.
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("thump.log")
}

/// Install the global subscriber, appending to `path`.
///
/// `RUST_LOG` wins over `level` when set. Returns the path actually used.
pub fn init(path: Option<&Path>, level: &str) -> io::Result<PathBuf> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_log_path);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (tests); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("thump.log");
        let used = init(Some(&path), "debug").unwrap();
        assert_eq!(used, path);
        assert!(path.exists());
    }

    #[test]
    fn default_path_is_in_temp() {
        assert!(default_log_path().starts_with(std::env::temp_dir()));
    }
}
