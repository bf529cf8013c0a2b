use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::{BaseDirs, ProjectDirs};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "tapseq.log";

/// `$XDG_STATE_HOME/tapseq/tapseq.log`, or the platform data dir where
/// there is no state dir
pub fn default_log_path() -> Option<PathBuf> {
    let state_dir = BaseDirs::new().and_then(|dirs| dirs.state_dir().map(|d| d.join("tapseq")));
    state_dir
        .or_else(|| ProjectDirs::from("", "", "tapseq").map(|p| p.data_local_dir().to_path_buf()))
        .map(|dir| dir.join(LOG_FILE_NAME))
}

/// Install a file-backed subscriber when `RUST_LOG` is set.
///
/// The terminal belongs to the TUI, so nothing is ever written to stdout or
/// stderr. Returns the log path when logging was enabled.
pub fn init(log_file: Option<&Path>) -> io::Result<Option<PathBuf>> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(None);
    }

    let Some(path) = log_file.map(Path::to_path_buf).or_else(default_log_path) else {
        return Ok(None);
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(Some(path))
}
