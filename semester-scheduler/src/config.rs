use std::path::PathBuf;

use tracing::warn;

/// Runtime settings, read from the environment
///
/// - `SCHEDULER_FILES_DIR`: directory holding schedule files (default: `files`)
/// - `HOST`: web mode bind address (default: `0.0.0.0`)
/// - `PORT`: web mode port (default: `8080`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub files_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub const DEFAULT_FILES_DIR: &'static str = "files";
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8080;

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let files_dir = lookup("SCHEDULER_FILES_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_FILES_DIR));

        let host = lookup("HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "PORT is not a valid port, using {}", Self::DEFAULT_PORT);
                Self::DEFAULT_PORT
            }),
            None => Self::DEFAULT_PORT,
        };

        Self { files_dir, host, port }
    }

    /// Path of a schedule file inside the files directory
    pub fn schedule_path(&self, file: &str) -> PathBuf {
        self.files_dir.join(file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
