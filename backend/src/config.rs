//! Runtime configuration read from the environment.
//!
//! | Variable                  | Default             |
//! |---------------------------|---------------------|
//! | `SIGNATURE_HOST`          | `127.0.0.1`         |
//! | `SIGNATURE_PORT`          | `8080`              |
//! | `SIGNATURE_DB`            | `signatures.sqlite` |
//! | `SIGNATURE_STORAGE_DIR`   | `documents`         |
//! | `SIGNATURE_ARCHIVE_DIR`   | `archive`           |
//! | `SIGNATURE_OPEN_BROWSER`  | `true`              |

use std::env;
use std::path::PathBuf;

use log::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// Directory where uploaded PDF documents are stored.
    pub storage_dir: PathBuf,
    /// Directory receiving one JSON receipt per signed session.
    pub archive_dir: PathBuf,
    pub open_browser: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path: PathBuf::from("signatures.sqlite"),
            storage_dir: PathBuf::from("documents"),
            archive_dir: PathBuf::from("archive"),
            open_browser: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        let port = match lookup("SIGNATURE_PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("SIGNATURE_PORT={} is not a port, using {}", raw, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };
        Config {
            host: lookup("SIGNATURE_HOST").unwrap_or(defaults.host),
            port,
            database_path: lookup("SIGNATURE_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            storage_dir: lookup("SIGNATURE_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            archive_dir: lookup("SIGNATURE_ARCHIVE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.archive_dir),
            open_browser: lookup("SIGNATURE_OPEN_BROWSER")
                .map(|v| !matches!(v.as_str(), "0" | "false" | "no"))
                .unwrap_or(defaults.open_browser),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.url(), "http://127.0.0.1:8080");
        assert!(config.open_browser);
    }

    #[test]
    fn overrides_and_bad_port() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SIGNATURE_PORT", "eighty"),
            ("SIGNATURE_DB", "/tmp/sig.sqlite"),
            ("SIGNATURE_OPEN_BROWSER", "false"),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, PathBuf::from("/tmp/sig.sqlite"));
        assert!(!config.open_browser);
    }
}
