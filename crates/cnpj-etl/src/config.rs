//! Configuration for the CNPJ ETL
//!
//! Settings come from environment variables (optionally via a `.env` file
//! loaded in `main`). Relative extract paths are resolved against the project
//! root so the tool can be invoked from any directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EtlError, Result};

/// Default number of Postgres connections for an ETL run.
///
/// The loader is strictly sequential, so a small pool is enough; extra
/// connections only cover transient reconnects.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 2;

/// ETL configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Postgres connection string
    pub database_url: String,

    /// Base directory for resolving relative extract paths
    pub project_root: PathBuf,

    /// Connection pool size
    #[serde(default)]
    pub max_connections: u32,
}

impl Config {
    /// Load config from environment variables
    ///
    /// - `DATABASE_URL` (required): Postgres connection string
    /// - `CNPJ_PROJECT_ROOT` (optional): base for relative paths, defaults to
    ///   the current directory
    /// - `CNPJ_MAX_CONNECTIONS` (optional): pool size
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| EtlError::config("DATABASE_URL is not set"))?;

        let project_root = std::env::var("CNPJ_PROJECT_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let max_connections = std::env::var("CNPJ_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Ok(Self {
            database_url,
            project_root,
            max_connections,
        })
    }

    /// Resolve an extract path: absolute paths pass through, relative paths
    /// are joined onto the project root.
    pub fn resolve_path(&self, file: &str) -> PathBuf {
        let p = Path::new(file);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.project_root.join(p)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(root: &str) -> Config {
        Config {
            database_url: "postgres://localhost/cnpj".to_string(),
            project_root: PathBuf::from(root),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    #[test]
    fn test_resolve_relative_path() {
        let config = test_config("/srv/cnpj");
        assert_eq!(
            config.resolve_path("storage/PAISCSV"),
            PathBuf::from("/srv/cnpj/storage/PAISCSV")
        );
    }

    #[test]
    fn test_resolve_absolute_path_passes_through() {
        let config = test_config("/srv/cnpj");
        assert_eq!(
            config.resolve_path("/tmp/PAISCSV"),
            PathBuf::from("/tmp/PAISCSV")
        );
    }
}
