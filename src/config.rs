//! Runtime Configuration
//!
//! Everything comes from environment variables with local-development
//! defaults:
//!
//! | Variable | Default |
//! |---|---|
//! | `MODEL_DIR` | `models` |
//! | `CLASSIFIER_PATH` | `$MODEL_DIR/model.json` |
//! | `MINMAX_SCALER_PATH` | `$MODEL_DIR/minmaxscaler.json` |
//! | `STANDARD_SCALER_PATH` | `$MODEL_DIR/standscaler.json` (empty disables) |
//! | `BIND_ADDR` | `0.0.0.0` |
//! | `PORT` | `7860` |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL_DIR: &str = "models";
pub const DEFAULT_PORT: u16 = 7860;

/// Artifact locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub classifier: PathBuf,
    pub primary_scaler: PathBuf,
    /// Optional second scaler, applied after the primary one
    pub secondary_scaler: Option<PathBuf>,
}

impl ModelPaths {
    /// Standard file names inside one directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            classifier: dir.join("model.json"),
            primary_scaler: dir.join("minmaxscaler.json"),
            secondary_scaler: Some(dir.join("standscaler.json")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub models: ModelPaths,
    pub bind_addr: IpAddr,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let model_dir = lookup("MODEL_DIR").unwrap_or_else(|| DEFAULT_MODEL_DIR.to_string());
        let mut models = ModelPaths::in_dir(&model_dir);

        if let Some(p) = lookup("CLASSIFIER_PATH") {
            models.classifier = PathBuf::from(p);
        }
        if let Some(p) = lookup("MINMAX_SCALER_PATH") {
            models.primary_scaler = PathBuf::from(p);
        }
        if let Some(p) = lookup("STANDARD_SCALER_PATH") {
            models.secondary_scaler = if p.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(p))
            };
        }

        let bind_addr = lookup("BIND_ADDR")
            .and_then(|a| a.parse().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            models,
            bind_addr,
            port,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}
