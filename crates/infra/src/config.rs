//! Configuration loading and tracker wiring.
//!
//! | variable | values | default |
//! |---|---|---|
//! | `ORDERTRACK_STORE` | `memory`, `file` | `file` |
//! | `ORDERTRACK_DATA_DIR` | path | `<data dir>/ordertrack` |
//! | `ORDERTRACK_ORDERS_KEY` | device store key | `orders` |
//! | `ORDERTRACK_TRACKING_PREFIX` | ASCII alphanumeric | `GIGA` |
//! | `ORDERTRACK_TRACKING_ATTEMPTS` | positive integer | `8` |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;

use ordertrack_orders::RandomTrackingNumbers;

use crate::storage::{DeviceOrderStore, FileDeviceStore, InMemoryOrderStore, OrderStore};
use crate::tracker::{OrderTracker, DEFAULT_TRACKING_ATTEMPTS};

pub const STORE_VAR: &str = "ORDERTRACK_STORE";
pub const DATA_DIR_VAR: &str = "ORDERTRACK_DATA_DIR";
pub const ORDERS_KEY_VAR: &str = "ORDERTRACK_ORDERS_KEY";
pub const TRACKING_PREFIX_VAR: &str = "ORDERTRACK_TRACKING_PREFIX";
pub const TRACKING_ATTEMPTS_VAR: &str = "ORDERTRACK_TRACKING_ATTEMPTS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to resolve OS app data directory; set ORDERTRACK_DATA_DIR")]
    NoDataDir,
}

/// Where orders are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local only; lost on exit.
    Memory,
    /// Device store rooted at `dir`.
    File { dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub backend: StoreBackend,
    pub orders_key: String,
    pub tracking_prefix: String,
    pub tracking_attempts: usize,
}

impl TrackerConfig {
    /// In-memory configuration with every other setting at its default.
    pub fn in_memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            orders_key: DeviceOrderStore::<FileDeviceStore>::DEFAULT_KEY.to_string(),
            tracking_prefix: RandomTrackingNumbers::DEFAULT_PREFIX.to_string(),
            tracking_attempts: DEFAULT_TRACKING_ATTEMPTS,
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup` (a variable name → value function).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::in_memory();

        let backend = match lookup(STORE_VAR).as_deref().unwrap_or("file") {
            "memory" => StoreBackend::Memory,
            "file" => {
                let dir = match lookup(DATA_DIR_VAR) {
                    Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
                    Some(dir) => {
                        return Err(ConfigError::InvalidValue {
                            var: DATA_DIR_VAR,
                            value: dir,
                            reason: "must not be blank".to_string(),
                        });
                    }
                    None => default_data_dir()?,
                };
                StoreBackend::File { dir }
            }
            other => {
                return Err(ConfigError::InvalidValue {
                    var: STORE_VAR,
                    value: other.to_string(),
                    reason: "expected 'memory' or 'file'".to_string(),
                });
            }
        };

        let orders_key = lookup(ORDERS_KEY_VAR).unwrap_or(defaults.orders_key);
        let tracking_prefix = lookup(TRACKING_PREFIX_VAR).unwrap_or(defaults.tracking_prefix);

        let tracking_attempts = match lookup(TRACKING_ATTEMPTS_VAR) {
            None => defaults.tracking_attempts,
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: TRACKING_ATTEMPTS_VAR,
                        value: raw,
                        reason: "expected a positive integer".to_string(),
                    });
                }
            },
        };

        Ok(Self {
            backend,
            orders_key,
            tracking_prefix,
            tracking_attempts,
        })
    }

    /// Build the configured store and open a tracker over it.
    pub fn open_tracker(
        &self,
    ) -> anyhow::Result<OrderTracker<Arc<dyn OrderStore>, RandomTrackingNumbers>> {
        let store: Arc<dyn OrderStore> = match &self.backend {
            StoreBackend::Memory => Arc::new(InMemoryOrderStore::new()),
            StoreBackend::File { dir } => {
                let device = FileDeviceStore::open(dir).with_context(|| {
                    format!("failed to open device store at {}", dir.display())
                })?;
                Arc::new(
                    DeviceOrderStore::with_key(device, self.orders_key.clone())
                        .context("invalid orders key")?,
                )
            }
        };

        let generator = RandomTrackingNumbers::new(self.tracking_prefix.clone())
            .context("invalid tracking number prefix")?;

        let tracker = OrderTracker::open(store, generator)
            .context("failed to load persisted orders")?
            .with_tracking_attempts(self.tracking_attempts);

        tracing::info!(backend = ?self.backend, key = %self.orders_key, "order tracker ready");
        Ok(tracker)
    }
}

fn default_data_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or(ConfigError::NoDataDir)?;
    Ok(base.join("ordertrack"))
}
