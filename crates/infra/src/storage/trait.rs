use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use ordertrack_orders::Order;

/// Storage operation error.
///
/// These are **infrastructure errors** (IO, encoding, locking) as opposed to
/// domain errors (validation, invariants).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize orders: {0}")]
    Serialize(String),

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("storage lock poisoned")]
    LockPoisoned,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Persistence collaborator for the full, ordered order list.
///
/// ## Load Semantics
///
/// - Returns the list in the order it was saved (most-recent-first).
/// - Returns an empty list if nothing was stored yet.
/// - Returns an empty list if the stored content is malformed; only genuine
///   backend failures surface as `StorageError`.
///
/// ## Save Semantics
///
/// - Replaces the stored list as a whole.
/// - Retries, if any, are the implementation's business; callers see the
///   final outcome only.
pub trait OrderStore: Send + Sync {
    fn load(&self) -> Result<Vec<Order>, StorageError>;

    fn save(&self, orders: &[Order]) -> Result<(), StorageError>;
}

impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn load(&self) -> Result<Vec<Order>, StorageError> {
        (**self).load()
    }

    fn save(&self, orders: &[Order]) -> Result<(), StorageError> {
        (**self).save(orders)
    }
}
