//! Infrastructure layer: persistence, configuration, and the order tracker.

pub mod config;
pub mod storage;
pub mod tracker;


pub use config::{ConfigError, StoreBackend, TrackerConfig};
pub use storage::{
    DeviceOrderStore, DeviceStore, FileDeviceStore, InMemoryDeviceStore, InMemoryOrderStore,
    OrderStore, StorageError,
};
pub use tracker::{OrderTracker, TrackerError};
