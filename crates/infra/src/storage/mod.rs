//! Persistence boundary for the order list.
//!
//! The tracker only sees [`OrderStore`]. Device-local persistence is layered
//! underneath: a string key/value [`DeviceStore`] and the
//! [`DeviceOrderStore`] adapter that keeps the whole list as one JSON blob.

pub mod device;
pub mod device_orders;
pub mod in_memory;
pub mod r#trait;

pub use device::{DeviceStore, FileDeviceStore, InMemoryDeviceStore};
pub use device_orders::DeviceOrderStore;
pub use in_memory::InMemoryOrderStore;
pub use r#trait::{OrderStore, StorageError};
