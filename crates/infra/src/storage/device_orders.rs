use ordertrack_orders::Order;

use super::device::{validate_key, DeviceStore};
use super::r#trait::{OrderStore, StorageError};

/// Order store that keeps the whole list as one JSON blob in a [`DeviceStore`].
#[derive(Debug, Clone)]
pub struct DeviceOrderStore<D> {
    device: D,
    key: String,
}

impl<D> DeviceOrderStore<D>
where
    D: DeviceStore,
{
    pub const DEFAULT_KEY: &'static str = "orders";

    pub fn new(device: D) -> Self {
        Self {
            device,
            key: Self::DEFAULT_KEY.to_string(),
        }
    }

    pub fn with_key(device: D, key: impl Into<String>) -> Result<Self, StorageError> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self { device, key })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<D> OrderStore for DeviceOrderStore<D>
where
    D: DeviceStore,
{
    fn load(&self) -> Result<Vec<Order>, StorageError> {
        let Some(raw) = self.device.get(&self.key)? else {
            tracing::debug!(key = %self.key, "no stored orders");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Order>>(&raw) {
            Ok(orders) => {
                tracing::debug!(key = %self.key, count = orders.len(), "stored orders loaded");
                Ok(orders)
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "discarding malformed stored orders");
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, orders: &[Order]) -> Result<(), StorageError> {
        let payload =
            serde_json::to_string(orders).map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.device.set(&self.key, &payload)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use ordertrack_core::{OrderId, TrackingEventId};
    use ordertrack_orders::{PlaceOrder, ProductSnapshot, TrackingNumber};

    use super::*;
    use crate::storage::InMemoryDeviceStore;

    fn sample_order() -> Order {
        Order::place(PlaceOrder {
            order_id: OrderId::new(),
            product: ProductSnapshot::new("p1", "Pro Camera Drone", "drone.jpg", 129_999),
            tracking_number: TrackingNumber::new("GIGA-AAAAAA").unwrap(),
            event_id: TrackingEventId::new(),
            occurred_at: Utc::now(),
        })
        .unwrap()
    }

    #[test]
    fn missing_key_loads_as_empty() {
        let store = DeviceOrderStore::new(InMemoryDeviceStore::new());
        assert_eq!(store.key(), "orders");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn saved_orders_load_back_identically() {
        let store = DeviceOrderStore::new(InMemoryDeviceStore::new());
        let orders = vec![sample_order(), sample_order()];

        store.save(&orders).unwrap();
        assert_eq!(store.load().unwrap(), orders);
    }

    #[test]
    fn malformed_blobs_load_as_empty() {
        let device = Arc::new(InMemoryDeviceStore::new());
        let store = DeviceOrderStore::new(device.clone());

        for junk in ["not json", "{\"orders\": []}", "[{\"id\": 42}]"] {
            device.set("orders", junk).unwrap();
            assert!(store.load().unwrap().is_empty(), "{junk:?} should load as empty");
        }
    }

    #[test]
    fn orders_live_under_their_own_key() {
        let device = Arc::new(InMemoryDeviceStore::new());
        let store = DeviceOrderStore::with_key(device.clone(), "market.orders").unwrap();
        assert_eq!(store.key(), "market.orders");
        store.save(&[sample_order()]).unwrap();

        assert!(device.get("market.orders").unwrap().is_some());
        assert!(device.get(DeviceOrderStore::<InMemoryDeviceStore>::DEFAULT_KEY).unwrap().is_none());
        assert!(DeviceOrderStore::with_key(InMemoryDeviceStore::new(), "bad key").is_err());
    }
}
