use std::sync::RwLock;

use ordertrack_orders::Order;

use super::r#trait::{OrderStore, StorageError};

/// In-memory order store.
///
/// Intended for tests/dev. Holds the most recently saved list.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store, as if `orders` had been saved earlier.
    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            orders: RwLock::new(orders),
        }
    }
}

impl OrderStore for InMemoryOrderStore {
    fn load(&self) -> Result<Vec<Order>, StorageError> {
        let orders = self.orders.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(orders.clone())
    }

    fn save(&self, orders: &[Order]) -> Result<(), StorageError> {
        let mut stored = self.orders.write().map_err(|_| StorageError::LockPoisoned)?;
        *stored = orders.to_vec();
        Ok(())
    }
}
