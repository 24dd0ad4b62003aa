//! Order lifecycle tracker: the single writer of the order list.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use thiserror::Error;

use ordertrack_core::{DomainError, OrderId, TrackingEventId};
use ordertrack_orders::{
    AdvanceTracking, Order, PlaceOrder, ProductSnapshot, RandomTrackingNumbers, TrackingNumber,
    TrackingNumberGenerator,
};

use crate::storage::{OrderStore, StorageError};

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("order {0} not found")]
    NotFound(OrderId),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

struct TrackerState<G> {
    /// Most-recent-first.
    orders: Vec<Order>,
    generator: G,
}

/// Tracking numbers drawn per order before a collision is reported.
pub const DEFAULT_TRACKING_ATTEMPTS: usize = 8;

/// Owns the canonical order list and persists it through an [`OrderStore`].
///
/// State is loaded once in [`OrderTracker::open`] and saved after every
/// mutation. Mutations hold the write lock across decide, save and commit,
/// so concurrent callers are serialized and each transition appends exactly
/// one milestone. A failed save leaves the in-memory list untouched.
pub struct OrderTracker<S, G = RandomTrackingNumbers> {
    store: S,
    state: RwLock<TrackerState<G>>,
    tracking_attempts: usize,
}

impl<S, G> OrderTracker<S, G>
where
    S: OrderStore,
    G: TrackingNumberGenerator,
{
    /// Load persisted orders and take ownership of the store.
    pub fn open(store: S, generator: G) -> Result<Self, TrackerError> {
        let mut orders = store.load()?;
        // Stable: equal timestamps keep their stored order.
        orders.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        tracing::info!(count = orders.len(), "order tracker opened");

        Ok(Self {
            store,
            state: RwLock::new(TrackerState { orders, generator }),
            tracking_attempts: DEFAULT_TRACKING_ATTEMPTS,
        })
    }

    /// How many tracking numbers to draw before giving up on a collision.
    pub fn with_tracking_attempts(mut self, attempts: usize) -> Self {
        self.tracking_attempts = attempts.max(1);
        self
    }

    /// All orders, most-recent-first.
    pub fn list_orders(&self) -> Result<Vec<Order>, TrackerError> {
        Ok(self.read()?.orders.clone())
    }

    pub fn get_order(&self, order_id: OrderId) -> Result<Order, TrackerError> {
        self.read()?
            .orders
            .iter()
            .find(|o| o.id_typed() == order_id)
            .cloned()
            .ok_or(TrackerError::NotFound(order_id))
    }

    /// Place a new order for `product` and put it at the head of the list.
    pub fn create_order(&self, product: ProductSnapshot) -> Result<Order, TrackerError> {
        let mut state = self.write()?;
        let tracking_number = fresh_tracking_number(&mut state, self.tracking_attempts)?;

        let order = Order::place(PlaceOrder {
            order_id: OrderId::new(),
            product,
            tracking_number,
            event_id: TrackingEventId::new(),
            occurred_at: Utc::now(),
        })?;

        let mut next = Vec::with_capacity(state.orders.len() + 1);
        next.push(order.clone());
        next.extend(state.orders.iter().cloned());

        self.store.save(&next)?;
        state.orders = next;

        tracing::info!(
            order_id = %order.id_typed(),
            tracking_number = %order.tracking_number(),
            product_id = %order.product().id,
            "order created"
        );
        Ok(order)
    }

    /// Move an order to its next status.
    ///
    /// Delivered orders come back unchanged and nothing is written.
    pub fn advance(&self, order_id: OrderId) -> Result<Order, TrackerError> {
        let mut state = self.write()?;
        let idx = state
            .orders
            .iter()
            .position(|o| o.id_typed() == order_id)
            .ok_or(TrackerError::NotFound(order_id))?;

        let cmd = AdvanceTracking {
            order_id,
            event_id: TrackingEventId::new(),
            occurred_at: Utc::now(),
        };

        let Some(event) = state.orders[idx].decide_advance(&cmd)? else {
            tracing::debug!(order_id = %order_id, "order already delivered; nothing to advance");
            return Ok(state.orders[idx].clone());
        };

        let mut next = state.orders.clone();
        next[idx].apply(event)?;

        self.store.save(&next)?;
        state.orders = next;

        let order = state.orders[idx].clone();
        tracing::info!(
            order_id = %order_id,
            tracking_number = %order.tracking_number(),
            status = %order.current_status(),
            "order advanced"
        );
        Ok(order)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, TrackerState<G>>, StorageError> {
        self.state.read().map_err(|_| StorageError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, TrackerState<G>>, StorageError> {
        self.state.write().map_err(|_| StorageError::LockPoisoned)
    }
}

fn fresh_tracking_number<G>(
    state: &mut TrackerState<G>,
    attempts: usize,
) -> Result<TrackingNumber, DomainError>
where
    G: TrackingNumberGenerator,
{
    for attempt in 1..=attempts {
        let candidate = state.generator.generate();
        if !state.orders.iter().any(|o| o.tracking_number() == &candidate) {
            return Ok(candidate);
        }
        tracing::debug!(attempt, tracking_number = %candidate, "tracking number collision; redrawing");
    }
    Err(DomainError::invariant(format!(
        "no unique tracking number after {attempts} attempts"
    )))
}
