use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ordertrack_core::{AggregateRoot, DomainError, DomainResult, OrderId, TrackingEventId, ValueObject};

use crate::tracking::{TrackingEvent, TrackingStatus};
use crate::tracking_number::TrackingNumber;

/// Denormalized copy of the purchased product, taken at checkout.
///
/// Later catalog edits never reach historical orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    #[serde(rename = "productId")]
    pub id: String,
    #[serde(rename = "productName")]
    pub name: String,
    #[serde(rename = "productImage")]
    pub image: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
}

impl ProductSnapshot {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        image: impl Into<String>,
        price: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
            price,
        }
    }

    fn validate(&self) -> DomainResult<()> {
        if self.id.trim().is_empty() {
            return Err(DomainError::validation("product id must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("product name must not be empty"));
        }
        Ok(())
    }
}

impl ValueObject for ProductSnapshot {}

/// Command: PlaceOrder.
///
/// Identifiers and the timestamp are supplied by the caller so placement stays
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrder {
    pub order_id: OrderId,
    pub product: ProductSnapshot,
    pub tracking_number: TrackingNumber,
    pub event_id: TrackingEventId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AdvanceTracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceTracking {
    pub order_id: OrderId,
    pub event_id: TrackingEventId,
    pub occurred_at: DateTime<Utc>,
}

/// Aggregate root: Order.
///
/// The timeline is append-only: it starts with exactly one `processing`
/// milestone and each later milestone is the successor of the one before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "OrderRecord")]
pub struct Order {
    id: OrderId,
    #[serde(flatten)]
    product: ProductSnapshot,
    tracking_number: TrackingNumber,
    created_at: DateTime<Utc>,
    events: Vec<TrackingEvent>,
}

/// Wire shape of a stored order, validated into [`Order`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderRecord {
    id: OrderId,
    #[serde(flatten)]
    product: ProductSnapshot,
    tracking_number: TrackingNumber,
    created_at: DateTime<Utc>,
    events: Vec<TrackingEvent>,
}

impl TryFrom<OrderRecord> for Order {
    type Error = DomainError;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        record.product.validate()?;
        validate_timeline(&record.events)?;
        Ok(Self {
            id: record.id,
            product: record.product,
            tracking_number: record.tracking_number,
            created_at: record.created_at,
            events: record.events,
        })
    }
}

fn validate_timeline(events: &[TrackingEvent]) -> DomainResult<()> {
    let first = events
        .first()
        .ok_or_else(|| DomainError::invariant("order timeline must not be empty"))?;
    if first.status != TrackingStatus::Processing {
        return Err(DomainError::invariant(format!(
            "order timeline must start at processing, found {}",
            first.status
        )));
    }
    for pair in events.windows(2) {
        let (prev, next) = (pair[0].status, pair[1].status);
        if prev.is_terminal() || next != prev.next() {
            return Err(DomainError::invariant(format!(
                "invalid tracking transition {prev} -> {next}"
            )));
        }
    }
    Ok(())
}

impl Order {
    /// Create an order with its single `processing` seed milestone.
    pub fn place(cmd: PlaceOrder) -> DomainResult<Self> {
        cmd.product.validate()?;

        let seed = TrackingEvent::milestone(cmd.event_id, TrackingStatus::Processing, cmd.occurred_at);

        Ok(Self {
            id: cmd.order_id,
            product: cmd.product,
            tracking_number: cmd.tracking_number,
            created_at: cmd.occurred_at,
            events: vec![seed],
        })
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn product(&self) -> &ProductSnapshot {
        &self.product
    }

    pub fn tracking_number(&self) -> &TrackingNumber {
        &self.tracking_number
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn events(&self) -> &[TrackingEvent] {
        &self.events
    }

    pub fn last_event(&self) -> &TrackingEvent {
        // Non-empty by construction (`place` seeds, deserialization validates).
        &self.events[self.events.len() - 1]
    }

    pub fn current_status(&self) -> TrackingStatus {
        self.last_event().status
    }

    pub fn is_delivered(&self) -> bool {
        self.current_status().is_terminal()
    }

    /// Timeline in display order (latest milestone first).
    pub fn timeline_newest_first(&self) -> impl Iterator<Item = &TrackingEvent> {
        self.events.iter().rev()
    }

    /// One-line summary for order lists: `GIGA-7K2QXD • Shipped`.
    pub fn headline(&self) -> String {
        format!("{} • {}", self.tracking_number, self.last_event().label)
    }

    /// Decide the next milestone, if any.
    ///
    /// Returns `Ok(None)` once the order is delivered. Does not mutate state;
    /// use [`Order::apply`] to record the returned milestone.
    pub fn decide_advance(&self, cmd: &AdvanceTracking) -> DomainResult<Option<TrackingEvent>> {
        if cmd.order_id != self.id {
            return Err(DomainError::invariant("order_id mismatch"));
        }

        let current = self.current_status();
        if current.is_terminal() {
            return Ok(None);
        }

        Ok(Some(TrackingEvent::milestone(
            cmd.event_id,
            current.next(),
            cmd.occurred_at,
        )))
    }

    /// Append a milestone. Only the successor of the current status is accepted.
    pub fn apply(&mut self, event: TrackingEvent) -> DomainResult<()> {
        let current = self.current_status();
        if current.is_terminal() || event.status != current.next() {
            return Err(DomainError::invariant(format!(
                "cannot move order from {current} to {}",
                event.status
            )));
        }
        self.events.push(event);
        Ok(())
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.events.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn drone() -> ProductSnapshot {
        ProductSnapshot::new("p1", "Pro Camera Drone", "https://img.example/drone.jpg", 129_999)
    }

    fn place(product: ProductSnapshot) -> DomainResult<Order> {
        Order::place(PlaceOrder {
            order_id: OrderId::new(),
            product,
            tracking_number: TrackingNumber::new("GIGA-TEST01").unwrap(),
            event_id: TrackingEventId::new(),
            occurred_at: test_time(),
        })
    }

    fn advance_cmd(order: &Order) -> AdvanceTracking {
        AdvanceTracking {
            order_id: order.id_typed(),
            event_id: TrackingEventId::new(),
            occurred_at: test_time(),
        }
    }

    fn advance(order: &mut Order) -> bool {
        match order.decide_advance(&advance_cmd(order)).unwrap() {
            Some(event) => {
                order.apply(event).unwrap();
                true
            }
            None => false,
        }
    }

    #[test]
    fn place_seeds_a_single_processing_milestone() {
        let order = place(drone()).unwrap();

        assert_eq!(order.events().len(), 1);
        let seed = &order.events()[0];
        assert_eq!(seed.status, TrackingStatus::Processing);
        assert_eq!(seed.label, "Order confirmed");
        assert_eq!(seed.location.as_deref(), Some("GIGA Secure Escrow Vault"));
        assert_eq!(seed.timestamp, order.created_at());
        assert_eq!(order.version(), 1);
    }

    #[test]
    fn place_rejects_blank_product_identifiers() {
        let err = place(ProductSnapshot::new("", "Drone", "", 1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = place(ProductSnapshot::new("p1", "   ", "", 1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn advancing_four_times_reaches_delivered() {
        let mut order = place(drone()).unwrap();
        let mut seen = Vec::new();
        for _ in 0..4 {
            assert!(advance(&mut order));
            seen.push(order.current_status());
        }
        assert_eq!(
            seen,
            vec![
                TrackingStatus::Packed,
                TrackingStatus::Shipped,
                TrackingStatus::OutForDelivery,
                TrackingStatus::Delivered,
            ]
        );
        assert!(order.is_delivered());
    }

    #[test]
    fn delivered_orders_do_not_grow() {
        let mut order = place(drone()).unwrap();
        while advance(&mut order) {}
        let snapshot = order.clone();

        assert!(order.decide_advance(&advance_cmd(&order)).unwrap().is_none());
        assert!(!advance(&mut order));
        assert_eq!(order, snapshot);
        assert_eq!(order.events().len(), 5);
    }

    #[test]
    fn decide_does_not_mutate_state() {
        let order = place(drone()).unwrap();
        let before = order.clone();
        let cmd = advance_cmd(&order);

        let first = order.decide_advance(&cmd).unwrap();
        let second = order.decide_advance(&cmd).unwrap();

        assert_eq!(order, before);
        assert_eq!(first, second);
    }

    #[test]
    fn decide_rejects_foreign_order_id() {
        let order = place(drone()).unwrap();
        let cmd = AdvanceTracking {
            order_id: OrderId::new(),
            event_id: TrackingEventId::new(),
            occurred_at: test_time(),
        };
        let err = order.decide_advance(&cmd).unwrap_err();
        assert_eq!(err, DomainError::invariant("order_id mismatch"));
    }

    #[test]
    fn apply_rejects_skips_and_regressions() {
        let mut order = place(drone()).unwrap();

        let skip = TrackingEvent::milestone(TrackingEventId::new(), TrackingStatus::Shipped, test_time());
        assert!(matches!(order.apply(skip), Err(DomainError::InvariantViolation(_))));

        let repeat =
            TrackingEvent::milestone(TrackingEventId::new(), TrackingStatus::Processing, test_time());
        assert!(matches!(order.apply(repeat), Err(DomainError::InvariantViolation(_))));

        assert_eq!(order.events().len(), 1);
    }

    #[test]
    fn headline_and_timeline_follow_latest_milestone() {
        let mut order = place(drone()).unwrap();
        advance(&mut order);
        advance(&mut order);

        assert_eq!(order.headline(), "GIGA-TEST01 • Shipped");
        let statuses: Vec<_> = order.timeline_newest_first().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![TrackingStatus::Shipped, TrackingStatus::Packed, TrackingStatus::Processing]
        );
    }

    #[test]
    fn serialized_order_uses_flat_camel_case_fields() {
        let mut order = place(drone()).unwrap();
        advance(&mut order);

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["productId"], "p1");
        assert_eq!(value["productName"], "Pro Camera Drone");
        assert_eq!(value["price"], 129_999);
        assert_eq!(value["trackingNumber"], "GIGA-TEST01");
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["events"][1]["status"], "packed");

        let back: Order = serde_json::from_value(value).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn deserialization_rejects_broken_timelines() {
        let order = place(drone()).unwrap();
        let mut value = serde_json::to_value(&order).unwrap();

        value["events"] = serde_json::json!([]);
        assert!(serde_json::from_value::<Order>(value.clone()).is_err());

        let mut shipped = serde_json::to_value(&order.events()[0]).unwrap();
        shipped["status"] = serde_json::json!("shipped");
        value["events"] = serde_json::json!([order.events()[0].clone(), shipped]);
        assert!(serde_json::from_value::<Order>(value).is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any number of advances yields a gap-free, strictly
            /// increasing timeline capped at five milestones.
            #[test]
            fn timeline_is_strictly_increasing(steps in 0usize..20) {
                let mut order = place(drone()).unwrap();
                for _ in 0..steps {
                    advance(&mut order);
                }

                prop_assert_eq!(order.events().len(), steps.min(4) + 1);
                prop_assert_eq!(order.events()[0].status, TrackingStatus::Processing);
                for pair in order.events().windows(2) {
                    prop_assert!(pair[0].status < pair[1].status);
                    prop_assert_eq!(pair[0].status.next(), pair[1].status);
                }
            }

            /// Property: snapshots survive JSON unchanged.
            #[test]
            fn snapshot_round_trips(
                steps in 0usize..6,
                name in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                price in 0u64..10_000_000,
            ) {
                let mut order = place(ProductSnapshot::new("sku-1", name, "", price)).unwrap();
                for _ in 0..steps {
                    advance(&mut order);
                }
                let json = serde_json::to_string(&order).unwrap();
                let back: Order = serde_json::from_str(&json).unwrap();
                prop_assert_eq!(back, order);
            }
        }
    }
}
