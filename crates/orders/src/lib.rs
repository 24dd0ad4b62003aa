//! Marketplace order tracking domain module.
//!
//! This crate contains the order lifecycle rules, implemented purely as
//! deterministic domain logic (no IO, no storage). Randomness is confined to
//! tracking-number generation behind [`TrackingNumberGenerator`].

pub mod order;
pub mod tracking;
pub mod tracking_number;

pub use order::{AdvanceTracking, Order, PlaceOrder, ProductSnapshot};
pub use tracking::{TrackingEvent, TrackingStatus};
pub use tracking_number::{RandomTrackingNumbers, TrackingNumber, TrackingNumberGenerator};
