//! Delivery lifecycle statuses and the milestones recorded for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ordertrack_core::{DomainError, TrackingEventId};

/// Delivery lifecycle status.
///
/// The variants are declared in lifecycle order, so the derived `Ord` is the
/// lifecycle order as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    Processing,
    Packed,
    Shipped,
    OutForDelivery,
    Delivered,
}

impl TrackingStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [TrackingStatus; 5] = [
        TrackingStatus::Processing,
        TrackingStatus::Packed,
        TrackingStatus::Shipped,
        TrackingStatus::OutForDelivery,
        TrackingStatus::Delivered,
    ];

    /// Successor status. `Delivered` is absorbing.
    pub fn next(self) -> Self {
        match self {
            TrackingStatus::Processing => TrackingStatus::Packed,
            TrackingStatus::Packed => TrackingStatus::Shipped,
            TrackingStatus::Shipped => TrackingStatus::OutForDelivery,
            TrackingStatus::OutForDelivery => TrackingStatus::Delivered,
            TrackingStatus::Delivered => TrackingStatus::Delivered,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next() == self
    }

    /// Buyer-facing description recorded on the milestone.
    pub fn label(self) -> &'static str {
        match self {
            TrackingStatus::Processing => "Order confirmed",
            TrackingStatus::Packed => "Packed at warehouse",
            TrackingStatus::Shipped => "Shipped",
            TrackingStatus::OutForDelivery => "Out for delivery",
            TrackingStatus::Delivered => "Delivered",
        }
    }

    /// Where the parcel is while in this status.
    ///
    /// Until it is packed the purchase sits in custodial escrow.
    pub fn location(self) -> &'static str {
        match self {
            TrackingStatus::Processing => "GIGA Secure Escrow Vault",
            TrackingStatus::Packed => "Vendor fulfillment center",
            TrackingStatus::Shipped => "In transit",
            TrackingStatus::OutForDelivery => "Local dispatch hub",
            TrackingStatus::Delivered => "Delivered to destination",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrackingStatus::Processing => "processing",
            TrackingStatus::Packed => "packed",
            TrackingStatus::Shipped => "shipped",
            TrackingStatus::OutForDelivery => "out_for_delivery",
            TrackingStatus::Delivered => "delivered",
        }
    }
}

impl core::fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for TrackingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrackingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown tracking status '{s}'")))
    }
}

/// One immutable milestone in an order's delivery timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub id: TrackingEventId,
    pub status: TrackingStatus,
    pub label: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl TrackingEvent {
    /// Milestone for `status` with its fixed label and location.
    pub fn milestone(id: TrackingEventId, status: TrackingStatus, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            status,
            label: status.label().to_string(),
            timestamp,
            location: Some(status.location().to_string()),
        }
    }
}
