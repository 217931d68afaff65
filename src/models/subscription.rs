//! Subscription model.

use serde::{Deserialize, Serialize};

use crate::models::Vehicle;

/// Active rental subscription (keyed by subscriber user id, so at most one
/// active subscription per user).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub user_id: String,
    pub email: String,
    pub vehicle_id: String,
    pub vehicle_name: String,
    pub needs_driver: bool,
    pub authorized: bool,
    /// When the subscription was authorized (RFC3339)
    pub subscribed_at: String,
    /// Full snapshot of the vehicle document taken at authorization time.
    /// Unsubscribing restores the vehicle from this snapshot under
    /// `vehicle_id`, since authorization deleted the original document.
    pub vehicle: Vehicle,
}
