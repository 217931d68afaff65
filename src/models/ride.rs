//! Ride sharing models.

use serde::{Deserialize, Serialize};

/// Whether a ride entry offers seats or asks for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideType {
    Offer,
    Need,
}

impl RideType {
    /// The category shown to a user browsing under this tab: offer-tab
    /// viewers see need rides and vice versa.
    pub fn opposite(self) -> Self {
        match self {
            RideType::Offer => RideType::Need,
            RideType::Need => RideType::Offer,
        }
    }
}

/// Peer ride offer or request stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    /// Firestore document id (populated on reads, never stored as a field)
    #[serde(alias = "_firestore_id", skip_serializing, default)]
    pub id: Option<String>,
    pub ride_type: RideType,
    pub start_address: String,
    pub end_address: String,
    #[serde(default)]
    pub pincode: Option<String>,
    pub price: f64,
    pub seats_available: u32,
    pub contact_number: String,
    /// Identity-provider subject id of the author
    pub user_id: String,
    /// When the ride was posted (RFC3339)
    pub created_at: String,
}

/// Record linking a user to a ride they confirmed. Confirmations are keyed
/// by `{ride_id}_{user_id}` and are never revoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideConfirmation {
    pub ride_id: String,
    pub user_id: String,
    /// When the ride was confirmed (RFC3339)
    pub confirmed_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_tab() {
        assert_eq!(RideType::Offer.opposite(), RideType::Need);
        assert_eq!(RideType::Need.opposite(), RideType::Offer);
    }

    #[test]
    fn test_ride_type_wire_format() {
        assert_eq!(serde_json::to_string(&RideType::Offer).unwrap(), "\"offer\"");
        assert_eq!(
            serde_json::from_str::<RideType>("\"need\"").unwrap(),
            RideType::Need
        );
    }
}
