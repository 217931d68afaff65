//! Vehicle model for storage and API.

use serde::{Deserialize, Serialize};

/// Vehicle listing stored in Firestore.
///
/// A vehicle is rentable exactly as long as its document exists in the
/// `vehicles` collection: subscribing deletes the document, unsubscribing
/// (or undoing an owner delete) re-inserts it under the original id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Firestore document id (populated on reads, never stored as a field)
    #[serde(alias = "_firestore_id", skip_serializing, default)]
    pub id: Option<String>,
    pub vehicle_name: String,
    pub model: String,
    /// Descriptive only; presence of the document is the availability signal
    pub availability: Availability,
    /// Rental price per day
    pub price: f64,
    /// Owner contact details shown to renters
    pub contact: String,
    /// Identity-provider subject id of the listing owner
    pub owner_id: String,
    /// When the listing was created (RFC3339)
    pub created_at: String,
}

/// Owner-declared availability label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Availability {
    #[default]
    Available,
    NotAvailable,
}
