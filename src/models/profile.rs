//! Renter profile model.

use serde::{Deserialize, Serialize};

/// Renter profile stored in Firestore (keyed by identity-provider subject id).
///
/// Upserted the first time a renter completes the subscription flow; later
/// subscriptions overwrite the vehicle reference. There is one current
/// profile record per user, not a history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub address: String,
    /// Set once the renter passes the authorization step
    pub authorized: bool,
    /// Last-chosen vehicle reference
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub vehicle_name: Option<String>,
}
