//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const VEHICLES: &str = "vehicles";
    /// Renter profiles (keyed by identity-provider subject id)
    pub const USERS: &str = "users";
    /// Active subscriptions (keyed by subscriber user id)
    pub const SUBSCRIPTIONS: &str = "subscriptions";
    pub const RIDES: &str = "rides";
    /// Ride confirmations (keyed by `{ride_id}_{user_id}`)
    pub const CONFIRMED_RIDES: &str = "confirmed_rides";
}
