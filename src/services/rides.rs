// SPDX-License-Identifier: MIT

//! Ride-sharing workflow: post, browse, edit, delete, and confirm peer
//! rides.
//!
//! Browsing is tab-complementary: a user on the "offer" tab sees rides of
//! type "need" and vice versa, so every listing shown is one the user can
//! act on.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{Ride, RideConfirmation, RideType};

/// A ride as seen by a browsing user.
#[derive(Debug, Clone)]
pub struct RideListing {
    pub ride: Ride,
    /// Whether the browsing user already confirmed this ride. Confirmed
    /// rides lose their confirm action and are listed separately.
    pub confirmed: bool,
}

/// Partial update for an existing ride (pre-filled edit form semantics:
/// absent fields keep their stored value). This also means the optional
/// pincode can be set or changed but never cleared back to empty.
#[derive(Debug, Clone, Default)]
pub struct RideUpdate {
    pub ride_type: Option<RideType>,
    pub start_address: Option<String>,
    pub end_address: Option<String>,
    pub pincode: Option<String>,
    pub price: Option<f64>,
    pub seats_available: Option<u32>,
    pub contact_number: Option<String>,
}

fn apply_update(ride: &mut Ride, update: RideUpdate) {
    if let Some(ride_type) = update.ride_type {
        ride.ride_type = ride_type;
    }
    if let Some(start_address) = update.start_address {
        ride.start_address = start_address;
    }
    if let Some(end_address) = update.end_address {
        ride.end_address = end_address;
    }
    if let Some(pincode) = update.pincode {
        ride.pincode = Some(pincode);
    }
    if let Some(price) = update.price {
        ride.price = price;
    }
    if let Some(seats_available) = update.seats_available {
        ride.seats_available = seats_available;
    }
    if let Some(contact_number) = update.contact_number {
        ride.contact_number = contact_number;
    }
}

/// Keep only the rides a user browsing under `tab` should see.
fn visible_under_tab(rides: Vec<Ride>, tab: RideType) -> Vec<Ride> {
    let shown = tab.opposite();
    rides
        .into_iter()
        .filter(|ride| ride.ride_type == shown)
        .collect()
}

/// Ride-sharing service.
#[derive(Clone)]
pub struct RideService {
    db: FirestoreDb,
}

impl RideService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Post a new ride tagged with the author and a server-side timestamp.
    pub async fn submit(&self, mut ride: Ride) -> Result<Ride, AppError> {
        ride.id = None;
        ride.created_at = chrono::Utc::now().to_rfc3339();

        let created = self.db.create_ride(&ride).await?;
        tracing::info!(
            user_id = %created.user_id,
            ride_id = created.id.as_deref().unwrap_or(""),
            ride_type = ?created.ride_type,
            "Ride posted"
        );
        Ok(created)
    }

    /// Rides visible under the caller's tab, annotated with whether the
    /// caller already confirmed each one.
    pub async fn list(&self, tab: RideType, user_id: &str) -> Result<Vec<RideListing>, AppError> {
        let rides = self.db.list_rides().await?;
        let confirmed_ids: std::collections::HashSet<String> = self
            .db
            .list_confirmations_for_user(user_id)
            .await?
            .into_iter()
            .map(|c| c.ride_id)
            .collect();

        Ok(visible_under_tab(rides, tab)
            .into_iter()
            .map(|ride| {
                let confirmed = ride
                    .id
                    .as_deref()
                    .is_some_and(|id| confirmed_ids.contains(id));
                RideListing { ride, confirmed }
            })
            .collect())
    }

    /// Merge the provided fields onto a stored ride.
    pub async fn update(&self, ride_id: &str, update: RideUpdate) -> Result<Ride, AppError> {
        let mut ride = self
            .db
            .get_ride(ride_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ride {} not found", ride_id)))?;

        apply_update(&mut ride, update);
        self.db.upsert_ride(ride_id, &ride).await?;

        tracing::info!(ride_id, "Ride updated");
        Ok(ride)
    }

    /// Delete a ride. Ownership is not verified against the caller; any
    /// authenticated user may delete any ride.
    pub async fn delete(&self, ride_id: &str) -> Result<(), AppError> {
        self.db.delete_ride(ride_id).await?;
        tracing::info!(ride_id, "Ride deleted");
        Ok(())
    }

    /// Confirm a ride for the caller. Idempotent by `{ride_id}_{user_id}`
    /// key; confirmations are never revoked.
    pub async fn confirm(&self, ride_id: &str, user_id: &str) -> Result<RideConfirmation, AppError> {
        if self.db.get_ride(ride_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Ride {} not found", ride_id)));
        }

        let confirmation = RideConfirmation {
            ride_id: ride_id.to_string(),
            user_id: user_id.to_string(),
            confirmed_at: chrono::Utc::now().to_rfc3339(),
        };
        self.db.upsert_confirmation(&confirmation).await?;

        tracing::info!(ride_id, user_id, "Ride confirmed");
        Ok(confirmation)
    }

    /// Rides the caller has confirmed, joined with the ride documents.
    /// Confirmations whose ride was deleted since are skipped.
    pub async fn confirmed(&self, user_id: &str) -> Result<Vec<Ride>, AppError> {
        let confirmations = self.db.list_confirmations_for_user(user_id).await?;

        let mut rides = Vec::with_capacity(confirmations.len());
        for confirmation in confirmations {
            match self.db.get_ride(&confirmation.ride_id).await? {
                Some(ride) => rides.push(ride),
                None => {
                    tracing::debug!(
                        ride_id = %confirmation.ride_id,
                        "Confirmed ride no longer exists, skipping"
                    );
                }
            }
        }
        Ok(rides)
    }
}
