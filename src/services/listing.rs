// SPDX-License-Identifier: MIT

//! Vehicle listing workflow (owner side): register, list, delete with a
//! short undo window.
//!
//! A deleted vehicle is parked in a per-owner undo slot for [`UNDO_WINDOW`].
//! Undoing re-inserts the document under its original id; after the window
//! the slot is cleared and the deletion is final. Only the most recent
//! delete per owner is restorable: a second delete evicts the first
//! pending entry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::Vehicle;

/// How long a deleted vehicle stays restorable.
pub const UNDO_WINDOW: Duration = Duration::from_secs(5);

struct PendingDelete {
    vehicle: Vehicle,
    generation: u64,
    deadline: Instant,
}

/// Per-owner undo slots for recently deleted vehicles.
///
/// Each park bumps a generation counter; the expiry task only clears the
/// slot when the generation still matches, so a stale timer never clears a
/// newer pending delete.
#[derive(Default)]
pub struct UndoBuffer {
    slots: DashMap<String, PendingDelete>,
    generation: AtomicU64,
}

impl UndoBuffer {
    /// Park a deleted vehicle in the owner's slot, evicting any earlier
    /// pending delete. Returns the generation to hand to the expiry task.
    pub fn park(&self, owner_id: &str, vehicle: Vehicle) -> u64 {
        self.park_until(owner_id, vehicle, Instant::now() + UNDO_WINDOW)
    }

    fn park_until(&self, owner_id: &str, vehicle: Vehicle, deadline: Instant) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.slots.insert(
            owner_id.to_string(),
            PendingDelete {
                vehicle,
                generation,
                deadline,
            },
        );
        generation
    }

    /// Clear the owner's slot if it still holds the given generation.
    /// Returns true if the pending delete expired (was cleared).
    pub fn expire(&self, owner_id: &str, generation: u64) -> bool {
        self.slots
            .remove_if(owner_id, |_, pending| pending.generation == generation)
            .is_some()
    }

    /// Take the owner's pending delete. The parked deadline is checked
    /// here as well, so undo cannot succeed past the window even when the
    /// expiry task has not fired yet.
    pub fn take(&self, owner_id: &str) -> Option<Vehicle> {
        let (_, pending) = self.slots.remove(owner_id)?;
        if Instant::now() >= pending.deadline {
            return None;
        }
        Some(pending.vehicle)
    }
}

/// Owner-facing vehicle listing service.
#[derive(Clone)]
pub struct ListingService {
    db: FirestoreDb,
    undo: Arc<UndoBuffer>,
}

impl ListingService {
    pub fn new(db: FirestoreDb) -> Self {
        Self {
            db,
            undo: Arc::new(UndoBuffer::default()),
        }
    }

    /// Register a vehicle listing. Field validation happens at the route
    /// boundary; here the record is written and returned with its id.
    pub async fn register(&self, vehicle: Vehicle) -> Result<Vehicle, AppError> {
        let created = self.db.create_vehicle(&vehicle).await?;
        tracing::info!(
            owner_id = %created.owner_id,
            vehicle_id = created.id.as_deref().unwrap_or(""),
            "Vehicle registered"
        );
        Ok(created)
    }

    /// Every vehicle currently in the available pool.
    pub async fn available(&self) -> Result<Vec<Vehicle>, AppError> {
        self.db.list_vehicles().await
    }

    /// Vehicles listed by one owner.
    pub async fn for_owner(&self, owner_id: &str) -> Result<Vec<Vehicle>, AppError> {
        self.db.list_vehicles_for_owner(owner_id).await
    }

    /// Delete a vehicle and park it in the owner's undo slot.
    ///
    /// The slot is populated only after the delete round-trip succeeds, so
    /// undo can never resurrect a vehicle whose delete failed. Returns the
    /// deleted vehicle.
    pub async fn delete(&self, owner_id: &str, vehicle_id: &str) -> Result<Vehicle, AppError> {
        let vehicle = self
            .db
            .get_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", vehicle_id)))?;

        // Owners can only delete their own listings. Report not-found
        // rather than revealing the listing exists.
        if vehicle.owner_id != owner_id {
            return Err(AppError::NotFound(format!(
                "Vehicle {} not found",
                vehicle_id
            )));
        }

        self.db.delete_vehicle(vehicle_id).await?;

        let generation = self.undo.park(owner_id, vehicle.clone());
        let undo = Arc::clone(&self.undo);
        let owner = owner_id.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(UNDO_WINDOW).await;
            if undo.expire(&owner, generation) {
                tracing::debug!(owner_id = %owner, "Pending vehicle delete expired");
            }
        });

        tracing::info!(owner_id, vehicle_id, "Vehicle deleted (undo window open)");
        Ok(vehicle)
    }

    /// Restore the owner's most recently deleted vehicle, if the undo
    /// window is still open.
    pub async fn undo_delete(&self, owner_id: &str) -> Result<Vehicle, AppError> {
        let vehicle = self
            .undo
            .take(owner_id)
            .ok_or_else(|| AppError::NotFound("Nothing to undo".to_string()))?;

        let id = vehicle
            .id
            .clone()
            .ok_or_else(|| AppError::Database("Parked vehicle has no document id".to_string()))?;

        self.db.upsert_vehicle(&id, &vehicle).await?;

        tracing::info!(owner_id, vehicle_id = %id, "Vehicle delete undone");
        Ok(vehicle)
    }
}
