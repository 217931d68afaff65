// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Vehicles (rental listings)
//! - Users (renter profiles)
//! - Subscriptions (active rentals, keyed by user id)
//! - Rides and ride confirmations (peer ride sharing)
//!
//! None of these operations are transactional across documents. Callers
//! performing related writes (the subscription saga, the delete-undo
//! restore) must accept that a failure mid-sequence leaves earlier writes
//! committed.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Ride, RideConfirmation, Subscription, UserProfile, Vehicle};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Vehicle Operations ──────────────────────────────────────

    /// Create a vehicle listing with a generated document id.
    ///
    /// Returns the stored vehicle with `id` populated.
    pub async fn create_vehicle(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        self.get_client()?
            .fluent()
            .insert()
            .into(collections::VEHICLES)
            .generate_document_id()
            .object(vehicle)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a vehicle by document id.
    pub async fn get_vehicle(&self, id: &str) -> Result<Option<Vehicle>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::VEHICLES)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List every vehicle in the available pool.
    ///
    /// There is no availability filter: documents present in the collection
    /// are available because subscribing removes them.
    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::VEHICLES)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List vehicles owned by one user.
    pub async fn list_vehicles_for_owner(&self, owner_id: &str) -> Result<Vec<Vehicle>, AppError> {
        let owner_id = owner_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::VEHICLES)
            .filter(move |q| q.field("owner_id").eq(owner_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create-or-overwrite a vehicle under a known document id.
    ///
    /// Used to restore a deleted vehicle (delete-undo, unsubscribe) with
    /// its original id and fields.
    pub async fn upsert_vehicle(&self, id: &str, vehicle: &Vehicle) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::VEHICLES)
            .document_id(id)
            .object(vehicle)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a vehicle listing.
    pub async fn delete_vehicle(&self, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::VEHICLES)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Renter Profile Operations ───────────────────────────────

    /// Get a renter profile by identity-provider subject id.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a renter profile.
    pub async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&profile.user_id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Subscription Operations ─────────────────────────────────

    /// Get the active subscription for a user, if any.
    pub async fn get_subscription(&self, user_id: &str) -> Result<Option<Subscription>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SUBSCRIPTIONS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace the subscription document for a user.
    pub async fn upsert_subscription(&self, subscription: &Subscription) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SUBSCRIPTIONS)
            .document_id(&subscription.user_id)
            .object(subscription)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete the subscription document for a user.
    pub async fn delete_subscription(&self, user_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::SUBSCRIPTIONS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Ride Operations ─────────────────────────────────────────

    /// Create a ride with a generated document id.
    pub async fn create_ride(&self, ride: &Ride) -> Result<Ride, AppError> {
        self.get_client()?
            .fluent()
            .insert()
            .into(collections::RIDES)
            .generate_document_id()
            .object(ride)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a ride by document id.
    pub async fn get_ride(&self, id: &str) -> Result<Option<Ride>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::RIDES)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List every posted ride.
    pub async fn list_rides(&self) -> Result<Vec<Ride>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::RIDES)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replace a ride under a known document id (used for edits after a
    /// read-modify-write merge).
    pub async fn upsert_ride(&self, id: &str, ride: &Ride) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::RIDES)
            .document_id(id)
            .object(ride)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a ride.
    pub async fn delete_ride(&self, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::RIDES)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Ride Confirmation Operations ────────────────────────────

    /// Record that a user confirmed a ride.
    ///
    /// Keyed by `{ride_id}_{user_id}`, so re-confirming is an idempotent
    /// overwrite.
    pub async fn upsert_confirmation(
        &self,
        confirmation: &RideConfirmation,
    ) -> Result<(), AppError> {
        let doc_id = format!("{}_{}", confirmation.ride_id, confirmation.user_id);
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::CONFIRMED_RIDES)
            .document_id(&doc_id)
            .object(confirmation)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List all confirmations made by a user.
    pub async fn list_confirmations_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<RideConfirmation>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::CONFIRMED_RIDES)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
