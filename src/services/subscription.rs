// SPDX-License-Identifier: MIT

//! Vehicle subscription workflow: the authorization saga and unsubscribe.
//!
//! Authorization touches three collections in sequence with no
//! transactional guarantee. The saga makes each step explicit so a
//! mid-sequence failure is logged and reported with the step it died at,
//! instead of leaving an anonymous half-written state.

use std::fmt;

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{Subscription, UserProfile, Vehicle};

/// Store operations the subscription workflow performs.
///
/// [`FirestoreDb`] is the production implementation; tests substitute an
/// in-memory store to drive failure paths a live store will not produce
/// on demand.
#[allow(async_fn_in_trait)]
pub trait SubscriptionStore {
    async fn get_vehicle(&self, id: &str) -> Result<Option<Vehicle>, AppError>;
    async fn upsert_vehicle(&self, id: &str, vehicle: &Vehicle) -> Result<(), AppError>;
    async fn delete_vehicle(&self, id: &str) -> Result<(), AppError>;
    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), AppError>;
    async fn get_subscription(&self, user_id: &str) -> Result<Option<Subscription>, AppError>;
    async fn upsert_subscription(&self, subscription: &Subscription) -> Result<(), AppError>;
    async fn delete_subscription(&self, user_id: &str) -> Result<(), AppError>;
}

impl SubscriptionStore for FirestoreDb {
    async fn get_vehicle(&self, id: &str) -> Result<Option<Vehicle>, AppError> {
        FirestoreDb::get_vehicle(self, id).await
    }

    async fn upsert_vehicle(&self, id: &str, vehicle: &Vehicle) -> Result<(), AppError> {
        FirestoreDb::upsert_vehicle(self, id, vehicle).await
    }

    async fn delete_vehicle(&self, id: &str) -> Result<(), AppError> {
        FirestoreDb::delete_vehicle(self, id).await
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        FirestoreDb::upsert_profile(self, profile).await
    }

    async fn get_subscription(&self, user_id: &str) -> Result<Option<Subscription>, AppError> {
        FirestoreDb::get_subscription(self, user_id).await
    }

    async fn upsert_subscription(&self, subscription: &Subscription) -> Result<(), AppError> {
        FirestoreDb::upsert_subscription(self, subscription).await
    }

    async fn delete_subscription(&self, user_id: &str) -> Result<(), AppError> {
        FirestoreDb::delete_subscription(self, user_id).await
    }
}

/// Steps of the authorization saga, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaStep {
    /// Upsert `users/{user_id}` with renter details and `authorized = true`
    ProfileUpsert,
    /// Upsert `subscriptions/{user_id}` with the vehicle snapshot
    SubscriptionWrite,
    /// Delete `vehicles/{vehicle_id}` from the available pool
    VehicleRemoval,
}

impl fmt::Display for SagaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SagaStep::ProfileUpsert => "profile-upsert",
            SagaStep::SubscriptionWrite => "subscription-write",
            SagaStep::VehicleRemoval => "vehicle-removal",
        };
        f.write_str(name)
    }
}

/// Renter details collected by the subscription form.
#[derive(Debug, Clone)]
pub struct RenterDetails {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub address: String,
    pub needs_driver: bool,
}

/// Subscription workflow service.
#[derive(Clone)]
pub struct SubscriptionService<S = FirestoreDb> {
    db: S,
}

impl<S: SubscriptionStore> SubscriptionService<S> {
    pub fn new(db: S) -> Self {
        Self { db }
    }

    /// Run the authorization saga for a renter against a vehicle.
    ///
    /// Sequence: profile upsert, subscription write, vehicle removal.
    /// Failures in the first two steps leave earlier writes in place
    /// (accepted at-most-once risk); a failure removing the vehicle
    /// triggers best-effort compensation by deleting the subscription
    /// document, so a vehicle never appears both rentable and rented.
    pub async fn authorize(
        &self,
        details: RenterDetails,
        vehicle_id: &str,
    ) -> Result<Subscription, AppError> {
        // The vehicle must still be in the pool; someone else may have
        // subscribed since the renter started the flow.
        let vehicle = self
            .db
            .get_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", vehicle_id)))?;

        let now = chrono::Utc::now().to_rfc3339();

        let profile = UserProfile {
            user_id: details.user_id.clone(),
            email: details.email.clone(),
            name: details.name.clone(),
            address: details.address.clone(),
            authorized: true,
            vehicle_id: Some(vehicle_id.to_string()),
            vehicle_name: Some(vehicle.vehicle_name.clone()),
        };

        let subscription = Subscription {
            user_id: details.user_id.clone(),
            email: details.email,
            vehicle_id: vehicle_id.to_string(),
            vehicle_name: vehicle.vehicle_name.clone(),
            needs_driver: details.needs_driver,
            authorized: true,
            subscribed_at: now,
            vehicle: vehicle.clone(),
        };

        if let Err(e) = self.db.upsert_profile(&profile).await {
            return Err(self.fail(SagaStep::ProfileUpsert, &details.user_id, e));
        }

        if let Err(e) = self.db.upsert_subscription(&subscription).await {
            return Err(self.fail(SagaStep::SubscriptionWrite, &details.user_id, e));
        }

        if let Err(e) = self.db.delete_vehicle(vehicle_id).await {
            // Compensate: without this the vehicle stays rentable while a
            // subscription for it exists.
            if let Err(comp) = self.db.delete_subscription(&details.user_id).await {
                tracing::error!(
                    user_id = %details.user_id,
                    vehicle_id,
                    error = %comp,
                    "Saga compensation failed; subscription left referencing an available vehicle"
                );
            }
            return Err(self.fail(SagaStep::VehicleRemoval, &details.user_id, e));
        }

        tracing::info!(
            user_id = %subscription.user_id,
            vehicle_id,
            needs_driver = subscription.needs_driver,
            "Subscription authorized"
        );

        Ok(subscription)
    }

    fn fail(&self, step: SagaStep, user_id: &str, err: AppError) -> AppError {
        tracing::error!(user_id, step = %step, error = %err, "Subscription saga failed");
        AppError::Database(format!("subscription saga failed at {}: {}", step, err))
    }

    /// The caller's active subscription, if any.
    pub async fn current(&self, user_id: &str) -> Result<Option<Subscription>, AppError> {
        self.db.get_subscription(user_id).await
    }

    /// Cancel the caller's subscription.
    ///
    /// The vehicle is restored from the snapshot first, then the
    /// subscription is deleted; if the delete fails the user can retry
    /// without the vehicle being lost (the restore is an idempotent
    /// upsert under the original id).
    pub async fn unsubscribe(&self, user_id: &str) -> Result<Vehicle, AppError> {
        let subscription = self
            .db
            .get_subscription(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No active subscription".to_string()))?;

        self.db
            .upsert_vehicle(&subscription.vehicle_id, &subscription.vehicle)
            .await?;

        self.db.delete_subscription(user_id).await?;

        tracing::info!(
            user_id,
            vehicle_id = %subscription.vehicle_id,
            "Subscription cancelled, vehicle returned to pool"
        );

        let mut vehicle = subscription.vehicle;
        vehicle.id = Some(subscription.vehicle_id);
        Ok(vehicle)
    }
}
