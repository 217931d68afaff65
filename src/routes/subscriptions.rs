// SPDX-License-Identifier: MIT

//! Subscription routes (renter workflow).
//!
//! The browse → terms → details → driver-choice progression lives in the
//! client; this boundary enforces the gate conditions (terms accepted,
//! details complete, license named when self-driving) before the
//! authorization saga runs.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{validation_error, AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Subscription;
use crate::routes::vehicles::VehicleResponse;
use crate::services::subscription::RenterDetails;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/subscriptions", post(authorize))
        .route("/api/subscriptions/me", get(current).delete(unsubscribe))
}

#[derive(Deserialize, Validate)]
pub struct AuthorizeRequest {
    #[validate(length(min = 1, message = "vehicle id is required"))]
    pub vehicle_id: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    pub needs_driver: bool,
    pub terms_accepted: bool,
    /// Required when the renter drives themselves; the file name's
    /// presence is the proof, the content is never uploaded.
    #[serde(default)]
    pub license_file_name: Option<String>,
}

/// Subscription as exposed by the API (the internal vehicle snapshot is
/// not included).
#[derive(Serialize)]
pub struct SubscriptionResponse {
    pub user_id: String,
    pub email: String,
    pub vehicle_id: String,
    pub vehicle_name: String,
    pub needs_driver: bool,
    pub authorized: bool,
    pub subscribed_at: String,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            user_id: subscription.user_id,
            email: subscription.email,
            vehicle_id: subscription.vehicle_id,
            vehicle_name: subscription.vehicle_name,
            needs_driver: subscription.needs_driver,
            authorized: subscription.authorized,
            subscribed_at: subscription.subscribed_at,
        }
    }
}

/// Run the subscription authorization saga for the chosen vehicle.
///
/// The renter's email comes from the session claims (pre-filled and
/// read-only in the form).
async fn authorize(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AuthorizeRequest>,
) -> Result<Json<SubscriptionResponse>> {
    req.validate().map_err(validation_error)?;

    if !req.terms_accepted {
        return Err(AppError::Validation(
            "terms must be accepted before subscribing".to_string(),
        ));
    }

    if !req.needs_driver
        && req
            .license_file_name
            .as_deref()
            .map_or(true, |name| name.trim().is_empty())
    {
        return Err(AppError::Validation(
            "a license file is required when driving yourself".to_string(),
        ));
    }

    let details = RenterDetails {
        user_id: user.user_id,
        email: user.email,
        name: req.full_name,
        address: req.address,
        needs_driver: req.needs_driver,
    };

    let subscription = state
        .subscriptions
        .authorize(details, &req.vehicle_id)
        .await?;

    Ok(Json(subscription.into()))
}

/// The caller's active subscription.
async fn current(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SubscriptionResponse>> {
    let subscription = state
        .subscriptions
        .current(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No active subscription".to_string()))?;

    Ok(Json(subscription.into()))
}

#[derive(Serialize)]
pub struct UnsubscribeResponse {
    /// The vehicle returned to the available pool
    pub restored: VehicleResponse,
}

/// Cancel the caller's subscription and return the vehicle to the pool.
async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UnsubscribeResponse>> {
    let restored = state.subscriptions.unsubscribe(&user.user_id).await?;

    Ok(Json(UnsubscribeResponse {
        restored: restored.into(),
    }))
}
