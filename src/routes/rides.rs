// SPDX-License-Identifier: MIT

//! Ride-sharing routes.

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{validation_error, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Ride, RideConfirmation, RideType};
use crate::services::rides::{RideListing, RideUpdate};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/rides", get(list).post(submit))
        .route("/api/rides/confirmed", get(confirmed))
        .route("/api/rides/{id}", patch(update).delete(remove))
        .route("/api/rides/{id}/confirm", post(confirm))
}

/// Ride as exposed by the API.
#[derive(Serialize)]
pub struct RideResponse {
    pub id: String,
    pub ride_type: RideType,
    pub start_address: String,
    pub end_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    pub price: f64,
    pub seats_available: u32,
    pub contact_number: String,
    pub user_id: String,
    pub created_at: String,
}

impl From<Ride> for RideResponse {
    fn from(ride: Ride) -> Self {
        Self {
            id: ride.id.unwrap_or_default(),
            ride_type: ride.ride_type,
            start_address: ride.start_address,
            end_address: ride.end_address,
            pincode: ride.pincode,
            price: ride.price,
            seats_available: ride.seats_available,
            contact_number: ride.contact_number,
            user_id: ride.user_id,
            created_at: ride.created_at,
        }
    }
}

/// Ride in a browse listing, annotated for the caller.
#[derive(Serialize)]
pub struct RideListingResponse {
    #[serde(flatten)]
    pub ride: RideResponse,
    /// The caller already confirmed this ride; the confirm action is gone
    pub confirmed: bool,
}

impl From<RideListing> for RideListingResponse {
    fn from(listing: RideListing) -> Self {
        Self {
            ride: listing.ride.into(),
            confirmed: listing.confirmed,
        }
    }
}

// ─── Browse ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct RideListQuery {
    /// The caller's selected tab; rides of the opposite type are shown
    tab: RideType,
}

async fn list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<RideListQuery>,
) -> Result<Json<Vec<RideListingResponse>>> {
    let listings = state.rides.list(query.tab, &user.user_id).await?;
    Ok(Json(listings.into_iter().map(Into::into).collect()))
}

// ─── Submit / edit / delete ──────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct SubmitRideRequest {
    pub ride_type: RideType,
    #[validate(length(min = 1, message = "start address is required"))]
    pub start_address: String,
    #[validate(length(min = 1, message = "end address is required"))]
    pub end_address: String,
    #[serde(default)]
    pub pincode: Option<String>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(range(min = 1, message = "at least one seat is required"))]
    pub seats_available: u32,
    #[validate(length(min = 1, message = "contact number is required"))]
    pub contact_number: String,
}

async fn submit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SubmitRideRequest>,
) -> Result<Json<RideResponse>> {
    req.validate().map_err(validation_error)?;

    let ride = Ride {
        id: None,
        ride_type: req.ride_type,
        start_address: req.start_address,
        end_address: req.end_address,
        pincode: req.pincode,
        price: req.price,
        seats_available: req.seats_available,
        contact_number: req.contact_number,
        user_id: user.user_id,
        created_at: String::new(), // assigned server-side on submit
    };

    let created = state.rides.submit(ride).await?;
    Ok(Json(created.into()))
}

#[derive(Deserialize, Validate)]
pub struct UpdateRideRequest {
    #[serde(default)]
    pub ride_type: Option<RideType>,
    #[serde(default)]
    #[validate(length(min = 1, message = "start address must not be empty"))]
    pub start_address: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "end address must not be empty"))]
    pub end_address: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 1, message = "at least one seat is required"))]
    pub seats_available: Option<u32>,
    #[serde(default)]
    #[validate(length(min = 1, message = "contact number must not be empty"))]
    pub contact_number: Option<String>,
}

/// Partial edit: absent fields keep their stored value.
async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRideRequest>,
) -> Result<Json<RideResponse>> {
    req.validate().map_err(validation_error)?;

    let updated = state
        .rides
        .update(
            &id,
            RideUpdate {
                ride_type: req.ride_type,
                start_address: req.start_address,
                end_address: req.end_address,
                pincode: req.pincode,
                price: req.price,
                seats_available: req.seats_available,
                contact_number: req.contact_number,
            },
        )
        .await?;

    Ok(Json(updated.into()))
}

#[derive(Serialize)]
pub struct DeleteRideResponse {
    pub success: bool,
}

async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteRideResponse>> {
    state.rides.delete(&id).await?;
    Ok(Json(DeleteRideResponse { success: true }))
}

// ─── Confirm ─────────────────────────────────────────────────

async fn confirm(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<RideConfirmation>> {
    let confirmation = state.rides.confirm(&id, &user.user_id).await?;
    Ok(Json(confirmation))
}

async fn confirmed(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<RideResponse>>> {
    let rides = state.rides.confirmed(&user.user_id).await?;
    Ok(Json(rides.into_iter().map(Into::into).collect()))
}
