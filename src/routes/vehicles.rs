// SPDX-License-Identifier: MIT

//! Vehicle listing routes (owner workflow) and the public browse endpoint.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{validation_error, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Availability, Vehicle};
use crate::AppState;

/// Public routes: renters browse the pool without a session.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/vehicles", get(list_available))
}

/// Owner routes (require authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/vehicles", post(register))
        .route("/api/vehicles/mine", get(list_mine))
        .route("/api/vehicles/undo", post(undo_delete))
        .route("/api/vehicles/{id}", delete(remove))
}

/// Vehicle as exposed by the API (document id flattened into the body).
#[derive(Serialize)]
pub struct VehicleResponse {
    pub id: String,
    pub vehicle_name: String,
    pub model: String,
    pub availability: Availability,
    pub price: f64,
    pub contact: String,
    pub owner_id: String,
    pub created_at: String,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id.unwrap_or_default(),
            vehicle_name: vehicle.vehicle_name,
            model: vehicle.model,
            availability: vehicle.availability,
            price: vehicle.price,
            contact: vehicle.contact,
            owner_id: vehicle.owner_id,
            created_at: vehicle.created_at,
        }
    }
}

// ─── Browse (renter side) ────────────────────────────────────

/// Every vehicle currently rentable. Presence in the collection is the
/// availability signal; there is no server-side flag filter.
async fn list_available(State(state): State<Arc<AppState>>) -> Result<Json<Vec<VehicleResponse>>> {
    let vehicles = state.listings.available().await?;
    Ok(Json(vehicles.into_iter().map(Into::into).collect()))
}

// ─── Register ────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct RegisterVehicleRequest {
    #[validate(length(min = 1, message = "vehicle name is required"))]
    pub vehicle_name: String,
    #[validate(length(min = 1, message = "model is required"))]
    pub model: String,
    #[serde(default)]
    pub availability: Availability,
    #[validate(range(min = 0.01, message = "price must be positive"))]
    pub price: f64,
    #[validate(length(min = 1, message = "contact is required"))]
    pub contact: String,
}

/// Response to a successful registration: the new record plus the owner's
/// refreshed list.
#[derive(Serialize)]
pub struct RegisterVehicleResponse {
    pub vehicle: VehicleResponse,
    pub vehicles: Vec<VehicleResponse>,
}

async fn register(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<RegisterVehicleRequest>,
) -> Result<Json<RegisterVehicleResponse>> {
    req.validate().map_err(validation_error)?;

    let vehicle = Vehicle {
        id: None,
        vehicle_name: req.vehicle_name,
        model: req.model,
        availability: req.availability,
        price: req.price,
        contact: req.contact,
        owner_id: user.user_id.clone(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    let created = state.listings.register(vehicle).await?;

    // Re-read the owner's list so the client view refreshes from the store
    // rather than trusting its local copy.
    let vehicles = state.listings.for_owner(&user.user_id).await?;

    Ok(Json(RegisterVehicleResponse {
        vehicle: created.into(),
        vehicles: vehicles.into_iter().map(Into::into).collect(),
    }))
}

// ─── Owner list / delete / undo ──────────────────────────────

async fn list_mine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<VehicleResponse>>> {
    let vehicles = state.listings.for_owner(&user.user_id).await?;
    Ok(Json(vehicles.into_iter().map(Into::into).collect()))
}

#[derive(Serialize)]
pub struct DeleteVehicleResponse {
    pub deleted: VehicleResponse,
    /// Seconds the deletion can still be undone for
    pub undo_window_secs: u64,
}

async fn remove(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteVehicleResponse>> {
    let deleted = state.listings.delete(&user.user_id, &id).await?;

    Ok(Json(DeleteVehicleResponse {
        deleted: deleted.into(),
        undo_window_secs: crate::services::listing::UNDO_WINDOW.as_secs(),
    }))
}

/// Restore the caller's most recently deleted vehicle. 404 once the undo
/// window has elapsed (or if nothing was deleted).
async fn undo_delete(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<VehicleResponse>> {
    let restored = state.listings.undo_delete(&user.user_id).await?;
    Ok(Json(restored.into()))
}
