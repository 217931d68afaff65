// SPDX-License-Identifier: MIT

//! RentShare API Server
//!
//! Vehicle rental marketplace with peer ride sharing, backed by Firestore
//! and the Firebase Auth identity provider.

use rentshare::{
    config::Config,
    db::FirestoreDb,
    services::{IdentityClient, ListingService, RideService, SubscriptionService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting RentShare API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Identity provider client
    let identity = IdentityClient::new(&config.identity_url, &config.firebase_api_key);
    tracing::info!(url = %config.identity_url, "Identity provider client initialized");

    // Workflow services
    let listings = ListingService::new(db.clone());
    let subscriptions = SubscriptionService::new(db.clone());
    let rides = RideService::new(db.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        identity,
        listings,
        subscriptions,
        rides,
    });

    // Build router
    let app = rentshare::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rentshare=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
