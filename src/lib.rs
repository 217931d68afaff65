// SPDX-License-Identifier: MIT

//! RentShare: vehicle rental marketplace with peer ride sharing.
//!
//! This crate provides the backend API for listing vehicles, subscribing
//! to rentals, and offering or requesting shared rides. All persistent
//! state lives in Firestore; authentication is delegated to the Firebase
//! Auth (Identity Toolkit) REST API.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::{IdentityClient, ListingService, RideService, SubscriptionService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub identity: IdentityClient,
    pub listings: ListingService,
    pub subscriptions: SubscriptionService,
    pub rides: RideService,
}
