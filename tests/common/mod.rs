// SPDX-License-Identifier: MIT

use rentshare::config::Config;
use rentshare::db::FirestoreDb;
use rentshare::routes::create_router;
use rentshare::services::{IdentityClient, ListingService, RideService, SubscriptionService};
use rentshare::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();

    let state = Arc::new(AppState {
        config,
        db: db.clone(),
        identity: IdentityClient::new_mock(),
        listings: ListingService::new(db.clone()),
        subscriptions: SubscriptionService::new(db.clone()),
        rides: RideService::new(db),
    });

    (create_router(state.clone()), state)
}

/// Mint a session JWT for tests.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, email: &str, signing_key: &[u8]) -> String {
    rentshare::middleware::auth::create_jwt(user_id, email, signing_key)
        .expect("JWT creation should succeed")
}

/// A unique id suffix for test isolation across runs.
#[allow(dead_code)]
pub fn unique_suffix() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos() as u64
}
