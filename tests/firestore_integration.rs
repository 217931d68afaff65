// SPDX-License-Identifier: MIT

//! Firestore integration tests for the three workflows.
//!
//! These tests require the Firestore emulator to be running
//! (FIRESTORE_EMULATOR_HOST set). Each test uses unique user ids for
//! isolation, so a shared emulator instance is fine.

use rentshare::models::{Availability, Ride, RideType, Vehicle};
use rentshare::services::subscription::RenterDetails;
use rentshare::services::{ListingService, RideService, SubscriptionService};

mod common;
use common::{test_db, unique_suffix};

fn test_vehicle(owner_id: &str, name: &str) -> Vehicle {
    Vehicle {
        id: None,
        vehicle_name: name.to_string(),
        model: "2021".to_string(),
        availability: Availability::Available,
        price: 45.0,
        contact: "555-0100".to_string(),
        owner_id: owner_id.to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn test_ride(user_id: &str, ride_type: RideType) -> Ride {
    Ride {
        id: None,
        ride_type,
        start_address: "A".to_string(),
        end_address: "B".to_string(),
        pincode: None,
        price: 100.0,
        seats_available: 2,
        contact_number: "555".to_string(),
        user_id: user_id.to_string(),
        created_at: String::new(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// VEHICLE LISTING (OWNER)
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_register_then_owner_list_contains_record() {
    require_emulator!();

    let db = test_db().await;
    let listings = ListingService::new(db);
    let owner_id = format!("owner-{}", unique_suffix());

    let before = listings.for_owner(&owner_id).await.unwrap();
    assert!(before.is_empty(), "Fresh owner should have no vehicles");

    let created = listings
        .register(test_vehicle(&owner_id, "Swift"))
        .await
        .unwrap();
    let created_id = created.id.clone().expect("create should assign an id");

    let after = listings.for_owner(&owner_id).await.unwrap();
    assert_eq!(after.len(), 1, "Exactly one record for this owner");

    let fetched = &after[0];
    assert_eq!(fetched.id.as_deref(), Some(created_id.as_str()));
    assert_eq!(fetched.vehicle_name, "Swift");
    assert_eq!(fetched.model, "2021");
    assert_eq!(fetched.price, 45.0);
    assert_eq!(fetched.contact, "555-0100");
    assert_eq!(fetched.owner_id, owner_id);
}

#[tokio::test]
async fn test_delete_then_undo_restores_same_record() {
    require_emulator!();

    let db = test_db().await;
    let listings = ListingService::new(db.clone());
    let owner_id = format!("owner-{}", unique_suffix());

    let created = listings
        .register(test_vehicle(&owner_id, "Polo"))
        .await
        .unwrap();
    let vehicle_id = created.id.clone().unwrap();

    listings.delete(&owner_id, &vehicle_id).await.unwrap();
    assert!(
        db.get_vehicle(&vehicle_id).await.unwrap().is_none(),
        "Vehicle should be gone while the undo window is open"
    );

    let restored = listings.undo_delete(&owner_id).await.unwrap();
    assert_eq!(restored.id.as_deref(), Some(vehicle_id.as_str()));

    let fetched = db.get_vehicle(&vehicle_id).await.unwrap().unwrap();
    assert_eq!(fetched.vehicle_name, "Polo");
    assert_eq!(fetched.owner_id, owner_id);

    // The undo slot is consumed: a second undo has nothing to restore
    assert!(listings.undo_delete(&owner_id).await.is_err());
}

#[tokio::test]
async fn test_undo_after_window_is_noop() {
    require_emulator!();

    let db = test_db().await;
    let listings = ListingService::new(db.clone());
    let owner_id = format!("owner-{}", unique_suffix());

    let created = listings
        .register(test_vehicle(&owner_id, "Jazz"))
        .await
        .unwrap();
    let vehicle_id = created.id.clone().unwrap();

    listings.delete(&owner_id, &vehicle_id).await.unwrap();

    // Let the 5-second undo window elapse
    tokio::time::sleep(std::time::Duration::from_secs(6)).await;

    assert!(
        listings.undo_delete(&owner_id).await.is_err(),
        "Undo after the window should find nothing"
    );
    assert!(
        db.get_vehicle(&vehicle_id).await.unwrap().is_none(),
        "No record should reappear"
    );
}

#[tokio::test]
async fn test_delete_rejects_non_owner() {
    require_emulator!();

    let db = test_db().await;
    let listings = ListingService::new(db.clone());
    let owner_id = format!("owner-{}", unique_suffix());
    let stranger_id = format!("owner-{}", unique_suffix() + 1);

    let created = listings
        .register(test_vehicle(&owner_id, "Brio"))
        .await
        .unwrap();
    let vehicle_id = created.id.clone().unwrap();

    assert!(listings.delete(&stranger_id, &vehicle_id).await.is_err());
    assert!(
        db.get_vehicle(&vehicle_id).await.unwrap().is_some(),
        "Vehicle must survive a stranger's delete attempt"
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// SUBSCRIPTION SAGA
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_authorize_removes_vehicle_and_creates_subscription() {
    require_emulator!();

    let db = test_db().await;
    let listings = ListingService::new(db.clone());
    let subscriptions = SubscriptionService::new(db.clone());

    let owner_id = format!("owner-{}", unique_suffix());
    let renter_id = format!("renter-{}", unique_suffix() + 1);

    let created = listings
        .register(test_vehicle(&owner_id, "City"))
        .await
        .unwrap();
    let vehicle_id = created.id.clone().unwrap();

    let subscription = subscriptions
        .authorize(
            RenterDetails {
                user_id: renter_id.clone(),
                email: "renter@example.com".to_string(),
                name: "Jo Renter".to_string(),
                address: "12 Main St".to_string(),
                needs_driver: true,
            },
            &vehicle_id,
        )
        .await
        .unwrap();

    assert_eq!(subscription.vehicle_id, vehicle_id);
    assert_eq!(subscription.vehicle_name, "City");
    assert!(subscription.authorized);

    // The vehicle left the available pool
    assert!(db.get_vehicle(&vehicle_id).await.unwrap().is_none());
    let pool = listings.available().await.unwrap();
    assert!(pool.iter().all(|v| v.id.as_deref() != Some(vehicle_id.as_str())));

    // Exactly one subscription document, keyed by the renter
    let stored = db.get_subscription(&renter_id).await.unwrap().unwrap();
    assert_eq!(stored.vehicle_id, vehicle_id);
    assert_eq!(stored.user_id, renter_id);

    // The renter profile was upserted with authorized = true
    let profile = db.get_profile(&renter_id).await.unwrap().unwrap();
    assert!(profile.authorized);
    assert_eq!(profile.vehicle_id.as_deref(), Some(vehicle_id.as_str()));

    // A second renter can no longer subscribe to the same vehicle
    let second = subscriptions
        .authorize(
            RenterDetails {
                user_id: format!("renter-{}", unique_suffix() + 2),
                email: "late@example.com".to_string(),
                name: "Late Renter".to_string(),
                address: "9 Side St".to_string(),
                needs_driver: false,
            },
            &vehicle_id,
        )
        .await;
    assert!(second.is_err(), "Vehicle is gone, authorize must 404");
}

#[tokio::test]
async fn test_unsubscribe_restores_vehicle_to_pool() {
    require_emulator!();

    let db = test_db().await;
    let listings = ListingService::new(db.clone());
    let subscriptions = SubscriptionService::new(db.clone());

    let owner_id = format!("owner-{}", unique_suffix());
    let renter_id = format!("renter-{}", unique_suffix() + 1);

    let created = listings
        .register(test_vehicle(&owner_id, "Verna"))
        .await
        .unwrap();
    let vehicle_id = created.id.clone().unwrap();

    subscriptions
        .authorize(
            RenterDetails {
                user_id: renter_id.clone(),
                email: "renter@example.com".to_string(),
                name: "Jo Renter".to_string(),
                address: "12 Main St".to_string(),
                needs_driver: false,
            },
            &vehicle_id,
        )
        .await
        .unwrap();

    let restored = subscriptions.unsubscribe(&renter_id).await.unwrap();
    assert_eq!(restored.id.as_deref(), Some(vehicle_id.as_str()));

    // Vehicle is back under its original id with its original fields
    let fetched = db.get_vehicle(&vehicle_id).await.unwrap().unwrap();
    assert_eq!(fetched.vehicle_name, "Verna");
    assert_eq!(fetched.owner_id, owner_id);

    // And the subscription is gone
    assert!(db.get_subscription(&renter_id).await.unwrap().is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// RIDE SHARING
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_submit_ride_round_trip_under_opposite_tab() {
    require_emulator!();

    let db = test_db().await;
    let rides = RideService::new(db);
    let author_id = format!("user-{}", unique_suffix());
    let browser_id = format!("user-{}", unique_suffix() + 1);

    let created = rides.submit(test_ride(&author_id, RideType::Offer)).await.unwrap();
    let ride_id = created.id.clone().expect("submit should assign an id");
    assert!(!created.created_at.is_empty(), "timestamp is server-assigned");

    // An offer ride shows up for users browsing the "need" tab...
    let listings = rides.list(RideType::Need, &browser_id).await.unwrap();
    let listing = listings
        .iter()
        .find(|l| l.ride.id.as_deref() == Some(ride_id.as_str()))
        .expect("submitted ride should be listed under the opposite tab");

    // ...with all submitted fields unchanged
    assert_eq!(listing.ride.start_address, "A");
    assert_eq!(listing.ride.end_address, "B");
    assert_eq!(listing.ride.price, 100.0);
    assert_eq!(listing.ride.seats_available, 2);
    assert_eq!(listing.ride.contact_number, "555");
    assert_eq!(listing.ride.ride_type, RideType::Offer);
    assert_eq!(listing.ride.user_id, author_id);
    assert!(!listing.confirmed);

    // And never under the "offer" tab itself
    let same_tab = rides.list(RideType::Offer, &browser_id).await.unwrap();
    assert!(same_tab
        .iter()
        .all(|l| l.ride.id.as_deref() != Some(ride_id.as_str())));
}

#[tokio::test]
async fn test_confirm_ride_flow() {
    require_emulator!();

    let db = test_db().await;
    let rides = RideService::new(db);
    let author_id = format!("user-{}", unique_suffix());
    let confirmer_id = format!("user-{}", unique_suffix() + 1);

    let created = rides.submit(test_ride(&author_id, RideType::Offer)).await.unwrap();
    let ride_id = created.id.clone().unwrap();

    rides.confirm(&ride_id, &confirmer_id).await.unwrap();

    // The ride is flagged as confirmed in the confirmer's listing
    let listings = rides.list(RideType::Need, &confirmer_id).await.unwrap();
    let listing = listings
        .iter()
        .find(|l| l.ride.id.as_deref() == Some(ride_id.as_str()))
        .unwrap();
    assert!(listing.confirmed);

    // And appears under "my confirmed rides"
    let confirmed = rides.confirmed(&confirmer_id).await.unwrap();
    assert!(confirmed
        .iter()
        .any(|r| r.id.as_deref() == Some(ride_id.as_str())));

    // Re-confirming is an idempotent overwrite, not a duplicate
    rides.confirm(&ride_id, &confirmer_id).await.unwrap();
    let confirmed_again = rides.confirmed(&confirmer_id).await.unwrap();
    assert_eq!(
        confirmed_again
            .iter()
            .filter(|r| r.id.as_deref() == Some(ride_id.as_str()))
            .count(),
        1
    );
}

#[tokio::test]
async fn test_confirm_missing_ride_fails() {
    require_emulator!();

    let db = test_db().await;
    let rides = RideService::new(db);
    let user_id = format!("user-{}", unique_suffix());

    let result = rides.confirm("no-such-ride", &user_id).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_edit_ride_merges_partial_fields() {
    require_emulator!();

    let db = test_db().await;
    let rides = RideService::new(db.clone());
    let author_id = format!("user-{}", unique_suffix());

    let created = rides.submit(test_ride(&author_id, RideType::Need)).await.unwrap();
    let ride_id = created.id.clone().unwrap();

    let updated = rides
        .update(
            &ride_id,
            rentshare::services::rides::RideUpdate {
                end_address: Some("C".to_string()),
                seats_available: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.end_address, "C");
    assert_eq!(updated.seats_available, 3);
    assert_eq!(updated.start_address, "A", "untouched field keeps its value");

    let stored = db.get_ride(&ride_id).await.unwrap().unwrap();
    assert_eq!(stored.end_address, "C");
    assert_eq!(stored.seats_available, 3);
}

#[tokio::test]
async fn test_delete_ride_removes_document() {
    require_emulator!();

    let db = test_db().await;
    let rides = RideService::new(db.clone());
    let author_id = format!("user-{}", unique_suffix());

    let created = rides.submit(test_ride(&author_id, RideType::Offer)).await.unwrap();
    let ride_id = created.id.clone().unwrap();

    rides.delete(&ride_id).await.unwrap();
    assert!(db.get_ride(&ride_id).await.unwrap().is_none());
}
