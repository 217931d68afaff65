// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod identity;
pub mod listing;
pub mod rides;
pub mod subscription;

pub use identity::{IdentityClient, IdentityError, ProviderIdentity};
pub use listing::ListingService;
pub use rides::RideService;
pub use subscription::SubscriptionService;
