// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod profile;
pub mod ride;
pub mod subscription;
pub mod vehicle;

pub use profile::UserProfile;
pub use ride::{Ride, RideConfirmation, RideType};
pub use subscription::Subscription;
pub use vehicle::{Availability, Vehicle};
