// SPDX-License-Identifier: MIT

//! Signup, login, logout, and current-session routes.
//!
//! Credentials are checked by the identity provider; on success a local
//! session JWT is minted and delivered both in the response body and as an
//! http-only cookie.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{validation_error, AppError, Result};
use crate::middleware::auth::{create_jwt, AuthUser, SESSION_COOKIE};
use crate::models::UserProfile;
use crate::services::ProviderIdentity;
use crate::AppState;

/// Public auth routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Session routes (require authentication).
pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/me", get(me))
}

#[derive(Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
}

/// Established session returned after signup or login.
#[derive(Serialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub email: String,
    pub token: String,
}

fn establish_session(
    state: &AppState,
    jar: CookieJar,
    identity: ProviderIdentity,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let token = create_jwt(&identity.user_id, &identity.email, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            user_id: identity.user_id,
            email: identity.email,
            token,
        }),
    ))
}

/// Register a new account with the identity provider and open a session.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<CredentialsRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    req.validate().map_err(validation_error)?;

    let identity = state.identity.sign_up(&req.email, &req.password).await?;

    tracing::info!(user_id = %identity.user_id, "User signed up");
    establish_session(&state, jar, identity)
}

/// Authenticate an existing account and open a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<CredentialsRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    req.validate().map_err(validation_error)?;

    let identity = state.identity.sign_in(&req.email, &req.password).await?;

    tracing::info!(user_id = %identity.user_id, "User logged in");
    establish_session(&state, jar, identity)
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Close the session by clearing the cookie. The JWT itself stays valid
/// until expiry; clients also drop their stored copy.
async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");

    (jar.remove(cookie), Json(LogoutResponse { success: true }))
}

/// Current session lookup: the session identity plus the stored renter
/// profile, if the subscription flow has created one.
#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: String,
    pub email: String,
    pub profile: Option<UserProfile>,
}

async fn me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let profile = state.db.get_profile(&user.user_id).await?;

    Ok(Json(MeResponse {
        user_id: user.user_id,
        email: user.email,
        profile,
    }))
}
