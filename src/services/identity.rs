// SPDX-License-Identifier: MIT

//! Firebase Auth (Identity Toolkit) REST client.
//!
//! Handles:
//! - Sign-up with email/password
//! - Sign-in with email/password
//! - Mapping provider error codes to typed errors
//!
//! Sessions are not managed here: after the provider accepts the
//! credentials, the auth routes mint a local session JWT.

use crate::error::AppError;
use serde::Deserialize;

/// Production Identity Toolkit endpoint. The Auth emulator exposes the same
/// paths under `http://{host}/identitytoolkit.googleapis.com/v1`.
pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Identity provider client.
#[derive(Clone)]
pub struct IdentityClient {
    http: Option<reqwest::Client>,
    base_url: String,
    api_key: String,
}

/// Identity returned by the provider on successful sign-up or sign-in.
#[derive(Debug, Clone)]
pub struct ProviderIdentity {
    /// Stable provider subject id (`localId`)
    pub user_id: String,
    pub email: String,
}

/// Typed identity provider failures.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("email is already registered")]
    EmailInUse,

    #[error("password rejected: {0}")]
    WeakPassword(String),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("no account found for this email")]
    UserNotFound,

    #[error("incorrect password")]
    WrongPassword,

    #[error("invalid login credentials")]
    InvalidCredential,

    #[error("identity provider rejected the request: {0}")]
    Provider(String),

    #[error("identity provider request failed: {0}")]
    Transport(String),
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match &err {
            // Sign-up rejections are bad input, not failed authentication
            IdentityError::EmailInUse
            | IdentityError::WeakPassword(_)
            | IdentityError::InvalidEmail => AppError::Validation(err.to_string()),
            IdentityError::UserNotFound
            | IdentityError::WrongPassword
            | IdentityError::InvalidCredential => AppError::Credential(err.to_string()),
            IdentityError::Provider(_) | IdentityError::Transport(_) => {
                AppError::IdentityApi(err.to_string())
            }
        }
    }
}

/// Successful response body for signUp / signInWithPassword.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    local_id: String,
    email: String,
}

/// Error envelope returned by the Identity Toolkit API.
#[derive(Deserialize)]
struct AuthErrorResponse {
    error: AuthErrorBody,
}

#[derive(Deserialize)]
struct AuthErrorBody {
    message: String,
}

impl IdentityClient {
    /// Create a new client against the given Identity Toolkit base URL.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: Some(reqwest::Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All provider calls will return a transport error if made.
    pub fn new_mock() -> Self {
        Self {
            http: None,
            base_url: DEFAULT_IDENTITY_URL.to_string(),
            api_key: "offline".to_string(),
        }
    }

    /// Register a new account with the identity provider.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderIdentity, IdentityError> {
        self.credential_request("accounts:signUp", email, password)
            .await
    }

    /// Authenticate an existing account.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderIdentity, IdentityError> {
        self.credential_request("accounts:signInWithPassword", email, password)
            .await
    }

    async fn credential_request(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<ProviderIdentity, IdentityError> {
        let http = self.http.as_ref().ok_or_else(|| {
            IdentityError::Transport("identity provider not configured (offline mode)".to_string())
        })?;

        let url = format!("{}/{}?key={}", self.base_url, endpoint, self.api_key);

        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let response = http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        if response.status().is_success() {
            let auth: AuthResponse = response
                .json()
                .await
                .map_err(|e| IdentityError::Transport(e.to_string()))?;
            return Ok(ProviderIdentity {
                user_id: auth.local_id,
                email: auth.email,
            });
        }

        let status = response.status();
        let message = match response.json::<AuthErrorResponse>().await {
            Ok(envelope) => envelope.error.message,
            Err(_) => format!("HTTP {}", status),
        };

        tracing::warn!(code = %message, "Identity provider rejected credential request");
        Err(classify_provider_error(&message))
    }
}

/// Map an Identity Toolkit error code onto a typed error.
///
/// Codes may carry a trailing explanation, e.g.
/// "WEAK_PASSWORD : Password should be at least 6 characters".
fn classify_provider_error(message: &str) -> IdentityError {
    let (code, detail) = match message.split_once(':') {
        Some((code, detail)) => (code.trim(), detail.trim()),
        None => (message.trim(), ""),
    };

    match code {
        "EMAIL_EXISTS" => IdentityError::EmailInUse,
        "WEAK_PASSWORD" => IdentityError::WeakPassword(detail.to_string()),
        "INVALID_EMAIL" | "MISSING_EMAIL" => IdentityError::InvalidEmail,
        "EMAIL_NOT_FOUND" => IdentityError::UserNotFound,
        "INVALID_PASSWORD" | "MISSING_PASSWORD" => IdentityError::WrongPassword,
        "INVALID_LOGIN_CREDENTIALS" => IdentityError::InvalidCredential,
        _ => IdentityError::Provider(message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_signup_errors() {
        assert!(matches!(
            classify_provider_error("EMAIL_EXISTS"),
            IdentityError::EmailInUse
        ));
        assert!(matches!(
            classify_provider_error("INVALID_EMAIL"),
            IdentityError::InvalidEmail
        ));

        match classify_provider_error("WEAK_PASSWORD : Password should be at least 6 characters") {
            IdentityError::WeakPassword(detail) => {
                assert_eq!(detail, "Password should be at least 6 characters");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_classify_login_errors() {
        assert!(matches!(
            classify_provider_error("EMAIL_NOT_FOUND"),
            IdentityError::UserNotFound
        ));
        assert!(matches!(
            classify_provider_error("INVALID_PASSWORD"),
            IdentityError::WrongPassword
        ));
        assert!(matches!(
            classify_provider_error("INVALID_LOGIN_CREDENTIALS"),
            IdentityError::InvalidCredential
        ));
    }

    #[test]
    fn test_classify_unknown_code() {
        match classify_provider_error("TOO_MANY_ATTEMPTS_TRY_LATER") {
            IdentityError::Provider(code) => assert_eq!(code, "TOO_MANY_ATTEMPTS_TRY_LATER"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_credential_errors_map_to_unauthorized() {
        let err: AppError = IdentityError::WrongPassword.into();
        assert!(matches!(err, AppError::Credential(_)));

        let err: AppError = IdentityError::EmailInUse.into();
        assert!(matches!(err, AppError::Validation(_)));

        let err: AppError = IdentityError::Transport("timeout".to_string()).into();
        assert!(matches!(err, AppError::IdentityApi(_)));
    }

    #[tokio::test]
    async fn test_mock_client_is_offline() {
        let client = IdentityClient::new_mock();
        let result = client.sign_in("a@b.com", "secret123").await;
        assert!(matches!(result, Err(IdentityError::Transport(_))));
    }
}
