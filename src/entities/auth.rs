//! Authentication and payment payloads.

use serde::{Deserialize, Serialize};

/// Body of `POST /login/`.
#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    /// Username (the backend also accepts an email here)
    pub username: String,
    /// Plain password
    pub password: String,
}

/// Access/refresh pair returned by `/login/` and `/token/refresh/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer token
    pub access: String,
    /// Long-lived refresh token
    pub refresh: String,
}

/// Body of `POST /token/refresh/`.
#[derive(Clone, Debug, Serialize)]
pub struct RefreshRequest {
    /// Current refresh token
    pub refresh: String,
}

/// Body of `POST /sign-up/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignUpRequest {
    /// Contact email
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Plain password
    pub password: String,
    /// Login name
    pub username: String,
    /// Phone number as typed
    pub phone_number: String,
}

/// Body of `POST /change-password/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChangePasswordRequest {
    /// Password being replaced
    pub current_password: String,
    /// Replacement
    pub new_password: String,
    /// Replacement, typed twice
    pub confirm_password: String,
}

/// Body of `POST /reset-password/`.
#[derive(Clone, Debug, Serialize)]
pub struct ResetPasswordRequest {
    /// Account email
    pub email: String,
}

/// Body of `POST /reset-password/confirm/{uid}/{token}/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResetPasswordConfirmRequest {
    /// Replacement
    pub new_password: String,
    /// Replacement, typed twice
    pub confirm_password: String,
}

/// Response of `POST /pay/`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PaymentCheckout {
    /// Hosted checkout page, absent when the gateway refused
    #[serde(default)]
    pub checkout_url: Option<String>,
}
