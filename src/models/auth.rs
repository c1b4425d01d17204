//! Authentication request and response bodies.

use serde::{Deserialize, Serialize};

use super::user::validate_email;
use super::{require, User};
use crate::errors::ClientError;

/// Request body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ClientError> {
        require(&self.email, "Email")?;
        validate_email(&self.email)?;
        require(&self.password, "Password")
    }
}

/// Request body for `POST /auth/signup`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Minimum password length accepted by the signup form.
pub const MIN_PASSWORD_LEN: usize = 6;

impl SignupRequest {
    pub fn validate(&self) -> Result<(), ClientError> {
        require(&self.name, "Name")?;
        require(&self.email, "Email")?;
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

/// Response body of login and signup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
