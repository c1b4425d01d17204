//! Platform user accounts.

use serde::{Deserialize, Serialize};

use super::{require, Refresh, Resource};
use crate::errors::ClientError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
    #[serde(other)]
    Unknown,
}

/// A registered user of the platform.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(flatten, with = "crate::models::record_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub gotra: String,
    pub address: String,
    pub is_active: bool,
    pub is_verified: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl Resource for User {
    const PATH: &'static str = "/users";
    const LABEL: &'static str = "user";
    const REFRESH: Refresh = Refresh::Splice;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn validate(&self) -> Result<(), ClientError> {
        require(&self.name, "Name")?;
        require(&self.email, "Email")?;
        validate_email(&self.email)
    }
}

pub(crate) fn validate_email(email: &str) -> Result<(), ClientError> {
    let valid = match email.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !valid {
        return Err(ClientError::Validation(format!(
            "{} is not a valid email address",
            email
        )));
    }
    Ok(())
}
