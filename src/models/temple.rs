//! Temples hosting pujas.

use serde::{Deserialize, Serialize};

use super::{require, Resource};
use crate::errors::ClientError;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Temple {
    #[serde(flatten, with = "crate::models::record_id")]
    pub id: String,
    pub name: String,
    pub location: String,
    pub description: String,
    pub deity: String,
    pub images: Vec<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

impl Resource for Temple {
    const PATH: &'static str = "/temples";
    const LABEL: &'static str = "temple";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn validate(&self) -> Result<(), ClientError> {
        require(&self.name, "Name")?;
        require(&self.location, "Location")
    }
}
