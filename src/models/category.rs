//! Blog and product categories.

use serde::{Deserialize, Serialize};

use super::{require, Resource};
use crate::errors::ClientError;

/// A blog category.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    #[serde(flatten, with = "crate::models::record_id")]
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

impl Resource for Category {
    const PATH: &'static str = "/categories";
    const LABEL: &'static str = "category";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn validate(&self) -> Result<(), ClientError> {
        require(&self.name, "Name")
    }
}

/// A store category grouping products.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductCategory {
    #[serde(flatten, with = "crate::models::record_id")]
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

impl Resource for ProductCategory {
    const PATH: &'static str = "/product-categories";
    const LABEL: &'static str = "product category";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn validate(&self) -> Result<(), ClientError> {
        require(&self.name, "Name")
    }
}
