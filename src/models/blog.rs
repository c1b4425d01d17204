//! Blog posts published on the platform.

use serde::{Deserialize, Serialize};

use super::{require, Resource};
use crate::errors::ClientError;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Blog {
    #[serde(flatten, with = "crate::models::record_id")]
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub thumbnail: String,
    pub author: String,
    pub category_ids: Vec<String>,
    pub tags: Vec<String>,
    pub published_at: String,
    pub is_featured: bool,
    pub is_active: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

impl Resource for Blog {
    const PATH: &'static str = "/blogs";
    const LABEL: &'static str = "blog";
    const IMAGE_FIELD: &'static str = "thumbnail";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn validate(&self) -> Result<(), ClientError> {
        require(&self.title, "Title")?;
        require(&self.content, "Content")?;
        if !self.published_at.is_empty()
            && chrono::DateTime::parse_from_rfc3339(&self.published_at).is_err()
        {
            return Err(ClientError::Validation(format!(
                "Publish time {} is not a valid timestamp",
                self.published_at
            )));
        }
        Ok(())
    }
}
