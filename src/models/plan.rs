//! Plan model: a pricing tier for pujas.

use serde::{Deserialize, Serialize};

use super::{non_negative, require, Resource};
use crate::errors::ClientError;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Plan {
    #[serde(flatten, with = "crate::models::record_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_inr: f64,
    pub price_usd: f64,
    /// Number of devotees covered by the plan
    pub persons: u32,
    pub features: Vec<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

impl Resource for Plan {
    const PATH: &'static str = "/plans";
    const LABEL: &'static str = "plan";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn validate(&self) -> Result<(), ClientError> {
        require(&self.name, "Name")?;
        non_negative(self.price_inr, "Price (INR)")?;
        non_negative(self.price_usd, "Price (USD)")
    }
}
