//! Chadawa: offering items purchasable with a puja or temple visit.

use serde::{Deserialize, Serialize};

use super::{non_negative, require, Resource};
use crate::errors::ClientError;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Chadawa {
    #[serde(flatten, with = "crate::models::record_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub price_usd: f64,
    pub temple_id: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

impl Resource for Chadawa {
    const PATH: &'static str = "/chadawas";
    const LABEL: &'static str = "chadawa";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn validate(&self) -> Result<(), ClientError> {
        require(&self.name, "Name")?;
        non_negative(self.price, "Price")?;
        non_negative(self.price_usd, "Price (USD)")
    }
}
