//! Store products sold alongside pujas.

use serde::{Deserialize, Serialize};

use super::{non_negative, require, Resource};
use crate::errors::ClientError;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    #[serde(flatten, with = "crate::models::record_id")]
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    /// Zero when no discount applies
    pub discount_price: f64,
    pub stock: i64,
    pub images: Vec<String>,
    pub category_id: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

impl Resource for Product {
    const PATH: &'static str = "/products";
    const LABEL: &'static str = "product";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn validate(&self) -> Result<(), ClientError> {
        require(&self.name, "Name")?;
        non_negative(self.price, "Price")?;
        non_negative(self.discount_price, "Discount price")?;
        if self.discount_price > self.price {
            return Err(ClientError::Validation(
                "Discount price cannot exceed price".to_string(),
            ));
        }
        if self.stock < 0 {
            return Err(ClientError::Validation(
                "Stock cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}
