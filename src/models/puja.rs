//! Puja model: the bookable ritual service.

use serde::{Deserialize, Serialize};

use super::{optional_price, require, Resource};
use crate::errors::ClientError;

/// Temple details embedded in a puja listing.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PujaTemple {
    pub name: String,
    pub location: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PujaBenefit {
    pub title: String,
    pub description: String,
}

/// Pricing for an optional add-on (dakshina, manokamna parchi, chadawa).
///
/// Prices travel as strings, exactly as entered in the admin form.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AddOnPricing {
    pub enabled: bool,
    pub price_inr: String,
    pub price_usd: String,
}

impl AddOnPricing {
    fn validate(&self, name: &str) -> Result<(), ClientError> {
        optional_price(&self.price_inr, &format!("{} (INR)", name))?;
        optional_price(&self.price_usd, &format!("{} (USD)", name))?;
        if self.enabled && self.price_inr.trim().is_empty() && self.price_usd.trim().is_empty() {
            return Err(ClientError::Validation(format!(
                "{} is enabled but has no price",
                name
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Puja {
    #[serde(flatten, with = "crate::models::record_id")]
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub image: String,
    /// Scheduled date, `YYYY-MM-DD`
    pub date: String,
    pub time: String,
    pub location: String,
    pub temple: PujaTemple,
    pub benefits: Vec<PujaBenefit>,
    pub dakshina: AddOnPricing,
    pub manokamna: AddOnPricing,
    pub chadawa: AddOnPricing,
    pub plan_ids: Vec<String>,
    pub is_active: bool,
    pub is_featured: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

impl Resource for Puja {
    const PATH: &'static str = "/pujas";
    const LABEL: &'static str = "puja";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn validate(&self) -> Result<(), ClientError> {
        require(&self.title, "Title")?;
        require(&self.date, "Date")?;
        if !self.date.trim().is_empty()
            && chrono::NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").is_err()
        {
            return Err(ClientError::Validation(format!(
                "Date {} must be formatted as YYYY-MM-DD",
                self.date
            )));
        }
        self.dakshina.validate("Dakshina")?;
        self.manokamna.validate("Manokamna Parchi")?;
        self.chadawa.validate("Chadawa")?;
        if self.benefits.iter().any(|b| b.title.trim().is_empty()) {
            return Err(ClientError::Validation(
                "Every benefit needs a title".to_string(),
            ));
        }
        Ok(())
    }
}
