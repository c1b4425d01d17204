//! Booking model: a devotee's reservation of a puja under a plan.

use serde::{Deserialize, Serialize};

use super::{Plan, Puja, Resource, StatusResource, User};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
    #[serde(other)]
    Unknown,
}

/// A chadawa offering added to a booking.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingChadawa {
    pub chadawa_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// A booking, with copies of the puja, plan, and user as they were when booked.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Booking {
    #[serde(flatten, with = "crate::models::record_id")]
    pub id: String,
    pub user_id: String,
    pub puja_id: String,
    pub plan_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub puja: Option<Puja>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    pub chadawas: Vec<BookingChadawa>,
    pub devotee_name: String,
    pub gotra: String,
    /// Manokamna parchi text
    pub wish: String,
    pub booking_date: String,
    pub total_amount: f64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

impl Booking {
    /// Sum of the chadawa add-ons on this booking.
    pub fn chadawa_total(&self) -> f64 {
        self.chadawas
            .iter()
            .map(|c| c.price * f64::from(c.quantity))
            .sum()
    }
}

impl Resource for Booking {
    const PATH: &'static str = "/bookings";
    const LABEL: &'static str = "booking";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl StatusResource for Booking {
    type Status = BookingStatus;
}
