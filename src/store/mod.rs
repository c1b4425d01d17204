//! Client-side store: one independent slice per resource.
//!
//! Every slice follows the same three-phase cycle: `pending` when a request is
//! issued, then `fulfilled` or `rejected` when it settles.

mod auth;
mod dashboard;
mod slice;

pub use auth::*;
pub use dashboard::*;
pub use slice::*;

use serde::Serialize;

use crate::client::ApiClient;
use crate::models::{
    Blog, Booking, Category, Chadawa, Order, Plan, Product, ProductCategory, Puja, Temple, User,
};

/// Query parameters accepted by list endpoints.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    pub fn first_page(limit: u32) -> Self {
        Self {
            page: Some(1),
            limit: Some(limit),
            search: None,
        }
    }
}

/// Every slice of the console, sharing one API client.
#[derive(Debug)]
pub struct AdminStore {
    pub auth: AuthSlice,
    pub pujas: ResourceSlice<Puja>,
    pub plans: ResourceSlice<Plan>,
    pub bookings: ResourceSlice<Booking>,
    pub blogs: ResourceSlice<Blog>,
    pub categories: ResourceSlice<Category>,
    pub product_categories: ResourceSlice<ProductCategory>,
    pub users: ResourceSlice<User>,
    pub temples: ResourceSlice<Temple>,
    pub products: ResourceSlice<Product>,
    pub orders: ResourceSlice<Order>,
    pub chadawas: ResourceSlice<Chadawa>,
    pub dashboard: DashboardSlice,
}

impl AdminStore {
    pub fn new(client: ApiClient, page_size: u32) -> Self {
        Self {
            auth: AuthSlice::new(client.clone()),
            pujas: ResourceSlice::new(client.clone()),
            plans: ResourceSlice::new(client.clone()),
            bookings: ResourceSlice::new(client.clone()),
            blogs: ResourceSlice::new(client.clone()),
            categories: ResourceSlice::new(client.clone()),
            product_categories: ResourceSlice::new(client.clone()),
            users: ResourceSlice::new(client.clone())
                .with_query(ListQuery::first_page(page_size)),
            temples: ResourceSlice::new(client.clone()),
            products: ResourceSlice::new(client.clone()),
            orders: ResourceSlice::new(client.clone()),
            chadawas: ResourceSlice::new(client.clone()),
            dashboard: DashboardSlice::new(client, page_size),
        }
    }
}
