//! Dashboard slice: the last computed aggregate and its request state.

use chrono::Utc;
use serde::Serialize;

use crate::client::ApiClient;
use crate::dashboard::{self, DashboardStats};
use crate::errors::ClientError;

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub stats: Option<DashboardStats>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Read-only slice holding the last dashboard aggregate.
#[derive(Debug)]
pub struct DashboardSlice {
    client: ApiClient,
    page_size: u32,
    state: DashboardState,
}

impl DashboardSlice {
    pub fn new(client: ApiClient, page_size: u32) -> Self {
        Self {
            client,
            page_size,
            state: DashboardState::default(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Recompute the aggregate. A failed fetch keeps the previous stats.
    pub async fn fetch(&mut self) -> Result<&DashboardStats, ClientError> {
        self.state.loading = true;
        self.state.error = None;

        match dashboard::collect(&self.client, self.page_size, Utc::now()).await {
            Ok(stats) => {
                tracing::debug!(
                    "Dashboard refreshed: {} bookings, {} orders, revenue {:.2}",
                    stats.total_bookings,
                    stats.total_orders,
                    stats.total_revenue
                );
                self.state.loading = false;
                Ok(self.state.stats.insert(stats))
            }
            Err(e) => {
                tracing::warn!("dashboard request failed: {}", e);
                self.state.loading = false;
                self.state.error = Some(e.message());
                Err(e)
            }
        }
    }
}
