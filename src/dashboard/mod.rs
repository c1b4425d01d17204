//! Dashboard statistics aggregator.
//!
//! Pulls six list endpoints concurrently and derives totals, 30-day growth
//! percentages, and chart series. The numbers are display heuristics: they only
//! see the page each list endpoint returns, and timestamps are bucketed in UTC.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::client::ApiClient;
use crate::errors::ClientError;
use crate::models::{Blog, Booking, Order, Product, Puja, Resource, User};
use crate::store::ListQuery;

/// Length of each comparison window.
pub const WINDOW_DAYS: i64 = 30;

/// Months covered by the chart series, current month included.
pub const CHART_MONTHS: usize = 6;

/// Growth of `recent` over `previous`, in percent.
///
/// An empty previous window yields 100 when anything happened recently and 0 otherwise.
pub fn growth_percentage(recent: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if recent > 0.0 { 100.0 } else { 0.0 };
    }
    (recent - previous) / previous * 100.0
}

/// Record counts in the last window and the one before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WindowCounts {
    pub recent: usize,
    pub previous: usize,
}

impl WindowCounts {
    pub fn growth(&self) -> f64 {
        growth_percentage(self.recent as f64, self.previous as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Window {
    Recent,
    Previous,
}

fn window_of(at: DateTime<Utc>, now: DateTime<Utc>) -> Option<Window> {
    let recent_start = now - Duration::days(WINDOW_DAYS);
    let previous_start = recent_start - Duration::days(WINDOW_DAYS);

    if at > recent_start && at <= now {
        Some(Window::Recent)
    } else if at > previous_start && at <= recent_start {
        Some(Window::Previous)
    } else {
        None
    }
}

/// Count timestamps falling in `(now - 30d, now]` and `(now - 60d, now - 30d]`.
///
/// Missing or unparseable timestamps are ignored.
pub fn window_counts<'a, I>(timestamps: I, now: DateTime<Utc>) -> WindowCounts
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = WindowCounts::default();
    for at in timestamps.into_iter().filter_map(parse_timestamp) {
        match window_of(at, now) {
            Some(Window::Recent) => counts.recent += 1,
            Some(Window::Previous) => counts.previous += 1,
            None => {}
        }
    }
    counts
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, or a bare date (read as midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(at.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSummary {
    pub name: String,
    pub total: usize,
    pub recent: usize,
    pub previous: usize,
    pub growth: f64,
    /// The list came back full, so older records were likely cut off
    pub possibly_truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    /// `YYYY-MM`
    pub month: String,
    pub bookings: usize,
    pub orders: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub generated_at: DateTime<Utc>,
    pub total_users: usize,
    pub total_pujas: usize,
    pub total_bookings: usize,
    pub total_orders: usize,
    pub total_products: usize,
    pub total_blogs: usize,
    pub total_revenue: f64,
    pub revenue_growth: f64,
    pub metrics: Vec<MetricSummary>,
    pub monthly: Vec<MonthlyPoint>,
    pub booking_status: BTreeMap<String, usize>,
}

impl DashboardStats {
    pub fn metric(&self, name: &str) -> Option<&MetricSummary> {
        self.metrics.iter().find(|m| m.name == name)
    }
}

/// The raw lists the dashboard is computed from.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub pujas: Vec<Puja>,
    pub bookings: Vec<Booking>,
    pub orders: Vec<Order>,
    pub products: Vec<Product>,
    pub blogs: Vec<Blog>,
}

/// Fetch all six lists concurrently. Any single failure fails the whole snapshot.
pub async fn fetch_snapshot(client: &ApiClient, page_size: u32) -> Result<Snapshot, ClientError> {
    let query = ListQuery::first_page(page_size);

    let (users, pujas, bookings, orders, products, blogs) = tokio::try_join!(
        client.get_with_query::<Vec<User>, _>(User::PATH, &query),
        client.get_with_query::<Vec<Puja>, _>(Puja::PATH, &query),
        client.get_with_query::<Vec<Booking>, _>(Booking::PATH, &query),
        client.get_with_query::<Vec<Order>, _>(Order::PATH, &query),
        client.get_with_query::<Vec<Product>, _>(Product::PATH, &query),
        client.get_with_query::<Vec<Blog>, _>(Blog::PATH, &query),
    )?;

    Ok(Snapshot {
        users,
        pujas,
        bookings,
        orders,
        products,
        blogs,
    })
}

/// Fetch and summarize in one step.
pub async fn collect(
    client: &ApiClient,
    page_size: u32,
    now: DateTime<Utc>,
) -> Result<DashboardStats, ClientError> {
    let snapshot = fetch_snapshot(client, page_size).await?;
    Ok(summarize(&snapshot, page_size, now))
}

fn metric<T: Resource>(name: &str, records: &[T], page_size: u32, now: DateTime<Utc>) -> MetricSummary {
    let counts = window_counts(records.iter().map(|r| r.created_at()), now);
    let possibly_truncated = page_size > 0 && records.len() >= page_size as usize;
    if possibly_truncated {
        tracing::warn!(
            "{} list returned a full page of {}; dashboard figures may be incomplete",
            name,
            page_size
        );
    }

    MetricSummary {
        name: name.to_string(),
        total: records.len(),
        recent: counts.recent,
        previous: counts.previous,
        growth: counts.growth(),
        possibly_truncated,
    }
}

/// Derive totals, growth, and chart series from a snapshot.
pub fn summarize(snapshot: &Snapshot, page_size: u32, now: DateTime<Utc>) -> DashboardStats {
    let metrics = vec![
        metric("users", &snapshot.users, page_size, now),
        metric("pujas", &snapshot.pujas, page_size, now),
        metric("bookings", &snapshot.bookings, page_size, now),
        metric("orders", &snapshot.orders, page_size, now),
        metric("products", &snapshot.products, page_size, now),
        metric("blogs", &snapshot.blogs, page_size, now),
    ];

    // (timestamp, amount) for every revenue-bearing record
    let revenue: Vec<(&str, f64)> = snapshot
        .bookings
        .iter()
        .map(|b| (b.created_at.as_str(), b.total_amount))
        .chain(
            snapshot
                .orders
                .iter()
                .map(|o| (o.created_at.as_str(), o.total_amount)),
        )
        .collect();

    let total_revenue: f64 = revenue.iter().map(|(_, amount)| amount).sum();

    let (mut recent_revenue, mut previous_revenue) = (0.0_f64, 0.0_f64);
    for (at, amount) in &revenue {
        match parse_timestamp(at).and_then(|at| window_of(at, now)) {
            Some(Window::Recent) => recent_revenue += *amount,
            Some(Window::Previous) => previous_revenue += *amount,
            None => {}
        }
    }

    let mut booking_status: BTreeMap<String, usize> = BTreeMap::new();
    for booking in &snapshot.bookings {
        *booking_status
            .entry(booking.status.as_str().to_string())
            .or_insert(0) += 1;
    }

    DashboardStats {
        generated_at: now,
        total_users: snapshot.users.len(),
        total_pujas: snapshot.pujas.len(),
        total_bookings: snapshot.bookings.len(),
        total_orders: snapshot.orders.len(),
        total_products: snapshot.products.len(),
        total_blogs: snapshot.blogs.len(),
        total_revenue,
        revenue_growth: growth_percentage(recent_revenue, previous_revenue),
        metrics,
        monthly: monthly_series(snapshot, now),
        booking_status,
    }
}

fn month_key(at: DateTime<Utc>) -> String {
    format!("{:04}-{:02}", at.year(), at.month())
}

/// Last `CHART_MONTHS` calendar months, oldest first.
fn chart_months(now: DateTime<Utc>) -> Vec<String> {
    let (mut year, mut month) = (now.year(), now.month());
    let mut keys = Vec::with_capacity(CHART_MONTHS);
    for _ in 0..CHART_MONTHS {
        keys.push(format!("{:04}-{:02}", year, month));
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }
    keys.reverse();
    keys
}

fn monthly_series(snapshot: &Snapshot, now: DateTime<Utc>) -> Vec<MonthlyPoint> {
    let mut points: BTreeMap<String, MonthlyPoint> = chart_months(now)
        .into_iter()
        .map(|month| {
            let point = MonthlyPoint {
                month: month.clone(),
                bookings: 0,
                orders: 0,
                revenue: 0.0,
            };
            (month, point)
        })
        .collect();

    for booking in &snapshot.bookings {
        if let Some(key) = bucket_key(&booking.created_at, now) {
            if let Some(point) = points.get_mut(&key) {
                point.bookings += 1;
                point.revenue += booking.total_amount;
            }
        }
    }
    for order in &snapshot.orders {
        if let Some(key) = bucket_key(&order.created_at, now) {
            if let Some(point) = points.get_mut(&key) {
                point.orders += 1;
                point.revenue += order.total_amount;
            }
        }
    }

    points.into_values().collect()
}

fn bucket_key(raw: &str, now: DateTime<Utc>) -> Option<String> {
    parse_timestamp(raw)
        .filter(|at| *at <= now)
        .map(month_key)
}
