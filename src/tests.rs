//! Integration tests for the admin console against an in-process mock API.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRequest, Multipart, Path, RawQuery, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::client::{ApiClient, Upload};
use crate::config::Config;
use crate::errors::ClientError;
use crate::models::{
    Blog, BookingStatus, LoginRequest, OrderStatus, Plan, Puja, SignupRequest, Temple, UserRole,
};
use crate::session::{FileTokenStore, Session, TokenStore, HOME_PATH, SIGNIN_PATH, TOKEN_KEY};
use crate::store::{AdminStore, ListQuery, ResourceSlice};

const TEST_TOKEN: &str = "test-token";

/// In-memory stand-in for the platform REST API.
#[derive(Clone, Default)]
struct MockBackend {
    collections: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    requests: Arc<Mutex<Vec<String>>>,
    queries: Arc<Mutex<HashMap<String, Option<String>>>>,
    seen_auth: Arc<Mutex<Vec<Option<String>>>>,
    request_ids: Arc<Mutex<Vec<String>>>,
    uploads: Arc<Mutex<Vec<(String, usize)>>>,
    next_id: Arc<AtomicUsize>,
    required_token: Option<String>,
}

impl MockBackend {
    fn seed(&self, collection: &str, records: Vec<Value>) {
        self.collections
            .lock()
            .unwrap()
            .insert(collection.to_string(), records);
    }

    fn fail(&self, collection: &str) {
        self.failing.lock().unwrap().insert(collection.to_string());
    }

    fn recover(&self, collection: &str) {
        self.failing.lock().unwrap().remove(collection);
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn log(&self, entry: String) {
        self.requests.lock().unwrap().push(entry);
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        self.seen_auth.lock().unwrap().push(auth.clone());

        if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
            self.request_ids.lock().unwrap().push(id.to_string());
        }

        match &self.required_token {
            Some(token) if auth.as_deref() != Some(format!("Bearer {}", token).as_str()) => {
                Err(error_response(StatusCode::UNAUTHORIZED, "Token expired"))
            }
            _ => Ok(()),
        }
    }

    fn check_available(&self, collection: &str) -> Result<(), Response> {
        if self.failing.lock().unwrap().contains(collection) {
            return Err(error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                &format!("{} service unavailable", collection),
            ));
        }
        Ok(())
    }

    fn insert(&self, collection: &str, mut record: Value) -> Value {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        record["_id"] = json!(format!("{}-{}", collection, n));
        if record.get("createdAt").is_none() {
            record["createdAt"] = json!(Utc::now().to_rfc3339());
        }
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        record
    }
}

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn mock_user(email: &str) -> Value {
    let role = if email.starts_with("admin") { "admin" } else { "user" };
    json!({ "_id": "user-1", "name": "Test User", "email": email, "role": role, "isActive": true })
}

async fn login(State(mock): State<MockBackend>, Json(body): Json<Value>) -> Response {
    mock.log("POST /auth/login".to_string());
    let email = body["email"].as_str().unwrap_or_default();
    if body["password"] != "correct-password" {
        return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    ok(json!({ "token": TEST_TOKEN, "user": mock_user(email) }))
}

async fn signup(State(mock): State<MockBackend>, Json(body): Json<Value>) -> Response {
    mock.log("POST /auth/signup".to_string());
    let email = body["email"].as_str().unwrap_or_default();
    ok(json!({ "token": "signup-token", "user": mock_user(email) }))
}

async fn me(State(mock): State<MockBackend>, headers: HeaderMap) -> Response {
    mock.log("GET /auth/me".to_string());
    if let Err(resp) = mock.authorize(&headers) {
        return resp;
    }
    ok(mock_user("admin@temple.org"))
}

async fn list(
    State(mock): State<MockBackend>,
    Path(collection): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    mock.log(format!("GET /{}", collection));
    mock.queries
        .lock()
        .unwrap()
        .insert(collection.clone(), query);
    if let Err(resp) = mock.authorize(&headers).and_then(|_| mock.check_available(&collection)) {
        return resp;
    }
    let records = mock
        .collections
        .lock()
        .unwrap()
        .get(&collection)
        .cloned()
        .unwrap_or_default();
    ok(Value::Array(records))
}

async fn create(
    State(mock): State<MockBackend>,
    Path(collection): Path<String>,
    request: Request,
) -> Response {
    mock.log(format!("POST /{}", collection));
    if let Err(resp) = mock
        .authorize(request.headers())
        .and_then(|_| mock.check_available(&collection))
    {
        return resp;
    }

    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let record = if is_multipart {
        let mut multipart = Multipart::from_request(request, &()).await.unwrap();
        let mut record = json!({});
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(|f| f.to_string()) {
                Some(file_name) => {
                    let bytes = field.bytes().await.unwrap();
                    mock.uploads
                        .lock()
                        .unwrap()
                        .push((file_name.clone(), bytes.len()));
                    record[name] = json!(format!("/uploads/{}", file_name));
                }
                None => {
                    let text = field.text().await.unwrap();
                    record[name] = serde_json::from_str(&text).unwrap_or(Value::String(text));
                }
            }
        }
        record
    } else {
        let Json(body) = Json::<Value>::from_request(request, &()).await.unwrap();
        body
    };

    ok(mock.insert(&collection, record))
}

async fn get_one(
    State(mock): State<MockBackend>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    mock.log(format!("GET /{}/{}", collection, id));
    if let Err(resp) = mock.authorize(&headers).and_then(|_| mock.check_available(&collection)) {
        return resp;
    }
    let found = mock
        .collections
        .lock()
        .unwrap()
        .get(&collection)
        .and_then(|records| records.iter().find(|r| r["_id"] == id.as_str()).cloned());
    match found {
        Some(record) => ok(record),
        None => error_response(StatusCode::NOT_FOUND, &format!("{} not found", id)),
    }
}

async fn replace(
    State(mock): State<MockBackend>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    mock.log(format!("PUT /{}/{}", collection, id));
    if let Err(resp) = mock.authorize(&headers) {
        return resp;
    }
    body["_id"] = json!(id);
    let mut collections = mock.collections.lock().unwrap();
    let records = collections.entry(collection).or_default();
    match records.iter_mut().find(|r| r["_id"] == id.as_str()) {
        Some(existing) => {
            *existing = body.clone();
            ok(body)
        }
        None => error_response(StatusCode::NOT_FOUND, &format!("{} not found", id)),
    }
}

async fn remove(
    State(mock): State<MockBackend>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    mock.log(format!("DELETE /{}/{}", collection, id));
    if let Err(resp) = mock.authorize(&headers) {
        return resp;
    }
    let mut collections = mock.collections.lock().unwrap();
    let records = collections.entry(collection).or_default();
    let before = records.len();
    records.retain(|r| r["_id"] != id.as_str());
    if records.len() == before {
        return error_response(StatusCode::NOT_FOUND, &format!("{} not found", id));
    }
    ok(Value::Null)
}

async fn set_status(
    State(mock): State<MockBackend>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.log(format!("PATCH /{}/{}/status", collection, id));
    if let Err(resp) = mock.authorize(&headers) {
        return resp;
    }
    let mut collections = mock.collections.lock().unwrap();
    let records = collections.entry(collection).or_default();
    match records.iter_mut().find(|r| r["_id"] == id.as_str()) {
        Some(existing) => {
            existing["status"] = body["status"].clone();
            ok(existing.clone())
        }
        None => error_response(StatusCode::NOT_FOUND, &format!("{} not found", id)),
    }
}

fn mock_router(mock: MockBackend) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/me", get(me))
        .route("/api/{collection}", get(list).post(create))
        .route(
            "/api/{collection}/{id}",
            get(get_one).put(replace).delete(remove),
        )
        .route("/api/{collection}/{id}/status", patch(set_status))
        .with_state(mock)
}

/// Test fixture for integration tests.
struct TestFixture {
    mock: MockBackend,
    config: Config,
    temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let mock = MockBackend {
            required_token: Some(TEST_TOKEN.to_string()),
            ..Default::default()
        };
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");

        let app = mock_router(mock.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = Config {
            api_base_url: format!("http://{}/api", addr),
            token_path: temp_dir.path().join("session.json"),
            log_level: "warn".to_string(),
            page_size: 100,
        };

        TestFixture {
            mock,
            config,
            temp_dir,
        }
    }

    fn client(&self, session: Session) -> ApiClient {
        ApiClient::new(&self.config, session).expect("Failed to build client")
    }

    /// Store whose session already holds a valid token.
    fn signed_in(&self) -> (AdminStore, Session) {
        let session = Session::in_memory();
        session.sign_in(TEST_TOKEN).unwrap();
        let store = AdminStore::new(self.client(session.clone()), self.config.page_size);
        (store, session)
    }
}

fn days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days)).to_rfc3339()
}

#[tokio::test]
async fn test_list_fetch_populates_slice_with_bearer_token() {
    let fixture = TestFixture::new().await;
    fixture.mock.seed(
        "pujas",
        vec![
            json!({ "_id": "p1", "title": "Ganesh Chaturthi Puja", "date": "2026-09-07" }),
            json!({ "_id": "p2", "title": "Navratri Durga Path" }),
        ],
    );
    let (mut store, _session) = fixture.signed_in();

    let items = store.pujas.fetch_all(ListQuery::default()).await.unwrap();
    assert_eq!(items.len(), 2);

    let state = store.pujas.state();
    assert_eq!(state.items[0].title, "Ganesh Chaturthi Puja");
    assert_eq!(state.items[1].date, "");
    assert!(!state.loading);
    assert!(state.error.is_none());

    let seen = fixture.mock.seen_auth.lock().unwrap().clone();
    assert_eq!(seen, vec![Some(format!("Bearer {}", TEST_TOKEN))]);
    let ids = fixture.mock.request_ids.lock().unwrap().clone();
    assert_eq!(ids.len(), 1);
    assert!(uuid::Uuid::parse_str(&ids[0]).is_ok());
}

#[tokio::test]
async fn test_list_accepts_records_with_virtual_id() {
    let fixture = TestFixture::new().await;
    fixture.mock.seed(
        "pujas",
        vec![
            json!({ "_id": "p1", "id": "p1", "title": "Rudrabhishek", "__v": 0 }),
            json!({ "id": "p2", "title": "Lakshmi Puja" }),
        ],
    );
    let (mut store, _session) = fixture.signed_in();

    let items = store.pujas.fetch_all(ListQuery::default()).await.unwrap();
    let ids: Vec<_> = items.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
    assert!(store.pujas.state().error.is_none());
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_list() {
    let fixture = TestFixture::new().await;
    fixture
        .mock
        .seed("temples", vec![json!({ "_id": "t1", "name": "Somnath", "location": "Gujarat" })]);
    let (mut store, _session) = fixture.signed_in();

    store.temples.fetch_all(ListQuery::default()).await.unwrap();
    assert_eq!(store.temples.items().len(), 1);

    fixture.mock.fail("temples");
    let err = store.temples.refetch().await.unwrap_err();
    assert_eq!(err.status(), Some(503));

    let state = store.temples.state();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("temples service unavailable"));
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].name, "Somnath");

    fixture.mock.recover("temples");
    store.temples.refetch().await.unwrap();
    assert!(store.temples.state().error.is_none());
}

#[tokio::test]
async fn test_unauthorized_clears_token_and_redirects() {
    let fixture = TestFixture::new().await;
    let store_file = Arc::new(FileTokenStore::new(&fixture.config.token_path));
    store_file.set(TOKEN_KEY, "stale-token").unwrap();
    store_file.set("theme", "saffron").unwrap();

    let session = Session::new(store_file.clone());
    let mut route = session.subscribe();
    let mut store = AdminStore::new(fixture.client(session.clone()), 100);
    assert!(store.auth.state().authenticated);

    let err = store.bookings.fetch_all(ListQuery::default()).await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
    assert_eq!(err.message(), "Token expired");
    assert_eq!(store.bookings.state().error.as_deref(), Some("Token expired"));

    assert_eq!(session.token(), None);
    assert_eq!(store_file.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(store_file.get("theme").unwrap().as_deref(), Some("saffron"));
    assert_eq!(session.current_route(), SIGNIN_PATH);
    assert!(route.has_changed().unwrap());
    assert_eq!(*route.borrow_and_update(), SIGNIN_PATH);
}

#[tokio::test]
async fn test_unauthorized_from_any_slice() {
    let fixture = TestFixture::new().await;

    for attempt in 0..3 {
        let session = Session::in_memory();
        session.sign_in("revoked").unwrap();
        let mut store = AdminStore::new(fixture.client(session.clone()), 100);

        let result = match attempt {
            0 => store.orders.delete("order-1").await.map(|_| ()),
            1 => store.dashboard.fetch().await.map(|_| ()),
            _ => store.auth.fetch_profile().await.map(|_| ()),
        };

        assert!(matches!(result, Err(ClientError::Unauthorized(_))));
        assert!(!session.is_authenticated());
        assert_eq!(session.current_route(), SIGNIN_PATH);
    }
}

#[tokio::test]
async fn test_unauthorized_resource_fetch_signs_out_auth_slice() {
    let fixture = TestFixture::new().await;
    let session = Session::in_memory();
    let mut store = AdminStore::new(fixture.client(session.clone()), 100);

    store
        .auth
        .login("admin@temple.org", "correct-password")
        .await
        .unwrap();
    assert!(store.auth.state().authenticated);
    assert!(store.auth.state().user.is_some());

    // Token revoked on the server side
    session.sign_in("revoked").unwrap();
    let err = store.pujas.fetch_all(ListQuery::default()).await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));

    let auth = store.auth.state();
    assert!(!auth.authenticated);
    assert!(auth.user.is_none());
    assert!(!session.is_authenticated());
    assert_eq!(session.current_route(), SIGNIN_PATH);
}

#[tokio::test]
async fn test_create_update_delete_refetches_list() {
    let fixture = TestFixture::new().await;
    let (mut store, _session) = fixture.signed_in();

    let draft = Puja {
        title: "Maha Mrityunjaya Jaap".to_string(),
        date: "2026-11-01".to_string(),
        ..Default::default()
    };
    let created = store.pujas.create(&draft).await.unwrap();
    assert!(created.id.starts_with("pujas-"));
    assert_eq!(store.pujas.items().len(), 1);
    assert_eq!(
        fixture.mock.requests(),
        vec!["POST /pujas".to_string(), "GET /pujas".to_string()]
    );

    store.pujas.fetch_by_id(&created.id).await.unwrap();
    let mut edited = created.clone();
    edited.title = "Maha Mrityunjaya Jaap (108)".to_string();
    let updated = store.pujas.update(&created.id, &edited).await.unwrap();
    assert_eq!(updated.title, "Maha Mrityunjaya Jaap (108)");
    assert_eq!(store.pujas.items()[0].title, "Maha Mrityunjaya Jaap (108)");
    assert_eq!(store.pujas.selected().unwrap().title, "Maha Mrityunjaya Jaap (108)");

    store.pujas.delete(&created.id).await.unwrap();
    assert!(store.pujas.items().is_empty());
    assert!(store.pujas.selected().is_none());
    assert_eq!(fixture.mock.requests().last().unwrap(), "GET /pujas");
}

#[tokio::test]
async fn test_order_status_is_spliced_without_refetch() {
    let fixture = TestFixture::new().await;
    fixture.mock.seed(
        "orders",
        vec![
            json!({ "_id": "o1", "totalAmount": 499.0, "status": "pending" }),
            json!({ "_id": "o2", "totalAmount": 1299.0, "status": "processing" }),
        ],
    );
    let (mut store, _session) = fixture.signed_in();
    store.orders.fetch_all(ListQuery::default()).await.unwrap();

    let updated = store.orders.set_status("o2", OrderStatus::Shipped).await.unwrap();
    assert_eq!(updated.status, OrderStatus::Shipped);
    assert_eq!(store.orders.items()[1].status, OrderStatus::Shipped);
    assert_eq!(store.orders.items()[0].status, OrderStatus::Pending);
    assert_eq!(
        fixture.mock.requests(),
        vec!["GET /orders".to_string(), "PATCH /orders/o2/status".to_string()]
    );
}

#[tokio::test]
async fn test_booking_status_change_refetches() {
    let fixture = TestFixture::new().await;
    fixture
        .mock
        .seed("bookings", vec![json!({ "_id": "b1", "status": "pending" })]);
    let (mut store, _session) = fixture.signed_in();

    store
        .bookings
        .set_status("b1", BookingStatus::Confirmed)
        .await
        .unwrap();

    assert_eq!(store.bookings.items()[0].status, BookingStatus::Confirmed);
    assert_eq!(fixture.mock.requests().last().unwrap(), "GET /bookings");
}

#[tokio::test]
async fn test_validation_failure_skips_request() {
    let fixture = TestFixture::new().await;
    let (mut store, _session) = fixture.signed_in();

    let plan = Plan {
        name: "  ".to_string(),
        price_inr: 1100.0,
        ..Default::default()
    };
    let err = store.plans.create(&plan).await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(store.plans.state().error.as_deref(), Some("Name is required"));
    assert!(!store.plans.state().loading);
    assert!(fixture.mock.requests().is_empty());
}

#[tokio::test]
async fn test_fetch_by_id_not_found_sets_error() {
    let fixture = TestFixture::new().await;
    let (mut store, _session) = fixture.signed_in();

    let err = store.temples.fetch_by_id("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(store.temples.state().error.as_deref(), Some("missing not found"));
    assert!(store.temples.selected().is_none());
}

#[tokio::test]
async fn test_login_persists_admin_token() {
    let fixture = TestFixture::new().await;
    let session = Session::new(Arc::new(FileTokenStore::new(&fixture.config.token_path)));
    let mut store = AdminStore::new(fixture.client(session.clone()), 100);
    session.navigate(SIGNIN_PATH);

    let user = store
        .auth
        .login("admin@temple.org", "correct-password")
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::Admin);
    assert!(store.auth.state().authenticated);
    assert_eq!(session.token().as_deref(), Some(TEST_TOKEN));
    assert_eq!(session.current_route(), HOME_PATH);

    // A second console reading the same storage file is already signed in
    let reopened = crate::connect(&fixture.config).unwrap();
    assert!(reopened.auth.state().authenticated);

    store.auth.logout().unwrap();
    assert!(!session.is_authenticated());
    assert_eq!(session.current_route(), SIGNIN_PATH);
    assert!(fixture.temp_dir.path().join("session.json").exists());
}

#[tokio::test]
async fn test_login_rejects_non_admin() {
    let fixture = TestFixture::new().await;
    let session = Session::in_memory();
    let mut store = AdminStore::new(fixture.client(session.clone()), 100);

    let err = store
        .auth
        .login("devotee@example.com", "correct-password")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(store.auth.state().error.as_deref(), Some("Admin access required"));
    assert!(!store.auth.state().authenticated);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_login_bad_credentials() {
    let fixture = TestFixture::new().await;
    let session = Session::in_memory();
    let mut store = AdminStore::new(fixture.client(session.clone()), 100);

    let err = store
        .auth
        .login("admin@temple.org", "wrong")
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized(_)));
    assert_eq!(store.auth.state().error.as_deref(), Some("Invalid credentials"));
    assert_eq!(session.current_route(), SIGNIN_PATH);

    let request = LoginRequest {
        email: "not-an-email".to_string(),
        password: "x".to_string(),
    };
    assert!(request.validate().is_err());
}

#[tokio::test]
async fn test_signup_without_admin_role_stays_signed_out() {
    let fixture = TestFixture::new().await;
    let session = Session::in_memory();
    let mut store = AdminStore::new(fixture.client(session.clone()), 100);

    let user = store
        .auth
        .signup(SignupRequest {
            name: "Priya".to_string(),
            email: "priya@example.com".to_string(),
            password: "namaste123".to_string(),
            phone: Some("+91 98765 43210".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::User);
    assert!(!store.auth.state().authenticated);
    assert_eq!(store.auth.state().user.as_ref().unwrap().email, "priya@example.com");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_dashboard_aggregates_lists() {
    let fixture = TestFixture::new().await;
    fixture.mock.seed(
        "users",
        vec![
            json!({ "_id": "u1", "createdAt": days_ago(2) }),
            json!({ "_id": "u2", "createdAt": days_ago(10) }),
            json!({ "_id": "u3", "createdAt": days_ago(45) }),
        ],
    );
    fixture.mock.seed(
        "bookings",
        vec![
            json!({ "_id": "b1", "createdAt": days_ago(1), "totalAmount": 2100.0, "status": "confirmed" }),
            json!({ "_id": "b2", "createdAt": days_ago(50), "totalAmount": 1100.0, "status": "completed" }),
        ],
    );
    fixture.mock.seed(
        "orders",
        vec![json!({ "_id": "o1", "createdAt": days_ago(3), "totalAmount": 349.5 })],
    );
    fixture
        .mock
        .seed("pujas", vec![json!({ "_id": "p1", "title": "Kaal Sarp Dosh Puja" })]);
    let (mut store, _session) = fixture.signed_in();

    let stats = store.dashboard.fetch().await.unwrap().clone();

    assert_eq!(stats.total_users, 3);
    assert_eq!(stats.total_bookings, 2);
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.total_pujas, 1);
    assert_eq!(stats.total_products, 0);
    assert_eq!(stats.total_revenue, 3549.5);

    let users = stats.metric("users").unwrap();
    assert_eq!((users.recent, users.previous), (2, 1));
    assert_eq!(users.growth, 100.0);

    let bookings = stats.metric("bookings").unwrap();
    assert_eq!((bookings.recent, bookings.previous), (1, 1));
    assert_eq!(bookings.growth, 0.0);

    // Records without timestamps never enter either window
    let pujas = stats.metric("pujas").unwrap();
    assert_eq!((pujas.recent, pujas.previous, pujas.growth), (0, 0, 0.0));

    assert_eq!(stats.booking_status.get("confirmed"), Some(&1));
    assert_eq!(stats.monthly.len(), 6);

    let queries = fixture.mock.queries.lock().unwrap().clone();
    assert_eq!(queries.len(), 6);
    assert_eq!(queries["users"].as_deref(), Some("page=1&limit=100"));

    assert!(store.dashboard.state().stats.is_some());
    assert!(!store.dashboard.state().loading);
}

#[tokio::test]
async fn test_dashboard_partial_failure_fails_aggregate() {
    let fixture = TestFixture::new().await;
    let (mut store, _session) = fixture.signed_in();

    store.dashboard.fetch().await.unwrap();
    let previous = store.dashboard.state().stats.clone();

    fixture.mock.fail("orders");
    let err = store.dashboard.fetch().await.unwrap_err();

    assert_eq!(err.message(), "orders service unavailable");
    let state = store.dashboard.state();
    assert_eq!(state.error.as_deref(), Some("orders service unavailable"));
    assert!(!state.loading);
    assert_eq!(state.stats, previous);
}

#[tokio::test]
async fn test_users_slice_uses_configured_page_size() {
    let fixture = TestFixture::new().await;
    let (mut store, _session) = fixture.signed_in();

    store.users.refetch().await.unwrap();

    let queries = fixture.mock.queries.lock().unwrap().clone();
    assert_eq!(queries["users"].as_deref(), Some("page=1&limit=100"));
}

#[tokio::test]
async fn test_blog_created_with_thumbnail_upload() {
    let fixture = TestFixture::new().await;
    let session = Session::in_memory();
    session.sign_in(TEST_TOKEN).unwrap();
    let mut blogs: ResourceSlice<Blog> = ResourceSlice::new(fixture.client(session));

    let draft = Blog {
        title: "Significance of Kartik Purnima".to_string(),
        content: "Lamps are lit along the ghats...".to_string(),
        category_ids: vec!["festivals".to_string()],
        is_featured: true,
        ..Default::default()
    };
    let upload = Upload::new("kartik.png", vec![0x89, b'P', b'N', b'G']);
    let created = blogs.create_with_image(&draft, upload).await.unwrap();

    assert_eq!(created.title, "Significance of Kartik Purnima");
    assert_eq!(created.thumbnail, "/uploads/kartik.png");
    assert_eq!(created.category_ids, vec!["festivals"]);
    assert!(created.is_featured);
    assert_eq!(
        fixture.mock.uploads.lock().unwrap().clone(),
        vec![("kartik.png".to_string(), 4)]
    );
    assert_eq!(blogs.items().len(), 1);
}

#[tokio::test]
async fn test_splice_for_users_on_update() {
    let fixture = TestFixture::new().await;
    fixture.mock.seed(
        "users",
        vec![json!({ "_id": "u1", "name": "Ramesh", "email": "ramesh@example.com", "isActive": true })],
    );
    let (mut store, _session) = fixture.signed_in();
    store.users.refetch().await.unwrap();

    let mut user = store.users.items()[0].clone();
    user.is_active = false;
    store.users.update("u1", &user).await.unwrap();

    assert!(!store.users.items()[0].is_active);
    assert_eq!(
        fixture.mock.requests(),
        vec!["GET /users".to_string(), "PUT /users/u1".to_string()]
    );
}

#[tokio::test]
async fn test_temple_record_round_trips_through_api() {
    let fixture = TestFixture::new().await;
    let (mut store, _session) = fixture.signed_in();

    let temple = Temple {
        name: "Mahakaleshwar".to_string(),
        location: "Ujjain".to_string(),
        deity: "Shiva".to_string(),
        images: vec!["/uploads/mahakal.jpg".to_string()],
        is_active: true,
        ..Default::default()
    };
    let created = store.temples.create(&temple).await.unwrap();

    let fetched = store.temples.fetch_by_id(&created.id).await.unwrap();
    assert_eq!(fetched.name, "Mahakaleshwar");
    assert_eq!(fetched.images, vec!["/uploads/mahakal.jpg"]);
    assert!(!fetched.created_at.is_empty());
}
