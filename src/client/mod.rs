//! Authenticated HTTP client for the platform REST API.
//!
//! Every request carries the persisted bearer token (when present) and a fresh
//! `x-request-id`. A 401 from any endpoint expires the session.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::ClientError;
use crate::session::Session;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A file attached to a multipart create/update.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read an image from disk.
    pub async fn from_path(path: &std::path::Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Configured REST client shared by every store slice.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &Config, session: Session) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("puja-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: Arc::from(config.api_base_url.trim_end_matches('/')),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET a path and decode its payload.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let body = self.send(Method::GET, path, |req| req).await?;
        decode_payload(&body)
    }

    /// GET a path with query parameters.
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let body = self.send(Method::GET, path, |req| req.query(query)).await?;
        decode_payload(&body)
    }

    pub async fn post<B, T>(&self, path: &str, payload: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, payload).await
    }

    pub async fn put<B, T>(&self, path: &str, payload: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, payload).await
    }

    pub async fn patch<B, T>(&self, path: &str, payload: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, path, payload).await
    }

    /// DELETE a path. The response body is not interpreted.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(Method::DELETE, path, |req| req).await?;
        Ok(())
    }

    /// Send a record as multipart form fields plus one file part.
    pub async fn send_multipart<B, T>(
        &self,
        method: Method,
        path: &str,
        payload: &B,
        file_field: &str,
        upload: Upload,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let fields = serde_json::to_value(payload)?;
        let form = multipart_form(&fields, file_field, upload)?;
        let body = self.send(method, path, |req| req.multipart(form)).await?;
        decode_payload(&body)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, payload: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.send(method, path, |req| req.json(payload)).await?;
        decode_payload(&body)
    }

    /// Issue a request and return the raw success body.
    async fn send<F>(&self, method: Method, path: &str, build: F) -> Result<String, ClientError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!(
            "api_request",
            method = %method,
            path = %path,
            request_id = %request_id,
        );

        async move {
            let mut request = self
                .http
                .request(method, self.url(path))
                .header(REQUEST_ID_HEADER, request_id.to_string());

            if let Some(token) = self.session.token() {
                request = request.header(AUTHORIZATION, format!("Bearer {}", token));
            }

            let response = build(request).send().await?;
            let status = response.status();
            let body = response.text().await?;
            tracing::debug!(status = status.as_u16(), "response received");

            if status.is_success() {
                return Ok(body);
            }

            let err = ClientError::from_response(status.as_u16(), &body);
            if matches!(err, ClientError::Unauthorized(_)) {
                self.session.expire();
            } else {
                tracing::warn!("API request failed: {}", err);
            }
            Err(err)
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

/// Decode a success body that is either bare or wrapped as `{ "data": ... }`.
pub fn decode_payload<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    let value: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body)?
    };

    let payload = match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    Ok(serde_json::from_value(payload)?)
}

/// Flatten a JSON record into form fields: strings as-is, other values as JSON text.
fn multipart_form(fields: &Value, file_field: &str, upload: Upload) -> Result<Form, ClientError> {
    let mut form = Form::new();

    if let Value::Object(map) = fields {
        for (key, value) in map {
            if key == file_field {
                continue;
            }
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            form = form.text(key.clone(), text);
        }
    }

    let part = Part::bytes(upload.bytes)
        .file_name(upload.file_name)
        .mime_str(&upload.content_type)?;

    Ok(form.part(file_field.to_string(), part))
}
