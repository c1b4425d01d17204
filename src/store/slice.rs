//! Generic resource slice: cached list, selection, loading flag, and error.

use reqwest::Method;
use serde::Serialize;

use super::ListQuery;
use crate::client::{ApiClient, Upload};
use crate::errors::ClientError;
use crate::models::{Refresh, Resource, StatusResource};

/// State held by one slice.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SliceState<T> {
    pub items: Vec<T>,
    pub selected: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for SliceState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> SliceState<T> {
    /// Request issued.
    pub fn pending(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// List request succeeded: the cached list is replaced.
    pub fn list_fulfilled(&mut self, items: Vec<T>) {
        self.items = items;
        self.settled();
    }

    /// Single-record request succeeded: the selection slot is filled.
    pub fn item_fulfilled(&mut self, item: T) {
        self.selected = Some(item);
        self.settled();
    }

    /// Request failed. Cached data is left as it was.
    pub fn rejected(&mut self, err: &ClientError) {
        self.loading = false;
        self.error = Some(err.message());
    }

    pub fn settled(&mut self) {
        self.loading = false;
        self.error = None;
    }
}

impl<T: Resource> SliceState<T> {
    /// Replace the record with the same id, or append it.
    pub fn splice(&mut self, record: T) {
        if let Some(selected) = self.selected.as_mut() {
            if selected.id() == record.id() {
                *selected = record.clone();
            }
        }
        match self.items.iter_mut().find(|item| item.id() == record.id()) {
            Some(existing) => *existing = record,
            None => self.items.push(record),
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.id() != id);
        if self.selected.as_ref().is_some_and(|s| s.id() == id) {
            self.selected = None;
        }
    }
}

/// Change applied by a successful mutation.
enum Change<'a, T> {
    Upsert(&'a T),
    Removed(&'a str),
}

/// Slice bound to one REST collection.
#[derive(Debug)]
pub struct ResourceSlice<T: Resource> {
    client: ApiClient,
    state: SliceState<T>,
    last_query: ListQuery,
}

impl<T: Resource> ResourceSlice<T> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: SliceState::default(),
            last_query: ListQuery::default(),
        }
    }

    /// Use `query` for the first `fetch_all` and subsequent refetches.
    pub fn with_query(mut self, query: ListQuery) -> Self {
        self.last_query = query;
        self
    }

    pub fn state(&self) -> &SliceState<T> {
        &self.state
    }

    pub fn items(&self) -> &[T] {
        &self.state.items
    }

    pub fn selected(&self) -> Option<&T> {
        self.state.selected.as_ref()
    }

    pub fn last_query(&self) -> &ListQuery {
        &self.last_query
    }

    /// GET the collection and replace the cached list.
    pub async fn fetch_all(&mut self, query: ListQuery) -> Result<&[T], ClientError> {
        self.state.pending();
        self.last_query = query;

        match self
            .client
            .get_with_query::<Vec<T>, _>(T::PATH, &self.last_query)
            .await
        {
            Ok(items) => {
                tracing::debug!("Fetched {} {} records", items.len(), T::LABEL);
                self.state.list_fulfilled(items);
                Ok(&self.state.items)
            }
            Err(e) => self.reject(e),
        }
    }

    /// Re-run the last list query.
    pub async fn refetch(&mut self) -> Result<&[T], ClientError> {
        let query = self.last_query.clone();
        self.fetch_all(query).await
    }

    /// GET one record into the selection slot.
    pub async fn fetch_by_id(&mut self, id: &str) -> Result<&T, ClientError> {
        let path = match item_path::<T>(id) {
            Ok(path) => path,
            Err(e) => return self.reject(e),
        };
        self.state.pending();

        match self.client.get::<T>(&path).await {
            Ok(item) => {
                self.state.item_fulfilled(item);
                match self.state.selected.as_ref() {
                    Some(selected) => Ok(selected),
                    None => Err(ClientError::Decode(format!("{} missing", T::LABEL))),
                }
            }
            Err(e) => self.reject(e),
        }
    }

    /// POST a new record.
    pub async fn create(&mut self, record: &T) -> Result<T, ClientError> {
        if let Err(e) = record.validate() {
            return self.reject(e);
        }
        self.state.pending();

        match self.client.post::<_, T>(T::PATH, record).await {
            Ok(created) => {
                tracing::info!("Created {} {}", T::LABEL, created.id());
                self.settle(Change::Upsert(&created)).await;
                Ok(created)
            }
            Err(e) => self.reject(e),
        }
    }

    /// POST a new record with an image as multipart form data.
    pub async fn create_with_image(&mut self, record: &T, upload: Upload) -> Result<T, ClientError> {
        if let Err(e) = record.validate() {
            return self.reject(e);
        }
        self.state.pending();

        match self
            .client
            .send_multipart::<_, T>(Method::POST, T::PATH, record, T::IMAGE_FIELD, upload)
            .await
        {
            Ok(created) => {
                tracing::info!("Created {} {} with image", T::LABEL, created.id());
                self.settle(Change::Upsert(&created)).await;
                Ok(created)
            }
            Err(e) => self.reject(e),
        }
    }

    /// PUT a full record.
    pub async fn update(&mut self, id: &str, record: &T) -> Result<T, ClientError> {
        let path = match item_path::<T>(id).and_then(|path| record.validate().map(|_| path)) {
            Ok(path) => path,
            Err(e) => return self.reject(e),
        };
        self.state.pending();

        match self.client.put::<_, T>(&path, record).await {
            Ok(updated) => {
                tracing::info!("Updated {} {}", T::LABEL, id);
                self.settle(Change::Upsert(&updated)).await;
                Ok(updated)
            }
            Err(e) => self.reject(e),
        }
    }

    /// PUT a full record with a replacement image.
    pub async fn update_with_image(
        &mut self,
        id: &str,
        record: &T,
        upload: Upload,
    ) -> Result<T, ClientError> {
        let path = match item_path::<T>(id).and_then(|path| record.validate().map(|_| path)) {
            Ok(path) => path,
            Err(e) => return self.reject(e),
        };
        self.state.pending();

        match self
            .client
            .send_multipart::<_, T>(Method::PUT, &path, record, T::IMAGE_FIELD, upload)
            .await
        {
            Ok(updated) => {
                tracing::info!("Updated {} {} with image", T::LABEL, id);
                self.settle(Change::Upsert(&updated)).await;
                Ok(updated)
            }
            Err(e) => self.reject(e),
        }
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ClientError> {
        let path = match item_path::<T>(id) {
            Ok(path) => path,
            Err(e) => return self.reject(e),
        };
        self.state.pending();

        match self.client.delete(&path).await {
            Ok(()) => {
                tracing::info!("Deleted {} {}", T::LABEL, id);
                self.settle(Change::Removed(id)).await;
                Ok(())
            }
            Err(e) => self.reject(e),
        }
    }

    /// Reconcile the cache after a successful mutation.
    async fn settle(&mut self, change: Change<'_, T>) {
        match change {
            Change::Upsert(record) => {
                if T::REFRESH == Refresh::Splice {
                    self.state.splice(record.clone());
                } else if let Some(selected) = self.state.selected.as_mut() {
                    if selected.id() == record.id() {
                        *selected = record.clone();
                    }
                }
            }
            Change::Removed(id) => self.state.remove(id),
        }

        match T::REFRESH {
            Refresh::Splice => self.state.settled(),
            Refresh::Refetch => {
                if let Err(e) = self.refetch().await {
                    tracing::warn!("Refetch of {} list after mutation failed: {}", T::LABEL, e);
                }
            }
        }
    }

    fn reject<R>(&mut self, err: ClientError) -> Result<R, ClientError> {
        tracing::warn!("{} request failed: {}", T::LABEL, err);
        self.state.rejected(&err);
        Err(err)
    }
}

impl<T: StatusResource> ResourceSlice<T> {
    /// PATCH the lifecycle status of one record.
    pub async fn set_status(&mut self, id: &str, status: T::Status) -> Result<T, ClientError> {
        let path = match item_path::<T>(id) {
            Ok(path) => format!("{}/status", path),
            Err(e) => return self.reject(e),
        };
        self.state.pending();

        let body = StatusBody { status };
        match self.client.patch::<_, T>(&path, &body).await {
            Ok(updated) => {
                tracing::info!("Set {} {} status to {:?}", T::LABEL, id, status);
                self.settle(Change::Upsert(&updated)).await;
                Ok(updated)
            }
            Err(e) => self.reject(e),
        }
    }
}

#[derive(Serialize)]
struct StatusBody<S: Serialize> {
    status: S,
}

fn item_path<T: Resource>(id: &str) -> Result<String, ClientError> {
    let id = id.trim();
    if id.is_empty() || id.contains('/') || id.contains('?') || id.contains('#') {
        return Err(ClientError::Validation(format!(
            "Invalid {} id {:?}",
            T::LABEL,
            id
        )));
    }
    Ok(format!("{}/{}", T::PATH, id))
}
