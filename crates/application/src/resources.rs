//! CRUD access to the back-office collections.

use std::sync::Arc;

use backoffice_domain::{ApiRequest, HttpMethod, Resource};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::AuthenticatedClient;
use crate::error::ApiError;

/// List/get/create/update/delete over a [`Resource`], all going through the
/// authenticated client.
#[derive(Clone)]
pub struct ResourceApi {
    client: Arc<AuthenticatedClient>,
}

impl ResourceApi {
    /// Creates the API over an authenticated client.
    #[must_use]
    pub const fn new(client: Arc<AuthenticatedClient>) -> Self {
        Self { client }
    }

    /// Lists a collection.
    ///
    /// # Errors
    ///
    /// Returns the client error, or `ApiError::Decode` for an unexpected body.
    pub async fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<T, ApiError> {
        self.list_with_query(resource, &[]).await
    }

    /// Lists a collection with query parameters (paging, search, filters).
    ///
    /// # Errors
    ///
    /// Returns the client error, or `ApiError::Decode` for an unexpected body.
    pub async fn list_with_query<T: DeserializeOwned>(
        &self,
        resource: Resource,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let request = query.iter().fold(
            ApiRequest::get(resource.collection_path()),
            |request, (key, value)| request.with_query(*key, *value),
        );
        self.client.send_for(request).await
    }

    /// Fetches one item.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Request` for an unusable id, otherwise the client error.
    pub async fn get<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: &str,
    ) -> Result<T, ApiError> {
        let path = resource.item_path(id)?;
        self.client.get_json(&path).await
    }

    /// Creates an item and returns what the API stored.
    ///
    /// # Errors
    ///
    /// Returns the client error, or `ApiError::Decode` for an unexpected body.
    pub async fn create<B, T>(&self, resource: Resource, item: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.client
            .send_json(HttpMethod::Post, &resource.collection_path(), item)
            .await
    }

    /// Replaces an item and returns the updated version.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Request` for an unusable id, otherwise the client error.
    pub async fn update<B, T>(&self, resource: Resource, id: &str, item: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let path = resource.item_path(id)?;
        self.client.send_json(HttpMethod::Put, &path, item).await
    }

    /// Deletes an item.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Request` for an unusable id, otherwise the client error.
    pub async fn delete(&self, resource: Resource, id: &str) -> Result<(), ApiError> {
        let path = resource.item_path(id)?;
        self.client.send(ApiRequest::delete(path)).await.map(|_| ())
    }
}
