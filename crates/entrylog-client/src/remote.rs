//! HTTP client for the remote log store.
//!
//! Every operation is an independent GET request with query parameters and a
//! JSON response; there is no session or connection state to manage. The
//! [`LogStore`] trait is the seam between the sync engine and the
//! collaborator, so tests and offline tooling can substitute the in-memory
//! model from [`crate::memory`].

use std::future::Future;

use entrylog_shared::protocol::{
    append_query, fetch_query, AppendResponse, DataResponse, DeleteRequest, DeleteResponse, Query,
};
use entrylog_shared::types::VisitRecord;
use entrylog_shared::validation::validate_record;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Operations against the remote append-only log of visit records and the
/// static building list.
pub trait LogStore {
    /// Fetch the building list and the full visit log.
    fn fetch_all(&self) -> impl Future<Output = Result<DataResponse, ClientError>> + Send;

    /// Append one visit record. Validates locally before any network call.
    fn append_log(
        &self,
        record: &VisitRecord,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Delete records per the request's flags. Returns the deleted count.
    fn delete_logs(
        &self,
        request: &DeleteRequest,
    ) -> impl Future<Output = Result<u32, ClientError>> + Send;
}

/// The production [`LogStore`]: plain HTTP GETs against the configured
/// endpoint.
pub struct RemoteStore {
    http: reqwest::Client,
    endpoint: String,
}

impl RemoteStore {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, query: &Query) -> Result<T, ClientError> {
        tracing::debug!(endpoint = %self.endpoint, mode = ?query.first(), "remote request");

        let response = self.http.get(&self.endpoint).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

impl LogStore for RemoteStore {
    async fn fetch_all(&self) -> Result<DataResponse, ClientError> {
        self.get_json(&fetch_query()).await
    }

    async fn append_log(&self, record: &VisitRecord) -> Result<(), ClientError> {
        validate_record(record)?;

        let response: AppendResponse = self.get_json(&append_query(record)).await?;
        if !response.ok {
            // The endpoint reports rejections in-band with a 200 status.
            return Err(ClientError::Remote {
                status: 200,
                body: response.error.unwrap_or_else(|| "append rejected".into()),
            });
        }

        tracing::info!(
            building = %record.building_id,
            entrance = record.entrance,
            "visit record appended remotely"
        );
        Ok(())
    }

    async fn delete_logs(&self, request: &DeleteRequest) -> Result<u32, ClientError> {
        let response: DeleteResponse = self.get_json(&request.to_query()).await?;
        if !response.ok {
            return Err(ClientError::Remote {
                status: 200,
                body: response.error.unwrap_or_else(|| "delete rejected".into()),
            });
        }

        tracing::info!(deleted = response.deleted_count, "remote delete completed");
        Ok(response.deleted_count)
    }
}
