//! REST client for the screens endpoints.
//!
//! Wraps the backend's screen CRUD and name-check endpoints using
//! [`reqwest`]. Record writes are sent as multipart forms so document
//! uploads travel with the fields.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use signage_core::intake::payload::IntakePayload;
use signage_core::types::DbId;
use signage_onboarding::persistence::{
    parse_error_body, IntakePersistence, PersistenceError, PersistenceResult,
};

use crate::config::ClientConfig;
use crate::multipart::build_form;

/// HTTP client for the screens API.
pub struct ScreenApi {
    client: reqwest::Client,
    api_url: String,
    api_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedScreen {
    id: DbId,
}

#[derive(Debug, Deserialize)]
struct NameCheckResponse {
    exists: bool,
}

/// Errors from the screens REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ScreenApiError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Screens API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

impl ScreenApiError {
    /// Map to the persistence error surfaced to the workflow. A 404 on a
    /// known record becomes `NotFound`; other rejections keep the backend's
    /// field messages.
    pub fn into_persistence(self, id: Option<DbId>) -> PersistenceError {
        match (self, id) {
            (Self::ApiError { status: 404, .. }, Some(id)) => PersistenceError::NotFound(id),
            (Self::ApiError { body, .. }, _) => parse_error_body(&body),
            (Self::Request(e), _) => PersistenceError::Transport(e.to_string()),
        }
    }
}

impl ScreenApi {
    /// Create a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ScreenApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
        }
    }

    /// `POST /screens/`. Returns the new record id.
    pub async fn create_screen(&self, payload: &IntakePayload) -> Result<DbId, ScreenApiError> {
        let request = self
            .client
            .post(format!("{}/screens/", self.api_url))
            .multipart(build_form(payload)?);
        let created: CreatedScreen = Self::parse_response(self.send(request).await?).await?;
        Ok(created.id)
    }

    /// `GET /screens/{id}/`.
    pub async fn get_screen(&self, id: DbId) -> Result<Map<String, Value>, ScreenApiError> {
        let request = self.client.get(self.screen_url(id));
        Self::parse_response(self.send(request).await?).await
    }

    /// `PATCH /screens/{id}/`.
    pub async fn patch_screen(
        &self,
        id: DbId,
        payload: &IntakePayload,
    ) -> Result<Map<String, Value>, ScreenApiError> {
        let request = self
            .client
            .patch(self.screen_url(id))
            .multipart(build_form(payload)?);
        Self::parse_response(self.send(request).await?).await
    }

    /// `PUT /screens/{id}/`.
    pub async fn put_screen(
        &self,
        id: DbId,
        payload: &IntakePayload,
    ) -> Result<Map<String, Value>, ScreenApiError> {
        let request = self
            .client
            .put(self.screen_url(id))
            .multipart(build_form(payload)?);
        Self::parse_response(self.send(request).await?).await
    }

    /// `GET /screens/check-name/?name=..&exclude_id=..`.
    pub async fn check_name(
        &self,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, ScreenApiError> {
        let mut query = vec![("name", name.to_string())];
        if let Some(id) = exclude_id {
            query.push(("exclude_id", id.to_string()));
        }
        let request = self
            .client
            .get(format!("{}/screens/check-name/", self.api_url))
            .query(&query);
        let response: NameCheckResponse = Self::parse_response(self.send(request).await?).await?;
        Ok(response.exists)
    }

    // ---- private helpers ----

    fn screen_url(&self, id: DbId) -> String {
        format!("{}/screens/{}/", self.api_url, id)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ScreenApiError> {
        let request = match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        Ok(request.send().await?)
    }

    /// Ensure the response has a success status code, or return an
    /// [`ScreenApiError::ApiError`] with the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ScreenApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ScreenApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ScreenApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl IntakePersistence for ScreenApi {
    async fn create(&self, payload: &IntakePayload) -> PersistenceResult<DbId> {
        let id = self
            .create_screen(payload)
            .await
            .map_err(|e| e.into_persistence(None))?;
        tracing::debug!(record_id = id, "Screen created");
        Ok(id)
    }

    async fn get_by_id(&self, id: DbId) -> PersistenceResult<Map<String, Value>> {
        self.get_screen(id)
            .await
            .map_err(|e| e.into_persistence(Some(id)))
    }

    async fn partial_update(
        &self,
        id: DbId,
        payload: &IntakePayload,
    ) -> PersistenceResult<Map<String, Value>> {
        self.patch_screen(id, payload)
            .await
            .map_err(|e| e.into_persistence(Some(id)))
    }

    async fn full_update(
        &self,
        id: DbId,
        payload: &IntakePayload,
    ) -> PersistenceResult<Map<String, Value>> {
        self.put_screen(id, payload)
            .await
            .map_err(|e| e.into_persistence(Some(id)))
    }

    async fn name_exists(&self, name: &str, exclude_id: Option<DbId>) -> PersistenceResult<bool> {
        self.check_name(name, exclude_id)
            .await
            .map_err(|e| e.into_persistence(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn api_error(status: u16, body: &str) -> ScreenApiError {
        ScreenApiError::ApiError {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn not_found_for_known_record() {
        assert_eq!(
            api_error(404, r#"{"detail": "Not found."}"#).into_persistence(Some(12)),
            PersistenceError::NotFound(12)
        );
    }

    #[test]
    fn not_found_without_id_keeps_message() {
        assert_eq!(
            api_error(404, r#"{"detail": "Not found."}"#).into_persistence(None),
            PersistenceError::Message("Not found.".to_string())
        );
    }

    #[test]
    fn field_errors_are_surfaced() {
        let err = api_error(400, r#"{"gst_number": ["Enter a valid GSTIN."]}"#)
            .into_persistence(Some(3));
        assert_matches!(err, PersistenceError::Rejected { field_errors, .. } => {
            assert_eq!(field_errors["gst_number"], vec!["Enter a valid GSTIN.".to_string()]);
        });
    }
}
