use anyhow::Result;
use async_trait::async_trait;
use reqwest::{multipart::Form, Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::EstimateRequest,
    protocol::{EstimateResponse, LocationsResponse, LOCATIONS_PATH, PREDICT_PATH},
};
use thiserror::Error;
use tracing::debug;

pub mod config;
pub mod controller;
pub mod outcome;
pub mod page;

pub use config::{load_client_settings, ClientSettings};
pub use controller::{EstimateController, LocationLoader, PendingEstimate, Ticket, ValidationError};
pub use outcome::EstimateOutcome;
pub use page::{EstimatePage, LocationOption, LocationSelect, PriceOutput, RadioGroup, RoomSelection};

/// Failure of a single request to the estimation server.
///
/// Everything except `UnexpectedShape` is reported to the user as a
/// connection problem; a well-formed JSON body of the wrong shape is an
/// invalid response instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned HTTP status {0}")]
    Status(u16),
    #[error("response body is not valid JSON: {0}")]
    Decode(String),
    #[error("response JSON has an unexpected shape: {0}")]
    UnexpectedShape(String),
}

#[async_trait]
pub trait PriceApi: Send + Sync {
    async fn estimate_price(&self, request: &EstimateRequest)
        -> Result<EstimateResponse, FetchError>;
    async fn location_names(&self) -> Result<LocationsResponse, FetchError>;
}

pub struct HttpPriceClient {
    http: Client,
    server_url: String,
}

impl HttpPriceClient {
    /// `server_url` is expected without a trailing slash, as produced by
    /// [`ClientSettings::normalized_server_url`].
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into(),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        Ok(Self::new(settings.normalized_server_url()?))
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "estimator response");
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|err| FetchError::Decode(err.to_string()))?;
        debug!(%body, "estimator response body");
        serde_json::from_value(body).map_err(|err| FetchError::UnexpectedShape(err.to_string()))
    }
}

#[async_trait]
impl PriceApi for HttpPriceClient {
    async fn estimate_price(
        &self,
        request: &EstimateRequest,
    ) -> Result<EstimateResponse, FetchError> {
        let form = request
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        let response = self
            .http
            .post(format!("{}{PREDICT_PATH}", self.server_url))
            .multipart(form)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        Self::decode(response).await
    }

    async fn location_names(&self) -> Result<LocationsResponse, FetchError> {
        let response = self
            .http
            .get(format!("{}{LOCATIONS_PATH}", self.server_url))
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        Self::decode(response).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
