use std::future::Future;

use reqwest::header::ACCEPT;
use reqwest::StatusCode;

use super::domain::{City, ParticipantRequest};
use crate::config::ApiConfig;

/// Failure talking to the participant service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("participant service unreachable: {0}")]
    Unreachable(String),
    #[error("participant service answered {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Boundary to the remote participant service so the coordinator can be exercised with fakes.
pub trait ParticipantGateway: Send + Sync {
    fn fetch_cities(&self) -> impl Future<Output = Result<Vec<City>, GatewayError>> + Send;

    fn create_participant(
        &self,
        request: &ParticipantRequest,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

/// reqwest-backed gateway for `GET /cities` and `POST /participants`.
///
/// No client-level timeout is configured; callers bound each call themselves.
#[derive(Debug, Clone)]
pub struct HttpParticipantGateway {
    client: reqwest::Client,
    base_url: String,
    app_version: String,
}

impl HttpParticipantGateway {
    pub fn new(base_url: impl Into<String>, app_version: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            app_version: app_version.into(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.base_url.clone(), config.app_version.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn cities_url(&self) -> String {
        format!("{}/cities?v={}", self.base_url, self.app_version)
    }

    fn participants_url(&self) -> String {
        format!("{}/participants", self.base_url)
    }
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    GatewayError::Unreachable(err.to_string())
}

async fn rejection(status: StatusCode, response: reqwest::Response) -> GatewayError {
    let message = response.text().await.unwrap_or_default();
    GatewayError::Rejected {
        status: status.as_u16(),
        message,
    }
}

impl ParticipantGateway for HttpParticipantGateway {
    async fn fetch_cities(&self) -> Result<Vec<City>, GatewayError> {
        let response = self
            .client
            .get(self.cities_url())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(rejection(status, response).await);
        }

        response
            .json::<Vec<City>>()
            .await
            .map_err(|err| GatewayError::Decode(err.to_string()))
    }

    async fn create_participant(&self, request: &ParticipantRequest) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.participants_url())
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(rejection(status, response).await)
        }
    }
}
