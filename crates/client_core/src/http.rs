//! reqwest binding of the appointment, client directory and session seams.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::CurrentUser,
    error::ApiError,
    protocol::{Appointment, ClientRecord, NewAppointment},
};
use tracing::debug;
use url::Url;

use crate::services::{AppointmentService, SessionProvider};

const CURRENT_USER_PATH: &str = "auth/me";
const CLIENT_APPOINTMENTS_PATH: &str = "appointments/client";
const PROVIDER_APPOINTMENTS_PATH: &str = "appointments/psychologist";
const PROVIDER_CLIENTS_PATH: &str = "clients/psychologist";
const APPOINTMENTS_PATH: &str = "appointments";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct HttpAppointmentService {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpAppointmentService {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Self::with_client(base_url, token, http)
    }

    /// Uses a caller-configured client, e.g. one with custom proxy settings.
    pub fn with_client(base_url: &str, token: Option<String>, http: Client) -> Result<Self> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            token: token.filter(|token| !token.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("invalid endpoint path '{path}'"))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "http: GET");
        let response = self
            .authorize(self.http.get(url.clone()))
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;
        decode(response)
            .await
            .with_context(|| format!("GET {url} failed"))
    }
}

/// Ensures the base URL ends with `/` so relative joins append instead of
/// replacing the last path segment.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&with_slash).with_context(|| format!("invalid api base url '{raw}'"))
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_response(status.as_u16(), &body).into());
    }
    Ok(response.json().await?)
}

#[async_trait]
impl AppointmentService for HttpAppointmentService {
    async fn fetch_client_appointments(&self) -> Result<Vec<Appointment>> {
        self.get_json(CLIENT_APPOINTMENTS_PATH).await
    }

    async fn fetch_provider_appointments(&self) -> Result<Vec<Appointment>> {
        self.get_json(PROVIDER_APPOINTMENTS_PATH).await
    }

    async fn fetch_provider_clients(&self) -> Result<Vec<ClientRecord>> {
        self.get_json(PROVIDER_CLIENTS_PATH).await
    }

    async fn create_appointment(&self, request: &NewAppointment) -> Result<Appointment> {
        let url = self.endpoint(APPOINTMENTS_PATH)?;
        debug!(%url, client_id = request.client_id.0, date = %request.date, "http: POST");
        let response = self
            .authorize(self.http.post(url.clone()))
            .json(request)
            .send()
            .await
            .with_context(|| format!("POST {url} failed"))?;
        decode(response)
            .await
            .with_context(|| format!("POST {url} failed"))
    }
}

#[async_trait]
impl SessionProvider for HttpAppointmentService {
    async fn current_user(&self) -> Result<Option<CurrentUser>> {
        if self.token.is_none() {
            return Ok(None);
        }
        let url = self.endpoint(CURRENT_USER_PATH)?;
        let response = self
            .authorize(self.http.get(url.clone()))
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        decode(response)
            .await
            .map(Some)
            .with_context(|| format!("GET {url} failed"))
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
