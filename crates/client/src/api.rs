//! Thin wrapper over the `/api/bookings` endpoints

use clinic_app::{Booking, BookingPayload};
use reqwest::{Response, StatusCode};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/bookings";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Booking not found")]
    NotFound,

    #[error("server responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client for the bookings API rooted at `base_url`
#[derive(Debug, Clone)]
pub struct BookingsClient {
    http: reqwest::Client,
    base_url: String,
}

impl BookingsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url, id)
    }

    pub async fn list(&self) -> Result<Vec<Booking>, ClientError> {
        let response = self.http.get(&self.base_url).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Booking, ClientError> {
        let response = self.http.get(self.item_url(id)).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// Returns the server's confirmation text; the API does not echo the record
    pub async fn create(&self, payload: &BookingPayload) -> Result<String, ClientError> {
        let response = self.http.post(&self.base_url).json(payload).send().await?;
        Ok(check(response).await?.text().await?)
    }

    pub async fn update(&self, id: i64, payload: &BookingPayload) -> Result<String, ClientError> {
        let response = self.http.put(self.item_url(id)).json(payload).send().await?;
        Ok(check(response).await?.text().await?)
    }

    pub async fn delete(&self, id: i64) -> Result<String, ClientError> {
        let response = self.http.delete(self.item_url(id)).send().await?;
        Ok(check(response).await?.text().await?)
    }
}

async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(%status, %body, "bookings API returned an error");
    Err(ClientError::Status { status, body })
}
