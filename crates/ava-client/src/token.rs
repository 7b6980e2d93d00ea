//! Client for the Ava server's token endpoint.

use ava_types::{ErrorBody, TokenRequest, TokenResponse, TOKEN_PATH};
use thiserror::Error;

/// Message used when a rejected request carries no usable error body.
const DEFAULT_FAILURE: &str = "Failed to get token";

/// Why a credential could not be obtained. `Display` is user-facing.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Phone number is required")]
    MissingPhoneNumber,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid token response: {0}")]
    MalformedResponse(String),
}

/// Requests room credentials and tracks the request's loading/error state.
///
/// A failed request is reported once; the caller decides whether to submit
/// again.
#[derive(Debug, Clone)]
pub struct TokenClient {
    http: reqwest::Client,
    endpoint: String,
    is_loading: bool,
    error: Option<String>,
}

impl TokenClient {
    /// Creates a client for the server at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: &str) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), TOKEN_PATH),
            is_loading: false,
            error: None,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message of the most recent failure, cleared when a new request starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Requests a credential for `phone_number`.
    ///
    /// The number is trimmed; an empty number fails without a request.
    pub async fn request_token(&mut self, phone_number: &str) -> Result<TokenResponse, TokenError> {
        self.error = None;

        let phone_number = phone_number.trim();
        let result = if phone_number.is_empty() {
            Err(TokenError::MissingPhoneNumber)
        } else {
            let _in_flight = InFlight::begin(&mut self.is_loading);
            send(&self.http, &self.endpoint, phone_number).await
        };

        if let Err(e) = &result {
            tracing::warn!(endpoint = %self.endpoint, "token request failed: {}", e);
            self.error = Some(e.to_string());
        }
        result
    }
}

/// Holds the in-flight flag until dropped, including when the request
/// future is cancelled mid-await.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn begin(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

async fn send(
    http: &reqwest::Client,
    endpoint: &str,
    phone_number: &str,
) -> Result<TokenResponse, TokenError> {
    let response = http
        .post(endpoint)
        .json(&TokenRequest {
            phone_number: phone_number.to_string(),
        })
        .send()
        .await?;

    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .map(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_FAILURE.to_string());
        return Err(TokenError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&body).map_err(|e| TokenError::MalformedResponse(e.to_string()))
}
