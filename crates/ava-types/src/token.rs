use serde::{Deserialize, Serialize};

/// Request body for `POST /api/token`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    /// Caller phone number. Missing and empty are treated the same way.
    #[serde(rename = "phoneNumber", default)]
    pub phone_number: String,
}

/// Session credential returned by `POST /api/token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed room join token.
    pub token: String,
    /// Room server URL the client should connect to.
    pub url: String,
}

/// Body of every non-2xx response from the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
