//! Outcome-to-response translation and the `WWW-Authenticate` challenge.

use http::{Response, StatusCode};
use tracing::debug;

use signet_core::VerificationOutcome;

/// Environment variable overriding the challenged header list,
/// space-separated.
pub const CHALLENGE_HEADERS_ENV: &str = "SIGNET_CHALLENGE_HEADERS";

/// The header list callers are asked to sign.
///
/// This is deployment configuration, fixed at startup. It is deliberately
/// never derived from the failed request: the challenge tells clients what a
/// valid request looks like, not what the invalid one contained.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeConfig {
    /// Header names (and pseudo-headers) a caller is expected to cover.
    pub headers: Vec<String>,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            headers: vec![
                "(request-target)".to_owned(),
                "host".to_owned(),
                "date".to_owned(),
            ],
        }
    }
}

impl ChallengeConfig {
    /// Load the challenge configuration from the environment, falling back
    /// to the default list.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = std::env::var(CHALLENGE_HEADERS_ENV) {
            let headers: Vec<String> = v
                .split(' ')
                .filter(|token| !token.is_empty())
                .map(str::to_ascii_lowercase)
                .collect();
            if !headers.is_empty() {
                config.headers = headers;
            }
        }
        config
    }

    /// The `WWW-Authenticate` challenge value naming the expected headers.
    #[must_use]
    pub fn www_authenticate(&self) -> String {
        format!("Signature headers=\"{}\"", self.headers.join(" "))
    }
}

/// Translate a [`VerificationOutcome`] into an HTTP response.
///
/// `Verified` becomes an empty success response; every other outcome becomes
/// an unauthorized response carrying the configured `WWW-Authenticate`
/// challenge and a body naming the outcome.
#[must_use]
pub fn respond(outcome: &VerificationOutcome, challenge: &ChallengeConfig) -> Response<String> {
    if outcome.is_verified() {
        Response::builder()
            .status(StatusCode::OK)
            .body(String::new())
            .expect("valid success response")
    } else {
        debug!(%outcome, "rejecting unverified request");
        Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .header(http::header::WWW_AUTHENTICATE, challenge.www_authenticate())
            .body(outcome.to_string())
            .expect("valid challenge response")
    }
}
