//! HTTP client for the username.dev `/check` endpoint.

use std::fmt;
use std::time::Duration;

use log::debug;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use thiserror::Error;
use ureq::Agent;
use url::Url;

use crate::types::{CheckResult, ProblemDetail};

/// Base URL of the hosted API.
pub const DEFAULT_BASE_URL: &str = "https://api.username.dev";

/// Default bound on a single request, connect through body read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const DASHBOARD_URL: &str = "https://app.username.dev/dashboard";

/// Everything but the URI-component unreserved marks is escaped, so a space
/// goes out as `%20` and never as `+`.
const INPUT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Errors that can occur when checking a username.
///
/// Returned as the error case of [`Client::new`] and [`Client::check`].
/// Every variant is terminal: the client never retries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// No API key was configured.
    #[error("API key is required")]
    MissingApiKey,
    /// The configured base URL could not be parsed.
    #[error("Invalid base URL `{url}`: {source}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        source: url::ParseError,
    },
    /// The username was empty or only whitespace.
    #[error("Username cannot be empty")]
    EmptyUsername,
    /// The API answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// No HTTP response could be obtained.
    #[error("Network error: {0}")]
    Network(#[source] Box<ureq::Error>),
    /// A 2xx response body was not a valid check result.
    #[error("Invalid response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl From<ureq::Error> for ClientError {
    fn from(e: ureq::Error) -> Self {
        Self::Network(Box::new(e))
    }
}

/// A rejected request, built from the API's problem document.
///
/// Displays as `[<status>] <title>: <detail>` followed by an actionable hint
/// for statuses that have one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status reported in the problem document.
    pub status: u16,
    /// Short summary of the problem.
    pub title: String,
    /// Explanation of this occurrence.
    pub detail: String,
    /// Suggested next step, if the status has one.
    pub hint: Option<String>,
    /// Seconds to wait before retrying (429 only).
    pub retry_after: Option<u64>,
}

impl ApiError {
    /// Build an error from a decoded problem document.
    #[must_use]
    pub fn from_problem(problem: ProblemDetail) -> Self {
        let hint = hint_for(problem.status, problem.retry_after);
        Self {
            status: problem.status,
            title: problem.title,
            detail: problem.detail,
            hint,
            retry_after: problem.retry_after,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.title, self.detail)?;
        if let Some(hint) = &self.hint {
            write!(f, " {hint}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

fn hint_for(status: u16, retry_after: Option<u64>) -> Option<String> {
    match (status, retry_after) {
        (401, _) => Some(format!("Check your API key at {DASHBOARD_URL}")),
        (402, _) => Some(format!("Purchase additional requests at {DASHBOARD_URL}")),
        (429, Some(1)) => Some("Retry after 1 second.".to_owned()),
        (429, Some(secs)) if secs > 0 => Some(format!("Retry after {secs} seconds.")),
        (503, _) => {
            Some("The service is temporarily unavailable. Please try again later.".to_owned())
        }
        _ => None,
    }
}

/// Connection settings for a [`Client`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use username_dev::check::ClientConfig;
///
/// let config = ClientConfig::new("un_live_example")
///     .with_base_url("http://127.0.0.1:8080")
///     .with_timeout(Duration::from_secs(3));
/// assert_eq!(config.base_url(), "http://127.0.0.1:8080");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Settings for the hosted API with the given key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at another deployment. A trailing `/` is ignored.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    /// Replace the global per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

// The key is a credential; keep it out of debug output and logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// An HTTP client for the username.dev API.
///
/// Holds one configured agent and the resolved `/check` endpoint; every
/// [`check`](Client::check) is a single blocking round trip on it.
///
/// # Example
///
/// ```no_run
/// use username_dev::check::{Client, ClientConfig};
///
/// let client = Client::new(ClientConfig::new("un_live_example"))?;
/// let result = client.check("berlin")?;
/// println!("reserved: {}", result.is_reserved);
/// # Ok::<(), username_dev::check::ClientError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    agent: Agent,
    config: ClientConfig,
    endpoint: Url,
}

impl Client {
    /// Create a client from the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingApiKey`] if the key is empty, or
    /// [`ClientError::InvalidBaseUrl`] if the base URL does not parse.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if config.api_key.is_empty() {
            return Err(ClientError::MissingApiKey);
        }
        let endpoint = Url::parse(&format!("{}/check", config.base_url)).map_err(|source| {
            ClientError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            }
        })?;
        let agent_config = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            // Problem documents ride on 4xx/5xx responses, so statuses must
            // come back as responses rather than errors.
            .http_status_as_error(false)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION"),
                " (",
                env!("CARGO_PKG_REPOSITORY"),
                ")"
            ))
            .build();
        Ok(Self {
            agent: Agent::new_with_config(agent_config),
            config,
            endpoint,
        })
    }

    /// The settings this client was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Look up whether `username` is reserved.
    ///
    /// Sends exactly one `GET {base_url}/check?input=<username>` request.
    /// The username is sent as given (percent-encoded); the server does the
    /// normalization.
    ///
    /// # Errors
    ///
    /// - [`ClientError::EmptyUsername`] if `username` is blank (no request is made).
    /// - [`ClientError::Api`] if the server answers with a non-2xx status.
    /// - [`ClientError::Network`] if no response could be obtained.
    /// - [`ClientError::Decode`] if a 2xx body is not a check result.
    pub fn check(&self, username: &str) -> Result<CheckResult, ClientError> {
        if username.trim().is_empty() {
            return Err(ClientError::EmptyUsername);
        }

        let url = format!(
            "{}?input={}",
            self.endpoint,
            utf8_percent_encode(username, INPUT_ENCODE_SET)
        );
        debug!("GET {url}");

        let mut response = self
            .agent
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .call()?;

        let status = response.status();
        let body = response.body_mut().read_to_string()?;
        debug!("{url} -> {status}");

        if status.is_success() {
            return serde_json::from_str(&body).map_err(ClientError::Decode);
        }

        let problem = serde_json::from_str::<ProblemDetail>(&body).unwrap_or_else(|e| {
            debug!("non-problem error body ({e}): {body:?}");
            let detail = body.trim();
            ProblemDetail {
                problem_type: String::new(),
                title: status.canonical_reason().unwrap_or("HTTP error").to_owned(),
                status: status.as_u16(),
                detail: if detail.is_empty() {
                    "no problem detail in response".to_owned()
                } else {
                    detail.to_owned()
                },
                instance: String::new(),
                retry_after: None,
            }
        });
        Err(ApiError::from_problem(problem).into())
    }
}
