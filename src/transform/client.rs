//! Core `TextTransformer` trait and the `GeminiClient` implementation.
//!
//! `GeminiClient` calls the `generateContent` endpoint of the Gemini API.
//! All connection details come from [`TransformConfig`]; the API key comes
//! from the environment once, at construction time.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use thiserror::Error;

use crate::clipboard::preview;
use crate::config::TransformConfig;
use crate::transform::prompt::{build_request, PROMPT_VERSION};
use crate::transform::response::parse_response;

// ---------------------------------------------------------------------------
// TransformError
// ---------------------------------------------------------------------------

/// Everything that can end a transform call without a result.
///
/// The `Display` text is what the status indicator shows, so diagnostic
/// detail that should stay out of the UI (transport causes, the failing
/// parse step) is carried in the variant but left out of the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The API key is unset or empty.  No request is made.
    #[error("missing credential")]
    MissingCredential,

    /// The request could not be built (bad endpoint URL, body serialisation).
    #[error("could not build request: {0}")]
    InvalidRequest(String),

    /// Connection, DNS, TLS or timeout failure.
    #[error("network request failed")]
    Transport(String),

    /// The service answered with something other than HTTP 200.
    #[error("remote service rejected the request (HTTP {status}): {body}")]
    RemoteRejected { status: u16, body: String },

    /// HTTP 200, but the body did not have the expected shape.
    #[error("unexpected response from transform service")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for TransformError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            TransformError::InvalidRequest(e.to_string())
        } else {
            TransformError::Transport(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// TextTransformer trait
// ---------------------------------------------------------------------------

/// Async trait for the remote text transformation.
///
/// Implementors must be `Send + Sync` so they can be shared with the spawned
/// transform task (`Arc<dyn TextTransformer>`).  One call is one attempt;
/// implementors must not retry.
#[async_trait]
pub trait TextTransformer: Send + Sync {
    async fn transform(&self, input: &str) -> Result<String, TransformError>;
}

// ---------------------------------------------------------------------------
// ApiCredential
// ---------------------------------------------------------------------------

/// The API key, read once at startup.  `Debug` never prints the secret.
#[derive(Clone, Default)]
pub struct ApiCredential(Option<String>);

impl ApiCredential {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self(Some(key).filter(|k| !k.trim().is_empty()))
    }

    /// No credential; every transform fails with `MissingCredential`.
    pub fn missing() -> Self {
        Self(None)
    }

    /// Read the key from environment variable `var`.
    pub fn from_env(var: &str) -> Self {
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => {
                log::info!("{var} loaded");
                Self(Some(key))
            }
            _ => {
                log::warn!("{var} not set; every transform will fail until it is provided");
                Self(None)
            }
        }
    }

    fn key(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl std::fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(_) => f.write_str("ApiCredential(<redacted>)"),
            None => f.write_str("ApiCredential(<missing>)"),
        }
    }
}

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

/// Finish `builder`, falling back to a default client (and saying so) if the
/// configured options cannot be applied.
fn build_http_client(builder: reqwest::ClientBuilder) -> reqwest::Client {
    builder.build().unwrap_or_else(|e| {
        log::warn!("transform: HTTP client setup failed ({e}); using defaults without timeout");
        reqwest::Client::new()
    })
}

/// Calls `{base_url}/v1beta/models/{model}:generateContent`.
///
/// The key travels in the `x-goog-api-key` header so it never shows up in a
/// logged URL.
pub struct GeminiClient {
    client: reqwest::Client,
    config: TransformConfig,
    credential: ApiCredential,
}

impl GeminiClient {
    /// Build a client, reading the credential from `config.api_key_env`.
    pub fn from_config(config: &TransformConfig) -> Self {
        Self::new(config, ApiCredential::from_env(&config.api_key_env))
    }

    /// Build a client with an explicit credential.
    ///
    /// The whole-request timeout is applied only when `config.timeout_secs`
    /// is set.  A default client is used as a last-resort fallback if the
    /// builder fails.
    pub fn new(config: &TransformConfig, credential: ApiCredential) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = build_http_client(builder);

        Self {
            client,
            config: config.clone(),
            credential,
        }
    }

    /// The `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> Result<Url, TransformError> {
        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        Url::parse(&raw).map_err(|e| TransformError::InvalidRequest(format!("{raw}: {e}")))
    }
}

#[async_trait]
impl TextTransformer for GeminiClient {
    async fn transform(&self, input: &str) -> Result<String, TransformError> {
        let key = self
            .credential
            .key()
            .ok_or(TransformError::MissingCredential)?;

        let url = self.endpoint()?;
        let body = serde_json::to_vec(&build_request(input))
            .map_err(|e| TransformError::InvalidRequest(e.to_string()))?;

        log::debug!(
            "transform: POST {url} (prompt {PROMPT_VERSION}, {} bytes, input {:?})",
            body.len(),
            preview(input)
        );

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header("x-goog-api-key", key)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                log::debug!("transform: transport error: {e}");
                TransformError::from(e)
            })?;

        let status = response.status();
        let text = response.text().await?;
        log::debug!("transform: HTTP {status}, {} byte body", text.len());

        if status != StatusCode::OK {
            return Err(TransformError::RemoteRejected {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_response(&text).map_err(|e| {
            if let TransformError::MalformedResponse(step) = &e {
                log::debug!("transform: malformed response ({step}): {text}");
            }
            e
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
