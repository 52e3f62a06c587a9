//! HTTP embedding provider for OpenAI-compatible endpoints.
//!
//! Blocking client, so it must not be driven from inside an async runtime.
//! Unavailability is retried with exponential backoff; rate limits are not
//! retried and put the provider into a cool-down instead.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use mmos_core::config::EmbeddingConfig;
use mmos_core::errors::EmbeddingError;
use mmos_core::traits::IEmbeddingProvider;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const PROVIDER_NAME: &str = "api";
/// How long the provider reports itself unavailable after exhausting
/// retries or being rate limited without a `Retry-After` header.
const COOLDOWN: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

/// OpenAI-compatible embedding API client.
pub struct ApiEmbeddingProvider {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    /// Configured or learned from the first response. 0 = unknown.
    dimensions: AtomicUsize,
    strict_dimensions: bool,
    max_retries: u32,
    /// Unix millis before which requests are refused locally.
    cooldown_until_ms: AtomicU64,
}

impl ApiEmbeddingProvider {
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let endpoint = config
            .endpoint
            .clone()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| EmbeddingError::ProviderUnavailable {
                provider: PROVIDER_NAME.to_string(),
                reason: "no endpoint configured".to_string(),
            })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::ProviderUnavailable {
                provider: PROVIDER_NAME.to_string(),
                reason: format!("client build failed: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            dimensions: AtomicUsize::new(config.dimensions.unwrap_or(0)),
            strict_dimensions: config.dimensions.is_some(),
            max_retries: config.max_retries,
            cooldown_until_ms: AtomicU64::new(0),
        })
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn cool_down(&self, duration: Duration) {
        let until = Self::now_ms() + duration.as_millis() as u64;
        self.cooldown_until_ms.store(until, Ordering::Relaxed);
    }

    /// Clear any cool-down, e.g. after a health check.
    pub fn reset_availability(&self) {
        self.cooldown_until_ms.store(0, Ordering::Relaxed);
    }

    fn request_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if !self.is_available() {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: PROVIDER_NAME.to_string(),
                reason: "cooling down after previous failures".to_string(),
            });
        }

        let mut last_err = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                std::thread::sleep(delay);
                debug!(attempt, "retrying API embedding request");
            }

            match self.send_request(texts) {
                Ok(embeddings) => return self.validate(texts.len(), embeddings),
                Err(e @ EmbeddingError::RateLimited { .. }) => {
                    let wait = match &e {
                        EmbeddingError::RateLimited {
                            retry_after_secs: Some(secs),
                            ..
                        } => Duration::from_secs(*secs),
                        _ => COOLDOWN,
                    };
                    warn!(attempt, error = %e, "API embedding request rate limited");
                    self.cool_down(wait);
                    return Err(e);
                }
                Err(e @ EmbeddingError::ProviderUnavailable { .. }) => {
                    warn!(attempt, error = %e, "API embedding request failed");
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        self.cool_down(COOLDOWN);
        Err(last_err.unwrap_or_else(|| EmbeddingError::InferenceFailed {
            reason: "all retries exhausted".to_string(),
        }))
    }

    fn send_request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut request = self.client.post(&self.endpoint).json(&EmbedRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                EmbeddingError::ProviderUnavailable {
                    provider: PROVIDER_NAME.to_string(),
                    reason: format!("HTTP error: {e}"),
                }
            } else {
                EmbeddingError::InferenceFailed {
                    reason: format!("HTTP error: {e}"),
                }
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            return Err(EmbeddingError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                retry_after_secs,
            });
        }
        if status.is_server_error() {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: PROVIDER_NAME.to_string(),
                reason: format!("API returned {status}"),
            });
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("API returned {status}: {body}"),
            });
        }

        let mut resp: EmbedResponse =
            response
                .json()
                .map_err(|e| EmbeddingError::InferenceFailed {
                    reason: format!("JSON parse error: {e}"),
                })?;
        if resp.data.iter().all(|d| d.index.is_some()) {
            resp.data.sort_by_key(|d| d.index);
        }
        Ok(resp.data.into_iter().map(|d| d.embedding).collect())
    }

    fn validate(
        &self,
        sent: usize,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if embeddings.len() != sent {
            return Err(EmbeddingError::BatchSizeMismatch {
                expected: sent,
                actual: embeddings.len(),
            });
        }
        let mut expected = self.dimensions.load(Ordering::Relaxed);
        for v in &embeddings {
            if expected == 0 && !self.strict_dimensions {
                expected = v.len();
                self.dimensions.store(expected, Ordering::Relaxed);
            }
            if v.len() != expected {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: v.len(),
                });
            }
        }
        Ok(embeddings)
    }
}

impl IEmbeddingProvider for ApiEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let results = self.request_embeddings(&[text.to_string()])?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InferenceFailed {
                reason: "empty response".to_string(),
            })
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.request_embeddings(texts)
    }

    fn dimensions(&self) -> usize {
        self.dimensions.load(Ordering::Relaxed)
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_available(&self) -> bool {
        Self::now_ms() >= self.cooldown_until_ms.load(Ordering::Relaxed)
    }
}
