//! Round-trip timing sampler
//!
//! Issues one lightweight GET against the ping endpoint per call and measures
//! the elapsed wall-clock time. Transport failures are folded into the sample
//! itself (zero-duration placeholder) so a bad round trip never aborts a run.

use crate::error::{AppError, ErrorContext, Result};
use crate::models::config::Config;
use crate::models::sample::TimingSample;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Body returned by the ping endpoint
#[derive(Debug, Deserialize)]
pub struct PingResponse {
    /// Handling time the server measured for itself, in milliseconds
    pub elapsed_ms: f64,
}

/// Timing sampler abstraction for testing and alternate transports
#[async_trait]
pub trait Sampler: Send + Sync {
    /// Issue exactly one round trip and return the measured sample.
    ///
    /// Never fails: transport errors come back as failed samples.
    async fn sample(&self) -> TimingSample;
}

/// HTTP sampler backed by a shared reqwest client
pub struct HttpSampler {
    client: Client,
    ping_url: String,
    timeout: Duration,
}

impl HttpSampler {
    /// Create a sampler for the configured deployment
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("octane-bench/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            ping_url: config.ping_url(),
            timeout,
        })
    }

    /// The ping URL this sampler targets
    pub fn ping_url(&self) -> &str {
        &self.ping_url
    }

    async fn round_trip(&self) -> Result<TimingSample> {
        let start = Instant::now();

        let response = self.client.get(&self.ping_url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(AppError::http_request(format!(
                "Ping endpoint returned status {}",
                status.as_u16()
            )));
        }

        let body: PingResponse = response
            .json()
            .await
            .with_context(|| format!("Decoding ping response from {}", self.ping_url))?;
        let elapsed = start.elapsed();

        Ok(TimingSample::success(elapsed, Some(body.elapsed_ms)))
    }
}

#[async_trait]
impl Sampler for HttpSampler {
    async fn sample(&self) -> TimingSample {
        match self.round_trip().await {
            Ok(sample) => sample,
            Err(AppError::Timeout(_)) => TimingSample::timeout(self.timeout),
            Err(e) => TimingSample::failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampler_creation_from_default_config() {
        let config = Config::default();
        let sampler = HttpSampler::new(&config).unwrap();
        assert!(sampler.ping_url().ends_with("/benchmark/ping"));
    }

    #[test]
    fn test_ping_response_deserialization() {
        let body: PingResponse = serde_json::from_str(r#"{"elapsed_ms": 1.234}"#).unwrap();
        assert!((body.elapsed_ms - 1.234).abs() < 1e-9);
    }

    #[test]
    fn test_ping_response_rejects_missing_field() {
        let result: std::result::Result<PingResponse, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }
}
