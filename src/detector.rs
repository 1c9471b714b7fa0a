use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::emotion::EmotionReading;

/// Reasons a detection request yields no usable reading.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("detection request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("detection service answered {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed detection payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Source of live emotion readings.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self) -> Result<EmotionReading, DetectError>;
}

/// [`Detector`] querying the HTTP detection service with a plain `GET`.
#[derive(Clone)]
pub struct HttpDetector {
    client: reqwest::Client,
    url: String,
}

impl HttpDetector {
    pub const DEFAULT_PATH: &'static str = "/detect";

    /// Builds a detector for `{base_url}{path}`.
    ///
    /// # Examples
    /// ```
    /// use felt::HttpDetector;
    /// let detector = HttpDetector::new("http://localhost:5000/", "/detect", None).unwrap();
    /// assert_eq!(detector.url(), "http://localhost:5000/detect");
    /// ```
    pub fn new(base_url: &str, path: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Self {
            client: builder.build()?,
            url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Detector for HttpDetector {
    async fn detect(&self) -> Result<EmotionReading, DetectError> {
        let resp = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DetectError::Status(status));
        }
        let body = resp.bytes().await?;
        let reading: EmotionReading = serde_json::from_slice(&body)?;
        if let Some(message) = &reading.message {
            debug!(%message, "detection service note");
        }
        Ok(reading)
    }
}
