//! CAPTCHA solving with a bounded retry budget.
//!
//! The portal gates its login behind a 4-character image CAPTCHA
//! (uppercase letters and digits). Recognition happens at an external
//! OCR service; this module owns the retry protocol around it: every
//! attempt is independent, every failure mode costs exactly one attempt,
//! and after the budget is spent the failure is definitive.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::ScrapeError;

/// One recognition attempt. `None` covers every per-attempt failure:
/// network errors, bad status, malformed JSON, service error codes.
#[async_trait]
pub trait CaptchaApi: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Option<String>;
}

/// Supplier of CAPTCHA images. The login collaborator refreshes the
/// CAPTCHA widget and screenshots it; each call must yield a fresh image
/// because the portal rotates the challenge after a wrong answer.
#[async_trait]
pub trait CaptchaImageSource: Send {
    async fn fresh_image(&mut self) -> Option<Vec<u8>>;
}

/// Retry-policy wrapper around a [`CaptchaApi`].
pub struct CaptchaSolver<A: CaptchaApi> {
    api: A,
    max_retries: usize,
    retry_delay: Duration,
}

impl<A: CaptchaApi> CaptchaSolver<A> {
    pub fn new(api: A, config: &Config) -> Self {
        Self {
            api,
            max_retries: config.captcha_max_retries,
            retry_delay: Duration::from_secs_f64(config.delay_after_captcha_fail_secs),
        }
    }

    /// Solve one CAPTCHA instance.
    ///
    /// Each attempt grabs a fresh image and asks the API once. A result
    /// that is not exactly 4 characters counts as a failed attempt, not
    /// a fatal error. After `max_retries` attempts the error is
    /// definitive and no further attempt is made.
    pub async fn solve(&self, images: &mut dyn CaptchaImageSource) -> Result<String, ScrapeError> {
        for attempt in 1..=self.max_retries {
            if attempt > 1 {
                sleep(self.retry_delay).await;
            }

            let Some(image) = images.fresh_image().await else {
                debug!("CAPTCHA attempt {}/{}: no image", attempt, self.max_retries);
                continue;
            };

            match self.api.recognize(&image).await {
                Some(text) => {
                    let text = text.trim().to_uppercase();
                    if text.chars().count() == 4 {
                        info!("✅ CAPTCHA solved on attempt {}: {}", attempt, text);
                        return Ok(text);
                    }
                    warn!(
                        "⚠️ CAPTCHA attempt {}/{}: result '{}' is not 4 characters",
                        attempt, self.max_retries, text
                    );
                }
                None => {
                    debug!("CAPTCHA attempt {}/{}: no result", attempt, self.max_retries);
                }
            }
        }

        error!("❌ CAPTCHA unsolved after {} attempts", self.max_retries);
        Err(ScrapeError::CaptchaExhausted { attempts: self.max_retries })
    }
}

/// CapSolver `createTask` client (ImageToTextTask).
pub struct CapsolverClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    website_url: String,
}

impl CapsolverClient {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_url: config.captcha_api_url.clone(),
            api_key: config.captcha_api_key.clone(),
            website_url: config.portal_url.clone(),
        }
    }
}

#[async_trait]
impl CaptchaApi for CapsolverClient {
    async fn recognize(&self, image: &[u8]) -> Option<String> {
        let payload = json!({
            "clientKey": self.api_key,
            "task": {
                "type": "ImageToTextTask",
                // accuracy hint for the recognition model
                "websiteURL": self.website_url,
                "module": "common",
                "body": BASE64.encode(image),
            }
        });

        let response = match self.client.post(&self.api_url).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("❌ CAPTCHA API request failed: {}", e);
                return None;
            }
        };
        if !response.status().is_success() {
            error!("❌ CAPTCHA API returned {}", response.status());
            return None;
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                error!("❌ CAPTCHA API response is not JSON: {}", e);
                return None;
            }
        };

        if body.get("errorId").and_then(Value::as_i64).unwrap_or(1) != 0 {
            error!(
                "❌ CAPTCHA service error: {}",
                body.get("errorDescription").and_then(|v| v.as_str()).unwrap_or("unknown")
            );
            return None;
        }

        match body
            .get("solution")
            .and_then(|s| s.get("text"))
            .and_then(|v| v.as_str())
        {
            Some(text) => Some(text.trim().to_string()),
            None => {
                warn!("⚠️ no solution.text in CAPTCHA response");
                None
            }
        }
    }
}
