//! Mock text generator for testing

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::TextGenerator;
use crate::error::{ApiError, Result};

/// Mock generator with configurable response, failure, and latency
pub struct MockGenerator {
    response: Option<String>,
    fails: bool,
    delay: Duration,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self {
            response: Some("# Generated documentation".to_string()),
            fails: false,
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, response: &str) -> Self {
        self.response = Some(response.to_string());
        self
    }

    /// Return an empty body, which the client contract treats as a failure
    pub fn with_empty_response(mut self) -> Self {
        self.response = None;
        self
    }

    pub fn with_error(mut self) -> Self {
        self.fails = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of generate calls made
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Prompts captured from generate calls, in order
    pub async fn captured_prompts(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.lock().await.push(prompt.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fails {
            return Err(ApiError::ServerError("mock generation failure".to_string()).into());
        }
        match &self.response {
            Some(response) => Ok(response.clone()),
            None => Err(ApiError::InvalidResponse("Empty generation response".to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_generator_captures_prompts() {
        let generator = MockGenerator::new().with_response("docs");

        let out = generator.generate("prompt one").await.unwrap();
        assert_eq!(out, "docs");
        assert_eq!(generator.call_count().await, 1);
        assert_eq!(generator.captured_prompts().await, vec!["prompt one"]);
    }

    #[tokio::test]
    async fn test_mock_generator_failure_modes() {
        let failing = MockGenerator::new().with_error();
        assert!(failing.generate("p").await.is_err());

        let empty = MockGenerator::new().with_empty_response();
        assert!(empty.generate("p").await.is_err());
    }
}
