//! Retry one prompt across several credentials.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{GeminiClient, GenerateError, GenerationRequest, Generator};

/// Tries each inner generator in order; the first success wins.
///
/// When every attempt fails the error is [`GenerateError::Exhausted`]
/// carrying the last failure.
#[derive(Clone)]
pub struct FailoverGenerator {
    generators: Vec<Arc<dyn Generator>>,
}

impl FailoverGenerator {
    pub fn new(generators: Vec<Arc<dyn Generator>>) -> Self {
        Self { generators }
    }

    /// One [`GeminiClient`] per key, tried in the given order
    pub fn from_api_keys(keys: &[String]) -> Result<Self, GenerateError> {
        let generators = keys
            .iter()
            .map(|key| GeminiClient::new(key.clone()).map(|c| Arc::new(c) as Arc<dyn Generator>))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(generators))
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

#[async_trait]
impl Generator for FailoverGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        if self.generators.is_empty() {
            return Err(GenerateError::NoCredentials);
        }

        let total = self.generators.len();
        let mut last_error = None;

        for (i, generator) in self.generators.iter().enumerate() {
            info!("Attempting generation with API key {}/{}", i + 1, total);

            match generator.generate(request).await {
                Ok(text) => {
                    info!("Generation successful with key {}", i + 1);
                    return Ok(text);
                }
                Err(e) => {
                    warn!("API key {}/{} failed: {}", i + 1, total, e);
                    last_error = Some(e);
                }
            }
        }

        Err(GenerateError::Exhausted {
            attempts: total,
            last: Box::new(last_error.unwrap_or(GenerateError::NoCredentials)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        reply: Result<&'static str, &'static str>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn ok(text: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(msg: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(msg),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Generator for Scripted {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(String::from)
                .map_err(|msg| GenerateError::Other(msg.to_string()))
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("m", "p", 0.7)
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let first = Scripted::failing("key revoked");
        let second = Scripted::ok("text");
        let third = Scripted::ok("unused");

        let failover = FailoverGenerator::new(vec![first.clone(), second.clone(), third.clone()]);
        assert_eq!(failover.generate(&request()).await.unwrap(), "text");

        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
        assert_eq!(third.calls(), 0);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_last_error() {
        let failover = FailoverGenerator::new(vec![
            Scripted::failing("first"),
            Scripted::failing("second"),
        ]);

        match failover.generate(&request()).await {
            Err(GenerateError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 2);
                assert_eq!(last.to_string(), "second");
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_credentials() {
        let failover = FailoverGenerator::new(Vec::new());
        assert!(failover.is_empty());
        assert!(matches!(
            failover.generate(&request()).await,
            Err(GenerateError::NoCredentials)
        ));
    }

    #[test]
    fn test_from_api_keys() {
        let failover =
            FailoverGenerator::from_api_keys(&["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(failover.len(), 2);
    }
}
