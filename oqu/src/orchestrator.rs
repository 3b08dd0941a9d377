use std::sync::Arc;

use oqu_cache::ContentStore;
use tracing::{debug, info, warn};

use crate::catalog::TopicCatalog;
use crate::content::{extract_json, Artifact};
use crate::error::{ContentError, Result};
use crate::generator::{GenerationRequest, Generator, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::prompts::PromptBuilder;

/// Cache-first producer of one artifact kind.
///
/// A fetch resolves the topic, serves a fresh cached artifact when the
/// interest set matches, and otherwise generates, normalizes and stores a
/// new one. Output that fails parsing or normalization is returned as an
/// error and never reaches the store.
pub struct ContentOrchestrator<A: Artifact> {
    store: Arc<ContentStore<A>>,
    generator: Arc<dyn Generator>,
    catalog: Arc<dyn TopicCatalog>,
    prompts: PromptBuilder,
    model: String,
    temperature: f32,
}

impl<A: Artifact> ContentOrchestrator<A> {
    pub fn new(
        store: Arc<ContentStore<A>>,
        generator: Arc<dyn Generator>,
        catalog: Arc<dyn TopicCatalog>,
    ) -> Self {
        Self {
            store,
            generator,
            catalog,
            prompts: PromptBuilder::default(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_prompts(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>, temperature: f32) -> Self {
        self.model = model.into();
        self.temperature = temperature;
        self
    }

    pub fn store(&self) -> &Arc<ContentStore<A>> {
        &self.store
    }

    /// Artifact for `topic_id` personalized with `interests`
    pub async fn fetch(&self, topic_id: &str, interests: &[String]) -> Result<A> {
        let topic = self
            .catalog
            .resolve_topic(topic_id)
            .ok_or_else(|| ContentError::NotFound(topic_id.to_string()))?;

        if let Some(cached) = self.store.get(topic_id, interests) {
            info!("Using cached {} for {}", A::KIND, topic_id);
            return Ok(cached);
        }

        let job = GenerationJob {
            store: self.store.clone(),
            generator: self.generator.clone(),
            request: GenerationRequest::new(
                self.model.clone(),
                A::prompt(&self.prompts, &topic, interests),
                self.temperature,
            ),
            topic_id: topic_id.to_string(),
            interests: interests.to_vec(),
        };

        // Runs detached: dropping this future does not cancel the job, which
        // still populates the cache.
        tokio::spawn(job.run())
            .await
            .map_err(|e| ContentError::TaskAborted(e.to_string()))?
    }
}

/// Everything a cache miss needs, owned so it can outlive the caller
struct GenerationJob<A: Artifact> {
    store: Arc<ContentStore<A>>,
    generator: Arc<dyn Generator>,
    request: GenerationRequest,
    topic_id: String,
    interests: Vec<String>,
}

impl<A: Artifact> GenerationJob<A> {
    async fn run(self) -> Result<A> {
        info!("Generating {} for {} with {}", A::KIND, self.topic_id, self.request.model);

        let raw = self.generator.generate(&self.request).await.map_err(|e| {
            warn!("{} generation failed for {}: {}", A::KIND, self.topic_id, e);
            ContentError::GenerationUpstream(e)
        })?;
        debug!("Received {} chars for {} {}", raw.len(), A::KIND, self.topic_id);

        let artifact = extract_json(&raw)
            .and_then(|json| A::normalize(json, &self.topic_id))
            .map_err(|e| {
                warn!("Rejected generated {} for {}: {}", A::KIND, self.topic_id, e);
                e
            })?;

        self.store.put(&self.topic_id, &self.interests, &artifact);
        Ok(artifact)
    }
}
