//! Entry points used by the UI layer: fetch a lesson, fetch a quiz, clear
//! the content cache.

use std::sync::Arc;

use oqu_cache::{Clock, ContentKind, ContentStore, FileStorage, StorageBackend, StoreConfig, SystemClock};
use tracing::info;

use crate::catalog::{StaticCatalog, TopicCatalog};
use crate::config::AppConfig;
use crate::content::{LessonContent, Quiz};
use crate::error::{ContentError, Result};
use crate::generator::{FailoverGenerator, Generator, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::orchestrator::ContentOrchestrator;
use crate::prompts::PromptBuilder;

/// Lesson and quiz orchestrators sharing one generator, catalog and backend
pub struct ContentService {
    lessons: ContentOrchestrator<LessonContent>,
    quizzes: ContentOrchestrator<Quiz>,
    catalog: Arc<dyn TopicCatalog>,
}

impl ContentService {
    pub fn builder(
        generator: Arc<dyn Generator>,
        catalog: Arc<dyn TopicCatalog>,
        backend: Arc<dyn StorageBackend>,
    ) -> ContentServiceBuilder {
        ContentServiceBuilder {
            generator,
            catalog,
            backend,
            store_config: StoreConfig::default(),
            clock: Arc::new(SystemClock),
            prompts: PromptBuilder::default(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Wire everything from application config: one Gemini client per API
    /// key, file-backed stores under `cache_dir`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        let generator = FailoverGenerator::from_api_keys(&config.api_keys)?;
        if generator.is_empty() {
            info!("No API keys configured; only cached content can be served");
        }

        let catalog: Arc<dyn TopicCatalog> = match &config.catalog_path {
            Some(path) => Arc::new(StaticCatalog::from_json_file(path)?),
            None => Arc::new(StaticCatalog::builtin()),
        };

        Self::builder(
            Arc::new(generator),
            catalog,
            Arc::new(FileStorage::new(&config.cache_dir)),
        )
        .store_config(config.store.clone())
        .prompts(PromptBuilder::new(config.quiz_questions))
        .model(config.model.clone(), config.temperature)
        .build()
    }

    pub async fn fetch_lesson(&self, topic_id: &str, interests: &[String]) -> Result<LessonContent> {
        self.lessons.fetch(topic_id, interests).await
    }

    pub async fn fetch_quiz(&self, topic_id: &str, interests: &[String]) -> Result<Quiz> {
        self.quizzes.fetch(topic_id, interests).await
    }

    /// Remove every cached lesson and quiz
    pub fn clear_content_cache(&self) {
        self.lessons.store().clear();
        self.quizzes.store().clear();
        info!("Content cache cleared");
    }

    pub fn lesson_store(&self) -> &ContentStore<LessonContent> {
        self.lessons.store()
    }

    pub fn quiz_store(&self) -> &ContentStore<Quiz> {
        self.quizzes.store()
    }

    pub fn catalog(&self) -> &Arc<dyn TopicCatalog> {
        &self.catalog
    }
}

pub struct ContentServiceBuilder {
    generator: Arc<dyn Generator>,
    catalog: Arc<dyn TopicCatalog>,
    backend: Arc<dyn StorageBackend>,
    store_config: StoreConfig,
    clock: Arc<dyn Clock>,
    prompts: PromptBuilder,
    model: String,
    temperature: f32,
}

impl ContentServiceBuilder {
    /// Applied to both stores
    pub fn store_config(mut self, config: StoreConfig) -> Self {
        self.store_config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn prompts(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn model(mut self, model: impl Into<String>, temperature: f32) -> Self {
        self.model = model.into();
        self.temperature = temperature;
        self
    }

    pub fn build(self) -> Result<ContentService> {
        self.store_config
            .validate()
            .map_err(|e| ContentError::Config(e.to_string()))?;

        let lessons = ContentOrchestrator::new(
            Arc::new(
                ContentStore::new(ContentKind::Lesson, self.store_config.clone(), self.backend.clone())
                    .with_clock(self.clock.clone()),
            ),
            self.generator.clone(),
            self.catalog.clone(),
        )
        .with_prompts(self.prompts.clone())
        .with_model(self.model.clone(), self.temperature);

        let quizzes = ContentOrchestrator::new(
            Arc::new(
                ContentStore::new(ContentKind::Quiz, self.store_config, self.backend)
                    .with_clock(self.clock),
            ),
            self.generator,
            self.catalog.clone(),
        )
        .with_prompts(self.prompts)
        .with_model(self.model, self.temperature);

        Ok(ContentService {
            lessons,
            quizzes,
            catalog: self.catalog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oqu_cache::MemoryStorage;

    #[test]
    fn test_build_rejects_invalid_store_config() {
        let invalid = StoreConfig::builder().max_entries(0).build();
        let result = ContentService::builder(
            Arc::new(FailoverGenerator::new(Vec::new())),
            Arc::new(StaticCatalog::builtin()),
            Arc::new(MemoryStorage::new()),
        )
        .store_config(invalid)
        .build();

        assert!(matches!(result, Err(ContentError::Config(_))));
    }

    #[test]
    fn test_from_config_uses_file_storage() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = AppConfig::default().with_cache_dir(tmp.path());

        let service = ContentService::from_config(&config).unwrap();
        assert_eq!(service.lesson_store().kind(), ContentKind::Lesson);
        assert_eq!(service.quiz_store().kind(), ContentKind::Quiz);
        assert!(service.catalog().resolve_topic("g7-percentages").is_some());
    }

    #[tokio::test]
    async fn test_no_keys_still_fails_cleanly_on_miss() {
        let tmp = tempfile::TempDir::new().unwrap();
        let service =
            ContentService::from_config(&AppConfig::default().with_cache_dir(tmp.path())).unwrap();

        let err = service
            .fetch_quiz("g7-percentages", &["AI".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::GenerationUpstream(_)));
    }
}
