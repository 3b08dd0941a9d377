pub mod catalog;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod orchestrator;
pub mod prompts;
pub mod service;

pub use catalog::{EnglishLevel, StaticCatalog, Subject, Topic, TopicCatalog};
pub use config::AppConfig;
pub use content::{
    extract_json, Artifact, CardType, LessonCard, LessonContent, Quiz, QuizOption, QuizQuestion,
};
pub use error::{ContentError, Result};
pub use generator::{
    FailoverGenerator, GeminiClient, GenerateError, GenerationRequest, Generator,
};
pub use orchestrator::ContentOrchestrator;
pub use prompts::PromptBuilder;
pub use service::{ContentService, ContentServiceBuilder};
