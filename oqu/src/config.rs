//! Application configuration from the environment

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use oqu_cache::{StoreConfig, SECS_PER_DAY};

use crate::error::{ContentError, Result};
use crate::generator::{parse_api_keys, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::prompts::DEFAULT_QUIZ_QUESTIONS;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Tried in order until one succeeds
    pub api_keys: Vec<String>,
    pub model: String,
    pub temperature: f32,
    pub cache_dir: PathBuf,
    pub store: StoreConfig,
    pub quiz_questions: usize,
    /// JSON catalog replacing the built-in topics
    pub catalog_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            cache_dir: default_cache_dir(),
            store: StoreConfig::default(),
            quiz_questions: DEFAULT_QUIZ_QUESTIONS,
            catalog_path: None,
        }
    }
}

/// `<data dir>/oqu/cache`, or `./.oqu/cache` when the platform has no data dir
pub fn default_cache_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("oqu").join("cache"))
        .unwrap_or_else(|| PathBuf::from(".oqu").join("cache"))
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset or blank means default
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get("GEMINI_API_KEY") {
            config.api_keys = parse_api_keys(&raw);
        }
        if let Some(model) = get("OQU_MODEL") {
            config.model = model.trim().to_string();
        }
        if let Some(raw) = get("OQU_TEMPERATURE") {
            config.temperature = parse_var("OQU_TEMPERATURE", &raw)?;
        }
        if let Some(dir) = get("OQU_CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Some(raw) = get("OQU_QUIZ_QUESTIONS") {
            config.quiz_questions = parse_var("OQU_QUIZ_QUESTIONS", &raw)?;
        }
        if let Some(path) = get("OQU_CATALOG") {
            config.catalog_path = Some(PathBuf::from(path));
        }

        let mut store = StoreConfig::builder();
        if let Some(raw) = get("OQU_CACHE_MAX_ENTRIES") {
            store = store.max_entries(parse_var("OQU_CACHE_MAX_ENTRIES", &raw)?);
        }
        if let Some(raw) = get("OQU_CACHE_MAX_AGE_DAYS") {
            let days: u64 = parse_var("OQU_CACHE_MAX_AGE_DAYS", &raw)?;
            let secs = days.checked_mul(SECS_PER_DAY).ok_or_else(|| {
                ContentError::Config(format!("OQU_CACHE_MAX_AGE_DAYS={} is too large", days))
            })?;
            store = store.max_age(Duration::from_secs(secs));
        }
        config.store = store.build();

        config.validate()?;
        Ok(config)
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.store
            .validate()
            .map_err(|e| ContentError::Config(e.to_string()))?;

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ContentError::Config(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.quiz_questions == 0 {
            return Err(ContentError::Config(
                "quiz question count must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ContentError::Config(format!("Invalid {}={:?}: {}", key, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]).unwrap();
        assert!(config.api_keys.is_empty());
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.store.max_entries, 50);
        assert_eq!(config.store.max_age, Duration::from_secs(7 * 24 * 60 * 60));
        assert_eq!(config.quiz_questions, 5);
        assert!(config.cache_dir.ends_with("oqu/cache"));
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("GEMINI_API_KEY", "k1, k2"),
            ("OQU_MODEL", "gemini-2.5-pro"),
            ("OQU_TEMPERATURE", "0.2"),
            ("OQU_CACHE_DIR", "/tmp/oqu"),
            ("OQU_CACHE_MAX_ENTRIES", "10"),
            ("OQU_CACHE_MAX_AGE_DAYS", "1"),
            ("OQU_QUIZ_QUESTIONS", "3"),
            ("OQU_CATALOG", "topics.json"),
        ])
        .unwrap();

        assert_eq!(config.api_keys, vec!["k1", "k2"]);
        assert_eq!(config.model, "gemini-2.5-pro");
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/oqu"));
        assert_eq!(config.store.max_entries, 10);
        assert_eq!(config.store.max_age, Duration::from_secs(86_400));
        assert_eq!(config.quiz_questions, 3);
        assert_eq!(config.catalog_path, Some(PathBuf::from("topics.json")));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = from_pairs(&[("OQU_MODEL", "  "), ("OQU_CACHE_MAX_ENTRIES", "")]).unwrap();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.store.max_entries, 50);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            from_pairs(&[("OQU_CACHE_MAX_ENTRIES", "many")]),
            Err(ContentError::Config(_))
        ));
        assert!(matches!(
            from_pairs(&[("OQU_CACHE_MAX_ENTRIES", "0")]),
            Err(ContentError::Config(_))
        ));
        assert!(matches!(
            from_pairs(&[("OQU_TEMPERATURE", "5")]),
            Err(ContentError::Config(_))
        ));
        assert!(matches!(
            from_pairs(&[("OQU_CACHE_MAX_AGE_DAYS", "1000000000000000")]),
            Err(ContentError::Config(_))
        ));
    }
}
