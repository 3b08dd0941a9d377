//! Topic catalog: topic id -> title, description and subject.
//!
//! Catalog files are JSON arrays of flat topic records, e.g.
//!
//! ```json
//! [{"id": "g7-percentages", "subject": "math", "grade": 7,
//!   "title": "Percentages", "description": "Increase, decrease, parts"}]
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ContentError, Result};

/// CEFR-style level used by the English course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnglishLevel {
    Beginner,
    Elementary,
    PreIntermediate,
    Intermediate,
    UpperIntermediate,
    Advanced,
}

impl fmt::Display for EnglishLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EnglishLevel::Beginner => "beginner",
            EnglishLevel::Elementary => "elementary",
            EnglishLevel::PreIntermediate => "pre-intermediate",
            EnglishLevel::Intermediate => "intermediate",
            EnglishLevel::UpperIntermediate => "upper-intermediate",
            EnglishLevel::Advanced => "advanced",
        };
        write!(f, "{}", label)
    }
}

/// Subject of a topic together with its parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "subject", rename_all = "lowercase")]
pub enum Subject {
    Math { grade: u8 },
    English { level: EnglishLevel },
    Python,
    Cpp,
}

impl Subject {
    /// Human-readable subject name
    pub fn label(&self) -> &'static str {
        match self {
            Subject::Math { .. } => "Math",
            Subject::English { .. } => "English",
            Subject::Python => "Python",
            Subject::Cpp => "C++",
        }
    }

    pub fn is_programming(&self) -> bool {
        matches!(self, Subject::Python | Subject::Cpp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub subject: Subject,
}

impl Topic {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        subject: Subject,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            subject,
        }
    }
}

/// Source of topic metadata
pub trait TopicCatalog: Send + Sync {
    /// Metadata for `topic_id`, or `None` if the id is unknown
    fn resolve_topic(&self, topic_id: &str) -> Option<Topic>;

    /// Every known topic, in catalog order
    fn all_topics(&self) -> Vec<Topic>;
}

/// In-memory catalog; keeps topics in insertion order
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    topics: Vec<Topic>,
}

impl StaticCatalog {
    /// Build from a list; a later topic with a repeated id replaces the earlier one
    pub fn new(topics: impl IntoIterator<Item = Topic>) -> Self {
        let mut catalog = Self::default();
        for topic in topics {
            catalog.insert(topic);
        }
        catalog
    }

    pub fn insert(&mut self, topic: Topic) {
        match self.topics.iter_mut().find(|t| t.id == topic.id) {
            Some(existing) => *existing = topic,
            None => self.topics.push(topic),
        }
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Load a JSON array of topic records
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ContentError::Config(format!("Cannot read catalog {}: {}", path.display(), e))
        })?;
        let topics: Vec<Topic> = serde_json::from_str(&raw).map_err(|e| {
            ContentError::Config(format!("Invalid catalog {}: {}", path.display(), e))
        })?;

        info!("Loaded {} topics from {}", topics.len(), path.display());
        Ok(Self::new(topics))
    }

    /// Starter course content shipped with the binary
    pub fn builtin() -> Self {
        use EnglishLevel::*;

        let math = |id: &str, grade, title: &str, description: &str| {
            Topic::new(id, title, description, Subject::Math { grade })
        };
        let english = |id: &str, level, title: &str, description: &str| {
            Topic::new(id, title, description, Subject::English { level })
        };

        Self::new([
            math(
                "g7-linear-equations",
                7,
                "Linear equations in one variable",
                "Solving linear equations and word problems",
            ),
            math(
                "g7-ratios-proportions",
                7,
                "Ratios and proportions",
                "Ratios, proportions, scale, direct and inverse proportionality",
            ),
            math(
                "g7-percentages",
                7,
                "Percentages",
                "Percentage problems: increase and decrease, finding a part, comparison",
            ),
            math(
                "g8-pythagoras",
                8,
                "Pythagorean theorem",
                "Right triangles and applied problems",
            ),
            math(
                "g9-quadratic-equations",
                9,
                "Quadratic equations",
                "Discriminant, Vieta's theorem, applications",
            ),
            english(
                "en-a1-present-simple",
                Beginner,
                "Present Simple",
                "Daily routines, habits, \"I play / he plays\"",
            ),
            english(
                "en-a2-past-simple",
                Elementary,
                "Past Simple",
                "Talk about yesterday: regular and irregular verbs",
            ),
            Topic::new(
                "py-variables-types",
                "Variables and data types",
                "int/float/str/bool, type conversion, beginner mistakes",
                Subject::Python,
            ),
            Topic::new(
                "py-loops",
                "Loops (for/while)",
                "range(), break/continue, typical tasks",
                Subject::Python,
            ),
            Topic::new(
                "cpp-variables-types",
                "Variables and data types",
                "int/double/char/bool, type errors, overflow",
                Subject::Cpp,
            ),
        ])
    }
}

impl TopicCatalog for StaticCatalog {
    fn resolve_topic(&self, topic_id: &str) -> Option<Topic> {
        self.topics.iter().find(|t| t.id == topic_id).cloned()
    }

    fn all_topics(&self) -> Vec<Topic> {
        self.topics.clone()
    }
}
