//! Card-based mini lessons

use oqu_cache::ContentKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{non_blank_field, text_field, Artifact};
use crate::catalog::Topic;
use crate::error::{ContentError, Result};
use crate::prompts::PromptBuilder;

/// Interest recorded when the model does not name one
pub const MIXED_INTEREST: &str = "Mixed topic";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Metaphor,
    Theory,
    Example,
}

impl CardType {
    /// Parse a model-supplied type; anything unrecognized is theory
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("metaphor") => CardType::Metaphor,
            Some("example") => CardType::Example,
            _ => CardType::Theory,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonCard {
    pub id: String,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonContent {
    pub topic_id: String,
    pub interest: String,
    pub cards: Vec<LessonCard>,
}

impl LessonCard {
    /// Card at 1-based `position` with defaults for whatever is missing
    fn from_raw(raw: &Value, position: usize) -> Self {
        let empty = Map::new();
        let obj = raw.as_object().unwrap_or(&empty);

        Self {
            id: non_blank_field(obj, "id").unwrap_or_else(|| format!("card-{}", position)),
            card_type: CardType::from_label(obj.get("type").and_then(Value::as_str)),
            title: text_field(obj, "title").unwrap_or_else(|| format!("Card {}", position)),
            content: text_field(obj, "content").unwrap_or_default(),
        }
    }
}

impl Artifact for LessonContent {
    const KIND: ContentKind = ContentKind::Lesson;

    fn prompt(builder: &PromptBuilder, topic: &Topic, interests: &[String]) -> String {
        builder.lesson(topic, interests)
    }

    fn normalize(raw: Map<String, Value>, topic_id: &str) -> Result<Self> {
        let cards = match raw.get("cards") {
            Some(Value::Array(cards)) if !cards.is_empty() => cards,
            Some(Value::Array(_)) => {
                return Err(ContentError::incomplete(Self::KIND, "lesson has no cards"))
            }
            _ => {
                return Err(ContentError::incomplete(
                    Self::KIND,
                    "missing \"cards\" array",
                ))
            }
        };

        let interest = match raw.get("interest") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            _ => MIXED_INTEREST.to_string(),
        };

        Ok(Self {
            topic_id: topic_id.to_string(),
            interest,
            cards: cards
                .iter()
                .enumerate()
                .map(|(idx, card)| LessonCard::from_raw(card, idx + 1))
                .collect(),
        })
    }
}
