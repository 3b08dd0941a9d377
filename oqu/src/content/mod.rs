//! Generated artifacts and the path from raw model text to a typed value
//!
//! Model output is first reduced to a JSON object by [`extract_json`], then
//! each artifact type applies its own normalization: documented defaults
//! fill gaps, anything below the minimum content is rejected.

pub mod lesson;
pub mod quiz;

pub use lesson::{CardType, LessonCard, LessonContent};
pub use quiz::{Quiz, QuizOption, QuizQuestion};

use std::sync::OnceLock;

use oqu_cache::ContentKind;
use regex::Regex;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::catalog::Topic;
use crate::error::{ContentError, Result};
use crate::prompts::PromptBuilder;

/// A kind of generated content the orchestrator can produce and cache
pub trait Artifact: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: ContentKind;

    /// Prompt asking the model for this artifact
    fn prompt(builder: &PromptBuilder, topic: &Topic, interests: &[String]) -> String;

    /// Turn parsed model output into a valid artifact for `topic_id`
    fn normalize(raw: Map<String, Value>, topic_id: &str) -> Result<Self>;
}

fn undefined_feedback() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""errorFeedback"\s*:\s*(?:undefined|"undefined")"#)
            .expect("feedback pattern is a valid regex")
    })
}

/// Remove a surrounding ```` ```json ```` or ```` ``` ```` fence
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let inner = if let Some(rest) = text.strip_prefix("```json") {
        rest
    } else if let Some(rest) = text.strip_prefix("```") {
        rest
    } else {
        return text;
    };

    inner.trim_end().trim_end_matches("```").trim()
}

/// Reduce raw model text to a JSON object.
///
/// Handles code fences, the non-JSON `undefined` token some models emit
/// for feedback, and prose around the object.
pub fn extract_json(raw: &str) -> Result<Map<String, Value>> {
    let text = strip_code_fence(raw);
    let text = undefined_feedback().replace_all(text, r#""errorFeedback": null"#);

    let parsed = serde_json::from_str::<Value>(&text).or_else(|first_err| {
        // Fall back to the outermost object when the model wrapped it in prose
        match (text.find('{'), text.rfind('}')) {
            (Some(start), Some(end)) if start < end => {
                serde_json::from_str::<Value>(&text[start..=end]).map_err(|_| first_err)
            }
            _ => Err(first_err),
        }
    });

    match parsed {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ContentError::GenerationFormat(format!(
            "expected a JSON object, got {}",
            json_type(&other)
        ))),
        Err(e) => Err(ContentError::GenerationFormat(format!(
            "{} (response starts with: {:?})",
            e,
            preview(raw)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn preview(raw: &str) -> String {
    raw.trim().chars().take(120).collect()
}

/// Scalar field as text; `None` when missing or null
pub(crate) fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Like [`text_field`] but blank strings count as missing
pub(crate) fn non_blank_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    text_field(obj, key).filter(|s| !s.trim().is_empty())
}
