//! Multiple-choice quizzes with per-option feedback

use oqu_cache::ContentKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{non_blank_field, Artifact};
use crate::catalog::Topic;
use crate::error::{ContentError, Result};
use crate::prompts::PromptBuilder;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub id: String,
    pub text: String,
    /// Shown when this option is picked; always `None` on the correct option
    pub error_feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<QuizOption>,
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_explanation: Option<String>,
    pub topic_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub topic_id: String,
    pub questions: Vec<QuizQuestion>,
}

impl QuizQuestion {
    /// The option named by `correct_answer`
    pub fn correct_option(&self) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.id == self.correct_answer)
    }
}

fn feedback(obj: &Map<String, Value>) -> Option<String> {
    non_blank_field(obj, "errorFeedback").filter(|s| s != "undefined")
}

fn option_from_raw(raw: &Value, question: usize, position: usize) -> Result<QuizOption> {
    let incomplete = |what: &str| {
        ContentError::incomplete(
            ContentKind::Quiz,
            format!("question {} option {} has no {}", question, position, what),
        )
    };

    let obj = raw.as_object().ok_or_else(|| incomplete("fields"))?;

    Ok(QuizOption {
        id: non_blank_field(obj, "id").ok_or_else(|| incomplete("id"))?,
        text: non_blank_field(obj, "text").ok_or_else(|| incomplete("text"))?,
        error_feedback: feedback(obj),
    })
}

fn question_from_raw(raw: &Value, position: usize, topic_id: &str) -> Result<QuizQuestion> {
    let incomplete = |reason: String| ContentError::incomplete(ContentKind::Quiz, reason);

    let obj = raw
        .as_object()
        .ok_or_else(|| incomplete(format!("question {} is not an object", position)))?;

    let id = non_blank_field(obj, "id")
        .ok_or_else(|| incomplete(format!("question {} has no id", position)))?;

    let question = non_blank_field(obj, "question")
        .ok_or_else(|| incomplete(format!("question {} has no text", position)))?;

    let mut options: Vec<QuizOption> = match obj.get("options") {
        Some(Value::Array(raw_options)) if !raw_options.is_empty() => raw_options
            .iter()
            .enumerate()
            .map(|(idx, option)| option_from_raw(option, position, idx + 1))
            .collect::<Result<_>>()?,
        _ => return Err(incomplete(format!("question {} has no options", position))),
    };

    let correct_answer = non_blank_field(obj, "correctAnswer")
        .ok_or_else(|| incomplete(format!("question {} has no correct answer", position)))?;

    let matching = options.iter().filter(|o| o.id == correct_answer).count();
    if matching != 1 {
        return Err(incomplete(format!(
            "question {}: correct answer {:?} matches {} options",
            position, correct_answer, matching
        )));
    }

    for option in options.iter_mut().filter(|o| o.id == correct_answer) {
        option.error_feedback = None;
    }

    Ok(QuizQuestion {
        id,
        question,
        options,
        correct_answer,
        correct_explanation: non_blank_field(obj, "correctExplanation"),
        topic_id: topic_id.to_string(),
    })
}

impl Artifact for Quiz {
    const KIND: ContentKind = ContentKind::Quiz;

    fn prompt(builder: &PromptBuilder, topic: &Topic, interests: &[String]) -> String {
        builder.quiz(topic, interests)
    }

    fn normalize(raw: Map<String, Value>, topic_id: &str) -> Result<Self> {
        let questions = match raw.get("questions") {
            Some(Value::Array(questions)) if !questions.is_empty() => questions,
            _ => {
                return Err(ContentError::incomplete(
                    Self::KIND,
                    "quiz has no questions",
                ))
            }
        };

        let questions = questions
            .iter()
            .enumerate()
            .map(|(idx, q)| question_from_raw(q, idx + 1, topic_id))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            topic_id: topic_id.to_string(),
            questions,
        })
    }
}
