//! Prompt templates for lessons and quizzes

use crate::catalog::{Subject, Topic};

/// Questions requested per quiz unless configured otherwise
pub const DEFAULT_QUIZ_QUESTIONS: usize = 5;

/// Cards requested per lesson
pub const LESSON_CARDS: usize = 10;

const LESSON_SHAPE: &str = r#"{
  "topicId": "<topic id>",
  "interest": "one of the learner's interests, or \"Mixed topic\"",
  "cards": [
    {"id": "card-1", "title": "Title", "content": "Text", "type": "metaphor" | "theory" | "example"}
  ]
}"#;

const QUIZ_SHAPE: &str = r#"{
  "topicId": "<topic id>",
  "questions": [
    {
      "id": "q1",
      "question": "...",
      "correctExplanation": "...",
      "options": [
        {"id": "opt-a", "text": "...", "errorFeedback": "..."},
        {"id": "opt-b", "text": "...", "errorFeedback": null},
        {"id": "opt-c", "text": "...", "errorFeedback": "..."},
        {"id": "opt-d", "text": "...", "errorFeedback": "..."}
      ],
      "correctAnswer": "opt-b"
    }
  ]
}"#;

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    quiz_questions: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_QUIZ_QUESTIONS)
    }
}

impl PromptBuilder {
    pub fn new(quiz_questions: usize) -> Self {
        Self {
            quiz_questions: quiz_questions.max(1),
        }
    }

    pub fn quiz_questions(&self) -> usize {
        self.quiz_questions
    }

    /// Card-based mini lesson personalized with `interests`
    pub fn lesson(&self, topic: &Topic, interests: &[String]) -> String {
        let practice = match &topic.subject {
            Subject::Math { grade } => {
                format!("3 practice problems for grade {} with short solutions", grade)
            }
            Subject::English { level } => format!(
                "3 short exercises at the {} level with answers; theory cards include 2-5 English examples each",
                level
            ),
            Subject::Python | Subject::Cpp => format!(
                "3 practical mini tasks (\"what does it print?\", \"where is the bug?\") with the correct answer; theory cards include short {} snippets of 1-6 lines as plain text",
                topic.subject.label()
            ),
        };

        format!(
            "You are an experienced {subject} teacher.\n\n\
             Create a mini lesson of {cards} short, clear cards.\n\n\
             LEARNER:\n{learner}\n- Interests: {interests}\n\n\
             TOPIC:\n- {title}\n- Context: {description}\n\n\
             CARDS:\n\
             1) Card 1: type = \"metaphor\". An analogy or story built on one of the learner's interests.\n\
             2) Cards 2-7: type = \"theory\". Explain step by step.\n\
             3) Cards 8-10: type = \"example\". {practice}.\n\n\
             Each card content is 3-7 sentences. Vary the interests between cards.\n\n\
             Return ONLY valid JSON with exactly this structure:\n{shape}\n\n\
             No Markdown, no explanations, JSON only.",
            subject = topic.subject.label(),
            cards = LESSON_CARDS,
            learner = learner_line(&topic.subject),
            interests = interests.join(", "),
            title = topic.title,
            description = description_or_dash(topic),
            practice = practice,
            shape = LESSON_SHAPE.replace("<topic id>", &topic.id),
        )
    }

    /// Multiple-choice quiz with per-option feedback
    pub fn quiz(&self, topic: &Topic, interests: &[String]) -> String {
        let style = if topic.subject.is_programming() {
            format!(
                "These are school-style questions about {} code, not code execution.",
                topic.subject.label()
            )
        } else {
            "Use the learner's interests in the question scenarios where it fits.".to_string()
        };

        format!(
            "You are an experienced {subject} teacher.\n\n\
             Create {n} multiple-choice questions (4 options each).\n\n\
             LEARNER:\n{learner}\n- Interests: {interests}\n\n\
             TOPIC:\n- {title}\n- Context: {description}\n\n\
             {style}\n\n\
             For EVERY wrong option write \"errorFeedback\": why it is wrong and how to think instead.\n\
             For the correct option \"errorFeedback\" is null.\n\
             For EVERY question write \"correctExplanation\": a short explanation of the right answer.\n\
             \"correctAnswer\" is the id of exactly one option.\n\n\
             Return ONLY valid JSON with exactly this structure:\n{shape}\n\n\
             No Markdown, no explanations, JSON only.",
            subject = topic.subject.label(),
            n = self.quiz_questions,
            learner = learner_line(&topic.subject),
            interests = interests.join(", "),
            title = topic.title,
            description = description_or_dash(topic),
            style = style,
            shape = QUIZ_SHAPE.replace("<topic id>", &topic.id),
        )
    }
}

fn learner_line(subject: &Subject) -> String {
    match subject {
        Subject::Math { grade } => format!("- Grade: {}", grade),
        Subject::English { level } => format!("- Level: {}", level),
        Subject::Python | Subject::Cpp => format!("- Course: {}", subject.label()),
    }
}

fn description_or_dash(topic: &Topic) -> &str {
    if topic.description.trim().is_empty() {
        "-"
    } else {
        &topic.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EnglishLevel;

    fn interests() -> Vec<String> {
        vec!["Football".to_string(), "AI".to_string()]
    }

    #[test]
    fn test_lesson_prompt_mentions_topic_and_interests() {
        let topic = Topic::new("g7-percentages", "Percentages", "", Subject::Math { grade: 7 });
        let prompt = PromptBuilder::default().lesson(&topic, &interests());

        assert!(prompt.contains("Percentages"));
        assert!(prompt.contains("Football, AI"));
        assert!(prompt.contains("Grade: 7"));
        assert!(prompt.contains("\"topicId\": \"g7-percentages\""));
        assert!(prompt.contains("Context: -"));
    }

    #[test]
    fn test_quiz_prompt_varies_by_subject() {
        let english = Topic::new(
            "en-a1-present-simple",
            "Present Simple",
            "Daily routines",
            Subject::English {
                level: EnglishLevel::Beginner,
            },
        );
        let prompt = PromptBuilder::new(3).quiz(&english, &interests());
        assert!(prompt.contains("Create 3 multiple-choice"));
        assert!(prompt.contains("Level: beginner"));

        let cpp = Topic::new("cpp-io", "I/O", "cin/cout", Subject::Cpp);
        let prompt = PromptBuilder::default().quiz(&cpp, &interests());
        assert!(prompt.contains("about C++ code"));
        assert!(prompt.contains("\"correctAnswer\": \"opt-b\""));
    }

    #[test]
    fn test_question_count_is_at_least_one() {
        assert_eq!(PromptBuilder::new(0).quiz_questions(), 1);
    }
}
