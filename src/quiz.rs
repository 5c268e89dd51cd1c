use serde::{Deserialize, Serialize};

/// A quiz question as stored by the study app.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl QuizQuestion {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            choices: Vec::new(),
            explanation: None,
        }
    }

    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Text fed to the concept matcher: prompt, choices and explanation, one
    /// per line.
    pub fn tagging_text(&self) -> String {
        let mut text = self.prompt.clone();
        for part in self.choices.iter().chain(self.explanation.as_ref()) {
            text.push('\n');
            text.push_str(part);
        }
        text
    }
}

/// Concepts attached to one question, in concept-list order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaggedQuestion {
    pub question_id: String,
    pub concepts: Vec<String>,
}
