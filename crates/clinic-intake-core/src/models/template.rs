//! Form template models.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of form a template describes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    /// Free-form questionnaire built from `Question`s
    #[default]
    Generic,
    /// Multi-step structured intake (body map, MTC axes, tongue)
    ClinicalWizard,
}

impl FormType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::Generic => "generic",
            FormType::ClinicalWizard => "clinical_wizard",
        }
    }

    /// Whether submissions against this form type get a priority tier.
    pub fn is_triaged(&self) -> bool {
        matches!(self, FormType::ClinicalWizard)
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generic" => Ok(FormType::Generic),
            "clinical_wizard" => Ok(FormType::ClinicalWizard),
            other => Err(format!("Unknown form type: {}", other)),
        }
    }
}

/// Input widget of a question.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Textarea,
    Select,
    Checkbox,
    Radio,
}

impl QuestionType {
    /// Whether the question is answered by picking from `options`.
    pub fn needs_options(&self) -> bool {
        matches!(
            self,
            QuestionType::Select | QuestionType::Checkbox | QuestionType::Radio
        )
    }
}

/// A single question in a template structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub required: bool,
}

impl Question {
    /// Create a free-text question.
    pub fn text(id: &str, label: &str) -> Self {
        Self {
            id: id.into(),
            question_type: QuestionType::Text,
            label: label.into(),
            options: None,
            required: false,
        }
    }

    /// Create a choice question of the given type.
    pub fn choice(id: &str, question_type: QuestionType, label: &str, options: &[&str]) -> Self {
        Self {
            id: id.into(),
            question_type,
            label: label.into(),
            options: Some(options.iter().map(|o| o.to_string()).collect()),
            required: false,
        }
    }

    /// Mark the question as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A stored form template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplate {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub structure: Vec<Question>,
    pub form_type: FormType,
    pub created_at: String,
    pub updated_at: String,
}

/// Template fields supplied by an admin on create or update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewFormTemplate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub structure: Vec<Question>,
    #[serde(default)]
    pub form_type: FormType,
}

impl NewFormTemplate {
    /// Create an empty template definition of the given type.
    pub fn new(title: &str, form_type: FormType) -> Self {
        Self {
            title: title.into(),
            description: None,
            structure: Vec::new(),
            form_type,
        }
    }

    /// Check the definition, returning the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Template title cannot be empty".into());
        }

        let mut seen = HashSet::new();
        for question in &self.structure {
            if question.id.trim().is_empty() {
                return Err("Question id cannot be empty".into());
            }
            if !seen.insert(question.id.as_str()) {
                return Err(format!("Duplicate question id: {}", question.id));
            }
            if question.label.trim().is_empty() {
                return Err(format!("Question {} has an empty label", question.id));
            }
            let has_options = question
                .options
                .as_ref()
                .is_some_and(|options| !options.is_empty());
            if question.question_type.needs_options() && !has_options {
                return Err(format!("Question {} needs at least one option", question.id));
            }
        }

        Ok(())
    }
}
