//! Submission recorder.
//!
//! Validate → look up form type → classify (clinical wizard only) → insert.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{NewSubmission, SubmissionReceipt};
use crate::triage::PriorityClassifier;

/// Recorder errors.
#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("answers must be a JSON object")]
    AnswersNotObject,

    #[error("Unknown form template: {0}")]
    UnknownTemplate(i64),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type RecorderResult<T> = Result<T, RecorderError>;

/// What to do when a submission names a template that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTemplatePolicy {
    /// Refuse the submission
    Reject,
    /// Store it without a priority
    #[default]
    Degrade,
}

impl fmt::Display for UnknownTemplatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownTemplatePolicy::Reject => f.write_str("reject"),
            UnknownTemplatePolicy::Degrade => f.write_str("degrade"),
        }
    }
}

impl FromStr for UnknownTemplatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(UnknownTemplatePolicy::Reject),
            "degrade" => Ok(UnknownTemplatePolicy::Degrade),
            other => Err(format!("Unknown template policy: {}", other)),
        }
    }
}

/// Body of a patient submission. Both fields are optional here so a
/// missing one is reported as a validation error, not a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    #[serde(default)]
    pub template_id: Option<i64>,
    #[serde(default)]
    pub answers: Option<Value>,
}

impl SubmissionRequest {
    pub fn new(template_id: i64, answers: Value) -> Self {
        Self {
            template_id: Some(template_id),
            answers: Some(answers),
        }
    }

    /// Required fields, or the first one missing. JSON `null` counts as
    /// missing; any other non-object `answers` is rejected.
    pub fn validate(&self) -> RecorderResult<(i64, &Value)> {
        let template_id = self
            .template_id
            .ok_or(RecorderError::MissingField("templateId"))?;
        let answers = match &self.answers {
            None | Some(Value::Null) => return Err(RecorderError::MissingField("answers")),
            Some(answers @ Value::Object(_)) => answers,
            Some(_) => return Err(RecorderError::AnswersNotObject),
        };
        Ok((template_id, answers))
    }
}

/// Records patient submissions.
pub struct SubmissionRecorder<'a> {
    db: &'a Database,
    classifier: &'a PriorityClassifier,
    policy: UnknownTemplatePolicy,
}

impl<'a> SubmissionRecorder<'a> {
    /// Create a recorder with the default (degrade) unknown-template policy.
    pub fn new(db: &'a Database, classifier: &'a PriorityClassifier) -> Self {
        Self {
            db,
            classifier,
            policy: UnknownTemplatePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnknownTemplatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validate, classify and persist one submission.
    pub fn record(
        &self,
        patient_id: i64,
        request: &SubmissionRequest,
    ) -> RecorderResult<SubmissionReceipt> {
        let (template_id, answers) = request.validate()?;

        let priority = match self.db.get_form_type(template_id)? {
            Some(form_type) if form_type.is_triaged() => {
                let classification = self.classifier.classify_value(answers);
                tracing::info!(
                    template_id,
                    patient_id,
                    priority = %classification.priority,
                    rule = classification.rule.map(|r| r.name()).unwrap_or("none"),
                    "classified clinical wizard submission"
                );
                Some(classification.priority)
            }
            Some(_) => None,
            None => match self.policy {
                UnknownTemplatePolicy::Reject => {
                    return Err(RecorderError::UnknownTemplate(template_id));
                }
                UnknownTemplatePolicy::Degrade => {
                    tracing::warn!(
                        template_id,
                        patient_id,
                        "submission names an unknown template; storing without priority"
                    );
                    None
                }
            },
        };

        let receipt = self.db.insert_submission(&NewSubmission {
            template_id,
            patient_id,
            answers: answers.clone(),
            priority,
        })?;

        tracing::debug!(submission_id = receipt.id, "submission recorded");
        Ok(receipt)
    }
}
