//! Clinic Intake Core Library
//!
//! Form templates, immutable patient submissions and triage priority for
//! clinical intake.
//!
//! # Architecture
//!
//! ```text
//! Admin ──► Form Template Store ──┐
//!                                 │ form type
//! Patient ──► Submission Recorder ┴──► clinical wizard? ──► Priority Classifier
//!                    │                                            │
//!                    ▼                                            ▼
//!        [APPEND-ONLY: form_submissions]  ◄──────── priority (frozen)
//!                    │
//!                    ▼
//!              Triage Queue (high → medium → low)
//! ```
//!
//! # Core Principle
//!
//! **A submission is a historical record.** It is written once with its
//! priority and never updated.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer
//! - [`models`]: Domain types (FormTemplate, ClinicalWizardAnswers, FormSubmission)
//! - [`triage`]: Ordered rule chain mapping answers to a priority tier
//! - [`recorder`]: Validates, classifies and stores submissions
//! - [`config`]: Startup configuration

pub mod config;
pub mod db;
pub mod models;
pub mod recorder;
pub mod triage;

// Re-export commonly used types
pub use config::CoreConfig;
pub use db::Database;
pub use models::{
    BodyPainPoint, ClinicalWizardAnswers, FormSubmission, FormTemplate, FormType,
    NewFormTemplate, Priority, Question, QuestionType, SubmissionReceipt,
};
pub use recorder::{SubmissionRecorder, SubmissionRequest, UnknownTemplatePolicy};
pub use triage::{Classification, PriorityClassifier, TriageRule};

use std::sync::{Arc, Mutex};

// =========================================================================
// Error Type
// =========================================================================

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Integrity error: {0}")]
    IntegrityError(String),
}

impl From<db::DbError> for IntakeError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => IntakeError::NotFound(what),
            db::DbError::Constraint(message) => IntakeError::Conflict(message),
            db::DbError::Integrity(message) => IntakeError::IntegrityError(message),
            other => IntakeError::DatabaseError(other.to_string()),
        }
    }
}

impl From<recorder::RecorderError> for IntakeError {
    fn from(e: recorder::RecorderError) -> Self {
        match e {
            recorder::RecorderError::MissingField(field) => {
                IntakeError::InvalidInput(format!("{} is required", field))
            }
            recorder::RecorderError::AnswersNotObject => IntakeError::InvalidInput(e.to_string()),
            recorder::RecorderError::UnknownTemplate(id) => {
                IntakeError::NotFound(format!("form template {}", id))
            }
            recorder::RecorderError::Database(e) => e.into(),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for IntakeError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        IntakeError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe entry point shared by every request handler.
#[derive(Clone)]
pub struct IntakeCore {
    db: Arc<Mutex<Database>>,
    classifier: Arc<PriorityClassifier>,
    policy: UnknownTemplatePolicy,
}

impl IntakeCore {
    /// Open the database described by `config`.
    pub fn open(config: &CoreConfig) -> Result<Self, IntakeError> {
        let db = if config.is_in_memory() {
            Database::open_in_memory()?
        } else {
            Database::open(config.database_path())?
        };
        tracing::info!(
            path = %config.database_path().display(),
            policy = %config.unknown_template_policy(),
            "opened intake database"
        );
        Ok(Self::from_database(db, config.unknown_template_policy()))
    }

    /// Create an in-memory instance (for testing).
    pub fn open_in_memory() -> Result<Self, IntakeError> {
        Self::open(&CoreConfig::in_memory())
    }

    /// Wrap an already open database.
    pub fn from_database(db: Database, policy: UnknownTemplatePolicy) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            classifier: Arc::new(PriorityClassifier::new()),
            policy,
        }
    }

    /// Replace the classifier (e.g. to add keywords).
    pub fn with_classifier(mut self, classifier: PriorityClassifier) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    // =========================================================================
    // Template Operations
    // =========================================================================

    /// Validate and store a new template.
    pub fn create_template(&self, template: NewFormTemplate) -> Result<FormTemplate, IntakeError> {
        template.validate().map_err(IntakeError::InvalidInput)?;
        let db = self.db.lock()?;
        let stored = db.insert_template(&template)?;
        tracing::info!(template_id = stored.id, form_type = %stored.form_type, "created form template");
        Ok(stored)
    }

    /// Get a template by ID.
    pub fn get_template(&self, id: i64) -> Result<Option<FormTemplate>, IntakeError> {
        let db = self.db.lock()?;
        Ok(db.get_template(id)?)
    }

    /// List templates, optionally of one form type.
    pub fn list_templates(&self, form_type: Option<FormType>) -> Result<Vec<FormTemplate>, IntakeError> {
        let db = self.db.lock()?;
        Ok(db.list_templates(form_type)?)
    }

    /// Replace a template. The form type is locked once submissions exist.
    pub fn update_template(
        &self,
        id: i64,
        template: NewFormTemplate,
    ) -> Result<FormTemplate, IntakeError> {
        template.validate().map_err(IntakeError::InvalidInput)?;
        let db = self.db.lock()?;
        if !db.update_template(id, &template)? {
            return Err(IntakeError::NotFound(format!("form template {}", id)));
        }
        db.get_template(id)?
            .ok_or_else(|| IntakeError::NotFound(format!("form template {}", id)))
    }

    /// Delete a template that no submission references.
    pub fn delete_template(&self, id: i64) -> Result<(), IntakeError> {
        let db = self.db.lock()?;
        if !db.delete_template(id)? {
            return Err(IntakeError::NotFound(format!("form template {}", id)));
        }
        tracing::info!(template_id = id, "deleted form template");
        Ok(())
    }

    // =========================================================================
    // Submission Operations
    // =========================================================================

    /// Record a patient's submission.
    pub fn submit(
        &self,
        patient_id: i64,
        request: &SubmissionRequest,
    ) -> Result<SubmissionReceipt, IntakeError> {
        let db = self.db.lock()?;
        let recorder = SubmissionRecorder::new(&db, &self.classifier).with_policy(self.policy);
        Ok(recorder.record(patient_id, request)?)
    }

    /// Get a submission by ID.
    pub fn get_submission(&self, id: i64) -> Result<Option<FormSubmission>, IntakeError> {
        let db = self.db.lock()?;
        Ok(db.get_submission(id)?)
    }

    /// A patient's own submissions, newest first.
    pub fn list_submissions_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<FormSubmission>, IntakeError> {
        let db = self.db.lock()?;
        Ok(db.list_submissions_for_patient(patient_id)?)
    }

    /// Submissions against one template, newest first.
    pub fn list_submissions_for_template(
        &self,
        template_id: i64,
    ) -> Result<Vec<FormSubmission>, IntakeError> {
        let db = self.db.lock()?;
        if db.get_form_type(template_id)?.is_none() {
            return Err(IntakeError::NotFound(format!("form template {}", template_id)));
        }
        Ok(db.list_submissions_for_template(template_id)?)
    }

    /// Prioritised submissions, most urgent first.
    pub fn triage_queue(
        &self,
        priority: Option<Priority>,
        limit: usize,
    ) -> Result<Vec<FormSubmission>, IntakeError> {
        let db = self.db.lock()?;
        Ok(db.list_triage_queue(priority, limit)?)
    }
}
