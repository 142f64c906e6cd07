//! Form submission database operations.
//!
//! Submissions are append-only: there is no update path, and the schema
//! rejects `UPDATE` statements on the table.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{answers_digest, FormSubmission, NewSubmission, Priority, SubmissionReceipt};

const SUBMISSION_COLUMNS: &str =
    "id, template_id, patient_id, answers, answers_digest, priority, submission_date";

impl Database {
    /// Insert a submission. This is the only write a submission ever gets.
    pub fn insert_submission(&self, submission: &NewSubmission) -> DbResult<SubmissionReceipt> {
        let (answers_json, digest) = submission.answers_record()?;
        let submission_date = chrono::Utc::now().to_rfc3339();

        self.conn.execute(
            r#"
            INSERT INTO form_submissions (
                template_id, patient_id, answers, answers_digest, priority, submission_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                submission.template_id,
                submission.patient_id,
                answers_json,
                digest,
                submission.priority.map(|p| p.as_str()),
                submission_date,
            ],
        )?;

        Ok(SubmissionReceipt {
            id: self.conn.last_insert_rowid(),
            submission_date,
        })
    }

    /// Get a submission by ID.
    pub fn get_submission(&self, id: i64) -> DbResult<Option<FormSubmission>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM form_submissions WHERE id = ?", SUBMISSION_COLUMNS),
                [id],
                SubmissionRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List a patient's submissions, newest first.
    pub fn list_submissions_for_patient(&self, patient_id: i64) -> DbResult<Vec<FormSubmission>> {
        self.query_submissions(
            &format!(
                "SELECT {} FROM form_submissions WHERE patient_id = ? ORDER BY submission_date DESC, id DESC",
                SUBMISSION_COLUMNS
            ),
            [patient_id],
        )
    }

    /// List submissions against a template, newest first.
    pub fn list_submissions_for_template(&self, template_id: i64) -> DbResult<Vec<FormSubmission>> {
        self.query_submissions(
            &format!(
                "SELECT {} FROM form_submissions WHERE template_id = ? ORDER BY submission_date DESC, id DESC",
                SUBMISSION_COLUMNS
            ),
            [template_id],
        )
    }

    /// Prioritised submissions, most urgent tier first, newest first within a tier.
    pub fn list_triage_queue(
        &self,
        priority: Option<Priority>,
        limit: usize,
    ) -> DbResult<Vec<FormSubmission>> {
        self.query_submissions(
            &format!(
                r#"
                SELECT {}
                FROM form_submissions
                WHERE priority IS NOT NULL
                  AND (?1 IS NULL OR priority = ?1)
                ORDER BY CASE priority
                    WHEN 'high' THEN 0
                    WHEN 'medium' THEN 1
                    ELSE 2
                END, submission_date DESC, id DESC
                LIMIT ?2
                "#,
                SUBMISSION_COLUMNS
            ),
            params![priority.map(|p| p.as_str()), limit as i64],
        )
    }

    fn query_submissions<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> DbResult<Vec<FormSubmission>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, SubmissionRow::from_row)?;

        let mut submissions = Vec::new();
        for row in rows {
            submissions.push(row?.try_into()?);
        }
        Ok(submissions)
    }
}

/// Intermediate row struct for database mapping.
struct SubmissionRow {
    id: i64,
    template_id: i64,
    patient_id: i64,
    answers: String,
    answers_digest: String,
    priority: Option<String>,
    submission_date: String,
}

impl SubmissionRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            template_id: row.get(1)?,
            patient_id: row.get(2)?,
            answers: row.get(3)?,
            answers_digest: row.get(4)?,
            priority: row.get(5)?,
            submission_date: row.get(6)?,
        })
    }
}

impl TryFrom<SubmissionRow> for FormSubmission {
    type Error = DbError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        if answers_digest(&row.answers) != row.answers_digest {
            return Err(DbError::Integrity(format!(
                "answers of submission {} do not match their digest",
                row.id
            )));
        }

        let answers = serde_json::from_str(&row.answers)?;
        let priority = row
            .priority
            .map(|p| p.parse::<Priority>().map_err(DbError::Constraint))
            .transpose()?;

        Ok(FormSubmission {
            id: row.id,
            template_id: row.template_id,
            patient_id: row.patient_id,
            answers,
            priority,
            submission_date: row.submission_date,
        })
    }
}
