//! SQLite schema definition.

/// Complete database schema for clinic intake.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Form Templates
-- ============================================================================

CREATE TABLE IF NOT EXISTS form_templates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    structure TEXT NOT NULL DEFAULT '[]',        -- JSON array of Question
    form_type TEXT NOT NULL DEFAULT 'generic'
        CHECK (form_type IN ('generic', 'clinical_wizard')),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_templates_form_type ON form_templates(form_type);

-- ============================================================================
-- Form Submissions (Append-Only - Immutable after creation)
-- ============================================================================

-- template_id is not a foreign key: under the degrade policy a submission
-- may name a template that does not exist.
CREATE TABLE IF NOT EXISTS form_submissions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    template_id INTEGER NOT NULL,
    patient_id INTEGER NOT NULL,
    answers TEXT NOT NULL,                       -- JSON document as submitted
    answers_digest TEXT NOT NULL,                -- SHA-256 hex of answers
    priority TEXT CHECK (priority IS NULL OR priority IN ('high', 'medium', 'low')),
    submission_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_submissions_template ON form_submissions(template_id);
CREATE INDEX IF NOT EXISTS idx_submissions_patient ON form_submissions(patient_id);
CREATE INDEX IF NOT EXISTS idx_submissions_priority ON form_submissions(priority);

CREATE TRIGGER IF NOT EXISTS form_submissions_no_update BEFORE UPDATE ON form_submissions
BEGIN
    SELECT RAISE(ABORT, 'Form submissions are immutable');
END;

-- Templates referenced by a submission keep their form type and cannot be removed
CREATE TRIGGER IF NOT EXISTS form_templates_lock_type BEFORE UPDATE OF form_type ON form_templates
WHEN new.form_type <> old.form_type
    AND EXISTS (SELECT 1 FROM form_submissions WHERE template_id = old.id)
BEGIN
    SELECT RAISE(ABORT, 'Template form type is locked by existing submissions');
END;

CREATE TRIGGER IF NOT EXISTS form_templates_no_delete_referenced BEFORE DELETE ON form_templates
WHEN EXISTS (SELECT 1 FROM form_submissions WHERE template_id = old.id)
BEGIN
    SELECT RAISE(ABORT, 'Template is referenced by existing submissions');
END;
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn
    }

    fn insert_submission(conn: &Connection, template_id: i64, priority: Option<&str>) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO form_submissions (template_id, patient_id, answers, answers_digest, priority, submission_date)
             VALUES (?1, 7, '{}', 'digest', ?2, '2024-01-01T00:00:00Z')",
            rusqlite::params![template_id, priority],
        )
    }

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);

        // Running twice must be harmless
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_form_type_constraint() {
        let conn = setup();
        let result = conn.execute(
            "INSERT INTO form_templates (title, form_type) VALUES ('x', 'survey')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_priority_constraint() {
        let conn = setup();
        assert!(insert_submission(&conn, 1, Some("urgent")).is_err());
        assert!(insert_submission(&conn, 1, Some("high")).is_ok());
        assert!(insert_submission(&conn, 1, None).is_ok());
    }

    #[test]
    fn test_submissions_are_immutable() {
        let conn = setup();
        insert_submission(&conn, 1, Some("low")).unwrap();

        let result = conn.execute("UPDATE form_submissions SET priority = 'high'", []);
        assert!(result.is_err());
    }

    #[test]
    fn test_referenced_template_is_locked() {
        let conn = setup();
        conn.execute(
            "INSERT INTO form_templates (title, form_type) VALUES ('Wizard', 'clinical_wizard')",
            [],
        )
        .unwrap();
        let template_id = conn.last_insert_rowid();

        // Unreferenced: type change allowed
        conn.execute(
            "UPDATE form_templates SET form_type = 'generic' WHERE id = ?",
            [template_id],
        )
        .unwrap();
        conn.execute(
            "UPDATE form_templates SET form_type = 'clinical_wizard' WHERE id = ?",
            [template_id],
        )
        .unwrap();

        insert_submission(&conn, template_id, Some("low")).unwrap();

        let result = conn.execute(
            "UPDATE form_templates SET form_type = 'generic' WHERE id = ?",
            [template_id],
        );
        assert!(result.is_err());

        // Title edits are still fine
        conn.execute(
            "UPDATE form_templates SET title = 'Renamed' WHERE id = ?",
            [template_id],
        )
        .unwrap();

        let result = conn.execute("DELETE FROM form_templates WHERE id = ?", [template_id]);
        assert!(result.is_err());
    }
}
