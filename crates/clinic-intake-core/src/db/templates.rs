//! Form template database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{FormTemplate, FormType, NewFormTemplate, Question};

const TEMPLATE_COLUMNS: &str =
    "id, title, description, structure, form_type, created_at, updated_at";

impl Database {
    /// Insert a new template and return the stored record.
    pub fn insert_template(&self, template: &NewFormTemplate) -> DbResult<FormTemplate> {
        let structure_json = serde_json::to_string(&template.structure)?;
        let now = chrono::Utc::now().to_rfc3339();

        self.conn.execute(
            r#"
            INSERT INTO form_templates (
                title, description, structure, form_type, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
            params![
                template.title,
                template.description,
                structure_json,
                template.form_type.as_str(),
                now,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_template(id)?
            .ok_or_else(|| DbError::NotFound(format!("template {}", id)))
    }

    /// Replace a template's fields. Returns false if no such template.
    pub fn update_template(&self, id: i64, template: &NewFormTemplate) -> DbResult<bool> {
        let structure_json = serde_json::to_string(&template.structure)?;
        let now = chrono::Utc::now().to_rfc3339();

        let rows_affected = self.conn.execute(
            r#"
            UPDATE form_templates SET
                title = ?2,
                description = ?3,
                structure = ?4,
                form_type = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
            params![
                id,
                template.title,
                template.description,
                structure_json,
                template.form_type.as_str(),
                now,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a template by ID.
    pub fn get_template(&self, id: i64) -> DbResult<Option<FormTemplate>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM form_templates WHERE id = ?", TEMPLATE_COLUMNS),
                [id],
                TemplateRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Look up only the form type of a template.
    pub fn get_form_type(&self, id: i64) -> DbResult<Option<FormType>> {
        let form_type: Option<String> = self
            .conn
            .query_row(
                "SELECT form_type FROM form_templates WHERE id = ?",
                [id],
                |row| row.get(0),
            )
            .optional()?;

        form_type
            .map(|s| s.parse::<FormType>().map_err(DbError::Constraint))
            .transpose()
    }

    /// List templates, optionally restricted to one form type.
    pub fn list_templates(&self, form_type: Option<FormType>) -> DbResult<Vec<FormTemplate>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {}
            FROM form_templates
            WHERE (?1 IS NULL OR form_type = ?1)
            ORDER BY id
            "#,
            TEMPLATE_COLUMNS
        ))?;

        let rows = stmt.query_map([form_type.map(|f| f.as_str())], TemplateRow::from_row)?;

        let mut templates = Vec::new();
        for row in rows {
            templates.push(row?.try_into()?);
        }
        Ok(templates)
    }

    /// Delete a template. Returns false if no such template.
    pub fn delete_template(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM form_templates WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct TemplateRow {
    id: i64,
    title: String,
    description: Option<String>,
    structure: String,
    form_type: String,
    created_at: String,
    updated_at: String,
}

impl TemplateRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            structure: row.get(3)?,
            form_type: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl TryFrom<TemplateRow> for FormTemplate {
    type Error = DbError;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        let structure: Vec<Question> = serde_json::from_str(&row.structure)?;
        let form_type = row.form_type.parse().map_err(DbError::Constraint)?;

        Ok(FormTemplate {
            id: row.id,
            title: row.title,
            description: row.description,
            structure,
            form_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionType;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn generic_template() -> NewFormTemplate {
        let mut template = NewFormTemplate::new("Sleep questionnaire", FormType::Generic);
        template.description = Some("Weekly check-in".into());
        template.structure = vec![
            Question::text("hours", "Hours slept").required(),
            Question::choice("quality", QuestionType::Radio, "Quality", &["good", "poor"]),
        ];
        template
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let stored = db.insert_template(&generic_template()).unwrap();
        assert!(stored.id > 0);

        let retrieved = db.get_template(stored.id).unwrap().unwrap();
        assert_eq!(retrieved.title, "Sleep questionnaire");
        assert_eq!(retrieved.description, Some("Weekly check-in".into()));
        assert_eq!(retrieved.structure.len(), 2);
        assert!(retrieved.structure[0].required);
        assert_eq!(retrieved.form_type, FormType::Generic);
    }

    #[test]
    fn test_get_missing() {
        let db = setup_db();
        assert!(db.get_template(42).unwrap().is_none());
        assert!(db.get_form_type(42).unwrap().is_none());
    }

    #[test]
    fn test_get_form_type() {
        let db = setup_db();
        let wizard = db
            .insert_template(&NewFormTemplate::new("Wizard", FormType::ClinicalWizard))
            .unwrap();
        let generic = db.insert_template(&generic_template()).unwrap();

        assert_eq!(db.get_form_type(wizard.id).unwrap(), Some(FormType::ClinicalWizard));
        assert_eq!(db.get_form_type(generic.id).unwrap(), Some(FormType::Generic));
    }

    #[test]
    fn test_list_with_filter() {
        let db = setup_db();
        db.insert_template(&generic_template()).unwrap();
        db.insert_template(&NewFormTemplate::new("Wizard", FormType::ClinicalWizard))
            .unwrap();

        assert_eq!(db.list_templates(None).unwrap().len(), 2);

        let wizards = db.list_templates(Some(FormType::ClinicalWizard)).unwrap();
        assert_eq!(wizards.len(), 1);
        assert_eq!(wizards[0].title, "Wizard");
    }

    #[test]
    fn test_update_template() {
        let db = setup_db();
        let stored = db.insert_template(&generic_template()).unwrap();

        let mut changed = generic_template();
        changed.title = "Sleep diary".into();
        changed.structure.pop();
        assert!(db.update_template(stored.id, &changed).unwrap());

        let retrieved = db.get_template(stored.id).unwrap().unwrap();
        assert_eq!(retrieved.title, "Sleep diary");
        assert_eq!(retrieved.structure.len(), 1);

        assert!(!db.update_template(999, &changed).unwrap());
    }

    #[test]
    fn test_delete_template() {
        let db = setup_db();
        let stored = db.insert_template(&generic_template()).unwrap();

        assert!(db.delete_template(stored.id).unwrap());
        assert!(db.get_template(stored.id).unwrap().is_none());
        assert!(!db.delete_template(stored.id).unwrap());
    }
}
