//! Saved export column selections

use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use shared::{
    builtin_export_templates, new_template_id, ExportTemplate, ExportTemplateInput, UserRole,
    EXPORT_FIELDS,
};

#[derive(Clone)]
pub struct ExportTemplateService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct TemplateRow {
    id: String,
    name: String,
    fields: Vec<String>,
    is_default: bool,
    created_by: Option<String>,
}

impl From<TemplateRow> for ExportTemplate {
    fn from(row: TemplateRow) -> Self {
        ExportTemplate {
            id: row.id,
            name: row.name,
            fields: row.fields,
            is_default: row.is_default,
            created_by: row.created_by,
        }
    }
}

pub fn validate_template(input: &ExportTemplateInput) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::validation("name", "Template name is required"));
    }
    if input.fields.is_empty() {
        return Err(AppError::validation("fields", "Select at least one field"));
    }
    if let Some(unknown) = input.fields.iter().find(|f| !EXPORT_FIELDS.contains(&f.as_str())) {
        return Err(AppError::validation("fields", format!("Unknown export field '{}'", unknown)));
    }
    Ok(())
}

fn is_builtin(id: &str) -> bool {
    builtin_export_templates().iter().any(|t| t.id == id)
}

impl ExportTemplateService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Built-in templates first, then saved ones by creation time
    pub async fn list(&self) -> AppResult<Vec<ExportTemplate>> {
        let rows = sqlx::query_as::<_, TemplateRow>(
            "SELECT id, name, fields, is_default, created_by FROM export_templates ORDER BY created_at",
        )
        .fetch_all(&self.db)
        .await?;

        let mut templates = builtin_export_templates();
        templates.extend(rows.into_iter().map(ExportTemplate::from));
        Ok(templates)
    }

    pub async fn create(&self, input: ExportTemplateInput, actor: &str) -> AppResult<ExportTemplate> {
        validate_template(&input)?;

        let row = sqlx::query_as::<_, TemplateRow>(
            r#"
            INSERT INTO export_templates (id, name, fields, is_default, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, fields, is_default, created_by
            "#,
        )
        .bind(new_template_id())
        .bind(input.name.trim())
        .bind(&input.fields)
        .bind(input.is_default)
        .bind(actor)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(id = %row.id, "Saved export template");
        Ok(row.into())
    }

    /// Built-ins cannot be removed; saved templates only by their creator or an admin
    pub async fn delete(&self, id: &str, actor: &str, role: UserRole) -> AppResult<()> {
        if is_builtin(id) {
            return Err(AppError::validation("id", "Built-in templates cannot be deleted"));
        }

        let owner = sqlx::query_scalar::<_, Option<String>>(
            "SELECT created_by FROM export_templates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Export template".to_string()))?;

        if role != UserRole::Admin && owner.as_deref() != Some(actor) {
            return Err(AppError::InsufficientPermissions);
        }

        sqlx::query("DELETE FROM export_templates WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
