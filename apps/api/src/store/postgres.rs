use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;

use crate::models::resume::{
    CertificationItem, ColorScheme, EducationItem, ExperienceItem, PersonalInfo, ProjectItem,
    ResumePatch, ResumeRecord, SkillsBlock, TemplateId,
};
use crate::store::{ResumeStore, StoreError, StoredResume};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS resumes (
    id              BIGSERIAL PRIMARY KEY,
    personal_info   JSONB NOT NULL,
    experience      JSONB NOT NULL,
    education       JSONB NOT NULL,
    skills          JSONB NOT NULL,
    certifications  JSONB NOT NULL,
    projects        JSONB NOT NULL,
    template        TEXT NOT NULL DEFAULT 'classic',
    color_scheme    TEXT NOT NULL DEFAULT 'primary',
    font_style      TEXT NOT NULL DEFAULT 'Inter',
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const COLUMNS: &str = "id, personal_info, experience, education, skills, certifications, \
                       projects, template, color_scheme, font_style, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ResumeRow {
    id: i64,
    personal_info: Json<PersonalInfo>,
    experience: Json<Vec<ExperienceItem>>,
    education: Json<Vec<EducationItem>>,
    skills: Json<SkillsBlock>,
    certifications: Json<Vec<CertificationItem>>,
    projects: Json<Vec<ProjectItem>>,
    template: String,
    color_scheme: String,
    font_style: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for StoredResume {
    fn from(row: ResumeRow) -> Self {
        StoredResume {
            id: row.id,
            record: ResumeRecord {
                personal_info: row.personal_info.0,
                experience: row.experience.0,
                education: row.education.0,
                skills: row.skills.0,
                certifications: row.certifications.0,
                projects: row.projects.0,
                template: TemplateId::parse(&row.template),
                color_scheme: ColorScheme::parse(&row.color_scheme),
                font_style: row.font_style,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        PgResumeStore { pool }
    }

    /// Opens a pool against `database_url` and ensures the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        let store = PgResumeStore::new(pool);
        store.ensure_schema().await?;
        info!("PostgreSQL résumé store ready");
        Ok(store)
    }

    /// Creates the `resumes` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        info!("resumes schema ready");
        Ok(())
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn create(&self, record: ResumeRecord) -> Result<StoredResume, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO resumes
                (personal_info, experience, education, skills, certifications,
                 projects, template, color_scheme, font_style)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ResumeRow>(&sql)
            .bind(Json(&record.personal_info))
            .bind(Json(&record.experience))
            .bind(Json(&record.education))
            .bind(Json(&record.skills))
            .bind(Json(&record.certifications))
            .bind(Json(&record.projects))
            .bind(record.template.as_str())
            .bind(record.color_scheme.as_str())
            .bind(&record.font_style)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn get(&self, id: i64) -> Result<Option<StoredResume>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM resumes WHERE id = $1");
        let row = sqlx::query_as::<_, ResumeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn update(&self, id: i64, patch: ResumePatch) -> Result<Option<StoredResume>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM resumes WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, ResumeRow>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };
        let merged = StoredResume::from(current).record.merged(patch);

        let update = format!(
            r#"
            UPDATE resumes SET
                personal_info = $2, experience = $3, education = $4, skills = $5,
                certifications = $6, projects = $7, template = $8, color_scheme = $9,
                font_style = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ResumeRow>(&update)
            .bind(id)
            .bind(Json(&merged.personal_info))
            .bind(Json(&merged.experience))
            .bind(Json(&merged.education))
            .bind(Json(&merged.skills))
            .bind(Json(&merged.certifications))
            .bind(Json(&merged.projects))
            .bind(merged.template.as_str())
            .bind(merged.color_scheme.as_str())
            .bind(&merged.font_style)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(row.into()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<StoredResume>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM resumes ORDER BY id");
        let rows = sqlx::query_as::<_, ResumeRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
