//! Job post repository for PostgreSQL.
//!
//! Renders [`Predicate`] trees into parameterized SQL and implements
//! the two-phase paged fetch: an ordered id window first, then the
//! full rows with tags and definitions batch-loaded and reattached.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use jobbsok_core::error::AppError;
use jobbsok_core::filter::{JobPostOrder, Predicate};
use jobbsok_core::models::{
    DefinitionRef, JobDefinition, JobPost, JobTag, ResolvedJobPost, TagRef,
};
use jobbsok_core::traits::JobPostStore;

/// Column list for job post SELECTs. Kept a const literal so every
/// query reads the same shape.
const JOB_POST_COLUMNS: &str =
    "id, created_at, url, company_name, company_image_url, image_url, title, description, deadline";

/// Repository for job post persistence in PostgreSQL.
#[derive(Clone)]
pub struct JobPostRepository {
    pool: PgPool,
}

/// Escapes LIKE metacharacters in user input and wraps it for a
/// case-insensitive substring match.
fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// ORDER BY clause for each resolved order. The ascending-id
/// tie-break keeps windows stable across pages.
fn order_clause(order: JobPostOrder) -> &'static str {
    match order {
        JobPostOrder::CreatedDesc => "jp.created_at DESC, jp.id ASC",
        JobPostOrder::DeadlineAsc => "jp.deadline ASC, jp.id ASC",
        JobPostOrder::DeadlineDesc => "jp.deadline DESC, jp.id ASC",
    }
}

/// Renders one predicate node into the builder. `jp` is the job_posts
/// alias in the surrounding query.
fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::All(parts) => push_group(builder, parts, " AND ", "TRUE"),
        Predicate::Any(parts) => push_group(builder, parts, " OR ", "FALSE"),
        Predicate::UrlPresent => {
            builder.push("(jp.url IS NOT NULL AND jp.url <> '')");
        }
        Predicate::DeadlineAbsentOrOnAfter(date) => {
            builder.push("(jp.deadline IS NULL OR jp.deadline >= ");
            builder.push_bind(*date);
            builder.push(")");
        }
        Predicate::DeadlineOnAfter(date) => {
            builder.push("jp.deadline >= ");
            builder.push_bind(*date);
        }
        Predicate::DeadlineSet => {
            builder.push("jp.deadline IS NOT NULL");
        }
        Predicate::DeadlineAbsent => {
            builder.push("jp.deadline IS NULL");
        }
        Predicate::TextContains(text) => {
            let pattern = contains_pattern(text);
            builder.push("(jp.title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR jp.description ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
        Predicate::DefinitionContains { key, needle } => {
            push_definition_exists(builder, key, |builder| {
                builder.push("jd.value ILIKE ");
                builder.push_bind(contains_pattern(needle));
            });
        }
        Predicate::DefinitionEquals { key, value } => {
            push_definition_exists(builder, key, |builder| {
                builder.push("LOWER(jd.value) = LOWER(");
                builder.push_bind(value.clone());
                builder.push(")");
            });
        }
    }
}

fn push_group(
    builder: &mut QueryBuilder<'_, Postgres>,
    parts: &[Predicate],
    separator: &str,
    empty: &str,
) {
    if parts.is_empty() {
        builder.push(empty);
        return;
    }
    builder.push("(");
    for (index, part) in parts.iter().enumerate() {
        if index > 0 {
            builder.push(separator);
        }
        push_predicate(builder, part);
    }
    builder.push(")");
}

/// EXISTS subquery over the definition association for one key, with a
/// caller-supplied condition on the value.
fn push_definition_exists(
    builder: &mut QueryBuilder<'_, Postgres>,
    key: &str,
    value_condition: impl FnOnce(&mut QueryBuilder<'_, Postgres>),
) {
    builder.push(
        "EXISTS (SELECT 1 FROM job_post_definitions jpd \
         JOIN job_definitions jd ON jd.id = jpd.definition_id \
         WHERE jpd.job_post_id = jp.id AND LOWER(jd.key) = LOWER(",
    );
    builder.push_bind(key.to_string());
    builder.push(") AND ");
    value_condition(builder);
    builder.push(")");
}

#[derive(sqlx::FromRow)]
struct JobPostRow {
    id: i64,
    created_at: DateTime<Utc>,
    url: Option<String>,
    company_name: Option<String>,
    company_image_url: Option<String>,
    image_url: Option<String>,
    title: String,
    description: Option<String>,
    deadline: Option<NaiveDate>,
}

impl JobPostRow {
    fn into_post(self, tags: Vec<JobTag>, definitions: Vec<JobDefinition>) -> JobPost {
        JobPost {
            id: self.id,
            created_at: self.created_at,
            url: self.url,
            company_name: self.company_name,
            company_image_url: self.company_image_url,
            image_url: self.image_url,
            title: self.title,
            description: self.description,
            deadline: self.deadline,
            tags,
            definitions,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TagAssociationRow {
    job_post_id: i64,
    id: i64,
    tag: String,
}

#[derive(sqlx::FromRow)]
struct DefinitionAssociationRow {
    job_post_id: i64,
    id: i64,
    key: String,
    value: String,
}

impl JobPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Batch-loads tag sets for the given post ids.
    async fn load_tags(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<JobTag>>, AppError> {
        let rows: Vec<TagAssociationRow> = sqlx::query_as(
            "SELECT jpt.job_post_id, t.id, t.tag \
             FROM job_post_tags jpt \
             JOIN job_tags t ON t.id = jpt.tag_id \
             WHERE jpt.job_post_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_post: HashMap<i64, Vec<JobTag>> = HashMap::new();
        for row in rows {
            by_post.entry(row.job_post_id).or_default().push(JobTag {
                id: row.id,
                tag: row.tag,
            });
        }
        Ok(by_post)
    }

    /// Batch-loads definition sets for the given post ids.
    async fn load_definitions(
        &self,
        ids: &[i64],
    ) -> Result<HashMap<i64, Vec<JobDefinition>>, AppError> {
        let rows: Vec<DefinitionAssociationRow> = sqlx::query_as(
            "SELECT jpd.job_post_id, d.id, d.key, d.value \
             FROM job_post_definitions jpd \
             JOIN job_definitions d ON d.id = jpd.definition_id \
             WHERE jpd.job_post_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_post: HashMap<i64, Vec<JobDefinition>> = HashMap::new();
        for row in rows {
            by_post
                .entry(row.job_post_id)
                .or_default()
                .push(JobDefinition {
                    id: row.id,
                    key: row.key,
                    value: row.value,
                });
        }
        Ok(by_post)
    }
}

impl JobPostStore for JobPostRepository {
    async fn count(&self, predicate: &Predicate) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM job_posts jp WHERE ");
        push_predicate(&mut builder, predicate);

        let total: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn fetch_ids(
        &self,
        predicate: &Predicate,
        order: JobPostOrder,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<i64>, AppError> {
        let mut builder = QueryBuilder::new("SELECT jp.id FROM job_posts jp WHERE ");
        push_predicate(&mut builder, predicate);
        builder.push(" ORDER BY ");
        builder.push(order_clause(order));
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(limit));
        builder.push(" OFFSET ");
        builder.push_bind(offset as i64);

        let ids = builder.build_query_scalar().fetch_all(&self.pool).await?;
        Ok(ids)
    }

    async fn fetch_by_ids(&self, ids: &[i64]) -> Result<Vec<JobPost>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<JobPostRow> = sqlx::query_as(&format!(
            "SELECT {JOB_POST_COLUMNS} FROM job_posts WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut tags = self.load_tags(ids).await?;
        let mut definitions = self.load_definitions(ids).await?;

        // Reorder to the id window: an IN fetch does not preserve it.
        let mut by_id: HashMap<i64, JobPostRow> =
            rows.into_iter().map(|row| (row.id, row)).collect();
        Ok(ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(|row| {
                let id = row.id;
                row.into_post(
                    tags.remove(&id).unwrap_or_default(),
                    definitions.remove(&id).unwrap_or_default(),
                )
            })
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<JobPost>, AppError> {
        Ok(self.fetch_by_ids(&[id]).await?.pop())
    }

    async fn exists_by_url(&self, url: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM job_posts WHERE url = $1)")
            .bind(url)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn insert(&self, post: ResolvedJobPost) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let post_id: i64 = sqlx::query_scalar(
            "INSERT INTO job_posts \
             (url, company_name, company_image_url, image_url, title, description, deadline) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id",
        )
        .bind(&post.url)
        .bind(&post.company_name)
        .bind(&post.company_image_url)
        .bind(&post.image_url)
        .bind(&post.title)
        .bind(&post.description)
        .bind(post.deadline)
        .fetch_one(&mut *tx)
        .await?;

        for tag in &post.tags {
            let tag_id = match tag {
                TagRef::Existing(tag) => tag.id,
                TagRef::New(text) => {
                    sqlx::query_scalar("INSERT INTO job_tags (tag) VALUES ($1) RETURNING id")
                        .bind(text)
                        .fetch_one(&mut *tx)
                        .await?
                }
            };
            sqlx::query(
                "INSERT INTO job_post_tags (job_post_id, tag_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(post_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
        }

        for definition in &post.definitions {
            let definition_id = match definition {
                DefinitionRef::Existing(definition) => definition.id,
                DefinitionRef::New(input) => {
                    sqlx::query_scalar(
                        "INSERT INTO job_definitions (key, value) VALUES ($1, $2) RETURNING id",
                    )
                    .bind(&input.key)
                    .bind(&input.value)
                    .fetch_one(&mut *tx)
                    .await?
                }
            };
            sqlx::query(
                "INSERT INTO job_post_definitions (job_post_id, definition_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(post_id)
            .bind(definition_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(post_id, url = %post.url, "job post inserted");
        Ok(post_id)
    }

    async fn find_tag(&self, tag: &str) -> Result<Option<JobTag>, AppError> {
        let found = sqlx::query_as::<_, JobTag>(
            "SELECT id, tag FROM job_tags WHERE LOWER(tag) = LOWER($1) LIMIT 1",
        )
        .bind(tag)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found)
    }

    async fn find_definition(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Option<JobDefinition>, AppError> {
        let found = sqlx::query_as::<_, JobDefinition>(
            "SELECT id, key, value FROM job_definitions \
             WHERE LOWER(key) = LOWER($1) AND LOWER(value) = LOWER($2) \
             LIMIT 1",
        )
        .bind(key)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found)
    }
}
