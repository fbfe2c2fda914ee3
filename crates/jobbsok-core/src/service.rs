//! Query execution and bulk creation over a [`JobPostStore`].

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::error::AppError;
use crate::filter::{DeadlineBucket, build_predicate, resolve_order};
use crate::geo::GeoTable;
use crate::models::{
    DefinitionRef, JobPost, JobPostFilter, JobPostPage, NewJobPost, ResolvedJobPost, TagRef,
};
use crate::traits::JobPostStore;

/// Constant-time byte comparison to prevent timing attacks on secret
/// key validation.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Service for searching, fetching, and bulk-creating job posts.
///
/// Pure orchestration: predicates and ordering are built here, all
/// blocking happens inside the injected store.
#[derive(Clone)]
pub struct JobPostService<S>
where
    S: JobPostStore,
{
    store: S,
    geo: GeoTable,
    secret_key: String,
}

impl<S> JobPostService<S>
where
    S: JobPostStore,
{
    /// Creates a new service with the given store, geography table,
    /// and the secret key that gates creation.
    pub fn new(store: S, geo: GeoTable, secret_key: impl Into<String>) -> Self {
        Self {
            store,
            geo,
            secret_key: secret_key.into(),
        }
    }

    /// Produces one page of fully-populated job posts matching the
    /// filter, evaluated against today's date.
    pub async fn search(
        &self,
        filter: &JobPostFilter,
        page: u32,
        size: u32,
    ) -> Result<JobPostPage, AppError> {
        self.search_as_of(filter, page, size, Utc::now().date_naive())
            .await
    }

    /// Like [`search`](Self::search) with an explicit "today", so the
    /// temporal gate is deterministic under test.
    ///
    /// The count, the id window, and the full-row fetch run as three
    /// store calls. They are semantically one read; a row deleted
    /// between the last two shrinks the page rather than erroring. A
    /// page beyond the last window returns zero items with the true
    /// total.
    pub async fn search_as_of(
        &self,
        filter: &JobPostFilter,
        page: u32,
        size: u32,
        today: NaiveDate,
    ) -> Result<JobPostPage, AppError> {
        let predicate = build_predicate(filter, today, &self.geo)?;
        let order = resolve_order(filter.deadline.as_deref().map(DeadlineBucket::parse));

        let total = self.store.count(&predicate).await?;

        let offset = u64::from(page) * u64::from(size);
        let ids = self.store.fetch_ids(&predicate, order, size, offset).await?;

        let items = if ids.is_empty() {
            Vec::new()
        } else {
            self.store.fetch_by_ids(&ids).await?
        };

        debug!(total, returned = items.len(), page, size, "job post search executed");

        Ok(JobPostPage {
            items,
            page,
            size,
            total,
        })
    }

    /// Fetches one job post by identifier.
    pub async fn get_by_id(&self, id: i64) -> Result<JobPost, AppError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or(AppError::JobPostNotFound(id))
    }

    /// Bulk-creates job posts.
    ///
    /// The secret key is checked before anything else; a bad key
    /// rejects the whole batch with no rows inserted. Entries whose
    /// url already exists are skipped. Tags and definitions are
    /// resolved against existing rows (case-insensitively) before each
    /// insert so the store reuses them instead of creating duplicates.
    ///
    /// Resolution and insert are not atomic across calls: two
    /// concurrent batches introducing the same new tag can still race
    /// into duplicate tag rows. Accepted weakness of this design.
    pub async fn create(
        &self,
        batch: Vec<NewJobPost>,
        secret_key: &str,
    ) -> Result<Vec<i64>, AppError> {
        if !constant_time_eq(secret_key.as_bytes(), self.secret_key.as_bytes()) {
            return Err(AppError::BadSecretKey);
        }

        let mut created = Vec::new();
        for post in batch {
            if self.store.exists_by_url(&post.url).await? {
                debug!(url = %post.url, "skipping job post with existing url");
                continue;
            }
            let resolved = self.resolve(post).await?;
            created.push(self.store.insert(resolved).await?);
        }

        info!(created = created.len(), "job post batch persisted");
        Ok(created)
    }

    /// Resolves each tag and definition to an existing row or marks it
    /// new, ahead of persisting the owning post.
    async fn resolve(&self, post: NewJobPost) -> Result<ResolvedJobPost, AppError> {
        let mut tags = Vec::with_capacity(post.tags.len());
        for tag in post.tags {
            tags.push(match self.store.find_tag(&tag).await? {
                Some(existing) => TagRef::Existing(existing),
                None => TagRef::New(tag),
            });
        }

        let mut definitions = Vec::with_capacity(post.definitions.len());
        for definition in post.definitions {
            definitions.push(
                match self
                    .store
                    .find_definition(&definition.key, &definition.value)
                    .await?
                {
                    Some(existing) => DefinitionRef::Existing(existing),
                    None => DefinitionRef::New(definition),
                },
            );
        }

        Ok(ResolvedJobPost {
            url: post.url,
            company_name: post.company_name,
            company_image_url: post.company_image_url,
            image_url: post.image_url,
            title: post.title,
            description: post.description,
            deadline: post.deadline,
            tags,
            definitions,
        })
    }
}
