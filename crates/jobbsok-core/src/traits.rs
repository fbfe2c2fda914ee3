//! Trait definition for the persisted job post collection.
//!
//! The services are generic over [`JobPostStore`] so the query and
//! creation logic can be unit tested against an in-memory mock and run
//! in production against PostgreSQL.

use std::future::Future;

use crate::error::AppError;
use crate::filter::{JobPostOrder, Predicate};
use crate::models::{JobDefinition, JobPost, JobTag, ResolvedJobPost};

/// Store for job post persistence and retrieval.
///
/// Implementations translate [`Predicate`] trees into their own query
/// language (SQL, in-memory evaluation, ...). `fetch_ids` and
/// `fetch_by_ids` together form one logical read; implementations that
/// do not run them in one snapshot may return fewer rows than ids when
/// a row is deleted in between, and callers must tolerate that.
pub trait JobPostStore: Send + Sync + Clone {
    /// Counts posts matching the predicate.
    fn count(&self, predicate: &Predicate) -> impl Future<Output = Result<i64, AppError>> + Send;

    /// Fetches one ordered window of matching post identifiers.
    ///
    /// Ordering must apply the ascending-id tie-break after the
    /// primary key so windows are stable across pages.
    fn fetch_ids(
        &self,
        predicate: &Predicate,
        order: JobPostOrder,
        limit: u32,
        offset: u64,
    ) -> impl Future<Output = Result<Vec<i64>, AppError>> + Send;

    /// Fetches full aggregates (tags and definitions attached) for the
    /// given identifiers, returned in the order of `ids`. Identifiers
    /// with no row are skipped, not errors.
    fn fetch_by_ids(
        &self,
        ids: &[i64],
    ) -> impl Future<Output = Result<Vec<JobPost>, AppError>> + Send;

    /// Fetches one full aggregate by identifier.
    fn get_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<JobPost>, AppError>> + Send;

    /// Whether any post already has this exact url.
    fn exists_by_url(&self, url: &str) -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Persists one resolved post, creating its `New` tag/definition
    /// rows and associating the `Existing` ones. Returns the assigned
    /// identifier.
    fn insert(
        &self,
        post: ResolvedJobPost,
    ) -> impl Future<Output = Result<i64, AppError>> + Send;

    /// Case-insensitive exact lookup of a tag by text.
    fn find_tag(
        &self,
        tag: &str,
    ) -> impl Future<Output = Result<Option<JobTag>, AppError>> + Send;

    /// Case-insensitive lookup of a definition by (key, value).
    fn find_definition(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<Option<JobDefinition>, AppError>> + Send;
}
