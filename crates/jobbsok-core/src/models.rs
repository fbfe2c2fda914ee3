//! Domain models for job posts and their related collections.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Definition key carrying the position ("Stilling") of a job post.
pub const KEY_POSITION: &str = "Stilling";
/// Definition key carrying the sector ("Sektor") of a job post.
pub const KEY_SECTOR: &str = "Sektor";
/// Definition key carrying the location ("Sted") of a job post.
pub const KEY_LOCATION: &str = "Sted";

/// A short free-form label attached to job posts (skill, technology, ...).
///
/// Many posts may share one tag; lookup during creation is
/// case-insensitive so "Java" and "java" resolve to the same row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobTag {
    pub id: i64,
    pub tag: String,
}

/// A key/value pair describing a job post (e.g. "Sektor" / "Offentlig").
///
/// The (key, value) pair is the unit of identity; de-duplication during
/// creation is case-insensitive on both parts. Keys other than the
/// well-known `KEY_*` constants are inert for filtering but still
/// stored and returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobDefinition {
    pub id: i64,
    pub key: String,
    pub value: String,
}

/// The job post aggregate root, with tags and definitions attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPost {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    /// Unique across all posts. A post without a url is persisted but
    /// never visible through search.
    pub url: Option<String>,
    pub company_name: Option<String>,
    pub company_image_url: Option<String>,
    pub image_url: Option<String>,
    pub title: String,
    pub description: Option<String>,
    /// Calendar date with no time component; absence means "no deadline".
    pub deadline: Option<NaiveDate>,
    pub tags: Vec<JobTag>,
    pub definitions: Vec<JobDefinition>,
}

/// A definition as supplied on creation, before resolution against
/// existing rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionInput {
    pub key: String,
    pub value: String,
}

/// Input for creating one job post.
///
/// Required fields are enforced at the transport boundary; by the time
/// a `NewJobPost` reaches the service they are known to be non-blank.
#[derive(Debug, Clone, Default)]
pub struct NewJobPost {
    pub url: String,
    pub company_name: String,
    pub company_image_url: Option<String>,
    pub image_url: Option<String>,
    pub title: String,
    pub description: String,
    pub deadline: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub definitions: Vec<DefinitionInput>,
}

/// Sparse search criteria; every field is independently optional.
///
/// `municipality` may hold several comma-separated tokens. `deadline`
/// is the raw bucket token ("nærmest", "lengst unna", or anything else
/// meaning "no deadline"); `None` means no bucket filter at all, which
/// is a distinct state from an empty or unrecognized token.
#[derive(Debug, Clone, Default)]
pub struct JobPostFilter {
    pub query: Option<String>,
    pub position: Option<String>,
    pub sector: Option<String>,
    pub municipality: Option<String>,
    pub deadline: Option<String>,
}

/// One page of search results with pagination metadata.
#[derive(Debug, Clone)]
pub struct JobPostPage {
    pub items: Vec<JobPost>,
    pub page: u32,
    pub size: u32,
    /// Total matches under the filter, not the number of items on
    /// this page.
    pub total: i64,
}

impl JobPostPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A tag resolved against the store: either an existing row to reuse
/// or a new text value to be created alongside the owning post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagRef {
    Existing(JobTag),
    New(String),
}

/// A definition resolved against the store, same reuse-or-create rule
/// as [`TagRef`] but keyed on the (key, value) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionRef {
    Existing(JobDefinition),
    New(DefinitionInput),
}

/// A creation payload after tag/definition resolution, ready for the
/// store to persist in one transaction.
#[derive(Debug, Clone)]
pub struct ResolvedJobPost {
    pub url: String,
    pub company_name: String,
    pub company_image_url: Option<String>,
    pub image_url: Option<String>,
    pub title: String,
    pub description: String,
    pub deadline: Option<NaiveDate>,
    pub tags: Vec<TagRef>,
    pub definitions: Vec<DefinitionRef>,
}
