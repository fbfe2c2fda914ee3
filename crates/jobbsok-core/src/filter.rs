//! Predicate and ordering construction for job post search.
//!
//! A sparse [`JobPostFilter`] is compiled into one explicit
//! [`Predicate`] tree plus a [`JobPostOrder`]. Optional criteria that
//! are absent simply contribute no fragment; there are no null
//! sentinels. The same tree drives both the SQL renderer in the
//! database crate and the pure in-memory evaluation used by tests and
//! mock stores.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::error::AppError;
use crate::geo::GeoTable;
use crate::models::{JobPost, JobPostFilter, KEY_LOCATION, KEY_POSITION, KEY_SECTOR};

/// The closed vocabulary of deadline bucket tokens.
///
/// A supplied bucket *replaces* the default "future or none" temporal
/// gate; it is never combined with it. Any token outside the known
/// vocabulary selects the posts without a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineBucket {
    /// "nærmest": non-null deadline on or after today, soonest first.
    Nearest,
    /// "lengst unna": non-null deadline, furthest first.
    Furthest,
    /// Anything else: deadline is null.
    WithoutDeadline,
}

impl DeadlineBucket {
    /// Parses a bucket token, case-insensitively.
    pub fn parse(token: &str) -> Self {
        match token.to_lowercase().as_str() {
            "nærmest" => Self::Nearest,
            "lengst unna" => Self::Furthest,
            _ => Self::WithoutDeadline,
        }
    }
}

/// A composable boolean predicate over job posts.
///
/// All text matching is case-insensitive; "contains" means substring.
/// Date comparisons are against the `today` the tree was built with,
/// so evaluation stays deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Logical AND; an empty list is vacuously true.
    All(Vec<Predicate>),
    /// Logical OR; an empty list is vacuously false.
    Any(Vec<Predicate>),
    /// The post has a non-empty url.
    UrlPresent,
    /// No deadline, or deadline on/after the given date.
    DeadlineAbsentOrOnAfter(NaiveDate),
    /// Deadline present and on/after the given date.
    DeadlineOnAfter(NaiveDate),
    /// Deadline present.
    DeadlineSet,
    /// Deadline absent.
    DeadlineAbsent,
    /// Title or description contains the text.
    TextContains(String),
    /// Some attached definition has this key (equals) and a value
    /// containing the needle.
    DefinitionContains { key: String, needle: String },
    /// Some attached definition has this key and exactly this value.
    DefinitionEquals { key: String, value: String },
}

impl Predicate {
    /// Evaluates the predicate against one in-memory job post.
    pub fn matches(&self, post: &JobPost) -> bool {
        match self {
            Self::All(parts) => parts.iter().all(|p| p.matches(post)),
            Self::Any(parts) => parts.iter().any(|p| p.matches(post)),
            Self::UrlPresent => post.url.as_deref().is_some_and(|url| !url.is_empty()),
            Self::DeadlineAbsentOrOnAfter(date) => {
                post.deadline.is_none_or(|deadline| deadline >= *date)
            }
            Self::DeadlineOnAfter(date) => post.deadline.is_some_and(|deadline| deadline >= *date),
            Self::DeadlineSet => post.deadline.is_some(),
            Self::DeadlineAbsent => post.deadline.is_none(),
            Self::TextContains(text) => {
                let needle = text.to_lowercase();
                post.title.to_lowercase().contains(&needle)
                    || post
                        .description
                        .as_deref()
                        .is_some_and(|description| description.to_lowercase().contains(&needle))
            }
            Self::DefinitionContains { key, needle } => {
                let key = key.to_lowercase();
                let needle = needle.to_lowercase();
                post.definitions.iter().any(|definition| {
                    definition.key.to_lowercase() == key
                        && definition.value.to_lowercase().contains(&needle)
                })
            }
            Self::DefinitionEquals { key, value } => {
                let key = key.to_lowercase();
                let value = value.to_lowercase();
                post.definitions.iter().any(|definition| {
                    definition.key.to_lowercase() == key
                        && definition.value.to_lowercase() == value
                })
            }
        }
    }
}

/// Compiles a filter request into one predicate tree.
///
/// Rules, ANDed together:
/// - the post has a url (always);
/// - the default temporal gate (no deadline, or deadline not passed)
///   unless a bucket token is supplied, in which case the bucket's own
///   deadline rule takes its place;
/// - free-text, position, sector, and municipality rules for whichever
///   criteria are present.
///
/// Municipality expansion consults `geo`; an unknown token fails the
/// whole request with [`AppError::UnknownMunicipality`]. A value
/// holding only blanks and commas carries no tokens and behaves like
/// an absent municipality, not an empty OR (which would match
/// nothing).
pub fn build_predicate(
    filter: &JobPostFilter,
    today: NaiveDate,
    geo: &GeoTable,
) -> Result<Predicate, AppError> {
    let mut parts = vec![Predicate::UrlPresent];

    match filter.deadline.as_deref().map(DeadlineBucket::parse) {
        None => parts.push(Predicate::DeadlineAbsentOrOnAfter(today)),
        Some(DeadlineBucket::Nearest) => {
            parts.push(Predicate::DeadlineSet);
            parts.push(Predicate::DeadlineOnAfter(today));
        }
        Some(DeadlineBucket::Furthest) => parts.push(Predicate::DeadlineSet),
        Some(DeadlineBucket::WithoutDeadline) => parts.push(Predicate::DeadlineAbsent),
    }

    if let Some(query) = &filter.query {
        parts.push(Predicate::TextContains(query.clone()));
    }

    if let Some(position) = &filter.position {
        parts.push(Predicate::DefinitionContains {
            key: KEY_POSITION.to_string(),
            needle: position.clone(),
        });
    }

    if let Some(sector) = &filter.sector {
        parts.push(Predicate::DefinitionEquals {
            key: KEY_SECTOR.to_string(),
            value: sector.clone(),
        });
    }

    if let Some(municipality) = &filter.municipality {
        let groups = geo.expand_csv(municipality)?;
        if !groups.is_empty() {
            let token_predicates = groups
                .into_iter()
                .map(|places| {
                    Predicate::Any(
                        places
                            .into_iter()
                            .map(|place| Predicate::DefinitionContains {
                                key: KEY_LOCATION.to_string(),
                                needle: place,
                            })
                            .collect(),
                    )
                })
                .collect();
            parts.push(Predicate::Any(token_predicates));
        }
    }

    Ok(Predicate::All(parts))
}

/// Sort order paired with a deadline bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPostOrder {
    /// Most recently created first. The default.
    CreatedDesc,
    /// Soonest deadline first ("nærmest").
    DeadlineAsc,
    /// Furthest deadline first ("lengst unna").
    DeadlineDesc,
}

/// Resolves the sort order for an optional deadline bucket.
///
/// No bucket and the "without deadline" bucket both fall back to
/// recency.
pub fn resolve_order(bucket: Option<DeadlineBucket>) -> JobPostOrder {
    match bucket {
        Some(DeadlineBucket::Nearest) => JobPostOrder::DeadlineAsc,
        Some(DeadlineBucket::Furthest) => JobPostOrder::DeadlineDesc,
        Some(DeadlineBucket::WithoutDeadline) | None => JobPostOrder::CreatedDesc,
    }
}

impl JobPostOrder {
    /// Total order over posts: the primary key, then ascending id.
    ///
    /// The id tie-break keeps pagination stable when primary keys
    /// collide across a page boundary.
    pub fn compare(self, a: &JobPost, b: &JobPost) -> Ordering {
        let primary = match self {
            Self::CreatedDesc => b.created_at.cmp(&a.created_at),
            Self::DeadlineAsc => a.deadline.cmp(&b.deadline),
            Self::DeadlineDesc => b.deadline.cmp(&a.deadline),
        };
        primary.then(a.id.cmp(&b.id))
    }
}
