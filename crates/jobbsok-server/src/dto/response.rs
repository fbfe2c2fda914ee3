//! Response DTOs for API endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

use jobbsok_core::{JobDefinition, JobPost, JobPostPage, JobTag};

// =============================================================================
// Response envelope
// =============================================================================

/// Outcome marker carried by every response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

/// One client-visible error entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResponseError {
    pub message: String,
    pub http_status: u16,
    pub timestamp: DateTime<Utc>,
}

impl ResponseError {
    pub fn new(message: String, http_status: u16) -> Self {
        Self {
            message,
            http_status,
            timestamp: Utc::now(),
        }
    }
}

/// The response envelope: `result` on success, `errors` on failure.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T: Serialize> {
    pub response: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ResponseError>>,
}

impl<T: Serialize> ApiEnvelope<T> {
    pub fn success(result: T) -> Self {
        Self {
            response: ResponseStatus::Success,
            result: Some(result),
            errors: None,
        }
    }

    pub fn failed(errors: Vec<ResponseError>) -> Self {
        Self {
            response: ResponseStatus::Failed,
            result: None,
            errors: Some(errors),
        }
    }
}

// =============================================================================
// Health
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("healthy")
    pub status: String,
    /// Server version
    pub version: String,
}

// =============================================================================
// Job posts
// =============================================================================

/// Deadlines go out in the `dd-MM-yyyy` format the consumers expect.
fn serialize_deadline<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(date) => serializer.serialize_str(&date.format("%d-%m-%Y").to_string()),
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobTagDto {
    pub id: i64,
    pub tag: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobDefinitionDto {
    pub id: i64,
    pub key: String,
    pub value: String,
}

/// A job post with its tags and definitions attached.
#[derive(Debug, Serialize, ToSchema)]
pub struct JobPostDto {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        serialize_with = "serialize_deadline",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, example = "31-12-2026")]
    pub deadline: Option<NaiveDate>,
    pub job_tags: Vec<JobTagDto>,
    /// Definitions keep their historical wire name.
    pub job_description: Vec<JobDefinitionDto>,
}

impl From<JobPost> for JobPostDto {
    fn from(post: JobPost) -> Self {
        Self {
            id: post.id,
            created_at: post.created_at,
            url: post.url,
            company_name: post.company_name,
            company_image_url: post.company_image_url,
            image_url: post.image_url,
            title: post.title,
            description: post.description,
            deadline: post.deadline,
            job_tags: post.tags.into_iter().map(JobTagDto::from).collect(),
            job_description: post
                .definitions
                .into_iter()
                .map(JobDefinitionDto::from)
                .collect(),
        }
    }
}

impl From<JobTag> for JobTagDto {
    fn from(tag: JobTag) -> Self {
        Self {
            id: tag.id,
            tag: tag.tag,
        }
    }
}

impl From<JobDefinition> for JobDefinitionDto {
    fn from(definition: JobDefinition) -> Self {
        Self {
            id: definition.id,
            key: definition.key,
            value: definition.value,
        }
    }
}

/// One page of job posts with pagination metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct JobPostPageDto {
    pub items: Vec<JobPostDto>,
    pub page: u32,
    pub size: u32,
    pub total: i64,
}

impl From<JobPostPage> for JobPostPageDto {
    fn from(page: JobPostPage) -> Self {
        Self {
            items: page.items.into_iter().map(JobPostDto::from).collect(),
            page: page.page,
            size: page.size,
            total: page.total,
        }
    }
}
