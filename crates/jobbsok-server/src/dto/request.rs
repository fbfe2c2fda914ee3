//! Request DTOs and query parameter types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use utoipa::{IntoParams, ToSchema};

use jobbsok_core::models::{DefinitionInput, JobPostFilter, NewJobPost};

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Hard cap on the page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Query parameters for listing job posts.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct JobPostListQuery {
    /// Free-text search across title and description
    pub query: Option<String>,
    /// Position filter, substring match on the "Stilling" definition
    pub position: Option<String>,
    /// Sector filter, exact match on the "Sektor" definition
    pub sector: Option<String>,
    /// Comma-separated municipalities, expanded to their cities
    pub municipality: Option<String>,
    /// Deadline bucket: "nærmest", "lengst unna", or anything else for
    /// posts without a deadline
    pub deadline: Option<String>,
    /// Zero-based page number
    pub page: Option<u32>,
    /// Page size (capped at 100)
    pub size: Option<u32>,
}

impl JobPostListQuery {
    /// Builds the domain filter. Blank parameters count as absent, so
    /// `?sector=` behaves like no sector filter at all.
    pub fn filter(&self) -> JobPostFilter {
        JobPostFilter {
            query: non_blank(self.query.as_deref()),
            position: non_blank(self.position.as_deref()),
            sector: non_blank(self.sector.as_deref()),
            municipality: non_blank(self.municipality.as_deref()),
            deadline: non_blank(self.deadline.as_deref()),
        }
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    pub fn size(&self) -> u32 {
        self.size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// Secret key passed as a query parameter on creation.
///
/// Optional at the extractor level so a request without the parameter
/// gets the same enveloped 401 as one with a wrong key, instead of the
/// extractor's plain-text rejection.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SecretKeyQuery {
    pub secretkey: Option<String>,
}

/// Deadlines come in as `dd-MM-yyyy`; blank strings mean no deadline.
fn deserialize_deadline<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => NaiveDate::parse_from_str(s, "%d-%m-%Y")
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// One job post in a creation batch.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct JobPostCreateDto {
    pub url: Option<String>,
    pub company_name: Option<String>,
    pub company_image_url: Option<String>,
    pub image_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_deadline")]
    #[schema(value_type = Option<String>, example = "31-12-2026")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub job_tags: Vec<String>,
    #[serde(default)]
    pub job_definitions: BTreeMap<String, String>,
}

impl JobPostCreateDto {
    /// One message per missing required field, empty when valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if non_blank(self.url.as_deref()).is_none() {
            errors.push("Job post must have a url".to_string());
        }
        if non_blank(self.company_name.as_deref()).is_none() {
            errors.push("Job post must have a company name".to_string());
        }
        if non_blank(self.title.as_deref()).is_none() {
            errors.push("Job post must have a title".to_string());
        }
        if non_blank(self.description.as_deref()).is_none() {
            errors.push("Job post must have a description".to_string());
        }
        errors
    }

    /// Converts into the domain input. Call [`validate`](Self::validate)
    /// first; required fields are unwrapped here.
    pub fn into_new_job_post(self) -> NewJobPost {
        NewJobPost {
            url: self.url.unwrap_or_default().trim().to_string(),
            company_name: self.company_name.unwrap_or_default().trim().to_string(),
            company_image_url: non_blank(self.company_image_url.as_deref()),
            image_url: non_blank(self.image_url.as_deref()),
            title: self.title.unwrap_or_default().trim().to_string(),
            description: self.description.unwrap_or_default().trim().to_string(),
            deadline: self.deadline,
            tags: self
                .job_tags
                .into_iter()
                .filter(|t| !t.trim().is_empty())
                .collect(),
            definitions: self
                .job_definitions
                .into_iter()
                .map(|(key, value)| DefinitionInput { key, value })
                .collect(),
        }
    }
}

/// Bulk creation request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateJobPostsRequest {
    pub job_posts: Vec<JobPostCreateDto>,
}
