//! Job post endpoints: paginated search, fetch by id, bulk creation.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::dto::{
    ApiEnvelope, CreateJobPostsRequest, JobPostDto, JobPostListQuery, JobPostPageDto,
    SecretKeyQuery,
};
use crate::error::ApiError;
use crate::state::AppState;

/// Paginated job post search.
///
/// All filters are optional and combine with AND. An empty page is
/// answered with 204 No Content instead of an empty body.
#[utoipa::path(
    get,
    path = "/api/v1/jobposts",
    params(JobPostListQuery),
    responses(
        (status = 200, description = "One page of matching job posts", body = JobPostPageDto),
        (status = 204, description = "No job posts match the filter on this page"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "jobposts"
)]
pub async fn list_job_posts(
    State(state): State<AppState>,
    Query(params): Query<JobPostListQuery>,
) -> Result<Response, ApiError> {
    let page = state
        .job_posts
        .search(&params.filter(), params.page(), params.size())
        .await
        .map_err(ApiError::from)?;

    if page.is_empty() {
        debug!(page = params.page(), "empty job post page");
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let body = ApiEnvelope::success(JobPostPageDto::from(page));
    Ok(Json(body).into_response())
}

/// Fetch a single job post by id.
#[utoipa::path(
    get,
    path = "/api/v1/jobposts/{id}",
    params(
        ("id" = i64, Path, description = "Job post identifier"),
    ),
    responses(
        (status = 200, description = "The job post", body = JobPostDto),
        (status = 404, description = "No job post with this id"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "jobposts"
)]
pub async fn get_job_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiEnvelope<JobPostDto>>, ApiError> {
    let post = state.job_posts.get_by_id(id).await.map_err(ApiError::from)?;
    Ok(Json(ApiEnvelope::success(JobPostDto::from(post))))
}

/// Bulk job post creation, gated by the secret key.
///
/// The whole batch is validated before anything is persisted; a single
/// invalid entry rejects the request. Entries whose url already exists
/// are silently skipped.
#[utoipa::path(
    post,
    path = "/api/v1/jobposts",
    params(SecretKeyQuery),
    request_body = CreateJobPostsRequest,
    responses(
        (status = 201, description = "Ids of the created job posts", body = Vec<i64>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Bad secret key"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "jobposts"
)]
pub async fn create_job_posts(
    State(state): State<AppState>,
    Query(key): Query<SecretKeyQuery>,
    Json(request): Json<CreateJobPostsRequest>,
) -> Result<(StatusCode, Json<ApiEnvelope<Vec<i64>>>), ApiError> {
    let Some(secret_key) = key.secretkey else {
        return Err(ApiError::Unauthorized);
    };

    if request.job_posts.is_empty() {
        return Err(ApiError::BadRequest(
            "Request must contain at least one job post".to_string(),
        ));
    }

    let errors: Vec<String> = request
        .job_posts
        .iter()
        .flat_map(|dto| dto.validate())
        .collect();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let batch = request
        .job_posts
        .into_iter()
        .map(|dto| dto.into_new_job_post())
        .collect();

    let created = state
        .job_posts
        .create(batch, &secret_key)
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(ApiEnvelope::success(created))))
}
