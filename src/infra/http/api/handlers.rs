use axum::Json;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::IntoResponse;

use crate::application::articles::ArticleError;
use crate::application::repos::RepoError;

use super::ApiState;
use super::error::{ApiError, codes};
use super::models::{ArticleListResponse, ArticleWriteRequest};

/// Numeric `{id}` segment, rejected with the API's JSON error body.
pub struct ArticleId(pub i64);

impl<S> FromRequestParts<S> for ArticleId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<i64>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| Self(id))
            .map_err(|rejection| {
                ApiError::bad_request("Invalid article id", Some(rejection.body_text()))
            })
    }
}

pub async fn list_articles(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let items = state.articles.list_all().await.map_err(article_to_api)?;
    Ok(Json(ArticleListResponse { items }))
}

pub async fn get_article(
    State(state): State<ApiState>,
    ArticleId(id): ArticleId,
) -> Result<impl IntoResponse, ApiError> {
    match state.articles.get_by_id(id).await.map_err(article_to_api)? {
        Some(article) => Ok(Json(article)),
        None => Err(ApiError::not_found("article not found")),
    }
}

pub async fn create_article(
    State(state): State<ApiState>,
    Json(payload): Json<ArticleWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .articles
        .create(payload.title, payload.body)
        .await
        .map_err(article_to_api)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_article(
    State(state): State<ApiState>,
    ArticleId(id): ArticleId,
    Json(payload): Json<ArticleWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .articles
        .update(id, payload.title, payload.body)
        .await
        .map_err(article_to_api)?;
    Ok(Json(updated))
}

pub async fn delete_article(
    State(state): State<ApiState>,
    ArticleId(id): ArticleId,
) -> Result<impl IntoResponse, ApiError> {
    state.articles.delete(id).await.map_err(article_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn article_to_api(err: ArticleError) -> ApiError {
    match err {
        ArticleError::Validation(errors) => ApiError::validation(&errors),
        ArticleError::NotFound { .. } => ApiError::not_found("article not found"),
        ArticleError::Repo(repo) => repo_to_api(repo),
        ArticleError::Cache(cache) => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::CACHE,
            "Cache unavailable",
            Some(cache.to_string()),
        ),
    }
}

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::NotFound => ApiError::not_found("resource not found"),
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "Database timeout",
            None,
        ),
        RepoError::Persistence(msg) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            "Persistence error",
            Some(msg),
        ),
    }
}
