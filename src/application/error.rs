use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{application::articles::ArticleError, infra::error::InfraError};

#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    public_message: &'static str,
    report: ErrorReport,
}

impl HttpError {
    pub fn new(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        let report = ErrorReport::from_message(source, status, detail);
        Self {
            status,
            public_message,
            report,
        }
    }

    pub fn from_error(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        error: &dyn StdError,
    ) -> Self {
        let report = ErrorReport::from_error(source, status, error);
        Self {
            status,
            public_message,
            report,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.public_message).into_response();
        self.report.attach(&mut response);
        response
    }
}

impl From<ArticleError> for HttpError {
    fn from(error: ArticleError) -> Self {
        const SOURCE: &str = "application::error::article_error_to_http_error";
        match error {
            ArticleError::Validation(errors) => HttpError::from_error(
                SOURCE,
                StatusCode::UNPROCESSABLE_ENTITY,
                "Article could not be saved",
                &errors,
            ),
            ArticleError::NotFound { id } => HttpError::new(
                SOURCE,
                StatusCode::NOT_FOUND,
                "Article not found",
                format!("Article {id} does not exist"),
            ),
            ArticleError::Repo(err) => HttpError::from_error(
                SOURCE,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                &err,
            ),
            ArticleError::Cache(err) => HttpError::from_error(
                SOURCE,
                StatusCode::SERVICE_UNAVAILABLE,
                "Service temporarily unavailable",
                &err,
            ),
        }
    }
}

/// Failure that ends a CLI command.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::repos::RepoError;
    use crate::cache::CacheError;

    #[test]
    fn report_collects_source_chain() {
        let err = ArticleError::Repo(RepoError::Timeout);
        let report = ErrorReport::from_error("test", StatusCode::INTERNAL_SERVER_ERROR, &err);
        assert_eq!(report.messages, vec!["database timeout".to_string()]);
    }

    #[test]
    fn article_not_found_maps_to_404() {
        let response = HttpError::from(ArticleError::NotFound { id: 9 }).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let report = response
            .extensions()
            .get::<ErrorReport>()
            .expect("report attached");
        assert_eq!(report.messages, vec!["Article 9 does not exist".to_string()]);
    }

    #[test]
    fn cache_failures_surface_as_unavailable() {
        let err = ArticleError::Cache(CacheError::backend("connection reset"));
        let response = HttpError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let report = response
            .extensions()
            .get::<ErrorReport>()
            .expect("report attached");
        assert_eq!(
            report.messages,
            vec!["cache backend error: connection reset".to_string()]
        );
    }

    #[test]
    fn infra_failures_keep_their_message() {
        let err = AppError::from(InfraError::configuration("bad port"));
        assert_eq!(err.to_string(), "configuration error: bad port");
    }
}
