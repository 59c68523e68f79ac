pub mod api;
mod middleware;
mod public;

pub use api::{ApiState, build_api_router};
pub use middleware::RequestContext;
pub use public::{HttpState, build_router};

use axum::Router;
use axum::extract::FromRef;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::articles::{ArticleError, ArticleService};
use crate::application::error::ErrorReport;

fn health_response(result: Result<(), ArticleError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

#[derive(Clone)]
pub struct RouterState {
    pub http: HttpState,
    pub api: ApiState,
}

impl RouterState {
    pub fn new(articles: ArticleService) -> Self {
        Self {
            http: HttpState {
                articles: articles.clone(),
            },
            api: ApiState { articles },
        }
    }
}

impl FromRef<RouterState> for HttpState {
    fn from_ref(state: &RouterState) -> Self {
        state.http.clone()
    }
}

impl FromRef<RouterState> for ApiState {
    fn from_ref(state: &RouterState) -> Self {
        state.api.clone()
    }
}

/// HTML and JSON surfaces on one router, ready to serve.
pub fn build_app(articles: ArticleService) -> Router {
    let state = RouterState::new(articles);
    build_api_router(state.clone())
        .merge(build_router(state.clone()))
        .with_state(state)
}
