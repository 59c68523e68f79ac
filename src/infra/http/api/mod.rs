pub mod error;
pub mod handlers;
pub mod models;

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::application::articles::ArticleService;
use crate::infra::http::RouterState;
use crate::infra::http::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct ApiState {
    pub articles: ArticleService,
}

pub fn build_api_router(state: RouterState) -> Router<RouterState> {
    Router::new()
        .route(
            "/api/articles",
            get(handlers::list_articles).post(handlers::create_article),
        )
        .route(
            "/api/articles/{id}",
            get(handlers::get_article)
                .put(handlers::update_article)
                .patch(handlers::update_article)
                .delete(handlers::delete_article),
        )
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
