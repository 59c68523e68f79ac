use axum::{
    Form, Router,
    extract::{FromRequestParts, Path, State},
    http::{StatusCode, request::Parts},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;

use crate::{
    application::{
        articles::{ArticleError, ArticleService},
        error::{ErrorReport, HttpError},
    },
    presentation::views::{
        ArticleDetailView, ArticleFormTemplate, ArticleFormView, ArticleIndexTemplate,
        ArticleListView, ArticleShowTemplate, LayoutContext, render_not_found_response,
        render_template_response,
    },
};

use super::{
    RouterState, health_response,
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct HttpState {
    pub articles: ArticleService,
}

pub fn build_router(state: RouterState) -> Router<RouterState> {
    Router::new()
        .route("/", get(index))
        .route("/article", get(index).post(store))
        .route("/article/create", get(create_form))
        .route(
            "/article/{id}",
            get(show)
                .post(spoofed)
                .put(update)
                .patch(update)
                .delete(destroy),
        )
        .route("/article/{id}/edit", get(edit_form))
        .route("/_health/db", get(db_health))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

/// Browser form submission. `_method` carries the real verb for forms that
/// can only POST.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ArticleForm {
    #[serde(rename = "_method")]
    method: Option<String>,
    title: String,
    body: String,
}

/// Numeric `{id}` segment. Anything else renders the not-found page, the
/// same as an id with no article behind it.
struct ArticleId(i64);

impl<S> FromRequestParts<S> for ArticleId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i64>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(rejection) => {
                let mut response = render_not_found_response();
                ErrorReport::from_message(
                    "infra::http::public::article_id",
                    StatusCode::NOT_FOUND,
                    rejection.body_text(),
                )
                .attach(&mut response);
                Err(response)
            }
        }
    }
}

async fn index(State(state): State<HttpState>) -> Response {
    match state.articles.list_all().await {
        Ok(articles) => {
            let view = LayoutContext::new("Articles", ArticleListView::new(&articles));
            render_template_response(ArticleIndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => article_error_response(err),
    }
}

async fn create_form() -> Response {
    let view = LayoutContext::new("New article", ArticleFormView::create());
    render_template_response(ArticleFormTemplate { view }, StatusCode::OK)
}

async fn store(State(state): State<HttpState>, Form(form): Form<ArticleForm>) -> Response {
    match state.articles.create(form.title.clone(), form.body.clone()).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(ArticleError::Validation(errors)) => {
            let content = ArticleFormView::create()
                .with_input(&form.title, &form.body)
                .with_errors(&errors);
            let mut response = render_template_response(
                ArticleFormTemplate {
                    view: LayoutContext::new("New article", content),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            );
            ErrorReport::from_error(
                "infra::http::public::store",
                StatusCode::UNPROCESSABLE_ENTITY,
                &errors,
            )
            .attach(&mut response);
            response
        }
        Err(err) => article_error_response(err),
    }
}

async fn show(State(state): State<HttpState>, ArticleId(id): ArticleId) -> Response {
    match state.articles.require(id).await {
        Ok(article) => {
            let title = article.title.clone();
            let view = LayoutContext::new(title, ArticleDetailView::from(article));
            render_template_response(ArticleShowTemplate { view }, StatusCode::OK)
        }
        Err(err) => article_error_response(err),
    }
}

async fn edit_form(State(state): State<HttpState>, ArticleId(id): ArticleId) -> Response {
    match state.articles.edit_form(id).await {
        Ok(article) => {
            let view = LayoutContext::new("Edit article", ArticleFormView::edit(&article));
            render_template_response(ArticleFormTemplate { view }, StatusCode::OK)
        }
        Err(err) => article_error_response(err),
    }
}

async fn spoofed(
    State(state): State<HttpState>,
    ArticleId(id): ArticleId,
    Form(form): Form<ArticleForm>,
) -> Response {
    match form.method.as_deref().map(str::to_ascii_uppercase).as_deref() {
        Some("PUT") | Some("PATCH") => apply_update(&state, id, form).await,
        Some("DELETE") => apply_delete(&state, id).await,
        _ => HttpError::new(
            "infra::http::public::spoofed",
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed",
            format!("unsupported _method {:?} for /article/{id}", form.method),
        )
        .into_response(),
    }
}

async fn update(
    State(state): State<HttpState>,
    ArticleId(id): ArticleId,
    Form(form): Form<ArticleForm>,
) -> Response {
    apply_update(&state, id, form).await
}

async fn destroy(State(state): State<HttpState>, ArticleId(id): ArticleId) -> Response {
    apply_delete(&state, id).await
}

async fn apply_update(state: &HttpState, id: i64, form: ArticleForm) -> Response {
    match state.articles.update(id, form.title, form.body).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(err) => article_error_response(err),
    }
}

async fn apply_delete(state: &HttpState, id: i64) -> Response {
    match state.articles.delete(id).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(err) => article_error_response(err),
    }
}

async fn db_health(State(state): State<HttpState>) -> Response {
    health_response(state.articles.health_check().await)
}

async fn fallback() -> Response {
    render_not_found_response()
}

fn article_error_response(err: ArticleError) -> Response {
    match err {
        ArticleError::NotFound { .. } => render_not_found_response(),
        other => HttpError::from(other).into_response(),
    }
}
