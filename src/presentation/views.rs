use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::application::error::{ErrorReport, HttpError};
use crate::domain::entities::ArticleRecord;
use crate::domain::error::ValidationErrors;
use crate::domain::types::ArticleField;

const SITE_TITLE: &str = "Folio";
const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute] UTC");

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response() -> Response {
    let view = LayoutContext::new("Not found", ErrorPageView::not_found());
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub site_title: &'static str,
    pub page_title: String,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(page_title: impl Into<String>, content: T) -> Self {
        Self {
            site_title: SITE_TITLE,
            page_title: page_title.into(),
            content,
        }
    }
}

pub fn format_timestamp(value: OffsetDateTime) -> String {
    value
        .to_offset(time::UtcOffset::UTC)
        .format(DATE_FORMAT)
        .unwrap_or_else(|_| value.unix_timestamp().to_string())
}

#[derive(Clone)]
pub struct ArticleSummaryView {
    pub id: i64,
    pub title: String,
    pub created_at: String,
}

impl From<&ArticleRecord> for ArticleSummaryView {
    fn from(article: &ArticleRecord) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            created_at: format_timestamp(article.created_at),
        }
    }
}

#[derive(Clone)]
pub struct ArticleListView {
    pub articles: Vec<ArticleSummaryView>,
}

impl ArticleListView {
    pub fn new(articles: &[ArticleRecord]) -> Self {
        Self {
            articles: articles.iter().map(ArticleSummaryView::from).collect(),
        }
    }
}

#[derive(Clone)]
pub struct ArticleDetailView {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ArticleRecord> for ArticleDetailView {
    fn from(article: ArticleRecord) -> Self {
        Self {
            id: article.id,
            created_at: format_timestamp(article.created_at),
            updated_at: format_timestamp(article.updated_at),
            title: article.title,
            body: article.body,
        }
    }
}

/// Shared by the create and edit pages. `method` is the spoofed verb sent
/// in the `_method` field, if any.
#[derive(Clone)]
pub struct ArticleFormView {
    pub heading: &'static str,
    pub action: String,
    pub method: Option<&'static str>,
    pub submit_label: &'static str,
    pub title: String,
    pub body: String,
    pub errors: Vec<String>,
    pub title_invalid: bool,
    pub body_invalid: bool,
}

impl ArticleFormView {
    pub fn create() -> Self {
        Self {
            heading: "New article",
            action: "/article".to_string(),
            method: None,
            submit_label: "Create",
            title: String::new(),
            body: String::new(),
            errors: Vec::new(),
            title_invalid: false,
            body_invalid: false,
        }
    }

    pub fn edit(article: &ArticleRecord) -> Self {
        Self {
            heading: "Edit article",
            action: format!("/article/{}", article.id),
            method: Some("PUT"),
            submit_label: "Update",
            title: article.title.clone(),
            body: article.body.clone(),
            ..Self::create()
        }
    }

    /// Keeps the submitted values so the user can correct them.
    pub fn with_input(mut self, title: &str, body: &str) -> Self {
        self.title = title.to_string();
        self.body = body.to_string();
        self
    }

    pub fn with_errors(mut self, errors: &ValidationErrors) -> Self {
        self.errors = errors.messages();
        self.title_invalid = errors.has(ArticleField::Title);
        self.body_invalid = errors.has(ArticleField::Body);
        self
    }
}

pub struct ErrorPageView {
    pub status_code: u16,
    pub title: String,
    pub message: String,
    pub action: ErrorAction,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            status_code: StatusCode::NOT_FOUND.as_u16(),
            title: "Article not found".to_string(),
            message: "The article you are looking for does not exist or was deleted.".to_string(),
            action: ErrorAction::home(),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn home() -> Self {
        Self {
            href: "/".to_string(),
            label: "Back to articles".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "articles/index.html")]
pub struct ArticleIndexTemplate {
    pub view: LayoutContext<ArticleListView>,
}

#[derive(Template)]
#[template(path = "articles/show.html")]
pub struct ArticleShowTemplate {
    pub view: LayoutContext<ArticleDetailView>,
}

#[derive(Template)]
#[template(path = "articles/form.html")]
pub struct ArticleFormTemplate {
    pub view: LayoutContext<ArticleFormView>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}
