//! Article input rules.

use crate::domain::{error::ValidationErrors, types::ArticleField};

pub const TITLE_MAX_CHARS: usize = 100;

/// Validated input for a new article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    title: String,
    body: String,
}

impl NewArticle {
    /// Applies the create rules: title required and at most
    /// [`TITLE_MAX_CHARS`] characters, body required.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Result<Self, ValidationErrors> {
        let title = title.into();
        let body = body.into();

        let mut errors = ValidationErrors::new();
        if is_blank(&title) {
            errors.push(ArticleField::Title, "The title field is required.");
        } else if title.chars().count() > TITLE_MAX_CHARS {
            errors.push(
                ArticleField::Title,
                format!("The title may not be greater than {TITLE_MAX_CHARS} characters."),
            );
        }
        if is_blank(&body) {
            errors.push(ArticleField::Body, "The body field is required.");
        }
        errors.into_result()?;

        Ok(Self { title, body })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_parts(self) -> (String, String) {
        (self.title, self.body)
    }
}

// Whitespace-only input counts as missing.
fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_title_at_limit() {
        let title = "x".repeat(TITLE_MAX_CHARS);
        let article = NewArticle::new(title.clone(), "body").expect("valid article");
        assert_eq!(article.title(), title);
        assert_eq!(article.body(), "body");
    }

    #[test]
    fn rejects_empty_title() {
        let errors = NewArticle::new("", "body").expect_err("empty title");
        assert!(errors.has(ArticleField::Title));
        assert!(!errors.has(ArticleField::Body));
    }

    #[test]
    fn rejects_overlong_title() {
        let errors = NewArticle::new("x".repeat(101), "body").expect_err("title too long");
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(
            errors.messages(),
            vec!["The title may not be greater than 100 characters.".to_string()]
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        let title = "é".repeat(TITLE_MAX_CHARS);
        assert!(title.len() > TITLE_MAX_CHARS);
        assert!(NewArticle::new(title, "body").is_ok());
    }

    #[test]
    fn reports_every_offending_field() {
        let errors = NewArticle::new("  ", "").expect_err("both blank");
        assert!(errors.has(ArticleField::Title));
        assert!(errors.has(ArticleField::Body));
        assert_eq!(
            errors.to_string(),
            "validation failed: The title field is required. (title); The body field is required. (body)"
        );
    }
}
