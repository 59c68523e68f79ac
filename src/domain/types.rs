//! Shared domain enumerations.

use serde::{Deserialize, Serialize};

/// User-editable article fields, used to attribute validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleField {
    Title,
    Body,
}

impl ArticleField {
    pub fn as_str(self) -> &'static str {
        match self {
            ArticleField::Title => "title",
            ArticleField::Body => "body",
        }
    }
}
