use serde::{Deserialize, Serialize};

use crate::domain::entities::ArticleRecord;

#[derive(Debug, Deserialize, Serialize)]
pub struct ArticleWriteRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleListResponse {
    pub items: Vec<ArticleRecord>,
}
