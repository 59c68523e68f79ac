//! Cache key definitions.
//!
//! The collection lives under `article:all`; a single article lives under
//! the collection prefix followed by its id, e.g. `article:42`.

use std::fmt;

const ARTICLE_PREFIX: &str = "article:";
const ARTICLE_ALL: &str = "article:all";

/// Keys owned by the article cache-aside layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The full ordered article list.
    ArticleAll,
    /// One article (or the record that it does not exist).
    Article(i64),
}

impl CacheKey {
    pub fn as_string(&self) -> String {
        match self {
            CacheKey::ArticleAll => ARTICLE_ALL.to_string(),
            CacheKey::Article(id) => format!("{ARTICLE_PREFIX}{id}"),
        }
    }

    /// Metric label distinguishing collection from item entries.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheKey::ArticleAll => "collection",
            CacheKey::Article(_) => "item",
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::ArticleAll => f.write_str(ARTICLE_ALL),
            CacheKey::Article(id) => write!(f, "{ARTICLE_PREFIX}{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_key_is_fixed() {
        assert_eq!(CacheKey::ArticleAll.as_string(), "article:all");
        assert_eq!(CacheKey::ArticleAll.kind(), "collection");
    }

    #[test]
    fn item_key_appends_id_to_prefix() {
        assert_eq!(CacheKey::Article(42).as_string(), "article:42");
        assert_eq!(CacheKey::Article(42).to_string(), "article:42");
        assert_eq!(CacheKey::Article(7).kind(), "item");
    }

    #[test]
    fn distinct_ids_never_collide_with_collection() {
        assert_ne!(CacheKey::Article(1).as_string(), CacheKey::ArticleAll.as_string());
        assert_ne!(CacheKey::Article(1), CacheKey::Article(11));
    }
}
