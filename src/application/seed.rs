//! Sample data for fresh installations.

use tracing::info;

use crate::application::articles::ArticleError;
use crate::application::repos::ArticlesRepo;
use crate::domain::articles::NewArticle;
use crate::domain::entities::ArticleRecord;

pub const SEED_ARTICLE_COUNT: usize = 5;
pub const SEED_ARTICLE_BODY: &str = "Lorem ipsum dolor sit amet";

/// Inserts "Article 1" through "Article 5" in order.
///
/// Goes straight to the repository; callers holding a cache must forget
/// `article:all` afterwards.
pub async fn seed_articles(repo: &dyn ArticlesRepo) -> Result<Vec<ArticleRecord>, ArticleError> {
    let mut inserted = Vec::with_capacity(SEED_ARTICLE_COUNT);
    for n in 1..=SEED_ARTICLE_COUNT {
        let article = NewArticle::new(format!("Article {n}"), SEED_ARTICLE_BODY)?;
        inserted.push(repo.insert(article).await?);
    }

    info!(
        target: "folio::seed",
        count = inserted.len(),
        "seeded articles"
    );
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryRepositories;

    #[tokio::test]
    async fn seeds_five_articles_in_order() {
        let repo = InMemoryRepositories::new();

        let seeded = seed_articles(&repo).await.unwrap();

        let titles: Vec<_> = seeded.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Article 1", "Article 2", "Article 3", "Article 4", "Article 5"]
        );
        assert!(seeded.iter().all(|a| a.body == SEED_ARTICLE_BODY));
        assert_eq!(repo.find_all().await.unwrap(), seeded);
    }
}
