use crate::api::Article;
use std::collections::HashSet;

/// Counts reported by [`ArticleStore::append`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendSummary {
    pub added: usize,
    /// Articles skipped because their id was already present.
    pub duplicates: usize,
}

/// Ordered, id-unique list of every article loaded this session.
///
/// Only two mutations exist: `replace` (page zero) and `append` (later pages).
#[derive(Debug, Default)]
pub struct ArticleStore {
    articles: Vec<Article>,
    ids: HashSet<String>,
}

impl ArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything and keep `articles`. Repeated ids within the page
    /// keep their first occurrence. Returns the new length.
    pub fn replace(&mut self, articles: Vec<Article>) -> usize {
        self.articles.clear();
        self.ids.clear();
        let summary = self.append(articles);
        if summary.duplicates > 0 {
            tracing::debug!(
                duplicates = summary.duplicates,
                "Dropped repeated ids from replacement page"
            );
        }
        self.articles.len()
    }

    /// Add `articles` after the existing ones, skipping known ids.
    pub fn append(&mut self, articles: Vec<Article>) -> AppendSummary {
        let mut summary = AppendSummary::default();
        self.articles.reserve(articles.len());
        for article in articles {
            if self.ids.insert(article.id.clone()) {
                self.articles.push(article);
                summary.added += 1;
            } else {
                summary.duplicates += 1;
            }
        }
        summary
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn get(&self, index: usize) -> Option<&Article> {
        self.articles.get(index)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    pub(crate) fn article(id: &str) -> Article {
        Article {
            id: id.to_string(),
            title: format!("Article {}", id),
            content: format!("Body of {}", id),
            image: String::new(),
            url: format!("https://news.example.com/{}", id),
            tag: "AI, Research".to_string(),
        }
    }

    fn ids(store: &ArticleStore) -> Vec<&str> {
        store.articles().iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_append_keeps_existing() {
        let mut store = ArticleStore::new();
        store.replace(vec![article("1"), article("2")]);
        let summary = store.append(vec![article("3")]);
        assert_eq!(summary, AppendSummary { added: 1, duplicates: 0 });
        assert_eq!(ids(&store), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_replace_discards_previous() {
        let mut store = ArticleStore::new();
        store.replace(vec![article("1"), article("2")]);
        assert_eq!(store.replace(vec![article("9")]), 1);
        assert_eq!(ids(&store), vec!["9"]);
        assert!(!store.contains("1"));
    }

    #[test]
    fn test_append_skips_duplicates() {
        let mut store = ArticleStore::new();
        store.replace(vec![article("1"), article("2")]);
        let summary = store.append(vec![article("2"), article("3"), article("3")]);
        assert_eq!(summary, AppendSummary { added: 1, duplicates: 2 });
        assert_eq!(ids(&store), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_replace_with_repeated_ids_keeps_first() {
        let mut store = ArticleStore::new();
        let mut second = article("1");
        second.title = "later copy".into();
        store.replace(vec![article("1"), second]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().title, "Article 1");
    }

    proptest! {
        #[test]
        fn prop_store_ids_stay_unique(pages in prop::collection::vec(
            prop::collection::vec(0u8..20, 0..10), 1..8)
        ) {
            let mut store = ArticleStore::new();
            for (i, page) in pages.iter().enumerate() {
                let batch: Vec<Article> = page.iter().map(|n| article(&n.to_string())).collect();
                let before: Vec<String> = store.articles().iter().map(|a| a.id.clone()).collect();
                if i == 0 {
                    store.replace(batch);
                } else {
                    store.append(batch);
                    // Existing entries are never removed or reordered
                    let prefix: Vec<String> = store.articles()[..before.len()]
                        .iter()
                        .map(|a| a.id.clone())
                        .collect();
                    prop_assert_eq!(prefix, before);
                }
                let unique: HashSet<&str> = store.articles().iter().map(|a| a.id.as_str()).collect();
                prop_assert_eq!(unique.len(), store.len());
            }
        }
    }
}
