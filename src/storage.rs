use log::{debug, error, info, trace, warn};

use crate::{Article, KeyValueBackend, Result};

/// Key under which the whole article collection is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "crypto-articles";

/// Manages the canonical article collection and its persisted mirror.
///
/// Every mutation funnels through [`ArticleStore::save_all`], which re-sorts
/// the collection by creation time (newest first) and writes it back to the
/// backend as a single JSON array.
///
/// The store does no locking of its own. Callers that share it must hold a
/// lock across each read-modify-write cycle; the last writer wins otherwise.
pub struct ArticleStore<B: KeyValueBackend> {
    /// Persistence backend
    backend: B,

    /// Backend key holding the serialized collection
    key: String,

    /// Collection used when nothing usable is persisted
    seed: Vec<Article>,

    /// Current in-memory collection, sorted newest first after any save
    articles: Vec<Article>,
}

impl<B: KeyValueBackend> ArticleStore<B> {
    /// Creates a store over `backend` that falls back to `seed`.
    ///
    /// Nothing is read until [`ArticleStore::load`] is called.
    pub fn new(backend: B, seed: Vec<Article>) -> Self {
        Self::with_key(backend, seed, DEFAULT_STORAGE_KEY)
    }

    /// Same as [`ArticleStore::new`] with a custom storage key
    pub fn with_key(backend: B, seed: Vec<Article>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            seed,
            articles: Vec::new(),
        }
    }

    /// Loads the collection from the backend.
    ///
    /// * nothing stored: the seed becomes current and is written immediately
    /// * unreadable or unparseable value: the seed becomes current, nothing is written
    /// * otherwise the stored collection becomes current, in stored order
    pub fn load(&mut self) -> &[Article] {
        info!("Loading articles from key '{}'", self.key);

        match self.backend.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Article>>(&raw) {
                Ok(articles) => {
                    info!("Loaded {} articles", articles.len());
                    self.articles = articles;
                }
                Err(e) => {
                    warn!(
                        "Failed to parse stored articles, falling back to seed data: {}",
                        e
                    );
                    self.articles = self.seed.clone();
                }
            },
            Ok(None) => {
                info!(
                    "No stored articles found, bootstrapping with {} seed articles",
                    self.seed.len()
                );
                let seed = self.seed.clone();
                self.articles = seed;
                self.persist();
            }
            Err(e) => {
                error!("Failed to load articles, falling back to seed data: {}", e);
                self.articles = self.seed.clone();
            }
        }

        &self.articles
    }

    /// Sorts `articles` newest first, persists them and makes them current.
    ///
    /// The sort is stable: articles with the same creation time keep their
    /// relative input order. A failed write is logged and otherwise ignored;
    /// the next successful save reconciles the backend.
    pub fn save_all(&mut self, mut articles: Vec<Article>) -> &[Article] {
        debug!("Saving {} articles", articles.len());
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.articles = articles;
        self.persist();
        &self.articles
    }

    /// Replaces the article with the same id in place, or prepends it.
    pub fn upsert(&mut self, article: Article) -> &[Article] {
        let mut articles = std::mem::take(&mut self.articles);

        match articles.iter().position(|a| a.id == article.id) {
            Some(index) => {
                info!("Replacing article: {}", article.id);
                articles[index] = article;
            }
            None => {
                info!("Inserting article: {}", article.id);
                articles.insert(0, article);
            }
        }

        self.save_all(articles)
    }

    /// Removes every article with the given id.
    ///
    /// An unknown id is not an error; the collection is simply re-saved.
    pub fn delete(&mut self, id: &str) -> &[Article] {
        let mut articles = std::mem::take(&mut self.articles);
        let before = articles.len();
        articles.retain(|a| a.id != id);

        match before - articles.len() {
            0 => debug!("No article with id {} to delete", id),
            removed => info!("Deleted {} article(s) with id {}", removed, id),
        }

        self.save_all(articles)
    }

    /// The current collection
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Retrieves an article by its id
    pub fn get(&self, id: &str) -> Option<&Article> {
        trace!("Retrieving article by ID: {}", id);
        self.articles.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Searches titles and content using fuzzy matching.
    ///
    /// Title matches count double. Results come back highest score first;
    /// equal scores keep collection order.
    pub fn search(&self, query: &str) -> Vec<&Article> {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        info!("Searching articles with query: '{}'", query);
        let matcher = SkimMatcherV2::default();

        let mut scored: Vec<(i64, &Article)> = self
            .articles
            .iter()
            .filter_map(|article| {
                let title_score = matcher.fuzzy_match(&article.title, query).unwrap_or(0);
                let content_score = matcher.fuzzy_match(&article.content, query).unwrap_or(0);
                let score = title_score * 2 + content_score;
                (score > 0).then_some((score, article))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        debug!("Found {} matching articles", scored.len());
        scored.into_iter().map(|(_, article)| article).collect()
    }

    /// Access to the backend, mainly for inspection
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Writes the current collection; failures are logged, never returned.
    fn persist(&mut self) {
        if let Err(e) = self.try_persist() {
            error!("Failed to persist articles under '{}': {}", self.key, e);
        }
    }

    fn try_persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.articles)?;
        self.backend.set(&self.key, &json)?;
        trace!("Persisted {} articles", self.articles.len());
        Ok(())
    }
}
