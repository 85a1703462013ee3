//! Core data structures for the newsdesk application.
//!
//! This module contains the persisted [`Article`] record and the
//! user-editable [`ArticleDraft`] it is built from.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{NewsError, Result};

/// Represents a single news article in our system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Unique identifier for the article
    pub id: String,
    /// Article headline
    pub title: String,
    /// Article body in the supported markdown subset
    pub content: String,
    /// Byline
    pub author: String,
    /// When the article was created
    pub created_at: DateTime<Utc>,
    /// Optional cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Article {
    /// Creates a new article from a draft, assigning a fresh id and creation time
    pub fn new(draft: ArticleDraft) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), Utc::now(), draft)
    }

    /// Builds an article with an explicit id and creation time
    pub fn with_id(id: impl Into<String>, created_at: DateTime<Utc>, draft: ArticleDraft) -> Self {
        Article {
            id: id.into(),
            title: draft.title,
            content: draft.content,
            author: draft.author,
            created_at,
            image_url: draft.image_url.filter(|url| !url.trim().is_empty()),
        }
    }

    /// Produces the full replacement record for an edit.
    ///
    /// The id and creation timestamp of `self` are carried over unchanged.
    pub fn revise(&self, draft: ArticleDraft) -> Self {
        Self::with_id(self.id.clone(), self.created_at, draft)
    }

    /// Returns the editable fields of this article
    pub fn to_draft(&self) -> ArticleDraft {
        ArticleDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            author: self.author.clone(),
            image_url: self.image_url.clone(),
        }
    }

    /// The image to display: the stored URL or a placeholder seeded by the id
    pub fn display_image_url(&self) -> String {
        match &self.image_url {
            Some(url) => url.clone(),
            None => placeholder_image_url(&self.id),
        }
    }
}

/// Deterministic placeholder image for an article id
pub fn placeholder_image_url(id: &str) -> String {
    format!("https://picsum.photos/seed/{}/1200/600", id)
}

/// The fields a user fills in when creating or editing an article
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub author: String,
    pub image_url: Option<String>,
}

impl ArticleDraft {
    /// Checks that title, content and author are all present.
    ///
    /// Fields are checked in that order and the first empty one is reported.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("Title", &self.title),
            ("Content", &self.content),
            ("Author", &self.author),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(NewsError::Validation { field });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ArticleDraft {
        ArticleDraft {
            title: "Solana Outage Report".to_string(),
            content: "## Summary\n\nValidators stalled.".to_string(),
            author: "Node Watcher".to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_new_articles_get_distinct_ids() {
        let a = Article::new(draft());
        let b = Article::new(draft());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_revise_preserves_identity() {
        let original = Article::new(draft());
        let mut changed = draft();
        changed.title = "Solana Outage Post-Mortem".to_string();

        let revised = original.revise(changed);
        assert_eq!(revised.id, original.id);
        assert_eq!(revised.created_at, original.created_at);
        assert_eq!(revised.title, "Solana Outage Post-Mortem");
    }

    #[test]
    fn test_placeholder_image_is_derived_from_id() {
        let article = Article::with_id("abc", Utc::now(), draft());
        assert_eq!(
            article.display_image_url(),
            "https://picsum.photos/seed/abc/1200/600"
        );

        let mut with_image = draft();
        with_image.image_url = Some("https://example.com/cover.png".to_string());
        let article = Article::with_id("abc", Utc::now(), with_image);
        assert_eq!(article.display_image_url(), "https://example.com/cover.png");
    }

    #[test]
    fn test_blank_image_url_is_dropped() {
        let mut blank = draft();
        blank.image_url = Some("   ".to_string());
        assert_eq!(Article::new(blank).image_url, None);
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        assert!(draft().validate().is_ok());

        let mut missing = draft();
        missing.content = "  ".to_string();
        missing.author = String::new();
        match missing.validate() {
            Err(NewsError::Validation { field }) => assert_eq!(field, "Content"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_reads_and_writes_camel_case_fields() {
        let json = r#"{
            "id": "1",
            "title": "Bitcoin Surges",
            "content": "text",
            "author": "Crypto Analyst",
            "createdAt": "2023-10-26T10:00:00.000Z"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.image_url, None);
        assert_eq!(article.created_at.to_rfc3339(), "2023-10-26T10:00:00+00:00");

        let value = serde_json::to_value(&article).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("imageUrl").is_none());
    }
}
