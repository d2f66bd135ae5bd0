use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Surrogate key assigned by the storage engine.
pub type PostId = i32;

/// Post entity - a stored blog post.
///
/// Every stored `title` is already normalized (see [`normalize_title`]).
/// `id` and `created_at` are assigned by storage on insert and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a post. The caller never chooses the id or timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Reject payloads that storage would accept but that carry no title.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("title must not be empty".to_string()));
        }
        Ok(())
    }

    /// Apply the pre-insert normalization hook.
    ///
    /// PostgreSQL applies the same rewrite through the `before_insert_post`
    /// trigger; backends without that trigger call this before storing.
    pub fn normalized(self) -> Self {
        Self {
            title: normalize_title(&self.title),
            content: self.content,
        }
    }
}

/// Pre-insert title normalization: the uppercase form of `title`.
///
/// Mirrors PostgreSQL `UPPER(title)`, which maps one character to one
/// character. Characters whose uppercase form expands (`ß` to `SS`) are kept
/// as they are, so lengths never change. Locale-specific mappings such as the
/// Turkish dotted `i` still follow the database collation.
pub fn normalize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        })
        .collect()
}
