use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub author_id: u64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Persisted blog post. Comments are kept inline in insertion order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub author_id: u64,
    pub publication_date: DateTime<Utc>,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub downvotes: u64,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn new(id: u64, author_id: u64, title: String, content: String) -> Self {
        Self {
            id,
            title,
            content,
            author_id,
            publication_date: Utc::now(),
            upvotes: 0,
            downvotes: 0,
            comments: Vec::new(),
        }
    }

    /// Case-insensitive substring match on title or content.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }
}

pub fn validate_title(title: &str) -> Result<(), ModelError> {
    if title.trim().is_empty() {
        return Err(ModelError::Validation("title is required and must be a non-empty string".into()));
    }
    Ok(())
}

pub fn validate_content(content: &str) -> Result<(), ModelError> {
    if content.trim().is_empty() {
        return Err(ModelError::Validation("content is required and must be a non-empty string".into()));
    }
    Ok(())
}
