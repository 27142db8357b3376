use models::post::{self, Post};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Create input: title and content, both required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl CreatePostInput {
    pub fn validate(&self) -> Result<(), ServiceError> {
        post::validate_title(&self.title)?;
        post::validate_content(&self.content)?;
        Ok(())
    }
}

/// Partial update. At least one field must be present; present fields
/// must be non-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl UpdatePostInput {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.title.is_none() && self.content.is_none() {
            return Err(ServiceError::Validation("nothing to update: provide title and/or content".into()));
        }
        if let Some(t) = &self.title { post::validate_title(t)?; }
        if let Some(c) = &self.content { post::validate_content(c)?; }
        Ok(())
    }

    /// Apply the present fields; authorship is never touched.
    pub fn apply(self, post: &mut Post) {
        if let Some(t) = self.title { post.title = t; }
        if let Some(c) = self.content { post.content = c; }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentInput {
    #[serde(default)]
    pub content: String,
}

impl CommentInput {
    pub fn validate(&self) -> Result<(), ServiceError> {
        post::validate_content(&self.content)?;
        Ok(())
    }
}

/// Vote counters after an upvote/downvote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub upvotes: u64,
    pub downvotes: u64,
}

impl From<&Post> for VoteTally {
    fn from(p: &Post) -> Self {
        Self { upvotes: p.upvotes, downvotes: p.downvotes }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
}
