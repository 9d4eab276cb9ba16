use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::CategoryRef;
use super::slug::slugify;
use super::user::AuthorRef;

/// Post entity - an article with its embedded comments.
///
/// Repositories return posts fully populated: author and category resolved
/// to their embedded references, comments in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    /// Fixed at creation; never reassigned.
    pub author: AuthorRef,
    pub category: CategoryRef,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub is_published: bool,
    /// Only ever increases.
    pub view_count: i64,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment embedded in a post. Append-only: never edited, never reordered,
/// removed only together with the parent post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub author: AuthorRef,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a post.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub is_published: bool,
}

impl PostDraft {
    /// Start a draft with generated ID and a slug derived from the title.
    pub fn new(author_id: Uuid, category_id: Uuid, title: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            category_id,
            slug: slugify(&title),
            title,
            content,
            excerpt: None,
            tags: Vec::new(),
            featured_image: None,
            is_published: true,
        }
    }
}

/// Partial update for a post. Absent fields are left untouched.
/// There is deliberately no author field: authorship is immutable.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category_id: Option<Uuid>,
    pub tags: Option<Vec<String>>,
    pub featured_image: Option<String>,
    pub is_published: Option<bool>,
}
