use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Post, PostDraft, PostPatch, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Update an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// Look up by UUID, falling back to slug.
    async fn find_by_id_or_slug(&self, id_or_slug: &str) -> Result<Option<Category>, RepoError>;

    /// All categories, ordered by name.
    async fn find_all(&self) -> Result<Vec<Category>, RepoError>;
}

/// Filter and pagination parameters for the post listing.
#[derive(Debug, Clone)]
pub struct PostQuery {
    /// 1-based page number.
    pub page: u64,
    pub limit: u64,
    pub category: Option<Uuid>,
    /// Case-insensitive match against title, content, or excerpt.
    pub search: Option<String>,
}

impl PostQuery {
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.limit
    }
}

/// One page of posts plus the pre-pagination match count.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub items: Vec<Post>,
    pub total: u64,
}

/// Post repository. Posts come back fully populated: author and category
/// references resolved, comments in insertion order.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Published posts matching the query, newest first.
    async fn list(&self, query: &PostQuery) -> Result<PostPage, RepoError>;

    /// Look up by UUID, falling back to slug for human-readable URLs.
    async fn find_by_id_or_slug(&self, id_or_slug: &str) -> Result<Option<Post>, RepoError>;

    async fn create(&self, draft: PostDraft) -> Result<Post, RepoError>;

    /// Apply a partial update. A changed title regenerates the slug.
    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Atomically bump the view counter.
    async fn increment_view_count(&self, id: Uuid) -> Result<(), RepoError>;

    /// Append a comment. Ordering under concurrent appends is delegated to
    /// the store's atomic single-row insert.
    async fn append_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<Option<Post>, RepoError>;
}
