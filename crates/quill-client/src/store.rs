//! Local post store - a client-side cache of the fetched post list.
//!
//! State changes only after a successful server response; nothing is
//! mutated optimistically, so the cache never runs ahead of what the
//! server has acknowledged. Each list/detail fetch takes a monotonically
//! increasing ticket and a response is applied only while its ticket is
//! still the newest for that slot, so a slow stale response can never
//! overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

use quill_shared::dto::{CreatePostRequest, PostDto, UpdatePostRequest};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::{ApiClient, PostList, PostListParams};
use crate::error::ClientError;

#[derive(Debug, Default)]
struct StoreState {
    posts: Vec<PostDto>,
    current: Option<PostDto>,
    loading: bool,
    error: Option<String>,
}

/// Client-side cache of the post list and the focused post.
pub struct PostStore {
    client: ApiClient,
    state: Mutex<StoreState>,
    list_seq: AtomicU64,
    detail_seq: AtomicU64,
}

impl PostStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Mutex::new(StoreState::default()),
            list_seq: AtomicU64::new(0),
            detail_seq: AtomicU64::new(0),
        }
    }

    // --- snapshots ---

    pub async fn posts(&self) -> Vec<PostDto> {
        self.state.lock().await.posts.clone()
    }

    pub async fn current_post(&self) -> Option<PostDto> {
        self.state.lock().await.current.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    // --- fetches, guarded by tickets ---

    pub async fn fetch_posts(&self, params: &PostListParams) -> Result<PostList, ClientError> {
        let ticket = self.begin_list_fetch().await;
        let result = self.client.list_posts(params).await;
        self.finish_list_fetch(ticket, result).await
    }

    pub async fn fetch_post(&self, id_or_slug: &str) -> Result<PostDto, ClientError> {
        let ticket = self.begin_detail_fetch().await;
        let result = self.client.get_post(id_or_slug).await;
        self.finish_detail_fetch(ticket, result).await
    }

    async fn begin_list_fetch(&self) -> u64 {
        self.state.lock().await.loading = true;
        self.list_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply a finished list fetch. A response that lost the race to a
    /// newer fetch is still returned to the caller but leaves the store
    /// untouched.
    async fn finish_list_fetch(
        &self,
        ticket: u64,
        result: Result<PostList, ClientError>,
    ) -> Result<PostList, ClientError> {
        let mut state = self.state.lock().await;
        if self.list_seq.load(Ordering::SeqCst) != ticket {
            tracing::debug!(ticket, "discarding stale post list response");
            return result;
        }

        state.loading = false;
        match &result {
            Ok(list) => {
                state.posts = list.posts.clone();
                state.error = None;
            }
            Err(err) => {
                state.error = Some(err.to_string());
            }
        }
        result
    }

    async fn begin_detail_fetch(&self) -> u64 {
        self.state.lock().await.loading = true;
        self.detail_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn finish_detail_fetch(
        &self,
        ticket: u64,
        result: Result<PostDto, ClientError>,
    ) -> Result<PostDto, ClientError> {
        let mut state = self.state.lock().await;
        if self.detail_seq.load(Ordering::SeqCst) != ticket {
            tracing::debug!(ticket, "discarding stale post detail response");
            return result;
        }

        state.loading = false;
        match &result {
            Ok(post) => {
                state.current = Some(post.clone());
                state.error = None;
            }
            Err(err) => {
                state.error = Some(err.to_string());
            }
        }
        result
    }

    // --- mutations, reconciled only after server confirmation ---

    /// Create a post and prepend it to the cached list.
    pub async fn create_post(&self, request: &CreatePostRequest) -> Result<PostDto, ClientError> {
        match self.client.create_post(request).await {
            Ok(post) => {
                self.apply_created(post.clone()).await;
                Ok(post)
            }
            Err(err) => {
                self.record_error(&err).await;
                Err(err)
            }
        }
    }

    /// Update a post, replacing the cached copy in place (and the focused
    /// post, if it is the one that changed).
    pub async fn update_post(
        &self,
        id: Uuid,
        request: &UpdatePostRequest,
    ) -> Result<PostDto, ClientError> {
        match self.client.update_post(id, request).await {
            Ok(post) => {
                self.apply_updated(post.clone()).await;
                Ok(post)
            }
            Err(err) => {
                self.record_error(&err).await;
                Err(err)
            }
        }
    }

    /// Delete a post, dropping it from the cache and clearing focus if it
    /// was the focused post.
    pub async fn delete_post(&self, id: Uuid) -> Result<String, ClientError> {
        match self.client.delete_post(id).await {
            Ok(message) => {
                self.apply_deleted(id).await;
                Ok(message)
            }
            Err(err) => {
                self.record_error(&err).await;
                Err(err)
            }
        }
    }

    /// Append a comment. The focused post is replaced wholesale with the
    /// server's returned post, since comment ids are server-assigned.
    pub async fn add_comment(&self, post_id: Uuid, content: &str) -> Result<PostDto, ClientError> {
        match self.client.add_comment(post_id, content).await {
            Ok(post) => {
                self.apply_commented(post.clone()).await;
                Ok(post)
            }
            Err(err) => {
                self.record_error(&err).await;
                Err(err)
            }
        }
    }

    async fn apply_created(&self, post: PostDto) {
        let mut state = self.state.lock().await;
        state.posts.insert(0, post);
        state.error = None;
    }

    async fn apply_updated(&self, post: PostDto) {
        let mut state = self.state.lock().await;
        if let Some(existing) = state.posts.iter_mut().find(|p| p.id == post.id) {
            *existing = post.clone();
        }
        if state.current.as_ref().is_some_and(|c| c.id == post.id) {
            state.current = Some(post);
        }
        state.error = None;
    }

    async fn apply_deleted(&self, id: Uuid) {
        let mut state = self.state.lock().await;
        state.posts.retain(|p| p.id != id);
        if state.current.as_ref().is_some_and(|c| c.id == id) {
            state.current = None;
        }
        state.error = None;
    }

    async fn apply_commented(&self, post: PostDto) {
        let mut state = self.state.lock().await;
        state.current = Some(post);
        state.error = None;
    }

    async fn record_error(&self, err: &ClientError) {
        self.state.lock().await.error = Some(err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use quill_shared::dto::{AuthorDto, CategoryRefDto, CommentDto};

    use super::*;

    fn store() -> PostStore {
        PostStore::new(ApiClient::new("http://localhost:0"))
    }

    fn sample_post(title: &str) -> PostDto {
        let now = Utc::now();
        PostDto {
            id: Uuid::new_v4(),
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            content: "content".to_string(),
            excerpt: None,
            author: AuthorDto {
                id: Uuid::new_v4(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            },
            category: CategoryRefDto {
                id: Uuid::new_v4(),
                name: "General".to_string(),
                slug: "general".to_string(),
                color: "#336699".to_string(),
            },
            tags: Vec::new(),
            featured_image: None,
            is_published: true,
            view_count: 0,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn page_of(posts: Vec<PostDto>) -> PostList {
        let total = posts.len() as u64;
        PostList {
            posts,
            total,
            page: 1,
            pages: 1,
        }
    }

    #[tokio::test]
    async fn create_prepends_to_list() {
        let store = store();
        let ticket = store.begin_list_fetch().await;
        store
            .finish_list_fetch(ticket, Ok(page_of(vec![sample_post("Old")])))
            .await
            .unwrap();

        store.apply_created(sample_post("New")).await;

        let titles: Vec<String> = store.posts().await.into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["New".to_string(), "Old".to_string()]);
    }

    #[tokio::test]
    async fn update_replaces_in_place_and_focus() {
        let store = store();
        let mut post = sample_post("Before");
        let other = sample_post("Other");

        let ticket = store.begin_list_fetch().await;
        store
            .finish_list_fetch(ticket, Ok(page_of(vec![other.clone(), post.clone()])))
            .await
            .unwrap();
        let ticket = store.begin_detail_fetch().await;
        store
            .finish_detail_fetch(ticket, Ok(post.clone()))
            .await
            .unwrap();

        post.title = "After".to_string();
        store.apply_updated(post.clone()).await;

        let titles: Vec<String> = store.posts().await.into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["Other".to_string(), "After".to_string()]);
        assert_eq!(store.current_post().await.unwrap().title, "After");
    }

    #[tokio::test]
    async fn delete_removes_and_clears_focus() {
        let store = store();
        let post = sample_post("Doomed");
        let keeper = sample_post("Keeper");

        let ticket = store.begin_list_fetch().await;
        store
            .finish_list_fetch(ticket, Ok(page_of(vec![post.clone(), keeper.clone()])))
            .await
            .unwrap();
        let ticket = store.begin_detail_fetch().await;
        store
            .finish_detail_fetch(ticket, Ok(post.clone()))
            .await
            .unwrap();

        store.apply_deleted(post.id).await;

        let remaining = store.posts().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keeper.id);
        assert!(store.current_post().await.is_none());
    }

    #[tokio::test]
    async fn comment_replaces_focused_post() {
        let store = store();
        let mut post = sample_post("Discussed");

        let ticket = store.begin_detail_fetch().await;
        store
            .finish_detail_fetch(ticket, Ok(post.clone()))
            .await
            .unwrap();

        post.comments.push(CommentDto {
            id: 1,
            author: post.author.clone(),
            content: "nice".to_string(),
            created_at: Utc::now(),
        });
        store.apply_commented(post.clone()).await;

        let current = store.current_post().await.unwrap();
        assert_eq!(current.comments.len(), 1);
        assert_eq!(current.comments[0].content, "nice");
    }

    #[tokio::test]
    async fn stale_list_response_is_discarded() {
        let store = store();

        let slow = store.begin_list_fetch().await;
        let fast = store.begin_list_fetch().await;

        store
            .finish_list_fetch(fast, Ok(page_of(vec![sample_post("Fresh")])))
            .await
            .unwrap();
        // The older fetch resolves late; the store must keep the newer data.
        store
            .finish_list_fetch(slow, Ok(page_of(vec![sample_post("Stale")])))
            .await
            .unwrap();

        let titles: Vec<String> = store.posts().await.into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["Fresh".to_string()]);
    }

    #[tokio::test]
    async fn stale_detail_response_is_discarded() {
        let store = store();
        let fresh = sample_post("Fresh");

        let slow = store.begin_detail_fetch().await;
        let fast = store.begin_detail_fetch().await;

        store
            .finish_detail_fetch(fast, Ok(fresh.clone()))
            .await
            .unwrap();
        store
            .finish_detail_fetch(slow, Ok(sample_post("Stale")))
            .await
            .unwrap();

        assert_eq!(store.current_post().await.unwrap().id, fresh.id);
    }

    #[tokio::test]
    async fn failed_fetch_records_error_without_clearing_cache() {
        let store = store();
        let ticket = store.begin_list_fetch().await;
        store
            .finish_list_fetch(ticket, Ok(page_of(vec![sample_post("Cached")])))
            .await
            .unwrap();

        let ticket = store.begin_list_fetch().await;
        let result = store
            .finish_list_fetch(
                ticket,
                Err(ClientError::Api {
                    status: 500,
                    message: "Server error".to_string(),
                }),
            )
            .await;

        assert!(result.is_err());
        assert_eq!(store.posts().await.len(), 1);
        assert!(store.last_error().await.unwrap().contains("Server error"));
    }
}
