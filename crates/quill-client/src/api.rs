//! HTTP client for the Quill REST API.
//!
//! Methods mirror the endpoint surface one-to-one and decode the response
//! envelope into typed results; `{success: false}` bodies fold into
//! [`ClientError::Api`].

use quill_shared::dto::{
    AddCommentRequest, AuthDto, CategoryDto, CategoryRequest, CreatePostRequest, LoginRequest,
    PostDto, RegisterRequest, UpdatePostRequest, UserDto,
};
use quill_shared::{ApiResponse, CollectionResponse, ErrorResponse, ListResponse, MessageResponse};
use uuid::Uuid;

use crate::error::ClientError;

/// Query parameters for the post listing.
#[derive(Debug, Clone, Default)]
pub struct PostListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub category: Option<Uuid>,
    pub search: Option<String>,
}

/// One page of posts as returned by the server.
#[derive(Debug, Clone)]
pub struct PostList {
    pub posts: Vec<PostDto>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

/// Thin typed wrapper over the REST surface.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    /// Attach a bearer token to subsequent requests.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => match body.details {
                Some(details) if !details.is_empty() => {
                    format!("{}: {}", body.error, details.join(", "))
                }
                _ => body.error,
            },
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    // --- auth ---

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthDto, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/register"))
            .json(request)
            .send()
            .await?;

        Ok(Self::decode::<ApiResponse<AuthDto>>(response).await?.data)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthDto, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(request)
            .send()
            .await?;

        Ok(Self::decode::<ApiResponse<AuthDto>>(response).await?.data)
    }

    pub async fn me(&self) -> Result<UserDto, ClientError> {
        let response = self
            .authorize(self.http.get(self.url("/api/auth/me")))
            .send()
            .await?;

        Ok(Self::decode::<ApiResponse<UserDto>>(response).await?.data)
    }

    // --- posts ---

    pub async fn list_posts(&self, params: &PostListParams) -> Result<PostList, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(page) = params.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = params.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(category) = params.category {
            query.push(("category", category.to_string()));
        }
        if let Some(search) = &params.search {
            query.push(("search", search.clone()));
        }

        let response = self
            .http
            .get(self.url("/api/posts"))
            .query(&query)
            .send()
            .await?;

        let body = Self::decode::<ListResponse<PostDto>>(response).await?;
        Ok(PostList {
            posts: body.data,
            total: body.total,
            page: body.page,
            pages: body.pages,
        })
    }

    pub async fn get_post(&self, id_or_slug: &str) -> Result<PostDto, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/api/posts/{id_or_slug}")))
            .send()
            .await?;

        Ok(Self::decode::<ApiResponse<PostDto>>(response).await?.data)
    }

    pub async fn create_post(&self, request: &CreatePostRequest) -> Result<PostDto, ClientError> {
        let response = self
            .authorize(self.http.post(self.url("/api/posts")))
            .json(request)
            .send()
            .await?;

        Ok(Self::decode::<ApiResponse<PostDto>>(response).await?.data)
    }

    pub async fn update_post(
        &self,
        id: Uuid,
        request: &UpdatePostRequest,
    ) -> Result<PostDto, ClientError> {
        let response = self
            .authorize(self.http.put(self.url(&format!("/api/posts/{id}"))))
            .json(request)
            .send()
            .await?;

        Ok(Self::decode::<ApiResponse<PostDto>>(response).await?.data)
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<String, ClientError> {
        let response = self
            .authorize(self.http.delete(self.url(&format!("/api/posts/{id}"))))
            .send()
            .await?;

        Ok(Self::decode::<MessageResponse>(response).await?.message)
    }

    pub async fn add_comment(&self, post_id: Uuid, content: &str) -> Result<PostDto, ClientError> {
        let request = AddCommentRequest {
            content: content.to_string(),
        };
        let response = self
            .authorize(
                self.http
                    .post(self.url(&format!("/api/posts/{post_id}/comments"))),
            )
            .json(&request)
            .send()
            .await?;

        Ok(Self::decode::<ApiResponse<PostDto>>(response).await?.data)
    }

    // --- categories ---

    pub async fn list_categories(&self) -> Result<Vec<CategoryDto>, ClientError> {
        let response = self.http.get(self.url("/api/categories")).send().await?;

        Ok(Self::decode::<CollectionResponse<CategoryDto>>(response)
            .await?
            .data)
    }

    pub async fn get_category(&self, id_or_slug: &str) -> Result<CategoryDto, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/api/categories/{id_or_slug}")))
            .send()
            .await?;

        Ok(Self::decode::<ApiResponse<CategoryDto>>(response)
            .await?
            .data)
    }

    pub async fn create_category(
        &self,
        request: &CategoryRequest,
    ) -> Result<CategoryDto, ClientError> {
        let response = self
            .authorize(self.http.post(self.url("/api/categories")))
            .json(request)
            .send()
            .await?;

        Ok(Self::decode::<ApiResponse<CategoryDto>>(response)
            .await?
            .data)
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        request: &CategoryRequest,
    ) -> Result<CategoryDto, ClientError> {
        let response = self
            .authorize(self.http.put(self.url(&format!("/api/categories/{id}"))))
            .json(request)
            .send()
            .await?;

        Ok(Self::decode::<ApiResponse<CategoryDto>>(response)
            .await?
            .data)
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<String, ClientError> {
        let response = self
            .authorize(self.http.delete(self.url(&format!("/api/categories/{id}"))))
            .send()
            .await?;

        Ok(Self::decode::<MessageResponse>(response).await?.message)
    }
}
