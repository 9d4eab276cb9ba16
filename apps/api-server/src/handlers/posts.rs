//! Post handlers - listing, detail, CRUD, and comment append.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use quill_core::domain::{PostDraft, PostPatch, policy};
use quill_core::ports::PostQuery;
use quill_shared::dto::{AddCommentRequest, CreatePostRequest, UpdatePostRequest};
use quill_shared::{ApiResponse, ListResponse, MessageResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::validation;
use crate::views;

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_LIMIT: u64 = 10;

/// Query string for the post listing. Values are coerced leniently:
/// anything absent or non-numeric falls back to the defaults.
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    page: Option<String>,
    limit: Option<String>,
    category: Option<String>,
    search: Option<String>,
}

fn lenient_u64(value: Option<&str>, default: u64) -> u64 {
    value
        .and_then(|v| v.trim().parse().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let q = query.into_inner();
    let page = lenient_u64(q.page.as_deref(), DEFAULT_PAGE);
    let limit = lenient_u64(q.limit.as_deref(), DEFAULT_LIMIT).min(state.max_page_size);
    let category = q.category.as_deref().and_then(|c| Uuid::parse_str(c).ok());
    let search = q.search.filter(|s| !s.trim().is_empty());

    let result = state
        .posts
        .list(&PostQuery {
            page,
            limit,
            category,
            search,
        })
        .await?;

    let items: Vec<_> = result.items.into_iter().map(views::post_dto).collect();

    Ok(HttpResponse::Ok().json(ListResponse::paginated(items, result.total, page, limit)))
}

/// GET /api/posts/{id_or_slug}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id_or_slug = path.into_inner();

    let Some(mut post) = state.posts.find_by_id_or_slug(&id_or_slug).await? else {
        return Err(AppError::NotFound("Post not found".to_string()));
    };

    // Every successful detail read counts as a view; list reads do not.
    state.posts.increment_view_count(post.id).await?;
    post.view_count += 1;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::post_dto(post))))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let errors = validation::validate_post(&req);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let Some(category) = state.categories.find_by_id(req.category).await? else {
        return Err(AppError::BadRequest("Unknown category".to_string()));
    };

    let mut draft = PostDraft::new(identity.user_id, category.id, req.title, req.content);
    draft.excerpt = req.excerpt;
    draft.tags = req.tags;
    draft.featured_image = req.featured_image;
    draft.is_published = req.is_published;

    let post = state.posts.create(draft).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(views::post_dto(post))))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let errors = validation::validate_post_patch(&req);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let Some(post) = state.posts.find_by_id_or_slug(&id.to_string()).await? else {
        return Err(AppError::NotFound("Post not found".to_string()));
    };

    if !policy::can_mutate(&identity.actor(), &post) {
        return Err(AppError::Forbidden(
            "Not authorized to update this post".to_string(),
        ));
    }

    if let Some(category) = req.category {
        if state.categories.find_by_id(category).await?.is_none() {
            return Err(AppError::BadRequest("Unknown category".to_string()));
        }
    }

    let patch = PostPatch {
        title: req.title,
        content: req.content,
        excerpt: req.excerpt,
        category_id: req.category,
        tags: req.tags,
        featured_image: req.featured_image,
        is_published: req.is_published,
    };

    let Some(updated) = state.posts.update(id, patch).await? else {
        return Err(AppError::NotFound("Post not found".to_string()));
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::post_dto(updated))))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let Some(post) = state.posts.find_by_id_or_slug(&id.to_string()).await? else {
        return Err(AppError::NotFound("Post not found".to_string()));
    };

    if !policy::can_mutate(&identity.actor(), &post) {
        return Err(AppError::Forbidden(
            "Not authorized to delete this post".to_string(),
        ));
    }

    state.posts.delete(id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<AddCommentRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let errors = validation::validate_comment(&req.content);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let Some(post) = state
        .posts
        .append_comment(id, identity.user_id, &req.content)
        .await?
    else {
        return Err(AppError::NotFound("Post not found".to_string()));
    };

    Ok(HttpResponse::Created().json(ApiResponse::ok(views::post_dto(post))))
}
