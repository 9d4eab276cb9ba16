//! Category handlers. Reads are public; mutation requires the admin
//! capability.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::Category;
use quill_shared::dto::CategoryRequest;
use quill_shared::{ApiResponse, CollectionResponse, MessageResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::validation;
use crate::views;

fn require_admin(identity: &Identity) -> AppResult<()> {
    if identity.role.can_moderate() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Not authorized to manage categories".to_string(),
        ))
    }
}

/// GET /api/categories
pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.find_all().await?;

    let items: Vec<_> = categories.into_iter().map(views::category_dto).collect();

    Ok(HttpResponse::Ok().json(CollectionResponse::all(items)))
}

/// GET /api/categories/{id_or_slug}
pub async fn get_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id_or_slug = path.into_inner();

    let Some(category) = state.categories.find_by_id_or_slug(&id_or_slug).await? else {
        return Err(AppError::NotFound("Category not found".to_string()));
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::category_dto(category))))
}

/// POST /api/categories
pub async fn create_category(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;

    let req = body.into_inner();
    let errors = validation::validate_category(&req);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let category = Category::new(req.name.trim().to_string(), req.color.to_lowercase());
    let category = state.categories.insert(category).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(views::category_dto(category))))
}

/// PUT /api/categories/{id}
pub async fn update_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;

    let id = path.into_inner();
    let req = body.into_inner();
    let errors = validation::validate_category(&req);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let Some(mut category) = state.categories.find_by_id(id).await? else {
        return Err(AppError::NotFound("Category not found".to_string()));
    };

    category.rename(req.name.trim().to_string());
    category.color = req.color.to_lowercase();

    let category = state.categories.update(category).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::category_dto(category))))
}

/// DELETE /api/categories/{id}
pub async fn delete_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;

    let id = path.into_inner();

    // A category still referenced by posts surfaces as a conflict; the
    // foreign key refuses the delete.
    state.categories.delete(id).await.map_err(|err| match err {
        quill_core::error::RepoError::NotFound => {
            AppError::NotFound("Category not found".to_string())
        }
        quill_core::error::RepoError::Constraint(_) => {
            AppError::Conflict("Category is still in use".to_string())
        }
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Category deleted successfully")))
}
