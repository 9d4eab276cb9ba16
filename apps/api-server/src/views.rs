//! Mapping from domain entities to wire DTOs.

use quill_core::domain::{AuthorRef, Category, CategoryRef, Comment, Post, User};
use quill_shared::dto::{AuthorDto, CategoryDto, CategoryRefDto, CommentDto, PostDto, UserDto};

pub fn user_dto(user: &User) -> UserDto {
    UserDto {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        created_at: user.created_at,
    }
}

pub fn category_dto(category: Category) -> CategoryDto {
    CategoryDto {
        id: category.id,
        name: category.name,
        slug: category.slug,
        color: category.color,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

fn author_dto(author: AuthorRef) -> AuthorDto {
    AuthorDto {
        id: author.id,
        name: author.name,
        email: author.email,
    }
}

fn category_ref_dto(category: CategoryRef) -> CategoryRefDto {
    CategoryRefDto {
        id: category.id,
        name: category.name,
        slug: category.slug,
        color: category.color,
    }
}

fn comment_dto(comment: Comment) -> CommentDto {
    CommentDto {
        id: comment.id,
        author: author_dto(comment.author),
        content: comment.content,
        created_at: comment.created_at,
    }
}

pub fn post_dto(post: Post) -> PostDto {
    PostDto {
        id: post.id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        excerpt: post.excerpt,
        author: author_dto(post.author),
        category: category_ref_dto(post.category),
        tags: post.tags,
        featured_image: post.featured_image,
        is_published: post.is_published,
        view_count: post.view_count,
        comments: post.comments.into_iter().map(comment_dto).collect(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}
