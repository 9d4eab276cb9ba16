//! PostgreSQL post repository.
//!
//! Posts are stored relationally but surface as the embedded shape the API
//! exposes: every read resolves author and category references and attaches
//! comments in insertion order.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use quill_core::domain::{AuthorRef, CategoryRef, Comment, Post, PostDraft, PostPatch, slugify};
use quill_core::error::RepoError;
use quill_core::ports::{PostPage, PostQuery, PostRepository};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity, tags_from_json, tags_to_json};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::map_db_err;

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Fetch one post by primary key, fully populated.
    async fn load(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let model = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        match model {
            Some(model) => Ok(self.hydrate(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Resolve author/category references and attach comments, preserving
    /// the order of `models`.
    async fn hydrate(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let comment_rows = CommentEntity::find()
            .filter(comment::Column::PostId.is_in(post_ids))
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        let mut author_ids: HashSet<Uuid> = models.iter().map(|m| m.author_id).collect();
        author_ids.extend(comment_rows.iter().map(|c| c.author_id));

        let authors: HashMap<Uuid, AuthorRef> = UserEntity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    AuthorRef {
                        id: u.id,
                        name: u.name,
                        email: u.email,
                    },
                )
            })
            .collect();

        let category_ids: HashSet<Uuid> = models.iter().map(|m| m.category_id).collect();
        let categories: HashMap<Uuid, CategoryRef> = CategoryEntity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .map(|c| {
                (
                    c.id,
                    CategoryRef {
                        id: c.id,
                        name: c.name,
                        slug: c.slug,
                        color: c.color,
                    },
                )
            })
            .collect();

        let mut comments_by_post: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for row in comment_rows {
            let author = authors.get(&row.author_id).cloned().ok_or_else(|| {
                RepoError::Query(format!(
                    "comment {} references missing user {}",
                    row.id, row.author_id
                ))
            })?;
            comments_by_post.entry(row.post_id).or_default().push(Comment {
                id: row.id,
                author,
                content: row.content,
                created_at: row.created_at.into(),
            });
        }

        models
            .into_iter()
            .map(|m| {
                let author = authors.get(&m.author_id).cloned().ok_or_else(|| {
                    RepoError::Query(format!(
                        "post {} references missing user {}",
                        m.id, m.author_id
                    ))
                })?;
                let category = categories.get(&m.category_id).cloned().ok_or_else(|| {
                    RepoError::Query(format!(
                        "post {} references missing category {}",
                        m.id, m.category_id
                    ))
                })?;

                Ok(Post {
                    id: m.id,
                    title: m.title,
                    slug: m.slug,
                    content: m.content,
                    excerpt: m.excerpt,
                    author,
                    category,
                    tags: tags_from_json(m.tags),
                    featured_image: m.featured_image,
                    is_published: m.is_published,
                    view_count: m.view_count,
                    comments: comments_by_post.remove(&m.id).unwrap_or_default(),
                    created_at: m.created_at.into(),
                    updated_at: m.updated_at.into(),
                })
            })
            .collect()
    }
}

fn query_err(e: sea_orm::DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

/// Escape LIKE metacharacters so user input matches literally.
pub(crate) fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self, query: &PostQuery) -> Result<PostPage, RepoError> {
        let mut select = PostEntity::find().filter(post::Column::IsPublished.eq(true));

        if let Some(category) = query.category {
            select = select.filter(post::Column::CategoryId.eq(category));
        }

        if let Some(search) = query.search.as_deref() {
            let pattern = format!("%{}%", escape_like(search));
            select = select.filter(
                Condition::any()
                    .add(Expr::col(post::Column::Title).ilike(pattern.clone()))
                    .add(Expr::col(post::Column::Content).ilike(pattern.clone()))
                    .add(Expr::col(post::Column::Excerpt).ilike(pattern)),
            );
        }

        let total = select.clone().count(&self.db).await.map_err(query_err)?;

        let models = select
            .order_by_desc(post::Column::CreatedAt)
            .offset(query.offset())
            .limit(query.limit)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        let items = self.hydrate(models).await?;

        Ok(PostPage { items, total })
    }

    async fn find_by_id_or_slug(&self, id_or_slug: &str) -> Result<Option<Post>, RepoError> {
        let select = match Uuid::parse_str(id_or_slug) {
            Ok(id) => PostEntity::find().filter(post::Column::Id.eq(id)),
            Err(_) => PostEntity::find().filter(post::Column::Slug.eq(id_or_slug)),
        };

        let model = select.one(&self.db).await.map_err(query_err)?;

        match model {
            Some(model) => Ok(self.hydrate(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create(&self, draft: PostDraft) -> Result<Post, RepoError> {
        let id = draft.id;
        let active: post::ActiveModel = draft.into();
        active.insert(&self.db).await.map_err(map_db_err)?;

        self.load(id).await?.ok_or(RepoError::NotFound)
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
        else {
            return Ok(None);
        };

        let mut active: post::ActiveModel = model.into();
        if let Some(title) = patch.title {
            // The slug follows the title so stored links stay resolvable.
            active.slug = Set(slugify(&title));
            active.title = Set(title);
        }
        if let Some(content) = patch.content {
            active.content = Set(content);
        }
        if let Some(excerpt) = patch.excerpt {
            active.excerpt = Set(Some(excerpt));
        }
        if let Some(category_id) = patch.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(tags) = patch.tags {
            active.tags = Set(tags_to_json(tags));
        }
        if let Some(featured_image) = patch.featured_image {
            active.featured_image = Set(Some(featured_image));
        }
        if let Some(is_published) = patch.is_published {
            active.is_published = Set(is_published);
        }
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await.map_err(map_db_err)?;

        self.load(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<(), RepoError> {
        // A raced delete leaves zero rows affected; the counter bump is
        // then moot, not an error.
        PostEntity::update_many()
            .col_expr(
                post::Column::ViewCount,
                Expr::col(post::Column::ViewCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        Ok(())
    }

    async fn append_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<Option<Post>, RepoError> {
        let exists = PostEntity::find_by_id(post_id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        if exists.is_none() {
            return Ok(None);
        }

        let row = comment::ActiveModel {
            id: NotSet,
            post_id: Set(post_id),
            author_id: Set(author_id),
            content: Set(content.to_owned()),
            created_at: Set(Utc::now().into()),
        };
        row.insert(&self.db).await.map_err(map_db_err)?;

        self.load(post_id).await
    }
}
