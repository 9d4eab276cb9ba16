//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub excerpt: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    pub featured_image: Option<String>,
    pub is_published: bool,
    pub view_count: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Category,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from a Domain PostDraft to a SeaORM ActiveModel.
/// Timestamps are stamped here; the draft carries none.
impl From<quill_core::domain::PostDraft> for ActiveModel {
    fn from(draft: quill_core::domain::PostDraft) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Set(draft.id),
            author_id: Set(draft.author_id),
            category_id: Set(draft.category_id),
            title: Set(draft.title),
            slug: Set(draft.slug),
            content: Set(draft.content),
            excerpt: Set(draft.excerpt),
            tags: Set(tags_to_json(draft.tags)),
            featured_image: Set(draft.featured_image),
            is_published: Set(draft.is_published),
            view_count: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}

pub(crate) fn tags_to_json(tags: Vec<String>) -> Json {
    serde_json::to_value(tags).unwrap_or_else(|_| Json::Array(Vec::new()))
}

pub(crate) fn tags_from_json(tags: Json) -> Vec<String> {
    serde_json::from_value(tags).unwrap_or_default()
}
