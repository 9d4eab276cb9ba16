use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use quill_core::error::RepoError;
use quill_core::ports::{PostRepository, UserRepository};

use super::entity::{category, comment, post, user};
use super::post_repo::escape_like;
use super::{PostgresPostRepository, PostgresUserRepository};

fn user_model(id: Uuid) -> user::Model {
    let now = Utc::now();
    user::Model {
        id,
        name: "Ada".to_owned(),
        email: "ada@example.com".to_owned(),
        password_hash: "hash".to_owned(),
        role: "user".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn category_model(id: Uuid) -> category::Model {
    let now = Utc::now();
    category::Model {
        id,
        name: "General".to_owned(),
        slug: "general".to_owned(),
        color: "#336699".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn post_model(id: Uuid, author_id: Uuid, category_id: Uuid) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id,
        category_id,
        title: "Hello World".to_owned(),
        slug: "hello-world".to_owned(),
        content: "Content".to_owned(),
        excerpt: None,
        tags: serde_json::json!(["rust"]),
        featured_image: None,
        is_published: true,
        view_count: 3,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn find_post_by_id_hydrates_references() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let category_id = Uuid::new_v4();

    // Hydration queries in order: posts, comments, users, categories.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, author_id, category_id)]])
        .append_query_results(vec![Vec::<comment::Model>::new()])
        .append_query_results(vec![vec![user_model(author_id)]])
        .append_query_results(vec![vec![category_model(category_id)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let found = repo
        .find_by_id_or_slug(&post_id.to_string())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.id, post_id);
    assert_eq!(found.title, "Hello World");
    assert_eq!(found.author.id, author_id);
    assert_eq!(found.author.name, "Ada");
    assert_eq!(found.category.slug, "general");
    assert_eq!(found.tags, vec!["rust".to_owned()]);
    assert!(found.comments.is_empty());
}

#[tokio::test]
async fn find_post_by_slug_resolves_same_document() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let category_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, author_id, category_id)]])
        .append_query_results(vec![Vec::<comment::Model>::new()])
        .append_query_results(vec![vec![user_model(author_id)]])
        .append_query_results(vec![vec![category_model(category_id)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    // Non-UUID input goes through the slug lookup.
    let found = repo.find_by_id_or_slug("hello-world").await.unwrap().unwrap();

    assert_eq!(found.id, post_id);
    assert_eq!(found.slug, "hello-world");
}

#[tokio::test]
async fn comments_come_back_in_insertion_order() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let category_id = Uuid::new_v4();
    let now = Utc::now();

    let comments = vec![
        comment::Model {
            id: 1,
            post_id,
            author_id,
            content: "first".to_owned(),
            created_at: now.into(),
        },
        comment::Model {
            id: 2,
            post_id,
            author_id,
            content: "second".to_owned(),
            created_at: now.into(),
        },
    ];

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, author_id, category_id)]])
        .append_query_results(vec![comments])
        .append_query_results(vec![vec![user_model(author_id)]])
        .append_query_results(vec![vec![category_model(category_id)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let found = repo
        .find_by_id_or_slug(&post_id.to_string())
        .await
        .unwrap()
        .unwrap();

    let contents: Vec<&str> = found.comments.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second"]);
}

#[tokio::test]
async fn delete_missing_post_reports_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = repo.delete(Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn find_user_by_email() {
    let user_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![user_model(user_id)]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let found = repo.find_by_email("ada@example.com").await.unwrap();

    assert!(found.is_some());
    assert_eq!(found.unwrap().id, user_id);
}

#[test]
fn escape_like_neutralizes_metacharacters() {
    assert_eq!(escape_like("100%_done"), "100\\%\\_done");
    assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    assert_eq!(escape_like("plain"), "plain");
}
