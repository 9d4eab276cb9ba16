//! Ownership-based authorization for post mutation.

use uuid::Uuid;

use super::post::Post;
use super::user::Role;

/// The acting principal, as established by the authentication layer.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

/// Whether `actor` may update or delete `post`.
///
/// True iff the actor authored the post or holds the moderation capability.
/// Pure and side-effect free; reads are never subject to this check.
pub fn can_mutate(actor: &Actor, post: &Post) -> bool {
    actor.id == post.author.id || actor.role.can_moderate()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{AuthorRef, CategoryRef};

    fn post_by(author_id: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            content: "content".to_string(),
            excerpt: None,
            author: AuthorRef {
                id: author_id,
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            },
            category: CategoryRef {
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
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn author_may_mutate_own_post() {
        let author_id = Uuid::new_v4();
        let post = post_by(author_id);
        let actor = Actor {
            id: author_id,
            role: Role::User,
        };

        assert!(can_mutate(&actor, &post));
    }

    #[test]
    fn stranger_may_not_mutate() {
        let post = post_by(Uuid::new_v4());
        let actor = Actor {
            id: Uuid::new_v4(),
            role: Role::User,
        };

        assert!(!can_mutate(&actor, &post));
    }

    #[test]
    fn admin_may_mutate_any_post() {
        let post = post_by(Uuid::new_v4());
        let actor = Actor {
            id: Uuid::new_v4(),
            role: Role::Admin,
        };

        assert!(can_mutate(&actor, &post));
    }
}
