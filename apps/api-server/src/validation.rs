//! Request validation - field-level checks applied before any repository
//! call.

use quill_shared::dto::{CategoryRequest, CreatePostRequest, RegisterRequest, UpdatePostRequest};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_COMMENT_LEN: usize = 1000;
pub const MAX_CATEGORY_NAME_LEN: usize = 50;
pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_registration(req: &RegisterRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if req.name.trim().is_empty() {
        errors.push("Name is required".to_string());
    }
    if req.email.is_empty() || !req.email.contains('@') {
        errors.push("A valid email is required".to_string());
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        errors.push(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    errors
}

pub fn validate_post(req: &CreatePostRequest) -> Vec<String> {
    let mut errors = Vec::new();
    check_title(&req.title, &mut errors);
    if req.content.trim().is_empty() {
        errors.push("Content is required".to_string());
    }
    errors
}

pub fn validate_post_patch(req: &UpdatePostRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(title) = &req.title {
        check_title(title, &mut errors);
    }
    if let Some(content) = &req.content {
        if content.trim().is_empty() {
            errors.push("Content cannot be empty".to_string());
        }
    }
    errors
}

pub fn validate_comment(content: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if content.trim().is_empty() {
        errors.push("Comment content is required".to_string());
    } else if content.chars().count() > MAX_COMMENT_LEN {
        errors.push(format!(
            "Comment cannot exceed {MAX_COMMENT_LEN} characters"
        ));
    }
    errors
}

pub fn validate_category(req: &CategoryRequest) -> Vec<String> {
    let mut errors = Vec::new();
    let name = req.name.trim();
    if name.is_empty() {
        errors.push("Name is required".to_string());
    } else if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        errors.push(format!(
            "Name cannot exceed {MAX_CATEGORY_NAME_LEN} characters"
        ));
    }
    if !is_hex_color(&req.color) {
        errors.push("Color must be a hex string like #3366ff".to_string());
    }
    errors
}

fn check_title(title: &str, errors: &mut Vec<String>) {
    let title = title.trim();
    if title.is_empty() {
        errors.push("Title is required".to_string());
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.push(format!("Title cannot exceed {MAX_TITLE_LEN} characters"));
    }
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_collects_field_level_messages() {
        let req = RegisterRequest {
            name: " ".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };

        let errors = validate_registration(&req);

        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("Name")));
        assert!(errors.iter().any(|e| e.contains("email")));
        assert!(errors.iter().any(|e| e.contains("Password")));
    }

    #[test]
    fn post_requires_title_and_content() {
        let req = CreatePostRequest {
            title: String::new(),
            content: String::new(),
            excerpt: None,
            category: uuid::Uuid::new_v4(),
            tags: Vec::new(),
            featured_image: None,
            is_published: true,
        };

        let errors = validate_post(&req);

        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn overlong_title_is_rejected() {
        let req = UpdatePostRequest {
            title: Some("x".repeat(MAX_TITLE_LEN + 1)),
            ..Default::default()
        };

        assert_eq!(validate_post_patch(&req).len(), 1);
    }

    #[test]
    fn empty_patch_is_valid() {
        assert!(validate_post_patch(&UpdatePostRequest::default()).is_empty());
    }

    #[test]
    fn comment_length_is_bounded() {
        assert!(validate_comment("looks good").is_empty());
        assert!(!validate_comment("").is_empty());
        assert!(!validate_comment(&"y".repeat(MAX_COMMENT_LEN + 1)).is_empty());
    }

    #[test]
    fn category_color_must_be_hex() {
        let valid = CategoryRequest {
            name: "News".to_string(),
            color: "#3366ff".to_string(),
        };
        assert!(validate_category(&valid).is_empty());

        let invalid = CategoryRequest {
            name: "News".to_string(),
            color: "blue".to_string(),
        };
        assert_eq!(validate_category(&invalid).len(), 1);

        let short = CategoryRequest {
            name: "News".to_string(),
            color: "#fff".to_string(),
        };
        assert_eq!(validate_category(&short).len(), 1);
    }
}
