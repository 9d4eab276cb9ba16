//! The uniform response envelope used across all endpoints.

use serde::{Deserialize, Serialize};

/// Standard successful API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Paginated listing envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub success: bool,
    /// Number of items on this page.
    pub count: u64,
    /// Pre-pagination match count.
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn paginated(data: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            success: true,
            count: data.len() as u64,
            total,
            page,
            pages,
            data,
        }
    }
}

/// Unpaginated collection envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionResponse<T> {
    pub success: bool,
    pub count: u64,
    pub data: Vec<T>,
}

impl<T> CollectionResponse<T> {
    pub fn all(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len() as u64,
            data,
        }
    }
}

/// Acknowledgement without a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Error envelope; `success` is always false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,

    /// Field-level validation messages, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginated_rounds_page_count_up() {
        let envelope = ListResponse::paginated(vec![1, 2, 3], 25, 1, 10);

        assert_eq!(envelope.count, 3);
        assert_eq!(envelope.total, 25);
        assert_eq!(envelope.pages, 3);
    }

    #[test]
    fn paginated_with_no_matches_has_zero_pages() {
        let envelope = ListResponse::paginated(Vec::<u32>::new(), 0, 1, 10);

        assert_eq!(envelope.pages, 0);
        assert_eq!(envelope.count, 0);
    }

    #[test]
    fn error_envelope_marks_failure() {
        let body = serde_json::to_value(ErrorResponse::new("Post not found")).unwrap();

        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Post not found");
        assert!(body.get("details").is_none());
    }
}
