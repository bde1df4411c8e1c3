use serde::{Deserialize, Serialize};
use validator::Validate;

pub const TITLE_MAX_CHARS: usize = 100;
pub const AUTHOR_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_PUBLISHED_AFTER: i64 = 2000;

/// A catalogue entry. The title acts as the lookup key but is not unique.
///
/// String lengths are counted in characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Book {
    #[validate(length(min = 1, max = 100, message = "length must be between 1 and 100 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "length must be between 1 and 100 characters"))]
    pub author: String,
    #[validate(length(min = 1, max = 500, message = "length must be between 1 and 500 characters"))]
    pub description: String,
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rating: i64,
    #[validate(range(min = 1900, max = 2025, message = "must be between 1900 and 2025"))]
    pub published_year: i64,
}

/// Query parameters of the filtered listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct BookFilter {
    #[serde(default = "BookFilter::default_limit")]
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub limit: i64,
    #[serde(default = "BookFilter::default_published_after")]
    #[validate(range(min = 1900, max = 2025, message = "must be between 1900 and 2025"))]
    pub published_after: i64,
}

impl BookFilter {
    fn default_limit() -> i64 {
        DEFAULT_LIMIT
    }

    fn default_published_after() -> i64 {
        DEFAULT_PUBLISHED_AFTER
    }
}

impl Default for BookFilter {
    fn default() -> Self {
        Self {
            limit: Self::default_limit(),
            published_after: Self::default_published_after(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
