//! Book model and related types

use serde::{Deserialize, Serialize};

/// Book record as returned by `/books/{id}/json` and `/books/search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub category: Option<String>,
    #[serde(default)]
    pub total_copies: i64,
    #[serde(default)]
    pub available_copies: i64,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }
}

/// Fields posted to `/books/update/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookUpdate {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publisher: String,
    pub publication_year: String,
    pub category: String,
    pub total_copies: i64,
    pub available_copies: i64,
}
