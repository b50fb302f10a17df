//! Library server client
//!
//! `LibraryApi` is the seam between the desk and the network; the desk only
//! ever talks to the server through it.

pub mod http;

use async_trait::async_trait;

use crate::{
    error::DeskResult,
    models::{Book, BookUpdate, IssueLoanForm, Member, MemberUpdate, OverdueTransaction},
};

pub use http::HttpLibraryClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryApi: Send + Sync {
    /// Search the catalog
    async fn search_books(&self, term: &str) -> DeskResult<Vec<Book>>;

    /// Return a borrowed book, yielding the server's confirmation message
    async fn return_loan(&self, transaction_id: i64) -> DeskResult<String>;

    /// Issue a book to a member, yielding the server's confirmation message
    async fn issue_loan(&self, form: &IssueLoanForm) -> DeskResult<String>;

    async fn list_overdue(&self) -> DeskResult<Vec<OverdueTransaction>>;

    async fn fetch_book(&self, id: i64) -> DeskResult<Book>;

    async fn fetch_member(&self, id: i64) -> DeskResult<Member>;

    async fn update_book(&self, id: i64, update: &BookUpdate) -> DeskResult<()>;

    async fn update_member(&self, id: i64, update: &MemberUpdate) -> DeskResult<()>;
}
