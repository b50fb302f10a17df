//! Data models for Elidune Desk

pub mod book;
pub mod dates;
pub mod loan;
pub mod member;

// Re-export commonly used types
pub use book::{Book, BookUpdate};
pub use loan::{ActionReply, IssueLoanForm, OverdueTransaction};
pub use member::{Member, MemberStatus, MemberUpdate};
