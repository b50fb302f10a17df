//! Edit forms for books and members

pub mod book;
pub mod copies;
pub mod member;
pub mod session;

use crate::error::DeskResult;

pub use book::{BookField, BookForm};
pub use copies::{parse_int_lenient, CopiesBaseline};
pub use member::{MemberField, MemberForm};
pub use session::{EditSession, FormState};

/// A form the desk can submit to the server
pub trait EditForm {
    type Update;

    /// Id of the record being edited
    fn record_id(&self) -> i64;

    fn to_update(&self) -> DeskResult<Self::Update>;
}

impl EditForm for BookForm {
    type Update = crate::models::BookUpdate;

    fn record_id(&self) -> i64 {
        self.id
    }

    fn to_update(&self) -> DeskResult<Self::Update> {
        BookForm::to_update(self)
    }
}

impl EditForm for MemberForm {
    type Update = crate::models::MemberUpdate;

    fn record_id(&self) -> i64 {
        self.id
    }

    fn to_update(&self) -> DeskResult<Self::Update> {
        MemberForm::to_update(self)
    }
}
