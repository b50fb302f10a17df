//! Loan (transaction) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{DeskError, DeskResult};

/// Overdue loan row from `/transactions/overdue`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueTransaction {
    pub book_title: String,
    #[serde(deserialize_with = "super::dates::deserialize_date")]
    pub due_date: NaiveDate,
    pub days_overdue: i64,
}

/// Issue loan form, posted form-encoded to `/transactions/issue`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct IssueLoanForm {
    #[validate(length(min = 1, message = "Please select a book"))]
    pub book_id: String,
    #[validate(length(min = 1, message = "Please select a member"))]
    pub member_id: String,
    /// Loan period in days; the server applies its default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "Loan period must be at least one day"))]
    pub days: Option<u32>,
}

impl IssueLoanForm {
    pub fn new(book_id: impl Into<String>, member_id: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into().trim().to_string(),
            member_id: member_id.into().trim().to_string(),
            days: None,
        }
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = Some(days);
        self
    }

    /// Validate the form, returning the first failure as a user-facing message
    pub fn check(&self) -> DeskResult<()> {
        self.validate()?;
        Ok(())
    }
}

/// `{success, message}` body returned by state-changing endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ActionReply {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

impl ActionReply {
    /// Turn the reply into a result so `success: false` cannot be ignored
    pub fn into_result(self) -> DeskResult<String> {
        if self.success {
            Ok(self.message)
        } else {
            Err(DeskError::ServerReported(self.message))
        }
    }
}
