//! Edit Member form

use std::str::FromStr;

use chrono::NaiveDate;
use validator::Validate;

use crate::{
    error::{DeskError, DeskResult},
    models::{Member, MemberStatus, MemberUpdate},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberField {
    Name,
    Email,
    Phone,
    Status,
}

impl FromStr for MemberField {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(MemberField::Name),
            "email" => Ok(MemberField::Email),
            "phone" => Ok(MemberField::Phone),
            "status" => Ok(MemberField::Status),
            other => Err(DeskError::Validation(format!("Unknown member field: {}", other))),
        }
    }
}

#[derive(Debug, Validate)]
struct MemberInput {
    #[validate(length(min = 1, message = "Name is required"))]
    name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberForm {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    /// Shown read-only
    pub membership_date: NaiveDate,
}

impl From<&Member> for MemberForm {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
            email: member.email.clone(),
            phone: member.phone.clone().unwrap_or_default(),
            status: member.status.to_string(),
            membership_date: member.membership_date,
        }
    }
}

impl MemberForm {
    pub fn set(&mut self, field: MemberField, value: &str) {
        let value = value.to_string();
        match field {
            MemberField::Name => self.name = value,
            MemberField::Email => self.email = value,
            MemberField::Phone => self.phone = value,
            MemberField::Status => self.status = value,
        }
    }

    pub fn to_update(&self) -> DeskResult<MemberUpdate> {
        MemberInput {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        }
        .validate()?;

        let status = self
            .status
            .parse::<MemberStatus>()
            .map_err(DeskError::Validation)?;

        Ok(MemberUpdate {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            status,
        })
    }
}
