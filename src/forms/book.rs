//! Edit Book form

use std::str::FromStr;

use super::copies::{parse_int_lenient, CopiesBaseline};
use crate::{
    error::{DeskError, DeskResult},
    models::{Book, BookUpdate},
};

/// Editable fields of the book form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Title,
    Author,
    Isbn,
    Publisher,
    PublicationYear,
    Category,
    TotalCopies,
    AvailableCopies,
}

impl FromStr for BookField {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "title" => Ok(BookField::Title),
            "author" => Ok(BookField::Author),
            "isbn" => Ok(BookField::Isbn),
            "publisher" => Ok(BookField::Publisher),
            "publication_year" | "year" => Ok(BookField::PublicationYear),
            "category" => Ok(BookField::Category),
            "total_copies" | "total" => Ok(BookField::TotalCopies),
            "available_copies" | "available" => Ok(BookField::AvailableCopies),
            other => Err(DeskError::Validation(format!("Unknown book field: {}", other))),
        }
    }
}

/// Book form contents, held as typed text the way the user edits them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookForm {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publisher: String,
    pub publication_year: String,
    pub category: String,
    pub total_copies: String,
    pub available_copies: String,
    baseline: CopiesBaseline,
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            publisher: book.publisher.clone().unwrap_or_default(),
            publication_year: book
                .publication_year
                .map(|y| y.to_string())
                .unwrap_or_default(),
            category: book.category.clone().unwrap_or_default(),
            total_copies: book.total_copies.to_string(),
            available_copies: book.available_copies.to_string(),
            baseline: CopiesBaseline::new(book.total_copies),
        }
    }
}

impl BookForm {
    pub fn baseline(&self) -> CopiesBaseline {
        self.baseline
    }

    /// Change the total copies field and bring available copies along with
    /// it. Returns the available count the form now holds.
    pub fn change_total_copies(&mut self, input: &str) -> i64 {
        if let Some(available) = self.baseline.reconcile_input(&self.available_copies, input) {
            tracing::debug!(
                "Total copies {:?} (loaded {}) -> available {}",
                input,
                self.baseline.total(),
                available
            );
            self.available_copies = available.to_string();
        }
        self.total_copies = input.to_string();
        parse_int_lenient(&self.available_copies)
    }

    pub fn set(&mut self, field: BookField, value: &str) {
        match field {
            BookField::Title => self.title = value.to_string(),
            BookField::Author => self.author = value.to_string(),
            BookField::Isbn => self.isbn = value.to_string(),
            BookField::Publisher => self.publisher = value.to_string(),
            BookField::PublicationYear => self.publication_year = value.to_string(),
            BookField::Category => self.category = value.to_string(),
            BookField::TotalCopies => {
                self.change_total_copies(value);
            }
            BookField::AvailableCopies => self.available_copies = value.to_string(),
        }
    }

    /// Build the submission, rejecting counts the server must never see
    pub fn to_update(&self) -> DeskResult<BookUpdate> {
        if self.title.trim().is_empty() {
            return Err(DeskError::Validation("Title is required".to_string()));
        }
        if self.author.trim().is_empty() {
            return Err(DeskError::Validation("Author is required".to_string()));
        }

        let year = self.publication_year.trim();
        if !year.is_empty() && year.parse::<i32>().is_err() {
            return Err(DeskError::Validation(format!(
                "Publication year must be a number, got {:?}",
                year
            )));
        }

        let total_copies = parse_count("Total copies", &self.total_copies)?;
        let available_copies = parse_count("Available copies", &self.available_copies)?;
        if available_copies > total_copies {
            return Err(DeskError::Validation(format!(
                "Available copies ({}) cannot exceed total copies ({})",
                available_copies, total_copies
            )));
        }

        Ok(BookUpdate {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            isbn: self.isbn.trim().to_string(),
            publisher: self.publisher.trim().to_string(),
            publication_year: year.to_string(),
            category: self.category.trim().to_string(),
            total_copies,
            available_copies,
        })
    }
}

fn parse_count(label: &str, value: &str) -> DeskResult<i64> {
    match value.trim().parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(DeskError::Validation(format!(
            "{} must be a whole number of at least 0, got {:?}",
            label, value
        ))),
    }
}
