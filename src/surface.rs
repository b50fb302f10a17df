//! User-facing notification surface
//!
//! Blocking dialogs and rendering. This is where outcomes leave the desk.

use std::io::{self, Write};
use std::sync::Mutex;

use rustyline::DefaultEditor;

use crate::{
    forms::{BookForm, MemberForm},
    models::{Book, OverdueTransaction},
};

#[cfg_attr(test, mockall::automock)]
pub trait Surface {
    /// Blocking message dialog
    fn alert(&self, message: &str);

    /// Blocking yes/no dialog
    fn confirm(&self, message: &str) -> bool;

    /// Full page reload after a successful state change
    fn reload(&self);

    fn show_books(&self, books: &[Book]);

    fn show_overdue(&self, loans: &[OverdueTransaction]);

    fn show_book_form(&self, form: &BookForm);

    fn show_member_form(&self, form: &MemberForm);
}

/// Terminal surface: dialogs on the line editor, tables on stdout
pub struct ConsoleSurface {
    editor: Mutex<DefaultEditor>,
}

impl ConsoleSurface {
    pub fn new() -> rustyline::Result<Self> {
        Ok(Self {
            editor: Mutex::new(DefaultEditor::new()?),
        })
    }

    /// Read one command line, `None` on end of input
    pub fn read_line(&self, prompt: &str) -> Option<String> {
        use rustyline::error::ReadlineError;

        let mut editor = match self.editor.lock() {
            Ok(editor) => editor,
            Err(poisoned) => poisoned.into_inner(),
        };

        loop {
            match editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    return Some(line);
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return None,
                Err(e) => {
                    tracing::error!("Could not read input: {}", e);
                    return None;
                }
            }
        }
    }

    fn print(&self, text: &str) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{}", text);
    }
}

impl Surface for ConsoleSurface {
    fn alert(&self, message: &str) {
        self.print(&format!("! {}", message));
    }

    fn confirm(&self, message: &str) -> bool {
        match self.read_line(&format!("? {} [y/N] ", message)) {
            Some(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            None => false,
        }
    }

    fn reload(&self) {
        self.print("-- page reloaded --");
    }

    fn show_books(&self, books: &[Book]) {
        self.print(&render_books(books));
    }

    fn show_overdue(&self, loans: &[OverdueTransaction]) {
        self.print(&render_overdue(loans));
    }

    fn show_book_form(&self, form: &BookForm) {
        self.print(&render_book_form(form));
    }

    fn show_member_form(&self, form: &MemberForm) {
        self.print(&render_member_form(form));
    }
}

pub fn render_books(books: &[Book]) -> String {
    if books.is_empty() {
        return "No books found".to_string();
    }

    let mut out = format!(
        "{:>6}  {:<40}  {:<24}  {:<14}  {:>9}",
        "ID", "Title", "Author", "ISBN", "Available"
    );
    for book in books {
        out.push_str(&format!(
            "\n{:>6}  {:<40}  {:<24}  {:<14}  {:>4}/{:<4}",
            book.id,
            truncate(&book.title, 40),
            truncate(&book.author, 24),
            book.isbn,
            book.available_copies,
            book.total_copies
        ));
    }
    out
}

pub fn render_overdue(loans: &[OverdueTransaction]) -> String {
    if loans.is_empty() {
        return "No overdue books".to_string();
    }

    let mut out = format!("{:<40}  {:<10}  {:>12}", "Book", "Due", "Days overdue");
    for loan in loans {
        out.push_str(&format!(
            "\n{:<40}  {:<10}  {:>12}",
            truncate(&loan.book_title, 40),
            loan.due_date.format("%Y-%m-%d"),
            loan.days_overdue
        ));
    }
    out
}

pub fn render_book_form(form: &BookForm) -> String {
    [
        format!("Edit book #{}", form.id),
        format!("  title:            {}", form.title),
        format!("  author:           {}", form.author),
        format!("  isbn:             {}", form.isbn),
        format!("  publisher:        {}", form.publisher),
        format!("  publication_year: {}", form.publication_year),
        format!("  category:         {}", form.category),
        format!("  total_copies:     {}", form.total_copies),
        format!("  available_copies: {}", form.available_copies),
    ]
    .join("\n")
}

pub fn render_member_form(form: &MemberForm) -> String {
    [
        format!("Edit member #{}", form.id),
        format!("  name:            {}", form.name),
        format!("  email:           {}", form.email),
        format!("  phone:           {}", form.phone),
        format!("  status:          {}", form.status),
        format!("  member since:    {}", form.membership_date.format("%Y-%m-%d")),
    ]
    .join("\n")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
