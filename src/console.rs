//! Console commands
//!
//! Each input line maps to one desk [`Event`], the same way each page control
//! maps to one handler.

use crate::{desk::Event, models::IssueLoanForm};

pub const HELP: &str = "\
Commands:
  search <term>                     search the catalog
  return <transaction id>           return a loan
  issue <book id> <member id> [days] issue a book for a loan period
  overdue                           list overdue loans
  edit-book <id>                    open the book form
  total <copies>                    change total copies in the book form
  set <field> <value>               change a field in the open form
  save                              submit the open form
  close                             close the open form
  edit-member <id>                  open the member form
  reload                            reload the page
  help                              show this help
  quit                              leave";

/// Which edit form the console is working on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenForm {
    #[default]
    None,
    Book,
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Event(Event),
    Help,
    Quit,
}

/// Parse one console line. `open` decides where `set`, `save` and `close` go.
pub fn parse_command(line: &str, open: OpenForm) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let event = match verb.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => return Ok(Some(Command::Quit)),
        "h" | "help" | "?" => return Ok(Some(Command::Help)),
        "search" | "s" => Event::SearchSubmitted {
            term: rest.to_string(),
        },
        "return" => Event::ReturnClicked {
            transaction_id: parse_id(rest)?,
        },
        "issue" => parse_issue(rest)?,
        "overdue" => Event::OverdueRequested,
        "edit-book" => Event::EditBookClicked { id: parse_id(rest)? },
        "edit-member" => Event::EditMemberClicked { id: parse_id(rest)? },
        "total" => Event::TotalCopiesChanged {
            input: rest.to_string(),
        },
        "set" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field.to_string(), value.trim().to_string()),
                None if !rest.is_empty() => (rest.to_string(), String::new()),
                None => return Err("Usage: set <field> <value>".to_string()),
            };
            match open {
                OpenForm::Book => Event::BookFieldChanged { field, value },
                OpenForm::Member => Event::MemberFieldChanged { field, value },
                OpenForm::None => return Err("No form is open".to_string()),
            }
        }
        "save" => match open {
            OpenForm::Book => Event::EditBookSubmitted,
            OpenForm::Member => Event::EditMemberSubmitted,
            OpenForm::None => return Err("No form is open".to_string()),
        },
        "close" => match open {
            OpenForm::Book => Event::EditBookClosed,
            OpenForm::Member => Event::EditMemberClosed,
            OpenForm::None => return Err("No form is open".to_string()),
        },
        "reload" => Event::Reload,
        other => return Err(format!("Unknown command: {} (try 'help')", other)),
    };

    Ok(Some(Command::Event(event)))
}

fn parse_id(s: &str) -> Result<i64, String> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| format!("Expected a numeric id, got {:?}", s))
}

fn parse_issue(rest: &str) -> Result<Event, String> {
    let mut parts = rest.split_whitespace();
    let book_id = parts.next().unwrap_or_default();
    let member_id = parts.next().unwrap_or_default();

    let mut form = IssueLoanForm::new(book_id, member_id);
    if let Some(days) = parts.next() {
        let days = days
            .parse::<u32>()
            .map_err(|_| format!("Expected a loan period in days, got {:?}", days))?;
        form = form.with_days(days);
    }

    Ok(Event::IssueSubmitted(form))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(line: &str, open: OpenForm) -> Event {
        match parse_command(line, open) {
            Ok(Some(Command::Event(event))) => event,
            other => panic!("{:?} parsed to {:?}", line, other),
        }
    }

    #[test]
    fn test_search_keeps_whole_term() {
        assert_eq!(
            event("search  the dispossessed ", OpenForm::None),
            Event::SearchSubmitted {
                term: "the dispossessed".to_string()
            }
        );
        // Blank terms are left for the desk to reject
        assert_eq!(
            event("search", OpenForm::None),
            Event::SearchSubmitted {
                term: String::new()
            }
        );
    }

    #[test]
    fn test_form_commands_follow_open_form() {
        assert_eq!(event("save", OpenForm::Book), Event::EditBookSubmitted);
        assert_eq!(event("save", OpenForm::Member), Event::EditMemberSubmitted);
        assert_eq!(
            event("set email ada@example.org", OpenForm::Member),
            Event::MemberFieldChanged {
                field: "email".to_string(),
                value: "ada@example.org".to_string()
            }
        );
        assert!(parse_command("save", OpenForm::None).is_err());
    }

    #[test]
    fn test_issue_with_loan_period() {
        let Event::IssueSubmitted(form) = event("issue 4 12 21", OpenForm::None) else {
            panic!("expected an issue event");
        };
        assert_eq!(form.book_id, "4");
        assert_eq!(form.member_id, "12");
        assert_eq!(form.days, Some(21));

        let Event::IssueSubmitted(form) = event("issue 4 12", OpenForm::None) else {
            panic!("expected an issue event");
        };
        assert_eq!(form.days, None);

        assert!(parse_command("issue 4 12 2026-11-02", OpenForm::None).is_err());
    }

    #[test]
    fn test_misc() {
        assert_eq!(parse_command("   ", OpenForm::None), Ok(None));
        assert_eq!(parse_command("quit", OpenForm::Book), Ok(Some(Command::Quit)));
        assert!(parse_command("return abc", OpenForm::None).is_err());
        assert!(parse_command("frobnicate", OpenForm::None).is_err());
        assert_eq!(
            event("total 7", OpenForm::Book),
            Event::TotalCopiesChanged {
                input: "7".to_string()
            }
        );
    }
}
