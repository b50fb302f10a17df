//! Circulation desk event handling
//!
//! Every user interaction arrives as an [`Event`]. The desk runs the matching
//! handler to completion: one request through [`LibraryApi`], then the result
//! goes into an edit form or out through the [`Surface`].

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::{
    client::LibraryApi,
    error::{DeskError, DeskResult},
    forms::{BookField, BookForm, EditForm, EditSession, FormState, MemberField, MemberForm},
    models::IssueLoanForm,
    surface::Surface,
};

/// User interactions, one per interactive element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SearchSubmitted { term: String },
    /// Key pressed in the search box; only Enter searches
    SearchKey { key: String, term: String },
    ReturnClicked { transaction_id: i64 },
    IssueSubmitted(IssueLoanForm),
    OverdueRequested,
    EditBookClicked { id: i64 },
    TotalCopiesChanged { input: String },
    BookFieldChanged { field: String, value: String },
    EditBookSubmitted,
    EditBookClosed,
    EditMemberClicked { id: i64 },
    MemberFieldChanged { field: String, value: String },
    EditMemberSubmitted,
    EditMemberClosed,
    Reload,
}

/// What a handler ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Results or a form were shown
    Shown,
    /// A state change succeeded and the page was reloaded
    Reloaded,
    /// The user was asked for input; nothing was sent
    Prompted,
    /// The user declined a confirmation
    Cancelled,
    /// The control was busy or the event did not apply
    Ignored,
    /// The failure was reported to the user
    Failed,
}

/// Controls that fire one-shot requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Search,
    ReturnLoan,
    IssueLoan,
    Overdue,
}

/// Controls with a request outstanding
#[derive(Debug, Default)]
struct InFlight {
    busy: Mutex<HashSet<Control>>,
}

impl InFlight {
    fn acquire(&self, control: Control) -> Option<InFlightGuard<'_>> {
        if lock(&self.busy).insert(control) {
            Some(InFlightGuard {
                in_flight: self,
                control,
            })
        } else {
            None
        }
    }

    fn is_busy(&self, control: Control) -> bool {
        lock(&self.busy).contains(&control)
    }
}

/// Releases its control when the handler is done with the request
struct InFlightGuard<'a> {
    in_flight: &'a InFlight,
    control: Control,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        lock(&self.in_flight.busy).remove(&self.control);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct Desk<A, S> {
    api: A,
    surface: S,
    in_flight: InFlight,
    book: Mutex<EditSession<BookForm>>,
    member: Mutex<EditSession<MemberForm>>,
}

impl<A: LibraryApi, S: Surface> Desk<A, S> {
    pub fn new(api: A, surface: S) -> Self {
        Self {
            api,
            surface,
            in_flight: InFlight::default(),
            book: Mutex::new(EditSession::new("book")),
            member: Mutex::new(EditSession::new("member")),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn book_state(&self) -> FormState {
        lock(&self.book).state()
    }

    pub fn book_form(&self) -> Option<BookForm> {
        lock(&self.book).form().cloned()
    }

    pub fn member_state(&self) -> FormState {
        lock(&self.member).state()
    }

    pub fn member_form(&self) -> Option<MemberForm> {
        lock(&self.member).form().cloned()
    }

    pub fn is_busy(&self, control: Control) -> bool {
        self.in_flight.is_busy(control)
    }

    pub async fn dispatch(&self, event: Event) -> Handled {
        tracing::debug!("Dispatching {:?}", event);

        match event {
            Event::SearchSubmitted { term } => self.search(&term).await,
            Event::SearchKey { key, term } => {
                if key == "Enter" {
                    self.search(&term).await
                } else {
                    Handled::Ignored
                }
            }
            Event::ReturnClicked { transaction_id } => self.return_loan(transaction_id).await,
            Event::IssueSubmitted(form) => self.issue_loan(form).await,
            Event::OverdueRequested => self.overdue().await,
            Event::EditBookClicked { id } => self.edit_book(id).await,
            Event::TotalCopiesChanged { input } => self.change_total_copies(&input),
            Event::BookFieldChanged { field, value } => self.change_book_field(&field, &value),
            Event::EditBookSubmitted => self.submit_book().await,
            Event::EditBookClosed => self.close_form(&self.book),
            Event::EditMemberClicked { id } => self.edit_member(id).await,
            Event::MemberFieldChanged { field, value } => {
                self.change_member_field(&field, &value)
            }
            Event::EditMemberSubmitted => self.submit_member().await,
            Event::EditMemberClosed => self.close_form(&self.member),
            Event::Reload => {
                self.reload();
                Handled::Reloaded
            }
        }
    }

    /// Full page reload: every form closes and its baseline is dropped
    pub fn reload(&self) {
        lock(&self.book).reset();
        lock(&self.member).reset();
        self.surface.reload();
    }

    async fn search(&self, term: &str) -> Handled {
        if term.trim().is_empty() {
            self.surface.alert("Please enter a search term");
            return Handled::Prompted;
        }

        let Some(_guard) = self.busy_guard(Control::Search) else {
            return Handled::Ignored;
        };

        match self.api.search_books(term).await {
            Ok(books) => {
                self.surface.show_books(&books);
                Handled::Shown
            }
            Err(e) => self.report("Search failed", e),
        }
    }

    async fn return_loan(&self, transaction_id: i64) -> Handled {
        if self.in_flight.is_busy(Control::ReturnLoan) {
            tracing::debug!("Return already in progress, ignoring click");
            return Handled::Ignored;
        }

        if !self
            .surface
            .confirm("Are you sure you want to return this book?")
        {
            return Handled::Cancelled;
        }

        let Some(_guard) = self.busy_guard(Control::ReturnLoan) else {
            return Handled::Ignored;
        };

        tracing::info!("Returning loan {}", transaction_id);
        let result = self.api.return_loan(transaction_id).await;
        self.finish_action("Return failed", result)
    }

    async fn issue_loan(&self, form: IssueLoanForm) -> Handled {
        if let Err(e) = form.check() {
            return self.report("Issue form rejected", e);
        }

        let Some(_guard) = self.busy_guard(Control::IssueLoan) else {
            return Handled::Ignored;
        };

        tracing::info!("Issuing book {} to member {}", form.book_id, form.member_id);
        let result = self.api.issue_loan(&form).await;
        self.finish_action("Issue failed", result)
    }

    async fn overdue(&self) -> Handled {
        let Some(_guard) = self.busy_guard(Control::Overdue) else {
            return Handled::Ignored;
        };

        match self.api.list_overdue().await {
            Ok(loans) => {
                tracing::info!("{} overdue loans", loans.len());
                self.surface.show_overdue(&loans);
                Handled::Shown
            }
            Err(e) => self.report("Loading overdue loans failed", e),
        }
    }

    async fn edit_book(&self, id: i64) -> Handled {
        if let Err(e) = lock(&self.book).begin_load() {
            tracing::debug!("{}", e);
            return Handled::Ignored;
        }

        let fetched = self.api.fetch_book(id).await;

        let mut session = lock(&self.book);
        let handled = match fetched {
            Ok(book) => match session.populate(BookForm::from(&book)) {
                Ok(form) => {
                    self.surface.show_book_form(form);
                    Handled::Shown
                }
                Err(e) => {
                    // Reloaded while the fetch was pending
                    tracing::debug!("Dropping stale book {}: {}", id, e);
                    Handled::Ignored
                }
            },
            Err(e) => {
                session.fail_load();
                drop(session);
                self.report("Loading book failed", e)
            }
        };
        handled
    }

    async fn edit_member(&self, id: i64) -> Handled {
        if let Err(e) = lock(&self.member).begin_load() {
            tracing::debug!("{}", e);
            return Handled::Ignored;
        }

        let fetched = self.api.fetch_member(id).await;

        let mut session = lock(&self.member);
        let handled = match fetched {
            Ok(member) => match session.populate(MemberForm::from(&member)) {
                Ok(form) => {
                    self.surface.show_member_form(form);
                    Handled::Shown
                }
                Err(e) => {
                    tracing::debug!("Dropping stale member {}: {}", id, e);
                    Handled::Ignored
                }
            },
            Err(e) => {
                session.fail_load();
                drop(session);
                self.report("Loading member failed", e)
            }
        };
        handled
    }

    fn change_total_copies(&self, input: &str) -> Handled {
        self.edit_book_form(|form| {
            form.change_total_copies(input);
            Ok(())
        })
    }

    fn change_book_field(&self, field: &str, value: &str) -> Handled {
        self.edit_book_form(|form| {
            let field: BookField = field.parse()?;
            form.set(field, value);
            Ok(())
        })
    }

    fn edit_book_form(&self, edit: impl FnOnce(&mut BookForm) -> DeskResult<()>) -> Handled {
        let mut session = lock(&self.book);
        let result = session.form_mut().and_then(|form| {
            edit(form)?;
            Ok(form.clone())
        });
        drop(session);

        match result {
            Ok(form) => {
                self.surface.show_book_form(&form);
                Handled::Shown
            }
            Err(e) => self.report("Book form not updated", e),
        }
    }

    fn change_member_field(&self, field: &str, value: &str) -> Handled {
        let mut session = lock(&self.member);
        let result = session.form_mut().and_then(|form| {
            let field: MemberField = field.parse()?;
            form.set(field, value);
            Ok(form.clone())
        });
        drop(session);

        match result {
            Ok(form) => {
                self.surface.show_member_form(&form);
                Handled::Shown
            }
            Err(e) => self.report("Member form not updated", e),
        }
    }

    async fn submit_book(&self) -> Handled {
        let (id, update) = match begin_submit(&self.book) {
            Ok(prepared) => prepared,
            Err(e) => return self.report("Book not saved", e),
        };

        tracing::info!("Saving book {}", id);
        let result = self.api.update_book(id, &update).await;
        lock(&self.book).finish_submit(result.is_ok());

        self.finish_action(
            "Book not saved",
            result.map(|_| "Book updated successfully".to_string()),
        )
    }

    async fn submit_member(&self) -> Handled {
        let (id, update) = match begin_submit(&self.member) {
            Ok(prepared) => prepared,
            Err(e) => return self.report("Member not saved", e),
        };

        tracing::info!("Saving member {}", id);
        let result = self.api.update_member(id, &update).await;
        lock(&self.member).finish_submit(result.is_ok());

        self.finish_action(
            "Member not saved",
            result.map(|_| "Member updated successfully".to_string()),
        )
    }

    fn close_form<F>(&self, session: &Mutex<EditSession<F>>) -> Handled {
        match lock(session).close() {
            Ok(()) => Handled::Shown,
            Err(e) => {
                tracing::debug!("{}", e);
                Handled::Ignored
            }
        }
    }

    fn busy_guard(&self, control: Control) -> Option<InFlightGuard<'_>> {
        let guard = self.in_flight.acquire(control);
        if guard.is_none() {
            tracing::debug!("{:?} already has a request in flight, ignoring", control);
        }
        guard
    }

    /// Show the outcome of a state change; reload only on success
    fn finish_action(&self, context: &str, result: DeskResult<String>) -> Handled {
        match result {
            Ok(message) => {
                tracing::info!("{}", message);
                self.surface.alert(&message);
                self.reload();
                Handled::Reloaded
            }
            Err(e) => self.report(context, e),
        }
    }

    fn report(&self, context: &str, error: DeskError) -> Handled {
        match &error {
            DeskError::ServerReported(_) | DeskError::Validation(_) | DeskError::InvalidState(_) => {
                tracing::warn!("{}: {}", context, error)
            }
            _ => tracing::error!("{}: {}", context, error),
        }
        self.surface.alert(&error.user_message());
        Handled::Failed
    }
}

/// Validate the populated form and move it to `Submitting`
fn begin_submit<F: EditForm>(session: &Mutex<EditSession<F>>) -> DeskResult<(i64, F::Update)> {
    let mut session = lock(session);
    let form = session.form_mut()?;
    let prepared = (form.record_id(), form.to_update()?);
    session.begin_submit()?;
    Ok(prepared)
}
