//! Edit form lifecycle
//!
//! `Closed -> Loading -> Populated -> Submitting -> Closed`. A failed fetch
//! goes back to `Closed` with nothing populated; a failed submit goes back to
//! `Populated` with the user's edits intact.

use crate::error::{DeskError, DeskResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Closed,
    Loading,
    Populated,
    Submitting,
}

impl FormState {
    /// A request for this form is pending
    pub fn is_busy(&self) -> bool {
        matches!(self, FormState::Loading | FormState::Submitting)
    }
}

#[derive(Debug)]
pub struct EditSession<F> {
    name: &'static str,
    state: FormState,
    form: Option<F>,
}

impl<F> EditSession<F> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: FormState::Closed,
            form: None,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn form(&self) -> Option<&F> {
        self.form.as_ref()
    }

    /// Editable form, only while populated
    pub fn form_mut(&mut self) -> DeskResult<&mut F> {
        match (self.state, self.form.as_mut()) {
            (FormState::Populated, Some(form)) => Ok(form),
            (state, _) => Err(invalid(self.name, "edit", state)),
        }
    }

    /// Edit button clicked. Opening over an already populated form discards it.
    pub fn begin_load(&mut self) -> DeskResult<()> {
        if self.state.is_busy() {
            return Err(invalid(self.name, "open", self.state));
        }
        self.state = FormState::Loading;
        self.form = None;
        Ok(())
    }

    pub fn populate(&mut self, form: F) -> DeskResult<&F> {
        if self.state != FormState::Loading {
            return Err(invalid(self.name, "populate", self.state));
        }
        self.state = FormState::Populated;
        Ok(self.form.insert(form))
    }

    pub fn fail_load(&mut self) {
        self.state = FormState::Closed;
        self.form = None;
    }

    /// Form submitted; hands back the values to send
    pub fn begin_submit(&mut self) -> DeskResult<&F> {
        match (self.state, self.form.as_ref()) {
            (FormState::Populated, Some(form)) => {
                self.state = FormState::Submitting;
                Ok(form)
            }
            (state, _) => Err(invalid(self.name, "submit", state)),
        }
    }

    pub fn finish_submit(&mut self, succeeded: bool) {
        if self.state != FormState::Submitting {
            return;
        }
        if succeeded {
            self.fail_load();
        } else {
            self.state = FormState::Populated;
        }
    }

    pub fn close(&mut self) -> DeskResult<()> {
        if self.state.is_busy() {
            return Err(invalid(self.name, "close", self.state));
        }
        self.reset();
        Ok(())
    }

    /// Page reload: drop everything, including a pending request's form
    pub fn reset(&mut self) {
        self.state = FormState::Closed;
        self.form = None;
    }
}

fn invalid(name: &str, action: &str, state: FormState) -> DeskError {
    DeskError::InvalidState(format!("Cannot {} {} form while {:?}", action, name, state))
}
