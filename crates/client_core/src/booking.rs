use chrono::NaiveDate;
use shared::{
    domain::Role,
    protocol::{parse_time_of_day, NewAppointment},
};

use crate::error::ViewModelError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookingMode {
    #[default]
    Browsing,
    /// The creation sub-flow is open for `date`.
    Creating { date: NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingTransition {
    Opened,
    /// Back to browsing; the appointment list must be re-fetched.
    Reload,
    Discarded,
    Ignored,
}

/// Gates the browsing and creating sub-views. Holds no appointment data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingController {
    mode: BookingMode,
    /// A draft has been handed to the service and has not come back yet.
    submitting: bool,
}

impl BookingController {
    pub fn mode(&self) -> BookingMode {
        self.mode
    }

    pub fn creation_date(&self) -> Option<NaiveDate> {
        match self.mode {
            BookingMode::Creating { date } => Some(date),
            BookingMode::Browsing => None,
        }
    }

    pub fn start_create(
        &mut self,
        role: Role,
        date: NaiveDate,
    ) -> Result<BookingTransition, ViewModelError> {
        if !role.is_provider() {
            return Err(ViewModelError::NotPermitted {
                action: "creating an appointment",
            });
        }
        match self.mode {
            BookingMode::Creating { .. } => Ok(BookingTransition::Ignored),
            BookingMode::Browsing => {
                self.mode = BookingMode::Creating { date };
                Ok(BookingTransition::Opened)
            }
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validates `draft` against the open creation day and marks it in flight.
    /// Only one draft may be in flight per creation session.
    pub fn begin_submit(&mut self, draft: &NewAppointment) -> Result<(), ViewModelError> {
        let creation_date = self.creation_date().ok_or_else(|| {
            ViewModelError::InvalidDraft("no appointment is being created".into())
        })?;
        if self.submitting {
            return Err(ViewModelError::InvalidDraft(
                "an appointment is already being submitted".into(),
            ));
        }
        validate_draft(draft, creation_date)?;
        self.submitting = true;
        Ok(())
    }

    /// Ends the in-flight submission. A created appointment closes the
    /// creation sub-flow; a failed one leaves it open for another try.
    pub fn finish_submit(&mut self, created: bool) -> BookingTransition {
        if !self.submitting {
            return BookingTransition::Ignored;
        }
        self.submitting = false;
        if created {
            self.confirm()
        } else {
            BookingTransition::Ignored
        }
    }

    pub fn confirm(&mut self) -> BookingTransition {
        if self.submitting {
            return BookingTransition::Ignored;
        }
        match self.mode {
            BookingMode::Creating { .. } => {
                self.mode = BookingMode::Browsing;
                BookingTransition::Reload
            }
            BookingMode::Browsing => BookingTransition::Ignored,
        }
    }

    pub fn cancel(&mut self) -> BookingTransition {
        if self.submitting {
            return BookingTransition::Ignored;
        }
        match self.mode {
            BookingMode::Creating { .. } => {
                self.mode = BookingMode::Browsing;
                BookingTransition::Discarded
            }
            BookingMode::Browsing => BookingTransition::Ignored,
        }
    }
}

/// Checks a draft coming back from the creation sub-flow before it is sent.
pub fn validate_draft(
    draft: &NewAppointment,
    creation_date: NaiveDate,
) -> Result<(), ViewModelError> {
    if draft.date != creation_date {
        return Err(ViewModelError::InvalidDraft(format!(
            "draft date {} does not match the selected day {}",
            draft.date, creation_date
        )));
    }
    let start = parse_time_of_day(&draft.start_time).ok_or_else(|| {
        ViewModelError::InvalidDraft(format!("bad start time '{}'", draft.start_time))
    })?;
    let end = parse_time_of_day(&draft.end_time).ok_or_else(|| {
        ViewModelError::InvalidDraft(format!("bad end time '{}'", draft.end_time))
    })?;
    if start >= end {
        return Err(ViewModelError::InvalidDraft(format!(
            "start {} must be before end {}",
            draft.start_time, draft.end_time
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/booking_tests.rs"]
mod tests;
