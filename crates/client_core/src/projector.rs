//! Derives the per-day list the calendar renders under the grid.

use chrono::{NaiveDate, NaiveDateTime};
use shared::{
    domain::{AppointmentId, ClientId, Role},
    protocol::Appointment,
};

use crate::directory::ClientDirectory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEntry {
    pub id: AppointmentId,
    pub start_time: String,
    pub label: String,
    pub confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEntry {
    pub id: AppointmentId,
    pub client_id: ClientId,
    pub label: String,
    pub start_time: String,
    pub end_time: String,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    /// The appointment ended strictly before the projection instant.
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEntry {
    Client(ClientEntry),
    Provider(ProviderEntry),
}

impl ViewEntry {
    pub fn id(&self) -> AppointmentId {
        match self {
            ViewEntry::Client(entry) => entry.id,
            ViewEntry::Provider(entry) => entry.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ViewEntry::Client(entry) => &entry.label,
            ViewEntry::Provider(entry) => &entry.label,
        }
    }

    pub fn start_time(&self) -> &str {
        match self {
            ViewEntry::Client(entry) => &entry.start_time,
            ViewEntry::Provider(entry) => &entry.start_time,
        }
    }

    /// Whether the entry should be drawn with the "done" highlight.
    pub fn is_highlighted(&self) -> bool {
        match self {
            ViewEntry::Client(entry) => entry.confirmed,
            ViewEntry::Provider(entry) => entry.complete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayView {
    Entries {
        date: NaiveDate,
        entries: Vec<ViewEntry>,
    },
    /// Nothing booked on `date`; callers render an explicit empty state.
    Empty { date: NaiveDate },
}

impl DayView {
    pub fn date(&self) -> NaiveDate {
        match self {
            DayView::Entries { date, .. } | DayView::Empty { date } => *date,
        }
    }

    pub fn entries(&self) -> &[ViewEntry] {
        match self {
            DayView::Entries { entries, .. } => entries,
            DayView::Empty { .. } => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DayView::Empty { .. })
    }
}

pub fn project(
    appointments: &[Appointment],
    selected: NaiveDate,
    role: Role,
    directory: &ClientDirectory,
    now: NaiveDateTime,
) -> DayView {
    let mut for_day: Vec<&Appointment> = appointments
        .iter()
        .filter(|appointment| appointment.date == selected)
        .collect();

    if for_day.is_empty() {
        return DayView::Empty { date: selected };
    }

    // Zero-padded 24h strings sort chronologically.
    for_day.sort_by(|a, b| a.start_time.cmp(&b.start_time));

    let entries = for_day
        .into_iter()
        .map(|appointment| match role {
            Role::Client => ViewEntry::Client(client_entry(appointment)),
            Role::Provider => ViewEntry::Provider(provider_entry(appointment, directory, now)),
        })
        .collect();

    DayView::Entries {
        date: selected,
        entries,
    }
}

fn client_entry(appointment: &Appointment) -> ClientEntry {
    ClientEntry {
        id: appointment.id,
        start_time: appointment.start_time.clone(),
        label: format!("Appointment at {}", appointment.start_time),
        confirmed: true,
    }
}

fn provider_entry(
    appointment: &Appointment,
    directory: &ClientDirectory,
    now: NaiveDateTime,
) -> ProviderEntry {
    let ends_at = appointment.ends_at();
    ProviderEntry {
        id: appointment.id,
        client_id: appointment.client_id,
        label: format!(
            "Session with {}",
            directory.name_or_id(appointment.client_id)
        ),
        start_time: appointment.start_time.clone(),
        end_time: appointment.end_time.clone(),
        starts_at: appointment.starts_at(),
        ends_at,
        complete: ends_at.is_some_and(|end| end < now),
    }
}

#[cfg(test)]
#[path = "tests/projector_tests.rs"]
mod tests;
