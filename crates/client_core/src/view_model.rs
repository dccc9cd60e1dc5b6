//! Appointment calendar view model: role-scoped loading, the selected day,
//! the projected day list and the booking sub-flow gate.

use std::sync::Arc;

use chrono::NaiveDate;
use shared::{
    domain::Role,
    protocol::{Appointment, NewAppointment},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::{
    booking::{BookingController, BookingMode, BookingTransition},
    clock::{Clock, SystemClock},
    directory::{resolve_directory, ClientDirectory},
    error::{FetchOperation, ViewModelError},
    loader::{load_appointments, RequestGeneration},
    projector::{project, DayView},
    selection::{format_calendar_date, DaySelector},
    services::AppointmentService,
    session::SessionContext,
};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewModelEvent {
    AppointmentsReplaced { role: Role, count: usize },
    DirectoryReplaced { count: usize },
    SelectionChanged { date: NaiveDate },
    BookingModeChanged(BookingMode),
    SessionChanged { role: Role },
    FetchFailed(ViewModelError),
    StaleResponseDiscarded { operation: FetchOperation },
}

/// Result of a single fetch as seen by the view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { count: usize },
    /// A newer request was issued while this one was in flight.
    Stale,
    /// Last-known-good data was kept.
    Failed(ViewModelError),
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountOutcome {
    pub appointments: LoadOutcome,
    pub directory: LoadOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub selected: NaiveDate,
    pub today: NaiveDate,
    pub is_today: bool,
}

struct ViewModelState {
    session: SessionContext,
    selection: DaySelector,
    booking: BookingController,
    appointments: Vec<Appointment>,
    directory: ClientDirectory,
    appointment_generation: RequestGeneration,
    directory_generation: RequestGeneration,
}

pub struct AppointmentViewModel {
    service: Arc<dyn AppointmentService>,
    clock: Arc<dyn Clock>,
    inner: Mutex<ViewModelState>,
    events: broadcast::Sender<ViewModelEvent>,
}

impl AppointmentViewModel {
    pub fn new(
        session: SessionContext,
        service: Arc<dyn AppointmentService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let today = clock.today();
        Self {
            service,
            clock,
            inner: Mutex::new(ViewModelState {
                session,
                selection: DaySelector::new(today),
                booking: BookingController::default(),
                appointments: Vec::new(),
                directory: ClientDirectory::default(),
                appointment_generation: RequestGeneration::default(),
                directory_generation: RequestGeneration::default(),
            }),
            events,
        }
    }

    pub fn with_system_clock(
        session: SessionContext,
        service: Arc<dyn AppointmentService>,
    ) -> Self {
        Self::new(session, service, Arc::new(SystemClock))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ViewModelEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: ViewModelEvent) {
        let _ = self.events.send(event);
    }

    pub async fn role(&self) -> Role {
        self.inner.lock().await.session.role()
    }

    pub async fn session(&self) -> SessionContext {
        self.inner.lock().await.session.clone()
    }

    /// Initial load. For the provider the directory and appointment fetches
    /// run side by side with no ordering between them.
    pub async fn mount(&self) -> MountOutcome {
        let role = self.role().await;
        info!(%role, "calendar: mounting");
        if role.is_provider() {
            let (appointments, directory) =
                tokio::join!(self.reload_appointments(), self.refresh_directory());
            MountOutcome {
                appointments,
                directory,
            }
        } else {
            MountOutcome {
                appointments: self.reload_appointments().await,
                directory: LoadOutcome::Skipped,
            }
        }
    }

    pub async fn reload_appointments(&self) -> LoadOutcome {
        let (role, token) = {
            let mut guard = self.inner.lock().await;
            (guard.session.role(), guard.appointment_generation.issue())
        };
        let operation = FetchOperation::appointments_for(role);
        debug!(%role, token, "appointments: fetching");

        let result = load_appointments(self.service.as_ref(), role).await;

        let mut guard = self.inner.lock().await;
        if !guard.appointment_generation.is_current(token) {
            drop(guard);
            debug!(%operation, token, "appointments: discarding stale response");
            self.emit(ViewModelEvent::StaleResponseDiscarded { operation });
            return LoadOutcome::Stale;
        }
        match result {
            Ok(appointments) => {
                let count = appointments.len();
                guard.appointments = appointments;
                drop(guard);
                info!(%role, count, "appointments: loaded");
                self.emit(ViewModelEvent::AppointmentsReplaced { role, count });
                LoadOutcome::Applied { count }
            }
            Err(err) => {
                let kept = guard.appointments.len();
                drop(guard);
                warn!(%role, kept, error = %err, "appointments: fetch failed, keeping last list");
                self.emit(ViewModelEvent::FetchFailed(err.clone()));
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Provider-only; the client calendar never shows names.
    pub async fn refresh_directory(&self) -> LoadOutcome {
        let token = {
            let mut guard = self.inner.lock().await;
            if !guard.session.role().is_provider() {
                return LoadOutcome::Skipped;
            }
            guard.directory_generation.issue()
        };
        debug!(token, "directory: fetching");

        let result = resolve_directory(self.service.as_ref()).await;

        let mut guard = self.inner.lock().await;
        if !guard.directory_generation.is_current(token) {
            drop(guard);
            debug!(token, "directory: discarding stale response");
            self.emit(ViewModelEvent::StaleResponseDiscarded {
                operation: FetchOperation::ProviderClients,
            });
            return LoadOutcome::Stale;
        }
        match result {
            Ok(directory) => {
                let count = directory.len();
                guard.directory = directory;
                drop(guard);
                info!(count, "directory: loaded");
                self.emit(ViewModelEvent::DirectoryReplaced { count });
                LoadOutcome::Applied { count }
            }
            Err(err) => {
                drop(guard);
                warn!(error = %err, "directory: fetch failed, names stay unresolved");
                self.emit(ViewModelEvent::FetchFailed(err.clone()));
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Replaces the session. Both collections are cleared and any in-flight
    /// response for the previous session is orphaned before reloading.
    pub async fn switch_session(&self, session: SessionContext) -> MountOutcome {
        let role = {
            let mut guard = self.inner.lock().await;
            guard.session = session;
            guard.appointments.clear();
            guard.directory = ClientDirectory::default();
            guard.appointment_generation.invalidate();
            guard.directory_generation.invalidate();
            guard.booking = BookingController::default();
            guard.session.role()
        };
        info!(%role, "calendar: session switched");
        self.emit(ViewModelEvent::SessionChanged { role });
        self.mount().await
    }

    pub async fn select(&self, date: NaiveDate) {
        self.inner.lock().await.selection.select(date);
        self.emit(ViewModelEvent::SelectionChanged { date });
    }

    pub async fn select_str(&self, raw: &str) -> Result<NaiveDate, ViewModelError> {
        let date = self.inner.lock().await.selection.select_str(raw)?;
        self.emit(ViewModelEvent::SelectionChanged { date });
        Ok(date)
    }

    pub async fn step_days(&self, days: i64) -> NaiveDate {
        let date = self.inner.lock().await.selection.step_days(days);
        self.emit(ViewModelEvent::SelectionChanged { date });
        date
    }

    pub async fn selection(&self) -> SelectionSnapshot {
        let selection = self.inner.lock().await.selection;
        SelectionSnapshot {
            selected: selection.selected(),
            today: selection.today(),
            is_today: selection.is_today(),
        }
    }

    /// Projects the selected day against the wall clock at call time, so
    /// entries turn complete without a reload.
    pub async fn day_view(&self) -> DayView {
        let guard = self.inner.lock().await;
        project(
            &guard.appointments,
            guard.selection.selected(),
            guard.session.role(),
            &guard.directory,
            self.clock.now(),
        )
    }

    pub async fn appointments(&self) -> Vec<Appointment> {
        self.inner.lock().await.appointments.clone()
    }

    pub async fn directory(&self) -> ClientDirectory {
        self.inner.lock().await.directory.clone()
    }

    pub async fn booking_mode(&self) -> BookingMode {
        self.inner.lock().await.booking.mode()
    }

    /// Opens the creation sub-flow and returns the selected day as the
    /// `YYYY-MM-DD` string it is handed.
    pub async fn start_create(&self) -> Result<String, ViewModelError> {
        let (transition, mode) = {
            let mut guard = self.inner.lock().await;
            let role = guard.session.role();
            let date = guard.selection.selected();
            let transition = guard.booking.start_create(role, date)?;
            (transition, guard.booking.mode())
        };
        let BookingMode::Creating { date } = mode else {
            return Err(ViewModelError::InvalidDraft(
                "booking did not enter the creating state".into(),
            ));
        };
        if transition == BookingTransition::Opened {
            info!(%date, "booking: creating");
            self.emit(ViewModelEvent::BookingModeChanged(mode));
        }
        Ok(format_calendar_date(date))
    }

    /// Returns `None` when no creation was in progress.
    pub async fn confirm(&self) -> Option<LoadOutcome> {
        let transition = self.inner.lock().await.booking.confirm();
        if transition != BookingTransition::Reload {
            return None;
        }
        info!("booking: confirmed, reloading appointments");
        self.emit(ViewModelEvent::BookingModeChanged(BookingMode::Browsing));
        Some(self.reload_appointments().await)
    }

    pub async fn cancel(&self) -> bool {
        let transition = self.inner.lock().await.booking.cancel();
        if transition != BookingTransition::Discarded {
            return false;
        }
        info!("booking: cancelled");
        self.emit(ViewModelEvent::BookingModeChanged(BookingMode::Browsing));
        true
    }

    /// Sends the creation sub-flow's draft. On success the booking is
    /// confirmed and the list reloaded; on failure it stays open. Cancel and
    /// confirm are ignored while the draft is in flight.
    pub async fn submit(&self, draft: NewAppointment) -> Result<Appointment, ViewModelError> {
        self.inner.lock().await.booking.begin_submit(&draft)?;

        let result = self.service.create_appointment(&draft).await;
        let transition = self.inner.lock().await.booking.finish_submit(result.is_ok());
        let created = match result {
            Ok(created) => created,
            Err(err) => {
                let err = ViewModelError::CreateFailure(format!("{err:#}"));
                error!(
                    client_id = draft.client_id.0,
                    date = %draft.date,
                    error = %err,
                    "booking: create failed"
                );
                return Err(err);
            }
        };
        info!(appointment_id = created.id.0, date = %created.date, "booking: created");
        if transition == BookingTransition::Reload {
            self.emit(ViewModelEvent::BookingModeChanged(BookingMode::Browsing));
        } else {
            debug!(?transition, "booking: session changed while creating");
        }
        // The record exists on the backend even if the sub-flow was reset meanwhile.
        self.reload_appointments().await;
        Ok(created)
    }
}

#[cfg(test)]
#[path = "tests/view_model_tests.rs"]
mod tests;
