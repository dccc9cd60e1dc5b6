pub mod booking;
pub mod clock;
pub mod directory;
pub mod error;
pub mod http;
pub mod loader;
pub mod projector;
pub mod selection;
pub mod services;
pub mod session;
pub mod view_model;

pub use booking::{BookingController, BookingMode, BookingTransition};
pub use clock::{Clock, FixedClock, SystemClock};
pub use directory::ClientDirectory;
pub use error::{FetchOperation, ViewModelError};
pub use http::HttpAppointmentService;
pub use projector::{project, ClientEntry, DayView, ProviderEntry, ViewEntry};
pub use selection::{format_calendar_date, parse_calendar_date, DaySelector};
pub use services::{
    AnonymousSession, AppointmentService, MissingAppointmentService, SessionProvider,
};
pub use session::SessionContext;
pub use view_model::{
    AppointmentViewModel, LoadOutcome, MountOutcome, SelectionSnapshot, ViewModelEvent,
};
