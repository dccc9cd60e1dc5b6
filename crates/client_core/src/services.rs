//! Seams to the backing appointment/client services and the auth session.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::CurrentUser,
    protocol::{Appointment, ClientRecord, NewAppointment},
};

#[async_trait]
pub trait AppointmentService: Send + Sync {
    /// Appointments where the session user is the client.
    async fn fetch_client_appointments(&self) -> Result<Vec<Appointment>>;
    /// Appointments where the session user is the provider.
    async fn fetch_provider_appointments(&self) -> Result<Vec<Appointment>>;
    async fn fetch_provider_clients(&self) -> Result<Vec<ClientRecord>>;
    async fn create_appointment(&self, request: &NewAppointment) -> Result<Appointment>;
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// `None` means the session is not authenticated.
    async fn current_user(&self) -> Result<Option<CurrentUser>>;
}

pub struct MissingAppointmentService;

#[async_trait]
impl AppointmentService for MissingAppointmentService {
    async fn fetch_client_appointments(&self) -> Result<Vec<Appointment>> {
        Err(anyhow!("appointment service is unavailable"))
    }

    async fn fetch_provider_appointments(&self) -> Result<Vec<Appointment>> {
        Err(anyhow!("appointment service is unavailable"))
    }

    async fn fetch_provider_clients(&self) -> Result<Vec<ClientRecord>> {
        Err(anyhow!("client directory service is unavailable"))
    }

    async fn create_appointment(&self, request: &NewAppointment) -> Result<Appointment> {
        Err(anyhow!(
            "appointment service is unavailable; cannot book {} {}",
            request.date,
            request.start_time
        ))
    }
}

pub struct AnonymousSession;

#[async_trait]
impl SessionProvider for AnonymousSession {
    async fn current_user(&self) -> Result<Option<CurrentUser>> {
        Ok(None)
    }
}
