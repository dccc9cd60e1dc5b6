use std::fmt;

use shared::domain::Role;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchOperation {
    CurrentUser,
    ClientAppointments,
    ProviderAppointments,
    ProviderClients,
}

impl FetchOperation {
    pub fn appointments_for(role: Role) -> Self {
        match role {
            Role::Client => FetchOperation::ClientAppointments,
            Role::Provider => FetchOperation::ProviderAppointments,
        }
    }
}

impl fmt::Display for FetchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchOperation::CurrentUser => "current user",
            FetchOperation::ClientAppointments => "client appointments",
            FetchOperation::ProviderAppointments => "provider appointments",
            FetchOperation::ProviderClients => "provider clients",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewModelError {
    #[error("failed to fetch {operation}: {message}")]
    FetchFailure {
        operation: FetchOperation,
        message: String,
    },
    #[error("no authenticated user for this session")]
    UnauthenticatedSession,
    #[error("invalid calendar date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid appointment draft: {0}")]
    InvalidDraft(String),
    #[error("{action} is only available to the provider role")]
    NotPermitted { action: &'static str },
    #[error("failed to create appointment: {0}")]
    CreateFailure(String),
}

impl ViewModelError {
    pub fn fetch(operation: FetchOperation, source: &anyhow::Error) -> Self {
        ViewModelError::FetchFailure {
            operation,
            message: format!("{source:#}"),
        }
    }
}
