use shared::{domain::Role, protocol::Appointment};

use crate::{
    error::{FetchOperation, ViewModelError},
    services::AppointmentService,
};

/// Runs exactly one of the two appointment fetches for `role` and returns
/// the list untouched.
pub async fn load_appointments(
    service: &dyn AppointmentService,
    role: Role,
) -> Result<Vec<Appointment>, ViewModelError> {
    let result = match role {
        Role::Client => service.fetch_client_appointments().await,
        Role::Provider => service.fetch_provider_appointments().await,
    };
    result.map_err(|err| ViewModelError::fetch(FetchOperation::appointments_for(role), &err))
}

/// Monotonic request token. Only the most recently issued token may apply
/// its response.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RequestGeneration {
    latest: u64,
}

impl RequestGeneration {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Orphans every token issued so far.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, token: u64) -> bool {
        token == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_token_supersedes_older() {
        let mut generation = RequestGeneration::default();
        let first = generation.issue();
        let second = generation.issue();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn invalidate_orphans_outstanding_token() {
        let mut generation = RequestGeneration::default();
        let token = generation.issue();
        generation.invalidate();
        assert!(!generation.is_current(token));
    }
}
