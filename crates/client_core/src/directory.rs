//! Client id to display name lookup for the provider calendar.

use std::collections::HashMap;

use shared::{domain::ClientId, protocol::ClientRecord};
use tracing::debug;

use crate::{
    error::{FetchOperation, ViewModelError},
    services::AppointmentService,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientDirectory {
    names: HashMap<ClientId, String>,
}

impl ClientDirectory {
    /// Duplicate ids resolve last-write-wins.
    pub fn from_records(records: &[ClientRecord]) -> Self {
        let mut names = HashMap::with_capacity(records.len());
        for record in records {
            let name = record.display_name();
            if let Some(previous) = names.insert(record.id, name) {
                debug!(
                    client_id = record.id.0,
                    overwritten = %previous,
                    "directory: duplicate client id"
                );
            }
        }
        Self { names }
    }

    pub fn display_name(&self, client_id: ClientId) -> Option<&str> {
        self.names.get(&client_id).map(String::as_str)
    }

    /// Resolved name, or the raw id when the client is unknown.
    pub fn name_or_id(&self, client_id: ClientId) -> String {
        self.display_name(client_id)
            .map(str::to_owned)
            .unwrap_or_else(|| client_id.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

pub async fn resolve_directory(
    service: &dyn AppointmentService,
) -> Result<ClientDirectory, ViewModelError> {
    let records = service
        .fetch_provider_clients()
        .await
        .map_err(|err| ViewModelError::fetch(FetchOperation::ProviderClients, &err))?;
    Ok(ClientDirectory::from_records(&records))
}
