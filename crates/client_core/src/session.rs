use shared::domain::{CurrentUser, Role, UserId};
use tracing::{info, warn};

use crate::{
    error::{FetchOperation, ViewModelError},
    services::SessionProvider,
};

/// Session identity handed to the view model at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    user: Option<CurrentUser>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user: CurrentUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn provider(user_id: UserId) -> Self {
        Self::authenticated(CurrentUser::new(user_id, "PSYCHOLOGIST"))
    }

    pub fn client(user_id: UserId) -> Self {
        Self::authenticated(CurrentUser::new(user_id, "CLIENT"))
    }

    /// Asks the auth seam for the current user. Lookup failures and missing
    /// users both degrade to an anonymous, client-role session.
    pub async fn resolve(provider: &dyn SessionProvider) -> Self {
        match provider.current_user().await {
            Ok(Some(user)) => {
                info!(user_id = user.id.0, role = %user.role(), "session: resolved user");
                Self::authenticated(user)
            }
            Ok(None) => {
                warn!(
                    error = %ViewModelError::UnauthenticatedSession,
                    "session: using client role"
                );
                Self::anonymous()
            }
            Err(err) => {
                warn!(
                    error = %ViewModelError::fetch(FetchOperation::CurrentUser, &err),
                    "session: using client role"
                );
                Self::anonymous()
            }
        }
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Role {
        self.user
            .as_ref()
            .map(CurrentUser::role)
            .unwrap_or(Role::Client)
    }
}
