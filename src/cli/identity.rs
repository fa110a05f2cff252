use std::env;

use will_core::{IdentityProvider, UserIdentity};

pub const USER_ENV: &str = "MYWILL_USER";
pub const EMAIL_ENV: &str = "MYWILL_EMAIL";
pub const NAME_ENV: &str = "MYWILL_NAME";

/// Signed-in user taken from the environment. Without `MYWILL_USER` the CLI
/// runs signed out and cannot edit or submit stored wills.
#[derive(Debug, Clone, Default)]
pub struct EnvIdentity {
    identity: Option<UserIdentity>,
}

impl EnvIdentity {
    pub fn from_env() -> Self {
        let identity = env::var(USER_ENV)
            .ok()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(|id| UserIdentity {
                email: env::var(EMAIL_ENV).unwrap_or_default(),
                display_name: env::var(NAME_ENV).unwrap_or_else(|_| id.clone()),
                id,
            });
        Self { identity }
    }

    pub fn signed_in(identity: UserIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }
}

impl IdentityProvider for EnvIdentity {
    fn current_identity(&self) -> Option<UserIdentity> {
        self.identity.clone()
    }
}
