use snmp_studio_model::{ActionResponse, AuthUpdate};
use thiserror::Error;

use crate::core::lifecycle::ScreenModule;
use crate::core::route::Route;
use crate::infra::services::api::ApiError;
use crate::screens::ScreenContext;

pub const AUTH_USER: &str = "set-auth-user";
pub const AUTH_MESSAGE: &str = "auth-msg";

pub const DEFAULT_USER: &str = "admin";
pub const MIN_PASSWORD_LEN: usize = 4;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Passwords do not match!")]
    Mismatch,

    #[error("Password is too weak (min 4 chars).")]
    TooWeak,

    #[error("Server error updating credentials.")]
    Api(#[source] ApiError),
}

#[derive(Debug)]
pub struct SettingsScreen {
    ctx: ScreenContext,
}

impl SettingsScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self { ctx }
    }

    /// Validates locally, then sends the new credentials. Validation and
    /// server failures are shown in the settings message line.
    pub async fn update_credentials(
        &self,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> Result<ActionResponse, CredentialError> {
        let result = match validate(password, confirm) {
            Err(err) => Err(err),
            Ok(()) => {
                let update = AuthUpdate {
                    username: username.to_string(),
                    password: password.to_string(),
                };
                self.ctx
                    .api
                    .update_credentials(&update)
                    .await
                    .map_err(CredentialError::Api)
            }
        };

        let message = match &result {
            Ok(_) => String::new(),
            Err(err) => {
                log::warn!("[Settings] credential update rejected: {err}");
                err.to_string()
            }
        };
        self.ctx.when_shown(Route::Settings, || {
            self.ctx.shell.set_field(AUTH_MESSAGE, &message)
        });
        result
    }
}

fn validate(password: &str, confirm: &str) -> Result<(), CredentialError> {
    if password != confirm {
        return Err(CredentialError::Mismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CredentialError::TooWeak);
    }
    Ok(())
}

impl ScreenModule for SettingsScreen {
    fn name(&self) -> &'static str {
        "settings"
    }

    fn activate(&mut self) {
        self.ctx.shell.set_field(AUTH_USER, DEFAULT_USER);
    }
}
