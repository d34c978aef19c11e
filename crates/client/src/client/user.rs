//! Account and profile endpoints

use super::NextStepClient;
use crate::error::ClientError;
use crate::locale::Locale;
use crate::types::{
    ChangePasswordRequest, DeleteAccountRequest, UpdateLanguageRequest,
    UpdateNotificationsRequest, UpdateProfileRequest, User,
};
use reqwest::Method;
use tracing::debug;

impl NextStepClient {
    /// Profile of the signed-in user
    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.get("/user/me").await
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<User, ClientError> {
        self.send(Method::PUT, "/user/me", request).await
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        let request = ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.send(Method::PUT, "/user/me/password", &request).await
    }

    /// Delete the account; on success the local session is dropped too
    pub async fn delete_account(&self, password: &str) -> Result<(), ClientError> {
        let request = DeleteAccountRequest {
            password: password.to_string(),
        };
        self.send::<(), _>(Method::DELETE, "/user/me", &request).await?;
        self.drop_tokens_quietly();
        Ok(())
    }

    pub async fn update_notifications(&self, enabled: bool) -> Result<(), ClientError> {
        let request = UpdateNotificationsRequest { enabled };
        self.send(Method::PUT, "/user/me/notifications", &request).await
    }

    /// Store the preferred language on the account
    pub async fn update_language(&self, locale: Locale) -> Result<(), ClientError> {
        let request = UpdateLanguageRequest {
            language: locale.as_str().to_string(),
        };
        self.send(Method::PUT, "/user/me/language", &request).await
    }

    /// Switch the client locale and, when signed in, sync it to the account.
    ///
    /// The sync is best-effort: failures are logged and otherwise ignored.
    pub async fn change_locale(&self, locale: Locale) {
        self.set_locale(locale);

        if !self.has_session() {
            return;
        }

        if let Err(e) = self.update_language(locale).await {
            debug!(error = %e, %locale, "Language preference sync failed");
        }
    }
}
