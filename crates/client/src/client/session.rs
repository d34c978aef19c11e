//! Session lifecycle: sign-in, restore, sign-out

use super::NextStepClient;
use crate::error::ClientError;
use crate::types::{AuthTokens, LoginRequest, User};
use tracing::{debug, info, warn};

impl NextStepClient {
    /// Sign in with email and password and load the user's profile
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let tokens = self
            .login_request(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.login_with_tokens(&tokens).await
    }

    /// Adopt a token set obtained elsewhere (e.g. the OAuth callback)
    pub async fn login_with_tokens(&self, tokens: &AuthTokens) -> Result<User, ClientError> {
        self.inner.tokens.save(tokens)?;
        let user = self.current_user().await?;
        info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    /// Load the profile of a previously stored session.
    ///
    /// Returns `None` when no session is stored, or when the stored one is no
    /// longer accepted (its tokens are cleared in that case).
    pub async fn restore_session(&self) -> Result<Option<User>, ClientError> {
        if !self.inner.tokens.has_session() {
            return Ok(None);
        }

        match self.current_user().await {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                debug!(error = %e, "Stored session rejected");
                self.inner.tokens.clear()?;
                Ok(None)
            }
        }
    }

    /// Forget the session locally; the server is not contacted
    pub fn logout(&self) -> Result<(), ClientError> {
        self.inner.tokens.clear()?;
        info!("Signed out");
        Ok(())
    }

    /// Whether tokens for a session are stored
    pub fn has_session(&self) -> bool {
        self.inner.tokens.has_session()
    }

    pub(crate) fn drop_tokens_quietly(&self) {
        if let Err(e) = self.inner.tokens.clear() {
            warn!(error = %e, "Failed to clear stored tokens");
        }
    }
}
