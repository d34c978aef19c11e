//! Authentication endpoints
//!
//! These run before a session exists (or to renew one), so they bypass the
//! token handling of [`NextStepClient::execute`].

use super::{API_PREFIX, NextStepClient};
use crate::error::ClientError;
use crate::types::{
    AuthTokens, EmailRequest, ErrorBody, LoginRequest, MessageResponse, RefreshTokenRequest,
    RegisterRequest, ResetPasswordRequest,
};
use reqwest::header;
use serde::Serialize;
use serde::de::DeserializeOwned;

const AUTH_PATH: &str = "/auth";

impl NextStepClient {
    /// POST a JSON body to an unauthenticated auth endpoint
    async fn auth_post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{API_PREFIX}{AUTH_PATH}{endpoint}", self.base_url());
        let response = self
            .inner
            .http
            .post(url)
            .header(header::ACCEPT_LANGUAGE, self.locale().as_str())
            .json(body)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let bytes = response.bytes().await.unwrap_or_default();
            let status = status.as_u16();

            return Err(match serde_json::from_slice::<ErrorBody>(&bytes) {
                Ok(ErrorBody {
                    message: Some(message),
                }) if !message.is_empty() => ClientError::Api { status, message },
                Ok(_) => ClientError::Http {
                    status,
                    message: format!("HTTP {status}"),
                },
                // Not JSON at all
                Err(_) => ClientError::Http {
                    status,
                    message: self.messages().unreadable.to_string(),
                },
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.network_error(e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Create an account; the server sends a verification email
    pub async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ClientError> {
        self.auth_post("/register", request).await
    }

    /// Exchange credentials for a token set without touching the token store
    pub async fn login_request(&self, request: &LoginRequest) -> Result<AuthTokens, ClientError> {
        self.auth_post("/login", request).await
    }

    pub async fn verify_email(&self, token: &str) -> Result<MessageResponse, ClientError> {
        let endpoint = format!("/verify-email?token={}", encode_query_value(token));
        self.auth_post(&endpoint, &serde_json::json!({})).await
    }

    pub async fn resend_verification(&self, email: &str) -> Result<MessageResponse, ClientError> {
        let request = EmailRequest {
            email: email.to_string(),
        };
        self.auth_post("/resend-verification", &request).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ClientError> {
        let request = EmailRequest {
            email: email.to_string(),
        };
        self.auth_post("/forgot-password", &request).await
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ClientError> {
        let request = ResetPasswordRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        self.auth_post("/reset-password", &request).await
    }

    /// Mint a new token set from a refresh token
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<AuthTokens, ClientError> {
        let request = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.auth_post("/refresh", &request).await
    }
}

/// Percent-encode a single query parameter value
pub(crate) fn encode_query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
