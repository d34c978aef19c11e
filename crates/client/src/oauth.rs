//! Google sign-in redirect flow
//!
//! The browser is sent to the server's authorization endpoint; after the
//! provider round-trip the server redirects back with the token set in the
//! query string. Those parameters are read once and stripped from the URL.

use crate::client::NextStepClient;
use crate::error::ClientError;
use crate::types::{AuthTokens, User};
use url::Url;

pub const GOOGLE_AUTHORIZATION_PATH: &str = "/oauth2/authorization/google";

const ACCESS_TOKEN_PARAM: &str = "accessToken";
const REFRESH_TOKEN_PARAM: &str = "refreshToken";
const EXPIRES_IN_PARAM: &str = "expiresIn";

/// Parsed callback: the token set and the URL without token parameters
#[derive(Debug, Clone)]
pub struct OAuthCallback {
    pub tokens: AuthTokens,
    pub clean_url: Url,
}

/// Extract the token set from a callback URL
pub fn parse_callback(callback_url: &str) -> Result<OAuthCallback, ClientError> {
    let mut url = Url::parse(callback_url)
        .map_err(|e| ClientError::InvalidCallback(format!("malformed URL: {e}")))?;

    let mut access_token = None;
    let mut refresh_token = None;
    let mut expires_in = None;
    let mut kept = Vec::new();

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            ACCESS_TOKEN_PARAM => access_token = Some(value.into_owned()),
            REFRESH_TOKEN_PARAM => refresh_token = Some(value.into_owned()),
            EXPIRES_IN_PARAM => expires_in = Some(value.into_owned()),
            _ => kept.push((key.into_owned(), value.into_owned())),
        }
    }

    let missing = |name: &str| ClientError::InvalidCallback(format!("missing {name}"));
    let access_token = access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| missing(ACCESS_TOKEN_PARAM))?;
    let refresh_token = refresh_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| missing(REFRESH_TOKEN_PARAM))?;
    let expires_in = expires_in
        .filter(|t| !t.is_empty())
        .ok_or_else(|| missing(EXPIRES_IN_PARAM))?
        .parse::<i64>()
        .map_err(|e| ClientError::InvalidCallback(format!("invalid {EXPIRES_IN_PARAM}: {e}")))?;

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    Ok(OAuthCallback {
        tokens: AuthTokens {
            access_token,
            refresh_token,
            expires_in,
        },
        clean_url: url,
    })
}

impl NextStepClient {
    /// Where to send the user to start Google sign-in
    pub fn oauth_authorization_url(&self) -> String {
        format!("{}{GOOGLE_AUTHORIZATION_PATH}", self.base_url())
    }

    /// Finish the redirect flow: store the tokens, load the profile, and
    /// take the path saved before sign-in started.
    pub async fn complete_oauth(
        &self,
        callback_url: &str,
    ) -> Result<(User, Option<String>), ClientError> {
        let callback = parse_callback(callback_url)?;
        let user = self.login_with_tokens(&callback.tokens).await?;
        let redirect = self.redirects().consume()?;
        Ok((user, redirect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_strip() {
        let callback = parse_callback(
            "https://booking.example.com/oauth-callback?accessToken=a.b.c&refreshToken=r-1&expiresIn=900",
        )
        .unwrap();

        assert_eq!(callback.tokens.access_token, "a.b.c");
        assert_eq!(callback.tokens.refresh_token, "r-1");
        assert_eq!(callback.tokens.expires_in, 900);
        assert_eq!(
            callback.clean_url.as_str(),
            "https://booking.example.com/oauth-callback"
        );
    }

    #[test]
    fn test_unrelated_params_survive() {
        let callback = parse_callback(
            "https://booking.example.com/oauth-callback?lang=en&accessToken=a&refreshToken=r&expiresIn=60",
        )
        .unwrap();

        assert_eq!(
            callback.clean_url.as_str(),
            "https://booking.example.com/oauth-callback?lang=en"
        );
    }

    #[test]
    fn test_missing_parameter_is_rejected() {
        let err = parse_callback("https://booking.example.com/oauth-callback?accessToken=a&expiresIn=60")
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidCallback(_)));
        assert!(err.to_string().contains(REFRESH_TOKEN_PARAM));
    }

    #[test]
    fn test_non_numeric_lifetime_is_rejected() {
        let err = parse_callback(
            "https://booking.example.com/oauth-callback?accessToken=a&refreshToken=r&expiresIn=soon",
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::InvalidCallback(_)));
    }

    #[test]
    fn test_authorization_url() {
        let client = NextStepClient::new("https://booking.example.com/").unwrap();
        assert_eq!(
            client.oauth_authorization_url(),
            "https://booking.example.com/oauth2/authorization/google"
        );
    }
}
