//! Access token renewal
//!
//! At most one refresh request is outstanding per client. Callers that need
//! a token while a refresh is running await the same shared future instead
//! of sending their own.

use super::NextStepClient;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

type PendingRefresh = Shared<BoxFuture<'static, Option<String>>>;

/// Holder of the in-flight refresh, if any
#[derive(Default)]
pub(crate) struct RefreshSlot {
    pending: Mutex<Option<PendingRefresh>>,
}

impl RefreshSlot {
    /// Join the pending refresh, or install the one produced by `start`
    fn join_or_start(&self, start: impl FnOnce() -> PendingRefresh) -> PendingRefresh {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        match pending.as_ref() {
            Some(refresh) => refresh.clone(),
            None => {
                let refresh = start();
                *pending = Some(refresh.clone());
                refresh
            }
        }
    }

    /// Drop `finished` from the slot unless a newer refresh replaced it
    fn release(&self, finished: &PendingRefresh) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending
            .as_ref()
            .is_some_and(|current| current.ptr_eq(finished))
        {
            *pending = None;
        }
    }

    #[cfg(test)]
    fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl NextStepClient {
    /// Produce a usable access token, refreshing it first if it is expired.
    ///
    /// Returns `None` when there is no session or it could not be renewed;
    /// the request then goes out unauthenticated.
    pub async fn ensure_valid_token(&self) -> Option<String> {
        let access_token = self.inner.tokens.access_token()?;

        if !self.inner.tokens.is_expired() {
            return Some(access_token);
        }

        debug!("Access token expired or about to expire");
        self.refresh_shared().await
    }

    /// Run a refresh, joining the one already in flight if there is one
    pub(crate) async fn refresh_shared(&self) -> Option<String> {
        let refresh = self.inner.refresh.join_or_start(|| {
            let client = self.clone();
            async move { client.do_refresh().await }.boxed().shared()
        });

        let result = refresh.clone().await;
        self.inner.refresh.release(&refresh);
        result
    }

    /// Exchange the stored refresh token for a new token set.
    ///
    /// Any failure drops the session and notifies the session-expired handler.
    async fn do_refresh(&self) -> Option<String> {
        let Some(refresh_token) = self.inner.tokens.refresh_token() else {
            info!("No refresh token stored, ending session");
            self.expire_session();
            return None;
        };

        debug!("Refreshing access token");
        match self.refresh_tokens(&refresh_token).await {
            Ok(tokens) => {
                if let Err(e) = self.inner.tokens.save(&tokens) {
                    warn!(error = %e, "Failed to persist refreshed tokens");
                }
                debug!(expires_in = tokens.expires_in, "Access token refreshed");
                Some(tokens.access_token)
            }
            Err(e) => {
                info!(error = %e, "Token refresh rejected, ending session");
                self.expire_session();
                None
            }
        }
    }

    /// Clear stored tokens and raise the session-expired signal
    fn expire_session(&self) {
        self.drop_tokens_quietly();

        if let Some(handler) = &self.inner.on_session_expired {
            handler();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future;

    fn ready(value: Option<&str>) -> PendingRefresh {
        future::ready(value.map(str::to_string)).boxed().shared()
    }

    #[tokio::test]
    async fn test_join_reuses_pending_refresh() {
        let slot = RefreshSlot::default();
        let first = slot.join_or_start(|| ready(Some("a")));
        let second = slot.join_or_start(|| panic!("a second refresh must not start"));

        assert!(first.ptr_eq(&second));
        assert_eq!(second.await.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_release_clears_only_matching_refresh() {
        let slot = RefreshSlot::default();
        let stale = ready(None);
        let current = slot.join_or_start(|| ready(Some("b")));

        slot.release(&stale);
        assert!(slot.is_pending());

        slot.release(&current);
        assert!(!slot.is_pending());
    }
}
