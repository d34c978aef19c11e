//! Access/refresh token persistence

use crate::storage::{KeyValueStore, StorageError};
use crate::types::AuthTokens;
use std::fmt;
use std::sync::Arc;

const ACCESS_TOKEN_KEY: &str = "nsp_access_token";
const REFRESH_TOKEN_KEY: &str = "nsp_refresh_token";
const EXPIRES_AT_KEY: &str = "nsp_expires_at";

/// Tokens are treated as expired this long before their real expiry
pub const EXPIRY_MARGIN_MS: i64 = 30_000;

/// Source of wall-clock time in epoch milliseconds
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Clock backed by the system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// The tokens of the current session as persisted
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    /// Absolute expiry of the access token, epoch milliseconds
    pub expires_at: i64,
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Durable storage of the session's tokens and expiry.
///
/// Pure data access: nothing here talks to the network.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Persist a token set issued by the server, computing the absolute expiry
    pub fn save(&self, tokens: &AuthTokens) -> Result<(), StorageError> {
        let expires_at = self
            .clock
            .now_millis()
            .saturating_add(tokens.expires_in.saturating_mul(1000));

        self.storage.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        self.storage.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)?;
        self.storage.set(EXPIRES_AT_KEY, &expires_at.to_string())
    }

    pub fn access_token(&self) -> Option<String> {
        self.storage.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.storage.get(REFRESH_TOKEN_KEY)
    }

    /// Stored expiry, or `None` when absent or unparseable
    pub fn expires_at(&self) -> Option<i64> {
        self.storage
            .get(EXPIRES_AT_KEY)
            .and_then(|raw| raw.trim().parse().ok())
    }

    /// True when no expiry is stored or it falls within the safety margin
    pub fn is_expired(&self) -> bool {
        match self.expires_at() {
            Some(expires_at) => {
                self.clock.now_millis() >= expires_at.saturating_sub(EXPIRY_MARGIN_MS)
            }
            None => true,
        }
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(ACCESS_TOKEN_KEY)?;
        self.storage.remove(REFRESH_TOKEN_KEY)?;
        self.storage.remove(EXPIRES_AT_KEY)
    }

    pub fn has_session(&self) -> bool {
        self.access_token().is_some() && self.refresh_token().is_some()
    }

    /// All three values, if a complete session is stored
    pub fn snapshot(&self) -> Option<TokenSet> {
        Some(TokenSet {
            access_token: self.access_token()?,
            refresh_token: self.refresh_token()?,
            expires_at: self.expires_at()?,
        })
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("has_session", &self.has_session())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Clock that only moves when told to
    #[derive(Debug, Default)]
    struct ManualClock(AtomicI64);

    impl ManualClock {
        fn at(millis: i64) -> Arc<Self> {
            Arc::new(Self(AtomicI64::new(millis)))
        }

        fn advance(&self, millis: i64) {
            self.0.fetch_add(millis, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn tokens(expires_in: i64) -> AuthTokens {
        AuthTokens {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_in,
        }
    }

    fn store_at(millis: i64) -> (TokenStore, Arc<ManualClock>) {
        let clock = ManualClock::at(millis);
        let store = TokenStore::new(Arc::new(MemoryStore::new()), clock.clone());
        (store, clock)
    }

    #[test]
    fn test_empty_store_is_expired_without_session() {
        let (store, _) = store_at(0);
        assert!(store.is_expired());
        assert!(!store.has_session());
        assert_eq!(store.access_token(), None);
        assert_eq!(store.snapshot(), None);
    }

    #[test]
    fn test_save_computes_absolute_expiry() {
        let (store, _) = store_at(1_000_000);
        store.save(&tokens(900)).unwrap();

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.access_token, "access");
        assert_eq!(snapshot.refresh_token, "refresh");
        assert_eq!(snapshot.expires_at, 1_000_000 + 900_000);
        assert!(store.has_session());
    }

    #[test]
    fn test_expiry_margin() {
        let (store, clock) = store_at(0);
        store.save(&tokens(60)).unwrap();

        // 60s left
        assert!(!store.is_expired());

        // 31s left
        clock.advance(29_000);
        assert!(!store.is_expired());

        // exactly 30s left
        clock.advance(1_000);
        assert!(store.is_expired());

        // 10s left
        clock.advance(20_000);
        assert!(store.is_expired());
    }

    #[test]
    fn test_extreme_stored_expiry() {
        let storage = Arc::new(MemoryStore::new());
        let store = TokenStore::new(storage.clone(), ManualClock::at(1_000));

        storage.set(EXPIRES_AT_KEY, &i64::MIN.to_string()).unwrap();
        assert!(store.is_expired());

        storage.set(EXPIRES_AT_KEY, &i64::MAX.to_string()).unwrap();
        assert!(!store.is_expired());

        storage.set(EXPIRES_AT_KEY, "soon").unwrap();
        assert!(store.is_expired());
    }

    #[test]
    fn test_clear_removes_everything() {
        let (store, _) = store_at(0);
        store.save(&tokens(600)).unwrap();
        store.clear().unwrap();

        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);
        assert_eq!(store.expires_at(), None);
        assert!(store.is_expired());
    }

    #[test]
    fn test_session_requires_both_tokens() {
        let storage = Arc::new(MemoryStore::new());
        let store = TokenStore::new(storage.clone(), ManualClock::at(0));

        storage.set(ACCESS_TOKEN_KEY, "access").unwrap();
        assert!(!store.has_session());

        storage.set(REFRESH_TOKEN_KEY, "refresh").unwrap();
        assert!(store.has_session());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let set = TokenSet {
            access_token: "secret-access".to_string(),
            refresh_token: "secret-refresh".to_string(),
            expires_at: 42,
        };
        let rendered = format!("{set:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("42"));
    }
}
