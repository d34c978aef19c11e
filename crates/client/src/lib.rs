//! Typed client for the Next Step climbing school booking API
//!
//! The interesting part of this crate is the request path in [`client`]:
//! every authenticated call resolves a bearer token from the [`token`]
//! store, refreshes it when it is about to expire (sharing a single
//! in-flight refresh between concurrent callers), retries once after a
//! `401`, and maps failures to display-ready [`ClientError`] messages.

pub mod calendar;
pub mod client;
pub mod error;
pub mod locale;
pub mod oauth;
pub mod redirect;
pub mod storage;
pub mod token;
pub mod types;

pub use client::{NextStepClient, NextStepClientBuilder, SessionExpiredHandler};
pub use error::ClientError;
pub use locale::Locale;
pub use redirect::RedirectStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use token::{Clock, SystemClock, TokenSet, TokenStore};
