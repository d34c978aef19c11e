//! Request and response bodies of the booking API
//!
//! Field names follow the server's camelCase JSON.

pub mod admin;
pub mod auth;
pub mod calendar;
pub mod reservation;
pub mod user;

pub use admin::*;
pub use auth::*;
pub use calendar::*;
pub use reservation::*;
pub use user::*;

use serde::Deserialize;

/// Error body returned by the server for failed requests; only the message is used
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
