//! relaydb-core: settings and process timezone
//!
//! The store crate consumes [`Settings`] as read-only input to connection
//! bootstrap and calls [`timezone::init`] before resolving a dialect.

pub mod config;
pub mod error;
pub mod timezone;

pub use config::{DatabaseSettings, RunMode, ServerSettings, Settings};
pub use error::{CoreError, Result};
pub use timezone::TimezoneError;
