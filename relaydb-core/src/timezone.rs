//! Process timezone subsystem.
//!
//! Holds the single process-wide timezone that connection strings and
//! timestamps are rendered in. [`init`] must run before any dialect or
//! connection work.

use std::str::FromStr;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::{debug, info};

/// Timezone used when the configured name is empty.
pub const DEFAULT_TIMEZONE: Tz = Tz::UTC;

static CURRENT: Lazy<RwLock<Tz>> = Lazy::new(|| RwLock::new(DEFAULT_TIMEZONE));

/// The configured timezone name is not a known IANA zone.
#[derive(Debug, Error)]
#[error("invalid timezone '{name}': {reason}")]
pub struct TimezoneError {
    pub name: String,
    pub reason: String,
}

/// Parse `name` and install it as the process timezone.
///
/// Calling this again with the same name is a no-op; a different name
/// replaces the previous zone.
pub fn init(name: &str) -> Result<Tz, TimezoneError> {
    let tz = parse(name)?;

    let mut current = CURRENT.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    if *current == tz {
        debug!(timezone = %tz, "timezone already initialized");
    } else {
        *current = tz;
        info!(timezone = %tz, "timezone initialized");
    }

    Ok(tz)
}

/// Parse an IANA timezone name without installing it.
pub fn parse(name: &str) -> Result<Tz, TimezoneError> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(DEFAULT_TIMEZONE);
    }

    Tz::from_str(name).map_err(|reason| TimezoneError {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

/// The process timezone ([`DEFAULT_TIMEZONE`] until [`init`] runs).
pub fn current() -> Tz {
    *CURRENT.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Current wall-clock time in the process timezone.
pub fn now() -> DateTime<Tz> {
    Utc::now().with_timezone(&current())
}
