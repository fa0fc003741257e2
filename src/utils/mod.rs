//! Utility functions

pub mod crypto;
pub mod time;
pub mod validation;

pub use crypto::generate_nonce;
pub use time::{archive_start, format_date, parse_date, today_utc, week_start};
pub use validation::{sanitize_string, synthesize_username, validate_pull_request_url};
