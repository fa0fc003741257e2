//! User request DTOs

use serde::Deserialize;

/// Username path segment
#[derive(Debug, Deserialize)]
pub struct UsernamePath {
    pub username: String,
}
