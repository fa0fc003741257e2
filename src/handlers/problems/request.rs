//! Problem request DTOs

use serde::Deserialize;

use crate::models::ProblemWindow;

/// List problems query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListProblemsQuery {
    #[serde(default)]
    pub window: ProblemWindow,
}
