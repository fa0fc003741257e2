//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// STORE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

/// Document collections
pub mod collections {
    pub const USERS: &str = "users";
    pub const PROBLEMS: &str = "problems";
    pub const SUBMISSIONS: &str = "submissions";
    pub const LEADERBOARD: &str = "leaderboard";
}

/// Maximum number of ids in a single "id in set" query
pub const MAX_IN_QUERY_IDS: usize = 30;

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default session token expiry in hours
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Lifetime of the OAuth `state` token in seconds
pub const OAUTH_STATE_TTL_SECS: i64 = 600;

/// GitHub OAuth endpoints
pub mod github {
    pub const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
    pub const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
    pub const API_BASE_URL: &str = "https://api.github.com";
    pub const SCOPES: &str = "read:user user:email";
    pub const USER_AGENT: &str = concat!("dailyboard/", env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// REVIEW & SCORING
// =============================================================================

/// Points awarded for an accepted solution
pub const BASE_SOLUTION_POINTS: f64 = 2.0;

/// Bonus points for a solution marked as optimized
pub const OPTIMIZATION_BONUS_POINTS: f64 = 1.0;

/// Points removed when a submission is rejected as plagiarized
pub const PLAGIARISM_PENALTY_POINTS: f64 = 5.0;

/// Attempts at a versioned leaderboard write before giving up
pub const LEADERBOARD_CAS_MAX_ATTEMPTS: u32 = 5;

/// Submission statuses
pub mod statuses {
    pub const PENDING: &str = "pending";
    pub const ACCEPTED: &str = "accepted";
    pub const REJECTED: &str = "rejected";
}

// =============================================================================
// LEADERBOARD
// =============================================================================

/// Entries shown on the home page preview
pub const DEFAULT_LEADERBOARD_PREVIEW_LIMIT: usize = 3;

/// Entries shown on the full leaderboard page
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 100;

/// Upper bound accepted from clients
pub const MAX_LEADERBOARD_LIMIT: usize = 500;

// =============================================================================
// PROBLEMS
// =============================================================================

/// Days covered by the problem archive
pub const ARCHIVE_WINDOW_DAYS: i64 = 30;

/// Calendar date format used for problem scheduling
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// USER ROLES
// =============================================================================

/// Role flags an admin can toggle
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const TECHTRONICA: &str = "techtronica";
}

// =============================================================================
// BADGES
// =============================================================================

/// Badge thresholds
pub mod badges {
    pub const SHORT_STREAK_DAYS: u32 = 7;
    pub const LONG_STREAK_DAYS: u32 = 30;
    pub const FEW_PROBLEMS: u32 = 10;
    pub const MANY_PROBLEMS: u32 = 50;
    pub const OPTIMIZER_SOLUTIONS: u32 = 5;
    pub const TOP_RANK: u32 = 10;
}

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Rate limiting configuration
pub mod rate_limits {
    /// Auth endpoint - max requests
    pub const AUTH_MAX_REQUESTS: i64 = 10;
    /// Auth endpoint - window in seconds
    pub const AUTH_WINDOW_SECS: i64 = 60;

    /// Submission endpoint - max requests
    pub const SUBMISSION_MAX_REQUESTS: i64 = 10;
    /// Submission endpoint - window in seconds
    pub const SUBMISSION_WINDOW_SECS: i64 = 60;

    /// Admin API - max requests (review queues are worked in bursts)
    pub const ADMIN_MAX_REQUESTS: i64 = 300;
    /// Admin API - window in seconds
    pub const ADMIN_WINDOW_SECS: i64 = 60;

    /// General API - max requests
    pub const GENERAL_MAX_REQUESTS: i64 = 120;
    /// General API - window in seconds
    pub const GENERAL_WINDOW_SECS: i64 = 60;
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum problem title length
pub const MAX_PROBLEM_TITLE_LENGTH: u64 = 256;

/// Maximum problem description length
pub const MAX_PROBLEM_DESCRIPTION_LENGTH: u64 = 65535;

/// Maximum problem category length
pub const MAX_PROBLEM_CATEGORY_LENGTH: u64 = 64;

/// Maximum pull request URL length
pub const MAX_PULL_REQUEST_URL_LENGTH: u64 = 512;

/// Largest accepted request body (problem descriptions are the biggest payload)
pub const MAX_REQUEST_BODY_BYTES: usize = 256 * 1024;

/// Digits of the current time used for fallback usernames
pub const FALLBACK_USERNAME_DIGITS: usize = 6;
