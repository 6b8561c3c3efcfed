//! Shared type aliases used across the workspace.

/// Timestamp type used across the application. All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
