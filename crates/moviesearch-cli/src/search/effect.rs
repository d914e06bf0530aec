//! Effects requested by coordinator transitions.

/// Message shown when a resolved search has no results.
pub const NO_RESULTS_MESSAGE: &str = "No movies found for your request.";

/// Message shown when a search fails.
pub const FETCH_FAILED_MESSAGE: &str = "An error occurred while fetching movies.";

/// Message shown when the user submits a blank query.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter your search query.";

/// Identifies one fetch: a trimmed, non-empty query and a 1-based page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    /// Search query.
    pub query: String,
    /// Result page.
    pub page: u32,
}

impl QueryKey {
    /// Creates a key.
    pub fn new(query: impl Into<String>, page: u32) -> Self {
        Self {
            query: query.into(),
            page,
        }
    }
}

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Neutral information.
    Info,
    /// User input problem.
    Warning,
    /// Failed operation.
    Error,
}

/// A transient, auto-dismissing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Notification {
    /// Creates an info notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    /// Creates a warning notification.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    /// Creates an error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Side effect produced on entry to a coordinator state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue one fetch for the key.
    Fetch(QueryKey),
    /// Show a transient notification.
    Notify(Notification),
}
