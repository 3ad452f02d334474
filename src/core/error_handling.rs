//! Error classification shared by all bridge error types
//!
//! Every module error distinguishes conditions a user can fix (bad config,
//! malformed registration) from environmental ones (plugin frame missing,
//! transport closed) so the CLI can report them at the right level.

/// Errors that know whether they carry a user-actionable message.
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    /// True if the error text should be shown to the user verbatim
    fn is_user_actionable(&self) -> bool;

    /// The message to show when the error is user-actionable
    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error with the amount of detail its classification allows.
///
/// User-actionable errors print their own message; system errors print the
/// operation context and leave the detail to debug level.
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
