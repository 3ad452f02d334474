//! Application error types

use crate::app::config::ConfigError;
use crate::core::error_handling::ContextualError;
use crate::listeners::api::ListenerError;
use crate::plugin::api::PluginError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("{message}")]
    InvalidPayload { message: String },

    #[error("Could not start logging: {message}")]
    Logging { message: String },
}

pub type AppResult<T> = Result<T, AppError>;

impl ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        match self {
            AppError::Config(error) => error.is_user_actionable(),
            AppError::Plugin(error) => error.is_user_actionable(),
            AppError::Listener(error) => error.is_user_actionable(),
            AppError::InvalidPayload { .. } => true,
            AppError::Logging { .. } => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            AppError::Config(error) => error.user_message(),
            AppError::Plugin(error) => error.user_message(),
            AppError::Listener(error) => error.user_message(),
            AppError::InvalidPayload { message } => Some(message),
            AppError::Logging { .. } => None,
        }
    }
}
