//! Error types for wizard operations

use thiserror::Error;

use crate::host::HostError;
use crate::models::{ModelError, PageKind};
use crate::validation::ValidationError;

/// Errors that can occur while driving the wizard
#[derive(Error, Debug)]
pub enum WizardError {
    /// A host collaborator call failed
    #[error(transparent)]
    Host(#[from] HostError),

    /// A model mutation broke an ordering invariant
    #[error(transparent)]
    Model(#[from] ModelError),

    /// User input was rejected
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// `start` was called a second time
    #[error("Page '{0}' has already been started")]
    AlreadyStarted(PageKind),

    /// The page was entered before `start`
    #[error("Page '{0}' has not been started")]
    NotStarted(PageKind),

    /// A selection referred to an item that is not in the current list
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Required input is missing
    #[error("Missing required input: {0}")]
    MissingInput(String),

    /// The import service reported an unsuccessful insert
    #[error("{0}")]
    ImportFailed(String),

    /// Navigation is not possible from the current page
    #[error("Invalid navigation: {0}")]
    InvalidNavigation(String),

    /// The import configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The wizard has not been opened
    #[error("Wizard is not open")]
    NotOpen,
}

/// Result type for wizard operations
pub type WizardResult<T> = Result<T, WizardError>;

impl WizardError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            WizardError::Validation(ValidationError::Duplicate(name)) => {
                format!(
                    "A table named '{name}' already exists.\n\nHint: Choose a different table name."
                )
            }
            WizardError::Validation(ValidationError::Empty(field)) => {
                format!("The {field} is required.")
            }
            WizardError::MissingInput(field) => {
                format!("Please provide the {field} before continuing.")
            }
            WizardError::Host(HostError::Connection(msg)) => {
                format!(
                    "Could not reach the server: {msg}\n\nHint: Check that the connection is still open."
                )
            }
            _ => self.to_string(),
        }
    }

    /// Whether the error blocks navigation without indicating a fault
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WizardError::Validation(_) | WizardError::MissingInput(_)
        )
    }
}
