use shared::{domain::RecipeId, error::ServiceError};
use thiserror::Error;

pub const FETCH_FALLBACK: &str = "Failed to fetch recipes.";
pub const SAVE_FALLBACK: &str = "Failed to save recipe.";
pub const DELETE_FALLBACK: &str = "Failed to delete recipe.";
pub const VALIDATION_MESSAGE: &str = "Name, ingredients, and steps are required.";
pub const LOGIN_FALLBACK: &str = "Login failed. Please check your credentials.";
pub const REGISTER_FALLBACK: &str = "Registration failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncErrorKind {
    Fetch,
    Validation,
    Save,
    Delete,
    UnknownRecipe,
}

/// Failure of a controller operation, carrying the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("{message}")]
    Fetch { message: String },
    #[error("{message}")]
    Validation { message: String },
    #[error("{message}")]
    Save { message: String },
    #[error("{message}")]
    Delete { message: String },
    #[error("recipe {0} is not in the local collection")]
    UnknownRecipe(RecipeId),
}

impl SyncError {
    pub fn fetch(source: &ServiceError) -> Self {
        Self::Fetch {
            message: user_message(source, FETCH_FALLBACK),
        }
    }

    pub fn save(source: &ServiceError) -> Self {
        Self::Save {
            message: user_message(source, SAVE_FALLBACK),
        }
    }

    pub fn delete(source: &ServiceError) -> Self {
        Self::Delete {
            message: user_message(source, DELETE_FALLBACK),
        }
    }

    pub fn validation() -> Self {
        Self::Validation {
            message: VALIDATION_MESSAGE.to_string(),
        }
    }

    pub fn kind(&self) -> SyncErrorKind {
        match self {
            SyncError::Fetch { .. } => SyncErrorKind::Fetch,
            SyncError::Validation { .. } => SyncErrorKind::Validation,
            SyncError::Save { .. } => SyncErrorKind::Save,
            SyncError::Delete { .. } => SyncErrorKind::Delete,
            SyncError::UnknownRecipe(_) => SyncErrorKind::UnknownRecipe,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{message}")]
    Login { message: String },
    #[error("{message}")]
    Register { message: String },
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file {}: {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Service-provided text when the service sent one, the fallback otherwise.
pub(crate) fn user_message(source: &ServiceError, fallback: &str) -> String {
    source
        .service_message()
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}
