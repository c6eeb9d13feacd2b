//! Client-side core for the recipe service: transport, auth, token storage,
//! and the sync controller that keeps a screen's recipe list reconciled.

pub mod auth;
pub mod controller;
pub mod error;
pub mod session;
pub mod transport;

pub use auth::AuthClient;
pub use controller::{ControllerEvent, EditSession, RecipeSyncController, SubmitOutcome};
pub use error::{AuthError, SessionError, SyncError, SyncErrorKind};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
pub use transport::{HttpRecipeService, RecipeService};

#[cfg(test)]
#[path = "tests/mock_service.rs"]
pub(crate) mod mock_service;
