//! Recipe list state for one screen, kept in step with the remote service.
//!
//! The controller owns the ordered recipe collection and the optional edit
//! session. Every remote call goes through it, and every local mutation
//! happens inside it, never across an await point. Callers read cloned
//! snapshots and learn about changes from [`ControllerEvent`]s.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use shared::domain::{Recipe, RecipeDraft, RecipeId};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{error::SyncError, transport::RecipeService};

/// The record the form is editing, plus its draft fields. Create mode is
/// the absence of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub editing_id: RecipeId,
    pub draft: RecipeDraft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Recipe),
    Updated(RecipeId),
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    CollectionChanged,
    EditSessionChanged,
    RefreshingChanged(bool),
    Saved(SubmitOutcome),
    Deleted(RecipeId),
    /// A follow-up refresh failed after an otherwise successful operation.
    Failed(SyncError),
}

#[derive(Default)]
struct ControllerState {
    recipes: Vec<Recipe>,
    edit_session: Option<EditSession>,
    issued_refreshes: u64,
    applied_refresh: u64,
}

pub struct RecipeSyncController {
    service: Arc<dyn RecipeService>,
    inner: Mutex<ControllerState>,
    refreshes_in_flight: AtomicUsize,
    events: broadcast::Sender<ControllerEvent>,
}

/// Counts one refresh as in flight until dropped, including when the
/// refresh future itself is dropped mid-await.
struct InFlightRefresh<'a> {
    controller: &'a RecipeSyncController,
}

impl<'a> InFlightRefresh<'a> {
    fn start(controller: &'a RecipeSyncController) -> Self {
        if controller.refreshes_in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            controller.emit(ControllerEvent::RefreshingChanged(true));
        }
        Self { controller }
    }
}

impl Drop for InFlightRefresh<'_> {
    fn drop(&mut self) {
        if self
            .controller
            .refreshes_in_flight
            .fetch_sub(1, Ordering::SeqCst)
            == 1
        {
            self.controller
                .emit(ControllerEvent::RefreshingChanged(false));
        }
    }
}

impl RecipeSyncController {
    pub fn new(service: Arc<dyn RecipeService>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            service,
            inner: Mutex::new(ControllerState::default()),
            refreshes_in_flight: AtomicUsize::new(0),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn recipes(&self) -> Vec<Recipe> {
        self.inner.lock().await.recipes.clone()
    }

    pub async fn edit_session(&self) -> Option<EditSession> {
        self.inner.lock().await.edit_session.clone()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshes_in_flight.load(Ordering::SeqCst) > 0
    }

    /// Replaces the local collection with the service's current one.
    ///
    /// A response is dropped when a refresh issued after it has already been
    /// applied. On failure the collection is left as it was.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        let in_flight = InFlightRefresh::start(self);
        let generation = {
            let mut state = self.inner.lock().await;
            state.issued_refreshes += 1;
            state.issued_refreshes
        };
        debug!(generation, "recipes: refresh issued");

        let result = self.service.list_recipes().await;

        let applied = {
            let mut state = self.inner.lock().await;
            match result {
                Ok(recipes) if generation > state.applied_refresh => {
                    state.applied_refresh = generation;
                    state.recipes = recipes;
                    Ok(Some(state.recipes.len()))
                }
                Ok(_) => Ok(None),
                Err(err) => Err(err),
            }
        };
        drop(in_flight);

        match applied {
            Ok(Some(count)) => {
                info!(generation, count, "recipes: collection replaced");
                self.emit(ControllerEvent::CollectionChanged);
                Ok(())
            }
            Ok(None) => {
                debug!(generation, "recipes: stale refresh response dropped");
                Ok(())
            }
            Err(err) => {
                warn!(generation, error = %err, "recipes: refresh failed");
                Err(SyncError::fetch(&err))
            }
        }
    }

    /// Creates a recipe, or updates the one being edited.
    ///
    /// A created record is appended locally right away and stays there until
    /// the follow-up refresh replaces the collection, even if that refresh
    /// fails.
    pub async fn submit(&self, draft: RecipeDraft) -> Result<SubmitOutcome, SyncError> {
        if !draft.is_complete() {
            return Err(SyncError::validation());
        }

        let editing_id = self
            .inner
            .lock()
            .await
            .edit_session
            .as_ref()
            .map(|session| session.editing_id.clone());

        let outcome = match editing_id {
            Some(id) => {
                self.service
                    .update_recipe(&id, &draft)
                    .await
                    .map_err(|err| {
                        warn!(recipe_id = %id, error = %err, "recipes: update failed");
                        SyncError::save(&err)
                    })?;
                let cleared = {
                    let mut state = self.inner.lock().await;
                    // A session begun for another record while the update was
                    // in flight stays open.
                    let same_record = state
                        .edit_session
                        .as_ref()
                        .is_some_and(|session| session.editing_id == id);
                    if same_record {
                        state.edit_session = None;
                    }
                    same_record
                };
                if cleared {
                    self.emit(ControllerEvent::EditSessionChanged);
                }
                info!(recipe_id = %id, "recipes: updated");
                SubmitOutcome::Updated(id)
            }
            None => {
                let created = self.service.create_recipe(&draft).await.map_err(|err| {
                    warn!(error = %err, "recipes: create failed");
                    SyncError::save(&err)
                })?;
                self.inner.lock().await.recipes.push(created.clone());
                info!(recipe_id = %created.id, "recipes: created, appended locally");
                self.emit(ControllerEvent::CollectionChanged);
                SubmitOutcome::Created(created)
            }
        };

        self.emit(ControllerEvent::Saved(outcome.clone()));
        self.reconcile().await;
        Ok(outcome)
    }

    /// Opens an edit session for a record currently shown in the collection.
    pub async fn begin_edit(&self, id: &RecipeId) -> Result<EditSession, SyncError> {
        let session = {
            let mut state = self.inner.lock().await;
            let recipe = state
                .recipes
                .iter()
                .find(|recipe| &recipe.id == id)
                .ok_or_else(|| SyncError::UnknownRecipe(id.clone()))?;
            let session = EditSession {
                editing_id: recipe.id.clone(),
                draft: recipe.draft(),
            };
            state.edit_session = Some(session.clone());
            session
        };
        debug!(recipe_id = %id, "recipes: edit session opened");
        self.emit(ControllerEvent::EditSessionChanged);
        Ok(session)
    }

    pub async fn cancel_edit(&self) {
        let had_session = self.inner.lock().await.edit_session.take().is_some();
        if had_session {
            debug!("recipes: edit session cancelled");
            self.emit(ControllerEvent::EditSessionChanged);
        }
    }

    pub async fn remove(&self, id: &RecipeId) -> Result<(), SyncError> {
        self.service.delete_recipe(id).await.map_err(|err| {
            warn!(recipe_id = %id, error = %err, "recipes: delete failed");
            SyncError::delete(&err)
        })?;

        let removed = {
            let mut state = self.inner.lock().await;
            match state.recipes.iter().position(|recipe| &recipe.id == id) {
                Some(index) => {
                    state.recipes.remove(index);
                    true
                }
                None => false,
            }
        };
        info!(recipe_id = %id, removed, "recipes: deleted");
        if removed {
            self.emit(ControllerEvent::CollectionChanged);
        }
        self.emit(ControllerEvent::Deleted(id.clone()));
        self.reconcile().await;
        Ok(())
    }

    async fn reconcile(&self) {
        if let Err(err) = self.refresh().await {
            self.emit(ControllerEvent::Failed(err));
        }
    }

    fn emit(&self, event: ControllerEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
