//! Fetch-on-activate state for a single view.
//!
//! A `Loader` never performs I/O itself. The app calls [`Loader::activate`]
//! when a view becomes current, runs the request on a task that carries the
//! returned [`Activation`], and feeds the outcome back through
//! [`Loader::resolve`]. Outcomes for an activation that is no longer live are
//! dropped, so a view that was left while its request was in flight never
//! receives the late result.

use tokio_util::sync::CancellationToken;

use crate::api::FetchError;
use crate::internal::models::LoadState;

/// Ticket handed to the task performing one fetch.
#[derive(Debug, Clone)]
pub struct Activation {
    pub id: u64,
    pub token: CancellationToken,
}

#[derive(Debug)]
pub struct Loader<T> {
    state: LoadState<T>,
    activation_id: u64,
    live: bool,
    token: CancellationToken,
}

impl<T> Loader<T> {
    pub fn new() -> Self {
        Self {
            state: LoadState::Idle,
            activation_id: 0,
            live: false,
            token: CancellationToken::new(),
        }
    }

    /// Start a fresh activation: cancel any previous one and reset to Loading.
    pub fn activate(&mut self) -> Activation {
        self.token.cancel();
        self.activation_id += 1;
        self.live = true;
        self.token = CancellationToken::new();
        self.state = LoadState::Loading;
        Activation {
            id: self.activation_id,
            token: self.token.clone(),
        }
    }

    /// Leave the view. The outstanding request is cancelled and its result,
    /// should it still arrive, is ignored.
    pub fn deactivate(&mut self) {
        self.token.cancel();
        self.live = false;
        self.state = LoadState::Idle;
    }

    /// True when `activation_id` is the live activation.
    pub fn is_current(&self, activation_id: u64) -> bool {
        self.live && self.activation_id == activation_id
    }

    /// Apply the outcome of a fetch. Returns false when it was discarded.
    pub fn resolve(&mut self, activation_id: u64, result: Result<Vec<T>, FetchError>) -> bool {
        if !self.is_current(activation_id) {
            tracing::debug!(
                activation_id,
                current = self.activation_id,
                "discarding stale fetch result"
            );
            return false;
        }
        // Success and Error are terminal for an activation.
        if !self.state.is_loading() {
            return false;
        }

        self.state = match result {
            Ok(items) => LoadState::Success(items),
            Err(e) => LoadState::Error(e.to_string()),
        };
        true
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn items(&self) -> &[T] {
        self.state.items()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    pub fn activation_id(&self) -> u64 {
        self.activation_id
    }

    /// Cancellation token of the live activation.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl<T> Default for Loader<T> {
    fn default() -> Self {
        Self::new()
    }
}
