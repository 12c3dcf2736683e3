//! Session registry: maps session id to owning session under one lock.

use std::collections::HashMap;
use std::sync::Mutex;

use sessionlink_core::Session;
use thiserror::Error;

/// Errors raised by [`SessionRegistry`] mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// `add` was called with an id already present.
    #[error("session already exists: {0}")]
    AlreadyExists(i64),

    /// `remove`/`get` was called with an id not present.
    #[error("session not found: {0}")]
    NotFound(i64),
}

/// Maps session id to session, serialized under one mutex.
pub struct SessionRegistry<I> {
    sessions: Mutex<HashMap<i64, Session<I>>>,
}

impl<I> SessionRegistry<I> {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { sessions: Mutex::new(HashMap::new()) }
    }

    /// Number of sessions currently registered.
    #[must_use]
    pub fn size(&self) -> usize {
        self.sessions.lock().expect("registry mutex poisoned").len()
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn has(&self, id: i64) -> bool {
        self.sessions.lock().expect("registry mutex poisoned").contains_key(&id)
    }

    /// Insert `session`.
    ///
    /// # Errors
    /// [`RegistryError::AlreadyExists`] if `session.id` is already present.
    pub fn add(&self, session: Session<I>) -> Result<(), RegistryError> {
        let mut sessions = self.sessions.lock().expect("registry mutex poisoned");
        if sessions.contains_key(&session.id) {
            return Err(RegistryError::AlreadyExists(session.id));
        }
        sessions.insert(session.id, session);
        Ok(())
    }

    /// Remove and return the session with `id`.
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if absent.
    pub fn remove(&self, id: i64) -> Result<Session<I>, RegistryError> {
        self.sessions
            .lock()
            .expect("registry mutex poisoned")
            .remove(&id)
            .ok_or(RegistryError::NotFound(id))
    }

    /// Run `f` with exclusive access to the session at `id`.
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if absent.
    pub fn with_session<R>(
        &self,
        id: i64,
        f: impl FnOnce(&mut Session<I>) -> R,
    ) -> Result<R, RegistryError> {
        let mut sessions = self.sessions.lock().expect("registry mutex poisoned");
        let session = sessions.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        Ok(f(session))
    }

    /// Remove and return the ids of every session for which `is_idle`
    /// returns true.
    pub fn reap_idle(&self, is_idle: impl Fn(&Session<I>) -> bool) -> Vec<i64> {
        let mut sessions = self.sessions.lock().expect("registry mutex poisoned");
        let idle_ids: Vec<i64> =
            sessions.iter().filter(|(_, session)| is_idle(session)).map(|(id, _)| *id).collect();
        for id in &idle_ids {
            sessions.remove(id);
        }
        idle_ids
    }
}

impl<I> Default for SessionRegistry<I> {
    fn default() -> Self {
        Self::new()
    }
}
