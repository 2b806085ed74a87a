//! In-memory session table keyed by user.
//!
//! Entries live for the lifetime of the process; there is no eviction.
//! Each user's session sits behind its own mutex so events for different
//! users never wait on each other beyond the brief map lookup.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::dialogue::{Session, Step};
use crate::events::UserId;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, user_id: UserId) -> Arc<Mutex<Session>> {
        let mut sessions = lock(&self.sessions);
        Arc::clone(sessions.entry(user_id).or_default())
    }

    /// Snapshot of the user's session, creating an idle one if needed
    pub fn get(&self, user_id: UserId) -> Session {
        let entry = self.entry(user_id);
        let session = lock(&entry);
        session.clone()
    }

    pub fn set_step(&self, user_id: UserId, step: Step) {
        self.with_session(user_id, |session| session.step = step);
    }

    /// Return the user to idle. The listing is left untouched.
    pub fn clear_step(&self, user_id: UserId) {
        self.set_step(user_id, Step::Idle);
    }

    /// Run `f` with exclusive access to the user's session
    pub fn with_session<R>(&self, user_id: UserId, f: impl FnOnce(&mut Session) -> R) -> R {
        let entry = self.entry(user_id);
        let mut session = lock(&entry);
        f(&mut *session)
    }

    pub fn len(&self) -> usize {
        lock(&self.sessions).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
