use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use quiz_core::{SessionSettings, SessionState};

use crate::error::EngineError;

/// Identifies one learner's session on one topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub user_id: String,
    pub topic: String,
}

impl SessionKey {
    #[must_use]
    pub fn new(user_id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            topic: topic.into(),
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.topic)
    }
}

/// In-memory session registry with one lock per session.
///
/// The registry lock is held only to look up or insert an entry, so
/// operations on different sessions never wait on each other.
#[derive(Clone)]
pub struct SessionStore {
    defaults: SessionSettings,
    sessions: Arc<Mutex<HashMap<SessionKey, Arc<Mutex<SessionState>>>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(defaults: SessionSettings) -> Self {
        Self {
            defaults,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn entry(&self, key: &SessionKey) -> Result<Arc<Mutex<SessionState>>, EngineError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| EngineError::LockPoisoned)?;
        let entry = sessions
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(SessionState::new(self.defaults))));
        Ok(Arc::clone(entry))
    }

    /// Run `f` against the session for `key` under its lock, creating the
    /// session with default settings on first use.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::LockPoisoned` if a previous holder panicked, or
    /// whatever `f` returns.
    pub fn with_session<T>(
        &self,
        key: &SessionKey,
        f: impl FnOnce(&mut SessionState) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let entry = self.entry(key)?;
        let mut state = entry.lock().map_err(|_| EngineError::LockPoisoned)?;
        f(&mut state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_are_created_lazily_with_defaults() {
        let defaults = SessionSettings {
            time_limit_secs: 60,
            max_questions: 3,
        };
        let store = SessionStore::new(defaults);
        let key = SessionKey::new("u1", "inheritance oops");
        let settings = store
            .with_session(&key, |state| Ok(state.settings()))
            .unwrap();
        assert_eq!(settings, defaults);
    }

    #[test]
    fn keys_isolate_users_and_topics() {
        let store = SessionStore::new(SessionSettings::default());
        let a = SessionKey::new("u1", "t");
        let b = SessionKey::new("u2", "t");
        let c = SessionKey::new("u1", "other");

        store
            .with_session(&a, |state| {
                state.reset(SessionSettings {
                    time_limit_secs: 5,
                    max_questions: 1,
                });
                Ok(())
            })
            .unwrap();

        for key in [&b, &c] {
            let settings = store
                .with_session(key, |state| Ok(state.settings()))
                .unwrap();
            assert_eq!(settings, SessionSettings::default());
        }
        let kept = store
            .with_session(&a, |state| Ok(state.settings()))
            .unwrap();
        assert_eq!(kept.max_questions, 1);
    }

    #[test]
    fn closure_errors_pass_through() {
        let store = SessionStore::new(SessionSettings::default());
        let key = SessionKey::new("u", "t");
        let err = store
            .with_session(&key, |_| Err::<(), _>(EngineError::PoolExhausted))
            .unwrap_err();
        assert!(matches!(err, EngineError::PoolExhausted));
    }

    #[test]
    fn key_displays_user_and_topic() {
        assert_eq!(SessionKey::new("alice", "oop").to_string(), "alice/oop");
    }
}
