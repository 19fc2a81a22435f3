use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{validate_key, DraftError, DraftStore};

#[derive(Serialize, Deserialize)]
struct PersistedDraft<T> {
    value: T,
    last_saved: Option<DateTime<Utc>>,
}

/// State for one editing session with an explicit load/mutate/save lifecycle.
///
/// Every [`DraftSession::mutate`] marks the session dirty; [`DraftSession::mark_clean`]
/// clears the flag and records when the content was last saved.
#[derive(Debug, Clone)]
pub struct DraftSession<T> {
    key: String,
    value: T,
    dirty: bool,
    last_saved: Option<DateTime<Utc>>,
}

impl<T> DraftSession<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(key: impl Into<String>) -> Result<Self, DraftError> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self {
            key,
            value: T::default(),
            dirty: false,
            last_saved: None,
        })
    }

    /// Restore the session persisted under `key`, or start empty.
    pub fn load<S>(store: &S, key: impl Into<String>) -> Result<Self, DraftError>
    where
        S: DraftStore + ?Sized,
    {
        let mut session = Self::new(key)?;
        if let Some(contents) = store.read(&session.key)? {
            let persisted: PersistedDraft<T> = serde_json::from_str(&contents)?;
            session.value = persisted.value;
            session.last_saved = persisted.last_saved;
        }
        Ok(session)
    }

    /// Replace the content wholesale, e.g. after fetching it from the server.
    /// The new content is considered saved.
    pub fn load_value(&mut self, value: T) {
        self.value = value;
        self.dirty = false;
    }

    pub fn mutate<F, R>(&mut self, change: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        self.dirty = true;
        change(&mut self.value)
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
        self.last_saved = Some(Utc::now());
    }

    pub fn save<S>(&mut self, store: &S) -> Result<(), DraftError>
    where
        S: DraftStore + ?Sized,
    {
        let saved_at = Utc::now();
        let contents = serde_json::to_string_pretty(&PersistedDraft {
            value: &self.value,
            last_saved: Some(saved_at),
        })?;
        store.write(&self.key, &contents)?;
        self.dirty = false;
        self.last_saved = Some(saved_at);
        Ok(())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }
}
