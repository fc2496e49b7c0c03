//! Current-state slot and named sessions on top of a key-value store

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::application::error_ext::{JsonResultExt, StoreResultExt};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainError, SavedState, Structures};
use crate::infrastructure::traits::KeyValueStore;

pub const CURRENT_STATE_KEY: &str = "ds_current_state";
pub const SESSIONS_KEY: &str = "ds_sessions";

/// Stored value of one named session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub data: SavedState,
    pub timestamp: DateTime<Utc>,
}

/// Directory entry: name and time only, no data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub name: String,
    pub timestamp: DateTime<Utc>,
}

pub struct PersistenceService {
    store: Arc<dyn KeyValueStore>,
}

impl PersistenceService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Overwrite the current-state slot.
    #[instrument(level = "debug", skip_all)]
    pub fn save_current(&self, structures: &Structures) -> ApplicationResult<()> {
        let value = serde_json::to_value(SavedState::capture(structures))
            .with_json_context("serialize current state")?;
        self.store
            .set(CURRENT_STATE_KEY, &value)
            .with_key_context("save current state", CURRENT_STATE_KEY)
    }

    /// Load the current-state slot, strictly.
    pub fn try_load_current(&self) -> ApplicationResult<Option<Structures>> {
        let Some(value) = self
            .store
            .get(CURRENT_STATE_KEY)
            .with_key_context("load current state", CURRENT_STATE_KEY)?
        else {
            return Ok(None);
        };
        let state: SavedState = from_stored(value).with_json_context("parse current state")?;
        Ok(Some(state.restore()?))
    }

    /// Load the current-state slot; any failure reads as "nothing saved".
    pub fn load_current(&self) -> Structures {
        match self.try_load_current() {
            Ok(Some(structures)) => structures,
            Ok(None) => Structures::new(),
            Err(e) => {
                warn!("load_current: falling back to empty structures: {}", e);
                Structures::new()
            }
        }
    }

    /// Save (or overwrite) a named session.
    #[instrument(level = "debug", skip(self, structures))]
    pub fn save_session(
        &self,
        name: &str,
        structures: &Structures,
    ) -> ApplicationResult<SessionSummary> {
        let name = session_name(name)?;
        let mut sessions = self.read_sessions()?;
        let record = SessionRecord {
            data: SavedState::capture(structures),
            timestamp: Utc::now(),
        };
        let summary = SessionSummary {
            name: name.to_string(),
            timestamp: record.timestamp,
        };
        sessions.insert(name.to_string(), record);
        self.write_sessions(&sessions)?;
        debug!("save_session: {} sessions stored", sessions.len());
        Ok(summary)
    }

    /// Rebuild all five structures from a named session.
    ///
    /// Either every structure is restored or the error is returned; the
    /// caller swaps the result in as a whole.
    #[instrument(level = "debug", skip(self))]
    pub fn load_session(&self, name: &str) -> ApplicationResult<Structures> {
        let name = session_name(name)?;
        let sessions = self.read_sessions()?;
        let record = sessions
            .get(name)
            .ok_or_else(|| ApplicationError::SessionNotFound(name.to_string()))?;
        Ok(record.data.restore()?)
    }

    /// Remove a named session. Returns whether it existed.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_session(&self, name: &str) -> ApplicationResult<bool> {
        let name = session_name(name)?;
        let mut sessions = self.read_sessions()?;
        let existed = sessions.remove(name).is_some();
        if existed {
            self.write_sessions(&sessions)?;
        }
        Ok(existed)
    }

    /// Session names with timestamps, sorted by name.
    pub fn list_sessions(&self) -> ApplicationResult<Vec<SessionSummary>> {
        Ok(self
            .read_sessions()?
            .into_iter()
            .map(|(name, record)| SessionSummary {
                name,
                timestamp: record.timestamp,
            })
            .collect())
    }

    fn read_sessions(&self) -> ApplicationResult<BTreeMap<String, SessionRecord>> {
        match self
            .store
            .get(SESSIONS_KEY)
            .with_key_context("read sessions", SESSIONS_KEY)?
        {
            Some(value) => from_stored(value).with_json_context("parse sessions"),
            None => Ok(BTreeMap::new()),
        }
    }

    fn write_sessions(&self, sessions: &BTreeMap<String, SessionRecord>) -> ApplicationResult<()> {
        let value = serde_json::to_value(sessions).with_json_context("serialize sessions")?;
        self.store
            .set(SESSIONS_KEY, &value)
            .with_key_context("write sessions", SESSIONS_KEY)
    }
}

/// `serde_json::from_value` with the stack grown on demand for deep trees.
fn from_stored<T: DeserializeOwned>(value: serde_json::Value) -> serde_json::Result<T> {
    T::deserialize(serde_stacker::Deserializer::new(value))
}

fn session_name(name: &str) -> ApplicationResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidInput("session name required".into()).into());
    }
    Ok(trimmed)
}
