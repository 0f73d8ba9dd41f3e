//! Shared application state for the HTTP surface.
//!
//! Wrapped in `Arc` at startup. Active conversations are in-memory
//! only: each session owns its tracker behind its own lock, so one
//! turn per session runs at a time while independent sessions proceed
//! concurrently. The database is the only state shared across users.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::{self, DatabaseError};
use crate::submission::media::LocalMediaStore;
use crate::triage::client::HttpAnalysisClient;
use crate::triage::conversation::ConversationTracker;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("lock poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}

pub struct AppState {
    pub config: AppConfig,
    pub backend: HttpAnalysisClient,
    pub media: LocalMediaStore,
    db_path: PathBuf,
    sessions: Mutex<HashMap<Uuid, Arc<Mutex<ConversationTracker>>>>,
}

impl AppState {
    /// Build the shared state: create the data directories, run
    /// migrations once, and wire the analysis client from config.
    pub fn new(config: AppConfig) -> Result<Self, StateError> {
        std::fs::create_dir_all(&config.data_dir)?;

        let db_path = config.db_path();
        // Open once at startup so migrations run before serving.
        db::open_database(&db_path)?;

        Ok(Self {
            backend: HttpAnalysisClient::new(&config),
            media: LocalMediaStore::new(config.uploads_dir()),
            db_path,
            sessions: Mutex::new(HashMap::new()),
            config,
        })
    }

    /// Open a connection for one request. SQLite handles per-document
    /// atomicity; no cross-record transaction exists.
    pub fn open_db(&self) -> Result<Connection, StateError> {
        Ok(db::open_database(&self.db_path)?)
    }

    /// Fetch an existing session or start a new one.
    ///
    /// An unknown or absent id starts a fresh session. Starting over
    /// is how a conversation is reset; nothing of the old session
    /// carries across.
    pub fn session(
        &self,
        id: Option<Uuid>,
    ) -> Result<(Uuid, Arc<Mutex<ConversationTracker>>), StateError> {
        let mut sessions = self.sessions.lock().map_err(|_| StateError::LockPoisoned)?;

        if let Some(id) = id {
            if let Some(tracker) = sessions.get(&id) {
                return Ok((id, Arc::clone(tracker)));
            }
        }

        let tracker = ConversationTracker::new(self.config.max_context_turns);
        let id = tracker.session_id();
        let tracker = Arc::new(Mutex::new(tracker));
        sessions.insert(id, Arc::clone(&tracker));
        Ok((id, tracker))
    }

    #[cfg(test)]
    pub(crate) fn session_count(&self) -> Result<usize, StateError> {
        let sessions = self.sessions.lock().map_err(|_| StateError::LockPoisoned)?;
        Ok(sessions.len())
    }

    /// Drop a session's in-memory conversation.
    pub fn end_session(&self, id: Uuid) -> Result<bool, StateError> {
        let mut sessions = self.sessions.lock().map_err(|_| StateError::LockPoisoned)?;
        Ok(sessions.remove(&id).is_some())
    }
}
