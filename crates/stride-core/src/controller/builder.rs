//! Builder for creating and configuring GoalController instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use jiff::tz::TimeZone;
use log::debug;
use tokio::task;

use super::GoalController;
use crate::{
    clock::{Clock, SystemClock},
    error::{GoalError, Result},
    retry::RetryPolicy,
    store::{GoalStore, SqliteStore},
};

/// Default number of goals whose last day plan is cached.
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// Builder for creating and configuring [`GoalController`] instances.
pub struct ControllerBuilder<S> {
    service: S,
    database_path: Option<PathBuf>,
    store: Option<Arc<dyn GoalStore>>,
    user: Option<String>,
    clock: Arc<dyn Clock>,
    time_zone: Option<TimeZone>,
    retry: RetryPolicy,
    cache_capacity: usize,
}

impl<S> ControllerBuilder<S> {
    /// Creates a new builder around a roadmap service with default settings.
    pub fn new(service: S) -> Self {
        Self {
            service,
            database_path: None,
            store: None,
            user: None,
            clock: Arc::new(SystemClock),
            time_zone: None,
            retry: RetryPolicy::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/stride/stride.db` or `~/.local/share/stride/stride.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses an existing store instead of opening a SQLite database.
    pub fn with_store(mut self, store: Arc<dyn GoalStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the signed-in user. Without one every store call fails with
    /// `NotAuthenticated`.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the time zone for day boundaries. Defaults to the system zone.
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = Some(time_zone);
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Builds the configured controller instance.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::FileSystem` if the database directory cannot be
    /// created
    /// Returns `GoalError::Database` if database initialization fails
    pub async fn build(self) -> Result<GoalController<S>> {
        let store = match self.store {
            Some(store) => store,
            None => {
                let db_path = match self.database_path {
                    Some(path) => path,
                    None => default_database_path()?,
                };
                Arc::new(Self::open_store(db_path).await?) as Arc<dyn GoalStore>
            }
        };

        let time_zone = self.time_zone.unwrap_or_else(TimeZone::system);

        Ok(GoalController::new(
            store,
            self.service,
            self.user,
            self.clock,
            time_zone,
            self.retry,
            self.cache_capacity,
        ))
    }

    async fn open_store(db_path: PathBuf) -> Result<SqliteStore> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| GoalError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        debug!("opening goal database at {}", db_path.display());
        task::spawn_blocking(move || SqliteStore::open(&db_path))
            .await
            .map_err(|e| GoalError::Configuration {
                message: format!("Task join error: {e}"),
            })?
    }
}

/// Returns the default database path following XDG Base Directory
/// specification.
pub fn default_database_path() -> Result<PathBuf> {
    xdg::BaseDirectories::with_prefix("stride")
        .place_data_file("stride.db")
        .map_err(|e| GoalError::XdgDirectory(e.to_string()))
}
