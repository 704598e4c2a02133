use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Key the reminder list is stored under.
pub const STORE_KEY: &str = "reminders";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub medicine_id: String,
    pub time: String,
    pub completed: bool,
}

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("Failed to read reminders from '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write reminders to '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Reminders file '{}' is not a JSON array of reminders: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize reminders for '{}': {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Reminder '{0}' not found.")]
    NotFound(String),
}

/// JSON file holding the reminder list.
#[derive(Debug, Clone)]
pub struct ReminderStore {
    path: PathBuf,
}

impl ReminderStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `reminders.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::open(dir.join(format!("{STORE_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file reads as an empty list.
    pub fn load(&self) -> Result<Vec<Reminder>, ReminderError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ReminderError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).map_err(|source| ReminderError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, reminders: &[Reminder]) -> Result<(), ReminderError> {
        let write_err = |source| ReminderError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let body = serde_json::to_string(reminders).map_err(|source| ReminderError::Serialize {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, body).map_err(write_err)?;
        debug!(path = %self.path.display(), count = reminders.len(), "saved reminders");
        Ok(())
    }

    /// Appends a new pending reminder and returns it.
    pub fn add(
        &self,
        medicine_id: impl Into<String>,
        time: impl Into<String>,
    ) -> Result<Reminder, ReminderError> {
        let mut reminders = self.load()?;
        let reminder = Reminder {
            id: next_id(&reminders),
            medicine_id: medicine_id.into(),
            time: time.into(),
            completed: false,
        };
        reminders.push(reminder.clone());
        self.save(&reminders)?;
        Ok(reminder)
    }

    /// Flips `completed` for one reminder, persists, and returns the new
    /// state.
    pub fn toggle(&self, id: &str) -> Result<bool, ReminderError> {
        let mut reminders = self.load()?;
        let reminder = reminders
            .iter_mut()
            .find(|reminder| reminder.id == id)
            .ok_or_else(|| ReminderError::NotFound(id.to_string()))?;
        reminder.completed = !reminder.completed;
        let completed = reminder.completed;
        self.save(&reminders)?;
        Ok(completed)
    }
}

// Millisecond timestamps, bumped past any existing numeric id.
fn next_id(existing: &[Reminder]) -> String {
    let now = chrono::Utc::now().timestamp_millis();
    let highest = existing
        .iter()
        .filter_map(|reminder| reminder.id.parse::<i64>().ok())
        .max()
        .unwrap_or(i64::MIN);
    now.max(highest.saturating_add(1)).to_string()
}
