//! A serializable bundle of everything the grid reads: schedules, the
//! directory, and the timezone the calendar is shown in.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::directory::Directory;
use crate::error::Result;
use crate::schedule::MemorySchedule;
use crate::week::parse_timezone;

fn default_timezone() -> String {
    "UTC".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub schedules: MemorySchedule,
    #[serde(default)]
    pub directory: Directory,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            schedules: MemorySchedule::default(),
            directory: Directory::default(),
        }
    }
}

impl Snapshot {
    /// Parse and validate a snapshot.
    ///
    /// # Errors
    /// Returns [`crate::GridError::Json`] for malformed JSON,
    /// [`crate::GridError::InvalidTimezone`] for an unknown zone, and
    /// [`crate::GridError::InvalidInterval`] for a stored interval with `end <= start`.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.tz()?;
        snapshot.schedules.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }
}
