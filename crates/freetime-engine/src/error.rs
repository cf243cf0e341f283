//! Error types for freetime-engine operations.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::interval::{GroupId, IntervalId, UserId};

#[derive(Error, Debug)]
pub enum GridError {
    /// The displayed hour range is empty, inverted, or leaves the 0..=23 day.
    #[error("Invalid hour range: {start}..={end} (need start < end <= 23)")]
    InvalidHourRange { start: u32, end: u32 },

    /// A busy interval whose end does not come after its start.
    #[error("Invalid interval {id}: end {end} is not after start {start}")]
    InvalidInterval {
        id: IntervalId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Week must start on a Sunday, got {0}")]
    InvalidWeekStart(NaiveDate),

    /// Navigation left the range of representable calendar dates.
    #[error("Week of {anchor} shifted by {delta_weeks} weeks is out of range")]
    WeekOutOfRange { anchor: NaiveDate, delta_weeks: i32 },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),

    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    #[error("No pending friend request from {from} to {to}")]
    NoPendingRequest { from: UserId, to: UserId },

    #[error("Unknown group: {0}")]
    UnknownGroup(GroupId),

    #[error("Unknown interval: {0}")]
    UnknownInterval(IntervalId),

    /// Grid cells that do not match the grid's week and hour range.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// A schedule provider or comparison-set resolver could not answer.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GridError {
    /// True for faults caused by malformed caller input rather than lookups.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GridError::InvalidHourRange { .. }
                | GridError::InvalidInterval { .. }
                | GridError::InvalidWeekStart(_)
                | GridError::WeekOutOfRange { .. }
                | GridError::InvalidGrid(_)
                | GridError::InvalidTimezone(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
