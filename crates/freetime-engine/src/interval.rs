//! Busy intervals and the identifiers that tie them to users and groups.
//!
//! A [`BusyInterval`] is one contiguous, half-open block `[start, end)` during
//! which its owner is unavailable. Intervals created with a [`Recurrence`] are
//! followed by independent occurrences that point back at them through
//! `parent_id`; see [`crate::recurrence`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GridError, Result};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

id_type!(
    /// Opaque user identifier.
    UserId
);
id_type!(
    /// Opaque busy-interval identifier.
    IntervalId
);
id_type!(
    /// Opaque group identifier.
    GroupId
);

impl IntervalId {
    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// How a busy interval repeats when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
}

/// One block of time a user is unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub id: IntervalId,
    pub owner_id: UserId,
    pub start: DateTime<Utc>,
    /// Exclusive.
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub recurrence: Recurrence,
    /// The interval this one was expanded from, if it is a recurrence occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<IntervalId>,
}

impl BusyInterval {
    /// Create a new interval with a generated id.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidInterval`] when `end <= start`.
    pub fn new(
        owner_id: UserId,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        recurrence: Recurrence,
    ) -> Result<Self> {
        let interval = Self {
            id: IntervalId::generate(),
            owner_id,
            start,
            end,
            title: title.into(),
            recurrence,
            parent_id: None,
        };
        interval.validate()?;
        Ok(interval)
    }

    /// Re-check the `end > start` invariant, e.g. after deserialization.
    pub fn validate(&self) -> Result<()> {
        if self.end <= self.start {
            return Err(GridError::InvalidInterval {
                id: self.id.clone(),
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Half-open overlap with `[start, end)`. Touching endpoints do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }

    /// Whether `instant` falls inside `[start, end)`.
    pub fn covers(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Id of the series this interval belongs to: its parent, or itself.
    pub fn series_root(&self) -> &IntervalId {
        self.parent_id.as_ref().unwrap_or(&self.id)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Validate every interval in a list, stopping at the first bad one.
pub fn validate_all(intervals: &[BusyInterval]) -> Result<()> {
    intervals.iter().try_for_each(BusyInterval::validate)
}
