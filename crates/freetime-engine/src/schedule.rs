//! Schedule storage: every user's busy intervals.
//!
//! [`ScheduleProvider`] is the read-only seam the grid needs. [`MemorySchedule`]
//! is the in-process store behind it, with the write operations the UI drives:
//! adding (with recurrence expansion), deleting one occurrence or a whole
//! series, and toggling a single hour cell.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::interval::{BusyInterval, IntervalId, Recurrence, UserId};
use crate::notify::{emit, Notification, NotificationKind, SharedSink};
use crate::recurrence;
use crate::week::WeekWindow;

/// Source of a user's busy intervals.
pub trait ScheduleProvider {
    /// All busy intervals owned by `user`. Unknown users have none.
    fn fetch_intervals(&self, user: &UserId) -> Result<Vec<BusyInterval>>;
}

/// How much of a recurring series a delete removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteScope {
    /// Only the named interval.
    #[default]
    Single,
    /// The series root and every occurrence pointing at it.
    Series,
}

/// Result of toggling an hour cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "action", content = "id")]
pub enum ToggleOutcome {
    Added(IntervalId),
    Removed(IntervalId),
}

/// Title given to intervals created by toggling a cell.
pub const TOGGLE_TITLE: &str = "Busy";

/// In-memory schedule store keyed by owner.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemorySchedule {
    schedules: BTreeMap<UserId, Vec<BusyInterval>>,
    #[serde(skip)]
    sink: SharedSink,
}

impl fmt::Debug for MemorySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySchedule")
            .field("schedules", &self.schedules)
            .field("notifications", &self.sink.is_some())
            .finish()
    }
}

impl MemorySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach (or detach, with `None`) a notification sink.
    pub fn with_notifications(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn set_notifications(&mut self, sink: SharedSink) {
        self.sink = sink;
    }

    /// The intervals owned by `owner`, in insertion order.
    pub fn intervals(&self, owner: &UserId) -> &[BusyInterval] {
        self.schedules.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn users(&self) -> impl Iterator<Item = &UserId> {
        self.schedules.keys()
    }

    /// Check every stored interval's invariant, e.g. after loading from disk.
    pub fn validate(&self) -> Result<()> {
        self.schedules
            .values()
            .flatten()
            .try_for_each(BusyInterval::validate)
    }

    /// Store an interval and, if it repeats, its expanded occurrences.
    ///
    /// Returns the ids of everything stored, parent first.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidInterval`] or [`GridError::InvalidRecurrence`];
    /// nothing is stored on error.
    pub fn add(&mut self, interval: BusyInterval, tz: Tz) -> Result<Vec<IntervalId>> {
        interval.validate()?;
        let occurrences = recurrence::expand(&interval, tz)?;

        let parent_id = interval.id.clone();
        let title = interval.title.clone();
        let local_date = interval.start.with_timezone(&tz).date_naive();

        let mut ids = Vec::with_capacity(1 + occurrences.len());
        ids.push(interval.id.clone());
        ids.extend(occurrences.iter().map(|o| o.id.clone()));

        let owner = interval.owner_id.clone();
        let list = self.schedules.entry(owner.clone()).or_default();
        list.push(interval);
        list.extend(occurrences);

        tracing::info!(owner = %owner, interval = %parent_id, stored = ids.len(), "added busy time");
        emit(
            &self.sink,
            Notification::new(
                NotificationKind::ScheduleUpdate,
                format!(
                    "New event added: {} on {}",
                    title,
                    local_date.format("%A, %B %-d, %Y")
                ),
            )
            .with_interval(parent_id),
        );

        Ok(ids)
    }

    /// Remove an interval, or its whole series.
    ///
    /// With [`DeleteScope::Series`], `id` may name the root or any occurrence;
    /// the root and all of its occurrences are removed. Returns how many
    /// intervals were removed.
    ///
    /// # Errors
    /// Returns [`GridError::UnknownInterval`] if `owner` has no interval `id`.
    pub fn delete(&mut self, owner: &UserId, id: &IntervalId, scope: DeleteScope) -> Result<usize> {
        let list = self
            .schedules
            .get_mut(owner)
            .ok_or_else(|| GridError::UnknownInterval(id.clone()))?;
        let target = list
            .iter()
            .find(|iv| &iv.id == id)
            .ok_or_else(|| GridError::UnknownInterval(id.clone()))?;

        let title = target.title.clone();
        let root = target.series_root().clone();
        let before = list.len();
        match scope {
            DeleteScope::Single => list.retain(|iv| &iv.id != id),
            DeleteScope::Series => list.retain(|iv| iv.id != root && iv.parent_id.as_ref() != Some(&root)),
        }
        let removed = before - list.len();

        tracing::info!(owner = %owner, interval = %id, ?scope, removed, "deleted busy time");
        emit(
            &self.sink,
            Notification::new(
                NotificationKind::ScheduleUpdate,
                format!("Event \"{}\" has been deleted from your schedule", title),
            ),
        );

        Ok(removed)
    }

    /// Flip one hour cell of the owner's grid.
    ///
    /// If an owner interval overlaps the local hour `[H:00, H+1:00)` on `date`,
    /// the earliest such interval is removed. Otherwise a one-hour
    /// [`TOGGLE_TITLE`] interval is added for that hour.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidHourRange`] for `hour > 23`.
    pub fn toggle_slot(
        &mut self,
        owner: &UserId,
        date: NaiveDate,
        hour: u32,
        tz: Tz,
    ) -> Result<ToggleOutcome> {
        if hour > 23 {
            return Err(GridError::InvalidHourRange { start: hour, end: hour });
        }
        let week = WeekWindow::containing_date(date, tz);
        let (start, end) = week.hour_bounds(date, hour);

        let existing = self
            .intervals(owner)
            .iter()
            .filter(|iv| iv.overlaps(start, end) || iv.covers(start))
            .min_by_key(|iv| iv.start)
            .map(|iv| iv.id.clone());

        match existing {
            Some(id) => {
                if let Some(list) = self.schedules.get_mut(owner) {
                    list.retain(|iv| iv.id != id);
                }
                tracing::info!(owner = %owner, interval = %id, %date, hour, "toggled slot free");
                Ok(ToggleOutcome::Removed(id))
            }
            None => {
                let end = if end > start { end } else { start + chrono::Duration::hours(1) };
                let interval =
                    BusyInterval::new(owner.clone(), TOGGLE_TITLE, start, end, Recurrence::None)?;
                let id = interval.id.clone();
                self.schedules.entry(owner.clone()).or_default().push(interval);
                tracing::info!(owner = %owner, interval = %id, %date, hour, "toggled slot busy");
                Ok(ToggleOutcome::Added(id))
            }
        }
    }

    /// The owner's intervals that have not ended by `now`, soonest first.
    pub fn upcoming(&self, owner: &UserId, now: DateTime<Utc>, limit: usize) -> Vec<&BusyInterval> {
        let mut upcoming: Vec<&BusyInterval> = self
            .intervals(owner)
            .iter()
            .filter(|iv| iv.end > now)
            .collect();
        upcoming.sort_by_key(|iv| (iv.start, iv.end));
        upcoming.truncate(limit);
        upcoming
    }
}

impl ScheduleProvider for MemorySchedule {
    fn fetch_intervals(&self, user: &UserId) -> Result<Vec<BusyInterval>> {
        Ok(self.intervals(user).to_vec())
    }
}
