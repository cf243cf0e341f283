//! Recurrence expansion: one repeating busy interval into dated occurrences.
//!
//! Repeating intervals are expanded once, when they are created. The parent
//! keeps its recurrence marker; each occurrence is an ordinary interval with
//! `recurrence = None` and a `parent_id` back-reference used for series delete.
//!
//! Occurrence starts come from the `rrule` crate so daily and weekly steps keep
//! the parent's local wall-clock time across DST changes.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rrule::RRuleSet;

use crate::error::{GridError, Result};
use crate::interval::{BusyInterval, IntervalId, Recurrence};
use crate::week::local_instant;

/// Number of occurrences generated after the parent interval.
pub const RECURRENCE_LIMIT: u16 = 8;

/// Expand a repeating interval into its additional occurrences.
///
/// Returns an empty list for [`Recurrence::None`]. Otherwise returns exactly
/// [`RECURRENCE_LIMIT`] intervals, in chronological order, excluding the parent.
///
/// # Errors
/// Returns [`GridError::InvalidInterval`] if the parent is malformed, or
/// [`GridError::InvalidRecurrence`] if the rule engine rejects the expansion.
pub fn expand(parent: &BusyInterval, tz: Tz) -> Result<Vec<BusyInterval>> {
    parent.validate()?;

    let freq = match parent.recurrence {
        Recurrence::None => return Ok(Vec::new()),
        Recurrence::Daily => "DAILY",
        Recurrence::Weekly => "WEEKLY",
    };

    let local_start = parent.start.with_timezone(&tz).naive_local();
    let local_end = parent.end.with_timezone(&tz).naive_local();
    let local_length = local_end - local_start;
    let absolute_length = parent.end - parent.start;

    // The parent is instance #1 of the rule, so ask for one more.
    let total = RECURRENCE_LIMIT + 1;
    let rule_text = format!(
        "DTSTART;TZID={}:{}\nRRULE:FREQ={};COUNT={}",
        tz.name(),
        local_start.format("%Y%m%dT%H%M%S"),
        freq,
        total
    );

    let rule_set: RRuleSet = rule_text
        .parse()
        .map_err(|e| GridError::InvalidRecurrence(format!("{}", e)))?;

    let instances = rule_set.all(total);

    let occurrences: Vec<BusyInterval> = instances
        .dates
        .into_iter()
        .skip(1)
        .map(|dt| {
            let start: DateTime<Utc> = dt.with_timezone(&Utc);
            let end = local_instant(&tz, dt.naive_local() + local_length);
            // A parent straddling a fall-back hour can have a non-positive local length.
            let end = if end > start {
                end
            } else {
                start + absolute_length
            };
            BusyInterval {
                id: IntervalId::generate(),
                owner_id: parent.owner_id.clone(),
                start,
                end,
                title: parent.title.clone(),
                recurrence: Recurrence::None,
                parent_id: Some(parent.id.clone()),
            }
        })
        .collect();

    if occurrences.len() != RECURRENCE_LIMIT as usize {
        return Err(GridError::InvalidRecurrence(format!(
            "expected {} occurrences of {}, rule produced {}",
            RECURRENCE_LIMIT,
            parent.id,
            occurrences.len()
        )));
    }

    tracing::debug!(
        parent = %parent.id,
        recurrence = ?parent.recurrence,
        occurrences = occurrences.len(),
        "expanded recurring interval"
    );

    Ok(occurrences)
}
