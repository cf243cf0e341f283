//! Explicit view state for one rendering of the grid.
//!
//! Instead of a module-level "current week" and "active group", the caller
//! holds a [`ViewContext`] and builds a new one on every navigation or
//! comparison switch, then calls [`render_week`] again.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::directory::{ComparisonContext, ComparisonSetResolver};
use crate::error::Result;
use crate::freebusy::{common_free_spans, FreeSpan};
use crate::grid::{compute_week, Grid};
use crate::hours::HourRange;
use crate::interval::{BusyInterval, UserId};
use crate::schedule::ScheduleProvider;
use crate::week::WeekWindow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewContext {
    pub current_user: UserId,
    pub week: WeekWindow,
    #[serde(default)]
    pub comparison: ComparisonContext,
    #[serde(default)]
    pub hours: HourRange,
}

impl ViewContext {
    /// Friends view of the week containing `now`, default hours.
    pub fn new(current_user: UserId, now: DateTime<Utc>, tz: Tz) -> Self {
        Self {
            current_user,
            week: WeekWindow::containing(now, tz),
            comparison: ComparisonContext::Friends,
            hours: HourRange::default(),
        }
    }

    /// The same view `delta_weeks` weeks later (or earlier).
    ///
    /// # Errors
    /// Returns [`crate::GridError::WeekOutOfRange`] past the ends of the calendar.
    pub fn navigate(&self, delta_weeks: i32) -> Result<Self> {
        Ok(Self {
            week: self.week.shift(delta_weeks)?,
            ..self.clone()
        })
    }

    pub fn with_comparison(self, comparison: ComparisonContext) -> Self {
        Self { comparison, ..self }
    }

    pub fn with_hours(self, hours: HourRange) -> Self {
        Self { hours, ..self }
    }
}

/// Owner intervals plus one interval list per comparison member.
fn gather<S, R>(
    ctx: &ViewContext,
    schedules: &S,
    resolver: &R,
) -> Result<(Vec<BusyInterval>, Vec<Vec<BusyInterval>>)>
where
    S: ScheduleProvider + ?Sized,
    R: ComparisonSetResolver + ?Sized,
{
    let members = resolver.resolve_comparison_set(&ctx.current_user, &ctx.comparison)?;
    let owner = schedules.fetch_intervals(&ctx.current_user)?;
    let comparison = members
        .iter()
        .map(|member| schedules.fetch_intervals(member))
        .collect::<Result<Vec<_>>>()?;
    Ok((owner, comparison))
}

/// Fetch everything the view needs and compute its grid.
///
/// Provider and resolver failures are returned unchanged.
pub fn render_week<S, R>(ctx: &ViewContext, schedules: &S, resolver: &R) -> Result<Grid>
where
    S: ScheduleProvider + ?Sized,
    R: ComparisonSetResolver + ?Sized,
{
    let (owner, comparison) = gather(ctx, schedules, resolver)?;
    compute_week(&owner, &comparison, &ctx.week, ctx.hours)
}

/// Fetch everything the view needs and list its common free spans.
pub fn free_spans<S, R>(ctx: &ViewContext, schedules: &S, resolver: &R) -> Result<Vec<FreeSpan>>
where
    S: ScheduleProvider + ?Sized,
    R: ComparisonSetResolver + ?Sized,
{
    let (owner, comparison) = gather(ctx, schedules, resolver)?;
    common_free_spans(&owner, &comparison, &ctx.week, ctx.hours)
}
