//! Week windows: seven consecutive local calendar days starting on Sunday.
//!
//! A [`WeekWindow`] is a stateless view. Navigation produces a new window
//! rather than mutating a "current week", and every hour cell is resolved to
//! UTC through the window's timezone so DST weeks keep their local hours.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc, Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Day every week window starts on.
pub const WEEK_START: Weekday = Weekday::Sun;

pub const DAYS_PER_WEEK: usize = 7;

/// Seven consecutive calendar days beginning on [`WEEK_START`], in a timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWeekWindow")]
pub struct WeekWindow {
    anchor: NaiveDate,
    tz: Tz,
}

#[derive(Deserialize)]
struct RawWeekWindow {
    anchor: NaiveDate,
    tz: Tz,
}

impl TryFrom<RawWeekWindow> for WeekWindow {
    type Error = GridError;

    fn try_from(raw: RawWeekWindow) -> Result<Self> {
        WeekWindow::starting(raw.anchor, raw.tz)
    }
}

impl WeekWindow {
    /// The week containing `now`: anchored on the most recent Sunday at or
    /// before `now`'s local date in `tz`.
    pub fn containing(now: DateTime<Utc>, tz: Tz) -> Self {
        Self::containing_date(now.with_timezone(&tz).date_naive(), tz)
    }

    /// The week containing a local calendar date.
    pub fn containing_date(date: NaiveDate, tz: Tz) -> Self {
        let back = date.weekday().num_days_from_sunday();
        Self {
            anchor: date - Duration::days(back as i64),
            tz,
        }
    }

    /// A week anchored on an explicit Sunday.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidWeekStart`] if `anchor` is not a Sunday, or
    /// [`GridError::WeekOutOfRange`] for the calendar's final partial week.
    pub fn starting(anchor: NaiveDate, tz: Tz) -> Result<Self> {
        if anchor.weekday() != WEEK_START {
            return Err(GridError::InvalidWeekStart(anchor));
        }
        Self { anchor, tz }.shift(0)
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Move by whole weeks.
    ///
    /// # Errors
    /// Returns [`GridError::WeekOutOfRange`] if the shifted week (including the
    /// Sunday after it) leaves chrono's representable date range.
    pub fn shift(&self, delta_weeks: i32) -> Result<Self> {
        let out_of_range = || GridError::WeekOutOfRange {
            anchor: self.anchor,
            delta_weeks,
        };
        let anchor = Duration::try_weeks(delta_weeks as i64)
            .and_then(|delta| self.anchor.checked_add_signed(delta))
            .ok_or_else(out_of_range)?;
        anchor
            .checked_add_signed(Duration::days(DAYS_PER_WEEK as i64))
            .ok_or_else(out_of_range)?;
        Ok(Self {
            anchor,
            tz: self.tz,
        })
    }

    /// The seven dates of the week, Sunday first.
    pub fn days(&self) -> [NaiveDate; DAYS_PER_WEEK] {
        std::array::from_fn(|i| self.anchor + Duration::days(i as i64))
    }

    pub fn day(&self, index: usize) -> Option<NaiveDate> {
        (index < DAYS_PER_WEEK).then(|| self.anchor + Duration::days(index as i64))
    }

    /// Saturday of this week.
    pub fn last_day(&self) -> NaiveDate {
        self.anchor + Duration::days(DAYS_PER_WEEK as i64 - 1)
    }

    /// UTC instants of local midnight on Sunday and on the following Sunday.
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let next = self.anchor + Duration::days(DAYS_PER_WEEK as i64);
        (
            local_instant(&self.tz, self.anchor.and_time(NaiveTime::MIN)),
            local_instant(&self.tz, next.and_time(NaiveTime::MIN)),
        )
    }

    /// UTC range `[H:00, H+1:00)` of a local hour on `date`.
    pub fn hour_bounds(&self, date: NaiveDate, hour: u32) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = date.and_time(NaiveTime::MIN) + Duration::hours(hour as i64);
        (
            local_instant(&self.tz, start),
            local_instant(&self.tz, start + Duration::hours(1)),
        )
    }

    /// Header label: `"Mar 15 - 21, 2026"`, `"Mar 29 - Apr 4, 2026"`, or
    /// `"Dec 27, 2026 - Jan 2, 2027"` when the week crosses a year.
    pub fn label(&self) -> String {
        let first = self.anchor;
        let last = self.last_day();
        if first.year() != last.year() {
            format!(
                "{} {}, {} - {} {}, {}",
                first.format("%b"),
                first.day(),
                first.year(),
                last.format("%b"),
                last.day(),
                last.year()
            )
        } else if first.month() != last.month() {
            format!(
                "{} {} - {} {}, {}",
                first.format("%b"),
                first.day(),
                last.format("%b"),
                last.day(),
                first.year()
            )
        } else {
            format!(
                "{} {} - {}, {}",
                first.format("%b"),
                first.day(),
                last.day(),
                first.year()
            )
        }
    }

    /// Column header for a day of the week: `"Mon 3/16"`.
    pub fn day_label(&self, index: usize) -> Option<String> {
        self.day(index)
            .map(|d| format!("{} {}/{}", d.format("%a"), d.month(), d.day()))
    }
}

/// Shift a week window by `delta_weeks` whole weeks.
///
/// # Errors
/// Returns [`GridError::WeekOutOfRange`] past the ends of the calendar.
pub fn shift_week(week: &WeekWindow, delta_weeks: i32) -> Result<WeekWindow> {
    week.shift(delta_weeks)
}

/// Resolve a local wall-clock time in `tz` to UTC.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times that
/// do not exist (DST spring-forward gap) move forward by the gap's hour.
pub fn local_instant(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    let resolved = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => tz.from_local_datetime(&(naive + Duration::hours(1))).earliest(),
    };
    resolved
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// Parse an IANA timezone name.
///
/// # Errors
/// Returns [`GridError::InvalidTimezone`] for unknown names.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| GridError::InvalidTimezone(name.to_string()))
}
