//! # freetime-engine
//!
//! Weekly availability grid for finding common free time with friends and groups.
//!
//! Given a user's busy intervals and the busy intervals of everyone they are
//! comparing against, the engine classifies every displayed hour of a week as
//! busy, available, or common free. The computation is pure: no I/O, no shared
//! state, safe to call from any thread as often as the view changes.
//!
//! ## Modules
//!
//! - [`grid`]: `compute_week` and the (day, hour) classification grid
//! - [`week`]: Sunday-anchored week windows, navigation, labels, local-time resolution
//! - [`hours`]: Validated displayed-hour ranges
//! - [`interval`]: Busy intervals and ids
//! - [`recurrence`]: Daily/weekly expansion of repeating busy time
//! - [`freebusy`]: Concrete common free spans inside the displayed hours
//! - [`schedule`]: Schedule provider seam and in-memory store
//! - [`directory`]: Friends, groups, and comparison-set resolution
//! - [`notify`]: Optional notification sink
//! - [`context`]: Explicit view context and `render_week`
//! - [`snapshot`]: JSON bundle of schedules and directory
//! - [`error`]: Error types

pub mod context;
pub mod directory;
pub mod error;
pub mod freebusy;
pub mod grid;
pub mod hours;
pub mod interval;
pub mod notify;
pub mod recurrence;
pub mod schedule;
pub mod snapshot;
pub mod week;

pub use context::{render_week, ViewContext};
pub use directory::{ComparisonContext, ComparisonSetResolver, Directory};
pub use error::GridError;
pub use freebusy::{common_free_spans, FreeSpan};
pub use grid::{compute_week, Cell, Grid, SlotClassification};
pub use hours::HourRange;
pub use interval::{BusyInterval, GroupId, IntervalId, Recurrence, UserId};
pub use notify::{MemorySink, Notification, NotificationSink};
pub use schedule::{DeleteScope, MemorySchedule, ScheduleProvider, ToggleOutcome};
pub use snapshot::Snapshot;
pub use week::{shift_week, WeekWindow};
