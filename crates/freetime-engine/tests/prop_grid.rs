//! Property-based tests for grid classification using proptest.
//!
//! These hold for any schedules, not just the scenarios in `grid_tests.rs`.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use freetime_engine::grid::{compute_week, SlotClassification};
use freetime_engine::hours::HourRange;
use freetime_engine::interval::{BusyInterval, IntervalId, Recurrence, UserId};
use freetime_engine::week::{shift_week, WeekWindow};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn week() -> WeekWindow {
    WeekWindow::starting(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(), Tz::UTC).unwrap()
}

/// An interval somewhere in the week (or spilling a day either side),
/// 15 minutes to 6 hours long, on a 15-minute grid.
fn arb_interval() -> impl Strategy<Value = BusyInterval> {
    (-4i64 * 24..8 * 24 * 4, 1i64..=24).prop_map(|(quarter, length)| {
        let base = Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap();
        let start = base + Duration::minutes(quarter * 15);
        BusyInterval {
            id: IntervalId::generate(),
            owner_id: UserId::from("someone"),
            start,
            end: start + Duration::minutes(length * 15),
            title: String::new(),
            recurrence: Recurrence::None,
            parent_id: None,
        }
    })
}

fn arb_schedule() -> impl Strategy<Value = Vec<BusyInterval>> {
    prop::collection::vec(arb_interval(), 0..8)
}

fn arb_comparison() -> impl Strategy<Value = Vec<Vec<BusyInterval>>> {
    prop::collection::vec(arb_schedule(), 0..4)
}

fn arb_hours() -> impl Strategy<Value = HourRange> {
    (0u32..23)
        .prop_flat_map(|start| (Just(start), start + 1..=23))
        .prop_map(|(start, end)| HourRange::new(start, end).unwrap())
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn grid_is_deterministic(
        owner in arb_schedule(),
        comparison in arb_comparison(),
        hours in arb_hours(),
    ) {
        let a = compute_week(&owner, &comparison, &week(), hours).unwrap();
        let b = compute_week(&owner, &comparison, &week(), hours).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn grid_is_dense(
        owner in arb_schedule(),
        comparison in arb_comparison(),
        hours in arb_hours(),
    ) {
        let grid = compute_week(&owner, &comparison, &week(), hours).unwrap();
        let expected = 7 * (hours.end() - hours.start() + 1) as usize;
        prop_assert_eq!(grid.len(), expected);
        for day in 0..7 {
            for hour in hours.iter() {
                prop_assert!(grid.get(day, hour).is_some());
            }
        }
    }

    #[test]
    fn owner_busy_dominates(
        owner in arb_schedule(),
        comparison in arb_comparison(),
        hours in arb_hours(),
    ) {
        let grid = compute_week(&owner, &comparison, &week(), hours).unwrap();
        for cell in grid.cells() {
            let (start, end) = week().hour_bounds(cell.date, cell.hour);
            let owner_busy = owner.iter().any(|iv| iv.overlaps(start, end));
            prop_assert_eq!(owner_busy, cell.classification == SlotClassification::Busy);
        }
    }

    #[test]
    fn common_free_needs_a_comparison_set(
        owner in arb_schedule(),
        hours in arb_hours(),
    ) {
        let grid = compute_week(&owner, &[], &week(), hours).unwrap();
        prop_assert_eq!(grid.count(SlotClassification::CommonFree), 0);
    }

    #[test]
    fn adding_owner_busy_time_only_adds_busy_cells(
        owner in arb_schedule(),
        extra in arb_interval(),
        comparison in arb_comparison(),
        hours in arb_hours(),
    ) {
        let before = compute_week(&owner, &comparison, &week(), hours).unwrap();
        let mut more = owner.clone();
        more.push(extra);
        let after = compute_week(&more, &comparison, &week(), hours).unwrap();

        for (b, a) in before.cells().iter().zip(after.cells()) {
            if b.classification == SlotClassification::Busy {
                prop_assert_eq!(a.classification, SlotClassification::Busy);
            } else {
                prop_assert!(
                    a.classification == b.classification
                        || a.classification == SlotClassification::Busy,
                    "{:?} became {:?}",
                    b.classification,
                    a.classification
                );
            }
        }
    }

    #[test]
    fn shift_week_round_trips(delta in -5000i32..5000) {
        let original = week();
        let moved = shift_week(&original, delta).unwrap();
        prop_assert_eq!(shift_week(&moved, -delta).unwrap(), original);
    }
}
