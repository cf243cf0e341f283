//! WASM bindings for freetime-engine.
//!
//! Exposes the weekly availability grid, week navigation, common free spans,
//! and recurrence expansion to the browser via `wasm-bindgen`. All complex
//! types are passed as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p freetime-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/pkg/ \
//!   target/wasm32-unknown-unknown/release/freetime_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use freetime_engine::interval::{BusyInterval, IntervalId, Recurrence, UserId};
use freetime_engine::week::parse_timezone;
use freetime_engine::{
    common_free_spans, compute_week, recurrence, render_week, HourRange, Snapshot, ViewContext,
    WeekWindow,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input format for busy intervals passed from JavaScript.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntervalInput {
    #[serde(default)]
    id: Option<String>,
    start: String,
    end: String,
    #[serde(default)]
    title: String,
    #[serde(default, alias = "repeat")]
    recurrence: Recurrence,
    #[serde(default)]
    parent_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IntervalDto {
    id: String,
    start: String,
    end: String,
    title: String,
    recurrence: Recurrence,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<String>,
}

impl From<&BusyInterval> for IntervalDto {
    fn from(iv: &BusyInterval) -> Self {
        Self {
            id: iv.id.to_string(),
            start: iv.start.to_rfc3339(),
            end: iv.end.to_rfc3339(),
            title: iv.title.clone(),
            recurrence: iv.recurrence,
            parent_id: iv.parent_id.as_ref().map(|p| p.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (e.g., "2026-03-16T09:00:00.000Z", as produced by
/// `Date.prototype.toISOString`) and naive datetimes, which are taken as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Invalid date '{}': {}", s, e))
}

fn parse_tz(name: &str) -> Result<Tz, String> {
    parse_timezone(name).map_err(|e| e.to_string())
}

fn to_interval(owner: &UserId, input: IntervalInput) -> Result<BusyInterval, String> {
    let interval = BusyInterval {
        id: input
            .id
            .map(IntervalId::new)
            .unwrap_or_else(IntervalId::generate),
        owner_id: owner.clone(),
        start: parse_datetime(&input.start)?,
        end: parse_datetime(&input.end)?,
        title: input.title,
        recurrence: input.recurrence,
        parent_id: input.parent_id.map(IntervalId::new),
    };
    interval.validate().map_err(|e| e.to_string())?;
    Ok(interval)
}

/// Convert a JSON array of interval objects into `Vec<BusyInterval>`.
fn parse_intervals_json(owner: &UserId, json: &str) -> Result<Vec<BusyInterval>, String> {
    let inputs: Vec<IntervalInput> =
        serde_json::from_str(json).map_err(|e| format!("Invalid intervals JSON: {}", e))?;
    inputs.into_iter().map(|i| to_interval(owner, i)).collect()
}

/// Convert a JSON array of interval arrays, one per comparison member.
fn parse_comparison_json(json: &str) -> Result<Vec<Vec<BusyInterval>>, String> {
    let members: Vec<Vec<IntervalInput>> =
        serde_json::from_str(json).map_err(|e| format!("Invalid comparison JSON: {}", e))?;
    members
        .into_iter()
        .enumerate()
        .map(|(i, list)| {
            let owner = UserId::new(format!("member-{}", i));
            list.into_iter().map(|iv| to_interval(&owner, iv)).collect()
        })
        .collect()
}

fn week_window(anchor: &str, timezone: &str) -> Result<WeekWindow, String> {
    let tz = parse_tz(timezone)?;
    Ok(WeekWindow::containing_date(parse_date(anchor)?, tz))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn compute_week_impl(
    owner_json: &str,
    comparison_json: &str,
    week_of: &str,
    timezone: &str,
    start_hour: u32,
    end_hour: u32,
) -> Result<String, String> {
    let owner = parse_intervals_json(&UserId::new("owner"), owner_json)?;
    let comparison = parse_comparison_json(comparison_json)?;
    let week = week_window(week_of, timezone)?;
    let hours = HourRange::new(start_hour, end_hour).map_err(|e| e.to_string())?;

    let grid = compute_week(&owner, &comparison, &week, hours).map_err(|e| e.to_string())?;
    to_json(&grid)
}

fn common_free_spans_impl(
    owner_json: &str,
    comparison_json: &str,
    week_of: &str,
    timezone: &str,
    start_hour: u32,
    end_hour: u32,
) -> Result<String, String> {
    let owner = parse_intervals_json(&UserId::new("owner"), owner_json)?;
    let comparison = parse_comparison_json(comparison_json)?;
    let week = week_window(week_of, timezone)?;
    let hours = HourRange::new(start_hour, end_hour).map_err(|e| e.to_string())?;

    let spans =
        common_free_spans(&owner, &comparison, &week, hours).map_err(|e| e.to_string())?;
    to_json(&spans)
}

fn render_week_impl(snapshot_json: &str, context_json: &str) -> Result<String, String> {
    let snapshot = Snapshot::from_json(snapshot_json).map_err(|e| e.to_string())?;
    let ctx: ViewContext =
        serde_json::from_str(context_json).map_err(|e| format!("Invalid context JSON: {}", e))?;

    let grid = render_week(&ctx, &snapshot.schedules, &snapshot.directory)
        .map_err(|e| e.to_string())?;
    to_json(&grid)
}

fn shift_week_impl(week_of: &str, timezone: &str, delta_weeks: i32) -> Result<String, String> {
    let week = week_window(week_of, timezone)?;
    let shifted = week.shift(delta_weeks).map_err(|e| e.to_string())?;
    Ok(shifted.anchor().to_string())
}

fn expand_recurrence_impl(interval_json: &str, timezone: &str) -> Result<String, String> {
    let input: IntervalInput =
        serde_json::from_str(interval_json).map_err(|e| format!("Invalid interval JSON: {}", e))?;
    let tz = parse_tz(timezone)?;
    let parent = to_interval(&UserId::new("owner"), input)?;

    let occurrences = recurrence::expand(&parent, tz).map_err(|e| e.to_string())?;
    let dtos: Vec<IntervalDto> = occurrences.iter().map(IntervalDto::from).collect();
    to_json(&dtos)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Classify every displayed hour of a week.
///
/// `owner_json` is a JSON array of `{start, end}` interval objects (ISO 8601).
/// `comparison_json` is a JSON array of such arrays, one per comparison member.
/// `week_of` is any `YYYY-MM-DD` date inside the week. Returns the grid as JSON
/// with a `cells` array of `{day, hour, date, classification}` objects.
#[wasm_bindgen(js_name = "computeWeek")]
pub fn compute_week_js(
    owner_json: &str,
    comparison_json: &str,
    week_of: &str,
    timezone: &str,
    start_hour: u32,
    end_hour: u32,
) -> Result<String, JsValue> {
    compute_week_impl(owner_json, comparison_json, week_of, timezone, start_hour, end_hour)
        .map_err(|e| JsValue::from_str(&e))
}

/// Common free spans of the owner and all comparison members, per day.
///
/// Same arguments as `computeWeek`. Returns a JSON array of
/// `{start, end, duration_minutes}` objects.
#[wasm_bindgen(js_name = "commonFreeSpans")]
pub fn common_free_spans_js(
    owner_json: &str,
    comparison_json: &str,
    week_of: &str,
    timezone: &str,
    start_hour: u32,
    end_hour: u32,
) -> Result<String, JsValue> {
    common_free_spans_impl(owner_json, comparison_json, week_of, timezone, start_hour, end_hour)
        .map_err(|e| JsValue::from_str(&e))
}

/// Compute the grid for a view context over a full snapshot.
///
/// `context_json` is `{current_user, week: {anchor, tz}, comparison, hours}`.
#[wasm_bindgen(js_name = "renderWeek")]
pub fn render_week_js(snapshot_json: &str, context_json: &str) -> Result<String, JsValue> {
    render_week_impl(snapshot_json, context_json).map_err(|e| JsValue::from_str(&e))
}

/// Sunday (`YYYY-MM-DD`) of the week containing `now` in `timezone`.
#[wasm_bindgen(js_name = "currentWeek")]
pub fn current_week(now: &str, timezone: &str) -> Result<String, JsValue> {
    let tz = parse_tz(timezone).map_err(|e| JsValue::from_str(&e))?;
    let now = parse_datetime(now).map_err(|e| JsValue::from_str(&e))?;
    Ok(WeekWindow::containing(now, tz).anchor().to_string())
}

/// Sunday of the week `delta_weeks` away from the week containing `week_of`.
#[wasm_bindgen(js_name = "shiftWeek")]
pub fn shift_week(week_of: &str, timezone: &str, delta_weeks: i32) -> Result<String, JsValue> {
    shift_week_impl(week_of, timezone, delta_weeks).map_err(|e| JsValue::from_str(&e))
}

/// Header label for the week containing `week_of`, e.g. `"Mar 15 - 21, 2026"`.
#[wasm_bindgen(js_name = "weekLabel")]
pub fn week_label(week_of: &str, timezone: &str) -> Result<String, JsValue> {
    let week = week_window(week_of, timezone).map_err(|e| JsValue::from_str(&e))?;
    Ok(week.label())
}

/// Expand a repeating interval into its following occurrences.
///
/// `interval_json` is one `{start, end, title, recurrence}` object; `recurrence`
/// (or `repeat`) is `"none"`, `"daily"`, or `"weekly"`. Returns a JSON array of
/// occurrence objects carrying `parentId`.
#[wasm_bindgen(js_name = "expandRecurrence")]
pub fn expand_recurrence(interval_json: &str, timezone: &str) -> Result<String, JsValue> {
    expand_recurrence_impl(interval_json, timezone).map_err(|e| JsValue::from_str(&e))
}
