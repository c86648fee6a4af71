//! Maps a webhook path and task properties to the habit checkboxes to update.

use serde_json::{Map, Value};

/// Status name that marks a task as completed.
const DONE_STATUS: &str = "Done";

/// Paths that always update one fixed habit, checked before the `Habit` tags.
///
/// `/run` writes to the `Walk` column.
const FIXED_ROUTES: &[(&str, &str)] = &[("/gym", "Gym"), ("/run", "Walk")];

/// A checkbox to set on the daily record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitUpdate {
    pub property_name: String,
    pub is_done: bool,
}

/// Reads `Status.status.name`, empty when any part is missing.
fn status_name(properties: &Map<String, Value>) -> &str {
    properties
        .get("Status")
        .and_then(|status| status.get("status"))
        .and_then(|status| status.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// Trimmed, non-empty names from `Habit.multi_select`.
fn tagged_habits(properties: &Map<String, Value>) -> Vec<String> {
    let Some(entries) = properties
        .get("Habit")
        .and_then(|habit| habit.get("multi_select"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| entry.get("name").and_then(Value::as_str))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Derive the habits to update for a request.
pub fn derive_habits(path: &str, properties: &Map<String, Value>) -> Vec<HabitUpdate> {
    let is_done = status_name(properties) == DONE_STATUS;

    let names = match FIXED_ROUTES.iter().find(|(route, _)| *route == path) {
        Some((_, property_name)) => vec![property_name.to_string()],
        None => tagged_habits(properties),
    };

    names
        .into_iter()
        .map(|property_name| HabitUpdate {
            property_name,
            is_done,
        })
        .collect()
}
