use serde::{Deserialize, Serialize};

use crate::theme::ThemeColors;

/// A single task on a calendar day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique identifier for the task (opaque, unique within its day).
    pub id: String,
    /// What the task says.
    pub title: String,
    /// Whether the task has been completed.
    #[serde(default)]
    pub completed: bool,
}

/// Everything stored for one user on one calendar day.
///
/// Created lazily on the first mutation that touches the day; an empty task
/// list is a valid state distinct from "no record yet".
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    /// The day, canonical `YYYY-MM-DD`.
    pub date: String,
    /// Tasks in display order (insertion order).
    pub tasks: Vec<Task>,
    /// True once the day has been customized by a direct edit. A customized
    /// day refuses non-forced template application.
    #[serde(default)]
    pub overrides_template: bool,
    /// Free-text note for the day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A task stub inside a template: just a title.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TemplateTask {
    pub title: String,
}

/// A reusable, globally shared list of task stubs.
///
/// Applying a template stamps copies into the day; the day never keeps a
/// reference back, so later template edits leave already-seeded days alone.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskTemplate {
    /// Unique identifier for the template.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Ordered task stubs.
    pub tasks: Vec<TemplateTask>,
}

/// A local identity. Purely a label for a data partition; there is no
/// authentication.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    /// Unique identifier, doubles as the partition key.
    pub id: String,
    /// Display name (derived from the email local part at login).
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A user-created theme. Holds only the color slots the user overrode;
/// anything unset falls back to the system default at resolution time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CustomTheme {
    /// Generated unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Partial color set, slot -> `"H S% L%"`.
    pub colors: ThemeColors,
}

/// One of the themes shipped with the application. Complete color set,
/// stable readable id, immutable at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct PredefinedTheme {
    pub id: &'static str,
    pub name: &'static str,
    pub colors: ThemeColors,
}
