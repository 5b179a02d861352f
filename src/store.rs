use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CustomTheme, DayRecord, Task, TaskTemplate, TemplateTask, User};
use crate::theme::{self, ColorSlot, ThemeColors, DEFAULT_THEME_ID};

/// Partition used while nobody is logged in. Guest data persists alongside
/// named users' data and survives logins.
pub const GUEST_USER_ID: &str = "guest";

/// Validation failures surfaced to the caller. None of these mutate state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("name cannot be empty")]
    EmptyName,
    #[error("email cannot be empty")]
    EmptyEmail,
    #[error("template not found: {0}")]
    TemplateNotFound(String),
    #[error("invalid HSL color for {slot}: {value:?} (expected \"H S% L%\")")]
    InvalidColor { slot: ColorSlot, value: String },
}

/// What happened on a template application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The day now carries a fresh copy of the template's tasks.
    Applied,
    /// The day has been customized and `force` was not set; nothing changed.
    Protected,
}

/// Partial update for a task. Unset fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

/// The entire application state: the current session, every user partition
/// (day records, custom themes, active theme identifier) and the global
/// template list. This is exactly what gets persisted.
///
/// All per-user collections are keyed by user id; missing keys simply mean
/// "no data yet" and are never an error. Mutating operations route through
/// the current user's partition (or the guest partition when logged out).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub current_user: Option<User>,
    /// userId -> date (`YYYY-MM-DD`) -> record.
    #[serde(default)]
    pub user_days: BTreeMap<String, BTreeMap<String, DayRecord>>,
    #[serde(default)]
    pub user_custom_themes: BTreeMap<String, Vec<CustomTheme>>,
    #[serde(default)]
    pub user_active_themes: BTreeMap<String, String>,
    #[serde(default)]
    pub templates: Vec<TaskTemplate>,
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn generate_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

impl AppState {
    // ---- session ----

    /// The id owning all per-user reads and writes right now.
    pub fn active_user_id(&self) -> &str {
        self.current_user
            .as_ref()
            .map(|u| u.id.as_str())
            .unwrap_or(GUEST_USER_ID)
    }

    /// Switches the current user. A pure pointer change: no partition is
    /// copied, merged or deleted.
    pub fn set_current_user(&mut self, user: Option<User>) {
        self.current_user = user;
    }

    /// Starts a session for `email`. The display name is the email local
    /// part; the id is freshly generated, so each login opens a new
    /// partition while older ones persist untouched.
    pub fn log_in(&mut self, email: &str) -> Result<User, StoreError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(StoreError::EmptyEmail);
        }
        let name = email.split('@').next().unwrap_or(email).to_string();
        let user = User {
            id: generate_id("user"),
            name,
            email: Some(email.to_string()),
        };
        self.current_user = Some(user.clone());
        Ok(user)
    }

    /// Ends the session; subsequent operations hit the guest partition.
    pub fn log_out(&mut self) {
        self.current_user = None;
    }

    // ---- daily task records ----

    /// The current user's record for `date`, if one exists.
    pub fn day(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.user_days
            .get(self.active_user_id())?
            .get(&date_key(date))
    }

    fn day_mut(&mut self, date: NaiveDate) -> Option<&mut DayRecord> {
        let user = self.active_user_id().to_string();
        self.user_days.get_mut(&user)?.get_mut(&date_key(date))
    }

    fn day_entry(&mut self, date: NaiveDate) -> &mut DayRecord {
        let user = self.active_user_id().to_string();
        let key = date_key(date);
        self.user_days
            .entry(user)
            .or_default()
            .entry(key.clone())
            .or_insert_with(|| DayRecord {
                date: key,
                tasks: Vec::new(),
                overrides_template: false,
                note: None,
            })
    }

    /// Appends a new pending task to `date` and returns its id. Creates the
    /// record if needed. Adding a task is a customization, so the day's
    /// override flag is always set.
    pub fn add_task(&mut self, date: NaiveDate, title: &str) -> Result<String, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        let id = generate_id("task");
        let record = self.day_entry(date);
        record.tasks.push(Task {
            id: id.clone(),
            title: title.to_string(),
            completed: false,
        });
        record.overrides_template = true;
        Ok(id)
    }

    /// Merges `patch` into the task. A no-op when the record or task is
    /// missing; marks the day customized otherwise.
    pub fn update_task(
        &mut self,
        date: NaiveDate,
        task_id: &str,
        patch: TaskPatch,
    ) -> Result<(), StoreError> {
        let title = match patch.title {
            Some(t) => {
                let t = t.trim().to_string();
                if t.is_empty() {
                    return Err(StoreError::EmptyTitle);
                }
                Some(t)
            }
            None => None,
        };
        let Some(record) = self.day_mut(date) else {
            return Ok(());
        };
        let Some(task) = record.tasks.iter_mut().find(|t| t.id == task_id) else {
            return Ok(());
        };
        if let Some(t) = title {
            task.title = t;
        }
        if let Some(c) = patch.completed {
            task.completed = c;
        }
        record.overrides_template = true;
        Ok(())
    }

    /// Removes the task by id if present. A no-op when the record is
    /// missing; marks the day customized otherwise.
    pub fn delete_task(&mut self, date: NaiveDate, task_id: &str) {
        if let Some(record) = self.day_mut(date) {
            record.tasks.retain(|t| t.id != task_id);
            record.overrides_template = true;
        }
    }

    /// Flips a task's completion. A no-op when the record or task is
    /// missing. Toggling counts as a customization, the same as an edit; the
    /// protection against template overwrite depends on this.
    pub fn toggle_task(&mut self, date: NaiveDate, task_id: &str) {
        if let Some(record) = self.day_mut(date) {
            if let Some(task) = record.tasks.iter_mut().find(|t| t.id == task_id) {
                task.completed = !task.completed;
                record.overrides_template = true;
            }
        }
    }

    /// Wholesale-replaces the day's tasks. When the day stays customized the
    /// note is kept; a clean template application (`overrides_template =
    /// false`) resets the day and drops the note.
    pub fn set_tasks(&mut self, date: NaiveDate, tasks: Vec<Task>, overrides_template: bool) {
        let user = self.active_user_id().to_string();
        let key = date_key(date);
        let note = if overrides_template {
            self.user_days
                .get(&user)
                .and_then(|days| days.get(&key))
                .and_then(|r| r.note.clone())
        } else {
            None
        };
        self.user_days.entry(user).or_default().insert(
            key.clone(),
            DayRecord {
                date: key,
                tasks,
                overrides_template,
                note,
            },
        );
    }

    /// Sets the day's free-text note, creating the record if needed. Notes
    /// are customizations too.
    pub fn set_note(&mut self, date: NaiveDate, text: &str) {
        let record = self.day_entry(date);
        record.note = Some(text.to_string());
        record.overrides_template = true;
    }

    /// Stamps a template onto `date`.
    ///
    /// A customized day is protected: without `force` the call returns
    /// [`ApplyOutcome::Protected`] and mutates nothing. Otherwise the
    /// template's stubs are materialized into fresh tasks (new ids, all
    /// pending, template order) and the day becomes template-derived, note
    /// cleared. The day keeps copies, never references; editing the template
    /// afterwards does not touch this day.
    pub fn apply_template(
        &mut self,
        template_id: &str,
        date: NaiveDate,
        force: bool,
    ) -> Result<ApplyOutcome, StoreError> {
        let Some(template) = self.templates.iter().find(|t| t.id == template_id) else {
            return Err(StoreError::TemplateNotFound(template_id.to_string()));
        };
        if !force {
            if let Some(record) = self.day(date) {
                if record.overrides_template {
                    return Ok(ApplyOutcome::Protected);
                }
            }
        }
        let tasks: Vec<Task> = template
            .tasks
            .iter()
            .map(|stub| Task {
                id: generate_id("task"),
                title: stub.title.clone(),
                completed: false,
            })
            .collect();
        self.set_tasks(date, tasks, false);
        Ok(ApplyOutcome::Applied)
    }

    // ---- templates (global) ----

    /// Creates a template from a name and a list of task titles.
    pub fn add_template(
        &mut self,
        name: &str,
        titles: Vec<String>,
    ) -> Result<TaskTemplate, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        let template = TaskTemplate {
            id: generate_id("template"),
            name: name.to_string(),
            tasks: titles.into_iter().map(|title| TemplateTask { title }).collect(),
        };
        self.templates.push(template.clone());
        Ok(template)
    }

    /// Replaces a template by id; a no-op when the id is unknown.
    pub fn update_template(&mut self, template: TaskTemplate) -> Result<(), StoreError> {
        if template.name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        if let Some(existing) = self.templates.iter_mut().find(|t| t.id == template.id) {
            *existing = template;
        }
        Ok(())
    }

    /// Removes a template. Days that already consumed it keep their copies.
    pub fn delete_template(&mut self, template_id: &str) {
        self.templates.retain(|t| t.id != template_id);
    }

    /// Finds a template by id or, failing that, by name.
    pub fn find_template(&self, reference: &str) -> Option<&TaskTemplate> {
        self.templates
            .iter()
            .find(|t| t.id == reference)
            .or_else(|| self.templates.iter().find(|t| t.name == reference))
    }

    // ---- themes (per partition) ----

    /// The current user's custom themes, in creation order.
    pub fn active_custom_themes(&self) -> &[CustomTheme] {
        self.user_custom_themes
            .get(self.active_user_id())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The current user's active theme identifier.
    pub fn active_theme_id(&self) -> &str {
        self.user_active_themes
            .get(self.active_user_id())
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_THEME_ID)
    }

    /// Points the current user at a theme identifier. The identifier is not
    /// required to exist; resolution falls back to the default palette.
    pub fn set_active_theme(&mut self, identifier: &str) {
        let user = self.active_user_id().to_string();
        self.user_active_themes.insert(user, identifier.to_string());
    }

    /// Creates a custom theme for the current user and makes it active.
    /// `colors` may cover any subset of the slots; each provided value must
    /// be a valid `"H S% L%"` triple.
    pub fn add_custom_theme(
        &mut self,
        name: &str,
        colors: ThemeColors,
    ) -> Result<CustomTheme, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        validate_colors(&colors)?;
        let theme = CustomTheme {
            id: generate_id("theme"),
            name: name.to_string(),
            colors,
        };
        let user = self.active_user_id().to_string();
        self.user_custom_themes
            .entry(user.clone())
            .or_default()
            .push(theme.clone());
        self.user_active_themes.insert(user, theme.id.clone());
        Ok(theme)
    }

    /// Replaces a custom theme by id and re-activates it; a no-op when the
    /// id is unknown to this user's partition.
    pub fn update_custom_theme(&mut self, theme: CustomTheme) -> Result<(), StoreError> {
        if theme.name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        validate_colors(&theme.colors)?;
        let user = self.active_user_id().to_string();
        let Some(themes) = self.user_custom_themes.get_mut(&user) else {
            return Ok(());
        };
        if let Some(existing) = themes.iter_mut().find(|t| t.id == theme.id) {
            let id = theme.id.clone();
            *existing = theme;
            self.user_active_themes.insert(user, id);
        }
        Ok(())
    }

    /// Deletes one of the current user's custom themes. If it was active,
    /// the user falls back to the canonical default theme; other users'
    /// active identifiers are untouched.
    pub fn delete_custom_theme(&mut self, theme_id: &str) {
        let user = self.active_user_id().to_string();
        if let Some(themes) = self.user_custom_themes.get_mut(&user) {
            themes.retain(|t| t.id != theme_id);
        }
        if self.active_theme_id() == theme_id {
            self.user_active_themes
                .insert(user, DEFAULT_THEME_ID.to_string());
        }
    }

    /// Finds one of the current user's custom themes by id or name.
    pub fn find_custom_theme(&self, reference: &str) -> Option<&CustomTheme> {
        let themes = self.active_custom_themes();
        themes
            .iter()
            .find(|t| t.id == reference)
            .or_else(|| themes.iter().find(|t| t.name == reference))
    }

    /// The fully resolved color set for the current user's active theme.
    pub fn active_theme_colors(&self) -> ThemeColors {
        theme::resolve(self.active_theme_id(), self.active_custom_themes())
    }
}

fn validate_colors(colors: &ThemeColors) -> Result<(), StoreError> {
    for (slot, value) in colors {
        if theme::parse_hsl(value).is_none() {
            return Err(StoreError::InvalidColor {
                slot: *slot,
                value: value.clone(),
            });
        }
    }
    Ok(())
}
