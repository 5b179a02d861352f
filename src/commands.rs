use std::io::{self, Write};

use chrono::{Local, NaiveDate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{TaskTemplate, TemplateTask};
use crate::store::{AppState, ApplyOutcome, TaskPatch};
use crate::storage::{delete_database, load_state, save_state};
use crate::theme::{predefined_themes, ColorSlot, ThemeColors};

/// Writes the state back to disk. A failed save is reported as a warning;
/// the in-memory mutation already happened and stays authoritative for this
/// invocation.
fn persist(state: &AppState, silent: bool) {
    if let Err(e) = save_state(state) {
        if !silent {
            eprintln!("Warning: could not save ({}). Changes may not be saved.", e);
        }
    }
}

/// Parses an optional `YYYY-MM-DD` argument, defaulting to today.
fn resolve_date(date: Option<String>, silent: bool) -> Option<NaiveDate> {
    match date {
        None => Some(Local::now().date_naive()),
        Some(d) => match NaiveDate::parse_from_str(&d, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(e) => {
                if !silent {
                    eprintln!("Invalid date '{}': {}. Use YYYY-MM-DD.", d, e);
                }
                None
            }
        },
    }
}

/// Maps a 1-based position in the day's list to the task's id.
fn task_id_at(state: &AppState, date: NaiveDate, index: usize) -> Option<String> {
    let record = state.day(date)?;
    record
        .tasks
        .get(index.checked_sub(1)?)
        .map(|t| t.id.clone())
}

/// Adds a task to a day (today by default).
pub fn cmd_add(title: String, date: Option<String>, silent: bool) {
    let Some(date) = resolve_date(date, silent) else {
        return;
    };
    let mut state = load_state();
    match state.add_task(date, &title) {
        Ok(_) => {
            persist(&state, silent);
            if !silent {
                println!("Task added to {}.", date);
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("{}", e);
            }
        }
    }
}

/// Shows a day's tasks and note in a formatted table.
pub fn cmd_list(date: Option<String>) {
    let Some(date) = resolve_date(date, false) else {
        return;
    };
    let state = load_state();
    let Some(record) = state.day(date) else {
        println!("No tasks for {}.", date);
        return;
    };

    let origin = if record.overrides_template {
        "customized"
    } else {
        "template-derived"
    };
    println!("Tasks for {} ({}, user: {})", date, origin, state.active_user_id());

    if record.tasks.is_empty() {
        println!("No tasks.");
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("#").add_attribute(Attribute::Bold),
                Cell::new("Title").add_attribute(Attribute::Bold),
                Cell::new("Status").add_attribute(Attribute::Bold),
            ]);
        for (i, task) in record.tasks.iter().enumerate() {
            let status = if task.completed { "Done" } else { "Pending" };
            let status_color = if task.completed { Color::Green } else { Color::Yellow };
            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(&task.title),
                Cell::new(status).fg(status_color),
            ]);
        }
        println!("{table}");
    }

    if let Some(note) = &record.note {
        if !note.is_empty() {
            println!("Note: {}", note);
        }
    }
}

/// Toggles completion of the task at the given position.
pub fn cmd_toggle(index: usize, date: Option<String>, silent: bool) {
    let Some(date) = resolve_date(date, silent) else {
        return;
    };
    let mut state = load_state();
    let Some(task_id) = task_id_at(&state, date, index) else {
        if !silent {
            eprintln!("No task {} on {}.", index, date);
        }
        return;
    };
    state.toggle_task(date, &task_id);
    persist(&state, silent);
    if !silent {
        println!("Task {} toggled.", index);
    }
}

/// Renames the task at the given position.
pub fn cmd_edit(index: usize, title: String, date: Option<String>, silent: bool) {
    let Some(date) = resolve_date(date, silent) else {
        return;
    };
    let mut state = load_state();
    let Some(task_id) = task_id_at(&state, date, index) else {
        if !silent {
            eprintln!("No task {} on {}.", index, date);
        }
        return;
    };
    match state.update_task(date, &task_id, TaskPatch { title: Some(title), completed: None }) {
        Ok(()) => {
            persist(&state, silent);
            if !silent {
                println!("Task {} updated.", index);
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("{}", e);
            }
        }
    }
}

/// Removes the task at the given position.
pub fn cmd_remove(index: usize, date: Option<String>, silent: bool) {
    let Some(date) = resolve_date(date, silent) else {
        return;
    };
    let mut state = load_state();
    let Some(task_id) = task_id_at(&state, date, index) else {
        if !silent {
            eprintln!("No task {} on {}.", index, date);
        }
        return;
    };
    state.delete_task(date, &task_id);
    persist(&state, silent);
    if !silent {
        println!("Task {} removed.", index);
    }
}

/// Sets the day's note.
pub fn cmd_note(text: String, date: Option<String>, silent: bool) {
    let Some(date) = resolve_date(date, silent) else {
        return;
    };
    let mut state = load_state();
    state.set_note(date, &text);
    persist(&state, silent);
    if !silent {
        println!("Note set for {}.", date);
    }
}

/// Creates a template from a name and task titles.
pub fn cmd_template_add(name: String, titles: Vec<String>, silent: bool) {
    let mut state = load_state();
    match state.add_template(&name, titles) {
        Ok(template) => {
            persist(&state, silent);
            if !silent {
                println!("Template '{}' added (id = {}).", template.name, template.id);
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("{}", e);
            }
        }
    }
}

/// Lists all templates.
pub fn cmd_template_list() {
    let state = load_state();
    if state.templates.is_empty() {
        println!("No templates found.");
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Name", "Tasks"]);
    for t in &state.templates {
        let titles: Vec<&str> = t.tasks.iter().map(|s| s.title.as_str()).collect();
        table.add_row(vec![t.id.clone(), t.name.clone(), titles.join(", ")]);
    }
    println!("{table}");
}

/// Edits a template's name and/or task list. The template is addressed by
/// id or name.
pub fn cmd_template_edit(
    reference: String,
    name: Option<String>,
    titles: Option<Vec<String>>,
    silent: bool,
) {
    let mut state = load_state();
    let Some(existing) = state.find_template(&reference) else {
        if !silent {
            eprintln!("Template '{}' not found.", reference);
        }
        return;
    };
    let updated = TaskTemplate {
        id: existing.id.clone(),
        name: name.unwrap_or_else(|| existing.name.clone()),
        tasks: match titles {
            Some(titles) => titles.into_iter().map(|title| TemplateTask { title }).collect(),
            None => existing.tasks.clone(),
        },
    };
    match state.update_template(updated) {
        Ok(()) => {
            persist(&state, silent);
            if !silent {
                println!("Template '{}' updated.", reference);
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("{}", e);
            }
        }
    }
}

/// Removes a template by id or name. Days seeded from it keep their tasks.
pub fn cmd_template_remove(reference: String, silent: bool) {
    let mut state = load_state();
    let Some(template) = state.find_template(&reference) else {
        if !silent {
            eprintln!("Template '{}' not found.", reference);
        }
        return;
    };
    let id = template.id.clone();
    state.delete_template(&id);
    persist(&state, silent);
    if !silent {
        println!("Template '{}' removed.", reference);
    }
}

/// Applies a template to a day. A customized day is left alone unless
/// `force` is set.
pub fn cmd_template_apply(reference: String, date: Option<String>, force: bool, silent: bool) {
    let Some(date) = resolve_date(date, silent) else {
        return;
    };
    let mut state = load_state();
    let Some(template) = state.find_template(&reference) else {
        if !silent {
            eprintln!("Template '{}' not found.", reference);
        }
        return;
    };
    let id = template.id.clone();
    match state.apply_template(&id, date, force) {
        Ok(ApplyOutcome::Applied) => {
            persist(&state, silent);
            if !silent {
                println!("Template applied to {}.", date);
            }
        }
        Ok(ApplyOutcome::Protected) => {
            if !silent {
                println!(
                    "{} has custom tasks; template not applied. Use --force to override.",
                    date
                );
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("{}", e);
            }
        }
    }
}

/// Starts a session for the given email. This is a local label, not real
/// authentication; it switches every per-user collection to a fresh
/// partition.
pub fn cmd_login(email: String, silent: bool) {
    let mut state = load_state();
    match state.log_in(&email) {
        Ok(user) => {
            persist(&state, silent);
            if !silent {
                println!("Logged in as {} ({}).", user.name, user.id);
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("{}", e);
            }
        }
    }
}

/// Ends the session; data routes back to the guest partition.
pub fn cmd_logout(silent: bool) {
    let mut state = load_state();
    state.log_out();
    persist(&state, silent);
    if !silent {
        println!("Logged out. Using the guest partition.");
    }
}

/// Prints the current user.
pub fn cmd_whoami() {
    let state = load_state();
    match &state.current_user {
        Some(user) => println!(
            "{} ({}){}",
            user.name,
            user.id,
            user.email
                .as_ref()
                .map(|e| format!(" <{}>", e))
                .unwrap_or_default()
        ),
        None => println!("Not logged in (guest partition)."),
    }
}

/// Lists predefined and custom themes, marking the active one.
pub fn cmd_theme_list() {
    let state = load_state();
    let active = state.active_theme_id().to_string();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["", "Kind", "ID", "Name"]);
    for t in predefined_themes() {
        let marker = if t.id == active { "*" } else { "" };
        table.add_row(vec![marker, "predefined", t.id, t.name]);
    }
    for t in state.active_custom_themes() {
        let marker = if t.id == active { "*" } else { "" };
        table.add_row(vec![marker, "custom", t.id.as_str(), t.name.as_str()]);
    }
    println!("{table}");
}

/// Activates a theme by id or name for the current user. Unknown
/// identifiers are accepted (resolution falls back to the default palette)
/// but flagged, since a typo is the likelier cause.
pub fn cmd_theme_set(reference: String, silent: bool) {
    let mut state = load_state();
    let resolved = predefined_themes()
        .iter()
        .find(|t| t.id == reference || t.name == reference)
        .map(|t| t.id.to_string())
        .or_else(|| state.find_custom_theme(&reference).map(|t| t.id.clone()));
    let identifier = match resolved {
        Some(id) => id,
        None => {
            if !silent {
                eprintln!(
                    "Warning: '{}' matches no theme; the default palette will be used.",
                    reference
                );
            }
            reference
        }
    };
    state.set_active_theme(&identifier);
    persist(&state, silent);
    if !silent {
        println!("Active theme set to '{}'.", identifier);
    }
}

/// Creates a custom theme. Colors are given as `slot=H S% L%` pairs, e.g.
/// `--color "background=240 10% 3.9%"`; unset slots fall back to the system
/// default when the theme is resolved.
pub fn cmd_theme_add(name: String, colors: Vec<String>, silent: bool) {
    let mut parsed: ThemeColors = ThemeColors::new();
    for pair in &colors {
        let Some((key, value)) = pair.split_once('=') else {
            if !silent {
                eprintln!("Invalid color '{}'. Expected slot=H S% L%.", pair);
            }
            return;
        };
        let Some(slot) = ColorSlot::from_name(key.trim()) else {
            if !silent {
                let names: Vec<&str> = ColorSlot::ALL.iter().map(|s| s.name()).collect();
                eprintln!("Unknown color slot '{}'. Slots: {}.", key, names.join(", "));
            }
            return;
        };
        parsed.insert(slot, value.trim().to_string());
    }

    let mut state = load_state();
    match state.add_custom_theme(&name, parsed) {
        Ok(theme) => {
            persist(&state, silent);
            if !silent {
                println!("Theme '{}' added and set as active (id = {}).", theme.name, theme.id);
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("{}", e);
            }
        }
    }
}

/// Deletes one of the current user's custom themes by id or name. If it was
/// active, the default theme takes over.
pub fn cmd_theme_remove(reference: String, silent: bool) {
    let mut state = load_state();
    let Some(theme) = state.find_custom_theme(&reference) else {
        if !silent {
            eprintln!("Theme '{}' not found.", reference);
        }
        return;
    };
    let id = theme.id.clone();
    state.delete_custom_theme(&id);
    persist(&state, silent);
    if !silent {
        println!("Theme '{}' removed.", reference);
    }
}

/// Prints the fully resolved active color set.
pub fn cmd_theme_show() {
    let state = load_state();
    let colors = state.active_theme_colors();
    println!("Active theme: {}", state.active_theme_id());
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Slot", "HSL"]);
    for slot in ColorSlot::ALL {
        let value = colors.get(&slot).map(|s| s.as_str()).unwrap_or("");
        table.add_row(vec![slot.name(), value]);
    }
    println!("{table}");
}

/// Resets the database by deleting the persisted state.
pub fn cmd_reset(force: bool) {
    if !force {
        print!("Are you sure you want to delete all data? This cannot be undone. [y/N] ");
        io::stdout().flush().unwrap();
        let mut input = String::new();
        io::stdin().read_line(&mut input).unwrap();
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = delete_database() {
        eprintln!("Failed to reset database: {}", e);
    } else {
        println!("Database reset successfully.");
    }
}
