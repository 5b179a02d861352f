use chrono::{Duration, Local, NaiveDate};
use ratatui::widgets::TableState;

use crate::store::{AppState, ApplyOutcome, TaskPatch};
use crate::storage::{load_state, save_state};
use crate::theme::predefined_themes;

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    AddingTask,
    EditingTitle,
    EditingNote,
}

pub enum ViewMode {
    Day,
    Templates,
}

pub struct App {
    pub state: AppState,
    pub date: NaiveDate,
    pub task_state: TableState,
    pub template_state: TableState,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub status: Option<String>,
    /// Set when a save fails; the session keeps working in memory.
    pub degraded: bool,
}

impl App {
    /// Creates the app on today's date with the persisted state.
    pub fn new() -> App {
        let state = load_state();
        let date = Local::now().date_naive();
        let mut task_state = TableState::default();
        if state.day(date).map(|r| !r.tasks.is_empty()).unwrap_or(false) {
            task_state.select(Some(0));
        }
        let mut template_state = TableState::default();
        if !state.templates.is_empty() {
            template_state.select(Some(0));
        }
        App {
            state,
            date,
            task_state,
            template_state,
            view_mode: ViewMode::Day,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            status: None,
            degraded: false,
        }
    }

    fn persist(&mut self) {
        if save_state(&self.state).is_err() {
            self.degraded = true;
            self.status = Some("Could not save; changes may not be saved.".into());
        }
    }

    fn task_count(&self) -> usize {
        self.state.day(self.date).map(|r| r.tasks.len()).unwrap_or(0)
    }

    fn selected_task_id(&self) -> Option<String> {
        let index = self.task_state.selected()?;
        self.state
            .day(self.date)?
            .tasks
            .get(index)
            .map(|t| t.id.clone())
    }

    fn clamp_task_selection(&mut self) {
        let count = self.task_count();
        match self.task_state.selected() {
            _ if count == 0 => self.task_state.select(None),
            Some(i) if i >= count => self.task_state.select(Some(count - 1)),
            None => self.task_state.select(Some(0)),
            _ => {}
        }
    }

    /// Selects the next item in the current list.
    pub fn next(&mut self) {
        match self.view_mode {
            ViewMode::Day => {
                let count = self.task_count();
                if count == 0 {
                    return;
                }
                let i = match self.task_state.selected() {
                    Some(i) if i + 1 >= count => 0,
                    Some(i) => i + 1,
                    None => 0,
                };
                self.task_state.select(Some(i));
            }
            ViewMode::Templates => {
                let count = self.state.templates.len();
                if count == 0 {
                    return;
                }
                let i = match self.template_state.selected() {
                    Some(i) if i + 1 >= count => 0,
                    Some(i) => i + 1,
                    None => 0,
                };
                self.template_state.select(Some(i));
            }
        }
    }

    /// Selects the previous item in the current list.
    pub fn previous(&mut self) {
        match self.view_mode {
            ViewMode::Day => {
                let count = self.task_count();
                if count == 0 {
                    return;
                }
                let i = match self.task_state.selected() {
                    Some(0) | None => count - 1,
                    Some(i) => i - 1,
                };
                self.task_state.select(Some(i));
            }
            ViewMode::Templates => {
                let count = self.state.templates.len();
                if count == 0 {
                    return;
                }
                let i = match self.template_state.selected() {
                    Some(0) | None => count - 1,
                    Some(i) => i - 1,
                };
                self.template_state.select(Some(i));
            }
        }
    }

    pub fn toggle_view(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Day => ViewMode::Templates,
            ViewMode::Templates => ViewMode::Day,
        };
        self.status = None;
    }

    pub fn previous_day(&mut self) {
        self.date = self.date - Duration::days(1);
        self.clamp_task_selection();
        self.status = None;
    }

    pub fn next_day(&mut self) {
        self.date = self.date + Duration::days(1);
        self.clamp_task_selection();
        self.status = None;
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.state.toggle_task(self.date, &id);
            self.persist();
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.state.delete_task(self.date, &id);
            self.clamp_task_selection();
            self.persist();
        }
    }

    pub fn start_add(&mut self) {
        self.input_mode = InputMode::AddingTask;
        self.input_buffer.clear();
    }

    pub fn start_edit_title(&mut self) {
        let Some(index) = self.task_state.selected() else {
            return;
        };
        let Some(record) = self.state.day(self.date) else {
            return;
        };
        let Some(task) = record.tasks.get(index) else {
            return;
        };
        self.input_buffer = task.title.clone();
        self.input_mode = InputMode::EditingTitle;
    }

    pub fn start_edit_note(&mut self) {
        self.input_buffer = self
            .state
            .day(self.date)
            .and_then(|r| r.note.clone())
            .unwrap_or_default();
        self.input_mode = InputMode::EditingNote;
    }

    /// Commits whatever the input popup was collecting.
    pub fn handle_input(&mut self) {
        let text = self.input_buffer.clone();
        match self.input_mode {
            InputMode::AddingTask => match self.state.add_task(self.date, &text) {
                Ok(_) => {
                    self.clamp_task_selection();
                    self.persist();
                }
                Err(e) => self.status = Some(e.to_string()),
            },
            InputMode::EditingTitle => {
                if let Some(id) = self.selected_task_id() {
                    match self.state.update_task(
                        self.date,
                        &id,
                        TaskPatch { title: Some(text), completed: None },
                    ) {
                        Ok(()) => self.persist(),
                        Err(e) => self.status = Some(e.to_string()),
                    }
                }
            }
            InputMode::EditingNote => {
                self.state.set_note(self.date, &text);
                self.persist();
            }
            InputMode::Normal => {}
        }
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Applies the selected template to the current day. A customized day
    /// rejects the plain apply; `F` retries with force.
    pub fn apply_selected_template(&mut self, force: bool) {
        let Some(index) = self.template_state.selected() else {
            return;
        };
        let Some(template) = self.state.templates.get(index) else {
            return;
        };
        let id = template.id.clone();
        let name = template.name.clone();
        match self.state.apply_template(&id, self.date, force) {
            Ok(ApplyOutcome::Applied) => {
                self.persist();
                self.status = Some(format!("Applied '{}' to {}.", name, self.date));
                self.view_mode = ViewMode::Day;
                self.clamp_task_selection();
            }
            Ok(ApplyOutcome::Protected) => {
                self.status = Some(format!(
                    "{} has custom tasks. Press F to overwrite.",
                    self.date
                ));
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    /// Cycles the active theme through predefined then custom themes.
    pub fn cycle_theme(&mut self) {
        let mut ids: Vec<String> = predefined_themes()
            .iter()
            .map(|t| t.id.to_string())
            .collect();
        ids.extend(self.state.active_custom_themes().iter().map(|t| t.id.clone()));
        if ids.is_empty() {
            return;
        }
        let current = self.state.active_theme_id();
        let next = match ids.iter().position(|id| id == current) {
            Some(i) => (i + 1) % ids.len(),
            None => 0,
        };
        let id = ids[next].clone();
        self.state.set_active_theme(&id);
        self.persist();
        self.status = Some(format!("Theme: {}", self.active_theme_name()));
    }

    /// Display name of the active theme, falling back to its identifier.
    pub fn active_theme_name(&self) -> String {
        let active = self.state.active_theme_id();
        if let Some(t) = predefined_themes().iter().find(|t| t.id == active) {
            return t.name.to_string();
        }
        if let Some(t) = self.state.active_custom_themes().iter().find(|t| t.id == active) {
            return t.name.clone();
        }
        active.to_string()
    }
}
