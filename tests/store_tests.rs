use chrono::NaiveDate;
use habitual::models::{TaskTemplate, TemplateTask, User};
use habitual::store::{AppState, ApplyOutcome, StoreError, TaskPatch, GUEST_USER_ID};
use habitual::theme::{ColorSlot, ThemeColors, DEFAULT_THEME_ID};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        name: id.to_string(),
        email: None,
    }
}

#[test]
fn add_task_appends_pending_and_marks_customized() {
    let mut state = AppState::default();
    let d = date("2025-01-10");

    state.add_task(d, "Run").unwrap();
    state.add_task(d, "Read").unwrap();

    let record = state.day(d).unwrap();
    assert_eq!(record.tasks.len(), 2);
    assert_eq!(record.tasks[0].title, "Run");
    assert_eq!(record.tasks[1].title, "Read");
    assert!(record.tasks.iter().all(|t| !t.completed));
    assert!(record.overrides_template);
    assert_ne!(record.tasks[0].id, record.tasks[1].id);
    // Routed to the guest partition while logged out.
    assert!(state.user_days.contains_key(GUEST_USER_ID));
}

#[test]
fn empty_title_is_rejected_without_state_change() {
    let mut state = AppState::default();
    let d = date("2025-01-10");

    assert_eq!(state.add_task(d, "   "), Err(StoreError::EmptyTitle));
    assert!(state.day(d).is_none());
}

#[test]
fn update_task_patches_and_marks_customized() {
    let mut state = AppState::default();
    let d = date("2025-01-10");
    seed_template_derived_day(&mut state, d);
    let id = state.day(d).unwrap().tasks[0].id.clone();

    state
        .update_task(d, &id, TaskPatch { title: Some("Stretch harder".into()), completed: None })
        .unwrap();

    let record = state.day(d).unwrap();
    assert_eq!(record.tasks[0].title, "Stretch harder");
    assert!(record.overrides_template);
}

#[test]
fn update_task_with_unknown_id_is_a_noop() {
    let mut state = AppState::default();
    let d = date("2025-01-10");
    seed_template_derived_day(&mut state, d);
    let before = state.day(d).unwrap().clone();

    state
        .update_task(d, "task_nope", TaskPatch { title: Some("X".into()), completed: None })
        .unwrap();

    assert_eq!(state.day(d).unwrap(), &before);
    assert!(!state.day(d).unwrap().overrides_template);
}

#[test]
fn update_task_rejects_empty_title() {
    let mut state = AppState::default();
    let d = date("2025-01-10");
    state.add_task(d, "Run").unwrap();
    let id = state.day(d).unwrap().tasks[0].id.clone();

    let result =
        state.update_task(d, &id, TaskPatch { title: Some("  ".into()), completed: None });
    assert_eq!(result, Err(StoreError::EmptyTitle));
    assert_eq!(state.day(d).unwrap().tasks[0].title, "Run");
}

#[test]
fn toggle_flips_completion_and_marks_customized() {
    let mut state = AppState::default();
    let d = date("2025-01-10");
    seed_template_derived_day(&mut state, d);
    let id = state.day(d).unwrap().tasks[0].id.clone();

    state.toggle_task(d, &id);
    let record = state.day(d).unwrap();
    assert!(record.tasks[0].completed);
    assert!(record.overrides_template);

    state.toggle_task(d, &id);
    assert!(!state.day(d).unwrap().tasks[0].completed);
}

#[test]
fn toggle_with_unknown_id_is_a_noop() {
    let mut state = AppState::default();
    let d = date("2025-01-10");
    seed_template_derived_day(&mut state, d);
    let before = state.day(d).unwrap().clone();

    state.toggle_task(d, "task_nope");
    assert_eq!(state.day(d).unwrap(), &before);
}

#[test]
fn delete_task_removes_by_id_and_marks_customized() {
    let mut state = AppState::default();
    let d = date("2025-01-10");
    seed_template_derived_day(&mut state, d);
    let id = state.day(d).unwrap().tasks[0].id.clone();

    state.delete_task(d, &id);
    let record = state.day(d).unwrap();
    assert_eq!(record.tasks.len(), 1);
    assert!(record.tasks.iter().all(|t| t.id != id));
    assert!(record.overrides_template);
}

#[test]
fn set_note_creates_record_and_marks_customized() {
    let mut state = AppState::default();
    let d = date("2025-01-10");

    state.set_note(d, "call mom");
    let record = state.day(d).unwrap();
    assert_eq!(record.note.as_deref(), Some("call mom"));
    assert!(record.tasks.is_empty());
    assert!(record.overrides_template);
}

#[test]
fn apply_template_missing_is_reported() {
    let mut state = AppState::default();
    let result = state.apply_template("template_nope", date("2025-01-10"), false);
    assert_eq!(
        result,
        Err(StoreError::TemplateNotFound("template_nope".into()))
    );
}

#[test]
fn customized_day_is_protected_and_force_is_the_escape_hatch() {
    let mut state = AppState::default();
    let d = date("2025-01-10");
    state.add_task(d, "Run").unwrap();
    state.add_task(d, "Read").unwrap();
    state.set_note(d, "easy day");
    let template = state
        .add_template("Morning", vec!["Stretch".into(), "Meditate".into()])
        .unwrap();

    let before = state.day(d).unwrap().clone();
    assert_eq!(
        state.apply_template(&template.id, d, false).unwrap(),
        ApplyOutcome::Protected
    );
    assert_eq!(state.day(d).unwrap(), &before);

    assert_eq!(
        state.apply_template(&template.id, d, true).unwrap(),
        ApplyOutcome::Applied
    );
    let record = state.day(d).unwrap();
    let titles: Vec<&str> = record.tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Stretch", "Meditate"]);
    assert!(record.tasks.iter().all(|t| !t.completed));
    assert!(!record.overrides_template);
    assert_eq!(record.note, None);
}

#[test]
fn force_apply_is_idempotent_on_titles() {
    let mut state = AppState::default();
    let d = date("2025-01-10");
    let template = state
        .add_template("Morning", vec!["Stretch".into(), "Meditate".into()])
        .unwrap();

    state.apply_template(&template.id, d, true).unwrap();
    let first_ids: Vec<String> = state.day(d).unwrap().tasks.iter().map(|t| t.id.clone()).collect();

    state.apply_template(&template.id, d, true).unwrap();
    let record = state.day(d).unwrap();
    let titles: Vec<&str> = record.tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Stretch", "Meditate"]);
    assert!(!record.overrides_template);
    let second_ids: Vec<String> = record.tasks.iter().map(|t| t.id.clone()).collect();
    assert_ne!(first_ids, second_ids);
}

#[test]
fn reapplying_over_template_derived_day_needs_no_force() {
    let mut state = AppState::default();
    let d = date("2025-01-10");
    let morning = state.add_template("Morning", vec!["Stretch".into()]).unwrap();
    let evening = state.add_template("Evening", vec!["Journal".into()]).unwrap();

    state.apply_template(&morning.id, d, false).unwrap();
    assert_eq!(
        state.apply_template(&evening.id, d, false).unwrap(),
        ApplyOutcome::Applied
    );
    assert_eq!(state.day(d).unwrap().tasks[0].title, "Journal");
}

#[test]
fn applied_templates_are_copies_not_references() {
    let mut state = AppState::default();
    let d = date("2025-01-10");
    let template = state.add_template("Morning", vec!["Stretch".into()]).unwrap();
    state.apply_template(&template.id, d, false).unwrap();

    state
        .update_template(TaskTemplate {
            id: template.id.clone(),
            name: "Morning".into(),
            tasks: vec![TemplateTask { title: "Sprint".into() }],
        })
        .unwrap();
    assert_eq!(state.day(d).unwrap().tasks[0].title, "Stretch");

    state.delete_template(&template.id);
    assert!(state.templates.is_empty());
    assert_eq!(state.day(d).unwrap().tasks[0].title, "Stretch");
}

#[test]
fn set_tasks_keeps_note_only_while_customized() {
    let mut state = AppState::default();
    let d = date("2025-01-10");
    state.add_task(d, "Run").unwrap();
    state.set_note(d, "easy day");

    state.set_tasks(d, Vec::new(), true);
    assert_eq!(state.day(d).unwrap().note.as_deref(), Some("easy day"));

    state.set_tasks(d, Vec::new(), false);
    assert_eq!(state.day(d).unwrap().note, None);
    assert!(!state.day(d).unwrap().overrides_template);
}

#[test]
fn add_template_rejects_empty_name() {
    let mut state = AppState::default();
    assert_eq!(
        state.add_template("  ", vec!["Stretch".into()]).unwrap_err(),
        StoreError::EmptyName
    );
    assert!(state.templates.is_empty());
}

#[test]
fn partitions_are_isolated() {
    let mut state = AppState::default();
    let d = date("2025-01-10");

    // Guest data.
    state.add_task(d, "Guest run").unwrap();
    let guest_theme = state
        .add_custom_theme("Dusk", ThemeColors::new())
        .unwrap();

    // Switch user; nothing of the guest's shows through.
    state.set_current_user(Some(user("user_a")));
    assert!(state.day(d).is_none());
    assert!(state.active_custom_themes().is_empty());
    assert_eq!(state.active_theme_id(), DEFAULT_THEME_ID);

    // Mutations under user_a leave the guest partition untouched.
    state.add_task(d, "A's run").unwrap();
    state.set_active_theme("sky_blue");
    state.set_current_user(None);
    let guest_record = state.day(d).unwrap();
    assert_eq!(guest_record.tasks.len(), 1);
    assert_eq!(guest_record.tasks[0].title, "Guest run");
    assert_eq!(state.active_theme_id(), guest_theme.id);
}

#[test]
fn templates_are_shared_across_partitions() {
    let mut state = AppState::default();
    state.add_template("Morning", vec!["Stretch".into()]).unwrap();

    state.set_current_user(Some(user("user_a")));
    assert!(state.find_template("Morning").is_some());
}

#[test]
fn deleting_active_custom_theme_resets_only_its_owner() {
    let mut state = AppState::default();
    let theme = state.add_custom_theme("Dusk", ThemeColors::new()).unwrap();
    assert_eq!(state.active_theme_id(), theme.id);

    state.set_current_user(Some(user("user_a")));
    state.set_active_theme("forest_green");
    state.set_current_user(None);

    state.delete_custom_theme(&theme.id);
    assert_eq!(state.active_theme_id(), DEFAULT_THEME_ID);
    assert!(state.active_custom_themes().is_empty());

    state.set_current_user(Some(user("user_a")));
    assert_eq!(state.active_theme_id(), "forest_green");
}

#[test]
fn add_custom_theme_validates_colors() {
    let mut state = AppState::default();
    let mut colors = ThemeColors::new();
    colors.insert(ColorSlot::Background, "not a color".into());

    let err = state.add_custom_theme("Dusk", colors).unwrap_err();
    assert!(matches!(err, StoreError::InvalidColor { slot: ColorSlot::Background, .. }));
    assert!(state.active_custom_themes().is_empty());
}

#[test]
fn login_derives_name_and_rejects_empty_email() {
    let mut state = AppState::default();
    assert_eq!(state.log_in("  "), Err(StoreError::EmptyEmail));
    assert_eq!(state.active_user_id(), GUEST_USER_ID);

    let user = state.log_in("ann@example.com").unwrap();
    assert_eq!(user.name, "ann");
    assert_eq!(user.email.as_deref(), Some("ann@example.com"));
    assert_eq!(state.active_user_id(), user.id);

    state.log_out();
    assert_eq!(state.active_user_id(), GUEST_USER_ID);
}

#[test]
fn state_round_trips_through_json() {
    let mut state = AppState::default();
    let d1 = date("2025-01-10");
    let d2 = date("2025-01-11");

    // Guest: one customized day, one custom theme.
    state.add_task(d1, "Run").unwrap();
    state.set_note(d1, "easy day");
    let mut colors = ThemeColors::new();
    colors.insert(ColorSlot::Background, "240 10% 3.9%".into());
    state.add_custom_theme("Dusk", colors).unwrap();

    // Second user: one template-derived day.
    let template = state
        .add_template("Morning", vec!["Stretch".into(), "Meditate".into()])
        .unwrap();
    state.set_current_user(Some(user("user_a")));
    state.apply_template(&template.id, d2, false).unwrap();

    let json = serde_json::to_string(&state).unwrap();
    let restored: AppState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);
}

fn seed_template_derived_day(state: &mut AppState, d: NaiveDate) {
    let template = state
        .add_template("Seed", vec!["Stretch".into(), "Meditate".into()])
        .unwrap();
    state.apply_template(&template.id, d, false).unwrap();
    state.delete_template(&template.id);
    assert!(!state.day(d).unwrap().overrides_template);
}
