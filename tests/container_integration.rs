// Integration tests for the view container over an in-memory lab API
//
// Every store call runs inline, so results queue until `poll()` is called,
// the same as a frame boundary in the running app.

mod fixtures;

use std::sync::Arc;

use chrono::{Datelike, Duration};
use fixtures::dates::{at, friday, monday};
use fixtures::{container, events, loaded_container, FakeCalendarApi};
use lab_calendar::models::category::CategoryDraft;
use lab_calendar::models::event::EventScope;
use lab_calendar::models::settings::UserRole;
use lab_calendar::models::ui::ViewMode;
use lab_calendar::ui_egui::views::ViewAction;
use lab_calendar::ui_egui::ModalState;
use pretty_assertions::assert_eq;

fn assay_api() -> Arc<FakeCalendarApi> {
    Arc::new(FakeCalendarApi::with_events(vec![
        events::personal("e1", "Assay", at(monday(), 9, 0), at(monday(), 10, 0)),
        events::lab("e2", "Group meeting", at(friday(), 14, 0), at(friday(), 15, 0)),
    ]))
}

#[test]
fn first_refresh_loads_the_visible_week() {
    let api = assay_api();
    let container = loaded_container(api.clone(), UserRole::Member);

    assert_eq!(container.scope(), EventScope::Personal);
    assert_eq!(container.mode(), ViewMode::Week);
    let ids: Vec<&str> = container.store().events().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["e1"]);
    assert!(!container.store().is_busy());
    assert_eq!(api.list_calls(), 1);
}

#[test]
fn refresh_runs_only_when_scope_or_range_changes() {
    let api = assay_api();
    let mut container = loaded_container(api.clone(), UserRole::Lead);

    assert!(!container.refresh_if_needed());

    // same week, different day
    container.jump_to(monday() + Duration::days(1));
    assert!(!container.refresh_if_needed());

    container.navigate_next();
    assert!(container.refresh_if_needed());
    container.poll();
    assert_eq!(api.list_calls(), 2);

    container.navigate_previous();
    container.set_scope(EventScope::Lab);
    assert!(container.refresh_if_needed());
    container.poll();
    let ids: Vec<&str> = container.store().events().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["e2"]);
}

#[test]
fn navigation_steps_by_mode() {
    let mut container = container(assay_api(), UserRole::Member);

    container.navigate_next();
    assert_eq!(container.date(), monday() + Duration::weeks(1));

    container.set_mode(ViewMode::Day);
    container.navigate_previous();
    assert_eq!(container.date(), monday() + Duration::days(6));

    container.set_mode(ViewMode::Month);
    let range = container.visible_range();
    assert_eq!((range.start.day(), range.start.month()), (1, 3));
    assert_eq!((range.end.day(), range.end.month()), (1, 4));

    container.navigate_next();
    assert_eq!(container.date().month(), 4);
}

#[test]
fn zoom_changes_grid_density_within_bounds() {
    let mut container = container(assay_api(), UserRole::Member);
    let before = container.time_grid().pixels_per_hour;

    assert!(container.zoom_in());
    assert!(container.time_grid().pixels_per_hour > before);
    while container.zoom_out() {}
    assert_eq!(container.time_grid().pixels_per_hour, 30.0);
}

#[test]
fn move_is_applied_optimistically_then_confirmed() {
    let api = assay_api();
    let mut container = loaded_container(api.clone(), UserRole::Member);

    container.handle_action(ViewAction::MoveEvent {
        id: "e1".to_string(),
        start: at(monday(), 11, 0),
        end: at(monday(), 12, 0),
    });
    assert_eq!(container.store().event("e1").unwrap().start, at(monday(), 11, 0));

    container.poll();
    assert_eq!(container.store().event("e1").unwrap().start, at(monday(), 11, 0));
    assert_eq!(api.stored("e1").unwrap().end, at(monday(), 12, 0));
    assert_eq!(container.error(), None);
}

#[test]
fn failed_move_rolls_back_and_reports() {
    let api = Arc::new(
        FakeCalendarApi::with_events(vec![events::personal(
            "e1",
            "Assay",
            at(monday(), 9, 0),
            at(monday(), 10, 0),
        )])
        .failing_moves(),
    );
    let mut container = loaded_container(api, UserRole::Member);

    container.handle_action(ViewAction::MoveEvent {
        id: "e1".to_string(),
        start: at(friday(), 9, 0),
        end: at(friday(), 10, 0),
    });
    assert_eq!(container.store().event("e1").unwrap().start, at(friday(), 9, 0));

    container.poll();
    let event = container.store().event("e1").unwrap();
    assert_eq!((event.start, event.end), (at(monday(), 9, 0), at(monday(), 10, 0)));
    assert!(container.error().unwrap().starts_with("Failed to move event"));

    container.dismiss_error();
    assert_eq!(container.error(), None);
}

#[test]
fn member_cannot_change_lab_events() {
    let api = assay_api();
    let mut container = container(api.clone(), UserRole::Member);
    container.set_scope(EventScope::Lab);
    container.refresh_if_needed();
    container.poll();

    container.handle_action(ViewAction::MoveEvent {
        id: "e2".to_string(),
        start: at(friday(), 16, 0),
        end: at(friday(), 17, 0),
    });
    assert_eq!(container.store().event("e2").unwrap().start, at(friday(), 14, 0));
    assert_eq!(
        container.error(),
        Some("You do not have permission to change lab events")
    );

    assert!(!container.can_create());
    container.handle_action(ViewAction::TimeClick(at(friday(), 9, 0)));
    assert!(!container.modal().is_open());
}

#[test]
fn member_cannot_delete_or_rescope_lab_events_from_the_editor() {
    let api = assay_api();
    let mut container = container(api.clone(), UserRole::Member);
    container.set_scope(EventScope::Lab);
    container.refresh_if_needed();
    container.poll();
    let event = container.store().event("e2").unwrap().clone();

    // opening read-only is allowed
    assert!(container.open_edit(&event));

    container.request_delete();
    assert!(!container.editor().unwrap().confirm_delete);
    assert_eq!(
        container.error(),
        Some("You do not have permission to change lab events")
    );
    container.editor_mut().unwrap().confirm_delete = true;
    assert!(!container.confirm_delete());
    assert!(container.modal().is_open());

    // moving it into the personal calendar is still a change to a lab event
    let form = container.editor_mut().unwrap();
    form.scope = EventScope::Personal;
    form.title = "Renamed".to_string();
    assert!(!container.save_editor());
    assert_eq!(
        container.editor().unwrap().error.as_deref(),
        Some("You do not have permission to change lab events")
    );

    container.poll();
    let stored = api.stored("e2").unwrap();
    assert_eq!((stored.title.as_str(), stored.scope), ("Group meeting", EventScope::Lab));
}

#[test]
fn lead_can_move_lab_events() {
    let api = assay_api();
    let mut container = container(api.clone(), UserRole::Lead);
    container.set_scope(EventScope::Lab);
    container.refresh_if_needed();
    container.poll();

    container.handle_action(ViewAction::MoveEvent {
        id: "e2".to_string(),
        start: at(friday(), 16, 0),
        end: at(friday(), 17, 0),
    });
    container.poll();
    assert_eq!(api.stored("e2").unwrap().start, at(friday(), 16, 0));
}

#[test]
fn time_click_opens_one_hour_draft_and_ignores_second_open() {
    let mut container = loaded_container(assay_api(), UserRole::Member);

    container.handle_action(ViewAction::TimeClick(at(monday(), 13, 0)));
    let form = container.editor().unwrap();
    assert!(!form.is_edit());
    assert_eq!((form.start(), form.end()), (at(monday(), 13, 0), at(monday(), 14, 0)));

    container.handle_action(ViewAction::TimeRangeSelect(at(friday(), 8, 0), at(friday(), 9, 0)));
    assert_eq!(container.editor().unwrap().start(), at(monday(), 13, 0));
}

#[test]
fn save_keeps_editor_open_on_validation_error() {
    let api = assay_api();
    let mut container = loaded_container(api.clone(), UserRole::Member);
    container.handle_action(ViewAction::TimeRangeSelect(at(monday(), 13, 0), at(monday(), 14, 30)));

    assert!(!container.save_editor());
    assert_eq!(
        container.editor().unwrap().error.as_deref(),
        Some("Event title cannot be empty")
    );

    container.editor_mut().unwrap().title = "Microscope booking".to_string();
    assert!(container.save_editor());
    assert!(matches!(container.modal(), ModalState::Closed));

    container.poll();
    let created = container
        .store()
        .events()
        .iter()
        .find(|event| event.title == "Microscope booking")
        .unwrap();
    assert_eq!((created.start, created.end), (at(monday(), 13, 0), at(monday(), 14, 30)));
    assert_eq!(created.scope, EventScope::Personal);
}

#[test]
fn delete_requires_confirmation() {
    let api = assay_api();
    let mut container = loaded_container(api.clone(), UserRole::Member);
    let event = container.store().event("e1").unwrap().clone();

    container.handle_action(ViewAction::EditEvent(event));
    assert!(!container.confirm_delete());
    assert!(container.modal().is_open());

    container.request_delete();
    container.cancel_delete();
    assert!(!container.confirm_delete());

    container.request_delete();
    assert!(container.confirm_delete());
    assert!(!container.modal().is_open());

    container.poll();
    assert!(container.store().event("e1").is_none());
    assert!(api.stored("e1").is_none());
}

#[test]
fn edit_updates_the_stored_event() {
    let api = assay_api();
    let mut container = loaded_container(api.clone(), UserRole::Member);
    let event = container.store().event("e1").unwrap().clone();

    assert!(container.open_edit(&event));
    container.editor_mut().unwrap().title = "Assay (rerun)".to_string();
    assert!(container.save_editor());
    container.poll();

    assert_eq!(api.stored("e1").unwrap().title, "Assay (rerun)");
    assert_eq!(container.store().event("e1").unwrap().title, "Assay (rerun)");
}

#[test]
fn deadlines_in_range_are_loaded() {
    let api = assay_api();
    api.deadlines
        .lock()
        .unwrap()
        .extend([
            events::deadline("d1", "Draft report", friday()),
            events::deadline("d2", "Final report", friday() + Duration::weeks(3)),
        ]);
    let container = loaded_container(api, UserRole::Member);

    let titles: Vec<&str> = container.store().deadlines().iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["Draft report"]);
}

#[test]
fn invalid_category_is_rejected_locally() {
    let api = assay_api();
    let mut container = loaded_container(api.clone(), UserRole::Member);

    assert!(container
        .create_category(CategoryDraft::new("Imaging", "blue", EventScope::Personal))
        .is_err());
    assert!(container
        .create_category(CategoryDraft::new("Imaging", "#3B82F6", EventScope::Personal))
        .is_ok());
    container.poll();
    assert_eq!(container.store().categories().len(), 1);
    assert_eq!(api.categories.lock().unwrap().len(), 1);
}
