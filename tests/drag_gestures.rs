// Gesture tests: drag-to-create, move, resize and month drag

mod fixtures;

use chrono::{Duration, NaiveDateTime};
use egui::Pos2;
use fixtures::dates::{at, friday, monday};
use fixtures::events;
use lab_calendar::ui_egui::drag::{MonthDrag, MoveCommit, MoveGesture};
use lab_calendar::ui_egui::drag_create::CreateGesture;
use lab_calendar::ui_egui::resize::ResizeGesture;
use lab_calendar::ui_egui::time_grid::TimeGrid;
use pretty_assertions::assert_eq;
use test_case::test_case;

fn grid() -> TimeGrid {
    TimeGrid::new(6, 22, 60.0)
}

fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
    at(monday(), hour, minute)
}

fn create(origin_y: f32, release_y: f32) -> (CreateGesture, Option<(NaiveDateTime, NaiveDateTime)>) {
    let mut gesture = CreateGesture::new();
    gesture.pointer_down(Pos2::new(20.0, origin_y), monday(), false);
    gesture.pointer_move(Pos2::new(20.0, (origin_y + release_y) / 2.0));
    let result = gesture.pointer_up(Pos2::new(20.0, release_y), &grid(), 10);
    (gesture, result)
}

#[test_case(0.0, 90.0, Some(((6, 0), (7, 30))) ; "six to half past seven")]
#[test_case(180.0, 60.0, Some(((7, 0), (9, 0))) ; "upward drag is normalized")]
#[test_case(100.0, 108.0, None ; "shorter than fifteen minutes")]
#[test_case(900.0, 5000.0, Some(((21, 0), (23, 0))) ; "clamped at closing hour")]
fn drag_create_ranges(origin_y: f32, release_y: f32, expected: Option<((u32, u32), (u32, u32))>) {
    let (gesture, result) = create(origin_y, release_y);
    let expected = expected.map(|((sh, sm), (eh, em))| (monday_at(sh, sm), monday_at(eh, em)));
    assert_eq!(result, expected);
    assert!(gesture.is_idle());
}

#[test]
fn drag_create_suppresses_click_after_drag() {
    let (gesture, _) = create(100.0, 108.0);
    assert!(gesture.suppresses_click(10));
    assert!(gesture.suppresses_click(11));
    assert!(!gesture.suppresses_click(12));
}

#[test]
fn small_pointer_travel_is_a_click_not_a_drag() {
    let mut gesture = CreateGesture::new();
    gesture.pointer_down(Pos2::new(10.0, 100.0), monday(), false);
    gesture.pointer_move(Pos2::new(12.0, 103.0));
    assert!(gesture.is_armed());

    let result = gesture.pointer_up(Pos2::new(12.0, 103.0), &grid(), 4);
    assert_eq!(result, None);
    assert!(!gesture.suppresses_click(4));
}

#[test]
fn drag_create_preview_tracks_pointer() {
    let mut gesture = CreateGesture::new();
    gesture.pointer_down(Pos2::new(20.0, 120.0), monday(), false);
    assert_eq!(gesture.preview(&grid()), None);

    gesture.pointer_move(Pos2::new(20.0, 240.0));
    assert_eq!(
        gesture.preview(&grid()),
        Some((monday(), monday_at(8, 0), monday_at(10, 0)))
    );
}

#[test_case(60.0, 45.0, false, Some(((9, 45), (10, 45))) ; "forty five minutes later")]
#[test_case(60.0, -90.0, false, Some(((7, 30), (8, 30))) ; "ninety minutes earlier")]
#[test_case(120.0, 45.0, false, Some(((9, 23), (10, 23))) ; "unsnapped at double zoom")]
#[test_case(120.0, 45.0, true, Some(((9, 30), (10, 30))) ; "snapped at double zoom")]
#[test_case(60.0, 0.0, false, None ; "no travel does not commit")]
fn move_gesture_shifts_both_ends(
    pixels_per_hour: f32,
    travel: f32,
    snap: bool,
    expected: Option<((u32, u32), (u32, u32))>,
) {
    let event = events::personal("e1", "Assay", monday_at(9, 0), monday_at(10, 0));
    let mut gesture = MoveGesture::begin(&event, 200.0, snap);
    gesture.update(200.0 + travel);

    let expected = expected.map(|((sh, sm), (eh, em))| MoveCommit {
        event_id: "e1".to_string(),
        start: monday_at(sh, sm),
        end: monday_at(eh, em),
    });
    assert_eq!(gesture.finish(pixels_per_hour), expected);
}

fn tuesday_at(hour: u32, minute: u32) -> NaiveDateTime {
    at(monday() + Duration::days(1), hour, minute)
}

#[test_case(monday_at(9, 0), monday_at(10, 0), 30.0, Some(monday_at(10, 30)) ; "grows by half an hour")]
#[test_case(monday_at(9, 0), monday_at(10, 0), -30.0, Some(monday_at(9, 30)) ; "shrinks by half an hour")]
#[test_case(monday_at(9, 0), monday_at(10, 0), 5.0, None ; "under half a snap keeps the end")]
#[test_case(monday_at(9, 0), monday_at(10, 0), -60.0, None ; "cannot collapse onto the start")]
#[test_case(monday_at(9, 0), monday_at(10, 0), 2000.0, Some(monday_at(23, 0)) ; "clamped to grid close")]
#[test_case(monday_at(20, 0), tuesday_at(10, 0), 15.0, Some(tuesday_at(10, 15)) ; "overnight event extends on its last day")]
#[test_case(monday_at(20, 0), tuesday_at(10, 0), -60.0, Some(tuesday_at(9, 0)) ; "overnight event shrinks on its last day")]
#[test_case(monday_at(22, 0), monday_at(23, 30), 15.0, None ; "late end is not cut back by a downward drag")]
#[test_case(monday_at(22, 0), monday_at(23, 30), -30.0, Some(monday_at(23, 0)) ; "late end can still shrink")]
fn resize_moves_only_the_end(
    start: NaiveDateTime,
    end: NaiveDateTime,
    travel: f32,
    expected_end: Option<NaiveDateTime>,
) {
    let event = events::personal("e1", "Assay", start, end);
    let mut gesture = ResizeGesture::begin(&event, 240.0);
    gesture.update(240.0 + travel);

    let expected = expected_end.map(|end| MoveCommit {
        event_id: "e1".to_string(),
        start,
        end,
    });
    assert_eq!(gesture.finish(&grid()), expected);
}

#[test]
fn resize_preview_height_never_negative() {
    let event = events::personal("e1", "Assay", monday_at(9, 0), monday_at(10, 0));
    let mut gesture = ResizeGesture::begin(&event, 240.0);
    gesture.update(0.0);
    assert_eq!(gesture.preview_height(60.0, &grid()), 0.0);
}

#[test]
fn month_drag_keeps_time_of_day() {
    let event = events::lab("e7", "Group meeting", monday_at(9, 0), monday_at(10, 0));
    let mut drag = MonthDrag::begin(&event);
    drag.hover(friday());

    assert_eq!(
        drag.finish(),
        Some(MoveCommit {
            event_id: "e7".to_string(),
            start: at(friday(), 9, 0),
            end: at(friday(), 10, 0),
        })
    );
}

#[test]
fn month_drag_back_to_origin_is_a_no_op() {
    let event = events::lab("e7", "Group meeting", monday_at(9, 0), monday_at(10, 0));
    let mut drag = MonthDrag::begin(&event);
    drag.hover(friday());
    drag.hover(monday());
    assert_eq!(drag.finish(), None);
}
