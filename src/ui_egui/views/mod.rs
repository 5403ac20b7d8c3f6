use chrono::{NaiveDate, NaiveDateTime};
use egui::{Color32, Pos2};

use crate::models::category::{color_for, CalendarCategory, DEFAULT_EVENT_COLOR};
use crate::models::deadline::DeadlineEvent;
use crate::models::event::CalendarEvent;
use crate::models::settings::UserRole;
use crate::services::permissions;
use crate::ui_egui::drag::{MonthDrag, MoveCommit, MoveGesture};
use crate::ui_egui::drag_create::CreateGesture;
use crate::ui_egui::resize::ResizeGesture;
use crate::ui_egui::time_grid::TimeGrid;

mod event_rendering;
pub mod month_view;
mod palette;
pub mod time_grid_view;

pub use month_view::MonthView;
pub use time_grid_view::TimeGridView;

/// What a view asks the container to do after a frame.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewAction {
    TimeClick(NaiveDateTime),
    TimeRangeSelect(NaiveDateTime, NaiveDateTime),
    EditEvent(CalendarEvent),
    MoveEvent {
        id: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl From<MoveCommit> for ViewAction {
    fn from(commit: MoveCommit) -> Self {
        ViewAction::MoveEvent {
            id: commit.event_id,
            start: commit.start,
            end: commit.end,
        }
    }
}

/// Read-only data a view renders from.
pub struct ViewInput<'a> {
    pub date: NaiveDate,
    pub today: NaiveDate,
    pub days: Vec<NaiveDate>,
    pub events: &'a [CalendarEvent],
    pub categories: &'a [CalendarCategory],
    pub deadlines: &'a [DeadlineEvent],
    pub grid: TimeGrid,
    pub role: UserRole,
    pub snap_moves: bool,
    pub frame: u64,
}

impl ViewInput<'_> {
    pub fn can_modify(&self, event: &CalendarEvent) -> bool {
        permissions::can_modify(event, self.role)
    }

    pub fn color_of(&self, event: &CalendarEvent) -> Color32 {
        event_color(self.categories, event)
    }
}

/// Pointer gestures in flight. Owned by the container so they survive
/// across frames and can be cancelled on view changes.
#[derive(Default)]
pub struct GestureState {
    pub create: CreateGesture,
    pub moving: Option<MoveGesture>,
    pub resizing: Option<ResizeGesture>,
    pub month: Option<MonthDrag>,
}

impl GestureState {
    pub fn is_active(&self) -> bool {
        !self.create.is_idle()
            || self.moving.is_some()
            || self.resizing.is_some()
            || self.month.is_some()
    }

    /// Event currently dragged or resized, if any.
    pub fn active_event_id(&self) -> Option<&str> {
        self.moving
            .as_ref()
            .map(|g| g.event_id.as_str())
            .or_else(|| self.resizing.as_ref().map(|g| g.event_id.as_str()))
            .or_else(|| self.month.as_ref().map(|g| g.event_id.as_str()))
    }

    pub fn cancel_all(&mut self) {
        self.create.cancel();
        self.moving = None;
        self.resizing = None;
        self.month = None;
    }
}

/// Shared rendering interface of the day/week grid and the month grid.
pub trait CalendarView {
    fn show(
        &mut self,
        ui: &mut egui::Ui,
        input: &ViewInput<'_>,
        gestures: &mut GestureState,
    ) -> Vec<ViewAction>;

    /// Instant under a screen position, using the layout of the last frame.
    fn pointer_to_instant(&self, pos: Pos2) -> Option<NaiveDateTime>;
}

/// Column placement of one event among overlapping neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LanePlacement {
    pub lane: usize,
    pub lanes: usize,
}

/// Assigns side-by-side lanes to overlapping time spans. Spans that overlap
/// transitively share a lane count so their columns line up.
pub fn layout_lanes(spans: &[(NaiveDateTime, NaiveDateTime)]) -> Vec<LanePlacement> {
    let mut order: Vec<usize> = (0..spans.len()).collect();
    order.sort_by_key(|&i| (spans[i].0, spans[i].1));

    let mut placements = vec![LanePlacement { lane: 0, lanes: 1 }; spans.len()];
    let mut cluster: Vec<usize> = Vec::new();
    let mut lane_ends: Vec<NaiveDateTime> = Vec::new();
    let mut cluster_end: Option<NaiveDateTime> = None;

    let close = |cluster: &mut Vec<usize>,
                 lane_ends: &mut Vec<NaiveDateTime>,
                 placements: &mut Vec<LanePlacement>| {
        let lanes = lane_ends.len().max(1);
        for &idx in cluster.iter() {
            placements[idx].lanes = lanes;
        }
        cluster.clear();
        lane_ends.clear();
    };

    for idx in order {
        let (start, end) = spans[idx];
        if cluster_end.map_or(false, |cluster_end| start >= cluster_end) {
            close(&mut cluster, &mut lane_ends, &mut placements);
            cluster_end = None;
        }

        let lane = match lane_ends.iter().position(|&lane_end| lane_end <= start) {
            Some(lane) => {
                lane_ends[lane] = end;
                lane
            }
            None => {
                lane_ends.push(end);
                lane_ends.len() - 1
            }
        };
        placements[idx].lane = lane;
        cluster.push(idx);
        cluster_end = Some(cluster_end.map_or(end, |current| current.max(end)));
    }
    close(&mut cluster, &mut lane_ends, &mut placements);

    placements
}

/// Parse `#RRGGBB` or `#RGB` into a colour.
pub fn parse_color(hex: &str) -> Option<Color32> {
    let hex = hex.trim().trim_start_matches('#');
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color32::from_rgb(r, g, b))
        }
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some(Color32::from_rgb(digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

pub fn event_color(categories: &[CalendarCategory], event: &CalendarEvent) -> Color32 {
    parse_color(color_for(categories, event.category_id.as_deref()))
        .or_else(|| parse_color(DEFAULT_EVENT_COLOR))
        .unwrap_or(Color32::from_rgb(59, 130, 246))
}

/// Recurring events whose rule lands on `day` but whose fetched instance
/// does not. The server owns expansion; these only drive hint markers.
pub fn repeat_hints<'a>(events: &'a [CalendarEvent], day: NaiveDate) -> Vec<&'a CalendarEvent> {
    events
        .iter()
        .filter(|event| !event.occurs_on(day))
        .filter(|event| {
            event
                .repeat
                .as_ref()
                .map_or(false, |rule| rule.matches(event.start.date(), day))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn placement(lane: usize, lanes: usize) -> LanePlacement {
        LanePlacement { lane, lanes }
    }

    #[test]
    fn test_non_overlapping_spans_use_one_lane() {
        let spans = [(at(9, 0), at(10, 0)), (at(10, 0), at(11, 0))];
        assert_eq!(layout_lanes(&spans), vec![placement(0, 1), placement(0, 1)]);
    }

    #[test]
    fn test_overlapping_spans_split_lanes() {
        let spans = [
            (at(9, 0), at(11, 0)),
            (at(9, 30), at(10, 0)),
            (at(10, 0), at(10, 30)),
            (at(13, 0), at(14, 0)),
        ];
        assert_eq!(
            layout_lanes(&spans),
            vec![placement(0, 2), placement(1, 2), placement(1, 2), placement(0, 1)]
        );
    }

    #[test]
    fn test_unsorted_input_keeps_positions() {
        let spans = [(at(10, 0), at(11, 0)), (at(9, 0), at(10, 30))];
        assert_eq!(layout_lanes(&spans), vec![placement(1, 2), placement(0, 2)]);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#3B82F6"), Some(Color32::from_rgb(59, 130, 246)));
        assert_eq!(parse_color("#fff"), Some(Color32::WHITE));
        assert_eq!(parse_color("blue"), None);
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn test_repeat_hints_skip_fetched_instance() {
        use crate::models::event::EventDraft;
        use crate::models::recurrence::RepeatRule;

        let mut draft = EventDraft::new("Journal club", at(9, 0), at(10, 0));
        draft.repeat = Some(RepeatRule::weekly(1));
        let events = vec![
            draft.into_event("weekly"),
            EventDraft::new("One-off", at(11, 0), at(12, 0)).into_event("once"),
        ];

        let monday = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert!(repeat_hints(&events, monday).is_empty());

        let next_monday = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        let hints: Vec<&str> = repeat_hints(&events, next_monday)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(hints, vec!["weekly"]);
        assert!(repeat_hints(&events, NaiveDate::from_ymd_opt(2025, 3, 18).unwrap()).is_empty());
    }

    #[test]
    fn test_gesture_state_cancel_all() {
        let mut gestures = GestureState::default();
        gestures
            .create
            .pointer_down(Pos2::new(0.0, 0.0), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(), false);
        assert!(gestures.is_active());
        gestures.cancel_all();
        assert!(!gestures.is_active());
    }
}
