use egui::{Color32, Visuals};

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| -> u8 { ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8 };
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

#[derive(Clone, Copy)]
pub(crate) struct CalendarCellPalette {
    pub regular_bg: Color32,
    pub weekend_bg: Color32,
    pub today_bg: Color32,
    pub outside_bg: Color32,
    pub border: Color32,
    pub today_border: Color32,
    pub text: Color32,
    pub muted_text: Color32,
    pub drop_target: Color32,
}

impl CalendarCellPalette {
    pub fn from_visuals(visuals: &Visuals) -> Self {
        let base = visuals.extreme_bg_color;
        let accent = visuals.selection.bg_fill;
        Self {
            regular_bg: base,
            weekend_bg: blend(base, visuals.faint_bg_color, 0.6),
            today_bg: blend(base, accent, 0.15),
            outside_bg: visuals.panel_fill,
            border: visuals.widgets.noninteractive.bg_stroke.color,
            today_border: accent,
            text: visuals.text_color(),
            muted_text: visuals.weak_text_color(),
            drop_target: with_alpha(accent, if visuals.dark_mode { 90 } else { 60 }),
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct TimeGridPalette {
    pub hour_bg: Color32,
    pub regular_bg: Color32,
    pub weekend_bg: Color32,
    pub today_bg: Color32,
    pub hour_line: Color32,
    pub slot_line: Color32,
    pub label: Color32,
    pub header_text: Color32,
    pub preview_fill: Color32,
    pub preview_stroke: Color32,
    pub deadline: Color32,
    pub deadline_done: Color32,
}

impl TimeGridPalette {
    pub fn from_visuals(visuals: &Visuals) -> Self {
        let base = visuals.extreme_bg_color;
        let border = visuals.widgets.noninteractive.bg_stroke.color;
        let accent = visuals.selection.bg_fill;
        Self {
            hour_bg: blend(visuals.panel_fill, base, 0.4),
            regular_bg: base,
            weekend_bg: blend(base, visuals.faint_bg_color, 0.6),
            today_bg: blend(base, accent, 0.12),
            hour_line: border,
            slot_line: with_alpha(border, 90),
            label: visuals.weak_text_color(),
            header_text: visuals.text_color(),
            preview_fill: with_alpha(accent, if visuals.dark_mode { 110 } else { 80 }),
            preview_stroke: accent,
            deadline: Color32::from_rgb(220, 38, 38),
            deadline_done: Color32::from_rgb(120, 120, 120),
        }
    }
}
