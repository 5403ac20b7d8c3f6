//! Pixel <-> wall-clock mapping for the day/week time grid.
//!
//! Offsets are measured from the top edge of the grid (the `start_hour` line).
//! Mapped times are snapped to 15 minutes and clamped to
//! `[start_hour, end_hour + 1]`; they never wrap into a neighbouring day.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::models::settings::GridSettings;
use crate::utils::date::{snap_minutes, start_of_day, SNAP_MINUTES};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    pub start_hour: u32,
    pub end_hour: u32,
    pub pixels_per_hour: f32,
}

impl TimeGrid {
    pub fn new(start_hour: u32, end_hour: u32, pixels_per_hour: f32) -> Self {
        Self {
            start_hour,
            end_hour,
            pixels_per_hour,
        }
    }

    pub fn from_settings(settings: &GridSettings, pixels_per_hour: f32) -> Self {
        Self::new(settings.start_hour, settings.end_hour, pixels_per_hour)
    }

    /// Hour at which the grid closes (bottom edge).
    pub fn closing_hour(&self) -> u32 {
        self.end_hour + 1
    }

    /// Number of hour rows drawn.
    pub fn hour_rows(&self) -> u32 {
        self.closing_hour() - self.start_hour
    }

    pub fn height(&self) -> f32 {
        self.hour_rows() as f32 * self.pixels_per_hour
    }

    /// Pixels covering one snap interval.
    pub fn snap_pixels(&self) -> f32 {
        self.pixels_per_hour * SNAP_MINUTES as f32 / 60.0
    }

    pub fn fractional_hour(&self, offset: f32) -> f32 {
        let hour = offset / self.pixels_per_hour + self.start_hour as f32;
        hour.clamp(self.start_hour as f32, self.closing_hour() as f32)
    }

    /// Minutes since midnight for an offset, rounded to the snap interval.
    pub fn snapped_minutes(&self, offset: f32) -> i64 {
        let minutes = f64::from(self.fractional_hour(offset)) * 60.0;
        snap_minutes(minutes, SNAP_MINUTES)
            .clamp(self.start_hour as i64 * 60, self.closing_hour() as i64 * 60)
    }

    /// Wall-clock instant on `day` for a pixel offset.
    pub fn instant_at(&self, offset: f32, day: NaiveDate) -> NaiveDateTime {
        start_of_day(day) + Duration::minutes(self.snapped_minutes(offset))
    }

    /// Grid offset of a time of day (unclamped, may be outside the grid).
    pub fn offset_of(&self, time: NaiveTime) -> f32 {
        let hours = time.num_seconds_from_midnight() as f32 / 3600.0;
        (hours - self.start_hour as f32) * self.pixels_per_hour
    }

    /// Offset of an instant relative to `day`'s grid, clamped to the grid.
    pub fn offset_on(&self, instant: NaiveDateTime, day: NaiveDate) -> f32 {
        let minutes = (instant - start_of_day(day)).num_minutes() as f32;
        let offset = (minutes / 60.0 - self.start_hour as f32) * self.pixels_per_hour;
        offset.clamp(0.0, self.height())
    }

    /// Instant at which the grid closes on `day`.
    pub fn closing_instant(&self, day: NaiveDate) -> NaiveDateTime {
        start_of_day(day) + Duration::hours(self.closing_hour() as i64)
    }

    /// Minutes represented by a pixel distance.
    pub fn pixels_to_minutes(&self, pixels: f32) -> f64 {
        f64::from(pixels) / f64::from(self.pixels_per_hour) * 60.0
    }

    pub fn minutes_to_pixels(&self, minutes: f64) -> f32 {
        (minutes / 60.0) as f32 * self.pixels_per_hour
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        let settings = GridSettings::default();
        Self::new(settings.start_hour, settings.end_hour, settings.pixels_per_hour as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        day().and_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_offset_maps_to_snapped_instant() {
        let grid = TimeGrid::new(6, 22, 60.0);
        assert_eq!(grid.instant_at(0.0, day()), at(6, 0));
        assert_eq!(grid.instant_at(90.0, day()), at(7, 30));
        // 97px = 97 minutes past 06:00 -> 07:37 -> snaps to 07:30
        assert_eq!(grid.instant_at(97.0, day()), at(7, 30));
        // 98px -> 07:38 -> snaps to 07:45
        assert_eq!(grid.instant_at(98.0, day()), at(7, 45));
    }

    #[test]
    fn test_negative_offset_clamps_to_start_hour() {
        let grid = TimeGrid::new(6, 22, 60.0);
        assert_eq!(grid.instant_at(-500.0, day()), at(6, 0));
    }

    #[test]
    fn test_offset_past_bottom_clamps_to_closing_hour() {
        let grid = TimeGrid::new(6, 22, 60.0);
        assert_eq!(grid.instant_at(10_000.0, day()), at(23, 0));
        assert_eq!(grid.closing_instant(day()), at(23, 0));
    }

    #[test]
    fn test_zoom_changes_mapping() {
        let dense = TimeGrid::new(6, 22, 120.0);
        assert_eq!(dense.instant_at(90.0, day()), at(6, 45));
    }

    #[test]
    fn test_offset_of_is_inverse_for_grid_lines() {
        let grid = TimeGrid::new(8, 18, 45.0);
        let offset = grid.offset_of(NaiveTime::from_hms_opt(10, 15, 0).unwrap());
        assert!((offset - 101.25).abs() < f32::EPSILON);
        assert_eq!(grid.instant_at(offset, day()), at(10, 15));
    }

    #[test]
    fn test_offset_on_clamps_to_grid() {
        let grid = TimeGrid::new(6, 22, 60.0);
        assert_eq!(grid.offset_on(at(5, 0), day()), 0.0);
        assert_eq!(grid.offset_on(at(7, 0), day()), 60.0);
        assert_eq!(grid.offset_on(at(23, 30), day()), grid.height());
    }

    #[test]
    fn test_dimensions() {
        let grid = TimeGrid::new(6, 22, 60.0);
        assert_eq!(grid.hour_rows(), 17);
        assert_eq!(grid.height(), 1020.0);
        assert_eq!(grid.snap_pixels(), 15.0);
        assert_eq!(grid.pixels_to_minutes(45.0), 45.0);
        assert_eq!(grid.minutes_to_pixels(30.0), 30.0);
    }
}
