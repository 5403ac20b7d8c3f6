use super::container::CalendarViewContainer;
use chrono::{Local, NaiveDate};

impl CalendarViewContainer {
    pub fn navigate_previous(&mut self) {
        self.gestures.cancel_all();
        self.date = self.mode.step(self.date, false);
    }

    pub fn navigate_next(&mut self) {
        self.gestures.cancel_all();
        self.date = self.mode.step(self.date, true);
    }

    pub fn jump_to_today(&mut self) {
        self.jump_to(Local::now().date_naive());
    }

    pub fn jump_to(&mut self, date: NaiveDate) {
        if date != self.date {
            self.gestures.cancel_all();
            self.date = date;
        }
    }

    /// Returns false at the densest zoom.
    pub fn zoom_in(&mut self) -> bool {
        self.zoom.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom.zoom_out()
    }
}
