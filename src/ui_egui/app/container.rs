//! View state and the callbacks the views and the editor raise.
//!
//! The container owns the selected date, mode, zoom, scope and modal state
//! and forwards data operations to the injected `CalendarStore`. It never
//! talks to the network itself.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

use crate::models::category::CategoryDraft;
use crate::models::event::{CalendarEvent, EventScope, RsvpStatus};
use crate::models::settings::{AppConfig, GridSettings, UserRole};
use crate::models::ui::{DateRange, ViewMode, ZoomLevel};
use crate::models::validation::ValidationError;
use crate::services::permissions;
use crate::services::store::CalendarStore;
use crate::ui_egui::event_dialog::{
    render_event_dialog, DialogAction, DialogContext, EditorMode, EventForm,
};
use crate::ui_egui::time_grid::TimeGrid;
use crate::ui_egui::views::{
    CalendarView, GestureState, MonthView, TimeGridView, ViewAction, ViewInput,
};

/// Default length of an event proposed by a single click.
pub const CLICK_EVENT_MINUTES: i64 = 60;

const LAB_PERMISSION_NOTICE: &str = "You do not have permission to change lab events";

#[derive(Debug)]
pub enum ModalState {
    Closed,
    Open(Box<EventForm>),
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        matches!(self, ModalState::Open(_))
    }
}

pub struct CalendarViewContainer {
    pub(super) store: CalendarStore,
    pub(super) mode: ViewMode,
    pub(super) date: NaiveDate,
    pub(super) zoom: ZoomLevel,
    pub(super) scope: EventScope,
    role: UserRole,
    user_id: Option<String>,
    grid_settings: GridSettings,
    modal: ModalState,
    /// Local failures (permissions) shown next to remote ones
    notice: Option<String>,
    last_fetched: Option<(EventScope, DateRange)>,
    pub(super) gestures: GestureState,
    grid_view: TimeGridView,
    month_view: MonthView,
}

impl CalendarViewContainer {
    pub fn new(store: CalendarStore, config: &AppConfig) -> Self {
        let mode = ViewMode::from_name(&config.user.default_view).unwrap_or_default();
        let scope = if permissions::can_create(config.user.default_scope, config.user.role) {
            config.user.default_scope
        } else {
            EventScope::Personal
        };
        Self {
            store,
            mode,
            date: Local::now().date_naive(),
            zoom: config.zoom(),
            scope,
            role: config.user.role,
            user_id: config.user.id.clone(),
            grid_settings: config.grid.clone(),
            modal: ModalState::Closed,
            notice: None,
            last_fetched: None,
            gestures: GestureState::default(),
            grid_view: TimeGridView::new(),
            month_view: MonthView::new(),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn store(&self) -> &CalendarStore {
        &self.store
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn scope(&self) -> EventScope {
        self.scope
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn editor(&self) -> Option<&EventForm> {
        match &self.modal {
            ModalState::Open(form) => Some(form.as_ref()),
            ModalState::Closed => None,
        }
    }

    pub fn editor_mut(&mut self) -> Option<&mut EventForm> {
        match &mut self.modal {
            ModalState::Open(form) => Some(form.as_mut()),
            ModalState::Closed => None,
        }
    }

    pub fn gestures(&self) -> &GestureState {
        &self.gestures
    }

    /// Local notice first, then the store's last remote failure.
    pub fn error(&self) -> Option<&str> {
        self.notice.as_deref().or_else(|| self.store.error())
    }

    pub fn dismiss_error(&mut self) {
        self.notice = None;
        self.store.clear_error();
    }

    pub fn visible_range(&self) -> DateRange {
        self.mode.range_for(self.date)
    }

    pub fn time_grid(&self) -> TimeGrid {
        TimeGrid::from_settings(&self.grid_settings, self.zoom.pixels_per_hour())
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        if mode != self.mode {
            self.gestures.cancel_all();
            self.mode = mode;
        }
    }

    pub fn set_scope(&mut self, scope: EventScope) {
        if scope != self.scope {
            self.gestures.cancel_all();
            self.scope = scope;
        }
    }

    /// Fetch when the `(scope, range)` key changed since the last fetch.
    pub fn refresh_if_needed(&mut self) -> bool {
        let key = (self.scope, self.visible_range());
        if self.last_fetched == Some(key) {
            return false;
        }
        self.refresh();
        true
    }

    pub fn refresh(&mut self) {
        let range = self.visible_range();
        self.last_fetched = Some((self.scope, range));
        self.store.fetch(self.scope, range);
    }

    pub fn poll(&mut self) -> usize {
        self.store.poll()
    }

    pub fn can_create(&self) -> bool {
        permissions::can_create(self.scope, self.role)
    }

    pub fn can_modify(&self, event: &CalendarEvent) -> bool {
        permissions::can_modify(event, self.role)
    }

    pub fn handle_action(&mut self, action: ViewAction) {
        match action {
            ViewAction::TimeClick(instant) => {
                self.open_create(instant, instant + Duration::minutes(CLICK_EVENT_MINUTES));
            }
            ViewAction::TimeRangeSelect(start, end) => {
                self.open_create(start, end);
            }
            ViewAction::EditEvent(event) => {
                self.open_edit(&event);
            }
            ViewAction::MoveEvent { id, start, end } => {
                self.move_event(&id, start, end);
            }
        }
    }

    fn move_event(&mut self, id: &str, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        let Some(event) = self.store.event(id) else {
            log::warn!("Move requested for unknown event {}", id);
            return false;
        };
        if !self.can_modify(event) {
            self.notice = Some(LAB_PERMISSION_NOTICE.to_string());
            return false;
        }
        self.store.move_event(id, start, end)
    }

    /// Opens the editor for a new event. Ignored while a modal is open or
    /// when the active calendar is not writable.
    pub fn open_create(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        if self.modal.is_open() {
            log::debug!("Ignoring create request while the editor is open");
            return false;
        }
        if !self.can_create() {
            log::debug!(
                "Create on {} calendar not permitted for {:?}",
                self.scope.as_str(),
                self.role
            );
            return false;
        }
        self.gestures.cancel_all();
        self.modal = ModalState::Open(Box::new(EventForm::for_create(start, end, self.scope)));
        true
    }

    pub fn open_edit(&mut self, event: &CalendarEvent) -> bool {
        if self.modal.is_open() {
            log::debug!("Ignoring edit request for {} while the editor is open", event.id);
            return false;
        }
        self.gestures.cancel_all();
        let form = EventForm::for_edit(event, self.user_id.as_deref());
        self.modal = ModalState::Open(Box::new(form));
        true
    }

    /// Whether the open editor may change its event. New events are checked
    /// against their scope on save instead.
    fn editor_may_modify(&self) -> bool {
        self.editor()
            .and_then(EventForm::original_scope)
            .map_or(true, |scope| permissions::can_create(scope, self.role))
    }

    /// Validates and dispatches the editor. On failure the editor stays open
    /// with the message.
    pub fn save_editor(&mut self) -> bool {
        let role = self.role;
        let may_modify = self.editor_may_modify();
        let ModalState::Open(form) = &mut self.modal else {
            return false;
        };

        if !may_modify {
            form.error = Some(LAB_PERMISSION_NOTICE.to_string());
            return false;
        }
        if !permissions::can_create(form.scope, role) {
            form.error = Some(format!("You cannot write to the {} calendar", form.scope.label()));
            return false;
        }
        let draft = match form.validated_draft() {
            Ok(draft) => draft,
            Err(err) => {
                form.error = Some(err.to_string());
                return false;
            }
        };

        match form.mode.clone() {
            EditorMode::Create => self.store.create_event(draft),
            EditorMode::Edit { event_id, .. } => self.store.update_event(event_id, draft),
        }
        self.modal = ModalState::Closed;
        true
    }

    pub fn request_delete(&mut self) {
        if !self.editor_may_modify() {
            self.notice = Some(LAB_PERMISSION_NOTICE.to_string());
            return;
        }
        if let Some(form) = self.editor_mut() {
            if form.is_edit() {
                form.confirm_delete = true;
            }
        }
    }

    pub fn cancel_delete(&mut self) {
        if let Some(form) = self.editor_mut() {
            form.confirm_delete = false;
        }
    }

    pub fn confirm_delete(&mut self) -> bool {
        if !self.editor_may_modify() {
            self.notice = Some(LAB_PERMISSION_NOTICE.to_string());
            return false;
        }
        let Some(form) = self.editor() else {
            return false;
        };
        let Some(id) = form.event_id().filter(|_| form.confirm_delete) else {
            return false;
        };
        let id = id.to_string();
        self.store.delete_event(id);
        self.modal = ModalState::Closed;
        true
    }

    pub fn cancel_editor(&mut self) {
        self.modal = ModalState::Closed;
    }

    pub fn create_category(&mut self, draft: CategoryDraft) -> Result<(), ValidationError> {
        draft.validate()?;
        self.store.create_category(draft);
        Ok(())
    }

    pub fn rsvp(&mut self, event_id: &str, status: RsvpStatus) {
        self.store.rsvp(event_id.to_string(), status);
    }

    pub fn apply_dialog_actions(&mut self, actions: Vec<DialogAction>) {
        for action in actions {
            match action {
                DialogAction::Save => {
                    self.save_editor();
                }
                DialogAction::Cancel => self.cancel_editor(),
                DialogAction::RequestDelete => self.request_delete(),
                DialogAction::CancelDelete => self.cancel_delete(),
                DialogAction::ConfirmDelete => {
                    self.confirm_delete();
                }
                DialogAction::CreateCategory(draft) => {
                    if let Err(err) = self.create_category(draft) {
                        if let Some(form) = self.editor_mut() {
                            form.error = Some(err.to_string());
                        }
                    }
                }
                DialogAction::Rsvp(status) => {
                    let id = self.editor().and_then(|form| form.event_id()).map(str::to_owned);
                    if let Some(id) = id {
                        self.rsvp(&id, status);
                    }
                }
            }
        }
    }

    /// Render the active view and collect its callbacks.
    pub fn show_view(
        &mut self,
        ui: &mut egui::Ui,
        today: NaiveDate,
        frame: u64,
    ) -> Vec<ViewAction> {
        let grid = self.time_grid();
        let input = ViewInput {
            date: self.date,
            today,
            days: self.mode.days_in_range(self.date),
            events: self.store.events(),
            categories: self.store.categories(),
            deadlines: self.store.deadlines(),
            grid,
            role: self.role,
            snap_moves: self.grid_settings.snap_moves,
            frame,
        };
        let view: &mut dyn CalendarView = if self.mode.uses_time_grid() {
            &mut self.grid_view
        } else {
            &mut self.month_view
        };
        view.show(ui, &input, &mut self.gestures)
    }

    pub fn show_editor(&mut self, ctx: &egui::Context) -> Vec<DialogAction> {
        let ModalState::Open(form) = &mut self.modal else {
            return Vec::new();
        };
        let editable = form
            .original_scope()
            .map_or(true, |scope| permissions::can_create(scope, self.role));
        let context = DialogContext {
            categories: self.store.categories(),
            scopes: permissions::creatable_scopes(self.role),
            editable,
            user_id: self.user_id.as_deref(),
        };
        render_event_dialog(ctx, form, &context)
    }
}
