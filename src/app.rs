use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Duration;

use crate::alert::{AlertLevel, AlertQueue};
use crate::config::AppConfig;
use crate::form::ReservationForm;
use crate::store::{ReservationStatus, Store};
use crate::table::{Column, SortableTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Rooms,
    Reservations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Reserve,
    Help,
    Confirm,
}

/// One display row. `cells` line up one-to-one with the owning table's
/// header columns; the sort uses that ordinal coupling.
#[derive(Debug, Clone)]
pub struct DisplayRow {
    pub id: u32,
    pub cells: Vec<String>,
}

pub struct App {
    pub section: Section,
    pub popup: Popup,

    pub config: AppConfig,
    pub store: Store,

    // Transient banners (top of the screen)
    pub alerts: AlertQueue,

    // Room directory (top section)
    pub rooms_table: SortableTable,
    pub room_rows: Vec<DisplayRow>,
    pub selected_room: usize,

    // Reservations (bottom section)
    pub reservations_table: SortableTable,
    pub reservation_rows: Vec<DisplayRow>,
    pub selected_reservation: usize,

    // Quick-reserve popup
    pub form: ReservationForm,
    pub modal_title: String,

    // Reservation id awaiting cancel confirmation
    pub pending_cancel: Option<u32>,
}

impl App {
    /// Thin IO wrapper around `from_parts`.
    pub fn new() -> Result<Self> {
        let config = AppConfig::load().unwrap_or_default();
        let store = Store::load(config.store_file.as_deref());
        Ok(Self::from_parts(config, store))
    }

    /// Build the app from injected state. All required UI structure
    /// (columns, alert queue, form) is set up here, once.
    pub fn from_parts(config: AppConfig, store: Store) -> Self {
        let rooms_table = SortableTable::new(vec![
            Column::sortable("Name"),
            Column::sortable("Location"),
            Column::sortable("Capacity"),
            Column::fixed("Description"),
        ]);
        let reservations_table = SortableTable::new(vec![
            Column::sortable("Title"),
            Column::sortable("Room"),
            Column::sortable("Date"),
            Column::sortable("Time"),
            Column::sortable("Attendees"),
            Column::fixed("Status"),
        ]);

        let timeout = if config.alert_secs == 0 {
            crate::alert::DEFAULT_TIMEOUT
        } else {
            Duration::from_secs(config.alert_secs)
        };
        let alerts = AlertQueue::new(timeout);

        let mut app = Self {
            section: Section::Rooms,
            popup: Popup::None,
            config,
            store,
            alerts,
            rooms_table,
            room_rows: Vec::new(),
            selected_room: 0,
            reservations_table,
            reservation_rows: Vec::new(),
            selected_reservation: 0,
            form: ReservationForm::new(),
            modal_title: String::new(),
            pending_cancel: None,
        };
        app.rebuild_rows();

        if app.room_rows.is_empty() {
            app.alerts.push_permanent(
                AlertLevel::Error,
                "No active rooms in the store; edit store.toml",
            );
        }

        app
    }

    /// Recompute display rows from the store and re-apply the active sorts.
    pub fn rebuild_rows(&mut self) {
        let now = Local::now().naive_local();

        self.room_rows = self
            .store
            .active_rooms()
            .map(|r| DisplayRow {
                id: r.id,
                cells: vec![
                    r.name.clone(),
                    r.location.clone(),
                    r.capacity.to_string(),
                    r.description.clone(),
                ],
            })
            .collect();

        self.reservation_rows = self
            .store
            .reservations
            .iter()
            .map(|r| {
                let status = match r.status {
                    ReservationStatus::Confirmed if r.is_past(now) => "completed",
                    ReservationStatus::Confirmed => "confirmed",
                    ReservationStatus::Cancelled => "cancelled",
                    ReservationStatus::Completed => "completed",
                };
                DisplayRow {
                    id: r.id,
                    cells: vec![
                        r.title.clone(),
                        self.store.room_name_of(r.room_id),
                        crate::format::date(&r.date.and_time(r.start)),
                        crate::format::time_range(&r.start, &r.end),
                        r.attendees.to_string(),
                        status.to_string(),
                    ],
                }
            })
            .collect();

        self.rooms_table
            .sort_rows(&mut self.room_rows, |row, i| row.cells[i].clone());
        self.reservations_table
            .sort_rows(&mut self.reservation_rows, |row, i| row.cells[i].clone());

        if self.selected_room >= self.room_rows.len() {
            self.selected_room = self.room_rows.len().saturating_sub(1);
        }
        if self.selected_reservation >= self.reservation_rows.len() {
            self.selected_reservation = self.reservation_rows.len().saturating_sub(1);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }
        self.handle_normal_key(key)
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            // Switch sections (Rooms ↔ Reservations)
            KeyCode::Tab | KeyCode::BackTab => {
                self.section = match self.section {
                    Section::Rooms => Section::Reservations,
                    Section::Reservations => Section::Rooms,
                };
            }

            // Row selection
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),

            // Header cursor + sort activation for the active section
            KeyCode::Left => self.active_table_mut().cursor_left(),
            KeyCode::Right => self.active_table_mut().cursor_right(),
            KeyCode::Char('s') => {
                self.active_table_mut().activate_cursor();
                self.rebuild_rows();
            }

            // Quick reserve the selected room
            KeyCode::Char('r') | KeyCode::Enter => {
                if self.section == Section::Rooms {
                    if let Some(row) = self.room_rows.get(self.selected_room) {
                        let ident = row.id.to_string();
                        self.open_quick_reserve(&ident);
                    }
                }
            }

            // Cancel the selected reservation (with confirmation)
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.section == Section::Reservations {
                    self.request_cancel();
                }
            }

            // Dismiss the oldest alert banner
            KeyCode::Char('x') => self.alerts.dismiss_front(),

            // Help (? or h)
            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,

            _ => {}
        }
        Ok(())
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Reserve => self.handle_form_key(key),
            Popup::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc
                        | KeyCode::Char('?')
                        | KeyCode::Char('h')
                        | KeyCode::Enter
                        | KeyCode::Char('q')
                ) {
                    self.popup = Popup::None;
                }
                Ok(())
            }
            Popup::Confirm => {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Enter => {
                        self.confirm_cancel();
                        self.popup = Popup::None;
                    }
                    KeyCode::Char('n') | KeyCode::Esc => {
                        self.pending_cancel = None;
                        self.popup = Popup::None;
                    }
                    _ => {}
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.popup = Popup::None;
            }
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),
            KeyCode::Left => self.form.current_field_mut().move_cursor_left(),
            KeyCode::Right => self.form.current_field_mut().move_cursor_right(),
            KeyCode::Backspace => self.form.current_field_mut().delete_char(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => self.form.current_field_mut().insert_char(c),
            _ => {}
        }
        Ok(())
    }

    fn move_down(&mut self) {
        match self.section {
            Section::Rooms => {
                if !self.room_rows.is_empty() {
                    self.selected_room = (self.selected_room + 1) % self.room_rows.len();
                }
            }
            Section::Reservations => {
                if !self.reservation_rows.is_empty() {
                    self.selected_reservation =
                        (self.selected_reservation + 1) % self.reservation_rows.len();
                }
            }
        }
    }

    fn move_up(&mut self) {
        match self.section {
            Section::Rooms => {
                if !self.room_rows.is_empty() {
                    self.selected_room = self
                        .selected_room
                        .checked_sub(1)
                        .unwrap_or(self.room_rows.len() - 1);
                }
            }
            Section::Reservations => {
                if !self.reservation_rows.is_empty() {
                    self.selected_reservation = self
                        .selected_reservation
                        .checked_sub(1)
                        .unwrap_or(self.reservation_rows.len() - 1);
                }
            }
        }
    }

    fn active_table_mut(&mut self) -> &mut SortableTable {
        match self.section {
            Section::Rooms => &mut self.rooms_table,
            Section::Reservations => &mut self.reservations_table,
        }
    }

    /// Open the quick-reserve popup pre-filled with a room identifier.
    /// A blank identifier is a silent no-op.
    pub fn open_quick_reserve(&mut self, room_ident: &str) {
        let ident = room_ident.trim();
        if ident.is_empty() {
            return;
        }

        let room_name = self.store.room_name_for(ident);

        self.form = ReservationForm::new();
        self.form.room_id = ident.to_string();
        self.form.fields[crate::form::FIELD_DATE]
            .set_value(crate::format::date(&Local::now().naive_local()));

        self.modal_title = format!("Quick reserve - {}", room_name);
        self.popup = Popup::Reserve;
    }

    /// The submission gate plus the room-level checks the server used to do.
    /// Also used by the one-shot CLI path.
    pub fn submit_form(&mut self) {
        let Some(draft) = self.form.try_submit() else {
            // Blocked; field errors are visible now that the form is marked
            // validated.
            return;
        };

        let Some(room) = self.store.room_by_ident(&draft.room_id) else {
            self.alerts
                .push(AlertLevel::Error, "That room no longer exists");
            return;
        };
        let (room_id, room_name, capacity) = (room.id, room.name.clone(), room.capacity);

        if draft.attendees > capacity {
            self.alerts.push(
                AlertLevel::Warning,
                format!("{} seats at most {}", room_name, capacity),
            );
            return;
        }

        let (work_start, work_end) = self.config.working_hours();
        if draft.start < work_start || draft.end > work_end {
            self.alerts.push(
                AlertLevel::Warning,
                format!(
                    "Rooms are bookable between {} and {}",
                    self.config.work_start, self.config.work_end
                ),
            );
            return;
        }

        self.store.add_reservation(
            room_id,
            draft.title.clone(),
            draft.date,
            draft.start,
            draft.end,
            draft.attendees,
        );
        if let Err(e) = self.store.save(self.config.store_file.as_deref()) {
            tracing::warn!("Could not persist store: {}", e);
        }

        self.alerts.push(
            AlertLevel::Success,
            format!("Reserved {} for '{}'", room_name, draft.title),
        );
        self.popup = Popup::None;
        self.rebuild_rows();
    }

    fn request_cancel(&mut self) {
        let Some(row) = self.reservation_rows.get(self.selected_reservation) else {
            return;
        };
        let id = row.id;
        let now = Local::now().naive_local();

        let cancellable = self
            .store
            .reservations
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.can_cancel(now))
            .unwrap_or(false);

        if cancellable {
            self.pending_cancel = Some(id);
            self.popup = Popup::Confirm;
        } else {
            self.alerts
                .push(AlertLevel::Warning, "This reservation cannot be cancelled");
        }
    }

    fn confirm_cancel(&mut self) {
        let Some(id) = self.pending_cancel.take() else {
            return;
        };
        if self.store.cancel_reservation(id) {
            if let Err(e) = self.store.save(self.config.store_file.as_deref()) {
                tracing::warn!("Could not persist store: {}", e);
            }
            self.alerts.push(AlertLevel::Info, "Reservation cancelled");
            self.rebuild_rows();
        } else {
            self.alerts
                .push(AlertLevel::Warning, "This reservation cannot be cancelled");
        }
    }

    /// Periodic housekeeping from the main loop.
    pub fn tick(&mut self) {
        self.alerts.poll_expired();
    }
}
