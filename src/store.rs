//! Room directory and reservation list, persisted as TOML in the user data
//! directory. A fresh store seeds the default room directory so the UI has
//! something to show on first launch.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Shown as the room name when an identifier matches nothing.
pub const FALLBACK_ROOM_LABEL: &str = "Selected room";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not find data directory")]
    NoDataDir,
    #[error("failed to read store: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse store: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize store: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub capacity: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: u32,
    pub room_id: u32,
    pub title: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub attendees: u32,
    pub status: ReservationStatus,
}

impl Reservation {
    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.date.and_time(self.end) < now
    }

    /// Cancellable while still confirmed and not yet started.
    pub fn can_cancel(&self, now: NaiveDateTime) -> bool {
        self.status == ReservationStatus::Confirmed && self.date.and_time(self.start) > now
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Store {
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
}

impl Store {
    fn store_path() -> Result<PathBuf, StoreError> {
        let data_dir = dirs::data_dir()
            .ok_or(StoreError::NoDataDir)?
            .join("kaigi");

        if let Err(e) = std::fs::create_dir_all(&data_dir) {
            tracing::warn!("Could not create data directory: {}", e);
        }

        Ok(data_dir.join("store.toml"))
    }

    /// Load the store, falling back to a seeded default on any failure.
    pub fn load(path_override: Option<&Path>) -> Self {
        let path = match path_override {
            Some(p) => p.to_path_buf(),
            None => match Self::store_path() {
                Ok(p) => p,
                Err(_) => return Self::seeded(),
            },
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str::<Store>(&content) {
                    Ok(store) if !store.rooms.is_empty() => return store,
                    Ok(_) => tracing::warn!("Store has no rooms, reseeding"),
                    Err(e) => tracing::warn!("Failed to parse store: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read store: {}", e),
            }
        }

        let store = Self::seeded();
        if let Err(e) = store.save(path_override) {
            tracing::warn!("Could not write initial store: {}", e);
        }
        store
    }

    pub fn save(&self, path_override: Option<&Path>) -> Result<(), StoreError> {
        let path = match path_override {
            Some(p) => p.to_path_buf(),
            None => Self::store_path()?,
        };
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The default room directory for a fresh install.
    pub fn seeded() -> Self {
        let rooms = vec![
            Room {
                id: 1,
                name: "Room A".to_string(),
                location: "6F".to_string(),
                capacity: 19,
                description: "Medium meeting room".to_string(),
                active: true,
            },
            Room {
                id: 2,
                name: "Room B".to_string(),
                location: "7F".to_string(),
                capacity: 20,
                description: "Medium meeting room".to_string(),
                active: true,
            },
            Room {
                id: 3,
                name: "Room C".to_string(),
                location: "3F".to_string(),
                capacity: 5,
                description: "Small huddle room".to_string(),
                active: true,
            },
            Room {
                id: 4,
                name: "Room D".to_string(),
                location: "4F".to_string(),
                capacity: 50,
                description: "Large meeting room".to_string(),
                active: true,
            },
        ];

        Self {
            rooms,
            reservations: Vec::new(),
        }
    }

    pub fn active_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| r.active)
    }

    /// Look up a room by its identifier rendered as a string. Input is
    /// trimmed and compared exactly; no numeric coercion.
    pub fn room_by_ident(&self, ident: &str) -> Option<&Room> {
        let ident = ident.trim();
        self.rooms.iter().find(|r| r.id.to_string() == ident)
    }

    /// Display name for a room identifier, with the generic fallback when
    /// nothing matches.
    pub fn room_name_for(&self, ident: &str) -> String {
        self.room_by_ident(ident)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| FALLBACK_ROOM_LABEL.to_string())
    }

    pub fn room_name_of(&self, room_id: u32) -> String {
        self.rooms
            .iter()
            .find(|r| r.id == room_id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| FALLBACK_ROOM_LABEL.to_string())
    }

    pub fn add_reservation(
        &mut self,
        room_id: u32,
        title: String,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        attendees: u32,
    ) -> u32 {
        let id = self
            .reservations
            .iter()
            .map(|r| r.id)
            .max()
            .unwrap_or(0)
            + 1;
        self.reservations.push(Reservation {
            id,
            room_id,
            title,
            date,
            start,
            end,
            attendees,
            status: ReservationStatus::Confirmed,
        });
        id
    }

    pub fn cancel_reservation(&mut self, id: u32) -> bool {
        let now = Local::now().naive_local();
        match self.reservations.iter_mut().find(|r| r.id == id) {
            Some(r) if r.can_cancel(now) => {
                r.status = ReservationStatus::Cancelled;
                true
            }
            _ => false,
        }
    }

    /// Confirmed reservations for one day, ordered by start time.
    pub fn agenda_for(&self, date: NaiveDate) -> Vec<&Reservation> {
        let mut day: Vec<&Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.date == date && r.status == ReservationStatus::Confirmed)
            .collect();
        day.sort_by_key(|r| r.start);
        day
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(y: i32, mo: u32, da: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, da).unwrap()
    }

    #[test]
    fn fresh_store_is_seeded_with_rooms() {
        let store = Store::seeded();
        assert_eq!(store.rooms.len(), 4);
        assert!(store.reservations.is_empty());
        assert_eq!(store.room_name_for("2"), "Room B");
    }

    #[test]
    fn room_lookup_trims_but_never_coerces() {
        let store = Store::seeded();
        assert_eq!(store.room_name_for(" 2 "), "Room B");
        assert_eq!(store.room_name_for("02"), FALLBACK_ROOM_LABEL);
        assert_eq!(store.room_name_for("99"), FALLBACK_ROOM_LABEL);
    }

    #[test]
    fn reservation_ids_are_monotonic() {
        let mut store = Store::seeded();
        let first = store
            .add_reservation(1, "a".into(), d(2025, 3, 5), t(9, 0), t(10, 0), 2);
        let second = store
            .add_reservation(1, "b".into(), d(2025, 3, 5), t(10, 0), t(11, 0), 2);
        assert_eq!(second, first + 1);
    }

    #[test]
    fn cancel_only_works_on_future_confirmed() {
        let mut store = Store::seeded();
        let past = store
            .add_reservation(1, "old".into(), d(2000, 1, 1), t(9, 0), t(10, 0), 2);
        let future = store
            .add_reservation(1, "new".into(), d(2099, 1, 1), t(9, 0), t(10, 0), 2);

        assert!(!store.cancel_reservation(past));
        assert!(store.cancel_reservation(future));
        // Second cancel is refused: no longer confirmed.
        assert!(!store.cancel_reservation(future));
    }

    #[test]
    fn agenda_is_sorted_and_filtered() {
        let mut store = Store::seeded();
        let day = d(2025, 3, 5);
        store.add_reservation(1, "late".into(), day, t(14, 0), t(15, 0), 2);
        store.add_reservation(2, "early".into(), day, t(9, 0), t(10, 0), 2);
        store.add_reservation(1, "other day".into(), d(2025, 3, 6), t(9, 0), t(10, 0), 2);
        let cancelled = store
            .add_reservation(1, "gone".into(), day, t(11, 0), t(12, 0), 2);
        if let Some(r) = store.reservations.iter_mut().find(|r| r.id == cancelled) {
            r.status = ReservationStatus::Cancelled;
        }

        let agenda = store.agenda_for(day);
        let titles: Vec<_> = agenda.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["early", "late"]);
    }

    #[test]
    fn store_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.toml");

        let mut store = Store::seeded();
        store.add_reservation(3, "standup".into(), d(2025, 3, 5), t(9, 0), t(9, 15), 5);
        store.save(Some(&path)).unwrap();

        let loaded = Store::load(Some(&path));
        assert_eq!(loaded.rooms.len(), store.rooms.len());
        assert_eq!(loaded.reservations.len(), 1);
        assert_eq!(loaded.reservations[0].title, "standup");
        assert_eq!(loaded.reservations[0].status, ReservationStatus::Confirmed);
    }

    #[test]
    fn load_reseeds_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.toml");
        std::fs::write(&path, "not toml [[[").unwrap();

        let store = Store::load(Some(&path));
        assert_eq!(store.rooms.len(), 4);
    }
}
