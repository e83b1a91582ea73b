//! The reservation form and its submission gate.
//!
//! Validation feedback stays hidden until the first submission attempt;
//! after that every field shows its error until fixed. An invalid form
//! blocks submission, a valid one yields a `ReservationDraft` for the app
//! to commit.

use chrono::{NaiveDate, NaiveTime};

use crate::format;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Time,
    Number,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub placeholder: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub cursor: usize,
    pub error: Option<String>,
}

impl FormField {
    fn new(label: &'static str, kind: FieldKind, placeholder: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            placeholder,
            kind,
            required: true,
            cursor: 0,
            error: None,
        }
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
        self.error = None;
    }

    pub fn insert_char(&mut self, c: char) {
        // Number fields take digits only.
        if self.kind == FieldKind::Number && !c.is_ascii_digit() {
            return;
        }
        let byte_idx = char_to_byte(&self.value, self.cursor);
        self.value.insert(byte_idx, c);
        self.cursor += 1;
        self.error = None;
    }

    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_idx = char_to_byte(&self.value, self.cursor);
            self.value.remove(byte_idx);
            self.error = None;
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    fn validate(&mut self) {
        self.error = None;
        let trimmed = self.value.trim();

        if trimmed.is_empty() {
            if self.required {
                self.error = Some("Required".to_string());
            }
            return;
        }

        match self.kind {
            FieldKind::Text => {}
            FieldKind::Date => {
                if let Err(e) = format::parse_date(trimmed) {
                    self.error = Some(e.to_string());
                }
            }
            FieldKind::Time => {
                if let Err(e) = format::parse_time(trimmed) {
                    self.error = Some(e.to_string());
                }
            }
            FieldKind::Number => match trimmed.parse::<u32>() {
                Ok(0) | Err(_) => {
                    self.error = Some("Must be a positive number".to_string());
                }
                Ok(_) => {}
            },
        }
    }
}

fn char_to_byte(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// A validated reservation, ready to commit to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDraft {
    pub room_id: String,
    pub title: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub attendees: u32,
}

pub const FIELD_TITLE: usize = 0;
pub const FIELD_DATE: usize = 1;
pub const FIELD_START: usize = 2;
pub const FIELD_END: usize = 3;
pub const FIELD_ATTENDEES: usize = 4;

#[derive(Debug, Clone)]
pub struct ReservationForm {
    pub fields: Vec<FormField>,
    pub current: usize,
    /// Set on the first submission attempt; field errors render from then on.
    pub was_validated: bool,
    /// Hidden room-id field, always the most recently requested room.
    pub room_id: String,
}

impl ReservationForm {
    pub fn new() -> Self {
        Self {
            fields: vec![
                FormField::new("Title", FieldKind::Text, "Weekly sync"),
                FormField::new("Date", FieldKind::Date, "YYYY-MM-DD"),
                FormField::new("Start", FieldKind::Time, "HH:MM"),
                FormField::new("End", FieldKind::Time, "HH:MM"),
                FormField::new("Attendees", FieldKind::Number, "4"),
            ],
            current: 0,
            was_validated: false,
            room_id: String::new(),
        }
    }

    pub fn current_field_mut(&mut self) -> &mut FormField {
        &mut self.fields[self.current]
    }

    pub fn focus_next(&mut self) {
        self.current = (self.current + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.current = self
            .current
            .checked_sub(1)
            .unwrap_or(self.fields.len() - 1);
    }

    /// The submission gate: always marks the form validated, blocks on any
    /// invalid field, otherwise yields the draft.
    pub fn try_submit(&mut self) -> Option<ReservationDraft> {
        self.was_validated = true;

        for field in &mut self.fields {
            field.validate();
        }

        // Cross-field check once both times parse on their own.
        if self.fields[FIELD_START].error.is_none() && self.fields[FIELD_END].error.is_none() {
            let start = format::parse_time(&self.fields[FIELD_START].value);
            let end = format::parse_time(&self.fields[FIELD_END].value);
            if let (Ok(start), Ok(end)) = (start, end) {
                if end <= start {
                    self.fields[FIELD_END].error = Some("Must be after start".to_string());
                }
            }
        }

        if self.fields.iter().any(|f| f.error.is_some()) {
            return None;
        }

        let date = format::parse_date(&self.fields[FIELD_DATE].value).ok()?;
        let start = format::parse_time(&self.fields[FIELD_START].value).ok()?;
        let end = format::parse_time(&self.fields[FIELD_END].value).ok()?;
        let attendees = self.fields[FIELD_ATTENDEES].value.trim().parse().ok()?;

        Some(ReservationDraft {
            room_id: self.room_id.clone(),
            title: self.fields[FIELD_TITLE].value.trim().to_string(),
            date,
            start,
            end,
            attendees,
        })
    }
}

impl Default for ReservationForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> ReservationForm {
        let mut form = ReservationForm::new();
        form.room_id = "2".to_string();
        form.fields[FIELD_TITLE].set_value("Design review");
        form.fields[FIELD_DATE].set_value("2025-03-05");
        form.fields[FIELD_START].set_value("09:00");
        form.fields[FIELD_END].set_value("10:30");
        form.fields[FIELD_ATTENDEES].set_value("6");
        form
    }

    #[test]
    fn valid_form_yields_a_draft() {
        let mut form = filled_form();
        let draft = form.try_submit().expect("draft");
        assert!(form.was_validated);
        assert_eq!(draft.room_id, "2");
        assert_eq!(draft.title, "Design review");
        assert_eq!(draft.attendees, 6);
    }

    #[test]
    fn missing_required_field_blocks_and_marks_validated() {
        let mut form = filled_form();
        form.fields[FIELD_TITLE].set_value("");
        assert!(form.try_submit().is_none());
        assert!(form.was_validated);
        assert_eq!(form.fields[FIELD_TITLE].error.as_deref(), Some("Required"));
    }

    #[test]
    fn malformed_date_blocks_submission() {
        let mut form = filled_form();
        form.fields[FIELD_DATE].set_value("05/03/2025");
        assert!(form.try_submit().is_none());
        assert!(form.fields[FIELD_DATE].error.is_some());
    }

    #[test]
    fn end_must_be_after_start() {
        let mut form = filled_form();
        form.fields[FIELD_END].set_value("09:00");
        assert!(form.try_submit().is_none());
        assert_eq!(
            form.fields[FIELD_END].error.as_deref(),
            Some("Must be after start")
        );
    }

    #[test]
    fn zero_attendees_is_rejected() {
        let mut form = filled_form();
        form.fields[FIELD_ATTENDEES].set_value("0");
        assert!(form.try_submit().is_none());
    }

    #[test]
    fn number_field_ignores_non_digits() {
        let mut form = ReservationForm::new();
        form.current = FIELD_ATTENDEES;
        form.current_field_mut().insert_char('a');
        form.current_field_mut().insert_char('7');
        assert_eq!(form.fields[FIELD_ATTENDEES].value, "7");
    }

    #[test]
    fn editing_clears_the_field_error() {
        let mut form = filled_form();
        form.fields[FIELD_TITLE].set_value("");
        assert!(form.try_submit().is_none());
        form.current = FIELD_TITLE;
        form.current_field_mut().insert_char('x');
        assert!(form.fields[FIELD_TITLE].error.is_none());
    }
}
