use std::sync::OnceLock;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::alert::AlertLevel;
use crate::app::{App, DisplayRow, Popup, Section};
use crate::form::FormField;
use crate::table::SortableTable;
use crate::theme::Theme;

// Load theme colors once at startup
static THEME: OnceLock<Theme> = OnceLock::new();

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::load)
}

fn accent() -> Color { theme().accent }
fn inactive() -> Color { theme().inactive }
fn success() -> Color { theme().success }
fn warning() -> Color { theme().warning }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn header() -> Color { theme().header }

const MAX_ALERT_LINES: u16 = 3;

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let alert_lines = (app.alerts.len() as u16).min(MAX_ALERT_LINES);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(alert_lines),    // Alert banners
            Constraint::Ratio(1, 2),            // Rooms box
            Constraint::Ratio(1, 2),            // Reservations box
            Constraint::Length(1),              // Footer
        ])
        .split(area);

    draw_alerts(f, app, chunks[0]);
    draw_rooms_box(f, app, chunks[1]);
    draw_reservations_box(f, app, chunks[2]);
    draw_footer(f, app, chunks[3]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Reserve => draw_reserve_popup(f, app),
        Popup::Help => draw_help_popup(f),
        Popup::Confirm => draw_confirm_popup(f, app),
    }
}

fn alert_color(level: AlertLevel) -> Color {
    match level {
        AlertLevel::Info => text_dim(),
        AlertLevel::Success => success(),
        AlertLevel::Warning => warning(),
        AlertLevel::Error => danger(),
    }
}

fn draw_alerts(f: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }

    for (i, alert) in app.alerts.iter().take(MAX_ALERT_LINES as usize).enumerate() {
        let line_area = Rect {
            y: area.y + i as u16,
            height: 1,
            ..area
        };
        let color = alert_color(alert.level);
        let marker = if alert.permanent { "▌▌ " } else { "▌ " };
        let mut spans = vec![
            Span::styled(marker, Style::default().fg(color)),
            Span::styled(alert.message.as_str(), Style::default().fg(color)),
        ];
        if i == 0 {
            spans.push(Span::styled("  (x to dismiss)", Style::default().fg(text_dim())));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), line_area);
    }
}

/// Header row with the direction indicator on the active column and an
/// underline on the column the cursor is parked on.
fn header_row(table: &SortableTable, is_active: bool) -> Row<'static> {
    let cells: Vec<Span> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let mut label = col.label.to_string();
            if let Some(direction) = table.direction_of(i) {
                label.push(' ');
                label.push_str(direction.indicator());
            }
            let mut style = Style::default().fg(header());
            if is_active && i == table.cursor && col.sortable {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            if !col.sortable {
                style = Style::default().fg(text_dim());
            }
            Span::styled(label, style)
        })
        .collect();
    Row::new(cells)
}

fn data_rows<'a>(
    rows: &'a [DisplayRow],
    selected: usize,
    is_active: bool,
    dim_cancelled: bool,
) -> Vec<Row<'a>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let cancelled = dim_cancelled
                && row.cells.last().map(|s| s == "cancelled").unwrap_or(false);
            let fg = if cancelled { text_dim() } else { text() };
            let mut style = Style::default().fg(fg);
            if i == selected && is_active {
                style = style.bg(bg_selected());
            }
            Row::new(row.cells.iter().map(|c| Span::raw(c.as_str()))).style(style)
        })
        .collect()
}

fn section_block(title: &str, is_active: bool) -> Block<'static> {
    let border_color = if is_active { accent() } else { inactive() };
    let title_style = if is_active {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(inactive())
    };
    Block::default()
        .title(Span::styled(format!(" {} ", title), title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
}

fn draw_rooms_box(f: &mut Frame, app: &App, area: Rect) {
    let is_active = app.section == Section::Rooms;
    let block = section_block("Rooms", is_active);

    let rows = if app.room_rows.is_empty() {
        vec![Row::new(vec![Span::styled(
            "  No rooms available",
            Style::default().fg(text_dim()),
        )])]
    } else {
        data_rows(&app.room_rows, app.selected_room, is_active, false)
    };

    let widths = vec![
        Constraint::Percentage(25),
        Constraint::Percentage(15),
        Constraint::Percentage(15),
        Constraint::Percentage(45),
    ];

    let table = Table::new(rows, widths)
        .header(header_row(&app.rooms_table, is_active))
        .block(block);

    f.render_widget(table, area);
}

fn draw_reservations_box(f: &mut Frame, app: &App, area: Rect) {
    let is_active = app.section == Section::Reservations;
    let block = section_block("Reservations", is_active);

    let rows = if app.reservation_rows.is_empty() {
        vec![Row::new(vec![Span::styled(
            "  Nothing booked. Press r on a room to quick-reserve it.",
            Style::default().fg(text_dim()),
        )])]
    } else {
        data_rows(
            &app.reservation_rows,
            app.selected_reservation,
            is_active,
            true,
        )
    };

    let widths = vec![
        Constraint::Percentage(26),
        Constraint::Percentage(14),
        Constraint::Percentage(14),
        Constraint::Percentage(18),
        Constraint::Percentage(12),
        Constraint::Percentage(16),
    ];

    let table = Table::new(rows, widths)
        .header(header_row(&app.reservations_table, is_active))
        .block(block);

    f.render_widget(table, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: Vec<Span> = match app.section {
        Section::Rooms => vec![
            Span::styled("r/Enter", Style::default().fg(accent())),
            Span::raw(" reserve │ "),
            Span::styled("←/→ s", Style::default().fg(accent())),
            Span::raw(" sort │ "),
            Span::styled("Tab", Style::default().fg(accent())),
            Span::raw(" reservations │ "),
            Span::styled("?", Style::default().fg(accent())),
            Span::raw(" help │ "),
            Span::styled("q", Style::default().fg(accent())),
            Span::raw(" quit"),
        ],
        Section::Reservations => vec![
            Span::styled("d", Style::default().fg(accent())),
            Span::raw(" cancel │ "),
            Span::styled("←/→ s", Style::default().fg(accent())),
            Span::raw(" sort │ "),
            Span::styled("Tab", Style::default().fg(accent())),
            Span::raw(" rooms │ "),
            Span::styled("?", Style::default().fg(accent())),
            Span::raw(" help │ "),
            Span::styled("q", Style::default().fg(accent())),
            Span::raw(" quit"),
        ],
    };

    let footer = Paragraph::new(Line::from(hints))
        .alignment(Alignment::Center)
        .style(Style::default().fg(text_dim()));
    f.render_widget(footer, area);
}

fn field_widget(field: &FormField, focused: bool, show_errors: bool) -> Paragraph<'static> {
    let has_error = show_errors && field.error.is_some();

    let border_color = if focused {
        accent()
    } else if has_error {
        danger()
    } else {
        inactive()
    };

    let title = if has_error {
        match &field.error {
            Some(e) => format!(" {} - {} ", field.label, e),
            None => format!(" {} ", field.label),
        }
    } else {
        format!(" {} ", field.label)
    };
    let title_color = if has_error { danger() } else if focused { accent() } else { header() };

    let cursor = if focused { "_" } else { "" };
    let (content, content_style) = if field.value.is_empty() && !focused {
        (
            field.placeholder.to_string(),
            Style::default().fg(text_dim()),
        )
    } else {
        (
            format!("{}{}", field.value, cursor),
            Style::default().fg(text()),
        )
    };

    Paragraph::new(content).style(content_style).block(
        Block::default()
            .title(Span::styled(title, Style::default().fg(title_color)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    )
}

fn draw_reserve_popup(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 70 { 90 } else { 50 },
        if area.height < 30 { 95 } else { 80 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", app.modal_title),
            Style::default().fg(accent()),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));
    f.render_widget(block, popup_area);

    let mut constraints: Vec<Constraint> =
        app.form.fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Min(1));
    constraints.push(Constraint::Length(1));

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(popup_area);

    for (i, field) in app.form.fields.iter().enumerate() {
        let focused = i == app.form.current;
        f.render_widget(
            field_widget(field, focused, app.form.was_validated),
            inner[i],
        );
    }

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().fg(success())),
        Span::raw(" save │ "),
        Span::styled("Tab", Style::default().fg(accent())),
        Span::raw(" next field │ "),
        Span::styled("Esc", Style::default().fg(danger())),
        Span::raw(" cancel"),
    ]))
    .alignment(Alignment::Center)
    .style(Style::default().fg(text_dim()));
    f.render_widget(hint, inner[app.form.fields.len() + 1]);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 95 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            "═══ Navigation ═══",
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  Tab       ", Style::default().fg(accent())),
            Span::raw("Switch between Rooms and Reservations"),
        ]),
        Line::from(vec![
            Span::styled("  ↑/↓ j/k   ", Style::default().fg(accent())),
            Span::raw("Move up/down in the list"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "═══ Sorting ═══",
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  ←/→       ", Style::default().fg(accent())),
            Span::raw("Move the header cursor"),
        ]),
        Line::from(vec![
            Span::styled("  s         ", Style::default().fg(accent())),
            Span::raw("Sort by that column; again to flip direction"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "═══ Reservations ═══",
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  r/Enter   ", Style::default().fg(accent())),
            Span::raw("Quick-reserve the selected room"),
        ]),
        Line::from(vec![
            Span::styled("  d         ", Style::default().fg(accent())),
            Span::raw("Cancel the selected reservation"),
        ]),
        Line::from(vec![
            Span::styled("  x         ", Style::default().fg(accent())),
            Span::raw("Dismiss the oldest alert banner"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "═══ Scripting ═══",
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  kaigi --status            ", Style::default().fg(accent())),
            Span::raw("Today's agenda as JSON"),
        ]),
        Line::from(vec![
            Span::styled("  kaigi --reserve <room-id> ", Style::default().fg(accent())),
            Span::raw("One-shot reservation"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("h", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" kaigi Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn draw_confirm_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(40, 20, f.area());

    f.render_widget(Clear, popup_area);

    let title = app
        .pending_cancel
        .and_then(|id| app.store.reservations.iter().find(|r| r.id == id))
        .map(|r| format!("Cancel '{}'?", r.title))
        .unwrap_or_else(|| "Cancel this reservation?".to_string());

    let confirm = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(title, Style::default().fg(warning()))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(success()).add_modifier(Modifier::BOLD)),
            Span::raw(" Yes   "),
            Span::styled("n", Style::default().fg(danger()).add_modifier(Modifier::BOLD)),
            Span::raw(" No"),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Confirm ", Style::default().fg(warning())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(warning())),
    )
    .alignment(Alignment::Center);

    f.render_widget(confirm, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
