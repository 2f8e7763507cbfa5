//! Terminal UI: rendering of the calendar, and keyboard handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::App;
use crate::calendar::Cell;
use crate::traits::TaskSource;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];


/// Which input of the task form receives the typed characters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
}

/// UI-only state, that is not part of the calendar view
#[derive(Clone, Debug)]
pub struct UiState {
    /// The day the keyboard cursor is on
    pub cursor_day: u32,
    pub focus: FormField,
    pub should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self { cursor_day: 1, focus: FormField::Title, should_quit: false }
    }
}


/// Main draw function for the entire UI.
pub fn draw<S>(frame: &mut Frame, app: &App<S>, state: &UiState)
where
    S: TaskSource + 'static,
{
    let view = app.view();
    let form_height = if view.is_form_open() { 6 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),           // Header
            Constraint::Length(1),           // Weekday names
            Constraint::Min(5),              // Grid
            Constraint::Length(form_height), // Task form
            Constraint::Length(1),           // Key help
        ])
        .split(frame.area());

    let header = Paragraph::new(format!("Calendar for {}", view.period()))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    render_weekdays(frame, chunks[1]);
    render_grid(frame, chunks[2], app, state);
    if view.is_form_open() {
        render_form(frame, chunks[3], app, state);
    }
    render_help(frame, chunks[4], app);
}

fn week_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 7); 7])
        .split(area)
}

fn render_weekdays(frame: &mut Frame, area: Rect) {
    for (name, column) in WEEKDAYS.iter().zip(week_columns(area).iter()) {
        let paragraph = Paragraph::new(*name).style(Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(paragraph, *column);
    }
}

fn render_grid<S>(frame: &mut Frame, area: Rect, app: &App<S>, state: &UiState)
where
    S: TaskSource + 'static,
{
    let view = app.view();
    let grid = view.grid();
    let n_weeks = grid.weeks().count() as u32;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, n_weeks); n_weeks as usize])
        .split(area);

    for (week, row) in grid.weeks().zip(rows.iter()) {
        for (cell, column) in week.iter().zip(week_columns(*row).iter()) {
            let day = match cell {
                Cell::Blank => {
                    let block = Block::default().borders(Borders::ALL).border_style(Style::default().add_modifier(Modifier::DIM));
                    frame.render_widget(block, *column);
                    continue;
                },
                Cell::Day(d) => *d,
            };

            let mut border_style = Style::default();
            if view.selected_day() == Some(day) {
                border_style = border_style.add_modifier(Modifier::BOLD);
            }
            if state.cursor_day == day {
                border_style = border_style.add_modifier(Modifier::REVERSED);
            }

            let mut lines = Vec::new();
            for task in view.tasks_for_day(day) {
                lines.push(Line::from(task.title().to_string()));
                lines.push(Line::from(Span::styled(task.status_label(), Style::default().add_modifier(Modifier::DIM))));
            }

            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(day.to_string());
            frame.render_widget(Paragraph::new(lines).block(block), *column);
        }
    }
}

fn render_form<S>(frame: &mut Frame, area: Rect, app: &App<S>, state: &UiState)
where
    S: TaskSource + 'static,
{
    let view = app.view();
    let day = match view.selected_day() {
        None => return,
        Some(d) => d,
    };

    let field_line = |label: &str, value: &str, field: FormField| {
        let focused = state.focus == field;
        let marker = if focused { "> " } else { "  " };
        let style = if focused { Style::default().add_modifier(Modifier::BOLD) } else { Style::default() };
        Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{}: ", label), style),
            Span::raw(value.to_string()),
        ])
    };

    let lines = vec![
        field_line("Task title", &view.draft().title, FormField::Title),
        field_line("Task description", &view.draft().description, FormField::Description),
        Line::from(""),
        Line::from(Span::styled("Enter: Save Task   Tab: next field   Esc: close", Style::default().add_modifier(Modifier::DIM))),
    ];

    let title = format!("Task for {}/{}/{}", day, view.period().month(), view.period().year());
    let form = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(form, area);
}

fn render_help<S>(frame: &mut Frame, area: Rect, app: &App<S>)
where
    S: TaskSource + 'static,
{
    let mut text = String::from("< > month   arrows move   Enter select day   r refresh   q quit");
    if app.is_busy() {
        text.push_str("   (loading...)");
    }
    frame.render_widget(Paragraph::new(text).style(Style::default().add_modifier(Modifier::DIM)), area);
}



/// Apply a key press to the app.
///
/// When the task form is open, typed characters go to the form
pub fn handle_key<S>(app: &mut App<S>, state: &mut UiState, key: KeyEvent)
where
    S: TaskSource + 'static,
{
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => state.should_quit = true,
            KeyCode::Char('s') => { app.submit(); },
            _ => {},
        }
        return;
    }

    match key.code {
        KeyCode::PageUp => return change_month(app, state, -1),
        KeyCode::PageDown => return change_month(app, state, 1),
        _ => {},
    }

    if app.view().is_form_open() {
        handle_form_key(app, state, key);
    } else {
        handle_grid_key(app, state, key);
    }
}

fn handle_grid_key<S>(app: &mut App<S>, state: &mut UiState, key: KeyEvent)
where
    S: TaskSource + 'static,
{
    match key.code {
        KeyCode::Char('q') => state.should_quit = true,
        KeyCode::Char('<') | KeyCode::Char(',') => change_month(app, state, -1),
        KeyCode::Char('>') | KeyCode::Char('.') => change_month(app, state, 1),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Left => move_cursor(app, state, -1),
        KeyCode::Right => move_cursor(app, state, 1),
        KeyCode::Up => move_cursor(app, state, -7),
        KeyCode::Down => move_cursor(app, state, 7),
        KeyCode::Enter => {
            state.focus = FormField::Title;
            app.view_mut().select_day(state.cursor_day);
        },
        _ => {},
    }
}

fn handle_form_key<S>(app: &mut App<S>, state: &mut UiState, key: KeyEvent)
where
    S: TaskSource + 'static,
{
    match key.code {
        KeyCode::Esc => app.view_mut().close_form(),
        KeyCode::Tab | KeyCode::BackTab => {
            state.focus = match state.focus {
                FormField::Title => FormField::Description,
                FormField::Description => FormField::Title,
            };
        },
        KeyCode::Enter => { app.submit(); },
        KeyCode::Backspace => { focused_field(app, state).pop(); },
        KeyCode::Char(c) => focused_field(app, state).push(c),
        _ => {},
    }
}

fn focused_field<'a, S>(app: &'a mut App<S>, state: &UiState) -> &'a mut String
where
    S: TaskSource + 'static,
{
    let draft = app.view_mut().draft_mut();
    match state.focus {
        FormField::Title => &mut draft.title,
        FormField::Description => &mut draft.description,
    }
}

fn change_month<S>(app: &mut App<S>, state: &mut UiState, increment: i32)
where
    S: TaskSource + 'static,
{
    app.view_mut().change_month(increment);
    state.cursor_day = state.cursor_day.min(app.view().period().days_in_month());
}

fn move_cursor<S>(app: &App<S>, state: &mut UiState, offset: i64)
where
    S: TaskSource + 'static,
{
    let days = app.view().period().days_in_month() as i64;
    let moved = state.cursor_day as i64 + offset;
    if moved >= 1 && moved <= days {
        state.cursor_day = moved as u32;
    }
}
