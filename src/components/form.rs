//! Generic form engine
//!
//! Renders any `FieldList` by matching exhaustively on the field kind, routes
//! key events to the focused control, and runs the schema on submit. Dialogs
//! own a `FormView` and react to the events it emits; the engine itself never
//! talks to the store.

use crate::components::calendar::CalendarState;
use crate::components::centered_popup;
use crate::model::{
    Choice, FieldKind, FieldList, FieldValue, FormState, InputControl, Schema, ValidatedValues,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Event emitted by the form engine towards its owning dialog
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// Validation passed; the value map has one key per descriptor
    Submit(ValidatedValues),
    Cancel,
}

/// Typeahead option picker for the searchable select kinds
#[derive(Debug, Clone)]
struct ListPicker {
    field_index: usize,
    query: String,
    cursor: usize,
    multi: bool,
}

impl ListPicker {
    fn filtered(&self, options: &[Choice]) -> Vec<usize> {
        let query = self.query.to_lowercase();
        options
            .iter()
            .enumerate()
            .filter(|(_, choice)| choice.label.to_lowercase().contains(&query))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Popup currently open on top of the form
#[derive(Debug, Clone)]
enum Picker {
    Calendar {
        field_index: usize,
        state: CalendarState,
    },
    List(ListPicker),
}

/// Declarative form: descriptors, schema, and the state they drive
pub struct FormView {
    fields: FieldList,
    schema: Schema,
    form: FormState,
    /// 0..fields.len() are fields, fields.len() is the submit button
    focus: usize,
    picker: Option<Picker>,
    submitting: bool,
    submit_label: String,
    notice: Option<String>,
}

impl FormView {
    pub fn new(fields: FieldList, schema: Schema) -> Self {
        let form = FormState::from_fields(&fields);
        Self {
            fields,
            schema,
            form,
            focus: 0,
            picker: None,
            submitting: false,
            submit_label: "Save changes".to_string(),
            notice: None,
        }
    }

    pub fn submit_label(mut self, label: &str) -> Self {
        self.submit_label = label.to_string();
        self
    }

    /// Reset the state, overlaying initial values (edit mode seeding)
    pub fn seed(&mut self, initial: &ValidatedValues) {
        self.form.reset_to(&self.fields, initial);
        self.focus = 0;
        self.picker = None;
        self.notice = None;
    }

    pub fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Message shown above the fields, e.g. a failed sign-in
    pub fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.form.value(name)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.form.error(name)
    }

    fn submit_index(&self) -> usize {
        self.fields.len()
    }

    fn focus_next(&mut self) {
        if self.focus < self.submit_index() {
            self.focus += 1;
        } else {
            self.focus = 0;
        }
    }

    fn focus_prev(&mut self) {
        if self.focus > 0 {
            self.focus -= 1;
        } else {
            self.focus = self.submit_index();
        }
    }

    fn try_submit(&mut self) -> Option<FormEvent> {
        self.schema
            .validate(&self.fields, &mut self.form)
            .map(FormEvent::Submit)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormEvent> {
        // One submission at a time; the dialog re-enables the form afterwards
        if self.submitting {
            return None;
        }

        if self.picker.is_some() {
            self.handle_picker_key(key);
            return None;
        }

        match key.code {
            KeyCode::Esc => return Some(FormEvent::Cancel),
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Enter if self.focus == self.submit_index() => return self.try_submit(),
            _ => self.handle_field_key(key),
        }
        None
    }

    fn handle_field_key(&mut self, key: KeyEvent) {
        let Some(field) = self.fields.get(self.focus) else {
            return;
        };
        let name = field.name.clone();
        let kind = field.kind.clone();

        match &kind {
            FieldKind::Input { .. } => match key.code {
                KeyCode::Char(c) => {
                    if let Some(FieldValue::Text(s)) = self.form.value_mut(&name) {
                        s.push(c);
                    }
                }
                KeyCode::Backspace => {
                    if let Some(FieldValue::Text(s)) = self.form.value_mut(&name) {
                        s.pop();
                    }
                }
                KeyCode::Enter => self.focus_next(),
                _ => {}
            },
            FieldKind::DatePicker => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let initial = match self.form.value(&name) {
                        Some(FieldValue::Date(date)) => *date,
                        _ => None,
                    };
                    self.picker = Some(Picker::Calendar {
                        field_index: self.focus,
                        state: CalendarState::new(initial),
                    });
                }
                KeyCode::Backspace | KeyCode::Delete => {
                    if let Some(FieldValue::Date(date)) = self.form.value_mut(&name) {
                        *date = None;
                    }
                }
                _ => {}
            },
            FieldKind::Select { options } => match key.code {
                KeyCode::Right | KeyCode::Char(' ') => self.cycle_choice(&name, options, 1),
                KeyCode::Left => self.cycle_choice(&name, options, -1),
                KeyCode::Backspace | KeyCode::Delete => {
                    if let Some(FieldValue::Choice(choice)) = self.form.value_mut(&name) {
                        *choice = None;
                    }
                }
                KeyCode::Enter => self.focus_next(),
                _ => {}
            },
            FieldKind::SearchableSelect { .. } | FieldKind::MultiSelect { .. } => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.picker = Some(Picker::List(ListPicker {
                        field_index: self.focus,
                        query: String::new(),
                        cursor: 0,
                        multi: matches!(kind, FieldKind::MultiSelect { .. }),
                    }));
                }
                KeyCode::Backspace | KeyCode::Delete => match self.form.value_mut(&name) {
                    Some(FieldValue::Choice(choice)) => *choice = None,
                    Some(FieldValue::Multi(values)) => {
                        values.pop();
                    }
                    _ => {}
                },
                _ => {}
            },
        }
    }

    fn cycle_choice(&mut self, name: &str, options: &[Choice], step: isize) {
        let Some(FieldValue::Choice(choice)) = self.form.value_mut(name) else {
            return;
        };
        let len = options.len() as isize;
        let current = choice
            .as_deref()
            .and_then(|v| options.iter().position(|o| o.value == v));
        let next = match current {
            Some(index) => (index as isize + step).rem_euclid(len) as usize,
            None if step > 0 => 0,
            None => options.len() - 1,
        };
        *choice = Some(options[next].value.clone());
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        match picker {
            Picker::Calendar { field_index, state } => match key.code {
                KeyCode::Esc => self.picker = None,
                KeyCode::Left => state.move_days(-1),
                KeyCode::Right => state.move_days(1),
                KeyCode::Up => state.move_days(-7),
                KeyCode::Down => state.move_days(7),
                KeyCode::PageUp => state.move_months(-1),
                KeyCode::PageDown => state.move_months(1),
                KeyCode::Enter => {
                    let picked = state.cursor();
                    let index = *field_index;
                    if let Some(field) = self.fields.get(index) {
                        let name = field.name.clone();
                        if let Some(FieldValue::Date(date)) = self.form.value_mut(&name) {
                            *date = Some(picked);
                        }
                    }
                    self.picker = None;
                }
                _ => {}
            },
            Picker::List(list) => match key.code {
                KeyCode::Esc => self.picker = None,
                KeyCode::Char(c) => {
                    list.query.push(c);
                    list.cursor = 0;
                }
                KeyCode::Backspace => {
                    list.query.pop();
                    list.cursor = 0;
                }
                KeyCode::Up => list.cursor = list.cursor.saturating_sub(1),
                KeyCode::Down => list.cursor = list.cursor.saturating_add(1),
                KeyCode::Enter => {
                    let index = list.field_index;
                    let multi = list.multi;
                    let Some(field) = self.fields.get(index) else {
                        self.picker = None;
                        return;
                    };
                    let name = field.name.clone();
                    let Some(options) = field.kind.options().map(<[Choice]>::to_vec) else {
                        self.picker = None;
                        return;
                    };
                    let filtered = list.filtered(&options);
                    let Some(&option_index) = filtered.get(list.cursor.min(
                        filtered.len().saturating_sub(1),
                    )) else {
                        return;
                    };
                    let picked = options[option_index].value.clone();
                    match self.form.value_mut(&name) {
                        Some(FieldValue::Choice(choice)) => *choice = Some(picked),
                        Some(FieldValue::Multi(values)) => {
                            if let Some(pos) = values.iter().position(|v| *v == picked) {
                                values.remove(pos);
                            } else {
                                values.push(picked);
                            }
                        }
                        _ => {}
                    }
                    if !multi {
                        self.picker = None;
                    }
                }
                _ => {}
            },
        }
    }

    fn label_for<'a>(options: &'a [Choice], value: &'a str) -> &'a str {
        options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
            .unwrap_or(value)
    }

    fn control_line(&self, index: usize) -> Line<'static> {
        let Some(field) = self.fields.get(index) else {
            return Line::default();
        };
        let focused = self.focus == index;
        let value = self.form.value(&field.name);

        let (text, is_placeholder) = match (&field.kind, value) {
            (FieldKind::Input { control }, Some(FieldValue::Text(s))) => {
                if s.is_empty() {
                    (field.placeholder.clone(), true)
                } else if *control == InputControl::Password {
                    ("\u{2022}".repeat(s.chars().count()), false)
                } else {
                    (s.clone(), false)
                }
            }
            (FieldKind::DatePicker, Some(FieldValue::Date(date))) => match date {
                Some(d) => (d.format("%Y-%m-%d").to_string(), false),
                None => (field.placeholder.clone(), true),
            },
            (
                FieldKind::Select { options }
                | FieldKind::SearchableSelect { options },
                Some(FieldValue::Choice(choice)),
            ) => match choice {
                Some(v) => (Self::label_for(options, v).to_string(), false),
                None => (field.placeholder.clone(), true),
            },
            (FieldKind::MultiSelect { options }, Some(FieldValue::Multi(values))) => {
                if values.is_empty() {
                    (field.placeholder.clone(), true)
                } else {
                    let labels: Vec<&str> =
                        values.iter().map(|v| Self::label_for(options, v)).collect();
                    (labels.join(", "), false)
                }
            }
            _ => (String::new(), true),
        };

        let style = if is_placeholder {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        let mut spans = vec![Span::raw("  "), Span::styled(text, style)];
        if focused && matches!(field.kind, FieldKind::Input { .. }) {
            spans.push(Span::styled("█", Style::default().fg(Color::White)));
        }
        Line::from(spans)
    }

    /// Lines the form occupies, for sizing the owning popup
    pub fn content_height(&self) -> u16 {
        let mut height = 2; // submit button and its leading blank
        if self.notice.is_some() {
            height += 2;
        }
        for field in self.fields.iter() {
            height += 3; // label, control, separator
            if !field.description.is_empty() {
                height += 1;
            }
            if self.form.error(&field.name).is_some() {
                height += 1;
            }
        }
        height
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();

        if let Some(notice) = &self.notice {
            lines.push(Line::from(Span::styled(
                notice.clone(),
                Style::default().fg(Color::Red),
            )));
            lines.push(Line::default());
        }

        for (index, field) in self.fields.iter().enumerate() {
            let focused = self.focus == index;
            let label_style = if focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let marker = if focused { "▶ " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker.to_string(), label_style),
                Span::styled(field.label.clone(), label_style),
            ]));
            lines.push(self.control_line(index));
            if !field.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {}", field.description),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            if let Some(error) = self.form.error(&field.name) {
                lines.push(Line::from(Span::styled(
                    format!("  {error}"),
                    Style::default().fg(Color::Red),
                )));
            }
            lines.push(Line::default());
        }

        let submit_focused = self.focus == self.submit_index();
        let button = if self.submitting {
            Span::styled("  Saving...", Style::default().fg(Color::DarkGray))
        } else {
            let style = if submit_focused {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green)
            };
            Span::styled(format!("  [ {} ]", self.submit_label), style)
        };
        lines.push(Line::from(button));

        frame.render_widget(Paragraph::new(lines), area);

        match &self.picker {
            Some(Picker::Calendar { state, .. }) => state.draw(frame, area),
            Some(Picker::List(list)) => self.draw_list_picker(frame, area, list),
            None => {}
        }
    }

    fn draw_list_picker(&self, frame: &mut Frame, area: Rect, list: &ListPicker) {
        let Some(field) = self.fields.get(list.field_index) else {
            return;
        };
        let Some(options) = field.kind.options() else {
            return;
        };
        let filtered = list.filtered(options);
        let cursor = list.cursor.min(filtered.len().saturating_sub(1));

        let selected: Vec<&str> = match self.form.value(&field.name) {
            Some(FieldValue::Multi(values)) => values.iter().map(String::as_str).collect(),
            Some(FieldValue::Choice(Some(v))) => vec![v.as_str()],
            _ => Vec::new(),
        };

        let height = (filtered.len() as u16 + 4).min(14);
        let popup_area = centered_popup(area, 36, height);
        frame.render_widget(Clear, popup_area);

        let mut lines = vec![Line::from(vec![
            Span::styled("/ ", Style::default().fg(Color::Cyan)),
            Span::styled(list.query.clone(), Style::default().fg(Color::White)),
            Span::styled("█", Style::default().fg(Color::White)),
        ])];
        for (row, &option_index) in filtered.iter().enumerate() {
            let choice = &options[option_index];
            let picked = selected.contains(&choice.value.as_str());
            let check = if list.multi {
                if picked { "[x] " } else { "[ ] " }
            } else if picked {
                "● "
            } else {
                "○ "
            };
            let style = if row == cursor {
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(Span::styled(
                format!("{check}{}", choice.label),
                style,
            )));
        }
        if filtered.is_empty() {
            lines.push(Line::from(Span::styled(
                "No matches",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {} ", field.label))
                .title_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, popup_area);
    }
}
