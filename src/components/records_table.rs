//! Records table - the main browsing surface
//!
//! One tab per entity family. The component keeps a rebuilt row cache so
//! navigation, selection, and drawing all work off the same filtered and
//! sorted view; the app calls `rebuild` whenever records or view settings
//! change.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::calculate_main_layout;
use crate::model::{
    columns::{course_columns, student_columns, subject_columns},
    ColumnDef, DomainState, EntityKind, SortDirection,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
    Frame,
};
use std::collections::HashSet;
use unicode_width::UnicodeWidthStr;

const MAX_COLUMN_WIDTH: u16 = 32;

/// One rendered row of the active table
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: String,
    pub cells: Vec<String>,
}

/// Filter and sort records into display rows
fn build_rows<T>(
    records: &[T],
    columns: &[ColumnDef<T>],
    id: fn(&T) -> String,
    filter: &str,
    sort: Option<(usize, SortDirection)>,
) -> Vec<RowView> {
    let needle = filter.to_lowercase();
    let mut rows: Vec<RowView> = records
        .iter()
        .map(|record| RowView {
            id: id(record),
            cells: columns.iter().map(|c| (c.accessor)(record)).collect(),
        })
        .filter(|row| {
            needle.is_empty()
                || row
                    .cells
                    .iter()
                    .any(|cell| cell.to_lowercase().contains(&needle))
        })
        .collect();

    if let Some((index, direction)) = sort {
        rows.sort_by(|a, b| {
            let left = a.cells.get(index).map(|c| c.to_lowercase());
            let right = b.cells.get(index).map(|c| c.to_lowercase());
            match direction {
                SortDirection::Ascending => left.cmp(&right),
                SortDirection::Descending => right.cmp(&left),
            }
        });
    }
    rows
}

pub struct RecordsTable {
    active_tab: usize,
    cursor: usize,
    /// Sort setting per tab, kept across tab switches
    sort: [Option<(usize, SortDirection)>; 3],
    selected_ids: HashSet<String>,
    filter: String,
    filter_mode: bool,
    // Rebuilt view cache
    rows: Vec<RowView>,
    headers: Vec<(&'static str, bool)>,
    counts: [usize; 3],
}

impl RecordsTable {
    pub fn new() -> Self {
        Self {
            active_tab: 0,
            cursor: 0,
            sort: [None; 3],
            selected_ids: HashSet::new(),
            filter: String::new(),
            filter_mode: false,
            rows: Vec::new(),
            headers: Vec::new(),
            counts: [0; 3],
        }
    }

    pub fn active_kind(&self) -> EntityKind {
        EntityKind::all()[self.active_tab]
    }

    pub fn is_filtering(&self) -> bool {
        self.filter_mode
    }

    /// Rebuild the row cache from the domain records
    pub fn rebuild(&mut self, domain: &DomainState) {
        let sort = self.sort[self.active_tab];
        let (headers, rows) = match self.active_kind() {
            EntityKind::Subjects => {
                let columns = subject_columns();
                (
                    columns.iter().map(|c| (c.header, c.sortable)).collect(),
                    build_rows(&domain.subjects, &columns, |s| s.id.clone(), &self.filter, sort),
                )
            }
            EntityKind::Courses => {
                let columns = course_columns();
                (
                    columns.iter().map(|c| (c.header, c.sortable)).collect(),
                    build_rows(&domain.courses, &columns, |c| c.id.clone(), &self.filter, sort),
                )
            }
            EntityKind::Students => {
                let columns = student_columns();
                (
                    columns.iter().map(|c| (c.header, c.sortable)).collect(),
                    build_rows(&domain.students, &columns, |s| s.id.clone(), &self.filter, sort),
                )
            }
        };
        self.headers = headers;
        self.rows = rows;
        self.counts = [
            domain.count_for(EntityKind::Subjects),
            domain.count_for(EntityKind::Courses),
            domain.count_for(EntityKind::Students),
        ];
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
    }

    /// Identifier of the highlighted row, if any
    pub fn current_row_id(&self) -> Option<String> {
        self.rows.get(self.cursor).map(|row| row.id.clone())
    }

    /// Label shown in the delete confirmation for the highlighted row
    pub fn current_row_label(&self) -> Option<String> {
        self.rows
            .get(self.cursor)
            .and_then(|row| row.cells.first().cloned())
    }

    /// Rows a delete acts on: the marked set, or the highlighted row
    pub fn delete_targets(&self) -> Vec<String> {
        if self.selected_ids.is_empty() {
            self.current_row_id().into_iter().collect()
        } else {
            self.selected_ids.iter().cloned().collect()
        }
    }

    /// Rows a confirmed delete acts on: the marked set, or the record the
    /// confirmation named (not whatever the cursor points at now)
    pub fn confirmed_targets(&self, confirmed: String) -> Vec<String> {
        if self.selected_ids.is_empty() {
            vec![confirmed]
        } else {
            self.selected_ids.iter().cloned().collect()
        }
    }

    pub fn selected_count(&self) -> usize {
        self.selected_ids.len()
    }

    fn switch_tab(&mut self, step: isize) {
        let tabs = EntityKind::all().len() as isize;
        self.active_tab = (self.active_tab as isize + step).rem_euclid(tabs) as usize;
        self.cursor = 0;
        self.selected_ids.clear();
        self.filter.clear();
        self.filter_mode = false;
    }

    fn toggle_sort(&mut self, column: usize) {
        let Some(&(_, sortable)) = self.headers.get(column) else {
            return;
        };
        if !sortable {
            return;
        }
        let slot = &mut self.sort[self.active_tab];
        *slot = match *slot {
            Some((current, direction)) if current == column => Some((column, direction.toggled())),
            _ => Some((column, SortDirection::Ascending)),
        };
    }

    fn column_constraints(&self) -> Vec<Constraint> {
        let mut constraints = vec![Constraint::Length(3)];
        let last = self.headers.len().saturating_sub(1);
        for (index, (header, _)) in self.headers.iter().enumerate() {
            if index == last {
                constraints.push(Constraint::Min(10));
                continue;
            }
            let widest = self
                .rows
                .iter()
                .filter_map(|row| row.cells.get(index))
                .map(|cell| cell.width() as u16)
                .max()
                .unwrap_or(0)
                .max(header.width() as u16 + 2);
            constraints.push(Constraint::Length(widest.min(MAX_COLUMN_WIDTH)));
        }
        constraints
    }

    fn header_row(&self) -> Row<'static> {
        let mut cells = vec![Cell::from("")];
        let sort = self.sort[self.active_tab];
        for (index, (header, sortable)) in self.headers.iter().enumerate() {
            let indicator = match sort {
                Some((column, SortDirection::Ascending)) if column == index => " ▲",
                Some((column, SortDirection::Descending)) if column == index => " ▼",
                _ if *sortable => " ⇅",
                _ => "",
            };
            cells.push(Cell::from(format!("{header}{indicator}")).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        Row::new(cells)
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = EntityKind::all()
            .iter()
            .zip(self.counts)
            .map(|(kind, count)| Line::from(format!("{} ({count})", kind.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.active_tab)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(tabs, area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let mut parts = vec![format!(
            "{} of {} {}",
            self.rows.len(),
            self.counts[self.active_tab],
            self.active_kind().title().to_lowercase()
        )];
        if !self.selected_ids.is_empty() {
            parts.push(format!("{} marked", self.selected_ids.len()));
        }
        if self.filter_mode {
            parts.push(format!("filter: {}█", self.filter));
        } else if !self.filter.is_empty() {
            parts.push(format!("filter: {}", self.filter));
        }
        let status = Paragraph::new(parts.join("  •  "))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(status, area);
    }

    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let hint = if self.filter_mode {
            "Type to filter  •  Enter keep  •  Esc clear".to_string()
        } else {
            "a add  e edit  d delete  space mark  / filter  1-4 sort  r refresh  ? help  q quit"
                .to_string()
        };
        let help = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

impl Default for RecordsTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for RecordsTable {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.filter_mode {
            let action = match key.code {
                KeyCode::Esc => {
                    self.filter.clear();
                    Some(Action::ExitFilterMode)
                }
                KeyCode::Enter => Some(Action::ExitFilterMode),
                KeyCode::Backspace => Some(Action::FilterBackspace),
                KeyCode::Char(c) => Some(Action::FilterInput(c)),
                _ => None,
            };
            return Ok(action);
        }

        let action = match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Action::ForceQuit),
            (KeyCode::Char('a'), KeyModifiers::CONTROL) => Some(Action::SelectAllRows),
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(Action::NextRow),
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(Action::PrevRow),
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Some(Action::FirstRow),
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => Some(Action::LastRow),
            (KeyCode::Char('h'), _) | (KeyCode::Left, _) | (KeyCode::BackTab, _) => {
                Some(Action::PrevTab)
            }
            (KeyCode::Char('l'), _) | (KeyCode::Right, _) | (KeyCode::Tab, _) => {
                Some(Action::NextTab)
            }
            (KeyCode::Char('a'), _) => Some(Action::OpenCreateDialog),
            (KeyCode::Char('e'), _) => Some(Action::OpenEditDialog),
            (KeyCode::Char('d'), _) => Some(Action::OpenDeleteConfirm),
            (KeyCode::Enter, _) | (KeyCode::Char('m'), _) => Some(Action::OpenRowActions),
            (KeyCode::Char(' '), _) => Some(Action::ToggleRowSelection),
            (KeyCode::Char('/'), _) => Some(Action::EnterFilterMode),
            (KeyCode::Char('r'), _) => Some(Action::RefreshRecords),
            (KeyCode::Char('?'), _) => Some(Action::OpenHelp),
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => {
                if key.code == KeyCode::Esc && !self.selected_ids.is_empty() {
                    Some(Action::ClearSelection)
                } else {
                    Some(Action::OpenQuitDialog)
                }
            }
            (KeyCode::Char(c @ '1'..='4'), _) => {
                Some(Action::SortColumn(c as usize - '1' as usize))
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextRow => {
                self.cursor = (self.cursor + 1).min(self.rows.len().saturating_sub(1));
            }
            Action::PrevRow => self.cursor = self.cursor.saturating_sub(1),
            Action::FirstRow => self.cursor = 0,
            Action::LastRow => self.cursor = self.rows.len().saturating_sub(1),
            Action::NextTab => self.switch_tab(1),
            Action::PrevTab => self.switch_tab(-1),
            Action::SortColumn(column) => self.toggle_sort(column),
            Action::ToggleRowSelection => {
                if let Some(id) = self.current_row_id() {
                    if !self.selected_ids.remove(&id) {
                        self.selected_ids.insert(id);
                    }
                }
            }
            Action::SelectAllRows => {
                self.selected_ids = self.rows.iter().map(|row| row.id.clone()).collect();
            }
            Action::ClearSelection => self.selected_ids.clear(),
            Action::EnterFilterMode => self.filter_mode = true,
            Action::ExitFilterMode => self.filter_mode = false,
            Action::FilterInput(c) => {
                self.filter.push(c);
                self.cursor = 0;
            }
            Action::FilterBackspace => {
                self.filter.pop();
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = calculate_main_layout(area);
        self.draw_tabs(frame, layout.tabs);

        let rows: Vec<Row> = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let mark = if self.selected_ids.contains(&row.id) {
                    "[x]"
                } else {
                    "   "
                };
                let mut cells = vec![Cell::from(mark)];
                cells.extend(row.cells.iter().map(|cell| Cell::from(cell.clone())));
                let style = if index == self.cursor {
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Row::new(cells).style(style)
            })
            .collect();

        let table = Table::new(rows, self.column_constraints())
            .header(self.header_row())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.active_kind().title())),
            );
        frame.render_widget(table, layout.table);

        self.draw_status(frame, layout.status);
        self.draw_help_bar(frame, layout.help);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Subject;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn domain() -> DomainState {
        let mut domain = DomainState::new();
        for (id, name, description) in [
            ("s1", "Maths", "Numbers"),
            ("s2", "History", "The past"),
            ("s3", "Art", "Paint"),
        ] {
            domain.subjects.push(Subject {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
            });
        }
        domain
    }

    fn ids(rows: &[RowView]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_build_rows_filters_any_cell() {
        let domain = domain();
        let columns = subject_columns();
        let rows = build_rows(&domain.subjects, &columns, |s| s.id.clone(), "past", None);
        assert_eq!(ids(&rows), vec!["s2"]);
    }

    #[test]
    fn test_build_rows_sorts_case_insensitively() {
        let domain = domain();
        let columns = subject_columns();
        let rows = build_rows(
            &domain.subjects,
            &columns,
            |s| s.id.clone(),
            "",
            Some((0, SortDirection::Ascending)),
        );
        assert_eq!(ids(&rows), vec!["s3", "s2", "s1"]);
    }

    #[test]
    fn test_sort_toggles_on_repeat() {
        let mut table = RecordsTable::new();
        table.rebuild(&domain());

        table.update(Action::SortColumn(0)).unwrap();
        assert_eq!(table.sort[0], Some((0, SortDirection::Ascending)));
        table.update(Action::SortColumn(0)).unwrap();
        assert_eq!(table.sort[0], Some((0, SortDirection::Descending)));
    }

    #[test]
    fn test_unsortable_column_is_ignored() {
        let mut table = RecordsTable::new();
        table.rebuild(&domain());

        table.update(Action::SortColumn(1)).unwrap();
        assert_eq!(table.sort[0], None);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut table = RecordsTable::new();
        table.rebuild(&domain());

        for _ in 0..10 {
            table.update(Action::NextRow).unwrap();
        }
        assert_eq!(table.current_row_id(), Some("s3".to_string()));
        table.update(Action::PrevRow).unwrap();
        assert_eq!(table.current_row_id(), Some("s2".to_string()));
    }

    #[test]
    fn test_tab_switch_clears_view_state() {
        let mut table = RecordsTable::new();
        table.rebuild(&domain());
        table.update(Action::ToggleRowSelection).unwrap();
        table.update(Action::FilterInput('x')).unwrap();

        table.update(Action::NextTab).unwrap();
        assert_eq!(table.active_kind(), EntityKind::Courses);
        assert_eq!(table.selected_count(), 0);
        assert!(table.filter.is_empty());
    }

    #[test]
    fn test_delete_targets_prefer_marked_rows() {
        let mut table = RecordsTable::new();
        table.rebuild(&domain());

        assert_eq!(table.delete_targets(), vec!["s1".to_string()]);

        table.update(Action::ToggleRowSelection).unwrap();
        table.update(Action::NextRow).unwrap();
        table.update(Action::ToggleRowSelection).unwrap();
        let mut targets = table.delete_targets();
        targets.sort();
        assert_eq!(targets, vec!["s1".to_string(), "s2".to_string()]);
    }

    #[test]
    fn test_confirmed_targets_ignore_later_cursor_moves() {
        let mut table = RecordsTable::new();
        table.rebuild(&domain());

        // Confirmation named s1; cursor moves on before the confirm lands
        table.update(Action::NextRow).unwrap();
        assert_eq!(
            table.confirmed_targets("s1".to_string()),
            vec!["s1".to_string()]
        );

        table.update(Action::ToggleRowSelection).unwrap();
        assert_eq!(
            table.confirmed_targets("s1".to_string()),
            vec!["s2".to_string()]
        );
    }

    #[test]
    fn test_filter_mode_captures_typing() {
        let mut table = RecordsTable::new();
        table.rebuild(&domain());

        assert_eq!(
            table.handle_key_event(key(KeyCode::Char('/'))).unwrap(),
            Some(Action::EnterFilterMode)
        );
        table.update(Action::EnterFilterMode).unwrap();
        assert_eq!(
            table.handle_key_event(key(KeyCode::Char('a'))).unwrap(),
            Some(Action::FilterInput('a'))
        );
        assert_eq!(
            table.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::ExitFilterMode)
        );
    }

    #[test]
    fn test_normal_mode_key_bindings() {
        let mut table = RecordsTable::new();
        table.rebuild(&domain());

        assert_eq!(
            table.handle_key_event(key(KeyCode::Char('j'))).unwrap(),
            Some(Action::NextRow)
        );
        assert_eq!(
            table.handle_key_event(key(KeyCode::Char('a'))).unwrap(),
            Some(Action::OpenCreateDialog)
        );
        assert_eq!(
            table.handle_key_event(key(KeyCode::Char('q'))).unwrap(),
            Some(Action::OpenQuitDialog)
        );
        assert_eq!(
            table.handle_key_event(key(KeyCode::Char('2'))).unwrap(),
            Some(Action::SortColumn(1))
        );
    }
}
