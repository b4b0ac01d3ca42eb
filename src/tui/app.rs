use crate::analytics::{summarize, Summary};
use crate::leads::{
    change_status, filter_and_sort_indices, load_leads, save_leads, update_notes, Lead,
    LeadQuery, PriorityFilter, Status, StatusFilter,
};
use crate::tui::theme::ThemeColors;
use chrono::Utc;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Instant;

const MAX_UNDO: usize = 50;

/// How long a flash message stays in the status bar
const FLASH_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Leads,
    Analytics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Notes,
    StatusPicker,
    Details,
    ScoreBreakdown,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UndoAction {
    StatusChanged {
        id: String,
        name: String,
        previous: Status,
    },
    NotesChanged {
        id: String,
        name: String,
        previous: String,
    },
}

impl UndoAction {
    fn lead_id(&self) -> &str {
        match self {
            UndoAction::StatusChanged { id, .. } | UndoAction::NotesChanged { id, .. } => id,
        }
    }
}

pub struct App {
    pub leads: Vec<Lead>,
    pub leads_path: PathBuf,
    pub query: LeadQuery,
    /// Positions in `leads` for the current query, highest score first
    pub visible: Vec<usize>,
    pub summary: Summary,
    pub table_state: ratatui::widgets::TableState,
    pub current_view: View,
    pub input_mode: InputMode,
    pub notes_input: String,
    pub status_cursor: usize,
    pub flash_message: Option<(String, Instant)>,
    pub undo_stack: VecDeque<UndoAction>,
    pub should_quit: bool,
    pub theme: ThemeColors,
}

impl App {
    pub fn new(leads: Vec<Lead>, leads_path: PathBuf, query: LeadQuery, theme: ThemeColors) -> Self {
        let mut app = Self {
            leads,
            leads_path,
            query,
            visible: Vec::new(),
            summary: Summary::default(),
            table_state: ratatui::widgets::TableState::default(),
            current_view: View::Leads,
            input_mode: InputMode::Normal,
            notes_input: String::new(),
            status_cursor: 0,
            flash_message: None,
            undo_stack: VecDeque::new(),
            should_quit: false,
            theme,
        };
        app.refresh_view();
        app
    }

    /// Recompute the filtered list and statistics, keeping the selection on
    /// the same lead when it is still visible.
    pub fn refresh_view(&mut self) {
        let selected_id = self.selected_lead().map(|lead| lead.id.clone());

        self.visible = filter_and_sort_indices(&self.leads, &self.query);
        self.summary = summarize(&self.leads);

        let followed = selected_id.and_then(|id| {
            self.visible
                .iter()
                .position(|&pos| self.leads[pos].id == id)
        });

        // A lead that left the view hands its row to the next one down
        let new_selection = match followed {
            Some(i) => Some(i),
            None if self.visible.is_empty() => None,
            None => Some(
                self.table_state
                    .selected()
                    .unwrap_or(0)
                    .min(self.visible.len() - 1),
            ),
        };
        self.table_state.select(new_selection);
    }

    pub fn visible_leads(&self) -> impl Iterator<Item = &Lead> {
        self.visible.iter().map(|&pos| &self.leads[pos])
    }

    pub fn selected_lead(&self) -> Option<&Lead> {
        self.table_state
            .selected()
            .and_then(|i| self.visible.get(i))
            .and_then(|&pos| self.leads.get(pos))
    }

    pub fn next_row(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < self.visible.len() => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => self.visible.len() - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    fn push_undo(&mut self, action: UndoAction) {
        self.undo_stack.push_front(action);
        if self.undo_stack.len() > MAX_UNDO {
            self.undo_stack.pop_back();
        }
    }

    /// Write the whole collection back to disk
    fn persist(&mut self) -> bool {
        match save_leads(&self.leads_path, &self.leads) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to save leads: {:#}", e);
                self.show_flash(format!("Failed to save leads: {}", e));
                false
            }
        }
    }

    /// Put back a lead whose change could not be saved
    fn restore_lead(&mut self, snapshot: Lead) {
        if let Some(lead) = self.leads.iter_mut().find(|lead| lead.id == snapshot.id) {
            *lead = snapshot;
        }
        self.refresh_view();
    }

    // Search

    pub fn start_search(&mut self) {
        if self.current_view == View::Leads {
            self.input_mode = InputMode::Search;
        }
    }

    pub fn push_search_char(&mut self, c: char) {
        self.query.search.push(c);
        self.refresh_view();
    }

    pub fn pop_search_char(&mut self) {
        self.query.search.pop();
        self.refresh_view();
    }

    /// Leave search input, keeping the search text
    pub fn finish_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Leave search input and clear the search text
    pub fn cancel_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.query.search.clear();
        self.refresh_view();
    }

    // Filters

    pub fn cycle_status_filter(&mut self) {
        self.query.status = self.query.status.cycle();
        self.refresh_view();
    }

    pub fn cycle_priority_filter(&mut self) {
        self.query.priority = self.query.priority.cycle();
        self.refresh_view();
    }

    pub fn clear_filters(&mut self) {
        self.query = LeadQuery {
            search: String::new(),
            status: StatusFilter::All,
            priority: PriorityFilter::All,
        };
        self.refresh_view();
        self.show_flash("Filters cleared".to_string());
    }

    // Status changes

    pub fn start_status_picker(&mut self) {
        let Some(lead) = self.selected_lead() else {
            return;
        };
        self.status_cursor = Status::ALL
            .iter()
            .position(|s| *s == lead.status)
            .unwrap_or(0);
        self.input_mode = InputMode::StatusPicker;
    }

    pub fn status_picker_next(&mut self) {
        self.status_cursor = (self.status_cursor + 1) % Status::ALL.len();
    }

    pub fn status_picker_previous(&mut self) {
        self.status_cursor = self
            .status_cursor
            .checked_sub(1)
            .unwrap_or(Status::ALL.len() - 1);
    }

    pub fn confirm_status_picker(&mut self) {
        let status = Status::ALL[self.status_cursor % Status::ALL.len()].clone();
        self.input_mode = InputMode::Normal;
        self.set_selected_status(status);
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.notes_input.clear();
    }

    /// Move the selected lead to `status` and save
    pub fn set_selected_status(&mut self, status: Status) {
        let Some(snapshot) = self.selected_lead().cloned() else {
            return;
        };
        let (id, name, previous) = (
            snapshot.id.clone(),
            snapshot.name.clone(),
            snapshot.status.clone(),
        );

        if previous == status {
            return;
        }

        if let Err(e) = change_status(&mut self.leads, &id, status.clone(), Utc::now()) {
            self.show_flash(format!("Error: {}", e));
            return;
        }

        if !self.persist() {
            self.restore_lead(snapshot);
            return;
        }

        self.push_undo(UndoAction::StatusChanged {
            id,
            name: name.clone(),
            previous,
        });
        self.refresh_view();
        self.show_flash(format!("Status: {} -> {} (z to undo)", name, status));
    }

    // Notes

    pub fn start_notes_input(&mut self) {
        let Some(lead) = self.selected_lead() else {
            return;
        };
        self.notes_input = lead.notes.clone();
        self.input_mode = InputMode::Notes;
    }

    pub fn confirm_notes_input(&mut self) {
        let notes = std::mem::take(&mut self.notes_input);
        self.input_mode = InputMode::Normal;

        let Some(snapshot) = self.selected_lead().cloned() else {
            return;
        };
        let (id, name, previous) = (
            snapshot.id.clone(),
            snapshot.name.clone(),
            snapshot.notes.clone(),
        );

        if previous == notes {
            return;
        }

        if let Err(e) = update_notes(&mut self.leads, &id, notes, Utc::now()) {
            self.show_flash(format!("Error: {}", e));
            return;
        }

        if !self.persist() {
            self.restore_lead(snapshot);
            return;
        }

        self.push_undo(UndoAction::NotesChanged {
            id,
            name: name.clone(),
            previous,
        });
        self.refresh_view();
        self.show_flash(format!("Notes saved: {} (z to undo)", name));
    }

    /// Undo the last status or notes change
    pub fn undo_last(&mut self) {
        let action = match self.undo_stack.pop_front() {
            Some(action) => action,
            None => {
                self.show_flash("Nothing to undo".to_string());
                return;
            }
        };

        let snapshot = self
            .leads
            .iter()
            .find(|lead| lead.id == action.lead_id())
            .cloned();

        let now = Utc::now();
        let (result, name) = match action.clone() {
            UndoAction::StatusChanged { id, name, previous } => {
                (change_status(&mut self.leads, &id, previous, now).map(|_| ()), name)
            }
            UndoAction::NotesChanged { id, name, previous } => {
                (update_notes(&mut self.leads, &id, previous, now).map(|_| ()), name)
            }
        };

        if let Err(e) = result {
            self.show_flash(format!("Error: {}", e));
            return;
        }

        if !self.persist() {
            // Keep the action so the undo can be retried
            if let Some(snapshot) = snapshot {
                self.restore_lead(snapshot);
            }
            self.undo_stack.push_front(action);
            return;
        }

        self.refresh_view();
        self.show_flash(format!("Undid change: {}", name));
    }

    /// Replace the in-memory collection with what is on disk
    pub fn reload_from_disk(&mut self) {
        self.leads = load_leads(&self.leads_path);
        self.undo_stack.clear();
        self.refresh_view();
        self.show_flash(format!("Reloaded {} leads", self.leads.len()));
    }

    // Views and overlays

    pub fn toggle_view(&mut self) {
        self.current_view = match self.current_view {
            View::Leads => View::Analytics,
            View::Analytics => View::Leads,
        };
    }

    pub fn show_details(&mut self) {
        if self.current_view == View::Leads && self.selected_lead().is_some() {
            self.input_mode = InputMode::Details;
        }
    }

    pub fn show_score_breakdown(&mut self) {
        if self.current_view == View::Leads && self.selected_lead().is_some() {
            self.input_mode = InputMode::ScoreBreakdown;
        }
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_overlay(&mut self) {
        self.input_mode = InputMode::Normal;
    }
}
