use crate::interactive::ui::commands::Command;
use crate::interactive::ui::events::Message;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Navigation,
    Search,
}

/// Interaction state: mode, query buffer, and cursor over the current
/// filtered result list. `cursor == None` is the pinned-to-bottom state;
/// the view tracks the newest entry until the operator moves away.
///
/// Owns no store and no terminal. The controller syncs `result_len` and
/// `query_valid` after every evaluation, so cursor arithmetic here always
/// works against the freshest result set.
pub struct AppState {
    pub mode: Mode,
    pub cursor: Option<usize>,
    pub query: String,
    pub query_valid: bool,
    pub result_len: usize,
    pub message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Navigation,
            cursor: None,
            query: String::new(),
            query_valid: true,
            result_len: 0,
            message: None,
        }
    }

    /// Called by the controller after each evaluation pass. Clamps the
    /// cursor against the fresh result length; a result set that shrank out
    /// from under the cursor clamps to the last valid index, and an empty
    /// set re-pins to the bottom.
    pub fn sync_results(&mut self, len: usize, valid: bool) {
        self.result_len = len;
        self.query_valid = valid;
        self.cursor = match self.cursor {
            Some(_) if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => None,
        };
    }

    pub fn update(&mut self, msg: Message) -> Command {
        match msg {
            Message::EnterSearch => {
                self.mode = Mode::Search;
                Command::None
            }
            Message::LeaveSearch => {
                self.mode = Mode::Navigation;
                // Reconcile: a cursor stranded beyond the current result
                // set re-pins to the bottom.
                if self.cursor.is_some_and(|i| i >= self.result_len) {
                    self.cursor = None;
                }
                Command::None
            }
            Message::QueryChar(c) => {
                self.query.push(c);
                Command::None
            }
            Message::QueryBackspace => {
                self.query.pop();
                Command::None
            }
            Message::ConfirmQuery => {
                // Filtering is already live per keystroke; Enter confirms
                // in place without changing mode.
                Command::None
            }
            Message::CursorUp => {
                self.cursor = match self.cursor {
                    None if self.result_len == 0 => None,
                    None => Some(self.result_len - 1),
                    Some(i) => Some(i.saturating_sub(1)),
                };
                Command::None
            }
            Message::CursorDown => {
                self.cursor = match self.cursor {
                    // Advancing past the newest entry re-pins the view.
                    Some(i) if i + 1 >= self.result_len => None,
                    Some(i) => Some(i + 1),
                    None => None,
                };
                Command::None
            }
            Message::JumpToTop => {
                self.cursor = if self.result_len == 0 { None } else { Some(0) };
                Command::None
            }
            Message::JumpToBottom => {
                self.cursor = None;
                Command::None
            }
            Message::ExportRequested => Command::ExportFiltered,
            Message::SetStatus(msg) => {
                self.message = Some(msg);
                Command::None
            }
            Message::ClearStatus => {
                self.message = None;
                Command::None
            }
            Message::Quit => Command::Quit,
        }
    }
}
