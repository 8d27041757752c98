use crate::interactive::ui::app_state::{AppState, Mode};
use crate::store::LogEntry;

/// Everything the renderer needs for one redraw: the visible lines in
/// insertion order, which one to highlight, a composed status line, and a
/// scroll target. Built fresh on every pass and handed to the renderer
/// unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderModel {
    pub lines: Vec<String>,
    pub highlight: Option<usize>,
    pub status: String,
    pub scroll_to: usize,
}

impl RenderModel {
    pub fn build(state: &AppState, entries: &[&LogEntry]) -> Self {
        let len = entries.len();
        let lines: Vec<String> = entries.iter().map(|e| e.text.clone()).collect();

        // Pinned-to-bottom resolves to the newest entry.
        let highlight = if len == 0 {
            None
        } else {
            Some(state.cursor.unwrap_or(len - 1))
        };

        let place = format!("{}/{}", state.cursor.unwrap_or(len), len);
        let mut status = match state.mode {
            Mode::Search => {
                let marker = if state.query_valid { '/' } else { '!' };
                format!("{place} {marker}{}█", state.query)
            }
            Mode::Navigation => {
                if state.query.is_empty() {
                    place
                } else {
                    format!("{place} /{}", state.query)
                }
            }
        };
        if let Some(message) = &state.message {
            status.push_str("  ");
            status.push_str(message);
        }

        RenderModel {
            lines,
            highlight,
            status,
            scroll_to: state.cursor.unwrap_or(len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(texts: &[&str]) -> Vec<LogEntry> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| LogEntry {
                id: i as u64 + 1,
                timestamp: 0,
                text: (*t).to_string(),
            })
            .collect()
    }

    fn refs(owned: &[LogEntry]) -> Vec<&LogEntry> {
        owned.iter().collect()
    }

    #[test]
    fn test_pinned_highlight_resolves_to_newest() {
        let owned = entries(&["a", "b", "c"]);
        let state = AppState::new();
        let model = RenderModel::build(&state, &refs(&owned));
        assert_eq!(model.highlight, Some(2));
        assert_eq!(model.scroll_to, 3);
        assert_eq!(model.status, "3/3");
    }

    #[test]
    fn test_explicit_cursor_highlight() {
        let owned = entries(&["a", "b", "c"]);
        let mut state = AppState::new();
        state.sync_results(3, true);
        state.cursor = Some(1);
        let model = RenderModel::build(&state, &refs(&owned));
        assert_eq!(model.highlight, Some(1));
        assert_eq!(model.scroll_to, 1);
        assert_eq!(model.status, "1/3");
    }

    #[test]
    fn test_empty_corpus_has_no_highlight() {
        let state = AppState::new();
        let model = RenderModel::build(&state, &[]);
        assert_eq!(model.highlight, None);
        assert!(model.lines.is_empty());
        assert_eq!(model.status, "0/0");
    }

    #[test]
    fn test_search_mode_status_shows_query_and_cursor_block() {
        let owned = entries(&["apple pie", "apple tart"]);
        let mut state = AppState::new();
        state.mode = Mode::Search;
        state.query = "apple".to_string();
        state.sync_results(2, true);
        let model = RenderModel::build(&state, &refs(&owned));
        assert_eq!(model.status, "2/2 /apple█");
    }

    #[test]
    fn test_invalid_query_status_marker() {
        let owned = entries(&["apple pie", "apple tart"]);
        let mut state = AppState::new();
        state.mode = Mode::Search;
        state.query = "[".to_string();
        state.sync_results(2, false);
        let model = RenderModel::build(&state, &refs(&owned));
        assert_eq!(model.status, "2/2 ![█");
    }

    #[test]
    fn test_navigation_status_keeps_active_query() {
        let owned = entries(&["apple pie"]);
        let mut state = AppState::new();
        state.query = "apple".to_string();
        state.sync_results(1, true);
        let model = RenderModel::build(&state, &refs(&owned));
        assert_eq!(model.status, "1/1 /apple");
    }

    #[test]
    fn test_transient_message_is_appended() {
        let mut state = AppState::new();
        state.message = Some("✓ Copied 3 lines".to_string());
        let model = RenderModel::build(&state, &[]);
        assert_eq!(model.status, "0/0  ✓ Copied 3 lines");
    }
}
