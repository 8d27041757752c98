use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::interactive::ui::render_model::RenderModel;

/// Thin seam over ratatui: takes a finished `RenderModel` and draws it.
/// Keeps scroll state between frames so the list follows the highlight.
pub struct Renderer {
    list_state: ListState,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            list_state: ListState::default(),
        }
    }

    pub fn render(&mut self, f: &mut Frame, model: &RenderModel) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Log lines
                Constraint::Length(1), // Status line
            ])
            .split(f.area());

        let items: Vec<ListItem> = model
            .lines
            .iter()
            .map(|line| ListItem::new(line.as_str()))
            .collect();
        let list =
            List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        // Stateful rendering scrolls to keep the selection visible, which
        // also keeps a pinned view glued to the newest entry.
        self.list_state.select(model.highlight);
        f.render_stateful_widget(list, chunks[0], &mut self.list_state);

        f.render_widget(Paragraph::new(model.status.as_str()), chunks[1]);
    }
}
