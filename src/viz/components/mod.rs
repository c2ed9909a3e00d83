mod grid;
mod log;

use crossterm::event::{Event, KeyCode, KeyEventKind};
pub use self::grid::GridView;
pub use self::log::Logs;
use ratatui::widgets::WidgetRef;

/// A widget that can consume terminal events
pub trait Component: WidgetRef {
    /// Returns `true` if the event was consumed
    fn handle_ui_event(&mut self, event: &Event) -> bool;
}

/// Key code of a press event; releases and non-key events yield `None`
pub fn event_keycode(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key.code),
        _ => None,
    }
}
