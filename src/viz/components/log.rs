use crossterm::event::{Event, KeyCode};
use log::LevelFilter;
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, WidgetRef},
};
use tui_logger::{TuiLoggerWidget, TuiWidgetEvent, TuiWidgetState};

use super::{event_keycode, Component};

/// Scrolling replay log with an adjustable verbosity floor
pub struct Logs {
    level: LevelFilter,
    state: TuiWidgetState,
}

impl Logs {
    pub fn new() -> Self {
        Self::with_level(LevelFilter::Info)
    }

    fn with_level(level: LevelFilter) -> Self {
        Self {
            level,
            state: TuiWidgetState::new().set_default_display_level(level),
        }
    }

    fn set_level(&mut self, level: LevelFilter) {
        if level != self.level {
            *self = Self::with_level(level);
        }
    }
}

fn more_verbose(level: LevelFilter) -> LevelFilter {
    match level {
        LevelFilter::Off => LevelFilter::Error,
        LevelFilter::Error => LevelFilter::Warn,
        LevelFilter::Warn => LevelFilter::Info,
        LevelFilter::Info => LevelFilter::Debug,
        LevelFilter::Debug | LevelFilter::Trace => LevelFilter::Trace,
    }
}

fn less_verbose(level: LevelFilter) -> LevelFilter {
    match level {
        LevelFilter::Trace => LevelFilter::Debug,
        LevelFilter::Debug => LevelFilter::Info,
        LevelFilter::Info => LevelFilter::Warn,
        LevelFilter::Warn => LevelFilter::Error,
        LevelFilter::Error | LevelFilter::Off => LevelFilter::Off,
    }
}

impl WidgetRef for Logs {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        TuiLoggerWidget::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(format!("Log (up to {}, +/- to change)", self.level)),
            )
            .style_error(Style::default().light_red())
            .style_warn(Style::default().light_yellow())
            .style_info(Style::default().cyan())
            .style_debug(Style::default().dark_gray())
            .output_separator(' ')
            .state(&self.state)
            .render(area, buf);
    }
}

impl Component for Logs {
    fn handle_ui_event(&mut self, event: &Event) -> bool {
        match event_keycode(event) {
            Some(KeyCode::Char('+' | '=')) => self.set_level(more_verbose(self.level)),
            Some(KeyCode::Char('-')) => self.set_level(less_verbose(self.level)),
            Some(KeyCode::PageUp) => self.state.transition(TuiWidgetEvent::PrevPageKey),
            Some(KeyCode::PageDown) => self.state.transition(TuiWidgetEvent::NextPageKey),
            Some(KeyCode::Esc) => self.state.transition(TuiWidgetEvent::EscapeKey),
            _ => return false,
        }
        true
    }
}
