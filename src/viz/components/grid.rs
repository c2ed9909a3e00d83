use std::collections::HashSet;

use crossterm::event::{Event, KeyCode};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, WidgetRef},
};

use crate::{
    driver::Frame,
    grid::{Cell, Grid, Tile},
};

use super::{event_keycode, Component};

/// Top-down map of the grid with the agent and the cells it has visited
pub struct GridView {
    grid: Grid,
    agent: Option<Cell>,
    trail: HashSet<Cell>,
    show_trail: bool,
}

impl GridView {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            agent: None,
            trail: HashSet::new(),
            show_trail: true,
        }
    }

    pub fn update(&mut self, frame: Frame) {
        if let Some(prev) = self.agent.replace(frame.cell) {
            self.trail.insert(prev);
        }
    }

    fn glyph(&self, cell: Cell) -> (&'static str, Style) {
        if self.agent == Some(cell) {
            return ("W ", Style::default().light_yellow().bold());
        }
        match self.grid.tile(cell) {
            Tile::Goal => ("M ", Style::default().light_green().bold()),
            Tile::Obstacle => ("# ", Style::default().dark_gray()),
            Tile::Floor if self.show_trail && self.trail.contains(&cell) => {
                ("o ", Style::default().cyan())
            }
            Tile::Floor => (". ", Style::default().white()),
        }
    }
}

impl WidgetRef for GridView {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(format!("{}x{} grid", self.grid.width(), self.grid.height()));
        let inner = block.inner(area);
        block.render(area, buf);

        // top row is the highest y
        for (row, y) in (0..self.grid.height()).rev().enumerate() {
            let Ok(row) = u16::try_from(row) else { break };
            if row >= inner.height {
                break;
            }
            for x in 0..self.grid.width() {
                let Ok(col) = u16::try_from(x * 2) else { break };
                if col + 1 >= inner.width {
                    break;
                }
                let (symbol, style) = self.glyph(Cell::new(x, y));
                buf.set_string(inner.x + col, inner.y + row, symbol, style);
            }
        }
    }
}

impl Component for GridView {
    fn handle_ui_event(&mut self, event: &Event) -> bool {
        match event_keycode(event) {
            Some(KeyCode::Char('t')) => {
                self.show_trail = !self.show_trail;
                true
            }
            _ => false,
        }
    }
}
