use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, Sender, TryRecvError},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crossterm::event::{self, KeyCode};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Gauge, Padding, Tabs, WidgetRef},
};

use crate::{agent::Status, driver::Frame, grid::Grid};

use self::components::{event_keycode, Component, GridView, Logs};

mod components;
mod tui;

const TABS: [&str; 2] = ["Grid", "Logs"];

/// Start the terminal view on its own thread
///
/// Installs a `tui_logger` backend so everything the replay logs lands in the Logs tab.
/// Send each [`Frame`] from the driver's observer through the returned channel. Pressing `q`
/// sets `stop` and closes the view.
pub fn init(
    grid: Grid,
    max_steps: u32,
    stop: Arc<AtomicBool>,
) -> (JoinHandle<io::Result<()>>, Sender<Frame>) {
    if tui_logger::init_logger(log::LevelFilter::Trace).is_ok() {
        tui_logger::set_default_level(log::LevelFilter::Trace);
    }

    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || App::new(grid, max_steps).run(rx, &stop));
    (handle, tx)
}

enum Mode {
    Replay,
    Quit,
}

/// Root component: tabs, the active view and a step gauge
struct App {
    mode: Mode,
    selected_tab: usize,
    max_steps: u32,
    last: Option<Frame>,
    grid: GridView,
    logs: Logs,
}

impl App {
    fn new(grid: Grid, max_steps: u32) -> Self {
        Self {
            mode: Mode::Replay,
            selected_tab: 0,
            max_steps,
            last: None,
            grid: GridView::new(grid),
            logs: Logs::new(),
        }
    }

    fn run(&mut self, rx: Receiver<Frame>, stop: &AtomicBool) -> io::Result<()> {
        let mut terminal = tui::Terminal::enter()?;

        while let Mode::Replay = self.mode {
            loop {
                match rx.try_recv() {
                    Ok(frame) => {
                        self.grid.update(frame);
                        self.last = Some(frame);
                    }
                    // a finished replay stays on screen until the user quits
                    Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
                }
            }

            terminal.draw(|frame| frame.render_widget(&*self, frame.size()))?;

            if event::poll(Duration::from_millis(16))? {
                let event = event::read()?;
                let handled = match self.selected_tab {
                    0 => self.grid.handle_ui_event(&event),
                    _ => self.logs.handle_ui_event(&event),
                };
                if handled {
                    continue;
                }
                match event_keycode(&event) {
                    Some(KeyCode::Tab) => {
                        self.selected_tab = (self.selected_tab + 1) % TABS.len();
                    }
                    Some(KeyCode::Char('q')) => {
                        stop.store(true, Ordering::Release);
                        self.mode = Mode::Quit;
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn status_line(&self) -> String {
        match self.last {
            None => String::from("Waiting for first step"),
            Some(Frame { status, cell, .. }) => match status {
                Status::Running => format!("Running at {cell}"),
                Status::ReachedGoal => format!("Reached goal {cell}"),
                Status::HaltedUnknownState => format!("Halted on unknown state {cell}"),
                Status::StepBudgetExhausted => format!("Step budget exhausted at {cell}"),
            },
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [menu_area, main_area, progress_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        Tabs::new(TABS)
            .block(Block::default().padding(Padding::uniform(1)))
            .white()
            .bold()
            .highlight_style(Style::default().light_green())
            .select(self.selected_tab)
            .render(menu_area, buf);

        match self.selected_tab {
            0 => self.grid.render_ref(main_area, buf),
            _ => self.logs.render_ref(main_area, buf),
        }

        let step = self.last.map_or(0, |f| f.step);
        let ratio = if self.max_steps == 0 {
            1.0
        } else {
            (step as f64 / self.max_steps as f64).min(1.0)
        };
        Gauge::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(self.status_line()),
            )
            .gauge_style(Color::Cyan)
            .label(format!("{step} / {}", self.max_steps))
            .ratio(ratio)
            .render(progress_area, buf);
    }
}
