use std::{
    io::{self, stdout, Stdout},
    ops::{Deref, DerefMut},
    panic,
};

use crossterm as ct;
use ct::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;

type Backend = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Alternate-screen terminal that restores the shell when dropped
pub struct Terminal(Backend);

impl Terminal {
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();
        ct::execute!(stdout(), EnterAlternateScreen)?;
        enable_raw_mode()?;
        Ok(Self(Backend::new(CrosstermBackend::new(stdout()))?))
    }
}

impl Deref for Terminal {
    type Target = Backend;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Terminal {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = restore();
    }
}

fn restore() -> io::Result<()> {
    ct::execute!(stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()
}

/// Leave the alternate screen before a panic message is printed
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}
