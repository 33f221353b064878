mod action;
mod app;
mod component;
mod components;
mod config;
mod model;
mod services;
mod tui;

use action::Action;
use anyhow::Result;
use app::App;
use crossterm::event::Event;
use tui::Tui;

fn main() -> Result<()> {
    let mut app = App::new()?;
    let mut tui = Tui::new()?;
    tui.enter()?;

    let result = run(&mut app, &mut tui);

    tui.exit()?;
    result
}

fn run(app: &mut App, tui: &mut Tui) -> Result<()> {
    loop {
        let mut draw_result = Ok(());
        tui.draw(|frame| draw_result = app.draw(frame))?;
        draw_result?;

        let action = match tui.next_event()? {
            Some(Event::Key(key)) => app.handle_key_event(key)?,
            Some(Event::Resize(width, height)) => Some(Action::Resize(width, height)),
            // Tick on timeout so polls and toast expiry keep running
            _ => Some(Action::Tick),
        };

        // Actions can chain, e.g. a confirmed delete triggers a refresh
        let mut next = action;
        while let Some(action) = next {
            next = app.update(action)?;
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
