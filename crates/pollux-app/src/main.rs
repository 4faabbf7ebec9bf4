//! Pollux entry point.
//!
//! Wires the config file, certificate store, TLS client, and session
//! together, then runs the blocking frame loop: render, paint, wait for
//! one key, repeat.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};

use pollux_browser::{Config, Session};
use pollux_net::{GeminiClient, TrustStore};
use pollux_types::Address;

mod input;
mod paint;
mod term;

use input::{InputEvent, InputState};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load_default().context("loading pollux.toml")?;
    let start = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.start_page.clone());
    let start = Address::parse(&start).with_context(|| format!("bad start address: {start}"))?;

    let store = TrustStore::open(&config.certs_dir).with_context(|| {
        format!(
            "opening certificate store {}",
            config.certs_dir.display()
        )
    })?;
    let client = GeminiClient::new(store)
        .context("building TLS client")?
        .with_timeouts(
            Duration::from_secs(config.connect_timeout_secs),
            Duration::from_secs(config.read_timeout_secs),
        );

    log::info!("starting at {start}");
    let mut session = Session::new(client, &config);
    session.navigate(start);

    run(&mut session)
}

/// The frame loop. The terminal guard restores cooked mode on every
/// exit path, including errors propagating out of the loop body.
fn run(session: &mut Session<GeminiClient>) -> Result<()> {
    let _guard = term::TermGuard::enter().context("entering raw mode")?;
    let mut keys = InputState::default();
    let mut stdout = io::stdout();

    while session.is_running() {
        let viewport = term::size()?;
        let doc = session.view(viewport);
        let address = session.address().to_string();
        paint::draw(
            &mut stdout,
            &doc,
            viewport,
            &address,
            session.note(),
            keys.buffer(),
        )?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match keys.handle_key(key) {
                InputEvent::Command(line) => session.handle_command(&line),
                // Typing takes over the bottom row from any pending note.
                InputEvent::Redraw => session.clear_note(),
                InputEvent::None => {},
            },
            // A resize repaints on the next loop turn with fresh geometry.
            _ => {},
        }
    }
    Ok(())
}
