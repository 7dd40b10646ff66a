mod action;
mod app;
mod arbiter;
mod buffer;
mod catalog;
mod config;
mod error;
mod event;
mod paging;
mod tmdb;
mod tui;
mod types;
mod ui;

use std::panic;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::event::Event;
use crate::tmdb::Tmdb;

#[derive(Parser, Debug)]
#[command(name = "reel", about = "Browse movies and TV shows on TMDB from the terminal")]
struct Cli {
    /// Jump straight to the search tab with this query.
    query: Option<String>,

    /// TMDB language code, e.g. en-US.
    #[arg(long)]
    language: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Restore the terminal on panic before the default hook prints.
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let config = Config::load();
    let auth = config.resolve_auth()?;
    let language = config.language(cli.language);
    let catalog: Arc<dyn Catalog> = Arc::new(Tmdb::new(auth, language)?);

    let result = run(catalog, cli.query).await;

    tui::restore()?;

    result
}

async fn run(
    catalog: Arc<dyn Catalog>,
    initial_query: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let mut app = App::new(catalog, action_tx.clone());
    if let Some(query) = initial_query {
        app.prepare_initial_query(query);
        action_tx.send(Action::SubmitSearch)?;
    } else {
        action_tx.send(app.handle_event(Event::Init))?;
    }

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = tui::EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
