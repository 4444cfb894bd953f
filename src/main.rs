mod app;
mod catalog;
mod config;
mod constants;
mod favorites;
mod filter;
mod input;
mod logging;
mod tabs;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::time::Duration;
use tracing::info;

use app::App;
use config::Config;
use constants::constants;
use favorites::{DiskStorage, Favorites};

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Catalog document: an http(s) URL or a local file path.
  /// Falls back to the prefs default, then to data.json.
  data: Option<String>,

  /// Theme to start with, overriding the saved preference.
  #[arg(long)]
  theme: Option<String>,
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  // The app runs without logs if no data directory is available
  let _ = logging::init();

  let mut config = Config::load();
  if let Some(theme) = args.theme {
    config.theme_name = Some(theme);
  }
  let source =
    args.data.or_else(|| config.data_source.clone()).unwrap_or_else(|| constants().default_data_source.clone());
  info!(source = %source, "loading catalog");

  // One blocking fetch; a failure aborts startup with a single reported error.
  let client = reqwest::Client::new();
  let catalog = catalog::load_catalog(&client, &source).await.context("Failed to load the catalog")?;
  let favorites = Favorites::load(Box::new(DiskStorage::new()));
  let app = App::new(catalog, favorites, &config);

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, app).await;
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
  loop {
    app.expire_error();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(Duration::from_millis(constants().poll_interval_ms))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }
  Ok(())
}
