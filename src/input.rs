use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::{App, AppMode, Focus, NavState};

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

/// Open a link in the default browser, detached from the TUI.
fn open_in_browser(app: &mut App, url: &str) {
  #[cfg(target_os = "macos")]
  let cmd = "open";
  #[cfg(not(target_os = "macos"))]
  let cmd = "xdg-open";
  match std::process::Command::new(cmd)
    .arg(url)
    .stdin(std::process::Stdio::null())
    .stdout(std::process::Stdio::null())
    .stderr(std::process::Stdio::null())
    .spawn()
  {
    Ok(mut child) => {
      // Reap the child in a background thread to avoid zombie processes.
      std::thread::spawn(move || {
        let _ = child.wait();
      });
    }
    Err(e) => {
      app.set_error(format!("Failed to open browser: {}", e));
    }
  }
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: event::KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return;
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
    app.next_theme();
    return;
  }

  match app.mode {
    AppMode::Browse => handle_browse_key(app, key),
    AppMode::Import => handle_import_key(app, key),
  }
}

fn handle_browse_key(app: &mut App, key: event::KeyEvent) {
  app.clear_error();
  match key.code {
    KeyCode::Char('q') => {
      app.should_quit = true;
    }
    KeyCode::Esc => {
      app.should_quit = true;
    }
    KeyCode::Enter => match app.focus {
      Focus::Nav => app.tree_activate(),
      Focus::List => {
        if let Some(video) = app.selected_video() {
          let link = video.link.clone();
          open_in_browser(app, &link);
        }
      }
    },
    KeyCode::Down | KeyCode::Char('j') => match app.focus {
      Focus::Nav => app.tree_move(1),
      Focus::List => app.list_move(1),
    },
    KeyCode::Up | KeyCode::Char('k') => match app.focus {
      Focus::Nav => app.tree_move(-1),
      Focus::List => app.list_move(-1),
    },
    KeyCode::Right | KeyCode::Char('l') => {
      app.next_tab();
    }
    KeyCode::Left | KeyCode::Char('h') => {
      app.prev_tab();
    }
    KeyCode::Tab => {
      // Focus switching only matters when there is a tree pane
      if matches!(app.nav, NavState::Tree { .. }) {
        app.focus = if app.focus == Focus::Nav { Focus::List } else { Focus::Nav };
      } else {
        app.next_tab();
      }
    }
    KeyCode::BackTab => {
      app.prev_tab();
    }
    KeyCode::Char('c') => {
      app.cycle_chip();
    }
    KeyCode::Char('d') => {
      app.cycle_duration();
    }
    KeyCode::Char('f') | KeyCode::Char(' ') => {
      app.toggle_selected_favorite();
    }
    KeyCode::Char('F') => {
      app.toggle_favorites_only();
    }
    KeyCode::Char('i') => {
      app.begin_import();
    }
    KeyCode::Char('e') => {
      app.export_favorites();
    }
    KeyCode::Char('r') => {
      app.reset_selection();
    }
    _ => {}
  }
}

fn handle_import_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.submit_import();
    }
    KeyCode::Esc => {
      app.cancel_import();
    }
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(&app.import_input, app.import_cursor);
      app.import_input.insert(byte_idx, c);
      app.import_cursor += 1;
    }
    KeyCode::Backspace => {
      if app.import_cursor > 0 {
        app.import_cursor -= 1;
        let byte_idx = char_to_byte_index(&app.import_input, app.import_cursor);
        app.import_input.remove(byte_idx);
      }
    }
    KeyCode::Delete => {
      if app.import_cursor < app.import_input.chars().count() {
        let byte_idx = char_to_byte_index(&app.import_input, app.import_cursor);
        app.import_input.remove(byte_idx);
      }
    }
    KeyCode::Left => {
      app.import_cursor = app.import_cursor.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.import_cursor < app.import_input.chars().count() {
        app.import_cursor += 1;
      }
    }
    KeyCode::Home => {
      app.import_cursor = 0;
    }
    KeyCode::End => {
      app.import_cursor = app.import_input.chars().count();
    }
    _ => {}
  }
}
