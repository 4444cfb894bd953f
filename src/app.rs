use ratatui::widgets::ListState;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::catalog::{Catalog, FlatVideo, Structure};
use crate::config::Config;
use crate::constants::constants;
use crate::favorites::Favorites;
use crate::filter::{CategorySelection, DurationBucket, Selection, grouped_selection, visible_indices};
use crate::tabs::{self, Chip, NavNode, Tab, TabKind};
use crate::theme::THEMES;

// --- Navigation state ---

/// Navigation state, one arm per catalog shape.
pub enum NavState {
  Tabs {
    tabs: Vec<Tab>,
    selected: usize,
    /// Chips of the selected group tab; empty otherwise.
    chips: Vec<Chip>,
    selected_chip: Option<String>,
  },
  Tree {
    nodes: Vec<NavNode>,
    /// Cursor over the visible row projection.
    cursor: usize,
    /// The active path filter; empty means no category filtering.
    selected_path: Vec<String>,
    favorites_only: bool,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  Browse,
  /// Typing a comma-separated id list into the import box.
  Import,
}

/// Which pane j/k moves in tree navigation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Nav,
  List,
}

pub struct App {
  pub catalog: Catalog,
  pub nav: NavState,
  pub duration: DurationBucket,
  pub favorites: Favorites,
  /// Indices into `catalog.videos` matching the current selection.
  pub visible: Vec<usize>,
  pub list_state: ListState,
  pub mode: AppMode,
  pub focus: Focus,
  pub import_input: String,
  pub import_cursor: usize,
  pub import_scroll: usize,
  /// Informational message — shown with an info icon, lower priority than errors.
  pub info_message: Option<String>,
  pub last_error: Option<String>,
  pub theme_index: usize,
  pub should_quit: bool,
  /// When the last error was set — used for auto-dismiss.
  error_time: Option<Instant>,
}

impl App {
  pub fn new(catalog: Catalog, favorites: Favorites, config: &Config) -> Self {
    let theme_index =
      if let Some(ref name) = config.theme_name { THEMES.iter().position(|t| t.name == name).unwrap_or(0) } else { 0 };

    let nav = match &catalog.structure {
      Structure::Grouped { categories, groups } => {
        let tabs = tabs::build_tabs(categories, groups);
        let selected = tabs::default_tab_index(&tabs, favorites.is_empty());
        let chips = tabs.get(selected).map(|t| chips_for(&catalog.structure, t)).unwrap_or_default();
        NavState::Tabs { tabs, selected, chips, selected_chip: None }
      }
      Structure::Nested { roots } => {
        NavState::Tree { nodes: tabs::build_tree(roots), cursor: 0, selected_path: Vec::new(), favorites_only: false }
      }
    };

    let focus = if matches!(nav, NavState::Tree { .. }) { Focus::Nav } else { Focus::List };
    let mut app = Self {
      catalog,
      nav,
      duration: DurationBucket::All,
      favorites,
      visible: Vec::new(),
      list_state: ListState::default(),
      mode: AppMode::Browse,
      focus,
      import_input: String::new(),
      import_cursor: 0,
      import_scroll: 0,
      info_message: None,
      last_error: None,
      theme_index,
      should_quit: false,
      error_time: None,
    };
    app.refresh();
    if !app.visible.is_empty() {
      app.list_state.select(Some(0));
    }
    app
  }

  pub fn theme(&self) -> &'static crate::theme::Theme {
    // Safety: theme_index is clamped on initialization and bounded by modular arithmetic in next_theme().
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.save_config();
  }

  fn save_config(&self) {
    let config = Config { theme_name: Some(self.theme().name.to_string()), ..Config::load() };
    config.save();
  }

  // --- Messages ---

  /// Set an error message with auto-dismiss tracking.
  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  /// Clear stale error messages after the dismiss interval.
  pub fn expire_error(&mut self) {
    if let Some(t) = self.error_time
      && t.elapsed() >= Duration::from_secs(constants().error_dismiss_secs)
    {
      self.last_error = None;
      self.error_time = None;
    }
  }

  // --- Selection ---

  /// The explicit selection record the filter evaluator consumes.
  pub fn selection(&self) -> Selection {
    match &self.nav {
      NavState::Tabs { tabs, selected, selected_chip, .. } => {
        let tab_id = tabs.get(*selected).map(|t| t.id.as_str());
        Selection {
          category: grouped_selection(tabs, tab_id, selected_chip.as_deref()),
          duration: self.duration,
          favorites_only: false,
        }
      }
      NavState::Tree { selected_path, favorites_only, .. } => {
        let category = if selected_path.is_empty() {
          CategorySelection::None
        } else {
          CategorySelection::Path(selected_path.clone())
        };
        Selection { category, duration: self.duration, favorites_only: *favorites_only }
      }
    }
  }

  /// Recompute the visible subset from the full flat sequence and clamp the
  /// list selection into the new range.
  pub fn refresh(&mut self) {
    let selection = self.selection();
    self.visible = visible_indices(&self.catalog.videos, &selection, &self.favorites);
    if self.visible.is_empty() {
      self.list_state.select(None);
    } else {
      let sel = self.list_state.selected().unwrap_or(0);
      if sel >= self.visible.len() {
        self.list_state.select(Some(self.visible.len() - 1));
      } else if self.list_state.selected().is_none() {
        self.list_state.select(Some(0));
      }
    }
  }

  /// The video under the list cursor.
  pub fn selected_video(&self) -> Option<&FlatVideo> {
    let sel = self.list_state.selected()?;
    let &idx = self.visible.get(sel)?;
    self.catalog.videos.get(idx)
  }

  /// Reset selection state to defaults: default tab, no chip, no path, all
  /// durations. Expansion state and favorites are untouched.
  pub fn reset_selection(&mut self) {
    self.duration = DurationBucket::All;
    match &mut self.nav {
      NavState::Tabs { tabs, selected, chips, selected_chip } => {
        *selected = tabs::default_tab_index(tabs, self.favorites.is_empty());
        *selected_chip = None;
        *chips = tabs.get(*selected).map(|t| chips_for(&self.catalog.structure, t)).unwrap_or_default();
      }
      NavState::Tree { selected_path, favorites_only, .. } => {
        selected_path.clear();
        *favorites_only = false;
      }
    }
    self.list_state.select(None);
    self.refresh();
    debug!("selection reset to defaults");
  }

  // --- Tab / chip navigation (grouped) ---

  fn select_tab_index(&mut self, idx: usize) {
    if let NavState::Tabs { tabs, selected, chips, selected_chip } = &mut self.nav {
      if idx >= tabs.len() {
        return;
      }
      *selected = idx;
      *selected_chip = None;
      *chips = chips_for(&self.catalog.structure, &tabs[idx]);
      self.list_state.select(None);
      self.refresh();
    }
  }

  pub fn next_tab(&mut self) {
    if let NavState::Tabs { tabs, selected, .. } = &self.nav {
      let idx = (*selected + 1) % tabs.len();
      self.select_tab_index(idx);
    }
  }

  pub fn prev_tab(&mut self) {
    if let NavState::Tabs { tabs, selected, .. } = &self.nav {
      let idx = if *selected == 0 { tabs.len() - 1 } else { *selected - 1 };
      self.select_tab_index(idx);
    }
  }

  /// Cycle the chip selection through the current tab's chips, ending back
  /// at "no chip".
  pub fn cycle_chip(&mut self) {
    if let NavState::Tabs { chips, selected_chip, .. } = &mut self.nav {
      if chips.is_empty() {
        return;
      }
      let next = match selected_chip.as_deref() {
        None => Some(chips[0].id.clone()),
        Some(current) => {
          let pos = chips.iter().position(|c| c.id == current);
          match pos {
            Some(i) if i + 1 < chips.len() => Some(chips[i + 1].id.clone()),
            _ => None,
          }
        }
      };
      *selected_chip = next;
      self.refresh();
    }
  }

  /// Whether the favorites tab is the active one.
  pub fn on_favorites_tab(&self) -> bool {
    match &self.nav {
      NavState::Tabs { tabs, selected, .. } => tabs.get(*selected).is_some_and(|t| t.kind == TabKind::Favorites),
      NavState::Tree { .. } => false,
    }
  }

  // --- Tree navigation (nested) ---

  pub fn tree_move(&mut self, delta: i64) {
    if let NavState::Tree { nodes, cursor, .. } = &mut self.nav {
      let rows = tabs::visible_rows(nodes);
      if rows.is_empty() {
        return;
      }
      let count = rows.len() as i64;
      *cursor = ((*cursor as i64 + delta).rem_euclid(count)) as usize;
    }
  }

  /// Enter on a tree row: select its path as the category filter and flip
  /// its expansion.
  pub fn tree_activate(&mut self) {
    if let NavState::Tree { nodes, cursor, selected_path, .. } = &mut self.nav {
      let rows = tabs::visible_rows(nodes);
      let Some(row) = rows.get(*cursor) else { return };
      *selected_path = row.path.clone();
      if row.has_children {
        tabs::toggle_expanded(nodes, &row.path);
      }
      self.refresh();
    }
  }

  pub fn toggle_favorites_only(&mut self) {
    if let NavState::Tree { favorites_only, .. } = &mut self.nav {
      *favorites_only = !*favorites_only;
      self.refresh();
    }
  }

  // --- List navigation ---

  pub fn list_move(&mut self, delta: i64) {
    let count = self.visible.len() as i64;
    if count == 0 {
      return;
    }
    let current = self.list_state.selected().unwrap_or(0) as i64;
    let next = (current + delta).rem_euclid(count) as usize;
    self.list_state.select(Some(next));
  }

  pub fn cycle_duration(&mut self) {
    self.duration = self.duration.next();
    self.refresh();
  }

  // --- Favorites ---

  /// Heart the video under the cursor. On the favorites tab, unhearting
  /// removes the row from view immediately.
  pub fn toggle_selected_favorite(&mut self) {
    let Some(video) = self.selected_video() else { return };
    let id = video.id.clone();
    let title = video.title.clone();
    let now_favorited = self.favorites.toggle(&id);
    info!(id = %id, favorited = now_favorited, "favorite toggled");
    self.info_message =
      Some(if now_favorited { format!("♥ {}", title) } else { format!("Removed {} from favorites", title) });
    self.refresh();
  }

  pub fn begin_import(&mut self) {
    self.mode = AppMode::Import;
    self.import_input.clear();
    self.import_cursor = 0;
    self.import_scroll = 0;
    self.clear_error();
    self.info_message = None;
  }

  pub fn cancel_import(&mut self) {
    self.mode = AppMode::Browse;
    self.import_input.clear();
    self.import_cursor = 0;
    self.import_scroll = 0;
  }

  /// Run the import against the typed id list. Only ids present in the
  /// catalog are added; the summary message reports the count.
  pub fn submit_import(&mut self) {
    let csv = self.import_input.trim().to_string();
    self.cancel_import();
    if csv.is_empty() {
      return;
    }
    let known: HashSet<&str> = self.catalog.videos.iter().map(|v| v.id.as_str()).collect();
    let imported = self.favorites.import(&csv, |id| known.contains(id));
    info!(imported, "favorites import finished");
    self.info_message = if imported > 0 {
      Some(format!("Imported {} video{}", imported, if imported == 1 { "" } else { "s" }))
    } else {
      Some("No matching videos found".to_string())
    };
    self.refresh();
  }

  /// Surface the exported id list as a message the user can copy.
  pub fn export_favorites(&mut self) {
    if self.favorites.is_empty() {
      self.info_message = Some("No favorites to export".to_string());
      return;
    }
    let ids = self.favorites.export();
    info!(count = self.favorites.len(), "favorites exported");
    self.info_message = Some(format!("Favorites: {}", ids));
  }
}

/// Chips for a tab: member categories of a group, nothing otherwise.
fn chips_for(structure: &Structure, tab: &Tab) -> Vec<Chip> {
  match (structure, tab.kind) {
    (Structure::Grouped { categories, .. }, TabKind::Group) => tabs::chips_for_tab(categories, &tab.id),
    _ => Vec::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::{CatalogDoc, build_catalog};
  use crate::favorites::MemoryStorage;
  use serde_json::json;

  fn grouped_catalog() -> Catalog {
    let doc: CatalogDoc = serde_json::from_value(json!({
      "meta": { "parent_groups": { "strength": "Strength" } },
      "categories": [
        { "id": "arms", "name": "Arms", "parent": "strength",
          "videos": [
            { "id": "v1", "title": "Curls", "link": "https://x/v1", "duration": 12 },
            { "id": "v2", "title": "Rows", "link": "https://x/v2", "duration": 30 }
          ] },
        { "id": "yoga", "name": "Yoga",
          "videos": [ { "id": "v3", "title": "Flow", "link": "https://x/v3", "duration": 45 } ] }
      ]
    }))
    .unwrap();
    build_catalog(doc)
  }

  fn nested_catalog() -> Catalog {
    let doc: CatalogDoc = serde_json::from_value(json!([
      { "name": "Cardio",
        "videos": [ { "id": "c1", "title": "Run", "link": "https://x/c1", "duration": 40 } ],
        "subcategories": [
          { "name": "HIIT", "videos": [ { "id": "c2", "title": "Sprints", "link": "https://x/c2", "duration": 18 } ] }
        ] }
    ]))
    .unwrap();
    build_catalog(doc)
  }

  fn favorites_with(ids: &[&str]) -> Favorites {
    let storage =
      MemoryStorage { initial: Ok(ids.iter().map(|s| s.to_string()).collect()), ..MemoryStorage::default() };
    Favorites::load(Box::new(storage))
  }

  fn app_with_favorites(ids: &[&str]) -> App {
    App::new(grouped_catalog(), favorites_with(ids), &Config::default())
  }

  #[test]
  fn empty_favorites_defaults_past_the_favorites_tab() {
    let app = app_with_favorites(&[]);
    match &app.nav {
      NavState::Tabs { tabs, selected, .. } => {
        assert_eq!(*selected, 1);
        assert_eq!(tabs[*selected].id, "strength");
      }
      NavState::Tree { .. } => panic!("expected tabs"),
    }
  }

  #[test]
  fn non_empty_favorites_defaults_to_the_favorites_tab() {
    let app = app_with_favorites(&["v3"]);
    assert!(app.on_favorites_tab());
    // Only the favorited video is visible
    assert_eq!(app.visible.len(), 1);
    assert_eq!(app.selected_video().unwrap().id, "v3");
  }

  #[test]
  fn tab_cycling_resets_chip_and_refreshes() {
    let mut app = app_with_favorites(&[]);
    app.cycle_chip();
    if let NavState::Tabs { selected_chip, .. } = &app.nav {
      assert_eq!(selected_chip.as_deref(), Some("arms"));
    }
    app.next_tab();
    if let NavState::Tabs { tabs, selected, selected_chip, .. } = &app.nav {
      assert_eq!(tabs[*selected].id, "yoga");
      assert_eq!(*selected_chip, None);
    }
    assert_eq!(app.visible.len(), 1);
  }

  #[test]
  fn chip_cycle_wraps_back_to_none() {
    let mut app = app_with_favorites(&[]);
    app.cycle_chip();
    app.cycle_chip();
    if let NavState::Tabs { selected_chip, .. } = &app.nav {
      // Arms is the only chip under Strength in this fixture
      assert_eq!(*selected_chip, None);
    }
  }

  #[test]
  fn duration_cycle_filters_the_group_tab() {
    let mut app = app_with_favorites(&[]);
    assert_eq!(app.visible.len(), 2); // v1, v2 under Strength
    app.cycle_duration(); // short
    assert_eq!(app.duration, DurationBucket::Short);
    let ids: Vec<&str> = app.visible.iter().map(|&i| app.catalog.videos[i].id.as_str()).collect();
    assert_eq!(ids, vec!["v1"]);
  }

  #[test]
  fn unhearting_on_favorites_tab_removes_the_row() {
    let mut app = app_with_favorites(&["v3"]);
    assert_eq!(app.visible.len(), 1);
    app.toggle_selected_favorite();
    assert!(app.visible.is_empty());
    assert_eq!(app.list_state.selected(), None);
  }

  #[test]
  fn import_reports_count_and_refreshes_favorites_view() {
    let mut app = app_with_favorites(&["v1"]);
    app.begin_import();
    app.import_input = "v3, nope, v1".to_string();
    app.submit_import();
    // v3 and v1 exist in the catalog; nope does not
    assert_eq!(app.info_message.as_deref(), Some("Imported 2 videos"));
    assert!(app.favorites.contains("v3"));
    assert!(!app.favorites.contains("nope"));
    assert_eq!(app.mode, AppMode::Browse);
  }

  #[test]
  fn import_with_no_matches_says_so() {
    let mut app = app_with_favorites(&[]);
    app.begin_import();
    app.import_input = "ghost".to_string();
    app.submit_import();
    assert_eq!(app.info_message.as_deref(), Some("No matching videos found"));
  }

  #[test]
  fn export_surfaces_the_id_list() {
    let mut app = app_with_favorites(&["v1", "v3"]);
    app.export_favorites();
    assert_eq!(app.info_message.as_deref(), Some("Favorites: v1, v3"));
  }

  #[test]
  fn reset_restores_defaults() {
    let mut app = app_with_favorites(&[]);
    app.cycle_duration();
    app.cycle_chip();
    app.next_tab();
    app.reset_selection();
    assert_eq!(app.duration, DurationBucket::All);
    if let NavState::Tabs { selected, selected_chip, .. } = &app.nav {
      assert_eq!(*selected, 1); // favorites still empty
      assert_eq!(*selected_chip, None);
    }
  }

  #[test]
  fn tree_activation_filters_by_path() {
    let mut app = App::new(nested_catalog(), favorites_with(&[]), &Config::default());
    assert_eq!(app.visible.len(), 2); // no filtering by default
    app.tree_activate(); // selects ["Cardio"], expands it
    assert_eq!(app.visible.len(), 2); // ancestor includes descendants
    app.tree_move(1); // onto HIIT
    app.tree_activate();
    let ids: Vec<&str> = app.visible.iter().map(|&i| app.catalog.videos[i].id.as_str()).collect();
    assert_eq!(ids, vec!["c2"]);
  }

  #[test]
  fn favorites_only_narrows_tree_view() {
    let mut app = App::new(nested_catalog(), favorites_with(&["c1"]), &Config::default());
    app.toggle_favorites_only();
    let ids: Vec<&str> = app.visible.iter().map(|&i| app.catalog.videos[i].id.as_str()).collect();
    assert_eq!(ids, vec!["c1"]);
    app.toggle_favorites_only();
    assert_eq!(app.visible.len(), 2);
  }
}
