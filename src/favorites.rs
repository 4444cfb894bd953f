//! Favorites: a persisted, insertion-ordered set of video ids.
//!
//! Persistence sits behind a small storage trait so the set logic is
//! testable without touching disk. The disk backend writes a JSON array to
//! the platform data directory. All persistence is best-effort: a corrupt
//! or missing file yields an empty set, and save failures are logged and
//! swallowed, never surfaced as errors.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::constants::constants;

/// Where favorites are loaded from and saved to.
pub trait FavoritesStorage {
  fn load(&self) -> Result<Vec<String>>;
  fn save(&self, ids: &[String]) -> Result<()>;
}

/// JSON-array-on-disk backend under the platform data directory.
pub struct DiskStorage {
  path: Option<PathBuf>,
}

impl DiskStorage {
  pub fn new() -> Self {
    let path = ProjectDirs::from("", "", "reel").map(|dirs| dirs.data_dir().join(&constants().favorites_file));
    DiskStorage { path }
  }
}

impl FavoritesStorage for DiskStorage {
  fn load(&self) -> Result<Vec<String>> {
    let Some(ref path) = self.path else { return Ok(Vec::new()) };
    if !path.exists() {
      return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not a valid favorites file", path.display()))
  }

  fn save(&self, ids: &[String]) -> Result<()> {
    let Some(ref path) = self.path else { return Ok(()) };
    if let Some(dir) = path.parent() {
      std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = serde_json::to_string(ids)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
  }
}

/// The in-memory favorites set. Insertion order is preserved (export and
/// the favorites view follow it); membership is unique.
pub struct Favorites {
  ids: Vec<String>,
  storage: Box<dyn FavoritesStorage>,
}

impl Favorites {
  /// Load the persisted set once at startup. Unreadable or corrupt data is
  /// a warning, not a failure: the session starts with an empty set.
  pub fn load(storage: Box<dyn FavoritesStorage>) -> Self {
    let ids = match storage.load() {
      Ok(mut ids) => {
        // Defend the uniqueness invariant against hand-edited files
        let mut seen = std::collections::HashSet::new();
        ids.retain(|id| seen.insert(id.clone()));
        info!(count = ids.len(), "loaded favorites");
        ids
      }
      Err(e) => {
        warn!(err = %e, "failed to load favorites, starting empty");
        Vec::new()
      }
    };
    Favorites { ids, storage }
  }

  pub fn contains(&self, id: &str) -> bool {
    self.ids.iter().any(|i| i == id)
  }

  pub fn len(&self) -> usize {
    self.ids.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ids.is_empty()
  }

  /// Flip membership of `id` and persist. Returns the new membership.
  pub fn toggle(&mut self, id: &str) -> bool {
    let now_favorited = match self.ids.iter().position(|i| i == id) {
      Some(idx) => {
        self.ids.remove(idx);
        false
      }
      None => {
        self.ids.push(id.to_string());
        true
      }
    };
    self.persist();
    now_favorited
  }

  /// Import a comma-separated id list. Tokens are trimmed, empties dropped,
  /// and only ids accepted by `exists` are added — dead references never
  /// enter the set. Returns the count of tokens that passed the existence
  /// check, which includes ids already present.
  pub fn import(&mut self, csv: &str, exists: impl Fn(&str) -> bool) -> usize {
    let mut imported = 0;
    for token in csv.split(',').map(str::trim).filter(|t| !t.is_empty()) {
      if exists(token) {
        if !self.contains(token) {
          self.ids.push(token.to_string());
        }
        imported += 1;
      }
    }
    if imported > 0 {
      self.persist();
    }
    imported
  }

  /// The set as a comma-and-space-joined string, in insertion order.
  pub fn export(&self) -> String {
    self.ids.join(", ")
  }

  /// Write the set through the storage backend. Best-effort.
  fn persist(&self) {
    if let Err(e) = self.storage.save(&self.ids) {
      warn!(err = %e, "failed to save favorites");
    }
  }
}

#[cfg(test)]
pub struct MemoryStorage {
  pub initial: Result<Vec<String>>,
  pub fail_saves: bool,
  pub saved: std::cell::RefCell<Vec<Vec<String>>>,
}

#[cfg(test)]
impl Default for MemoryStorage {
  fn default() -> Self {
    MemoryStorage { initial: Ok(Vec::new()), fail_saves: false, saved: std::cell::RefCell::new(Vec::new()) }
  }
}

#[cfg(test)]
impl FavoritesStorage for MemoryStorage {
  fn load(&self) -> Result<Vec<String>> {
    match &self.initial {
      Ok(ids) => Ok(ids.clone()),
      Err(e) => Err(anyhow::anyhow!("{}", e)),
    }
  }

  fn save(&self, ids: &[String]) -> Result<()> {
    if self.fail_saves {
      return Err(anyhow::anyhow!("disk full"));
    }
    self.saved.borrow_mut().push(ids.to_vec());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn seeded(ids: &[&str]) -> Favorites {
    let storage =
      MemoryStorage { initial: Ok(ids.iter().map(|s| s.to_string()).collect()), ..MemoryStorage::default() };
    Favorites::load(Box::new(storage))
  }

  #[test]
  fn toggle_twice_round_trips() {
    let mut favorites = seeded(&["v1"]);
    assert!(favorites.toggle("v2"));
    assert!(favorites.contains("v2"));
    assert!(!favorites.toggle("v2"));
    assert!(!favorites.contains("v2"));
    assert_eq!(favorites.export(), "v1");
  }

  #[test]
  fn toggle_persists_each_mutation() {
    let storage = Box::new(MemoryStorage::default());
    let mut favorites = Favorites::load(storage);
    favorites.toggle("a");
    favorites.toggle("b");
    favorites.toggle("a");
    assert_eq!(favorites.export(), "b");
  }

  #[test]
  fn import_counts_only_existing_ids() {
    let mut favorites = seeded(&[]);
    let known = ["id1"];
    let added = favorites.import("id1, id2, bogus", |id| known.contains(&id));
    assert_eq!(added, 1);
    assert_eq!(favorites.export(), "id1");
  }

  #[test]
  fn import_trims_tokens_and_drops_empties() {
    let mut favorites = seeded(&[]);
    let added = favorites.import("  a ,, b ,   ", |_| true);
    assert_eq!(added, 2);
    assert_eq!(favorites.export(), "a, b");
  }

  #[test]
  fn import_counts_already_present_ids() {
    // Reference behavior: the count reflects tokens that exist in the
    // catalog, not net-new additions.
    let mut favorites = seeded(&["a"]);
    let added = favorites.import("a, b", |_| true);
    assert_eq!(added, 2);
    assert_eq!(favorites.export(), "a, b");
  }

  #[test]
  fn export_joins_with_comma_space_in_insertion_order() {
    let mut favorites = seeded(&[]);
    favorites.toggle("v2");
    favorites.toggle("v1");
    assert_eq!(favorites.export(), "v2, v1");
  }

  #[test]
  fn corrupt_load_starts_empty() {
    let storage = MemoryStorage { initial: Err(anyhow::anyhow!("bad json")), ..MemoryStorage::default() };
    let favorites = Favorites::load(Box::new(storage));
    assert!(favorites.is_empty());
  }

  #[test]
  fn save_failure_keeps_in_memory_set() {
    let storage = MemoryStorage { fail_saves: true, ..MemoryStorage::default() };
    let mut favorites = Favorites::load(Box::new(storage));
    assert!(favorites.toggle("v1"));
    assert!(favorites.contains("v1"));
  }

  #[test]
  fn duplicate_ids_in_storage_are_deduplicated() {
    let favorites = seeded(&["a", "b", "a"]);
    assert_eq!(favorites.export(), "a, b");
  }
}
