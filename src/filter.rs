//! Filter evaluation over the flat video sequence.
//!
//! The visible subset is always recomputed from the complete flat list —
//! selection changes are rare and the catalog is small, so there is nothing
//! to memoize. Output is a list of indices into the flat sequence, in source
//! order, which the list widget consumes directly.

use crate::catalog::FlatVideo;
use crate::constants::constants;
use crate::favorites::Favorites;
use crate::tabs::{Tab, TabKind};

// --- Duration buckets ---

/// Mutually exclusive runtime classifications, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationBucket {
  #[default]
  All,
  Short,
  Medium,
  Long,
}

impl DurationBucket {
  pub const ALL: [DurationBucket; 4] =
    [DurationBucket::All, DurationBucket::Short, DurationBucket::Medium, DurationBucket::Long];

  pub fn label(self) -> &'static str {
    match self {
      DurationBucket::All => "all",
      DurationBucket::Short => "short",
      DurationBucket::Medium => "medium",
      DurationBucket::Long => "long",
    }
  }

  /// The next bucket in cycling order.
  pub fn next(self) -> Self {
    // Safety: position() always finds self in ALL, and the modular step stays in bounds.
    let idx = Self::ALL.iter().position(|b| *b == self).unwrap_or(0);
    Self::ALL[(idx + 1) % Self::ALL.len()]
  }

  /// Whether a video's runtime falls in this bucket. A missing (non-numeric
  /// in the source document) duration fails every bucket except `All`.
  pub fn matches(self, duration: Option<f64>) -> bool {
    if self == DurationBucket::All {
      return true;
    }
    let Some(minutes) = duration else { return false };
    let short_max = constants().short_max_minutes;
    let medium_max = constants().medium_max_minutes;
    match self {
      DurationBucket::All => true,
      DurationBucket::Short => minutes < short_max,
      DurationBucket::Medium => minutes >= short_max && minutes <= medium_max,
      DurationBucket::Long => minutes > medium_max,
    }
  }
}

// --- Category selection ---

/// The category dimension of the current selection.
#[derive(Debug, Clone, PartialEq)]
pub enum CategorySelection {
  /// No category filtering.
  None,
  /// Favorites tab: membership in the favorites set.
  Favorites,
  /// A chip (member category of a group tab), matched by category id.
  Chip(String),
  /// A group tab, matched by parent group id.
  Group(String),
  /// A standalone category tab, matched by category id.
  Category(String),
  /// Nested variant: prefix match on the category path.
  Path(Vec<String>),
}

/// Resolve the (tab, chip) pair of the grouped variant into a category
/// selection, applying the priority order: favorites first (chip ignored),
/// then chip, then the tab itself.
pub fn grouped_selection(tabs: &[Tab], selected_tab: Option<&str>, selected_chip: Option<&str>) -> CategorySelection {
  let Some(tab_id) = selected_tab else { return CategorySelection::None };
  let Some(tab) = tabs.iter().find(|t| t.id == tab_id) else { return CategorySelection::None };
  match tab.kind {
    TabKind::Favorites => CategorySelection::Favorites,
    _ => {
      if let Some(chip) = selected_chip {
        // A selected chip overrides the tab-level predicate
        return CategorySelection::Chip(chip.to_string());
      }
      match tab.kind {
        TabKind::Group => CategorySelection::Group(tab_id.to_string()),
        _ => CategorySelection::Category(tab_id.to_string()),
      }
    }
  }
}

/// The complete selection state: one predicate per dimension, AND-ed.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
  pub category: CategorySelection,
  pub duration: DurationBucket,
  /// Favorites-only toggle for the tree variant, where there is no
  /// synthetic favorites tab to select.
  pub favorites_only: bool,
}

impl Default for Selection {
  fn default() -> Self {
    Selection { category: CategorySelection::None, duration: DurationBucket::All, favorites_only: false }
  }
}

fn category_matches(video: &FlatVideo, selection: &CategorySelection, favorites: &Favorites) -> bool {
  match selection {
    CategorySelection::None => true,
    CategorySelection::Favorites => favorites.contains(&video.id),
    CategorySelection::Chip(id) | CategorySelection::Category(id) => video.category_id.as_deref() == Some(id.as_str()),
    CategorySelection::Group(id) => video.parent_group.as_deref() == Some(id.as_str()),
    CategorySelection::Path(path) => {
      video.category_path.len() >= path.len() && video.category_path.iter().zip(path).all(|(a, b)| a == b)
    }
  }
}

/// Compute the indices of videos matching all active predicates, preserving
/// source document order.
pub fn visible_indices(videos: &[FlatVideo], selection: &Selection, favorites: &Favorites) -> Vec<usize> {
  videos
    .iter()
    .enumerate()
    .filter(|(_, v)| {
      category_matches(v, &selection.category, favorites)
        && selection.duration.matches(v.duration)
        && (!selection.favorites_only || favorites.contains(&v.id))
    })
    .map(|(i, _)| i)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::favorites::{Favorites, MemoryStorage};
  use crate::tabs::FAVORITES_TAB_ID;

  fn video(id: &str, duration: Option<f64>, category_id: &str, group: Option<&str>, path: &[&str]) -> FlatVideo {
    FlatVideo {
      id: id.to_string(),
      title: format!("Video {}", id),
      link: format!("https://x/{}", id),
      duration,
      thumbnail: None,
      category_path: path.iter().map(|s| s.to_string()).collect(),
      display_category: path.last().unwrap().to_string(),
      category_id: Some(category_id.to_string()),
      parent_group: group.map(str::to_string),
    }
  }

  fn fixture() -> Vec<FlatVideo> {
    vec![
      video("v1", Some(12.0), "arms", Some("strength"), &["Strength", "Arms"]),
      video("v2", Some(25.0), "legs", Some("strength"), &["Strength", "Legs"]),
      video("v3", Some(50.0), "yoga", None, &["Yoga"]),
      video("v4", None, "yoga", None, &["Yoga"]),
    ]
  }

  fn no_favorites() -> Favorites {
    Favorites::load(Box::new(MemoryStorage::default()))
  }

  fn sample_tabs() -> Vec<Tab> {
    vec![
      Tab { id: FAVORITES_TAB_ID.to_string(), name: "♥".to_string(), kind: TabKind::Favorites },
      Tab { id: "strength".to_string(), name: "Strength".to_string(), kind: TabKind::Group },
      Tab { id: "yoga".to_string(), name: "Yoga".to_string(), kind: TabKind::Category },
    ]
  }

  #[test]
  fn no_selection_returns_everything_in_order() {
    let videos = fixture();
    let indices = visible_indices(&videos, &Selection::default(), &no_favorites());
    assert_eq!(indices, vec![0, 1, 2, 3]);
  }

  #[test]
  fn duration_boundaries_partition_cleanly() {
    assert!(DurationBucket::Short.matches(Some(19.0)));
    assert!(!DurationBucket::Short.matches(Some(20.0)));
    assert!(DurationBucket::Medium.matches(Some(20.0)));
    assert!(DurationBucket::Medium.matches(Some(35.0)));
    assert!(!DurationBucket::Medium.matches(Some(36.0)));
    assert!(DurationBucket::Long.matches(Some(36.0)));
    assert!(!DurationBucket::Long.matches(Some(35.0)));
  }

  #[test]
  fn each_numeric_duration_lands_in_exactly_one_bucket() {
    for minutes in [0.0, 19.0, 19.9, 20.0, 27.0, 35.0, 35.5, 36.0, 120.0] {
      let hits = [DurationBucket::Short, DurationBucket::Medium, DurationBucket::Long]
        .iter()
        .filter(|b| b.matches(Some(minutes)))
        .count();
      assert_eq!(hits, 1, "duration {} should land in exactly one bucket", minutes);
    }
  }

  #[test]
  fn missing_duration_vanishes_under_specific_buckets() {
    let videos = fixture();
    for bucket in [DurationBucket::Short, DurationBucket::Medium, DurationBucket::Long] {
      let selection = Selection { duration: bucket, ..Default::default() };
      let indices = visible_indices(&videos, &selection, &no_favorites());
      assert!(!indices.contains(&3), "v4 has no duration and must not match {:?}", bucket);
    }
    assert!(DurationBucket::All.matches(None));
  }

  #[test]
  fn group_tab_matches_all_member_categories() {
    let videos = fixture();
    let selection = Selection { category: CategorySelection::Group("strength".to_string()), ..Default::default() };
    assert_eq!(visible_indices(&videos, &selection, &no_favorites()), vec![0, 1]);
  }

  #[test]
  fn chip_overrides_group_tab() {
    let tabs = sample_tabs();
    let selection = grouped_selection(&tabs, Some("strength"), Some("legs"));
    assert_eq!(selection, CategorySelection::Chip("legs".to_string()));

    let videos = fixture();
    let selection = Selection { category: selection, ..Default::default() };
    assert_eq!(visible_indices(&videos, &selection, &no_favorites()), vec![1]);
  }

  #[test]
  fn favorites_tab_ignores_chip_and_intersects_set() {
    let tabs = sample_tabs();
    assert_eq!(grouped_selection(&tabs, Some(FAVORITES_TAB_ID), Some("legs")), CategorySelection::Favorites);

    let videos = fixture();
    let mut favorites = no_favorites();
    favorites.toggle("v3");
    let selection = Selection { category: CategorySelection::Favorites, ..Default::default() };
    assert_eq!(visible_indices(&videos, &selection, &favorites), vec![2]);
  }

  #[test]
  fn standalone_category_tab_matches_by_id() {
    let tabs = sample_tabs();
    assert_eq!(grouped_selection(&tabs, Some("yoga"), None), CategorySelection::Category("yoga".to_string()));
    let videos = fixture();
    let selection = Selection { category: CategorySelection::Category("yoga".to_string()), ..Default::default() };
    assert_eq!(visible_indices(&videos, &selection, &no_favorites()), vec![2, 3]);
  }

  #[test]
  fn no_tab_means_no_category_filtering() {
    let tabs = sample_tabs();
    assert_eq!(grouped_selection(&tabs, None, Some("legs")), CategorySelection::None);
  }

  #[test]
  fn path_prefix_selects_ancestor_and_descendants() {
    let videos = fixture();
    let selection =
      Selection { category: CategorySelection::Path(vec!["Strength".to_string()]), ..Default::default() };
    // Selecting ["Strength"] is the union of ["Strength","Arms"] and ["Strength","Legs"]
    assert_eq!(visible_indices(&videos, &selection, &no_favorites()), vec![0, 1]);

    let selection = Selection {
      category: CategorySelection::Path(vec!["Strength".to_string(), "Arms".to_string()]),
      ..Default::default()
    };
    assert_eq!(visible_indices(&videos, &selection, &no_favorites()), vec![0]);
  }

  #[test]
  fn predicates_combine_with_logical_and() {
    let videos = fixture();
    let selection = Selection {
      category: CategorySelection::Group("strength".to_string()),
      duration: DurationBucket::Medium,
      ..Default::default()
    };
    assert_eq!(visible_indices(&videos, &selection, &no_favorites()), vec![1]);
  }

  #[test]
  fn favorites_only_intersects_with_path_selection() {
    let videos = fixture();
    let mut favorites = no_favorites();
    favorites.toggle("v2");
    let selection = Selection {
      category: CategorySelection::Path(vec!["Strength".to_string()]),
      favorites_only: true,
      ..Default::default()
    };
    assert_eq!(visible_indices(&videos, &selection, &favorites), vec![1]);
  }

  #[test]
  fn bucket_cycling_wraps() {
    assert_eq!(DurationBucket::All.next(), DurationBucket::Short);
    assert_eq!(DurationBucket::Long.next(), DurationBucket::All);
  }
}
