//! Navigation structure derived from the catalog.
//!
//! Grouped catalogs get a tab row (synthetic favorites tab first, then one
//! tab per parent group or standalone category) plus a chip row of the
//! selected group's member categories. Nested catalogs get a collapsible
//! tree isomorphic to the category structure.

use crate::catalog::{CategorySummary, TreeCategory};
use std::collections::{HashMap, HashSet};

/// Id of the synthetic favorites tab. Lives in its own id-space: group and
/// category ids from the document must not collide with it.
pub const FAVORITES_TAB_ID: &str = "favorites";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabKind {
  Favorites,
  Group,
  Category,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
  pub id: String,
  pub name: String,
  pub kind: TabKind,
}

/// A secondary filter control scoped to the selected group tab.
#[derive(Debug, Clone, PartialEq)]
pub struct Chip {
  pub id: String,
  pub name: String,
}

/// Build the ordered tab row for a grouped catalog.
///
/// The favorites tab is always first. A group tab is emitted the first time
/// any of its member categories is encountered; standalone categories get
/// their own tab. First-occurrence document order throughout.
pub fn build_tabs(categories: &[CategorySummary], groups: &HashMap<String, String>) -> Vec<Tab> {
  let mut tabs = vec![Tab { id: FAVORITES_TAB_ID.to_string(), name: "♥".to_string(), kind: TabKind::Favorites }];
  let mut seen_groups = HashSet::new();

  for category in categories {
    match category.parent.as_ref().and_then(|p| groups.get(p).map(|name| (p, name))) {
      Some((parent, group_name)) => {
        if seen_groups.insert(parent.clone()) {
          tabs.push(Tab { id: parent.clone(), name: group_name.clone(), kind: TabKind::Group });
        }
      }
      None => {
        tabs.push(Tab { id: category.id.clone(), name: category.name.clone(), kind: TabKind::Category });
      }
    }
  }
  tabs
}

/// Member categories of the given tab, in document order. Empty for the
/// favorites tab and for standalone category tabs.
pub fn chips_for_tab(categories: &[CategorySummary], tab_id: &str) -> Vec<Chip> {
  categories
    .iter()
    .filter(|c| c.parent.as_deref() == Some(tab_id))
    .map(|c| Chip { id: c.id.clone(), name: c.name.clone() })
    .collect()
}

/// Which tab starts active. Never defaults to a visibly-empty favorites
/// view when there is a non-empty alternative.
pub fn default_tab_index(tabs: &[Tab], favorites_empty: bool) -> usize {
  if favorites_empty && tabs.len() > 1 { 1 } else { 0 }
}

// --- Nested variant: collapsible tree ---

/// A navigation tree node carrying its resolved path for selection.
#[derive(Debug, Clone)]
pub struct NavNode {
  pub name: String,
  /// Display names from root to this node.
  pub path: Vec<String>,
  pub expanded: bool,
  pub children: Vec<NavNode>,
}

fn nav_node(category: &TreeCategory, prefix: &[String]) -> NavNode {
  let mut path = prefix.to_vec();
  path.push(category.name.clone());
  let children = category.children.iter().map(|c| nav_node(c, &path)).collect();
  // Default collapsed, independent of filter state
  NavNode { name: category.name.clone(), path, expanded: false, children }
}

/// Build the navigation tree for a nested catalog.
pub fn build_tree(roots: &[TreeCategory]) -> Vec<NavNode> {
  roots.iter().map(|c| nav_node(c, &[])).collect()
}

/// A row of the tree pane: node path plus indent depth.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
  pub path: Vec<String>,
  pub name: String,
  pub depth: usize,
  pub expanded: bool,
  pub has_children: bool,
}

fn push_rows(node: &NavNode, depth: usize, out: &mut Vec<TreeRow>) {
  out.push(TreeRow {
    path: node.path.clone(),
    name: node.name.clone(),
    depth,
    expanded: node.expanded,
    has_children: !node.children.is_empty(),
  });
  if node.expanded {
    for child in &node.children {
      push_rows(child, depth + 1, out);
    }
  }
}

/// Project the tree into the visible row list the tree pane renders.
/// Collapsed nodes hide their entire subtree.
pub fn visible_rows(nodes: &[NavNode]) -> Vec<TreeRow> {
  let mut rows = Vec::new();
  for node in nodes {
    push_rows(node, 0, &mut rows);
  }
  rows
}

/// Flip the expand/collapse flag of the node at `path`. No-op if the path
/// does not resolve.
pub fn toggle_expanded(nodes: &mut [NavNode], path: &[String]) {
  let Some((head, rest)) = path.split_first() else { return };
  for node in nodes.iter_mut() {
    if &node.name == head {
      if rest.is_empty() {
        node.expanded = !node.expanded;
      } else {
        toggle_expanded(&mut node.children, rest);
      }
      return;
    }
  }
}
