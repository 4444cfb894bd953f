//! Catalog document loading and flattening.
//!
//! The catalog is a static JSON document in one of two shapes: a grouped
//! form (`{ meta, categories }` where categories may point at a parent
//! group) or a nested form (an array of categories with `subcategories`).
//! Both are flattened into one ordered `Vec<FlatVideo>` annotated with the
//! resolved category path; everything downstream (navigation, filtering)
//! works off that flat sequence.

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::constants::constants;

// --- Document shapes ---

/// The raw catalog document. Shape is detected by serde: the grouped form
/// is a JSON object, the nested form a JSON array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CatalogDoc {
  Grouped(GroupedDoc),
  Nested(Vec<NestedCategory>),
}

#[derive(Debug, Deserialize)]
pub struct GroupedDoc {
  #[serde(default)]
  pub meta: Meta,
  pub categories: Vec<GroupedCategory>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Meta {
  #[serde(default)]
  pub parent_groups: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct GroupedCategory {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub parent: Option<String>,
  /// Raw values — entries are validated one by one so a single malformed
  /// record never fails the whole document.
  #[serde(default)]
  pub videos: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct NestedCategory {
  pub name: String,
  #[serde(default)]
  pub videos: Vec<Value>,
  #[serde(default)]
  pub subcategories: Vec<NestedCategory>,
}

// --- Flattened model ---

/// A video annotated with its resolved category location.
///
/// Invariant: `category_path` is never empty and `display_category` equals
/// its last element.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatVideo {
  pub id: String,
  pub title: String,
  pub link: String,
  /// Runtime in minutes. `None` when the document omits it or carries a
  /// non-numeric value; such videos vanish under any specific duration bucket.
  pub duration: Option<f64>,
  pub thumbnail: Option<String>,
  /// Display names from root to the video's immediate category.
  pub category_path: Vec<String>,
  /// The immediate (leaf) category name.
  pub display_category: String,
  /// Identifier of the owning category (grouped form only).
  pub category_id: Option<String>,
  /// Identifier of the owning category's parent group (grouped form only).
  pub parent_group: Option<String>,
}

/// Lightweight category summary kept for navigation building (grouped form).
#[derive(Debug, Clone)]
pub struct CategorySummary {
  pub id: String,
  pub name: String,
  pub parent: Option<String>,
}

/// Navigation-relevant structure extracted from the document.
#[derive(Debug)]
pub enum Structure {
  Grouped { categories: Vec<CategorySummary>, groups: HashMap<String, String> },
  Nested { roots: Vec<TreeCategory> },
}

/// A nested category stripped down to what the tree pane needs.
#[derive(Debug, Clone)]
pub struct TreeCategory {
  pub name: String,
  pub children: Vec<TreeCategory>,
}

/// The fully processed catalog: the flat video sequence plus the structure
/// the navigation is derived from.
#[derive(Debug)]
pub struct Catalog {
  pub videos: Vec<FlatVideo>,
  pub structure: Structure,
}

// --- Validation ---

/// Pull a required non-empty string field out of a raw video record.
fn str_field(record: &Value, key: &str) -> Option<String> {
  record.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Validate a raw video entry. Returns `None` for anything that is not a
/// JSON object with non-empty `id`, `title` and `link` — such entries are
/// dropped without error.
fn parse_video(record: &Value) -> Option<(String, String, String, Option<f64>, Option<String>)> {
  if !record.is_object() {
    return None;
  }
  let id = str_field(record, "id")?;
  let title = str_field(record, "title")?;
  let link = str_field(record, "link")?;
  let duration = record.get("duration").and_then(Value::as_f64);
  let thumbnail = str_field(record, "thumbnail");
  Some((id, title, link, duration, thumbnail))
}

// --- Flattening ---

fn flatten_grouped(doc: &GroupedDoc) -> Vec<FlatVideo> {
  let mut flat = Vec::new();
  for category in &doc.categories {
    let group_name = category.parent.as_ref().and_then(|p| doc.meta.parent_groups.get(p));
    let category_path: Vec<String> = match group_name {
      Some(group) => vec![group.clone(), category.name.clone()],
      None => vec![category.name.clone()],
    };
    for record in &category.videos {
      let Some((id, title, link, duration, thumbnail)) = parse_video(record) else {
        debug!(category = %category.name, "dropping malformed video entry");
        continue;
      };
      flat.push(FlatVideo {
        id,
        title,
        link,
        duration,
        thumbnail,
        category_path: category_path.clone(),
        display_category: category.name.clone(),
        category_id: Some(category.id.clone()),
        // Only a parent that resolves in the group map counts as a group
        parent_group: group_name.and(category.parent.clone()),
      });
    }
  }
  flat
}

fn flatten_nested_into(node: &NestedCategory, prefix: &[String], depth: usize, out: &mut Vec<FlatVideo>) {
  if depth >= constants().max_tree_depth {
    warn!(category = %node.name, depth, "category nesting exceeds depth cap, skipping subtree");
    return;
  }
  let mut path = prefix.to_vec();
  path.push(node.name.clone());

  for record in &node.videos {
    let Some((id, title, link, duration, thumbnail)) = parse_video(record) else {
      debug!(category = %node.name, "dropping malformed video entry");
      continue;
    };
    out.push(FlatVideo {
      id,
      title,
      link,
      duration,
      thumbnail,
      category_path: path.clone(),
      display_category: node.name.clone(),
      category_id: None,
      parent_group: None,
    });
  }
  for child in &node.subcategories {
    flatten_nested_into(child, &path, depth + 1, out);
  }
}

fn tree_shape(node: &NestedCategory) -> TreeCategory {
  TreeCategory { name: node.name.clone(), children: node.subcategories.iter().map(tree_shape).collect() }
}

/// Process a parsed document into the flat video sequence plus navigation
/// structure. Order is source document order throughout — category first,
/// then each category's videos; no sorting is performed.
pub fn build_catalog(doc: CatalogDoc) -> Catalog {
  match doc {
    CatalogDoc::Grouped(doc) => {
      let videos = flatten_grouped(&doc);
      let categories = doc
        .categories
        .iter()
        .map(|c| CategorySummary { id: c.id.clone(), name: c.name.clone(), parent: c.parent.clone() })
        .collect();
      info!(videos = videos.len(), "processed grouped catalog");
      Catalog { videos, structure: Structure::Grouped { categories, groups: doc.meta.parent_groups } }
    }
    CatalogDoc::Nested(roots) => {
      let mut videos = Vec::new();
      for root in &roots {
        flatten_nested_into(root, &[], 0, &mut videos);
      }
      info!(videos = videos.len(), "processed nested catalog");
      Catalog { videos, structure: Structure::Nested { roots: roots.iter().map(tree_shape).collect() } }
    }
  }
}

// --- Loading ---

/// Fetch and parse the catalog document. `source` is either an HTTP(S) URL
/// or a local file path; both are read exactly once, with no retries.
pub async fn load_catalog(client: &reqwest::Client, source: &str) -> Result<Catalog> {
  let body = if source.starts_with("http://") || source.starts_with("https://") {
    let response = client.get(source).send().await.with_context(|| format!("Failed to fetch {}", source))?;
    if !response.status().is_success() {
      return Err(anyhow!("Fetching {} failed with status {}", source, response.status()));
    }
    response.text().await.with_context(|| format!("Failed to read body of {}", source))?
  } else {
    tokio::fs::read_to_string(source).await.with_context(|| format!("Failed to read {}", source))?
  };

  let doc: CatalogDoc = serde_json::from_str(&body).with_context(|| format!("{} is not a valid catalog", source))?;
  Ok(build_catalog(doc))
}
