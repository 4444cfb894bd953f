use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, List, ListItem, Padding, Paragraph},
};

use crate::app::{App, AppMode, Focus, NavState};
use crate::tabs::{self, TabKind};
use crate::theme::Theme;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

fn duration_label(minutes: Option<f64>) -> String {
  match minutes {
    Some(m) => format!("{} min", m.round() as i64),
    None => "? min".to_string(),
  }
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();
  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let is_tabs = matches!(app.nav, NavState::Tabs { .. });
  let importing = app.mode == AppMode::Import;

  let mut constraints = vec![Constraint::Length(1)];
  if is_tabs {
    constraints.push(Constraint::Length(1)); // tabs
    constraints.push(Constraint::Length(1)); // chips
  }
  constraints.push(Constraint::Min(3)); // main
  constraints.push(Constraint::Length(1)); // status
  if importing {
    constraints.push(Constraint::Length(3));
  }
  constraints.push(Constraint::Length(1)); // footer
  let areas = Layout::vertical(constraints).split(frame.area());

  let mut next = 0;
  let mut take = || {
    let area = areas[next];
    next += 1;
    area
  };

  render_header(frame, theme, take());
  if is_tabs {
    render_tabs(frame, app, take());
    render_chips(frame, app, take());
    render_list(frame, app, take());
  } else {
    let [tree_area, list_area] = Layout::horizontal([Constraint::Percentage(30), Constraint::Percentage(70)]).areas(take());
    render_tree(frame, app, tree_area);
    render_list(frame, app, list_area);
  }
  render_status(frame, app, take());
  if importing {
    render_import(frame, app, take());
  }
  render_footer(frame, app, take());
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let left = Line::from(Span::styled(" ▶ reel ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let NavState::Tabs { tabs, selected, .. } = &app.nav else { return };

  let mut spans = vec![Span::raw(" ")];
  for (i, tab) in tabs.iter().enumerate() {
    let label = match tab.kind {
      TabKind::Favorites if !app.favorites.is_empty() => format!(" ♥ {} ", app.favorites.len()),
      TabKind::Favorites => " ♥ ".to_string(),
      _ => format!(" {} ", tab.name),
    };
    let style = if i == *selected {
      Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
    } else if tab.kind == TabKind::Favorites {
      Style::default().fg(theme.heart)
    } else {
      Style::default().fg(theme.fg)
    };
    spans.push(Span::styled(label, style));
    spans.push(Span::raw(" "));
  }
  frame.render_widget(Line::from(spans), area);
}

fn render_chips(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let NavState::Tabs { chips, selected_chip, .. } = &app.nav else { return };
  if chips.is_empty() {
    return;
  }

  let mut spans = vec![Span::raw("   ")];
  for chip in chips {
    let active = selected_chip.as_deref() == Some(chip.id.as_str());
    let style = if active {
      Style::default().fg(theme.highlight_fg).bg(theme.accent)
    } else {
      Style::default().fg(theme.muted)
    };
    spans.push(Span::styled(format!("⟨{}⟩", chip.name), style));
    spans.push(Span::raw(" "));
  }
  frame.render_widget(Line::from(spans), area);
}

fn render_tree(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let NavState::Tree { nodes, cursor, selected_path, favorites_only } = &app.nav else { return };

  let rows = tabs::visible_rows(nodes);
  let inner_w = area.width.saturating_sub(4) as usize;
  let items: Vec<ListItem> = rows
    .iter()
    .enumerate()
    .map(|(i, row)| {
      let marker = if row.has_children {
        if row.expanded { "▾ " } else { "▸ " }
      } else {
        "  "
      };
      let indent = "  ".repeat(row.depth);
      let is_cursor = i == *cursor && app.focus == Focus::Nav;
      let is_selected = !selected_path.is_empty() && row.path == *selected_path;
      let fg = if is_cursor {
        theme.highlight_fg
      } else if is_selected {
        theme.accent
      } else {
        theme.fg
      };
      let bg = if is_cursor { theme.highlight_bg } else { theme.bg };
      let label = truncate_str(&format!("{}{}{}", indent, marker, row.name), inner_w);
      ListItem::new(Line::from(Span::styled(label, Style::default().fg(fg)))).bg(bg)
    })
    .collect();

  let title = if *favorites_only { " Categories (♥ only) " } else { " Categories " };
  let border_color = if app.focus == Focus::Nav { theme.accent } else { theme.border };
  let list = List::new(items).block(
    Block::bordered()
      .title(title)
      .title_style(Style::default().fg(border_color).add_modifier(Modifier::BOLD))
      .border_type(ratatui::widgets::BorderType::Rounded)
      .border_style(Style::default().fg(border_color)),
  );
  frame.render_widget(list, area);
}

fn render_list(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();

  if app.visible.is_empty() {
    render_empty(frame, app, area);
    return;
  }

  // Inner width: area minus 2 borders minus 2 chars for highlight symbol ("▶ ")
  let inner_w = area.width.saturating_sub(4) as usize;

  let items: Vec<ListItem> = app
    .visible
    .iter()
    .enumerate()
    .map(|(i, &idx)| {
      let video = &app.catalog.videos[idx];
      let is_selected = Some(i) == app.list_state.selected();
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let bg = if is_selected {
        theme.highlight_bg
      } else if i % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };

      let heart = if app.favorites.contains(&video.id) { "♥ " } else { "  " };
      let right = format!("{}  {}", duration_label(video.duration), video.display_category);
      let right_w = right.chars().count();
      let title_max = inner_w.saturating_sub(right_w + 2 + 2);
      let title = truncate_str(&video.title, title_max);
      let title_w = title.chars().count();
      let gap = inner_w.saturating_sub(2 + title_w + right_w);

      let heart_style =
        if is_selected { Style::default().fg(theme.highlight_fg) } else { Style::default().fg(theme.heart) };
      let line = Line::from(vec![
        Span::styled(heart.to_string(), heart_style),
        Span::styled(title, Style::default().fg(fg)),
        Span::raw(" ".repeat(gap)),
        Span::styled(right, Style::default().fg(theme.muted)),
      ]);
      ListItem::new(line).bg(bg)
    })
    .collect();

  let title = format!(" Videos — {} ", app.visible.len());
  let border_color = if app.focus == Focus::List { theme.accent } else { theme.border };
  let list = List::new(items)
    .block(
      Block::bordered()
        .title(title)
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .border_type(ratatui::widgets::BorderType::Rounded)
        .border_style(Style::default().fg(border_color)),
    )
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_empty(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let text = if app.on_favorites_tab() && app.favorites.is_empty() {
    vec![
      Line::from(""),
      Line::from(Span::styled("♥", Style::default().fg(theme.heart))),
      Line::from(""),
      Line::from(Span::styled("No favorites yet", Style::default().fg(theme.fg).add_modifier(Modifier::BOLD))),
      Line::from(""),
      Line::from(Span::styled("Press f on any video to heart it,", Style::default().fg(theme.muted))),
      Line::from(Span::styled("or i to import a comma-separated id list.", Style::default().fg(theme.muted))),
    ]
  } else {
    vec![
      Line::from(""),
      Line::from(Span::styled("No videos match your filters.", Style::default().fg(theme.muted))),
      Line::from(""),
      Line::from(Span::styled("Press r to reset the selection.", Style::default().fg(theme.muted))),
    ]
  };
  let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
    Block::bordered()
      .border_type(ratatui::widgets::BorderType::Rounded)
      .border_style(Style::default().fg(theme.border)),
  );
  frame.render_widget(paragraph, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if let Some(info) = &app.info_message {
    (format!(" ℹ {}", info), Style::default().fg(theme.status))
  } else {
    let total = app.catalog.videos.len();
    (format!(" {} videos · {} durations", total, app.duration.label()), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_import(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let input_block = Block::bordered()
    .title(" Import favorites (comma-separated ids) ")
    .title_style(Style::default().fg(theme.accent))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.accent))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&app.import_input, app.import_cursor);

  if cursor_col < app.import_scroll {
    app.import_scroll = cursor_col;
  } else if cursor_col >= app.import_scroll + inner_w {
    app.import_scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = app
    .import_input
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.import_scroll)
    .take_while(|(start, _, _)| *start < app.import_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(input_block);
  frame.render_widget(paragraph, area);

  let cursor_x = area.x + 2 + (cursor_col - app.import_scroll) as u16;
  frame.set_cursor_position((cursor_x, area.y + 1));
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let is_tabs = matches!(app.nav, NavState::Tabs { .. });
  let keys: Vec<(&str, &str)> = match app.mode {
    AppMode::Import => vec![("Enter", "Import"), ("Esc", "Cancel")],
    AppMode::Browse if is_tabs => vec![
      ("←/→", "Tab"),
      ("c", "Chip"),
      ("d", "Duration"),
      ("j/k", "Move"),
      ("f", "♥"),
      ("i/e", "Import/Export"),
      ("r", "Reset"),
      ("q", "Quit"),
    ],
    AppMode::Browse => vec![
      ("Tab", "Pane"),
      ("Enter", "Select/Open"),
      ("d", "Duration"),
      ("F", "♥ only"),
      ("f", "♥"),
      ("r", "Reset"),
      ("q", "Quit"),
    ],
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw(" "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}
