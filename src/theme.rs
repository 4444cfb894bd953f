use ratatui::style::Color;

/// A named color palette for the UI. Cycled at runtime with Ctrl+T and
/// remembered in prefs.
pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub status: Color,
  pub error: Color,
  pub heart: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub const THEMES: &[Theme] = &[
  Theme {
    name: "dusk",
    bg: Color::Rgb(24, 24, 33),
    fg: Color::Rgb(216, 218, 228),
    accent: Color::Rgb(189, 147, 249),
    muted: Color::Rgb(116, 119, 141),
    border: Color::Rgb(68, 71, 90),
    status: Color::Rgb(139, 213, 202),
    error: Color::Rgb(255, 121, 121),
    heart: Color::Rgb(255, 121, 162),
    highlight_fg: Color::Rgb(24, 24, 33),
    highlight_bg: Color::Rgb(189, 147, 249),
    stripe_bg: Color::Rgb(30, 30, 41),
    key_fg: Color::Rgb(24, 24, 33),
    key_bg: Color::Rgb(116, 119, 141),
  },
  Theme {
    name: "paper",
    bg: Color::Rgb(250, 247, 240),
    fg: Color::Rgb(55, 53, 47),
    accent: Color::Rgb(193, 95, 60),
    muted: Color::Rgb(150, 145, 135),
    border: Color::Rgb(210, 204, 193),
    status: Color::Rgb(77, 124, 106),
    error: Color::Rgb(186, 54, 54),
    heart: Color::Rgb(199, 62, 110),
    highlight_fg: Color::Rgb(250, 247, 240),
    highlight_bg: Color::Rgb(193, 95, 60),
    stripe_bg: Color::Rgb(243, 239, 230),
    key_fg: Color::Rgb(250, 247, 240),
    key_bg: Color::Rgb(150, 145, 135),
  },
  Theme {
    name: "moss",
    bg: Color::Rgb(22, 28, 24),
    fg: Color::Rgb(208, 216, 205),
    accent: Color::Rgb(152, 195, 121),
    muted: Color::Rgb(108, 122, 106),
    border: Color::Rgb(58, 70, 60),
    status: Color::Rgb(229, 192, 123),
    error: Color::Rgb(224, 108, 117),
    heart: Color::Rgb(224, 108, 150),
    highlight_fg: Color::Rgb(22, 28, 24),
    highlight_bg: Color::Rgb(152, 195, 121),
    stripe_bg: Color::Rgb(27, 34, 29),
    key_fg: Color::Rgb(22, 28, 24),
    key_bg: Color::Rgb(108, 122, 106),
  },
];
