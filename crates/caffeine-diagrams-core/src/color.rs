//! CSS colors used by themes, icons and the configuration file.

use std::{fmt, str::FromStr};

use color::{DynamicColor, Rgba8, Srgb};

/// A color parsed from any CSS spelling: `#7B8894`, `rgb(0, 0, 0)`, `steelblue`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Parses a CSS color.
    ///
    /// ```
    /// use caffeine_diagrams_core::color::Color;
    ///
    /// assert!(Color::new("#336791").is_ok());
    /// assert!(Color::new("postgres-blue").is_err());
    /// ```
    pub fn new(css: &str) -> Result<Self, String> {
        DynamicColor::from_str(css)
            .map(|color| Self { color })
            .map_err(|err| format!("invalid color `{css}`: {err}"))
    }

    /// This color spelled with letters, digits and underscores only, never
    /// starting with a digit. Used to name per-color SVG markers.
    pub fn to_id_safe_string(self) -> String {
        let id: String = self
            .to_string()
            .chars()
            .map(|c| match c {
                '#' => 'x',
                c if c.is_ascii_alphanumeric() => c,
                _ => '_',
            })
            .collect();

        match id.chars().next() {
            Some(first) if first.is_ascii_digit() => format!("c{id}"),
            _ => id,
        }
    }

    /// Opaque sRGB hex spelling for SVG paint attributes.
    ///
    /// SVG renderers do not accept CSS Color 4 `color(...)` notation, so the
    /// alpha is left out here and written to `fill-opacity`/`stroke-opacity`.
    ///
    /// ```
    /// use caffeine_diagrams_core::color::Color;
    ///
    /// let backdrop = Color::new("white").unwrap().with_alpha(0.85);
    /// assert_eq!(backdrop.to_svg_value(), "#ffffff");
    /// ```
    pub fn to_svg_value(self) -> String {
        let Rgba8 { r, g, b, .. } = self.color.to_alpha_color::<Srgb>().to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Same color with opacity `alpha` (0.0 to 1.0).
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            color: self.color.with_alpha(alpha),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.color.fmt(f)
    }
}
