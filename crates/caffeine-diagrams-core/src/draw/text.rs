//! Node labels, edge labels, cluster titles and the diagram title.
//!
//! Labels may span several lines ("FastAPI\nPython 3.10"). They are measured
//! with cosmic-text against the installed fonts, so cluster frames and node
//! spacing follow the real label widths, Hangul included.
//!
//! ```
//! # use caffeine_diagrams_core::draw::{TextDefinition, Text};
//! let mut style = TextDefinition::new();
//! style.set_font_size(13);
//!
//! let label = Text::new(&style, "FastAPI\nPython 3.10");
//! assert!(label.calculate_size().width() > 0.0);
//! ```

use std::sync::{Mutex, OnceLock, PoisonError};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{debug, info};
use svg::node::{Text as SvgText, element as svg_element};

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::{Insets, Point, Size},
};

const LINE_SPACING: f32 = 1.2;

/// Em fraction assumed for a narrow glyph when no font can be shaped.
const NARROW_GLYPH_EM: f32 = 0.55;

/// Font, colors and padding shared by a family of labels.
///
/// Defaults: `sans-serif` at 13px, SVG default fill, no background, no padding.
#[derive(Debug, Clone)]
pub struct TextDefinition {
    font_family: String,
    font_size: u16,
    color: Option<Color>,
    background_color: Option<Color>,
    padding: Insets,
}

impl TextDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    /// Draws the label over a rounded box of `color` covering text and padding.
    pub fn set_background_color(&mut self, color: Option<Color>) {
        self.background_color = color;
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    /// Padding is part of the measured size, with or without a background.
    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = padding;
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    fn line_height(&self) -> f32 {
        f32::from(self.font_size) * LINE_SPACING
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 13,
            color: None,
            background_color: None,
            padding: Insets::default(),
        }
    }
}

/// A label bound to its style.
#[derive(Debug, Clone)]
pub struct Text<'a> {
    definition: &'a TextDefinition,
    content: &'a str,
}

impl<'a> Text<'a> {
    pub fn new(definition: &'a TextDefinition, content: &'a str) -> Self {
        Self {
            definition,
            content,
        }
    }

    pub fn content(&self) -> &str {
        self.content
    }

    /// Size of the label, padding included.
    pub fn calculate_size(&self) -> Size {
        self.content_size().add_padding(self.definition.padding)
    }

    fn content_size(&self) -> Size {
        let lines = self.content.lines().count();
        if lines == 0 {
            return Size::default();
        }
        let width = measurer().widest_line(self.content, self.definition);
        Size::new(width, lines as f32 * self.definition.line_height())
    }

    fn text_element(&self, position: Point) -> svg_element::Text {
        let line_height = self.definition.line_height();
        let lines = self.content.lines().count() as f32;
        // First baseline sits half a block above center; each tspan then steps down a line
        let top = position.y() - (lines + 1.0) * line_height / 2.0;

        let element = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", top)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", self.definition.font_family())
            .set("font-size", self.definition.font_size());
        let element = match self.definition.color {
            Some(color) => element
                .set("fill", color.to_svg_value())
                .set("fill-opacity", color.alpha()),
            None => element,
        };

        self.content.lines().fold(element, |element, line| {
            element.add(
                svg_element::TSpan::new("")
                    .set("x", position.x())
                    .set("dy", line_height)
                    .add(SvgText::new(line)),
            )
        })
    }
}

impl Drawable for Text<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        if self.content.lines().next().is_none() {
            return output;
        }

        if let Some(fill) = self.definition.background_color {
            let backdrop = position.to_bounds(self.calculate_size());
            output.add_to_layer(
                RenderLayer::Text,
                Box::new(
                    svg_element::Rectangle::new()
                        .set("x", backdrop.min_x())
                        .set("y", backdrop.min_y())
                        .set("width", backdrop.width())
                        .set("height", backdrop.height())
                        .set("rx", 3.0)
                        .set("fill", fill.to_svg_value())
                        .set("fill-opacity", fill.alpha()),
                ),
            );
        }

        output.add_to_layer(RenderLayer::Text, Box::new(self.text_element(position)));
        output
    }

    fn size(&self) -> Size {
        self.calculate_size()
    }
}

/// Process-wide cosmic-text font system. Loading it scans every installed
/// font, so it is built once on first use.
struct Measurer {
    fonts: Mutex<FontSystem>,
}

fn measurer() -> &'static Measurer {
    static MEASURER: OnceLock<Measurer> = OnceLock::new();
    MEASURER.get_or_init(|| {
        info!("Loading system fonts for text measurement");
        Measurer {
            fonts: Mutex::new(FontSystem::new()),
        }
    })
}

impl Measurer {
    /// Advance width of the widest line of `text`.
    fn widest_line(&self, text: &str, definition: &TextDefinition) -> f32 {
        let font_size = f32::from(definition.font_size());
        let shaped = {
            let mut fonts = self.fonts.lock().unwrap_or_else(PoisonError::into_inner);
            let metrics = Metrics::new(font_size, definition.line_height());
            let mut buffer = Buffer::new(&mut fonts, metrics);
            let mut buffer = buffer.borrow_with(&mut fonts);
            let attrs = Attrs::new().family(family(definition.font_family()));

            buffer.set_size(None, None);
            buffer.set_text(text, &attrs, Shaping::Advanced, None);
            buffer.shape_until_scroll(true);
            buffer
                .layout_runs()
                .filter_map(|run| run.glyphs.last().map(|glyph| glyph.x + glyph.w))
                .fold(0.0_f32, f32::max)
        };

        if shaped > 0.0 {
            return shaped;
        }
        debug!(text; "No font produced glyph advances, estimating label width");
        estimate_width(text, font_size)
    }
}

fn family(name: &str) -> Family<'_> {
    match name {
        "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        name => Family::Name(name),
    }
}

/// Widest line when every wide (Hangul, CJK) character takes a full em.
fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.lines()
        .map(|line| {
            let ems: f32 = line
                .chars()
                .map(|c| if u32::from(c) >= 0x1100 { 1.0 } else { NARROW_GLYPH_EM })
                .sum();
            ems * font_size
        })
        .fold(0.0_f32, f32::max)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn svg_of(text: &Text<'_>) -> String {
        text.render_to_layers(Point::new(50.0, 50.0))
            .render()
            .iter()
            .map(|node| node.to_string())
            .collect()
    }

    #[test]
    fn test_defaults() {
        let def = TextDefinition::new();
        assert_eq!(def.font_size(), 13);
        assert_eq!(def.font_family(), "sans-serif");
        assert!(def.background_color.is_none());
        assert!(def.color.is_none());
    }

    #[test]
    fn test_blank_label_is_zero_sized() {
        let def = TextDefinition::new();
        assert!(Text::new(&def, "").calculate_size().is_zero());
        assert!(svg_of(&Text::new(&def, "")).is_empty());
    }

    #[test]
    fn test_each_line_adds_a_line_height() {
        let def = TextDefinition::new();
        let one = Text::new(&def, "ML Next").calculate_size();
        let two = Text::new(&def, "ML Next\nXGBoost").calculate_size();
        assert_approx_eq!(f32, one.height(), 13.0 * LINE_SPACING, epsilon = 0.01);
        assert_approx_eq!(f32, two.height(), one.height() * 2.0, epsilon = 0.01);
    }

    #[test]
    fn test_padding_counts_towards_size() {
        let plain = TextDefinition::new();
        let mut padded = TextDefinition::new();
        padded.set_padding(Insets::uniform(10.0));

        let a = Text::new(&plain, "API Call").calculate_size();
        let b = Text::new(&padded, "API Call").calculate_size();
        assert_approx_eq!(f32, b.width() - a.width(), 20.0, epsilon = 0.01);
        assert_approx_eq!(f32, b.height() - a.height(), 20.0, epsilon = 0.01);
    }

    #[test]
    fn test_estimate_gives_hangul_a_full_em() {
        assert!(estimate_width("사용자", 10.0) > estimate_width("abc", 10.0));
        assert_approx_eq!(f32, estimate_width("사용자", 10.0), 30.0);
        assert_approx_eq!(f32, estimate_width("ab\nabcd", 10.0), 22.0);
    }

    #[test]
    fn test_one_tspan_per_line() {
        let def = TextDefinition::new();
        let svg = svg_of(&Text::new(&def, "Gemini 2.0\nFlash"));
        assert_eq!(svg.matches("<tspan").count(), 2);
        assert!(svg.contains("Flash"));
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn test_background_box_under_label() {
        let mut def = TextDefinition::new();
        def.set_background_color(Some(Color::new("white").unwrap()));
        let svg = svg_of(&Text::new(&def, "저장"));
        let rect = svg.find("<rect").unwrap();
        let text = svg.find("<text").unwrap();
        assert!(rect < text);
    }
}
