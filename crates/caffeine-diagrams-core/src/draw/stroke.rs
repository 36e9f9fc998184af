//! Line strokes for edges and cluster frames.
//!
//! ```
//! use caffeine_diagrams_core::color::Color;
//! use caffeine_diagrams_core::draw::StrokeDefinition;
//! use svg::node::element as svg_element;
//!
//! let frame = StrokeDefinition::dashed(Color::new("#7B8894").unwrap(), 1.0);
//! let rect = caffeine_diagrams_core::apply_stroke!(svg_element::Rectangle::new(), &frame);
//! assert!(rect.to_string().contains("stroke-dasharray"));
//! ```

use crate::color::Color;

/// Dash pattern of a stroke.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    /// Evenly dashed, the look of cluster frames.
    Dashed,
}

impl StrokeStyle {
    /// `stroke-dasharray` value, if the line is broken at all.
    pub fn dasharray(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("6,4"),
        }
    }
}

/// Color, width and pattern of a line.
#[derive(Debug, Clone)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    pub fn dashed(color: Color, width: f32) -> Self {
        Self {
            style: StrokeStyle::Dashed,
            ..Self::solid(color, width)
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }
}

/// Writes a [`StrokeDefinition`] onto an SVG element.
///
/// Lines get round caps and joins so connectors meet their arrowheads cleanly.
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let stroke: &$crate::draw::StrokeDefinition = $stroke;
        let element = $element
            .set("stroke", stroke.color().to_svg_value())
            .set("stroke-opacity", stroke.color().alpha())
            .set("stroke-width", stroke.width())
            .set("stroke-linecap", "round")
            .set("stroke-linejoin", "round");
        match stroke.style().dasharray() {
            Some(pattern) => element.set("stroke-dasharray", pattern),
            None => element,
        }
    }};
}
