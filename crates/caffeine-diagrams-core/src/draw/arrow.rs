//! Curved connectors with arrowheads and optional labels.
//!
//! Arrowheads are SVG markers shared between arrows of the same color.
//! [`ArrowDrawer`] records every color it draws so the exporter can emit the
//! matching `<marker>` definitions once per document.

use std::collections::BTreeMap;

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, Text, TextDefinition},
    geometry::Point,
};

/// A cubic Bézier segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    start: Point,
    ctrl1: Point,
    ctrl2: Point,
    end: Point,
}

impl Curve {
    pub fn new(start: Point, ctrl1: Point, ctrl2: Point, end: Point) -> Self {
        Self {
            start,
            ctrl1,
            ctrl2,
            end,
        }
    }

    /// Builds a curve that leaves `start` and enters `end` along the flow axis.
    ///
    /// Control points sit halfway between the endpoints on the flow axis, so
    /// endpoints aligned on the cross axis produce a straight line.
    pub fn along_flow(start: Point, end: Point, horizontal: bool) -> Self {
        let (ctrl1, ctrl2) = if horizontal {
            let mid_x = (start.x() + end.x()) / 2.0;
            (start.with_x(mid_x), end.with_x(mid_x))
        } else {
            let mid_y = (start.y() + end.y()) / 2.0;
            (start.with_y(mid_y), end.with_y(mid_y))
        };
        Self::new(start, ctrl1, ctrl2, end)
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Moves every point of the curve by `offset`.
    pub fn translate(self, offset: Point) -> Self {
        Self {
            start: self.start.add_point(offset),
            ctrl1: self.ctrl1.add_point(offset),
            ctrl2: self.ctrl2.add_point(offset),
            end: self.end.add_point(offset),
        }
    }

    /// Evaluates the curve at `t` in `[0, 1]`.
    pub fn point_at(&self, t: f32) -> Point {
        let u = 1.0 - t;
        let a = u * u * u;
        let b = 3.0 * u * u * t;
        let c = 3.0 * u * t * t;
        let d = t * t * t;
        Point::new(
            a * self.start.x() + b * self.ctrl1.x() + c * self.ctrl2.x() + d * self.end.x(),
            a * self.start.y() + b * self.ctrl1.y() + c * self.ctrl2.y() + d * self.end.y(),
        )
    }

    pub fn midpoint(&self) -> Point {
        self.point_at(0.5)
    }

    /// SVG path data for this curve
    pub fn to_path_data(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x(),
            self.start.y(),
            self.ctrl1.x(),
            self.ctrl1.y(),
            self.ctrl2.x(),
            self.ctrl2.y(),
            self.end.x(),
            self.end.y()
        )
    }
}

/// Stroke and label style for arrows
#[derive(Debug, Clone)]
pub struct ArrowDefinition {
    stroke: StrokeDefinition,
    label: TextDefinition,
}

impl ArrowDefinition {
    pub fn new(stroke: StrokeDefinition, label: TextDefinition) -> Self {
        Self { stroke, label }
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn label(&self) -> &TextDefinition {
        &self.label
    }
}

/// A single connector
#[derive(Debug, Clone)]
pub struct Arrow<'a> {
    definition: &'a ArrowDefinition,
    label: Option<&'a str>,
    label_center: Option<Point>,
}

impl<'a> Arrow<'a> {
    pub fn new(definition: &'a ArrowDefinition, label: Option<&'a str>) -> Self {
        Self {
            definition,
            label,
            label_center: None,
        }
    }

    /// Centers the label on `center` instead of the curve midpoint.
    pub fn with_label_center(mut self, center: Point) -> Self {
        self.label_center = Some(center);
        self
    }

    fn render(&self, curve: &Curve) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let color = self.definition.stroke().color();

        let path = svg_element::Path::new()
            .set("d", curve.to_path_data())
            .set("fill", "none")
            .set("marker-end", format!("url(#{})", marker_id(color)));
        let path = crate::apply_stroke!(path, self.definition.stroke());
        output.add_to_layer(RenderLayer::Arrow, Box::new(path));

        if let Some(label) = self.label.filter(|label| !label.is_empty()) {
            let text = Text::new(self.definition.label(), label);
            let center = self.label_center.unwrap_or_else(|| curve.midpoint());
            output.merge(text.render_to_layers(center));
        }

        output
    }
}

/// Draws arrows and collects the marker definitions they reference.
#[derive(Debug, Default)]
pub struct ArrowDrawer {
    markers: BTreeMap<String, Color>,
}

impl ArrowDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `arrow` along `curve` and registers its arrowhead color.
    pub fn draw_arrow(&mut self, arrow: &Arrow, curve: &Curve) -> LayeredOutput {
        let color = arrow.definition.stroke().color();
        self.markers.insert(marker_id(color), color);
        arrow.render(curve)
    }

    /// `<defs>` holding one arrowhead marker per color drawn so far
    pub fn draw_marker_definitions(&self) -> Box<dyn svg::Node> {
        let mut defs = svg_element::Definitions::new();
        for (id, color) in &self.markers {
            defs = defs.add(arrowhead(id, *color));
        }
        Box::new(defs)
    }
}

fn marker_id(color: Color) -> String {
    format!("arrowhead-{}", color.to_id_safe_string())
}

fn arrowhead(id: &str, color: Color) -> svg_element::Marker {
    svg_element::Marker::new()
        .set("id", id)
        .set("viewBox", "0 0 10 10")
        .set("refX", 9)
        .set("refY", 5)
        .set("markerWidth", 7)
        .set("markerHeight", 7)
        .set("orient", "auto")
        .add(
            svg_element::Path::new()
                .set("d", "M 0 0 L 10 5 L 0 10 z")
                .set("fill", color.to_svg_value())
                .set("fill-opacity", color.alpha()),
        )
}
