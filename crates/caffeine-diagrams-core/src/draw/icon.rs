//! Icon glyphs and the labeled icon node drawable.
//!
//! Every glyph is drawn in a 64×64 design box and scaled to the configured
//! icon size with a group transform.

use svg::node::element as svg_element;

use crate::{
    draw::{Drawable, LayeredOutput, RenderLayer, Text},
    geometry::{Point, Size},
    semantic::Icon,
};

const DESIGN_SIZE: f32 = 64.0;

/// Vertical gap between the icon and its label
const LABEL_GAP: f32 = 6.0;

/// An icon with its label underneath.
///
/// The drawable's size spans both the icon and the label, matching how the
/// node is measured during layout.
#[derive(Debug, Clone)]
pub struct IconNode<'a> {
    icon: Icon,
    icon_size: f32,
    label: Text<'a>,
}

impl<'a> IconNode<'a> {
    pub fn new(icon: Icon, icon_size: f32, label: Text<'a>) -> Self {
        Self {
            icon,
            icon_size,
            label,
        }
    }

    pub fn icon(&self) -> Icon {
        self.icon
    }
}

impl Drawable for IconNode<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let size = self.size();
        let top = position.y() - size.height() / 2.0;

        let scale = self.icon_size / DESIGN_SIZE;
        let glyph = glyph(self.icon).set(
            "transform",
            format!(
                "translate({} {}) scale({scale})",
                position.x() - self.icon_size / 2.0,
                top
            ),
        );
        output.add_to_layer(RenderLayer::Content, Box::new(glyph));

        let label_size = self.label.size();
        if !label_size.is_zero() {
            let label_center = Point::new(
                position.x(),
                top + self.icon_size + LABEL_GAP + label_size.height() / 2.0,
            );
            output.merge(self.label.render_to_layers(label_center));
        }

        output
    }

    fn size(&self) -> Size {
        let label_size = self.label.size();
        let label_band = if label_size.is_zero() {
            0.0
        } else {
            LABEL_GAP + label_size.height()
        };
        Size::new(
            self.icon_size.max(label_size.width()),
            self.icon_size + label_band,
        )
    }
}

/// Returns the glyph for `icon`, drawn in the 64×64 design box.
pub fn glyph(icon: Icon) -> svg_element::Group {
    let accent = icon.accent();
    let group = svg_element::Group::new()
        .set("data-icon", icon.to_string())
        .set("class", "icon");

    match icon {
        Icon::Users => group
            .add(circle(40.0, 20.0, 9.0, "#8595A8"))
            .add(path("M 24 54 Q 24 34 40 34 Q 56 34 56 54 Z", "#8595A8"))
            .add(circle(26.0, 24.0, 10.0, accent))
            .add(path("M 8 58 Q 8 38 26 38 Q 44 38 44 58 Z", accent)),
        Icon::React => {
            let mut group = group.add(circle(32.0, 32.0, 5.0, accent));
            for angle in [0, 60, 120] {
                group = group.add(
                    svg_element::Ellipse::new()
                        .set("cx", 32)
                        .set("cy", 32)
                        .set("rx", 28)
                        .set("ry", 11)
                        .set("fill", "none")
                        .set("stroke", accent)
                        .set("stroke-width", 3)
                        .set("transform", format!("rotate({angle} 32 32)")),
                );
            }
            group
        }
        Icon::Alb | Icon::Elb => {
            let mut group = group
                .add(circle(32.0, 32.0, 30.0, accent))
                .add(circle(18.0, 32.0, 5.0, "white"));
            for end_y in [16.0, 32.0, 48.0] {
                group = group.add(line(23.0, 32.0, 44.0, end_y, "white", 3.0));
                group = if icon == Icon::Alb {
                    group.add(rect(43.0, end_y - 4.0, 8.0, 8.0, 1.0, "white"))
                } else {
                    group.add(circle(47.0, end_y, 4.0, "white"))
                };
            }
            group
        }
        Icon::Ecs => {
            let mut group = group.add(rect(2.0, 2.0, 60.0, 60.0, 8.0, accent));
            for y in [14.0, 27.0, 40.0] {
                group = group.add(rect(12.0, y, 40.0, 10.0, 2.0, "white"));
            }
            group
        }
        Icon::Rds => group
            .add(rect(2.0, 2.0, 60.0, 60.0, 8.0, accent))
            .add(outline("M 16 18 A 16 6 0 1 0 48 18 A 16 6 0 1 0 16 18 Z"))
            .add(outline("M 16 18 L 16 46 A 16 6 0 0 0 48 46 L 48 18"))
            .add(outline("M 16 32 A 16 6 0 0 0 48 32")),
        Icon::PostgreSql => group
            .add(path("M 10 14 L 10 50 A 22 8 0 0 0 54 50 L 54 14 Z", accent))
            .add(
                svg_element::Ellipse::new()
                    .set("cx", 32)
                    .set("cy", 14)
                    .set("rx", 22)
                    .set("ry", 8)
                    .set("fill", "#5A8AB5"),
            )
            .add(outline("M 10 27 A 22 8 0 0 0 54 27"))
            .add(outline("M 10 39 A 22 8 0 0 0 54 39")),
        Icon::Server => {
            let mut group = group.add(rect(14.0, 4.0, 36.0, 56.0, 4.0, accent));
            for k in 0..3 {
                let y = 10.0 + k as f32 * 16.0;
                group = group
                    .add(rect(19.0, y, 20.0, 10.0, 1.5, "#2D3748"))
                    .add(circle(44.0, y + 5.0, 2.0, "#48BB78"));
            }
            group
        }
        Icon::Docker => {
            let mut group = group.add(path(
                "M 4 34 L 56 34 Q 62 30 60 26 Q 64 34 58 38 Q 52 58 26 58 Q 8 58 4 34 Z",
                accent,
            ));
            for (x, y) in [
                (10.0, 24.0),
                (19.0, 24.0),
                (28.0, 24.0),
                (37.0, 24.0),
                (19.0, 15.0),
                (28.0, 15.0),
            ] {
                group = group.add(rect(x, y, 8.0, 8.0, 1.0, accent));
            }
            group.add(circle(16.0, 44.0, 2.0, "white"))
        }
        Icon::Mlflow => group.add(rect(2.0, 2.0, 60.0, 60.0, 10.0, accent)).add(
            svg_element::Polyline::new()
                .set("points", "10,46 22,34 32,40 44,22 54,28")
                .set("fill", "none")
                .set("stroke", "white")
                .set("stroke-width", 4)
                .set("stroke-linecap", "round")
                .set("stroke-linejoin", "round"),
        ),
        Icon::FastApi => group.add(circle(32.0, 32.0, 30.0, accent)).add(
            svg_element::Polygon::new()
                .set("points", "36,8 16,36 30,36 26,56 48,26 34,26")
                .set("fill", "white"),
        ),
        Icon::Slack => group
            .add(rect(18.0, 6.0, 9.0, 30.0, 4.5, "#36C5F0"))
            .add(rect(28.0, 18.0, 30.0, 9.0, 4.5, "#2EB67D"))
            .add(rect(37.0, 28.0, 9.0, 30.0, 4.5, "#ECB22E"))
            .add(rect(6.0, 37.0, 30.0, 9.0, 4.5, "#E01E5A")),
        Icon::Rack => {
            let mut group = group.add(rect(6.0, 4.0, 52.0, 56.0, 3.0, accent));
            for k in 0..5 {
                let y = 10.0 + k as f32 * 10.0;
                group = group
                    .add(rect(12.0, y, 40.0, 6.0, 1.0, "#E2E8F0"))
                    .add(circle(47.0, y + 3.0, 1.5, accent));
            }
            group
        }
    }
}

fn circle(cx: f32, cy: f32, r: f32, fill: &str) -> svg_element::Circle {
    svg_element::Circle::new()
        .set("cx", cx)
        .set("cy", cy)
        .set("r", r)
        .set("fill", fill)
}

fn rect(x: f32, y: f32, width: f32, height: f32, rx: f32, fill: &str) -> svg_element::Rectangle {
    svg_element::Rectangle::new()
        .set("x", x)
        .set("y", y)
        .set("width", width)
        .set("height", height)
        .set("rx", rx)
        .set("fill", fill)
}

fn path(d: &str, fill: &str) -> svg_element::Path {
    svg_element::Path::new().set("d", d).set("fill", fill)
}

fn line(x1: f32, y1: f32, x2: f32, y2: f32, stroke: &str, width: f32) -> svg_element::Line {
    svg_element::Line::new()
        .set("x1", x1)
        .set("y1", y1)
        .set("x2", x2)
        .set("y2", y2)
        .set("stroke", stroke)
        .set("stroke-width", width)
}

/// White unfilled stroke used for details drawn over an accent shape
fn outline(d: &str) -> svg_element::Path {
    path(d, "none").set("stroke", "white").set("stroke-width", 3)
}
