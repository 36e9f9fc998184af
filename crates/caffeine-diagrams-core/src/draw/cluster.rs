//! Cluster frames.

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, Text, TextDefinition},
    geometry::{Point, Size},
};

/// Space between the frame and its title
pub const TITLE_INSET: f32 = 8.0;

const CORNER_RADIUS: f32 = 6.0;

/// Visual style shared by all cluster frames of a diagram.
#[derive(Debug, Clone)]
pub struct ClusterDefinition {
    fill: Color,
    stroke: StrokeDefinition,
    title: TextDefinition,
}

impl ClusterDefinition {
    pub fn new(fill: Color, stroke: StrokeDefinition, title: TextDefinition) -> Self {
        Self {
            fill,
            stroke,
            title,
        }
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn title(&self) -> &TextDefinition {
        &self.title
    }

    /// Height reserved above the content for a title, zero when untitled.
    pub fn title_band(&self, title: &str) -> f32 {
        let size = Text::new(&self.title, title).calculate_size();
        if size.is_zero() {
            0.0
        } else {
            size.height() + TITLE_INSET
        }
    }
}

/// A rounded frame with its title in the top-left corner.
///
/// The frame size comes from layout; the box does not measure its content.
#[derive(Debug, Clone)]
pub struct ClusterBox<'a> {
    definition: &'a ClusterDefinition,
    title: &'a str,
    size: Size,
}

impl<'a> ClusterBox<'a> {
    pub fn new(definition: &'a ClusterDefinition, title: &'a str, size: Size) -> Self {
        Self {
            definition,
            title,
            size,
        }
    }
}

impl Drawable for ClusterBox<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let bounds = position.to_bounds(self.size);
        let fill = self.definition.fill();

        let frame = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", CORNER_RADIUS)
            .set("fill", fill.to_svg_value())
            .set("fill-opacity", fill.alpha());
        let frame = crate::apply_stroke!(frame, self.definition.stroke());
        output.add_to_layer(RenderLayer::Cluster, Box::new(frame));

        let title = Text::new(self.definition.title(), self.title);
        let title_size = title.calculate_size();
        if !title_size.is_zero() {
            let title_center = Point::new(
                bounds.min_x() + TITLE_INSET + title_size.width() / 2.0,
                bounds.min_y() + TITLE_INSET + title_size.height() / 2.0,
            );
            output.merge(title.render_to_layers(title_center));
        }

        output
    }

    fn size(&self) -> Size {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn definition() -> ClusterDefinition {
        ClusterDefinition::new(
            Color::new("#E5F5FD").unwrap(),
            StrokeDefinition::dashed(Color::new("#7B8894").unwrap(), 1.0),
            TextDefinition::new(),
        )
    }

    #[test]
    fn test_title_band() {
        let def = definition();
        assert_approx_eq!(f32, def.title_band(""), 0.0);

        let title_height = Text::new(def.title(), "Backend").calculate_size().height();
        assert_approx_eq!(f32, def.title_band("Backend"), title_height + TITLE_INSET);
    }

    #[test]
    fn test_render_frame_and_title() {
        let def = definition();
        let cluster = ClusterBox::new(&def, "ML Services", Size::new(200.0, 120.0));
        let groups = cluster.render_to_layers(Point::new(100.0, 60.0)).render();

        assert_eq!(groups.len(), 2);
        let frame = groups[0].to_string();
        assert!(frame.contains(r#"data-layer="cluster""#));
        assert!(frame.contains(r#"width="200""#));
        assert!(frame.contains(r#"x="0""#));
        assert!(frame.contains(r#"rx="6""#));
        assert!(frame.contains("stroke-dasharray"));
        assert!(groups[1].to_string().contains("ML Services"));
    }

    #[test]
    fn test_size_is_the_given_size() {
        let def = definition();
        let cluster = ClusterBox::new(&def, "", Size::new(10.0, 20.0));
        assert_eq!(cluster.size(), Size::new(10.0, 20.0));
        assert_eq!(cluster.render_to_layers(Point::default()).render().len(), 1);
    }
}
