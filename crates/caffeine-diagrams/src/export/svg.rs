//! SVG export.
//!
//! [`Svg`] walks a [`DiagramLayout`] and draws every element with the core
//! drawables. Their layered outputs are merged so that cluster frames end
//! up below edges, edges below icons, and icons below text.

use log::{debug, info};
use svg::{Document, node::element as svg_element};

use caffeine_diagrams_core::{
    draw::{
        Arrow, ArrowDrawer, ClusterBox, Curve, Drawable, IconNode, LayeredOutput, RenderLayer,
        Text,
    },
    geometry::{Bounds, Point, Size},
    semantic::{Diagram, Direction, Edge},
};

use crate::{
    export,
    layout::{DiagramLayout, EdgeLayout},
    theme::Theme,
};

/// Perpendicular distance between the two edges of an opposite pair
const REVERSE_EDGE_OFFSET: f32 = 8.0;

/// Gap between a paired edge and its label
const LABEL_GAP: f32 = 4.0;

/// SVG exporter for one diagram
pub struct Svg<'t> {
    theme: &'t Theme,
    arrow_drawer: ArrowDrawer,
}

impl<'t> Svg<'t> {
    pub fn new(theme: &'t Theme) -> Self {
        Self {
            theme,
            arrow_drawer: ArrowDrawer::new(),
        }
    }

    /// Draws `layout` into a complete SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] when the layout does not belong to
    /// `diagram`.
    pub fn render(
        &mut self,
        diagram: &Diagram,
        layout: &DiagramLayout,
    ) -> Result<Document, export::Error> {
        let canvas = layout.canvas();
        let mut output = LayeredOutput::new();

        if let Some(background) = self.theme.background() {
            let rect = svg_element::Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", canvas.width())
                .set("height", canvas.height())
                .set("fill", background.to_svg_value())
                .set("fill-opacity", background.alpha());
            output.add_to_layer(RenderLayer::Background, Box::new(rect));
        }

        // Outer frames first so nested ones paint over them
        let mut clusters: Vec<_> = layout.clusters().iter().collect();
        clusters.sort_by_key(|cluster| cluster.depth());
        for cluster_layout in clusters {
            let cluster = diagram.cluster(cluster_layout.id()).ok_or_else(|| {
                export::Error::Render(format!(
                    "cluster {} is not part of `{}`",
                    cluster_layout.id().index(),
                    diagram.title()
                ))
            })?;
            let bounds = cluster_layout.bounds();
            let frame = ClusterBox::new(self.theme.cluster(), cluster.title(), bounds.to_size());
            output.merge(frame.render_to_layers(bounds.center()));
        }

        for edge_layout in layout.edges() {
            let edge = diagram.edges().get(edge_layout.id().index()).ok_or_else(|| {
                export::Error::Render(format!("edge {} is unknown", edge_layout.id().index()))
            })?;
            let path = edge_path(diagram, edge, edge_layout);
            let mut arrow = Arrow::new(self.theme.arrow(), edge.label());
            if let Some(label) = label_box(self.theme, edge, &path) {
                arrow = arrow.with_label_center(label.center());
            }
            output.merge(self.arrow_drawer.draw_arrow(&arrow, &path.curve));
        }

        for node_layout in layout.nodes() {
            let node = diagram.node(node_layout.id()).ok_or_else(|| {
                export::Error::Render(format!("node {} is unknown", node_layout.id().index()))
            })?;
            let label = Text::new(self.theme.node_label(), node.label());
            let icon = IconNode::new(node.icon(), self.theme.icon_size(), label);
            output.merge(icon.render_to_layers(node_layout.bounds().center()));
        }

        let title = Text::new(self.theme.title(), diagram.title());
        output.merge(title.render_to_layers(layout.title_center()));

        let mut document = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", canvas.width(), canvas.height()),
            )
            .set("width", canvas.width())
            .set("height", canvas.height());

        document = document.add(self.arrow_drawer.draw_marker_definitions());
        for group in output.render() {
            document = document.add(group);
        }

        debug!(title = diagram.title(); "SVG document rendered");
        Ok(document)
    }
}

/// Renders `diagram` laid out as `layout` to SVG text.
///
/// # Errors
///
/// See [`Svg::render`].
pub fn render_svg(
    diagram: &Diagram,
    layout: &DiagramLayout,
    theme: &Theme,
) -> Result<String, export::Error> {
    info!(title = diagram.title(); "Rendering SVG");
    let document = Svg::new(theme).render(diagram, layout)?;
    Ok(document.to_string())
}

/// Curve of one edge and, for one half of an opposite pair, the unit
/// vector pointing away from its twin.
struct EdgePath {
    curve: Curve,
    away: Option<Point>,
}

impl EdgePath {
    /// Center for a label of `size`. Labels of an opposite pair sit beside
    /// their own curve on the far side from the twin, so they never meet.
    fn label_center(&self, size: Size) -> Point {
        let midpoint = self.curve.midpoint();
        match self.away {
            Some(away) => {
                let half_extent =
                    (away.x().abs() * size.width() + away.y().abs() * size.height()) / 2.0;
                midpoint.add_point(away.scale(half_extent + LABEL_GAP))
            }
            None => midpoint,
        }
    }
}

/// Curve between the facing sides of the edge's endpoints.
fn edge_path(diagram: &Diagram, edge: &Edge, layout: &EdgeLayout) -> EdgePath {
    let (start, end, along_flow) = anchors(layout.source(), layout.target(), diagram.direction());
    let flows_horizontally = along_flow == diagram.direction().is_horizontal();
    let curve = Curve::along_flow(start, end, flows_horizontally);

    if !diagram.has_reverse_edge(edge) {
        return EdgePath { curve, away: None };
    }

    let sign = if edge.source().index() < edge.target().index() {
        1.0
    } else {
        -1.0
    };
    let away = if flows_horizontally {
        Point::new(0.0, sign)
    } else {
        Point::new(sign, 0.0)
    };
    EdgePath {
        curve: curve.translate(away.scale(REVERSE_EDGE_OFFSET)),
        away: Some(away),
    }
}

/// Box covered by the edge's label, if it has one.
fn label_box(theme: &Theme, edge: &Edge, path: &EdgePath) -> Option<Bounds> {
    let label = edge.label().filter(|label| !label.is_empty())?;
    let size = Text::new(theme.arrow().label(), label).calculate_size();
    Some(path.label_center(size).to_bounds(size))
}

/// Start and end anchors for an edge from `source` to `target`.
///
/// Anchors sit on the sides facing each other along the flow axis. When the
/// two endpoints overlap along that axis, the cross-axis sides are used and
/// the returned flag is `false`.
fn anchors(source: Bounds, target: Bounds, direction: Direction) -> (Point, Point, bool) {
    let (s, t) = (source.center(), target.center());

    if direction.is_horizontal() {
        if target.min_x() >= source.max_x() {
            (Point::new(source.max_x(), s.y()), Point::new(target.min_x(), t.y()), true)
        } else if target.max_x() <= source.min_x() {
            (Point::new(source.min_x(), s.y()), Point::new(target.max_x(), t.y()), true)
        } else if t.y() >= s.y() {
            (Point::new(s.x(), source.max_y()), Point::new(t.x(), target.min_y()), false)
        } else {
            (Point::new(s.x(), source.min_y()), Point::new(t.x(), target.max_y()), false)
        }
    } else if target.min_y() >= source.max_y() {
        (Point::new(s.x(), source.max_y()), Point::new(t.x(), target.min_y()), true)
    } else if target.max_y() <= source.min_y() {
        (Point::new(s.x(), source.min_y()), Point::new(t.x(), target.max_y()), true)
    } else if t.x() >= s.x() {
        (Point::new(source.max_x(), s.y()), Point::new(target.min_x(), t.y()), false)
    } else {
        (Point::new(source.min_x(), s.y()), Point::new(target.max_x(), t.y()), false)
    }
}

#[cfg(test)]
mod tests {
    use caffeine_diagrams_core::semantic::{Icon, LayoutEngine};
    use float_cmp::approx_eq;

    use super::*;
    use crate::{
        catalog, config::StyleConfig, layout::LayoutBuilder, structure::DiagramHierarchy,
    };

    fn render(diagram: &Diagram, style: &StyleConfig) -> String {
        let theme = Theme::from_style(style).unwrap();
        let hierarchy = DiagramHierarchy::from_diagram(diagram).unwrap();
        let layout = LayoutBuilder::new(&theme)
            .with_engine(LayoutEngine::Basic)
            .build(&hierarchy)
            .unwrap();
        render_svg(diagram, &layout, &theme).unwrap()
    }

    fn round_trip() -> Diagram {
        Diagram::build("Round Trip", "round_trip", Direction::TopBottom, |scope| {
            let (api, db) = scope.cluster("Backend", |c| {
                (c.node(Icon::FastApi, "api"), c.node(Icon::PostgreSql, "db"))
            });
            scope.connect_labeled(api, db, "저장");
            scope.connect_labeled(db, api, "응답");
        })
    }

    #[test]
    fn test_document_contains_every_element() {
        let svg = render(&round_trip(), &StyleConfig::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("viewBox="));
        assert!(svg.contains("data-layer=\"cluster\""));
        assert!(svg.contains("Backend"));
        assert!(svg.contains("저장"));
        assert!(svg.contains("응답"));
        assert!(svg.contains("Round Trip"));
        assert_eq!(svg.matches("data-icon=").count(), 2);
        assert_eq!(svg.matches("marker-end=").count(), 2);
    }

    #[test]
    fn test_one_marker_per_color() {
        let svg = render(&round_trip(), &StyleConfig::default());
        assert_eq!(svg.matches("<marker").count(), 1);
    }

    #[test]
    fn test_background_is_optional() {
        let svg = render(&round_trip(), &StyleConfig::default());
        assert!(!svg.contains("data-layer=\"background\""));
    }

    #[test]
    fn test_anchors_face_each_other() {
        let upper = Point::new(50.0, 50.0).to_bounds(Size::new(20.0, 20.0));
        let lower = Point::new(50.0, 150.0).to_bounds(Size::new(20.0, 20.0));

        let (start, end, along) = anchors(upper, lower, Direction::TopBottom);
        assert!(along);
        assert!(approx_eq!(f32, start.y(), 60.0));
        assert!(approx_eq!(f32, end.y(), 140.0));

        let (start, end, _) = anchors(lower, upper, Direction::TopBottom);
        assert!(approx_eq!(f32, start.y(), 140.0));
        assert!(approx_eq!(f32, end.y(), 60.0));
    }

    #[test]
    fn test_anchors_use_cross_sides_within_a_rank() {
        let left = Point::new(50.0, 50.0).to_bounds(Size::new(20.0, 20.0));
        let right = Point::new(150.0, 50.0).to_bounds(Size::new(20.0, 20.0));
        let (start, end, along) = anchors(left, right, Direction::TopBottom);
        assert!(!along);
        assert!(approx_eq!(f32, start.x(), 60.0));
        assert!(approx_eq!(f32, end.x(), 140.0));
    }

    #[test]
    fn test_opposite_edges_are_separated() {
        let diagram = round_trip();
        let theme = Theme::from_style(&StyleConfig::default()).unwrap();
        let hierarchy = DiagramHierarchy::from_diagram(&diagram).unwrap();
        let layout = LayoutBuilder::new(&theme).build(&hierarchy).unwrap();

        let there = edge_path(&diagram, &diagram.edges()[0], &layout.edges()[0]);
        let back = edge_path(&diagram, &diagram.edges()[1], &layout.edges()[1]);
        assert!(approx_eq!(
            f32,
            there.curve.midpoint().x() - back.curve.midpoint().x(),
            2.0 * REVERSE_EDGE_OFFSET,
            epsilon = 0.01
        ));
    }

    #[test]
    fn test_opposite_labels_sit_on_either_side() {
        let diagram = round_trip();
        let theme = Theme::from_style(&StyleConfig::default()).unwrap();
        let hierarchy = DiagramHierarchy::from_diagram(&diagram).unwrap();
        let layout = LayoutBuilder::new(&theme).build(&hierarchy).unwrap();

        let there = edge_path(&diagram, &diagram.edges()[0], &layout.edges()[0]);
        let back = edge_path(&diagram, &diagram.edges()[1], &layout.edges()[1]);
        let there_label = label_box(&theme, &diagram.edges()[0], &there).unwrap();
        let back_label = label_box(&theme, &diagram.edges()[1], &back).unwrap();

        assert!(there_label.min_x() > there.curve.midpoint().x());
        assert!(back_label.max_x() < back.curve.midpoint().x());
        assert!(!there_label.intersects(&back_label));
    }

    #[test]
    fn test_data_flow_labels_do_not_overlap() {
        let entry = catalog::caffeine_diagrams()
            .into_iter()
            .find(|entry| entry.id() == "data_flow")
            .unwrap();
        let diagram = entry.diagram();
        let theme = Theme::from_style(&StyleConfig::default()).unwrap();
        let hierarchy = DiagramHierarchy::from_diagram(diagram).unwrap();
        let layout = LayoutBuilder::new(&theme).build(&hierarchy).unwrap();

        let labels: Vec<(&str, Bounds)> = layout
            .edges()
            .iter()
            .filter_map(|edge_layout| {
                let edge = &diagram.edges()[edge_layout.id().index()];
                let path = edge_path(diagram, edge, edge_layout);
                Some((edge.label()?, label_box(&theme, edge, &path)?))
            })
            .collect();
        assert_eq!(labels.len(), 8);

        for (i, (a, a_box)) in labels.iter().enumerate() {
            for (b, b_box) in &labels[i + 1..] {
                assert!(!a_box.intersects(b_box), "labels `{a}` and `{b}` overlap");
            }
        }
    }
}
