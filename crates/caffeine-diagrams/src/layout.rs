//! Layered layout of a diagram hierarchy.
//!
//! Each scope is ranked by a layout engine and placed along the flow axis of
//! the diagram's direction. Scopes are processed innermost first so that a
//! cluster is sized by its laid-out content before its parent scope places
//! it. Absolute positions are then resolved from the root downwards.

mod engines;
mod positioning;

pub use engines::Ranking;

use std::collections::HashMap;

use log::{debug, info};

use caffeine_diagrams_core::{
    draw::{Drawable, IconNode, TITLE_INSET, Text},
    geometry::{Bounds, Point, Size},
    semantic::{ClusterId, Diagram, EdgeId, LayoutEngine, NodeId},
};

use crate::{
    error::CaffeineError,
    structure::{DiagramHierarchy, ScopeItem},
    theme::Theme,
};

use positioning::Placement;

/// Space between a cluster frame and its content
const CLUSTER_PADDING: f32 = 20.0;

/// Empty border around the whole canvas
const MARGIN: f32 = 30.0;

/// Final bounds of a node, icon and label included
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    id: NodeId,
    bounds: Bounds,
}

impl NodeLayout {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Final frame of a cluster and its nesting depth (0 for top-level clusters)
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterLayout {
    id: ClusterId,
    bounds: Bounds,
    depth: usize,
}

impl ClusterLayout {
    pub fn id(&self) -> ClusterId {
        self.id
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Endpoints of an edge: the bounds of its source and target nodes
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLayout {
    id: EdgeId,
    source: Bounds,
    target: Bounds,
}

impl EdgeLayout {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn source(&self) -> Bounds {
        self.source
    }

    pub fn target(&self) -> Bounds {
        self.target
    }
}

/// A fully positioned diagram, in canvas coordinates
#[derive(Debug, Clone)]
pub struct DiagramLayout {
    nodes: Vec<NodeLayout>,
    clusters: Vec<ClusterLayout>,
    edges: Vec<EdgeLayout>,
    canvas: Size,
    title_center: Point,
}

impl DiagramLayout {
    /// Nodes in declaration order
    pub fn nodes(&self) -> &[NodeLayout] {
        &self.nodes
    }

    /// Clusters in declaration order
    pub fn clusters(&self) -> &[ClusterLayout] {
        &self.clusters
    }

    /// Edges in declaration order
    pub fn edges(&self) -> &[EdgeLayout] {
        &self.edges
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Center of the diagram title, in the band below the content
    pub fn title_center(&self) -> Point {
        self.title_center
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeLayout> {
        self.nodes.get(id.index())
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&ClusterLayout> {
        self.clusters.get(id.index())
    }
}

/// Builder for computing diagram layouts.
pub struct LayoutBuilder<'t> {
    theme: &'t Theme,
    engine: LayoutEngine,
    node_spacing: f32,
    rank_spacing: f32,
}

impl<'t> LayoutBuilder<'t> {
    pub fn new(theme: &'t Theme) -> Self {
        Self {
            theme,
            engine: LayoutEngine::default(),
            node_spacing: 50.0,
            rank_spacing: 80.0,
        }
    }

    pub fn with_engine(mut self, engine: LayoutEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Set the gap between neighbouring items of a rank
    pub fn with_node_spacing(mut self, spacing: f32) -> Self {
        self.node_spacing = spacing;
        self
    }

    /// Set the gap between consecutive ranks
    pub fn with_rank_spacing(mut self, spacing: f32) -> Self {
        self.rank_spacing = spacing;
        self
    }

    /// Lays out every scope of `hierarchy` and resolves absolute bounds.
    ///
    /// # Errors
    ///
    /// Returns [`CaffeineError::Layout`] if a cluster scope is missing from the
    /// hierarchy.
    pub fn build(&self, hierarchy: &DiagramHierarchy) -> Result<DiagramLayout, CaffeineError> {
        let diagram = hierarchy.diagram();
        let engine = engines::engine(self.engine);
        info!(
            engine = self.engine.as_str(),
            direction = diagram.direction().as_str(),
            scopes = hierarchy.scopes().len();
            "Calculating layout"
        );

        let node_sizes = self.node_sizes(diagram);
        let mut cluster_sizes: HashMap<ClusterId, Size> = HashMap::new();
        let mut placements: HashMap<Option<ClusterId>, (Vec<ScopeItem>, Placement)> =
            HashMap::new();

        for scope in hierarchy.scopes() {
            let items: Vec<ScopeItem> = scope.items().collect();
            let sizes = items
                .iter()
                .map(|item| match item {
                    ScopeItem::Node(id) => node_sizes.get(id.index()).copied().ok_or_else(|| {
                        CaffeineError::Layout(format!("node {} has no size", id.index()))
                    }),
                    ScopeItem::Cluster(id) => cluster_sizes.get(id).copied().ok_or_else(|| {
                        CaffeineError::Layout(format!(
                            "cluster {} laid out after its parent",
                            id.index()
                        ))
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;

            let ranking = engine.rank(scope);
            let placement = positioning::place(
                &ranking,
                &sizes,
                diagram.direction(),
                self.node_spacing,
                self.rank_spacing,
            );
            debug!(
                container:? = scope.container().map(ClusterId::index),
                ranks = ranking.len(),
                width = placement.size().width(),
                height = placement.size().height();
                "Scope placed"
            );

            if let Some(cluster) = scope.container() {
                let title = diagram.cluster(cluster).map(|c| c.title()).unwrap_or_default();
                cluster_sizes.insert(cluster, self.cluster_size(title, placement.size()));
            }
            placements.insert(scope.container(), (items, placement));
        }

        let root_size = placements
            .get(&None)
            .map(|(_, placement)| placement.size())
            .unwrap_or_default();
        let title = Text::new(self.theme.title(), diagram.title());
        let title_size = title.calculate_size();

        let content_width = root_size.width().max(title_size.width());
        let canvas = Size::new(
            content_width + 2.0 * MARGIN,
            root_size.height() + title_size.height() + 3.0 * MARGIN,
        );
        let title_center = Point::new(
            canvas.width() / 2.0,
            2.0 * MARGIN + root_size.height() + title_size.height() / 2.0,
        );

        let mut node_bounds: Vec<Option<Bounds>> = vec![None; diagram.nodes().len()];
        let mut cluster_bounds: Vec<Option<Bounds>> = vec![None; diagram.clusters().len()];

        let root_origin = Point::new((canvas.width() - root_size.width()) / 2.0, MARGIN);
        let mut pending = vec![(None, root_origin)];
        while let Some((container, origin)) = pending.pop() {
            let Some((items, placement)) = placements.get(&container) else {
                return Err(CaffeineError::Layout(format!(
                    "no placement for scope {container:?}"
                )));
            };
            for (position, item) in items.iter().enumerate() {
                let center = origin.add_point(placement.center(position));
                match item {
                    ScopeItem::Node(id) => {
                        let size = node_sizes[id.index()];
                        node_bounds[id.index()] = Some(center.to_bounds(size));
                    }
                    ScopeItem::Cluster(id) => {
                        let size = cluster_sizes.get(id).copied().unwrap_or_default();
                        let bounds = center.to_bounds(size);
                        cluster_bounds[id.index()] = Some(bounds);

                        let content = placements
                            .get(&Some(*id))
                            .map(|(_, placement)| placement.size())
                            .unwrap_or_default();
                        let content_origin = self.content_origin(diagram, *id, bounds, content);
                        pending.push((Some(*id), content_origin));
                    }
                }
            }
        }

        let nodes = diagram
            .nodes()
            .iter()
            .map(|node| {
                node_bounds[node.id().index()]
                    .map(|bounds| NodeLayout {
                        id: node.id(),
                        bounds,
                    })
                    .ok_or_else(|| {
                        CaffeineError::Layout(format!("node `{}` was not placed", node.label()))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let clusters = diagram
            .clusters()
            .iter()
            .map(|cluster| {
                cluster_bounds[cluster.id().index()]
                    .map(|bounds| ClusterLayout {
                        id: cluster.id(),
                        bounds,
                        depth: diagram.cluster_depth(cluster.id()),
                    })
                    .ok_or_else(|| {
                        CaffeineError::Layout(format!("cluster `{}` was not placed", cluster.title()))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let edges = diagram
            .edges()
            .iter()
            .map(|edge| EdgeLayout {
                id: edge.id(),
                source: nodes[edge.source().index()].bounds,
                target: nodes[edge.target().index()].bounds,
            })
            .collect();

        info!(
            width = canvas.width(),
            height = canvas.height(),
            nodes = diagram.nodes().len(),
            clusters = diagram.clusters().len();
            "Layout calculated"
        );

        Ok(DiagramLayout {
            nodes,
            clusters,
            edges,
            canvas,
            title_center,
        })
    }

    fn node_sizes(&self, diagram: &Diagram) -> Vec<Size> {
        diagram
            .nodes()
            .iter()
            .map(|node| {
                let label = Text::new(self.theme.node_label(), node.label());
                IconNode::new(node.icon(), self.theme.icon_size(), label).size()
            })
            .collect()
    }

    /// Frame size for a cluster holding `content`.
    fn cluster_size(&self, title: &str, content: Size) -> Size {
        let definition = self.theme.cluster();
        let title_width = Text::new(definition.title(), title).calculate_size().width();
        Size::new(
            (content.width() + 2.0 * CLUSTER_PADDING)
                .max(title_width + 2.0 * TITLE_INSET),
            content.height() + 2.0 * CLUSTER_PADDING + definition.title_band(title),
        )
    }

    /// Top-left corner of a cluster's content, centered below the title band.
    fn content_origin(
        &self,
        diagram: &Diagram,
        cluster: ClusterId,
        bounds: Bounds,
        content: Size,
    ) -> Point {
        let title = diagram.cluster(cluster).map(|c| c.title()).unwrap_or_default();
        let band = self.theme.cluster().title_band(title);
        Point::new(
            bounds.min_x() + (bounds.width() - content.width()) / 2.0,
            bounds.min_y() + CLUSTER_PADDING + band,
        )
    }
}
