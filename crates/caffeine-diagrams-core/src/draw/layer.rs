//! Z-ordering of drawable output.
//!
//! A drawable does not write into the document directly: it tags each SVG
//! node with a [`RenderLayer`]. The exporter collects everything into one
//! [`LayeredOutput`] and flattens it, so edge labels always cover edges and
//! edges always cover cluster frames, whatever order the elements were drawn in.
//!
//! ```
//! # use caffeine_diagrams_core::draw::{RenderLayer, LayeredOutput};
//! # use svg::node::element::{Rectangle, Text};
//! let mut output = LayeredOutput::new();
//! output.add_to_layer(RenderLayer::Text, Box::new(Text::new("API Call")));
//! output.add_to_layer(RenderLayer::Cluster, Box::new(Rectangle::new()));
//!
//! assert_eq!(output.render().len(), 2);
//! ```

use std::collections::BTreeMap;

use svg::node::element::Group;

pub type SvgNode = Box<dyn svg::Node>;

/// Paint order, bottom first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    Background,
    /// Cluster frames, outer clusters first
    Cluster,
    Arrow,
    /// Node icons
    Content,
    /// Labels and the diagram title
    Text,
}

impl RenderLayer {
    /// Value of the `data-layer` attribute on the layer's group.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Cluster => "cluster",
            Self::Arrow => "arrow",
            Self::Content => "content",
            Self::Text => "text",
        }
    }
}

#[derive(Debug, Default)]
pub struct LayeredOutput {
    layers: BTreeMap<RenderLayer, Vec<SvgNode>>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.layers.entry(layer).or_default().push(node);
    }

    /// Moves every node of `other` on top of the nodes already in its layer.
    pub fn merge(&mut self, other: LayeredOutput) {
        for (layer, nodes) in other.layers {
            self.layers.entry(layer).or_default().extend(nodes);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// One `<g data-layer="…">` per non-empty layer, bottom layer first.
    /// Inside a group, nodes keep the order they were added in.
    pub fn render(self) -> Vec<SvgNode> {
        self.layers
            .into_iter()
            .map(|(layer, nodes)| {
                let group = nodes
                    .into_iter()
                    .fold(Group::new().set("data-layer", layer.name()), Group::add);
                Box::new(group) as SvgNode
            })
            .collect()
    }
}
