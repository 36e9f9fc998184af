//! Declarative construction of diagrams.
//!
//! ```
//! use caffeine_diagrams_core::semantic::{Diagram, Direction, Icon};
//!
//! let diagram = Diagram::build("Web Service", "web_service", Direction::TopBottom, |scope| {
//!     let users = scope.node(Icon::Users, "Users");
//!     let (lb, api) = scope.cluster("Backend", |backend| {
//!         (
//!             backend.node(Icon::Alb, "Load Balancer"),
//!             backend.node(Icon::FastApi, "API"),
//!         )
//!     });
//!     let db = scope.node(Icon::PostgreSql, "Database");
//!
//!     scope.chain(&[users, lb, api]);
//!     scope.connect_labeled(api, db, "stores to");
//! });
//!
//! assert_eq!(diagram.nodes().len(), 4);
//! assert_eq!(diagram.clusters().len(), 1);
//! assert_eq!(diagram.edges().len(), 3);
//! ```

use super::{ClusterId, Diagram, Direction, EdgeId, Icon, NodeId};

/// Declares nodes, clusters and edges inside one scope of a diagram.
///
/// Nodes declared through a builder belong to the builder's cluster. Edges
/// may connect any two nodes of the diagram, whichever scope declared them.
pub struct ScopeBuilder<'d> {
    diagram: &'d mut Diagram,
    cluster: Option<ClusterId>,
}

impl Diagram {
    /// Builds a diagram by running `declare` against its top-level scope.
    pub fn build<F>(
        title: impl Into<String>,
        filename: impl Into<String>,
        direction: Direction,
        declare: F,
    ) -> Self
    where
        F: FnOnce(&mut ScopeBuilder<'_>),
    {
        let mut diagram = Diagram::new(title, filename, direction);
        let mut scope = ScopeBuilder {
            diagram: &mut diagram,
            cluster: None,
        };
        declare(&mut scope);
        diagram
    }
}

impl<'d> ScopeBuilder<'d> {
    /// Declares a node in this scope
    pub fn node(&mut self, icon: Icon, label: impl Into<String>) -> NodeId {
        self.diagram.add_node(icon, label.into(), self.cluster)
    }

    /// Declares a nested cluster and runs `declare` inside it.
    ///
    /// Whatever `declare` returns is handed back, typically the ids of the
    /// nodes declared inside.
    pub fn cluster<R, F>(&mut self, title: impl Into<String>, declare: F) -> R
    where
        F: FnOnce(&mut ScopeBuilder<'_>) -> R,
    {
        let cluster = self.diagram.add_cluster(title.into(), self.cluster);
        let mut inner = ScopeBuilder {
            diagram: &mut *self.diagram,
            cluster: Some(cluster),
        };
        declare(&mut inner)
    }

    /// Adds an unlabeled edge
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> EdgeId {
        self.diagram.add_edge(source, target, None)
    }

    /// Adds an edge carrying a label
    pub fn connect_labeled(
        &mut self,
        source: NodeId,
        target: NodeId,
        label: impl Into<String>,
    ) -> EdgeId {
        self.diagram.add_edge(source, target, Some(label.into()))
    }

    /// Connects consecutive nodes: `a -> b -> c`
    pub fn chain(&mut self, nodes: &[NodeId]) {
        for pair in nodes.windows(2) {
            self.connect(pair[0], pair[1]);
        }
    }

    /// Connects `source` to every node of `targets`, in order
    pub fn fan_out(&mut self, source: NodeId, targets: &[NodeId]) {
        for &target in targets {
            self.connect(source, target);
        }
    }

    /// Connects every node of `sources` to `target`, in order
    pub fn fan_in(&mut self, sources: &[NodeId], target: NodeId) {
        for &source in sources {
            self.connect(source, target);
        }
    }
}
