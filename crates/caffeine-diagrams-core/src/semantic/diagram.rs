//! Diagram, cluster, node and edge types.

use std::collections::HashSet;

use thiserror::Error;

use super::{Direction, Icon};

/// Index of a [`Node`] within its [`Diagram`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Index of a [`Cluster`] within its [`Diagram`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub(crate) usize);

/// Index of an [`Edge`] within its [`Diagram`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl ClusterId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Validation failures of a [`Diagram`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiagramError {
    #[error("diagram filename must not be empty")]
    EmptyFilename,

    #[error("diagram filename `{0}` must not contain path separators")]
    FilenameHasSeparator(String),

    #[error("edge {edge} references unknown node {node}")]
    UnknownNode { edge: usize, node: usize },

    #[error("node {node} references unknown cluster {cluster}")]
    UnknownNodeCluster { node: usize, cluster: usize },

    #[error("cluster {cluster} references unknown parent {parent}")]
    UnknownParent { cluster: usize, parent: usize },

    #[error("cluster `{0}` is nested inside itself")]
    ClusterCycle(String),
}

/// A labeled icon standing in for an architectural component
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    icon: Icon,
    label: String,
    cluster: Option<ClusterId>,
}

impl Node {
    pub fn new(id: NodeId, icon: Icon, label: String, cluster: Option<ClusterId>) -> Self {
        Self {
            id,
            icon,
            label,
            cluster,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn icon(&self) -> Icon {
        self.icon
    }

    /// Label text; lines are separated by `\n`
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The innermost cluster holding this node, if any
    pub fn cluster(&self) -> Option<ClusterId> {
        self.cluster
    }
}

/// A titled group of nodes and nested clusters
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    id: ClusterId,
    title: String,
    parent: Option<ClusterId>,
    nodes_before: usize,
}

impl Cluster {
    /// Creates a cluster declared after `nodes_before` nodes of the diagram.
    pub fn new(
        id: ClusterId,
        title: String,
        parent: Option<ClusterId>,
        nodes_before: usize,
    ) -> Self {
        Self {
            id,
            title,
            parent,
            nodes_before,
        }
    }

    pub fn id(&self) -> ClusterId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The enclosing cluster, or `None` for top-level clusters
    pub fn parent(&self) -> Option<ClusterId> {
        self.parent
    }

    /// Number of nodes declared before this cluster.
    ///
    /// Orders a cluster among its sibling nodes: it comes after node `n` iff
    /// `n < nodes_before`.
    pub fn nodes_before(&self) -> usize {
        self.nodes_before
    }
}

/// A directed connector between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    label: Option<String>,
}

impl Edge {
    pub fn new(id: EdgeId, source: NodeId, target: NodeId, label: Option<String>) -> Self {
        Self {
            id,
            source,
            target,
            label,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// A complete diagram description.
///
/// Nodes, clusters and edges are stored in declaration order; their ids are
/// positions in those lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    title: String,
    filename: String,
    direction: Direction,
    nodes: Vec<Node>,
    clusters: Vec<Cluster>,
    edges: Vec<Edge>,
}

impl Diagram {
    /// Creates an empty diagram.
    ///
    /// `filename` is the output file stem, without directory or extension.
    pub fn new(title: impl Into<String>, filename: impl Into<String>, direction: Direction) -> Self {
        Self {
            title: title.into(),
            filename: filename.into(),
            direction,
            nodes: Vec::new(),
            clusters: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id.0)
    }

    /// Appends a node and returns its id
    pub fn add_node(&mut self, icon: Icon, label: String, cluster: Option<ClusterId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(id, icon, label, cluster));
        id
    }

    /// Appends a cluster and returns its id
    pub fn add_cluster(&mut self, title: String, parent: Option<ClusterId>) -> ClusterId {
        let id = ClusterId(self.clusters.len());
        self.clusters
            .push(Cluster::new(id, title, parent, self.nodes.len()));
        id
    }

    /// Appends an edge and returns its id
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, label: Option<String>) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge::new(id, source, target, label));
        id
    }

    /// Returns the chain of clusters enclosing `node`, innermost first.
    pub fn cluster_chain(&self, node: NodeId) -> Vec<ClusterId> {
        let mut chain = Vec::new();
        let mut current = self.node(node).and_then(Node::cluster);
        while let Some(id) = current {
            if chain.contains(&id) {
                break;
            }
            chain.push(id);
            current = self.cluster(id).and_then(Cluster::parent);
        }
        chain
    }

    /// Number of clusters enclosing `cluster`
    pub fn cluster_depth(&self, cluster: ClusterId) -> usize {
        let mut depth = 0;
        let mut current = self.cluster(cluster).and_then(Cluster::parent);
        while let Some(id) = current {
            depth += 1;
            if depth > self.clusters.len() {
                break;
            }
            current = self.cluster(id).and_then(Cluster::parent);
        }
        depth
    }

    /// True when an edge from `target` back to `source` also exists
    pub fn has_reverse_edge(&self, edge: &Edge) -> bool {
        self.edges
            .iter()
            .any(|other| other.source == edge.target && other.target == edge.source)
    }

    /// Checks the structural invariants of the diagram.
    ///
    /// # Errors
    ///
    /// Returns a [`DiagramError`] if the filename is empty or contains a path
    /// separator, if an edge or node references an unknown id, or if the
    /// cluster nesting forms a cycle.
    pub fn validate(&self) -> Result<(), DiagramError> {
        if self.filename.is_empty() {
            return Err(DiagramError::EmptyFilename);
        }
        if self.filename.contains(['/', '\\']) {
            return Err(DiagramError::FilenameHasSeparator(self.filename.clone()));
        }

        for node in &self.nodes {
            match node.cluster {
                Some(cluster) if cluster.0 >= self.clusters.len() => {
                    return Err(DiagramError::UnknownNodeCluster {
                        node: node.id.0,
                        cluster: cluster.0,
                    });
                }
                _ => {}
            }
        }

        for edge in &self.edges {
            for endpoint in [edge.source, edge.target] {
                if endpoint.0 >= self.nodes.len() {
                    return Err(DiagramError::UnknownNode {
                        edge: edge.id.0,
                        node: endpoint.0,
                    });
                }
            }
        }

        for cluster in &self.clusters {
            let mut seen = HashSet::from([cluster.id]);
            let mut current = cluster.parent;
            while let Some(parent) = current {
                let Some(parent_cluster) = self.cluster(parent) else {
                    return Err(DiagramError::UnknownParent {
                        cluster: cluster.id.0,
                        parent: parent.0,
                    });
                };
                if !seen.insert(parent) {
                    return Err(DiagramError::ClusterCycle(cluster.title.clone()));
                }
                current = parent_cluster.parent;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_diagram() -> Diagram {
        let mut diagram = Diagram::new("Test", "test", Direction::TopBottom);
        let outer = diagram.add_cluster("Outer".to_string(), None);
        let inner = diagram.add_cluster("Inner".to_string(), Some(outer));
        let a = diagram.add_node(Icon::Users, "A".to_string(), None);
        let b = diagram.add_node(Icon::Server, "B".to_string(), Some(inner));
        diagram.add_edge(a, b, None);
        diagram.add_edge(b, a, Some("back".to_string()));
        diagram
    }

    #[test]
    fn test_validate_accepts_well_formed_diagram() {
        assert_eq!(two_node_diagram().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_filename() {
        let diagram = Diagram::new("Test", "", Direction::default());
        assert_eq!(diagram.validate(), Err(DiagramError::EmptyFilename));

        let diagram = Diagram::new("Test", "out/test", Direction::default());
        assert!(matches!(
            diagram.validate(),
            Err(DiagramError::FilenameHasSeparator(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_edge_endpoint() {
        let mut diagram = Diagram::new("Test", "test", Direction::default());
        let a = diagram.add_node(Icon::Rack, "A".to_string(), None);
        diagram.add_edge(a, NodeId(7), None);
        assert_eq!(
            diagram.validate(),
            Err(DiagramError::UnknownNode { edge: 0, node: 7 })
        );
    }

    #[test]
    fn test_validate_rejects_cluster_cycle() {
        let mut diagram = Diagram::new("Test", "test", Direction::default());
        diagram.add_cluster("A".to_string(), Some(ClusterId(1)));
        diagram.add_cluster("B".to_string(), Some(ClusterId(0)));
        assert!(matches!(
            diagram.validate(),
            Err(DiagramError::ClusterCycle(_))
        ));
    }

    #[test]
    fn test_cluster_chain_and_depth() {
        let diagram = two_node_diagram();
        assert_eq!(
            diagram.cluster_chain(NodeId(1)),
            vec![ClusterId(1), ClusterId(0)]
        );
        assert!(diagram.cluster_chain(NodeId(0)).is_empty());
        assert_eq!(diagram.cluster_depth(ClusterId(0)), 0);
        assert_eq!(diagram.cluster_depth(ClusterId(1)), 1);
    }

    #[test]
    fn test_has_reverse_edge() {
        let diagram = two_node_diagram();
        assert!(diagram.has_reverse_edge(&diagram.edges()[0]));

        let mut one_way = Diagram::new("Test", "test", Direction::default());
        let a = one_way.add_node(Icon::Rack, "A".to_string(), None);
        let b = one_way.add_node(Icon::Rack, "B".to_string(), None);
        one_way.add_edge(a, b, None);
        assert!(!one_way.has_reverse_edge(&one_way.edges()[0]));
    }
}
