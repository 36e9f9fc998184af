//! Scope hierarchy of a diagram.
//!
//! Layout works one scope at a time: the root scope and one scope per
//! cluster. The items of a scope are its direct nodes and its direct child
//! clusters. A child cluster is a single opaque item whose size is known once
//! its own scope has been laid out, which is why scopes are stored in
//! post-order (innermost first).
//!
//! Each diagram edge is lifted to the innermost scope containing both of its
//! endpoints, where it connects the two items enclosing them.

use std::collections::HashMap;

use log::{debug, trace};
use petgraph::graph::{DiGraph, NodeIndex};

use caffeine_diagrams_core::semantic::{ClusterId, Diagram, DiagramError, EdgeId, NodeId};

/// An entry of a scope: a node or a nested cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeItem {
    Node(NodeId),
    Cluster(ClusterId),
}

/// One level of the containment hierarchy
///
/// Graph node weights are the scope's items in declaration order. Edge
/// weights list the diagram edges lifted onto that pair of items.
#[derive(Debug)]
pub struct Scope {
    container: Option<ClusterId>,
    graph: DiGraph<ScopeItem, Vec<EdgeId>>,
    indices: HashMap<ScopeItem, NodeIndex>,
}

impl Scope {
    fn new(container: Option<ClusterId>, items: Vec<ScopeItem>) -> Self {
        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();
        for item in items {
            indices.insert(item, graph.add_node(item));
        }
        Self {
            container,
            graph,
            indices,
        }
    }

    /// The cluster this scope lays out, `None` for the root scope
    pub fn container(&self) -> Option<ClusterId> {
        self.container
    }

    pub fn graph(&self) -> &DiGraph<ScopeItem, Vec<EdgeId>> {
        &self.graph
    }

    /// Items in declaration order
    pub fn items(&self) -> impl Iterator<Item = ScopeItem> + '_ {
        self.graph.node_weights().copied()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn index_of(&self, item: ScopeItem) -> Option<NodeIndex> {
        self.indices.get(&item).copied()
    }

    /// Distinct item pairs connected in this scope, in first-declaration order
    pub fn connections(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.graph.edge_indices().filter_map(|edge| self.graph.edge_endpoints(edge))
    }

    fn lift_edge(&mut self, source: ScopeItem, target: ScopeItem, edge: EdgeId) {
        if source == target {
            return;
        }
        let (Some(a), Some(b)) = (self.index_of(source), self.index_of(target)) else {
            return;
        };
        match self.graph.find_edge(a, b) {
            Some(existing) => self.graph[existing].push(edge),
            None => {
                self.graph.add_edge(a, b, vec![edge]);
            }
        }
    }
}

/// All scopes of a diagram, innermost first; the root scope is last.
#[derive(Debug)]
pub struct DiagramHierarchy<'a> {
    diagram: &'a Diagram,
    scopes: Vec<Scope>,
}

impl<'a> DiagramHierarchy<'a> {
    /// Validates `diagram` and builds its scope hierarchy.
    ///
    /// # Errors
    ///
    /// Returns the [`DiagramError`] found by [`Diagram::validate`].
    pub fn from_diagram(diagram: &'a Diagram) -> Result<Self, DiagramError> {
        diagram.validate()?;

        let order = post_order(diagram);
        let mut scopes: Vec<Scope> = order
            .iter()
            .map(|container| Scope::new(*container, scope_items(diagram, *container)))
            .collect();
        let positions: HashMap<Option<ClusterId>, usize> = order
            .iter()
            .enumerate()
            .map(|(position, container)| (*container, position))
            .collect();

        for edge in diagram.edges() {
            let (scope, source, target) = lift(diagram, edge.source(), edge.target());
            if let Some(&position) = positions.get(&scope) {
                scopes[position].lift_edge(source, target, edge.id());
            }
        }

        for scope in &scopes {
            trace!(
                container:? = scope.container(),
                items = scope.len(),
                connections = scope.graph().edge_count();
                "Scope built"
            );
        }
        debug!(scopes = scopes.len(); "Diagram hierarchy built");

        Ok(Self { diagram, scopes })
    }

    pub fn diagram(&self) -> &'a Diagram {
        self.diagram
    }

    /// Scopes in post-order: every cluster scope precedes its parent's scope.
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn root(&self) -> Option<&Scope> {
        self.scopes.last()
    }
}

/// Items directly inside `container`, nodes and clusters interleaved as declared.
fn scope_items(diagram: &Diagram, container: Option<ClusterId>) -> Vec<ScopeItem> {
    let mut keyed: Vec<((usize, u8), ScopeItem)> = Vec::new();
    for node in diagram.nodes().iter().filter(|n| n.cluster() == container) {
        keyed.push(((node.id().index(), 1), ScopeItem::Node(node.id())));
    }
    for cluster in diagram.clusters().iter().filter(|c| c.parent() == container) {
        keyed.push(((cluster.nodes_before(), 0), ScopeItem::Cluster(cluster.id())));
    }
    keyed.sort_by_key(|(key, _)| *key);
    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Containers ordered children before parents, root (`None`) last.
fn post_order(diagram: &Diagram) -> Vec<Option<ClusterId>> {
    fn visit(diagram: &Diagram, container: Option<ClusterId>, out: &mut Vec<Option<ClusterId>>) {
        for cluster in diagram
            .clusters()
            .iter()
            .filter(|cluster| cluster.parent() == container)
        {
            visit(diagram, Some(cluster.id()), out);
        }
        out.push(container);
    }

    let mut order = Vec::with_capacity(diagram.clusters().len() + 1);
    visit(diagram, None, &mut order);
    order
}

/// Finds the innermost scope holding both endpoints and the items enclosing them there.
fn lift(
    diagram: &Diagram,
    source: NodeId,
    target: NodeId,
) -> (Option<ClusterId>, ScopeItem, ScopeItem) {
    // Chains run outermost first, starting at the root scope
    let chain = |node: NodeId| {
        let mut chain: Vec<Option<ClusterId>> = vec![None];
        chain.extend(diagram.cluster_chain(node).into_iter().rev().map(Some));
        chain
    };
    let source_chain = chain(source);
    let target_chain = chain(target);

    let common = source_chain
        .iter()
        .zip(&target_chain)
        .take_while(|(a, b)| a == b)
        .count();
    let scope = source_chain[common - 1];

    let item = |chain: &[Option<ClusterId>], node: NodeId| match chain.get(common) {
        Some(Some(cluster)) => ScopeItem::Cluster(*cluster),
        _ => ScopeItem::Node(node),
    };

    (
        scope,
        item(&source_chain, source),
        item(&target_chain, target),
    )
}

#[cfg(test)]
mod tests {
    use caffeine_diagrams_core::semantic::{Direction, Icon};

    use super::*;

    fn nested() -> Diagram {
        Diagram::build("Nested", "nested", Direction::TopBottom, |scope| {
            let users = scope.node(Icon::Users, "users");
            let (api, db) = scope.cluster("Backend", |backend| {
                let api = backend.node(Icon::FastApi, "api");
                let db = backend.cluster("Storage", |storage| {
                    storage.node(Icon::PostgreSql, "db")
                });
                (api, db)
            });
            let slack = scope.node(Icon::Slack, "slack");

            scope.connect(users, api);
            scope.connect(api, db);
            scope.connect(db, slack);
            scope.connect(db, slack);
            scope.connect(api, api);
        })
    }

    fn node(diagram: &Diagram, index: usize) -> ScopeItem {
        ScopeItem::Node(diagram.nodes()[index].id())
    }

    fn cluster(diagram: &Diagram, index: usize) -> ScopeItem {
        ScopeItem::Cluster(diagram.clusters()[index].id())
    }

    #[test]
    fn test_scopes_are_post_ordered() {
        let diagram = nested();
        let hierarchy = DiagramHierarchy::from_diagram(&diagram).unwrap();
        let containers: Vec<_> = hierarchy
            .scopes()
            .iter()
            .map(|scope| scope.container().map(ClusterId::index))
            .collect();
        assert_eq!(containers, vec![Some(1), Some(0), None]);
    }

    #[test]
    fn test_items_keep_declaration_order() {
        let diagram = nested();
        let hierarchy = DiagramHierarchy::from_diagram(&diagram).unwrap();
        let root: Vec<_> = hierarchy.root().unwrap().items().collect();
        assert_eq!(
            root,
            vec![node(&diagram, 0), cluster(&diagram, 0), node(&diagram, 3)]
        );

        let backend: Vec<_> = hierarchy.scopes()[1].items().collect();
        assert_eq!(backend, vec![node(&diagram, 1), cluster(&diagram, 1)]);
    }

    #[test]
    fn test_edges_are_lifted_to_innermost_common_scope() {
        let diagram = nested();
        let hierarchy = DiagramHierarchy::from_diagram(&diagram).unwrap();
        let [storage, backend, root] = hierarchy.scopes() else {
            panic!("expected three scopes");
        };

        assert_eq!(storage.graph().edge_count(), 0);

        // api -> db stays inside Backend and targets the Storage cluster
        let api = backend.index_of(node(&diagram, 1)).unwrap();
        let storage_item = backend.index_of(cluster(&diagram, 1)).unwrap();
        assert!(backend.graph().find_edge(api, storage_item).is_some());

        // users -> api and db -> slack attach to the Backend cluster item
        let connections: Vec<_> = root
            .connections()
            .map(|(a, b)| (root.graph()[a], root.graph()[b]))
            .collect();
        assert_eq!(
            connections,
            vec![
                (node(&diagram, 0), cluster(&diagram, 0)),
                (cluster(&diagram, 0), node(&diagram, 3)),
            ]
        );
    }

    #[test]
    fn test_duplicates_merge_and_self_loops_drop() {
        let diagram = nested();
        let hierarchy = DiagramHierarchy::from_diagram(&diagram).unwrap();
        let root = hierarchy.root().unwrap();
        let backend_item = root.index_of(cluster(&diagram, 0)).unwrap();
        let slack = root.index_of(node(&diagram, 3)).unwrap();
        let edge = root.graph().find_edge(backend_item, slack).unwrap();
        assert_eq!(root.graph()[edge].len(), 2);

        let backend = &hierarchy.scopes()[1];
        assert_eq!(backend.graph().edge_count(), 1);
    }

    #[test]
    fn test_invalid_diagram_is_rejected() {
        let diagram = Diagram::new("Bad", "", Direction::default());
        assert!(DiagramHierarchy::from_diagram(&diagram).is_err());
    }

    #[test]
    fn test_empty_diagram_has_root_scope() {
        let diagram = Diagram::new("Empty", "empty", Direction::default());
        let hierarchy = DiagramHierarchy::from_diagram(&diagram).unwrap();
        assert_eq!(hierarchy.scopes().len(), 1);
        assert!(hierarchy.root().unwrap().is_empty());
    }
}
