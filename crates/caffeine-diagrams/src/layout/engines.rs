//! Ranking engines.
//!
//! An engine decides which rank every item of a scope belongs to and the
//! order of items inside each rank. Turning ranks into coordinates is left to
//! [`positioning`](super::positioning).

mod basic;
mod sugiyama;

use petgraph::graph::NodeIndex;

use caffeine_diagrams_core::semantic::LayoutEngine;

use crate::structure::Scope;

/// Ordered ranks of the items of one scope.
///
/// Ranks run along the flow direction; each rank lists its items in
/// cross-axis order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ranking {
    ranks: Vec<Vec<NodeIndex>>,
}

impl Ranking {
    /// Creates a ranking, dropping empty ranks.
    pub fn new(ranks: Vec<Vec<NodeIndex>>) -> Self {
        Self {
            ranks: ranks.into_iter().filter(|rank| !rank.is_empty()).collect(),
        }
    }

    pub fn ranks(&self) -> &[Vec<NodeIndex>] {
        &self.ranks
    }

    /// Number of ranks
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Rank holding `item`
    pub fn rank_of(&self, item: NodeIndex) -> Option<usize> {
        self.ranks.iter().position(|rank| rank.contains(&item))
    }

    /// Total number of ranked items
    pub fn item_count(&self) -> usize {
        self.ranks.iter().map(Vec::len).sum()
    }
}

/// Trait defining the interface for scope ranking engines
pub trait Engine {
    fn rank(&self, scope: &Scope) -> Ranking;
}

/// Returns the engine implementing `kind`.
///
/// Graphviz renders whole diagrams on its own; when a layout is still
/// requested for it, the basic engine is used.
pub fn engine(kind: LayoutEngine) -> Box<dyn Engine> {
    match kind {
        LayoutEngine::Basic => Box::new(basic::Engine::new()),
        LayoutEngine::Sugiyama => Box::new(sugiyama::Engine::new()),
        #[cfg(feature = "graphviz")]
        LayoutEngine::Graphviz => {
            log::debug!("Graphviz has no in-process layout, using the basic engine");
            Box::new(basic::Engine::new())
        }
    }
}
