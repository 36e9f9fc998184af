//! Sugiyama ranking engine backed by the `rust-sugiyama` crate.
//!
//! The crate computes coordinates for every connected component. Items are
//! grouped into ranks by their layer coordinate and ordered inside a rank by
//! the cross coordinate. Items without connections join the first rank.
//! Whenever the crate fails or returns nothing, the basic engine takes over.

use std::collections::HashMap;

use log::{debug, warn};
use petgraph::graph::NodeIndex;
use rust_sugiyama::configure::Config;

use crate::{
    layout::engines::{self, Ranking, basic},
    structure::Scope,
};

/// Coordinates closer than this along the layer axis share a rank
const RANK_TOLERANCE: f64 = 0.5;

/// Sugiyama ranking engine implementation
#[derive(Debug, Default)]
pub struct Engine;

impl Engine {
    /// Create a new Sugiyama engine
    pub fn new() -> Self {
        Self
    }
}

impl engines::Engine for Engine {
    fn rank(&self, scope: &Scope) -> Ranking {
        let edges: Vec<(usize, usize)> = scope
            .connections()
            .map(|(source, target)| (source.index(), target.index()))
            .collect();
        rank_edges(scope.len(), &edges)
    }
}

fn rank_edges(count: usize, edges: &[(usize, usize)]) -> Ranking {
    if count == 0 {
        return Ranking::default();
    }
    if edges.is_empty() {
        return Ranking::new(vec![(0..count).map(NodeIndex::new).collect()]);
    }

    match sugiyama_ranks(count, edges) {
        Ok(ranking) => ranking,
        Err(reason) => {
            warn!(reason = reason.as_str(); "Sugiyama layout failed, using the basic engine");
            basic::rank_edges(count, edges, basic::SWEEPS)
        }
    }
}

fn sugiyama_ranks(count: usize, edges: &[(usize, usize)]) -> Result<Ranking, String> {
    // Sequential ids over connected items only; the crate creates a vertex for
    // every id up to the largest one it sees.
    let mut compact: HashMap<usize, u32> = HashMap::new();
    let mut items: Vec<usize> = Vec::new();
    let mut id_of = |item: usize| {
        *compact.entry(item).or_insert_with(|| {
            items.push(item);
            (items.len() - 1) as u32
        })
    };
    let sugiyama_edges: Vec<(u32, u32)> = edges
        .iter()
        .map(|&(source, target)| (id_of(source), id_of(target)))
        .collect();

    debug!(
        items = items.len(),
        edges = sugiyama_edges.len();
        "Applying Sugiyama algorithm"
    );

    let layouts = std::panic::catch_unwind(move || {
        let config = Config {
            minimum_length: 1,
            vertex_spacing: 3.0,
            ..Default::default()
        };
        rust_sugiyama::from_edges(&sugiyama_edges, &config)
    })
    .map_err(|err| match err.downcast_ref::<String>() {
        Some(message) => format!("rust-sugiyama panicked: {message}"),
        None => "rust-sugiyama panicked with unknown error".to_string(),
    })?;

    if layouts.is_empty() {
        return Err("rust-sugiyama returned empty layout results".to_string());
    }

    let mut merged: Vec<Vec<usize>> = Vec::new();
    let mut placed = vec![false; count];

    for (coords, _, _) in &layouts {
        let mut component: Vec<(usize, f64, f64)> = coords
            .iter()
            .filter_map(|&(id, (x, y))| items.get(id).map(|item| (*item, x, y)))
            .collect();
        component.sort_by(|a, b| a.2.total_cmp(&b.2).then(a.1.total_cmp(&b.1)));

        let mut ranks: Vec<Vec<usize>> = Vec::new();
        let mut last_y: Option<f64> = None;
        for (item, _, y) in component {
            let same_rank = last_y.is_some_and(|previous| (y - previous).abs() < RANK_TOLERANCE);
            match ranks.last_mut() {
                Some(rank) if same_rank => rank.push(item),
                _ => ranks.push(vec![item]),
            }
            last_y = Some(y);
        }

        orient(&mut ranks, edges);

        for (index, rank) in ranks.into_iter().enumerate() {
            if merged.len() <= index {
                merged.push(Vec::new());
            }
            for item in rank {
                if !placed[item] {
                    placed[item] = true;
                    merged[index].push(item);
                }
            }
        }
    }

    if !placed.iter().any(|p| *p) {
        return Err("failed to map any rust-sugiyama vertex back to the scope".to_string());
    }

    // Isolated and unmapped items go to the first rank
    if merged.is_empty() {
        merged.push(Vec::new());
    }
    for (item, _) in placed.iter().enumerate().filter(|(_, p)| !**p) {
        merged[0].push(item);
    }

    Ok(Ranking::new(
        merged
            .into_iter()
            .map(|rank| rank.into_iter().map(NodeIndex::new).collect())
            .collect(),
    ))
}

/// Reverses `ranks` when most edges between them point against the rank order.
fn orient(ranks: &mut [Vec<usize>], edges: &[(usize, usize)]) {
    let rank_of: HashMap<usize, usize> = ranks
        .iter()
        .enumerate()
        .flat_map(|(index, rank)| rank.iter().map(move |item| (*item, index)))
        .collect();

    let (mut forward, mut backward) = (0usize, 0usize);
    for (source, target) in edges {
        if let (Some(s), Some(t)) = (rank_of.get(source), rank_of.get(target)) {
            if s < t {
                forward += 1;
            } else if s > t {
                backward += 1;
            }
        }
    }

    if backward > forward {
        ranks.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_flows_forward() {
        let ranking = rank_edges(3, &[(0, 1), (1, 2)]);
        let rank = |item| ranking.rank_of(NodeIndex::new(item)).unwrap();
        assert!(rank(0) < rank(1));
        assert!(rank(1) < rank(2));
    }

    #[test]
    fn test_isolated_items_join_first_rank() {
        let ranking = rank_edges(4, &[(1, 2)]);
        assert_eq!(ranking.item_count(), 4);
        assert_eq!(ranking.rank_of(NodeIndex::new(0)), Some(0));
        assert_eq!(ranking.rank_of(NodeIndex::new(3)), Some(0));
    }

    #[test]
    fn test_without_edges_everything_shares_one_rank() {
        let ranking = rank_edges(3, &[]);
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking.item_count(), 3);
    }

    #[test]
    fn test_orient_reverses_backward_ranks() {
        let mut ranks = vec![vec![2], vec![1], vec![0]];
        orient(&mut ranks, &[(0, 1), (1, 2)]);
        assert_eq!(ranks, vec![vec![0], vec![1], vec![2]]);
    }
}
