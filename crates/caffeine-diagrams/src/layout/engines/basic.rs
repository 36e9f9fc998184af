//! Basic ranking engine
//!
//! A small, deterministic take on layered drawing:
//!
//! 1. Cycles are broken by a depth-first search in declaration order that
//!    reverses every back edge.
//! 2. Ranks come from longest-path layering over the resulting DAG.
//! 3. Items inside each rank are reordered by alternating barycenter sweeps
//!    to reduce crossings.

use std::collections::VecDeque;

use log::trace;

use crate::{
    layout::engines::{self, Ranking},
    structure::Scope,
};

use petgraph::graph::NodeIndex;

/// Downward plus upward barycenter passes
pub(super) const SWEEPS: usize = 4;

/// Basic ranking engine implementation
#[derive(Debug, Default)]
pub struct Engine;

impl Engine {
    /// Create a new basic engine
    pub fn new() -> Self {
        Self
    }
}

impl engines::Engine for Engine {
    fn rank(&self, scope: &Scope) -> Ranking {
        let count = scope.len();
        if count == 0 {
            return Ranking::default();
        }

        let edges: Vec<(usize, usize)> = scope
            .connections()
            .map(|(source, target)| (source.index(), target.index()))
            .collect();
        rank_edges(count, &edges, SWEEPS)
    }
}

/// Ranks `count` items connected by `edges` (pairs of item positions).
pub(super) fn rank_edges(count: usize, edges: &[(usize, usize)], sweeps: usize) -> Ranking {
    let dag = break_cycles(count, edges);
    let layers = longest_path_layers(count, &dag);

    let rank_count = layers.iter().copied().max().map_or(0, |max| max + 1);
    let mut ranks: Vec<Vec<usize>> = vec![Vec::new(); rank_count];
    for (item, layer) in layers.iter().enumerate() {
        ranks[*layer].push(item);
    }

    order_by_barycenter(&mut ranks, &dag, count, sweeps);
    trace!(ranks:? = ranks; "Basic ranking");

    Ranking::new(
        ranks
            .into_iter()
            .map(|rank| rank.into_iter().map(NodeIndex::new).collect())
            .collect(),
    )
}

/// Returns `edges` with every back edge of a declaration-order DFS reversed.
///
/// Self-loops are dropped.
fn break_cycles(count: usize, edges: &[(usize, usize)]) -> Vec<(usize, usize)> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (index, (source, _)) in edges.iter().enumerate() {
        outgoing[*source].push(index);
    }

    let mut marks = vec![Mark::New; count];
    let mut result: Vec<(usize, usize)> = edges.to_vec();

    for root in 0..count {
        if marks[root] != Mark::New {
            continue;
        }
        // (item, next outgoing edge to inspect)
        let mut stack = vec![(root, 0usize)];
        marks[root] = Mark::Active;

        while let Some((item, cursor)) = stack.last_mut() {
            let item = *item;
            let Some(&edge) = outgoing[item].get(*cursor) else {
                marks[item] = Mark::Done;
                stack.pop();
                continue;
            };
            *cursor += 1;

            let target = edges[edge].1;
            match marks[target] {
                Mark::New => {
                    marks[target] = Mark::Active;
                    stack.push((target, 0));
                }
                Mark::Active => result[edge] = (target, item),
                Mark::Done => {}
            }
        }
    }

    result.retain(|(source, target)| source != target);
    result
}

/// Longest-path layering: every item sits one rank below its deepest predecessor.
fn longest_path_layers(count: usize, dag: &[(usize, usize)]) -> Vec<usize> {
    let mut in_degree = vec![0usize; count];
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); count];
    for &(source, target) in dag {
        in_degree[target] += 1;
        outgoing[source].push(target);
    }

    let mut layers = vec![0usize; count];
    let mut queue: VecDeque<usize> = (0..count).filter(|item| in_degree[*item] == 0).collect();
    while let Some(item) = queue.pop_front() {
        for &target in &outgoing[item] {
            layers[target] = layers[target].max(layers[item] + 1);
            in_degree[target] -= 1;
            if in_degree[target] == 0 {
                queue.push_back(target);
            }
        }
    }

    layers
}

/// Reorders each rank by the mean position of its neighbours, alternating
/// downward (predecessors) and upward (successors) passes.
fn order_by_barycenter(
    ranks: &mut [Vec<usize>],
    dag: &[(usize, usize)],
    count: usize,
    sweeps: usize,
) {
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); count];
    for &(source, target) in dag {
        predecessors[target].push(source);
        successors[source].push(target);
    }

    let mut position = vec![0.0_f32; count];
    let record = |ranks: &[Vec<usize>], position: &mut [f32]| {
        for rank in ranks {
            for (index, item) in rank.iter().enumerate() {
                position[*item] = index as f32;
            }
        }
    };
    record(&*ranks, &mut position);

    for _ in 0..sweeps {
        for r in 1..ranks.len() {
            reorder(&mut ranks[r], &predecessors, &position);
            record(&*ranks, &mut position);
        }
        for r in (0..ranks.len().saturating_sub(1)).rev() {
            reorder(&mut ranks[r], &successors, &position);
            record(&*ranks, &mut position);
        }
    }
}

fn reorder(rank: &mut [usize], neighbours: &[Vec<usize>], position: &[f32]) {
    let barycenter = |item: usize| {
        let around = &neighbours[item];
        if around.is_empty() {
            position[item]
        } else {
            around.iter().map(|n| position[*n]).sum::<f32>() / around.len() as f32
        }
    };
    rank.sort_by(|a, b| barycenter(*a).total_cmp(&barycenter(*b)));
}
