//! Turns a ranking into local coordinates.
//!
//! Ranks are stacked along the flow axis with `rank_spacing` between them;
//! each rank is as deep as its deepest item. Inside a rank, items follow the
//! ranking's order along the cross axis, separated by `node_spacing`, and the
//! rank is centered on the widest one.

use caffeine_diagrams_core::{
    geometry::{Point, Size},
    semantic::Direction,
};

use super::Ranking;

/// Local item centers of one scope, with the content's top-left corner at the origin
#[derive(Debug, Clone)]
pub struct Placement {
    centers: Vec<Point>,
    size: Size,
}

impl Placement {
    /// Center of the item at `position` in the scope's declaration order
    pub fn center(&self, position: usize) -> Point {
        self.centers.get(position).copied().unwrap_or_default()
    }

    /// Extent of the placed content
    pub fn size(&self) -> Size {
        self.size
    }
}

/// Places the items of `ranking`, whose sizes are indexed by item position.
pub fn place(
    ranking: &Ranking,
    sizes: &[Size],
    direction: Direction,
    node_spacing: f32,
    rank_spacing: f32,
) -> Placement {
    let horizontal = direction.is_horizontal();
    let along = |size: Size| if horizontal { size.width() } else { size.height() };
    let across = |size: Size| if horizontal { size.height() } else { size.width() };
    let size_of = |position: usize| sizes.get(position).copied().unwrap_or_default();

    let extents: Vec<(f32, f32)> = ranking
        .ranks()
        .iter()
        .map(|rank| {
            let depth = rank
                .iter()
                .map(|item| along(size_of(item.index())))
                .fold(0.0_f32, f32::max);
            let breadth = rank.iter().map(|item| across(size_of(item.index()))).sum::<f32>()
                + node_spacing * rank.len().saturating_sub(1) as f32;
            (depth, breadth)
        })
        .collect();

    let total_flow = extents.iter().map(|(depth, _)| depth).sum::<f32>()
        + rank_spacing * extents.len().saturating_sub(1) as f32;
    let total_cross = extents.iter().map(|(_, breadth)| *breadth).fold(0.0_f32, f32::max);

    let mut centers = vec![Point::default(); sizes.len()];
    let mut flow_cursor = 0.0_f32;
    for (rank, (depth, breadth)) in ranking.ranks().iter().zip(&extents) {
        let mut flow = flow_cursor + depth / 2.0;
        if direction.is_reversed() {
            flow = total_flow - flow;
        }

        let mut cross_cursor = (total_cross - breadth) / 2.0;
        for item in rank {
            let extent = across(size_of(item.index()));
            let cross = cross_cursor + extent / 2.0;
            if let Some(center) = centers.get_mut(item.index()) {
                *center = if horizontal {
                    Point::new(flow, cross)
                } else {
                    Point::new(cross, flow)
                };
            }
            cross_cursor += extent + node_spacing;
        }

        flow_cursor += depth + rank_spacing;
    }

    let size = if horizontal {
        Size::new(total_flow, total_cross)
    } else {
        Size::new(total_cross, total_flow)
    };

    Placement { centers, size }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use petgraph::graph::NodeIndex;
    use proptest::prelude::*;

    use super::*;

    fn ranking(ranks: &[&[usize]]) -> Ranking {
        Ranking::new(
            ranks
                .iter()
                .map(|rank| rank.iter().copied().map(NodeIndex::new).collect())
                .collect(),
        )
    }

    #[test]
    fn test_top_bottom_stacks_ranks_vertically() {
        let sizes = [Size::new(40.0, 20.0), Size::new(60.0, 30.0), Size::new(20.0, 30.0)];
        let placement = place(
            &ranking(&[&[0], &[1, 2]]),
            &sizes,
            Direction::TopBottom,
            10.0,
            50.0,
        );

        assert!(approx_eq!(f32, placement.size().width(), 90.0));
        assert!(approx_eq!(f32, placement.size().height(), 100.0));

        let first = placement.center(0);
        assert!(approx_eq!(f32, first.x(), 45.0));
        assert!(approx_eq!(f32, first.y(), 10.0));

        let second = placement.center(1);
        let third = placement.center(2);
        assert!(approx_eq!(f32, second.x(), 30.0));
        assert!(approx_eq!(f32, third.x(), 80.0));
        assert!(approx_eq!(f32, second.y(), 85.0));
        assert!(approx_eq!(f32, third.y(), 85.0));
    }

    #[test]
    fn test_right_left_mirrors_the_flow() {
        let sizes = [Size::new(40.0, 20.0), Size::new(40.0, 20.0)];
        let placement = place(
            &ranking(&[&[0], &[1]]),
            &sizes,
            Direction::RightLeft,
            10.0,
            20.0,
        );
        assert!(approx_eq!(f32, placement.size().width(), 100.0));
        assert!(approx_eq!(f32, placement.center(0).x(), 80.0));
        assert!(approx_eq!(f32, placement.center(1).x(), 20.0));
    }

    #[test]
    fn test_empty_ranking_has_no_extent() {
        let placement = place(&Ranking::default(), &[], Direction::LeftRight, 10.0, 20.0);
        assert!(placement.size().is_zero());
    }

    proptest! {
        #[test]
        fn prop_items_stay_inside_the_placement(
            widths in prop::collection::vec(1.0f32..120.0, 1..8),
            horizontal in any::<bool>(),
        ) {
            let sizes: Vec<Size> = widths.iter().map(|w| Size::new(*w, w / 2.0 + 5.0)).collect();
            let ranks: Vec<Vec<NodeIndex>> = (0..sizes.len())
                .map(NodeIndex::new)
                .collect::<Vec<_>>()
                .chunks(3)
                .map(<[NodeIndex]>::to_vec)
                .collect();
            let direction = if horizontal { Direction::LeftRight } else { Direction::BottomTop };
            let placement = place(&Ranking::new(ranks), &sizes, direction, 10.0, 20.0);

            for (position, size) in sizes.iter().enumerate() {
                let bounds = placement.center(position).to_bounds(*size);
                prop_assert!(bounds.min_x() >= -0.01 && bounds.min_y() >= -0.01);
                prop_assert!(bounds.max_x() <= placement.size().width() + 0.01);
                prop_assert!(bounds.max_y() <= placement.size().height() + 0.01);
            }
        }
    }
}
