//! Even spacing of path nodes across the level width.

use glam::Vec2;
use thiserror::Error;

/// Smallest node count a path layout accepts.
pub const MIN_NODES: usize = 3;

/// Reasons a path layout cannot be produced.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum LayoutError {
    /// Fewer than [`MIN_NODES`] nodes were requested.
    #[error("path layout needs at least 3 nodes, received {count}")]
    TooFewNodes {
        /// Requested node count.
        count: usize,
    },
    /// The level width was zero, negative or not a number.
    #[error("level width must be positive (received {width})")]
    InvalidWidth {
        /// Provided level width.
        width: f32,
    },
}

/// Places `count` nodes on the horizontal line at `height`, centred on the
/// origin and evenly spaced so that the gaps to both level edges match the
/// gaps between nodes.
pub fn arrange_nodes(count: usize, level_width: f32, height: f32) -> Result<Vec<Vec2>, LayoutError> {
    if count < MIN_NODES {
        return Err(LayoutError::TooFewNodes { count });
    }
    if level_width.is_nan() || level_width <= 0.0 {
        return Err(LayoutError::InvalidWidth { width: level_width });
    }

    let spacing = level_width / (count as f32 + 1.0);
    let start = -level_width / 2.0 + spacing;
    Ok((0..count)
        .map(|index| Vec2::new(start + spacing * index as f32, height))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_split_the_width_into_equal_gaps() {
        let nodes = arrange_nodes(3, 8.0, 1.5).expect("valid layout");

        assert_eq!(
            nodes,
            vec![
                Vec2::new(-2.0, 1.5),
                Vec2::new(0.0, 1.5),
                Vec2::new(2.0, 1.5)
            ]
        );
    }

    #[test]
    fn layout_is_symmetric_around_the_origin() {
        let nodes = arrange_nodes(6, 14.0, 0.0).expect("valid layout");
        let first = nodes.first().expect("first node");
        let last = nodes.last().expect("last node");

        assert!((first.x + last.x).abs() < 1e-5);
        assert!((first.x - (-7.0 + 2.0)).abs() < 1e-5);
    }

    #[test]
    fn two_nodes_are_rejected() {
        assert_eq!(
            arrange_nodes(2, 10.0, 0.0),
            Err(LayoutError::TooFewNodes { count: 2 })
        );
    }

    #[test]
    fn non_positive_width_is_rejected() {
        assert!(matches!(
            arrange_nodes(4, 0.0, 0.0),
            Err(LayoutError::InvalidWidth { .. })
        ));
    }
}
