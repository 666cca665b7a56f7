//! Track Solver - Flexbox pass over the desktop slide row
//!
//! Models the track as a single flex row (fixed-width items, fixed gap) and
//! runs Taffy over it to obtain the total track width and the absolute left
//! offset of every slide. The offsets are cached by the layout engine for
//! O(1) nearest-slide lookup during snapping.

use taffy::{AvailableSpace, Dimension, Display, FlexDirection, LengthPercentage, Size, Style, TaffyTree};

/// Result of one track layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackLayout {
    /// Total width of the slide row: `item_width·n + gap·(n−1)`.
    pub total_width: f32,
    /// Absolute left offset of each slide index.
    pub offsets: Vec<f32>,
}

/// Lay out `slide_count` fixed-width items in a flex row with `gap`.
pub fn solve_track(slide_count: usize, item_width: f32, gap: f32) -> TrackLayout {
    if slide_count == 0 {
        return TrackLayout {
            total_width: 0.0,
            offsets: Vec::new(),
        };
    }

    let mut tree: TaffyTree<()> = TaffyTree::new();

    let item_style = Style {
        size: Size {
            width: Dimension::Length(item_width),
            height: Dimension::Auto,
        },
        flex_grow: 0.0,
        flex_shrink: 0.0,
        ..Default::default()
    };

    let children: Vec<_> = (0..slide_count)
        .map(|_| tree.new_leaf(item_style.clone()).unwrap())
        .collect();

    let row_style = Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Row,
        gap: Size {
            width: LengthPercentage::Length(gap),
            height: LengthPercentage::Length(0.0),
        },
        ..Default::default()
    };

    let row = tree.new_with_children(row_style, &children).unwrap();

    // Unconstrained: the row takes its max-content width.
    let available = Size {
        width: AvailableSpace::MaxContent,
        height: AvailableSpace::MaxContent,
    };
    tree.compute_layout(row, available).unwrap();

    let offsets = children
        .iter()
        .map(|&child| tree.layout(child).unwrap().location.x)
        .collect();

    TrackLayout {
        total_width: tree.layout(row).unwrap().size.width,
        offsets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_track() {
        let layout = solve_track(0, 271.2, 12.0);
        assert_eq!(layout.total_width, 0.0);
        assert!(layout.offsets.is_empty());
    }

    #[test]
    fn test_single_slide() {
        let layout = solve_track(1, 200.0, 12.0);
        assert_eq!(layout.total_width, 200.0);
        assert_eq!(layout.offsets, vec![0.0]);
    }

    #[test]
    fn test_offsets_match_arithmetic() {
        let (n, width, gap) = (8, 271.2, 12.0);
        let layout = solve_track(n, width, gap);

        assert_eq!(layout.offsets.len(), n);
        for (index, &offset) in layout.offsets.iter().enumerate() {
            let expected = index as f32 * (width + gap);
            assert!(
                (offset - expected).abs() < 0.5,
                "slide {index}: {offset} vs {expected}"
            );
        }
    }

    #[test]
    fn test_total_width() {
        let layout = solve_track(5, 100.0, 10.0);
        // 5·100 + 4·10
        assert!((layout.total_width - 540.0).abs() < 0.5);
    }
}
