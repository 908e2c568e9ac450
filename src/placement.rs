//! Popup placement.
//!
//! The popup must never overlap its parent: if the pointer could move from the
//! parent into the popup, the parent would see a leave event, hide the popup,
//! see an enter event, show it again, and so on. Anchored popups therefore sit
//! just below (or above) the parent, and follow-mouse popups keep a vertical
//! offset from the pointer.
//!
//! Inputs are taken as-is. Degenerate geometry (zero-size popups, a pointer
//! outside the screen) is computed arithmetically without rejection, and the
//! follow-mouse flip above the pointer is not re-checked against the top edge.

use crate::constants::{FOLLOW_MOUSE_FLIP_MARGIN, FOLLOW_MOUSE_OFFSET, PARENT_GAP};
use crate::geometry::{Point, Rect, Size};

/// Everything the placement needs to know, gathered from the toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementInput {
    /// Requested popup size.
    pub popup: Size,
    /// Screen size.
    pub screen: Size,
    /// Parent widget bounds in screen coordinates.
    pub parent: Rect,
    /// Pointer position in screen coordinates.
    pub pointer: Point,
    /// Follow-mouse mode.
    pub follow_mouse: bool,
}

/// Compute the popup's top-left screen position.
pub fn place(input: &PlacementInput) -> Point {
    Point::new(horizontal(input), vertical(input))
}

fn vertical(input: &PlacementInput) -> i32 {
    let screen_height = input.screen.height;
    let popup_height = input.popup.height;

    let (below, above) = if input.follow_mouse {
        (
            input.pointer.y.saturating_add(FOLLOW_MOUSE_OFFSET),
            input
                .pointer
                .y
                .saturating_sub(popup_height)
                .saturating_sub(FOLLOW_MOUSE_FLIP_MARGIN),
        )
    } else {
        (
            input.parent.bottom().saturating_add(PARENT_GAP),
            input
                .parent
                .y
                .saturating_sub(popup_height)
                .saturating_sub(PARENT_GAP),
        )
    };

    if below.saturating_add(popup_height) > screen_height {
        above
    } else {
        below
    }
}

fn horizontal(input: &PlacementInput) -> i32 {
    let popup_width = input.popup.width;
    // Odd widths put the fractional centre on the left pixel
    let centered = input.pointer.x.saturating_sub(popup_width.saturating_add(1) / 2);
    // Lower bound last: a popup wider than the screen pins to the left edge
    centered.min(input.screen.width.saturating_sub(popup_width)).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn follow(popup: Size, screen: Size, pointer: Point) -> PlacementInput {
        PlacementInput {
            popup,
            screen,
            parent: Rect::new(0, 0, 0, 0),
            pointer,
            follow_mouse: true,
        }
    }

    fn anchored(popup: Size, screen: Size, parent: Rect, pointer: Point) -> PlacementInput {
        PlacementInput {
            popup,
            screen,
            parent,
            pointer,
            follow_mouse: false,
        }
    }

    #[test]
    fn test_follow_mouse_flips_and_clamps_near_corner() {
        let input = follow(
            Size::new(100, 30),
            Size::new(1000, 800),
            Point::new(950, 780),
        );
        // 780 + 20 + 30 > 800 flips to 780 - 30 - 30
        assert_eq!(place(&input), Point::new(900, 720));
    }

    #[test]
    fn test_follow_mouse_below_pointer() {
        let input = follow(
            Size::new(100, 30),
            Size::new(1000, 800),
            Point::new(500, 400),
        );
        assert_eq!(place(&input), Point::new(450, 420));
    }

    #[test]
    fn test_follow_mouse_flip_ignores_top_edge() {
        // A popup taller than the screen flips to a negative y and stays there
        let input = follow(Size::new(50, 900), Size::new(1000, 800), Point::new(500, 10));
        assert_eq!(place(&input).y, 10 - 900 - 30);
    }

    #[test]
    fn test_anchored_below_parent() {
        let input = anchored(
            Size::new(80, 30),
            Size::new(1000, 800),
            Rect::new(300, 100, 120, 20),
            Point::new(350, 110),
        );
        assert_eq!(place(&input), Point::new(310, 123));
    }

    #[test]
    fn test_anchored_above_parent_near_bottom() {
        let input = anchored(
            Size::new(80, 30),
            Size::new(1000, 800),
            Rect::new(300, 760, 120, 30),
            Point::new(350, 770),
        );
        // 760 + 30 + 3 + 30 > 800
        assert_eq!(place(&input).y, 760 - 30 - 3);
    }

    #[test]
    fn test_anchored_popup_never_overlaps_parent() {
        let screen = Size::new(1000, 800);
        let popup = Size::new(60, 40);
        for parent_y in (0..800).step_by(37) {
            let parent = Rect::new(200, parent_y, 100, 25);
            let pos = place(&anchored(popup, screen, parent, Point::new(250, parent_y + 5)));
            let popup_rect = Rect::from_origin(pos, popup);
            assert!(
                !popup_rect.intersects(&parent),
                "popup {popup_rect:?} overlaps parent {parent:?}"
            );
        }
    }

    #[test]
    fn test_left_clamp() {
        let input = follow(Size::new(100, 30), Size::new(1000, 800), Point::new(20, 100));
        assert_eq!(place(&input).x, 0);
    }

    #[test]
    fn test_wide_popup_pins_to_left_edge() {
        let screen = Size::new(1000, 800);
        for width in [1000, 1001, 1500, 4000] {
            for pointer_x in [0, 300, 999, 2000] {
                let input = follow(Size::new(width, 30), screen, Point::new(pointer_x, 100));
                assert_eq!(place(&input).x, 0, "width {width} pointer {pointer_x}");
            }
        }
    }

    #[test]
    fn test_odd_width_centre() {
        let input = follow(Size::new(101, 30), Size::new(1000, 800), Point::new(500, 100));
        assert_eq!(place(&input).x, 449);
    }

    #[test]
    fn test_degenerate_popup_is_accepted() {
        let input = follow(Size::ZERO, Size::new(1000, 800), Point::new(1200, -50));
        // Pointer outside the screen: x clamps, y is taken arithmetically
        assert_eq!(place(&input), Point::new(1000, -30));
    }

    #[test]
    fn test_extreme_geometry_saturates() {
        let near_max = anchored(
            Size::new(100, 30),
            Size::new(1000, 800),
            Rect::new(0, i32::MAX - 5, 10, 10),
            Point::new(i32::MAX, i32::MAX),
        );
        assert_eq!(place(&near_max), Point::new(900, i32::MAX - 5 - 30 - 3));

        let huge_popup = follow(
            Size::new(i32::MAX, i32::MAX),
            Size::new(1000, 800),
            Point::new(i32::MIN, i32::MAX),
        );
        assert_eq!(place(&huge_popup), Point::new(0, -30));
    }

    #[test]
    fn test_placement_is_deterministic() {
        let input = anchored(
            Size::new(90, 24),
            Size::new(1280, 720),
            Rect::new(40, 600, 200, 100),
            Point::new(60, 650),
        );
        assert_eq!(place(&input), place(&input));
    }
}
