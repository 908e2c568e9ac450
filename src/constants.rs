//! Centralized constants for hovertip
//!
//! Placement offsets and option defaults live here so the controller, the
//! option set and the headless toolkit agree on them.

// =============================================================================
// Placement
// =============================================================================

/// Vertical distance below the pointer in follow-mouse mode
pub const FOLLOW_MOUSE_OFFSET: i32 = 20;

/// Extra margin above the pointer when a follow-mouse popup flips upward
pub const FOLLOW_MOUSE_FLIP_MARGIN: i32 = 30;

/// Gap between the parent's edge and an anchored popup
pub const PARENT_GAP: i32 = 3;

// =============================================================================
// Option Defaults
// =============================================================================

/// Hover delay before the popup appears
pub const DEFAULT_DELAY_MS: u64 = 1500;

/// Placeholder text used when none is supplied
pub const DEFAULT_TEXT: &str = "Your text here";

/// Popup border width
pub const DEFAULT_BORDER_WIDTH: u32 = 1;

/// Popup background color
pub const DEFAULT_BACKGROUND: &str = "lightyellow";

/// Popup text color
pub const DEFAULT_FOREGROUND: &str = "black";

/// Horizontal padding inside the popup
pub const DEFAULT_PADX: u32 = 4;

/// Vertical padding inside the popup
pub const DEFAULT_PADY: u32 = 2;

/// Line wrap limit in screen units
pub const DEFAULT_WRAPLENGTH: u32 = 150;

// =============================================================================
// Headless Text Metrics
// =============================================================================

/// Approximate glyph advance used by the headless toolkit
pub const HEADLESS_CHAR_WIDTH: i32 = 7;

/// Approximate line height used by the headless toolkit
pub const HEADLESS_LINE_HEIGHT: i32 = 14;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_positive() {
        assert!(FOLLOW_MOUSE_OFFSET > 0);
        assert!(FOLLOW_MOUSE_FLIP_MARGIN > 0);
        assert!(PARENT_GAP > 0);
        assert!(DEFAULT_DELAY_MS > 0);
        assert!(DEFAULT_WRAPLENGTH > 0);
        assert!(HEADLESS_CHAR_WIDTH > 0);
        assert!(HEADLESS_LINE_HEIGHT > 0);
    }

    #[test]
    fn test_flip_margin_clears_offset() {
        // A flipped popup must sit further from the pointer than an unflipped one
        assert!(FOLLOW_MOUSE_FLIP_MARGIN > FOLLOW_MOUSE_OFFSET);
    }
}
