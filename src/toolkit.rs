//! Host toolkit capability interface.
//!
//! The tooltip never talks to a windowing system directly. Everything it needs
//! from the host (event bindings, one-shot timers, popup windows and geometry
//! queries) goes through [`Toolkit`], which keeps the controller testable with
//! an in-memory host such as [`crate::HeadlessToolkit`].

use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use crate::error::ToolkitError;
use crate::geometry::{Point, Rect, Size};
use crate::options::{Anchor, Justify, Relief, TooltipOptions};

/// Pointer notifications a tooltip listens for on its parent widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer entered the widget.
    Enter,
    /// Pointer left the widget.
    Leave,
    /// A mouse button was pressed over the widget.
    ButtonPress,
    /// Pointer moved inside the widget.
    Motion,
}

/// Window-manager presentation of a popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupStyle {
    /// No title bar or frame; the popup is placed by explicit coordinates.
    pub borderless: bool,
    /// Created withdrawn; revealed by [`Toolkit::show_popup`].
    pub initially_hidden: bool,
    /// Ask the platform for tooltip-style, non-activating presentation.
    pub tooltip_hint: bool,
}

impl PopupStyle {
    /// Presentation used for every tooltip popup.
    pub const TOOLTIP: Self = Self {
        borderless: true,
        initially_hidden: true,
        tooltip_hint: true,
    };
}

impl Default for PopupStyle {
    fn default() -> Self {
        Self::TOOLTIP
    }
}

/// Display options handed to [`Toolkit::render_content`].
///
/// This is the option set minus the behavior-only options (delay,
/// follow-mouse mode and state), with the text variable already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    pub text: String,
    pub anchor: Anchor,
    pub border_width: u32,
    pub background: String,
    pub foreground: String,
    pub font: Option<String>,
    pub justify: Justify,
    pub padx: u32,
    pub pady: u32,
    pub relief: Relief,
    pub width: u32,
    pub wraplength: u32,
}

impl From<&TooltipOptions> for PopupContent {
    fn from(options: &TooltipOptions) -> Self {
        Self {
            text: options.display_text(),
            anchor: options.anchor,
            border_width: options.border_width,
            background: options.background.clone(),
            foreground: options.foreground.clone(),
            font: options.font.clone(),
            justify: options.justify,
            padx: options.padx,
            pady: options.pady,
            relief: options.relief,
            width: options.width,
            wraplength: options.wraplength,
        }
    }
}

/// Windowing primitives supplied by the host GUI toolkit.
///
/// All calls happen on the host's UI thread. Timer callbacks are not closures:
/// when a timer returned by [`Toolkit::schedule_after`] expires, the host
/// reports it back (see [`crate::TooltipRegistry::timer_fired`]).
pub trait Toolkit {
    /// Widget handle.
    type Widget: Copy + Eq + Hash + fmt::Debug;
    /// Scheduled-callback handle.
    type Timer: Copy + Eq + Hash + fmt::Debug;
    /// Popup window handle.
    type Popup: fmt::Debug;
    /// Event binding handle.
    type Binding: fmt::Debug;

    /// Register interest in `kind` events on `widget`.
    ///
    /// With `additive` set, handlers bound earlier by other code stay active.
    fn bind_event(&mut self, widget: Self::Widget, kind: EventKind, additive: bool)
    -> Self::Binding;

    /// Remove a binding created by [`Toolkit::bind_event`].
    fn unbind_event(&mut self, widget: Self::Widget, binding: Self::Binding);

    /// Schedule a one-shot timer. Returns immediately.
    fn schedule_after(&mut self, delay: Duration) -> Self::Timer;

    /// Cancel a timer that has not fired yet.
    fn cancel_timer(&mut self, timer: Self::Timer);

    /// Create a popup window owned by `owner`.
    fn create_popup(
        &mut self,
        owner: Self::Widget,
        style: &PopupStyle,
    ) -> Result<Self::Popup, ToolkitError>;

    /// Draw the label content inside the popup.
    fn render_content(&mut self, popup: &Self::Popup, content: &PopupContent);

    /// Size the popup asks for after its content has been rendered.
    fn popup_requested_size(&self, popup: &Self::Popup) -> Result<Size, ToolkitError>;

    /// Move the popup's top-left corner to a screen position.
    fn move_popup(&mut self, popup: &Self::Popup, position: Point);

    /// Reveal a hidden popup.
    fn show_popup(&mut self, popup: &Self::Popup);

    /// Destroy a popup window.
    fn destroy_popup(&mut self, popup: Self::Popup);

    /// On-screen bounds of a widget.
    fn widget_geometry(&self, widget: Self::Widget) -> Result<Rect, ToolkitError>;

    /// Size of the screen the widgets live on.
    fn screen_size(&self) -> Result<Size, ToolkitError>;

    /// Current pointer position in screen coordinates.
    fn pointer_position(&self) -> Result<Point, ToolkitError>;
}
