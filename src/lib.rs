//! hovertip - delayed hover tooltips for any GUI toolkit
//!
//! A tooltip attaches to a parent widget, appears after a configurable delay
//! while the pointer rests on the parent, optionally follows the pointer, and
//! places itself on screen without overlapping the parent. The host toolkit is
//! reached only through the [`Toolkit`] trait.

#[macro_use]
mod macros;

pub mod constants;
mod controller;
mod error;
mod geometry;
mod headless;
mod options;
mod placement;
mod registry;
mod toolkit;

pub use controller::{TooltipController, TooltipPhase};
pub use error::{Result, ToolkitError, TooltipError};
pub use geometry::{Point, Rect, Size};
pub use headless::{
    BindingId, BindingRecord, HeadlessToolkit, PopupId, PopupRecord, TimerId, WidgetId,
};
pub use options::{
    Anchor, Justify, OptionKey, OptionsPatch, Relief, TextVariable, TooltipOptions, TooltipState,
};
pub use placement::{PlacementInput, place};
pub use registry::{TooltipId, TooltipRegistry};
pub use toolkit::{EventKind, PopupContent, PopupStyle, Toolkit};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::controller::{TooltipController, TooltipPhase};
    pub use crate::error::{ToolkitError, TooltipError};
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::options::{OptionsPatch, TooltipOptions, TooltipState};
    pub use crate::registry::{TooltipId, TooltipRegistry};
    pub use crate::toolkit::{EventKind, Toolkit};
}
