//! Hover tooltip controller.
//!
//! One controller serves one (parent widget, tooltip) pair. It moves between
//! three phases:
//!
//! - `Idle`: no timer, no popup.
//! - `Pending`: the hover delay is running; exactly one timer is outstanding.
//! - `Shown`: the popup is visible; no timer is outstanding.
//!
//! Entering the parent (re)starts the delay unless the popup is already
//! visible, the timer shows the popup, and leaving or pressing a button
//! returns to `Idle` from any phase. In follow-mouse mode, motion over the
//! parent repositions a shown popup.
//!
//! The phase is a single enum holding the timer or popup handle, so a pending
//! timer and a visible popup can never coexist, and every transition releases
//! whatever the previous phase held before acquiring anything new.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;

use crate::error::Result;
use crate::geometry::Point;
use crate::options::{OptionsPatch, TooltipOptions};
use crate::placement::{PlacementInput, place};
use crate::toolkit::{EventKind, PopupContent, PopupStyle, Toolkit};

/// Observable phase of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipPhase {
    Idle,
    Pending,
    Shown,
}

enum Phase<T: Toolkit> {
    Idle,
    Pending(T::Timer),
    Shown(T::Popup),
}

/// Drives one tooltip through its show/hide cycle.
pub struct TooltipController<T: Toolkit> {
    parent: T::Widget,
    options: TooltipOptions,
    /// Fixed at attach time, independent of later `follow_mouse` changes
    follow_mouse: bool,
    phase: Phase<T>,
    bindings: Vec<T::Binding>,
}

impl<T: Toolkit> TooltipController<T> {
    /// Attach a tooltip to `parent`.
    ///
    /// `text` and `delay_ms` seed the options before `overrides` are merged.
    /// Enter, leave and button-press are always bound; motion only in
    /// follow-mouse mode. Bindings are additive so other handlers on the parent
    /// keep working.
    pub fn attach(
        toolkit: &mut T,
        parent: T::Widget,
        text: impl Into<String>,
        delay_ms: u64,
        overrides: OptionsPatch,
    ) -> Self {
        let mut options = TooltipOptions::with_text(text, delay_ms);
        overrides.apply(&mut options);
        let follow_mouse = options.follow_mouse;

        let mut kinds = vec![EventKind::Enter, EventKind::Leave, EventKind::ButtonPress];
        if follow_mouse {
            kinds.push(EventKind::Motion);
        }
        let bindings = kinds
            .into_iter()
            .map(|kind| toolkit.bind_event(parent, kind, true))
            .collect();

        log::debug!(
            "Attached tooltip to {:?} (delay {} ms, follow_mouse {})",
            parent,
            options.delay_ms,
            follow_mouse
        );

        Self {
            parent,
            options,
            follow_mouse,
            phase: Phase::Idle,
            bindings,
        }
    }

    /// Remove bindings, cancel the timer and destroy the popup.
    pub fn detach(mut self, toolkit: &mut T) {
        self.reset(toolkit);
        for binding in self.bindings.drain(..) {
            toolkit.unbind_event(self.parent, binding);
        }
        log::debug!("Detached tooltip from {:?}", self.parent);
    }

    pub fn parent(&self) -> T::Widget {
        self.parent
    }

    pub fn follow_mouse(&self) -> bool {
        self.follow_mouse
    }

    pub fn phase(&self) -> TooltipPhase {
        match self.phase {
            Phase::Idle => TooltipPhase::Idle,
            Phase::Pending(_) => TooltipPhase::Pending,
            Phase::Shown(_) => TooltipPhase::Shown,
        }
    }

    /// Timer handle while the hover delay is running.
    pub fn pending_timer(&self) -> Option<T::Timer> {
        match self.phase {
            Phase::Pending(timer) => Some(timer),
            _ => None,
        }
    }

    /// Popup handle while the tooltip is visible.
    pub fn popup(&self) -> Option<&T::Popup> {
        match &self.phase {
            Phase::Shown(popup) => Some(popup),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    pub fn options(&self) -> &TooltipOptions {
        &self.options
    }

    /// Every option keyed by its string name.
    pub fn option_map(&self) -> BTreeMap<&'static str, Value> {
        self.options.option_map()
    }

    /// Merge typed overrides. Takes effect the next time the popup is built.
    pub fn configure(&mut self, patch: OptionsPatch) {
        patch.apply(&mut self.options);
        self.warn_fixed_follow_mouse();
    }

    /// Merge string-keyed overrides, all or nothing.
    pub fn configure_dynamic<I, K>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        self.options.apply_dynamic(pairs)?;
        self.warn_fixed_follow_mouse();
        Ok(())
    }

    fn warn_fixed_follow_mouse(&self) {
        if self.options.follow_mouse != self.follow_mouse {
            log::warn!(
                "follow_mouse cannot change after attach; tooltip on {:?} keeps follow_mouse = {}",
                self.parent,
                self.follow_mouse
            );
        }
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    /// Route a pointer notification from the parent widget.
    pub fn handle_event(&mut self, toolkit: &mut T, kind: EventKind) {
        match kind {
            EventKind::Enter => self.enter(toolkit),
            EventKind::Leave | EventKind::ButtonPress => self.leave(toolkit),
            EventKind::Motion => self.motion(toolkit),
        }
    }

    /// Pointer entered the parent: restart the hover delay. A popup that is
    /// already visible stays up.
    pub fn enter(&mut self, toolkit: &mut T) {
        if let Phase::Shown(_) = self.phase {
            log::trace!("Tooltip on {:?} already shown", self.parent);
            return;
        }
        self.reset(toolkit);
        if self.options.is_disabled() {
            log::debug!("Tooltip on {:?} is disabled", self.parent);
            return;
        }

        let timer = toolkit.schedule_after(Duration::from_millis(self.options.delay_ms));
        log::debug!(
            "Scheduled tooltip on {:?} in {} ms ({:?})",
            self.parent,
            self.options.delay_ms,
            timer
        );
        self.phase = Phase::Pending(timer);
    }

    /// Pointer left the parent (or a button was pressed on it).
    pub fn leave(&mut self, toolkit: &mut T) {
        self.reset(toolkit);
    }

    /// Pointer moved over the parent.
    pub fn motion(&mut self, toolkit: &mut T) {
        if !self.follow_mouse {
            return;
        }
        let Phase::Shown(popup) = &self.phase else {
            return;
        };

        match self.coords(toolkit, popup) {
            Ok(position) => {
                log::trace!("Moving tooltip on {:?} to {:?}", self.parent, position);
                toolkit.move_popup(popup, position);
            }
            Err(e) => log::warn!("Failed to reposition tooltip on {:?}: {}", self.parent, e),
        }
    }

    /// A timer expired. Returns `false` if it was not this controller's timer.
    pub fn timer_fired(&mut self, toolkit: &mut T, timer: T::Timer) -> bool {
        if self.pending_timer() != Some(timer) {
            log::trace!("Ignoring stale timer {:?}", timer);
            return false;
        }
        self.phase = Phase::Idle;

        // State may have been disabled while the delay was running
        if self.options.is_disabled() {
            log::debug!("Tooltip on {:?} disabled before it could show", self.parent);
            return true;
        }

        match self.show(toolkit) {
            Ok(popup) => {
                log::debug!("Showing tooltip on {:?} ({:?})", self.parent, popup);
                self.phase = Phase::Shown(popup);
            }
            Err(e) => log::warn!("Failed to show tooltip on {:?}: {}", self.parent, e),
        }
        true
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// Release the timer or popup held by the current phase and go idle.
    fn reset(&mut self, toolkit: &mut T) {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {}
            Phase::Pending(timer) => {
                log::debug!("Cancelled pending tooltip on {:?}", self.parent);
                toolkit.cancel_timer(timer);
            }
            Phase::Shown(popup) => {
                log::debug!("Hiding tooltip on {:?}", self.parent);
                toolkit.destroy_popup(popup);
            }
        }
    }

    /// Build, position and reveal the popup. A popup that cannot be positioned
    /// is destroyed rather than revealed at an arbitrary spot.
    fn show(&self, toolkit: &mut T) -> Result<T::Popup> {
        let popup = toolkit.create_popup(self.parent, &PopupStyle::TOOLTIP)?;
        toolkit.render_content(&popup, &PopupContent::from(&self.options));

        match self.coords(toolkit, &popup) {
            Ok(position) => {
                toolkit.move_popup(&popup, position);
                toolkit.show_popup(&popup);
                Ok(popup)
            }
            Err(e) => {
                toolkit.destroy_popup(popup);
                Err(e)
            }
        }
    }

    fn coords(&self, toolkit: &T, popup: &T::Popup) -> Result<Point> {
        let input = PlacementInput {
            popup: toolkit.popup_requested_size(popup)?,
            screen: toolkit.screen_size()?,
            parent: toolkit.widget_geometry(self.parent)?,
            pointer: toolkit.pointer_position()?,
            follow_mouse: self.follow_mouse,
        };
        Ok(place(&input))
    }
}
