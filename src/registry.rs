//! Handle-based tooltip management.
//!
//! A host usually has many tooltips. [`TooltipRegistry`] owns their
//! controllers, hands out [`TooltipId`] handles for later `configure` and
//! `detach` calls, and routes host notifications: pointer events by parent
//! widget, expired timers by timer handle, and widget teardown.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::controller::{TooltipController, TooltipPhase};
use crate::error::{Result, TooltipError};
use crate::options::{OptionsPatch, TooltipOptions};
use crate::toolkit::{EventKind, Toolkit};

/// Handle to an attached tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TooltipId(u64);

impl fmt::Display for TooltipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tooltip#{}", self.0)
    }
}

/// Owns every tooltip attached through it.
pub struct TooltipRegistry<T: Toolkit> {
    tooltips: BTreeMap<TooltipId, TooltipController<T>>,
    next_id: u64,
}

impl<T: Toolkit> Default for TooltipRegistry<T> {
    fn default() -> Self {
        Self {
            tooltips: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Toolkit> TooltipRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a tooltip to `parent` and return its handle.
    pub fn attach(
        &mut self,
        toolkit: &mut T,
        parent: T::Widget,
        text: impl Into<String>,
        delay_ms: u64,
        overrides: OptionsPatch,
    ) -> TooltipId {
        let id = TooltipId(self.next_id);
        self.next_id += 1;

        let controller = TooltipController::attach(toolkit, parent, text, delay_ms, overrides);
        self.tooltips.insert(id, controller);
        id
    }

    /// Detach a tooltip: bindings removed, timer cancelled, popup destroyed.
    pub fn detach(&mut self, toolkit: &mut T, id: TooltipId) -> Result<()> {
        let controller = self
            .tooltips
            .remove(&id)
            .ok_or(TooltipError::UnknownTooltip(id))?;
        controller.detach(toolkit);
        Ok(())
    }

    pub fn get(&self, id: TooltipId) -> Option<&TooltipController<T>> {
        self.tooltips.get(&id)
    }

    fn get_mut(&mut self, id: TooltipId) -> Result<&mut TooltipController<T>> {
        self.tooltips
            .get_mut(&id)
            .ok_or(TooltipError::UnknownTooltip(id))
    }

    pub fn len(&self) -> usize {
        self.tooltips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tooltips.is_empty()
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    pub fn options(&self, id: TooltipId) -> Result<&TooltipOptions> {
        self.tooltips
            .get(&id)
            .map(TooltipController::options)
            .ok_or(TooltipError::UnknownTooltip(id))
    }

    /// Every option of one tooltip keyed by its string name.
    pub fn option_map(&self, id: TooltipId) -> Result<BTreeMap<&'static str, Value>> {
        self.options(id).map(TooltipOptions::option_map)
    }

    pub fn configure(&mut self, id: TooltipId, patch: OptionsPatch) -> Result<()> {
        self.get_mut(id)?.configure(patch);
        Ok(())
    }

    /// String-keyed configuration, all or nothing.
    pub fn configure_dynamic<I, K>(&mut self, id: TooltipId, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        self.get_mut(id)?.configure_dynamic(pairs)
    }

    pub fn phase(&self, id: TooltipId) -> Result<TooltipPhase> {
        self.tooltips
            .get(&id)
            .map(TooltipController::phase)
            .ok_or(TooltipError::UnknownTooltip(id))
    }

    // ------------------------------------------------------------------------
    // Host notifications
    // ------------------------------------------------------------------------

    /// Deliver a pointer event on `widget` to every tooltip attached to it.
    pub fn dispatch(&mut self, toolkit: &mut T, widget: T::Widget, kind: EventKind) {
        for controller in self.tooltips.values_mut() {
            if controller.parent() == widget {
                controller.handle_event(toolkit, kind);
            }
        }
    }

    /// Deliver an expired timer. Returns `false` if no tooltip was waiting on it.
    pub fn timer_fired(&mut self, toolkit: &mut T, timer: T::Timer) -> bool {
        match self
            .tooltips
            .values_mut()
            .find(|c| c.pending_timer() == Some(timer))
        {
            Some(controller) => controller.timer_fired(toolkit, timer),
            None => {
                log::trace!("No tooltip waiting on timer {:?}", timer);
                false
            }
        }
    }

    /// The parent widget is being torn down: detach all of its tooltips.
    pub fn widget_destroyed(&mut self, toolkit: &mut T, widget: T::Widget) -> usize {
        let ids: Vec<TooltipId> = self
            .tooltips
            .iter()
            .filter(|(_, c)| c.parent() == widget)
            .map(|(id, _)| *id)
            .collect();

        for id in &ids {
            if let Some(controller) = self.tooltips.remove(id) {
                controller.detach(toolkit);
            }
        }
        if !ids.is_empty() {
            log::debug!("Detached {} tooltip(s) from destroyed {:?}", ids.len(), widget);
        }
        ids.len()
    }
}
