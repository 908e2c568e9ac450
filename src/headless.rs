//! In-memory toolkit with a virtual clock.
//!
//! [`HeadlessToolkit`] implements [`Toolkit`] without a windowing system:
//! widgets are plain rectangles, the pointer and screen size are set by the
//! caller, timers expire when [`HeadlessToolkit::advance`] moves the clock past
//! their deadline, and popups are records that can be inspected afterwards.
//! Query and popup failures can be injected to exercise error paths.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::constants::{HEADLESS_CHAR_WIDTH, HEADLESS_LINE_HEIGHT};
use crate::error::ToolkitError;
use crate::geometry::{Point, Rect, Size};
use crate::toolkit::{EventKind, PopupContent, PopupStyle, Toolkit};

/// Widget handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(u64);

/// Timer handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Popup handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PopupId(u64);

/// Binding handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindingId(u64);

/// A recorded event binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingRecord {
    pub id: BindingId,
    pub widget: WidgetId,
    pub kind: EventKind,
    pub additive: bool,
}

/// A live popup window.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupRecord {
    pub owner: WidgetId,
    pub style: PopupStyle,
    /// Last rendered content, `None` until rendered
    pub content: Option<PopupContent>,
    /// Size derived from the content
    pub requested_size: Size,
    /// Top-left corner, `None` until moved
    pub position: Option<Point>,
    pub visible: bool,
}

impl PopupRecord {
    /// Screen bounds, if the popup has been positioned.
    pub fn bounds(&self) -> Option<Rect> {
        self.position
            .map(|origin| Rect::from_origin(origin, self.requested_size))
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    id: TimerId,
    deadline: Duration,
}

/// Failure switches.
#[derive(Debug, Clone, Copy, Default)]
struct Failures {
    queries: bool,
    popups: bool,
}

/// Toolkit that keeps all state in memory.
#[derive(Debug)]
pub struct HeadlessToolkit {
    screen: Size,
    pointer: Point,
    now: Duration,
    next_id: u64,
    widgets: BTreeMap<WidgetId, Rect>,
    bindings: Vec<BindingRecord>,
    timers: Vec<PendingTimer>,
    popups: BTreeMap<PopupId, PopupRecord>,
    popups_created: usize,
    failures: Failures,
}

impl HeadlessToolkit {
    /// Create a toolkit with the given screen size and the pointer at the origin.
    pub fn new(screen: Size) -> Self {
        Self {
            screen,
            pointer: Point::default(),
            now: Duration::ZERO,
            next_id: 1,
            widgets: BTreeMap::new(),
            bindings: Vec::new(),
            timers: Vec::new(),
            popups: BTreeMap::new(),
            popups_created: 0,
            failures: Failures::default(),
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ------------------------------------------------------------------------
    // Scene setup
    // ------------------------------------------------------------------------

    /// Add a widget with fixed screen bounds.
    pub fn add_widget(&mut self, bounds: Rect) -> WidgetId {
        let id = WidgetId(self.next_id());
        self.widgets.insert(id, bounds);
        id
    }

    /// Remove a widget. Its bindings go with it.
    pub fn remove_widget(&mut self, widget: WidgetId) {
        self.widgets.remove(&widget);
        self.bindings.retain(|b| b.widget != widget);
    }

    /// Topmost widget under a point; later widgets are on top.
    pub fn widget_at(&self, point: Point) -> Option<WidgetId> {
        self.widgets
            .iter()
            .rev()
            .find(|(_, bounds)| bounds.contains(point))
            .map(|(id, _)| *id)
    }

    pub fn set_pointer(&mut self, pointer: Point) {
        self.pointer = pointer;
    }

    pub fn set_screen_size(&mut self, screen: Size) {
        self.screen = screen;
    }

    /// Make geometry, screen and pointer queries fail.
    pub fn fail_queries(&mut self, fail: bool) {
        self.failures.queries = fail;
    }

    /// Make popup creation fail.
    pub fn fail_popups(&mut self, fail: bool) {
        self.failures.popups = fail;
    }

    // ------------------------------------------------------------------------
    // Clock
    // ------------------------------------------------------------------------

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward and return the timers that expired, earliest first.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        self.now += by;
        let now = self.now;

        let (mut expired, pending): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|t| t.deadline <= now);
        self.timers = pending;

        expired.sort_by_key(|t| (t.deadline, t.id));
        expired.into_iter().map(|t| t.id).collect()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    pub fn bindings(&self) -> &[BindingRecord] {
        &self.bindings
    }

    /// Event kinds bound on a widget, in binding order.
    pub fn bound_kinds(&self, widget: WidgetId) -> Vec<EventKind> {
        self.bindings
            .iter()
            .filter(|b| b.widget == widget)
            .map(|b| b.kind)
            .collect()
    }

    pub fn popup(&self, popup: PopupId) -> Option<&PopupRecord> {
        self.popups.get(&popup)
    }

    /// Popups that exist right now.
    pub fn live_popups(&self) -> impl Iterator<Item = &PopupRecord> {
        self.popups.values()
    }

    /// Popups that exist and have been revealed.
    pub fn visible_popups(&self) -> Vec<&PopupRecord> {
        self.popups.values().filter(|p| p.visible).collect()
    }

    /// Total number of popups ever created.
    pub fn popups_created(&self) -> usize {
        self.popups_created
    }

    fn check_queries(&self, what: &str) -> Result<(), ToolkitError> {
        if self.failures.queries {
            Err(ToolkitError::query(format!("{what} unavailable")))
        } else {
            Ok(())
        }
    }
}

/// Requested popup size for some content using fixed character cells.
fn measure(content: &PopupContent) -> Size {
    let chars_per_line = if content.width > 0 {
        content.width as usize
    } else {
        (content.wraplength as usize / HEADLESS_CHAR_WIDTH as usize).max(1)
    };

    let lines = wrap(&content.text, chars_per_line);
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let text_width = if content.width > 0 {
        pixels(content.width as usize)
    } else {
        pixels(longest)
    };

    let frame = pixels(content.border_width as usize).saturating_mul(2);
    let padx = pixels(content.padx as usize).saturating_mul(2);
    let pady = pixels(content.pady as usize).saturating_mul(2);
    Size::new(
        text_width
            .saturating_mul(HEADLESS_CHAR_WIDTH)
            .saturating_add(padx)
            .saturating_add(frame),
        pixels(lines.len())
            .saturating_mul(HEADLESS_LINE_HEIGHT)
            .saturating_add(pady)
            .saturating_add(frame),
    )
}

/// Count to pixel units, saturating at `i32::MAX`.
fn pixels(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Greedy word wrap; words longer than a line get a line of their own.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if current_len == 0 {
                current = word.to_string();
                current_len = word_len;
            } else if current_len + 1 + word_len <= max_chars {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
                current_len = word_len;
            }
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

impl Toolkit for HeadlessToolkit {
    type Widget = WidgetId;
    type Timer = TimerId;
    type Popup = PopupId;
    type Binding = BindingId;

    fn bind_event(&mut self, widget: WidgetId, kind: EventKind, additive: bool) -> BindingId {
        let id = BindingId(self.next_id());
        if !additive {
            self.bindings
                .retain(|b| !(b.widget == widget && b.kind == kind));
        }
        self.bindings.push(BindingRecord {
            id,
            widget,
            kind,
            additive,
        });
        id
    }

    fn unbind_event(&mut self, widget: WidgetId, binding: BindingId) {
        self.bindings
            .retain(|b| !(b.widget == widget && b.id == binding));
    }

    fn schedule_after(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id());
        self.timers.push(PendingTimer {
            id,
            deadline: self.now + delay,
        });
        id
    }

    fn cancel_timer(&mut self, timer: TimerId) {
        self.timers.retain(|t| t.id != timer);
    }

    fn create_popup(
        &mut self,
        owner: WidgetId,
        style: &PopupStyle,
    ) -> Result<PopupId, ToolkitError> {
        if self.failures.popups {
            return Err(ToolkitError::PopupUnavailable(
                "popup creation disabled".to_string(),
            ));
        }
        if !self.widgets.contains_key(&owner) {
            return Err(ToolkitError::UnknownWidget(format!("{owner:?}")));
        }

        let id = PopupId(self.next_id());
        self.popups.insert(
            id,
            PopupRecord {
                owner,
                style: *style,
                content: None,
                requested_size: Size::ZERO,
                position: None,
                visible: !style.initially_hidden,
            },
        );
        self.popups_created += 1;
        Ok(id)
    }

    fn render_content(&mut self, popup: &PopupId, content: &PopupContent) {
        if let Some(record) = self.popups.get_mut(popup) {
            record.requested_size = measure(content);
            record.content = Some(content.clone());
        }
    }

    fn popup_requested_size(&self, popup: &PopupId) -> Result<Size, ToolkitError> {
        self.check_queries("popup size")?;
        self.popups
            .get(popup)
            .map(|p| p.requested_size)
            .ok_or_else(|| ToolkitError::PopupUnavailable(format!("{popup:?}")))
    }

    fn move_popup(&mut self, popup: &PopupId, position: Point) {
        if let Some(record) = self.popups.get_mut(popup) {
            record.position = Some(position);
        }
    }

    fn show_popup(&mut self, popup: &PopupId) {
        if let Some(record) = self.popups.get_mut(popup) {
            record.visible = true;
        }
    }

    fn destroy_popup(&mut self, popup: PopupId) {
        self.popups.remove(&popup);
    }

    fn widget_geometry(&self, widget: WidgetId) -> Result<Rect, ToolkitError> {
        self.check_queries("widget geometry")?;
        self.widgets
            .get(&widget)
            .copied()
            .ok_or_else(|| ToolkitError::UnknownWidget(format!("{widget:?}")))
    }

    fn screen_size(&self) -> Result<Size, ToolkitError> {
        self.check_queries("screen size")?;
        Ok(self.screen)
    }

    fn pointer_position(&self) -> Result<Point, ToolkitError> {
        self.check_queries("pointer position")?;
        Ok(self.pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TooltipOptions;

    fn content(text: &str) -> PopupContent {
        PopupContent::from(&TooltipOptions::with_text(text, 0))
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let mut tk = HeadlessToolkit::new(Size::new(800, 600));
        let late = tk.schedule_after(Duration::from_millis(300));
        let early = tk.schedule_after(Duration::from_millis(100));
        let cancelled = tk.schedule_after(Duration::from_millis(50));
        tk.cancel_timer(cancelled);

        assert!(tk.advance(Duration::from_millis(99)).is_empty());
        assert_eq!(tk.advance(Duration::from_millis(1)), vec![early]);
        assert_eq!(tk.advance(Duration::from_secs(1)), vec![late]);
        assert_eq!(tk.pending_timers(), 0);
        assert_eq!(tk.now(), Duration::from_millis(1100));
    }

    #[test]
    fn test_additive_binding_keeps_previous() {
        let mut tk = HeadlessToolkit::new(Size::new(800, 600));
        let w = tk.add_widget(Rect::new(0, 0, 10, 10));
        tk.bind_event(w, EventKind::Enter, true);
        tk.bind_event(w, EventKind::Enter, true);
        assert_eq!(tk.bound_kinds(w).len(), 2);

        tk.bind_event(w, EventKind::Enter, false);
        assert_eq!(tk.bound_kinds(w), vec![EventKind::Enter]);
    }

    #[test]
    fn test_unbind_removes_only_that_binding() {
        let mut tk = HeadlessToolkit::new(Size::new(800, 600));
        let w = tk.add_widget(Rect::new(0, 0, 10, 10));
        let enter = tk.bind_event(w, EventKind::Enter, true);
        tk.bind_event(w, EventKind::Leave, true);
        tk.unbind_event(w, enter);
        assert_eq!(tk.bound_kinds(w), vec![EventKind::Leave]);
    }

    #[test]
    fn test_popup_lifecycle() {
        let mut tk = HeadlessToolkit::new(Size::new(800, 600));
        let w = tk.add_widget(Rect::new(0, 0, 10, 10));
        let popup = tk.create_popup(w, &PopupStyle::TOOLTIP).unwrap();
        assert!(!tk.popup(popup).unwrap().visible);
        assert_eq!(tk.popup(popup).unwrap().bounds(), None);
        assert_eq!(tk.popup_requested_size(&popup).unwrap(), Size::ZERO);

        tk.render_content(&popup, &content("hello"));
        tk.move_popup(&popup, Point::new(5, 6));
        tk.show_popup(&popup);

        let record = tk.popup(popup).unwrap();
        assert!(record.visible);
        assert_eq!(record.position, Some(Point::new(5, 6)));
        assert_eq!(record.bounds(), Some(Rect::new(5, 6, 45, 20)));
        assert_eq!(tk.visible_popups().len(), 1);

        tk.destroy_popup(popup);
        assert!(tk.popup(popup).is_none());
        assert_eq!(tk.popups_created(), 1);
    }

    #[test]
    fn test_popup_for_unknown_widget_fails() {
        let mut tk = HeadlessToolkit::new(Size::new(800, 600));
        let w = tk.add_widget(Rect::new(0, 0, 10, 10));
        tk.remove_widget(w);
        assert!(matches!(
            tk.create_popup(w, &PopupStyle::TOOLTIP),
            Err(ToolkitError::UnknownWidget(_))
        ));
    }

    #[test]
    fn test_measure_single_line() {
        // 5 chars * 7 + 2 * padx(4) + 2 * bd(1), 1 line * 14 + 2 * pady(2) + 2 * bd(1)
        assert_eq!(measure(&content("hello")), Size::new(45, 20));
    }

    #[test]
    fn test_measure_wraps_at_wraplength() {
        // wraplength 150 / 7 = 21 characters per line
        let text = "the quick brown fox jumps over the lazy dog";
        assert_eq!(
            wrap(text, 21),
            vec!["the quick brown fox", "jumps over the lazy", "dog"]
        );

        let size = measure(&content(text));
        assert_eq!(size.height, 3 * HEADLESS_LINE_HEIGHT + 6);
        assert_eq!(size.width, 19 * HEADLESS_CHAR_WIDTH + 10);
    }

    #[test]
    fn test_measure_saturates_on_huge_options() {
        let mut huge = content("hello");
        huge.width = u32::MAX;
        huge.border_width = u32::MAX;
        huge.pady = u32::MAX;
        let size = measure(&huge);
        assert_eq!(size, Size::new(i32::MAX, i32::MAX));
    }

    #[test]
    fn test_screen_size_can_change() {
        let mut tk = HeadlessToolkit::new(Size::new(800, 600));
        tk.set_screen_size(Size::new(1920, 1080));
        assert_eq!(tk.screen_size().unwrap(), Size::new(1920, 1080));
    }

    #[test]
    fn test_wrap_keeps_long_words_whole() {
        assert_eq!(wrap("a verylongword b", 4), vec!["a", "verylongword", "b"]);
        assert_eq!(wrap("", 4), vec![String::new()]);
    }

    #[test]
    fn test_widget_at_prefers_topmost() {
        let mut tk = HeadlessToolkit::new(Size::new(800, 600));
        let below = tk.add_widget(Rect::new(0, 0, 100, 100));
        let above = tk.add_widget(Rect::new(50, 50, 100, 100));
        assert_eq!(tk.widget_at(Point::new(10, 10)), Some(below));
        assert_eq!(tk.widget_at(Point::new(60, 60)), Some(above));
        assert_eq!(tk.widget_at(Point::new(500, 500)), None);
    }

    #[test]
    fn test_injected_query_failure() {
        let mut tk = HeadlessToolkit::new(Size::new(800, 600));
        tk.fail_queries(true);
        assert!(tk.screen_size().is_err());
        assert!(tk.pointer_position().is_err());
        tk.fail_queries(false);
        assert_eq!(tk.screen_size().unwrap(), Size::new(800, 600));
    }
}
