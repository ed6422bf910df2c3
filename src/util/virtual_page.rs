//! In-memory [`ScrollHost`]: a single scrolling document with a fixed viewport.
//!
//! Used off-browser (native UIs, server-side previews) and by tests to drive
//! the scroll helper deterministically. Time only moves when [`VirtualPage::advance`]
//! is called: smooth scrolls interpolate linearly over the configured
//! duration, and pending visibility observers are evaluated after each step.
//! Selectors match by exact string equality.

#[cfg(test)]
#[path = "virtual_page_test.rs"]
mod virtual_page_test;

use std::cell::RefCell;
use std::time::Duration;

use super::scroll::{Rect, ScrollBehavior, ScrollCallback, ScrollHost};

pub const DEFAULT_SMOOTH_DURATION: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

#[derive(Debug)]
struct VirtualElement {
    selector: String,
    /// Offset of the element's top from the document top.
    top: f64,
    height: f64,
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: f64,
    to: f64,
    elapsed: Duration,
    duration: Duration,
}

impl Animation {
    fn position(&self) -> f64 {
        if self.duration.is_zero() || self.elapsed >= self.duration {
            return self.to;
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * t
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

struct PendingObserver {
    element: ElementId,
    threshold: f64,
    remaining: Duration,
    callback: ScrollCallback,
}

struct PageInner {
    viewport_height: f64,
    document_height: f64,
    scroll_y: f64,
    smooth_duration: Duration,
    elements: Vec<VirtualElement>,
    animation: Option<Animation>,
    observers: Vec<PendingObserver>,
    scroll_requests: Vec<(f64, ScrollBehavior)>,
}

impl PageInner {
    fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    fn rect(&self, id: ElementId) -> Rect {
        match self.elements.get(id.0) {
            Some(el) => {
                let top = el.top - self.scroll_y;
                Rect { top, bottom: top + el.height }
            }
            None => Rect { top: f64::INFINITY, bottom: f64::INFINITY },
        }
    }

    /// Move time forward by `dt` and return the callbacks that are now due.
    fn step(&mut self, dt: Duration) -> Vec<ScrollCallback> {
        if let Some(mut animation) = self.animation.take() {
            animation.elapsed += dt;
            self.scroll_y = animation.position();
            if !animation.is_done() {
                self.animation = Some(animation);
            }
        }

        let mut due = Vec::new();
        let mut still_pending = Vec::new();
        for mut observer in std::mem::take(&mut self.observers) {
            let fraction = self.rect(observer.element).visible_fraction(self.viewport_height);
            if fraction >= observer.threshold {
                due.push(observer.callback);
                continue;
            }
            observer.remaining = observer.remaining.saturating_sub(dt);
            if observer.remaining.is_zero() {
                tracing::debug!(element = observer.element.0, fraction, "visibility observer timed out");
                due.push(observer.callback);
            } else {
                still_pending.push(observer);
            }
        }
        self.observers = still_pending;
        due
    }
}

pub struct VirtualPage {
    inner: RefCell<PageInner>,
}

impl VirtualPage {
    /// Empty document of `document_height` viewed through `viewport_height`, scrolled to the top.
    #[must_use]
    pub fn new(viewport_height: f64, document_height: f64) -> Self {
        Self {
            inner: RefCell::new(PageInner {
                viewport_height,
                document_height: document_height.max(viewport_height),
                scroll_y: 0.0,
                smooth_duration: DEFAULT_SMOOTH_DURATION,
                elements: Vec::new(),
                animation: None,
                observers: Vec::new(),
                scroll_requests: Vec::new(),
            }),
        }
    }

    #[must_use]
    pub fn with_smooth_duration(self, duration: Duration) -> Self {
        self.inner.borrow_mut().smooth_duration = duration;
        self
    }

    /// Place an element `top` pixels from the document top.
    pub fn add_element(&self, selector: impl Into<String>, top: f64, height: f64) -> ElementId {
        let mut inner = self.inner.borrow_mut();
        inner.elements.push(VirtualElement { selector: selector.into(), top, height });
        ElementId(inner.elements.len() - 1)
    }

    /// Jump the document to `y` without recording a scroll request.
    pub fn set_scroll_y(&self, y: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.scroll_y = y.clamp(0.0, inner.max_scroll());
        inner.animation = None;
    }

    pub fn current_scroll_y(&self) -> f64 {
        self.inner.borrow().scroll_y
    }

    /// Every `scroll_to` call received, in order.
    pub fn scroll_requests(&self) -> Vec<(f64, ScrollBehavior)> {
        self.inner.borrow().scroll_requests.clone()
    }

    pub fn pending_observers(&self) -> usize {
        self.inner.borrow().observers.len()
    }

    pub fn is_animating(&self) -> bool {
        self.inner.borrow().animation.is_some()
    }

    /// Advance time by `dt`, moving any smooth scroll and firing due observers.
    ///
    /// Callbacks run after the page's internal borrow is released, so they may
    /// call back into the page.
    pub fn advance(&self, dt: Duration) {
        let due = self.inner.borrow_mut().step(dt);
        for callback in due {
            callback();
        }
    }

    /// Advance in `tick` steps until no animation or observer remains, or `limit` elapses.
    ///
    /// A zero `tick` cannot move time forward, so it runs a single step.
    pub fn settle(&self, tick: Duration, limit: Duration) {
        if tick.is_zero() {
            self.advance(Duration::ZERO);
            return;
        }
        let mut elapsed = Duration::ZERO;
        while elapsed < limit && (self.is_animating() || self.pending_observers() > 0) {
            self.advance(tick);
            elapsed += tick;
        }
    }
}

impl ScrollHost for VirtualPage {
    type Element = ElementId;

    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        self.inner
            .borrow()
            .elements
            .iter()
            .position(|el| el.selector == selector)
            .map(ElementId)
    }

    fn bounding_rect(&self, element: &ElementId) -> Rect {
        self.inner.borrow().rect(*element)
    }

    fn viewport_height(&self) -> f64 {
        self.inner.borrow().viewport_height
    }

    fn scroll_y(&self) -> f64 {
        self.inner.borrow().scroll_y
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        let mut inner = self.inner.borrow_mut();
        inner.scroll_requests.push((top, behavior));
        let target = top.clamp(0.0, inner.max_scroll());
        match behavior {
            ScrollBehavior::Instant => {
                inner.animation = None;
                inner.scroll_y = target;
            }
            ScrollBehavior::Smooth => {
                let from = inner.scroll_y;
                let duration = inner.smooth_duration;
                inner.animation = Some(Animation { from, to: target, elapsed: Duration::ZERO, duration });
            }
        }
    }

    fn observe_visibility(&self, element: &ElementId, threshold: f64, timeout: Duration, callback: ScrollCallback) {
        self.inner.borrow_mut().observers.push(PendingObserver {
            element: *element,
            threshold,
            remaining: timeout,
            callback,
        });
    }
}
