//! Scroll-to-element helper.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages call [`scroll_to_component`] to bring a section into view (anchor
//! links, "jump to error", onboarding tours) and optionally run a callback
//! once the scroll is done.
//!
//! DESIGN
//! ======
//! The helper is host-agnostic: a [`ScrollHost`] supplies element lookup,
//! geometry, the scroll itself, and a one-shot visibility observer. Two
//! completion modes:
//! - `Instant`: the callback runs synchronously right after the scroll request.
//! - `Smooth`: the host observes the element and runs the callback the first
//!   time it is at least [`VISIBILITY_THRESHOLD`] visible, or when the
//!   completion timeout elapses, whichever comes first. The observer is
//!   released either way.

#[cfg(test)]
#[path = "scroll_test.rs"]
mod scroll_test;

use std::fmt;
use std::time::Duration;

use crate::config::{ClientConfig, DEFAULT_SCROLL_COMPLETION_TIMEOUT_MS};

/// Visible fraction of the element that counts as "scroll finished".
pub const VISIBILITY_THRESHOLD: f64 = 0.6;

pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_millis(DEFAULT_SCROLL_COMPLETION_TIMEOUT_MS);

/// One-shot completion callback. UI callbacks capture non-`Send` handles, so no `Send` bound.
pub type ScrollCallback = Box<dyn FnOnce()>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    #[default]
    Smooth,
}

/// Viewport-relative vertical extent of an element, as `getBoundingClientRect` reports it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    #[must_use]
    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }

    /// Whole element lies inside a viewport of `viewport_height`.
    #[must_use]
    pub fn fits_within(&self, viewport_height: f64) -> bool {
        self.top >= 0.0 && self.bottom <= viewport_height
    }

    /// Fraction of the element's height inside the viewport, in `0.0..=1.0`.
    #[must_use]
    pub fn visible_fraction(&self, viewport_height: f64) -> f64 {
        let height = self.height();
        if height <= 0.0 {
            return if self.top >= 0.0 && self.top <= viewport_height { 1.0 } else { 0.0 };
        }
        let visible = (self.bottom.min(viewport_height) - self.top.max(0.0)).max(0.0);
        (visible / height).min(1.0)
    }
}

pub struct ScrollOptions {
    /// Pixels to stop short of the element's top, e.g. to clear a sticky header.
    pub offset: f64,
    pub behavior: ScrollBehavior,
    /// Skip the scroll (but still run the callback) when the element is already fully visible.
    pub skip_if_visible: bool,
    pub callback: Option<ScrollCallback>,
    /// Bound on how long a smooth scroll waits for its visibility signal.
    pub completion_timeout: Duration,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            offset: 0.0,
            behavior: ScrollBehavior::default(),
            skip_if_visible: false,
            callback: None,
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
        }
    }
}

impl ScrollOptions {
    /// Defaults, with the completion timeout taken from `config`.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self { completion_timeout: config.scroll_completion_timeout, ..Self::default() }
    }

    #[must_use]
    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    #[must_use]
    pub fn skip_if_visible(mut self, skip: bool) -> Self {
        self.skip_if_visible = skip;
        self
    }

    #[must_use]
    pub fn on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }
}

impl fmt::Debug for ScrollOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollOptions")
            .field("offset", &self.offset)
            .field("behavior", &self.behavior)
            .field("skip_if_visible", &self.skip_if_visible)
            .field("callback", &self.callback.is_some())
            .field("completion_timeout", &self.completion_timeout)
            .finish()
    }
}

/// What to scroll to: a CSS selector or an element handle already in hand.
#[derive(Clone, Debug)]
pub enum ScrollTarget<'a, E> {
    Selector(&'a str),
    Element(E),
}

impl<'a, E> From<&'a str> for ScrollTarget<'a, E> {
    fn from(selector: &'a str) -> Self {
        Self::Selector(selector)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollOutcome {
    /// Selector matched nothing; nothing happened.
    NotFound,
    /// Element was fully visible and `skip_if_visible` was set.
    AlreadyVisible,
    /// Scroll requested to this document offset.
    Scrolled { top: f64 },
}

/// The document/viewport the helper operates on.
pub trait ScrollHost {
    type Element: Clone + fmt::Debug;

    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    /// Element bounds relative to the current viewport.
    fn bounding_rect(&self, element: &Self::Element) -> Rect;

    fn viewport_height(&self) -> f64;

    /// Current vertical scroll offset of the document.
    fn scroll_y(&self) -> f64;

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior);

    /// Run `callback` once, the first time `element` is at least `threshold`
    /// visible, or after `timeout`; then stop observing. Must not run the
    /// callback synchronously from inside this call.
    fn observe_visibility(&self, element: &Self::Element, threshold: f64, timeout: Duration, callback: ScrollCallback);
}

/// Scroll `target` into view on `host`.
///
/// Never fails: an unresolvable selector is logged and reported as
/// [`ScrollOutcome::NotFound`] without side effects.
pub fn scroll_to_component<H: ScrollHost>(
    host: &H,
    target: ScrollTarget<'_, H::Element>,
    options: ScrollOptions,
) -> ScrollOutcome {
    let ScrollOptions { offset, behavior, skip_if_visible, callback, completion_timeout } = options;

    let element = match target {
        ScrollTarget::Element(element) => element,
        ScrollTarget::Selector(selector) => match host.query_selector(selector) {
            Some(element) => element,
            None => {
                tracing::warn!(selector, "scroll target not found");
                return ScrollOutcome::NotFound;
            }
        },
    };

    let rect = host.bounding_rect(&element);
    if skip_if_visible && rect.fits_within(host.viewport_height()) {
        tracing::debug!(?element, "element already in view; skipping scroll");
        if let Some(callback) = callback {
            callback();
        }
        return ScrollOutcome::AlreadyVisible;
    }

    let top = scroll_offset(rect, host.scroll_y(), offset);
    host.scroll_to(top, behavior);

    if let Some(callback) = callback {
        match behavior {
            ScrollBehavior::Instant => callback(),
            ScrollBehavior::Smooth => {
                host.observe_visibility(&element, VISIBILITY_THRESHOLD, completion_timeout, callback);
            }
        }
    }

    tracing::debug!(?element, top, ?behavior, "scrolled to element");
    ScrollOutcome::Scrolled { top }
}

/// Document offset that puts the element's top `offset` pixels below the viewport top.
#[must_use]
pub fn scroll_offset(rect: Rect, scroll_y: f64, offset: f64) -> f64 {
    rect.top + scroll_y - offset
}
