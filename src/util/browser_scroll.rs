//! DOM-backed [`ScrollHost`]. Requires a browser environment.
//!
//! Completion for smooth scrolls uses an `IntersectionObserver` with a single
//! threshold plus a `setTimeout` fallback. Whichever fires first runs the
//! callback and disconnects the observer; the timeout also releases the
//! observer's JS closure.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::scroll::{Rect, ScrollBehavior, ScrollCallback, ScrollHost};

pub struct BrowserHost {
    window: web_sys::Window,
    document: web_sys::Document,
}

impl BrowserHost {
    /// Host for the current window, or `None` outside a browser.
    #[must_use]
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }
}

impl ScrollHost for BrowserHost {
    type Element = Element;

    fn query_selector(&self, selector: &str) -> Option<Element> {
        match self.document.query_selector(selector) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(selector, error = ?e, "invalid selector");
                None
            }
        }
    }

    fn bounding_rect(&self, element: &Element) -> Rect {
        let rect = element.get_bounding_client_rect();
        Rect { top: rect.top(), bottom: rect.bottom() }
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .map_or(0.0, |height| height.as_f64().unwrap_or(0.0))
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        let options = web_sys::ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn observe_visibility(&self, element: &Element, threshold: f64, timeout: Duration, callback: ScrollCallback) {
        let callback_slot: Rc<RefCell<Option<ScrollCallback>>> = Rc::new(RefCell::new(Some(callback)));
        let observer_slot: Rc<RefCell<Option<IntersectionObserver>>> = Rc::new(RefCell::new(None));

        let finish: Rc<dyn Fn()> = {
            let callback_slot = Rc::clone(&callback_slot);
            let observer_slot = Rc::clone(&observer_slot);
            Rc::new(move || {
                if let Some(observer) = observer_slot.borrow_mut().take() {
                    observer.disconnect();
                }
                let pending = callback_slot.borrow_mut().take();
                if let Some(callback) = pending {
                    callback();
                }
            })
        };

        let on_entries = {
            let finish = Rc::clone(&finish);
            Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
                move |entries: js_sys::Array, _observer: IntersectionObserver| {
                    let reached = entries.iter().any(|entry| {
                        entry
                            .dyn_into::<IntersectionObserverEntry>()
                            .is_ok_and(|entry| entry.intersection_ratio() >= threshold)
                    });
                    if reached {
                        finish();
                    }
                },
            )
        };

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        match IntersectionObserver::new_with_options(on_entries.as_ref().unchecked_ref(), &init) {
            Ok(observer) => {
                observer.observe(element);
                *observer_slot.borrow_mut() = Some(observer);
            }
            Err(e) => {
                tracing::warn!(error = ?e, "IntersectionObserver unavailable; completing at timeout");
            }
        }

        let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || {
            finish();
            drop(on_entries);
        })
        .forget();
    }
}
