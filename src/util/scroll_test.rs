use super::*;
use crate::util::virtual_page::VirtualPage;
use std::cell::Cell;
use std::rc::Rc;

const TICK: Duration = Duration::from_millis(16);

fn page() -> VirtualPage {
    let page = VirtualPage::new(800.0, 5000.0).with_smooth_duration(Duration::from_millis(300));
    page.add_element("#hero", 100.0, 200.0);
    page.add_element("#fold", 700.0, 200.0);
    page.add_element("#pricing", 2000.0, 200.0);
    page.add_element("#terms", 1000.0, 3000.0);
    page
}

fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
    let count = Rc::new(Cell::new(0));
    let hook = {
        let count = Rc::clone(&count);
        move || count.set(count.get() + 1)
    };
    (count, hook)
}

// =============================================================
// Rect
// =============================================================

#[test]
fn rect_fits_within_viewport_bounds() {
    assert!(Rect { top: 0.0, bottom: 800.0 }.fits_within(800.0));
    assert!(!Rect { top: -1.0, bottom: 100.0 }.fits_within(800.0));
    assert!(!Rect { top: 700.0, bottom: 900.0 }.fits_within(800.0));
}

#[test]
fn rect_visible_fraction_partial_and_clamped() {
    let rect = Rect { top: 700.0, bottom: 900.0 };
    assert!((rect.visible_fraction(800.0) - 0.5).abs() < 1e-9);
    assert!((Rect { top: -50.0, bottom: 150.0 }.visible_fraction(800.0) - 0.75).abs() < 1e-9);
    assert!(Rect { top: 900.0, bottom: 1100.0 }.visible_fraction(800.0).abs() < 1e-9);
    assert!((Rect { top: 10.0, bottom: 20.0 }.visible_fraction(800.0) - 1.0).abs() < 1e-9);
}

#[test]
fn scroll_offset_adds_current_scroll_and_subtracts_offset() {
    let rect = Rect { top: 1500.0, bottom: 1700.0 };
    assert!((scroll_offset(rect, 500.0, 64.0) - 1936.0).abs() < 1e-9);
}

// =============================================================
// scroll_to_component: resolution and skip
// =============================================================

#[test]
fn missing_selector_has_no_side_effects() {
    let page = page();
    let (count, hook) = counter();
    let outcome = scroll_to_component(&page, "#missing".into(), ScrollOptions::default().on_complete(hook));
    assert_eq!(outcome, ScrollOutcome::NotFound);
    assert!(page.scroll_requests().is_empty());
    assert_eq!(page.pending_observers(), 0);
    assert_eq!(count.get(), 0);
}

#[test]
fn skip_if_visible_calls_back_synchronously_without_scrolling() {
    let page = page();
    let (count, hook) = counter();
    let outcome = scroll_to_component(
        &page,
        "#hero".into(),
        ScrollOptions::default().skip_if_visible(true).on_complete(hook),
    );
    assert_eq!(outcome, ScrollOutcome::AlreadyVisible);
    assert_eq!(count.get(), 1);
    assert!(page.scroll_requests().is_empty());
    assert_eq!(page.pending_observers(), 0);
}

#[test]
fn skip_if_visible_still_scrolls_partially_visible_element() {
    let page = page();
    let outcome = scroll_to_component(
        &page,
        "#fold".into(),
        ScrollOptions::default().skip_if_visible(true).behavior(ScrollBehavior::Instant),
    );
    assert_eq!(outcome, ScrollOutcome::Scrolled { top: 700.0 });
    assert_eq!(page.scroll_requests(), vec![(700.0, ScrollBehavior::Instant)]);
}

#[test]
fn visible_element_scrolls_when_skip_not_requested() {
    let page = page();
    let outcome = scroll_to_component(&page, "#hero".into(), ScrollOptions::default().behavior(ScrollBehavior::Instant));
    assert_eq!(outcome, ScrollOutcome::Scrolled { top: 100.0 });
}

// =============================================================
// scroll_to_component: instant
// =============================================================

#[test]
fn instant_scroll_calls_back_synchronously() {
    let page = page();
    let (count, hook) = counter();
    let outcome = scroll_to_component(
        &page,
        "#pricing".into(),
        ScrollOptions::default().behavior(ScrollBehavior::Instant).offset(64.0).on_complete(hook),
    );
    assert_eq!(outcome, ScrollOutcome::Scrolled { top: 1936.0 });
    assert_eq!(count.get(), 1);
    assert_eq!(page.pending_observers(), 0);
    assert!((page.current_scroll_y() - 1936.0).abs() < 1e-9);
}

#[test]
fn instant_scroll_accounts_for_existing_scroll_position() {
    let page = page();
    page.set_scroll_y(500.0);
    let outcome = scroll_to_component(&page, "#pricing".into(), ScrollOptions::default().behavior(ScrollBehavior::Instant));
    assert_eq!(outcome, ScrollOutcome::Scrolled { top: 2000.0 });
}

#[test]
fn element_handle_target_skips_lookup() {
    let page = page();
    let id = page.query_selector("#pricing").unwrap();
    let outcome = scroll_to_component(&page, ScrollTarget::Element(id), ScrollOptions::default().behavior(ScrollBehavior::Instant));
    assert_eq!(outcome, ScrollOutcome::Scrolled { top: 2000.0 });
}

// =============================================================
// scroll_to_component: smooth
// =============================================================

#[test]
fn smooth_scroll_defers_callback_until_element_mostly_visible() {
    let page = page();
    let (count, hook) = counter();
    scroll_to_component(&page, "#pricing".into(), ScrollOptions::default().on_complete(hook));

    assert_eq!(count.get(), 0);
    assert_eq!(page.pending_observers(), 1);
    assert_eq!(page.scroll_requests(), vec![(2000.0, ScrollBehavior::Smooth)]);

    // 1/3 of the way: element still below the fold.
    page.advance(Duration::from_millis(100));
    assert_eq!(count.get(), 0);

    // 2/3 of the way: element top at ~667 of 800, so ~66% visible.
    page.advance(Duration::from_millis(100));
    assert_eq!(count.get(), 1);
    assert_eq!(page.pending_observers(), 0);

    page.settle(TICK, Duration::from_secs(2));
    assert_eq!(count.get(), 1);
    assert!((page.current_scroll_y() - 2000.0).abs() < 1e-9);
}

#[test]
fn smooth_scroll_times_out_when_threshold_unreachable() {
    let page = page();
    let (count, hook) = counter();
    scroll_to_component(
        &page,
        "#terms".into(),
        ScrollOptions::default().completion_timeout(Duration::from_millis(500)).on_complete(hook),
    );

    page.advance(Duration::from_millis(400));
    assert_eq!(count.get(), 0);
    assert_eq!(page.pending_observers(), 1);

    page.advance(Duration::from_millis(100));
    assert_eq!(count.get(), 1);
    assert_eq!(page.pending_observers(), 0);

    page.settle(TICK, Duration::from_secs(2));
    assert_eq!(count.get(), 1);
}

#[test]
fn smooth_scroll_without_callback_registers_no_observer() {
    let page = page();
    scroll_to_component(&page, "#pricing".into(), ScrollOptions::default());
    assert_eq!(page.pending_observers(), 0);
    assert!(page.is_animating());
}

#[test]
fn smooth_callback_may_read_the_page() {
    let page = Rc::new(page());
    let seen = Rc::new(Cell::new(-1.0));
    let hook = {
        let page = Rc::clone(&page);
        let seen = Rc::clone(&seen);
        move || seen.set(page.current_scroll_y())
    };
    scroll_to_component(&*page, "#pricing".into(), ScrollOptions::default().on_complete(hook));
    page.settle(TICK, Duration::from_secs(2));
    assert!(seen.get() > 0.0);
}

#[test]
fn default_options_are_smooth_with_bounded_timeout() {
    let options = ScrollOptions::default();
    assert_eq!(options.behavior, ScrollBehavior::Smooth);
    assert!(options.offset.abs() < f64::EPSILON);
    assert!(!options.skip_if_visible);
    assert!(options.callback.is_none());
    assert_eq!(options.completion_timeout, DEFAULT_COMPLETION_TIMEOUT);
}

#[test]
fn configured_timeout_reaches_the_observer() {
    let page = page();
    let (count, hook) = counter();
    let config = ClientConfig { scroll_completion_timeout: Duration::from_millis(200), ..ClientConfig::default() };
    scroll_to_component(&page, "#terms".into(), ScrollOptions::from_config(&config).on_complete(hook));

    page.advance(Duration::from_millis(150));
    assert_eq!(count.get(), 0);
    page.advance(Duration::from_millis(50));
    assert_eq!(count.get(), 1);
    assert_eq!(page.pending_observers(), 0);
}

#[test]
fn default_config_matches_default_options() {
    let options = ScrollOptions::from_config(&ClientConfig::default());
    assert_eq!(options.completion_timeout, DEFAULT_COMPLETION_TIMEOUT);
    assert_eq!(options.behavior, ScrollBehavior::Smooth);
}
