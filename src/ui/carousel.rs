// Carousel widget: horizontally paged ScrolledWindow plus the dot strip
// Scroll offsets flow adjustment -> ScrollFeed -> Throttle -> PagerController

use gtk4::prelude::*;
use gtk4::{
    glib, Adjustment, Align, Box as GtkBox, Button, EventControllerScroll,
    EventControllerScrollFlags, Orientation, PolicyType, ScrolledWindow, TickCallbackId,
};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use super::keybindings::CarouselAction;
use super::page_widget::{min_page_width, PageWidget};
use crate::layout::paginate;
use crate::models::{Item, ViewMode};
use crate::pager::throttle::DEFAULT_THROTTLE;
use crate::pager::{
    PagerController, ScrollFeed, ScrollRequest, ScrollSubscription, Throttle, MAX_VISIBLE_DOTS,
};

/// Duration of an animated page scroll, in microseconds of frame time.
const SCROLL_ANIMATION_US: i64 = 280_000;
/// Quiet period after the last scroll event before snapping to a page.
const SETTLE_DELAY: Duration = Duration::from_millis(160);
const DOT_SPACING: i32 = 10;

/// Options the host screen mounts a carousel with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselOptions {
    pub view: ViewMode,
    pub border: bool,
    pub throttle: Duration,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            view: ViewMode::Multi,
            border: false,
            throttle: DEFAULT_THROTTLE,
        }
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

fn interpolate(from: f64, to: f64, progress: f64) -> f64 {
    from + (to - from) * progress
}

/// Whole-pixel width of one page for a viewport. Pages never shrink below
/// their slot grid, so the stride can exceed the viewport.
fn page_stride(viewport_width: f64, min_width: i32) -> Option<i32> {
    if !viewport_width.is_finite() || viewport_width <= 0.0 {
        return None;
    }
    Some((viewport_width.round() as i32).max(min_width).max(1))
}

struct DotButton {
    button: Button,
    target: Rc<Cell<usize>>,
}

struct CarouselState {
    self_weak: Weak<CarouselState>,
    scrolled_window: ScrolledWindow,
    pages: Vec<PageWidget>,
    min_page_width: i32,
    dots: Vec<DotButton>,
    controller: RefCell<PagerController>,
    throttle: RefCell<Throttle<f64>>,
    feed: ScrollFeed,
    subscription: RefCell<Option<ScrollSubscription>>,
    flush_scheduled: Cell<bool>,
    settle_generation: Cell<u64>,
    animation: RefCell<Option<TickCallbackId>>,
}

impl CarouselState {
    fn hadjustment(&self) -> Adjustment {
        self.scrolled_window.hadjustment()
    }

    fn mount(&self) {
        if self.subscription.borrow().is_some() {
            return;
        }
        let weak = self.self_weak.clone();
        let subscription = self.feed.subscribe(move |offset| {
            if let Some(state) = weak.upgrade() {
                state.on_offset(offset);
            }
        });
        self.subscription.replace(Some(subscription));
        tracing::info!(pages = self.pages.len(), "Carousel mounted");

        self.on_viewport_resized(self.hadjustment().page_size());
        self.apply_offset(self.hadjustment().value());
        self.sync_loaded_pages();
    }

    fn unmount(&self) {
        self.cancel_animation();
        self.throttle.borrow_mut().reset();
        for page in &self.pages {
            page.unload_images();
        }
        if self.subscription.borrow_mut().take().is_some() {
            tracing::info!("Carousel unmounted, scroll listener released");
        }
    }

    fn on_offset(&self, offset: f64) {
        let now = Instant::now();
        let sample = self.throttle.borrow_mut().offer(offset, now);
        match sample {
            Some(offset) => self.apply_offset(offset),
            None => self.schedule_flush(now),
        }
        if self.animation.borrow().is_none() {
            self.schedule_settle();
        }
    }

    fn apply_offset(&self, offset: f64) {
        let changed = self
            .controller
            .borrow_mut()
            .on_scroll_offset_changed(offset);
        if changed.is_some() {
            self.refresh_dots();
            self.sync_loaded_pages();
        }
    }

    /// Keep images decoded only around the current page.
    fn sync_loaded_pages(&self) {
        let resident = self.controller.borrow().resident_pages();
        for (index, page) in self.pages.iter().enumerate() {
            if resident.contains(&index) {
                page.load_images();
            } else {
                page.unload_images();
            }
        }
    }

    fn schedule_flush(&self, now: Instant) {
        if self.flush_scheduled.replace(true) {
            return;
        }
        // Round up so the timer never fires before the window closes.
        let delay = self.throttle.borrow().remaining(now) + Duration::from_millis(1);
        let weak = self.self_weak.clone();
        glib::timeout_add_local_once(delay, move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            state.flush_scheduled.set(false);
            if state.subscription.borrow().is_none() {
                return;
            }
            let sample = state.throttle.borrow_mut().flush(Instant::now());
            match sample {
                Some(offset) => state.apply_offset(offset),
                None if state.throttle.borrow().has_pending() => {
                    state.schedule_flush(Instant::now())
                }
                None => {}
            }
        });
    }

    fn schedule_settle(&self) {
        let generation = self.settle_generation.get().wrapping_add(1);
        self.settle_generation.set(generation);
        let weak = self.self_weak.clone();
        glib::timeout_add_local_once(SETTLE_DELAY, move || {
            if let Some(state) = weak.upgrade() {
                if state.settle_generation.get() == generation {
                    state.settle();
                }
            }
        });
    }

    /// Snap to the nearest page once scrolling has gone quiet.
    fn settle(&self) {
        if self.subscription.borrow().is_none() || self.animation.borrow().is_some() {
            return;
        }
        self.throttle.borrow_mut().reset();
        self.apply_offset(self.hadjustment().value());
        let request = self.controller.borrow().settle();
        if let Some(request) = request {
            self.apply_request(request);
        }
    }

    fn on_viewport_resized(&self, width: f64) {
        let Some(stride) = page_stride(width, self.min_page_width) else {
            return;
        };
        // Page widths and scroll offsets share one stride
        for page in &self.pages {
            page.set_page_width(stride);
        }
        let request = self
            .controller
            .borrow_mut()
            .set_viewport_width(f64::from(stride));
        if let Some(request) = request {
            tracing::debug!(width, stride, page = request.page, "Viewport resized");
            // Wait for the new page widths to reach the adjustment bounds.
            let weak = self.self_weak.clone();
            glib::idle_add_local_once(move || {
                let Some(state) = weak.upgrade() else {
                    return;
                };
                if state.subscription.borrow().is_none() {
                    return;
                }
                state.apply_request(request);
            });
        }
    }

    fn on_dot_tapped(&self, dot_index: usize) {
        let request = self.controller.borrow().on_dot_tapped(dot_index);
        if let Some(request) = request {
            tracing::debug!(page = request.page, "Dot tapped");
            self.apply_request(request);
        }
    }

    fn perform(&self, action: CarouselAction) {
        let request = {
            let controller = self.controller.borrow();
            match action {
                CarouselAction::PreviousPage => controller.previous_page(),
                CarouselAction::NextPage => controller.next_page(),
                CarouselAction::FirstPage => controller.scroll_to_page(0),
                CarouselAction::LastPage => {
                    controller.scroll_to_page(controller.total_pages().saturating_sub(1))
                }
                CarouselAction::ToggleView | CarouselAction::ToggleBorder => None,
            }
        };
        if let Some(request) = request {
            self.apply_request(request);
        }
    }

    fn apply_request(&self, request: ScrollRequest) {
        if request.animated {
            self.animate_to(request.offset);
        } else {
            self.cancel_animation();
            self.hadjustment().set_value(request.offset);
        }
    }

    fn animate_to(&self, target: f64) {
        self.cancel_animation();
        let adjustment = self.hadjustment();
        let start = adjustment.value();
        if (target - start).abs() < 0.5 {
            adjustment.set_value(target);
            return;
        }

        let weak = self.self_weak.clone();
        let started_at: Cell<Option<i64>> = Cell::new(None);
        let id = self
            .scrolled_window
            .add_tick_callback(move |_, clock| {
                let now = clock.frame_time();
                let t0 = started_at.get().unwrap_or(now);
                started_at.set(Some(t0));
                let progress = ((now - t0) as f64 / SCROLL_ANIMATION_US as f64).min(1.0);
                adjustment.set_value(interpolate(start, target, ease_out_cubic(progress)));
                if progress < 1.0 {
                    return glib::ControlFlow::Continue;
                }
                if let Some(state) = weak.upgrade() {
                    state.animation.borrow_mut().take();
                }
                glib::ControlFlow::Break
            });
        self.animation.replace(Some(id));
    }

    fn cancel_animation(&self) {
        let running = self.animation.borrow_mut().take();
        if let Some(id) = running {
            id.remove();
        }
    }

    fn refresh_dots(&self) {
        let dots: Vec<_> = self.controller.borrow().dots().collect();
        for (slot, button) in self.dots.iter().enumerate() {
            match dots.get(slot) {
                Some(dot) => {
                    button.target.set(dot.index);
                    button.button.set_visible(true);
                    button
                        .button
                        .set_tooltip_text(Some(format!("Page {}", dot.index + 1).as_str()));
                    if dot.active {
                        button.button.add_css_class("dot-active");
                    } else {
                        button.button.remove_css_class("dot-active");
                    }
                }
                None => button.button.set_visible(false),
            }
        }
    }
}

/// Horizontally paged image carousel with a page-indicator strip.
pub struct CarouselView {
    root: GtkBox,
    state: Rc<CarouselState>,
    adjustment_handlers: Vec<glib::SignalHandlerId>,
    lifecycle_handlers: Vec<glib::SignalHandlerId>,
}

impl CarouselView {
    pub fn new(items: &[Item], options: CarouselOptions) -> Self {
        let pages = paginate(items, options.view);
        let total_pages = pages.len();

        let content = GtkBox::new(Orientation::Horizontal, 0);
        content.add_css_class("carousel-content");
        let page_widgets: Vec<PageWidget> = pages
            .iter()
            .map(|page| PageWidget::new(page, options.view, options.border))
            .collect();
        for page in &page_widgets {
            content.append(page);
        }

        // External keeps horizontal scrolling without showing a scrollbar
        let scrolled_window = ScrolledWindow::builder()
            .hscrollbar_policy(PolicyType::External)
            .vscrollbar_policy(PolicyType::Never)
            .kinetic_scrolling(true)
            .propagate_natural_width(false)
            .propagate_natural_height(true)
            .hexpand(true)
            .vexpand(true)
            .child(&content)
            .build();
        scrolled_window.add_css_class("carousel-scroller");

        let dots_box = GtkBox::new(Orientation::Horizontal, DOT_SPACING);
        dots_box.set_halign(Align::Center);
        dots_box.add_css_class("dots-bar");
        dots_box.set_visible(total_pages > 0);
        let dots: Vec<DotButton> = (0..MAX_VISIBLE_DOTS.min(total_pages))
            .map(|_| {
                let button = Button::new();
                button.add_css_class("dot");
                button.set_focus_on_click(false);
                dots_box.append(&button);
                DotButton {
                    button,
                    target: Rc::new(Cell::new(0)),
                }
            })
            .collect();

        let root = GtkBox::new(Orientation::Vertical, 0);
        root.add_css_class("carousel");
        root.append(&scrolled_window);
        root.append(&dots_box);

        let state = Rc::new_cyclic(|self_weak| CarouselState {
            self_weak: self_weak.clone(),
            scrolled_window: scrolled_window.clone(),
            pages: page_widgets,
            min_page_width: min_page_width(options.view),
            dots,
            controller: RefCell::new(PagerController::new(total_pages)),
            throttle: RefCell::new(Throttle::new(options.throttle)),
            feed: ScrollFeed::new(),
            subscription: RefCell::new(None),
            flush_scheduled: Cell::new(false),
            settle_generation: Cell::new(0),
            animation: RefCell::new(None),
        });

        for dot in &state.dots {
            let weak = Rc::downgrade(&state);
            let target = dot.target.clone();
            dot.button.connect_clicked(move |_| {
                if let Some(state) = weak.upgrade() {
                    state.on_dot_tapped(target.get());
                }
            });
        }

        // A user gesture takes over from any running page animation.
        let scroll_controller = EventControllerScroll::new(EventControllerScrollFlags::BOTH_AXES);
        let weak = Rc::downgrade(&state);
        scroll_controller.connect_scroll_begin(move |_| {
            if let Some(state) = weak.upgrade() {
                state.cancel_animation();
            }
        });
        scrolled_window.add_controller(scroll_controller);

        let hadjustment = scrolled_window.hadjustment();
        let feed = state.feed.clone();
        let value_handler = hadjustment.connect_value_changed(move |adj| feed.emit(adj.value()));
        let weak = Rc::downgrade(&state);
        let bounds_handler = hadjustment.connect_changed(move |adj| {
            if let Some(state) = weak.upgrade() {
                state.on_viewport_resized(adj.page_size());
            }
        });

        let weak = Rc::downgrade(&state);
        let realize_handler = root.connect_realize(move |_| {
            if let Some(state) = weak.upgrade() {
                state.mount();
            }
        });
        let weak = Rc::downgrade(&state);
        let unrealize_handler = root.connect_unrealize(move |_| {
            if let Some(state) = weak.upgrade() {
                state.unmount();
            }
        });

        state.refresh_dots();

        Self {
            root,
            state,
            adjustment_handlers: vec![value_handler, bounds_handler],
            lifecycle_handlers: vec![realize_handler, unrealize_handler],
        }
    }

    /// Get the root widget to add to the host screen
    pub fn widget(&self) -> &GtkBox {
        &self.root
    }

    pub fn page_count(&self) -> usize {
        self.state.controller.borrow().total_pages()
    }

    pub fn current_page(&self) -> usize {
        self.state.controller.borrow().current_page()
    }

    pub fn perform(&self, action: CarouselAction) {
        self.state.perform(action);
    }
}

impl Drop for CarouselView {
    fn drop(&mut self) {
        self.state.unmount();
        let hadjustment = self.state.hadjustment();
        for id in self.adjustment_handlers.drain(..) {
            hadjustment.disconnect(id);
        }
        for id in self.lifecycle_handlers.drain(..) {
            self.root.disconnect(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_out_cubic_bounds() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn test_interpolate() {
        assert_eq!(interpolate(0.0, 780.0, 0.0), 0.0);
        assert_eq!(interpolate(0.0, 780.0, 1.0), 780.0);
        assert_eq!(interpolate(780.0, 390.0, 0.5), 585.0);
    }

    #[test]
    fn test_page_stride_is_whole_pixels() {
        assert_eq!(page_stride(390.4, 326), Some(390));
        assert_eq!(page_stride(390.6, 326), Some(391));
        assert_eq!(page_stride(0.0, 326), None);
        assert_eq!(page_stride(f64::NAN, 326), None);
    }

    #[test]
    fn test_narrow_viewport_uses_page_minimum() {
        let stride = page_stride(200.0, 326).unwrap();
        assert_eq!(stride, 326);

        // Offsets derived from the stride land exactly on page boundaries
        let mut pager = PagerController::new(6);
        pager.set_viewport_width(f64::from(stride));
        for k in 0..6 {
            let request = pager.scroll_to_page(k).unwrap();
            assert_eq!(request.offset, f64::from(stride * k as i32));
            pager.on_scroll_offset_changed(request.offset);
            assert_eq!(pager.current_page(), k);
        }
    }

    #[test]
    fn test_default_options() {
        let options = CarouselOptions::default();
        assert_eq!(options.view, ViewMode::Multi);
        assert!(!options.border);
        assert_eq!(options.throttle, Duration::from_millis(200));
    }
}
