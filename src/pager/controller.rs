use std::ops::Range;

use super::dots::{compute_dot_window, Dot, DotWindow};

/// Pages on each side of the current one that keep their images decoded.
pub const RESIDENT_RADIUS: usize = 1;

/// A request for the scroll surface to move to a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub page: usize,
    pub offset: f64,
    pub animated: bool,
}

/// Tracks the current page from the horizontal scroll offset and derives the
/// dot window from it.
///
/// This is component-local state: every carousel owns one controller and all
/// offset updates go through [`PagerController::on_scroll_offset_changed`].
#[derive(Debug, Clone)]
pub struct PagerController {
    total_pages: usize,
    current_page: usize,
    offset_x: f64,
    viewport_width: f64,
    dot_window: DotWindow,
}

impl PagerController {
    pub fn new(total_pages: usize) -> Self {
        Self {
            total_pages,
            current_page: 0,
            offset_x: 0.0,
            viewport_width: 0.0,
            dot_window: compute_dot_window(0, total_pages),
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    #[cfg(test)]
    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    #[cfg(test)]
    pub fn dot_window(&self) -> DotWindow {
        self.dot_window
    }

    pub fn dots(&self) -> impl Iterator<Item = Dot> {
        self.dot_window.dots(self.current_page)
    }

    /// Pages whose images should be loaded: the current page and its
    /// neighbours within [`RESIDENT_RADIUS`].
    pub fn resident_pages(&self) -> Range<usize> {
        let start = self.current_page.saturating_sub(RESIDENT_RADIUS);
        let end = self
            .current_page
            .saturating_add(RESIDENT_RADIUS + 1)
            .min(self.total_pages);
        start..end.max(start)
    }

    /// Records a new scroll offset.
    ///
    /// Returns the new page index when the page changed. Offsets that are not
    /// finite are ignored, and an unknown viewport width keeps the current page.
    pub fn on_scroll_offset_changed(&mut self, offset_x: f64) -> Option<usize> {
        if !offset_x.is_finite() {
            return None;
        }
        self.offset_x = offset_x;
        if !self.has_viewport() {
            return None;
        }

        let page = self.page_for_offset(offset_x);
        if page == self.current_page {
            return None;
        }
        self.set_current_page(page);
        Some(page)
    }

    /// Builds an animated request for the scroll surface to show `page`.
    ///
    /// Out-of-range pages are clamped. Returns `None` when there is nothing
    /// to scroll to.
    pub fn scroll_to_page(&self, page: usize) -> Option<ScrollRequest> {
        if self.total_pages == 0 {
            return None;
        }
        let page = page.min(self.total_pages - 1);
        Some(ScrollRequest {
            page,
            offset: page as f64 * self.viewport_width,
            animated: true,
        })
    }

    pub fn on_dot_tapped(&self, dot_index: usize) -> Option<ScrollRequest> {
        self.scroll_to_page(dot_index)
    }

    pub fn next_page(&self) -> Option<ScrollRequest> {
        self.scroll_to_page(self.current_page.saturating_add(1))
    }

    pub fn previous_page(&self) -> Option<ScrollRequest> {
        self.scroll_to_page(self.current_page.saturating_sub(1))
    }

    /// Snaps back onto the current page once a scroll gesture has ended.
    pub fn settle(&self) -> Option<ScrollRequest> {
        if !self.has_viewport() {
            return None;
        }
        let request = self.scroll_to_page(self.current_page)?;
        ((request.offset - self.offset_x).abs() > 0.5).then_some(request)
    }

    /// Stores a new viewport width and returns a jump that keeps the current
    /// page aligned under the resized viewport.
    pub fn set_viewport_width(&mut self, width: f64) -> Option<ScrollRequest> {
        if !width.is_finite() || width <= 0.0 || width == self.viewport_width {
            return None;
        }
        self.viewport_width = width;
        self.scroll_to_page(self.current_page)
            .map(|request| ScrollRequest {
                animated: false,
                ..request
            })
    }

    fn has_viewport(&self) -> bool {
        self.viewport_width.is_finite() && self.viewport_width > 0.0
    }

    fn page_for_offset(&self, offset_x: f64) -> usize {
        let raw = (offset_x / self.viewport_width).round();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(self.total_pages.saturating_sub(1))
        }
    }

    fn set_current_page(&mut self, page: usize) {
        self.current_page = page;
        self.dot_window = compute_dot_window(page, self.total_pages);
        tracing::debug!(
            page,
            start = self.dot_window.start_index,
            visible = self.dot_window.visible_count,
            "Current page changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::paginate;
    use crate::models::{Item, ViewMode};

    const WIDTH: f64 = 390.0;

    fn controller(total_pages: usize) -> PagerController {
        let mut controller = PagerController::new(total_pages);
        controller.set_viewport_width(WIDTH);
        controller
    }

    #[test]
    fn test_offset_rounds_to_nearest_page() {
        let mut pager = controller(12);
        assert_eq!(pager.on_scroll_offset_changed(WIDTH * 0.4), None);
        assert_eq!(pager.current_page(), 0);
        assert_eq!(pager.on_scroll_offset_changed(WIDTH * 0.6), Some(1));
        assert_eq!(pager.on_scroll_offset_changed(WIDTH * 6.2), Some(6));
        assert_eq!(
            pager.dot_window(),
            DotWindow {
                start_index: 4,
                visible_count: 5
            }
        );
    }

    #[test]
    fn test_overscroll_is_clamped() {
        let mut pager = controller(3);
        assert_eq!(pager.on_scroll_offset_changed(WIDTH * 40.0), Some(2));
        assert_eq!(pager.on_scroll_offset_changed(-WIDTH * 3.0), Some(0));
        assert_eq!(pager.on_scroll_offset_changed(f64::NAN), None);
        assert_eq!(pager.current_page(), 0);
    }

    #[test]
    fn test_scroll_to_page_then_offset_lands_on_page() {
        for k in 0..12 {
            let mut pager = controller(12);
            let request = pager.scroll_to_page(k).unwrap();
            assert!(request.animated);
            pager.on_scroll_offset_changed(request.offset);
            assert_eq!(pager.current_page(), k);
            assert!(pager.dot_window().contains(k));
        }
    }

    #[test]
    fn test_scroll_to_page_clamps() {
        let pager = controller(4);
        let request = pager.scroll_to_page(99).unwrap();
        assert_eq!(request.page, 3);
        assert!((request.offset - 3.0 * WIDTH).abs() < f64::EPSILON);
        assert_eq!(controller(0).scroll_to_page(0), None);
    }

    #[test]
    fn test_dot_tap_is_scroll_to_page() {
        let pager = controller(12);
        assert_eq!(pager.on_dot_tapped(7), pager.scroll_to_page(7));
    }

    #[test]
    fn test_neighbour_navigation() {
        let mut pager = controller(3);
        assert_eq!(pager.previous_page().map(|r| r.page), Some(0));
        assert_eq!(pager.next_page().map(|r| r.page), Some(1));
        pager.on_scroll_offset_changed(WIDTH * 2.0);
        assert_eq!(pager.next_page().map(|r| r.page), Some(2));
    }

    #[test]
    fn test_unknown_viewport_keeps_page() {
        let mut pager = PagerController::new(5);
        assert_eq!(pager.on_scroll_offset_changed(800.0), None);
        assert_eq!(pager.current_page(), 0);
        assert_eq!(pager.settle(), None);
    }

    #[test]
    fn test_resize_realigns_current_page() {
        let mut pager = controller(5);
        pager.on_scroll_offset_changed(WIDTH * 2.0);
        let request = pager.set_viewport_width(500.0).unwrap();
        assert!(!request.animated);
        assert_eq!(request.page, 2);
        assert!((request.offset - 1000.0).abs() < f64::EPSILON);
        assert_eq!(pager.set_viewport_width(500.0), None);
        assert_eq!(pager.set_viewport_width(0.0), None);
    }

    #[test]
    fn test_settle_snaps_to_current_page() {
        let mut pager = controller(5);
        pager.on_scroll_offset_changed(WIDTH * 1.3);
        let request = pager.settle().unwrap();
        assert_eq!(request.page, 1);
        pager.on_scroll_offset_changed(request.offset);
        assert_eq!(pager.settle(), None);
    }

    #[test]
    fn test_eight_items_multi_end_to_end() {
        let items: Vec<Item> = (1..=8)
            .map(|i| Item::new(i, format!("{}", i), format!("{}.jpg", i)))
            .collect();
        let pages = paginate(&items, ViewMode::Multi);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].ids(), vec![1, 2, 3, 4]);
        assert_eq!(pages[1].ids(), vec![5, 6, 7, 8]);

        let mut pager = controller(pages.len());
        assert_eq!(
            pager.dot_window(),
            DotWindow {
                start_index: 0,
                visible_count: 2
            }
        );
        let dots: Vec<Dot> = pager.dots().collect();
        assert_eq!(
            dots,
            vec![
                Dot {
                    index: 0,
                    active: true
                },
                Dot {
                    index: 1,
                    active: false
                }
            ]
        );

        let request = pager.on_dot_tapped(1).unwrap();
        pager.on_scroll_offset_changed(request.offset);
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.dot_window().start_index, 0);
    }

    #[test]
    fn test_resident_pages_follow_current_page() {
        let mut pager = controller(100);
        assert_eq!(pager.resident_pages(), 0..2);
        pager.on_scroll_offset_changed(WIDTH * 40.0);
        assert_eq!(pager.resident_pages(), 39..42);
        pager.on_scroll_offset_changed(WIDTH * 99.0);
        assert_eq!(pager.resident_pages(), 98..100);

        assert_eq!(controller(1).resident_pages(), 0..1);
        assert!(controller(0).resident_pages().is_empty());
    }

    #[test]
    fn test_empty_controller() {
        let mut pager = controller(0);
        assert_eq!(pager.on_scroll_offset_changed(WIDTH), None);
        assert_eq!(pager.current_page(), 0);
        assert_eq!(pager.dots().count(), 0);
    }
}
