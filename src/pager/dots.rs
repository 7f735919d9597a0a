/// Upper bound on page-indicator dots shown at once.
pub const MAX_VISIBLE_DOTS: usize = 5;

/// The visible slice of page-indicator dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DotWindow {
    pub start_index: usize,
    pub visible_count: usize,
}

/// One visible dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot {
    /// Page this dot jumps to
    pub index: usize,
    pub active: bool,
}

impl DotWindow {
    pub fn end_index(&self) -> usize {
        self.start_index + self.visible_count
    }

    #[cfg(test)]
    pub fn contains(&self, page: usize) -> bool {
        (self.start_index..self.end_index()).contains(&page)
    }

    /// Dots in this window, with the one for `current_page` marked active.
    pub fn dots(&self, current_page: usize) -> impl Iterator<Item = Dot> {
        (self.start_index..self.end_index()).map(move |index| Dot {
            index,
            active: index == current_page,
        })
    }
}

/// Computes the sliding dot window for the current page.
///
/// The window centres on the active page and pins to the list edges near
/// the boundaries:
/// 1. `visible = min(5, total)`
/// 2. `start = max(0, current - visible/2)`
/// 3. once `current >= total - visible/2`, `start = max(0, total - visible)`
pub fn compute_dot_window(current_page: usize, total_pages: usize) -> DotWindow {
    let visible_count = MAX_VISIBLE_DOTS.min(total_pages);
    let half = visible_count / 2;

    let mut start_index = current_page.saturating_sub(half);
    if current_page >= total_pages.saturating_sub(half) {
        start_index = total_pages.saturating_sub(visible_count);
    }

    DotWindow {
        start_index,
        visible_count,
    }
}
