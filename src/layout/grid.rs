// Render-time slot arrangement for a page.
// Pagination never pads; this is where a multi page gets its fixed 2x2 shape.

use crate::models::{Item, Page, ViewMode};

/// Fallback text shown in a slot whose item has no image.
pub const NO_IMAGE_TEXT: &str = "No Image";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotContent<'a> {
    /// Item with an image reference
    Image(&'a Item),
    /// Item without an image reference; renders [`NO_IMAGE_TEXT`]
    Missing(&'a Item),
    /// Position past the end of the list
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSlot<'a> {
    pub row: usize,
    pub col: usize,
    pub content: SlotContent<'a>,
}

impl<'a> GridSlot<'a> {
    pub fn item(&self) -> Option<&'a Item> {
        match self.content {
            SlotContent::Image(item) | SlotContent::Missing(item) => Some(item),
            SlotContent::Empty => None,
        }
    }
}

/// Lays out a page into the fixed grid of its view mode, in row-major order.
pub fn grid_slots<'a>(page: &Page<'a>, mode: ViewMode) -> Vec<GridSlot<'a>> {
    let (rows, cols) = mode.grid_shape();
    (0..rows * cols)
        .map(|flat| {
            let content = match page.items.get(flat) {
                Some(item) if item.has_image() => SlotContent::Image(item),
                Some(item) => SlotContent::Missing(item),
                None => SlotContent::Empty,
            };
            GridSlot {
                row: flat / cols,
                col: flat % cols,
                content,
            }
        })
        .collect()
}
