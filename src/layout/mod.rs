pub mod grid;
pub mod paginate;

pub use grid::{grid_slots, GridSlot, SlotContent, NO_IMAGE_TEXT};
pub use paginate::{page_count, paginate};
