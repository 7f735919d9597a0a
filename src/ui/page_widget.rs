// Page widget for one carousel page
// Lays the page's slots out on a fixed grid; multi pages always keep 2x2

use glib::Object;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{
    glib, Align, Box as GtkBox, ContentFit, Grid, Label, Orientation, Overflow, Overlay, Picture,
};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use super::texture_loader::{cancel_texture, placeholder_texture, request_texture};
use crate::layout::{grid_slots, GridSlot, SlotContent, NO_IMAGE_TEXT};
use crate::models::{Page, ViewMode};

/// Slot size in single view, in pixels
const SINGLE_SLOT_SIZE: (i32, i32) = (320, 450);
/// Slot size in multi view, in pixels
const MULTI_SLOT_SIZE: (i32, i32) = (160, 220);
const SLOT_SPACING: i32 = 6;
/// Matches the `.carousel-slot` margin in the window stylesheet
const SLOT_MARGIN: i32 = 3;

pub fn slot_size(mode: ViewMode) -> (i32, i32) {
    match mode {
        ViewMode::Single => SINGLE_SLOT_SIZE,
        ViewMode::Multi => MULTI_SLOT_SIZE,
    }
}

/// Narrowest width a page can be laid out at, from its slot grid.
pub fn min_page_width(mode: ViewMode) -> i32 {
    let (_, cols) = mode.grid_shape();
    let cols = cols as i32;
    cols * (slot_size(mode).0 + 2 * SLOT_MARGIN) + (cols - 1) * SLOT_SPACING
}

/// CSS classes for a slot's frame.
pub fn slot_css_classes(content: &SlotContent<'_>, border: bool) -> Vec<&'static str> {
    let mut classes = vec!["carousel-slot"];
    match content {
        SlotContent::Image(_) => {}
        SlotContent::Missing(_) => classes.push("slot-missing"),
        SlotContent::Empty => classes.push("slot-empty"),
    }
    // Empty slots reserve space only, so they never get a border
    if border && !matches!(content, SlotContent::Empty) {
        classes.push("slot-border");
    }
    classes
}

mod imp {
    use super::*;

    /// Rendered image slot
    pub struct ImageSlot {
        pub path: PathBuf,
        pub picture: Picture,
        pub fallback: Label,
    }

    #[derive(Default)]
    pub struct PageWidgetInner {
        pub grid: RefCell<Option<Grid>>,
        pub slots: RefCell<Vec<Option<ImageSlot>>>,
        pub loaded: Cell<bool>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for PageWidgetInner {
        const NAME: &'static str = "CarouselPageWidget";
        type Type = super::PageWidget;
        type ParentType = GtkBox;
    }

    impl ObjectImpl for PageWidgetInner {
        fn constructed(&self) {
            self.parent_constructed();

            let obj = self.obj();
            obj.set_orientation(Orientation::Vertical);
            obj.set_halign(Align::Fill);
            obj.set_valign(Align::Center);
            obj.set_hexpand(false);
            obj.add_css_class("carousel-page");

            let grid = Grid::new();
            grid.set_row_spacing(SLOT_SPACING as u32);
            grid.set_column_spacing(SLOT_SPACING as u32);
            grid.set_halign(Align::Center);
            grid.set_valign(Align::Center);
            grid.set_vexpand(true);
            obj.append(&grid);
            self.grid.replace(Some(grid));
        }
    }

    impl WidgetImpl for PageWidgetInner {}
    impl BoxImpl for PageWidgetInner {}
}

glib::wrapper! {
    pub struct PageWidget(ObjectSubclass<imp::PageWidgetInner>)
        @extends GtkBox, gtk4::Widget,
        @implements gtk4::Accessible, gtk4::Buildable, gtk4::ConstraintTarget, gtk4::Orientable;
}

impl PageWidget {
    /// Builds the widget for one page. Images stay on the placeholder until
    /// [`PageWidget::load_images`] is called.
    pub fn new(page: &Page<'_>, mode: ViewMode, border: bool) -> Self {
        let widget: Self = Object::builder().build();
        widget.bind(page, mode, border);
        widget
    }

    fn bind(&self, page: &Page<'_>, mode: ViewMode, border: bool) {
        let imp = self.imp();
        let Some(grid) = imp.grid.borrow().clone() else {
            return;
        };

        let mut slots = Vec::new();
        for slot in grid_slots(page, mode) {
            let (frame, image_slot) = self.create_slot(&slot, mode, border);
            grid.attach(&frame, slot.col as i32, slot.row as i32, 1, 1);
            slots.push(image_slot);
        }
        imp.slots.replace(slots);
    }

    /// Starts decoding this page's images. Does nothing if already loaded.
    pub fn load_images(&self) {
        let imp = self.imp();
        if imp.loaded.replace(true) {
            return;
        }
        for (index, slot) in imp.slots.borrow().iter().enumerate() {
            if let Some(slot) = slot {
                request_texture(self, index, &slot.path);
            }
        }
    }

    /// Drops decoded textures and pending decodes, back to the placeholder.
    pub fn unload_images(&self) {
        let imp = self.imp();
        if !imp.loaded.replace(false) {
            return;
        }
        for slot in imp.slots.borrow().iter().flatten() {
            cancel_texture(self, &slot.path);
            slot.picture.set_paintable(Some(placeholder_texture()));
            slot.picture.set_visible(true);
            slot.fallback.set_visible(false);
        }
    }

    fn create_slot(
        &self,
        slot: &GridSlot<'_>,
        mode: ViewMode,
        border: bool,
    ) -> (gtk4::Widget, Option<imp::ImageSlot>) {
        let (width, height) = slot_size(mode);
        let frame = GtkBox::new(Orientation::Vertical, 0);
        frame.set_size_request(width, height);
        frame.set_overflow(Overflow::Hidden);
        for class in slot_css_classes(&slot.content, border) {
            frame.add_css_class(class);
        }
        if let Some(item) = slot.item() {
            frame.set_tooltip_text(Some(item.title.as_str()));
        }

        let image_slot = match slot.content {
            SlotContent::Image(item) => {
                let picture = Picture::new();
                picture.set_can_shrink(true);
                picture.set_content_fit(ContentFit::Cover);
                picture.set_hexpand(true);
                picture.set_vexpand(true);
                picture.set_paintable(Some(placeholder_texture()));

                let fallback = no_image_label();
                fallback.set_visible(false);

                let overlay = Overlay::new();
                overlay.set_child(Some(&picture));
                overlay.add_overlay(&fallback);
                overlay.set_vexpand(true);
                frame.append(&overlay);

                item.image().map(|path| imp::ImageSlot {
                    path: path.to_path_buf(),
                    picture,
                    fallback,
                })
            }
            SlotContent::Missing(_) => {
                frame.append(&no_image_label());
                None
            }
            SlotContent::Empty => None,
        };

        (frame.upcast(), image_slot)
    }

    /// Applies a decoded texture to slot `index`. `None` means decoding
    /// failed and the slot shows the fallback text. Late results for an
    /// unloaded page are ignored.
    pub fn apply_texture(
        &self,
        index: usize,
        expected_path: &Path,
        texture: Option<&gdk4::Texture>,
    ) {
        if !self.imp().loaded.get() {
            return;
        }
        let slots = self.imp().slots.borrow();
        let Some(Some(slot)) = slots.get(index) else {
            return;
        };
        if slot.path != expected_path {
            return;
        }
        match texture {
            Some(texture) => {
                slot.picture.set_paintable(Some(texture));
                slot.picture.set_visible(true);
                slot.fallback.set_visible(false);
            }
            None => {
                slot.picture.set_visible(false);
                slot.fallback.set_visible(true);
            }
        }
    }

    /// Match the page width to the viewport so one page fills one swipe.
    pub fn set_page_width(&self, width: i32) {
        self.set_size_request(width.max(1), -1);
    }
}

fn no_image_label() -> Label {
    let label = Label::new(Some(NO_IMAGE_TEXT));
    label.set_halign(Align::Center);
    label.set_valign(Align::Center);
    label.set_hexpand(true);
    label.set_vexpand(true);
    label.add_css_class("no-image");
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;

    #[test]
    fn test_slot_sizes_follow_mode() {
        assert_eq!(slot_size(ViewMode::Single), (320, 450));
        assert_eq!(slot_size(ViewMode::Multi), (160, 220));
    }

    #[test]
    fn test_min_page_width_covers_slot_grid() {
        assert_eq!(min_page_width(ViewMode::Single), 326);
        assert_eq!(min_page_width(ViewMode::Multi), 2 * 166 + 6);
    }

    #[test]
    fn test_border_class_applies_to_filled_slots_only() {
        let item = Item::new(1, "Beer", "seven.jpg");
        let missing = Item::without_image(2, "Zermatt");

        let image = slot_css_classes(&SlotContent::Image(&item), true);
        assert!(image.contains(&"slot-border"));

        let missing = slot_css_classes(&SlotContent::Missing(&missing), true);
        assert!(missing.contains(&"slot-border"));
        assert!(missing.contains(&"slot-missing"));

        let empty = slot_css_classes(&SlotContent::Empty, true);
        assert!(!empty.contains(&"slot-border"));
        assert!(empty.contains(&"slot-empty"));

        let plain = slot_css_classes(&SlotContent::Image(&item), false);
        assert_eq!(plain, vec!["carousel-slot"]);
    }
}
