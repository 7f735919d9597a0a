// Main window hosting the carousel screen
// Owns the item list and remounts the carousel when its options change

use gdk4::Display;
use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, CssProvider, Label, Orientation,
    Settings, STYLE_PROVIDER_PRIORITY_APPLICATION,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::carousel::{CarouselOptions, CarouselView};
use super::keybindings::{self, CarouselAction};
use crate::layout::page_count;
use crate::models::Item;

const WINDOW_WIDTH: i32 = 420;
const WINDOW_HEIGHT: i32 = 760;
const KEY_HINTS: &str = "←/→ page   v view   b border";

const CAROUSEL_CSS: &str = r#"
window {
    background-color: #212122;
    color: #e8e8e8;
}

.carousel {
    margin-top: 20px;
    padding-top: 20px;
}

.carousel-slot {
    margin: 3px;
    border-radius: 10px;
    background-color: #2b2b2c;
}

.carousel-slot.slot-empty {
    background-color: transparent;
}

.carousel-slot.slot-border {
    border: 1px solid #c3c3c3;
}

.no-image {
    color: #9a9a9a;
    font-size: 12px;
}

.dots-bar {
    margin: 20px;
    padding: 10px;
    background-color: rgba(53, 56, 57, 0.8);
    border-radius: 10px;
}

button.dot {
    min-width: 8px;
    min-height: 8px;
    padding: 0;
    border: none;
    border-radius: 4px;
    background-color: #e8e8e8;
    box-shadow: none;
    opacity: 0.5;
}

button.dot.dot-active {
    background-color: #ffffff;
    opacity: 1;
}

.status-bar {
    padding: 6px 12px;
}

.muted {
    color: #8a8a8a;
    font-size: 11px;
}
"#;

fn load_css() {
    let provider = CssProvider::new();
    provider.load_from_string(CAROUSEL_CSS);

    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    } else {
        tracing::warn!("No default display, carousel CSS not applied");
    }
}

/// Status line: source, view mode, image and page counts.
fn status_text(source: &str, items: &[Item], options: &CarouselOptions) -> String {
    let pages = page_count(items.len(), options.view);
    format!(
        "{}  |  {} view{}  |  {} images, {} pages",
        source,
        options.view,
        if options.border { ", border" } else { "" },
        items.len(),
        pages
    )
}

/// Main window for the carousel screen
pub struct MainWindow {
    window: ApplicationWindow,
    container: GtkBox,
    status_label: Label,
    source: String,
    items: Vec<Item>,
    options: Cell<CarouselOptions>,
    carousel: RefCell<Option<CarouselView>>,
}

impl MainWindow {
    pub fn new(
        app: &Application,
        source: String,
        items: Vec<Item>,
        options: CarouselOptions,
    ) -> Rc<Self> {
        load_css();
        if let Some(settings) = Settings::default() {
            settings.set_gtk_application_prefer_dark_theme(true);
        }

        let window = ApplicationWindow::builder()
            .application(app)
            .title("Image Carousel")
            .default_width(WINDOW_WIDTH)
            .default_height(WINDOW_HEIGHT)
            .build();

        let status_bar = GtkBox::new(Orientation::Vertical, 2);
        status_bar.add_css_class("status-bar");
        let status_label = Label::new(None);
        status_label.set_halign(Align::Start);
        status_label.add_css_class("muted");
        let hints_label = Label::new(Some(KEY_HINTS));
        hints_label.set_halign(Align::Start);
        hints_label.add_css_class("muted");
        status_bar.append(&status_label);
        status_bar.append(&hints_label);

        let container = GtkBox::new(Orientation::Vertical, 0);
        container.set_vexpand(true);
        container.set_valign(Align::Center);

        let layout = GtkBox::new(Orientation::Vertical, 0);
        layout.append(&status_bar);
        layout.append(&container);
        window.set_child(Some(&layout));

        let main_window = Rc::new(Self {
            window,
            container,
            status_label,
            source,
            items,
            options: Cell::new(options),
            carousel: RefCell::new(None),
        });
        let weak_self = Rc::downgrade(&main_window);
        keybindings::attach(&main_window.window, move |action| {
            if let Some(window) = weak_self.upgrade() {
                window.handle_action(action);
            }
        });

        main_window.mount_carousel();
        main_window
    }

    pub fn present(&self) {
        self.window.present();
    }

    /// Replace the carousel with a fresh one built from the current options.
    fn mount_carousel(&self) {
        let previous = self.carousel.borrow_mut().take();
        if let Some(previous) = previous {
            self.container.remove(previous.widget());
        }

        let options = self.options.get();
        let view = CarouselView::new(&self.items, options);
        self.container.append(view.widget());
        tracing::info!(
            view = %options.view,
            border = options.border,
            pages = view.page_count(),
            "Mounting carousel"
        );
        self.carousel.replace(Some(view));
        self.status_label
            .set_text(&status_text(&self.source, &self.items, &options));
    }

    fn handle_action(&self, action: CarouselAction) {
        let mut options = self.options.get();
        match action {
            CarouselAction::ToggleView => options.view = options.view.toggled(),
            CarouselAction::ToggleBorder => options.border = !options.border,
            _ => {
                if let Some(carousel) = self.carousel.borrow().as_ref() {
                    carousel.perform(action);
                    tracing::debug!(from = carousel.current_page(), ?action, "Navigating");
                }
                return;
            }
        }
        self.options.set(options);
        self.mount_carousel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ViewMode;

    #[test]
    fn test_css_styles_dots() {
        assert!(CAROUSEL_CSS.contains("button.dot.dot-active"));
        assert!(CAROUSEL_CSS.contains(".slot-border"));
    }

    #[test]
    fn test_status_text() {
        let items: Vec<Item> = (1..=8)
            .map(|i| Item::new(i, format!("{}", i), format!("{}.jpg", i)))
            .collect();
        let multi = CarouselOptions::default();
        assert_eq!(
            status_text("demo", &items, &multi),
            "demo  |  multi view  |  8 images, 2 pages"
        );

        let single = CarouselOptions {
            view: ViewMode::Single,
            border: true,
            ..multi
        };
        assert_eq!(
            status_text("demo", &items, &single),
            "demo  |  single view, border  |  8 images, 8 pages"
        );
    }
}
