use gtk4::prelude::*;
use gtk4::{gio, Application};
use std::path::Path;

use crate::catalog::{demo_items, scan_directory};
use crate::config::CarouselConfig;
use crate::models::Item;
use crate::ui::{CarouselOptions, MainWindow};

const APP_ID: &str = "com.example.ImageCarousel";

pub struct CarouselApp {
    app: Application,
}

impl CarouselApp {
    pub fn new(config: CarouselConfig) -> Self {
        let app = Application::builder()
            .application_id(APP_ID)
            .flags(gio::ApplicationFlags::HANDLES_OPEN)
            .build();

        let activate_config = config.clone();
        app.connect_activate(move |app| {
            let items = demo_items(&activate_config.asset_dir);
            Self::show(app, "demo".to_string(), items, &activate_config);
        });
        app.connect_open(move |app, files, _hint| {
            let dir = files.first().and_then(|f| f.path());
            let (source, items) = match dir.as_deref().map(Self::load_directory) {
                Some(Some(loaded)) => loaded,
                _ => ("demo".to_string(), demo_items(&config.asset_dir)),
            };
            Self::show(app, source, items, &config);
        });

        Self { app }
    }

    pub fn run(&self) -> i32 {
        self.app.run().into()
    }

    fn load_directory(dir: &Path) -> Option<(String, Vec<Item>)> {
        match scan_directory(dir) {
            Ok(items) => Some((dir.display().to_string(), items)),
            Err(err) => {
                tracing::warn!(error = ?err, "Failed to scan directory, showing demo list");
                None
            }
        }
    }

    fn show(app: &Application, source: String, items: Vec<Item>, config: &CarouselConfig) {
        let options = CarouselOptions {
            view: config.view,
            border: config.border,
            throttle: config.throttle,
        };
        let window = MainWindow::new(app, source, items, options);
        window.present();
        // Keep the window alive by storing it on the Application.
        unsafe {
            app.set_data("main-window", window);
        }
    }
}
