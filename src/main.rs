mod app;
mod catalog;
mod config;
mod image_loader;
mod layout;
mod models;
mod pager;
mod ui;

use app::CarouselApp;
use config::CarouselConfig;

fn main() {
    // Prefer C numeric locale up-front; GTK may later adjust locale again.
    std::env::set_var("LC_NUMERIC", "C");
    unsafe {
        libc::setlocale(libc::LC_NUMERIC, b"C\0".as_ptr().cast());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("image_carousel=info".parse().unwrap()),
        )
        .init();

    let config = CarouselConfig::from_env();
    tracing::info!(
        view = %config.view,
        border = config.border,
        throttle_ms = config.throttle.as_millis() as u64,
        "Starting image carousel"
    );

    let app = CarouselApp::new(config);
    std::process::exit(app.run());
}
