pub mod carousel;
pub mod keybindings;
pub mod page_widget;
pub mod texture_loader;
pub mod window;

pub use carousel::CarouselOptions;
pub use window::MainWindow;
