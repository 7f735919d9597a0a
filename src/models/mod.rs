pub mod item;
pub mod page;
pub mod view_mode;

pub use item::*;
pub use page::*;
pub use view_mode::*;
