pub mod controller;
pub mod dots;
pub mod feed;
pub mod throttle;

pub use controller::{PagerController, ScrollRequest};
pub use dots::MAX_VISIBLE_DOTS;
pub use feed::{ScrollFeed, ScrollSubscription};
pub use throttle::Throttle;
