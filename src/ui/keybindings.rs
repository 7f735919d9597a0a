// Keybindings for the carousel screen
//
// Keybindings:
// - Left / h: Previous page
// - Right / l: Next page
// - Home / End: First / last page
// - v: Toggle single/multi view
// - b: Toggle slot borders

use gdk4::Key;
use gtk4::prelude::*;
use gtk4::{EventControllerKey, PropagationPhase, Widget};

/// Action triggered by a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselAction {
    PreviousPage,
    NextPage,
    FirstPage,
    LastPage,
    ToggleView,
    ToggleBorder,
}

/// Maps a key to its carousel action, if any.
pub fn action_for_key(key: Key) -> Option<CarouselAction> {
    match key {
        Key::Left | Key::KP_Left | Key::h => Some(CarouselAction::PreviousPage),
        Key::Right | Key::KP_Right | Key::l => Some(CarouselAction::NextPage),
        Key::Home => Some(CarouselAction::FirstPage),
        Key::End => Some(CarouselAction::LastPage),
        Key::v => Some(CarouselAction::ToggleView),
        Key::b => Some(CarouselAction::ToggleBorder),
        _ => None,
    }
}

/// Install a key controller on `widget` that forwards mapped keys to `handler`.
pub fn attach<F>(widget: &impl IsA<Widget>, handler: F)
where
    F: Fn(CarouselAction) + 'static,
{
    let controller = EventControllerKey::new();
    controller.set_propagation_phase(PropagationPhase::Capture);
    controller.connect_key_pressed(move |_, key, _code, _modifiers| {
        match action_for_key(key) {
            Some(action) => {
                tracing::debug!(?action, "Key action");
                handler(action);
                glib::Propagation::Stop
            }
            None => glib::Propagation::Proceed,
        }
    });
    widget.add_controller(controller);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_keys() {
        assert_eq!(action_for_key(Key::Left), Some(CarouselAction::PreviousPage));
        assert_eq!(action_for_key(Key::h), Some(CarouselAction::PreviousPage));
        assert_eq!(action_for_key(Key::Right), Some(CarouselAction::NextPage));
        assert_eq!(action_for_key(Key::l), Some(CarouselAction::NextPage));
        assert_eq!(action_for_key(Key::End), Some(CarouselAction::LastPage));
    }

    #[test]
    fn test_toggle_keys() {
        assert_eq!(action_for_key(Key::v), Some(CarouselAction::ToggleView));
        assert_eq!(action_for_key(Key::b), Some(CarouselAction::ToggleBorder));
        assert_eq!(action_for_key(Key::x), None);
    }
}
