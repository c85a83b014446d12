//! An in-memory backend without a native toolkit.
//!
//! Handlers behave like native controls do: programmatic changes raise the same change events as
//! user input. Each handler also has simulation methods (`perform_click`, `toggle`, `type_text`,
//! ...) standing in for the user. Reach them through [`downcast`]:
//!
//! ```ignore
//! let platform = Rc::new(Platform::new(&HeadlessBackend)?);
//! let check_box = CheckBox::new(&platform)?;
//! headless::downcast::<HeadlessCheckBox, _>(check_box.handler()).unwrap().toggle();
//! ```

#[macro_use]
mod control;
mod application;
mod menu;
mod widgets;

pub use application::HeadlessApplication;
pub use control::ControlState;
pub use menu::{HeadlessButtonMenuItem, HeadlessContextMenu};
pub use widgets::{HeadlessButton, HeadlessCheckBox, HeadlessLabel, HeadlessPanel, HeadlessTextBox};

use crate::application::ApplicationHandler;
use crate::button::ButtonHandler;
use crate::check_box::CheckBoxHandler;
use crate::label::LabelHandler;
use crate::menu::{ButtonMenuItemHandler, ContextMenuHandler};
use crate::panel::PanelHandler;
use crate::text_box::TextBoxHandler;
use veneer_core::{Backend, Platform, Toolkit, WidgetHandler};

/// Registers the headless handlers. Always loads.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessBackend;

impl Backend for HeadlessBackend {
    fn id(&self) -> &str {
        "headless"
    }

    fn toolkit(&self) -> Toolkit {
        Toolkit::Headless
    }

    fn add_to(&self, platform: &mut Platform) {
        platform.add::<dyn ApplicationHandler, _>(|| Box::new(HeadlessApplication::default()));
        platform.add::<dyn ButtonHandler, _>(|| Box::new(HeadlessButton::default()));
        platform.add::<dyn LabelHandler, _>(|| Box::new(HeadlessLabel::default()));
        platform.add::<dyn CheckBoxHandler, _>(|| Box::new(HeadlessCheckBox::default()));
        platform.add::<dyn TextBoxHandler, _>(|| Box::new(HeadlessTextBox::default()));
        platform.add::<dyn PanelHandler, _>(|| Box::new(HeadlessPanel::default()));
        platform.add::<dyn ButtonMenuItemHandler, _>(|| {
            Box::new(HeadlessButtonMenuItem::default())
        });
        platform.add::<dyn ContextMenuHandler, _>(|| Box::new(HeadlessContextMenu::default()));
    }
}

/// Returns the concrete headless handler behind a handler contract.
pub fn downcast<T: 'static, H: ?Sized + WidgetHandler>(handler: &H) -> Option<&T> {
    handler.as_any().downcast_ref::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_every_contract() {
        let platform = Platform::new(&HeadlessBackend).unwrap();
        assert!(platform.is_headless());
        assert!(platform.is_desktop());
        assert_eq!(platform.id(), "headless");
        assert_eq!(platform.handler_count(), 8);
        assert!(platform.supports::<dyn ButtonHandler>());
        assert!(platform.supports::<dyn ContextMenuHandler>());
        assert!(Platform::is_valid(&HeadlessBackend));
    }
}
