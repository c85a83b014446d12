//! Push buttons.

use crate::control::{Control, ControlHandler};
use std::rc::Rc;
use veneer_core::{EventArgs, EventId, HandlerToken, Platform, Result};

/// Handler contract for [`Button`].
///
/// Events: `Click`, plus the control events.
pub trait ButtonHandler: ControlHandler {
    fn text(&self) -> String;
    fn set_text(&self, text: &str);
}

/// A push button with a text label.
pub struct Button {
    control: Control<dyn ButtonHandler>,
}

impl_control!(Button, ButtonHandler);

impl Button {
    pub fn new(platform: &Rc<Platform>) -> Result<Rc<Button>> {
        Ok(Rc::new(Button {
            control: Control::new(platform)?,
        }))
    }

    pub fn with_handler(platform: &Rc<Platform>, handler: Box<dyn ButtonHandler>) -> Rc<Button> {
        Rc::new(Button {
            control: Control::with_handler(platform, handler),
        })
    }

    pub fn text(&self) -> String {
        self.handler().text()
    }

    pub fn set_text(&self, text: impl AsRef<str>) {
        self.handler().set_text(text.as_ref());
    }

    pub fn on_click<F: Fn(&EventArgs) + 'static>(&self, f: F) -> Result<HandlerToken> {
        self.subscribe(EventId::Click, f)
    }

    /// Raises `Click` as if the user had clicked the button.
    pub fn perform_click(&self) {
        self.raise(EventId::Click, &EventArgs::empty());
    }
}

bindable_property!(Button, text_binding: String = text, set_text, None);
