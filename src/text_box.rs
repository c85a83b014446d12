//! Single-line text entry.

use crate::control::{Control, ControlHandler};
use std::rc::Rc;
use veneer_core::{EventArgs, EventId, HandlerToken, Platform, Result};

/// Handler contract for [`TextBox`].
///
/// Events: `TextChanged`, plus the control events.
pub trait TextBoxHandler: ControlHandler {
    fn text(&self) -> String;
    fn set_text(&self, text: &str);

    fn read_only(&self) -> bool;
    fn set_read_only(&self, read_only: bool);

    /// Maximum length in characters; 0 is unlimited. Only limits user input.
    fn max_length(&self) -> usize;
    fn set_max_length(&self, max_length: usize);

    fn placeholder_text(&self) -> String;
    fn set_placeholder_text(&self, text: &str);
}

pub struct TextBox {
    control: Control<dyn TextBoxHandler>,
}

impl_control!(TextBox, TextBoxHandler);

impl TextBox {
    pub fn new(platform: &Rc<Platform>) -> Result<Rc<TextBox>> {
        Ok(Rc::new(TextBox {
            control: Control::new(platform)?,
        }))
    }

    pub fn text(&self) -> String {
        self.handler().text()
    }

    pub fn set_text(&self, text: impl AsRef<str>) {
        self.handler().set_text(text.as_ref());
    }

    pub fn read_only(&self) -> bool {
        self.handler().read_only()
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.handler().set_read_only(read_only);
    }

    pub fn max_length(&self) -> usize {
        self.handler().max_length()
    }

    pub fn set_max_length(&self, max_length: usize) {
        self.handler().set_max_length(max_length);
    }

    pub fn placeholder_text(&self) -> String {
        self.handler().placeholder_text()
    }

    pub fn set_placeholder_text(&self, text: impl AsRef<str>) {
        self.handler().set_placeholder_text(text.as_ref());
    }

    pub fn on_text_changed<F: Fn(&EventArgs) + 'static>(&self, f: F) -> Result<HandlerToken> {
        self.subscribe(EventId::TextChanged, f)
    }
}

bindable_property!(TextBox, text_binding: String = text, set_text, Some(EventId::TextChanged));
bindable_property!(TextBox, read_only_binding: bool = read_only, set_read_only, None);
