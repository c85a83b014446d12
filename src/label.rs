//! Static text.

use crate::control::{Control, ControlHandler};
use std::rc::Rc;
use veneer_core::{Platform, Result};

pub trait LabelHandler: ControlHandler {
    fn text(&self) -> String;
    fn set_text(&self, text: &str);

    /// Whether long text wraps onto several lines.
    fn wrap(&self) -> bool;
    fn set_wrap(&self, wrap: bool);
}

pub struct Label {
    control: Control<dyn LabelHandler>,
}

impl_control!(Label, LabelHandler);

impl Label {
    pub fn new(platform: &Rc<Platform>) -> Result<Rc<Label>> {
        Ok(Rc::new(Label {
            control: Control::new(platform)?,
        }))
    }

    pub fn text(&self) -> String {
        self.handler().text()
    }

    pub fn set_text(&self, text: impl AsRef<str>) {
        self.handler().set_text(text.as_ref());
    }

    pub fn wrap(&self) -> bool {
        self.handler().wrap()
    }

    pub fn set_wrap(&self, wrap: bool) {
        self.handler().set_wrap(wrap);
    }
}

bindable_property!(Label, text_binding: String = text, set_text, None);
