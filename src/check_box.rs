//! Check boxes.

use crate::bindable::BindableBinding;
use crate::control::{Control, ControlHandler};
use std::rc::Rc;
use veneer_core::{EventArgs, EventId, HandlerToken, Platform, Result};

/// Handler contract for [`CheckBox`].
///
/// Events: `CheckedChanged`, plus the control events. Handlers raise `CheckedChanged` for
/// programmatic changes too.
pub trait CheckBoxHandler: ControlHandler {
    /// `None` is the indeterminate state, only reachable when three-state.
    fn checked(&self) -> Option<bool>;
    fn set_checked(&self, checked: Option<bool>);

    fn three_state(&self) -> bool;
    fn set_three_state(&self, three_state: bool);

    fn text(&self) -> String;
    fn set_text(&self, text: &str);
}

pub struct CheckBox {
    control: Control<dyn CheckBoxHandler>,
}

impl_control!(CheckBox, CheckBoxHandler);

impl CheckBox {
    pub fn new(platform: &Rc<Platform>) -> Result<Rc<CheckBox>> {
        Ok(Rc::new(CheckBox {
            control: Control::new(platform)?,
        }))
    }

    pub fn checked(&self) -> Option<bool> {
        self.handler().checked()
    }

    pub fn set_checked(&self, checked: Option<bool>) {
        self.handler().set_checked(checked);
    }

    pub fn three_state(&self) -> bool {
        self.handler().three_state()
    }

    pub fn set_three_state(&self, three_state: bool) {
        self.handler().set_three_state(three_state);
    }

    pub fn text(&self) -> String {
        self.handler().text()
    }

    pub fn set_text(&self, text: impl AsRef<str>) {
        self.handler().set_text(text.as_ref());
    }

    pub fn on_checked_changed<F: Fn(&EventArgs) + 'static>(&self, f: F) -> Result<HandlerToken> {
        self.subscribe(EventId::CheckedChanged, f)
    }

    /// The checked state, including the indeterminate `None`.
    pub fn checked_binding(self: &Rc<Self>) -> Rc<BindableBinding<CheckBox, bool>> {
        BindableBinding::new(
            self,
            |c: &CheckBox| c.checked(),
            |c: &CheckBox, value| c.set_checked(value),
            Some(EventId::CheckedChanged),
        )
    }
}

bindable_property!(CheckBox, text_binding: String = text, set_text, None);
