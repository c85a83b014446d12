use super::ControlState;
use crate::button::ButtonHandler;
use crate::check_box::CheckBoxHandler;
use crate::control::ControlHandler;
use crate::label::LabelHandler;
use crate::panel::PanelHandler;
use crate::text_box::TextBoxHandler;
use std::cell::{Cell, RefCell};
use veneer_core::{EventArgs, EventId, WidgetHandler};

#[derive(Debug, Default)]
pub struct HeadlessButton {
    state: ControlState,
    text: RefCell<String>,
}

headless_control!(HeadlessButton, Click);

impl HeadlessButton {
    /// Simulates a click. Disabled buttons ignore it.
    pub fn perform_click(&self) -> bool {
        self.state.enabled() && self.state.raise(EventId::Click, &EventArgs::empty())
    }
}

impl ButtonHandler for HeadlessButton {
    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }
}

#[derive(Debug, Default)]
pub struct HeadlessLabel {
    state: ControlState,
    text: RefCell<String>,
    wrap: Cell<bool>,
}

headless_control!(HeadlessLabel);

impl LabelHandler for HeadlessLabel {
    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    fn wrap(&self) -> bool {
        self.wrap.get()
    }

    fn set_wrap(&self, wrap: bool) {
        self.wrap.set(wrap);
    }
}

#[derive(Debug)]
pub struct HeadlessCheckBox {
    state: ControlState,
    checked: Cell<Option<bool>>,
    three_state: Cell<bool>,
    text: RefCell<String>,
}

impl Default for HeadlessCheckBox {
    fn default() -> Self {
        HeadlessCheckBox {
            state: ControlState::default(),
            checked: Cell::new(Some(false)),
            three_state: Cell::new(false),
            text: RefCell::new(String::new()),
        }
    }
}

headless_control!(HeadlessCheckBox, CheckedChanged);

impl HeadlessCheckBox {
    /// Simulates a click: unchecked, checked, then indeterminate if three-state.
    pub fn toggle(&self) {
        if !self.state.enabled() {
            return;
        }
        let next = match (self.checked.get(), self.three_state.get()) {
            (Some(false), _) => Some(true),
            (Some(true), true) => None,
            (Some(true), false) | (None, _) => Some(false),
        };
        self.set_checked(next);
    }
}

impl CheckBoxHandler for HeadlessCheckBox {
    fn checked(&self) -> Option<bool> {
        self.checked.get()
    }

    fn set_checked(&self, checked: Option<bool>) {
        let checked = match checked {
            None if !self.three_state.get() => Some(false),
            checked => checked,
        };
        if self.checked.replace(checked) != checked {
            self.state.raise(EventId::CheckedChanged, &EventArgs::empty());
        }
    }

    fn three_state(&self) -> bool {
        self.three_state.get()
    }

    fn set_three_state(&self, three_state: bool) {
        self.three_state.set(three_state);
        if !three_state && self.checked.get().is_none() {
            self.set_checked(Some(false));
        }
    }

    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }
}

#[derive(Debug, Default)]
pub struct HeadlessTextBox {
    state: ControlState,
    text: RefCell<String>,
    read_only: Cell<bool>,
    max_length: Cell<usize>,
    placeholder: RefCell<String>,
}

headless_control!(HeadlessTextBox, TextChanged);

impl HeadlessTextBox {
    /// Simulates typing at the end of the text.
    ///
    /// Read-only or disabled text boxes ignore it; input past the maximum length is dropped.
    pub fn type_text(&self, input: &str) {
        if self.read_only.get() || !self.state.enabled() {
            return;
        }
        let mut text = self.text.borrow().clone();
        let max_length = self.max_length.get();
        let room = match max_length {
            0 => usize::MAX,
            max => max.saturating_sub(text.chars().count()),
        };
        text.extend(input.chars().take(room));
        self.set_text(&text);
    }
}

impl TextBoxHandler for HeadlessTextBox {
    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn set_text(&self, text: &str) {
        if *self.text.borrow() == text {
            return;
        }
        *self.text.borrow_mut() = text.to_string();
        self.state.raise(EventId::TextChanged, &EventArgs::empty());
    }

    fn read_only(&self) -> bool {
        self.read_only.get()
    }

    fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    fn max_length(&self) -> usize {
        self.max_length.get()
    }

    fn set_max_length(&self, max_length: usize) {
        self.max_length.set(max_length);
    }

    fn placeholder_text(&self) -> String {
        self.placeholder.borrow().clone()
    }

    fn set_placeholder_text(&self, text: &str) {
        *self.placeholder.borrow_mut() = text.to_string();
    }
}

#[derive(Debug, Default)]
pub struct HeadlessPanel {
    state: ControlState,
    content: Cell<Option<&'static str>>,
    padding: Cell<f64>,
}

headless_control!(HeadlessPanel);

impl HeadlessPanel {
    /// Handler name of the current content.
    pub fn content_name(&self) -> Option<&'static str> {
        self.content.get()
    }
}

impl PanelHandler for HeadlessPanel {
    fn set_content(&self, content: Option<&dyn ControlHandler>) {
        self.content.set(content.map(|content| content.name()));
    }

    fn padding(&self) -> f64 {
        self.padding.get()
    }

    fn set_padding(&self, padding: f64) {
        self.padding.set(padding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_state_cycle() {
        let check_box = HeadlessCheckBox::default();
        check_box.set_three_state(true);
        let mut seen = Vec::new();
        for _ in 0..3 {
            check_box.toggle();
            seen.push(check_box.checked());
        }
        assert_eq!(seen, [Some(true), None, Some(false)]);

        check_box.set_checked(None);
        check_box.set_three_state(false);
        assert_eq!(check_box.checked(), Some(false));
        check_box.set_checked(None);
        assert_eq!(check_box.checked(), Some(false), "indeterminate needs three-state");
    }

    #[test]
    fn test_typing_respects_limits() {
        let text_box = HeadlessTextBox::default();
        text_box.set_max_length(5);
        text_box.type_text("hello world");
        assert_eq!(text_box.text(), "hello");

        text_box.set_text("way too long for the limit");
        assert_eq!(text_box.text(), "way too long for the limit");

        text_box.set_read_only(true);
        text_box.type_text("!");
        assert_eq!(text_box.text(), "way too long for the limit");
    }
}
