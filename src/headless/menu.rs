use crate::control::ControlHandler;
use crate::menu::{ButtonMenuItemHandler, ContextMenuHandler};
use std::any::Any;
use std::cell::{Cell, RefCell};
use veneer_core::{Callback, EventArgs, EventAttach, EventId, WidgetHandler};

#[derive(Debug)]
pub struct HeadlessButtonMenuItem {
    text: RefCell<String>,
    enabled: Cell<bool>,
    click: RefCell<Option<Callback>>,
}

impl Default for HeadlessButtonMenuItem {
    fn default() -> Self {
        HeadlessButtonMenuItem {
            text: RefCell::new(String::new()),
            enabled: Cell::new(true),
            click: RefCell::new(None),
        }
    }
}

impl HeadlessButtonMenuItem {
    /// Simulates choosing the item. Disabled items ignore it.
    pub fn perform_click(&self) -> bool {
        let click = self.click.borrow().clone();
        match click {
            Some(click) if self.enabled.get() => click.raise(EventId::Click, &EventArgs::empty()),
            _ => false,
        }
    }
}

impl WidgetHandler for HeadlessButtonMenuItem {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn attach_event(&self, event: EventId, callback: &Callback) -> EventAttach {
        match event {
            EventId::Click => {
                *self.click.borrow_mut() = Some(callback.clone());
                EventAttach::Attached
            }
            // the context menu raises this before showing
            EventId::Validate => EventAttach::Delegated,
            _ => EventAttach::Unsupported,
        }
    }

    fn dispose(&self) {
        self.click.borrow_mut().take();
    }
}

impl ButtonMenuItemHandler for HeadlessButtonMenuItem {
    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    fn enabled(&self) -> bool {
        self.enabled.get()
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }
}

#[derive(Debug, Default)]
pub struct HeadlessContextMenu {
    items: RefCell<Vec<String>>,
    shown: Cell<usize>,
    shown_over: Cell<Option<&'static str>>,
}

impl HeadlessContextMenu {
    /// Texts of the items, as they were when added.
    pub fn item_texts(&self) -> Vec<String> {
        self.items.borrow().clone()
    }

    /// How many times the menu was shown.
    pub fn shown(&self) -> usize {
        self.shown.get()
    }

    /// Handler name of the control the menu was last shown over.
    pub fn shown_over(&self) -> Option<&'static str> {
        self.shown_over.get()
    }
}

impl WidgetHandler for HeadlessContextMenu {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ContextMenuHandler for HeadlessContextMenu {
    fn add_item(&self, item: &dyn ButtonMenuItemHandler) {
        self.items.borrow_mut().push(item.text());
    }

    fn clear_items(&self) {
        self.items.borrow_mut().clear();
    }

    fn show(&self, relative_to: Option<&dyn ControlHandler>) {
        self.shown.set(self.shown.get() + 1);
        self.shown_over
            .set(relative_to.map(|control| control.name()));
    }
}
