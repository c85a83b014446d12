//! Menu items and context menus.
//!
//! Menu items are not controls. Their `Validate` event is raised by the menu that owns them, right
//! before the menu is shown, so handlers report it as delegated.

use crate::control::{AnyControl, Bindable, ControlHandler};
use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;
use veneer_core::{EventArgs, EventId, HandlerToken, Platform, Result, Widget, WidgetHandler};

/// Handler contract for [`ButtonMenuItem`].
///
/// Events: `Click`; `Validate` is delegated.
pub trait ButtonMenuItemHandler: WidgetHandler {
    fn text(&self) -> String;
    fn set_text(&self, text: &str);
    fn enabled(&self) -> bool;
    fn set_enabled(&self, enabled: bool);
}

pub struct ButtonMenuItem {
    widget: Widget<dyn ButtonMenuItemHandler>,
}

impl ButtonMenuItem {
    pub fn new(platform: &Rc<Platform>) -> Result<Rc<ButtonMenuItem>> {
        Ok(Rc::new(ButtonMenuItem {
            widget: Widget::new(platform)?,
        }))
    }

    pub fn text(&self) -> String {
        self.handler().text()
    }

    pub fn set_text(&self, text: impl AsRef<str>) {
        self.handler().set_text(text.as_ref());
    }

    pub fn enabled(&self) -> bool {
        self.handler().enabled()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.handler().set_enabled(enabled);
    }

    pub fn on_click<F: Fn(&EventArgs) + 'static>(&self, f: F) -> Result<HandlerToken> {
        self.subscribe(EventId::Click, f)
    }

    /// Subscribes to validation, where the item usually updates its enabled state.
    pub fn on_validate<F: Fn(&EventArgs) + 'static>(&self, f: F) -> Result<HandlerToken> {
        self.subscribe(EventId::Validate, f)
    }

    /// Raises `Click` unless the item is disabled.
    pub fn perform_click(&self) {
        if self.enabled() {
            self.raise(EventId::Click, &EventArgs::empty());
        }
    }

    pub fn validate(&self) {
        self.raise(EventId::Validate, &EventArgs::empty());
    }
}

impl Deref for ButtonMenuItem {
    type Target = Widget<dyn ButtonMenuItemHandler>;

    fn deref(&self) -> &Self::Target {
        &self.widget
    }
}

impl Bindable for ButtonMenuItem {
    type Handler = dyn ButtonMenuItemHandler;

    fn base(&self) -> &Widget<dyn ButtonMenuItemHandler> {
        &self.widget
    }
}

bindable_property!(ButtonMenuItem, text_binding: String = text, set_text, None);
bindable_property!(ButtonMenuItem, enabled_binding: bool = enabled, set_enabled, None);

pub trait ContextMenuHandler: WidgetHandler {
    fn add_item(&self, item: &dyn ButtonMenuItemHandler);
    fn clear_items(&self);

    /// Shows the menu at the pointer, or over `relative_to` if given.
    fn show(&self, relative_to: Option<&dyn ControlHandler>);
}

/// A popup menu of [`ButtonMenuItem`]s.
pub struct ContextMenu {
    widget: Widget<dyn ContextMenuHandler>,
    items: RefCell<Vec<Rc<ButtonMenuItem>>>,
}

impl ContextMenu {
    pub fn new(platform: &Rc<Platform>) -> Result<Rc<ContextMenu>> {
        Ok(Rc::new(ContextMenu {
            widget: Widget::new(platform)?,
            items: RefCell::new(Vec::new()),
        }))
    }

    pub fn add_item(&self, item: Rc<ButtonMenuItem>) {
        self.handler().add_item(item.handler());
        self.items.borrow_mut().push(item);
    }

    pub fn items(&self) -> Vec<Rc<ButtonMenuItem>> {
        self.items.borrow().clone()
    }

    pub fn clear(&self) {
        self.handler().clear_items();
        self.items.borrow_mut().clear();
    }

    /// Validates every item, then shows the menu.
    pub fn show(&self, relative_to: Option<&dyn AnyControl>) {
        for item in self.items() {
            item.validate();
        }
        self.handler()
            .show(relative_to.map(|control| control.control_handler()));
    }
}

impl Deref for ContextMenu {
    type Target = Widget<dyn ContextMenuHandler>;

    fn deref(&self) -> &Self::Target {
        &self.widget
    }
}
