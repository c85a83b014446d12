//! The common control contract and the widget glue shared by all controls.

use crate::color::Color;
use crate::rect::Rect;
use cgmath::Vector2;
use std::ops::Deref;
use std::rc::Rc;
use veneer_core::binding::BindingCollection;
use veneer_core::{
    DataContextNode, EventArgs, EventId, HandlerToken, Platform, Result, Widget, WidgetHandler,
    WidgetId,
};

/// Handler contract common to every control.
///
/// Events: `GotFocus`, `LostFocus`, `SizeChanged`, `EnabledChanged`, `MouseDown`, `MouseUp`,
/// `KeyDown`, `KeyUp`.
pub trait ControlHandler: WidgetHandler {
    fn enabled(&self) -> bool;
    fn set_enabled(&self, enabled: bool);
    fn visible(&self) -> bool;
    fn set_visible(&self, visible: bool);

    /// Location and size within the parent.
    fn bounds(&self) -> Rect;
    fn set_size(&self, size: Vector2<f64>);

    /// Transparent means the native default.
    fn background_color(&self) -> Color;
    fn set_background_color(&self, color: Color);

    fn focus(&self);
    fn has_focus(&self) -> bool;
}

/// A widget whose handler is a [`ControlHandler`].
pub struct Control<H: ?Sized + ControlHandler + 'static> {
    widget: Widget<H>,
}

impl<H: ?Sized + ControlHandler + 'static> Control<H> {
    pub fn new(platform: &Rc<Platform>) -> Result<Control<H>> {
        Ok(Control {
            widget: Widget::new(platform)?,
        })
    }

    pub fn with_handler(platform: &Rc<Platform>, handler: Box<H>) -> Control<H> {
        Control {
            widget: Widget::with_handler(platform, handler),
        }
    }

    pub fn widget(&self) -> &Widget<H> {
        &self.widget
    }

    pub fn enabled(&self) -> bool {
        self.handler().enabled()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.handler().set_enabled(enabled);
    }

    pub fn visible(&self) -> bool {
        self.handler().visible()
    }

    pub fn set_visible(&self, visible: bool) {
        self.handler().set_visible(visible);
    }

    pub fn bounds(&self) -> Rect {
        self.handler().bounds()
    }

    pub fn size(&self) -> Vector2<f64> {
        self.bounds().size
    }

    pub fn set_size(&self, size: Vector2<f64>) {
        self.handler().set_size(size);
    }

    pub fn background_color(&self) -> Color {
        self.handler().background_color()
    }

    pub fn set_background_color(&self, color: Color) {
        self.handler().set_background_color(color);
    }

    pub fn focus(&self) {
        self.handler().focus();
    }

    pub fn has_focus(&self) -> bool {
        self.handler().has_focus()
    }

    pub fn on_got_focus<F: Fn(&EventArgs) + 'static>(&self, f: F) -> Result<HandlerToken> {
        self.subscribe(EventId::GotFocus, f)
    }

    pub fn on_lost_focus<F: Fn(&EventArgs) + 'static>(&self, f: F) -> Result<HandlerToken> {
        self.subscribe(EventId::LostFocus, f)
    }

    pub fn on_size_changed<F: Fn(&EventArgs) + 'static>(&self, f: F) -> Result<HandlerToken> {
        self.subscribe(EventId::SizeChanged, f)
    }

    pub fn on_enabled_changed<F: Fn(&EventArgs) + 'static>(&self, f: F) -> Result<HandlerToken> {
        self.subscribe(EventId::EnabledChanged, f)
    }

    pub fn on_mouse_down<F: Fn(&EventArgs) + 'static>(&self, f: F) -> Result<HandlerToken> {
        self.subscribe(EventId::MouseDown, f)
    }

    pub fn on_mouse_up<F: Fn(&EventArgs) + 'static>(&self, f: F) -> Result<HandlerToken> {
        self.subscribe(EventId::MouseUp, f)
    }

    pub fn on_key_down<F: Fn(&EventArgs) + 'static>(&self, f: F) -> Result<HandlerToken> {
        self.subscribe(EventId::KeyDown, f)
    }

    pub fn on_key_up<F: Fn(&EventArgs) + 'static>(&self, f: F) -> Result<HandlerToken> {
        self.subscribe(EventId::KeyUp, f)
    }
}

impl<H: ?Sized + ControlHandler + 'static> Deref for Control<H> {
    type Target = Widget<H>;

    fn deref(&self) -> &Widget<H> {
        &self.widget
    }
}

/// Any control, regardless of its concrete type. Used by containers.
pub trait AnyControl: 'static {
    fn control_handler(&self) -> &dyn ControlHandler;
    fn context_node(&self) -> &Rc<DataContextNode>;
    fn widget_id(&self) -> WidgetId;
    fn widget_bindings(&self) -> &BindingCollection;
}

/// Widgets whose properties can be bound; see [`crate::bindable`].
pub trait Bindable: 'static {
    type Handler: ?Sized + WidgetHandler + 'static;

    fn base(&self) -> &Widget<Self::Handler>;
}

/// Implements the glue every concrete control needs: deref to its [`Control`], [`Bindable`] and
/// [`AnyControl`].
macro_rules! impl_control {
    ($widget:ident, $handler:ident) => {
        impl ::std::ops::Deref for $widget {
            type Target = $crate::control::Control<dyn $handler>;

            fn deref(&self) -> &Self::Target {
                &self.control
            }
        }

        impl $crate::control::Bindable for $widget {
            type Handler = dyn $handler;

            fn base(&self) -> &::veneer_core::Widget<dyn $handler> {
                self.control.widget()
            }
        }

        impl $crate::control::AnyControl for $widget {
            fn control_handler(&self) -> &dyn $crate::control::ControlHandler {
                self.control.handler()
            }

            fn context_node(&self) -> &::std::rc::Rc<::veneer_core::DataContextNode> {
                self.control.data_context_node()
            }

            fn widget_id(&self) -> ::veneer_core::WidgetId {
                self.control.id()
            }

            fn widget_bindings(&self) -> &::veneer_core::binding::BindingCollection {
                self.control.bindings()
            }
        }
    };
}
