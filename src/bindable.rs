//! Bindings to widget properties.
//!
//! ```ignore
//! let name = text_box.text_binding();
//! name.bind_data_context(
//!     binding::property("name", Person::name, Person::set_name),
//!     DualBindingMode::TwoWay,
//! )?;
//! ```

use crate::control::Bindable;
use core::any::Any;
use core::fmt;
use std::cell::Cell;
use std::rc::{Rc, Weak};
use tracing::trace;
use veneer_core::binding::{
    Binding, BindingUpdateMode, DataContextBinding, DirectBinding, DualBinding, DualBindingMode,
    IndirectBinding, ObjectBinding,
};
use veneer_core::events::Event;
use veneer_core::{Error, EventId, HandlerToken, Result};

type Getter<W, T> = Box<dyn Fn(&W) -> Option<T>>;
type Setter<W, T> = Box<dyn Fn(&W, Option<T>)>;

/// A direct binding to one property of a widget.
///
/// The widget is held weakly. Its change event is subscribed only while this binding has
/// subscribers.
pub struct BindableBinding<W: Bindable, T: Clone + 'static> {
    me: Weak<BindableBinding<W, T>>,
    widget: Weak<W>,
    get: Getter<W, T>,
    set: Setter<W, T>,
    change_event: Option<EventId>,
    changed: Event<Option<T>>,
    hook: Cell<Option<HandlerToken>>,
}

impl<W: Bindable, T: Clone + 'static> BindableBinding<W, T> {
    /// `change_event` is the widget event raised when the property changes, if there is one.
    pub fn new<G, S>(widget: &Rc<W>, get: G, set: S, change_event: Option<EventId>) -> Rc<Self>
    where
        G: Fn(&W) -> Option<T> + 'static,
        S: Fn(&W, Option<T>) + 'static,
    {
        Rc::new_cyclic(|me| BindableBinding {
            me: me.clone(),
            widget: Rc::downgrade(widget),
            get: Box::new(get),
            set: Box::new(set),
            change_event,
            changed: Event::new(),
            hook: Cell::new(None),
        })
    }

    pub fn change_event(&self) -> Option<EventId> {
        self.change_event
    }

    fn widget(&self) -> Result<Rc<W>> {
        self.widget.upgrade().ok_or(Error::WidgetDisposed)
    }

    fn this(&self) -> Result<Rc<Self>> {
        self.me.upgrade().ok_or(Error::WidgetDisposed)
    }

    /// Makes sure the widget can report changes, if the mode needs them.
    fn check_change_event(&self, widget: &W, mode: DualBindingMode) -> Result<()> {
        match self.change_event {
            Some(event) if mode.updates_source() => widget.base().attach_event(event),
            _ => Ok(()),
        }
    }

    /// Binds this property to a direct source.
    pub fn bind(
        &self,
        source: Rc<dyn DirectBinding<T>>,
        mode: DualBindingMode,
    ) -> Result<Rc<DualBinding<T>>> {
        let widget = self.widget()?;
        self.check_change_event(&widget, mode)?;
        let dual = DualBinding::<T>::new(source, self.this()?, mode);
        widget.base().bindings().add(dual.clone());
        Ok(dual)
    }

    /// Binds this property to a value on `item`, through an indirect binding.
    pub fn bind_to<S, B>(
        &self,
        item: &Rc<S>,
        binding: B,
        mode: DualBindingMode,
    ) -> Result<Rc<DualBinding<T>>>
    where
        S: ?Sized + 'static,
        B: IndirectBinding<S, T> + 'static,
    {
        self.bind(ObjectBinding::new(item, binding), mode)
    }

    /// Binds this property to a value on the widget's data context.
    pub fn bind_data_context<M, B>(
        &self,
        binding: B,
        mode: DualBindingMode,
    ) -> Result<Rc<DataContextBinding<T>>>
    where
        M: Any,
        B: IndirectBinding<M, T> + 'static,
    {
        let widget = self.widget()?;
        self.check_change_event(&widget, mode)?;
        let context_binding = DataContextBinding::new::<M, B>(
            widget.base().data_context_node(),
            binding,
            self.this()?,
            mode,
        );
        widget.base().bindings().add(context_binding.clone());
        Ok(context_binding)
    }

    fn attach(&self) {
        let Some(event) = self.change_event else { return };
        if self.hook.get().is_some() {
            return;
        }
        let Some(widget) = self.widget.upgrade() else { return };
        let me = self.me.clone();
        match widget.base().subscribe(event, move |_| {
            if let Some(me) = me.upgrade() {
                me.changed.raise(&me.data_value());
            }
        }) {
            Ok(token) => self.hook.set(Some(token)),
            Err(err) => trace!(%err, "property changes will not be observed"),
        }
    }

    fn detach(&self) {
        if let (Some(event), Some(token)) = (self.change_event, self.hook.take()) {
            if let Some(widget) = self.widget.upgrade() {
                widget.base().unsubscribe(event, token);
            }
        }
    }
}

impl<W: Bindable, T: Clone + 'static> Binding for BindableBinding<W, T> {
    fn unbind(&self) {
        self.detach();
    }

    fn update(&self, _: BindingUpdateMode) {
        self.changed.raise(&self.data_value());
    }
}

impl<W: Bindable, T: Clone + 'static> DirectBinding<T> for BindableBinding<W, T> {
    fn data_value(&self) -> Option<T> {
        self.widget.upgrade().and_then(|widget| (self.get)(&widget))
    }

    fn set_data_value(&self, value: Option<T>) {
        if let Some(widget) = self.widget.upgrade() {
            (self.set)(&widget, value);
        }
    }

    fn add_data_value_changed(&self, handler: Rc<dyn Fn(&Option<T>)>) -> HandlerToken {
        let token = self.changed.subscribe_rc(handler);
        self.attach();
        token
    }

    fn remove_data_value_changed(&self, token: HandlerToken) -> bool {
        let removed = self.changed.unsubscribe(token);
        if self.changed.is_empty() {
            self.detach();
        }
        removed
    }
}

impl<W: Bindable, T: Clone + 'static> fmt::Debug for BindableBinding<W, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BindableBinding")
            .field("change_event", &self.change_event)
            .field("subscribers", &self.changed.len())
            .field("hooked", &self.hook.get().is_some())
            .finish()
    }
}

/// Declares a binding accessor for a non-nullable widget property. Null writes are ignored.
///
/// ```ignore
/// bindable_property!(Button, text_binding: String = text, set_text, None);
/// ```
macro_rules! bindable_property {
    ($widget:ident, $name:ident: $ty:ty = $get:ident, $set:ident, $event:expr) => {
        impl $widget {
            pub fn $name(
                self: &::std::rc::Rc<Self>,
            ) -> ::std::rc::Rc<$crate::bindable::BindableBinding<$widget, $ty>> {
                $crate::bindable::BindableBinding::new(
                    self,
                    |w: &$widget| Some(w.$get()),
                    |w: &$widget, value: Option<$ty>| {
                        if let Some(value) = value {
                            w.$set(value);
                        }
                    },
                    $event,
                )
            }
        }
    };
}
