//! Bindings that wrap other indirect bindings.

use super::indirect::{BindingEvents, IndirectBinding};
use crate::events::HandlerToken;
use core::any::{type_name, Any};
use core::marker::PhantomData;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use tracing::trace;

/// Combinators for indirect bindings.
pub trait IndirectBindingExt<S: ?Sized, T: Clone + 'static>: IndirectBinding<S, T> + Sized {
    /// Converts values on the way out (`to`) and on the way in (`from`).
    fn convert<U, To, From>(self, to: To, from: From) -> ConvertBinding<S, T, U, Self>
    where
        U: Clone + 'static,
        To: Fn(Option<T>) -> Option<U> + 'static,
        From: Fn(Option<U>) -> Option<T> + 'static,
    {
        ConvertBinding {
            inner: self,
            to: Box::new(to),
            from: Box::new(from),
            events: BindingEvents::new(),
            _item: PhantomData,
        }
    }

    /// Binds a value of the object this binding yields.
    fn child<M, U, C>(self, child: C) -> ChildBinding<S, M, U, Self, C>
    where
        Self: IndirectBinding<S, Rc<M>>,
        M: ?Sized + 'static,
        U: Clone + 'static,
        C: IndirectBinding<M, U>,
    {
        ChildBinding {
            parent: Rc::new(self),
            child: Rc::new(child),
            hooks: RefCell::new(HashMap::new()),
            events: BindingEvents::new(),
            _item: PhantomData,
        }
    }
}

impl<S: ?Sized, T: Clone + 'static, B: IndirectBinding<S, T>> IndirectBindingExt<S, T> for B {}

/// See [`IndirectBindingExt::convert`].
pub struct ConvertBinding<S: ?Sized, T, U, B> {
    inner: B,
    to: Box<dyn Fn(Option<T>) -> Option<U>>,
    from: Box<dyn Fn(Option<U>) -> Option<T>>,
    events: BindingEvents<U>,
    _item: PhantomData<fn(&S)>,
}

impl<S, T, U, B> IndirectBinding<S, U> for ConvertBinding<S, T, U, B>
where
    S: ?Sized,
    T: Clone + 'static,
    U: Clone + 'static,
    B: IndirectBinding<S, T>,
{
    fn get_value(&self, item: &S) -> Option<U> {
        (self.to)(self.inner.get_value(item))
    }

    fn internal_set_value(&self, item: &S, value: Option<U>) {
        self.inner.set_value(item, (self.from)(value));
    }

    fn events(&self) -> &BindingEvents<U> {
        &self.events
    }

    fn add_value_changed_handler(
        &self,
        item: &Rc<S>,
        handler: Rc<dyn Fn()>,
    ) -> Option<HandlerToken> {
        self.inner.add_value_changed_handler(item, handler)
    }

    fn remove_value_changed_handler(&self, item: &Rc<S>, token: HandlerToken) {
        self.inner.remove_value_changed_handler(item, token)
    }
}

/// Change subscriptions of one [`ChildBinding`] handler.
struct ChildHook<M: ?Sized> {
    parent: Cell<Option<HandlerToken>>,
    child: RefCell<Option<(Weak<M>, HandlerToken)>>,
}

impl<M: ?Sized> ChildHook<M> {
    fn new() -> Self {
        ChildHook {
            parent: Cell::new(None),
            child: RefCell::new(None),
        }
    }

    fn unhook_child<U: Clone + 'static, C: IndirectBinding<M, U> + ?Sized>(&self, child: &C) {
        let previous = self.child.borrow_mut().take();
        if let Some((object, token)) = previous {
            if let Some(object) = object.upgrade() {
                child.remove_value_changed_handler(&object, token);
            }
        }
    }

    /// Moves the child subscription to a new object.
    fn rehook_child<U: Clone + 'static, C: IndirectBinding<M, U> + ?Sized>(
        &self,
        child: &C,
        object: Option<Rc<M>>,
        handler: &Rc<dyn Fn()>,
    ) {
        self.unhook_child(child);
        if let Some(object) = object {
            if let Some(token) = child.add_value_changed_handler(&object, Rc::clone(handler)) {
                *self.child.borrow_mut() = Some((Rc::downgrade(&object), token));
            }
        }
    }
}

/// See [`IndirectBindingExt::child`].
///
/// Change handlers fire when either the parent object is replaced or the child value changes
/// on the current parent object.
pub struct ChildBinding<S: ?Sized, M: ?Sized, U, P, C> {
    parent: Rc<P>,
    child: Rc<C>,
    hooks: RefCell<HashMap<HandlerToken, Rc<ChildHook<M>>>>,
    events: BindingEvents<U>,
    _item: PhantomData<fn(&S)>,
}

impl<S, M, U, P, C> IndirectBinding<S, U> for ChildBinding<S, M, U, P, C>
where
    S: ?Sized + 'static,
    M: ?Sized + 'static,
    U: Clone + 'static,
    P: IndirectBinding<S, Rc<M>> + 'static,
    C: IndirectBinding<M, U> + 'static,
{
    fn get_value(&self, item: &S) -> Option<U> {
        let object = self.parent.get_value(item)?;
        self.child.get_value(&*object)
    }

    fn internal_set_value(&self, item: &S, value: Option<U>) {
        match self.parent.get_value(item) {
            Some(object) => self.child.set_value(&*object, value),
            None => trace!("no child object to write to"),
        }
    }

    fn events(&self) -> &BindingEvents<U> {
        &self.events
    }

    fn add_value_changed_handler(
        &self,
        item: &Rc<S>,
        handler: Rc<dyn Fn()>,
    ) -> Option<HandlerToken> {
        let hook = Rc::new(ChildHook::new());
        hook.rehook_child(&*self.child, self.parent.get_value(item), &handler);

        let on_parent_changed: Rc<dyn Fn()> = {
            let item = Rc::downgrade(item);
            let parent = Rc::clone(&self.parent);
            let child = Rc::clone(&self.child);
            let hook = Rc::clone(&hook);
            let handler = Rc::clone(&handler);
            Rc::new(move || {
                if let Some(item) = item.upgrade() {
                    hook.rehook_child(&*child, parent.get_value(&*item), &handler);
                }
                handler();
            })
        };
        hook.parent
            .set(self.parent.add_value_changed_handler(item, on_parent_changed));

        if hook.parent.get().is_none() && hook.child.borrow().is_none() {
            return None;
        }
        let token = HandlerToken::next();
        self.hooks.borrow_mut().insert(token, hook);
        Some(token)
    }

    fn remove_value_changed_handler(&self, item: &Rc<S>, token: HandlerToken) {
        let Some(hook) = self.hooks.borrow_mut().remove(&token) else {
            return;
        };
        if let Some(parent_token) = hook.parent.take() {
            self.parent.remove_value_changed_handler(item, parent_token);
        }
        hook.unhook_child(&*self.child);
    }
}

/// Adapts a binding on a concrete model type to loosely-typed data items.
///
/// Items of any other type read as null and ignore writes.
pub struct DowncastBinding<M, T, B> {
    inner: B,
    events: BindingEvents<T>,
    _model: PhantomData<fn(&M)>,
}

impl<M: Any, T: Clone + 'static, B: IndirectBinding<M, T>> DowncastBinding<M, T, B> {
    pub fn new(inner: B) -> Self {
        DowncastBinding {
            inner,
            events: BindingEvents::new(),
            _model: PhantomData,
        }
    }
}

impl<M, T, B> IndirectBinding<dyn Any, T> for DowncastBinding<M, T, B>
where
    M: Any,
    T: Clone + 'static,
    B: IndirectBinding<M, T>,
{
    fn get_value(&self, item: &dyn Any) -> Option<T> {
        self.inner.get_value(item.downcast_ref::<M>()?)
    }

    fn internal_set_value(&self, item: &dyn Any, value: Option<T>) {
        match item.downcast_ref::<M>() {
            Some(model) => self.inner.set_value(model, value),
            None => trace!(expected = type_name::<M>(), "data item has another type"),
        }
    }

    fn events(&self) -> &BindingEvents<T> {
        &self.events
    }

    fn add_value_changed_handler(
        &self,
        item: &Rc<dyn Any>,
        handler: Rc<dyn Fn()>,
    ) -> Option<HandlerToken> {
        let model = Rc::clone(item).downcast::<M>().ok()?;
        self.inner.add_value_changed_handler(&model, handler)
    }

    fn remove_value_changed_handler(&self, item: &Rc<dyn Any>, token: HandlerToken) {
        if let Ok(model) = Rc::clone(item).downcast::<M>() {
            self.inner.remove_value_changed_handler(&model, token);
        }
    }
}
