use super::delegate::ChangeEvent;
use super::{Binding, BindingUpdateMode};
use crate::events::{Event, HandlerToken};
use core::fmt;
use std::cell::Cell;
use std::rc::Rc;

/// A binding to one specific value.
pub trait DirectBinding<T: Clone + 'static>: Binding {
    fn data_value(&self) -> Option<T>;

    fn set_data_value(&self, value: Option<T>);

    /// Calls `handler` with the new value whenever it changes.
    fn add_data_value_changed(&self, handler: Rc<dyn Fn(&Option<T>)>) -> HandlerToken;

    /// Removes a handler; returns false if the token was unknown.
    fn remove_data_value_changed(&self, token: HandlerToken) -> bool;
}

/// A direct binding made of closures.
///
/// The optional change event is only subscribed while this binding itself has subscribers.
pub struct DelegateDirectBinding<T> {
    get: Rc<dyn Fn() -> Option<T>>,
    set: Option<Box<dyn Fn(Option<T>)>>,
    change: Option<ChangeEvent<()>>,
    changed: Rc<Event<Option<T>>>,
    hook: Cell<Option<HandlerToken>>,
}

impl<T: Clone + 'static> DelegateDirectBinding<T> {
    pub fn new<G>(get: G) -> Self
    where
        G: Fn() -> Option<T> + 'static,
    {
        DelegateDirectBinding {
            get: Rc::new(get),
            set: None,
            change: None,
            changed: Rc::new(Event::new()),
            hook: Cell::new(None),
        }
    }

    pub fn with_setter<F>(mut self, set: F) -> Self
    where
        F: Fn(Option<T>) + 'static,
    {
        self.set = Some(Box::new(set));
        self
    }

    /// Uses an external event to learn about value changes.
    pub fn with_change_event<A, R>(mut self, add: A, remove: R) -> Self
    where
        A: Fn(Rc<dyn Fn()>) -> HandlerToken + 'static,
        R: Fn(HandlerToken) + 'static,
    {
        self.change = Some(ChangeEvent::new(
            move |_: &(), handler| Some(add(handler)),
            move |_: &(), token| remove(token),
        ));
        self
    }

    fn attach(&self) {
        let Some(change) = &self.change else { return };
        if self.hook.get().is_some() {
            return;
        }
        let get = Rc::clone(&self.get);
        let changed = Rc::downgrade(&self.changed);
        let hook = change.add(
            &(),
            Rc::new(move || {
                if let Some(changed) = changed.upgrade() {
                    changed.raise(&get());
                }
            }),
        );
        self.hook.set(hook);
    }

    fn detach(&self) {
        if let (Some(change), Some(token)) = (&self.change, self.hook.take()) {
            change.remove(&(), token);
        }
    }
}

impl<T: Clone + 'static> Binding for DelegateDirectBinding<T> {
    fn unbind(&self) {
        self.detach();
    }

    fn update(&self, _: BindingUpdateMode) {
        self.changed.raise(&(self.get)());
    }
}

impl<T: Clone + 'static> DirectBinding<T> for DelegateDirectBinding<T> {
    fn data_value(&self) -> Option<T> {
        (self.get)()
    }

    fn set_data_value(&self, value: Option<T>) {
        if let Some(set) = &self.set {
            set(value);
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

impl<T> fmt::Debug for DelegateDirectBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DelegateDirectBinding")
            .field("read_only", &self.set.is_none())
            .field("subscribers", &self.changed.len())
            .field("hooked", &self.hook.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_hook_follows_subscribers() {
        let value = Rc::new(Cell::new(1));
        let source = Rc::new(Event::<()>::new());

        let binding = {
            let (get, set) = (Rc::clone(&value), Rc::clone(&value));
            let (add, remove) = (Rc::clone(&source), Rc::clone(&source));
            crate::binding::direct(move || Some(get.get()))
                .with_setter(move |v| set.set(v.unwrap_or_default()))
                .with_change_event(
                    move |h| add.subscribe(move |_| h()),
                    move |token| {
                        remove.unsubscribe(token);
                    },
                )
        };
        assert!(source.is_empty(), "nothing is hooked without subscribers");

        let seen = Rc::new(RefCell::new(Vec::new()));
        let token = {
            let seen = Rc::clone(&seen);
            binding.add_data_value_changed(Rc::new(move |v: &Option<i32>| {
                seen.borrow_mut().push(*v)
            }))
        };
        assert_eq!(source.len(), 1);

        binding.set_data_value(Some(5));
        source.raise(&());
        assert_eq!(*seen.borrow(), vec![Some(5)]);

        assert!(binding.remove_data_value_changed(token));
        assert!(source.is_empty());
        assert!(!binding.remove_data_value_changed(token));
    }

    #[test]
    fn test_unbind_and_update() {
        let source = Rc::new(Event::<()>::new());
        let binding = {
            let (add, remove) = (Rc::clone(&source), Rc::clone(&source));
            crate::binding::direct(|| Some("x")).with_change_event(
                move |h| add.subscribe(move |_| h()),
                move |token| {
                    remove.unsubscribe(token);
                },
            )
        };
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        binding.add_data_value_changed(Rc::new(move |_: &Option<&str>| c.set(c.get() + 1)));

        binding.update(BindingUpdateMode::Destination);
        assert_eq!(count.get(), 1);

        binding.unbind();
        binding.unbind();
        assert!(source.is_empty());
        source.raise(&());
        assert_eq!(count.get(), 1);
    }
}
