use super::indirect::{BindingEvents, IndirectBinding};
use crate::events::HandlerToken;
use core::fmt;
use std::rc::Rc;

type AddFn<S> = Box<dyn Fn(&S, Rc<dyn Fn()>) -> Option<HandlerToken>>;
type RemoveFn<S> = Box<dyn Fn(&S, HandlerToken)>;

/// A subscribe/unsubscribe pair for some change event on items of type `S`.
///
/// Whatever `add` returns is exactly what is later passed to `remove`.
pub struct ChangeEvent<S: ?Sized> {
    add: AddFn<S>,
    remove: RemoveFn<S>,
}

impl<S: ?Sized> ChangeEvent<S> {
    pub fn new<A, R>(add: A, remove: R) -> Self
    where
        A: Fn(&S, Rc<dyn Fn()>) -> Option<HandlerToken> + 'static,
        R: Fn(&S, HandlerToken) + 'static,
    {
        ChangeEvent {
            add: Box::new(add),
            remove: Box::new(remove),
        }
    }

    pub(crate) fn add(&self, item: &S, handler: Rc<dyn Fn()>) -> Option<HandlerToken> {
        (self.add)(item, handler)
    }

    pub(crate) fn remove(&self, item: &S, token: HandlerToken) {
        (self.remove)(item, token)
    }
}

impl<S: ?Sized> fmt::Debug for ChangeEvent<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("ChangeEvent")
    }
}

/// An indirect binding made of closures.
pub struct DelegateBinding<S: ?Sized, T> {
    get: Box<dyn Fn(&S) -> Option<T>>,
    set: Option<Box<dyn Fn(&S, Option<T>)>>,
    change: Option<ChangeEvent<S>>,
    events: BindingEvents<T>,
}

impl<S: ?Sized + 'static, T: Clone + 'static> DelegateBinding<S, T> {
    pub fn new<G>(get: G) -> Self
    where
        G: Fn(&S) -> Option<T> + 'static,
    {
        DelegateBinding {
            get: Box::new(get),
            set: None,
            change: None,
            events: BindingEvents::new(),
        }
    }

    pub fn with_setter<F>(mut self, set: F) -> Self
    where
        F: Fn(&S, Option<T>) + 'static,
    {
        self.set = Some(Box::new(set));
        self
    }

    pub fn with_change_event<A, R>(mut self, add: A, remove: R) -> Self
    where
        A: Fn(&S, Rc<dyn Fn()>) -> Option<HandlerToken> + 'static,
        R: Fn(&S, HandlerToken) + 'static,
    {
        self.change = Some(ChangeEvent::new(add, remove));
        self
    }
}

impl<S: ?Sized + 'static, T: Clone + 'static> IndirectBinding<S, T> for DelegateBinding<S, T> {
    fn get_value(&self, item: &S) -> Option<T> {
        (self.get)(item)
    }

    fn internal_set_value(&self, item: &S, value: Option<T>) {
        if let Some(set) = &self.set {
            set(item, value);
        }
    }

    fn events(&self) -> &BindingEvents<T> {
        &self.events
    }

    fn add_value_changed_handler(
        &self,
        item: &Rc<S>,
        handler: Rc<dyn Fn()>,
    ) -> Option<HandlerToken> {
        self.change.as_ref()?.add(item, handler)
    }

    fn remove_value_changed_handler(&self, item: &Rc<S>, token: HandlerToken) {
        if let Some(change) = &self.change {
            change.remove(item, token);
        }
    }
}

impl<S: ?Sized, T> fmt::Debug for DelegateBinding<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DelegateBinding")
            .field("read_only", &self.set.is_none())
            .field("change", &self.change)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use std::cell::Cell;

    #[derive(Default)]
    struct Slider {
        value: Cell<f64>,
        value_changed: Event<()>,
    }

    #[test]
    fn test_delegate_binding() {
        let slider = Rc::new(Slider::default());
        let binding = crate::binding::delegate(|s: &Slider| Some(s.value.get()))
            .with_setter(|s: &Slider, v: Option<f64>| {
                s.value.set(v.unwrap_or_default());
                s.value_changed.raise(&());
            })
            .with_change_event(
                |s: &Slider, h: Rc<dyn Fn()>| Some(s.value_changed.subscribe(move |_| h())),
                |s: &Slider, token| {
                    s.value_changed.unsubscribe(token);
                },
            );

        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let token = binding
            .add_value_changed_handler(&slider, Rc::new(move || c.set(c.get() + 1)))
            .unwrap();
        binding.set_value(&*slider, Some(0.5));
        assert_eq!(binding.get_value(&*slider), Some(0.5));
        assert_eq!(count.get(), 1);

        binding.remove_value_changed_handler(&slider, token);
        assert!(slider.value_changed.is_empty());
    }

    #[test]
    fn test_without_setter_or_events() {
        let slider = Rc::new(Slider::default());
        let binding = DelegateBinding::new(|s: &Slider| Some(s.value.get()));
        binding.set_value(&*slider, Some(2.0));
        assert_eq!(slider.value.get(), 0.0);
        assert!(binding
            .add_value_changed_handler(&slider, Rc::new(|| ()))
            .is_none());
    }
}
