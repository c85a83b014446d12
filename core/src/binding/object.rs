use super::indirect::IndirectBinding;
use super::{Binding, BindingUpdateMode, DirectBinding};
use crate::events::{Event, HandlerToken};
use core::fmt;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::trace;

/// A direct binding to a value on a data item, through an indirect binding.
///
/// The data item is held weakly. Once it is gone the binding reads as null (or the configured
/// null substitute) and ignores writes.
///
/// The item's change event is only subscribed while this binding has subscribers, and is
/// moved along when the data item is replaced.
pub struct ObjectBinding<S: ?Sized + 'static, T: Clone + 'static> {
    me: Weak<ObjectBinding<S, T>>,
    item: RefCell<Option<Weak<S>>>,
    inner: Rc<dyn IndirectBinding<S, T>>,
    getting_null_value: RefCell<Option<T>>,
    setting_null_value: RefCell<Option<T>>,
    changed: Event<Option<T>>,
    hook: RefCell<Option<(Weak<S>, HandlerToken)>>,
}

impl<S: ?Sized + 'static, T: Clone + 'static> ObjectBinding<S, T> {
    pub fn new<B>(item: &Rc<S>, binding: B) -> Rc<Self>
    where
        B: IndirectBinding<S, T> + 'static,
    {
        ObjectBinding::with_shared(Some(item), Rc::new(binding))
    }

    /// Shares an indirect binding, optionally starting without a data item.
    pub fn with_shared(item: Option<&Rc<S>>, binding: Rc<dyn IndirectBinding<S, T>>) -> Rc<Self> {
        Rc::new_cyclic(|me| ObjectBinding {
            me: me.clone(),
            item: RefCell::new(item.map(Rc::downgrade)),
            inner: binding,
            getting_null_value: RefCell::new(None),
            setting_null_value: RefCell::new(None),
            changed: Event::new(),
            hook: RefCell::new(None),
        })
    }

    pub fn inner_binding(&self) -> &Rc<dyn IndirectBinding<S, T>> {
        &self.inner
    }

    pub fn data_item(&self) -> Option<Rc<S>> {
        self.item.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// Re-targets the binding and notifies subscribers of the new item's value.
    pub fn set_data_item(&self, item: Option<&Rc<S>>) {
        self.detach();
        *self.item.borrow_mut() = item.map(Rc::downgrade);
        if !self.changed.is_empty() {
            self.attach();
        }
        self.changed.raise(&self.data_value());
    }

    /// Value reported instead of null when reading.
    pub fn getting_null_value(&self) -> Option<T> {
        self.getting_null_value.borrow().clone()
    }

    pub fn set_getting_null_value(&self, value: Option<T>) {
        *self.getting_null_value.borrow_mut() = value;
    }

    /// Value written instead of null.
    pub fn setting_null_value(&self) -> Option<T> {
        self.setting_null_value.borrow().clone()
    }

    pub fn set_setting_null_value(&self, value: Option<T>) {
        *self.setting_null_value.borrow_mut() = value;
    }

    fn attach(&self) {
        if self.hook.borrow().is_some() {
            return;
        }
        let Some(item) = self.data_item() else { return };
        let me = self.me.clone();
        let handler: Rc<dyn Fn()> = Rc::new(move || {
            if let Some(me) = me.upgrade() {
                me.changed.raise(&me.data_value());
            }
        });
        if let Some(token) = self.inner.add_value_changed_handler(&item, handler) {
            *self.hook.borrow_mut() = Some((Rc::downgrade(&item), token));
        } else {
            trace!("data item offers no change notification");
        }
    }

    fn detach(&self) {
        let hook = self.hook.borrow_mut().take();
        if let Some((item, token)) = hook {
            if let Some(item) = item.upgrade() {
                self.inner.remove_value_changed_handler(&item, token);
            }
        }
    }
}

impl<S: ?Sized + 'static, T: Clone + 'static> Binding for ObjectBinding<S, T> {
    fn unbind(&self) {
        self.detach();
    }

    fn update(&self, _: BindingUpdateMode) {
        self.changed.raise(&self.data_value());
    }
}

impl<S: ?Sized + 'static, T: Clone + 'static> DirectBinding<T> for ObjectBinding<S, T> {
    fn data_value(&self) -> Option<T> {
        self.data_item()
            .and_then(|item| self.inner.get_value(&item))
            .or_else(|| self.getting_null_value())
    }

    fn set_data_value(&self, value: Option<T>) {
        let value = value.or_else(|| self.setting_null_value());
        match self.data_item() {
            Some(item) => self.inner.set_value(&item, value),
            None => trace!("no data item to write to"),
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

impl<S: ?Sized + 'static, T: Clone + fmt::Debug + 'static> fmt::Debug for ObjectBinding<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ObjectBinding")
            .field("has_item", &self.data_item().is_some())
            .field("subscribers", &self.changed.len())
            .field("hooked", &self.hook.borrow().is_some())
            .field("getting_null_value", &self.getting_null_value.borrow())
            .field("setting_null_value", &self.setting_null_value.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{self, NotifyPropertyChanged, PropertyBinding, PropertyChangedEventArgs};
    use std::cell::Cell;

    #[derive(Default)]
    struct Counter {
        count: Cell<i32>,
        label: RefCell<Option<String>>,
        property_changed: Event<PropertyChangedEventArgs>,
    }

    impl Counter {
        fn count(&self) -> i32 {
            self.count.get()
        }

        fn set_count(&self, count: i32) {
            if self.count.replace(count) != count {
                self.notify_property_changed("count");
            }
        }
    }

    fn count_binding() -> PropertyBinding<Counter, i32> {
        binding::property("count", Counter::count, Counter::set_count)
    }

    impl NotifyPropertyChanged for Counter {
        fn property_changed(&self) -> &Event<PropertyChangedEventArgs> {
            &self.property_changed
        }
    }

    type Seen<T> = Rc<RefCell<Vec<Option<T>>>>;

    fn record<S, T>(binding: &ObjectBinding<S, T>) -> (Seen<T>, HandlerToken)
    where
        S: ?Sized + 'static,
        T: Clone + 'static,
    {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let token = binding
            .add_data_value_changed(Rc::new(move |v: &Option<T>| s.borrow_mut().push(v.clone())));
        (seen, token)
    }

    #[test]
    fn test_property_change_notifies_once() {
        let model = Rc::new(Counter::default());
        let binding = ObjectBinding::new(&model, count_binding());
        let (seen, _) = record(&binding);

        model.set_count(5);
        assert_eq!(*seen.borrow(), vec![Some(5)]);
        assert_eq!(binding.data_value(), Some(5));
    }

    #[test]
    fn test_hook_released_with_last_subscriber() {
        let model = Rc::new(Counter::default());
        let binding = ObjectBinding::new(&model, count_binding());
        assert!(model.property_changed().is_empty());

        let (_, a) = record(&binding);
        let (_, b) = record(&binding);
        assert_eq!(model.property_changed().len(), 1, "one hook for many subscribers");

        binding.remove_data_value_changed(a);
        assert_eq!(model.property_changed().len(), 1);
        binding.remove_data_value_changed(b);
        assert!(model.property_changed().is_empty());
    }

    #[test]
    fn test_unbind_removes_hook() {
        let model = Rc::new(Counter::default());
        let binding = ObjectBinding::new(&model, count_binding());
        let (seen, _) = record(&binding);

        binding.unbind();
        assert!(model.property_changed().is_empty());
        model.set_count(1);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_weak_data_item() {
        let model = Rc::new(Counter::default());
        model.set_count(3);
        let binding = ObjectBinding::new(&model, count_binding());
        assert_eq!(binding.data_value(), Some(3));

        drop(model);
        assert!(binding.data_item().is_none(), "the binding does not own its item");
        assert_eq!(binding.data_value(), None);
        binding.set_data_value(Some(1));
    }

    #[test]
    fn test_null_substitution() {
        let model = Rc::new(Counter::default());
        let label = PropertyBinding::nullable("label", |c: &Counter| c.label.borrow().clone())
            .with_nullable_setter(|c: &Counter, v| *c.label.borrow_mut() = v);
        let binding = ObjectBinding::new(&model, label);
        binding.set_getting_null_value(Some("(none)".to_string()));
        binding.set_setting_null_value(Some("blank".to_string()));

        assert_eq!(binding.data_value().as_deref(), Some("(none)"));
        binding.set_data_value(None);
        assert_eq!(model.label.borrow().as_deref(), Some("blank"));
        binding.set_data_value(Some("x".to_string()));
        assert_eq!(binding.data_value().as_deref(), Some("x"));
    }

    #[test]
    fn test_retarget() {
        let first = Rc::new(Counter::default());
        let second = Rc::new(Counter::default());
        second.set_count(20);

        let binding = ObjectBinding::<Counter, i32>::with_shared(
            None,
            Rc::new(count_binding()),
        );
        let (seen, _) = record(&binding);
        binding.set_data_item(Some(&first));
        binding.set_data_item(Some(&second));
        assert!(first.property_changed().is_empty());
        assert_eq!(second.property_changed().len(), 1);

        first.set_count(1);
        second.set_count(21);
        assert_eq!(*seen.borrow(), vec![Some(0), Some(20), Some(21)]);
    }
}
