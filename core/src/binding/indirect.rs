use crate::events::{Event, HandlerToken};
use core::fmt;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::trace;

/// Raised before an indirect binding writes a value.
///
/// Handlers may replace the value that will be written, or cancel the write.
pub struct BindingChangingEventArgs<T> {
    value: RefCell<Option<T>>,
    cancel: Cell<bool>,
}

impl<T: Clone> BindingChangingEventArgs<T> {
    pub fn new(value: Option<T>) -> Self {
        BindingChangingEventArgs {
            value: RefCell::new(value),
            cancel: Cell::new(false),
        }
    }

    /// The value about to be written.
    pub fn value(&self) -> Option<T> {
        self.value.borrow().clone()
    }

    /// Replaces the value about to be written.
    pub fn set_value(&self, value: Option<T>) {
        *self.value.borrow_mut() = value;
    }

    /// Skips the write (and the changed event).
    pub fn cancel(&self) {
        self.cancel.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.get()
    }

    fn into_value(self) -> Option<T> {
        self.value.into_inner()
    }
}

/// Raised after an indirect binding wrote a value.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingChangedEventArgs<T> {
    value: Option<T>,
}

impl<T> BindingChangedEventArgs<T> {
    pub fn new(value: Option<T>) -> Self {
        BindingChangedEventArgs { value }
    }

    /// The value that was written.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

/// The changing/changed event pair every indirect binding carries.
pub struct BindingEvents<T> {
    changing: Event<BindingChangingEventArgs<T>>,
    changed: Event<BindingChangedEventArgs<T>>,
}

impl<T> BindingEvents<T> {
    pub fn new() -> Self {
        BindingEvents {
            changing: Event::new(),
            changed: Event::new(),
        }
    }

    pub fn changing(&self) -> &Event<BindingChangingEventArgs<T>> {
        &self.changing
    }

    pub fn changed(&self) -> &Event<BindingChangedEventArgs<T>> {
        &self.changed
    }
}

impl<T> Default for BindingEvents<T> {
    fn default() -> Self {
        BindingEvents::new()
    }
}

impl<T> fmt::Debug for BindingEvents<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BindingEvents")
            .field("changing", &self.changing)
            .field("changed", &self.changed)
            .finish()
    }
}

/// Reads, writes and observes a value of type `T` on items of type `S`.
pub trait IndirectBinding<S: ?Sized, T: Clone + 'static> {
    /// Reads the value from an item. `None` is null.
    fn get_value(&self, item: &S) -> Option<T>;

    /// Writes the value to an item, without raising any binding events.
    fn internal_set_value(&self, item: &S, value: Option<T>);

    fn events(&self) -> &BindingEvents<T>;

    /// Calls `handler` whenever the value changes on `item`.
    ///
    /// Returns the token that removes the handler again, or None if the item offers no change
    /// notification.
    fn add_value_changed_handler(
        &self,
        item: &Rc<S>,
        handler: Rc<dyn Fn()>,
    ) -> Option<HandlerToken> {
        let _ = (item, handler);
        None
    }

    /// Removes a handler added with [`add_value_changed_handler`](Self::add_value_changed_handler).
    fn remove_value_changed_handler(&self, item: &Rc<S>, token: HandlerToken) {
        let _ = (item, token);
    }

    /// Writes the value to an item.
    ///
    /// Raises `changing` right before the write, with the proposed value (which handlers may
    /// replace or cancel), and `changed` right after, with the value actually written.
    fn set_value(&self, item: &S, value: Option<T>) {
        let args = BindingChangingEventArgs::new(value);
        self.events().changing().raise(&args);
        if args.is_cancelled() {
            trace!("binding write cancelled");
            return;
        }
        let value = args.into_value();
        self.internal_set_value(item, value.clone());
        self.events()
            .changed()
            .raise(&BindingChangedEventArgs::new(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recording {
        log: Log,
        events: BindingEvents<i32>,
    }

    impl IndirectBinding<Cell<i32>, i32> for Recording {
        fn get_value(&self, item: &Cell<i32>) -> Option<i32> {
            Some(item.get())
        }

        fn internal_set_value(&self, item: &Cell<i32>, value: Option<i32>) {
            self.log.borrow_mut().push(format!("set {:?}", value));
            item.set(value.unwrap_or_default());
        }

        fn events(&self) -> &BindingEvents<i32> {
            &self.events
        }
    }

    fn recording() -> (Recording, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let binding = Recording {
            log: Rc::clone(&log),
            events: BindingEvents::new(),
        };
        {
            let log = Rc::clone(&log);
            binding.events().changing().subscribe(move |args| {
                log.borrow_mut().push(format!("changing {:?}", args.value()))
            });
        }
        {
            let log = Rc::clone(&log);
            binding.events().changed().subscribe(move |args| {
                log.borrow_mut()
                    .push(format!("changed {:?}", args.value().copied()))
            });
        }
        (binding, log)
    }

    #[test]
    fn test_changing_then_set_then_changed() {
        let (binding, log) = recording();
        let item = Cell::new(0);
        binding.set_value(&item, Some(3));

        assert_eq!(
            *log.borrow(),
            vec!["changing Some(3)", "set Some(3)", "changed Some(3)"]
        );
        assert_eq!(item.get(), 3);
    }

    #[test]
    fn test_changing_substitutes_value() {
        let (binding, log) = recording();
        binding
            .events()
            .changing()
            .subscribe(|args| args.set_value(args.value().map(|v| v * 10)));

        let item = Cell::new(0);
        binding.set_value(&item, Some(4));
        assert_eq!(item.get(), 40);
        assert_eq!(log.borrow().last().unwrap(), "changed Some(40)");
    }

    #[test]
    fn test_changing_cancel() {
        let (binding, log) = recording();
        binding.events().changing().subscribe(|args| args.cancel());

        let item = Cell::new(7);
        binding.set_value(&item, Some(1));
        assert_eq!(item.get(), 7);
        assert_eq!(*log.borrow(), vec!["changing Some(1)"]);
    }

    #[test]
    fn test_events_fire_without_listeners() {
        let binding = Recording {
            log: Rc::new(RefCell::new(Vec::new())),
            events: BindingEvents::new(),
        };
        let item = Cell::new(0);
        binding.set_value(&item, None);
        assert_eq!(*binding.log.borrow(), vec!["set None"]);
    }

    #[test]
    fn test_shared_binding() {
        let (binding, log) = recording();
        let shared: Rc<dyn IndirectBinding<Cell<i32>, i32>> = Rc::new(binding);
        let item = Cell::new(0);
        shared.set_value(&item, Some(2));
        assert_eq!(shared.get_value(&item), Some(2));
        assert_eq!(log.borrow().len(), 3);
    }
}
