use super::indirect::{BindingEvents, IndirectBinding};
use crate::events::{Event, HandlerToken};
use core::fmt;
use std::rc::Rc;
use tracing::trace;

/// Payload of a model's property change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChangedEventArgs {
    property_name: Option<String>,
}

impl PropertyChangedEventArgs {
    pub fn new(name: impl Into<String>) -> Self {
        PropertyChangedEventArgs {
            property_name: Some(name.into()),
        }
    }

    /// A notification that every property may have changed.
    pub fn all() -> Self {
        PropertyChangedEventArgs {
            property_name: None,
        }
    }

    pub fn property_name(&self) -> Option<&str> {
        self.property_name.as_deref()
    }

    /// Returns true if this notification covers the named property.
    ///
    /// A missing or empty name covers every property.
    pub fn affects(&self, name: &str) -> bool {
        match self.property_name.as_deref() {
            None | Some("") => true,
            Some(changed) => changed == name,
        }
    }
}

/// Models that announce property changes through a single event.
pub trait NotifyPropertyChanged {
    fn property_changed(&self) -> &Event<PropertyChangedEventArgs>;

    fn notify_property_changed(&self, name: &str) {
        self.property_changed()
            .raise(&PropertyChangedEventArgs::new(name));
    }
}

type NamedEventFn<M> = Box<dyn for<'a> Fn(&'a M) -> &'a Event<()>>;

enum ChangeSource<M: ?Sized> {
    None,
    Notify(for<'a> fn(&'a M) -> &'a Event<PropertyChangedEventArgs>),
    Named(NamedEventFn<M>),
}

/// Binds a named property of a model type.
///
/// Change notification comes either from the model's [`NotifyPropertyChanged`] event, filtered
/// to this property's name, or from a dedicated per-property event.
pub struct PropertyBinding<M: ?Sized, T> {
    name: String,
    get: Box<dyn Fn(&M) -> Option<T>>,
    set: Option<Box<dyn Fn(&M, Option<T>)>>,
    change: ChangeSource<M>,
    events: BindingEvents<T>,
}

impl<M: ?Sized + 'static, T: Clone + 'static> PropertyBinding<M, T> {
    /// A read-only binding to a non-nullable property.
    pub fn new<G>(name: impl Into<String>, get: G) -> Self
    where
        G: Fn(&M) -> T + 'static,
    {
        PropertyBinding::nullable(name, move |model| Some(get(model)))
    }

    /// A read-only binding to a nullable property.
    pub fn nullable<G>(name: impl Into<String>, get: G) -> Self
    where
        G: Fn(&M) -> Option<T> + 'static,
    {
        PropertyBinding {
            name: name.into(),
            get: Box::new(get),
            set: None,
            change: ChangeSource::None,
            events: BindingEvents::new(),
        }
    }

    /// Makes the property writable. Writing null leaves the property unchanged.
    pub fn with_setter<F>(mut self, set: F) -> Self
    where
        F: Fn(&M, T) + 'static,
    {
        let name = self.name.clone();
        self.set = Some(Box::new(move |model, value| match value {
            Some(value) => set(model, value),
            None => trace!(property = %name, "ignoring null for non-nullable property"),
        }));
        self
    }

    /// Makes a nullable property writable.
    pub fn with_nullable_setter<F>(mut self, set: F) -> Self
    where
        F: Fn(&M, Option<T>) + 'static,
    {
        self.set = Some(Box::new(set));
        self
    }

    /// Observes a dedicated change event for this property.
    pub fn with_changed_event<F>(mut self, event: F) -> Self
    where
        F: for<'a> Fn(&'a M) -> &'a Event<()> + 'static,
    {
        self.change = ChangeSource::Named(Box::new(event));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_read_only(&self) -> bool {
        self.set.is_none()
    }
}

impl<M, T> PropertyBinding<M, T>
where
    M: NotifyPropertyChanged + ?Sized + 'static,
    T: Clone + 'static,
{
    /// Observes the model's property change event, for notifications naming this property.
    pub fn notifying(mut self) -> Self {
        self.change = ChangeSource::Notify(M::property_changed);
        self
    }
}

impl<M: ?Sized + 'static, T: Clone + 'static> IndirectBinding<M, T> for PropertyBinding<M, T> {
    fn get_value(&self, item: &M) -> Option<T> {
        (self.get)(item)
    }

    fn internal_set_value(&self, item: &M, value: Option<T>) {
        match &self.set {
            Some(set) => set(item, value),
            None => trace!(property = %self.name, "ignoring write to read-only property"),
        }
    }

    fn events(&self) -> &BindingEvents<T> {
        &self.events
    }

    fn add_value_changed_handler(
        &self,
        item: &Rc<M>,
        handler: Rc<dyn Fn()>,
    ) -> Option<HandlerToken> {
        match &self.change {
            ChangeSource::None => None,
            ChangeSource::Notify(event) => {
                let name = self.name.clone();
                Some(event(&**item).subscribe(move |args| {
                    if args.affects(&name) {
                        handler();
                    }
                }))
            }
            ChangeSource::Named(event) => Some(event(&**item).subscribe(move |_| handler())),
        }
    }

    fn remove_value_changed_handler(&self, item: &Rc<M>, token: HandlerToken) {
        let removed = match &self.change {
            ChangeSource::None => false,
            ChangeSource::Notify(event) => event(&**item).unsubscribe(token),
            ChangeSource::Named(event) => event(&**item).unsubscribe(token),
        };
        if !removed {
            trace!(property = %self.name, ?token, "change handler was already removed");
        }
    }
}

impl<M: ?Sized, T> fmt::Debug for PropertyBinding<M, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PropertyBinding")
            .field("name", &self.name)
            .field("read_only", &self.set.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Person {
        age: Cell<u32>,
        nickname: std::cell::RefCell<Option<String>>,
        property_changed: Event<PropertyChangedEventArgs>,
        age_changed: Event<()>,
    }

    impl Person {
        fn age(&self) -> u32 {
            self.age.get()
        }

        fn set_age(&self, age: u32) {
            self.age.set(age);
            self.notify_property_changed("age");
            self.age_changed.raise(&());
        }
    }

    impl NotifyPropertyChanged for Person {
        fn property_changed(&self) -> &Event<PropertyChangedEventArgs> {
            &self.property_changed
        }
    }

    fn counter() -> (Rc<Cell<usize>>, Rc<dyn Fn()>) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        (count, Rc::new(move || c.set(c.get() + 1)))
    }

    #[test]
    fn test_notify_filters_by_name() {
        let person = Rc::new(Person::default());
        let binding = crate::binding::property("age", Person::age, Person::set_age);

        let (count, handler) = counter();
        let token = binding.add_value_changed_handler(&person, handler).unwrap();

        person.set_age(3);
        person.notify_property_changed("name");
        person.property_changed().raise(&PropertyChangedEventArgs::all());
        assert_eq!(count.get(), 2);

        binding.remove_value_changed_handler(&person, token);
        person.set_age(4);
        assert_eq!(count.get(), 2);
        assert!(person.property_changed().is_empty());
    }

    #[test]
    fn test_named_event() {
        let person = Rc::new(Person::default());
        let binding = PropertyBinding::new("age", Person::age)
            .with_setter(Person::set_age)
            .with_changed_event(|p: &Person| &p.age_changed);

        let (count, handler) = counter();
        binding.add_value_changed_handler(&person, handler).unwrap();
        binding.set_value(&*person, Some(30));
        assert_eq!(count.get(), 1);
        assert_eq!(binding.get_value(&*person), Some(30));
    }

    #[test]
    fn test_null_and_read_only() {
        let person = Rc::new(Person::default());
        let age = crate::binding::property("age", Person::age, Person::set_age);
        age.set_value(&*person, Some(9));
        age.set_value(&*person, None);
        assert_eq!(person.age(), 9, "null leaves a non-nullable property unchanged");

        let read_only = PropertyBinding::new("age", Person::age);
        assert!(read_only.is_read_only());
        read_only.set_value(&*person, Some(1));
        assert_eq!(person.age(), 9);
        assert!(read_only.add_value_changed_handler(&person, counter().1).is_none());

        let nickname =
            PropertyBinding::nullable("nickname", |p: &Person| p.nickname.borrow().clone())
                .with_nullable_setter(|p: &Person, v| *p.nickname.borrow_mut() = v);
        nickname.set_value(&*person, Some("Al".to_string()));
        assert_eq!(nickname.get_value(&*person).as_deref(), Some("Al"));
        nickname.set_value(&*person, None);
        assert_eq!(nickname.get_value(&*person), None);
    }

    #[test]
    fn test_affects() {
        assert!(PropertyChangedEventArgs::all().affects("x"));
        assert!(PropertyChangedEventArgs::new("").affects("x"));
        assert!(PropertyChangedEventArgs::new("x").affects("x"));
        assert!(!PropertyChangedEventArgs::new("y").affects("x"));
    }
}
