//! A loosely-typed property bag for attached state.

use core::any::Any;
use core::fmt;
use std::cell::RefCell;
use std::collections::HashMap;

/// Values attached to a widget by code that does not own the widget's type.
#[derive(Default)]
pub struct Properties {
    values: RefCell<HashMap<&'static str, Box<dyn Any>>>,
}

impl Properties {
    pub fn new() -> Properties {
        Properties::default()
    }

    /// Returns a clone of the value under `key`, or None if it is unset or of another type.
    pub fn get<T: Any + Clone>(&self, key: &str) -> Option<T> {
        self.values
            .borrow()
            .get(key)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    /// Returns the value under `key`, or the default for `T`.
    pub fn get_or_default<T: Any + Clone + Default>(&self, key: &str) -> T {
        self.get(key).unwrap_or_default()
    }

    /// Sets a value, returning true if a previous value was replaced.
    pub fn set<T: Any>(&self, key: &'static str, value: T) -> bool {
        self.values
            .borrow_mut()
            .insert(key, Box::new(value))
            .is_some()
    }

    pub fn remove(&self, key: &str) -> bool {
        self.values.borrow_mut().remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl fmt::Debug for Properties {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let values = self.values.borrow();
        let mut keys: Vec<_> = values.keys().collect();
        keys.sort();
        f.debug_set().entries(keys).finish()
    }
}

#[test]
fn test_properties() {
    let props = Properties::new();
    assert!(!props.set("CancelClose", true));
    assert!(props.contains("CancelClose"));
    assert_eq!(props.get::<bool>("CancelClose"), Some(true));
    assert_eq!(props.get::<i32>("CancelClose"), None, "wrong type reads as unset");
    assert!(!props.get_or_default::<bool>("Missing"));

    assert!(props.set("CancelClose", false));
    assert_eq!(props.get::<bool>("CancelClose"), Some(false));
    assert!(props.remove("CancelClose"));
    assert!(props.is_empty());
}
