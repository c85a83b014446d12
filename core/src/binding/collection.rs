use super::{Binding, BindingUpdateMode};
use core::fmt;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// The bindings owned by a widget.
#[derive(Default)]
pub struct BindingCollection {
    bindings: RefCell<Vec<Rc<dyn Binding>>>,
}

impl BindingCollection {
    pub fn new() -> BindingCollection {
        BindingCollection::default()
    }

    pub fn add(&self, binding: Rc<dyn Binding>) {
        self.bindings.borrow_mut().push(binding);
    }

    /// Removes a binding without unbinding it.
    pub fn remove(&self, binding: &Rc<dyn Binding>) -> bool {
        let mut bindings = self.bindings.borrow_mut();
        match bindings.iter().position(|b| Rc::ptr_eq(b, binding)) {
            Some(pos) => {
                bindings.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.bindings.borrow_mut().clear();
    }

    /// Unbinds every binding.
    ///
    /// A binding that panics does not stop the others from being unbound; the first panic is
    /// resumed once all of them have been visited.
    pub fn unbind(&self) {
        self.each(|binding| binding.unbind());
    }

    /// Pushes every source value to its destination.
    pub fn update(&self) {
        self.update_with(BindingUpdateMode::Destination);
    }

    pub fn update_with(&self, mode: BindingUpdateMode) {
        self.each(|binding| binding.update(mode));
    }

    fn each(&self, f: impl Fn(&dyn Binding)) {
        let bindings: Vec<_> = self.bindings.borrow().clone();
        let mut first_panic = None;
        for binding in bindings {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| f(&*binding))) {
                first_panic.get_or_insert(payload);
            }
        }
        if let Some(payload) = first_panic {
            panic::resume_unwind(payload);
        }
    }
}

impl fmt::Debug for BindingCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BindingCollection({} bindings)", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Probe {
        unbound: Cell<usize>,
        updated: Cell<Option<BindingUpdateMode>>,
    }

    impl Binding for Probe {
        fn unbind(&self) {
            self.unbound.set(self.unbound.get() + 1);
        }

        fn update(&self, mode: BindingUpdateMode) {
            self.updated.set(Some(mode));
        }
    }

    #[test]
    fn test_add_remove_update() {
        let bindings = BindingCollection::new();
        let a = Rc::new(Probe::default());
        let b = Rc::new(Probe::default());
        bindings.add(a.clone());
        bindings.add(b.clone());
        assert_eq!(bindings.len(), 2);

        let b_dyn: Rc<dyn Binding> = b.clone();
        assert!(bindings.remove(&b_dyn));
        assert!(!bindings.remove(&b_dyn));

        bindings.update();
        assert_eq!(a.updated.get(), Some(BindingUpdateMode::Destination));
        assert_eq!(b.updated.get(), None);

        bindings.unbind();
        assert_eq!(a.unbound.get(), 1);
        assert_eq!(b.unbound.get(), 0);
    }
}
